pub mod health;
pub mod metrics;
pub mod middleware;
pub mod recipe_ui;
pub mod recipes;
pub mod shop;

pub use health::*;
pub use metrics::*;
pub use middleware::*;
pub use recipe_ui::RecipeUiState;
pub use recipes::RecipeApiState;
pub use shop::ShopState;
