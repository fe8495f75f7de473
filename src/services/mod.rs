pub mod credentials;
pub mod meal_search;
pub mod recipe_browser;
pub mod recipe_service;
pub mod shop_service;

pub use credentials::{CredentialPolicy, PlaintextCredentials};
pub use meal_search::{MealSearch, MealSearchError, TheMealDbClient, THE_MEAL_DB_BASE_URL};
pub use recipe_browser::{filter_by_name, RecipeBrowser};
pub use recipe_service::RecipeService;
pub use shop_service::ShopService;
