// Repositories module - data access layer

pub mod cart_repository;
pub mod product_repository;
pub mod recipe_repository;
pub mod user_repository;


pub use cart_repository::{CartRepository, InMemoryCartRepository};
pub use product_repository::{ProductRepository, StaticProductRepository};
pub use recipe_repository::{next_recipe_id, InMemoryRecipeRepository, RecipeRepository};
pub use user_repository::{InMemoryUserRepository, UserRepository};
