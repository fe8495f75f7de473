// Re-export all model types
pub use self::enums::*;
pub use self::errors::*;
pub use self::meal::*;
pub use self::recipe::*;
pub use self::shop::*;
pub use self::validation::*;

mod enums;
mod errors;
mod meal;
mod recipe;
mod shop;
mod validation;
