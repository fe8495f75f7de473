use serde::{Deserialize, Serialize};

use super::{Validate, ValidationResult};

pub type RecipeId = u64;

/// A bookmarked recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub instructions: String,
}

/// A validated recipe waiting for an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub image: String,
    pub instructions: String,
}

/// Request body for `POST /api/recipes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub instructions: Option<String>,
}

/// Request body for `PUT /api/recipes/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub instructions: Option<String>,
}

/// Fields to overwrite on an existing recipe. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub instructions: Option<String>,
}

/// `{ "message": ... }` body used by every non-record recipe response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Recipe {
    /// Build a stored recipe from validated input
    pub fn from_new(id: RecipeId, new_recipe: NewRecipe) -> Self {
        Self {
            id,
            name: new_recipe.name,
            image: new_recipe.image,
            instructions: new_recipe.instructions,
        }
    }

    /// Overwrite the fields present in the patch
    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = instructions;
        }
    }

    /// Case-insensitive substring match on the name
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// The two recipes every fresh process starts with
    pub fn seed() -> Vec<Recipe> {
        vec![
            Recipe {
                id: 1,
                name: "Spaghetti Carbonara".to_string(),
                image: "https://www.themealdb.com/images/media/meals/llcbn01574260722.jpg"
                    .to_string(),
                instructions: "Cook pasta. Fry bacon. Mix eggs and cheese. Combine.".to_string(),
            },
            Recipe {
                id: 2,
                name: "Chicken Curry".to_string(),
                image: "https://www.themealdb.com/images/media/meals/k29viq1585565980.jpg"
                    .to_string(),
                instructions: "Fry spices. Add chicken. Simmer with coconut milk.".to_string(),
            },
        ]
    }
}

impl CreateRecipeRequest {
    /// Validate and turn the request into a `NewRecipe`
    pub fn into_new_recipe(self) -> ValidationResult<NewRecipe> {
        self.validate()?;
        Ok(NewRecipe {
            name: self.name.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            instructions: self.instructions.unwrap_or_default(),
        })
    }
}

impl UpdateRecipeRequest {
    /// Empty strings count as "not provided" and never overwrite a field.
    pub fn into_patch(self) -> RecipePatch {
        RecipePatch {
            name: non_empty(self.name),
            image: non_empty(self.image),
            instructions: non_empty(self.instructions),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Path ids that are not integers never match a stored recipe
pub fn parse_recipe_id(raw: &str) -> Option<RecipeId> {
    raw.parse().ok()
}
