use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    parse_recipe_id, CreateRecipeRequest, Recipe, ServiceError, ServiceResult,
    UpdateRecipeRequest,
};
use crate::repositories::RecipeRepository;

/// Service for the recipe bookmark store
pub struct RecipeService {
    repository: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    /// Create a new RecipeService
    pub fn new(repository: Arc<dyn RecipeRepository>) -> Self {
        Self { repository }
    }

    /// List every recipe in insertion order
    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> ServiceResult<Vec<Recipe>> {
        let recipes = self.repository.find_all().await?;
        info!("Listed {} recipes", recipes.len());
        Ok(recipes)
    }

    /// Get a single recipe
    #[instrument(skip(self))]
    pub async fn get_recipe(&self, id: &str) -> ServiceResult<Recipe> {
        let not_found = || ServiceError::RecipeNotFound { id: id.to_string() };

        let recipe_id = parse_recipe_id(id).ok_or_else(not_found)?;
        self.repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Validate and append a new recipe
    #[instrument(skip(self, request))]
    pub async fn create_recipe(&self, request: CreateRecipeRequest) -> ServiceResult<Recipe> {
        let new_recipe = request.into_new_recipe()?;
        let recipe = self.repository.insert(new_recipe).await?;

        info!(id = recipe.id, "Recipe created");
        Ok(recipe)
    }

    /// Overwrite the non-empty fields of an existing recipe
    #[instrument(skip(self, request))]
    pub async fn update_recipe(
        &self,
        id: &str,
        request: UpdateRecipeRequest,
    ) -> ServiceResult<Recipe> {
        let not_found = || ServiceError::RecipeNotFound { id: id.to_string() };

        let recipe_id = parse_recipe_id(id).ok_or_else(not_found)?;
        match self.repository.update(recipe_id, request.into_patch()).await {
            Ok(recipe) => {
                info!(id = recipe.id, "Recipe updated");
                Ok(recipe)
            }
            Err(crate::models::RepositoryError::NotFound) => Err(not_found()),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove a recipe. Unknown ids are a silent no-op.
    #[instrument(skip(self))]
    pub async fn delete_recipe(&self, id: &str) -> ServiceResult<()> {
        let Some(recipe_id) = parse_recipe_id(id) else {
            info!("Ignoring delete of non-numeric id");
            return Ok(());
        };

        let removed = self.repository.delete(recipe_id).await?;
        info!(removed, "Recipe delete processed");
        Ok(())
    }
}
