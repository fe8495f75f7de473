use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::{NewRecipe, Recipe, RecipeId, RecipePatch, RepositoryError, RepositoryResult};

/// Trait defining the interface for recipe data access operations
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All recipes in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<Recipe>>;

    /// Find a recipe by id
    async fn find_by_id(&self, id: RecipeId) -> RepositoryResult<Option<Recipe>>;

    /// Assign the next id and append
    async fn insert(&self, recipe: NewRecipe) -> RepositoryResult<Recipe>;

    /// Apply a patch in place. `NotFound` when the id is absent.
    async fn update(&self, id: RecipeId, patch: RecipePatch) -> RepositoryResult<Recipe>;

    /// Remove a recipe; returns whether anything was removed
    async fn delete(&self, id: RecipeId) -> RepositoryResult<bool>;
}

/// Process-lifetime recipe collection
pub struct InMemoryRecipeRepository {
    recipes: RwLock<Vec<Recipe>>,
}

impl InMemoryRecipeRepository {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RwLock::new(recipes),
        }
    }

    /// Repository holding the two seed recipes
    pub fn seeded() -> Self {
        Self::new(Recipe::seed())
    }
}

impl Default for InMemoryRecipeRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Last id + 1, or 1 for an empty collection. Ids restart at 1 once everything is deleted.
pub fn next_recipe_id(recipes: &[Recipe]) -> RecipeId {
    recipes.last().map(|recipe| recipe.id + 1).unwrap_or(1)
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RecipeId) -> RepositoryResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|recipe| recipe.id == id).cloned())
    }

    #[instrument(skip(self, recipe), fields(name = %recipe.name))]
    async fn insert(&self, recipe: NewRecipe) -> RepositoryResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        let id = next_recipe_id(&recipes);
        let stored = Recipe::from_new(id, recipe);
        recipes.push(stored.clone());

        debug!(id, "Recipe appended");
        Ok(stored)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: RecipeId, patch: RecipePatch) -> RepositoryResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes
            .iter_mut()
            .find(|recipe| recipe.id == id)
            .ok_or(RepositoryError::NotFound)?;

        recipe.apply(patch);
        Ok(recipe.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecipeId) -> RepositoryResult<bool> {
        let mut recipes = self.recipes.write().await;
        let original_len = recipes.len();
        recipes.retain(|recipe| recipe.id != id);
        Ok(recipes.len() != original_len)
    }
}
