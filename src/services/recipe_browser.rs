use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{CreateRecipeRequest, OnlineRecipe, Recipe, ServiceResult};
use crate::observability::BusinessTracingMiddleware;
use crate::services::{MealSearch, RecipeService};

/// Orchestration behind the recipe UI: the local book plus online search
pub struct RecipeBrowser {
    recipes: Arc<RecipeService>,
    search: Arc<dyn MealSearch>,
    tracing: Arc<BusinessTracingMiddleware>,
}

impl RecipeBrowser {
    pub fn new(
        recipes: Arc<RecipeService>,
        search: Arc<dyn MealSearch>,
        tracing: Arc<BusinessTracingMiddleware>,
    ) -> Self {
        Self {
            recipes,
            search,
            tracing,
        }
    }

    pub fn recipes(&self) -> &Arc<RecipeService> {
        &self.recipes
    }

    /// Local recipes whose name contains `filter`, ignoring case
    #[instrument(skip(self))]
    pub async fn local_recipes(&self, filter: &str) -> ServiceResult<Vec<Recipe>> {
        let recipes = self.recipes.list_recipes().await?;
        Ok(filter_by_name(recipes, filter))
    }

    /// Query the online catalogue. Failures are logged and read as no results.
    #[instrument(skip(self))]
    pub async fn search_online(&self, query: &str) -> Vec<OnlineRecipe> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self
            .tracing
            .trace_meal_search(query, self.search.search(query))
            .await
        {
            Ok(records) => records.into_iter().map(OnlineRecipe::from).collect(),
            Err(err) => {
                warn!(error = %err, "Showing no online results after search failure");
                Vec::new()
            }
        }
    }

    /// Bookmark an online result through the normal create path
    #[instrument(skip(self, request))]
    pub async fn save_online(&self, request: CreateRecipeRequest) -> ServiceResult<Recipe> {
        let recipe = self
            .tracing
            .trace_recipe_operation("save_online", self.recipes.create_recipe(request))
            .await?;

        info!(id = recipe.id, "Online recipe saved");
        Ok(recipe)
    }
}

/// Keep recipes whose name contains `filter`. An empty filter keeps everything.
pub fn filter_by_name(recipes: Vec<Recipe>, filter: &str) -> Vec<Recipe> {
    if filter.is_empty() {
        return recipes;
    }
    recipes
        .into_iter()
        .filter(|recipe| recipe.name_matches(filter))
        .collect()
}
