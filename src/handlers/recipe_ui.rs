//! Server-rendered recipe pages.
//!
//! Each page is a plain GET; every mutation is a form POST answered with a
//! redirect back to `/`, so the browser never resubmits on refresh.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::models::{
    is_present, CreateRecipeRequest, OnlineRecipe, Recipe, ServiceError, UpdateRecipeRequest,
    ValidationError, ViewMode,
};
use crate::services::RecipeBrowser;

pub const SAVED_NOTICE: &str = "saved";
pub const SAVED_NOTICE_MESSAGE: &str = "Recipe saved to My Recipes!";

#[derive(Clone)]
pub struct RecipeUiState {
    pub browser: Arc<RecipeBrowser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub notice: Option<String>,
}

/// Fields posted by the add, edit and save-online forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub instructions: String,
}

impl RecipeForm {
    fn is_complete(&self) -> bool {
        is_present(Some(self.name.as_str())) && is_present(Some(self.image.as_str()))
    }

    fn into_create_request(self) -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: Some(self.name),
            image: Some(self.image),
            instructions: Some(self.instructions),
        }
    }

    fn into_update_request(self) -> UpdateRecipeRequest {
        UpdateRecipeRequest {
            name: Some(self.name),
            image: Some(self.image),
            instructions: Some(self.instructions),
        }
    }
}

impl From<Recipe> for RecipeForm {
    fn from(recipe: Recipe) -> Self {
        Self {
            name: recipe.name,
            image: recipe.image,
            instructions: recipe.instructions,
        }
    }
}

#[derive(Template)]
#[template(path = "recipes.html")]
pub struct RecipesPage {
    pub tab: String,
    pub is_search: bool,
    pub query: String,
    pub notice: String,
    pub recipes: Vec<Recipe>,
    pub online: Vec<OnlineRecipe>,
}

#[derive(Template)]
#[template(path = "recipe_form.html")]
pub struct RecipeFormPage {
    pub heading: String,
    pub action: String,
    pub submit_label: String,
    pub error: String,
    pub name: String,
    pub image: String,
    pub instructions: String,
}

impl RecipeFormPage {
    fn new_recipe(form: RecipeForm, error: String) -> Self {
        Self {
            heading: "Add New Recipe".to_string(),
            action: "/recipes/new".to_string(),
            submit_label: "Add Recipe".to_string(),
            error,
            name: form.name,
            image: form.image,
            instructions: form.instructions,
        }
    }

    fn edit_recipe(id: &str, form: RecipeForm, error: String) -> Self {
        Self {
            heading: "Edit Recipe".to_string(),
            action: format!("/recipes/{}/edit", id),
            submit_label: "Update Recipe".to_string(),
            error,
            name: form.name,
            image: form.image,
            instructions: form.instructions,
        }
    }
}

#[derive(Template)]
#[template(path = "recipe_delete.html")]
pub struct DeleteRecipePage {
    pub recipe: Recipe,
}

#[derive(Template)]
#[template(path = "message.html")]
pub struct MessagePage {
    pub heading: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error("Recipe not found")]
    NotFound,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Failed to render template: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let (status, heading, message) = match &self {
            UiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Recipe not found",
                "That recipe is not in your recipe book.",
            ),
            UiError::Service(_) | UiError::Render(_) => {
                error!(error = %self, "Recipe page failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "Please try again.",
                )
            }
        };

        let page = MessagePage {
            heading: heading.to_string(),
            message: message.to_string(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

fn not_found_as_page(err: ServiceError) -> UiError {
    match err {
        ServiceError::RecipeNotFound { .. } => UiError::NotFound,
        other => UiError::Service(other),
    }
}

fn notice_text(notice: Option<&str>) -> &'static str {
    match notice {
        Some(SAVED_NOTICE) => SAVED_NOTICE_MESSAGE,
        _ => "",
    }
}

/// GET /
#[instrument(skip(state, params))]
pub async fn recipes_page(
    State(state): State<RecipeUiState>,
    Query(params): Query<IndexQuery>,
) -> Result<Html<String>, UiError> {
    let mode = ViewMode::from_query(params.tab.as_deref());
    let query = params.q.unwrap_or_default();

    let (recipes, online) = if mode.is_search() {
        (Vec::new(), state.browser.search_online(&query).await)
    } else {
        (state.browser.local_recipes(&query).await?, Vec::new())
    };

    let page = RecipesPage {
        tab: mode.to_string(),
        is_search: mode.is_search(),
        notice: notice_text(params.notice.as_deref()).to_string(),
        query,
        recipes,
        online,
    };
    Ok(Html(page.render()?))
}

/// GET /recipes/new
pub async fn new_recipe_page() -> Result<Html<String>, UiError> {
    let page = RecipeFormPage::new_recipe(RecipeForm::default(), String::new());
    Ok(Html(page.render()?))
}

/// POST /recipes/new
#[instrument(skip(state, form))]
pub async fn create_recipe(
    State(state): State<RecipeUiState>,
    Form(form): Form<RecipeForm>,
) -> Result<Response, UiError> {
    match state
        .browser
        .recipes()
        .create_recipe(form.clone().into_create_request())
        .await
    {
        Ok(recipe) => {
            info!(id = recipe.id, "Recipe added from form");
            Ok(Redirect::to("/").into_response())
        }
        Err(ServiceError::ValidationError { message }) => {
            let page = RecipeFormPage::new_recipe(form, message);
            Ok((StatusCode::BAD_REQUEST, Html(page.render()?)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /recipes/:id/edit
#[instrument(skip(state))]
pub async fn edit_recipe_page(
    State(state): State<RecipeUiState>,
    Path(id): Path<String>,
) -> Result<Html<String>, UiError> {
    let recipe = state
        .browser
        .recipes()
        .get_recipe(&id)
        .await
        .map_err(not_found_as_page)?;

    let page = RecipeFormPage::edit_recipe(&id, RecipeForm::from(recipe), String::new());
    Ok(Html(page.render()?))
}

/// POST /recipes/:id/edit
#[instrument(skip(state, form))]
pub async fn update_recipe(
    State(state): State<RecipeUiState>,
    Path(id): Path<String>,
    Form(form): Form<RecipeForm>,
) -> Result<Response, UiError> {
    if !form.is_complete() {
        let message = ValidationError::NameAndImageRequired.to_string();
        let page = RecipeFormPage::edit_recipe(&id, form, message);
        return Ok((StatusCode::BAD_REQUEST, Html(page.render()?)).into_response());
    }

    state
        .browser
        .recipes()
        .update_recipe(&id, form.into_update_request())
        .await
        .map_err(not_found_as_page)?;

    Ok(Redirect::to("/").into_response())
}

/// GET /recipes/:id/delete asks for confirmation before anything is removed
#[instrument(skip(state))]
pub async fn delete_recipe_page(
    State(state): State<RecipeUiState>,
    Path(id): Path<String>,
) -> Result<Html<String>, UiError> {
    let recipe = state
        .browser
        .recipes()
        .get_recipe(&id)
        .await
        .map_err(not_found_as_page)?;

    Ok(Html(DeleteRecipePage { recipe }.render()?))
}

/// POST /recipes/:id/delete
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<RecipeUiState>,
    Path(id): Path<String>,
) -> Result<Redirect, UiError> {
    state.browser.recipes().delete_recipe(&id).await?;
    Ok(Redirect::to("/"))
}

/// POST /recipes/save bookmarks an online result
#[instrument(skip(state, form))]
pub async fn save_online_recipe(
    State(state): State<RecipeUiState>,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect, UiError> {
    match state.browser.save_online(form.into_create_request()).await {
        Ok(_) => Ok(Redirect::to("/?tab=my-recipes&notice=saved")),
        Err(ServiceError::ValidationError { message }) => {
            warn!(%message, "Online recipe could not be saved");
            Ok(Redirect::to("/?tab=my-recipes"))
        }
        Err(err) => Err(err.into()),
    }
}
