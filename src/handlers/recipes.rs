use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::models::{
    CreateRecipeRequest, MessageResponse, Recipe, ServiceError, UpdateRecipeRequest,
};
use crate::observability::BusinessTracingMiddleware;
use crate::services::RecipeService;

pub const RECIPE_NOT_FOUND_MESSAGE: &str = "Recipe not found";
pub const RECIPE_DELETED_MESSAGE: &str = "Recipe deleted successfully";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// State shared by the recipe JSON API handlers
#[derive(Clone)]
pub struct RecipeApiState {
    pub recipe_service: Arc<RecipeService>,
    pub business_tracing: Arc<BusinessTracingMiddleware>,
}

/// GET /api/recipes
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<RecipeApiState>,
) -> Result<Json<Vec<Recipe>>, Response> {
    state
        .business_tracing
        .trace_recipe_operation("list", state.recipe_service.list_recipes())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// GET /api/recipes/:id
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<RecipeApiState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, Response> {
    state
        .business_tracing
        .trace_recipe_operation("get", state.recipe_service.get_recipe(&id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// POST /api/recipes
#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<RecipeApiState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), Response> {
    let request = json_or_empty(payload)?;

    let recipe = state
        .business_tracing
        .trace_recipe_operation("create", state.recipe_service.create_recipe(request))
        .await
        .map_err(service_error_to_response)?;

    info!(id = recipe.id, "Created recipe");
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/recipes/:id
#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<RecipeApiState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<Json<Recipe>, Response> {
    let request = json_or_empty(payload)?;

    state
        .business_tracing
        .trace_recipe_operation("update", state.recipe_service.update_recipe(&id, request))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// DELETE /api/recipes/:id. Succeeds whether or not the id existed.
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<RecipeApiState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, Response> {
    state
        .business_tracing
        .trace_recipe_operation("delete", state.recipe_service.delete_recipe(&id))
        .await
        .map_err(service_error_to_response)?;

    Ok(Json(MessageResponse::new(RECIPE_DELETED_MESSAGE)))
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(MessageResponse::new(text))).into_response()
}

/// Convert service errors to HTTP responses
fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::RecipeNotFound { .. } => {
            message(StatusCode::NOT_FOUND, RECIPE_NOT_FOUND_MESSAGE)
        }
        ServiceError::ValidationError { message: text } => {
            message(StatusCode::BAD_REQUEST, text)
        }
        ServiceError::Repository { source } => {
            error!(error = %source, "Recipe repository failure");
            message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

/// A body that is not declared as JSON is read as an empty object, so it
/// goes through the usual validation and patch rules.
fn json_or_empty<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(json_rejection_to_response(rejection)),
    }
}

fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    let text = rejection.body_text();
    warn!(error = %text, "Rejected recipe body");
    message(StatusCode::BAD_REQUEST, text)
}
