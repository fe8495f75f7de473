use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::models::{
    AddToCartRequest, CartItem, CredentialsRequest, Product, ServiceError, ShopResponse,
    INVALID_BODY_MESSAGE,
};
use crate::observability::BusinessTracingMiddleware;
use crate::services::ShopService;

const SHOP_PAGE: &str = include_str!("../../assets/shop.html");

/// State shared by the shop handlers
#[derive(Clone)]
pub struct ShopState {
    pub shop_service: Arc<ShopService>,
    pub business_tracing: Arc<BusinessTracingMiddleware>,
}

/// GET / serves the single-page shop
pub async fn shop_page() -> Html<&'static str> {
    Html(SHOP_PAGE)
}

/// POST /register
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<ShopState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<ShopResponse>, Response> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(invalid_body(rejection)),
    };

    state
        .business_tracing
        .trace_shop_operation("register", state.shop_service.register(request))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// POST /login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<ShopState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<ShopResponse>, Response> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(invalid_body(rejection)),
    };

    state
        .business_tracing
        .trace_shop_operation("login", state.shop_service.login(request))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// GET /products
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<ShopState>,
) -> Result<Json<Vec<Product>>, Response> {
    state
        .business_tracing
        .trace_shop_operation("list_products", state.shop_service.list_products())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// POST /cart/add
#[instrument(skip(state, payload))]
pub async fn add_to_cart(
    State(state): State<ShopState>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<ShopResponse>, Response> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(invalid_body(rejection)),
    };

    state
        .business_tracing
        .trace_shop_operation("add_to_cart", state.shop_service.add_to_cart(request))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// GET /cart
#[instrument(skip(state))]
pub async fn list_cart(State(state): State<ShopState>) -> Result<Json<Vec<CartItem>>, Response> {
    state
        .business_tracing
        .trace_shop_operation("list_cart", state.shop_service.list_cart())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// DELETE /cart
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<ShopState>) -> Result<Json<ShopResponse>, Response> {
    state
        .business_tracing
        .trace_shop_operation("clear_cart", state.shop_service.clear_cart())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// Bodies that don't parse still get a 200 with `success: false`
fn invalid_body(rejection: JsonRejection) -> Json<ShopResponse> {
    warn!(error = %rejection.body_text(), "Rejected shop request body");
    Json(ShopResponse::failed(INVALID_BODY_MESSAGE))
}

fn service_error_to_response(err: ServiceError) -> Response {
    error!(error = %err, "Shop operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ShopResponse::failed("Internal server error")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_page_has_every_section() {
        for section in ["home", "login", "register", "catalogue", "cart"] {
            assert!(
                SHOP_PAGE.contains(&format!("id=\"{}\"", section)),
                "missing section {}",
                section
            );
        }
    }

    #[tokio::test]
    async fn test_service_error_is_still_a_shop_body() {
        let response =
            service_error_to_response(crate::models::RepositoryError::NotFound.into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }
}
