use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handlers::{
    health_check, metrics_handler, recipe_ui, recipes, security_headers_middleware, shop,
    RecipeApiState, RecipeUiState, ShopState,
};
use crate::observability::{observability_middleware, BusinessTracingMiddleware, Metrics};
use crate::services::{MealSearch, RecipeBrowser, RecipeService, ShopService};

/// Recipe JSON API, recipe pages and operational endpoints
pub fn create_recipe_app(
    metrics: Arc<Metrics>,
    recipe_service: Arc<RecipeService>,
    meal_search: Arc<dyn MealSearch>,
    server: &ServerConfig,
) -> Router {
    let business_tracing = Arc::new(BusinessTracingMiddleware::new(metrics.clone()));
    let metrics_for_middleware = metrics.clone();

    let api_state = RecipeApiState {
        recipe_service: recipe_service.clone(),
        business_tracing: business_tracing.clone(),
    };

    let ui_state = RecipeUiState {
        browser: Arc::new(RecipeBrowser::new(
            recipe_service,
            meal_search,
            business_tracing,
        )),
    };

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        // JSON API
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/:id",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .with_state(api_state)
        // Server-rendered pages
        .route("/", get(recipe_ui::recipes_page))
        .route(
            "/recipes/new",
            get(recipe_ui::new_recipe_page).post(recipe_ui::create_recipe),
        )
        .route("/recipes/save", post(recipe_ui::save_online_recipe))
        .route(
            "/recipes/:id/edit",
            get(recipe_ui::edit_recipe_page).post(recipe_ui::update_recipe),
        )
        .route(
            "/recipes/:id/delete",
            get(recipe_ui::delete_recipe_page).post(recipe_ui::delete_recipe),
        )
        .with_state(ui_state)
        .layer(DefaultBodyLimit::max(body_limit(server)))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Shop API, the shop page and operational endpoints.
///
/// Every shop reply, including one for a bad body, is a 200 with a
/// `success` flag.
pub fn create_shop_app(
    metrics: Arc<Metrics>,
    shop_service: Arc<ShopService>,
    server: &ServerConfig,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    let shop_state = ShopState {
        shop_service,
        business_tracing: Arc::new(BusinessTracingMiddleware::new(metrics.clone())),
    };

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .route("/", get(shop::shop_page))
        .route("/register", post(shop::register))
        .route("/login", post(shop::login))
        .route("/products", get(shop::list_products))
        .route("/cart/add", post(shop::add_to_cart))
        .route("/cart", get(shop::list_cart).delete(shop::clear_cart))
        .with_state(shop_state)
        .layer(DefaultBodyLimit::max(body_limit(server)))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

fn body_limit(server: &ServerConfig) -> usize {
    usize::try_from(server.max_request_size).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealRecord, Product};
    use crate::repositories::{
        InMemoryCartRepository, InMemoryRecipeRepository, InMemoryUserRepository,
        StaticProductRepository,
    };
    use crate::services::{MealSearchError, PlaintextCredentials};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct NoMeals;

    #[async_trait]
    impl MealSearch for NoMeals {
        async fn search(&self, _query: &str) -> Result<Vec<MealRecord>, MealSearchError> {
            Ok(Vec::new())
        }
    }

    fn server_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            recipe_port: 5000,
            shop_port: 5001,
            max_request_size: 1024,
        }
    }

    fn recipe_app() -> Router {
        create_recipe_app(
            Arc::new(Metrics::new().unwrap()),
            Arc::new(RecipeService::new(Arc::new(
                InMemoryRecipeRepository::seeded(),
            ))),
            Arc::new(NoMeals),
            &server_config(),
        )
    }

    fn shop_app() -> Router {
        create_shop_app(
            Arc::new(Metrics::new().unwrap()),
            Arc::new(ShopService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryCartRepository::new()),
                Arc::new(StaticProductRepository::seeded()),
                Arc::new(PlaintextCredentials),
            )),
            &server_config(),
        )
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_list_seeded_recipes() {
        let response = recipe_app().oneshot(get("/api/recipes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["name"], "Spaghetti Carbonara");
    }

    #[tokio::test]
    async fn test_create_recipe_returns_created() {
        let response = recipe_app()
            .oneshot(json_request(
                Method::POST,
                "/api/recipes",
                json!({ "name": "Tea", "image": "http://x/y.png" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["id"], 3);
        assert_eq!(json["instructions"], "");
    }

    #[tokio::test]
    async fn test_create_recipe_without_image_is_rejected() {
        let response = recipe_app()
            .oneshot(json_request(
                Method::POST,
                "/api/recipes",
                json!({ "name": "Tea" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Name and Image are required"
        );
    }

    #[tokio::test]
    async fn test_malformed_recipe_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/recipes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = recipe_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        for uri in ["/api/recipes/99", "/api/recipes/abc"] {
            let response = recipe_app().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_json(response).await["message"], "Recipe not found");
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_recipe_succeeds() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/recipes/42")
            .body(Body::empty())
            .unwrap();

        let response = recipe_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Recipe deleted successfully"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/recipes")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = recipe_app().oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_oversized_recipe_body_is_bad_request() {
        let response = recipe_app()
            .oneshot(json_request(
                Method::POST,
                "/api/recipes",
                json!({ "name": "x".repeat(2048), "image": "http://x/y.png" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_json_bodies_are_read_as_empty() {
        for content_type in [
            None,
            Some("text/plain"),
            Some("application/x-www-form-urlencoded"),
        ] {
            let mut create = Request::builder().method(Method::POST).uri("/api/recipes");
            let mut update = Request::builder().method(Method::PUT).uri("/api/recipes/1");
            if let Some(content_type) = content_type {
                create = create.header(header::CONTENT_TYPE, content_type);
                update = update.header(header::CONTENT_TYPE, content_type);
            }
            let app = recipe_app();

            let response = app
                .clone()
                .oneshot(create.body(Body::from("name=Tea&image=x")).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await["message"],
                "Name and Image are required"
            );

            let response = app
                .oneshot(update.body(Body::from("name=Tea")).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["name"], "Spaghetti Carbonara");
        }
    }

    #[tokio::test]
    async fn test_recipe_page_lists_local_recipes() {
        let response = recipe_app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Spaghetti Carbonara"));
        assert!(html.contains("Chicken Curry"));
    }

    #[tokio::test]
    async fn test_both_apps_expose_health_and_metrics() {
        for app in [recipe_app(), shop_app()] {
            let response = app.clone().oneshot(get("/health/status")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let response = app.oneshot(get("/metrics")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_shop_products() {
        let response = shop_app().oneshot(get("/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let products: Vec<Product> = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(products, Product::catalogue());
    }

    #[tokio::test]
    async fn test_shop_bad_body_is_still_ok() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("nope"))
            .unwrap();

        let response = shop_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_shop_page_is_html() {
        let response = shop_app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(body_text(response).await.contains("Your Cart"));
    }
}
