use std::sync::Arc;

use axum::Router;
use reqwest::{redirect::Policy, Client};
use serde_json::Value;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use recipeshop_rs::{
    config::ServerConfig,
    create_recipe_app, create_shop_app,
    repositories::{
        InMemoryCartRepository, InMemoryRecipeRepository, InMemoryUserRepository,
        StaticProductRepository,
    },
    services::{PlaintextCredentials, RecipeService, ShopService, TheMealDbClient},
    Metrics,
};

/// Both services on ephemeral ports, with the online search pointed at a mock server
pub struct TestEnvironment {
    pub client: Client,
    pub recipe_url: String,
    pub shop_url: String,
    pub meal_server: MockServer,
}

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        recipe_port: 5000,
        shop_port: 5001,
        max_request_size: 1024 * 1024,
    }
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Failed to serve app");
    });

    format!("http://{}", addr)
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let meal_server = MockServer::start().await;
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let server = server_config();

        let recipe_service = Arc::new(RecipeService::new(Arc::new(
            InMemoryRecipeRepository::seeded(),
        )));
        let meal_search = Arc::new(
            TheMealDbClient::new(&meal_server.uri())
                .expect("Failed to build meal search client"),
        );
        let shop_service = Arc::new(ShopService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCartRepository::new()),
            Arc::new(StaticProductRepository::seeded()),
            Arc::new(PlaintextCredentials),
        ));

        let recipe_url = spawn(create_recipe_app(
            metrics.clone(),
            recipe_service,
            meal_search,
            &server,
        ))
        .await;
        let shop_url = spawn(create_shop_app(metrics, shop_service, &server)).await;

        // Redirects are asserted on, not followed
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            client,
            recipe_url,
            shop_url,
            meal_server,
        }
    }

    pub fn recipe(&self, path: &str) -> String {
        format!("{}{}", self.recipe_url, path)
    }

    pub fn shop(&self, path: &str) -> String {
        format!("{}{}", self.shop_url, path)
    }

    /// Answer `search.php?s=<query>` with the given body
    pub async fn mock_meal_search(&self, query: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/search.php"))
            .and(query_param("s", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.meal_server)
            .await;
    }

    pub async fn get_json(&self, url: String) -> (u16, Value) {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Response was not JSON");
        (status, body)
    }

    pub async fn get_text(&self, url: String) -> (u16, String) {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        let body = response.text().await.expect("Failed to read body");
        (status, body)
    }
}
