//! Client for the public online recipe search.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{MealRecord, MealSearchResponse};

/// Default public search endpoint
pub const THE_MEAL_DB_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

#[derive(Debug, Error)]
pub enum MealSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Name search against an external recipe catalogue
#[async_trait]
pub trait MealSearch: Send + Sync {
    /// Every record whose name matches `query`. No match is an empty list.
    async fn search(&self, query: &str) -> Result<Vec<MealRecord>, MealSearchError>;
}

/// reqwest-backed client for TheMealDB's `search.php?s=` endpoint
#[derive(Debug, Clone)]
pub struct TheMealDbClient {
    client: reqwest::Client,
    search_url: String,
}

impl TheMealDbClient {
    pub fn new(base_url: &str) -> Result<Self, MealSearchError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(MealSearchError::InvalidEndpoint(
                "base URL must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search.php", base_url),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl MealSearch for TheMealDbClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<MealRecord>, MealSearchError> {
        let response: MealSearchResponse = self
            .client
            .get(&self.search_url)
            .query(&[("s", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let records = response.into_records();
        debug!(results = records.len(), "Online search returned");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TheMealDbClient {
        TheMealDbClient::new(&server.uri()).unwrap()
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        assert!(matches!(
            TheMealDbClient::new(""),
            Err(MealSearchError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TheMealDbClient::new("http://meals.test/api/").unwrap();
        assert_eq!(client.search_url(), "http://meals.test/api/search.php");
    }

    #[tokio::test]
    async fn test_search_sends_query_and_parses_meals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.php"))
            .and(query_param("s", "pasta bake"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meals": [{
                    "idMeal": "52771",
                    "strMeal": "Spicy Arrabiata Penne",
                    "strMealThumb": "https://img.test/penne.jpg",
                    "strInstructions": "Boil pasta."
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).search("pasta bake").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Spicy Arrabiata Penne");
    }

    #[tokio::test]
    async fn test_null_meals_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meals": null })))
            .mount(&server)
            .await;

        let records = client_for(&server).search("zzzz").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server).search("pasta").await,
            Err(MealSearchError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(client_for(&server).search("pasta").await.is_err());
    }
}
