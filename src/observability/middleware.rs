use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::{future::Future, sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn, Span};
use uuid::Uuid;

use super::Metrics;

/// Middleware for automatic request tracing and metrics collection
#[instrument(skip_all, fields(
    request_id = %Uuid::new_v4(),
    method = %request.method(),
    uri = %request.uri(),
    endpoint = tracing::field::Empty,
))]
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    // Group by route template where one matched, so ids don't explode label cardinality
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    Span::current().record("endpoint", endpoint.as_str());

    let in_flight = InFlightGuard::new(metrics.clone(), method.clone(), endpoint.clone());

    info!("Processing request");

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
    drop(in_flight);

    if status_code >= 500 {
        error!(
            status_code = status_code,
            duration_ms = duration.as_millis(),
            "Request completed with error"
        );
    } else if status_code >= 400 {
        warn!(
            status_code = status_code,
            duration_ms = duration.as_millis(),
            "Request rejected"
        );
    } else {
        info!(
            status_code = status_code,
            duration_ms = duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

/// Holds one slot of the in-flight gauge; released on drop, including when
/// the request future is abandoned before a response is produced.
struct InFlightGuard {
    metrics: Arc<Metrics>,
    method: String,
    endpoint: String,
}

impl InFlightGuard {
    fn new(metrics: Arc<Metrics>, method: String, endpoint: String) -> Self {
        metrics.increment_in_flight(&method, &endpoint);
        Self {
            metrics,
            method,
            endpoint,
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.metrics.decrement_in_flight(&self.method, &self.endpoint);
    }
}

/// Wraps business operations with a span, timing and outcome metrics
pub struct BusinessTracingMiddleware {
    metrics: Arc<Metrics>,
}

impl BusinessTracingMiddleware {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    /// Trace a recipe store operation
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn trace_recipe_operation<F, T, E>(&self, operation: &str, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();

        match future.await {
            Ok(result) => {
                self.metrics.record_recipe_operation(operation, true);
                info!(
                    duration_ms = start_time.elapsed().as_millis(),
                    "Recipe operation completed successfully"
                );
                Ok(result)
            }
            Err(error) => {
                self.metrics.record_recipe_operation(operation, false);
                warn!(
                    error = %error,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Recipe operation failed"
                );
                Err(error)
            }
        }
    }

    /// Trace a shop operation
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn trace_shop_operation<F, T, E>(&self, operation: &str, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();

        match future.await {
            Ok(result) => {
                self.metrics.record_shop_operation(operation, true);
                info!(
                    duration_ms = start_time.elapsed().as_millis(),
                    "Shop operation completed successfully"
                );
                Ok(result)
            }
            Err(error) => {
                self.metrics.record_shop_operation(operation, false);
                error!(
                    error = %error,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Shop operation failed"
                );
                Err(error)
            }
        }
    }

    /// Trace a call to the online recipe search
    #[instrument(skip_all, fields(query = %query))]
    pub async fn trace_meal_search<F, T, E>(&self, query: &str, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();

        info!("Starting online recipe search");

        match future.await {
            Ok(result) => {
                self.metrics.record_meal_search(true);
                info!(
                    duration_ms = start_time.elapsed().as_millis(),
                    "Online recipe search completed"
                );
                Ok(result)
            }
            Err(error) => {
                self.metrics.record_meal_search(false);
                error!(
                    error = %error,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Online recipe search failed"
                );
                Err(error)
            }
        }
    }
}
