//! Liveness and readiness endpoints.
//!
//! - `GET /actuator/health` - `{"status":"UP"}` while the process is serving
//! - `GET /health` - `ok` while the process is serving
//! - `GET /health/ready` - 200 when the store answers, 503 otherwise

use async_trait::async_trait;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};

use crate::db::RepositoryError;

/// State that can report whether its backing store is reachable.
#[async_trait]
pub trait Readiness: Clone + Send + Sync + 'static {
    /// Probe the store.
    async fn ready(&self) -> Result<(), RepositoryError>;
}

/// Health routes for a service whose state implements [`Readiness`].
pub fn health_routes<S: Readiness>() -> Router<S> {
    Router::new()
        .route("/actuator/health", get(actuator_health))
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
}

async fn actuator_health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: Readiness>(State(state): State<S>) -> StatusCode {
    match state.ready().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    #[derive(Clone)]
    struct Probe(bool);

    #[async_trait]
    impl Readiness for Probe {
        async fn ready(&self) -> Result<(), RepositoryError> {
            if self.0 {
                Ok(())
            } else {
                Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
            }
        }
    }

    async fn get_status(state: Probe, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = health_routes()
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_actuator_health_reports_up() {
        let (status, body) = get_status(Probe(false), "/actuator/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "UP");
    }

    #[tokio::test]
    async fn test_liveness_ignores_store() {
        let (status, body) = get_status(Probe(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        assert_eq!(get_status(Probe(true), "/health/ready").await.0, StatusCode::OK);
        assert_eq!(
            get_status(Probe(false), "/health/ready").await.0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
