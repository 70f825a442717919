//! Health Check Endpoints
//!
//! - /health - process is up
//! - /ready - storage backend answers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bson::doc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::repository::StoreBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
}

#[derive(Clone)]
pub struct HealthState {
    pub backend: StoreBackend,
    pub version: Option<String>,
}

async fn check_storage(backend: &StoreBackend) -> HealthCheck {
    let start = std::time::Instant::now();
    let (name, outcome) = match backend {
        StoreBackend::Mongo(db) => (
            "mongodb",
            db.run_command(doc! { "ping": 1 }).await.map(|_| ()).map_err(|e| e.to_string()),
        ),
        StoreBackend::Memory(_) => ("memory", Ok(())),
    };

    HealthCheck {
        name: name.to_string(),
        status: if outcome.is_ok() { HealthStatus::Up } else { HealthStatus::Down },
        message: outcome.err().map(|e| format!("Connection failed: {}", e)),
        duration_ms: Some(start.elapsed().as_millis() as u64),
    }
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Up,
        timestamp: Utc::now(),
        version: state.version,
        checks: Vec::new(),
    })
}

async fn ready(State(state): State<HealthState>) -> Response {
    let check = check_storage(&state.backend).await;
    let status = check.status;
    let body = HealthResponse {
        status,
        timestamp: Utc::now(),
        version: state.version,
        checks: vec![check],
    };

    let code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(body)).into_response()
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::memory_store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_memory_backend_is_ready() {
        let router = health_router(HealthState {
            backend: StoreBackend::Memory(InMemoryStore::new()),
            version: Some("test".into()),
        });
        let response = router
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
