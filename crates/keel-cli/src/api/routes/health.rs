//! Liveness probe

use crate::api::types::HealthResponse;
use axum::{Json, Router, routing::get};

/// `/health` is the only route reachable without the API key.
pub fn health_routes() -> Router {
    Router::new().route(
        "/health",
        get(health_check).fallback(super::method_not_allowed),
    )
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        time: chrono::Utc::now().timestamp(),
    })
}
