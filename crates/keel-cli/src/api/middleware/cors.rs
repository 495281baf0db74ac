//! CORS middleware

use super::auth::API_KEY_HEADER;
use axum::http::{HeaderName, Method, header::CONTENT_TYPE};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS; preflight requests are answered here, before authentication.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
        .max_age(Duration::from_secs(3600))
}
