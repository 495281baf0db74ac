//! Shared-secret authentication middleware

use crate::api::error::ApiError;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication middleware state
#[derive(Clone)]
pub struct AuthState {
    api_key: Arc<str>,
}

impl AuthState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
        }
    }

    fn matches(&self, supplied: &[u8]) -> bool {
        bool::from(self.api_key.as_bytes().ct_eq(supplied))
    }
}

/// Authentication middleware
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Reject every request without the right `X-API-Key`, except `GET /health`.
    pub async fn validate(State(state): State<AuthState>, req: Request, next: Next) -> Response {
        if is_public(&req) {
            return next.run(req).await;
        }

        let supplied = req
            .headers()
            .get(API_KEY_HEADER)
            .map(|value| value.as_bytes())
            .unwrap_or_default();

        if state.matches(supplied) {
            return next.run(req).await;
        }

        warn!(
            method = %req.method(),
            uri = %req.uri().path(),
            key_present = !supplied.is_empty(),
            "Rejected request with invalid API key"
        );
        ApiError::Unauthorized("Invalid API key".to_string()).into_response()
    }
}

fn is_public(req: &Request) -> bool {
    req.method() == Method::GET && req.uri().path() == "/health"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_comparison() {
        let state = AuthState::new("s3cret");
        assert!(state.matches(b"s3cret"));
        assert!(!state.matches(b"s3cre"));
        assert!(!state.matches(b"s3cret!"));
        assert!(!state.matches(b""));
    }
}
