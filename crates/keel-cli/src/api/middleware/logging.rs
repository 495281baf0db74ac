//! Request logging middleware

use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request logging middleware
pub struct RequestLogger;

impl RequestLogger {
    /// Log incoming requests and responses
    pub async fn log(req: Request<Body>, next: Next) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = uuid::Uuid::new_v4().to_string();
        let start = Instant::now();

        debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "Incoming request"
        );

        let response = next.run(req).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        if status.is_success() {
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms,
                "Request completed"
            );
        } else {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms,
                "Request failed"
            );
        }

        response
    }
}
