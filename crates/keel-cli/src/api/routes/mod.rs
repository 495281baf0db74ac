//! API route definitions

pub mod build;
pub mod exec;
pub mod files;
pub mod health;
pub mod projects;
pub mod sync;

pub use build::{BuildContext, build_routes};
pub use exec::{ExecContext, exec_routes};
pub use files::{FileContext, file_routes};
pub use health::health_routes;
pub use projects::{ProjectContext, project_routes};
pub use sync::{SyncContext, sync_routes};

use super::error::ApiError;
use axum::http::Uri;

/// Fallback for known paths hit with an unsupported verb
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}

/// Router-wide fallback
pub async fn endpoint_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Endpoint not found: {}", uri.path()))
}
