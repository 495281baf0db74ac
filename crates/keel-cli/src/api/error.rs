//! API error handling

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keel_core::KeelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing or wrong shared secret
    Unauthorized(String),
    /// Forbidden
    Forbidden(String),
    /// Bad request
    BadRequest(String),
    /// Resource or endpoint not found
    NotFound(String),
    /// Known path, unsupported verb
    MethodNotAllowed(String),
    /// Request body over the configured limit
    PayloadTooLarge(String),
    /// Unprocessable entity
    UnprocessableEntity(String),
    /// Internal server error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnprocessableEntity(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn missing_field(name: &str) -> Self {
        ApiError::BadRequest(format!("Missing required field: {}", name))
    }

    pub fn missing_param(name: &str) -> Self {
        ApiError::BadRequest(format!("Missing required parameter: {}", name))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ApiError {}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed with internal error");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<KeelError> for ApiError {
    fn from(err: KeelError) -> Self {
        let message = err.to_string();
        match err {
            KeelError::ProjectNotFound(_) | KeelError::FileNotFound { .. } => {
                ApiError::NotFound(message)
            }
            KeelError::InvalidPath(_) | KeelError::InvalidInput(_) => ApiError::BadRequest(message),
            KeelError::NoBuildSystemDetected(_) => ApiError::UnprocessableEntity(message),
            KeelError::ExecutionDisabled => ApiError::Forbidden(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
