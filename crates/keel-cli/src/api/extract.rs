//! Request extractors and required-field validation.

use super::error::{ApiError, ApiResult};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

/// JSON body parsed from the raw bytes.
///
/// The `Content-Type` header is not checked and an empty body parses as
/// `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge("Request body too large".to_string())
            } else {
                ApiError::BadRequest(format!("Failed to read request body: {}", e))
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))
    }
}

/// Non-blank query parameter.
pub fn required_param(value: Option<String>, name: &str) -> ApiResult<String> {
    non_blank(value).ok_or_else(|| ApiError::missing_param(name))
}

/// Non-blank body field.
pub fn required_field(value: Option<String>, name: &str) -> ApiResult<String> {
    non_blank(value).ok_or_else(|| ApiError::missing_field(name))
}

/// Blank strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_missing() {
        assert!(required_param(Some("  ".to_string()), "project").is_err());
        assert!(required_param(None, "project").is_err());
        assert_eq!(
            required_field(Some("web".to_string()), "name").unwrap(),
            "web"
        );
    }
}
