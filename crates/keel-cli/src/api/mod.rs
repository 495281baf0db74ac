//! HTTP API for keel
//!
//! Every route except `GET /health` requires the `X-API-Key` header. Errors
//! are rendered as `{"error": "<message>"}` with a non-2xx status.

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
