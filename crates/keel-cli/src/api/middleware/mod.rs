//! API middleware

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{API_KEY_HEADER, AuthMiddleware, AuthState};
pub use cors::cors_layer;
pub use logging::RequestLogger;
