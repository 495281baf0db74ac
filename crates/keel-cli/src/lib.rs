//! keel server library: HTTP API, logging setup and shutdown handling.

pub mod api;
pub mod logging;
pub mod shutdown;

pub use api::ApiServer;
