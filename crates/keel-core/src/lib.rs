//! Core types, errors and configuration for keel.
//!
//! keel keeps source files for named projects in a record store and
//! materializes them into real directories on demand. This crate holds the
//! pieces every other keel crate agrees on.

pub mod config;
pub mod error;
pub mod types;

pub use config::{KeelConfig, LogFormat};
pub use error::{KeelError, Result};
pub use types::{ExecutionResult, FileEntry, FileRecord, Project, SyncReport};
