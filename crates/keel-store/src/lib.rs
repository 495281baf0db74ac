//! Durable record store for keel.
//!
//! Two tables back the whole system: project bindings keyed by name and
//! file records keyed by `(project, path)`. Higher layers only see the
//! [`ProjectStore`] and [`FileStore`] traits; [`SqliteStore`] is the one
//! implementation.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::{FileStore, ProjectStore};
