use async_trait::async_trait;
use futures::stream::BoxStream;
use keel_core::{FileEntry, FileRecord, Project, Result};
use std::path::Path;

/// Persistence for project name -> base directory bindings.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert or replace the binding for `name`.
    ///
    /// Replacing keeps the original `created_at`.
    async fn upsert_project(&self, name: &str, base_path: &Path) -> Result<Project>;

    async fn get_project(&self, name: &str) -> Result<Option<Project>>;

    /// Snapshot of every registered project, ordered by name.
    async fn list_projects(&self) -> Result<Vec<Project>>;
}

/// Persistence for `(project, path) -> content` records.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn get_file(&self, project: &str, path: &str) -> Result<Option<FileRecord>>;

    /// Insert or overwrite a record, stamping the current time.
    async fn put_file(&self, project: &str, path: &str, content: &str) -> Result<FileRecord>;

    /// Remove a record. Returns whether a record existed.
    async fn delete_file(&self, project: &str, path: &str) -> Result<bool>;

    /// Single pass over every record of `project`.
    ///
    /// Order is unspecified.
    fn scan_project<'a>(&'a self, project: &'a str) -> BoxStream<'a, Result<FileEntry>>;
}
