//! Virtual file store over `(project, path)` records.
//!
//! Records live only in the record store until a project is synchronized.
//! Nothing here requires the project to be registered.

use futures::stream::BoxStream;
use keel_core::{FileEntry, FileRecord, KeelError, Result};
use keel_store::FileStore;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct VirtualFileStore {
    store: Arc<dyn FileStore>,
}

impl VirtualFileStore {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, project: &str, path: &str) -> Result<FileRecord> {
        self.store
            .get_file(project, path)
            .await?
            .ok_or_else(|| KeelError::file_not_found(project, path))
    }

    /// Store `content`, returning its size in bytes.
    pub async fn put(&self, project: &str, path: &str, content: &str) -> Result<usize> {
        let record = self.store.put_file(project, path, content).await?;
        debug!(project, path, size = record.size(), "File stored");
        Ok(record.size())
    }

    /// Remove a record. Absent records are not an error.
    pub async fn delete(&self, project: &str, path: &str) -> Result<()> {
        let existed = self.store.delete_file(project, path).await?;
        debug!(project, path, existed, "File deleted");
        Ok(())
    }

    /// Lazy single pass over the project's records.
    pub fn list_by_project<'a>(&'a self, project: &'a str) -> BoxStream<'a, Result<FileEntry>> {
        self.store.scan_project(project)
    }
}
