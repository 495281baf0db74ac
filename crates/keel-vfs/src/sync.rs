//! One-way materialization of stored records onto a project directory.

use crate::files::VirtualFileStore;
use crate::path::ProjectPath;
use crate::registry::ProjectRegistry;
use futures::StreamExt;
use keel_core::{FileEntry, Result, SyncReport};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Writes every record of a project below its base directory.
///
/// Failures are per record: a directory that cannot be created or a file
/// that cannot be written lands in [`SyncReport::errors`] and the remaining
/// records are still processed. The disk is never read back.
#[derive(Clone)]
pub struct Synchronizer {
    registry: ProjectRegistry,
    files: VirtualFileStore,
}

impl Synchronizer {
    pub fn new(registry: ProjectRegistry, files: VirtualFileStore) -> Self {
        Self { registry, files }
    }

    pub async fn sync(&self, project: &str) -> Result<SyncReport> {
        let start = Instant::now();
        let base = self.registry.resolve(project).await?;
        info!(project, base_path = %base.display(), "Starting sync");

        let mut report = SyncReport::default();
        let mut entries = self.files.list_by_project(project);

        while let Some(entry) = entries.next().await {
            let entry = entry?;
            match materialize(&base, &entry).await {
                Ok(()) => report.synced.push(entry.path),
                Err(message) => {
                    warn!(project, "{}", message);
                    report.errors.push(message);
                }
            }
        }

        info!(
            project,
            count = report.count(),
            errors = report.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Sync completed"
        );
        Ok(report)
    }
}

async fn materialize(base: &Path, entry: &FileEntry) -> std::result::Result<(), String> {
    let relative = ProjectPath::parse(&entry.path)
        .map_err(|e| format!("Invalid path {}: {}", entry.path, e))?;
    let target = relative.to_physical(base);

    if let Some(dir) = target.parent() {
        let exists = tokio::fs::metadata(dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !exists {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                format!("Failed to create directory: {} ({})", dir.display(), e)
            })?;
        }
    }

    tokio::fs::write(&target, entry.content.as_bytes())
        .await
        .map_err(|e| format!("Failed to write: {} ({})", entry.path, e))
}
