//! Project registry: name -> base directory bindings.

use keel_core::{KeelError, Project, Result};
use keel_store::ProjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves project names to canonical directories.
#[derive(Clone)]
pub struct ProjectRegistry {
    store: Arc<dyn ProjectStore>,
}

impl ProjectRegistry {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Bind `name` to the directory at `path`, replacing any earlier binding.
    ///
    /// The directory must exist; it is stored in canonical absolute form.
    pub async fn register(&self, name: &str, path: &Path) -> Result<Project> {
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(KeelError::invalid_path(format!(
                "{} is not an existing directory",
                path.display()
            )));
        }

        let canonical = tokio::fs::canonicalize(path).await.map_err(|e| {
            KeelError::invalid_path(format!("Cannot resolve {}: {}", path.display(), e))
        })?;

        let project = self.store.upsert_project(name, &canonical).await?;
        info!(
            project = %project.name,
            base_path = %project.base_path.display(),
            "Project registered"
        );
        Ok(project)
    }

    /// Full record for `name`.
    pub async fn project(&self, name: &str) -> Result<Project> {
        self.store
            .get_project(name)
            .await?
            .ok_or_else(|| KeelError::project_not_found(name))
    }

    /// Base directory for `name`.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        let project = self.project(name).await?;
        debug!(project = %name, base_path = %project.base_path.display(), "Resolved project");
        Ok(project.base_path)
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.store.list_projects().await
    }
}
