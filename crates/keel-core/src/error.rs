//! Error types shared by every keel crate.

use std::path::PathBuf;

/// Result type alias for keel operations.
pub type Result<T> = std::result::Result<T, KeelError>;

/// Main error type for the keel system.
#[derive(Debug, thiserror::Error)]
pub enum KeelError {
    /// No project is registered under the given name
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// No file record exists for the (project, path) key
    #[error("File not found: {path} in project {project}")]
    FileNotFound { project: String, path: String },

    /// A filesystem path is missing, not a directory, or not usable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// None of the known build markers exist in the project directory
    #[error("No build system detected in {}", .0.display())]
    NoBuildSystemDetected(PathBuf),

    /// The shell itself could not be started
    #[error("Failed to spawn process: {0}")]
    ProcessSpawn(String),

    /// Exec and build endpoints are switched off in configuration
    #[error("Command execution is disabled")]
    ExecutionDisabled,

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Wrapped anyhow errors for compatibility
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeelError {
    /// Create a new project-not-found error
    pub fn project_not_found(name: impl Into<String>) -> Self {
        Self::ProjectNotFound(name.into())
    }

    /// Create a new file-not-found error
    pub fn file_not_found(project: impl Into<String>, path: impl Into<String>) -> Self {
        Self::FileNotFound {
            project: project.into(),
            path: path.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new process spawn error
    pub fn process_spawn(msg: impl Into<String>) -> Self {
        Self::ProcessSpawn(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is a not found error (project or file)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound(_) | Self::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        assert!(KeelError::project_not_found("web").is_not_found());
        assert!(KeelError::file_not_found("web", "src/a.ts").is_not_found());
        assert!(!KeelError::storage("locked").is_not_found());
    }

    #[test]
    fn test_messages() {
        let err = KeelError::file_not_found("web", "src/a.ts");
        assert_eq!(err.to_string(), "File not found: src/a.ts in project web");

        let err = KeelError::NoBuildSystemDetected(PathBuf::from("/srv/web"));
        assert_eq!(err.to_string(), "No build system detected in /srv/web");

        assert_eq!(
            KeelError::ExecutionDisabled.to_string(),
            "Command execution is disabled"
        );
    }
}
