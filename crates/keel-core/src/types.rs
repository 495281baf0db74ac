//! Domain types shared between the store, the virtual file layer and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named binding between a logical identifier and a real directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Canonical absolute directory the project materializes into
    pub base_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// A stored (project, path) -> content entry.
///
/// The record is the source of truth; files written by a sync are a
/// disposable projection of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub project: String,
    pub path: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Size of the content in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Row yielded while scanning all records of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

/// Outcome of one shell invocation.
///
/// A non-zero exit code is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Combined stdout and stderr
    pub stdout: String,
    /// Always empty: stderr is merged into `stdout`
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn new(output: String, exit_code: i32, duration_ms: u64) -> Self {
        Self {
            success: exit_code == 0,
            stdout: output,
            stderr: String::new(),
            exit_code,
            duration_ms,
        }
    }
}

/// Report produced by synchronizing a project to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Relative paths written successfully
    pub synced: Vec<String>,
    /// One message per record that could not be written
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn count(&self) -> usize {
        self.synced.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_result_success_follows_exit_code() {
        let ok = ExecutionResult::new("done".to_string(), 0, 12);
        assert!(ok.success);
        assert!(ok.stderr.is_empty());

        let failed = ExecutionResult::new(String::new(), 7, 3);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 7);
    }

    #[test]
    fn test_sync_report_count() {
        let report = SyncReport {
            synced: vec!["a.txt".to_string(), "b/c.txt".to_string()],
            errors: vec!["Failed to write: d.txt".to_string()],
        };
        assert_eq!(report.count(), 2);
        assert_eq!(SyncReport::default().count(), 0);
    }

    #[test]
    fn test_file_record_size_is_bytes() {
        let record = FileRecord {
            project: "p".to_string(),
            path: "x".to_string(),
            content: "héllo".to_string(),
            updated_at: Utc::now(),
        };
        assert_eq!(record.size(), 6);
    }
}
