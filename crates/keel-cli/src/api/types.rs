//! Request and response bodies.

use keel_core::{Project, SyncReport};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// Query string of `/api/file`
#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    pub project: Option<String>,
    pub path: Option<String>,
}

/// Query string of `/api/sync` and `/api/build`
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PutFileRequest {
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecRequest {
    pub project: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterProjectRequest {
    pub name: Option<String>,
    pub path: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct FileContentResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileStoredResponse {
    pub success: bool,
    pub message: String,
    pub project: String,
    pub path: String,
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub synced: Vec<String>,
    pub errors: Vec<String>,
    pub count: usize,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            success: true,
            count: report.count(),
            synced: report.synced,
            errors: report.errors,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub base_path: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            name: project.name,
            base_path: project.base_path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectRegisteredResponse {
    pub success: bool,
    pub message: String,
    pub name: String,
    pub base_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Unix seconds
    pub time: i64,
}
