//! `/api/exec`: run an arbitrary shell command

use crate::api::{
    error::{ApiError, ApiResult},
    extract::{JsonBody, non_blank, required_field},
    types::ExecRequest,
};
use axum::{Json, Router, extract::State, routing::post};
use keel_core::{ExecutionResult, KeelError};
use keel_exec::CommandRunner;
use keel_vfs::ProjectRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Context for exec routes
#[derive(Clone)]
pub struct ExecContext {
    pub registry: ProjectRegistry,
    pub runner: Arc<dyn CommandRunner>,
    /// Mirrors `exec.enabled`
    pub enabled: bool,
    /// Used when the request names no project
    pub default_working_dir: PathBuf,
}

pub fn exec_routes(context: ExecContext) -> Router {
    Router::new()
        .route(
            "/api/exec",
            post(exec_command).fallback(super::method_not_allowed),
        )
        .with_state(context)
}

/// POST /api/exec with `{project?, command}`
async fn exec_command(
    State(context): State<ExecContext>,
    body: Result<JsonBody<ExecRequest>, ApiError>,
) -> ApiResult<Json<ExecutionResult>> {
    if !context.enabled {
        return Err(ApiError::from(KeelError::ExecutionDisabled));
    }

    let JsonBody(request) = body?;
    let command = required_field(request.command, "command")?;

    let working_dir = match non_blank(request.project) {
        Some(project) => context.registry.resolve(&project).await?,
        None => context.default_working_dir.clone(),
    };

    let result = context.runner.run(&command, &working_dir).await?;
    info!(
        working_dir = %working_dir.display(),
        exit_code = result.exit_code,
        duration_ms = result.duration_ms,
        "Executed command"
    );

    Ok(Json(result))
}
