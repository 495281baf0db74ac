//! `/api/build`: detect and run a project's build

use crate::api::{
    error::{ApiError, ApiResult},
    extract::required_param,
    types::ProjectQuery,
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::any,
};
use keel_core::{ExecutionResult, KeelError};
use keel_exec::BuildDetector;
use keel_vfs::ProjectRegistry;
use tracing::info;

/// Context for build routes
#[derive(Clone)]
pub struct BuildContext {
    pub registry: ProjectRegistry,
    pub detector: BuildDetector,
    /// Mirrors `exec.enabled`
    pub enabled: bool,
}

pub fn build_routes(context: BuildContext) -> Router {
    Router::new()
        .route("/api/build", any(build_project))
        .with_state(context)
}

/// ANY /api/build?project=
async fn build_project(
    State(context): State<BuildContext>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> ApiResult<Json<ExecutionResult>> {
    if !context.enabled {
        return Err(ApiError::from(KeelError::ExecutionDisabled));
    }

    let Query(query) = query?;
    let project = required_param(query.project, "project")?;
    let base_path = context.registry.resolve(&project).await?;

    let result = context.detector.build(&base_path).await?;
    info!(
        project = %project,
        exit_code = result.exit_code,
        duration_ms = result.duration_ms,
        "Build finished"
    );

    Ok(Json(result))
}
