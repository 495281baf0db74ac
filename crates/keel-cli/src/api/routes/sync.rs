//! `/api/sync`: materialize a project onto disk

use crate::api::{
    error::ApiResult,
    extract::required_param,
    types::{ProjectQuery, SyncResponse},
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::any,
};
use keel_vfs::Synchronizer;
use tracing::info;

/// Context for sync routes
#[derive(Clone)]
pub struct SyncContext {
    pub sync: Synchronizer,
}

pub fn sync_routes(context: SyncContext) -> Router {
    Router::new()
        .route("/api/sync", any(sync_project))
        .with_state(context)
}

/// ANY /api/sync?project=
///
/// Per-file failures are reported in `errors` with a 200 status.
async fn sync_project(
    State(context): State<SyncContext>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> ApiResult<Json<SyncResponse>> {
    let Query(query) = query?;
    let project = required_param(query.project, "project")?;

    let report = context.sync.sync(&project).await?;
    info!(
        project = %project,
        count = report.count(),
        errors = report.errors.len(),
        "Synchronized project"
    );

    Ok(Json(SyncResponse::from(report)))
}
