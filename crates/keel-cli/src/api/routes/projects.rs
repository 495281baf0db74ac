//! `/api/projects`: project registration

use crate::api::{
    error::ApiResult,
    extract::{JsonBody, required_field},
    types::{ProjectListResponse, ProjectRegisteredResponse, ProjectSummary, RegisterProjectRequest},
};
use axum::{Json, Router, extract::State, routing::get};
use keel_vfs::ProjectRegistry;
use std::path::Path;

/// Context for project routes
#[derive(Clone)]
pub struct ProjectContext {
    pub registry: ProjectRegistry,
}

pub fn project_routes(context: ProjectContext) -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(list_projects)
                .post(register_project)
                .fallback(super::method_not_allowed),
        )
        .with_state(context)
}

/// GET /api/projects
async fn list_projects(
    State(context): State<ProjectContext>,
) -> ApiResult<Json<ProjectListResponse>> {
    let projects = context
        .registry
        .list()
        .await?
        .into_iter()
        .map(ProjectSummary::from)
        .collect();

    Ok(Json(ProjectListResponse { projects }))
}

/// POST /api/projects with `{name, path}`
async fn register_project(
    State(context): State<ProjectContext>,
    JsonBody(request): JsonBody<RegisterProjectRequest>,
) -> ApiResult<Json<ProjectRegisteredResponse>> {
    let name = required_field(request.name, "name")?;
    let path = required_field(request.path, "path")?;

    let project = context.registry.register(&name, Path::new(&path)).await?;
    let summary = ProjectSummary::from(project);

    Ok(Json(ProjectRegisteredResponse {
        success: true,
        message: "Project registered".to_string(),
        name: summary.name,
        base_path: summary.base_path,
    }))
}
