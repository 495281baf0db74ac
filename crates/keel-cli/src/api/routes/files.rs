//! `/api/file`: virtual file records

use crate::api::{
    error::{ApiError, ApiResult},
    extract::{JsonBody, required_param},
    types::{FileContentResponse, FileQuery, FileStoredResponse, MessageResponse, PutFileRequest},
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use keel_vfs::VirtualFileStore;
use tracing::info;

/// Context for file routes
#[derive(Clone)]
pub struct FileContext {
    pub files: VirtualFileStore,
}

/// Create file routes
pub fn file_routes(context: FileContext) -> Router {
    Router::new()
        .route(
            "/api/file",
            get(get_file)
                .put(put_file)
                .delete(delete_file)
                .fallback(super::method_not_allowed),
        )
        .with_state(context)
}

fn key(query: Result<Query<FileQuery>, QueryRejection>) -> ApiResult<(String, String)> {
    let Query(query) = query?;
    let project = required_param(query.project, "project")?;
    let path = required_param(query.path, "path")?;
    Ok((project, path))
}

/// GET /api/file?project=&path=
async fn get_file(
    State(context): State<FileContext>,
    query: Result<Query<FileQuery>, QueryRejection>,
) -> ApiResult<Json<FileContentResponse>> {
    let (project, path) = key(query)?;
    let record = context.files.get(&project, &path).await?;

    Ok(Json(FileContentResponse {
        content: record.content,
    }))
}

/// PUT /api/file?project=&path= with `{content}`
async fn put_file(
    State(context): State<FileContext>,
    query: Result<Query<FileQuery>, QueryRejection>,
    JsonBody(request): JsonBody<PutFileRequest>,
) -> ApiResult<Json<FileStoredResponse>> {
    let (project, path) = key(query)?;
    // Empty content is a valid file
    let content = request
        .content
        .ok_or_else(|| ApiError::missing_field("content"))?;

    let size = context.files.put(&project, &path, &content).await?;
    info!(project = %project, path = %path, size, "Stored file");

    Ok(Json(FileStoredResponse {
        success: true,
        message: "File stored".to_string(),
        project,
        path,
        size,
    }))
}

/// DELETE /api/file?project=&path=
async fn delete_file(
    State(context): State<FileContext>,
    query: Result<Query<FileQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let (project, path) = key(query)?;
    context.files.delete(&project, &path).await?;

    Ok(Json(MessageResponse::ok("File deleted")))
}
