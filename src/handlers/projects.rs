// src/handlers/projects.rs
//! Project endpoints - create, list, review, schedule, publish and media

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{ApiError, ApiJson};
use crate::media::DataUri;
use crate::models::{ProjectStatus, ProjectUpdate, VideoProject};
use crate::services::lifecycle::{self, ReviewEdits};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub fn project_routes() -> Router {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project).delete(clear_projects))
        .route(
            "/api/projects/:id",
            get(get_project).put(save_project).delete(delete_project),
        )
        .route("/api/projects/:id/schedule", post(schedule_project))
        .route("/api/projects/:id/publish", post(publish_project))
        .route("/api/projects/:id/resubmit", post(resubmit_project))
        .route("/api/projects/:id/thumbnail", get(project_thumbnail))
        .route("/api/projects/:id/captions", get(project_captions))
        .route("/api/projects/:id/scenes/:scene_number/image", get(scene_image))
}

async fn load(state: &AppState, id: &str) -> Result<VideoProject, ApiError> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::project_not_found(id))
}

async fn apply(state: &AppState, id: &str, update: ProjectUpdate) -> Result<Json<VideoProject>, ApiError> {
    let project = state
        .store
        .update(id, update)
        .await?
        .ok_or_else(|| ApiError::project_not_found(id))?;
    tracing::info!("📝 Project {} saved ({})", project.id, project.status);
    Ok(Json(project))
}

/// GET /api/projects?status= - List projects, newest first
pub async fn list_projects(
    Query(query): Query<ListQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<VideoProject>>, ApiError> {
    let status = query
        .status
        .map(|s| s.parse::<ProjectStatus>())
        .transpose()
        .map_err(ApiError::BadRequest)?;
    Ok(Json(state.store.list(status).await?))
}

/// POST /api/projects - Start generating a new project
pub async fn create_project(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<VideoProject>), ApiError> {
    let project = state.generation.start(&request.prompt).await?;
    Ok((StatusCode::ACCEPTED, Json(project)))
}

/// DELETE /api/projects - Remove every project
pub async fn clear_projects(Extension(state): Extension<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.store.clear().await?;
    Ok(Json(json!({ "removed": removed })))
}

/// GET /api/projects/:id
pub async fn get_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<VideoProject>, ApiError> {
    Ok(Json(load(&state, &id).await?))
}

/// PUT /api/projects/:id - Save review edits
pub async fn save_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(edits): ApiJson<ReviewEdits>,
) -> Result<Json<VideoProject>, ApiError> {
    let project = load(&state, &id).await?;
    let update = lifecycle::save_changes(&project, &edits)?;
    apply(&state, &id, update).await
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    if state.store.remove(&id).await? {
        tracing::info!("🗑️ Project {} deleted", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::project_not_found(&id))
    }
}

/// POST /api/projects/:id/schedule
pub async fn schedule_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(edits): ApiJson<ReviewEdits>,
) -> Result<Json<VideoProject>, ApiError> {
    let project = load(&state, &id).await?;
    let update = lifecycle::schedule(&project, &edits)?;
    apply(&state, &id, update).await
}

/// POST /api/projects/:id/publish
pub async fn publish_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(edits): ApiJson<ReviewEdits>,
) -> Result<Json<VideoProject>, ApiError> {
    let project = load(&state, &id).await?;
    let update = lifecycle::publish(&project, &edits, Utc::now())?;
    apply(&state, &id, update).await
}

/// POST /api/projects/:id/resubmit - Resubmit a failed project
pub async fn resubmit_project(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<(StatusCode, Json<VideoProject>), ApiError> {
    let project = state.generation.resubmit(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(project)))
}

fn image_response(data_uri: &str) -> Result<Response, ApiError> {
    let uri = DataUri::parse(data_uri).map_err(|e| {
        tracing::error!("Stored image is not a valid data URI: {}", e);
        ApiError::Internal("Stored image could not be decoded".to_string())
    })?;
    let bytes = uri.decode().map_err(|e| {
        tracing::error!("Stored image payload is invalid: {}", e);
        ApiError::Internal("Stored image could not be decoded".to_string())
    })?;
    Ok(([(header::CONTENT_TYPE, uri.mime_type)], bytes).into_response())
}

/// GET /api/projects/:id/thumbnail - Thumbnail as a binary image
pub async fn project_thumbnail(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let project = load(&state, &id).await?;
    let thumbnail = project
        .thumbnail_data_uri
        .ok_or_else(|| ApiError::NotFound("Project has no thumbnail".to_string()))?;
    image_response(&thumbnail)
}

/// GET /api/projects/:id/captions - Captions as an .srt download
pub async fn project_captions(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let project = load(&state, &id).await?;
    let captions = project
        .captions_srt
        .ok_or_else(|| ApiError::NotFound("Project has no captions".to_string()))?;
    let disposition = format!("attachment; filename=\"{}.srt\"", project.id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/x-subrip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        captions,
    )
        .into_response())
}

/// GET /api/projects/:id/scenes/:scene_number/image
pub async fn scene_image(
    Path((id, scene_number)): Path<(String, u32)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let project = load(&state, &id).await?;
    let scene = project
        .scene(scene_number)
        .ok_or_else(|| ApiError::NotFound(format!("Scene {} not found", scene_number)))?;
    let image = scene
        .image_data_uri
        .as_deref()
        .ok_or_else(|| ApiError::NotFound(format!("Scene {} has no image", scene_number)))?;
    image_response(image)
}
