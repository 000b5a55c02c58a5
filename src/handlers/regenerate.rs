// src/handlers/regenerate.rs
//! Single-piece regeneration. Results are returned to the caller and only
//! persisted when the project is saved.

use axum::{extract::Extension, response::Json, routing::post, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiJson};
use crate::capabilities::{CaptionsOutput, ImageOutput};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct CaptionsRequest {
    #[serde(default)]
    pub script: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneImageRequest {
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub video_topic: String,
}

pub fn regenerate_routes() -> Router {
    Router::new()
        .route("/api/regenerate/thumbnail", post(regenerate_thumbnail))
        .route("/api/regenerate/captions", post(regenerate_captions))
        .route("/api/regenerate/scene-image", post(regenerate_scene_image))
}

/// POST /api/regenerate/thumbnail
pub async fn regenerate_thumbnail(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<ThumbnailRequest>,
) -> Result<Json<ImageOutput>, ApiError> {
    let output = state
        .regenerator
        .thumbnail(&request.topic, request.title.as_deref())
        .await?;
    Ok(Json(output))
}

/// POST /api/regenerate/captions
pub async fn regenerate_captions(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<CaptionsRequest>,
) -> Result<Json<CaptionsOutput>, ApiError> {
    Ok(Json(state.regenerator.captions(&request.script).await?))
}

/// POST /api/regenerate/scene-image
pub async fn regenerate_scene_image(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<SceneImageRequest>,
) -> Result<Json<ImageOutput>, ApiError> {
    let output = state
        .regenerator
        .scene_image(&request.scene_description, &request.video_topic)
        .await?;
    Ok(Json(output))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::capabilities::testing::{ScriptedCapabilities, CAPTIONS};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_thumbnail_returns_data_uri() {
        let (app, _) = test_app(ScriptedCapabilities::all_succeed(1));
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/regenerate/thumbnail",
            Some(json!({ "topic": "sourdough", "title": "Crusty Loaf" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageDataUri"], "data:image/png;base64,dGh1bWI=");
    }

    #[tokio::test]
    async fn test_captions_validation_is_422() {
        let (app, _) = test_app(ScriptedCapabilities::all_succeed(1));
        let (status, body) =
            send_json(&app, "POST", "/api/regenerate/captions", Some(json!({ "script": "short" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Please ensure the script has enough content to generate captions.");

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/regenerate/captions",
            Some(json!({ "script": "Welcome to the bakery, today we bake." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["captionsSrt"], CAPTIONS);
    }

    #[tokio::test]
    async fn test_scene_image_missing_fields_and_provider_failure() {
        let (app, _) = test_app(ScriptedCapabilities::all_succeed(1).fail_scene_image("Loaf on a rack"));

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/regenerate/scene-image",
            Some(json!({ "sceneDescription": "", "videoTopic": "sourdough" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Scene description and video topic are required.");

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/regenerate/scene-image",
            Some(json!({ "sceneDescription": "Loaf on a rack", "videoTopic": "sourdough" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Malformed output: provider returned no image");
    }
}
