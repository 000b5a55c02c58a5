// src/handlers/mod.rs
pub mod projects;
pub mod regenerate;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, Extension, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

use crate::models::ProjectStatus;
use crate::regenerate::RegenerationFailure;
use crate::services::{GenerationError, LifecycleError};
use crate::store::StoreError;
use crate::AppState;

/// Error responses of the JSON API, rendered as `{ "error": ... }`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    UnsupportedMediaType(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Unprocessable(m)
            | ApiError::UnsupportedMediaType(m)
            | ApiError::BadGateway(m)
            | ApiError::Internal(m) => m,
        }
    }

    pub fn project_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("Project not found: {}", id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let message = rejection.body_text();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::Unprocessable(message)
        } else if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            ApiError::UnsupportedMediaType(message)
        } else {
            ApiError::BadRequest(message)
        }
    }
}

/// `Json` body extractor whose rejections use the `{ "error": ... }` shape
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Project store error: {}", err);
        ApiError::Internal("Failed to access project store".to_string())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidPrompt(message) => ApiError::Unprocessable(message),
            GenerationError::NotFound(id) => ApiError::project_not_found(&id),
            e @ GenerationError::NotResubmittable(_) => ApiError::Conflict(e.to_string()),
            GenerationError::Store(e) => e.into(),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyPublished => ApiError::Conflict(err.to_string()),
            LifecycleError::MissingSchedule | LifecycleError::Validation(_) => {
                ApiError::Unprocessable(err.to_string())
            }
        }
    }
}

impl From<RegenerationFailure> for ApiError {
    fn from(failure: RegenerationFailure) -> Self {
        if failure.is_invalid_input() {
            ApiError::Unprocessable(failure.error)
        } else {
            ApiError::BadGateway(failure.error)
        }
    }
}

/// Every API route; the caller adds the state extension and outer layers
pub fn api_routes() -> Router {
    Router::new()
        .merge(projects::project_routes())
        .merge(regenerate::regenerate_routes())
        .route("/api/status", get(api_status))
}

/// GET /api/status - Service status and project counts
async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let projects = state.store.list(None).await?;
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

    Ok(Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "store": state.store_backend,
            "gemini_ai": if state.provider_configured { "configured" } else { "not_configured" },
        },
        "projects": {
            "total": projects.len(),
            "generating": count(ProjectStatus::Generating),
            "review": count(ProjectStatus::Review),
            "scheduled": count(ProjectStatus::Scheduled),
            "published": count(ProjectStatus::Published),
            "failed": count(ProjectStatus::Failed),
        }
    })))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::capabilities::testing::ScriptedCapabilities;
    use crate::store::ProjectStore;

    #[tokio::test]
    async fn test_status_reports_store_and_counts() {
        let (app, store) = test_app(ScriptedCapabilities::all_succeed(1));
        store
            .upsert(crate::models::VideoProject::generating("topic").failed("boom"))
            .await
            .unwrap();

        let (status, body) = send_json(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["services"]["store"], "memory");
        assert_eq!(body["projects"]["total"], 1);
        assert_eq!(body["projects"]["failed"], 1);
    }

    #[tokio::test]
    async fn test_body_rejections_use_error_json() {
        let (app, _) = test_app(ScriptedCapabilities::all_succeed(1));

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/regenerate/captions")
            .body(axum::body::Body::from("{\"script\": \"Welcome to the bakery\"}"))
            .unwrap();
        let (status, body) = send_request_json(&app, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/projects")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let (status, body) = send_request_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send_json(&app, "POST", "/api/projects", Some(json!({ "topic": "bread" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("prompt"));
    }

    #[test]
    fn test_lifecycle_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(LifecycleError::AlreadyPublished).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(LifecycleError::MissingSchedule).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_regeneration_failures_map_to_status_codes() {
        let invalid = RegenerationFailure::invalid_input("Scene description and video topic are required.");
        assert_eq!(ApiError::from(invalid).status(), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream = RegenerationFailure::from(crate::capabilities::CapabilityError::NotConfigured);
        assert_eq!(ApiError::from(upstream).status(), StatusCode::BAD_GATEWAY);
    }
}
