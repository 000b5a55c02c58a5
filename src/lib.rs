// lib.rs - AutoTube: AI-generated video projects from a single prompt
pub mod capabilities;
pub mod config;
pub mod db;
pub mod gemini_client;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod orchestrator;
pub mod regenerate;
pub mod services;
pub mod srt;
pub mod store;

use axum::{Extension, Router};
use std::sync::Arc;

use capabilities::GenerationCapability;
use orchestrator::ContentOrchestrator;
use regenerate::Regenerator;
use services::GenerationService;
use store::ProjectStore;

// AppState holds the project store and the generation entry points built on one provider
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub generation: GenerationService,
    pub regenerator: Regenerator,
    pub provider_configured: bool,
    pub store_backend: &'static str,
}

impl AppState {
    pub fn new(
        capabilities: Arc<dyn GenerationCapability>,
        store: Arc<dyn ProjectStore>,
        storyboard_max_scenes: u32,
        provider_configured: bool,
        store_backend: &'static str,
    ) -> Self {
        let orchestrator =
            ContentOrchestrator::new(capabilities.clone()).with_storyboard_max_scenes(storyboard_max_scenes);
        Self {
            generation: GenerationService::new(orchestrator, store.clone()),
            regenerator: Regenerator::new(capabilities),
            store,
            provider_configured,
            store_backend,
        }
    }
}

/// The full API router with request logging and shared state
pub fn app(state: Arc<AppState>) -> Router {
    handlers::api_routes()
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(Extension(state))
}
