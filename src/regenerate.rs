// src/regenerate.rs
//! Stand-alone regeneration of one piece of a project (thumbnail, captions
//! or a single scene image). These never touch the project store; the
//! caller decides whether to persist the new artifact.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::capabilities::{
    prompts, CapabilityError, CaptionsOutput, GenerationCapability, ImageOutput, SceneImageInput,
};

/// Shortest script captions are generated for
pub const MIN_CAPTION_SCRIPT_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Rejected before any provider call
    InvalidInput,
    /// The provider call itself failed
    Capability,
}

/// Error result of a regeneration entry point, serialized as `{ "error": ... }`
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{error}")]
pub struct RegenerationFailure {
    pub error: String,
    #[serde(skip)]
    pub reason: FailureReason,
}

impl RegenerationFailure {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            reason: FailureReason::InvalidInput,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.reason == FailureReason::InvalidInput
    }
}

impl From<CapabilityError> for RegenerationFailure {
    fn from(err: CapabilityError) -> Self {
        Self {
            error: err.to_string(),
            reason: FailureReason::Capability,
        }
    }
}

#[derive(Clone)]
pub struct Regenerator {
    capabilities: Arc<dyn GenerationCapability>,
}

impl Regenerator {
    pub fn new(capabilities: Arc<dyn GenerationCapability>) -> Self {
        Self { capabilities }
    }

    /// New thumbnail for the current title (if any) and the original topic
    pub async fn thumbnail(&self, topic: &str, title: Option<&str>) -> Result<ImageOutput, RegenerationFailure> {
        let prompt = prompts::regenerated_thumbnail_prompt(title, topic);
        self.capabilities.thumbnail(&prompt).await.map_err(|e| {
            tracing::error!("Thumbnail regeneration failed: {}", e);
            RegenerationFailure::from(e)
        })
    }

    pub async fn captions(&self, script: &str) -> Result<CaptionsOutput, RegenerationFailure> {
        if script.trim().chars().count() < MIN_CAPTION_SCRIPT_CHARS {
            return Err(RegenerationFailure::invalid_input(
                "Please ensure the script has enough content to generate captions.",
            ));
        }

        self.capabilities.captions(script).await.map_err(|e| {
            tracing::error!("Caption regeneration failed: {}", e);
            RegenerationFailure::from(e)
        })
    }

    pub async fn scene_image(&self, scene_description: &str, video_topic: &str) -> Result<ImageOutput, RegenerationFailure> {
        if scene_description.trim().is_empty() || video_topic.trim().is_empty() {
            return Err(RegenerationFailure::invalid_input(
                "Scene description and video topic are required.",
            ));
        }

        let input = SceneImageInput {
            scene_description: scene_description.to_string(),
            video_topic: video_topic.to_string(),
        };
        self.capabilities.scene_image(&input).await.map_err(|e| {
            tracing::error!("Scene image regeneration failed: {}", e);
            RegenerationFailure::from(e)
        })
    }
}
