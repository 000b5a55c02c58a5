// src/capabilities/mod.rs
//! Generation capabilities: the six independent AI calls a video project is
//! assembled from. Each one is a typed request/response pair and may fail
//! on its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gemini_client::GeminiError;

pub mod gemini;
pub mod prompts;
#[cfg(test)]
pub mod testing;

pub use gemini::GeminiCapabilities;

/// Scene cap applied when a storyboard request does not name one
pub const DEFAULT_MAX_SCENES: u32 = 10;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("{0}")]
    Provider(#[from] GeminiError),
    #[error("Malformed output: {0}")]
    MalformedOutput(String),
    #[error("Generation provider is not configured (set GEMINI_API_KEY)")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDescriptionOutput {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptOutput {
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOutput {
    pub image_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionsOutput {
    pub captions_srt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardInput {
    pub script: String,
    pub max_scenes: Option<u32>,
}

impl StoryboardInput {
    pub fn new(script: impl Into<String>, max_scenes: Option<u32>) -> Self {
        Self {
            script: script.into(),
            max_scenes,
        }
    }

    pub fn effective_max_scenes(&self) -> u32 {
        self.max_scenes.unwrap_or(DEFAULT_MAX_SCENES).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOutline {
    pub scene_number: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardOutput {
    pub scenes: Vec<SceneOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneImageInput {
    pub scene_description: String,
    pub video_topic: String,
}

/// The generation provider as seen by the orchestrator and the
/// regeneration entry points
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    async fn title_and_description(&self, prompt: &str) -> Result<TitleDescriptionOutput, CapabilityError>;

    async fn script(&self, prompt: &str) -> Result<ScriptOutput, CapabilityError>;

    async fn thumbnail(&self, prompt: &str) -> Result<ImageOutput, CapabilityError>;

    async fn captions(&self, script: &str) -> Result<CaptionsOutput, CapabilityError>;

    async fn storyboard(&self, input: &StoryboardInput) -> Result<StoryboardOutput, CapabilityError>;

    async fn scene_image(&self, input: &SceneImageInput) -> Result<ImageOutput, CapabilityError>;
}

/// Stand-in used when no provider key is configured; every call fails
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredCapabilities;

#[async_trait]
impl GenerationCapability for UnconfiguredCapabilities {
    async fn title_and_description(&self, _prompt: &str) -> Result<TitleDescriptionOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }

    async fn script(&self, _prompt: &str) -> Result<ScriptOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }

    async fn thumbnail(&self, _prompt: &str) -> Result<ImageOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }

    async fn captions(&self, _script: &str) -> Result<CaptionsOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }

    async fn storyboard(&self, _input: &StoryboardInput) -> Result<StoryboardOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }

    async fn scene_image(&self, _input: &SceneImageInput) -> Result<ImageOutput, CapabilityError> {
        Err(CapabilityError::NotConfigured)
    }
}

/// Clean up a scene list returned by the model: blank scenes are dropped,
/// the list is cut to `max_scenes` and numbered from 1 in order
pub fn normalize_scenes(scenes: Vec<SceneOutline>, max_scenes: u32) -> Vec<SceneOutline> {
    scenes
        .into_iter()
        .filter(|scene| !scene.description.trim().is_empty())
        .take(max_scenes as usize)
        .enumerate()
        .map(|(i, scene)| SceneOutline {
            scene_number: i as u32 + 1,
            description: scene.description.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(n: u32, description: &str) -> SceneOutline {
        SceneOutline {
            scene_number: n,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_storyboard_input_default_cap() {
        assert_eq!(StoryboardInput::new("s", None).effective_max_scenes(), 10);
        assert_eq!(StoryboardInput::new("s", Some(5)).effective_max_scenes(), 5);
        assert_eq!(StoryboardInput::new("s", Some(0)).effective_max_scenes(), 1);
    }

    #[test]
    fn test_normalize_scenes_drops_blank_caps_and_renumbers() {
        let scenes = vec![
            scene(3, "Flour on a wooden bench"),
            scene(3, "   "),
            scene(7, " Starter bubbling in a jar "),
            scene(9, "Loaf coming out of the oven"),
        ];
        let normalized = normalize_scenes(scenes, 2);
        assert_eq!(
            normalized,
            vec![
                scene(1, "Flour on a wooden bench"),
                scene(2, "Starter bubbling in a jar"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_capabilities_fail_every_call() {
        let caps = UnconfiguredCapabilities;
        assert!(matches!(caps.script("topic").await, Err(CapabilityError::NotConfigured)));
        let input = SceneImageInput {
            scene_description: "a".to_string(),
            video_topic: "b".to_string(),
        };
        assert!(matches!(caps.scene_image(&input).await, Err(CapabilityError::NotConfigured)));
    }
}
