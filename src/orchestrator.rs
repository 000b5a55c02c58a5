// src/orchestrator.rs
//! Content orchestration: one prompt in, one best-effort content bundle out.
//!
//! Title, script and thumbnail are requested together. Once the script is
//! known, captions and a storyboard are derived from it and every storyboard
//! scene gets its own image. Only title, script and thumbnail are critical;
//! everything else degrades to a warning.

use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

use crate::capabilities::{
    normalize_scenes, prompts, GenerationCapability, SceneImageInput, StoryboardInput,
};
use crate::models::{ContentBundle, CriticalField, StoryboardScene};

/// Scene cap for storyboards generated as part of the full flow
pub const DEFAULT_STORYBOARD_MAX_SCENES: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Critical AI content generation failed. Errors: {}", .errors.join("; "))]
    CriticalGenerationFailure {
        missing: Vec<CriticalField>,
        errors: Vec<String>,
    },
}

/// Where a single orchestration call currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationPhase {
    Idle,
    AwaitingPrimary,
    AwaitingEnrichment,
    AggregatingFailure,
    Succeeded,
    CriticallyFailed,
}

impl OrchestrationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrchestrationPhase::Succeeded | OrchestrationPhase::CriticallyFailed)
    }
}

/// Successful orchestration result
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub bundle: ContentBundle,
    /// Labels of non-critical failures (captions, storyboard, scene images)
    pub warnings: Vec<String>,
}

/// Book-keeping for one call; dropped when the call returns
struct Run {
    phase: OrchestrationPhase,
    errors: Vec<String>,
}

impl Run {
    fn new() -> Self {
        Self {
            phase: OrchestrationPhase::Idle,
            errors: Vec::new(),
        }
    }

    fn enter(&mut self, phase: OrchestrationPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "orchestration phase change");
        self.phase = phase;
    }

    fn fail(&mut self, label: &str, detail: impl std::fmt::Display) {
        let message = format!("{}: {}", label, detail);
        tracing::error!("{}", message);
        self.errors.push(message);
    }
}

#[derive(Clone)]
pub struct ContentOrchestrator {
    capabilities: Arc<dyn GenerationCapability>,
    storyboard_max_scenes: u32,
}

impl ContentOrchestrator {
    pub fn new(capabilities: Arc<dyn GenerationCapability>) -> Self {
        Self {
            capabilities,
            storyboard_max_scenes: DEFAULT_STORYBOARD_MAX_SCENES,
        }
    }

    pub fn with_storyboard_max_scenes(mut self, max_scenes: u32) -> Self {
        self.storyboard_max_scenes = max_scenes.max(1);
        self
    }

    pub fn storyboard_max_scenes(&self) -> u32 {
        self.storyboard_max_scenes
    }

    /// Generate every piece of a video project from one prompt.
    ///
    /// Fails with `InvalidInput` before any provider call when the prompt is
    /// blank, and with `CriticalGenerationFailure` when title, script or
    /// thumbnail could not be produced.
    pub async fn generate_all(&self, prompt: &str) -> Result<GeneratedContent, OrchestrationError> {
        let topic = prompt.trim();
        if topic.is_empty() {
            return Err(OrchestrationError::InvalidInput("Prompt cannot be empty.".to_string()));
        }

        tracing::info!("🎬 Generating video content for prompt: '{}'", topic);

        let mut run = Run::new();
        let mut bundle = ContentBundle::default();

        run.enter(OrchestrationPhase::AwaitingPrimary);
        let thumbnail_prompt = prompts::thumbnail_prompt(topic);
        let (title_result, script_result, thumbnail_result) = tokio::join!(
            self.capabilities.title_and_description(topic),
            self.capabilities.script(topic),
            self.capabilities.thumbnail(&thumbnail_prompt),
        );

        match title_result {
            Ok(output) if !output.title.trim().is_empty() => {
                bundle.title = Some(output.title);
                bundle.description = Some(output.description);
            }
            Ok(_) => run.fail("Title/Description generation failed", "empty title"),
            Err(e) => run.fail("Title/Description generation failed", e),
        }

        match script_result {
            Ok(output) if !output.script.trim().is_empty() => bundle.script = Some(output.script),
            Ok(_) => run.fail("Script generation failed", "empty script"),
            Err(e) => run.fail("Script generation failed", e),
        }

        match thumbnail_result {
            Ok(output) if !output.image_data_uri.trim().is_empty() => {
                bundle.thumbnail_data_uri = Some(output.image_data_uri)
            }
            Ok(_) => run.fail("Thumbnail generation failed", "empty image"),
            Err(e) => run.fail("Thumbnail generation failed", e),
        }

        if let Some(script) = bundle.script.clone() {
            run.enter(OrchestrationPhase::AwaitingEnrichment);

            match self.capabilities.captions(&script).await {
                Ok(output) => bundle.captions_srt = Some(output.captions_srt),
                Err(e) => run.fail("Captions generation failed", e),
            }

            bundle.storyboard = self.storyboard(topic, &script, &mut run).await;
        }

        let missing = bundle.missing_critical_fields();
        if !missing.is_empty() {
            run.enter(OrchestrationPhase::AggregatingFailure);
            run.enter(OrchestrationPhase::CriticallyFailed);
            return Err(OrchestrationError::CriticalGenerationFailure {
                missing,
                errors: run.errors,
            });
        }

        if !run.errors.is_empty() {
            tracing::warn!(
                "Non-critical errors during content generation: {}",
                run.errors.join("; ")
            );
        }
        run.enter(OrchestrationPhase::Succeeded);
        tracing::info!(
            "✅ Content generated: {} storyboard scenes, captions: {}",
            bundle.scene_count(),
            bundle.captions_srt.is_some()
        );

        Ok(GeneratedContent {
            bundle,
            warnings: run.errors,
        })
    }

    /// Scene list followed by one concurrent image call per scene. Scenes are
    /// kept even when their image fails.
    async fn storyboard(&self, topic: &str, script: &str, run: &mut Run) -> Option<Vec<StoryboardScene>> {
        let input = StoryboardInput::new(script, Some(self.storyboard_max_scenes));
        let outline = match self.capabilities.storyboard(&input).await {
            Ok(output) => normalize_scenes(output.scenes, self.storyboard_max_scenes),
            Err(e) => {
                run.fail("Storyboard generation failed", e);
                return None;
            }
        };

        if outline.is_empty() {
            return None;
        }

        let image_calls = outline.iter().map(|scene| {
            let input = SceneImageInput {
                scene_description: scene.description.clone(),
                video_topic: topic.to_string(),
            };
            async move {
                AssertUnwindSafe(self.capabilities.scene_image(&input))
                    .catch_unwind()
                    .await
            }
        });
        let images = join_all(image_calls).await;

        let scenes = outline
            .into_iter()
            .zip(images)
            .map(|(scene, image)| {
                let label = format!(
                    "Image generation for scene {} (\"{}...\") failed",
                    scene.scene_number,
                    truncate_chars(&scene.description, 20)
                );
                let image_data_uri = match image {
                    Ok(Ok(output)) => Some(output.image_data_uri),
                    Ok(Err(e)) => {
                        run.fail(&label, e);
                        None
                    }
                    Err(_) => {
                        run.fail(&label, "image task aborted");
                        None
                    }
                };
                StoryboardScene {
                    scene_number: scene.scene_number,
                    description: scene.description,
                    image_data_uri,
                }
            })
            .collect();

        Some(scenes)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
