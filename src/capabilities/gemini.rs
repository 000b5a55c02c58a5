// src/capabilities/gemini.rs
//! Gemini-backed implementation of the generation capabilities

use async_trait::async_trait;
use serde_json::json;

use super::prompts;
use super::{
    normalize_scenes, CapabilityError, CaptionsOutput, GenerationCapability, ImageOutput,
    SceneImageInput, ScriptOutput, StoryboardInput, StoryboardOutput, TitleDescriptionOutput,
};
use crate::gemini_client::{strip_code_fences, GeminiClient, GenerationConfig};
use crate::srt;

#[derive(Debug, Clone)]
pub struct GeminiCapabilities {
    client: GeminiClient,
}

impl GeminiCapabilities {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    async fn image(&self, prompt: &str) -> Result<ImageOutput, CapabilityError> {
        let image = self.client.generate_image(prompt).await?;
        Ok(ImageOutput {
            image_data_uri: image.to_string(),
        })
    }
}

#[async_trait]
impl GenerationCapability for GeminiCapabilities {
    async fn title_and_description(&self, prompt: &str) -> Result<TitleDescriptionOutput, CapabilityError> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "The generated video title." },
                "description": { "type": "STRING", "description": "The generated video description." }
            },
            "required": ["title", "description"]
        });

        tracing::info!("🎬 Generating title and description");
        let output: TitleDescriptionOutput = self
            .client
            .generate_json(&prompts::title_and_description_prompt(prompt), schema)
            .await?;

        if output.title.trim().is_empty() {
            return Err(CapabilityError::MalformedOutput("empty title".to_string()));
        }
        Ok(output)
    }

    async fn script(&self, prompt: &str) -> Result<ScriptOutput, CapabilityError> {
        tracing::info!("🎬 Generating video script");
        let script = self
            .client
            .generate_text(&prompts::script_prompt(prompt), GenerationConfig::text(0.7, 2048))
            .await?;

        tracing::info!("✅ Generated {}-word script", script.split_whitespace().count());
        Ok(ScriptOutput {
            script: script.trim().to_string(),
        })
    }

    async fn thumbnail(&self, prompt: &str) -> Result<ImageOutput, CapabilityError> {
        tracing::info!("🖼️ Generating thumbnail");
        self.image(prompt).await
    }

    async fn captions(&self, script: &str) -> Result<CaptionsOutput, CapabilityError> {
        tracing::info!("💬 Generating SRT captions");
        let raw = self
            .client
            .generate_text(&prompts::captions_prompt(script), GenerationConfig::text(0.2, 4096))
            .await?;

        let captions = strip_code_fences(&raw);
        let cues = srt::parse(captions).map_err(|e| CapabilityError::MalformedOutput(format!("invalid SRT: {}", e)))?;

        tracing::info!("✅ Generated {} caption blocks spanning {}", cues.len(), srt::duration(&cues));
        Ok(CaptionsOutput {
            captions_srt: srt::render(&cues),
        })
    }

    async fn storyboard(&self, input: &StoryboardInput) -> Result<StoryboardOutput, CapabilityError> {
        let max_scenes = input.effective_max_scenes();
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "scenes": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "sceneNumber": { "type": "INTEGER", "description": "The sequential number of the scene." },
                            "description": { "type": "STRING", "description": "A concise visual description of the scene." }
                        },
                        "required": ["sceneNumber", "description"]
                    }
                }
            },
            "required": ["scenes"]
        });

        tracing::info!("🎞️ Generating storyboard (max {} scenes)", max_scenes);
        let output: StoryboardOutput = self
            .client
            .generate_json(&prompts::storyboard_prompt(&input.script, max_scenes), schema)
            .await?;

        Ok(StoryboardOutput {
            scenes: normalize_scenes(output.scenes, max_scenes),
        })
    }

    async fn scene_image(&self, input: &SceneImageInput) -> Result<ImageOutput, CapabilityError> {
        self.image(&prompts::scene_image_prompt(&input.scene_description, &input.video_topic))
            .await
    }
}
