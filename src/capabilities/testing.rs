// src/capabilities/testing.rs
//! Scripted in-process capabilities for tests

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use super::{
    CapabilityError, CaptionsOutput, GenerationCapability, ImageOutput, SceneImageInput,
    SceneOutline, ScriptOutput, StoryboardInput, StoryboardOutput, TitleDescriptionOutput,
};

pub const CAPTIONS: &str = "1\n00:00:00,000 --> 00:00:03,000\nWelcome to the bakery.\n\n";

fn failure(message: &str) -> CapabilityError {
    CapabilityError::MalformedOutput(message.to_string())
}

pub struct ScriptedCapabilities {
    title: Result<TitleDescriptionOutput, String>,
    script: Result<String, String>,
    thumbnail: Result<String, String>,
    captions: Result<String, String>,
    storyboard: Result<Vec<SceneOutline>, String>,
    failing_scene_descriptions: HashSet<String>,
    panicking_scene_descriptions: HashSet<String>,
    primary_barrier: Option<Arc<Barrier>>,
    scene_barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<String>>,
    storyboard_caps: Mutex<Vec<u32>>,
    image_prompts: Mutex<Vec<String>>,
}

impl ScriptedCapabilities {
    /// Every capability succeeds; the storyboard has `scene_count` scenes
    pub fn all_succeed(scene_count: u32) -> Self {
        let scenes = (1..=scene_count)
            .map(|n| SceneOutline {
                scene_number: n,
                description: format!("Scene {} shows the baker kneading dough", n),
            })
            .collect();

        Self {
            title: Ok(TitleDescriptionOutput {
                title: "Perfect Sourdough in 5 Minutes".to_string(),
                description: "Everything you need to bake sourdough at home.".to_string(),
            }),
            script: Ok("Welcome to the bakery. Today we bake sourdough.".to_string()),
            thumbnail: Ok("data:image/png;base64,dGh1bWI=".to_string()),
            captions: Ok(CAPTIONS.to_string()),
            storyboard: Ok(scenes),
            failing_scene_descriptions: HashSet::new(),
            panicking_scene_descriptions: HashSet::new(),
            primary_barrier: None,
            scene_barrier: None,
            calls: Mutex::new(Vec::new()),
            storyboard_caps: Mutex::new(Vec::new()),
            image_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_title(mut self, message: &str) -> Self {
        self.title = Err(message.to_string());
        self
    }

    pub fn fail_script(mut self, message: &str) -> Self {
        self.script = Err(message.to_string());
        self
    }

    pub fn empty_script(mut self) -> Self {
        self.script = Ok("   ".to_string());
        self
    }

    pub fn fail_thumbnail(mut self, message: &str) -> Self {
        self.thumbnail = Err(message.to_string());
        self
    }

    pub fn fail_captions(mut self, message: &str) -> Self {
        self.captions = Err(message.to_string());
        self
    }

    pub fn fail_storyboard(mut self, message: &str) -> Self {
        self.storyboard = Err(message.to_string());
        self
    }

    pub fn with_scenes(mut self, scenes: Vec<SceneOutline>) -> Self {
        self.storyboard = Ok(scenes);
        self
    }

    pub fn fail_scene_image(mut self, description: &str) -> Self {
        self.failing_scene_descriptions.insert(description.to_string());
        self
    }

    /// The image call for this scene panics instead of returning
    pub fn panic_scene_image(mut self, description: &str) -> Self {
        self.panicking_scene_descriptions.insert(description.to_string());
        self
    }

    /// Title, script and thumbnail each wait until all three are in flight
    pub fn with_primary_barrier(mut self) -> Self {
        self.primary_barrier = Some(Arc::new(Barrier::new(3)));
        self
    }

    /// Every scene image call waits until `parties` of them are in flight
    pub fn with_scene_barrier(mut self, parties: usize) -> Self {
        self.scene_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn storyboard_caps(&self) -> Vec<u32> {
        self.storyboard_caps.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    async fn primary_rendezvous(&self) {
        if let Some(barrier) = &self.primary_barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl GenerationCapability for ScriptedCapabilities {
    async fn title_and_description(&self, _prompt: &str) -> Result<TitleDescriptionOutput, CapabilityError> {
        self.record("title_and_description");
        self.primary_rendezvous().await;
        self.title.clone().map_err(|e| failure(&e))
    }

    async fn script(&self, _prompt: &str) -> Result<ScriptOutput, CapabilityError> {
        self.record("script");
        self.primary_rendezvous().await;
        self.script
            .clone()
            .map(|script| ScriptOutput { script })
            .map_err(|e| failure(&e))
    }

    async fn thumbnail(&self, prompt: &str) -> Result<ImageOutput, CapabilityError> {
        self.record("thumbnail");
        self.image_prompts.lock().unwrap().push(prompt.to_string());
        self.primary_rendezvous().await;
        self.thumbnail
            .clone()
            .map(|image_data_uri| ImageOutput { image_data_uri })
            .map_err(|e| failure(&e))
    }

    async fn captions(&self, _script: &str) -> Result<CaptionsOutput, CapabilityError> {
        self.record("captions");
        self.captions
            .clone()
            .map(|captions_srt| CaptionsOutput { captions_srt })
            .map_err(|e| failure(&e))
    }

    async fn storyboard(&self, input: &StoryboardInput) -> Result<StoryboardOutput, CapabilityError> {
        self.record("storyboard");
        self.storyboard_caps.lock().unwrap().push(input.effective_max_scenes());
        self.storyboard
            .clone()
            .map(|scenes| StoryboardOutput { scenes })
            .map_err(|e| failure(&e))
    }

    async fn scene_image(&self, input: &SceneImageInput) -> Result<ImageOutput, CapabilityError> {
        self.record("scene_image");
        if let Some(barrier) = &self.scene_barrier {
            barrier.wait().await;
        }
        if self.panicking_scene_descriptions.contains(&input.scene_description) {
            panic!("scene image task crashed");
        }
        if self.failing_scene_descriptions.contains(&input.scene_description) {
            return Err(failure("provider returned no image"));
        }
        Ok(ImageOutput {
            image_data_uri: format!("data:image/png;base64,{}", input.scene_description.len()),
        })
    }
}
