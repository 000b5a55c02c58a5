// src/config.rs
use std::time::Duration;
use thiserror::Error;

use crate::gemini_client::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::orchestrator::DEFAULT_STORYBOARD_MAX_SCENES;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_text_model: String,
    pub gemini_image_model: String,
    pub gemini_timeout: Duration,
    pub database_url: Option<String>,
    pub storyboard_max_scenes: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_text_model: var("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            gemini_image_model: var("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            gemini_timeout: Duration::from_secs(positive("GEMINI_TIMEOUT_SECS", var("GEMINI_TIMEOUT_SECS"), 120)?),
            database_url: var("DATABASE_URL"),
            storyboard_max_scenes: positive(
                "STORYBOARD_MAX_SCENES",
                var("STORYBOARD_MAX_SCENES"),
                DEFAULT_STORYBOARD_MAX_SCENES as u64,
            )? as u32,
        })
    }
}

fn positive(name: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}
