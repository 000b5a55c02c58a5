use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::media::DataUri;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Prompt was blocked: {0}")]
    Blocked(String),
    #[error("No text content in Gemini response")]
    EmptyResponse,
    #[error("Image generation failed or did not return image data")]
    NoImage,
}

// Request URLs are stripped so a transport failure never echoes the endpoint
impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Http(err.without_url())
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn user_prompt(prompt: &str, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: Some(generation_config),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String, // base64 encoded data
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerationConfig {
    pub fn text(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            top_k: Some(40),
            top_p: Some(0.9),
            max_output_tokens: Some(max_output_tokens),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u32,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_models(mut self, text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound every request; a hung provider call otherwise never settles
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GeminiError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, contents = request.contents.len(), "Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        tracing::debug!(
            "Gemini API response (truncated): {}...",
            truncate_chars(&response_text, 500)
        );

        let result: GenerateContentResponse = serde_json::from_str(&response_text)?;

        if let Some(reason) = result
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(GeminiError::Blocked(reason));
        }

        if let Some(usage) = &result.usage_metadata {
            tracing::debug!(
                model = %model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini token usage"
            );
        }

        Ok(result)
    }

    /// Plain text completion with the text model
    pub async fn generate_text(
        &self,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest::user_prompt(prompt, generation_config);
        let response = self.generate_content(&self.text_model, &request).await?;
        extract_text(&response).ok_or(GeminiError::EmptyResponse)
    }

    /// Structured completion: the model is constrained to `schema` and the
    /// reply is deserialized into `T`
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, GeminiError> {
        let generation_config = GenerationConfig {
            temperature: Some(0.7),
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        };
        let text = self.generate_text(prompt, generation_config).await?;
        Ok(serde_json::from_str(strip_code_fences(&text))?)
    }

    /// Generate one image and return it as a data URI
    pub async fn generate_image(&self, prompt: &str) -> Result<DataUri, GeminiError> {
        let generation_config = GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            ..Default::default()
        };
        let request = GenerateContentRequest::user_prompt(prompt, generation_config);
        let response = self.generate_content(&self.image_model, &request).await?;

        let image = extract_inline_image(&response).ok_or(GeminiError::NoImage)?;
        tracing::info!(
            "Generated {} image ({} base64 chars)",
            image.mime_type,
            image.payload.len()
        );
        Ok(image)
    }
}

/// Concatenate the text parts of the first candidate
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First inline image across all candidates
pub fn extract_inline_image(response: &GenerateContentResponse) -> Option<DataUri> {
    response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| match part {
            Part::InlineData { inline_data }
                if inline_data.mime_type.starts_with("image/") && !inline_data.data.is_empty() =>
            {
                Some(DataUri::new(
                    inline_data.mime_type.clone(),
                    inline_data.data.clone(),
                ))
            }
            _ => None,
        })
}

/// Remove a surrounding markdown code fence (```json ... ```), if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_extract_text_joins_text_parts() {
        let resp = response(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello, " }, { "text": "world" }] },
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_text(&resp).as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_extract_text_none_when_blank() {
        let resp = response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        }));
        assert_eq!(extract_text(&resp), None);
        assert_eq!(extract_text(&response(serde_json::json!({}))), None);
    }

    #[test]
    fn test_extract_inline_image_skips_text_parts() {
        let resp = response(serde_json::json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your image" },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                ] }
            }]
        }));
        let image = extract_inline_image(&resp).unwrap();
        assert_eq!(image.to_string(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_unknown_parts_do_not_break_decoding() {
        let resp = response(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "executableCode": { "code": "print(1)" } }, { "text": "ok" }] }
            }]
        }));
        assert_eq!(extract_text(&resp).as_deref(), Some("ok"));
        assert!(extract_inline_image(&resp).is_none());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n1\n00:00:00,000 --> 00:00:01,000\nHi\n```\n"), "1\n00:00:00,000 --> 00:00:01,000\nHi");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let client = GeminiClient::new("SUPER_SECRET_KEY".to_string())
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(5))
            .unwrap();

        let err = client
            .generate_text("hello", GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::Http(_)));
        assert!(!err.to_string().contains("SUPER_SECRET_KEY"));
        assert!(!err.to_string().contains("127.0.0.1:9"));
        assert!(!format!("{:?}", err).contains("SUPER_SECRET_KEY"));
    }

    #[test]
    fn test_generation_config_serializes_camel_case_and_skips_unset() {
        let config = GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            ..GenerationConfig::text(0.5, 256)
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");
        assert_eq!(json["maxOutputTokens"], 256);
        assert!(json.get("responseSchema").is_none());
    }
}
