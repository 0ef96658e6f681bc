//! Model-serving API client and collaborator traits
//!
//! The pipeline stages depend on the two traits here, never on a concrete
//! client, so tests inject scripted collaborators and the production wiring
//! injects [`OpenAiClient`]. One client instance is shared by both stages;
//! it is constructed explicitly and passed in (no ambient singleton).

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use eventlens_core::EncodedImage;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::config::ExtractorConfig;

/// One-shot multimodal completion over an encoded image.
#[async_trait]
pub trait VisionModelClient: Send + Sync {
    /// Send the image with a free-text prompt and return the model's text.
    async fn describe_image(&self, image: &EncodedImage, prompt: &str) -> Result<String>;
}

/// Completion constrained to return a syntactically valid JSON object.
///
/// Only syntax is guaranteed; whether the object matches the requested
/// shape is the caller's problem.
#[async_trait]
pub trait TextModelClient: Send + Sync {
    /// Send a system instruction plus user text and parse the reply as JSON.
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<serde_json::Value>;
}

/// `OpenAI` chat completion request
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Response format specification
#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat message (text or multimodal)
#[derive(Debug, Clone, Serialize)]
struct Message {
    role: String,
    #[serde(flatten)]
    content: MessageContent,
}

/// Content of a message (either text or multimodal)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text { content: String },
    Multimodal { content: Vec<ContentPart> },
}

/// Content part for multimodal messages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image URL with detail level
#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
    detail: String,
}

/// `OpenAI` chat completion response
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for the `OpenAI` chat-completions API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    vision_model: String,
    text_model: String,
    max_tokens: usize,
}

impl OpenAiClient {
    /// Create a client from the given config.
    ///
    /// Reads the API key from `OPENAI_API_KEY` and an optional endpoint
    /// override from `OPENAI_API_BASE`.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set or HTTP client
    /// creation fails.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let api_key =
            env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable not set")?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url =
            env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            api_key,
            http_client,
            base_url,
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send model API request")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read model API response")?;

        if !status.is_success() {
            anyhow::bail!("Model API request failed with status {status}: {response_text}");
        }

        let chat_response: ChatResponse =
            serde_json::from_str(&response_text).context("Failed to parse model API response")?;

        chat_response
            .choices
            .first()
            .context("No choices in model response")?
            .message
            .content
            .clone()
            .context("No content in model response")
    }
}

#[async_trait]
impl VisionModelClient for OpenAiClient {
    async fn describe_image(&self, image: &EncodedImage, prompt: &str) -> Result<String> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image.as_bytes());

        let request = ChatRequest {
            model: self.vision_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: MessageContent::Multimodal {
                    content: vec![
                        ContentPart::Text {
                            text: prompt.to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: format!("data:image/jpeg;base64,{image_b64}"),
                                detail: "high".to_string(),
                            },
                        },
                    ],
                },
            }],
            max_tokens: self.max_tokens,
            temperature: 0.0,
            response_format: None,
        };

        self.send_chat(&request).await
    }
}

#[async_trait]
impl TextModelClient for OpenAiClient {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<serde_json::Value> {
        let request = ChatRequest {
            model: self.text_model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: MessageContent::Text {
                        content: system_prompt.to_string(),
                    },
                },
                Message {
                    role: "user".to_string(),
                    content: MessageContent::Text {
                        content: user_text.to_string(),
                    },
                },
            ],
            max_tokens: self.max_tokens,
            temperature: 0.0,
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let content = self.send_chat(&request).await?;
        let json_text = salvage_json_object(&content);
        serde_json::from_str(json_text).context("Model reply is not a JSON object")
    }
}

/// Cut a JSON object out of a model reply, tolerating markdown fences.
///
/// JSON mode makes fenced replies rare but some models still wrap the
/// object in ```json blocks or lead with prose.
fn salvage_json_object(text: &str) -> &str {
    let text = text.trim();

    if text.starts_with("```") {
        if let Some(start) = text.find('\n') {
            let after_first_line = &text[start + 1..];
            if let Some(end) = after_first_line.rfind("```") {
                return after_first_line[..end].trim();
            }
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }

    text
}
