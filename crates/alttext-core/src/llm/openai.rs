//! Chat Completions provider for OpenAI-compatible endpoints.
//!
//! Sends the prompt and the image (as a data URL) in one user message.

use super::provider::{resolve_env_var, AltTextProvider, AltTextRequest, AltTextResponse};
use crate::config::ApiConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Provider speaking the Chat Completions wire format.
pub struct ChatCompletionsProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ChatCompletionsProvider {
    pub fn new(api_key: &str, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    /// Build a provider from the `[api]` config section.
    ///
    /// A missing credential is not rejected here: the provider answers with
    /// an authentication failure, which is retried and reported like any
    /// other failed request.
    pub fn from_config(config: &ApiConfig) -> Self {
        let api_key = resolve_env_var(&config.api_key).unwrap_or_else(|| {
            tracing::warn!(
                "API key not set ({}); requests will be sent unauthenticated",
                config.api_key
            );
            String::new()
        });
        Self::new(
            &api_key,
            &config.model,
            &config.endpoint,
            Duration::from_millis(config.timeout_ms),
        )
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Pull the trimmed alt text out of a 200 response body.
fn parse_completion(body: &str) -> Result<(String, Option<String>, Option<u32>), PipelineError> {
    let chat_resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::ResponseFormat {
            message: format!("Failed to parse completion: {e}"),
        })?;

    let text = chat_resp
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PipelineError::ResponseFormat {
            message: "Completion has no message content".to_string(),
        })?
        .to_string();

    Ok((
        text,
        chat_resp.model,
        chat_resp.usage.map(|u| u.total_tokens),
    ))
}

#[async_trait]
impl AltTextProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn describe(&self, request: &AltTextRequest) -> Result<AltTextResponse, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Transport {
                message: format!("Request to {} failed: {e}", self.endpoint),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| PipelineError::Transport {
            message: format!("Failed to read response body: {e}"),
        })?;

        if status != StatusCode::OK {
            tracing::warn!("API returned {}: {}", status.as_u16(), text);
            return Err(PipelineError::Request {
                status: status.as_u16(),
                body: text,
            });
        }

        let (alt_text, model, tokens_used) = parse_completion(&text)?;

        Ok(AltTextResponse {
            text: alt_text,
            status: status.as_u16(),
            model: model.unwrap_or_else(|| self.model.clone()),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
