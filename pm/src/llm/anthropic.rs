//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API. Leading
//! system turns are lifted into the API's `system` field; the per-call
//! timeout from the generation parameters is applied to each request.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{GenerationConfig, LlmClient, LlmError, Role, Turn};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let http = Client::builder().build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the request body for the Anthropic API
    ///
    /// The leading system turn becomes the `system` field; any later
    /// system turn is demoted to a user message so the alternation the
    /// API requires is preserved.
    fn build_request_body(&self, conversation: &[Turn], params: &GenerationConfig) -> serde_json::Value {
        debug!(%self.model, params.max_tokens, "build_request_body: called");
        let mut system = String::new();
        let mut messages = Vec::new();

        for (i, turn) in conversation.iter().enumerate() {
            match turn.role {
                Role::System if i == 0 => system = turn.content.clone(),
                Role::System => messages.push(serde_json::json!({
                    "role": "user",
                    "content": turn.content,
                })),
                Role::User => messages.push(serde_json::json!({
                    "role": "user",
                    "content": turn.content,
                })),
                Role::Assistant => messages.push(serde_json::json!({
                    "role": "assistant",
                    "content": turn.content,
                })),
            }
        }

        serde_json::json!({
            "model": self.model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "system": system,
            "messages": messages,
        })
    }

    /// Extract the response text, rejecting empty content
    fn parse_response(&self, api_response: AnthropicResponse) -> Result<String, LlmError> {
        let text: String = api_response
            .content
            .into_iter()
            .map(|block| match block {
                AnthropicContentBlock::Text { text } => text,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn generate(&self, conversation: &[Turn], params: &GenerationConfig) -> Result<String, LlmError> {
        debug!(%self.model, params.max_tokens, turns = conversation.len(), "generate: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(conversation, params);
        let timeout = Duration::from_secs(params.timeout_seconds);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "generate: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("x-api-key", self.api_key.clone())
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .timeout(timeout)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() => return Err(LlmError::Timeout(timeout)),
                Err(e) => {
                    debug!(attempt, error = %e, "generate: network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "generate: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            let api_response: AnthropicResponse = response.json().await?;
            return self.parse_response(api_response);
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}
