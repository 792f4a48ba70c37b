//! LLM Client - HTTP client for OpenAI-compatible chat completion APIs
//!
//! Uses reqwest to call the hosted inference endpoint. Compatible with
//! OpenRouter, OpenAI and other OpenAI-compatible providers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::models::AssistantError;
use crate::config::LlmConfig;

/// Maximum completion length for a generated reply or summary.
const GENERATION_MAX_TOKENS: u32 = 500;
/// Fixed sampling temperature for the generation flow.
const GENERATION_TEMPERATURE: f64 = 0.7;

/// Seam for the outbound inference call, so the generation flow can be
/// exercised against a mock without touching the network.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one chat completion for `prompt`. Returns `Ok(None)` when
    /// the provider answered successfully but produced no completion
    /// text; the caller decides what to substitute.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, AssistantError>;
}

/// LLM HTTP Client
pub struct LLMClient {
    http_client: Client,
    config: LlmConfig,
}

impl LLMClient {
    pub fn new(config: LlmConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client, config }
    }
}

#[async_trait]
impl InferenceClient for LLMClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, AssistantError> {
        if self.config.api_key.is_empty() {
            return Err(AssistantError::ApiKeyMissing);
        }

        let chat_request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            max_tokens: GENERATION_MAX_TOKENS,
            temperature: GENERATION_TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));

        tracing::debug!("Calling LLM API: {} with model {}", url, self.config.model);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout(self.config.timeout_secs)
                } else {
                    AssistantError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(AssistantError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Upstream(format!("API error {}: {}", status, error_text)));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty());

        Ok(content)
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
