//! Completion service boundary.
//!
//! Everything that judges an interaction talks to a model through
//! [`CompletionService`]: a model identifier plus an ordered list of
//! role-tagged messages in, the text of one new assistant turn out.
//! [`ChatCompletionsClient`] is the production implementation for any
//! OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::message::ChatMessage;

/// Errors from the completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("API key not configured for {0}")]
    MissingApiKey(String),
}

/// A text-completion backend.
///
/// Implementations must return the content of a single assistant turn.
/// Failures are surfaced as-is; callers decide whether they are fatal.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat completions client.
pub struct ChatCompletionsClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let base_url = base_url.into();
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CompletionError::MissingApiKey(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for ChatCompletionsClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let start = std::time::Instant::now();

        let request_body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        let content = extract_content(&resp_json)?;
        tracing::debug!(
            model,
            messages = messages.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a chat completions response.
///
/// A missing `choices[0].message` is an error. A null or non-string
/// `content` (truncated or filtered output) comes back as an empty reply,
/// which the score policy then treats as a parse failure.
pub fn extract_content(resp_json: &serde_json::Value) -> Result<String, CompletionError> {
    let message = resp_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| CompletionError::ParseError("missing choices[0].message".to_string()))?;

    match message.get("content").and_then(serde_json::Value::as_str) {
        Some(content) => Ok(content.to_string()),
        None => {
            tracing::warn!(
                finish_reason = %resp_json["choices"][0]["finish_reason"],
                "completion has no text content"
            );
            Ok(String::new())
        }
    }
}
