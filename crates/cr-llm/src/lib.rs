//! Chat-completions gateway client.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The gateway
//! reports quota exhaustion (402) and throttling (429) with distinct status
//! codes, which callers usually want to surface to their own clients
//! unchanged, so those get dedicated [`LlmError`] variants.
//!
//! ```ignore
//! use cr_llm::{ChatMessage, LlmClient};
//!
//! let client = LlmClient::new("https://gateway.example.com/v1", "key", "gpt-4o-mini");
//! let completion = client
//!     .chat(&[ChatMessage::system("Be brief."), ChatMessage::user("Hi")], 256)
//!     .await?;
//! println!("{}", completion.content);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`LlmClient::chat`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gateway answered 402
    #[error("LLM quota exceeded")]
    QuotaExceeded,

    /// Gateway answered 429
    #[error("LLM rate limit reached")]
    RateLimited,

    /// Any other non-2xx answer
    #[error("LLM gateway error: {status} - {message}")]
    Api { status: u16, message: String },

    /// 2xx answer without a usable choice
    #[error("LLM gateway returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// Classify a non-success gateway status.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            402 => Self::QuotaExceeded,
            429 => Self::RateLimited,
            _ => Self::Api { status, message },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token accounting reported by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

impl Usage {
    /// Whether the gateway served part of the prompt from its cache.
    #[must_use]
    pub fn cache_hit(&self) -> bool {
        self.prompt_tokens_details
            .as_ref()
            .is_some_and(|d| d.cached_tokens > 0)
    }
}

/// Result of a successful chat call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

/// HTTP client for an OpenAI-compatible gateway.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key, model)
    }

    /// Create a client with a preconfigured `reqwest::Client` (timeouts etc).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a transcript and return the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, non-2xx status, or a
    /// response without content.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature: 0.2,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        let parsed: ChatResponse = response.json().await?;
        let completion = into_completion(parsed, &self.model)?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model = %completion.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                cache_hit = usage.cache_hit(),
                "chat completion finished"
            );
        }

        Ok(completion)
    }
}

fn into_completion(response: ChatResponse, requested_model: &str) -> Result<Completion, LlmError> {
    let content = response
        .choices
        .into_iter()
        .find_map(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(LlmError::EmptyResponse)?;

    Ok(Completion {
        content,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage: response.usage,
    })
}
