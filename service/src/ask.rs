//! Scoped civic Q&A backed by the LLM gateway.

use async_trait::async_trait;
use axum::{extract::rejection::JsonRejection, Extension, Json};
use cr_llm::{ChatMessage, Completion, LlmClient, LlmError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

pub const MAX_QUESTION_CHARS: usize = 500;
const MAX_CONTEXT_FIELD_CHARS: usize = 100;

const SYSTEM_PROMPT: &str = "You are a nonpartisan civic information assistant for a public \
directory of U.S. elected officials. Answer only questions about U.S. government, elections, \
legislation and public officials. If a question is outside that scope, reply that you can only \
help with civic topics. Do not give voting recommendations or speculate about private lives. \
Keep answers under 200 words.";

/// Chat backend seam so handlers can be tested without a gateway.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, LlmError>;
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        self.chat(messages, max_tokens).await
    }
}

/// Official the user is currently looking at.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AskEntity {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub entity: Option<AskEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
    pub model: String,
}

fn clip(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}

fn context_line(entity: &AskEntity) -> Option<String> {
    let name = clip(&entity.name, MAX_CONTEXT_FIELD_CHARS);
    if name.is_empty() {
        return None;
    }
    let details: Vec<String> = [&entity.role, &entity.party, &entity.state]
        .into_iter()
        .flatten()
        .map(|v| clip(v, MAX_CONTEXT_FIELD_CHARS))
        .filter(|v| !v.is_empty())
        .collect();

    Some(if details.is_empty() {
        format!("The user is viewing the profile of {name}.")
    } else {
        format!(
            "The user is viewing the profile of {name} ({}).",
            details.join(", ")
        )
    })
}

/// Build the gateway transcript for a validated request.
///
/// # Errors
///
/// Returns `BadRequest` for a blank or over-long question.
pub fn build_messages(request: &AskRequest) -> Result<Vec<ChatMessage>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question is required".into()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::BadRequest(format!(
            "question must be at most {MAX_QUESTION_CHARS} characters"
        )));
    }

    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
    if let Some(line) = request.entity.as_ref().and_then(context_line) {
        messages.push(ChatMessage::system(line));
    }
    messages.push(ChatMessage::user(question));
    Ok(messages)
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::QuotaExceeded => Self::QuotaExceeded,
            LlmError::RateLimited => Self::RateLimited,
            LlmError::Api { status, .. } => Self::Upstream {
                service: "llm",
                status: Some(status),
            },
            LlmError::Request(e) => {
                tracing::warn!(error = %e, "llm gateway request failed");
                Self::Upstream {
                    service: "llm",
                    status: None,
                }
            }
            LlmError::EmptyResponse => Self::Internal("llm gateway returned no content".into()),
        }
    }
}

/// Ask a civic question
///
/// Answers are confined to U.S. civic topics and, optionally, to the
/// official the user is viewing.
///
/// # Errors
///
/// 400 for a bad question, 500 when no LLM key is configured, 402/429 when
/// the gateway reports quota or throttling, 502 for other gateway failures.
#[utoipa::path(
    post,
    path = "/ask",
    tag = "Assistant",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer generated", body = AskResponse),
        (status = 400, description = "Invalid question", body = ErrorResponse),
        (status = 402, description = "Quota exceeded", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse),
        (status = 500, description = "LLM key not configured", body = ErrorResponse),
        (status = 502, description = "Gateway failure", body = ErrorResponse)
    )
)]
pub async fn ask(
    Extension(state): Extension<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload?;
    let messages = build_messages(&request)?;
    let backend = state.llm.clone().ok_or_else(|| ApiError::missing_key("LLM"))?;

    let completion = backend.complete(&messages, state.llm_max_tokens).await?;
    tracing::info!(model = %completion.model, "answered civic question");

    Ok(Json(AskResponse {
        answer: completion.content,
        model: completion.model,
    }))
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Mock chat backend.

    use super::{ChatBackend, ChatMessage, Completion, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the configured result once; unset echoes a fixed answer.
    #[derive(Default)]
    pub struct MockChatBackend {
        result: Mutex<Option<Result<Completion, LlmError>>>,
        transcripts: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl MockChatBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_result(&self, result: Result<Completion, LlmError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        /// Every transcript sent so far.
        pub fn transcripts(&self) -> Vec<Vec<ChatMessage>> {
            self.transcripts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for MockChatBackend {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _max_tokens: u32,
        ) -> Result<Completion, LlmError> {
            self.transcripts.lock().unwrap().push(messages.to_vec());
            self.result.lock().unwrap().take().unwrap_or_else(|| {
                Ok(Completion {
                    content: "mock answer".into(),
                    model: "mock-model".into(),
                    usage: None,
                })
            })
        }
    }
}
