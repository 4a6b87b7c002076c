//! API error type and its JSON representation.
//!
//! Every handler returns `Result<Json<T>, ApiError>`. The body is always
//! `{"error": "..."}`; internal details are logged, never returned.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input
    #[error("{0}")]
    BadRequest(String),

    /// A required upstream credential is not configured
    #[error("{0}")]
    Config(String),

    /// Upstream failed; `status` is absent when no HTTP response arrived
    #[error("Upstream service error")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
    },

    /// LLM gateway quota exhausted
    #[error("Usage quota exceeded, please try again later")]
    QuotaExceeded,

    /// LLM gateway throttling
    #[error("Too many requests, please slow down")]
    RateLimited,

    /// Anything else; the detail is only logged
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Config error for a required key that is not set.
    #[must_use]
    pub fn missing_key(service: &str) -> Self {
        Self::Config(format!("{service} API key not configured"))
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => tracing::error!(%detail, "internal error"),
            Self::Config(detail) => tracing::error!(%detail, "configuration error"),
            Self::Upstream { service, status } => {
                tracing::warn!(service, status, "upstream call failed");
            }
            _ => {}
        }

        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
