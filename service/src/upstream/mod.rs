//! Clients for the third-party data APIs the roster proxies.
//!
//! Each upstream follows the same layout:
//!
//! - a `*Client` trait (`async_trait`, `Send + Sync`) so handlers can take
//!   `Arc<dyn ...>` and tests can inject mocks
//! - an `Http*Client` implementation over `reqwest`
//! - a `mock` module behind the `test-utils` feature
//!
//! All of them share [`UpstreamError`] and the [`send_json`] helper, which
//! maps 404 to `NotFound`, other non-2xx to `ApiError` and body decode failures to
//! `Decode`.

pub mod congress;
pub mod fec;
pub mod geocoder;
pub mod govinfo;
pub mod openstates;

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling an upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Requested resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Build the shared `reqwest::Client` used by every upstream.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("civic-roster/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a request and decode a JSON body.
///
/// `resource` names what was asked for, for `NotFound` messages.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    resource: &str,
) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamError::NotFound(resource.to_string()));
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(UpstreamError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
}

pub(crate) fn trim_base(url: impl Into<String>) -> String {
    url.into().trim_end_matches('/').to_string()
}

/// Accept strings, numbers or null for loosely typed upstream fields.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
