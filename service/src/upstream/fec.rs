//! OpenFEC client for candidate financial totals.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{send_json, trim_base, UpstreamError};

/// Totals for one candidate and election cycle from `/candidates/totals/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateTotals {
    pub candidate_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub cycle: Option<u32>,
    #[serde(default)]
    pub receipts: Option<f64>,
    #[serde(default)]
    pub disbursements: Option<f64>,
    #[serde(default)]
    pub cash_on_hand_end_period: Option<f64>,
    #[serde(default)]
    pub coverage_end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotalsResponse {
    #[serde(default)]
    pub results: Vec<CandidateTotals>,
}

#[async_trait]
pub trait FecClient: Send + Sync {
    /// Most recent cycle totals for the best name match in `state`, if any.
    async fn candidate_totals(
        &self,
        name: &str,
        state: Option<&str>,
    ) -> Result<Option<CandidateTotals>, UpstreamError>;
}

pub struct HttpFecClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFecClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl FecClient for HttpFecClient {
    async fn candidate_totals(
        &self,
        name: &str,
        state: Option<&str>,
    ) -> Result<Option<CandidateTotals>, UpstreamError> {
        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("q", name.to_string()),
            ("sort", "-cycle".to_string()),
            ("per_page", "1".to_string()),
        ];
        if let Some(state) = state {
            query.push(("state", state.to_string()));
        }

        let request = self
            .client
            .get(format!("{}/candidates/totals/", self.base_url))
            .query(&query);
        let response: TotalsResponse = send_json(request, name).await?;
        Ok(response.results.into_iter().next())
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{CandidateTotals, FecClient, UpstreamError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the configured result once; unset yields `Ok(None)`.
    #[derive(Default)]
    pub struct MockFecClient {
        result: Mutex<Option<Result<Option<CandidateTotals>, UpstreamError>>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockFecClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_totals_result(&self, result: Result<Option<CandidateTotals>, UpstreamError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        /// `(name, state)` of every call.
        pub fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FecClient for MockFecClient {
        async fn candidate_totals(
            &self,
            name: &str,
            state: Option<&str>,
        ) -> Result<Option<CandidateTotals>, UpstreamError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), state.map(String::from)));
            self.result.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }
}
