//! Per-process handler dependencies.
//!
//! Each upstream is `Some` only when its API key is configured; handlers
//! decide whether a `None` is fatal or degrades a field.

use std::sync::Arc;
use std::time::Duration;

use cr_llm::LlmClient;

use crate::ask::ChatBackend;
use crate::config::Config;
use crate::upstream::{
    build_http_client,
    congress::{CongressApiClient, HttpCongressClient},
    fec::{FecClient, HttpFecClient},
    geocoder::{GeocoderClient, HttpGeocoderClient},
    govinfo::{GovInfoClient, HttpGovInfoClient},
    openstates::{HttpOpenStatesClient, OpenStatesClient},
};

const DEFAULT_LLM_MAX_TOKENS: u32 = 600;

#[derive(Clone)]
pub struct AppState {
    pub congress: Option<Arc<dyn CongressApiClient>>,
    pub openstates: Option<Arc<dyn OpenStatesClient>>,
    pub fec: Option<Arc<dyn FecClient>>,
    pub govinfo: Option<Arc<dyn GovInfoClient>>,
    pub geocoder: Option<Arc<dyn GeocoderClient>>,
    pub llm: Option<Arc<dyn ChatBackend>>,
    pub llm_max_tokens: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with no upstream configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            congress: None,
            openstates: None,
            fec: None,
            govinfo: None,
            geocoder: None,
            llm: None,
            llm_max_tokens: DEFAULT_LLM_MAX_TOKENS,
        }
    }

    /// Wire HTTP clients for every upstream whose key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the shared HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = build_http_client(Duration::from_secs(config.upstream.timeout_secs))?;
        let upstream = &config.upstream;
        let keys = &config.api_keys;

        let state = Self {
            congress: keys.congress().map(|key| {
                Arc::new(HttpCongressClient::with_client(
                    http.clone(),
                    &upstream.congress_url,
                    key,
                )) as Arc<dyn CongressApiClient>
            }),
            openstates: keys.openstates().map(|key| {
                Arc::new(HttpOpenStatesClient::with_client(
                    http.clone(),
                    &upstream.openstates_url,
                    key,
                )) as Arc<dyn OpenStatesClient>
            }),
            fec: keys.fec().map(|key| {
                Arc::new(HttpFecClient::with_client(http.clone(), &upstream.fec_url, key))
                    as Arc<dyn FecClient>
            }),
            govinfo: keys.govinfo().map(|key| {
                Arc::new(HttpGovInfoClient::with_client(
                    http.clone(),
                    &upstream.govinfo_url,
                    key,
                )) as Arc<dyn GovInfoClient>
            }),
            geocoder: keys.geocoder().map(|key| {
                Arc::new(HttpGeocoderClient::with_client(
                    http.clone(),
                    &upstream.geocoder_url,
                    key,
                )) as Arc<dyn GeocoderClient>
            }),
            llm: keys.llm().map(|key| {
                Arc::new(LlmClient::with_client(
                    http.clone(),
                    &upstream.llm_url,
                    key,
                    &config.llm.model,
                )) as Arc<dyn ChatBackend>
            }),
            llm_max_tokens: config.llm.max_tokens,
        };

        tracing::info!(
            congress = state.congress.is_some(),
            openstates = state.openstates.is_some(),
            fec = state.fec.is_some(),
            govinfo = state.govinfo.is_some(),
            geocoder = state.geocoder.is_some(),
            llm = state.llm.is_some(),
            "upstream clients configured"
        );

        Ok(state)
    }

    #[must_use]
    pub fn with_congress(mut self, client: Arc<dyn CongressApiClient>) -> Self {
        self.congress = Some(client);
        self
    }

    #[must_use]
    pub fn with_openstates(mut self, client: Arc<dyn OpenStatesClient>) -> Self {
        self.openstates = Some(client);
        self
    }

    #[must_use]
    pub fn with_fec(mut self, client: Arc<dyn FecClient>) -> Self {
        self.fec = Some(client);
        self
    }

    #[must_use]
    pub fn with_govinfo(mut self, client: Arc<dyn GovInfoClient>) -> Self {
        self.govinfo = Some(client);
        self
    }

    #[must_use]
    pub fn with_geocoder(mut self, client: Arc<dyn GeocoderClient>) -> Self {
        self.geocoder = Some(client);
        self
    }

    #[must_use]
    pub fn with_llm(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.llm = Some(backend);
        self
    }
}
