//! Test app builder that wires the production router with mock upstreams.
//!
//! [`TestAppBuilder::build`] goes through `http::app`, the same function
//! `main.rs` uses, so layer ordering, CORS and security headers match
//! production. Only the config and the upstream clients are swapped.
//!
//! # Usage
//!
//! ```ignore
//! let congress = Arc::new(MockCongressClient::new());
//! let app = TestAppBuilder::new()
//!     .with_congress(congress.clone())
//!     .with_cors(&["http://localhost:5173"])
//!     .build();
//!
//! // Use app.oneshot(...) to send requests
//! ```

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use civic_roster_api::{
    ask::ChatBackend,
    config::{Config, SecurityHeadersConfig},
    http,
    state::AppState,
    upstream::{
        congress::CongressApiClient, fec::FecClient, geocoder::GeocoderClient,
        govinfo::GovInfoClient, openstates::OpenStatesClient,
    },
};
use serde_json::Value;
use tower::ServiceExt;

/// Builder for test applications that mirrors `main.rs` wiring.
pub struct TestAppBuilder {
    config: Config,
    state: AppState,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Default config, no upstream keys.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            state: AppState::new(),
        }
    }

    #[must_use]
    pub fn with_congress(mut self, client: Arc<dyn CongressApiClient>) -> Self {
        self.state = self.state.with_congress(client);
        self
    }

    #[must_use]
    pub fn with_openstates(mut self, client: Arc<dyn OpenStatesClient>) -> Self {
        self.state = self.state.with_openstates(client);
        self
    }

    #[must_use]
    pub fn with_fec(mut self, client: Arc<dyn FecClient>) -> Self {
        self.state = self.state.with_fec(client);
        self
    }

    #[must_use]
    pub fn with_govinfo(mut self, client: Arc<dyn GovInfoClient>) -> Self {
        self.state = self.state.with_govinfo(client);
        self
    }

    #[must_use]
    pub fn with_geocoder(mut self, client: Arc<dyn GeocoderClient>) -> Self {
        self.state = self.state.with_geocoder(client);
        self
    }

    #[must_use]
    pub fn with_llm(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.state = self.state.with_llm(backend);
        self
    }

    /// Pass `&["*"]` to allow any origin, an empty slice to block all.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.config.cors.allowed_origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.config.security_headers = config;
        self
    }

    #[must_use]
    pub fn with_swagger(mut self) -> Self {
        self.config.swagger.enabled = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Router {
        http::app(&self.config, self.state)
    }
}

/// Send a request and decode the JSON body (`Value::Null` for empty bodies).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response should be valid JSON")
    };
    (status, json)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}
