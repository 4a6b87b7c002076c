//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! A thin wrapper around `wiremock` for declarative stubbing of the
//! upstream data APIs.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/member")
//!         .with_header("X-API-Key", "test-key")
//!         .respond_with_json(json!({"members": []}))
//!         .mount()
//!         .await;
//!
//!     let client = HttpCongressClient::new(server.url(), "test-key");
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)`
//! - **Error response**: `.respond_with_status(500)`, optionally `.with_json_response(body)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(5))`
//! - **Request verification**: `.expect_times(1)`, checked when the server drops

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL, without a trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying server, for matchers the wrapper does not cover.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    pub fn expect_get(&self, route: &str) -> Expectation<'_> {
        Expectation::new(self, Mock::given(method("GET")).and(path(route)))
    }

    pub fn expect_post(&self, route: &str) -> Expectation<'_> {
        Expectation::new(self, Mock::given(method("POST")).and(path(route)))
    }
}

/// One stubbed route, mounted with [`Expectation::mount`].
pub struct Expectation<'a> {
    server: &'a MockHttpServer,
    builder: MockBuilder,
    status: u16,
    body: Option<Value>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl<'a> Expectation<'a> {
    fn new(server: &'a MockHttpServer, builder: MockBuilder) -> Self {
        Self {
            server,
            builder,
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.and(header(name, value));
        self
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.and(query_param(name, value));
        self
    }

    pub fn with_json_body(mut self, partial: Value) -> Self {
        self.builder = self.builder.and(body_partial_json(partial));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.status = 200;
        self.body = Some(body);
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Body for a non-200 response set with `respond_with_status`.
    pub fn with_json_response(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut template = ResponseTemplate::new(self.status);
        if let Some(body) = self.body {
            template = template.set_body_json(body);
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = self.builder.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(&self.server.server).await;
    }
}
