//! OpenStates v3 client for state legislators.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{send_json, trim_base, UpstreamError};

/// Legislators requested per call; the roster reads a single page.
pub const PEOPLE_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentRole {
    #[serde(default)]
    pub title: Option<String>,
    /// "upper" or "lower"
    #[serde(default)]
    pub org_classification: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jurisdiction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Jurisdiction {
    /// Two-letter code from an OCD id such as
    /// `ocd-jurisdiction/country:us/state:ca/government`.
    #[must_use]
    pub fn state_code(&self) -> Option<String> {
        self.id
            .as_deref()?
            .split('/')
            .find_map(|part| part.strip_prefix("state:"))
            .map(str::to_ascii_uppercase)
    }
}

/// A person from `/people`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    /// OCD person id
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub current_role: Option<CurrentRole>,
    #[serde(default)]
    pub jurisdiction: Option<Jurisdiction>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleResponse {
    #[serde(default)]
    pub results: Vec<Person>,
}

#[async_trait]
pub trait OpenStatesClient: Send + Sync {
    /// Current legislators of one jurisdiction (two-letter state code).
    async fn people(&self, jurisdiction: &str) -> Result<Vec<Person>, UpstreamError>;
}

pub struct HttpOpenStatesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpOpenStatesClient {
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
impl OpenStatesClient for HttpOpenStatesClient {
    async fn people(&self, jurisdiction: &str) -> Result<Vec<Person>, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/people", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .query(&[
                ("jurisdiction", jurisdiction.to_ascii_lowercase()),
                ("per_page", PEOPLE_PAGE_SIZE.to_string()),
                ("page", "1".to_string()),
            ]);
        let response: PeopleResponse = send_json(request, jurisdiction).await?;
        Ok(response.results)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{OpenStatesClient, Person, UpstreamError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the configured result once; unset yields an empty list.
    #[derive(Default)]
    pub struct MockOpenStatesClient {
        result: Mutex<Option<Result<Vec<Person>, UpstreamError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockOpenStatesClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_people_result(&self, result: Result<Vec<Person>, UpstreamError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        /// Jurisdictions passed to `people`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OpenStatesClient for MockOpenStatesClient {
        async fn people(&self, jurisdiction: &str) -> Result<Vec<Person>, UpstreamError> {
            self.calls.lock().unwrap().push(jurisdiction.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
