//! GovInfo search client, used for Congressional Record mentions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{send_json, trim_base, UpstreamError};

/// One hit from the `/search` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub granule_id: Option<String>,
    #[serde(default)]
    pub date_issued: Option<String>,
    #[serde(default)]
    pub collection_code: Option<String>,
}

impl SearchResult {
    /// Public details page for the granule (or package).
    #[must_use]
    pub fn details_url(&self) -> Option<String> {
        let package = self.package_id.as_deref()?;
        Some(match self.granule_id.as_deref() {
            Some(granule) => format!("https://www.govinfo.gov/app/details/{package}/{granule}"),
            None => format!("https://www.govinfo.gov/app/details/{package}"),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    page_size: u32,
    offset_mark: &'static str,
    sorts: [Sort; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Sort {
    field: &'static str,
    sort_order: &'static str,
}

/// Congressional Record query for exact mentions of `name`.
#[must_use]
pub fn congressional_record_query(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| *c != '"').collect();
    format!("collection:(CREC) AND \"{cleaned}\"")
}

#[async_trait]
pub trait GovInfoClient: Send + Sync {
    /// Newest-first search results for a GovInfo query string.
    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<SearchResult>, UpstreamError>;
}

pub struct HttpGovInfoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGovInfoClient {
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
impl GovInfoClient for HttpGovInfoClient {
    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<SearchResult>, UpstreamError> {
        let body = SearchRequest {
            query,
            page_size,
            offset_mark: "*",
            sorts: [Sort {
                field: "publishdate",
                sort_order: "DESC",
            }],
        };
        let request = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .json(&body);
        let response: SearchResponse = send_json(request, "search").await?;
        Ok(response.results)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{GovInfoClient, SearchResult, UpstreamError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the configured result once; unset yields an empty list.
    #[derive(Default)]
    pub struct MockGovInfoClient {
        result: Mutex<Option<Result<Vec<SearchResult>, UpstreamError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl MockGovInfoClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_search_result(&self, result: Result<Vec<SearchResult>, UpstreamError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GovInfoClient for MockGovInfoClient {
        async fn search(
            &self,
            query: &str,
            _page_size: u32,
        ) -> Result<Vec<SearchResult>, UpstreamError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
