//! Congress.gov API client.
//!
//! ```ignore
//! use civic_roster_api::upstream::congress::{CongressApiClient, HttpCongressClient};
//!
//! let client = HttpCongressClient::new("https://api.congress.gov/v3", "my-api-key");
//! let member = client.get_member("A000360").await?;
//! println!("Found: {}", member.display_name());
//! ```

use async_trait::async_trait;

use super::types::{
    MemberDetail, MemberResponse, MemberSummary, MembersPage, SponsoredBill,
    SponsoredLegislationResponse,
};
use crate::upstream::{send_json, trim_base, UpstreamError};

/// Page size for the member list (the API maximum).
pub const MEMBER_PAGE_SIZE: u32 = 250;

/// Trait for Congress API operations.
///
/// Use `HttpCongressClient` for real HTTP calls, or `mock::MockCongressClient`
/// in tests.
#[async_trait]
pub trait CongressApiClient: Send + Sync {
    /// One page of current members.
    async fn list_current_members(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<MembersPage, UpstreamError>;

    /// Get a single member by their Bioguide ID.
    async fn get_member(&self, bioguide_id: &str) -> Result<MemberDetail, UpstreamError>;

    /// Most recent bills sponsored by a member.
    async fn sponsored_legislation(
        &self,
        bioguide_id: &str,
        limit: u32,
    ) -> Result<Vec<SponsoredBill>, UpstreamError>;
}

/// Walk the member list in [`MEMBER_PAGE_SIZE`] pages until the reported
/// total is reached or a page comes back empty.
///
/// # Errors
///
/// Returns the first page error; members collected so far are discarded.
pub async fn fetch_all_current_members(
    client: &dyn CongressApiClient,
) -> Result<Vec<MemberSummary>, UpstreamError> {
    let mut members = Vec::new();
    let mut offset = 0u32;

    loop {
        let page = client
            .list_current_members(offset, MEMBER_PAGE_SIZE)
            .await?;
        let fetched = u32::try_from(page.members.len()).unwrap_or(u32::MAX);
        let total = page.pagination.count;
        members.extend(page.members);
        offset = offset.saturating_add(fetched);

        tracing::debug!(offset, total, "fetched congress member page");

        if fetched == 0 || offset >= total {
            break;
        }
    }

    Ok(members)
}

/// HTTP-based implementation of `CongressApiClient`.
pub struct HttpCongressClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCongressClient {
    /// Create a new client with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client with a custom `reqwest::Client` (for timeouts in tests and prod).
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

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header("X-API-Key", &self.api_key)
            .query(&[("format", "json")])
    }
}

#[async_trait]
impl CongressApiClient for HttpCongressClient {
    async fn list_current_members(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<MembersPage, UpstreamError> {
        let request = self.get("/member").query(&[
            ("currentMember", "true".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ]);
        send_json(request, "member list").await
    }

    async fn get_member(&self, bioguide_id: &str) -> Result<MemberDetail, UpstreamError> {
        let path = format!("/member/{}", urlencoding::encode(bioguide_id));
        let response: MemberResponse = send_json(self.get(&path), bioguide_id).await?;
        Ok(response.member)
    }

    async fn sponsored_legislation(
        &self,
        bioguide_id: &str,
        limit: u32,
    ) -> Result<Vec<SponsoredBill>, UpstreamError> {
        let path = format!(
            "/member/{}/sponsored-legislation",
            urlencoding::encode(bioguide_id)
        );
        let request = self.get(&path).query(&[("limit", limit)]);
        let response: SponsoredLegislationResponse = send_json(request, bioguide_id).await?;
        Ok(response.sponsored_legislation)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{CongressApiClient, MemberDetail, MemberSummary, MembersPage, SponsoredBill};
    use crate::upstream::congress::types::Pagination;
    use crate::upstream::UpstreamError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock implementation of `CongressApiClient`.
    ///
    /// The member list is served in pages sliced from `set_members`, so
    /// pagination is exercised realistically. Single results follow the
    /// take-once pattern: set before the call, unset falls back to a
    /// `NotFound` error (or an empty list for legislation).
    pub struct MockCongressClient {
        members: Mutex<Vec<MemberSummary>>,
        list_error: Mutex<Option<UpstreamError>>,
        get_member_result: Mutex<Option<Result<MemberDetail, UpstreamError>>>,
        sponsored_result: Mutex<Option<Result<Vec<SponsoredBill>, UpstreamError>>>,
        list_calls: Mutex<Vec<(u32, u32)>>,
        get_member_calls: Mutex<Vec<String>>,
    }

    impl MockCongressClient {
        pub fn new() -> Self {
            Self {
                members: Mutex::new(Vec::new()),
                list_error: Mutex::new(None),
                get_member_result: Mutex::new(None),
                sponsored_result: Mutex::new(None),
                list_calls: Mutex::new(Vec::new()),
                get_member_calls: Mutex::new(Vec::new()),
            }
        }

        /// Members served by `list_current_members`.
        pub fn set_members(&self, members: Vec<MemberSummary>) {
            *self.members.lock().unwrap() = members;
        }

        /// Make the next `list_current_members` call fail.
        pub fn fail_list(&self, error: UpstreamError) {
            *self.list_error.lock().unwrap() = Some(error);
        }

        /// Set the result for `get_member` calls.
        pub fn set_get_member_result(&self, result: Result<MemberDetail, UpstreamError>) {
            *self.get_member_result.lock().unwrap() = Some(result);
        }

        /// Set the result for `sponsored_legislation` calls.
        pub fn set_sponsored_result(&self, result: Result<Vec<SponsoredBill>, UpstreamError>) {
            *self.sponsored_result.lock().unwrap() = Some(result);
        }

        /// `(offset, limit)` of every list call.
        pub fn list_calls(&self) -> Vec<(u32, u32)> {
            self.list_calls.lock().unwrap().clone()
        }

        /// Get all IDs passed to `get_member`.
        pub fn get_member_calls(&self) -> Vec<String> {
            self.get_member_calls.lock().unwrap().clone()
        }
    }

    impl Default for MockCongressClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CongressApiClient for MockCongressClient {
        async fn list_current_members(
            &self,
            offset: u32,
            limit: u32,
        ) -> Result<MembersPage, UpstreamError> {
            self.list_calls.lock().unwrap().push((offset, limit));

            if let Some(err) = self.list_error.lock().unwrap().take() {
                return Err(err);
            }

            let members = self.members.lock().unwrap();
            let start = (offset as usize).min(members.len());
            let end = (start + limit as usize).min(members.len());
            Ok(MembersPage {
                members: members[start..end].to_vec(),
                pagination: Pagination {
                    count: u32::try_from(members.len()).unwrap(),
                },
            })
        }

        async fn get_member(&self, bioguide_id: &str) -> Result<MemberDetail, UpstreamError> {
            self.get_member_calls
                .lock()
                .unwrap()
                .push(bioguide_id.to_string());

            self.get_member_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(UpstreamError::NotFound(bioguide_id.to_string())))
        }

        async fn sponsored_legislation(
            &self,
            _bioguide_id: &str,
            _limit: u32,
        ) -> Result<Vec<SponsoredBill>, UpstreamError> {
            self.sponsored_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
