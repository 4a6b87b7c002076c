//! Congress.gov API client module.
//!
//! - [`CongressApiClient`] - Trait defining API operations
//! - [`HttpCongressClient`] - Real HTTP implementation using reqwest
//! - [`fetch_all_current_members`] - Pagination over the member list
//! - [`mock::MockCongressClient`] - Mock for unit tests (behind `test-utils` feature)
//!
//! # Testing Patterns
//!
//! Use `MockCongressClient` for handler tests and `MockHttpServer` (see
//! `tests/common/http_mock.rs`) to exercise `HttpCongressClient` against
//! stubbed HTTP:
//!
//! ```ignore
//! let server = MockHttpServer::start().await;
//!
//! server
//!     .expect_get("/member/A000360")
//!     .with_header("X-API-Key", "test-key")
//!     .respond_with_json(json!({"member": {"bioguideId": "A000360"}}))
//!     .mount()
//!     .await;
//!
//! let client = HttpCongressClient::new(server.url(), "test-key");
//! let member = client.get_member("A000360").await.unwrap();
//! ```

mod client;
mod types;

pub use client::{
    fetch_all_current_members, CongressApiClient, HttpCongressClient, MEMBER_PAGE_SIZE,
};
pub use types::{
    AddressInformation, BillAction, Depiction, MemberDetail, MemberResponse, MemberSummary,
    MembersPage, Pagination, PartyHistory, PolicyArea, SponsoredBill,
    SponsoredLegislationResponse, Term,
};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
