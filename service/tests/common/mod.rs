//! Common test utilities for integration tests.
//!
//! - [`app_builder::TestAppBuilder`] - the production router with mock upstreams
//! - [`http_mock::MockHttpServer`] - `wiremock` wrapper for HTTP client tests
//! - [`fixtures`] - upstream records shared across test files
//!
//! ```ignore
//! use crate::common::app_builder::{get_json, TestAppBuilder};
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::new().build();
//!     let (status, body) = get_json(app, "/api/roster").await;
//! }
//! ```

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod app_builder;
pub mod http_mock;

pub mod fixtures {
    use civic_roster_api::upstream::congress::{Depiction, MemberSummary, Term};

    pub fn member(id: &str, name: &str, state: &str, chamber: &str, party: &str) -> MemberSummary {
        MemberSummary {
            bioguide_id: id.to_string(),
            name: name.to_string(),
            party_name: Some(party.to_string()),
            state: Some(state.to_string()),
            district: (chamber != "Senate").then_some(1),
            depiction: Some(Depiction {
                image_url: Some(format!("https://www.congress.gov/img/member/{id}.jpg")),
            }),
            terms: vec![Term {
                chamber: Some(chamber.to_string()),
                start_year: Some(2021),
                end_year: None,
            }],
        }
    }
}
