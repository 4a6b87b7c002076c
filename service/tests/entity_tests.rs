//! `/api/entity/{id}` through the full router with mock upstreams.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use civic_roster_api::upstream::{
    congress::{mock::MockCongressClient, BillAction, MemberDetail, PartyHistory, SponsoredBill, Term},
    fec::{mock::MockFecClient, CandidateTotals},
    govinfo::{mock::MockGovInfoClient, SearchResult},
    UpstreamError,
};
use common::app_builder::{get_json, TestAppBuilder};
use serde_json::json;

fn booker() -> MemberDetail {
    MemberDetail {
        bioguide_id: "B001288".into(),
        direct_order_name: Some("Cory A. Booker".into()),
        state: Some("New Jersey".into()),
        party_history: vec![PartyHistory {
            party_name: Some("Democratic".into()),
            start_year: Some(2013),
        }],
        terms: vec![Term {
            chamber: Some("Senate".into()),
            start_year: Some(2013),
            end_year: None,
        }],
        current_member: Some(true),
        ..MemberDetail::default()
    }
}

fn bill(title: Option<&str>, introduced: &str) -> SponsoredBill {
    SponsoredBill {
        congress: Some(118),
        title: title.map(Into::into),
        bill_type: title.map(|_| "S".to_string()),
        number: Some("100".into()),
        introduced_date: Some(introduced.into()),
        latest_action: Some(BillAction {
            action_date: Some(format!("{introduced}T12:00:00Z")),
            text: Some("Referred to the Committee on Finance.".into()),
        }),
        ..SponsoredBill::default()
    }
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let congress = Arc::new(MockCongressClient::new());
    let app = TestAppBuilder::new().with_congress(congress.clone()).build();

    let (status, body) = get_json(app, "/api/entity/B12345").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(congress.get_member_calls().is_empty());
}

#[tokio::test]
async fn test_missing_congress_key_is_config_error() {
    let app = TestAppBuilder::new().build();

    let (status, body) = get_json(app, "/api/entity/B001288").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Congress API key not configured");
}

#[tokio::test]
async fn test_full_aggregate() {
    let congress = Arc::new(MockCongressClient::new());
    congress.set_get_member_result(Ok(booker()));
    congress.set_sponsored_result(Ok(vec![
        bill(Some("Clean Water for All Act"), "2024-02-01"),
        bill(None, "2024-01-15"),
    ]));

    let fec = Arc::new(MockFecClient::new());
    fec.set_totals_result(Ok(Some(CandidateTotals {
        candidate_id: "S4NJ00185".into(),
        cycle: Some(2026),
        receipts: Some(1000.0),
        disbursements: Some(400.0),
        cash_on_hand_end_period: Some(600.0),
        coverage_end_date: Some("2025-06-30T00:00:00".into()),
        ..CandidateTotals::default()
    })));

    let govinfo = Arc::new(MockGovInfoClient::new());
    govinfo.set_search_result(Ok(vec![SearchResult {
        title: Some("WATER INFRASTRUCTURE".into()),
        package_id: Some("CREC-2024-03-05".into()),
        granule_id: Some("CREC-2024-03-05-pt1-PgS2101".into()),
        date_issued: Some("2024-03-05".into()),
        collection_code: Some("CREC".into()),
    }]));

    let app = TestAppBuilder::new()
        .with_congress(congress.clone())
        .with_fec(fec.clone())
        .with_govinfo(govinfo.clone())
        .build();

    let (status, body) = get_json(app, "/api/entity/b001288").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(congress.get_member_calls(), vec!["B001288".to_string()]);

    assert_eq!(body["member"]["name"], "Cory A. Booker");
    assert_eq!(body["member"]["role"], "Senator");
    assert_eq!(body["member"]["party"], "D");
    assert_eq!(body["member"]["state"], "NJ");

    // Untitled amendment dropped; dates normalized
    let bills = body["bills"].as_array().expect("bills");
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0]["title"], "Clean Water for All Act");
    assert_eq!(bills[0]["type"], "S");
    assert_eq!(bills[0]["latestAction"]["actionDate"], "2024-02-01");

    assert_eq!(body["votes"], json!([]));
    assert_eq!(body["funding"]["candidateId"], "S4NJ00185");
    assert_eq!(body["funding"]["coverageEndDate"], "2025-06-30");
    assert_eq!(body["quotes"][0]["date"], "2024-03-05");
    assert_eq!(body["sources"], json!(["congress", "fec", "govinfo"]));

    assert_eq!(
        fec.calls(),
        vec![("Cory A. Booker".to_string(), Some("NJ".to_string()))]
    );
    assert_eq!(
        govinfo.queries(),
        vec!["collection:(CREC) AND \"Cory A. Booker\"".to_string()]
    );
}

#[tokio::test]
async fn test_secondary_failures_degrade_fields() {
    let congress = Arc::new(MockCongressClient::new());
    congress.set_get_member_result(Ok(booker()));
    congress.set_sponsored_result(Err(UpstreamError::ApiError {
        status: 500,
        message: "boom".into(),
    }));

    let fec = Arc::new(MockFecClient::new());
    fec.set_totals_result(Err(UpstreamError::Decode("bad json".into())));

    let govinfo = Arc::new(MockGovInfoClient::new());
    govinfo.set_search_result(Err(UpstreamError::ApiError {
        status: 503,
        message: "down".into(),
    }));

    let app = TestAppBuilder::new()
        .with_congress(congress)
        .with_fec(fec)
        .with_govinfo(govinfo)
        .build();

    let (status, body) = get_json(app, "/api/entity/B001288").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["bioguideId"], "B001288");
    assert_eq!(body["bills"], json!([]));
    assert!(body["funding"].is_null());
    assert_eq!(body["quotes"], json!([]));
    assert_eq!(body["sources"], json!(["congress"]));
}

#[tokio::test]
async fn test_unknown_member_returns_empty_aggregate() {
    let congress = Arc::new(MockCongressClient::new());
    congress.set_sponsored_result(Err(UpstreamError::NotFound("Z999999".into())));
    let fec = Arc::new(MockFecClient::new());

    let app = TestAppBuilder::new()
        .with_congress(congress)
        .with_fec(fec.clone())
        .build();

    let (status, body) = get_json(app, "/api/entity/Z999999").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["member"].is_null());
    assert!(body["funding"].is_null());
    assert_eq!(body["sources"], json!([]));
    // FEC lookup needs the member's name
    assert!(fec.calls().is_empty());
}

#[tokio::test]
async fn test_optional_keys_absent() {
    let congress = Arc::new(MockCongressClient::new());
    congress.set_get_member_result(Ok(booker()));

    let app = TestAppBuilder::new().with_congress(congress).build();

    let (status, body) = get_json(app, "/api/entity/B001288").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["name"], "Cory A. Booker");
    assert!(body["funding"].is_null());
    assert_eq!(body["quotes"], json!([]));
    assert_eq!(body["sources"], json!(["congress"]));
}
