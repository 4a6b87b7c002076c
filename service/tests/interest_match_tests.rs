//! `POST /api/interest-match` through the full router.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::app_builder::{post_json, send, TestAppBuilder};
use serde_json::{json, Value};

#[tokio::test]
async fn test_empty_interests_rejected() {
    let app = TestAppBuilder::new().build();

    let (status, body) = post_json(app, "/api/interest-match", &json!({"interests": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "interests must be a non-empty array");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = TestAppBuilder::new().build();

    let request = Request::builder()
        .method("POST")
        .uri("/api/interest-match")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_interests_field_rejected() {
    let app = TestAppBuilder::new().build();

    let (status, _) = post_json(app, "/api/interest-match", &json!({"bills": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_array_inputs_rejected() {
    let payloads = [
        json!({"interests": ["x"], "bills": "nope"}),
        json!({"interests": ["x"], "votes": {"question": "On Passage"}}),
        json!({"interests": "healthcare"}),
    ];

    for payload in payloads {
        let app = TestAppBuilder::new().build();
        let (status, body) = post_json(app, "/api/interest-match", &payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["error"].is_string(), "{payload}");
    }
}

#[tokio::test]
async fn test_bills_and_votes_matched_per_interest() {
    let app = TestAppBuilder::new().build();

    let payload = json!({
        "interests": ["healthcare", "clean water"],
        "bills": [
            {"title": "Healthcare Affordability Act", "type": "HR", "number": "12",
             "introducedDate": "2024-01-09T00:00:00Z",
             "latestAction": {"actionDate": "2024-02-01", "text": "Referred to committee"}},
            {"title": "Clean Water Infrastructure Act", "type": "S", "number": 7},
            {"title": "Defense Authorization", "type": "HR", "number": "2"}
        ],
        "votes": [
            {"question": "On Passage of the Clean Water Act", "billNumber": "S 7",
             "result": "Passed", "date": "2024-03-01"}
        ]
    });

    let (status, body) = post_json(app, "/api/interest-match", &payload).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);

    let health = &results[0];
    assert_eq!(health["interest"], "healthcare");
    assert_eq!(health["bills"][0]["title"], "Healthcare Affordability Act");
    assert_eq!(health["bills"][0]["type"], "bill");
    assert_eq!(health["bills"][0]["date"], "2024-01-09");
    assert_eq!(
        health["bills"][0]["description"],
        "HR 12: Referred to committee"
    );
    assert_eq!(health["votes"], json!([]));

    let water = &results[1];
    assert_eq!(water["bills"][0]["title"], "Clean Water Infrastructure Act");
    assert_eq!(water["bills"][0]["score"], 2);
    assert_eq!(water["votes"][0]["type"], "vote");
    assert_eq!(water["votes"][0]["description"], "S 7 - Passed");
    assert_eq!(water["totalMatches"], 2);

    assert_eq!(body["totalMatches"], 3);
}

#[tokio::test]
async fn test_per_category_cap() {
    let app = TestAppBuilder::new().build();

    let bills: Vec<Value> = (0..9)
        .map(|i| json!({"title": format!("Tax Relief Act {i}"), "number": i}))
        .collect();
    let payload = json!({"interests": ["tax"], "bills": bills});

    let (status, body) = post_json(app, "/api/interest-match", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["bills"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["results"][0]["totalMatches"], 9);
}
