//! REST routes and `OpenAPI` documentation.
//!
//! Every endpoint lives under `/api`; the aggregators are in their own
//! modules and the interest matcher handler is here since it has no upstream.

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use axum::{
    extract::rejection::JsonRejection,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::ask::{self, AskEntity, AskRequest, AskResponse};
use crate::entity::{
    self, EntityBill, EntityDetailResponse, EntityMember, EntityVote, Funding, Quote,
};
use crate::error::{ApiError, ErrorResponse};
use crate::geocoder::{
    self, CongressionalInfo, GeocoderResponse, LegislativeChamber, LocalInfo, Location,
    Representative, StateOfficial,
};
use crate::matching::{
    match_interests, BillInput, InterestMatch, InterestMatchRequest, InterestMatchResponse,
    ItemKind, LatestAction, RelevantItem, VoteInput,
};
use crate::roster::{self, Chamber, ChamberCounts, RosterEntity, RosterResponse, Source};
use crate::upstream::congress::BillAction;

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Civic Roster API",
        version = "1.0.0",
        description = "Directory of U.S. elected officials backed by Congress.gov, OpenStates, FEC, GovInfo and a geocoder",
        license(name = "MIT")
    ),
    servers(
        (url = "/api", description = "REST API")
    ),
    paths(
        roster::get_roster,
        entity::get_entity,
        geocoder::get_geocoder,
        post_interest_match,
        ask::ask
    ),
    components(schemas(
        ErrorResponse,
        Chamber,
        Source,
        RosterEntity,
        ChamberCounts,
        RosterResponse,
        EntityMember,
        EntityBill,
        EntityVote,
        BillAction,
        Funding,
        Quote,
        EntityDetailResponse,
        Location,
        CongressionalInfo,
        Representative,
        LegislativeChamber,
        StateOfficial,
        LocalInfo,
        GeocoderResponse,
        LatestAction,
        BillInput,
        VoteInput,
        InterestMatchRequest,
        ItemKind,
        RelevantItem,
        InterestMatch,
        InterestMatchResponse,
        AskEntity,
        AskRequest,
        AskResponse
    ))
)]
pub struct ApiDoc;

/// Match bills and votes to interests
///
/// Scores each bill and vote against every interest by keyword containment
/// and returns the five best of each per interest.
///
/// # Errors
///
/// 400 for a malformed body or an empty interest list.
#[utoipa::path(
    post,
    path = "/interest-match",
    tag = "Matching",
    request_body = InterestMatchRequest,
    responses(
        (status = 200, description = "Per-interest matches", body = InterestMatchResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn post_interest_match(
    payload: Result<Json<InterestMatchRequest>, JsonRejection>,
) -> Result<Json<InterestMatchResponse>, ApiError> {
    let Json(request) = payload?;
    let response = match_interests(&request)?;
    tracing::debug!(
        interests = response.results.len(),
        total_matches = response.total_matches,
        "interest match scored"
    );
    Ok(Json(response))
}

/// Routes for `/api`. Handlers expect an `Extension<AppState>` layer.
pub fn router() -> Router {
    Router::new()
        .route("/roster", get(roster::get_roster))
        .route("/entity/{bioguide_id}", get(entity::get_entity))
        .route("/geocoder", get(geocoder::get_geocoder))
        .route("/interest-match", post(post_interest_match))
        .route("/ask", post(ask::ask))
}
