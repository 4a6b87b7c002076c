//! Per-official aggregate: member detail, sponsored bills, campaign finance
//! totals and Congressional Record mentions.
//!
//! Only the Congress key is required. Every other piece degrades to an empty
//! field when its key is missing or its call fails.

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorResponse};
use crate::matching::normalize_date;
use crate::roster::{federal_role, party_code};
use crate::state::AppState;
use crate::states;
use crate::upstream::{
    congress::{BillAction, CongressApiClient, MemberDetail, SponsoredBill},
    fec::{CandidateTotals, FecClient},
    govinfo::{congressional_record_query, GovInfoClient, SearchResult},
};

/// Sponsored bills requested per entity.
pub const SPONSORED_BILL_LIMIT: u32 = 20;
/// Congressional Record mentions requested per entity.
pub const QUOTE_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityMember {
    pub bioguide_id: String,
    pub name: String,
    pub role: String,
    pub party: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    pub current_member: bool,
}

/// Sponsored bill, shaped so it can be posted back to `/interest-match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityBill {
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub bill_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_action: Option<BillAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityVote {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Funding {
    pub candidate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<u32>,
    pub receipts: f64,
    pub disbursements: f64,
    pub cash_on_hand: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityDetailResponse {
    pub member: Option<EntityMember>,
    pub bills: Vec<EntityBill>,
    /// Roll-call positions; Congress.gov has no per-member vote feed
    pub votes: Vec<EntityVote>,
    pub funding: Option<Funding>,
    pub quotes: Vec<Quote>,
    pub sources: Vec<String>,
}

/// Upper-case and check the `^[A-Z][0-9]{6}$` Bioguide shape.
///
/// # Errors
///
/// Returns `BadRequest` for any other shape.
pub fn parse_bioguide_id(raw: &str) -> Result<String, ApiError> {
    let id = raw.trim().to_ascii_uppercase();
    let mut chars = id.chars();
    let valid = id.len() == 7
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_digit());
    if valid {
        Ok(id)
    } else {
        Err(ApiError::BadRequest(
            "bioguide ID must be one letter followed by six digits".into(),
        ))
    }
}

impl From<MemberDetail> for EntityMember {
    fn from(detail: MemberDetail) -> Self {
        let name = detail.display_name();
        let role = federal_role(detail.latest_chamber()).to_string();
        let party = detail.current_party().map(party_code).unwrap_or_default();
        let state = detail
            .state
            .as_deref()
            .map(|s| states::to_code(s).map_or_else(|| s.to_string(), str::to_string))
            .unwrap_or_default();
        let (phone, office) = detail
            .address_information
            .map(|a| (a.phone_number, a.office_address))
            .unwrap_or_default();

        Self {
            bioguide_id: detail.bioguide_id,
            name,
            role,
            party,
            state,
            district: detail.district.map(|d| d.to_string()),
            photo_url: detail.depiction.and_then(|d| d.image_url),
            website: detail.official_website_url,
            phone,
            office,
            current_member: detail.current_member.unwrap_or(true),
        }
    }
}

/// Drop untitled entries (amendments) and normalize dates.
fn bill_from_sponsored(bill: SponsoredBill) -> Option<EntityBill> {
    let title = bill.title.filter(|t| !t.trim().is_empty())?;
    let latest_action = bill.latest_action.map(|action| BillAction {
        action_date: normalize_date(action.action_date.as_deref()),
        text: action.text,
    });

    Some(EntityBill {
        title,
        bill_type: bill.bill_type,
        number: bill.number,
        congress: bill.congress,
        introduced_date: normalize_date(bill.introduced_date.as_deref()),
        latest_action,
        policy_area: bill.policy_area.and_then(|p| p.name),
        url: bill.url,
    })
}

impl From<CandidateTotals> for Funding {
    fn from(totals: CandidateTotals) -> Self {
        Self {
            candidate_id: totals.candidate_id,
            cycle: totals.cycle,
            receipts: totals.receipts.unwrap_or_default(),
            disbursements: totals.disbursements.unwrap_or_default(),
            cash_on_hand: totals.cash_on_hand_end_period.unwrap_or_default(),
            coverage_end_date: normalize_date(totals.coverage_end_date.as_deref()),
        }
    }
}

fn quote_from_result(result: SearchResult) -> Quote {
    let url = result.details_url();
    Quote {
        title: result.title.unwrap_or_else(|| "Congressional Record".into()),
        date: normalize_date(result.date_issued.as_deref()),
        url,
        source: "Congressional Record".into(),
    }
}

async fn fetch_bills(client: Arc<dyn CongressApiClient>, id: String) -> Option<Vec<EntityBill>> {
    match client.sponsored_legislation(&id, SPONSORED_BILL_LIMIT).await {
        Ok(bills) => Some(bills.into_iter().filter_map(bill_from_sponsored).collect()),
        Err(err) => {
            tracing::warn!(upstream = "congress", bioguide_id = %id, error = %err, "sponsored legislation fetch failed");
            None
        }
    }
}

async fn fetch_funding(
    client: Option<Arc<dyn FecClient>>,
    member: &EntityMember,
) -> Option<Funding> {
    let client = client?;
    let state = Some(member.state.as_str()).filter(|s| !s.is_empty());
    match client.candidate_totals(&member.name, state).await {
        Ok(totals) => totals.map(Funding::from),
        Err(err) => {
            tracing::warn!(upstream = "fec", error = %err, "candidate totals fetch failed");
            None
        }
    }
}

async fn fetch_quotes(
    client: Option<Arc<dyn GovInfoClient>>,
    member: &EntityMember,
) -> Option<Vec<Quote>> {
    let client = client?;
    let query = congressional_record_query(&member.name);
    match client.search(&query, QUOTE_LIMIT).await {
        Ok(results) => Some(results.into_iter().map(quote_from_result).collect()),
        Err(err) => {
            tracing::warn!(upstream = "govinfo", error = %err, "congressional record search failed");
            None
        }
    }
}

/// Member detail followed by the lookups that need the member's name.
async fn fetch_member_and_dependents(
    state: &AppState,
    congress: Arc<dyn CongressApiClient>,
    id: &str,
) -> (Option<EntityMember>, Option<Funding>, Option<Vec<Quote>>) {
    let member = match congress.get_member(id).await {
        Ok(detail) => EntityMember::from(detail),
        Err(err) => {
            tracing::warn!(upstream = "congress", bioguide_id = %id, error = %err, "member detail fetch failed");
            return (None, None, None);
        }
    };

    let (funding, quotes) = tokio::join!(
        fetch_funding(state.fec.clone(), &member),
        fetch_quotes(state.govinfo.clone(), &member),
    );
    (Some(member), funding, quotes)
}

/// Get official detail
///
/// Combines Congress.gov member detail and sponsored legislation with FEC
/// totals and GovInfo Congressional Record mentions. Partial results are
/// returned when secondary upstreams fail.
///
/// # Errors
///
/// 400 for a malformed Bioguide ID, 500 when the Congress key is missing.
#[utoipa::path(
    get,
    path = "/entity/{bioguide_id}",
    tag = "Entity",
    params(("bioguide_id" = String, Path, description = "Bioguide ID, e.g. A000360")),
    responses(
        (status = 200, description = "Entity detail (possibly partial)", body = EntityDetailResponse),
        (status = 400, description = "Invalid Bioguide ID", body = ErrorResponse),
        (status = 500, description = "Congress API key not configured", body = ErrorResponse)
    )
)]
pub async fn get_entity(
    Extension(state): Extension<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<EntityDetailResponse>, ApiError> {
    let id = parse_bioguide_id(&raw_id)?;
    let congress = state
        .congress
        .clone()
        .ok_or_else(|| ApiError::missing_key("Congress"))?;

    let ((member, funding, quotes), bills) = tokio::join!(
        fetch_member_and_dependents(&state, congress.clone(), &id),
        fetch_bills(congress, id.clone()),
    );

    let mut sources = Vec::new();
    if member.is_some() || bills.is_some() {
        sources.push("congress".to_string());
    }
    if funding.is_some() {
        sources.push("fec".to_string());
    }
    if quotes.as_ref().is_some_and(|q| !q.is_empty()) {
        sources.push("govinfo".to_string());
    }

    let response = EntityDetailResponse {
        member,
        bills: bills.unwrap_or_default(),
        votes: Vec::new(),
        funding,
        quotes: quotes.unwrap_or_default(),
        sources,
    };
    tracing::info!(
        bioguide_id = %id,
        bills = response.bills.len(),
        quotes = response.quotes.len(),
        funding = response.funding.is_some(),
        "entity assembled"
    );
    Ok(Json(response))
}
