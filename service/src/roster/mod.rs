//! Unified roster of federal, state, executive and local officials.
//!
//! Four disjoint sources are merged into one flat list, in this order:
//! Congress.gov members, OpenStates legislators, curated governors, curated
//! mayors. IDs are only unique per source; no cross-source identity
//! resolution is attempted.

pub mod curated;

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;
use crate::states;
use crate::upstream::{
    congress::{fetch_all_current_members, CongressApiClient, MemberSummary},
    openstates::{OpenStatesClient, Person},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Chamber {
    Federal,
    State,
    Executive,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Congress,
    Openstates,
    Curated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntity {
    /// Source-qualified id: bioguide ID, OpenStates person ID, or curated slug
    pub id: String,
    pub name: String,
    pub role: String,
    pub chamber: Chamber,
    pub party: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bioguide_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChamberCounts {
    pub federal: usize,
    pub state: usize,
    pub executive: usize,
    pub local: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResponse {
    pub entities: Vec<RosterEntity>,
    pub counts: ChamberCounts,
    /// Sources that contributed entries
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Two-letter state code; narrows every source and enables state legislators
    pub state: Option<String>,
}

/// "D"/"R"/"I" from a party name; other parties keep their first letter.
#[must_use]
pub fn party_code(party: &str) -> String {
    let party = party.trim();
    let lower = party.to_ascii_lowercase();
    if lower.starts_with("democrat") {
        "D".to_string()
    } else if lower.starts_with("republican") {
        "R".to_string()
    } else if lower.starts_with("independent") {
        "I".to_string()
    } else {
        party
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

/// "Last, First" to "First Last", keeping a trailing suffix after the surname.
#[must_use]
pub fn direct_order_name(name: &str) -> String {
    match name.split_once(',') {
        Some((last, rest)) => {
            let (first, suffix) = match rest.split_once(',') {
                Some((first, suffix)) => (first.trim(), suffix.trim()),
                None => (rest.trim(), ""),
            };
            [first, last.trim(), suffix]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
        None => name.trim().to_string(),
    }
}

/// Senator or Representative from a Congress.gov chamber string.
#[must_use]
pub fn federal_role(chamber: Option<&str>) -> &'static str {
    match chamber {
        Some(c) if c.eq_ignore_ascii_case("senate") => "Senator",
        _ => "Representative",
    }
}

impl From<MemberSummary> for RosterEntity {
    fn from(member: MemberSummary) -> Self {
        let role = federal_role(member.latest_chamber()).to_string();
        let state = member
            .state
            .as_deref()
            .map(|s| states::to_code(s).map_or_else(|| s.to_string(), str::to_string))
            .unwrap_or_default();

        Self {
            name: direct_order_name(&member.name),
            role,
            chamber: Chamber::Federal,
            party: member.party_name.as_deref().map(party_code).unwrap_or_default(),
            state,
            district: member.district.map(|d| d.to_string()),
            city: None,
            source: Source::Congress,
            bioguide_id: Some(member.bioguide_id.clone()),
            photo_url: member.depiction.and_then(|d| d.image_url),
            id: member.bioguide_id,
        }
    }
}

fn state_entity(person: Person, requested_state: &str) -> RosterEntity {
    let role_info = person.current_role.unwrap_or_default();
    let role = role_info.title.unwrap_or_else(|| {
        match role_info.org_classification.as_deref() {
            Some("upper") => "State Senator",
            _ => "State Representative",
        }
        .to_string()
    });
    let state = person
        .jurisdiction
        .and_then(|j| j.state_code())
        .unwrap_or_else(|| requested_state.to_string());

    RosterEntity {
        id: person.id,
        name: person.name,
        role,
        chamber: Chamber::State,
        party: person.party.as_deref().map(party_code).unwrap_or_default(),
        state,
        district: role_info.district,
        city: None,
        source: Source::Openstates,
        bioguide_id: None,
        photo_url: person.image.filter(|url| !url.is_empty()),
    }
}

/// Federal members, or `None` when the Congress call failed.
async fn federal_entities(client: Arc<dyn CongressApiClient>) -> Option<Vec<RosterEntity>> {
    match fetch_all_current_members(client.as_ref()).await {
        Ok(members) => Some(members.into_iter().map(RosterEntity::from).collect()),
        Err(err) => {
            tracing::warn!(upstream = "congress", error = %err, "roster federal fetch failed");
            None
        }
    }
}

/// State legislators, or `None` when skipped or failed.
async fn state_entities(
    client: Option<Arc<dyn OpenStatesClient>>,
    state: Option<&str>,
) -> Option<Vec<RosterEntity>> {
    let (client, state) = match (client, state) {
        (Some(client), Some(state)) => (client, state),
        (None, Some(_)) => {
            tracing::info!("OpenStates key not configured, skipping state legislators");
            return None;
        }
        _ => return None,
    };

    match client.people(state).await {
        Ok(people) => Some(
            people
                .into_iter()
                .map(|p| state_entity(p, state))
                .collect(),
        ),
        Err(err) => {
            tracing::warn!(upstream = "openstates", state, error = %err, "roster state fetch failed");
            None
        }
    }
}

/// Merge the four sources in roster order, applying the state filter.
#[must_use]
pub fn assemble(
    federal: Option<Vec<RosterEntity>>,
    state_legislators: Option<Vec<RosterEntity>>,
    state_filter: Option<&str>,
) -> RosterResponse {
    let mut sources = Vec::new();
    if federal.is_some() {
        sources.push(Source::Congress);
    }
    if state_legislators.is_some() {
        sources.push(Source::Openstates);
    }
    sources.push(Source::Curated);

    let entities: Vec<RosterEntity> = federal
        .unwrap_or_default()
        .into_iter()
        .chain(state_legislators.unwrap_or_default())
        .chain(curated::governors())
        .chain(curated::mayors())
        .filter(|e| state_filter.is_none_or(|s| e.state == s))
        .collect();

    let mut counts = ChamberCounts::default();
    for entity in &entities {
        match entity.chamber {
            Chamber::Federal => counts.federal += 1,
            Chamber::State => counts.state += 1,
            Chamber::Executive => counts.executive += 1,
            Chamber::Local => counts.local += 1,
        }
    }

    RosterResponse {
        entities,
        counts,
        sources,
    }
}

fn parse_state_filter(raw: Option<&str>) -> Result<Option<&'static str>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.len() != 2 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::BadRequest(
            "state must be a two-letter state code".into(),
        ));
    }
    states::to_code(raw)
        .map(Some)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown state code '{raw}'")))
}

/// List officials
///
/// Returns federal legislators (all pages), state legislators for the
/// requested state, and curated governors and mayors.
///
/// # Errors
///
/// 400 for a malformed state code, 500 when the Congress key is missing.
#[utoipa::path(
    get,
    path = "/roster",
    tag = "Roster",
    params(RosterQuery),
    responses(
        (status = 200, description = "Roster assembled (possibly partial)", body = RosterResponse),
        (status = 400, description = "Invalid state code", body = ErrorResponse),
        (status = 500, description = "Congress API key not configured", body = ErrorResponse)
    )
)]
pub async fn get_roster(
    Extension(state): Extension<AppState>,
    query: Result<Query<RosterQuery>, QueryRejection>,
) -> Result<Json<RosterResponse>, ApiError> {
    let Query(query) = query?;
    let state_filter = parse_state_filter(query.state.as_deref())?;
    let congress = state
        .congress
        .clone()
        .ok_or_else(|| ApiError::missing_key("Congress"))?;

    let (federal, state_legislators) = tokio::join!(
        federal_entities(congress),
        state_entities(state.openstates.clone(), state_filter),
    );

    let response = assemble(federal, state_legislators, state_filter);
    tracing::info!(
        total = response.entities.len(),
        federal = response.counts.federal,
        state_legislators = response.counts.state,
        "roster assembled"
    );
    Ok(Json(response))
}
