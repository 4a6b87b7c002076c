//! Address or ZIP lookup reshaped into districts and representatives.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorResponse};
use crate::roster::party_code;
use crate::state::AppState;
use crate::upstream::{
    geocoder::{CongressionalDistrict, GeocodeResult, Legislator, SchoolDistricts, StateDistrict},
    UpstreamError,
};

pub const MAX_ADDRESS_CHARS: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GeocoderQuery {
    /// Free-form street address
    pub address: Option<String>,
    /// Five-digit ZIP code, used when no address is given
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CongressionalInfo {
    pub district: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congress_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bioguide_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LegislativeChamber {
    Upper,
    Lower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StateOfficial {
    pub chamber: LegislativeChamber,
    pub district: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_district: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeocoderResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congressional: Option<CongressionalInfo>,
    pub representatives: Vec<Representative>,
    pub state_officials: Vec<StateOfficial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_info: Option<LocalInfo>,
}

impl GeocoderResponse {
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            success: false,
            location: None,
            congressional: None,
            representatives: Vec::new(),
            state_officials: Vec::new(),
            local_info: None,
        }
    }
}

/// Pick the lookup string: a trimmed address, else a five-digit ZIP.
///
/// # Errors
///
/// Returns `BadRequest` when neither parameter is usable.
pub fn lookup_query(query: &GeocoderQuery) -> Result<String, ApiError> {
    if let Some(address) = query.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        if address.chars().count() > MAX_ADDRESS_CHARS {
            return Err(ApiError::BadRequest(format!(
                "address must be at most {MAX_ADDRESS_CHARS} characters"
            )));
        }
        return Ok(address.to_string());
    }

    match query.zip.as_deref().map(str::trim) {
        Some(zip) if zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(zip.to_string())
        }
        Some(_) => Err(ApiError::BadRequest("zip must be five digits".into())),
        None => Err(ApiError::BadRequest("address or zip is required".into())),
    }
}

fn representative(legislator: &Legislator) -> Option<Representative> {
    let bio = legislator.bio.as_ref()?;
    let name = [bio.first_name.as_deref(), bio.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        return None;
    }
    let role = match legislator.kind.as_deref() {
        Some(kind) if kind.eq_ignore_ascii_case("senator") => "Senator",
        _ => "Representative",
    };
    let contact = legislator.contact.as_ref();

    Some(Representative {
        name,
        role: role.to_string(),
        party: bio.party.as_deref().map(party_code).filter(|p| !p.is_empty()),
        bioguide_id: legislator
            .references
            .as_ref()
            .and_then(|r| r.bioguide_id.clone()),
        url: contact.and_then(|c| c.url.clone()),
        phone: contact.and_then(|c| c.phone.clone()),
    })
}

fn congressional(district: &CongressionalDistrict) -> CongressionalInfo {
    let number = district.district_number.clone().unwrap_or_default();
    CongressionalInfo {
        name: district
            .name
            .clone()
            .unwrap_or_else(|| format!("Congressional District {number}")),
        district: number,
        congress_number: district.congress_number.clone(),
    }
}

fn state_official(chamber: LegislativeChamber, district: &StateDistrict) -> StateOfficial {
    StateOfficial {
        chamber,
        district: district.district_number.clone().unwrap_or_default(),
        name: district.name.clone().unwrap_or_default(),
    }
}

fn school_district(districts: &SchoolDistricts) -> Option<String> {
    [&districts.unified, &districts.elementary, &districts.secondary]
        .into_iter()
        .flatten()
        .find_map(|d| d.name.clone())
}

/// Every geocoder failure surfaces as a 502; transport and decode errors
/// carry no upstream status.
fn geocode_failure(err: &UpstreamError) -> ApiError {
    let status = match err {
        UpstreamError::ApiError { status, .. } => Some(*status),
        UpstreamError::NotFound(_) => Some(404),
        UpstreamError::Request(_) | UpstreamError::Decode(_) => None,
    };
    ApiError::Upstream {
        service: "geocoder",
        status,
    }
}

/// Reshape the first geocoder hit.
#[must_use]
pub fn reshape(result: &GeocodeResult) -> GeocoderResponse {
    let components = result.address_components.clone().unwrap_or_default();
    let location = result.location.as_ref().map(|coords| Location {
        formatted_address: result.formatted_address.clone().unwrap_or_default(),
        lat: coords.lat,
        lng: coords.lng,
        city: components.city.clone(),
        state: components.state.clone(),
        zip: components.zip.clone(),
        county: components.county.clone(),
    });

    let fields = result.fields.clone().unwrap_or_default();
    let district = fields.congressional_districts.first();

    let state_officials: Vec<StateOfficial> = fields
        .state_legislative_districts
        .map(|legislative| {
            legislative
                .senate
                .iter()
                .map(|d| state_official(LegislativeChamber::Upper, d))
                .chain(
                    legislative
                        .house
                        .iter()
                        .map(|d| state_official(LegislativeChamber::Lower, d)),
                )
                .collect()
        })
        .unwrap_or_default();

    let school = fields.school_districts.as_ref().and_then(school_district);
    let local_info = (components.county.is_some() || components.city.is_some() || school.is_some())
        .then(|| LocalInfo {
            county: components.county,
            city: components.city,
            school_district: school,
        });

    GeocoderResponse {
        success: true,
        location,
        congressional: district.map(congressional),
        representatives: district
            .map(|d| d.current_legislators.iter().filter_map(representative).collect())
            .unwrap_or_default(),
        state_officials,
        local_info,
    }
}

/// Look up districts for an address
///
/// Resolves an address or ZIP to its congressional district, current
/// members of Congress, state legislative districts and local info.
///
/// # Errors
///
/// 400 for missing or malformed input, 500 when the geocoder key is
/// missing, 502 when the geocoder fails.
#[utoipa::path(
    get,
    path = "/geocoder",
    tag = "Geocoder",
    params(GeocoderQuery),
    responses(
        (status = 200, description = "Lookup finished; success is false when nothing matched", body = GeocoderResponse),
        (status = 400, description = "Invalid address or ZIP", body = ErrorResponse),
        (status = 500, description = "Geocoder API key not configured", body = ErrorResponse),
        (status = 502, description = "Geocoder failed", body = ErrorResponse)
    )
)]
pub async fn get_geocoder(
    Extension(state): Extension<AppState>,
    query: Result<Query<GeocoderQuery>, QueryRejection>,
) -> Result<Json<GeocoderResponse>, ApiError> {
    let Query(query) = query?;
    let lookup = lookup_query(&query)?;
    let client = state
        .geocoder
        .clone()
        .ok_or_else(|| ApiError::missing_key("Geocoder"))?;

    let response = client.geocode(&lookup).await.map_err(|err| {
        tracing::warn!(upstream = "geocoder", error = %err, "geocode failed");
        geocode_failure(&err)
    })?;

    Ok(Json(
        response
            .results
            .first()
            .map_or_else(GeocoderResponse::not_found, reshape),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::geocoder::GeocodeResponse;
    use serde_json::json;

    fn query(address: Option<&str>, zip: Option<&str>) -> GeocoderQuery {
        GeocoderQuery {
            address: address.map(Into::into),
            zip: zip.map(Into::into),
        }
    }

    #[test]
    fn address_wins_over_zip() {
        let q = query(Some("  1600 Pennsylvania Ave  "), Some("20500"));
        assert_eq!(lookup_query(&q).ok().as_deref(), Some("1600 Pennsylvania Ave"));
    }

    #[test]
    fn zip_must_be_five_digits() {
        assert_eq!(lookup_query(&query(None, Some("20500"))).ok().as_deref(), Some("20500"));
        assert!(lookup_query(&query(None, Some("2050"))).is_err());
        assert!(lookup_query(&query(None, Some("2050a"))).is_err());
        assert!(lookup_query(&query(Some("   "), None)).is_err());
        assert!(lookup_query(&query(None, None)).is_err());
    }

    #[test]
    fn long_address_rejected() {
        let long = "x".repeat(MAX_ADDRESS_CHARS + 1);
        assert!(lookup_query(&query(Some(&long), None)).is_err());
    }

    #[test]
    fn geocode_failures_keep_status_only_when_one_exists() {
        let cases = [
            (
                UpstreamError::ApiError {
                    status: 403,
                    message: "bad key".into(),
                },
                Some(403),
            ),
            (UpstreamError::NotFound("geocode".into()), Some(404)),
            (UpstreamError::Decode("truncated".into()), None),
        ];

        for (err, expected) in cases {
            let mapped = geocode_failure(&err);
            assert_eq!(mapped.status().as_u16(), 502);
            assert!(
                matches!(mapped, ApiError::Upstream { status, .. } if status == expected),
                "{err:?}"
            );
        }
    }

    #[test]
    fn reshapes_geocodio_result() {
        let response: GeocodeResponse = serde_json::from_value(json!({
            "results": [{
                "formatted_address": "1109 N Highland St, Arlington, VA 22201",
                "location": {"lat": 38.886672, "lng": -77.094735},
                "address_components": {"city": "Arlington", "county": "Arlington County", "state": "VA", "zip": "22201"},
                "fields": {
                    "congressional_districts": [{
                        "name": "Congressional District 8",
                        "district_number": 8,
                        "congress_number": "118th",
                        "current_legislators": [
                            {"type": "representative", "bio": {"first_name": "Donald", "last_name": "Beyer", "party": "Democrat"},
                             "contact": {"url": "https://beyer.house.gov", "phone": "(202) 225-4376"},
                             "references": {"bioguide_id": "B001292"}},
                            {"type": "senator", "bio": {"first_name": "Mark", "last_name": "Warner", "party": "Democrat"},
                             "references": {"bioguide_id": "W000805"}}
                        ]
                    }],
                    "state_legislative_districts": {
                        "house": [{"name": "State House District 2", "district_number": "2"}],
                        "senate": [{"name": "State Senate District 40", "district_number": "40"}]
                    },
                    "school_districts": {"unified": {"name": "Arlington County Public Schools"}}
                }
            }]
        }))
        .expect("fixture parses");

        let shaped = reshape(&response.results[0]);
        assert!(shaped.success);
        let location = shaped.location.expect("location");
        assert_eq!(location.state.as_deref(), Some("VA"));

        let district = shaped.congressional.expect("district");
        assert_eq!(district.district, "8");
        assert_eq!(district.congress_number.as_deref(), Some("118th"));

        assert_eq!(shaped.representatives.len(), 2);
        assert_eq!(shaped.representatives[0].name, "Donald Beyer");
        assert_eq!(shaped.representatives[0].party.as_deref(), Some("D"));
        assert_eq!(shaped.representatives[1].role, "Senator");

        assert_eq!(shaped.state_officials.len(), 2);
        assert_eq!(shaped.state_officials[0].chamber, LegislativeChamber::Upper);
        assert_eq!(shaped.state_officials[1].district, "2");

        let local = shaped.local_info.expect("local info");
        assert_eq!(local.school_district.as_deref(), Some("Arlington County Public Schools"));
    }

    #[test]
    fn not_found_serializes_empty_lists() {
        let value = serde_json::to_value(GeocoderResponse::not_found()).expect("serializes");
        assert_eq!(
            value,
            json!({"success": false, "representatives": [], "stateOfficials": []})
        );
    }
}
