//! Data types for Congress.gov v3 API responses.
//!
//! Only the fields the roster reads are modeled; everything is optional or
//! defaulted because the API omits fields freely.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Depiction {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One service term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    /// "Senate" or "House of Representatives"
    #[serde(default)]
    pub chamber: Option<String>,
    #[serde(default)]
    pub start_year: Option<u32>,
    #[serde(default)]
    pub end_year: Option<u32>,
}

/// The list endpoint wraps terms as `{"item": [...]}`, the detail endpoint
/// returns a bare array.
fn deserialize_terms<'de, D>(deserializer: D) -> Result<Vec<Term>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        List(Vec<Term>),
        Wrapped {
            #[serde(default)]
            item: Vec<Term>,
        },
    }

    Ok(match Option::<Shape>::deserialize(deserializer)? {
        Some(Shape::List(terms) | Shape::Wrapped { item: terms }) => terms,
        None => Vec::new(),
    })
}

/// Chamber of the most recent term.
fn latest_chamber(terms: &[Term]) -> Option<&str> {
    terms
        .iter()
        .max_by_key(|t| t.start_year.unwrap_or(0))
        .and_then(|t| t.chamber.as_deref())
}

/// A current member as returned by `/member`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    /// Bioguide ID (e.g., "A000360")
    pub bioguide_id: String,
    /// "Last, First" order
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub party_name: Option<String>,
    /// Full state name (e.g., "Tennessee")
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<u32>,
    #[serde(default)]
    pub depiction: Option<Depiction>,
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub terms: Vec<Term>,
}

impl MemberSummary {
    #[must_use]
    pub fn latest_chamber(&self) -> Option<&str> {
        latest_chamber(&self.terms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub count: u32,
}

/// One page of the member list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembersPage {
    #[serde(default)]
    pub members: Vec<MemberSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartyHistory {
    #[serde(default)]
    pub party_name: Option<String>,
    #[serde(default)]
    pub start_year: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInformation {
    #[serde(default)]
    pub office_address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Member detail as returned by `/member/{bioguideId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub bioguide_id: String,
    /// "First Last" order
    #[serde(default)]
    pub direct_order_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<u32>,
    #[serde(default)]
    pub party_history: Vec<PartyHistory>,
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub depiction: Option<Depiction>,
    #[serde(default)]
    pub official_website_url: Option<String>,
    #[serde(default)]
    pub address_information: Option<AddressInformation>,
    #[serde(default)]
    pub current_member: Option<bool>,
}

impl MemberDetail {
    #[must_use]
    pub fn latest_chamber(&self) -> Option<&str> {
        latest_chamber(&self.terms)
    }

    /// Party of the most recent affiliation.
    #[must_use]
    pub fn current_party(&self) -> Option<&str> {
        self.party_history
            .iter()
            .max_by_key(|p| p.start_year.unwrap_or(0))
            .and_then(|p| p.party_name.as_deref())
    }

    /// Display name, assembled from parts when `directOrderName` is absent.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.direct_order_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Response from the member detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member: MemberDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyArea {
    #[serde(default)]
    pub name: Option<String>,
}

/// A bill or amendment from `/member/{id}/sponsored-legislation`.
///
/// Amendments carry no title or type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredBill {
    #[serde(default)]
    pub congress: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub bill_type: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub introduced_date: Option<String>,
    #[serde(default)]
    pub latest_action: Option<BillAction>,
    #[serde(default)]
    pub policy_area: Option<PolicyArea>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredLegislationResponse {
    #[serde(default)]
    pub sponsored_legislation: Vec<SponsoredBill>,
}
