use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::dates::normalize_date;
use super::tokenize::{score, tokenize};
use crate::error::ApiError;
use crate::upstream::lenient_string;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("interests must be a non-empty array")]
    NoInterests,
    #[error("interests must contain at least one non-blank entry")]
    BlankInterests,
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Interests beyond this count are ignored.
pub const MAX_INTERESTS: usize = 10;
/// Interests are cut to this many characters.
pub const MAX_INTEREST_CHARS: usize = 100;
/// Bills and votes kept per interest.
pub const MAX_ITEMS_PER_CATEGORY: usize = 5;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestAction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub action_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

/// A bill as the client received it from the entity endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub bill_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub introduced_date: Option<String>,
    #[serde(default)]
    pub latest_action: Option<LatestAction>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

/// A roll-call vote as the client received it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bill_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InterestMatchRequest {
    pub interests: Vec<String>,
    #[serde(default)]
    pub bills: Vec<BillInput>,
    #[serde(default)]
    pub votes: Vec<VoteInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Bill,
    Vote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RelevantItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestMatch {
    pub interest: String,
    pub bills: Vec<RelevantItem>,
    pub votes: Vec<RelevantItem>,
    /// Matches found before the per-category cut.
    pub total_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestMatchResponse {
    pub results: Vec<InterestMatch>,
    pub total_matches: usize,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, sep: &str) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(sep)
}

impl BillInput {
    fn blob(&self) -> String {
        join_present(
            [
                non_empty(self.title.as_ref()),
                non_empty(self.bill_type.as_ref()),
                non_empty(self.number.as_ref()),
            ],
            " ",
        )
    }

    fn to_item(&self, score: usize) -> RelevantItem {
        let designation = join_present(
            [
                non_empty(self.bill_type.as_ref()),
                non_empty(self.number.as_ref()),
            ],
            " ",
        );
        let action = self
            .latest_action
            .as_ref()
            .and_then(|a| non_empty(a.text.as_ref()));

        let title = non_empty(self.title.as_ref()).map_or_else(
            || {
                if designation.is_empty() {
                    "Untitled bill".to_string()
                } else {
                    designation.clone()
                }
            },
            str::to_string,
        );

        let designation = (!designation.is_empty()).then_some(designation);
        let description = join_present([designation.as_deref(), action], ": ");

        let date = normalize_date(self.introduced_date.as_deref()).or_else(|| {
            normalize_date(
                self.latest_action
                    .as_ref()
                    .and_then(|a| a.action_date.as_deref()),
            )
        });

        RelevantItem {
            kind: ItemKind::Bill,
            title,
            description,
            date,
            url: non_empty(self.url.as_ref()).map(str::to_string),
            score,
        }
    }
}

impl VoteInput {
    fn heading(&self) -> Option<&str> {
        non_empty(self.title.as_ref()).or_else(|| non_empty(self.question.as_ref()))
    }

    fn blob(&self) -> String {
        join_present([self.heading(), non_empty(self.bill_number.as_ref())], " ")
    }

    fn to_item(&self, score: usize) -> RelevantItem {
        RelevantItem {
            kind: ItemKind::Vote,
            title: self.heading().unwrap_or("Roll call vote").to_string(),
            description: join_present(
                [
                    non_empty(self.bill_number.as_ref()),
                    non_empty(self.result.as_ref()),
                ],
                " - ",
            ),
            date: normalize_date(self.date.as_deref()),
            url: non_empty(self.url.as_ref()).map(str::to_string),
            score,
        }
    }
}

/// Score every candidate, keep hits, best first (ties keep input order).
/// Returns the kept items cut to the category limit and the uncut count.
fn rank<T>(
    tokens: &[String],
    candidates: &[T],
    blob: impl Fn(&T) -> String,
    to_item: impl Fn(&T, usize) -> RelevantItem,
) -> (Vec<RelevantItem>, usize) {
    let mut items: Vec<RelevantItem> = candidates
        .iter()
        .filter_map(|candidate| {
            let s = score(tokens, &blob(candidate));
            (s > 0).then(|| to_item(candidate, s))
        })
        .collect();

    items.sort_by(|a, b| b.score.cmp(&a.score));
    let total = items.len();
    items.truncate(MAX_ITEMS_PER_CATEGORY);
    (items, total)
}

/// Trim, cap and drop blank interests; at most [`MAX_INTERESTS`] are read.
fn clean_interests(interests: &[String]) -> Vec<String> {
    interests
        .iter()
        .take(MAX_INTERESTS)
        .map(|i| i.trim().chars().take(MAX_INTEREST_CHARS).collect::<String>())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Match each interest against the supplied bills and votes.
///
/// # Errors
///
/// Returns [`MatchError`] when no usable interest was supplied.
pub fn match_interests(
    request: &InterestMatchRequest,
) -> Result<InterestMatchResponse, MatchError> {
    if request.interests.is_empty() {
        return Err(MatchError::NoInterests);
    }

    let interests = clean_interests(&request.interests);
    if interests.is_empty() {
        return Err(MatchError::BlankInterests);
    }

    let results: Vec<InterestMatch> = interests
        .into_iter()
        .map(|interest| {
            let tokens: Vec<String> = tokenize(&interest).collect();
            let (bills, bill_total) =
                rank(&tokens, &request.bills, BillInput::blob, BillInput::to_item);
            let (votes, vote_total) =
                rank(&tokens, &request.votes, VoteInput::blob, VoteInput::to_item);

            InterestMatch {
                interest,
                bills,
                votes,
                total_matches: bill_total + vote_total,
            }
        })
        .collect();

    let total_matches = results.iter().map(|r| r.total_matches).sum();
    Ok(InterestMatchResponse {
        results,
        total_matches,
    })
}
