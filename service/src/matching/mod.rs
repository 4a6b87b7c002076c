//! Lexical interest matching.
//!
//! Scores caller-supplied bills and votes against free-text interests:
//!
//! - [`tokenize`] - lowercase, punctuation-free, stop-word-filtered tokens
//! - [`score`] - number of tokens contained in a text blob
//! - [`match_interests`] - per-interest top-5 bills and votes
//! - [`normalize_date`] - ISO `YYYY-MM-DD` rendering of upstream dates
//!
//! Matching is plain substring containment, so "art" matches "heart".

mod dates;
mod matcher;
mod tokenize;

pub use dates::normalize_date;
pub use matcher::{
    match_interests, BillInput, InterestMatch, InterestMatchRequest, InterestMatchResponse,
    ItemKind, LatestAction, MatchError, RelevantItem, VoteInput, MAX_INTEREST_CHARS,
    MAX_INTERESTS, MAX_ITEMS_PER_CATEGORY,
};
pub use tokenize::{score, tokenize, STOP_WORDS};
