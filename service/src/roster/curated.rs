//! Hand-maintained executive and local officials.
//!
//! Neither Congress.gov nor OpenStates covers governors or mayors, so these
//! are curated here. Update when offices change hands.

use super::{Chamber, RosterEntity, Source};

/// `(state, name, party)`
const GOVERNORS: &[(&str, &str, &str)] = &[
    ("AL", "Kay Ivey", "R"),
    ("AK", "Mike Dunleavy", "R"),
    ("AZ", "Katie Hobbs", "D"),
    ("AR", "Sarah Huckabee Sanders", "R"),
    ("CA", "Gavin Newsom", "D"),
    ("CO", "Jared Polis", "D"),
    ("CT", "Ned Lamont", "D"),
    ("DE", "Matt Meyer", "D"),
    ("FL", "Ron DeSantis", "R"),
    ("GA", "Brian Kemp", "R"),
    ("HI", "Josh Green", "D"),
    ("ID", "Brad Little", "R"),
    ("IL", "JB Pritzker", "D"),
    ("IN", "Mike Braun", "R"),
    ("IA", "Kim Reynolds", "R"),
    ("KS", "Laura Kelly", "D"),
    ("KY", "Andy Beshear", "D"),
    ("LA", "Jeff Landry", "R"),
    ("ME", "Janet Mills", "D"),
    ("MD", "Wes Moore", "D"),
    ("MA", "Maura Healey", "D"),
    ("MI", "Gretchen Whitmer", "D"),
    ("MN", "Tim Walz", "D"),
    ("MS", "Tate Reeves", "R"),
    ("MO", "Mike Kehoe", "R"),
    ("MT", "Greg Gianforte", "R"),
    ("NE", "Jim Pillen", "R"),
    ("NV", "Joe Lombardo", "R"),
    ("NH", "Kelly Ayotte", "R"),
    ("NJ", "Phil Murphy", "D"),
    ("NM", "Michelle Lujan Grisham", "D"),
    ("NY", "Kathy Hochul", "D"),
    ("NC", "Josh Stein", "D"),
    ("ND", "Kelly Armstrong", "R"),
    ("OH", "Mike DeWine", "R"),
    ("OK", "Kevin Stitt", "R"),
    ("OR", "Tina Kotek", "D"),
    ("PA", "Josh Shapiro", "D"),
    ("RI", "Dan McKee", "D"),
    ("SC", "Henry McMaster", "R"),
    ("SD", "Larry Rhoden", "R"),
    ("TN", "Bill Lee", "R"),
    ("TX", "Greg Abbott", "R"),
    ("UT", "Spencer Cox", "R"),
    ("VT", "Phil Scott", "R"),
    ("VA", "Glenn Youngkin", "R"),
    ("WA", "Bob Ferguson", "D"),
    ("WV", "Patrick Morrisey", "R"),
    ("WI", "Tony Evers", "D"),
    ("WY", "Mark Gordon", "R"),
];

/// `(state, city, name, party)`
const MAYORS: &[(&str, &str, &str, &str)] = &[
    ("NY", "New York", "Eric Adams", "D"),
    ("CA", "Los Angeles", "Karen Bass", "D"),
    ("IL", "Chicago", "Brandon Johnson", "D"),
    ("TX", "Houston", "John Whitmire", "D"),
    ("AZ", "Phoenix", "Kate Gallego", "D"),
    ("PA", "Philadelphia", "Cherelle Parker", "D"),
    ("CA", "San Diego", "Todd Gloria", "D"),
    ("TX", "Dallas", "Eric Johnson", "R"),
    ("FL", "Miami", "Francis Suarez", "R"),
    ("WA", "Seattle", "Bruce Harrell", "D"),
];

fn slug(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[must_use]
pub fn governors() -> Vec<RosterEntity> {
    GOVERNORS
        .iter()
        .map(|(state, name, party)| RosterEntity {
            id: format!("gov-{}", state.to_ascii_lowercase()),
            name: (*name).to_string(),
            role: "Governor".to_string(),
            chamber: Chamber::Executive,
            party: (*party).to_string(),
            state: (*state).to_string(),
            district: None,
            city: None,
            source: Source::Curated,
            bioguide_id: None,
            photo_url: None,
        })
        .collect()
}

#[must_use]
pub fn mayors() -> Vec<RosterEntity> {
    MAYORS
        .iter()
        .map(|(state, city, name, party)| RosterEntity {
            id: format!("mayor-{}-{}", slug(city), state.to_ascii_lowercase()),
            name: (*name).to_string(),
            role: "Mayor".to_string(),
            chamber: Chamber::Local,
            party: (*party).to_string(),
            state: (*state).to_string(),
            district: None,
            city: Some((*city).to_string()),
            source: Source::Curated,
            bioguide_id: None,
            photo_url: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn one_governor_per_state() {
        let govs = governors();
        assert_eq!(govs.len(), 50);
        let ids: HashSet<_> = govs.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
        assert!(govs.iter().all(|g| crate::states::to_code(&g.state).is_some()));
    }

    #[test]
    fn mayor_ids_are_slugged() {
        let mayors = mayors();
        assert!(mayors.iter().any(|m| m.id == "mayor-new-york-ny"));
        assert!(mayors.iter().all(|m| m.chamber == Chamber::Local && m.city.is_some()));
    }
}
