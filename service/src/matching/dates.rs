use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Render an upstream date as `YYYY-MM-DD`, or `None` when it cannot be parsed.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps
/// and plain dates. Timestamps keep the calendar date of their own offset.
#[must_use]
pub fn normalize_date(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let date = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%Y-%m-%d").to_string())
}
