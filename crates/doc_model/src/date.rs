//! Date display helpers

use chrono::NaiveDate;

/// Shown wherever a value is missing
pub const PLACEHOLDER: &str = "...";

const ISO_DATE_LEN: usize = 10;

/// Format a stored `YYYY-MM-DD` date as `DD-MM-YYYY`.
///
/// Strings shorter than ten characters count as absent and yield
/// [`PLACEHOLDER`]. A prefix that is not a calendar date is still reordered
/// by position; only a prefix without three `-` separated parts is shown
/// unchanged.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.chars().count() < ISO_DATE_LEN {
        return PLACEHOLDER.to_string();
    }

    let prefix: String = raw.chars().take(ISO_DATE_LEN).collect();
    if let Ok(date) = NaiveDate::parse_from_str(&prefix, "%Y-%m-%d") {
        return date.format("%d-%m-%Y").to_string();
    }

    match prefix.split('-').collect::<Vec<_>>()[..] {
        [year, month, day] => format!("{}-{}-{}", day, month, year),
        _ => raw.to_string(),
    }
}

/// Return the trimmed value, or [`PLACEHOLDER`] when it is empty
pub fn or_placeholder(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}
