//! Date parsing and display helpers shared by the commands.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parse a user supplied `YYYY-MM-DD` date.
///
/// Exactly four year digits and two month and day digits are required, and
/// the result must be a real calendar date.
pub fn parse_strict_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Parse a timestamp as the API sends it: RFC 3339, SQL style, or a bare date.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `Mar 4` for dates in the current year, `Mar 4, 2024` otherwise.
pub fn short_date(input: &str, today: NaiveDate) -> String {
    let date = input
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    match date {
        Some(date) if date.year() == today.year() => date.format("%b %-d").to_string(),
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => input.to_string(),
    }
}

/// `March 4, 2025`
pub fn long_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => input.to_string(),
    }
}
