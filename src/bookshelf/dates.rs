//! Parsing and display helpers for the catalog's loosely formatted date columns.
//!
//! Source data is not trusted: `published_date` may be a year, a year-month
//! written with `-` or `.`, or garbage, and `added_at` may carry the
//! `0000-00-00` sentinel a SQL backend emits for "no date". Nothing in here
//! panics on malformed input, and nothing mutates stored values.

/// The "zero date" a backend sends instead of an empty registered date.
pub const ZERO_DATE: &str = "0000-00-00";

/// Normalizes a year-month value for display.
///
/// Accepts `YYYY-MM` or `YYYY.MM` (the first `.` becomes `-`); anything else,
/// including a bare year, renders as empty.
pub fn normalize_month_format(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let normalized = date.replacen('.', "-", 1);
    if is_year_month(&normalized) {
        normalized
    } else {
        String::new()
    }
}

/// Treats the zero-date sentinel as empty.
pub fn sanitize_date(date: &str) -> &str {
    if date == ZERO_DATE {
        ""
    } else {
        date
    }
}

/// Parses the year out of a range-bound input such as `1948` or `1948-05`.
///
/// Only the first four characters are considered and they must all be ASCII
/// digits.
pub fn parse_year_bound(input: &str) -> Option<i32> {
    let prefix = input.trim().get(..4)?;
    if !all_digits(prefix) {
        return None;
    }
    prefix.parse().ok()
}

/// Extracts the year from a record's `published_date`.
///
/// Valid shapes are `YYYY`, `YYYY-MM` and `YYYY.MM`. Everything else is
/// unparsable and yields `None`.
pub fn published_year(value: &str) -> Option<i32> {
    let value = value.trim();
    let year = match value.len() {
        4 => value,
        7 => {
            let normalized = value.replacen('.', "-", 1);
            if !is_year_month(&normalized) {
                return None;
            }
            &value[..4]
        }
        _ => return None,
    };
    if !all_digits(year) {
        return None;
    }
    year.parse().ok()
}

/// Returns the registered date usable for range comparison, if any.
pub fn comparable_date(date: &str) -> Option<&str> {
    match sanitize_date(date.trim()) {
        "" => None,
        d => Some(d),
    }
}

fn is_year_month(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
