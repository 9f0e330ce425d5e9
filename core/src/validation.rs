//! Local input checks run by the controllers before any request is built.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

pub const MINIMUM_AGE: u32 = 18;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Whole years from `birth` to `today`; zero for a birth date in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(birth).unwrap_or(0)
}

/// Parse a weekly rent typed by the user.
pub fn parse_rent(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rent| rent.is_finite() && *rent >= 0.0)
}

/// `YYYY-MM-DD` or an RFC 3339 timestamp, as the backend sends availability.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Midnight UTC on `date`, in the format sent for `availabilityDate`.
pub fn format_iso_date(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}
