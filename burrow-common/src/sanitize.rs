//! Normalization of user-submitted review fields
//!
//! Form input is tolerated rather than rejected: values that fail
//! validation are dropped to `None` so the rest of the submission still
//! saves. Both the book and audiobook review stores share these rules.

use chrono::NaiveDate;

/// Lowest rating accepted on a review
pub const RATING_MIN: i64 = 1;

/// Highest rating accepted on a review
pub const RATING_MAX: i64 = 10;

/// Keep a rating only when it falls within the 1..=10 scale.
///
/// Out-of-range values are discarded, not clamped: a submission with
/// rating 0 or 11 saves with no rating at all.
pub fn accept_rating(raw: Option<i64>) -> Option<i64> {
    raw.filter(|r| (RATING_MIN..=RATING_MAX).contains(r))
}

/// Parse an ISO-8601 date string from a form field.
///
/// Empty or unparseable input becomes `None`.
pub fn parse_user_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
