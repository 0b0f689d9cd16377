//! Date/time utilities for clouddrive.
//!
//! Dates are stored as plain strings inside account bundles: upload and
//! creation dates as `YYYY-MM-DD`, join dates as RFC 3339, and the modified
//! date as a short "day month" label.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Abbreviated month names used by the short date label.
const SHORT_MONTHS: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];

/// Format a DateTime<Utc> as an ISO calendar date (`YYYY-MM-DD`).
pub fn iso_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Format a DateTime<Utc> as RFC 3339 with millisecond precision.
pub fn rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Format a DateTime<Utc> as a short "day month" label in the given timezone.
///
/// Falls back to UTC when the timezone name is unknown.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use clouddrive::datetime::short_date;
///
/// let dt = Utc.with_ymd_and_hms(2024, 10, 18, 12, 0, 0).unwrap();
/// assert_eq!(short_date(&dt, "UTC"), "18 Eki");
/// ```
pub fn short_date(dt: &DateTime<Utc>, timezone: &str) -> String {
    let (day, month0) = match timezone.parse::<Tz>() {
        Ok(tz) => {
            let local = dt.with_timezone(&tz);
            (local.day(), local.month0())
        }
        Err(_) => (dt.day(), dt.month0()),
    };
    format!("{day} {}", SHORT_MONTHS[month0 as usize])
}

/// Parse a stored date string into a UTC timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` (midnight UTC).
/// Returns `None` when the string is not a recognisable date.
pub fn parse_stored_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
