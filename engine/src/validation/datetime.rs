//! Culture-invariant date/time parsing.
//!
//! Accepts ISO (`2024-01-05`), US (`01/05/2024`) and month-name
//! (`Jan 5, 2024`) dates, each optionally followed by a 24-hour or AM/PM time
//! with optional seconds and fraction, as well as RFC 3339 and RFC 2822
//! timestamps. Offsets are converted to UTC.
//! Parsed values render as `MM/dd/yyyy HH:mm:ss`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

/// Canonical rendering of a parsed date/time
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Date forms that also take a `T` before the time
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S%.f", "%I:%M %p", "%I:%M:%S%.f %p"];

/// Every date form followed by every time form
static DATETIME_FORMATS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut formats = Vec::with_capacity(DATE_FORMATS.len() * TIME_FORMATS.len() * 2);
    for date in DATE_FORMATS {
        for time in TIME_FORMATS {
            formats.push(format!("{} {}", date, time));
            if ISO_DATE_FORMATS.contains(date) {
                formats.push(format!("{}T{}", date, time));
            }
        }
    }
    formats
});

/// Parse a date or date/time string
pub fn parse_invariant(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse and render in the canonical format
pub fn normalize(input: &str) -> Option<String> {
    parse_invariant(input).map(|dt| dt.format(CANONICAL_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(normalize("2024-01-05").as_deref(), Some("01/05/2024 00:00:00"));
        assert_eq!(normalize("2024-1-5").as_deref(), Some("01/05/2024 00:00:00"));
        assert_eq!(normalize("2024/01/05").as_deref(), Some("01/05/2024 00:00:00"));
    }

    #[test]
    fn test_us_date_is_month_first() {
        assert_eq!(normalize("03/04/2024").as_deref(), Some("03/04/2024 00:00:00"));
        assert_eq!(normalize("3/4/2024").as_deref(), Some("03/04/2024 00:00:00"));
        assert!(normalize("13/01/2024").is_none());
    }

    #[test]
    fn test_date_with_time() {
        assert_eq!(
            normalize("2024-01-05 14:30:15").as_deref(),
            Some("01/05/2024 14:30:15")
        );
        assert_eq!(
            normalize("2024-01-05T14:30").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("1/5/2024 2:30 PM").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("2024-01-05 10:20:30.250").as_deref(),
            Some("01/05/2024 10:20:30")
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(normalize("Jan 5, 2024").as_deref(), Some("01/05/2024 00:00:00"));
        assert_eq!(normalize("5 January 2024").as_deref(), Some("01/05/2024 00:00:00"));
    }

    #[test]
    fn test_iso_dates_with_every_time_form() {
        assert_eq!(
            normalize("2024/01/05 2:30 PM").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("2024/01/05T14:30:15.5").as_deref(),
            Some("01/05/2024 14:30:15")
        );
        assert_eq!(
            normalize("2024-01-05T2:30:15 am").as_deref(),
            Some("01/05/2024 02:30:15")
        );
    }

    #[test]
    fn test_us_dates_with_every_time_form() {
        assert_eq!(
            normalize("01-05-2024 2:30 PM").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("1-5-2024 9:05").as_deref(),
            Some("01/05/2024 09:05:00")
        );
        assert_eq!(
            normalize("01/05/2024 11:59:59 PM").as_deref(),
            Some("01/05/2024 23:59:59")
        );
    }

    #[test]
    fn test_month_name_dates_with_time() {
        assert_eq!(
            normalize("Jan 5, 2024 2:30 PM").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("Jan 5, 2024 14:30:15.5").as_deref(),
            Some("01/05/2024 14:30:15")
        );
        assert_eq!(
            normalize("January 5 2024 10:00").as_deref(),
            Some("01/05/2024 10:00:00")
        );
        assert_eq!(
            normalize("Jan 5 2024 10:00:01 AM").as_deref(),
            Some("01/05/2024 10:00:01")
        );
    }

    #[test]
    fn test_day_first_month_name_with_time() {
        assert_eq!(
            normalize("5 Jan 2024 14:30").as_deref(),
            Some("01/05/2024 14:30:00")
        );
        assert_eq!(
            normalize("5 January 2024 2:30:45 PM").as_deref(),
            Some("01/05/2024 14:30:45")
        );
    }

    #[test]
    fn test_offsets_converted_to_utc() {
        assert_eq!(
            normalize("2024-01-05T10:00:00+02:00").as_deref(),
            Some("01/05/2024 08:00:00")
        );
        assert_eq!(
            normalize("2024-01-05T10:00:00Z").as_deref(),
            Some("01/05/2024 10:00:00")
        );
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(normalize("  2024-01-05 ").as_deref(), Some("01/05/2024 00:00:00"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(normalize("not-a-date").is_none());
        assert!(normalize("").is_none());
        assert!(normalize("2024-02-30").is_none());
        assert!(normalize("14:30").is_none());
        assert!(normalize("2024-01-05 25:00").is_none());
        assert!(normalize("2024-01-05 13:00 PM").is_none());
    }

    #[test]
    fn test_canonical_form_reparses() {
        let canonical = normalize("2024-01-05 07:08:09").unwrap();
        assert_eq!(normalize(&canonical), Some(canonical));
    }
}
