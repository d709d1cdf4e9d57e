//! Validity window extraction from free-text restriction descriptions
//!
//! FAA titles look like
//! `"VIEQUES, PR, Monday, January 13, 2025 through Friday, December 19, 2025 UTC"`.
//! A weekday-led date (or range) wins over any other date in the text; only
//! without one is the first bare date used. Text without a recognizable date
//! is treated as a long-lived restriction.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{ValidityKind, ValidityWindow};

const WEEKDAYS: &str = "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday";
const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// "Monday, January 13, 2025 [through Friday, December 19, 2025]"
static WEEKDAY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let date = format!(r"(?:{WEEKDAYS}),\s+(?:{MONTHS})\s+\d{{1,2}},\s+\d{{4}}");
    date_range_pattern(&date)
});

/// Any supported date shape; ISO date-time is tried before ISO date.
static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let date = format!(
        r"(?:(?:{WEEKDAYS}),\s+(?:{MONTHS})\s+\d{{1,2}},\s+\d{{4}}|(?:{MONTHS})\s+\d{{1,2}},\s+\d{{4}}|\d{{1,2}}/\d{{1,2}}/\d{{4}}|\d{{4}}-\d{{2}}-\d{{2}}T\d{{2}}:\d{{2}}:\d{{2}}Z|\d{{4}}-\d{{2}}-\d{{2}})"
    );
    date_range_pattern(&date)
});

fn date_range_pattern(date: &str) -> Regex {
    Regex::new(&format!(r"(?P<start>{date})(?:\s+through\s+(?P<end>{date}))?"))
        .expect("date range pattern is valid")
}

/// Date-only formats in priority order
const DATE_FORMATS: [&str; 4] = ["%A, %B %d, %Y", "%B %d, %Y", "%m/%d/%Y", "%Y-%m-%d"];
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Lifetime assumed for restrictions whose text has no usable date
const PERMANENT_LOOKBACK_DAYS: i64 = 1;
const PERMANENT_LOOKAHEAD_DAYS: i64 = 365;

/// Turn a free-text description into a `[start, end)` window.
///
/// A "... through ..." range uses both dates, a single date covers the 24
/// hours starting at it, and anything else (no date, or a date that does not
/// parse) becomes `[now - 1 day, now + 1 year)` so the record is never lost.
#[must_use]
pub fn parse_validity_window(text: &str, now: DateTime<Utc>) -> ValidityWindow {
    match extract_dates(text) {
        Some((start, Some(end))) => ValidityWindow {
            start,
            end,
            kind: ValidityKind::Range,
        },
        Some((start, None)) => ValidityWindow {
            start,
            end: start + Duration::hours(24),
            kind: ValidityKind::SingleDay,
        },
        None => permanent_window(now),
    }
}

/// Window used when nothing in the text could be interpreted
#[must_use]
pub fn permanent_window(now: DateTime<Utc>) -> ValidityWindow {
    ValidityWindow {
        start: now - Duration::days(PERMANENT_LOOKBACK_DAYS),
        end: now + Duration::days(PERMANENT_LOOKAHEAD_DAYS),
        kind: ValidityKind::Permanent,
    }
}

fn extract_dates(text: &str) -> Option<(DateTime<Utc>, Option<DateTime<Utc>>)> {
    let captures = WEEKDAY_RANGE
        .captures(text)
        .or_else(|| DATE_RANGE.captures(text))?;
    let start = parse_flexible_date(captures.name("start")?.as_str())?;

    match captures.name("end") {
        // A range whose second half does not parse is not trusted at all
        Some(end) => Some((start, Some(parse_flexible_date(end.as_str())?))),
        None => Some((start, None)),
    }
}

/// Parse one date token, trying each known format in order.
///
/// A weekday that disagrees with the date is ignored rather than rejected.
pub fn parse_flexible_date(token: &str) -> Option<DateTime<Utc>> {
    let token = token.split_whitespace().collect::<Vec<_>>().join(" ");

    parse_with_formats(&token, &DATE_FORMATS).or_else(|| {
        let (weekday, rest) = token.split_once(", ")?;
        if weekday.ends_with("day") {
            parse_with_formats(rest, &DATE_FORMATS[1..])
        } else {
            None
        }
    })
}

fn parse_with_formats(token: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .or_else(|| {
            NaiveDateTime::parse_from_str(token, DATE_TIME_FORMAT)
                .ok()
                .map(|date_time| date_time.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_weekday_range() {
        let window = parse_validity_window(
            "Monday, January 13, 2025 through Friday, December 19, 2025",
            now(),
        );
        assert_eq!(window.kind, ValidityKind::Range);
        assert_eq!(window.start, utc(2025, 1, 13));
        assert_eq!(window.end, utc(2025, 12, 19));
    }

    #[test]
    fn test_range_embedded_in_faa_title() {
        let window = parse_validity_window(
            "VIEQUES, PR, Monday, January 13, 2025 through Friday, December 19, 2025 UTC",
            now(),
        );
        assert_eq!(window.kind, ValidityKind::Range);
        assert_eq!(window.start, utc(2025, 1, 13));
        assert_eq!(window.end, utc(2025, 12, 19));
    }

    #[test]
    fn test_single_date_covers_one_day() {
        let window = parse_validity_window("NEW YORK, NY, Sunday, March 2, 2025 UTC", now());
        assert_eq!(window.kind, ValidityKind::SingleDay);
        assert_eq!(window.start, utc(2025, 3, 2));
        assert_eq!(window.end, utc(2025, 3, 3));
    }

    #[rstest]
    #[case("Monday, January 13, 2025", utc(2025, 1, 13))]
    #[case("January 13, 2025", utc(2025, 1, 13))]
    #[case("01/13/2025", utc(2025, 1, 13))]
    #[case("2025-01-13", utc(2025, 1, 13))]
    #[case("2025-01-13T15:30:00Z", Utc.with_ymd_and_hms(2025, 1, 13, 15, 30, 0).unwrap())]
    #[case("Monday,  January  13,  2025", utc(2025, 1, 13))]
    fn test_supported_formats(#[case] token: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_flexible_date(token), Some(expected));
    }

    #[test]
    fn test_mismatched_weekday_is_ignored() {
        // January 13, 2025 was a Monday
        assert_eq!(
            parse_flexible_date("Tuesday, January 13, 2025"),
            Some(utc(2025, 1, 13))
        );
    }

    #[test]
    fn test_numeric_range() {
        let window = parse_validity_window("Airshow 06/20/2025 through 06/22/2025", now());
        assert_eq!(window.kind, ValidityKind::Range);
        assert_eq!(window.start, utc(2025, 6, 20));
        assert_eq!(window.end, utc(2025, 6, 22));
    }

    #[rstest]
    #[case("NOTAM 12/25/2024 issued; Monday, January 13, 2025 through Friday, December 19, 2025")]
    #[case("Amended 2024-12-30: Monday, January 13, 2025 through Friday, December 19, 2025 UTC")]
    #[case("Filed December 20, 2024 for Monday, January 13, 2025 through Friday, December 19, 2025")]
    fn test_weekday_range_wins_over_earlier_bare_date(#[case] text: &str) {
        let window = parse_validity_window(text, now());
        assert_eq!(window.kind, ValidityKind::Range);
        assert_eq!(window.start, utc(2025, 1, 13));
        assert_eq!(window.end, utc(2025, 12, 19));
        assert!(window.contains(now()));
    }

    #[test]
    fn test_bare_date_used_without_weekday_form() {
        let window = parse_validity_window("Marathon 2025-06-01, see NOTAM", now());
        assert_eq!(window.kind, ValidityKind::SingleDay);
        assert_eq!(window.start, utc(2025, 6, 1));
    }

    #[rstest]
    #[case("")]
    #[case("Stadium restriction, see NOTAM for details")]
    #[case("AREA 51, NV, permanent")]
    #[case("Monday, Smarch 13, 2025")]
    fn test_no_date_is_permanent(#[case] text: &str) {
        let now = now();
        let window = parse_validity_window(text, now);
        assert_eq!(window.kind, ValidityKind::Permanent);
        assert!(window.start >= now - Duration::hours(24));
        assert!(window.start < now);
        assert!(window.end >= now + Duration::days(300));
        assert!(window.contains(now));
    }

    #[test]
    fn test_unparseable_range_end_is_permanent() {
        let now = now();
        let window = parse_validity_window("January 13, 2025 through February 30, 2025", now);
        assert_eq!(window.kind, ValidityKind::Permanent);
        assert!(window.contains(now));
    }
}
