//! Date normalization for exercise entries.
//!
//! Entry dates are parsed permissively: anything that does not parse as a
//! calendar date resolves to today (UTC). Dates are stored as `YYYY-MM-DD`,
//! which sorts lexicographically in date order, and echoed back in the long
//! form `Sat Sep 09 2023`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Storage form
const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Response form
const DISPLAY_FORMAT: &str = "%a %b %d %Y";

/// Plain calendar-date layouts tried in order.
///
/// `%b`/`%a` only take three-letter names, so full spellings get their
/// own `%B`/`%A` layouts.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%A %B %d %Y",
    "%A %b %d %Y",
    "%a %B %d %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A resolved entry date in both of its rendered forms
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedDate {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub canonical: String,
    /// e.g. `Sat Sep 09 2023`
    pub display: String,
}

impl From<NaiveDate> for NormalizedDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            date,
            canonical: canonical(date),
            display: display(date),
        }
    }
}

/// Today's calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve a raw entry date, falling back to today
pub fn normalize(raw: Option<&str>) -> NormalizedDate {
    normalize_on(raw, today())
}

/// Resolve a raw entry date against an explicit "today"
pub fn normalize_on(raw: Option<&str>, today: NaiveDate) -> NormalizedDate {
    parse_or_today(raw, today).into()
}

/// Total parse: absent, blank or unparseable input yields `today`.
pub fn parse_or_today(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(input) => parse_date(input).unwrap_or_else(|| {
            tracing::debug!(input = %input, "Unparseable date, using today");
            today
        }),
        None => today,
    }
}

/// Strict parse of a calendar date in any supported layout.
///
/// Timestamps carrying an offset are converted to UTC before the date is
/// taken; naive timestamps keep their own date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// `YYYY-MM-DD`
pub fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// `Sat Sep 09 2023`
pub fn display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date_normalizes_to_both_forms() {
        let normalized = normalize_on(Some("2023-09-09"), ymd(2024, 1, 1));
        assert_eq!(normalized.canonical, "2023-09-09");
        assert_eq!(normalized.display, "Sat Sep 09 2023");
    }

    #[test]
    fn test_common_layouts_parse() {
        let expected = ymd(2023, 9, 9);
        for input in [
            "2023-09-09",
            "2023/09/09",
            "09/09/2023",
            "Sat Sep 09 2023",
            "Sep 09 2023",
            "Sep 9, 2023",
            "September 9, 2023",
            "9 Sep 2023",
            "9 September 2023",
            "2023-09-09T18:30:00",
            "2023-09-09T18:30:00.250",
            "2023-09-09T10:00:00Z",
            "Sat, 09 Sep 2023 10:00:00 +0000",
        ] {
            assert_eq!(parse_date(input), Some(expected), "input {:?}", input);
        }
    }

    #[test]
    fn test_full_month_and_weekday_names_parse() {
        let expected = ymd(2023, 9, 9);
        for input in [
            "September 9, 2023",
            "September 09 2023",
            "9 September 2023",
            "Saturday September 09 2023",
            "Saturday Sep 09 2023",
        ] {
            assert_eq!(parse_date(input), Some(expected), "input {:?}", input);
        }

        // A full name must not silently fall back to today
        let normalized = normalize_on(Some("September 3, 2023"), ymd(2030, 1, 1));
        assert_eq!(normalized.canonical, "2023-09-03");
        assert_eq!(normalized.display, "Sun Sep 03 2023");
    }

    #[test]
    fn test_offset_timestamp_uses_utc_date() {
        assert_eq!(
            parse_date("2023-09-09T23:30:00-05:00"),
            Some(ymd(2023, 9, 10))
        );
    }

    #[test]
    fn test_invalid_input_falls_back_to_today() {
        let today = ymd(2024, 2, 29);
        assert_eq!(parse_or_today(Some("not-a-date"), today), today);
        assert_eq!(parse_or_today(Some("2023-02-30"), today), today);
        assert_eq!(parse_or_today(Some("   "), today), today);
        assert_eq!(parse_or_today(None, today), today);
    }

    #[test]
    fn test_mismatched_weekday_is_rejected() {
        assert_eq!(parse_date("Mon Sep 09 2023"), None);
    }

    #[test]
    fn test_canonical_strings_sort_as_dates() {
        let mut dates = vec![ymd(2023, 12, 1), ymd(2023, 2, 28), ymd(1999, 1, 1)];
        let mut strings: Vec<String> = dates.iter().map(|d| canonical(*d)).collect();
        dates.sort();
        strings.sort();
        let sorted: Vec<String> = dates.iter().map(|d| canonical(*d)).collect();
        assert_eq!(strings, sorted);
    }

    #[test]
    fn test_normalize_without_input_is_today() {
        let normalized = normalize(None);
        assert_eq!(normalized.date, today());
    }
}
