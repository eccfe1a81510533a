//! Timestamp parsing for station files and window bounds.
//!
//! Station exports are not consistent about timestamp layout: most use
//! `YYYY-MM-DD HH:MM:SS`, some drop the seconds, some use an ISO `T`
//! separator, and hand-written window bounds are often bare dates. All are
//! treated as naive station-local time with minute granularity or finer.

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a timestamp in any of the accepted layouts. A bare date is
/// midnight of that day. Returns `None` for anything else.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Canonical rendering used in logs, reports and CSV output.
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parses_standard_station_layout() {
        let t = parse_timestamp("2010-06-01 12:54:00").expect("standard layout should parse");
        assert_eq!(t.minute(), 54);
        assert_eq!(format_timestamp(&t), "2010-06-01 12:54:00");
    }

    #[test]
    fn test_parses_without_seconds_and_with_iso_separator() {
        let a = parse_timestamp("2010-06-01 12:54").unwrap();
        let b = parse_timestamp("2010-06-01T12:54:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let t = parse_timestamp("2007-01-01").unwrap();
        assert_eq!(format_timestamp(&t), "2007-01-01 00:00:00");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(parse_timestamp("  2007-01-01 00:06:00 ").is_some());
    }

    #[test]
    fn test_garbage_and_empty_return_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not-a-datetime").is_none());
        assert!(parse_timestamp("2007-13-40 00:00:00").is_none());
    }
}
