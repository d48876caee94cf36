//! Timestamp parsing for marketplace fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format used for window bounds in source filters.
pub const FILTER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Strict: only RFC 3339 timestamps with an explicit zone.
pub fn parse_zoned(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Lenient: zoned timestamps as-is, zone-less ones read as UTC, and a bare
/// date as UTC midnight.
pub fn parse_utc_assumed(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Some(t) = parse_zoned(raw) {
        return Some(t);
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

pub fn format_filter_time(t: &DateTime<Utc>) -> String {
    t.format(FILTER_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zoned_parse_requires_offset() {
        let t = parse_zoned("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        assert!(parse_zoned("2024-05-01T10:00:00").is_none());
        assert!(parse_zoned("2024-05-01").is_none());
    }

    #[test]
    fn lenient_parse_assumes_utc() {
        let want = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_utc_assumed("2024-05-01T10:00:00.000Z"), Some(want));
        assert_eq!(parse_utc_assumed("2024-05-01T10:00:00"), Some(want));
        assert_eq!(parse_utc_assumed("2024-05-01 10:00:00"), Some(want));
        assert_eq!(
            parse_utc_assumed("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert!(parse_utc_assumed("next tuesday").is_none());
    }

    #[test]
    fn filter_format_drops_fraction() {
        let t = parse_zoned("2024-05-01T10:00:00.750Z").unwrap();
        assert_eq!(format_filter_time(&t), "2024-05-01T10:00:00Z");
    }
}
