use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Tolerant parser for the order timestamps found in sales exports.
pub struct TimestampParser;

impl TimestampParser {
    /// Patterns tried in order after the RFC 3339 / RFC 2822 attempts.
    ///
    /// Two-digit-year variants come first: `%Y` would otherwise accept `19`
    /// as the year 19 AD.
    const FORMATS: &'static [&'static str] = &[
        "%m/%d/%y %H:%M",
        "%m/%d/%y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    const DATE_FORMATS: &'static [&'static str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

    /// Parse `s` into a wall-clock timestamp.
    ///
    /// Handles:
    /// * ISO 8601 / RFC 3339 with an offset (the local wall-clock time is kept)
    /// * RFC 2822
    /// * US-style `MM/DD/YY HH:MM` as written by the point-of-sale exports
    /// * ISO-like date-times with a space or `T` separator
    /// * date-only values, which resolve to midnight
    ///
    /// Returns `None` for anything else, including the empty string.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.naive_local());
        }

        for fmt in Self::FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }
        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        trace!("could not parse timestamp \"{}\"", s);
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_us_short_year() {
        let ts = TimestampParser::parse("04/19/19 08:46").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2019, 4, 19));
        assert_eq!((ts.hour(), ts.minute()), (8, 46));
    }

    #[test]
    fn test_parse_us_long_year() {
        let ts = TimestampParser::parse("12/30/2019 23:59:10").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2019, 12, 30));
        assert_eq!(ts.second(), 10);
    }

    #[test]
    fn test_parse_iso() {
        let ts = TimestampParser::parse("2019-01-22 21:25:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2019, 1, 22));
        assert_eq!(ts.hour(), 21);
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_time() {
        let ts = TimestampParser::parse("2019-03-01T10:00:00+05:00").unwrap();
        assert_eq!(ts.hour(), 10);
        let z = TimestampParser::parse("2019-03-01T10:00:00Z").unwrap();
        assert_eq!(z.hour(), 10);
    }

    #[test]
    fn test_parse_date_only() {
        let ts = TimestampParser::parse("2019-07-04").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (7, 4, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimestampParser::parse("Order Date").is_none());
        assert!(TimestampParser::parse("").is_none());
        assert!(TimestampParser::parse("   ").is_none());
        assert!(TimestampParser::parse("13/45/19 99:99").is_none());
    }
}
