use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::error::{LensError, Result};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Offset-aware formats, tried after RFC 3339. The first is the layout used
/// by Apple Health exports (`2024-01-10 23:30:00 -0500`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];

/// Formats without an offset; interpreted in the handler's source zone.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Normalizes timestamps from every supported source to UTC.
///
/// Timestamps carrying an offset are converted. Timestamps without one are
/// assumed to be in `source_tz`, which is UTC unless configured otherwise.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    source_tz: Tz,
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { source_tz: Tz::UTC }
    }
}

impl TimezoneHandler {
    /// Create a handler with the given IANA timezone name for naive
    /// timestamps.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        Self::try_new(tz_name).unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Self::default()
        })
    }

    /// Strict variant of [`TimezoneHandler::new`].
    pub fn try_new(tz_name: &str) -> Result<Self> {
        let source_tz = tz_name
            .parse::<Tz>()
            .map_err(|_| LensError::InvalidTimezone(tz_name.to_string()))?;
        Ok(Self { source_tz })
    }

    pub fn source_tz(&self) -> Tz {
        self.source_tz
    }

    /// Parse a timestamp string into a UTC [`DateTime`].
    ///
    /// Accepts RFC 3339 (with `Z` or an offset), the Apple Health layout,
    /// naive date-times, bare dates (midnight) and Unix epoch seconds.
    /// Returns `None` for empty or unrecognised input.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.localize(naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return self.localize(date.and_hms_opt(0, 0, 0)?);
        }

        if let Ok(secs) = s.parse::<f64>() {
            if secs.is_finite() {
                let whole = secs.trunc() as i64;
                let nanos = (secs.fract() * 1_000_000_000.0).round() as u32;
                return DateTime::from_timestamp(whole, nanos);
            }
        }

        debug!("TimezoneHandler: could not parse timestamp \"{}\"", s);
        None
    }

    /// Attach `source_tz` to a naive date-time and convert to UTC.
    ///
    /// Ambiguous wall-clock times (DST fall-back) resolve to the earlier
    /// instant; non-existent ones (spring-forward gap) yield `None`.
    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.source_tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => {
                debug!(
                    "TimezoneHandler: {} does not exist in {}",
                    naive, self.source_tz
                );
                None
            }
        }
    }
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    // ── validate_timezone ─────────────────────────────────────────────────────

    #[test]
    fn test_validate_timezone_valid() {
        assert!(validate_timezone("UTC"));
        assert!(validate_timezone("America/New_York"));
    }

    #[test]
    fn test_validate_timezone_invalid() {
        assert!(!validate_timezone("Not/AZone"));
        assert!(!validate_timezone(""));
    }

    #[test]
    fn test_get_system_timezone_returns_nonempty_string() {
        assert!(!get_system_timezone().is_empty());
    }

    // ── TimezoneHandler construction ──────────────────────────────────────────

    #[test]
    fn test_new_invalid_timezone_falls_back_to_utc() {
        let handler = TimezoneHandler::new("Invalid/Zone");
        assert_eq!(handler.source_tz(), Tz::UTC);
    }

    #[test]
    fn test_try_new_invalid_timezone_errors() {
        let err = TimezoneHandler::try_new("Invalid/Zone").unwrap_err();
        assert!(matches!(err, LensError::InvalidTimezone(_)));
    }

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_timestamp_z_suffix() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("2024-01-10T23:30:00Z"),
            Some(utc(2024, 1, 10, 23, 30, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_with_offset_converts_to_utc() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("2024-01-10T18:30:00-05:00"),
            Some(utc(2024, 1, 10, 23, 30, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_apple_health_layout() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("2024-01-10 18:30:00 -0500"),
            Some(utc(2024, 1, 10, 23, 30, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_naive_assumes_utc_by_default() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("2024-03-01 09:00:00"),
            Some(utc(2024, 3, 1, 9, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_naive_uses_source_zone() {
        let handler = TimezoneHandler::new("Europe/Berlin");
        let dt = handler.parse_timestamp("2024-03-01 09:00:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let handler = TimezoneHandler::default();
        let dt = handler
            .parse_timestamp("2024-12-19 20:27:29.388001")
            .unwrap();
        assert_eq!(dt.second(), 29);
        assert_eq!(dt.nanosecond(), 388_001_000);
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("2024-03-01"),
            Some(utc(2024, 3, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_epoch_seconds() {
        let handler = TimezoneHandler::default();
        assert_eq!(
            handler.parse_timestamp("1709283600"),
            Some(utc(2024, 3, 1, 9, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_empty_returns_none() {
        assert!(TimezoneHandler::default().parse_timestamp("  ").is_none());
    }

    #[test]
    fn test_parse_timestamp_garbage_returns_none() {
        assert!(TimezoneHandler::default()
            .parse_timestamp("yesterday-ish")
            .is_none());
    }

    #[test]
    fn test_parse_timestamp_dst_gap_returns_none() {
        let handler = TimezoneHandler::new("America/New_York");
        assert!(handler.parse_timestamp("2024-03-10 02:30:00").is_none());
    }

    // ── week_start ────────────────────────────────────────────────────────────

    #[test]
    fn test_week_start_wednesday() {
        let wed = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_week_start_monday_is_itself() {
        let mon = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(week_start(mon), mon);
    }

    #[test]
    fn test_week_start_sunday_belongs_to_previous_monday() {
        let sun = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert_eq!(week_start(sun), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-11-01"),
            NaiveDate::from_ymd_opt(2024, 11, 1)
        );
        assert_eq!(parse_date("11/01/2024"), None);
    }
}
