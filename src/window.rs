//! Time-window parsing for usage reports
//!
//! Query timestamps arrive as text in one of three accepted layouts (second
//! precision, optional fractional seconds, `T` or space separated). This
//! module normalizes them into UTC timestamps at the boundary so nothing
//! deeper in the pipeline branches on representation, and validates the
//! window ordering before any instance lookup runs.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Result, UsageError};
use crate::types::TimeWindow;

/// The accepted textual timestamp layouts, tried in order
pub const ACCEPTED_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Clock collaborator
///
/// Report generation reads "now" in two places: as the default for an absent
/// window bound and as the clipping limit for future stops. Hiding it behind
/// a trait keeps report computation deterministic under test.
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation of [`Clock`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Parse an optional textual timestamp
///
/// An absent value defaults to `now`. A present value must match one of
/// [`ACCEPTED_FORMATS`]; anything else is a validation error naming the
/// accepted layouts.
///
/// # Examples
/// ```
/// use tenusage::window::parse_datetime;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// assert!(parse_datetime(Some("2013-01-01T00:00:00"), now).is_ok());
/// assert!(parse_datetime(Some("2013-01-01 00:00:00.500000"), now).is_ok());
/// assert!(parse_datetime(Some("not-a-date"), now).is_err());
/// assert_eq!(parse_datetime(None, now).unwrap(), now);
/// ```
pub fn parse_datetime(value: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let Some(text) = value else {
        return Ok(now);
    };

    for format in ACCEPTED_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(UsageError::InvalidDatetime(text.to_string()))
}

/// Parse an optional start/end pair into a validated [`TimeWindow`]
///
/// Either bound may be absent, defaulting to `now`. Fails when a present
/// value is unparseable or when start does not strictly precede stop.
pub fn parse_window(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TimeWindow> {
    let period_start = parse_datetime(start, now)?;
    let period_stop = parse_datetime(end, now)?;
    TimeWindow::new(period_start, period_stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plain_second_precision() {
        let parsed = parse_datetime(Some("2013-01-01T00:00:00"), now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_fractional_seconds_t_separated() {
        let parsed = parse_datetime(Some("2013-01-01T00:00:00.500000"), now()).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2013, 1, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(500_000))
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_fractional_seconds_space_separated() {
        let parsed = parse_datetime(Some("2013-01-01 00:00:00.500000"), now()).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2013, 1, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(500_000))
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_rejects_unknown_layout() {
        let err = parse_datetime(Some("not-a-date"), now()).unwrap_err();
        assert!(matches!(err, UsageError::InvalidDatetime(_)));
        assert!(err.to_string().contains("valid formats"));
    }

    #[test]
    fn test_absent_defaults_to_now() {
        assert_eq!(parse_datetime(None, now()).unwrap(), now());
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let err = parse_window(
            Some("2013-01-02T00:00:00"),
            Some("2013-01-01T00:00:00"),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, UsageError::StartAfterStop));
    }

    #[test]
    fn test_window_rejects_equal_bounds() {
        let err = parse_window(
            Some("2013-01-01T00:00:00"),
            Some("2013-01-01T00:00:00"),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, UsageError::StartAfterStop));
    }

    #[test]
    fn test_window_parses_mixed_layouts() {
        let window = parse_window(
            Some("2013-01-01 00:00:00.000000"),
            Some("2013-01-02T06:30:00"),
            now(),
        )
        .unwrap();
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            window.stop(),
            Utc.with_ymd_and_hms(2013, 1, 2, 6, 30, 0).unwrap()
        );
    }
}
