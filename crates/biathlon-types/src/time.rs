//! Clock time parsing and duration formatting.
//!
//! Every timestamp in the event log and every duration in the report uses a
//! single canonical format, `HH:MM:SS.mmm`. Event times are wall-clock times
//! within one race day and are represented as [`NaiveTime`]; differences
//! between them are [`TimeDelta`] values.
//!
//! Durations are rendered by truncating to whole milliseconds. Hours are not
//! wrapped at 24, and a negative duration is rendered with a leading `-`.

use chrono::{NaiveTime, TimeDelta, Timelike};

/// `chrono` format string for clock times: `HH:MM:SS.mmm`.
pub const CLOCK_FORMAT: &str = "%H:%M:%S%.3f";

/// `chrono` format string for clock durations such as the start delta.
const CLOCK_DURATION_FORMAT: &str = "%H:%M:%S";

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;
const MILLIS_PER_HOUR: u64 = 3_600_000;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Errors that can occur when parsing clock values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeFormatError {
    /// The value is not a clock time in `HH:MM:SS.mmm` format.
    #[error("invalid clock time '{value}': {source}")]
    ClockTime {
        /// The offending input.
        value: String,
        /// The underlying `chrono` parse error.
        source: chrono::ParseError,
    },

    /// The value is not a clock duration in `HH:MM:SS` format.
    #[error("invalid clock duration '{value}': {source}")]
    ClockDuration {
        /// The offending input.
        value: String,
        /// The underlying `chrono` parse error.
        source: chrono::ParseError,
    },
}

/// Parse a clock time such as `10:05:30.000`.
///
/// # Errors
///
/// Returns [`TimeFormatError::ClockTime`] if `value` is not a valid time of day.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, TimeFormatError> {
    NaiveTime::parse_from_str(value, CLOCK_FORMAT).map_err(|source| TimeFormatError::ClockTime {
        value: value.to_owned(),
        source,
    })
}

/// Parse a clock time whose milliseconds may be omitted, such as
/// `09:30:00` or `09:30:00.000`.
///
/// # Errors
///
/// Returns [`TimeFormatError::ClockTime`] if `value` is neither form.
pub fn parse_clock_time_relaxed(value: &str) -> Result<NaiveTime, TimeFormatError> {
    parse_clock_time(value).or_else(|err| {
        NaiveTime::parse_from_str(value, CLOCK_DURATION_FORMAT).map_or(Err(err), Ok)
    })
}

/// Parse a clock duration such as `00:01:30` into the elapsed time since
/// midnight it denotes.
///
/// # Errors
///
/// Returns [`TimeFormatError::ClockDuration`] if `value` is not `HH:MM:SS`.
pub fn parse_clock_duration(value: &str) -> Result<TimeDelta, TimeFormatError> {
    NaiveTime::parse_from_str(value, CLOCK_DURATION_FORMAT)
        .map(since_midnight)
        .map_err(|source| TimeFormatError::ClockDuration {
            value: value.to_owned(),
            source,
        })
}

/// Elapsed time between midnight and `time`.
///
/// A leap second has no representation as an offset and maps to zero.
pub fn since_midnight(time: NaiveTime) -> TimeDelta {
    TimeDelta::new(i64::from(time.num_seconds_from_midnight()), time.nanosecond())
        .unwrap_or_else(TimeDelta::zero)
}

/// Render a clock time as `HH:MM:SS.mmm`.
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Render a duration as `HH:MM:SS.mmm`.
pub fn format_duration(duration: TimeDelta) -> String {
    let millis = duration.num_milliseconds();
    let sign = if millis < 0 { "-" } else { "" };
    let millis = millis.unsigned_abs();

    let hours = millis / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let fraction = millis % MILLIS_PER_SECOND;

    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{fraction:03}")
}

/// Convert a duration to fractional seconds.
#[allow(clippy::cast_precision_loss)]
pub fn seconds_f64(duration: TimeDelta) -> f64 {
    let whole = duration.num_seconds() as f64;
    whole + f64::from(duration.subsec_nanos()) / NANOS_PER_SECOND
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_time_with_millis() {
        let time = parse_clock_time("10:05:30.123").unwrap();
        assert_eq!(time.hour(), 10);
        assert_eq!(time.minute(), 5);
        assert_eq!(time.second(), 30);
        assert_eq!(time.nanosecond(), 123_000_000);
    }

    #[test]
    fn rejects_garbage_clock_time() {
        assert!(parse_clock_time("hello").is_err());
        assert!(parse_clock_time("25:00:00.000").is_err());
        assert!(parse_clock_time("").is_err());
    }

    #[test]
    fn relaxed_clock_time_accepts_missing_millis() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_clock_time_relaxed("09:30:00").unwrap(), expected);
        assert_eq!(parse_clock_time_relaxed("09:30:00.000").unwrap(), expected);
        assert!(matches!(
            parse_clock_time_relaxed("half past nine"),
            Err(TimeFormatError::ClockTime { .. })
        ));
    }

    #[test]
    fn clock_duration_is_relative_to_midnight() {
        let delta = parse_clock_duration("00:01:30").unwrap();
        assert_eq!(delta, TimeDelta::seconds(90));

        let delta = parse_clock_duration("01:00:00").unwrap();
        assert_eq!(delta, TimeDelta::hours(1));
    }

    #[test]
    fn clock_duration_rejects_bad_input() {
        let err = parse_clock_duration("hello").unwrap_err();
        assert!(matches!(err, TimeFormatError::ClockDuration { .. }));
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(TimeDelta::zero()), "00:00:00.000");
        assert_eq!(
            format_duration(TimeDelta::milliseconds(62_345)),
            "00:01:02.345"
        );
        assert_eq!(
            format_duration(TimeDelta::milliseconds(29 * 60_000 + 14_007)),
            "00:29:14.007"
        );
        assert_eq!(
            format_duration(TimeDelta::hours(26) + TimeDelta::seconds(5)),
            "26:00:05.000"
        );
    }

    #[test]
    fn formats_negative_durations_with_sign() {
        assert_eq!(format_duration(TimeDelta::milliseconds(-1_500)), "-00:00:01.500");
    }

    #[test]
    fn format_truncates_below_millisecond() {
        let delta = TimeDelta::milliseconds(1_001) + TimeDelta::microseconds(999);
        assert_eq!(format_duration(delta), "00:00:01.001");
    }

    #[test]
    fn clock_time_round_trips_through_format() {
        let time = parse_clock_time("09:30:01.050").unwrap();
        assert_eq!(format_clock_time(time), "09:30:01.050");
    }

    #[test]
    fn fractional_seconds() {
        let secs = seconds_f64(TimeDelta::milliseconds(1_500));
        assert!((secs - 1.5).abs() < f64::EPSILON);
    }
}
