//! Schedule time arithmetic.
//!
//! Bus timetables carry times as "HH:MM" strings with no date attached.
//! This module provides a minute-precision time-of-day type and the
//! duration arithmetic that handles trips crossing midnight: whenever an
//! arrival reads earlier than the matching departure, the arrival is
//! assumed to fall on the following day.

use chrono::{NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in one day, the modulus of all wrap arithmetic here.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct InvalidTimeFormat {
    reason: &'static str,
}

impl InvalidTimeFormat {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A minute-precision time of day from a bus timetable.
///
/// Timetable times have no date component; ordering is plain clock order.
/// Overnight semantics live in [`duration_minutes`] and [`wait_minutes`],
/// not in the type itself.
///
/// # Examples
///
/// ```
/// use bus_connect::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("14:30").unwrap();
/// assert_eq!(t.to_string(), "14:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse a time from strict "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_connect::domain::TimeOfDay;
    ///
    /// // Valid times
    /// assert!(TimeOfDay::parse("00:00").is_ok());
    /// assert!(TimeOfDay::parse("23:59").is_ok());
    ///
    /// // Invalid formats
    /// assert!(TimeOfDay::parse("1430").is_err());
    /// assert!(TimeOfDay::parse("14:3").is_err());
    /// assert!(TimeOfDay::parse("25:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidTimeFormat> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(InvalidTimeFormat::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(InvalidTimeFormat::new("expected colon at position 2"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| InvalidTimeFormat::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(InvalidTimeFormat::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| InvalidTimeFormat::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(InvalidTimeFormat::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| InvalidTimeFormat::new("invalid time"))?;

        Ok(Self(time))
    }

    /// Construct from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Returns minutes since midnight (0-1439).
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s).map_err(D::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Minutes from `depart` to `arrive`, wrapping overnight.
///
/// An arrival reading earlier than the departure is assumed to fall on the
/// following day. Equal times yield a full day, never zero: a bus departing
/// at 08:00 and arriving at 08:00 took 24 hours, it did not teleport.
///
/// # Examples
///
/// ```
/// use bus_connect::domain::{TimeOfDay, duration_minutes};
///
/// let dep = TimeOfDay::parse("23:50").unwrap();
/// let arr = TimeOfDay::parse("00:10").unwrap();
/// assert_eq!(duration_minutes(dep, arr), 20);
///
/// let same = TimeOfDay::parse("08:00").unwrap();
/// assert_eq!(duration_minutes(same, same), 1440);
/// ```
pub fn duration_minutes(depart: TimeOfDay, arrive: TimeOfDay) -> u32 {
    let span = (arrive.minutes_from_midnight() as i64 - depart.minutes_from_midnight() as i64)
        .rem_euclid(MINUTES_PER_DAY as i64) as u32;
    if span == 0 { MINUTES_PER_DAY } else { span }
}

/// Minutes spent waiting at a connection point between alighting from the
/// first leg and boarding the second, under the same overnight-wrap rule as
/// [`duration_minutes`].
///
/// A same-minute transfer counts as a full day: the connection is treated
/// as missed, and the finder's maximum-wait filter discards it.
pub fn wait_minutes(alight: TimeOfDay, board: TimeOfDay) -> u32 {
    duration_minutes(alight, board)
}

/// Render a minute count as "Xh Ym".
///
/// The hour part is omitted under one hour, and the minute part is omitted
/// on exact hour multiples.
///
/// # Examples
///
/// ```
/// use bus_connect::domain::format_duration;
///
/// assert_eq!(format_duration(90), "1h 30m");
/// assert_eq!(format_duration(45), "45m");
/// assert_eq!(format_duration(120), "2h");
/// ```
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours == 0 {
        format!("{mins}m")
    } else if mins == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = time("00:00");
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);

        let t = time("23:59");
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);

        let t = time("14:30");
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 30);
    }

    #[test]
    fn parse_invalid_format() {
        // Wrong length
        assert!(TimeOfDay::parse("1430").is_err());
        assert!(TimeOfDay::parse("14:3").is_err());
        assert!(TimeOfDay::parse("14:300").is_err());
        assert!(TimeOfDay::parse("").is_err());

        // Missing colon
        assert!(TimeOfDay::parse("14-30").is_err());
        assert!(TimeOfDay::parse("14.30").is_err());

        // Non-digit characters
        assert!(TimeOfDay::parse("ab:cd").is_err());
        assert!(TimeOfDay::parse("1a:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        // Hour out of range
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("25:00").is_err());

        // Minute out of range
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("12:99").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(time("00:00").to_string(), "00:00");
        assert_eq!(time("09:05").to_string(), "09:05");
        assert_eq!(time("23:59").to_string(), "23:59");
    }

    #[test]
    fn ordering() {
        assert!(time("10:00") < time("11:00"));
        assert!(time("10:30") > time("10:29"));
        assert_eq!(time("14:30"), time("14:30"));
    }

    #[test]
    fn serde_round_trip() {
        let t = time("06:45");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"06:45\"");

        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        assert!(serde_json::from_str::<TimeOfDay>("\"6:45\"").is_err());
    }

    #[test]
    fn duration_same_day() {
        assert_eq!(duration_minutes(time("08:00"), time("10:30")), 150);
        assert_eq!(duration_minutes(time("00:00"), time("23:59")), 1439);
        assert_eq!(duration_minutes(time("10:00"), time("10:01")), 1);
    }

    #[test]
    fn duration_overnight_wrap() {
        assert_eq!(duration_minutes(time("23:50"), time("00:10")), 20);
        assert_eq!(duration_minutes(time("22:00"), time("06:00")), 480);
        assert_eq!(duration_minutes(time("23:59"), time("00:00")), 1);
    }

    #[test]
    fn duration_equal_times_is_full_day() {
        assert_eq!(duration_minutes(time("08:00"), time("08:00")), 1440);
        assert_eq!(duration_minutes(time("00:00"), time("00:00")), 1440);
    }

    #[test]
    fn wait_uses_same_wrap_rule() {
        assert_eq!(wait_minutes(time("10:30"), time("10:45")), 15);
        assert_eq!(wait_minutes(time("23:55"), time("00:05")), 10);
        assert_eq!(wait_minutes(time("12:00"), time("12:00")), 1440);
    }

    #[test]
    fn format_duration_cases() {
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(1440), "24h");
        assert_eq!(format_duration(61), "1h 1m");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time_str()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> TimeOfDay {
            TimeOfDay::from_hm(hour, minute).unwrap()
        }
    }

    proptest! {
        /// Any valid HH:MM string parses successfully
        #[test]
        fn valid_hhmm_parses(s in valid_time_str()) {
            prop_assert!(TimeOfDay::parse(&s).is_ok());
        }

        /// Parse then display roundtrips
        #[test]
        fn parse_display_roundtrip(s in valid_time_str()) {
            let parsed = TimeOfDay::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        /// Invalid hour is rejected
        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(TimeOfDay::parse(&s).is_err());
        }

        /// Invalid minute is rejected
        #[test]
        fn invalid_minute_rejected(hour in 0u32..24, minute in 60u32..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(TimeOfDay::parse(&s).is_err());
        }

        /// Durations are always in 1..=1440
        #[test]
        fn duration_in_range(a in valid_time(), b in valid_time()) {
            let d = duration_minutes(a, b);
            prop_assert!(d >= 1);
            prop_assert!(d <= MINUTES_PER_DAY);
        }

        /// Forward and reverse spans between distinct times cover one day
        #[test]
        fn duration_complements_to_full_day(a in valid_time(), b in valid_time()) {
            if a != b {
                prop_assert_eq!(
                    duration_minutes(a, b) + duration_minutes(b, a),
                    MINUTES_PER_DAY
                );
            }
        }

        /// Same-day spans match plain clock subtraction
        #[test]
        fn duration_matches_clock_when_ordered(a in valid_time(), b in valid_time()) {
            if a < b {
                let expected = b.minutes_from_midnight() - a.minutes_from_midnight();
                prop_assert_eq!(duration_minutes(a, b), expected);
            }
        }

        /// Formatting never produces an empty string and mentions each
        /// nonzero component exactly when expected
        #[test]
        fn format_duration_structure(minutes in 0u32..3000) {
            let s = format_duration(minutes);
            prop_assert!(!s.is_empty());
            prop_assert_eq!(s.contains('h'), minutes >= 60);
            prop_assert_eq!(
                s.contains('m'),
                minutes < 60 || minutes % 60 != 0
            );
        }
    }
}
