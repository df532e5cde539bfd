//! Wall-clock time-of-day values and minute-offset arithmetic.
//!
//! Every computed time in a schedule is a time of day with no date. Values
//! that fall before midnight or after the end of the day are folded back with
//! modulo-1440 arithmetic, so "90 minutes before 00:30" is simply `23:00`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Rendering style for clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `06:41`
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    /// `6:41 AM`
    #[serde(rename = "12h")]
    TwelveHour,
}

impl FromStr for TimeFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            "12h" | "12" | "ampm" => Ok(TimeFormat::TwelveHour),
            other => Err(ValidationError::invalid(
                "time_format",
                format!("expected '24h' or '12h', got '{other}'"),
            )),
        }
    }
}

/// A time of day on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a clock time, rejecting hours above 23 or minutes above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::invalid("hour", format!("{hour} is not in 0..=23")));
        }
        if minute > 59 {
            return Err(ValidationError::invalid(
                "minute",
                format!("{minute} is not in 0..=59"),
            ));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight, in `0..1440`.
    pub fn minutes(&self) -> i32 {
        time_to_minutes(*self)
    }

    /// Render as `HH:MM` (24-hour) or `h:MM AM` (12-hour).
    pub fn format(&self, format: TimeFormat) -> String {
        match format {
            TimeFormat::TwentyFourHour => format!("{:02}:{:02}", self.hour, self.minute),
            TimeFormat::TwelveHour => {
                let suffix = if self.hour < 12 { "AM" } else { "PM" };
                let hour = match self.hour % 12 {
                    0 => 12,
                    h => h,
                };
                format!("{hour}:{:02} {suffix}", self.minute)
            }
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(TimeFormat::TwentyFourHour))
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    /// Parse `HH:MM` (leading zero optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::invalid("time", format!("'{s}' is not HH:MM")))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| ValidationError::invalid("time", format!("bad hour in '{s}'")))?;
        if m.len() != 2 {
            return Err(ValidationError::invalid("time", format!("bad minute in '{s}'")));
        }
        let minute: u8 = m
            .parse()
            .map_err(|_| ValidationError::invalid("time", format!("bad minute in '{s}'")))?;
        ClockTime::new(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Minutes since midnight for a clock time.
pub fn time_to_minutes(time: ClockTime) -> i32 {
    i32::from(time.hour) * 60 + i32::from(time.minute)
}

/// Fold any minute offset (negative or past midnight) back onto the clock.
pub fn minutes_to_time(minutes: i32) -> ClockTime {
    let folded = minutes.rem_euclid(MINUTES_PER_DAY);
    ClockTime {
        hour: (folded / 60) as u8,
        minute: (folded % 60) as u8,
    }
}

/// Upper bound for any single minute field: one week.
pub const MAX_MINUTES: u32 = 7 * 24 * 60;

/// Lenient minute-field parsing for user input: anything that is not a
/// non-negative integer becomes 0, anything above [`MAX_MINUTES`] is capped.
pub fn parse_minutes_lenient(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).map_or(MAX_MINUTES, |n| n.min(MAX_MINUTES)),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u8, m: u8) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    #[test]
    fn minutes_since_midnight() {
        assert_eq!(time_to_minutes(t(0, 0)), 0);
        assert_eq!(time_to_minutes(t(8, 0)), 480);
        assert_eq!(time_to_minutes(t(23, 59)), 1439);
    }

    #[test]
    fn negative_minutes_fold_onto_previous_day() {
        assert_eq!(minutes_to_time(-30), minutes_to_time(1410));
        assert_eq!(minutes_to_time(-30), t(23, 30));
        assert_eq!(minutes_to_time(-60), t(23, 0));
    }

    #[test]
    fn overflowing_minutes_fold_onto_next_day() {
        assert_eq!(minutes_to_time(1440), t(0, 0));
        assert_eq!(minutes_to_time(1500), t(1, 0));
        assert_eq!(minutes_to_time(-1440 - 5), t(23, 55));
    }

    #[test]
    fn twelve_hour_rendering() {
        assert_eq!(t(0, 5).format(TimeFormat::TwelveHour), "12:05 AM");
        assert_eq!(t(6, 41).format(TimeFormat::TwelveHour), "6:41 AM");
        assert_eq!(t(12, 0).format(TimeFormat::TwelveHour), "12:00 PM");
        assert_eq!(t(23, 30).format(TimeFormat::TwelveHour), "11:30 PM");
    }

    #[test]
    fn twenty_four_hour_rendering_pads() {
        assert_eq!(t(6, 5).to_string(), "06:05");
        assert_eq!(t(18, 45).format(TimeFormat::TwentyFourHour), "18:45");
    }

    #[test]
    fn parse_accepts_hh_mm() {
        assert_eq!("08:00".parse::<ClockTime>().unwrap(), t(8, 0));
        assert_eq!("7:30".parse::<ClockTime>().unwrap(), t(7, 30));
        assert_eq!(" 23:59 ".parse::<ClockTime>().unwrap(), t(23, 59));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("08:60".parse::<ClockTime>().is_err());
        assert!("0800".parse::<ClockTime>().is_err());
        assert!("08:5".parse::<ClockTime>().is_err());
        assert!("ab:cd".parse::<ClockTime>().is_err());
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let json = serde_json::to_string(&t(6, 41)).unwrap();
        assert_eq!(json, "\"06:41\"");
        let back: ClockTime = serde_json::from_str("\"07:05\"").unwrap();
        assert_eq!(back, t(7, 5));
    }

    #[test]
    fn lenient_minutes() {
        assert_eq!(parse_minutes_lenient("30"), 30);
        assert_eq!(parse_minutes_lenient(" 15 "), 15);
        assert_eq!(parse_minutes_lenient(""), 0);
        assert_eq!(parse_minutes_lenient("abc"), 0);
        assert_eq!(parse_minutes_lenient("-10"), 0);
        assert_eq!(parse_minutes_lenient("2.5"), 0);
        assert_eq!(parse_minutes_lenient("10081"), MAX_MINUTES);
        assert_eq!(parse_minutes_lenient("99999999999"), MAX_MINUTES);
    }

    #[test]
    fn time_format_parsing() {
        assert_eq!("12h".parse::<TimeFormat>().unwrap(), TimeFormat::TwelveHour);
        assert_eq!("24H".parse::<TimeFormat>().unwrap(), TimeFormat::TwentyFourHour);
        assert!("13h".parse::<TimeFormat>().is_err());
    }

    proptest! {
        #[test]
        fn round_trip_every_clock_time(h in 0u8..24, m in 0u8..60) {
            let time = t(h, m);
            prop_assert_eq!(minutes_to_time(time_to_minutes(time)), time);
        }

        #[test]
        fn folding_is_periodic(minutes in -10_000i32..10_000) {
            prop_assert_eq!(minutes_to_time(minutes), minutes_to_time(minutes + MINUTES_PER_DAY));
            prop_assert!((0..MINUTES_PER_DAY).contains(&minutes_to_time(minutes).minutes()));
        }
    }
}
