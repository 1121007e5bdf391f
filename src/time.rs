use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};

use crate::error::TimeParseError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock minute of the day, always in `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time of day from any minute count, wrapping past midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        Self((minutes % MINUTES_PER_DAY) as u16)
    }

    pub fn hm(hour: u32, minute: u32) -> Self {
        Self::from_minutes(hour * 60 + minute)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    /// Minute of day with the seconds kept as a fraction, for smooth
    /// position updates between whole minutes.
    pub fn fractional_minutes(time: NaiveTime) -> f64 {
        f64::from(time.num_seconds_from_midnight()) / 60.0
    }
}

/// Reads `"HH:MM"` the way published calendars are read: a missing or
/// unreadable part counts as zero. Not wrapped, so `"24:00"` reads as 1440.
pub fn parse_minutes_lenient(text: Option<&str>) -> u32 {
    let Some(text) = text else {
        return 0;
    };
    let mut parts = text.split(':').map(leading_number);
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

/// `"HH:MM"` for a minute count that may reach the end of the day (`24:00`).
pub fn clock_label(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn leading_number(part: &str) -> u32 {
    let part = part.trim_start();
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().unwrap_or(0)
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self::hm(time.hour(), time.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(TimeOfDay::from)
            .map_err(|_| TimeParseError::InvalidTimeOfDay(s.to_owned()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
