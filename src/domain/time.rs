use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Simulated wall-clock time, stored as fractional hours since midnight.
///
/// Travel over an unreachable leg adds an infinite duration, so unlike
/// [`NaiveTime`] this value can become non-finite and stays that way.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SimTime(f64);

impl SimTime {
    pub fn from_hours(hours: f64) -> Self {
        SimTime(hours)
    }

    pub fn from_hms(hour: u32, min: u32, sec: u32) -> Self {
        SimTime((hour * 3600 + min * 60 + sec) as f64 / 3600.0)
    }

    pub fn hours(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Clock after travelling for `hours`.
    pub fn advanced_by(self, hours: f64) -> Self {
        SimTime(self.0 + hours)
    }

    /// Accepts `HH:MM`, `HH:MM:SS` and 12-hour forms such as `10:30 AM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
            .map(Self::from)
    }

    /// `None` once the clock is non-finite or has rolled past midnight.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        if !self.0.is_finite() || self.0 < 0.0 {
            return None;
        }
        let total_secs = (self.0 * 3600.0).round() as u64;
        if total_secs >= 24 * 3600 {
            return None;
        }
        NaiveTime::from_num_seconds_from_midnight_opt(total_secs as u32, 0)
    }
}

impl From<NaiveTime> for SimTime {
    fn from(time: NaiveTime) -> Self {
        SimTime(time.num_seconds_from_midnight() as f64 / 3600.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive_time() {
            Some(time) => write!(f, "{}", time.format("%H:%M:%S")),
            None if self.0.is_finite() => write!(f, "{:.2}h", self.0),
            None => write!(f, "--:--:--"),
        }
    }
}

impl Serialize for SimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SimTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SimTime::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}'")))
    }
}
