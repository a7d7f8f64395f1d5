//! Wall-clock time of day used for static schedule boundaries.
//!
//! Shift and overtime boundaries are stored as `TimeOfDay` values and only
//! become concrete timestamps once bound to a date by
//! [`parse_on_reference_date`](crate::engine::parse_on_reference_date).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A wall-clock time with minute precision, serialized as `"HH:mm"`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::TimeOfDay;
///
/// let start: TimeOfDay = "09:30".parse().unwrap();
/// assert_eq!(start.minutes_since_midnight(), 570);
/// assert_eq!(start.to_string(), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> EngineResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(EngineError::InvalidTimeFormat {
                value: format!("{:02}:{:02}", hour, minute),
            });
        }
        Ok(Self { hour, minute })
    }

    /// The hour component (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The minute component (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// Converts to a chrono `NaiveTime` with zero seconds.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Takes the hour and minute of a `NaiveTime`, dropping seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        // NaiveTime components are always in range.
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| {
            EngineError::InvalidTimeFormat {
                value: s.to_string(),
            }
        })?;
        Ok(Self::from_naive_time(time))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
