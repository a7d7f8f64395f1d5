//! Shift definition model.
//!
//! A shift definition is the static, per-employee-per-day schedule the
//! engine resolves periods against. It is supplied by an external shift
//! provider and never modified by the engine.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// An employee's effective shift for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Unique identifier for the shift.
    pub id: String,
    /// Human-readable shift name (e.g., "Night shift").
    #[serde(default)]
    pub name: String,
    /// Wall-clock start of the shift.
    pub start_time: TimeOfDay,
    /// Wall-clock end of the shift. Earlier than `start_time` for overnight shifts.
    pub end_time: TimeOfDay,
    /// Scheduled weekdays, 0 = Sunday through 6 = Saturday.
    pub work_days: BTreeSet<u8>,
}

impl ShiftDefinition {
    /// Returns true if the shift ends on the calendar day after it starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::ShiftDefinition;
    ///
    /// let night = ShiftDefinition {
    ///     id: "night".to_string(),
    ///     name: "Night shift".to_string(),
    ///     start_time: "22:00".parse().unwrap(),
    ///     end_time: "06:00".parse().unwrap(),
    ///     work_days: (0..7).collect(),
    /// };
    /// assert!(night.is_overnight());
    /// ```
    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    /// Returns true if `date` falls on one of the scheduled work days.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        // num_days_from_sunday is always < 7
        let index = date.weekday().num_days_from_sunday() as u8;
        self.work_days.contains(&index)
    }
}
