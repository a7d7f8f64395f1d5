//! Period models: candidate periods, the resolved period state and transitions.
//!
//! None of these types are persisted. They are recomputed on every call.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// The classification of a work period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    /// The employee's regular shift.
    Regular,
    /// Approved overtime.
    Overtime,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Regular => write!(f, "REGULAR"),
            PeriodType::Overtime => write!(f, "OVERTIME"),
        }
    }
}

/// A concrete span of time between two local timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// Inclusive end.
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Returns true if `instant` lies within the window, bounds included.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::TimeWindow;
    /// use chrono::NaiveDateTime;
    ///
    /// let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
    /// let window = TimeWindow { start: parse("2026-01-15 09:00"), end: parse("2026-01-15 18:00") };
    /// assert!(window.contains(parse("2026-01-15 18:00")));
    /// assert!(!window.contains(parse("2026-01-15 18:01")));
    /// ```
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Returns the window widened by `before` at the start and `after` at the end.
    pub fn extended(&self, before: Duration, after: Duration) -> TimeWindow {
        TimeWindow {
            start: self.start - before,
            end: self.end + after,
        }
    }

    /// Returns true if the window ends on a later calendar day than it starts.
    pub fn spans_midnight(&self) -> bool {
        self.end.date() > self.start.date()
    }
}

/// A candidate period inside a day's period sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDefinition {
    /// Regular shift or overtime.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    /// Wall-clock start.
    pub start_time: TimeOfDay,
    /// Wall-clock end.
    pub end_time: TimeOfDay,
    /// Position in the chronologically sorted sequence.
    pub sequence: usize,
    /// True if the period crosses midnight.
    pub is_overnight: bool,
    /// True if the period falls on a day off.
    #[serde(default)]
    pub is_day_off: bool,
}

/// Activity recorded against the resolved period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodActivity {
    /// True while the employee is checked in and not checked out.
    pub is_active: bool,
    /// Check-in time of the record backing this period, if any.
    pub check_in: Option<NaiveDateTime>,
    /// Check-out time of the record backing this period, if any.
    pub check_out: Option<NaiveDateTime>,
    /// True for overtime periods.
    pub is_overtime: bool,
    /// True for overtime worked on a day off.
    pub is_day_off_overtime: bool,
    /// True for overtime nested inside the regular shift hours.
    pub is_inside_shift_hours: bool,
}

/// Timing facts about the resolved period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodValidation {
    /// True if the reference instant lies inside the period's window.
    pub is_within_bounds: bool,
    /// True if the reference instant is before the period start.
    pub is_early: bool,
    /// True if the reference instant is past the late check-in grace.
    pub is_late: bool,
    /// True if the period crosses midnight.
    pub is_overnight: bool,
    /// True if the period starts where a completed overtime session ended.
    pub is_connected: bool,
}

/// The resolved "current" period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedPeriodState {
    /// Regular shift or overtime.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    /// Concrete start and end of the period.
    pub time_window: TimeWindow,
    /// Check-in/out activity for the period.
    pub activity: PeriodActivity,
    /// Timing facts for the period.
    pub validation: PeriodValidation,
}

/// One side of a period transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEndpoint {
    /// Index of the period in the day's sequence.
    pub period_index: usize,
    /// Type of the period.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
}

/// A pending hand-off from one period to the adjacent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTransition {
    /// The period being left.
    pub from: TransitionEndpoint,
    /// The period being entered.
    pub to: TransitionEndpoint,
    /// Wall-clock boundary between the two periods.
    pub transition_time: TimeOfDay,
    /// True once the `from` period has been checked out.
    pub is_complete: bool,
}
