//! Configuration types for the attendance engine.
//!
//! This module contains the grace-window configuration deserialized from
//! YAML. Every field is optional in the file and falls back to the engine's
//! built-in constants.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::engine::{
    EARLY_CHECK_IN_MINUTES, LATE_CHECK_IN_MINUTES, LATE_CHECK_OUT_MINUTES,
    OVERTIME_CHECK_OUT_GRACE_MINUTES, OVERTIME_EARLY_CHECK_IN_MINUTES,
    RECENT_OVERTIME_THRESHOLD_MINUTES, TRANSITION_WINDOW_MINUTES, VERY_LATE_CHECK_OUT_MINUTES,
};

/// Grace windows around period boundaries, in minutes.
///
/// # Example
///
/// ```
/// use attendance_engine::config::GraceConfig;
///
/// let config = GraceConfig::default();
/// assert_eq!(config.early_check_in, 29);
/// assert_eq!(config.late_check_in, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraceConfig {
    /// How early before a regular period start check-in opens.
    pub early_check_in: u32,
    /// How long after a regular period start check-in stays open; beyond it the check-in is late.
    pub late_check_in: u32,
    /// How long after a regular period end check-out is still on time.
    pub late_check_out: u32,
    /// How long after a period end an open session is flagged for auto-completion.
    pub very_late_check_out: u32,
    /// How early before an overtime start check-in opens.
    pub overtime_early_check_in: u32,
    /// How long after an overtime end check-out is still on time.
    pub overtime_check_out_grace: u32,
    /// Width of the buffer on each side of a boundary in which a transition is offered.
    pub transition_window: u32,
    /// How long a just-completed overtime session stays the current period.
    pub recent_overtime_threshold: u32,
}

impl Default for GraceConfig {
    fn default() -> Self {
        Self {
            early_check_in: EARLY_CHECK_IN_MINUTES,
            late_check_in: LATE_CHECK_IN_MINUTES,
            late_check_out: LATE_CHECK_OUT_MINUTES,
            very_late_check_out: VERY_LATE_CHECK_OUT_MINUTES,
            overtime_early_check_in: OVERTIME_EARLY_CHECK_IN_MINUTES,
            overtime_check_out_grace: OVERTIME_CHECK_OUT_GRACE_MINUTES,
            transition_window: TRANSITION_WINDOW_MINUTES,
            recent_overtime_threshold: RECENT_OVERTIME_THRESHOLD_MINUTES,
        }
    }
}

impl GraceConfig {
    /// Early check-in grace as a duration.
    pub fn early_check_in(&self) -> Duration {
        minutes(self.early_check_in)
    }

    /// Late check-in grace as a duration.
    pub fn late_check_in(&self) -> Duration {
        minutes(self.late_check_in)
    }

    /// Late check-out grace as a duration.
    pub fn late_check_out(&self) -> Duration {
        minutes(self.late_check_out)
    }

    /// Very-late check-out threshold as a duration.
    pub fn very_late_check_out(&self) -> Duration {
        minutes(self.very_late_check_out)
    }

    /// Overtime early check-in grace as a duration.
    pub fn overtime_early_check_in(&self) -> Duration {
        minutes(self.overtime_early_check_in)
    }

    /// Overtime check-out grace as a duration.
    pub fn overtime_check_out_grace(&self) -> Duration {
        minutes(self.overtime_check_out_grace)
    }

    /// Transition buffer as a duration.
    pub fn transition_window(&self) -> Duration {
        minutes(self.transition_window)
    }

    /// Recently-completed overtime threshold as a duration.
    pub fn recent_overtime_threshold(&self) -> Duration {
        minutes(self.recent_overtime_threshold)
    }
}

fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}
