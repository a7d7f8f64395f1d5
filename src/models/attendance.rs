//! Attendance record model.
//!
//! Records are owned by the persistence layer; the engine only reads them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{PeriodType, TimeWindow};

/// A single work session, open or closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The employee this record belongs to.
    pub employee_id: String,
    /// Whether the session was opened against the regular shift or overtime.
    #[serde(rename = "type")]
    pub record_type: PeriodType,
    /// When the employee checked in.
    pub check_in_time: Option<NaiveDateTime>,
    /// When the employee checked out. `None` while the session is open.
    pub check_out_time: Option<NaiveDateTime>,
    /// Period start this record was opened against.
    pub shift_start_time: NaiveDateTime,
    /// Period end this record was opened against. On the next day for overnight periods.
    pub shift_end_time: NaiveDateTime,
    /// The approved overtime this record was opened against, if any.
    #[serde(default)]
    pub overtime_id: Option<String>,
}

impl AttendanceRecord {
    /// Returns true if the employee is checked in and has not checked out.
    pub fn is_active(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }

    /// Returns true if the session has been checked out.
    pub fn is_completed(&self) -> bool {
        self.check_out_time.is_some()
    }

    /// The materialized window this record was opened against.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.shift_start_time,
            end: self.shift_end_time,
        }
    }

    /// Checks the record's own timestamps for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAttendance`] if the record has a check-out
    /// without a check-in, checks out before it checks in, or its shift window
    /// ends before it starts.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::InvalidAttendance {
            record_id: self.id.clone(),
            message: message.to_string(),
        };

        if self.shift_end_time < self.shift_start_time {
            return Err(invalid("shift window ends before it starts"));
        }

        match (self.check_in_time, self.check_out_time) {
            (None, Some(_)) => Err(invalid("check-out recorded without check-in")),
            (Some(check_in), Some(check_out)) if check_out < check_in => {
                Err(invalid("check-out precedes check-in"))
            }
            _ => Ok(()),
        }
    }
}
