//! Validation result models.
//!
//! Validation problems are data, not errors: the caller decides whether an
//! `OUTSIDE_TIME_WINDOW` error blocks the requested action.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PeriodType;

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the result from being valid.
    Error,
    /// Advisory only.
    Warning,
}

/// Codes for blocking validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    /// The current instant is outside the period's grace-extended window.
    OutsideTimeWindow,
    /// No scheduled or recorded period applies to the current instant.
    NoApplicablePeriod,
}

/// Codes for advisory validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationWarningCode {
    /// Checking in after the period start.
    LateCheckIn,
    /// Still checked in past the late check-out grace.
    LateCheckOut,
    /// Overtime period resolved outside the approved overtime window.
    OutsideOvertimePeriod,
    /// Before the overtime start minus its early check-in grace.
    EarlyOvertime,
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorCode::OutsideTimeWindow => write!(f, "OUTSIDE_TIME_WINDOW"),
            ValidationErrorCode::NoApplicablePeriod => write!(f, "NO_APPLICABLE_PERIOD"),
        }
    }
}

impl fmt::Display for ValidationWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarningCode::LateCheckIn => write!(f, "LATE_CHECK_IN"),
            ValidationWarningCode::LateCheckOut => write!(f, "LATE_CHECK_OUT"),
            ValidationWarningCode::OutsideOvertimePeriod => write!(f, "OUTSIDE_OVERTIME_PERIOD"),
            ValidationWarningCode::EarlyOvertime => write!(f, "EARLY_OVERTIME"),
        }
    }
}

/// Snapshot of the inputs an error was raised against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Type of the resolved period.
    pub period_type: PeriodType,
    /// Start of the resolved period.
    pub period_start: NaiveDateTime,
    /// End of the resolved period.
    pub period_end: NaiveDateTime,
    /// True if a session was open.
    pub has_active_session: bool,
}

/// A blocking validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Machine-readable code.
    pub code: ValidationErrorCode,
    /// Human-readable explanation.
    pub message: String,
    /// Always [`Severity::Error`].
    pub severity: Severity,
    /// The instant the validation ran for.
    pub timestamp: NaiveDateTime,
    /// Inputs the finding was raised against.
    pub context: ValidationContext,
}

/// An advisory validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Machine-readable code.
    pub code: ValidationWarningCode,
    /// Human-readable explanation.
    pub message: String,
    /// Always [`Severity::Warning`].
    pub severity: Severity,
}

/// A window in which an action is currently accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedTimeWindow {
    /// Window start.
    pub start: NaiveDateTime,
    /// Window end.
    pub end: NaiveDateTime,
    /// Period the window belongs to.
    #[serde(rename = "type")]
    pub period_type: PeriodType,
}

/// Early/late facts about check-in and check-out timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimingFlags {
    /// Before the period start.
    pub is_early_check_in: bool,
    /// After the period start without a check-in.
    pub is_late_check_in: bool,
    /// Open session past the late check-out grace.
    pub is_late_check_out: bool,
    /// Open session past the very-late check-out threshold.
    pub is_very_late_check_out: bool,
}

/// Signals for downstream collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationMetadata {
    /// The open session should be closed and the adjacent period opened.
    pub requires_transition: bool,
    /// The open session is overdue and should be auto-completed.
    pub requires_auto_completion: bool,
    /// A session was open when validation ran.
    pub has_active_session: bool,
}

/// Outcome of validating the resolved period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True if there are no errors.
    pub is_valid: bool,
    /// Blocking findings.
    pub errors: Vec<ValidationError>,
    /// Advisory findings.
    pub warnings: Vec<ValidationWarning>,
    /// A check-in is accepted now.
    pub check_in_allowed: bool,
    /// A late or overtime check-out is authorized now. See [`ValidationResult::permits_check_out`].
    pub check_out_allowed: bool,
    /// Overtime may be worked now.
    pub overtime_allowed: bool,
    /// Windows in which each period of the day accepts attendance.
    pub allowed_time_windows: Vec<AllowedTimeWindow>,
    /// Early/late timing facts.
    pub timing: TimingFlags,
    /// Signals for downstream collaborators.
    pub metadata: ValidationMetadata,
}

impl ValidationResult {
    /// Returns true if a check-out request should be accepted.
    ///
    /// `check_out_allowed` only authorizes overtime and late check-outs. An
    /// on-time regular check-out is accepted whenever a session is open and
    /// the result carries no errors.
    pub fn permits_check_out(&self) -> bool {
        self.check_out_allowed || (self.metadata.has_active_session && self.is_valid)
    }

    /// Returns true if an error with `code` was raised.
    pub fn has_error(&self, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Returns true if a warning with `code` was raised.
    pub fn has_warning(&self, code: ValidationWarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
