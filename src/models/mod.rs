//! Core data models for the attendance engine.
//!
//! Static schedule boundaries are [`TimeOfDay`] values; anything bound to a
//! date is a `chrono::NaiveDateTime` in the employee's local time.

mod attendance;
mod overtime;
mod period;
mod shift;
mod time_of_day;
mod validation;

pub use attendance::AttendanceRecord;
pub use overtime::OvertimeContext;
pub use period::{
    PeriodActivity, PeriodDefinition, PeriodTransition, PeriodType, PeriodValidation, TimeWindow,
    TransitionEndpoint, UnifiedPeriodState,
};
pub use shift::ShiftDefinition;
pub use time_of_day::TimeOfDay;
pub use validation::{
    AllowedTimeWindow, Severity, TimingFlags, ValidationContext, ValidationError,
    ValidationErrorCode, ValidationMetadata, ValidationResult, ValidationWarning,
    ValidationWarningCode,
};
