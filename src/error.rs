//! Error types for the attendance engine.
//!
//! Only conditions that make a call meaningless are errors. Anything the
//! caller should merely be told about (late check-in, leaving the overtime
//! window, ...) is reported inside a [`ValidationResult`](crate::models::ValidationResult).

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::InvalidTimeFormat {
///     value: "25:00".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid time of day '25:00': expected HH:mm");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No shift is configured for the employee on the requested date.
    #[error("No shift configured for employee '{employee_id}' on {date}")]
    ShiftNotFound {
        /// The employee the shift was requested for.
        employee_id: String,
        /// The date the shift was requested for.
        date: NaiveDate,
    },

    /// A wall-clock boundary could not be parsed.
    #[error("Invalid time of day '{value}': expected HH:mm")]
    InvalidTimeFormat {
        /// The offending input.
        value: String,
    },

    /// An attendance snapshot violates the engine's input invariants.
    #[error("Invalid attendance record '{record_id}': {message}")]
    InvalidAttendance {
        /// The ID of the offending record.
        record_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An external collaborator (shift, overtime or attendance source) failed.
    #[error("Provider '{source_name}' failed: {message}")]
    ProviderError {
        /// The name of the failing provider.
        source_name: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
