//! Period resolution engine.
//!
//! This module builds the day's period sequence, resolves the current
//! period, detects pending transitions between adjacent periods, and
//! validates check-in/check-out actions against grace windows.
//! [`PeriodEngine`] runs all of it for one call.

mod context;
mod resolver;
mod sequence;
mod service;
mod time_arithmetic;
mod transition;
mod validator;

pub use context::PeriodContext;
pub use resolver::{Resolution, ResolutionStrategy, resolve_current_period};
pub use sequence::build_period_sequence;
pub use service::{
    AttendanceProvider, AttendanceService, OvertimeProvider, PeriodEngine, PeriodStateResponse,
    ShiftProvider,
};
pub use time_arithmetic::{
    EARLY_CHECK_IN_MINUTES, LATE_CHECK_IN_MINUTES, LATE_CHECK_OUT_MINUTES,
    OVERTIME_CHECK_OUT_GRACE_MINUTES, OVERTIME_EARLY_CHECK_IN_MINUTES,
    RECENT_OVERTIME_THRESHOLD_MINUTES, TRANSITION_WINDOW_MINUTES, VERY_LATE_CHECK_OUT_MINUTES,
    is_overnight, materialize_window, minutes_between, parse_on_reference_date,
    resolve_overnight_end,
};
pub use transition::calculate_transitions;
pub use validator::validate_period;
