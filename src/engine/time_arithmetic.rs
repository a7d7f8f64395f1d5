//! Time arithmetic for binding wall-clock boundaries to dates.
//!
//! [`parse_on_reference_date`] and [`materialize_window`] are the only places
//! a static [`TimeOfDay`] becomes a concrete `NaiveDateTime`. Overnight
//! rollover happens here and nowhere else.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{TimeOfDay, TimeWindow};

/// Minutes before a regular period start at which check-in opens.
pub const EARLY_CHECK_IN_MINUTES: u32 = 29;
/// Minutes after a regular period start until which check-in is still accepted.
pub const LATE_CHECK_IN_MINUTES: u32 = 5;
/// Minutes after a regular period end before a check-out counts as late.
pub const LATE_CHECK_OUT_MINUTES: u32 = 15;
/// Minutes after a period end before an open session needs auto-completion.
pub const VERY_LATE_CHECK_OUT_MINUTES: u32 = 60;
/// Minutes before an overtime start at which check-in opens.
pub const OVERTIME_EARLY_CHECK_IN_MINUTES: u32 = 10;
/// Minutes after an overtime end before a check-out counts as late.
pub const OVERTIME_CHECK_OUT_GRACE_MINUTES: u32 = 15;
/// Buffer on each side of a period boundary in which a transition is offered.
pub const TRANSITION_WINDOW_MINUTES: u32 = 15;
/// Minutes a completed overtime session stays the current period after check-out.
pub const RECENT_OVERTIME_THRESHOLD_MINUTES: u32 = 15;

/// Binds a wall-clock time to the calendar date of `reference`.
///
/// Seconds and sub-seconds are always zero in the result.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::parse_on_reference_date;
/// use chrono::NaiveDateTime;
///
/// let now = NaiveDateTime::parse_from_str("2026-01-15 14:37:12", "%Y-%m-%d %H:%M:%S").unwrap();
/// let start = parse_on_reference_date("09:00".parse().unwrap(), now);
/// assert_eq!(start.to_string(), "2026-01-15 09:00:00");
/// ```
pub fn parse_on_reference_date(time: TimeOfDay, reference: NaiveDateTime) -> NaiveDateTime {
    reference.date().and_time(time.to_naive_time())
}

/// Returns true if a period from `start` to `end` crosses midnight.
///
/// Equal boundaries are not overnight.
pub fn is_overnight(start: TimeOfDay, end: TimeOfDay) -> bool {
    end.minutes_since_midnight() < start.minutes_since_midnight()
}

/// Moves `end` to the next day if it falls before `start`.
pub fn resolve_overnight_end(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    if end < start {
        end + Duration::days(1)
    } else {
        end
    }
}

/// Materializes a static period starting on `anchor`.
///
/// The end lands on the following day for overnight periods.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::materialize_window;
/// use chrono::NaiveDate;
///
/// let anchor = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let window = materialize_window("22:00".parse().unwrap(), "06:00".parse().unwrap(), anchor);
/// assert_eq!(window.start.to_string(), "2026-01-15 22:00:00");
/// assert_eq!(window.end.to_string(), "2026-01-16 06:00:00");
/// ```
pub fn materialize_window(start: TimeOfDay, end: TimeOfDay, anchor: NaiveDate) -> TimeWindow {
    let start_at = anchor.and_time(start.to_naive_time());
    let end_at = anchor.and_time(end.to_naive_time());
    TimeWindow {
        start: start_at,
        end: resolve_overnight_end(start_at, end_at),
    }
}

/// Signed minutes from `from` to `to`.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_minutes()
}
