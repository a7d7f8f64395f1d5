//! Period sequence construction.
//!
//! A day has at most three candidate periods: overtime before the shift
//! ("early-morning" overtime), the regular shift, and overtime after it.

use chrono::{Days, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::{
    AttendanceRecord, OvertimeContext, PeriodDefinition, PeriodType, ShiftDefinition, TimeOfDay,
};

use super::time_arithmetic::{is_overnight, parse_on_reference_date};

/// Builds the chronologically ordered candidate periods for a day.
///
/// An open overtime session whose window contains `now` short-circuits the
/// sequence to that single period. The approved overtime may have been edited
/// or withdrawn after check-in, so the record wins over the static context.
///
/// Otherwise the sequence is `[early overtime] + [regular] + [late overtime]`,
/// sorted by the start time each period resolves to on `now`'s date. The sort
/// never reorders across days. The regular period is marked as a day off for
/// day-off overtime, or when the shift occurrence around `now` does not start
/// on a work day.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::build_period_sequence;
/// use attendance_engine::models::{OvertimeContext, PeriodType, ShiftDefinition};
/// use chrono::NaiveDateTime;
///
/// let shift = ShiftDefinition {
///     id: "day".to_string(),
///     name: String::new(),
///     start_time: "09:00".parse().unwrap(),
///     end_time: "18:00".parse().unwrap(),
///     work_days: (1..6).collect(),
/// };
/// let overtime = OvertimeContext {
///     id: "ot_001".to_string(),
///     start_time: "06:00".parse().unwrap(),
///     end_time: "09:00".parse().unwrap(),
///     duration_minutes: 180,
///     is_inside_shift_hours: false,
///     is_day_off_overtime: false,
///     reason: None,
/// };
/// let now = NaiveDateTime::parse_from_str("2026-01-15 07:00", "%Y-%m-%d %H:%M").unwrap();
///
/// let sequence = build_period_sequence(&shift, Some(&overtime), None, now);
/// assert_eq!(sequence[0].period_type, PeriodType::Overtime);
/// assert_eq!(sequence[1].period_type, PeriodType::Regular);
/// ```
pub fn build_period_sequence(
    shift: &ShiftDefinition,
    overtime: Option<&OvertimeContext>,
    active_record: Option<&AttendanceRecord>,
    now: NaiveDateTime,
) -> Vec<PeriodDefinition> {
    if let Some(record) = active_record.filter(|r| {
        r.record_type == PeriodType::Overtime && r.window().contains(now)
    }) {
        debug!(record_id = %record.id, "Open overtime session fixes the period sequence");
        return vec![PeriodDefinition {
            period_type: PeriodType::Overtime,
            start_time: TimeOfDay::from_naive_time(record.shift_start_time.time()),
            end_time: TimeOfDay::from_naive_time(record.shift_end_time.time()),
            sequence: 0,
            is_overnight: record.window().spans_midnight(),
            is_day_off: overtime.is_some_and(|ot| ot.is_day_off_overtime),
        }];
    }

    let overtime_period = overtime.map(|ot| PeriodDefinition {
        period_type: PeriodType::Overtime,
        start_time: ot.start_time,
        end_time: ot.end_time,
        sequence: 0,
        is_overnight: is_overnight(ot.start_time, ot.end_time),
        is_day_off: ot.is_day_off_overtime,
    });
    let is_early_overtime = overtime.is_some_and(|ot| {
        ot.start_time.minutes_since_midnight() < shift.start_time.minutes_since_midnight()
    });

    let regular_overnight = is_overnight(shift.start_time, shift.end_time);
    let regular = PeriodDefinition {
        period_type: PeriodType::Regular,
        start_time: shift.start_time,
        end_time: shift.end_time,
        sequence: 0,
        is_overnight: regular_overnight,
        is_day_off: overtime.is_some_and(|ot| ot.is_day_off_overtime)
            || !shift.is_work_day(shift_date(shift, regular_overnight, now)),
    };

    let mut periods = Vec::with_capacity(3);
    match overtime_period {
        Some(ot) if is_early_overtime => {
            periods.push(ot);
            periods.push(regular);
        }
        Some(ot) => {
            periods.push(regular);
            periods.push(ot);
        }
        None => periods.push(regular),
    }

    periods.sort_by_key(|p| parse_on_reference_date(p.start_time, now));
    for (index, period) in periods.iter_mut().enumerate() {
        period.sequence = index;
    }

    periods
}

/// The date the shift occurrence around `now` started on.
///
/// Before an overnight shift's end time, `now` is still inside the occurrence
/// that began yesterday.
fn shift_date(shift: &ShiftDefinition, overnight: bool, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    if overnight && TimeOfDay::from_naive_time(now.time()) < shift.end_time {
        today.checked_sub_days(Days::new(1)).unwrap_or(today)
    } else {
        today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn make_shift(start: &str, end: &str) -> ShiftDefinition {
        ShiftDefinition {
            id: "shift_001".to_string(),
            name: String::new(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            work_days: (0..7).collect(),
        }
    }

    fn make_overtime(start: &str, end: &str) -> OvertimeContext {
        OvertimeContext {
            id: "ot_001".to_string(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            duration_minutes: 120,
            is_inside_shift_hours: false,
            is_day_off_overtime: false,
            reason: None,
        }
    }

    #[test]
    fn test_regular_only() {
        let shift = make_shift("09:00", "18:00");
        let sequence = build_period_sequence(&shift, None, None, make_datetime("2026-01-15 10:00"));

        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].period_type, PeriodType::Regular);
        assert_eq!(sequence[0].sequence, 0);
        assert!(!sequence[0].is_overnight);
    }

    #[test]
    fn test_evening_overtime_follows_regular() {
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("18:00", "20:00");
        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            None,
            make_datetime("2026-01-15 10:00"),
        );

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[0].period_type, PeriodType::Regular);
        assert_eq!(sequence[1].period_type, PeriodType::Overtime);
        assert_eq!(sequence[1].sequence, 1);
    }

    #[test]
    fn test_early_overtime_precedes_regular() {
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("06:00", "09:00");
        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            None,
            make_datetime("2026-01-15 07:00"),
        );

        assert_eq!(sequence[0].period_type, PeriodType::Overtime);
        assert_eq!(sequence[0].sequence, 0);
        assert_eq!(sequence[1].period_type, PeriodType::Regular);
        assert_eq!(sequence[1].sequence, 1);
    }

    #[test]
    fn test_overnight_flags() {
        let shift = make_shift("22:00", "06:00");
        let overtime = make_overtime("06:00", "08:00");
        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            None,
            make_datetime("2026-01-15 23:00"),
        );

        let regular = sequence
            .iter()
            .find(|p| p.period_type == PeriodType::Regular)
            .unwrap();
        let ot = sequence
            .iter()
            .find(|p| p.period_type == PeriodType::Overtime)
            .unwrap();
        assert!(regular.is_overnight);
        assert!(!ot.is_overnight);
    }

    #[test]
    fn test_day_off_overtime_marks_both_periods() {
        let shift = make_shift("09:00", "18:00");
        let mut overtime = make_overtime("10:00", "14:00");
        overtime.is_day_off_overtime = true;
        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            None,
            make_datetime("2026-01-17 10:00"),
        );

        assert!(sequence.iter().all(|p| p.is_day_off));
    }

    #[test]
    fn test_non_work_day_marks_regular_day_off() {
        let mut shift = make_shift("09:00", "18:00");
        shift.work_days = (1..6).collect();

        // 2026-01-17 is a Saturday, 2026-01-16 a Friday
        let saturday = build_period_sequence(&shift, None, None, make_datetime("2026-01-17 10:00"));
        assert!(saturday[0].is_day_off);

        let friday = build_period_sequence(&shift, None, None, make_datetime("2026-01-16 10:00"));
        assert!(!friday[0].is_day_off);
    }

    #[test]
    fn test_overnight_work_day_follows_shift_start() {
        let mut shift = make_shift("22:00", "06:00");
        shift.work_days = (1..6).collect();

        // Friday night's shift is still running early on Saturday.
        let after_midnight =
            build_period_sequence(&shift, None, None, make_datetime("2026-01-17 02:00"));
        assert!(!after_midnight[0].is_day_off);

        // Saturday night has no shift.
        let saturday_evening =
            build_period_sequence(&shift, None, None, make_datetime("2026-01-17 21:45"));
        assert!(saturday_evening[0].is_day_off);
    }

    #[test]
    fn test_open_overtime_session_short_circuits() {
        let shift = make_shift("22:00", "06:00");
        let overtime = make_overtime("18:00", "20:00");
        let record = AttendanceRecord {
            id: "att_001".to_string(),
            employee_id: "emp_001".to_string(),
            record_type: PeriodType::Overtime,
            check_in_time: Some(make_datetime("2026-01-15 22:05")),
            check_out_time: None,
            shift_start_time: make_datetime("2026-01-15 22:00"),
            shift_end_time: make_datetime("2026-01-16 06:00"),
            overtime_id: None,
        };

        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            Some(&record),
            make_datetime("2026-01-16 02:00"),
        );

        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].period_type, PeriodType::Overtime);
        assert_eq!(sequence[0].start_time.to_string(), "22:00");
        assert_eq!(sequence[0].end_time.to_string(), "06:00");
        assert!(sequence[0].is_overnight);
    }

    #[test]
    fn test_open_overtime_outside_window_does_not_short_circuit() {
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("18:00", "20:00");
        let record = AttendanceRecord {
            id: "att_001".to_string(),
            employee_id: "emp_001".to_string(),
            record_type: PeriodType::Overtime,
            check_in_time: Some(make_datetime("2026-01-15 18:00")),
            check_out_time: None,
            shift_start_time: make_datetime("2026-01-15 18:00"),
            shift_end_time: make_datetime("2026-01-15 20:00"),
            overtime_id: None,
        };

        let sequence = build_period_sequence(
            &shift,
            Some(&overtime),
            Some(&record),
            make_datetime("2026-01-15 20:30"),
        );

        assert_eq!(sequence.len(), 2);
    }
}
