//! Current period resolution.
//!
//! Resolution tries a fixed list of strategies in order; the first one whose
//! guard matches produces the [`UnifiedPeriodState`]. Each strategy can be
//! run on its own through [`ResolutionStrategy::resolve`].

use std::fmt;

use chrono::{Days, Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AttendanceRecord, PeriodActivity, PeriodDefinition, PeriodType, PeriodValidation, TimeWindow,
    UnifiedPeriodState,
};

use super::context::PeriodContext;
use super::time_arithmetic::materialize_window;

/// The ways a current period can be determined, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// An overtime session was checked out moments ago.
    RecentlyCompletedOvertime,
    /// An open overtime session whose window contains now.
    ActiveOvernight,
    /// Any other open session.
    ActiveOpenPeriod,
    /// No open session; the schedule decides.
    ScheduledPeriod,
    /// Nothing applies.
    Fallback,
}

impl ResolutionStrategy {
    /// All strategies in the order they are tried.
    pub const ORDER: [ResolutionStrategy; 5] = [
        ResolutionStrategy::RecentlyCompletedOvertime,
        ResolutionStrategy::ActiveOvernight,
        ResolutionStrategy::ActiveOpenPeriod,
        ResolutionStrategy::ScheduledPeriod,
        ResolutionStrategy::Fallback,
    ];

    /// Runs this strategy alone. Returns `None` if its guard does not match.
    pub fn resolve(self, ctx: &PeriodContext<'_>) -> Option<Resolution> {
        match self {
            ResolutionStrategy::RecentlyCompletedOvertime => resolve_recently_completed(ctx),
            ResolutionStrategy::ActiveOvernight => resolve_active_overnight(ctx),
            ResolutionStrategy::ActiveOpenPeriod => resolve_active_open(ctx),
            ResolutionStrategy::ScheduledPeriod => resolve_scheduled(ctx),
            ResolutionStrategy::Fallback => Some(resolve_fallback(ctx)),
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionStrategy::RecentlyCompletedOvertime => "recently_completed_overtime",
            ResolutionStrategy::ActiveOvernight => "active_overnight",
            ResolutionStrategy::ActiveOpenPeriod => "active_open_period",
            ResolutionStrategy::ScheduledPeriod => "scheduled_period",
            ResolutionStrategy::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

/// A resolved current period and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The strategy that matched.
    pub strategy: ResolutionStrategy,
    /// The resolved period.
    pub state: UnifiedPeriodState,
    /// Position of the resolved period in the context's sequence, if it has one.
    pub sequence_index: Option<usize>,
}

/// Resolves the current period for the context.
///
/// Always succeeds: when no strategy applies, the fallback produces an
/// inactive all-day regular period.
pub fn resolve_current_period(ctx: &PeriodContext<'_>) -> Resolution {
    for strategy in ResolutionStrategy::ORDER {
        if let Some(resolution) = strategy.resolve(ctx) {
            debug!(strategy = %strategy, period_type = %resolution.state.period_type, "Resolved current period");
            return resolution;
        }
    }
    // Fallback always matches.
    resolve_fallback(ctx)
}

fn resolve_recently_completed(ctx: &PeriodContext<'_>) -> Option<Resolution> {
    if ctx.active_record().is_some() {
        return None;
    }

    let record = ctx
        .most_recent_record()
        .filter(|r| r.record_type == PeriodType::Overtime)?;
    let check_out = record.check_out_time?;

    let since_check_out = ctx.now - check_out;
    if since_check_out < Duration::zero() || since_check_out > ctx.grace.recent_overtime_threshold()
    {
        return None;
    }

    Some(Resolution {
        strategy: ResolutionStrategy::RecentlyCompletedOvertime,
        state: state_from_record(ctx, record),
        sequence_index: ctx.sequence_index_of(PeriodType::Overtime),
    })
}

fn resolve_active_overnight(ctx: &PeriodContext<'_>) -> Option<Resolution> {
    let record = ctx
        .active_record()
        .filter(|r| r.record_type == PeriodType::Overtime && r.window().contains(ctx.now))?;

    Some(Resolution {
        strategy: ResolutionStrategy::ActiveOvernight,
        state: state_from_record(ctx, record),
        sequence_index: ctx.sequence_index_of(PeriodType::Overtime),
    })
}

fn resolve_active_open(ctx: &PeriodContext<'_>) -> Option<Resolution> {
    let record = ctx.active_record()?;
    let sequence_index = ctx.sequence_index_of(record.record_type);

    let mut state = state_from_record(ctx, record);
    if let Some(period) = sequence_index.map(|i| &ctx.sequence[i]) {
        state.validation.is_overnight |= period.is_overnight;
    } else {
        debug!(record_id = %record.id, "Open session has no scheduled counterpart");
    }

    Some(Resolution {
        strategy: ResolutionStrategy::ActiveOpenPeriod,
        state,
        sequence_index,
    })
}

fn resolve_scheduled(ctx: &PeriodContext<'_>) -> Option<Resolution> {
    if ctx.active_record().is_some() {
        return None;
    }

    // Overnight periods first: after midnight, now may still belong to
    // yesterday's period.
    let overnight = ctx.sequence.iter().enumerate().filter(|(_, p)| p.is_overnight);
    let same_day = ctx.sequence.iter().enumerate().filter(|(_, p)| !p.is_overnight);

    for (index, period) in overnight.chain(same_day) {
        if period.period_type == PeriodType::Regular && period.is_day_off {
            continue;
        }

        let today = ctx.now.date();
        let anchors = if period.is_overnight {
            vec![today.checked_sub_days(Days::new(1)), Some(today)]
        } else {
            vec![Some(today)]
        };

        for anchor in anchors.into_iter().flatten() {
            if period.period_type == PeriodType::Regular && !ctx.shift.is_work_day(anchor) {
                continue;
            }

            let window = materialize_window(period.start_time, period.end_time, anchor);
            let attendance_window = window.extended(
                ctx.grace.early_check_in(),
                ctx.check_out_grace(period.period_type),
            );
            if attendance_window.contains(ctx.now) {
                return Some(Resolution {
                    strategy: ResolutionStrategy::ScheduledPeriod,
                    state: state_from_schedule(ctx, period, window),
                    sequence_index: Some(index),
                });
            }
        }
    }

    None
}

fn resolve_fallback(ctx: &PeriodContext<'_>) -> Resolution {
    warn!(now = %ctx.now, "No period applies, falling back to an all-day regular period");

    let day = ctx.now.date();
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
    Resolution {
        strategy: ResolutionStrategy::Fallback,
        state: UnifiedPeriodState {
            period_type: PeriodType::Regular,
            time_window: TimeWindow {
                start: day.and_time(NaiveTime::MIN),
                end: day.and_time(end_of_day),
            },
            activity: PeriodActivity::default(),
            validation: PeriodValidation::default(),
        },
        sequence_index: None,
    }
}

/// Builds a period state from an attendance record's own window.
fn state_from_record(ctx: &PeriodContext<'_>, record: &AttendanceRecord) -> UnifiedPeriodState {
    let window = record.window();
    let overtime = match record.record_type {
        PeriodType::Overtime => ctx.overtime_for(record),
        PeriodType::Regular => None,
    };
    // Early/late is judged on the check-in when there is one.
    let reference = record.check_in_time.unwrap_or(ctx.now);

    UnifiedPeriodState {
        period_type: record.record_type,
        time_window: window,
        activity: PeriodActivity {
            is_active: record.is_active(),
            check_in: record.check_in_time,
            check_out: record.check_out_time,
            is_overtime: record.record_type == PeriodType::Overtime,
            is_day_off_overtime: overtime.is_some_and(|ot| ot.is_day_off_overtime),
            is_inside_shift_hours: overtime.is_some_and(|ot| ot.is_inside_shift_hours),
        },
        validation: PeriodValidation {
            is_within_bounds: window.contains(ctx.now),
            is_early: reference < window.start,
            is_late: reference > window.start + ctx.grace.late_check_in(),
            is_overnight: window.spans_midnight(),
            is_connected: ctx.follows_completed_overtime(&window),
        },
    }
}

/// Builds an inactive period state from a scheduled period materialized as `window`.
fn state_from_schedule(
    ctx: &PeriodContext<'_>,
    period: &PeriodDefinition,
    window: TimeWindow,
) -> UnifiedPeriodState {
    let completed = ctx.completed_record_for(period.period_type, &window);
    let overtime = match period.period_type {
        PeriodType::Overtime => ctx.overtime,
        PeriodType::Regular => None,
    };
    let reference = completed
        .and_then(|r| r.check_in_time)
        .unwrap_or(ctx.now);

    UnifiedPeriodState {
        period_type: period.period_type,
        time_window: window,
        activity: PeriodActivity {
            is_active: false,
            check_in: completed.and_then(|r| r.check_in_time),
            check_out: completed.and_then(|r| r.check_out_time),
            is_overtime: period.period_type == PeriodType::Overtime,
            is_day_off_overtime: overtime.is_some_and(|ot| ot.is_day_off_overtime),
            is_inside_shift_hours: overtime.is_some_and(|ot| ot.is_inside_shift_hours),
        },
        validation: PeriodValidation {
            is_within_bounds: window.contains(ctx.now),
            is_early: reference < window.start,
            is_late: reference > window.start + ctx.grace.late_check_in(),
            is_overnight: period.is_overnight,
            is_connected: ctx.follows_completed_overtime(&window),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraceConfig;
    use crate::models::{OvertimeContext, ShiftDefinition};
    use chrono::NaiveDateTime;

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

    fn make_record(
        record_type: PeriodType,
        window: (&str, &str),
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("att_{}", window.0),
            employee_id: "emp_001".to_string(),
            record_type,
            check_in_time: check_in.map(make_datetime),
            check_out_time: check_out.map(make_datetime),
            shift_start_time: make_datetime(window.0),
            shift_end_time: make_datetime(window.1),
            overtime_id: None,
        }
    }

    // ==========================================================================
    // Strategy precedence
    // ==========================================================================

    #[test]
    fn test_strategy_order_is_fixed() {
        assert_eq!(
            ResolutionStrategy::ORDER,
            [
                ResolutionStrategy::RecentlyCompletedOvertime,
                ResolutionStrategy::ActiveOvernight,
                ResolutionStrategy::ActiveOpenPeriod,
                ResolutionStrategy::ScheduledPeriod,
                ResolutionStrategy::Fallback,
            ]
        );
    }

    #[test]
    fn test_recently_completed_overtime_wins_over_schedule() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("18:00", "20:00");
        let records = vec![make_record(
            PeriodType::Overtime,
            ("2026-01-15 18:00", "2026-01-15 20:00"),
            Some("2026-01-15 18:00"),
            Some("2026-01-15 20:00"),
        )];
        let ctx = PeriodContext::new(
            &shift,
            Some(&overtime),
            &records,
            make_datetime("2026-01-15 20:10"),
            &grace,
        );

        // The schedule alone would also pick the overtime period via its grace.
        assert!(ResolutionStrategy::ScheduledPeriod.resolve(&ctx).is_some());

        let resolution = resolve_current_period(&ctx);
        assert_eq!(
            resolution.strategy,
            ResolutionStrategy::RecentlyCompletedOvertime
        );
        assert_eq!(resolution.state.period_type, PeriodType::Overtime);
        assert!(!resolution.state.activity.is_active);
        assert_eq!(
            resolution.state.activity.check_out,
            Some(make_datetime("2026-01-15 20:00"))
        );
    }

    #[test]
    fn test_recently_completed_overtime_threshold_is_inclusive() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let records = vec![make_record(
            PeriodType::Overtime,
            ("2026-01-15 18:00", "2026-01-15 20:00"),
            Some("2026-01-15 18:00"),
            Some("2026-01-15 20:00"),
        )];

        let at_threshold =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 20:15"), &grace);
        assert!(
            ResolutionStrategy::RecentlyCompletedOvertime
                .resolve(&at_threshold)
                .is_some()
        );

        let past_threshold =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 20:16"), &grace);
        assert!(
            ResolutionStrategy::RecentlyCompletedOvertime
                .resolve(&past_threshold)
                .is_none()
        );
    }

    #[test]
    fn test_recently_completed_ignores_regular_records() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let records = vec![make_record(
            PeriodType::Regular,
            ("2026-01-15 09:00", "2026-01-15 18:00"),
            Some("2026-01-15 09:00"),
            Some("2026-01-15 18:00"),
        )];
        let ctx =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 18:05"), &grace);

        assert!(
            ResolutionStrategy::RecentlyCompletedOvertime
                .resolve(&ctx)
                .is_none()
        );
    }

    // ==========================================================================
    // Open sessions
    // ==========================================================================

    #[test]
    fn test_active_overnight_overtime() {
        let grace = GraceConfig::default();
        let shift = make_shift("22:00", "06:00");
        let records = vec![make_record(
            PeriodType::Overtime,
            ("2026-01-15 22:00", "2026-01-16 06:00"),
            Some("2026-01-15 22:05"),
            None,
        )];
        let ctx =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-16 02:00"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ActiveOvernight);
        assert!(resolution.state.activity.is_active);
        assert!(resolution.state.validation.is_overnight);
        assert!(resolution.state.validation.is_within_bounds);
        assert_eq!(
            resolution.state.time_window.start,
            make_datetime("2026-01-15 22:00")
        );
    }

    #[test]
    fn test_open_regular_session_survives_drift_past_end() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let records = vec![make_record(
            PeriodType::Regular,
            ("2026-01-15 09:00", "2026-01-15 18:00"),
            Some("2026-01-15 08:50"),
            None,
        )];
        let ctx =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 21:00"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ActiveOpenPeriod);
        assert!(resolution.state.activity.is_active);
        assert!(!resolution.state.validation.is_within_bounds);
        assert!(resolution.state.validation.is_early);
        assert_eq!(resolution.sequence_index, Some(0));
    }

    #[test]
    fn test_open_overtime_without_schedule_is_kept() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let records = vec![make_record(
            PeriodType::Overtime,
            ("2026-01-15 18:00", "2026-01-15 20:00"),
            Some("2026-01-15 18:00"),
            None,
        )];
        // Approval withdrawn after check-in, and now is past the record's window.
        let ctx =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 20:30"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ActiveOpenPeriod);
        assert_eq!(resolution.state.period_type, PeriodType::Overtime);
        assert!(resolution.state.activity.is_active);
        assert_eq!(resolution.sequence_index, None);
    }

    // ==========================================================================
    // Scheduled periods
    // ==========================================================================

    #[test]
    fn test_scheduled_regular_within_early_grace() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let ctx = PeriodContext::new(&shift, None, &[], make_datetime("2026-01-15 08:31"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ScheduledPeriod);
        assert!(resolution.state.validation.is_early);
        assert!(!resolution.state.validation.is_within_bounds);
    }

    #[test]
    fn test_scheduled_overnight_after_midnight_anchors_yesterday() {
        let grace = GraceConfig::default();
        let shift = make_shift("22:00", "06:00");
        let ctx = PeriodContext::new(&shift, None, &[], make_datetime("2026-01-16 02:00"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ScheduledPeriod);
        assert_eq!(
            resolution.state.time_window.start,
            make_datetime("2026-01-15 22:00")
        );
        assert_eq!(
            resolution.state.time_window.end,
            make_datetime("2026-01-16 06:00")
        );
        assert!(resolution.state.validation.is_overnight);
    }

    #[test]
    fn test_scheduled_overnight_before_midnight_anchors_today() {
        let grace = GraceConfig::default();
        let shift = make_shift("22:00", "06:00");
        let ctx = PeriodContext::new(&shift, None, &[], make_datetime("2026-01-15 21:45"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(
            resolution.state.time_window.start,
            make_datetime("2026-01-15 22:00")
        );
    }

    #[test]
    fn test_scheduled_overtime_uses_overtime_check_out_grace() {
        let grace = GraceConfig {
            overtime_check_out_grace: 5,
            ..GraceConfig::default()
        };
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("18:00", "20:00");

        let inside =
            PeriodContext::new(&shift, Some(&overtime), &[], make_datetime("2026-01-15 20:05"), &grace);
        assert_eq!(
            resolve_current_period(&inside).state.period_type,
            PeriodType::Overtime
        );

        let outside =
            PeriodContext::new(&shift, Some(&overtime), &[], make_datetime("2026-01-15 20:06"), &grace);
        assert_eq!(
            resolve_current_period(&outside).strategy,
            ResolutionStrategy::Fallback
        );
    }

    #[test]
    fn test_scheduled_regular_skipped_on_non_work_day() {
        let grace = GraceConfig::default();
        let mut shift = make_shift("09:00", "18:00");
        shift.work_days = (1..6).collect();
        // 2026-01-17 is a Saturday
        let ctx = PeriodContext::new(&shift, None, &[], make_datetime("2026-01-17 10:00"), &grace);

        assert_eq!(
            resolve_current_period(&ctx).strategy,
            ResolutionStrategy::Fallback
        );
    }

    #[test]
    fn test_day_off_overtime_resolves_overtime_only() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let mut overtime = make_overtime("10:00", "14:00");
        overtime.is_day_off_overtime = true;
        let ctx =
            PeriodContext::new(&shift, Some(&overtime), &[], make_datetime("2026-01-17 09:45"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.state.period_type, PeriodType::Overtime);
        assert!(resolution.state.activity.is_day_off_overtime);
    }

    #[test]
    fn test_scheduled_state_carries_completed_record() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let records = vec![make_record(
            PeriodType::Regular,
            ("2026-01-15 09:00", "2026-01-15 18:00"),
            Some("2026-01-15 08:55"),
            Some("2026-01-15 18:01"),
        )];
        let ctx =
            PeriodContext::new(&shift, None, &records, make_datetime("2026-01-15 18:05"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ScheduledPeriod);
        assert_eq!(
            resolution.state.activity.check_out,
            Some(make_datetime("2026-01-15 18:01"))
        );
        assert!(!resolution.state.validation.is_late);
    }

    #[test]
    fn test_regular_connected_to_completed_early_overtime() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let overtime = make_overtime("06:00", "09:00");
        let records = vec![make_record(
            PeriodType::Overtime,
            ("2026-01-15 06:00", "2026-01-15 09:00"),
            Some("2026-01-15 06:00"),
            Some("2026-01-15 09:00"),
        )];
        let ctx = PeriodContext::new(
            &shift,
            Some(&overtime),
            &records,
            make_datetime("2026-01-15 09:20"),
            &grace,
        );

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::ScheduledPeriod);
        assert_eq!(resolution.state.period_type, PeriodType::Regular);
        assert!(resolution.state.validation.is_connected);
    }

    // ==========================================================================
    // Fallback
    // ==========================================================================

    #[test]
    fn test_fallback_is_all_day_and_inactive() {
        let grace = GraceConfig::default();
        let shift = make_shift("09:00", "18:00");
        let ctx = PeriodContext::new(&shift, None, &[], make_datetime("2026-01-15 03:00"), &grace);

        let resolution = resolve_current_period(&ctx);
        assert_eq!(resolution.strategy, ResolutionStrategy::Fallback);
        assert_eq!(resolution.state.period_type, PeriodType::Regular);
        assert_eq!(
            resolution.state.time_window.start,
            make_datetime("2026-01-15 00:00")
        );
        assert_eq!(
            resolution.state.time_window.end,
            make_datetime("2026-01-15 23:59")
        );
        assert_eq!(resolution.state.activity, PeriodActivity::default());
        assert_eq!(resolution.state.validation, PeriodValidation::default());
    }
}
