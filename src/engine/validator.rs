//! Period validation.
//!
//! Turns a resolved period into check-in/check-out decisions, timing flags
//! and a list of findings. Nothing here fails: every anomaly becomes a
//! [`ValidationError`] or [`ValidationWarning`] in the result.

use chrono::{Days, NaiveDateTime};

use crate::models::{
    AllowedTimeWindow, PeriodTransition, PeriodType, Severity, TimeOfDay, TimeWindow,
    TimingFlags, UnifiedPeriodState, ValidationContext, ValidationError, ValidationErrorCode,
    ValidationMetadata, ValidationResult, ValidationWarning, ValidationWarningCode,
};

use super::context::PeriodContext;
use super::resolver::{Resolution, ResolutionStrategy};
use super::time_arithmetic::{materialize_window, minutes_between};

/// Validates the resolved period against the current instant.
pub fn validate_period(
    ctx: &PeriodContext<'_>,
    resolution: &Resolution,
    transitions: &[PeriodTransition],
) -> ValidationResult {
    let state = &resolution.state;
    let window = state.time_window;
    let period_type = state.period_type;
    let now = ctx.now;
    let has_active_session = ctx.active_record().is_some();
    let is_fallback = resolution.strategy == ResolutionStrategy::Fallback;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let snapshot = ValidationContext {
        period_type,
        period_start: window.start,
        period_end: window.end,
        has_active_session,
    };
    let mut push_error = |code: ValidationErrorCode, message: String| {
        errors.push(ValidationError {
            code,
            message,
            severity: Severity::Error,
            timestamp: now,
            context: snapshot.clone(),
        });
    };

    // Time-window check. A just-completed overtime is shown for information only.
    if is_fallback {
        push_error(
            ValidationErrorCode::NoApplicablePeriod,
            format!("No scheduled or recorded period applies at {}", now.format("%H:%M")),
        );
    } else if resolution.strategy != ResolutionStrategy::RecentlyCompletedOvertime {
        let after = if has_active_session {
            ctx.grace.very_late_check_out()
        } else {
            ctx.check_out_grace(period_type)
        };
        let allowed = window.extended(ctx.early_grace(period_type), after);
        if !allowed.contains(now) {
            push_error(
                ValidationErrorCode::OutsideTimeWindow,
                format!(
                    "{} is outside the {} period {} - {} including grace",
                    now.format("%H:%M"),
                    period_type,
                    window.start.format("%H:%M"),
                    window.end.format("%H:%M")
                ),
            );
        }
    }

    let timing = timing_flags(ctx, state, has_active_session, is_fallback);

    if timing.is_late_check_in {
        warnings.push(warning(
            ValidationWarningCode::LateCheckIn,
            format!(
                "Checking in {} minutes after the period start",
                minutes_between(window.start, now)
            ),
        ));
    }

    if timing.is_late_check_out {
        warnings.push(warning(
            ValidationWarningCode::LateCheckOut,
            format!(
                "Still checked in {} minutes after the period end",
                minutes_between(window.end, now)
            ),
        ));
    }

    if period_type == PeriodType::Overtime && state.activity.check_out.is_none() {
        warnings.extend(overtime_warnings(ctx, state));
    }

    let check_in_allowed =
        !has_active_session && !is_fallback && check_in_window(ctx, state).contains(now);

    let check_out_allowed = has_active_session
        && (period_type == PeriodType::Overtime
            || timing.is_late_check_out
            || timing.is_very_late_check_out);

    let overtime_allowed = overtime_window_contains(ctx, state, now)
        || transitions
            .iter()
            .any(|t| t.to.period_type == PeriodType::Overtime);

    let metadata = ValidationMetadata {
        requires_transition: has_active_session && requires_transition(ctx, resolution),
        requires_auto_completion: timing.is_very_late_check_out,
        has_active_session,
    };

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        check_in_allowed,
        check_out_allowed,
        overtime_allowed,
        allowed_time_windows: allowed_time_windows(ctx, state),
        timing,
        metadata,
    }
}

fn warning(code: ValidationWarningCode, message: String) -> ValidationWarning {
    ValidationWarning {
        code,
        message,
        severity: Severity::Warning,
    }
}

fn timing_flags(
    ctx: &PeriodContext<'_>,
    state: &UnifiedPeriodState,
    has_active_session: bool,
    is_fallback: bool,
) -> TimingFlags {
    if is_fallback {
        return TimingFlags::default();
    }

    let window = state.time_window;
    let now = ctx.now;
    let awaiting_check_in = !has_active_session && state.activity.check_in.is_none();

    TimingFlags {
        is_early_check_in: awaiting_check_in && now < window.start,
        // Late is immediate; `check_in_allowed` applies the grace separately.
        is_late_check_in: awaiting_check_in && now > window.start,
        is_late_check_out: has_active_session
            && now > window.end + ctx.check_out_grace(state.period_type),
        is_very_late_check_out: has_active_session
            && now > window.end + ctx.grace.very_late_check_out(),
    }
}

/// The window in which a check-in for the resolved period is accepted.
fn check_in_window(ctx: &PeriodContext<'_>, state: &UnifiedPeriodState) -> TimeWindow {
    let window = state.time_window;
    match state.period_type {
        PeriodType::Regular => TimeWindow {
            start: window.start - ctx.grace.early_check_in(),
            end: window.start + ctx.grace.late_check_in(),
        },
        PeriodType::Overtime => TimeWindow {
            start: window.start - ctx.grace.overtime_early_check_in(),
            end: window.end,
        },
    }
}

/// The approved overtime window, materialized on the resolved period's start date.
fn approved_overtime_window(ctx: &PeriodContext<'_>, state: &UnifiedPeriodState) -> Option<TimeWindow> {
    let overtime = ctx.overtime?;
    Some(materialize_window(
        overtime.start_time,
        overtime.end_time,
        state.time_window.start.date(),
    ))
}

fn overtime_warnings(ctx: &PeriodContext<'_>, state: &UnifiedPeriodState) -> Vec<ValidationWarning> {
    let now = ctx.now;
    let Some(approved) = approved_overtime_window(ctx, state) else {
        return vec![warning(
            ValidationWarningCode::OutsideOvertimePeriod,
            "No approved overtime covers this session".to_string(),
        )];
    };

    let mut warnings = Vec::new();
    let effective = approved.extended(
        ctx.grace.overtime_early_check_in(),
        ctx.grace.overtime_check_out_grace(),
    );
    if !effective.contains(now) {
        warnings.push(warning(
            ValidationWarningCode::OutsideOvertimePeriod,
            format!(
                "{} is outside the approved overtime {} - {}",
                now.format("%H:%M"),
                approved.start.format("%H:%M"),
                approved.end.format("%H:%M")
            ),
        ));
    }
    if now < effective.start {
        warnings.push(warning(
            ValidationWarningCode::EarlyOvertime,
            format!(
                "Overtime starts in {} minutes",
                minutes_between(now, approved.start)
            ),
        ));
    }
    warnings
}

fn overtime_window_contains(
    ctx: &PeriodContext<'_>,
    state: &UnifiedPeriodState,
    now: NaiveDateTime,
) -> bool {
    let Some(overtime) = ctx.overtime else {
        return false;
    };

    // An overnight overtime seen after midnight belongs to yesterday.
    let mut anchors = vec![state.time_window.start.date(), now.date()];
    if let Some(yesterday) = now.date().checked_sub_days(Days::new(1)) {
        anchors.push(yesterday);
    }

    anchors.into_iter().any(|anchor| {
        materialize_window(overtime.start_time, overtime.end_time, anchor)
            .extended(
                ctx.grace.overtime_early_check_in(),
                ctx.grace.overtime_check_out_grace(),
            )
            .contains(now)
    })
}

/// True if the open period hands off directly to another one and its end is near.
///
/// The adjacent period is matched by wall-clock boundary rather than by
/// sequence position: after an overnight shift the period that follows it
/// sorts first on the new day.
fn requires_transition(ctx: &PeriodContext<'_>, resolution: &Resolution) -> bool {
    let Some(index) = resolution.sequence_index else {
        return false;
    };
    let Some(current) = ctx.sequence.get(index) else {
        return false;
    };
    let connected = ctx
        .sequence
        .iter()
        .enumerate()
        .any(|(i, p)| i != index && p.start_time == current.end_time);
    if !connected {
        return false;
    }

    let end = resolution.state.time_window.end;
    TimeWindow {
        start: end - ctx.grace.transition_window(),
        end,
    }
    .contains(ctx.now)
}

/// Every period the employee may still attend, materialized around the resolved one.
///
/// Entries are bound to the resolved period's start date, except that a period
/// starting at or after an overnight period's end belongs to the day it ends on.
fn allowed_time_windows(ctx: &PeriodContext<'_>, state: &UnifiedPeriodState) -> Vec<AllowedTimeWindow> {
    let current = state.time_window;
    let current_start = TimeOfDay::from_naive_time(current.start.time());
    let current_end = TimeOfDay::from_naive_time(current.end.time());

    ctx.sequence
        .iter()
        .filter_map(|p| {
            let follows_overnight = current.spans_midnight()
                && p.start_time >= current_end
                && p.start_time < current_start;
            let anchor = if follows_overnight {
                current.end.date()
            } else {
                current.start.date()
            };

            if p.period_type == PeriodType::Regular
                && (p.is_day_off || !ctx.shift.is_work_day(anchor))
            {
                return None;
            }

            let window = materialize_window(p.start_time, p.end_time, anchor)
                .extended(ctx.early_grace(p.period_type), ctx.check_out_grace(p.period_type));
            Some(AllowedTimeWindow {
                start: window.start,
                end: window.end,
                period_type: p.period_type,
            })
        })
        .collect()
}
