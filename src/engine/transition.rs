//! Period transition detection.
//!
//! A transition is offered when "now" sits in the buffer around the boundary
//! between an overtime period and the regular shift next to it, and nobody is
//! checked in. Mid-session transitions are signalled by the validator's
//! `requires_transition` flag instead.

use tracing::debug;

use crate::models::{PeriodTransition, PeriodType, TimeWindow, TransitionEndpoint};

use super::context::PeriodContext;
use super::resolver::Resolution;
use super::time_arithmetic::parse_on_reference_date;

/// Computes the pending transition for the resolved period, if any.
///
/// Returns at most one transition. Overtime → regular is checked before
/// regular → overtime.
pub fn calculate_transitions(
    ctx: &PeriodContext<'_>,
    resolution: &Resolution,
) -> Vec<PeriodTransition> {
    if ctx.active_record().is_some() {
        return Vec::new();
    }

    let transition =
        overtime_to_regular(ctx, resolution).or_else(|| regular_to_overtime(ctx, resolution));

    if let Some(t) = &transition {
        debug!(
            from = %t.from.period_type,
            to = %t.to.period_type,
            at = %t.transition_time,
            "Pending period transition"
        );
    }

    transition.into_iter().collect()
}

fn overtime_to_regular(
    ctx: &PeriodContext<'_>,
    resolution: &Resolution,
) -> Option<PeriodTransition> {
    let current = &resolution.state;
    if current.period_type != PeriodType::Overtime {
        return None;
    }

    let overtime_index = resolution
        .sequence_index
        .or_else(|| ctx.sequence_index_of(PeriodType::Overtime))?;
    let regular_index = ctx.sequence_index_of(PeriodType::Regular)?;

    let overtime_end = current.time_window.end;
    let regular_start = parse_on_reference_date(ctx.shift.start_time, overtime_end);
    let window = TimeWindow {
        start: overtime_end,
        end: regular_start + ctx.grace.transition_window(),
    };
    if !window.contains(ctx.now) {
        return None;
    }

    Some(PeriodTransition {
        from: TransitionEndpoint {
            period_index: overtime_index,
            period_type: PeriodType::Overtime,
        },
        to: TransitionEndpoint {
            period_index: regular_index,
            period_type: PeriodType::Regular,
        },
        transition_time: ctx.shift.start_time,
        is_complete: current.activity.check_out.is_some(),
    })
}

fn regular_to_overtime(
    ctx: &PeriodContext<'_>,
    resolution: &Resolution,
) -> Option<PeriodTransition> {
    let current = &resolution.state;
    if current.period_type != PeriodType::Regular {
        return None;
    }

    let overtime = ctx.overtime?;
    // Only back-to-back overtime; a gap means a fresh check-in later.
    if overtime.start_time != ctx.shift.end_time {
        return None;
    }

    let regular_index = resolution
        .sequence_index
        .or_else(|| ctx.sequence_index_of(PeriodType::Regular))?;
    let overtime_index = ctx.sequence_index_of(PeriodType::Overtime)?;

    let shift_end = current.time_window.end;
    let buffer = ctx.grace.transition_window();
    let window = TimeWindow {
        start: shift_end - buffer,
        end: shift_end + buffer,
    };
    if !window.contains(ctx.now) {
        return None;
    }

    Some(PeriodTransition {
        from: TransitionEndpoint {
            period_index: regular_index,
            period_type: PeriodType::Regular,
        },
        to: TransitionEndpoint {
            period_index: overtime_index,
            period_type: PeriodType::Overtime,
        },
        transition_time: ctx.shift.end_time,
        is_complete: current.activity.check_out.is_some(),
    })
}
