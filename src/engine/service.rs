//! Engine entry point and the service that wires it to its data sources.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GraceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, OvertimeContext, PeriodTransition, ShiftDefinition, UnifiedPeriodState,
    ValidationResult,
};

use super::context::PeriodContext;
use super::resolver::{ResolutionStrategy, resolve_current_period};
use super::time_arithmetic::{is_overnight, materialize_window};
use super::transition::calculate_transitions;
use super::validator::validate_period;

/// Everything the engine knows about an employee's period at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStateResponse {
    /// The resolved current period.
    pub current: UnifiedPeriodState,
    /// The strategy that resolved `current`.
    pub resolved_by: ResolutionStrategy,
    /// Pending transitions, at most one.
    pub transitions: Vec<PeriodTransition>,
    /// The approved overtime the call was made with.
    pub overtime: Option<OvertimeContext>,
    /// Check-in/check-out decisions for `current`.
    pub validation: ValidationResult,
}

/// Stateless period engine.
///
/// Holds only the grace configuration, so a single instance can be cloned
/// or shared freely between threads.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::PeriodEngine;
/// use attendance_engine::models::{PeriodType, ShiftDefinition};
/// use chrono::NaiveDateTime;
///
/// let shift = ShiftDefinition {
///     id: "day".to_string(),
///     name: "Day shift".to_string(),
///     start_time: "09:00".parse().unwrap(),
///     end_time: "18:00".parse().unwrap(),
///     work_days: (0..7).collect(),
/// };
/// let now = NaiveDateTime::parse_from_str("2026-01-15 08:45", "%Y-%m-%d %H:%M").unwrap();
///
/// let engine = PeriodEngine::default();
/// let response = engine
///     .resolve_period_state("emp_001", &[], Some(&shift), None, now)
///     .unwrap();
///
/// assert_eq!(response.current.period_type, PeriodType::Regular);
/// assert!(response.validation.check_in_allowed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PeriodEngine {
    grace: GraceConfig,
}

impl PeriodEngine {
    /// Creates an engine with the given grace configuration.
    pub fn new(grace: GraceConfig) -> Self {
        Self { grace }
    }

    /// Returns the grace configuration.
    pub fn grace(&self) -> &GraceConfig {
        &self.grace
    }

    /// Resolves the current period, pending transitions and validation for
    /// one employee at `now`.
    ///
    /// `records` should hold the employee's attendance for today and, for
    /// overnight periods, yesterday. The result depends only on the inputs.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ShiftNotFound`] if `shift` is `None`.
    /// - [`EngineError::InvalidAttendance`] if a record is malformed, belongs
    ///   to another employee, or more than one record is open.
    pub fn resolve_period_state(
        &self,
        employee_id: &str,
        records: &[AttendanceRecord],
        shift: Option<&ShiftDefinition>,
        overtime: Option<&OvertimeContext>,
        now: NaiveDateTime,
    ) -> EngineResult<PeriodStateResponse> {
        let shift = shift.ok_or_else(|| EngineError::ShiftNotFound {
            employee_id: employee_id.to_string(),
            date: now.date(),
        })?;
        check_records(employee_id, records)?;

        let ctx = PeriodContext::new(shift, overtime, records, now, &self.grace);
        let resolution = resolve_current_period(&ctx);
        let transitions = calculate_transitions(&ctx, &resolution);
        let validation = validate_period(&ctx, &resolution, &transitions);

        Ok(PeriodStateResponse {
            current: resolution.state,
            resolved_by: resolution.strategy,
            transitions,
            overtime: overtime.cloned(),
            validation,
        })
    }
}

fn check_records(employee_id: &str, records: &[AttendanceRecord]) -> EngineResult<()> {
    for record in records {
        record.validate()?;
        if record.employee_id != employee_id {
            warn!(record_id = %record.id, employee_id, "Attendance record belongs to another employee");
            return Err(EngineError::InvalidAttendance {
                record_id: record.id.clone(),
                message: format!(
                    "belongs to employee '{}', not '{}'",
                    record.employee_id, employee_id
                ),
            });
        }
    }

    let mut open = records.iter().filter(|r| r.is_active());
    if let (Some(_), Some(second)) = (open.next(), open.next()) {
        warn!(record_id = %second.id, employee_id, "More than one open attendance record");
        return Err(EngineError::InvalidAttendance {
            record_id: second.id.clone(),
            message: "more than one record is checked in without check-out".to_string(),
        });
    }

    Ok(())
}

/// Source of the effective shift for an employee on a date.
pub trait ShiftProvider {
    /// Returns the shift in effect, or `None` if the employee has none.
    fn effective_shift(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<ShiftDefinition>>;
}

/// Source of approved overtime.
pub trait OvertimeProvider {
    /// Returns the approved overtime starting on `date`, if any.
    fn approved_overtime(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<OvertimeContext>>;
}

/// Source of attendance records.
pub trait AttendanceProvider {
    /// Returns the records whose shift window starts on `date`.
    fn records_for_day(&self, employee_id: &str, date: NaiveDate)
    -> EngineResult<Vec<AttendanceRecord>>;
}

/// Gathers an employee's inputs from the providers and runs the engine.
#[derive(Debug, Clone)]
pub struct AttendanceService<S, O, A> {
    engine: PeriodEngine,
    shifts: S,
    overtime: O,
    attendance: A,
}

impl<S, O, A> AttendanceService<S, O, A>
where
    S: ShiftProvider,
    O: OvertimeProvider,
    A: AttendanceProvider,
{
    /// Creates a service from an engine and its three providers.
    pub fn new(engine: PeriodEngine, shifts: S, overtime: O, attendance: A) -> Self {
        Self {
            engine,
            shifts,
            overtime,
            attendance,
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &PeriodEngine {
        &self.engine
    }

    /// Resolves the employee's period state at `now`.
    ///
    /// Records from yesterday are included so an overnight session stays
    /// visible after midnight. Yesterday's shift is used when it runs past
    /// midnight and still covers `now` while today's does not. Yesterday's
    /// overtime is used only when today has none and it runs past midnight.
    pub fn period_state(
        &self,
        employee_id: &str,
        now: NaiveDateTime,
    ) -> EngineResult<PeriodStateResponse> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, employee_id, now = %now, "Resolving period state");

        let today = now.date();
        let yesterday = today.checked_sub_days(Days::new(1));

        let grace = self.engine.grace();
        let mut shift = self.shifts.effective_shift(employee_id, today)?;
        if !shift.as_ref().is_some_and(|s| shift_covers(grace, s, today, now)) {
            if let Some(day) = yesterday {
                let overnight = self
                    .shifts
                    .effective_shift(employee_id, day)?
                    .filter(|s| is_overnight(s.start_time, s.end_time))
                    .filter(|s| shift_covers(grace, s, day, now));
                if overnight.is_some() {
                    debug!(employee_id, date = %day, "Using yesterday's overnight shift");
                    shift = overnight;
                }
            }
        }

        let mut overtime = self.overtime.approved_overtime(employee_id, today)?;
        if overtime.is_none() {
            if let Some(day) = yesterday {
                overtime = self
                    .overtime
                    .approved_overtime(employee_id, day)?
                    .filter(|ot| is_overnight(ot.start_time, ot.end_time));
            }
        }

        // Keyed by ID so a record returned for both days is kept once.
        let mut records = BTreeMap::new();
        for day in yesterday.into_iter().chain([today]) {
            for record in self.attendance.records_for_day(employee_id, day)? {
                records.entry(record.id.clone()).or_insert(record);
            }
        }
        let records: Vec<AttendanceRecord> = records.into_values().collect();

        let result = self.engine.resolve_period_state(
            employee_id,
            &records,
            shift.as_ref(),
            overtime.as_ref(),
            now,
        );

        match &result {
            Ok(response) => info!(
                correlation_id = %correlation_id,
                period_type = %response.current.period_type,
                strategy = %response.resolved_by,
                is_valid = response.validation.is_valid,
                "Period state resolved"
            ),
            Err(err) => warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Period state resolution failed"
            ),
        }

        result
    }
}

/// Whether the shift occurrence starting on `date`, widened by the check-in
/// and check-out grace, contains `now`.
fn shift_covers(
    grace: &GraceConfig,
    shift: &ShiftDefinition,
    date: NaiveDate,
    now: NaiveDateTime,
) -> bool {
    materialize_window(shift.start_time, shift.end_time, date)
        .extended(grace.early_check_in(), grace.very_late_check_out())
        .contains(now)
}
