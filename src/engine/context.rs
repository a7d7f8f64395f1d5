//! Per-call inputs shared by the resolver, transition calculator and validator.

use chrono::{Duration, NaiveDateTime};

use crate::config::GraceConfig;
use crate::models::{
    AttendanceRecord, OvertimeContext, PeriodDefinition, PeriodType, ShiftDefinition, TimeWindow,
};

use super::sequence::build_period_sequence;

/// Everything one resolution call reads, plus the period sequence built from it.
///
/// Borrowed for the duration of a single call and then dropped. Nothing in
/// here outlives the call that created it.
#[derive(Debug, Clone)]
pub struct PeriodContext<'a> {
    /// The employee's effective shift.
    pub shift: &'a ShiftDefinition,
    /// Approved overtime for the day, if any.
    pub overtime: Option<&'a OvertimeContext>,
    /// The day's attendance records.
    pub records: &'a [AttendanceRecord],
    /// The instant being resolved.
    pub now: NaiveDateTime,
    /// Grace windows.
    pub grace: &'a GraceConfig,
    /// Candidate periods, chronologically sorted.
    pub sequence: Vec<PeriodDefinition>,
}

impl<'a> PeriodContext<'a> {
    /// Creates a context and builds the period sequence for it.
    pub fn new(
        shift: &'a ShiftDefinition,
        overtime: Option<&'a OvertimeContext>,
        records: &'a [AttendanceRecord],
        now: NaiveDateTime,
        grace: &'a GraceConfig,
    ) -> Self {
        let active = records.iter().find(|r| r.is_active());
        let sequence = build_period_sequence(shift, overtime, active, now);
        Self {
            shift,
            overtime,
            records,
            now,
            grace,
            sequence,
        }
    }

    /// The open record, if any.
    pub fn active_record(&self) -> Option<&'a AttendanceRecord> {
        self.records.iter().find(|r| r.is_active())
    }

    /// The record with the latest check-in.
    pub fn most_recent_record(&self) -> Option<&'a AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| r.check_in_time.is_some())
            .max_by_key(|r| r.check_in_time)
    }

    /// The overtime context a record was opened against.
    ///
    /// A record naming a different overtime ID than the current context gets none.
    pub fn overtime_for(&self, record: &AttendanceRecord) -> Option<&'a OvertimeContext> {
        self.overtime.filter(|ot| {
            record
                .overtime_id
                .as_ref()
                .is_none_or(|id| *id == ot.id)
        })
    }

    /// Index of the first sequence entry of `period_type`.
    pub fn sequence_index_of(&self, period_type: PeriodType) -> Option<usize> {
        self.sequence
            .iter()
            .position(|p| p.period_type == period_type)
    }

    /// Returns true if a completed overtime session ended exactly where `window` starts.
    pub fn follows_completed_overtime(&self, window: &TimeWindow) -> bool {
        self.records.iter().any(|r| {
            r.record_type == PeriodType::Overtime
                && r.is_completed()
                && r.shift_end_time == window.start
        })
    }

    /// The closed record of `period_type` opened against exactly `window`.
    pub fn completed_record_for(
        &self,
        period_type: PeriodType,
        window: &TimeWindow,
    ) -> Option<&'a AttendanceRecord> {
        self.records.iter().find(|r| {
            r.record_type == period_type && r.is_completed() && r.window() == *window
        })
    }

    /// Grace before the start of a period of `period_type` in which check-in opens.
    pub fn early_grace(&self, period_type: PeriodType) -> Duration {
        match period_type {
            PeriodType::Regular => self.grace.early_check_in(),
            PeriodType::Overtime => self.grace.overtime_early_check_in(),
        }
    }

    /// Grace after the end of a period of `period_type` in which check-out is on time.
    pub fn check_out_grace(&self, period_type: PeriodType) -> Duration {
        match period_type {
            PeriodType::Regular => self.grace.late_check_out(),
            PeriodType::Overtime => self.grace.overtime_check_out_grace(),
        }
    }
}
