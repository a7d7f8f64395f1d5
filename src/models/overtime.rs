//! Approved overtime context.

use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// An approved overtime window for one employee on one day.
///
/// # Example
///
/// ```
/// use attendance_engine::models::OvertimeContext;
///
/// let json = r#"{
///     "id": "ot_001",
///     "start_time": "18:00",
///     "end_time": "20:00",
///     "duration_minutes": 120,
///     "is_inside_shift_hours": false,
///     "is_day_off_overtime": false
/// }"#;
/// let overtime: OvertimeContext = serde_json::from_str(json).unwrap();
/// assert!(overtime.reason.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeContext {
    /// Unique identifier of the approved overtime request.
    pub id: String,
    /// Wall-clock start of the overtime window.
    pub start_time: TimeOfDay,
    /// Wall-clock end of the overtime window.
    pub end_time: TimeOfDay,
    /// Approved duration in minutes.
    pub duration_minutes: u32,
    /// True if the overtime lies inside the regular shift hours rather than next to them.
    #[serde(default)]
    pub is_inside_shift_hours: bool,
    /// True if the overtime is worked on a scheduled day off.
    #[serde(default)]
    pub is_day_off_overtime: bool,
    /// Reason given when the overtime was requested.
    #[serde(default)]
    pub reason: Option<String>,
}
