use super::weekday::Weekday;
use serde::{Deserialize, Serialize};

/// Hours are logged in quarter-hour steps.
pub const HOURS_STEP: f64 = 0.25;

/// A task covers a single day.
pub const MAX_TASK_HOURS: f64 = 24.0;

/// A single logged work entry belonging to one timesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub weekday: Weekday,
    pub name: String,
    pub hours: f64,
    pub timesheet_id: i64,
}

/// Check that `hours` is a positive multiple of [`HOURS_STEP`].
pub fn validate_hours(hours: f64) -> Result<(), &'static str> {
    if !hours.is_finite() {
        return Err("Hours is required");
    }
    if hours <= 0.0 {
        return Err("Hours must be positive");
    }
    if hours > MAX_TASK_HOURS {
        return Err("Hours cannot exceed 24 per task");
    }
    if (hours / HOURS_STEP).fract() != 0.0 {
        return Err("Hours must be in 0.25 increments");
    }
    Ok(())
}
