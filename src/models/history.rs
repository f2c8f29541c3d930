use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description stored for contractor-initiated status changes.
pub const STATUS_CHANGE_DESCRIPTION: &str = "changed status";

/// Immutable audit record of one status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub from_status: Status,
    pub to_status: Status,
    pub comment: Option<String>,
    pub timesheet_id: Option<i64>,
    pub contractor_id: Option<i64>,
    pub manager_id: Option<i64>,
}

/// Values for a history row that has not been written yet.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub from_status: Status,
    pub to_status: Status,
    pub comment: Option<String>,
    pub timesheet_id: i64,
    pub contractor_id: Option<i64>,
    pub manager_id: Option<i64>,
}
