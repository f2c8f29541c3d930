use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::history::{NewHistoryEntry, STATUS_CHANGE_DESCRIPTION};
use crate::models::{Caller, HistoryEntry, Status};
use crate::utils::date::now_utc;
use tracing::{info, warn};

use super::timesheets::{require_contractor, visible_timesheet};

/// Contractor-initiated status changes (draft ⇄ submitted).
pub struct StatusLogic;

impl StatusLogic {
    /// Move a timesheet to `to_status` and record the change.
    ///
    /// The update only applies while the stored status is the expected
    /// predecessor. The update and its history row commit together.
    pub fn transition(
        pool: &mut DbPool,
        caller: &Caller,
        timesheet_id: i64,
        to_status: Status,
    ) -> AppResult<HistoryEntry> {
        let contractor = require_contractor(caller)?;
        let from_status = to_status.contractor_predecessor().ok_or_else(|| {
            AppError::validation(format!("toStatus must be draft or submitted, got {to_status}"))
        })?;

        visible_timesheet(&pool.conn, caller, timesheet_id)?;

        let now = now_utc();
        let tx = pool.conn.transaction()?;

        let updated = queries::update_status_if(
            &tx,
            timesheet_id,
            contractor.id,
            from_status,
            to_status,
            &now,
        )?;
        if updated == 0 {
            warn!(timesheet_id, %from_status, %to_status, "status precondition not met");
            return Err(AppError::StatusTransition(format!(
                "timesheet {timesheet_id} is not {from_status}"
            )));
        }

        let entry = queries::insert_history(
            &tx,
            &NewHistoryEntry {
                description: STATUS_CHANGE_DESCRIPTION.to_string(),
                created_at: now,
                from_status,
                to_status,
                comment: None,
                timesheet_id,
                contractor_id: Some(contractor.id),
                manager_id: None,
            },
        )?;

        tx.commit()?;

        info!(timesheet_id, %from_status, %to_status, history_id = entry.id, "status changed");
        Ok(entry)
    }
}
