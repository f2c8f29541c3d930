use crate::db::pool::DbPool;
use crate::db::queries::{
    self, NewTimesheet, find_timesheet_for_contractor, find_timesheet_for_manager,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Caller, Contractor, HistoryEntry, Timesheet, TimesheetDetail, TimesheetSummary};
use crate::utils::date::{is_week_start, now_utc, week_start_of};
use crate::utils::slug::generate_slug;
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

/// Timesheet creation, listing, reads and week assignment.
pub struct TimesheetLogic;

/// Resolve a timesheet the caller is allowed to read.
pub(crate) fn visible_timesheet(
    conn: &Connection,
    caller: &Caller,
    id: i64,
) -> AppResult<Timesheet> {
    let found = match caller {
        Caller::Contractor(c) => find_timesheet_for_contractor(conn, id, c.id)?,
        Caller::Manager(m) => find_timesheet_for_manager(conn, id, m.id)?,
    };
    found.ok_or_else(|| AppError::not_found(format!("timesheet {id}")))
}

/// Only contractors mutate timesheets.
pub(crate) fn require_contractor(caller: &Caller) -> AppResult<&Contractor> {
    caller.as_contractor().ok_or(AppError::Forbidden)
}

impl TimesheetLogic {
    /// New draft timesheet with the contractor's current rate and approved hours.
    pub fn create(pool: &mut DbPool, caller: &Caller) -> AppResult<Timesheet> {
        let contractor = require_contractor(caller)?;
        let slug = generate_slug();

        let ts = queries::insert_timesheet(
            &pool.conn,
            &NewTimesheet {
                slug: &slug,
                contractor_id: contractor.id,
                approved_hours: contractor.approved_hours,
                rate: contractor.rate,
                now: now_utc(),
            },
        )?;

        info!(timesheet_id = ts.id, contractor_id = contractor.id, slug = %ts.slug, "timesheet created");
        Ok(ts)
    }

    pub fn list(pool: &mut DbPool, caller: &Caller) -> AppResult<Vec<TimesheetSummary>> {
        match caller {
            Caller::Contractor(c) => queries::list_summaries_for_contractor(&pool.conn, c.id),
            Caller::Manager(m) => queries::list_summaries_for_manager(&pool.conn, m.id),
        }
    }

    pub fn detail(pool: &mut DbPool, caller: &Caller, id: i64) -> AppResult<TimesheetDetail> {
        let timesheet = visible_timesheet(&pool.conn, caller, id)?;
        let tasks = queries::load_tasks(&pool.conn, timesheet.id)?;
        let history = queries::load_history(&pool.conn, timesheet.id)?;

        Ok(TimesheetDetail {
            timesheet,
            tasks,
            history,
        })
    }

    pub fn history(pool: &mut DbPool, caller: &Caller, id: i64) -> AppResult<Vec<HistoryEntry>> {
        let timesheet = visible_timesheet(&pool.conn, caller, id)?;
        queries::load_history(&pool.conn, timesheet.id)
    }

    /// Set or clear the week a timesheet covers. `week_start` must be a Sunday.
    pub fn assign_week(
        pool: &mut DbPool,
        caller: &Caller,
        id: i64,
        week_start: Option<NaiveDate>,
    ) -> AppResult<Option<NaiveDate>> {
        let contractor = require_contractor(caller)?;

        if let Some(d) = &week_start
            && !is_week_start(d)
        {
            return Err(AppError::validation(format!(
                "weekStart {d} is not the first day of a week (Sunday); did you mean {}?",
                week_start_of(*d)
            )));
        }

        let updated =
            queries::update_week_start(&pool.conn, id, contractor.id, week_start, &now_utc())?;
        if updated == 0 {
            return Err(AppError::not_found(format!("timesheet {id}")));
        }
        Ok(week_start)
    }
}
