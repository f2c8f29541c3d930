//! Queries on timesheets, tasks and history.
//!
//! Ownership is part of every WHERE clause: a contractor only ever touches
//! rows of their own timesheets, a manager only reads non-draft timesheets
//! of their own contractors.

use crate::errors::AppResult;
use crate::models::history::NewHistoryEntry;
use crate::models::{HistoryEntry, Status, Task, Timesheet, TimesheetSummary, Weekday};
use crate::utils::date::{format_date, parse_date, parse_db_timestamp, to_db_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

const TIMESHEET_COLUMNS: &str = "t.id, t.slug, t.status, t.week_start, t.contractor_id, \
                                 t.approved_hours, t.rate, t.created_at, t.updated_at";

const SUMMARY_SELECT: &str = "SELECT t.id, t.slug, t.status, t.week_start, t.contractor_id,
            t.approved_hours, t.rate,
            COALESCE(SUM(k.hours), 0.0) AS total_hours
     FROM timesheets t";

// ---------------------------
// Row mapping
// ---------------------------

fn conversion_err(col: &str, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, format!("{col}: {msg}").into())
}

fn status_col(row: &Row, col: &str) -> rusqlite::Result<Status> {
    let raw: String = row.get(col)?;
    Status::from_db_str(&raw).ok_or_else(|| conversion_err(col, format!("unknown status '{raw}'")))
}

fn weekday_col(row: &Row, col: &str) -> rusqlite::Result<Weekday> {
    let raw: String = row.get(col)?;
    Weekday::from_db_str(&raw)
        .ok_or_else(|| conversion_err(col, format!("unknown weekday '{raw}'")))
}

fn date_col(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(col)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| conversion_err(col, format!("invalid date '{raw}'"))),
    }
}

fn timestamp_col(row: &Row, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    parse_db_timestamp(&raw).ok_or_else(|| conversion_err(col, format!("invalid timestamp '{raw}'")))
}

pub fn map_timesheet(row: &Row) -> rusqlite::Result<Timesheet> {
    Ok(Timesheet {
        id: row.get("id")?,
        slug: row.get("slug")?,
        status: status_col(row, "status")?,
        week_start: date_col(row, "week_start")?,
        contractor_id: row.get("contractor_id")?,
        approved_hours: row.get("approved_hours")?,
        rate: row.get("rate")?,
        created_at: timestamp_col(row, "created_at")?,
        updated_at: timestamp_col(row, "updated_at")?,
    })
}

fn map_summary(row: &Row) -> rusqlite::Result<TimesheetSummary> {
    Ok(TimesheetSummary {
        id: row.get("id")?,
        slug: row.get("slug")?,
        status: status_col(row, "status")?,
        week_start: date_col(row, "week_start")?,
        contractor_id: row.get("contractor_id")?,
        approved_hours: row.get("approved_hours")?,
        rate: row.get("rate")?,
        total_hours: row.get("total_hours")?,
    })
}

pub fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        weekday: weekday_col(row, "weekday")?,
        name: row.get("name")?,
        hours: row.get("hours")?,
        timesheet_id: row.get("timesheet_id")?,
    })
}

pub fn map_history(row: &Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get("id")?,
        description: row.get("description")?,
        created_at: timestamp_col(row, "created_at")?,
        from_status: status_col(row, "from_status")?,
        to_status: status_col(row, "to_status")?,
        comment: row.get("comment")?,
        timesheet_id: row.get("timesheet_id")?,
        contractor_id: row.get("contractor_id")?,
        manager_id: row.get("manager_id")?,
    })
}

fn collect<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Timesheets
// ---------------------------

pub struct NewTimesheet<'a> {
    pub slug: &'a str,
    pub contractor_id: i64,
    pub approved_hours: i64,
    pub rate: f64,
    pub now: DateTime<Utc>,
}

pub fn insert_timesheet(conn: &Connection, new: &NewTimesheet) -> AppResult<Timesheet> {
    let ts = to_db_timestamp(&new.now);
    conn.execute(
        "INSERT INTO timesheets
             (slug, status, week_start, contractor_id, approved_hours, rate, created_at, updated_at)
         VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?6)",
        params![
            new.slug,
            Status::Draft.to_db_str(),
            new.contractor_id,
            new.approved_hours,
            new.rate,
            ts
        ],
    )?;

    Ok(Timesheet {
        id: conn.last_insert_rowid(),
        slug: new.slug.to_string(),
        status: Status::Draft,
        week_start: None,
        contractor_id: Some(new.contractor_id),
        approved_hours: new.approved_hours,
        rate: new.rate,
        created_at: new.now,
        updated_at: new.now,
    })
}

pub fn find_timesheet_for_contractor(
    conn: &Connection,
    id: i64,
    contractor_id: i64,
) -> AppResult<Option<Timesheet>> {
    let sql = format!(
        "SELECT {TIMESHEET_COLUMNS} FROM timesheets t
         WHERE t.id = ?1 AND t.contractor_id = ?2"
    );
    Ok(conn
        .query_row(&sql, params![id, contractor_id], map_timesheet)
        .optional()?)
}

pub fn find_timesheet_for_manager(
    conn: &Connection,
    id: i64,
    manager_id: i64,
) -> AppResult<Option<Timesheet>> {
    let sql = format!(
        "SELECT {TIMESHEET_COLUMNS} FROM timesheets t
         JOIN contractors c ON c.id = t.contractor_id
         WHERE t.id = ?1 AND c.manager_id = ?2 AND t.status <> 'draft'"
    );
    Ok(conn
        .query_row(&sql, params![id, manager_id], map_timesheet)
        .optional()?)
}

/// All timesheets of one contractor, newest first, with aggregated hours.
pub fn list_summaries_for_contractor(
    conn: &Connection,
    contractor_id: i64,
) -> AppResult<Vec<TimesheetSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT}
         LEFT JOIN tasks k ON k.timesheet_id = t.id
         WHERE t.contractor_id = ?1
         GROUP BY t.id
         ORDER BY t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([contractor_id], map_summary)?;
    collect(rows)
}

/// Non-draft timesheets of every contractor under `manager_id`, newest first.
pub fn list_summaries_for_manager(
    conn: &Connection,
    manager_id: i64,
) -> AppResult<Vec<TimesheetSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT}
         JOIN contractors c ON c.id = t.contractor_id
         LEFT JOIN tasks k ON k.timesheet_id = t.id
         WHERE c.manager_id = ?1 AND t.status <> 'draft'
         GROUP BY t.id
         ORDER BY t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([manager_id], map_summary)?;
    collect(rows)
}

/// Every timesheet in the database (CLI export).
pub fn list_all_summaries(conn: &Connection) -> AppResult<Vec<TimesheetSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT}
         LEFT JOIN tasks k ON k.timesheet_id = t.id
         GROUP BY t.id
         ORDER BY t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_summary)?;
    collect(rows)
}

/// Returns the number of updated rows (0 when the timesheet is not the contractor's).
pub fn update_week_start(
    conn: &Connection,
    id: i64,
    contractor_id: i64,
    week_start: Option<NaiveDate>,
    now: &DateTime<Utc>,
) -> AppResult<usize> {
    let week = week_start.as_ref().map(format_date);
    let n = conn.execute(
        "UPDATE timesheets SET week_start = ?3, updated_at = ?4
         WHERE id = ?1 AND contractor_id = ?2",
        params![id, contractor_id, week, to_db_timestamp(now)],
    )?;
    Ok(n)
}

/// Compare-and-set on the status column. Returns the number of updated rows:
/// 0 when the timesheet is missing, not owned, or not in `from`.
pub fn update_status_if(
    conn: &Connection,
    id: i64,
    contractor_id: i64,
    from: Status,
    to: Status,
    now: &DateTime<Utc>,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE timesheets SET status = ?4, updated_at = ?5
         WHERE id = ?1 AND contractor_id = ?2 AND status = ?3",
        params![
            id,
            contractor_id,
            from.to_db_str(),
            to.to_db_str(),
            to_db_timestamp(now)
        ],
    )?;
    Ok(n)
}

pub fn touch_timesheet(conn: &Connection, id: i64, now: &DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE timesheets SET updated_at = ?2 WHERE id = ?1",
        params![id, to_db_timestamp(now)],
    )?;
    Ok(())
}

// ---------------------------
// History
// ---------------------------

pub fn insert_history(conn: &Connection, new: &NewHistoryEntry) -> AppResult<HistoryEntry> {
    conn.execute(
        "INSERT INTO history
             (description, created_at, from_status, to_status, comment,
              timesheet_id, contractor_id, manager_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.description,
            to_db_timestamp(&new.created_at),
            new.from_status.to_db_str(),
            new.to_status.to_db_str(),
            new.comment,
            new.timesheet_id,
            new.contractor_id,
            new.manager_id
        ],
    )?;

    Ok(HistoryEntry {
        id: conn.last_insert_rowid(),
        description: new.description.clone(),
        created_at: new.created_at,
        from_status: new.from_status,
        to_status: new.to_status,
        comment: new.comment.clone(),
        timesheet_id: Some(new.timesheet_id),
        contractor_id: new.contractor_id,
        manager_id: new.manager_id,
    })
}

/// History of one timesheet, most recent first.
pub fn load_history(conn: &Connection, timesheet_id: i64) -> AppResult<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM history
         WHERE timesheet_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([timesheet_id], map_history)?;
    collect(rows)
}

pub fn count_history(conn: &Connection, timesheet_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM history WHERE timesheet_id = ?1",
        [timesheet_id],
        |row| row.get(0),
    )?)
}

// ---------------------------
// Tasks
// ---------------------------

pub struct TaskValues<'a> {
    pub weekday: Weekday,
    pub name: &'a str,
    pub hours: f64,
    pub timesheet_id: i64,
}

pub fn load_tasks(conn: &Connection, timesheet_id: i64) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM tasks
         WHERE timesheet_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([timesheet_id], map_task)?;
    collect(rows)
}

pub fn insert_task(conn: &Connection, v: &TaskValues) -> AppResult<Task> {
    conn.execute(
        "INSERT INTO tasks (weekday, name, hours, timesheet_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![v.weekday.to_db_str(), v.name, v.hours, v.timesheet_id],
    )?;

    Ok(Task {
        id: conn.last_insert_rowid(),
        weekday: v.weekday,
        name: v.name.to_string(),
        hours: v.hours,
        timesheet_id: v.timesheet_id,
    })
}

/// Update a task in place, provided both its current timesheet and the
/// target timesheet belong to `contractor_id`. Returns the updated row count.
pub fn update_task_owned(
    conn: &Connection,
    id: i64,
    contractor_id: i64,
    v: &TaskValues,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE tasks
         SET weekday = ?3, name = ?4, hours = ?5, timesheet_id = ?6
         WHERE id = ?1
           AND timesheet_id IN (SELECT id FROM timesheets WHERE contractor_id = ?2)
           AND ?6 IN (SELECT id FROM timesheets WHERE contractor_id = ?2)",
        params![
            id,
            contractor_id,
            v.weekday.to_db_str(),
            v.name,
            v.hours,
            v.timesheet_id
        ],
    )?;
    Ok(n)
}

/// Timesheet id of a task owned by `contractor_id`, if any.
pub fn find_task_timesheet_owned(
    conn: &Connection,
    id: i64,
    contractor_id: i64,
) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT k.timesheet_id FROM tasks k
             JOIN timesheets t ON t.id = k.timesheet_id
             WHERE k.id = ?1 AND t.contractor_id = ?2",
            params![id, contractor_id],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn delete_task_owned(conn: &Connection, id: i64, contractor_id: i64) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM tasks
         WHERE id = ?1
           AND timesheet_id IN (SELECT id FROM timesheets WHERE contractor_id = ?2)",
        params![id, contractor_id],
    )?;
    Ok(n)
}
