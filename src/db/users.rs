//! Queries on the `managers` and `contractors` tables.

use crate::errors::AppResult;
use crate::models::{Caller, Contractor, Manager};
use rusqlite::{Connection, OptionalExtension, Row, params};

const CONTRACTOR_COLUMNS: &str = "id, clerk_id, approved_hours, rate, manager_id";

fn map_manager(row: &Row) -> rusqlite::Result<Manager> {
    Ok(Manager {
        id: row.get("id")?,
        clerk_id: row.get("clerk_id")?,
    })
}

fn map_contractor(row: &Row) -> rusqlite::Result<Contractor> {
    Ok(Contractor {
        id: row.get("id")?,
        clerk_id: row.get("clerk_id")?,
        approved_hours: row.get("approved_hours")?,
        rate: row.get("rate")?,
        manager_id: row.get("manager_id")?,
    })
}

pub fn insert_manager(conn: &Connection, clerk_id: &str) -> AppResult<Manager> {
    conn.execute("INSERT INTO managers (clerk_id) VALUES (?1)", [clerk_id])?;
    Ok(Manager {
        id: conn.last_insert_rowid(),
        clerk_id: clerk_id.to_string(),
    })
}

pub fn insert_contractor(
    conn: &Connection,
    clerk_id: &str,
    manager_id: i64,
    rate: f64,
    approved_hours: i64,
) -> AppResult<Contractor> {
    conn.execute(
        "INSERT INTO contractors (clerk_id, approved_hours, rate, manager_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![clerk_id, approved_hours, rate, manager_id],
    )?;
    Ok(Contractor {
        id: conn.last_insert_rowid(),
        clerk_id: clerk_id.to_string(),
        approved_hours,
        rate,
        manager_id,
    })
}

/// Change the live profile values. Existing timesheets keep their snapshot.
pub fn update_contractor(
    conn: &Connection,
    id: i64,
    rate: Option<f64>,
    approved_hours: Option<i64>,
) -> AppResult<Option<Contractor>> {
    conn.execute(
        "UPDATE contractors
         SET rate = COALESCE(?2, rate),
             approved_hours = COALESCE(?3, approved_hours)
         WHERE id = ?1",
        params![id, rate, approved_hours],
    )?;
    find_contractor(conn, id)
}

pub fn find_contractor(conn: &Connection, id: i64) -> AppResult<Option<Contractor>> {
    let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_contractor).optional()?)
}

pub fn find_contractor_by_clerk_id(
    conn: &Connection,
    clerk_id: &str,
) -> AppResult<Option<Contractor>> {
    let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE clerk_id = ?1");
    Ok(conn.query_row(&sql, [clerk_id], map_contractor).optional()?)
}

pub fn find_manager(conn: &Connection, id: i64) -> AppResult<Option<Manager>> {
    Ok(conn
        .query_row(
            "SELECT id, clerk_id FROM managers WHERE id = ?1",
            [id],
            map_manager,
        )
        .optional()?)
}

pub fn find_manager_by_clerk_id(conn: &Connection, clerk_id: &str) -> AppResult<Option<Manager>> {
    Ok(conn
        .query_row(
            "SELECT id, clerk_id FROM managers WHERE clerk_id = ?1",
            [clerk_id],
            map_manager,
        )
        .optional()?)
}

/// Resolve an identity-provider user id to its role row.
/// A contractor row wins over a manager row for the same identity.
pub fn resolve_caller(conn: &Connection, clerk_id: &str) -> AppResult<Option<Caller>> {
    if let Some(c) = find_contractor_by_clerk_id(conn, clerk_id)? {
        return Ok(Some(Caller::Contractor(c)));
    }
    Ok(find_manager_by_clerk_id(conn, clerk_id)?.map(Caller::Manager))
}

pub fn list_managers(conn: &Connection) -> AppResult<Vec<Manager>> {
    let mut stmt = conn.prepare("SELECT id, clerk_id FROM managers ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_manager)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_contractors(conn: &Connection, manager_id: Option<i64>) -> AppResult<Vec<Contractor>> {
    let sql = format!(
        "SELECT {CONTRACTOR_COLUMNS} FROM contractors
         WHERE ?1 IS NULL OR manager_id = ?1
         ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([manager_id], map_contractor)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
