//! Versioned schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the internal
//! `log` table as `migration_applied` rows.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240601_0001_initial_schema",
        description: "Created managers, contractors, timesheets, tasks and history tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS managers (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            clerk_id  TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS managers_clerk_id_idx ON managers(clerk_id);

        CREATE TABLE IF NOT EXISTS contractors (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            clerk_id        TEXT NOT NULL,
            approved_hours  INTEGER NOT NULL,
            rate            REAL NOT NULL,
            manager_id      INTEGER NOT NULL REFERENCES managers(id) ON DELETE NO ACTION
        );
        CREATE UNIQUE INDEX IF NOT EXISTS contractors_clerk_id_idx ON contractors(clerk_id);

        CREATE TABLE IF NOT EXISTS timesheets (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            slug            TEXT NOT NULL,
            status          TEXT NOT NULL
                            CHECK(status IN ('draft','submitted','approved','rejected')),
            week_start      TEXT,
            contractor_id   INTEGER REFERENCES contractors(id),
            approved_hours  INTEGER NOT NULL,
            rate            REAL NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_timesheets_contractor ON timesheets(contractor_id);

        CREATE TABLE IF NOT EXISTS tasks (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            weekday       TEXT NOT NULL
                          CHECK(weekday IN ('sunday','monday','tuesday','wednesday',
                                            'thursday','friday','saturday')),
            hours         REAL NOT NULL CHECK(hours > 0),
            name          TEXT NOT NULL,
            timesheet_id  INTEGER NOT NULL REFERENCES timesheets(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_timesheet ON tasks(timesheet_id);

        CREATE TABLE IF NOT EXISTS history (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            description    TEXT NOT NULL,
            created_at     TEXT NOT NULL,
            from_status    TEXT NOT NULL
                           CHECK(from_status IN ('draft','submitted','approved','rejected')),
            to_status      TEXT NOT NULL
                           CHECK(to_status IN ('draft','submitted','approved','rejected')),
            comment        TEXT,
            timesheet_id   INTEGER REFERENCES timesheets(id),
            contractor_id  INTEGER REFERENCES contractors(id),
            manager_id     INTEGER REFERENCES managers(id)
        );
        CREATE INDEX IF NOT EXISTS idx_history_timesheet ON history(timesheet_id, created_at);
        "#,
    },
    Migration {
        version: "20240615_0002_history_append_only",
        description: "History rows can no longer be updated or deleted",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS history_no_update
        BEFORE UPDATE ON history
        BEGIN
            SELECT RAISE(ABORT, 'history is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS history_no_delete
        BEFORE DELETE ON history
        BEGIN
            SELECT RAISE(ABORT, 'history is append-only');
        END;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let batch = format!(
        "BEGIN;\n{}\nINSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), 'migration_applied', '{}', '{}');\nCOMMIT;",
        m.sql,
        m.version,
        m.description.replace('\'', "''"),
    );

    if let Err(e) = conn.execute_batch(&batch) {
        // Leave the database as it was before this migration.
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", m.version, e)));
    }
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        info!(version = m.version, "migration applied");
        applied.push(m.version);
    }
    Ok(applied)
}

/// Latest schema version known to this build.
pub fn latest_version() -> &'static str {
    MIGRATIONS.last().map(|m| m.version).unwrap_or("none")
}
