use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::list_all_summaries;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, TimesheetExport, ensure_writable, export_csv, export_json};
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export timesheet summaries, optionally limited to one contractor.
    /// Returns the number of exported rows.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        contractor: Option<i64>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows: Vec<TimesheetExport> = list_all_summaries(&pool.conn)?
            .iter()
            .filter(|s| contractor.is_none() || s.contractor_id == contractor)
            .map(TimesheetExport::from)
            .collect();

        if rows.is_empty() {
            warning("No timesheets found. Nothing to export.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        ttlog(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} timesheets exported as {}", rows.len(), format.as_str()),
        )?;
        Ok(rows.len())
    }
}
