// src/export/model.rs

use crate::models::TimesheetSummary;
use crate::utils::date::{format_date, format_week_range};
use serde::Serialize;

/// Flat export row: one timesheet with its derived figures.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TimesheetExport {
    pub id: i64,
    pub slug: String,
    pub status: String,
    pub contractor_id: Option<i64>,
    pub week_start: String,
    pub week_range: String,
    pub total_hours: f64,
    pub approved_hours: i64,
    pub progress: u32,
    pub rate: f64,
    pub pay: f64,
}

impl From<&TimesheetSummary> for TimesheetExport {
    fn from(s: &TimesheetSummary) -> Self {
        Self {
            id: s.id,
            slug: s.slug.clone(),
            status: s.status.to_string(),
            contractor_id: s.contractor_id,
            week_start: s.week_start.as_ref().map(format_date).unwrap_or_default(),
            week_range: s.week_start.map(format_week_range).unwrap_or_default(),
            total_hours: s.total_hours,
            approved_hours: s.approved_hours,
            progress: s.progress(),
            rate: s.rate,
            pay: s.pay(),
        }
    }
}
