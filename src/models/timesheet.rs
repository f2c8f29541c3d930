use super::{history::HistoryEntry, status::Status, task::Task};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A contractor's weekly work-hours record.
///
/// `rate` and `approved_hours` are a snapshot of the contractor profile taken
/// when the timesheet was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: i64,
    pub slug: String,                  // ⇔ timesheets.slug (generated)
    pub status: Status,                // ⇔ timesheets.status
    pub week_start: Option<NaiveDate>, // ⇔ timesheets.week_start (TEXT "YYYY-MM-DD")
    pub contractor_id: Option<i64>,
    pub approved_hours: i64,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the timesheet listing, with hours aggregated from its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    pub id: i64,
    pub slug: String,
    pub status: Status,
    pub week_start: Option<NaiveDate>,
    pub contractor_id: Option<i64>,
    pub approved_hours: i64,
    pub rate: f64,
    pub total_hours: f64,
}

impl TimesheetSummary {
    /// Amount owed for the logged hours.
    pub fn pay(&self) -> f64 {
        self.rate * self.total_hours
    }

    pub fn progress(&self) -> u32 {
        progress_bucket(self.total_hours, self.approved_hours)
    }
}

/// Share of the approved hours already logged, rounded down to a multiple
/// of 25 percent. Not capped at 100.
pub fn progress_bucket(hours: f64, approved_hours: i64) -> u32 {
    if approved_hours <= 0 || !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    let percent = hours / approved_hours as f64 * 100.0;
    ((percent / 25.0).floor() * 25.0) as u32
}

/// Timesheet with its tasks and its status history (most recent first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetDetail {
    #[serde(flatten)]
    pub timesheet: Timesheet,
    pub tasks: Vec<Task>,
    pub history: Vec<HistoryEntry>,
}

impl TimesheetDetail {
    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(|t| t.hours).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total_hours: f64, approved_hours: i64, rate: f64) -> TimesheetSummary {
        TimesheetSummary {
            id: 1,
            slug: "brisk-otter-1234".into(),
            status: Status::Draft,
            week_start: None,
            contractor_id: Some(1),
            approved_hours,
            rate,
            total_hours,
        }
    }

    #[test]
    fn progress_rounds_down_to_quarter_buckets() {
        assert_eq!(progress_bucket(0.0, 40), 0);
        assert_eq!(progress_bucket(9.75, 40), 0);
        assert_eq!(progress_bucket(10.0, 40), 25);
        assert_eq!(progress_bucket(39.75, 40), 75);
        assert_eq!(progress_bucket(40.0, 40), 100);
        assert_eq!(progress_bucket(50.0, 40), 125);
    }

    #[test]
    fn progress_without_approved_hours_is_zero() {
        assert_eq!(progress_bucket(8.0, 0), 0);
    }

    #[test]
    fn pay_is_rate_times_hours() {
        let s = summary(7.5, 40, 20.0);
        assert_eq!(s.pay(), 150.0);
        assert_eq!(s.progress(), 0);
    }

    #[test]
    fn detail_serializes_flat_camel_case() {
        let now = chrono::Utc::now();
        let detail = TimesheetDetail {
            timesheet: Timesheet {
                id: 3,
                slug: "calm-heron-2001".into(),
                status: Status::Submitted,
                week_start: NaiveDate::from_ymd_opt(2024, 6, 2),
                contractor_id: Some(1),
                approved_hours: 40,
                rate: 20.0,
                created_at: now,
                updated_at: now,
            },
            tasks: vec![],
            history: vec![],
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["weekStart"], "2024-06-02");
        assert_eq!(v["approvedHours"], 40);
        assert!(v["tasks"].as_array().unwrap().is_empty());
        assert_eq!(detail.total_hours(), 0.0);
    }
}
