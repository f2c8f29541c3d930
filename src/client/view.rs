//! Figures derived from API data for lists, charts and the weekly grid.

use crate::models::timesheet::progress_bucket;
use crate::models::{Status, Task, TimesheetSummary, Weekday};
use crate::utils::date::format_week_range;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Column filter: keep rows whose value is in `values`, or not in it when
/// `inverted`. An empty filter keeps everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter<T> {
    pub inverted: bool,
    pub values: Vec<T>,
}

impl<T> Default for ListFilter<T> {
    fn default() -> Self {
        Self {
            inverted: false,
            values: Vec::new(),
        }
    }
}

impl<T: PartialEq> ListFilter<T> {
    pub fn only(values: Vec<T>) -> Self {
        Self {
            inverted: false,
            values,
        }
    }

    pub fn except(values: Vec<T>) -> Self {
        Self {
            inverted: true,
            values,
        }
    }

    pub fn matches(&self, value: &T) -> bool {
        if self.values.is_empty() {
            return true;
        }
        self.values.contains(value) != self.inverted
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimesheetFilter {
    pub status: ListFilter<Status>,
    pub contractor: ListFilter<i64>,
}

impl TimesheetFilter {
    pub fn keep(&self, row: &TimesheetSummary) -> bool {
        self.status.matches(&row.status)
            && row
                .contractor_id
                .is_none_or(|c| self.contractor.matches(&c))
    }

    pub fn apply<'a>(&self, rows: &'a [TimesheetSummary]) -> Vec<&'a TimesheetSummary> {
        rows.iter().filter(|r| self.keep(r)).collect()
    }
}

/// Sort by week start; rows without a week go last either way.
pub fn sort_by_week(rows: &mut [&TimesheetSummary], descending: bool) {
    rows.sort_by(|a, b| match (a.week_start, b.week_start) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
}

/// Hours per week for each contractor, weeks ascending. Rows without a week
/// or contractor are skipped; several timesheets for one week are summed.
pub fn weekly_hours_series(rows: &[TimesheetSummary]) -> BTreeMap<i64, Vec<(NaiveDate, f64)>> {
    let mut acc: BTreeMap<i64, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for r in rows {
        if let (Some(contractor), Some(week)) = (r.contractor_id, r.week_start) {
            *acc.entry(contractor).or_default().entry(week).or_default() += r.total_hours;
        }
    }
    acc.into_iter()
        .map(|(c, weeks)| (c, weeks.into_iter().collect()))
        .collect()
}

pub fn progress(hours: f64, approved_hours: i64) -> u32 {
    progress_bucket(hours, approved_hours)
}

pub fn pay(rate: f64, hours: f64) -> f64 {
    rate * hours
}

pub fn week_label(week_start: Option<NaiveDate>) -> String {
    week_start
        .map(format_week_range)
        .unwrap_or_else(|| "No week assigned".to_string())
}

/// Total hours per weekday, indexed Sunday first.
pub fn hours_by_weekday(tasks: &[Task]) -> [f64; 7] {
    let mut totals = [0.0; 7];
    for t in tasks {
        totals[t.weekday.offset() as usize] += t.hours;
    }
    totals
}

/// Tasks grouped by weekday in week order, each group in insertion order.
pub fn tasks_by_weekday(tasks: &[Task]) -> Vec<(Weekday, Vec<&Task>)> {
    Weekday::ALL
        .into_iter()
        .map(|d| (d, tasks.iter().filter(|t| t.weekday == d).collect::<Vec<_>>()))
        .filter(|(_, ts)| !ts.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, status: Status, contractor: i64, week: Option<(i32, u32, u32)>, hours: f64) -> TimesheetSummary {
        TimesheetSummary {
            id,
            slug: format!("row-{id}"),
            status,
            week_start: week.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            contractor_id: Some(contractor),
            approved_hours: 40,
            rate: 20.0,
            total_hours: hours,
        }
    }

    fn task(id: i64, weekday: Weekday, hours: f64) -> Task {
        Task {
            id,
            weekday,
            name: format!("task {id}"),
            hours,
            timesheet_id: 1,
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let f: ListFilter<Status> = ListFilter::default();
        assert!(f.matches(&Status::Draft));
        assert!(ListFilter::<Status>::except(vec![]).matches(&Status::Draft));
    }

    #[test]
    fn inverted_filter_excludes_listed_values() {
        let only = ListFilter::only(vec![Status::Submitted]);
        assert!(only.matches(&Status::Submitted));
        assert!(!only.matches(&Status::Approved));

        let except = ListFilter::except(vec![Status::Submitted]);
        assert!(!except.matches(&Status::Submitted));
        assert!(except.matches(&Status::Approved));
    }

    #[test]
    fn timesheet_filter_combines_columns() {
        let rows = vec![
            row(1, Status::Submitted, 1, None, 0.0),
            row(2, Status::Approved, 1, None, 0.0),
            row(3, Status::Submitted, 2, None, 0.0),
        ];
        let filter = TimesheetFilter {
            status: ListFilter::only(vec![Status::Submitted]),
            contractor: ListFilter::except(vec![2]),
        };
        let ids: Vec<i64> = filter.apply(&rows).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn sort_puts_unassigned_weeks_last() {
        let rows = vec![
            row(1, Status::Draft, 1, Some((2024, 6, 9)), 0.0),
            row(2, Status::Draft, 1, None, 0.0),
            row(3, Status::Draft, 1, Some((2024, 6, 2)), 0.0),
        ];
        let mut refs: Vec<&TimesheetSummary> = rows.iter().collect();

        sort_by_week(&mut refs, false);
        assert_eq!(refs.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1, 2]);

        sort_by_week(&mut refs, true);
        assert_eq!(refs.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn series_is_keyed_by_contractor_and_sorted_by_week() {
        let rows = vec![
            row(1, Status::Submitted, 1, Some((2024, 6, 9)), 8.0),
            row(2, Status::Submitted, 1, Some((2024, 6, 2)), 6.0),
            row(3, Status::Submitted, 2, Some((2024, 6, 2)), 4.0),
            row(4, Status::Submitted, 2, Some((2024, 6, 2)), 1.5),
            row(5, Status::Submitted, 2, None, 99.0),
        ];
        let series = weekly_hours_series(&rows);
        let june2 = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let june9 = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(series[&1], vec![(june2, 6.0), (june9, 8.0)]);
        assert_eq!(series[&2], vec![(june2, 5.5)]);
    }

    #[test]
    fn labels_and_money() {
        assert_eq!(week_label(NaiveDate::from_ymd_opt(2024, 6, 30)), "Jun 30 - Jul 6, 2024");
        assert_eq!(week_label(None), "No week assigned");
        assert_eq!(pay(25.0, 7.5), 187.5);
        assert_eq!(progress(30.0, 40), 75);
    }

    #[test]
    fn weekday_totals_and_groups() {
        let tasks = vec![
            task(1, Weekday::Monday, 2.5),
            task(2, Weekday::Sunday, 1.0),
            task(3, Weekday::Monday, 0.75),
        ];
        let totals = hours_by_weekday(&tasks);
        assert_eq!(totals[0], 1.0);
        assert_eq!(totals[1], 3.25);
        assert_eq!(totals[6], 0.0);

        let groups = tasks_by_weekday(&tasks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Weekday::Sunday);
        assert_eq!(groups[1].1.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
