//! Date helpers: calendar dates, Sunday-first week ranges and the fixed
//! timestamp format stored in the database.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};

/// Timestamp layout stored in TEXT columns. Fixed width, so lexical order
/// equals chronological order.
const DB_TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(DB_TIMESTAMP_FMT).to_string()
}

pub fn parse_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Current instant truncated to the stored precision.
pub fn now_utc() -> DateTime<Utc> {
    let now = Utc::now();
    parse_db_timestamp(&to_db_timestamp(&now)).unwrap_or(now)
}

/// True when `d` can start a timesheet week.
pub fn is_week_start(d: &NaiveDate) -> bool {
    d.weekday() == Weekday::Sun
}

/// Sunday on or before `d`.
pub fn week_start_of(d: NaiveDate) -> NaiveDate {
    let back = d.weekday().num_days_from_sunday() as u64;
    d.checked_sub_days(Days::new(back)).unwrap_or(d)
}

/// Inclusive `(from, to)` range of the week starting at `week_start`.
pub fn week_range(week_start: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = week_start
        .checked_add_days(Days::new(6))
        .unwrap_or(week_start);
    (week_start, end)
}

/// "Jun 2 - Jun 8, 2024"
pub fn format_week_range(week_start: NaiveDate) -> String {
    let (from, to) = week_range(week_start);
    format!("{} - {}", from.format("%b %-d"), to.format("%b %-d, %Y"))
}
