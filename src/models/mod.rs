pub mod history;
pub mod profile;
pub mod status;
pub mod task;
pub mod timesheet;
pub mod user;
pub mod weekday;

pub use history::HistoryEntry;
pub use profile::Profile;
pub use status::Status;
pub use task::Task;
pub use timesheet::{Timesheet, TimesheetDetail, TimesheetSummary};
pub use user::{Caller, Contractor, Manager};
pub use weekday::Weekday;
