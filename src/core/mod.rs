pub mod backup;
pub mod export;
pub mod log;
pub mod profile;
pub mod status;
pub mod tasks;
pub mod timesheets;
pub mod users;
