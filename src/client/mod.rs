//! Client side of the API: a typed HTTP client, the optimistic timesheet
//! cache and the derived figures shown in lists and charts.

pub mod api;
pub mod cache;
pub mod view;

pub use api::ApiClient;
pub use cache::{Mutation, MutationId, ServerValue, TimesheetCache};
