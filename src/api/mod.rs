//! HTTP JSON API.
//!
//! Every handler receives a [`context::RequestContext`] carrying the resolved
//! caller. Database work runs on the blocking pool with a connection opened
//! for that request only.

pub mod context;
pub mod handlers;
pub mod response;
pub mod trace;
pub mod validate;

use crate::auth::IdentityProvider;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{delete, get, patch, put};
use std::sync::Arc;

pub use context::RequestContext;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared, read-only service state.
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<str>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(database: &str, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            database: Arc::from(database),
            identity,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/timesheets",
            get(handlers::list_timesheets).post(handlers::create_timesheet),
        )
        .route("/timesheets/tasks", patch(handlers::upsert_task))
        .route("/timesheets/tasks/:id", delete(handlers::delete_task))
        .route(
            "/timesheets/:id",
            get(handlers::get_timesheet).put(handlers::assign_week),
        )
        .route("/timesheets/:id/status", put(handlers::change_status))
        .route("/timesheets/:id/history", get(handlers::list_history))
        .route("/users/profile/:id", get(handlers::get_profile))
        .route("/users/me", get(handlers::me));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .nest("/api", api)
        .layer(from_fn(trace::request_tracing))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
