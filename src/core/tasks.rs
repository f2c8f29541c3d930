use crate::db::pool::DbPool;
use crate::db::queries::{self, TaskValues};
use crate::errors::{AppError, AppResult};
use crate::models::task::validate_hours;
use crate::models::{Caller, Task, Weekday};
use crate::utils::date::now_utc;
use serde::Deserialize;
use tracing::debug;

use super::timesheets::require_contractor;

/// Task write: no id creates a row, an id updates that row in place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub timesheet_id: i64,
    pub weekday: Weekday,
    pub name: String,
    pub hours: f64,
}

impl TaskInput {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Task is required"));
        }
        validate_hours(self.hours).map_err(AppError::validation)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub task: Task,
    pub created: bool,
}

pub struct TaskLogic;

impl TaskLogic {
    pub fn upsert(pool: &mut DbPool, caller: &Caller, input: &TaskInput) -> AppResult<UpsertOutcome> {
        let contractor = require_contractor(caller)?;
        input.validate()?;

        if queries::find_timesheet_for_contractor(&pool.conn, input.timesheet_id, contractor.id)?
            .is_none()
        {
            return Err(AppError::not_found(format!("timesheet {}", input.timesheet_id)));
        }

        let values = TaskValues {
            weekday: input.weekday,
            name: &input.name,
            hours: input.hours,
            timesheet_id: input.timesheet_id,
        };
        let now = now_utc();

        let outcome = match input.id {
            None => {
                let task = queries::insert_task(&pool.conn, &values)?;
                UpsertOutcome { task, created: true }
            }
            Some(id) => {
                let previous = queries::find_task_timesheet_owned(&pool.conn, id, contractor.id)?
                    .ok_or_else(|| AppError::not_found(format!("task {id}")))?;
                let n = queries::update_task_owned(&pool.conn, id, contractor.id, &values)?;
                if n == 0 {
                    return Err(AppError::not_found(format!("task {id}")));
                }
                if previous != input.timesheet_id {
                    queries::touch_timesheet(&pool.conn, previous, &now)?;
                }
                UpsertOutcome {
                    task: Task {
                        id,
                        weekday: input.weekday,
                        name: input.name.clone(),
                        hours: input.hours,
                        timesheet_id: input.timesheet_id,
                    },
                    created: false,
                }
            }
        };

        queries::touch_timesheet(&pool.conn, input.timesheet_id, &now)?;
        debug!(task_id = outcome.task.id, created = outcome.created, "task saved");
        Ok(outcome)
    }

    /// Delete a task of one of the caller's timesheets. Returns the deleted id.
    pub fn delete(pool: &mut DbPool, caller: &Caller, task_id: i64) -> AppResult<i64> {
        let contractor = require_contractor(caller)?;

        let timesheet_id = queries::find_task_timesheet_owned(&pool.conn, task_id, contractor.id)?
            .ok_or_else(|| AppError::not_found(format!("task {task_id}")))?;

        let n = queries::delete_task_owned(&pool.conn, task_id, contractor.id)?;
        if n == 0 {
            return Err(AppError::not_found(format!("task {task_id}")));
        }

        queries::touch_timesheet(&pool.conn, timesheet_id, &now_utc())?;
        debug!(task_id, timesheet_id, "task deleted");
        Ok(task_id)
    }
}
