//! Optimistic cache of timesheet details.
//!
//! Each timesheet keeps the last snapshot received from the server and a FIFO
//! of mutations sent but not yet answered. The visible value is the snapshot
//! with the pending mutations replayed on top, in order. A successful answer
//! is folded into the snapshot; a failure only drops the mutation, so the view
//! falls back to what the server last said.

use crate::core::tasks::TaskInput;
use crate::models::{HistoryEntry, Status, Task, TimesheetDetail};
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

pub type MutationId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ChangeStatus {
        timesheet_id: i64,
        to_status: Status,
    },
    AssignWeek {
        timesheet_id: i64,
        week_start: Option<NaiveDate>,
    },
    UpsertTask(TaskInput),
    DeleteTask {
        timesheet_id: i64,
        task_id: i64,
    },
}

impl Mutation {
    pub fn timesheet_id(&self) -> i64 {
        match self {
            Mutation::ChangeStatus { timesheet_id, .. }
            | Mutation::AssignWeek { timesheet_id, .. }
            | Mutation::DeleteTask { timesheet_id, .. } => *timesheet_id,
            Mutation::UpsertTask(input) => input.timesheet_id,
        }
    }
}

/// Server answer to a [`Mutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServerValue {
    History(HistoryEntry),
    WeekStart(Option<NaiveDate>),
    Task(Task),
    Deleted(i64),
}

#[derive(Debug, Clone)]
struct Pending {
    id: MutationId,
    mutation: Mutation,
    /// Placeholder id shown for a task that has no server id yet.
    temp_task_id: Option<i64>,
}

#[derive(Debug, Default)]
pub struct TimesheetCache {
    snapshots: HashMap<i64, TimesheetDetail>,
    pending: HashMap<i64, VecDeque<Pending>>,
    next_id: MutationId,
    next_temp_task_id: i64,
}

impl TimesheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with a fresh server read. Pending mutations stay queued.
    pub fn store(&mut self, detail: TimesheetDetail) {
        self.snapshots.insert(detail.timesheet.id, detail);
    }

    pub fn snapshot(&self, timesheet_id: i64) -> Option<&TimesheetDetail> {
        self.snapshots.get(&timesheet_id)
    }

    /// Snapshot with every pending mutation applied.
    pub fn view(&self, timesheet_id: i64) -> Option<TimesheetDetail> {
        let mut detail = self.snapshots.get(&timesheet_id)?.clone();
        if let Some(queue) = self.pending.get(&timesheet_id) {
            for p in queue {
                patch(&mut detail, &p.mutation, p.temp_task_id);
            }
        }
        Some(detail)
    }

    /// Queue a mutation and show its effect right away.
    pub fn apply(&mut self, mutation: Mutation) -> MutationId {
        self.next_id += 1;
        let id = self.next_id;

        let temp_task_id = match &mutation {
            Mutation::UpsertTask(input) if input.id.is_none() => {
                self.next_temp_task_id -= 1;
                Some(self.next_temp_task_id)
            }
            _ => None,
        };

        debug!(mutation_id = id, timesheet_id = mutation.timesheet_id(), "optimistic mutation queued");
        self.pending
            .entry(mutation.timesheet_id())
            .or_default()
            .push_back(Pending {
                id,
                mutation,
                temp_task_id,
            });
        id
    }

    /// Oldest unanswered mutation for a timesheet; the only one that should be in flight.
    pub fn next_to_send(&self, timesheet_id: i64) -> Option<(MutationId, &Mutation)> {
        self.pending
            .get(&timesheet_id)?
            .front()
            .map(|p| (p.id, &p.mutation))
    }

    pub fn pending_count(&self, timesheet_id: i64) -> usize {
        self.pending.get(&timesheet_id).map_or(0, VecDeque::len)
    }

    /// Fold a successful server answer into the snapshot and drop the mutation.
    /// Returns false when `id` is not pending.
    pub fn reconcile(&mut self, id: MutationId, value: ServerValue) -> bool {
        let Some(pending) = self.take(id) else {
            return false;
        };
        let target = pending.mutation.timesheet_id();
        if let ServerValue::Task(task) = &value {
            // a task lives in one timesheet only
            for (_, other) in self.snapshots.iter_mut().filter(|(k, _)| **k != target) {
                other.tasks.retain(|t| t.id != task.id);
            }
        }
        if let Some(snapshot) = self.snapshots.get_mut(&target) {
            fold(snapshot, &pending.mutation, value);
        }
        true
    }

    /// Drop a failed mutation. Returns false when `id` is not pending.
    pub fn fail(&mut self, id: MutationId) -> bool {
        let dropped = self.take(id).is_some();
        if dropped {
            debug!(mutation_id = id, "optimistic mutation dropped");
        }
        dropped
    }

    fn take(&mut self, id: MutationId) -> Option<Pending> {
        let (&key, queue) = self
            .pending
            .iter_mut()
            .find(|(_, q)| q.iter().any(|p| p.id == id))?;
        let pos = queue.iter().position(|p| p.id == id)?;
        let pending = queue.remove(pos);
        if queue.is_empty() {
            self.pending.remove(&key);
        }
        pending
    }
}

fn upsert_task(tasks: &mut Vec<Task>, task: Task) {
    match tasks.iter_mut().find(|t| t.id == task.id) {
        Some(slot) => *slot = task,
        None => tasks.push(task),
    }
}

/// Optimistic effect of a mutation.
fn patch(detail: &mut TimesheetDetail, mutation: &Mutation, temp_task_id: Option<i64>) {
    match mutation {
        Mutation::ChangeStatus { to_status, .. } => detail.timesheet.status = *to_status,
        Mutation::AssignWeek { week_start, .. } => detail.timesheet.week_start = *week_start,
        Mutation::UpsertTask(input) => {
            let Some(id) = input.id.or(temp_task_id) else {
                return;
            };
            upsert_task(
                &mut detail.tasks,
                Task {
                    id,
                    weekday: input.weekday,
                    name: input.name.clone(),
                    hours: input.hours,
                    timesheet_id: input.timesheet_id,
                },
            );
        }
        Mutation::DeleteTask { task_id, .. } => detail.tasks.retain(|t| t.id != *task_id),
    }
}

/// Authoritative effect of a server answer.
fn fold(snapshot: &mut TimesheetDetail, mutation: &Mutation, value: ServerValue) {
    match value {
        ServerValue::History(entry) => {
            snapshot.timesheet.status = entry.to_status;
            snapshot.timesheet.updated_at = entry.created_at;
            snapshot.history.insert(0, entry);
        }
        ServerValue::WeekStart(week_start) => snapshot.timesheet.week_start = week_start,
        ServerValue::Task(task) => {
            if task.timesheet_id == snapshot.timesheet.id {
                upsert_task(&mut snapshot.tasks, task);
            } else {
                snapshot.tasks.retain(|t| t.id != task.id);
            }
        }
        ServerValue::Deleted(task_id) => snapshot.tasks.retain(|t| t.id != task_id),
    }
    debug!(timesheet_id = mutation.timesheet_id(), "server answer folded into snapshot");
}
