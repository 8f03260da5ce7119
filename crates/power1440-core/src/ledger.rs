//! On-time task ledger.
//!
//! Tasks draw minutes from the on-time budget. The budget is checked only
//! when a task is admitted: shrinking on-time afterwards can leave the
//! ledger over-committed, which shows up as a negative remaining value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AdmissionError;

/// Task identifier derived from the creation timestamp (epoch ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Minutes drawn from the on-time budget.
    pub duration: u32,
}

/// Ordered task list; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLedger")]
pub struct TaskLedger {
    tasks: Vec<Task>,
    /// Highest id handed out so far. Ids are never reused, even after removal.
    last_id: u64,
}

#[derive(Deserialize)]
struct StoredLedger {
    tasks: Vec<Task>,
    #[serde(default)]
    last_id: u64,
}

impl From<StoredLedger> for TaskLedger {
    fn from(stored: StoredLedger) -> Self {
        // A missing or stale `last_id` must not let new ids collide with stored ones.
        let highest = stored.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        Self {
            last_id: stored.last_id.max(highest),
            tasks: stored.tasks,
        }
    }
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Sum of all task durations.
    pub fn total_duration(&self) -> u64 {
        self.tasks.iter().map(|t| t.duration as u64).sum()
    }

    /// `on_time` minus everything committed to tasks. Negative when the
    /// budget was shrunk below the committed total.
    pub fn remaining(&self, on_time: u32) -> i64 {
        on_time as i64 - self.total_duration() as i64
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task if it fits in `on_time`.
    ///
    /// # Errors
    ///
    /// Returns an [`AdmissionError`] if the name is blank, the duration is
    /// zero, or the new total would exceed `on_time`. The ledger is left
    /// untouched in every error case.
    pub fn add_task(
        &mut self,
        name: &str,
        duration: u32,
        on_time: u32,
    ) -> Result<TaskId, AdmissionError> {
        self.add_task_at(name, duration, on_time, now_ms())
    }

    /// Same as [`TaskLedger::add_task`] with an explicit creation timestamp.
    pub fn add_task_at(
        &mut self,
        name: &str,
        duration: u32,
        on_time: u32,
        created_at_ms: u64,
    ) -> Result<TaskId, AdmissionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AdmissionError::EmptyName);
        }
        if duration == 0 {
            return Err(AdmissionError::ZeroDuration);
        }

        let committed = self.total_duration();
        if committed + duration as u64 > on_time as u64 {
            tracing::warn!(
                name,
                duration,
                committed,
                budget = on_time,
                "task rejected: on-time budget exceeded"
            );
            return Err(AdmissionError::BudgetExceeded {
                requested: duration,
                committed,
                budget: on_time,
            });
        }

        let id = self.fresh_id(created_at_ms);
        self.tasks.push(Task {
            id,
            name: name.to_string(),
            duration,
        });
        tracing::info!(%id, name, duration, "task added");
        Ok(id)
    }

    /// Remove a task. Absent ids are ignored.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(idx);
        tracing::info!(%id, name = %task.name, "task removed");
        Some(task)
    }

    /// Zero a task's duration, keeping it in the list.
    ///
    /// Returns `false` if no task has that id.
    pub fn reset_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.duration = 0;
                tracing::debug!(%id, "task duration reset");
                true
            }
            None => false,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fresh_id(&mut self, created_at_ms: u64) -> TaskId {
        let next = created_at_ms.max(self.last_id + 1);
        self.last_id = next;
        TaskId(next)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
