//! In-memory task board with optimistic mutations.
//!
//! Mutations apply to local state first and issue the HTTP call second; a
//! failed call restores the pre-mutation value and records a user-visible
//! error. Any operation that succeeds clears the error, so the banner is
//! one-shot.

use tracing::warn;

use crate::storage::TaskRow;

use super::{SnapshotCache, TaskApi};

pub struct TaskBoard {
    api: TaskApi,
    cache: SnapshotCache,
    tasks: Vec<TaskRow>,
    error: Option<String>,
}

impl TaskBoard {
    pub fn new(api: TaskApi, cache: SnapshotCache) -> Self {
        Self {
            api,
            cache,
            tasks: Vec::new(),
            error: None,
        }
    }

    // ─── Read side ──────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[TaskRow] {
        &self.tasks
    }

    pub fn pending(&self) -> impl Iterator<Item = &TaskRow> {
        self.tasks.iter().filter(|t| !t.is_completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &TaskRow> {
        self.tasks.iter().filter(|t| t.is_completed)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The banner's dismiss button.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ─── Operations ─────────────────────────────────────────────────────────

    /// Replace local state with the server's task list. On failure, fall back
    /// to the last durable snapshot (empty board if there is none) and record
    /// the error.
    pub async fn refresh(&mut self) -> bool {
        match self.api.fetch_all().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.error = None;
                if let Err(e) = self.cache.store(&self.tasks) {
                    warn!(err = %e, "failed to persist task snapshot");
                }
                true
            }
            Err(e) => {
                self.tasks = self.cache.load().unwrap_or_default();
                self.error = Some(format!("Failed to load tasks: {e}"));
                false
            }
        }
    }

    /// Create a task and append the server-returned record to local state.
    /// No refetch: the returned record already carries the assigned id and
    /// timestamp, and the list is newest-first, so it goes to the front.
    pub async fn add(&mut self, description: &str) -> bool {
        match self.api.create(description).await {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(format!("Failed to add task: {e}"));
                false
            }
        }
    }

    /// Flip a task's completion state optimistically; revert on failure.
    /// Returns `false` without touching anything if the id is not on the board.
    pub async fn toggle(&mut self, id: i64) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let new_state = !self.tasks[idx].is_completed;
        self.tasks[idx].is_completed = new_state;

        match self.api.set_completed(id, new_state).await {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.tasks[idx].is_completed = !new_state;
                self.error = Some(format!("Failed to update task status: {e}"));
                false
            }
        }
    }

    /// Rewrite a task's description optimistically; revert on failure.
    pub async fn edit(&mut self, id: i64, description: &str) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.tasks[idx].description, description.to_string());

        match self.api.set_description(id, description).await {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.tasks[idx].description = previous;
                self.error = Some(format!("Failed to update task: {e}"));
                false
            }
        }
    }

    /// Remove a task optimistically; reinsert at its old position on failure.
    pub async fn remove(&mut self, id: i64) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let removed = self.tasks.remove(idx);

        match self.api.delete(id).await {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.tasks.insert(idx, removed);
                self.error = Some(format!("Failed to delete task: {e}"));
                false
            }
        }
    }
}
