//! In-memory storage for taskdeck.
//!
//! The store owns the canonical task collection. Callers validate
//! payloads before handing them in; the store only assigns identity,
//! timestamps, and merges patches.

use std::collections::BTreeMap;

use taskdeck_core::Task;
use taskdeck_core::id::TaskId;
use taskdeck_core::validate::{TaskDraft, TaskPatch};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

/// Errors surfaced by [`TaskStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced task does not exist.
    #[error("Task not found: {0}")]
    NotFound(TaskId),
}

/// Storage contract for the task collection.
///
/// Kept deliberately narrow so a durable backend can slot in behind the
/// same surface later.
pub trait TaskStore {
    /// All tasks in id (= insertion) order.
    fn list(&self) -> Vec<Task>;

    /// Insert a validated draft, assigning the next id and creation time.
    fn create(&mut self, draft: TaskDraft) -> Task;

    /// Merge the supplied fields of a patch into an existing task.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when the id is unknown.
    fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError>;

    /// Remove a task, reporting whether it existed.
    fn delete(&mut self, id: TaskId) -> bool;

    /// Remove every completed task. Idempotent.
    fn clear_completed(&mut self);
}

/// Map-backed store: ordered map from integer id to record plus a
/// monotonically increasing id counter.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
}

impl MemoryStore {
    /// Create an empty store whose first assigned id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: TaskId::FIRST,
        }
    }

    /// Number of stored tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    fn create(&mut self, draft: TaskDraft) -> Task {
        let id = self.next_id;
        // Deletions never hand ids back; the counter only moves forward.
        self.next_id = self.next_id.next();

        let task = Task::new(id, draft.title, OffsetDateTime::now_utc());
        self.tasks.insert(id, task.clone());
        debug!(%id, title = %task.title, "created task");
        task
    }

    fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.apply(patch);
        debug!(%id, "updated task");
        Ok(task.clone())
    }

    fn delete(&mut self, id: TaskId) -> bool {
        let existed = self.tasks.remove(&id).is_some();
        debug!(%id, existed, "deleted task");
        existed
    }

    fn clear_completed(&mut self) {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.completed);
        debug!(removed = before - self.tasks.len(), "cleared completed tasks");
    }
}
