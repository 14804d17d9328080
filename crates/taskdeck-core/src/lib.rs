//! Domain types & validation for taskdeck tasks.

/// Identifier types.
pub mod id;
/// Pure payload validation.
pub mod validate;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::TaskId;
use crate::validate::TaskPatch;

/// A titled, completable, timestamped to-do item.
///
/// The wire shape is `{id, title, completed, createdAt}` with the
/// timestamp rendered as RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, monotonically increasing from 1.
    pub id: TaskId,
    /// Trimmed title, 1–100 characters.
    pub title: String,
    /// Completion flag, false on creation.
    pub completed: bool,
    /// Creation time in UTC. Set once, never mutated.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Construct a freshly created task (not yet completed).
    #[must_use]
    pub const fn new(id: TaskId, title: String, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
        }
    }

    /// Merge the supplied fields of a patch into this task.
    ///
    /// Absent fields are left unchanged; `created_at` is never touched.
    pub fn apply(&mut self, patch: TaskPatch) {
        let TaskPatch { title, completed } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(completed) = completed {
            self.completed = completed;
        }
    }
}
