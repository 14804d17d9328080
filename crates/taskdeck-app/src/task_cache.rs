//! Request-scoped cache of the server's task collection.

use taskdeck_core::Task;

/// The single logical resource this cache is keyed by.
pub const TASKS_RESOURCE: &str = "/api/tasks";

/// Last-fetched task collection plus a staleness flag.
///
/// Mutations never touch the entries directly; they only mark the
/// collection stale so the next read triggers a refetch. There is no
/// optimistic update: frontends render confirmed server state only.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    entries: Option<Vec<Task>>,
    stale: bool,
}

impl TaskCache {
    /// The cached collection, unless it was never filled or has been
    /// invalidated since.
    #[must_use]
    pub fn fresh(&self) -> Option<&[Task]> {
        if self.stale {
            return None;
        }
        self.entries.as_deref()
    }

    /// The cached collection regardless of staleness. Useful for keeping
    /// the previous list on screen while a refetch fails.
    #[must_use]
    pub fn last_known(&self) -> Option<&[Task]> {
        self.entries.as_deref()
    }

    /// Replace the cached collection with a confirmed server response.
    pub fn fill(&mut self, tasks: Vec<Task>) {
        self.entries = Some(tasks);
        self.stale = false;
    }

    /// Mark the collection stale so the next read refetches.
    pub const fn invalidate(&mut self) {
        self.stale = true;
    }
}
