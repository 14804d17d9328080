//! Repository façade tying together API client, cache, and mirror.

use taskdeck_core::Task;
use taskdeck_core::id::TaskId;
use taskdeck_core::validate::{TaskDraft, TaskPatch};
use tracing::{debug, warn};

use crate::api_client::{ApiError, TasksApi};
use crate::local_mirror::LocalMirror;
use crate::task_cache::TaskCache;

/// Client-side view of the task collection.
///
/// Reads are served from the cache until a mutation invalidates it;
/// every confirmed refresh is mirrored to disk as a fire-and-forget
/// side effect. Failed mutations leave the cache untouched so the UI
/// keeps showing the last confirmed server state.
pub struct TaskRepository<A> {
    api: A,
    cache: TaskCache,
    mirror: Option<LocalMirror>,
}

impl<A: TasksApi> TaskRepository<A> {
    /// Create a repository over the given API client and optional mirror.
    #[must_use]
    pub fn new(api: A, mirror: Option<LocalMirror>) -> Self {
        Self {
            api,
            cache: TaskCache::default(),
            mirror,
        }
    }

    /// Best-effort startup seed from the local mirror. Only meaningful
    /// before the first successful fetch; the result must never be
    /// treated as authoritative.
    #[must_use]
    pub fn seed(&self) -> Vec<Task> {
        let Some(mirror) = &self.mirror else {
            return Vec::new();
        };
        match mirror.load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(path = %mirror.path().display(), %err, "ignoring unreadable local mirror");
                Vec::new()
            }
        }
    }

    /// The current task collection: cached when fresh, refetched when a
    /// mutation has invalidated the cache.
    ///
    /// # Errors
    /// Propagates the fetch failure; the cache is left untouched.
    pub fn tasks(&mut self) -> Result<Vec<Task>, ApiError> {
        if let Some(fresh) = self.cache.fresh() {
            debug!("serving task list from cache");
            return Ok(fresh.to_vec());
        }

        let tasks = self.api.list()?;
        self.cache.fill(tasks.clone());
        self.write_mirror(&tasks);
        Ok(tasks)
    }

    /// Last confirmed collection even when stale, for display while a
    /// refetch is failing.
    #[must_use]
    pub fn last_known(&self) -> Option<&[Task]> {
        self.cache.last_known()
    }

    /// Create a task. The title is validated locally first so malformed
    /// input never leaves the client.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on validation or request failure.
    pub fn create(&mut self, title: &str) -> Result<Task, ApiError> {
        let draft =
            TaskDraft::validate(title).map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        let task = self.api.create(&draft.title)?;
        self.cache.invalidate();
        Ok(task)
    }

    /// Set the completion flag of a task.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on request failure or unknown id.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task, ApiError> {
        let task = self.api.update(id, &TaskPatch::completed(completed))?;
        self.cache.invalidate();
        Ok(task)
    }

    /// Rename a task, validating the new title locally first.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on validation or request failure.
    pub fn rename(&mut self, id: TaskId, title: &str) -> Result<Task, ApiError> {
        let patch = TaskPatch::validate(Some(title), None)
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        let task = self.api.update(id, &patch)?;
        self.cache.invalidate();
        Ok(task)
    }

    /// Delete a task by id.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on request failure or unknown id.
    pub fn remove(&mut self, id: TaskId) -> Result<(), ApiError> {
        self.api.delete(id)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Remove every completed task.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on request failure.
    pub fn clear_completed(&mut self) -> Result<(), ApiError> {
        self.api.clear_completed()?;
        self.cache.invalidate();
        Ok(())
    }

    fn write_mirror(&self, tasks: &[Task]) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        if let Err(err) = mirror.save(tasks) {
            warn!(path = %mirror.path().display(), %err, "failed to write local mirror");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::local_mirror::MIRROR_FILE;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use time::OffsetDateTime;

    #[derive(Default)]
    struct MockApi {
        inner: Mutex<MockApiInner>,
    }

    #[derive(Default)]
    struct MockApiInner {
        tasks: Vec<Task>,
        next_id: u64,
        list_calls: usize,
        fail_mutations: bool,
    }

    impl MockApi {
        fn with_tasks(titles: &[&str]) -> Self {
            let api = Self::default();
            {
                let mut inner = api.inner.lock().unwrap();
                inner.next_id = 1;
                for title in titles {
                    let id = TaskId(inner.next_id);
                    inner.next_id += 1;
                    inner
                        .tasks
                        .push(Task::new(id, (*title).to_owned(), OffsetDateTime::UNIX_EPOCH));
                }
            }
            api
        }

        fn list_calls(&self) -> usize {
            self.inner.lock().unwrap().list_calls
        }

        fn fail_mutations(&self) {
            self.inner.lock().unwrap().fail_mutations = true;
        }
    }

    impl TasksApi for &MockApi {
        fn list(&self) -> Result<Vec<Task>, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls += 1;
            Ok(inner.tasks.clone())
        }

        fn create(&self, title: &str) -> Result<Task, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_mutations {
                return Err(ApiError::Unexpected(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            let id = TaskId(inner.next_id.max(1));
            inner.next_id = id.0 + 1;
            let task = Task::new(id, title.to_owned(), OffsetDateTime::UNIX_EPOCH);
            inner.tasks.push(task.clone());
            Ok(task)
        }

        fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_mutations {
                return Err(ApiError::Unexpected(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            let task = inner
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ApiError::NotFound("Task not found".to_owned()))?;
            task.apply(patch.clone());
            Ok(task.clone())
        }

        fn delete(&self, id: TaskId) -> Result<(), ApiError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_mutations {
                return Err(ApiError::Unexpected(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            let before = inner.tasks.len();
            inner.tasks.retain(|t| t.id != id);
            if inner.tasks.len() == before {
                return Err(ApiError::NotFound("Task not found".to_owned()));
            }
            Ok(())
        }

        fn clear_completed(&self) -> Result<(), ApiError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_mutations {
                return Err(ApiError::Unexpected(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            inner.tasks.retain(|t| !t.completed);
            Ok(())
        }
    }

    #[test]
    fn tasks_fetches_once_then_serves_from_cache() {
        let api = MockApi::with_tasks(&["Buy milk"]);
        let mut repo = TaskRepository::new(&api, None);

        assert_eq!(repo.tasks().unwrap().len(), 1);
        assert_eq!(repo.tasks().unwrap().len(), 1);
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn mutations_invalidate_the_cache() {
        let api = MockApi::with_tasks(&["Buy milk"]);
        let mut repo = TaskRepository::new(&api, None);
        repo.tasks().unwrap();

        repo.create("Walk dog").unwrap();
        let tasks = repo.tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(api.list_calls(), 2, "create must force a refetch");

        repo.set_completed(tasks[0].id, true).unwrap();
        assert!(repo.tasks().unwrap()[0].completed);
        assert_eq!(api.list_calls(), 3);

        repo.clear_completed().unwrap();
        assert_eq!(repo.tasks().unwrap().len(), 1);
        assert_eq!(api.list_calls(), 4);
    }

    #[test]
    fn failed_mutation_leaves_the_cache_untouched() {
        let api = MockApi::with_tasks(&["Buy milk"]);
        let mut repo = TaskRepository::new(&api, None);
        repo.tasks().unwrap();

        api.fail_mutations();
        assert!(repo.create("Walk dog").is_err());
        assert!(repo.remove(TaskId(1)).is_err());

        // Cache is still fresh: no refetch happens.
        assert_eq!(repo.tasks().unwrap().len(), 1);
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn invalid_title_never_reaches_the_api() {
        let api = MockApi::with_tasks(&[]);
        let mut repo = TaskRepository::new(&api, None);

        assert!(matches!(repo.create("   "), Err(ApiError::InvalidRequest(_))));
        assert!(matches!(
            repo.rename(TaskId(1), &"x".repeat(101)),
            Err(ApiError::InvalidRequest(_))
        ));
        assert_eq!(repo.tasks().unwrap().len(), 0);
    }

    #[test]
    fn create_sends_the_trimmed_title() {
        let api = MockApi::with_tasks(&[]);
        let mut repo = TaskRepository::new(&api, None);

        let task = repo.create("  Buy milk  ").unwrap();
        assert_eq!(task.title, "Buy milk");
    }

    #[test]
    fn successful_fetch_writes_the_mirror() {
        let dir = TempDir::new().unwrap();
        let mirror = LocalMirror::new(dir.path().join(MIRROR_FILE));
        let api = MockApi::with_tasks(&["Buy milk"]);
        let mut repo = TaskRepository::new(&api, Some(mirror.clone()));

        repo.tasks().unwrap();
        let mirrored = mirror.load().unwrap();
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].title, "Buy milk");
    }

    #[test]
    fn seed_reads_the_mirror_before_the_first_fetch() {
        let dir = TempDir::new().unwrap();
        let mirror = LocalMirror::new(dir.path().join(MIRROR_FILE));

        // A previous session left tasks behind.
        {
            let api = MockApi::with_tasks(&["Buy milk", "Walk dog"]);
            let mut previous = TaskRepository::new(&api, Some(mirror.clone()));
            previous.tasks().unwrap();
        }

        let api = MockApi::with_tasks(&[]);
        let repo = TaskRepository::new(&api, Some(mirror));
        let seeded = repo.seed();
        assert_eq!(seeded.len(), 2);
        assert_eq!(api.list_calls(), 0, "seeding must not hit the API");
    }

    #[test]
    fn seed_without_a_mirror_is_empty() {
        let api = MockApi::with_tasks(&["Buy milk"]);
        let repo = TaskRepository::new(&api, None);
        assert!(repo.seed().is_empty());
    }
}
