//! Client-side application layer for taskdeck.
//!
//! This crate provides the HTTP API client, the request-scoped task
//! cache, the local mirror, and the repository façade shared by the CLI
//! and TUI frontends. The server remains the single source of truth;
//! everything held here is a disposable copy.

pub mod api_client;
pub mod local_mirror;
pub mod repository;
pub mod task_cache;

// Re-exports for convenience
pub use api_client::{ApiError, HttpTasksApi, TasksApi};
pub use local_mirror::{LocalMirror, MIRROR_FILE, MirrorError};
pub use repository::TaskRepository;
pub use task_cache::{TASKS_RESOURCE, TaskCache};
