//! HTTP client for the taskdeck API.

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use taskdeck_core::Task;
use taskdeck_core::id::TaskId;
use taskdeck_core::validate::TaskPatch;
use thiserror::Error;

use crate::task_cache::TASKS_RESOURCE;

/// Failures surfaced by API calls, mirroring the server's taxonomy plus
/// transport errors the request never survived.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request as malformed (400).
    #[error("{0}")]
    InvalidRequest(String),
    /// The referenced task does not exist (404).
    #[error("{0}")]
    NotFound(String),
    /// The server answered with a status this client does not expect.
    #[error("unexpected status {0}")]
    Unexpected(StatusCode),
    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client-side contract for the five task operations.
///
/// Seam for tests: frontends talk to this trait, not to reqwest.
pub trait TasksApi {
    /// Fetch the full task collection.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// Create a task from a raw title.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails or is rejected.
    fn create(&self, title: &str) -> Result<Task, ApiError>;

    /// Apply a partial update to an existing task.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails or the id is unknown.
    fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;

    /// Delete a task by id.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails or the id is unknown.
    fn delete(&self, id: TaskId) -> Result<(), ApiError>;

    /// Remove every completed task.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    fn clear_completed(&self) -> Result<(), ApiError>;
}

/// Blocking reqwest implementation of [`TasksApi`].
#[derive(Debug, Clone)]
pub struct HttpTasksApi {
    client: Client,
    base_url: String,
}

/// Error body the server attaches to 400/404 responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpTasksApi {
    /// Create a client against the given base URL (scheme + authority).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn reject(response: Response) -> ApiError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .map_or_else(|_| status.to_string(), |body| body.message);
        match status {
            StatusCode::BAD_REQUEST => ApiError::InvalidRequest(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            other => ApiError::Unexpected(other),
        }
    }
}

impl TasksApi for HttpTasksApi {
    fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.client.get(self.url(TASKS_RESOURCE)).send()?;
        if !response.status().is_success() {
            return Err(Self::reject(response));
        }
        Ok(response.json()?)
    }

    fn create(&self, title: &str) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.url(TASKS_RESOURCE))
            .json(&serde_json::json!({ "title": title }))
            .send()?;
        if !response.status().is_success() {
            return Err(Self::reject(response));
        }
        Ok(response.json()?)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("{TASKS_RESOURCE}/{id}")))
            .json(patch)
            .send()?;
        if !response.status().is_success() {
            return Err(Self::reject(response));
        }
        Ok(response.json()?)
    }

    fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("{TASKS_RESOURCE}/{id}")))
            .send()?;
        if !response.status().is_success() {
            return Err(Self::reject(response));
        }
        Ok(())
    }

    fn clear_completed(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("{TASKS_RESOURCE}/clear-completed")))
            .send()?;
        if !response.status().is_success() {
            return Err(Self::reject(response));
        }
        Ok(())
    }
}
