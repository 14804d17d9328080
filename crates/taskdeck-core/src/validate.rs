//! Pure validation for create/update payloads.
//!
//! Nothing here touches a store; callers validate first and only hand
//! validated values onward.

use serde::Serialize;
use thiserror::Error;

/// Upper bound on title length, counted in characters after trimming.
pub const TITLE_MAX_CHARS: usize = 100;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable message for that field.
    pub message: &'static str,
}

/// Structured validation failure carrying one entry per bad field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct ValidationError {
    /// Field-level messages, in field order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate and normalize a title: trim, then require 1–100 characters.
///
/// # Errors
/// Returns a [`FieldError`] when the trimmed title is empty or too long.
pub fn validate_title(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError {
            field: "title",
            message: "Task title is required",
        });
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(FieldError {
            field: "title",
            message: "Task title is too long",
        });
    }
    Ok(trimmed.to_owned())
}

/// Validated create payload. Only the title is caller-supplied; id,
/// completion flag, and timestamp are store-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Trimmed, length-checked title.
    pub title: String,
}

impl TaskDraft {
    /// Validate a raw create payload.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the title fails its constraint.
    pub fn validate(title: &str) -> Result<Self, ValidationError> {
        match validate_title(title) {
            Ok(title) => Ok(Self { title }),
            Err(err) => Err(ValidationError { errors: vec![err] }),
        }
    }
}

/// Validated partial update. Absent fields are left unchanged by the
/// store; an empty patch is valid and applies nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    /// Replacement title, if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement completion flag, if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Validate a raw partial-update payload. Each present field must
    /// satisfy its own constraint; absent fields are not validated.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] listing every failing field.
    pub fn validate(title: Option<&str>, completed: Option<bool>) -> Result<Self, ValidationError> {
        let title = match title.map(validate_title).transpose() {
            Ok(title) => title,
            Err(err) => return Err(ValidationError { errors: vec![err] }),
        };
        Ok(Self { title, completed })
    }

    /// Shorthand for a completion-only patch.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Returns true when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}
