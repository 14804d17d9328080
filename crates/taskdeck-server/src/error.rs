use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taskdeck_core::validate::{FieldError, ValidationError};

/// Request failures mapped onto HTTP status codes.
///
/// Nothing here is process-fatal; a failed request leaves the server
/// serving the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or invalid body, with field-level messages when the
    /// body parsed but failed validation.
    InvalidBody {
        /// Action-specific summary ("Invalid task data" / "Invalid update data").
        message: &'static str,
        /// Field-level messages, empty when the body never parsed.
        errors: Vec<FieldError>,
    },
    /// The path id segment was not an integer.
    InvalidId,
    /// The referenced task does not exist.
    NotFound,
}

impl ApiError {
    /// 400 response for a create payload that never parsed.
    #[must_use]
    pub const fn invalid_task_data() -> Self {
        Self::InvalidBody {
            message: "Invalid task data",
            errors: Vec::new(),
        }
    }

    /// 400 response for a create payload that parsed but failed validation.
    #[must_use]
    pub fn invalid_task_fields(err: ValidationError) -> Self {
        Self::InvalidBody {
            message: "Invalid task data",
            errors: err.errors,
        }
    }

    /// 400 response for an update payload that never parsed.
    #[must_use]
    pub const fn invalid_update_data() -> Self {
        Self::InvalidBody {
            message: "Invalid update data",
            errors: Vec::new(),
        }
    }

    /// 400 response for an update payload that parsed but failed validation.
    #[must_use]
    pub fn invalid_update_fields(err: ValidationError) -> Self {
        Self::InvalidBody {
            message: "Invalid update data",
            errors: err.errors,
        }
    }

    /// Status code this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody { .. } | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Wire shape of an error response: `{message}` plus field errors for
/// validation failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::InvalidBody { message, errors } => ErrorBody { message, errors },
            Self::InvalidId => ErrorBody {
                message: "Invalid task ID",
                errors: Vec::new(),
            },
            Self::NotFound => ErrorBody {
                message: "Task not found",
                errors: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}
