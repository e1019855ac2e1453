use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;

pub type EventResult<T> = Result<T, EventError>;

/// Errors produced by the events domain.
#[derive(Debug, Error)]
pub enum EventError {
    /// A query parameter was present but outside its valid range.
    #[error("invalid value for query parameter '{0}'")]
    InvalidParameter(&'static str),

    /// A date query parameter could not be parsed as an ISO-8601 calendar date.
    #[error("query parameter '{0}' is not a valid ISO-8601 date (expected YYYY-MM-DD)")]
    InvalidDate(&'static str),

    /// `to_date` was not strictly after `from_date`.
    #[error("'to_date' must be after 'from_date'")]
    InvalidDateRange,

    /// The submitted document does not conform to the event schema.
    /// Carries every violation found, not just the first.
    #[error("event document failed schema validation")]
    SchemaValidation(Vec<String>),

    #[error("event not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    /// The database cannot be reached right now.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            mongodb::error::ErrorKind::ServerSelection { .. } => {
                EventError::Unavailable(err.to_string())
            }
            _ => EventError::Database(err.to_string()),
        }
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::InvalidParameter(_)
            | EventError::InvalidDate(_)
            | EventError::InvalidDateRange => AppError::Validation {
                message: err.to_string(),
                details: None,
            },
            EventError::SchemaValidation(violations) => AppError::Validation {
                message: "event document failed schema validation".to_string(),
                details: Some(json!(violations)),
            },
            EventError::NotFound(id) => AppError::NotFound(format!("event not found: {id}")),
            EventError::Database(msg) => AppError::Database(msg),
            EventError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
