//! Error types for the todo API client.
//!
//! `NotFound` and `Validation` get dedicated variants because callers act on
//! them. Any other unexpected status lands in `HttpError` with the raw
//! status and body.

use thiserror::Error;

use crate::types::FieldError;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 422 with field-level details.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field().unwrap_or("?"), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}
