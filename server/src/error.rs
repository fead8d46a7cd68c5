//! Error kinds surfaced by the todo service and their HTTP mapping.
//!
//! # Design
//! Handlers return `Result<_, AppError>` and propagate with `?`. Client
//! errors carry a `detail` body: a plain message for 404, a list of
//! field-level errors for 422. Store failures are logged and answered with
//! a generic 500 so driver messages never reach the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub const NOT_FOUND_DETAIL: &str = "Todo not found";

/// A single constraint violation, located by its path in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], kind: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|part| part.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    pub fn body(field: &str, kind: &str, msg: impl Into<String>) -> Self {
        Self::new(&["body", field], kind, msg)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("todo not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": NOT_FOUND_DETAIL })),
            )
                .into_response(),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
