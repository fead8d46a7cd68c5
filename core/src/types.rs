//! Wire types for the todo API.
//!
//! Defined independently from the server crate so the client carries no
//! axum or sqlx dependency; the integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// A persisted todo as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

/// Body for create and full-replacement update. All fields are required by
/// the service: `title` at least 3 characters, `description` 3 to 100,
/// `priority` 1 to 5.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

/// One entry of a 422 `detail` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Name of the offending field, i.e. the last element of `loc`.
    pub fn field(&self) -> Option<&str> {
        self.loc.last().map(String::as_str)
    }
}
