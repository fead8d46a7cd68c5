//! Request extractors that reject bad input before any store access.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap},
};
use serde_json::Value;

use crate::error::{AppError, FieldError};
use crate::model::{TodoDraft, TodoRequest};

/// Non-negative `{id}` path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let id: i64 = raw.parse().map_err(|_| {
            FieldError::new(
                &["path", "id"],
                "int_parsing",
                "Input should be a valid integer, unable to parse string as an integer",
            )
        })?;
        if id < 0 {
            return Err(FieldError::new(
                &["path", "id"],
                "greater_than_equal",
                "Input should be greater than or equal to 0",
            ));
        }
        Ok(TodoId(id))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for TodoId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(vec![FieldError::new(
                    &["path", "id"],
                    "missing",
                    rejection.body_text(),
                )])
            })?;
        TodoId::parse(&raw).map_err(|err| AppError::Validation(vec![err]))
    }
}

/// A JSON media type, or no `Content-Type` at all.
fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return true;
    };
    value.to_str().is_ok_and(|content_type| {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
    })
}

fn body_error(kind: &str, msg: impl Into<String>) -> AppError {
    AppError::Validation(vec![FieldError::new(&["body"], kind, msg)])
}

/// JSON body checked against the todo schema.
#[derive(Debug)]
pub struct ValidTodo(pub TodoRequest);

impl<S: Send + Sync> FromRequest<S> for ValidTodo {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !accepts_json(req.headers()) {
            return Err(body_error(
                "model_attributes_type",
                "Input should be a valid dictionary or object to extract fields from",
            ));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| body_error("json_invalid", rejection.body_text()))?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|err| body_error("json_invalid", format!("JSON decode error: {err}")))?;
        TodoDraft::from_json(&body)
            .map(ValidTodo)
            .map_err(AppError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_positive_ids_parse() {
        assert_eq!(TodoId::parse("0").unwrap(), TodoId(0));
        assert_eq!(TodoId::parse("42").unwrap(), TodoId(42));
    }

    #[test]
    fn negative_id_is_rejected() {
        let err = TodoId::parse("-1").unwrap_err();
        assert_eq!(err.kind, "greater_than_equal");
        assert_eq!(err.loc, vec!["path", "id"]);
    }

    fn headers(content_type: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn json_or_missing_content_type_is_accepted() {
        assert!(accepts_json(&headers(None)));
        assert!(accepts_json(&headers(Some("application/json"))));
        assert!(accepts_json(&headers(Some("application/json; charset=utf-8"))));
        assert!(accepts_json(&headers(Some("application/merge-patch+json"))));
    }

    #[test]
    fn other_content_types_are_refused() {
        assert!(!accepts_json(&headers(Some("text/plain"))));
        assert!(!accepts_json(&headers(Some("application/x-www-form-urlencoded"))));
    }

    #[test]
    fn non_integer_id_is_rejected() {
        assert_eq!(TodoId::parse("abc").unwrap_err().kind, "int_parsing");
        assert_eq!(TodoId::parse("1.5").unwrap_err().kind, "int_parsing");
    }
}
