//! The `Todo` entity and the schema its request payloads are checked against.
//!
//! # Design
//! Request bodies are read field by field from JSON into `TodoDraft`, whose
//! fields are all optional. A field of the wrong JSON type and a missing
//! field are both reported alongside every constraint violation instead of
//! failing the whole body. Constraints are declared on the draft with
//! `validator`. `TodoDraft::into_request` is the only way to obtain a
//! `TodoRequest`, which therefore always satisfies them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::FieldError;

/// A persisted todo row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

/// Request body before validation.
#[derive(Debug, Default, Validate)]
pub struct TodoDraft {
    #[validate(required, length(min = 3))]
    pub title: Option<String>,
    #[validate(required, length(min = 3, max = 100))]
    pub description: Option<String>,
    #[validate(required, range(exclusive_min = 0, exclusive_max = 6))]
    pub priority: Option<i64>,
    #[validate(required)]
    pub complete: Option<bool>,
}

/// A request payload that passed validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoRequest {
    title: String,
    description: String,
    priority: i64,
    complete: bool,
}

/// Field order used when reporting errors.
const FIELDS: [&str; 4] = ["title", "description", "priority", "complete"];

/// Read `field` from `object`. A present value that `read` cannot convert,
/// `null` included, is recorded as a type error.
fn typed<'a, T>(
    object: &'a Map<String, Value>,
    field: &str,
    read: impl Fn(&'a Value) -> Option<T>,
    (kind, msg): (&str, &str),
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = object.get(field)?;
    let converted = read(value);
    if converted.is_none() {
        errors.push(FieldError::body(field, kind, msg));
    }
    converted
}

fn param<'a>(error: &'a ValidationError, name: &str) -> Option<&'a Value> {
    error.params.get(name)
}

fn bound(error: &ValidationError, name: &str) -> f64 {
    param(error, name).and_then(Value::as_f64).unwrap_or_default()
}

/// Translate a `validator` error into the wire shape, keyed by its code.
/// `value` is the field as it was submitted.
fn to_field_error(field: &str, error: &ValidationError, value: Option<&Value>) -> FieldError {
    match error.code.as_ref() {
        "required" => FieldError::body(field, "missing", "Field required"),
        "length" => {
            let len = value
                .and_then(Value::as_str)
                .map_or(0, |text| text.chars().count()) as f64;
            match param(error, "min").and_then(Value::as_f64) {
                Some(min) if len < min => FieldError::body(
                    field,
                    "string_too_short",
                    format!("String should have at least {min} characters"),
                ),
                _ => FieldError::body(
                    field,
                    "string_too_long",
                    format!(
                        "String should have at most {} characters",
                        bound(error, "max")
                    ),
                ),
            }
        }
        "range" => {
            let number = value.and_then(Value::as_f64);
            match (number, param(error, "exclusive_min").and_then(Value::as_f64)) {
                (Some(number), Some(min)) if number <= min => FieldError::body(
                    field,
                    "greater_than",
                    format!("Input should be greater than {min}"),
                ),
                _ => FieldError::body(
                    field,
                    "less_than",
                    format!("Input should be less than {}", bound(error, "exclusive_max")),
                ),
            }
        }
        code => FieldError::body(field, code, error.message.as_deref().unwrap_or(code)),
    }
}

impl TodoDraft {
    /// Validate a decoded JSON body.
    pub fn from_json(body: &Value) -> Result<TodoRequest, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new(
                &["body"],
                "model_attributes_type",
                "Input should be a valid dictionary or object to extract fields from",
            )]);
        };

        let mut type_errors = Vec::new();
        let draft = TodoDraft {
            title: typed(
                object,
                "title",
                Value::as_str,
                ("string_type", "Input should be a valid string"),
                &mut type_errors,
            )
            .map(str::to_string),
            description: typed(
                object,
                "description",
                Value::as_str,
                ("string_type", "Input should be a valid string"),
                &mut type_errors,
            )
            .map(str::to_string),
            priority: typed(
                object,
                "priority",
                Value::as_i64,
                ("int_type", "Input should be a valid integer"),
                &mut type_errors,
            ),
            complete: typed(
                object,
                "complete",
                Value::as_bool,
                ("bool_type", "Input should be a valid boolean"),
                &mut type_errors,
            ),
        };
        draft.check(type_errors)
    }

    /// Evaluate every constraint and collect all violations.
    pub fn into_request(self) -> Result<TodoRequest, Vec<FieldError>> {
        self.check(Vec::new())
    }

    fn submitted(&self, field: &str) -> Option<Value> {
        match field {
            "title" => self.title.clone().map(Value::from),
            "description" => self.description.clone().map(Value::from),
            "priority" => self.priority.map(Value::from),
            "complete" => self.complete.map(Value::from),
            _ => None,
        }
    }

    /// A field with a type error reports only that error; its constraint
    /// results are skipped.
    fn check(self, type_errors: Vec<FieldError>) -> Result<TodoRequest, Vec<FieldError>> {
        let violations = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let by_field = violations.field_errors();

        let mut errors = Vec::new();
        for field in FIELDS {
            let value = self.submitted(field);
            let mut field_type_errors = type_errors
                .iter()
                .filter(|e| e.loc.last().map(String::as_str) == Some(field))
                .cloned()
                .peekable();
            if field_type_errors.peek().is_some() {
                errors.extend(field_type_errors);
            } else if let Some(list) = by_field.get(field) {
                errors.extend(list.iter().map(|e| to_field_error(field, e, value.as_ref())));
            }
        }

        match (self.title, self.description, self.priority, self.complete) {
            (Some(title), Some(description), Some(priority), Some(complete))
                if errors.is_empty() =>
            {
                Ok(TodoRequest {
                    title,
                    description,
                    priority,
                    complete,
                })
            }
            _ => Err(errors),
        }
    }
}

impl TodoRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: i64,
        complete: bool,
    ) -> Result<Self, Vec<FieldError>> {
        TodoDraft {
            title: Some(title.into()),
            description: Some(description.into()),
            priority: Some(priority),
            complete: Some(complete),
        }
        .into_request()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn draft(title: &str, description: &str, priority: i64, complete: bool) -> TodoDraft {
        TodoDraft {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            priority: Some(priority),
            complete: Some(complete),
        }
    }

    fn kinds(errors: &[FieldError]) -> Vec<(&str, &str)> {
        errors
            .iter()
            .map(|e| (e.loc[1].as_str(), e.kind.as_str()))
            .collect()
    }

    #[test]
    fn valid_draft_becomes_request() {
        let request = draft("Buy milk", "2% milk", 3, false).into_request().unwrap();
        assert_eq!(request.title(), "Buy milk");
        assert_eq!(request.description(), "2% milk");
        assert_eq!(request.priority(), 3);
        assert!(!request.complete());
    }

    #[rstest]
    #[case::title_too_short("ab", "valid", 3, "title", "string_too_short")]
    #[case::description_too_short("valid", "ab", 3, "description", "string_too_short")]
    #[case::priority_zero("valid", "valid", 0, "priority", "greater_than")]
    #[case::priority_negative("valid", "valid", -4, "priority", "greater_than")]
    #[case::priority_six("valid", "valid", 6, "priority", "less_than")]
    fn single_violation_is_reported(
        #[case] title: &str,
        #[case] description: &str,
        #[case] priority: i64,
        #[case] field: &str,
        #[case] kind: &str,
    ) {
        let errors = draft(title, description, priority, true)
            .into_request()
            .unwrap_err();
        assert_eq!(kinds(&errors), vec![(field, kind)]);
    }

    #[test]
    fn description_longer_than_hundred_is_rejected() {
        let errors = draft("valid", &"x".repeat(101), 1, true)
            .into_request()
            .unwrap_err();
        assert_eq!(kinds(&errors), vec![("description", "string_too_long")]);
        assert_eq!(errors[0].msg, "String should have at most 100 characters");
    }

    #[test]
    fn messages_name_the_bound() {
        let errors = draft("ab", "valid", 9, true).into_request().unwrap_err();
        assert_eq!(errors[0].msg, "String should have at least 3 characters");
        assert_eq!(errors[1].msg, "Input should be less than 6");
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn priority_bounds_are_exclusive(#[case] priority: i64) {
        assert!(draft("abc", "abc", priority, false).into_request().is_ok());
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        assert!(draft("abc", &"y".repeat(100), 2, true).into_request().is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(draft("été", "日本語", 2, false).into_request().is_ok());
    }

    #[test]
    fn missing_complete_is_reported() {
        let mut d = draft("valid", "valid", 2, true);
        d.complete = None;
        let errors = d.into_request().unwrap_err();
        assert_eq!(kinds(&errors), vec![("complete", "missing")]);
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = TodoDraft::default().into_request().unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("title", "missing"),
                ("description", "missing"),
                ("priority", "missing"),
                ("complete", "missing"),
            ]
        );
    }

    #[test]
    fn all_violations_are_collected() {
        let errors = draft("a", "b", 9, false).into_request().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn json_body_becomes_request() {
        let body = json!({"title": "Buy milk", "description": "2% milk", "priority": 3, "complete": false});
        let request = TodoDraft::from_json(&body).unwrap();
        assert_eq!(request, TodoRequest::new("Buy milk", "2% milk", 3, false).unwrap());
    }

    #[test]
    fn type_errors_are_reported_per_field_with_constraint_errors() {
        let body = json!({"title": 123, "description": "ab", "priority": 3, "complete": false});
        let errors = TodoDraft::from_json(&body).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![("title", "string_type"), ("description", "string_too_short")]
        );
    }

    #[rstest]
    #[case::priority_string(json!({"title": "abc", "description": "abc", "priority": "high", "complete": true}), "priority", "int_type")]
    #[case::priority_float(json!({"title": "abc", "description": "abc", "priority": 2.5, "complete": true}), "priority", "int_type")]
    #[case::complete_null(json!({"title": "abc", "description": "abc", "priority": 2, "complete": null}), "complete", "bool_type")]
    #[case::description_list(json!({"title": "abc", "description": ["abc"], "priority": 2, "complete": true}), "description", "string_type")]
    fn wrong_json_type_is_a_field_error(
        #[case] body: Value,
        #[case] field: &str,
        #[case] kind: &str,
    ) {
        let errors = TodoDraft::from_json(&body).unwrap_err();
        assert_eq!(kinds(&errors), vec![(field, kind)]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = TodoDraft::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["body"]);
        assert_eq!(errors[0].kind, "model_attributes_type");
    }

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            description: "Described".to_string(),
            priority: 4,
            complete: true,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "Described");
        assert_eq!(json["priority"], 4);
        assert_eq!(json["complete"], true);
    }
}
