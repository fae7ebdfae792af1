//! Request body validation.
//!
//! Bodies arrive as raw JSON and are checked field by field, so that a client gets every
//! problem with its payload at once instead of the first serde error.

use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::task::{NewTask, TaskPatch, TaskStatus, TimeOfDay};

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Name of the offending field, or `body` when the payload itself is malformed
    pub field: String,
    /// Human readable description of the problem
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// All violations found in one request body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid data: {}", describe(.0))]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![FieldViolation::new(field, message)])
    }

    /// Returns the individual violations.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.0
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{} {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("; ")
}

type Fields = Map<String, Value>;

fn object(body: &Value) -> Result<&Fields, ValidationErrors> {
    body.as_object()
        .ok_or_else(|| ValidationErrors::single("body", "must be a JSON object"))
}

fn text(
    fields: &Fields,
    field: &str,
    required: bool,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.get(field) {
        None => {
            if required {
                violations.push(FieldViolation::new(field, "is required"));
            }
            None
        }
        Some(Value::String(value)) if value.is_empty() => {
            violations.push(FieldViolation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
    }
}

fn choice<T>(fields: &Fields, field: &str, violations: &mut Vec<FieldViolation>) -> Option<T>
where
    T: ActiveEnum<Value = String>,
{
    let raw = fields.get(field)?;
    let parsed = raw
        .as_str()
        .and_then(|value| T::try_from_value(&value.to_string()).ok());
    if parsed.is_none() {
        violations.push(FieldViolation::new(
            field,
            format!("must be one of: {}", T::values().join(", ")),
        ));
    }
    parsed
}

/// Validates the body of a task creation request.
///
/// `title` and `description` are required non-empty strings. `time` and `status` are optional
/// and fall back to their defaults when omitted.
pub fn validate_new_task(body: &Value) -> Result<NewTask, ValidationErrors> {
    let fields = object(body)?;
    let mut violations = Vec::new();

    let title = text(fields, "title", true, &mut violations);
    let description = text(fields, "description", true, &mut violations);
    let time = choice::<TimeOfDay>(fields, "time", &mut violations);
    let status = choice::<TaskStatus>(fields, "status", &mut violations);

    match (title, description) {
        (Some(title), Some(description)) if violations.is_empty() => Ok(NewTask {
            title,
            description,
            time: time.unwrap_or_default(),
            status: status.unwrap_or_default(),
        }),
        _ => Err(ValidationErrors(violations)),
    }
}

/// Validates the body of a partial task update. Every field is optional; defaults are never
/// applied so omitted fields stay untouched.
pub fn validate_task_patch(body: &Value) -> Result<TaskPatch, ValidationErrors> {
    let fields = object(body)?;
    let mut violations = Vec::new();

    let patch = TaskPatch {
        title: text(fields, "title", false, &mut violations),
        description: text(fields, "description", false, &mut violations),
        time: choice::<TimeOfDay>(fields, "time", &mut violations),
        status: choice::<TaskStatus>(fields, "status", &mut violations),
    };

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors(violations))
    }
}

/// Validates a hydration body and returns the liters value.
pub fn validate_liters(body: &Value) -> Result<f64, ValidationErrors> {
    let fields = object(body)?;
    fields
        .get("liters")
        .and_then(Value::as_f64)
        .filter(|liters| liters.is_finite() && *liters >= 0.0)
        .ok_or_else(|| ValidationErrors::single("liters", "must be a non-negative number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields_of(errors: &ValidationErrors) -> Vec<&str> {
        errors
            .violations()
            .iter()
            .map(|violation| violation.field.as_str())
            .collect()
    }

    #[test]
    fn can_apply_defaults_for_omitted_time_and_status() {
        let task = validate_new_task(&json!({
            "title": "Stretch",
            "description": "Ten minutes of stretching",
        }))
        .unwrap();

        assert_eq!(task.title, "Stretch");
        assert_eq!(task.description, "Ten minutes of stretching");
        assert_eq!(task.time, TimeOfDay::Morning);
        assert_eq!(task.status, TaskStatus::NotStarted);
    }

    #[test]
    fn can_accept_explicit_time_and_status() {
        let task = validate_new_task(&json!({
            "title": "Read",
            "description": "One chapter",
            "time": "evening",
            "status": "in_progress",
        }))
        .unwrap();

        assert_eq!(task.time, TimeOfDay::Evening);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn can_reject_empty_title_and_description() {
        let errors = validate_new_task(&json!({ "title": "", "description": "" })).unwrap_err();

        assert_eq!(fields_of(&errors), vec!["title", "description"]);
        assert_eq!(errors.violations()[0].message, "must not be empty");
    }

    #[test]
    fn can_reject_missing_required_fields() {
        let errors = validate_new_task(&json!({})).unwrap_err();

        assert_eq!(fields_of(&errors), vec!["title", "description"]);
        assert_eq!(errors.violations()[0].message, "is required");
    }

    #[test]
    fn can_reject_time_outside_enumeration() {
        let errors = validate_new_task(&json!({
            "title": "Sleep",
            "description": "Early night",
            "time": "midnight",
        }))
        .unwrap_err();

        assert_eq!(
            errors.violations(),
            &[FieldViolation::new(
                "time",
                "must be one of: morning, afternoon, evening"
            )]
        );
    }

    #[test]
    fn can_reject_non_string_title_and_null_status() {
        let errors = validate_new_task(&json!({
            "title": 42,
            "description": "Answer",
            "status": null,
        }))
        .unwrap_err();

        assert_eq!(fields_of(&errors), vec!["title", "status"]);
        assert_eq!(errors.violations()[0].message, "must be a string");
    }

    #[test]
    fn can_reject_body_that_is_not_an_object() {
        let errors = validate_new_task(&json!(["title"])).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["body"]);
    }

    #[test]
    fn can_ignore_unknown_fields() {
        let task = validate_new_task(&json!({
            "title": "Walk",
            "description": "Around the block",
            "id": "client-chosen",
        }))
        .unwrap();

        assert_eq!(task.title, "Walk");
    }

    #[test]
    fn can_validate_status_only_patch_without_defaults() {
        let patch = validate_task_patch(&json!({ "status": "done" })).unwrap();

        assert_eq!(
            patch,
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..TaskPatch::default()
            }
        );
    }

    #[test]
    fn can_accept_empty_patch() {
        let patch = validate_task_patch(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn can_reject_invalid_fields_in_patch() {
        let errors =
            validate_task_patch(&json!({ "title": "", "status": "finished" })).unwrap_err();

        assert_eq!(fields_of(&errors), vec!["title", "status"]);
        assert_eq!(
            errors.violations()[1].message,
            "must be one of: not_started, in_progress, done"
        );
    }

    #[test]
    fn can_accept_non_negative_liters() {
        assert_eq!(validate_liters(&json!({ "liters": 2.5 })).unwrap(), 2.5);
        assert_eq!(validate_liters(&json!({ "liters": 0 })).unwrap(), 0.0);
    }

    #[test]
    fn can_reject_negative_or_non_numeric_liters() {
        for body in [
            json!({ "liters": -1 }),
            json!({ "liters": "2" }),
            json!({ "liters": null }),
            json!({}),
            json!(3),
        ] {
            assert!(validate_liters(&body).is_err(), "accepted {body}");
        }
    }

    #[test]
    fn can_describe_all_violations_in_message() {
        let errors = validate_new_task(&json!({ "title": "" })).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Invalid data: title must not be empty; description is required"
        );
    }
}
