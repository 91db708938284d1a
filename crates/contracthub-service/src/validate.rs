//! Field checks shared by the services.
//!
//! Failures are collected per field and reported as one validation error
//! whose details map each field to its messages.

use serde_json::{Map, Value, json};

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;

/// Accumulates field errors.
#[derive(Debug, Default)]
pub struct FieldErrors {
    fields: Map<String, Value>,
}

impl FieldErrors {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: &str) {
        let entry = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(message.to_string()));
        }
    }

    /// Require a non-blank string.
    pub fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        }
    }

    /// Require a non-blank string when present.
    pub fn not_blank(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.required(field, value);
        }
    }

    /// Require a non-negative size when present.
    pub fn non_negative(&mut self, field: &str, value: Option<i64>) {
        if value.is_some_and(|v| v < 0) {
            self.add(field, "must be greater than or equal to 0");
        }
    }

    /// Fail with a validation error if any field was recorded.
    pub fn finish(self) -> AppResult<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        Err(AppError::validation("Validation failed").with_details(json!(self.fields)))
    }
}

#[cfg(test)]
mod tests {
    use contracthub_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_collects_per_field() {
        let mut errors = FieldErrors::new();
        errors.required("title", " ");
        errors.non_negative("fileSize", Some(-1));
        errors.not_blank("description", None);

        let err = errors.finish().unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert_eq!(
            err.details.unwrap(),
            json!({
                "title": ["must not be empty"],
                "fileSize": ["must be greater than or equal to 0"]
            })
        );
    }

    #[test]
    fn test_ok_when_clean() {
        let mut errors = FieldErrors::new();
        errors.required("title", "MSA");
        assert!(errors.finish().is_ok());
    }
}
