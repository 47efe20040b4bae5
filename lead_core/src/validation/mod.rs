//! Validation framework for the multi-step lead form

pub mod rules;
pub mod steps;

pub use rules::{is_valid_email, is_valid_phone, is_valid_postcode};
pub use steps::{validate_submission, FormStep, StepOutcome};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Machine-readable reason a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingSelection,
    MissingField,
    InvalidFormat,
    InvalidType,
    TooLarge,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Accumulated pass/fail decision with a field-keyed error map.
///
/// A step only advances when the map is empty for that step's fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    pub errors: HashMap<String, Vec<FieldError>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: &str, code: ErrorCode, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(FieldError::new(code, message));
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    /// First error message, for surfacing a single user-facing string.
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| e.message.as_str())
            .next()
    }

    /// Whether any field failed with the given code.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors
            .values()
            .flat_map(|errs| errs.iter())
            .any(|e| e.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResult::success();
        assert!(result.is_valid());
        assert!(result.first_message().is_none());
    }

    #[test]
    fn test_add_error_invalidates() {
        let mut result = ValidationResult::success();
        result.add_error("postcode", ErrorCode::InvalidFormat, "Invalid postcode");
        assert!(!result.is_valid());
        assert!(result.has_code(ErrorCode::InvalidFormat));
        assert!(!result.has_code(ErrorCode::TooLarge));
        assert_eq!(result.first_message(), Some("Invalid postcode"));
    }

    #[test]
    fn test_merge_accumulates_per_field() {
        let mut a = ValidationResult::success();
        a.add_error("phone", ErrorCode::MissingField, "Phone is required");

        let mut b = ValidationResult::success();
        b.add_error("phone", ErrorCode::InvalidFormat, "Invalid phone");
        b.add_error("email", ErrorCode::MissingField, "Email is required");

        a.merge(b);
        assert_eq!(a.errors.len(), 2);
        assert_eq!(a.errors["phone"].len(), 2);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::MissingSelection).unwrap();
        assert_eq!(json, "\"missing_selection\"");
    }
}
