//! Validation error types
//!
//! A failed parse reports every violation found in the input, each located
//! by its field path. Message text is part of the public contract: callers
//! display it verbatim and tests assert on it literally.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::path::FieldPath;

/// Classification of a single validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Runtime type of the input does not match the schema
    TypeMismatch,
    /// Field absent and neither optional nor defaulted
    Required,
    /// String shorter than the declared minimum length
    TooShort,
    /// String longer than the declared maximum length
    TooLong,
    /// String does not match the declared format (email, url, uuid)
    InvalidFormat,
    /// Value is not a member of the allowed literal set
    InvalidEnumValue,
    /// Post-validation predicate rejected the value
    RefinementFailed,
}

/// A single validation failure with its location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Path locating the failure within the input
    pub path: FieldPath,
    /// Failure classification
    pub kind: ErrorKind,
    /// Human-readable message, suitable for direct display
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Ordered collection of field errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issues(Vec<FieldError>);

impl Issues {
    /// Number of recorded failures
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no failures were recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slice of all failures in walk order
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// Consumes self and returns the inner Vec
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Structured validation failure carrying the full set of violations
///
/// A schema either fully validates an input or parsing fails with every
/// violation found. The `Display` form is the combined message: one
/// path-qualified line per issue.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed:\n{issues}")]
pub struct ValidationError {
    issues: Issues,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<FieldError>) -> Self {
        Self {
            issues: Issues(issues),
        }
    }

    /// The ordered list of failures found during the parse
    pub fn issues(&self) -> &[FieldError] {
        self.issues.as_slice()
    }

    /// Consumes self and returns the failures
    pub fn into_issues(self) -> Vec<FieldError> {
        self.issues.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display_with_path() {
        let err = FieldError::new(
            FieldPath::root().child("email"),
            ErrorKind::InvalidFormat,
            "Invalid email",
        );
        assert_eq!(err.to_string(), "email: Invalid email");
    }

    #[test]
    fn test_field_error_display_at_root() {
        let err = FieldError::new(
            FieldPath::root(),
            ErrorKind::TypeMismatch,
            "Expected number, received string",
        );
        assert_eq!(err.to_string(), "Expected number, received string");
    }

    #[test]
    fn test_combined_message_lists_every_issue() {
        let err = ValidationError::new(vec![
            FieldError::new(
                FieldPath::root().child("name"),
                ErrorKind::Required,
                "Required",
            ),
            FieldError::new(
                FieldPath::root().child("email"),
                ErrorKind::InvalidFormat,
                "Invalid email",
            ),
        ]);
        let display = err.to_string();
        assert!(display.contains("name: Required"));
        assert!(display.contains("email: Invalid email"));
    }

    #[test]
    fn test_field_error_serializes_to_json() {
        let err = FieldError::new(
            FieldPath::root().child("age"),
            ErrorKind::TypeMismatch,
            "Expected number, received string",
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["path"], serde_json::json!(["age"]));
        assert_eq!(json["kind"], "type_mismatch");
        assert_eq!(json["message"], "Expected number, received string");
    }
}
