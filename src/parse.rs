//! Recursive descent parsing of untyped values against schemas
//!
//! The walker visits the schema and the input in lock-step, threading an
//! issue accumulator through the descent. Record and sequence nodes gather
//! every child failure before returning, so one parse call reports all
//! simultaneous violations. Constraints on a single string accumulate the
//! same way.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{ErrorKind, FieldError, ValidationError};
use crate::format;
use crate::path::{FieldPath, PathSegment};
use crate::schema::{Schema, StringCheck};

/// Parse an untyped value against a schema
///
/// On success the output value carries only the fields the schema declares,
/// with defaults substituted for absent defaulted fields and transforms
/// applied. On failure the error lists every violation in walk order.
pub fn parse(schema: &Schema, input: &Value) -> Result<Value, ValidationError> {
    trace!(schema = schema.kind_name(), "parsing value");

    let mut path = FieldPath::root();
    let mut issues = Vec::new();
    match walk(schema, Some(input), &mut path, &mut issues) {
        Outcome::Value(value) => Ok(value),
        Outcome::Absent => Ok(Value::Null),
        Outcome::Failed => {
            debug!(issue_count = issues.len(), "validation failed");
            Err(ValidationError::new(issues))
        }
    }
}

/// Result of walking one schema node
///
/// `Failed` is returned only after at least one issue has been recorded.
enum Outcome {
    /// The node validated and produced this output value
    Value(Value),
    /// An optional value was absent; the parent decides the representation
    Absent,
    /// The node (or a descendant) recorded a failure
    Failed,
}

fn walk(
    schema: &Schema,
    input: Option<&Value>,
    path: &mut FieldPath,
    issues: &mut Vec<FieldError>,
) -> Outcome {
    match schema {
        Schema::Optional(inner) => match input {
            None | Some(Value::Null) => Outcome::Absent,
            Some(value) => walk(inner, Some(value), path, issues),
        },

        Schema::Default(inner, default) => match input {
            None | Some(Value::Null) => Outcome::Value(default.clone()),
            Some(value) => walk(inner, Some(value), path, issues),
        },

        Schema::Refined(inner, refinement) => match walk(inner, input, path, issues) {
            Outcome::Value(value) => {
                if refinement.accepts(&value) {
                    Outcome::Value(value)
                } else {
                    issues.push(FieldError::new(
                        path.clone(),
                        ErrorKind::RefinementFailed,
                        refinement.message(),
                    ));
                    Outcome::Failed
                }
            }
            other => other,
        },

        Schema::Transformed(inner, transform) => match walk(inner, input, path, issues) {
            Outcome::Value(value) => Outcome::Value(transform.apply(value)),
            other => other,
        },

        Schema::String(checks) => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            let Value::String(s) = value else {
                return type_mismatch("string", value, path, issues);
            };
            walk_string(s, checks, path, issues)
        }

        Schema::Number => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            if value.is_number() {
                Outcome::Value(value.clone())
            } else {
                type_mismatch("number", value, path, issues)
            }
        }

        Schema::Boolean => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            if value.is_boolean() {
                Outcome::Value(value.clone())
            } else {
                type_mismatch("boolean", value, path, issues)
            }
        }

        Schema::Enum(allowed) => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            if allowed.contains(value) {
                Outcome::Value(value.clone())
            } else {
                issues.push(FieldError::new(
                    path.clone(),
                    ErrorKind::InvalidEnumValue,
                    enum_message(allowed, value),
                ));
                Outcome::Failed
            }
        }

        Schema::Object(fields) => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            let Value::Object(map) = value else {
                return type_mismatch("object", value, path, issues);
            };

            // Input keys not declared by the schema are dropped silently.
            let mut out = Map::new();
            let mut failed = false;
            for (name, field_schema) in fields {
                path.push(PathSegment::Key(name.clone()));
                match walk(field_schema, map.get(name), path, issues) {
                    Outcome::Value(field_value) => {
                        out.insert(name.clone(), field_value);
                    }
                    Outcome::Absent => {}
                    Outcome::Failed => failed = true,
                }
                path.pop();
            }

            if failed {
                Outcome::Failed
            } else {
                Outcome::Value(Value::Object(out))
            }
        }

        Schema::Array(item) => {
            let Some(value) = require_present(input, path, issues) else {
                return Outcome::Failed;
            };
            let Value::Array(elements) = value else {
                return type_mismatch("array", value, path, issues);
            };

            let mut out = Vec::with_capacity(elements.len());
            let mut failed = false;
            for (index, element) in elements.iter().enumerate() {
                path.push(PathSegment::Index(index));
                match walk(item, Some(element), path, issues) {
                    Outcome::Value(element_value) => out.push(element_value),
                    Outcome::Absent => out.push(Value::Null),
                    Outcome::Failed => failed = true,
                }
                path.pop();
            }

            if failed {
                Outcome::Failed
            } else {
                Outcome::Value(Value::Array(out))
            }
        }
    }
}

/// Checks every constraint in declaration order, accumulating all failures
fn walk_string(
    s: &str,
    checks: &[StringCheck],
    path: &mut FieldPath,
    issues: &mut Vec<FieldError>,
) -> Outcome {
    let length = s.chars().count();
    let mut failed = false;

    for check in checks {
        let issue = match check {
            StringCheck::Min(n) if length < *n => Some((
                ErrorKind::TooShort,
                format!("String must contain at least {} character(s)", n),
            )),
            StringCheck::Max(n) if length > *n => Some((
                ErrorKind::TooLong,
                format!("String must contain at most {} character(s)", n),
            )),
            StringCheck::Email if !format::is_email(s) => {
                Some((ErrorKind::InvalidFormat, "Invalid email".to_string()))
            }
            StringCheck::Url if !format::is_url(s) => {
                Some((ErrorKind::InvalidFormat, "Invalid url".to_string()))
            }
            StringCheck::Uuid if !format::is_uuid(s) => {
                Some((ErrorKind::InvalidFormat, "Invalid uuid".to_string()))
            }
            _ => None,
        };

        if let Some((kind, message)) = issue {
            issues.push(FieldError::new(path.clone(), kind, message));
            failed = true;
        }
    }

    if failed {
        Outcome::Failed
    } else {
        Outcome::Value(Value::String(s.to_string()))
    }
}

fn require_present<'a>(
    input: Option<&'a Value>,
    path: &FieldPath,
    issues: &mut Vec<FieldError>,
) -> Option<&'a Value> {
    match input {
        Some(value) => Some(value),
        None => {
            issues.push(FieldError::new(path.clone(), ErrorKind::Required, "Required"));
            None
        }
    }
}

fn type_mismatch(
    expected: &str,
    actual: &Value,
    path: &FieldPath,
    issues: &mut Vec<FieldError>,
) -> Outcome {
    issues.push(FieldError::new(
        path.clone(),
        ErrorKind::TypeMismatch,
        format!("Expected {}, received {}", expected, json_type_name(actual)),
    ));
    Outcome::Failed
}

/// JSON type vocabulary used in mismatch messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn enum_message(allowed: &[Value], actual: &Value) -> String {
    let expected = allowed
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        "Invalid enum value. Expected {}, received {}",
        expected,
        render_literal(actual)
    )
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{array, boolean, enumeration, number, object, string};
    use serde_json::json;

    #[test]
    fn test_number_rejects_numeric_string() {
        let err = number().parse(&json!("123")).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(err.issues()[0].message, "Expected number, received string");
    }

    #[test]
    fn test_number_accepts_number() {
        assert_eq!(number().parse(&json!(123)).unwrap(), json!(123));
    }

    #[test]
    fn test_boolean_rejects_null() {
        let err = boolean().parse(&json!(null)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected boolean, received null");
    }

    #[test]
    fn test_missing_required_field() {
        let schema = object([("name", string())]);
        let err = schema.parse(&json!({})).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].kind, ErrorKind::Required);
        assert_eq!(err.issues()[0].message, "Required");
        assert_eq!(err.issues()[0].path.to_string(), "name");
    }

    #[test]
    fn test_object_rejects_non_object_input() {
        let schema = object([("name", string())]);
        let err = schema.parse(&json!([1, 2])).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected object, received array");
        assert!(err.issues()[0].path.is_root());
    }

    #[test]
    fn test_unknown_input_keys_are_dropped() {
        let schema = object([("name", string())]);
        let parsed = schema
            .parse(&json!({"name": "Tony", "unrelated": 42}))
            .unwrap();
        assert_eq!(parsed, json!({"name": "Tony"}));
    }

    #[test]
    fn test_optional_field_absent_from_output() {
        let schema = object([("name", string()), ("nickname", string().optional())]);
        let parsed = schema.parse(&json!({"name": "Tony"})).unwrap();
        assert_eq!(parsed, json!({"name": "Tony"}));
    }

    #[test]
    fn test_optional_field_present_still_validates() {
        let schema = object([("nickname", string().optional())]);
        let err = schema.parse(&json!({"nickname": 7})).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected string, received number");
        assert_eq!(err.issues()[0].path.to_string(), "nickname");
    }

    #[test]
    fn test_null_counts_as_absent_for_optional() {
        let schema = object([("nickname", string().optional())]);
        let parsed = schema.parse(&json!({"nickname": null})).unwrap();
        assert_eq!(parsed, json!({}));
    }

    #[test]
    fn test_default_substituted_without_inner_validation() {
        // The default is emitted verbatim even though it would not pass the
        // inner schema.
        let schema = object([("retries", number().default_to("unset"))]);
        let parsed = schema.parse(&json!({})).unwrap();
        assert_eq!(parsed, json!({"retries": "unset"}));
    }

    #[test]
    fn test_default_ignored_when_value_present() {
        let schema = object([("retries", number().default_to(3))]);
        let parsed = schema.parse(&json!({"retries": 5})).unwrap();
        assert_eq!(parsed, json!({"retries": 5}));

        let err = schema.parse(&json!({"retries": "five"})).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected number, received string");
    }

    #[test]
    fn test_enum_matches_by_value() {
        let schema = enumeration(["private", "public"]);
        assert_eq!(schema.parse(&json!("public")).unwrap(), json!("public"));

        let err = schema.parse(&json!("internal")).unwrap_err();
        assert_eq!(err.issues()[0].kind, ErrorKind::InvalidEnumValue);
        assert_eq!(
            err.issues()[0].message,
            "Invalid enum value. Expected 'private' | 'public', received 'internal'"
        );
    }

    #[test]
    fn test_enum_of_numbers() {
        let schema = enumeration([1, 2, 3]);
        assert_eq!(schema.parse(&json!(2)).unwrap(), json!(2));

        let err = schema.parse(&json!(9)).unwrap_err();
        assert_eq!(
            err.issues()[0].message,
            "Invalid enum value. Expected 1 | 2 | 3, received 9"
        );
    }

    #[test]
    fn test_array_collects_every_element_failure() {
        let schema = array(number());
        let err = schema.parse(&json!([1, "two", 3, "four"])).unwrap_err();

        assert_eq!(err.issues().len(), 2);
        assert_eq!(err.issues()[0].path.to_string(), "[1]");
        assert_eq!(err.issues()[1].path.to_string(), "[3]");
        assert_eq!(err.issues()[0].message, "Expected number, received string");
    }

    #[test]
    fn test_nested_failure_path() {
        let schema = object([(
            "user",
            object([("tags", array(string()))]),
        )]);
        let err = schema
            .parse(&json!({"user": {"tags": ["a", "b", 3]}}))
            .unwrap_err();
        assert_eq!(err.issues()[0].path.to_string(), "user.tags[2]");
    }

    #[test]
    fn test_sibling_failures_all_reported_in_order() {
        let schema = object([
            ("name", string()),
            ("age", number()),
            ("admin", boolean()),
        ]);
        let err = schema.parse(&json!({"age": "old", "admin": 1})).unwrap_err();

        let paths: Vec<String> = err
            .issues()
            .iter()
            .map(|issue| issue.path.to_string())
            .collect();
        assert_eq!(paths, vec!["name", "age", "admin"]);
    }

    #[test]
    fn test_single_field_accumulates_every_failing_constraint() {
        // Both the length bound and the format check report.
        let schema = string().min(5).email();
        let err = schema.parse(&json!("a")).unwrap_err();

        assert_eq!(err.issues().len(), 2);
        assert_eq!(
            err.issues()[0].message,
            "String must contain at least 5 character(s)"
        );
        assert_eq!(err.issues()[1].message, "Invalid email");
    }

    #[test]
    fn test_string_length_counts_characters_not_bytes() {
        let schema = string().max(3);
        assert!(schema.parse(&json!("héllo")).is_err());
        assert!(schema.parse(&json!("héo")).is_ok());
    }

    #[test]
    fn test_transform_applies_after_validation() {
        let schema = string().transform(|value| match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        });
        assert_eq!(schema.parse(&json!("tony")).unwrap(), json!("TONY"));
    }

    #[test]
    fn test_transform_skipped_on_failure() {
        let schema = string().transform(|_| json!("never"));
        let err = schema.parse(&json!(1)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected string, received number");
    }

    #[test]
    fn test_refinement_runs_after_inner_schema() {
        let schema = string().refine(
            |value| value.as_str().is_some_and(|s| s.starts_with("repo-")),
            "must start with 'repo-'",
        );
        assert!(schema.parse(&json!("repo-core")).is_ok());

        let err = schema.parse(&json!("core")).unwrap_err();
        assert_eq!(err.issues()[0].kind, ErrorKind::RefinementFailed);
        assert_eq!(err.issues()[0].message, "must start with 'repo-'");
    }

    #[test]
    fn test_optional_at_root_accepts_null() {
        let schema = string().optional();
        assert_eq!(schema.parse(&json!(null)).unwrap(), json!(null));
        assert_eq!(schema.parse(&json!("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_defaulted_transform_applies_to_default() {
        // The mapping runs on the substituted default as well.
        let schema = object([(
            "label",
            string().default_to("fallback").transform(|value| match value {
                Value::String(s) => Value::String(s.to_uppercase()),
                other => other,
            }),
        )]);
        let parsed = schema.parse(&json!({})).unwrap();
        assert_eq!(parsed, json!({"label": "FALLBACK"}));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let schema = object([
            ("name", string().min(2)),
            ("tags", array(string())),
        ]);
        let input = json!({"name": "x", "tags": ["a", 1]});

        let first = schema.parse(&input).unwrap_err();
        let second = schema.parse(&input).unwrap_err();
        assert_eq!(first, second);
    }
}
