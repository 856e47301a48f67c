//! Schema types and builders
//!
//! A [`Schema`] is an immutable description of an expected shape and its
//! constraints. Schemas are built once through the free functions in this
//! module ([`string`], [`number`], [`boolean`], [`object`], [`array`],
//! [`enumeration`]) and the chaining methods on [`Schema`], then reused for
//! every parse call. Construction never mutates an existing schema;
//! composition builds new ones.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::parse;

/// A declarative constraint on a string schema
///
/// Constraints are checked in declaration order and every failing
/// constraint is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringCheck {
    /// Inclusive lower bound on length, in characters
    Min(usize),
    /// Inclusive upper bound on length, in characters
    Max(usize),
    /// Email shape
    Email,
    /// Absolute URL shape
    Url,
    /// Hyphenated UUID v4 shape
    Uuid,
}

/// A post-validation mapping applied to a successfully parsed value
///
/// Transforms are total over the validated type and cannot fail.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Transform {
    /// Wrap a mapping function
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Apply the mapping to a validated value
    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// A post-validation predicate with the message reported when it rejects
#[derive(Clone)]
pub struct Refinement {
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    message: String,
}

impl Refinement {
    /// Wrap a predicate and its rejection message
    pub fn new(
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    /// Run the predicate against a validated value
    pub fn accepts(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// The message reported when the predicate rejects
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A declarative description of an expected shape and its constraints
///
/// Schemas hold no per-call state, so a schema built at process start can
/// be shared across any number of concurrent callers.
#[derive(Debug, Clone)]
pub enum Schema {
    /// UTF-8 string with an ordered list of constraints
    String(Vec<StringCheck>),
    /// Any JSON number
    Number,
    /// Boolean
    Boolean,
    /// Structured record with a fixed, ordered field map
    Object(Vec<(String, Schema)>),
    /// Homogeneous sequence, the item schema applied elementwise
    Array(Box<Schema>),
    /// Fixed ordered set of allowed literal values
    Enum(Vec<Value>),
    /// Wrapper treating an absent value as valid
    Optional(Box<Schema>),
    /// Wrapper substituting a value when the input is absent
    Default(Box<Schema>, Value),
    /// Wrapper running a predicate after the inner schema validates
    Refined(Box<Schema>, Refinement),
    /// Wrapper mapping the value after the inner schema validates
    Transformed(Box<Schema>, Transform),
}

/// Primitive string schema
pub fn string() -> Schema {
    Schema::String(Vec::new())
}

/// Primitive number schema
pub fn number() -> Schema {
    Schema::Number
}

/// Primitive boolean schema
pub fn boolean() -> Schema {
    Schema::Boolean
}

/// Structured-record schema from an ordered field map
///
/// Field order is preserved; on a duplicate name the later entry wins.
pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Schema {
    let deduped = union_fields(
        Vec::new(),
        fields.into_iter().map(|(name, schema)| (name.into(), schema)),
    );
    Schema::Object(deduped)
}

/// Sequence schema applying `item` to every element
pub fn array(item: Schema) -> Schema {
    Schema::Array(Box::new(item))
}

/// Enumerated value-set schema
///
/// The input must equal one of `values`; the allowed set is reported in
/// declaration order on failure.
pub fn enumeration<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Schema {
    Schema::Enum(values.into_iter().map(Into::into).collect())
}

impl Schema {
    /// Parse an untyped value against this schema
    ///
    /// Returns the validated output value (defaults substituted, unknown
    /// fields dropped, transforms applied) or a [`ValidationError`] listing
    /// every violation.
    pub fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        parse::parse(self, input)
    }

    /// Constrain a string schema to at least `n` characters
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not a string schema.
    pub fn min(self, n: usize) -> Self {
        self.push_check(StringCheck::Min(n), "min")
    }

    /// Constrain a string schema to at most `n` characters
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not a string schema.
    pub fn max(self, n: usize) -> Self {
        self.push_check(StringCheck::Max(n), "max")
    }

    /// Constrain a string schema to an email shape
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not a string schema.
    pub fn email(self) -> Self {
        self.push_check(StringCheck::Email, "email")
    }

    /// Constrain a string schema to an absolute URL shape
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not a string schema.
    pub fn url(self) -> Self {
        self.push_check(StringCheck::Url, "url")
    }

    /// Constrain a string schema to a UUID v4 shape
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not a string schema.
    pub fn uuid(self) -> Self {
        self.push_check(StringCheck::Uuid, "uuid")
    }

    /// Treat an absent value as valid
    ///
    /// A missing key (or an explicit null standing in for one) parses to
    /// absent; a present value still validates against the inner schema.
    pub fn optional(self) -> Self {
        Schema::Optional(Box::new(self))
    }

    /// Substitute `value` when the input is absent
    ///
    /// The default is emitted verbatim, without validating it against the
    /// inner schema. A present value validates normally.
    pub fn default_to(self, value: impl Into<Value>) -> Self {
        Schema::Default(Box::new(self), value.into())
    }

    /// Run `predicate` after the inner schema validates
    ///
    /// A rejected value fails the parse with `message`.
    pub fn refine(
        self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Schema::Refined(Box::new(self), Refinement::new(predicate, message))
    }

    /// Map the value after the inner schema validates
    ///
    /// The mapping applies only on success and cannot fail.
    pub fn transform(self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Schema::Transformed(Box::new(self), Transform::new(f))
    }

    /// New object schema with `fields` overlaid on the receiver's field map
    ///
    /// Overlapping names keep their original position but take the new
    /// schema; new names append in order.
    ///
    /// # Panics
    ///
    /// Panics if the receiver is not an object schema.
    pub fn extend<K: Into<String>>(self, fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        match self {
            Schema::Object(base) => Schema::Object(union_fields(
                base,
                fields.into_iter().map(|(name, schema)| (name.into(), schema)),
            )),
            other => panic!(
                "extend() is only supported on object schemas, got {}",
                other.kind_name()
            ),
        }
    }

    /// New object schema combining the receiver's fields with `other`'s
    ///
    /// The other schema's fields win on overlapping names.
    ///
    /// # Panics
    ///
    /// Panics unless both schemas are object schemas.
    pub fn merge(self, other: Schema) -> Self {
        match (self, other) {
            (Schema::Object(base), Schema::Object(overlay)) => {
                Schema::Object(union_fields(base, overlay))
            }
            (s, o) => panic!(
                "merge() requires two object schemas, got {} and {}",
                s.kind_name(),
                o.kind_name()
            ),
        }
    }

    /// The schema kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number => "number",
            Schema::Boolean => "boolean",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Enum(_) => "enum",
            Schema::Optional(_) => "optional",
            Schema::Default(_, _) => "default",
            Schema::Refined(_, _) => "refined",
            Schema::Transformed(_, _) => "transformed",
        }
    }

    fn push_check(self, check: StringCheck, method: &str) -> Self {
        match self {
            Schema::String(mut checks) => {
                checks.push(check);
                Schema::String(checks)
            }
            other => panic!(
                "{}() is only supported on string schemas, got {}",
                method,
                other.kind_name()
            ),
        }
    }
}

/// Field-map union with later-wins precedence
///
/// Shared by [`object`], [`Schema::extend`] and [`Schema::merge`]: the two
/// composition operations are the same union under one precedence rule.
fn union_fields(
    mut base: Vec<(String, Schema)>,
    overlay: impl IntoIterator<Item = (String, Schema)>,
) -> Vec<(String, Schema)> {
    for (name, schema) in overlay {
        if let Some(slot) = base.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = schema;
        } else {
            base.push((name, schema));
        }
    }
    base
}
