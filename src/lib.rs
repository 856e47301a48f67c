//! Conform Schema Engine
//!
//! Declarative runtime validation for untyped JSON values: build an
//! immutable [`Schema`] once, then parse arbitrary `serde_json::Value`
//! input against it. Parsing yields either an output value matching the
//! declared shape or a [`ValidationError`] listing every violation found,
//! each located by its field path.
//!
//! ## Features
//!
//! - **Immutable Schemas**: built once, safe to share across threads
//! - **Composition**: extend and merge object schemas with later-wins precedence
//! - **Constraints**: string length bounds, email/url/uuid formats
//! - **Optionality & Defaults**: absent fields skipped or substituted
//! - **Transforms & Refinements**: post-validation mapping and predicates
//! - **Aggregated Errors**: every violation reported from a single parse call
//!
//! ## Example
//!
//! ```
//! use conform::{object, string};
//! use serde_json::json;
//!
//! let form = object([
//!     ("name", string().min(1)),
//!     ("email", string().email()),
//!     ("website", string().url().optional()),
//! ]);
//!
//! let parsed = form
//!     .parse(&json!({"name": "Tony", "email": "tony@example.com"}))
//!     .unwrap();
//! assert_eq!(parsed, json!({"name": "Tony", "email": "tony@example.com"}));
//!
//! let err = form.parse(&json!({"name": "Tony", "email": "tony"})).unwrap_err();
//! assert_eq!(err.issues()[0].message, "Invalid email");
//! ```

pub mod error;
pub mod format;
pub mod parse;
pub mod path;
pub mod schema;

pub use error::{ErrorKind, FieldError, Issues, ValidationError};
pub use parse::parse;
pub use path::{FieldPath, PathSegment};
pub use schema::{
    array, boolean, enumeration, number, object, string, Refinement, Schema, StringCheck,
    Transform,
};
