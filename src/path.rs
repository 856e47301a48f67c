//! Field paths locating validation failures within nested structures

use serde::Serialize;
use std::fmt;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Record field name
    Key(String),
    /// Sequence element index
    Index(usize),
}

/// Ordered location of a value inside a nested structure
///
/// Renders with dotted field names and bracketed indices, e.g.
/// `user.tags[2]`. The root path renders as an empty string.
/// Serializes as a flat array of names and indices, e.g. `["user","tags",2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The root path (top of the input value)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path points at the root
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The ordered segments of this path
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// A new path descending into the named field
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// A new path descending into the indexed element
    pub fn element(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        write!(f, ".{}", key)?;
                    } else {
                        write!(f, "{}", key)?;
                    }
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_renders_empty() {
        assert_eq!(FieldPath::root().to_string(), "");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_nested_path_rendering() {
        let path = FieldPath::root().child("user").child("tags").element(2);
        assert_eq!(path.to_string(), "user.tags[2]");
        assert_eq!(path.segments().len(), 3);
        assert!(!path.is_root());
    }

    #[test]
    fn test_index_at_root() {
        let path = FieldPath::root().element(0).child("name");
        assert_eq!(path.to_string(), "[0].name");
    }

    #[test]
    fn test_path_serializes_as_flat_array() {
        let path = FieldPath::root().child("items").element(1);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["items", 1]));
    }
}
