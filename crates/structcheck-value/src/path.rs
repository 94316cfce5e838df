//! Path segments locating a value inside nested data.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position inside an array or tuple.
    Index(usize),
    /// Property name, or the printable form of a map/set key.
    Key(String),
}

impl PathSegment {
    /// Segment for an entry of a map or set keyed by an arbitrary value.
    ///
    /// String keys are used verbatim; anything else uses its printable form.
    pub fn for_key(key: &Value) -> Self {
        match key {
            Value::String(s) => PathSegment::Key(s.clone()),
            other => PathSegment::Key(other.to_string()),
        }
    }

    /// Returns the property name when this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    /// Returns the position when this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{index}"),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

/// Joins a path with `.` the way diagnostics display it.
pub fn join(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_keys_are_used_verbatim() {
        let segment = PathSegment::for_key(&Value::from("id"));
        assert_eq!(segment, PathSegment::Key("id".to_string()));
    }

    #[test]
    fn non_string_keys_use_printable_form() {
        assert_eq!(
            PathSegment::for_key(&Value::from(3)),
            PathSegment::Key("3".to_string())
        );
        assert_eq!(
            PathSegment::for_key(&Value::Bool(true)),
            PathSegment::Key("true".to_string())
        );
    }

    #[test]
    fn join_uses_dots() {
        let path = vec![
            PathSegment::from("a"),
            PathSegment::from(2),
            PathSegment::from("c"),
        ];
        assert_eq!(join(&path), "a.2.c");
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn serializes_untagged() {
        let path = vec![PathSegment::from("a"), PathSegment::from(0)];
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["a",0]"#);
    }
}
