use crate::error::{kind_name, ConfigError, Result};
use serde_json::Value;
use std::fmt;

/// Ordered query segments for the path resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryPath {
    segments: Vec<String>,
}

impl QueryPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a path from a JSON list.
    ///
    /// Strings are used verbatim, other elements by their JSON text. Anything
    /// but a list is rejected before any traversal happens.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ConfigError::invalid_path(kind_name(value)));
        };

        Ok(Self::new(items.iter().map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments.join(", "))
    }
}

impl<S: Into<String> + Clone> From<&[S]> for QueryPath {
    fn from(segments: &[S]) -> Self {
        Self::new(segments.iter().cloned())
    }
}

impl<S: Into<String> + Clone, const N: usize> From<&[S; N]> for QueryPath {
    fn from(segments: &[S; N]) -> Self {
        Self::new(segments.iter().cloned())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryPath {
    fn from(segments: [S; N]) -> Self {
        Self::new(segments)
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryPath {
    fn from(segments: Vec<S>) -> Self {
        Self::new(segments)
    }
}

impl From<&QueryPath> for QueryPath {
    fn from(path: &QueryPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_value_stringifies_elements() {
        let path = QueryPath::from_value(&json!(["python", 0, true])).unwrap();
        assert_eq!(path.segments(), &["python", "0", "true"]);
    }

    #[test]
    fn from_value_rejects_non_lists() {
        assert_eq!(
            QueryPath::from_value(&json!("python.commands")).unwrap_err(),
            ConfigError::invalid_path("string")
        );
        assert!(QueryPath::from_value(&json!({"a": 1})).is_err());
    }

    #[test]
    fn conversions_and_display() {
        let a = QueryPath::from(["a", "b"]);
        let b = QueryPath::from(vec!["a".to_string(), "b".to_string()]);
        let c = QueryPath::from(&["a", "b"][..]);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.to_string(), "[a, b]");
        assert!(QueryPath::default().is_empty());
    }
}
