use thiserror::Error;

/// Result type for configuration graph operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building or querying a configuration graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Top-level document is not a map
    #[error("Configuration document must be a map, got {found}")]
    InvalidDocumentKind { found: String },

    /// `aliases` entry is not a sequence of strings
    #[error("`aliases` of {node} must be a list of strings, got {found}")]
    InvalidAliasesKind { node: String, found: String },

    /// Query path is not an ordered sequence
    #[error("Query path must be a list, got {found}")]
    InvalidPathShape { found: String },

    /// Nothing in the graph matched the query path
    #[error("Config path {path} not found")]
    NotFound { path: String },

    /// Resolved value could not be coerced to the requested type
    #[error("Config path {path}: expected {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// Resolved value failed a caller-supplied check
    #[error("Config path {path} failed validation: {message}")]
    ValidationFailed { path: String, message: String },

    /// Input text is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Invalid engine settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConfigError {
    /// Create an invalid document kind error
    pub fn invalid_document(found: impl Into<String>) -> Self {
        Self::InvalidDocumentKind {
            found: found.into(),
        }
    }

    /// Create an invalid aliases error for the node at `node`
    pub fn invalid_aliases(node: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidAliasesKind {
            node: node.into(),
            found: found.into(),
        }
    }

    /// Create an invalid path shape error
    pub fn invalid_path(found: impl Into<String>) -> Self {
        Self::InvalidPathShape {
            found: found.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create a validation failure error
    pub fn validation_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error only signals an absent value
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// Human-readable JSON kind name used in error messages
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_name_the_offending_part() {
        let err = ConfigError::invalid_aliases("root.python", "string");
        assert_eq!(
            err.to_string(),
            "`aliases` of root.python must be a list of strings, got string"
        );

        let err = ConfigError::type_mismatch("[timeout]", "integer", "bool");
        assert_eq!(err.to_string(), "Config path [timeout]: expected integer, got bool");
    }

    #[test]
    fn json_errors_keep_their_own_kind() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!([1])), "list");
        assert_eq!(kind_name(&json!({"a": 1})), "map");
        assert_eq!(kind_name(&json!(1.5)), "number");
    }
}
