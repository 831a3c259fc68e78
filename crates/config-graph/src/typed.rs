//! Typed accessors over [`resolve_best`](crate::resolve_best).
//!
//! Each target type has exactly one coercion policy. Nothing is cached here;
//! memoizing lookups is left to the caller.

use crate::error::{kind_name, ConfigError, Result};
use crate::path::QueryPath;
use crate::template::{expand, Bindings};
use crate::tree::ConfigTree;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Conversion from a raw configuration value
pub trait FromConfigValue: Sized {
    /// Name used in type mismatch errors
    const EXPECTED: &'static str;

    /// `None` when the value cannot be coerced
    fn from_config_value(value: &Value) -> Option<Self>;
}

impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";

    fn from_config_value(value: &Value) -> Option<Self> {
        Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

impl FromConfigValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    // i64::MAX as f64 rounds up to 2^63, which is already out of range
                    .filter(|f| {
                        f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < -(i64::MIN as f64)
                    })
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromConfigValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromConfigValue for PathBuf {
    const EXPECTED: &'static str = "path";

    fn from_config_value(value: &Value) -> Option<Self> {
        String::from_config_value(value).map(PathBuf::from)
    }
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_config_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_config_value).collect(),
            _ => None,
        }
    }
}

/// Best match for `path`, coerced to `T`
pub fn resolve_as<T: FromConfigValue>(tree: &ConfigTree, path: impl Into<QueryPath>) -> Result<T> {
    let path = path.into();
    let node = tree
        .resolve_best(&path)
        .ok_or_else(|| ConfigError::not_found(path.to_string()))?;

    T::from_config_value(node.value()).ok_or_else(|| {
        ConfigError::type_mismatch(path.to_string(), T::EXPECTED, kind_name(node.value()))
    })
}

/// Try each path in order and return the first successful coercion.
///
/// When every path fails the error of the last one is returned.
pub fn resolve_first_as<T, P>(tree: &ConfigTree, paths: &[P]) -> Result<T>
where
    T: FromConfigValue,
    P: Into<QueryPath> + Clone,
{
    let mut last = ConfigError::not_found("[]");
    for path in paths {
        match resolve_as::<T>(tree, path.clone()) {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::trace!("Fallback lookup failed: {err}");
                last = err;
            }
        }
    }
    Err(last)
}

/// [`resolve_as`] followed by a caller-supplied check.
///
/// A rejected value becomes [`ConfigError::ValidationFailed`] carrying
/// `message`, or a description of the value when no message is given.
pub fn resolve_validated<T, F>(
    tree: &ConfigTree,
    path: impl Into<QueryPath>,
    validator: F,
    message: Option<&str>,
) -> Result<T>
where
    T: FromConfigValue + fmt::Debug,
    F: FnOnce(&T) -> bool,
{
    let path = path.into();
    let value = resolve_as::<T>(tree, &path)?;
    if validator(&value) {
        return Ok(value);
    }
    let message = match message {
        Some(message) => message.to_string(),
        None => format!("rejected value {value:?}"),
    };
    Err(ConfigError::validation_failed(path.to_string(), message))
}

/// Expand `template` once from the root, then coerce the text to `T`
pub fn expand_as<T: FromConfigValue>(
    tree: &ConfigTree,
    template: &str,
    initial: &Bindings,
) -> Result<T> {
    let text = expand(template, tree, initial);
    let value = Value::String(text);
    T::from_config_value(&value)
        .ok_or_else(|| ConfigError::type_mismatch(template, T::EXPECTED, kind_name(&value)))
}

/// Expand `template` once from the root into a filesystem path
pub fn expand_to_path(tree: &ConfigTree, template: &str, initial: &Bindings) -> Result<PathBuf> {
    expand_as(tree, template, initial)
}

pub fn resolve_string(tree: &ConfigTree, path: impl Into<QueryPath>) -> Result<String> {
    resolve_as(tree, path)
}

pub fn resolve_int(tree: &ConfigTree, path: impl Into<QueryPath>) -> Result<i64> {
    resolve_as(tree, path)
}

pub fn resolve_float(tree: &ConfigTree, path: impl Into<QueryPath>) -> Result<f64> {
    resolve_as(tree, path)
}

pub fn resolve_bool(tree: &ConfigTree, path: impl Into<QueryPath>) -> Result<bool> {
    resolve_as(tree, path)
}

pub fn resolve_list<T: FromConfigValue>(
    tree: &ConfigTree,
    path: impl Into<QueryPath>,
) -> Result<Vec<T>> {
    resolve_as(tree, path)
}

impl ConfigTree {
    /// See [`resolve_as`]
    pub fn resolve_as<T: FromConfigValue>(&self, path: impl Into<QueryPath>) -> Result<T> {
        resolve_as(self, path)
    }

    /// See [`expand_as`]
    pub fn expand_as<T: FromConfigValue>(&self, template: &str, initial: &Bindings) -> Result<T> {
        expand_as(self, template, initial)
    }
}
