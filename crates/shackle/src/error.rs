//! Error types for configuration merging.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A merge was handed something that is not a mergeable object.
    #[error("malformed merge input: expected an object, found {found}")]
    MalformedMerge { found: &'static str },

    /// A merge tried to rebind an already-configured plugin constructor.
    #[error("plugin '{name}' already uses {existing}; refusing to rebind it to {requested}")]
    PluginConflict {
        name: String,
        existing: String,
        requested: String,
    },
}

/// Human-readable kind of a JSON value, for error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
