//! Error types for testshim

use thiserror::Error;

/// Result type alias using ShimError
pub type Result<T> = std::result::Result<T, ShimError>;

/// Main error type for testshim operations
#[derive(Debug, Error)]
pub enum ShimError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine service failed to initialize
    #[error("Service '{name}' failed to initialize: {reason}")]
    ServiceInit { name: String, reason: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Settings store errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key is not present in the store
    #[error("Setting not found: {0}")]
    MissingKey(String),

    /// Value has the wrong type
    #[error("Setting '{key}' is not an integer: {found}")]
    NotAnInteger { key: String, found: String },

    /// Invalid setting value
    #[error("Invalid setting: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),
}

impl ShimError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
