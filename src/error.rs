//! Error types for configuration expansion
//!
//! Structural problems with the marker grammar are reported as
//! [`ConfigError`]. Loading documents and converting produced values into
//! typed structs add their own variants on the top-level [`Error`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed marker usage in the document
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serde conversion error
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension does not name a supported document format
    #[error("Unsupported document format for '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Structural inconsistencies in the marker grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A varying key maps to something other than a mapping or a sequence
    #[error(
        "Marked key '{key}' must map to a mapping or a sequence, found {found}; your configuration is inconsistent"
    )]
    InvalidMarkedValue { key: String, found: &'static str },

    /// The varying marker is the empty string
    #[error("Varying marker must not be empty")]
    EmptyMarker,
}

/// Errors raised while deserializing a [`Value`](crate::Value) into Rust types
#[derive(Debug, Error)]
pub enum SerdeError {
    /// Custom serde error message
    #[error("{0}")]
    Custom(String),

    /// Type mismatch during deserialization
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl ConfigError {
    /// Creates the error for a marked key holding an unsupported value
    pub fn invalid_marked_value(key: &str, value: &crate::Value) -> Self {
        ConfigError::InvalidMarkedValue {
            key: key.to_string(),
            found: value.type_name(),
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serde(SerdeError::Custom(msg.to_string()))
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_invalid_marked_value_message() {
        let error = ConfigError::invalid_marked_value("$alpha", &Value::Integer(3));
        assert_eq!(
            error,
            ConfigError::InvalidMarkedValue {
                key: "$alpha".to_string(),
                found: "integer",
            }
        );
        let message = error.to_string();
        assert!(message.contains("'$alpha'"));
        assert!(message.contains("mapping or a sequence"));
    }

    #[test]
    fn test_config_error_converts_into_error() {
        let error: Error = ConfigError::EmptyMarker.into();
        assert!(matches!(error, Error::Config(ConfigError::EmptyMarker)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Varying marker must not be empty"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = Error::UnsupportedFormat {
            path: PathBuf::from("sweep.toml"),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported document format for 'sweep.toml'"
        );
    }

    #[test]
    fn test_serde_custom() {
        let error = <Error as serde::de::Error>::custom("boom");
        assert_eq!(error.to_string(), "Serde error: boom");
    }
}
