//! Core error types for the AHATool building block

use thiserror::Error;

/// Main error type for building block operations
#[derive(Error, Debug)]
pub enum AhatoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AhatoolError {
    pub fn invalid_property(key: impl Into<String>, reason: impl Into<String>) -> Self {
        AhatoolError::InvalidProperty {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AhatoolError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's configuration rather than the environment
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AhatoolError::Configuration(_)
                | AhatoolError::InvalidProperty { .. }
                | AhatoolError::InvalidArgument { .. }
                | AhatoolError::Serialization(_)
        )
    }
}

/// Result type alias for building block operations
pub type AhatoolResult<T> = Result<T, AhatoolError>;

impl From<serde_json::Error> for AhatoolError {
    fn from(err: serde_json::Error) -> Self {
        AhatoolError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AhatoolError {
    fn from(err: serde_yaml::Error) -> Self {
        AhatoolError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AhatoolError {
    fn from(err: toml::de::Error) -> Self {
        AhatoolError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AhatoolError {
    fn from(err: anyhow::Error) -> Self {
        AhatoolError::Other(err.to_string())
    }
}
