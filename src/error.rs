//! Error types for the calculators and configuration loading

use thiserror::Error;

/// Failure returned by any calculator
///
/// Every calculator is pure, so a failure is always deterministic: the same
/// input fails the same way on every call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An input violated a calculator precondition
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure while loading an [`EngineConfig`](crate::config::EngineConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },
}
