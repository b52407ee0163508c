//! Unified error system for Brownbag
//!
//! Errors that reach callers of the loading subsystem. Failures of a load
//! attempt itself never show up here; they are delivered as
//! `ContentState::Error` instead.

use serde::{Deserialize, Serialize};

/// Unified error type for Brownbag operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BrownbagError {
    /// Invalid input, configuration or call sequence
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl BrownbagError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Brownbag operations
pub type Result<T> = std::result::Result<T, BrownbagError>;

impl From<std::io::Error> for BrownbagError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<crate::config::ConfigError> for BrownbagError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<crate::effects::TimeError> for BrownbagError {
    fn from(err: crate::effects::TimeError) -> Self {
        Self::internal(err.to_string())
    }
}
