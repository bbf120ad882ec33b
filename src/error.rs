//! Domain-specific error types for clm-bridge

use thiserror::Error;

/// Message used when the host reports failure without saying why
pub const DEFAULT_ERROR_MESSAGE: &str = "Error getting data";

/// Main error type for host calls, record queries and reference resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClmError {
    /// The host callback reported failure or carried no usable payload
    #[error("Host call failed: {message}")]
    HostCall { message: String },

    /// A query returned zero rows where one was required
    #[error("No {what} record found")]
    NotFound { what: String },

    /// A required identifier or argument was absent or empty
    #[error("{what} is missing")]
    MissingInput { what: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ClmError {
    pub fn host_call(message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE);
        ClmError::HostCall {
            message: message.to_string(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ClmError::NotFound { what: what.into() }
    }

    pub fn missing_input(what: impl Into<String>) -> Self {
        ClmError::MissingInput { what: what.into() }
    }
}

impl From<serde_json::Error> for ClmError {
    fn from(err: serde_json::Error) -> Self {
        ClmError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type alias for clm-bridge operations
pub type Result<T> = std::result::Result<T, ClmError>;
