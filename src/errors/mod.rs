//! Error handling module for the RSVP store.
//!
//! Callers see two kinds of failure: validation (bad input or a missing referenced record) and
//! operational (persistence or initialization faults). The variant carries the human-readable
//! reason; `kind()` gives the category.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const OPERATION_FAILED: &str = "OPERATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Broad category of an [`RsvpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Operational,
}

/// Store error type.
#[derive(Debug)]
pub enum RsvpError {
    /// Invalid input, unknown event/player/RSVP, or capacity exceeded
    Validation(String),
    /// Generic failure of a store operation; the cause has already been logged
    Operation(String),
    /// Snapshot could not be read or written
    Storage(String),
    /// Invalid configuration value
    Config(String),
}

impl RsvpError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        RsvpError::Validation(message.into())
    }

    /// Generic failure of the named operation.
    pub fn operation_failed(operation: &str) -> Self {
        RsvpError::Operation(format!("Failed to {}", operation))
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RsvpError::Validation(_) => ErrorKind::Validation,
            RsvpError::Operation(_) | RsvpError::Storage(_) | RsvpError::Config(_) => {
                ErrorKind::Operational
            }
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            RsvpError::Validation(_) => codes::VALIDATION_ERROR,
            RsvpError::Operation(_) => codes::OPERATION_FAILED,
            RsvpError::Storage(_) => codes::STORAGE_ERROR,
            RsvpError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            RsvpError::Validation(msg)
            | RsvpError::Operation(msg)
            | RsvpError::Storage(msg)
            | RsvpError::Config(msg) => msg,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl std::fmt::Display for RsvpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for RsvpError {}

impl From<ValidationError> for RsvpError {
    fn from(err: ValidationError) -> Self {
        RsvpError::Validation(err.reason().to_string())
    }
}

impl From<sqlx::Error> for RsvpError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        RsvpError::Storage(format!("Database error: {}", err))
    }
}

impl From<std::io::Error> for RsvpError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        RsvpError::Storage(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for RsvpError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        RsvpError::Storage(format!("JSON error: {}", err))
    }
}

/// Result alias used throughout the crate.
pub type RsvpResult<T> = Result<T, RsvpError>;
