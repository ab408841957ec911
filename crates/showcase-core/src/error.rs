//! Core error types for showcase-core.
//!
//! One thiserror hierarchy shared across the library; the CLI maps these
//! to messages and a nonzero exit, never a panic.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for showcase-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence adapter errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workflow transition errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Persistence adapter errors, shared by both backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Query or write failed
    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    /// A referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Stored document could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown or malformed configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Workflow transition errors. The in-memory state is left unchanged
/// whenever one of these is returned.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The requested action is not legal from the current state
    #[error("'{action}' is not valid in the {state} state")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// Roster is empty; selection cannot run
    #[error("No students enrolled in this subject")]
    NoStudents,

    /// Session is missing a selection the transition requires
    #[error("No {role} selected for the current round")]
    MissingSelection { role: &'static str },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::OperationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
