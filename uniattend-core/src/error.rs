//! Error types for the uniattend ecosystem.

use thiserror::Error;

/// Errors that can occur in uniattend operations.
#[derive(Error, Debug)]
pub enum AttendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Attendance data is still loading")]
    NotHydrated,

    #[error("Week not found: {0}")]
    WeekNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Not a valid attendance backup: {0}")]
    InvalidImport(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for uniattend operations.
pub type AttendResult<T> = Result<T, AttendError>;
