//! Error types for the extrack_core library.

use serde::Serialize;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for extrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User id did not resolve to a stored record
    #[error("{0}")]
    NotFound(String),

    /// A required field was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Persistence layer failure (corrupt store, bad record)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The error reported when a user id does not resolve.
    pub fn id_not_found() -> Self {
        Error::NotFound("id not found".into())
    }

    /// Classify this error for structured reporting
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::NotFound(_) => FailureKind::NotFound,
            Error::Validation(_) => FailureKind::Validation,
            Error::Storage(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Csv(_)
            | Error::Toml(_)
            | Error::Config(_) => FailureKind::Storage,
        }
    }
}

/// Coarse failure category surfaced to callers
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Validation,
    Storage,
}

/// Structured failure returned at the operation boundary
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub error: String,
    pub kind: FailureKind,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Failure {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
