//! Error types for spam-rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for spam-rs operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// spam-rs error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An artifact file could not be loaded
    #[error("Failed to load artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    /// An artifact deserialized but is internally inconsistent
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Classifier or vectorizer failed at prediction time
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Feature dimensions do not line up
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },
}

impl From<::config::ConfigError> for SpamError {
    fn from(err: ::config::ConfigError) -> Self {
        SpamError::Config(err.to_string())
    }
}
