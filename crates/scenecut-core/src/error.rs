//! Error types for Scenecut.

use thiserror::Error;

/// Main error type for Scenecut operations.
#[derive(Error, Debug)]
pub enum ScenecutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Scenecut operations.
pub type Result<T> = std::result::Result<T, ScenecutError>;
