//! Error types for volume planning.

use thiserror::Error;

/// Errors produced while loading and validating volume planning rules.
#[derive(Debug, Error)]
pub enum VolplanError {
    /// Invalid or inconsistent product configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The product definition document could not be deserialized.
    #[error("Malformed product definition: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type VolplanResult<T> = Result<T, VolplanError>;
