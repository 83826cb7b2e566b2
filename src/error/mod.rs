//! Error types for chutekit.
//!
//! Capability discovery itself is deliberately total — fetch and parse
//! failures degrade to a fallback descriptor instead of surfacing here. The
//! error type covers the surfaces that can legitimately reject input:
//! configuration and operation-name parsing.

use thiserror::Error;

/// Primary error type for all chutekit operations.
#[derive(Error, Debug)]
pub enum ChuteKitError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ChuteKitError>;
