//! Core error types

use thiserror::Error;

/// Core error type for ztworld
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration rejected after parsing
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[cfg(feature = "toml")]
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
