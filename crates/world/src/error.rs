//! Error types for World parsing, serialization and generation.

use thiserror::Error;
use ztworld_crypto::{KeyError, SigningError};

/// Errors that can occur while building, encoding or generating a World.
///
/// Every kind is terminal: generation is a pure computation, so retrying the
/// same input fails the same way.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Identity text malformed or with wrong-length fields
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Endpoint text malformed, or its IP or port unparseable
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A root lists more endpoints than the format allows
    #[error("Max endpoints exceeded: {count} (max {max})")]
    MaxEndpointsExceeded { count: usize, max: usize },

    /// Record longer than the byte budget, or too many roots
    #[error("Serialized data too large: {0}")]
    SerializedDataTooLarge(String),

    /// The signature primitive rejected the key material
    #[error("Signing failed: {0}")]
    SigningFailed(#[from] SigningError),

    /// Fresh key material could not be produced
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Encoded World truncated or inconsistent
    #[error("Malformed world: {0}")]
    Malformed(String),

    /// Decoded World does not carry a valid signature
    #[error("World signature does not verify")]
    SignatureInvalid,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not otherwise classified
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type for World operations.
pub type WorldResult<T> = Result<T, WorldError>;
