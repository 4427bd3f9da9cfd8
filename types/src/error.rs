//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing the shared record types.
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid peer address: {0}")]
    InvalidPeer(String),

    #[error("invalid script: {0}")]
    InvalidScript(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
