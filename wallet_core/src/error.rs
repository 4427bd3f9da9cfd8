use thiserror::Error;

use quill_network::NetworkError;
use quill_script::ScriptError;
use quill_types::QuillError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("spending policy needs {expected} key pairs, wallet holds {actual}")]
    PolicyMismatch { expected: usize, actual: usize },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("peer reported an error: {0}")]
    Remote(String),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Types(#[from] QuillError),
}
