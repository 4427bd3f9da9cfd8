use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("address cannot be decoded: {0}")]
    InvalidAddress(String),

    #[error("a threshold redeem script needs 2 to {max} keys, got {got}")]
    InvalidKeyCount { got: usize, max: usize },

    #[error("threshold proof carries {got} signatures, redeem script expects {expected}")]
    SignatureCount { got: usize, expected: usize },

    #[error("malformed script: {0}")]
    Malformed(String),
}
