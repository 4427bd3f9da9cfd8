use thiserror::Error;

use crate::Action;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown action tag: {0}")]
    UnknownAction(u32),

    #[error("{action} cannot carry a {payload} payload")]
    ActionMismatch {
        action: Action,
        payload: &'static str,
    },

    #[error("message too large: {size} > {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("malformed message: {0}")]
    Malformed(String),
}
