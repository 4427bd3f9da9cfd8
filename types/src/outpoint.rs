//! References to previously created outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{QuillError, TxHash};

/// Identifies output `index` of transaction `txid`.
///
/// Ordered by `(txid, index)`, which is what breaks value/height ties during
/// coin selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxHash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: TxHash, index: u32) -> Self {
        Self { txid, index }
    }

    /// Canonical byte encoding, as bound into spend digests.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, QuillError> {
        bincode::serialize(self).map_err(|e| QuillError::Serialization(e.to_string()))
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}
