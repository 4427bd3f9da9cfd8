//! Transaction identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::QuillError;

/// A 32-byte transaction id (double SHA-256 of the canonical encoding).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for TxHash {
    type Err = QuillError;

    /// Parse the 64-character lowercase or uppercase hex form printed by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| QuillError::InvalidHash(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| QuillError::InvalidHash(format!("expected 32 bytes: {s}")))?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        let h = TxHash::new([0xAB; 32]);
        let parsed: TxHash = h.to_string().parse().unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("abcd".parse::<TxHash>().is_err());
        assert!("zz".repeat(32).parse::<TxHash>().is_err());
    }

    #[test]
    fn debug_is_abbreviated() {
        let h = TxHash::new([0x01; 32]);
        assert_eq!(format!("{h:?}"), "TxHash(01010101)");
    }
}
