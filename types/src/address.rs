//! Ledger address type.
//!
//! Two flavours exist: `qk_` addresses pay to the hash of a single public key,
//! `qs_` addresses pay to the hash of a redeem script (the threshold policy).
//! Only the prefix is checked here; `quill_crypto::decode_address` verifies
//! the encoding and checksum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::QuillError;

/// What an address commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Hash of one public key.
    KeyHash,
    /// Hash of a multi-key redeem script.
    ScriptHash,
}

impl AddressKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::KeyHash => Address::KEY_HASH_PREFIX,
            Self::ScriptHash => Address::SCRIPT_HASH_PREFIX,
        }
    }
}

/// A ledger address, always prefixed with `qk_` or `qs_`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const KEY_HASH_PREFIX: &'static str = "qk_";
    pub const SCRIPT_HASH_PREFIX: &'static str = "qs_";

    /// Wrap a raw address string after checking its prefix.
    pub fn new(raw: impl Into<String>) -> Result<Self, QuillError> {
        let s = raw.into();
        let body_len = if s.starts_with(Self::KEY_HASH_PREFIX) {
            s.len() - Self::KEY_HASH_PREFIX.len()
        } else if s.starts_with(Self::SCRIPT_HASH_PREFIX) {
            s.len() - Self::SCRIPT_HASH_PREFIX.len()
        } else {
            return Err(QuillError::InvalidAddress(s));
        };
        if body_len == 0 {
            return Err(QuillError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    pub fn kind(&self) -> AddressKind {
        if self.0.starts_with(Self::SCRIPT_HASH_PREFIX) {
            AddressKind::ScriptHash
        } else {
            AddressKind::KeyHash
        }
    }

    /// The address without its prefix.
    pub fn body(&self) -> &str {
        &self.0[self.kind().prefix().len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = QuillError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

impl FromStr for Address {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
