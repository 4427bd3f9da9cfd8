//! Script templating for the quill wallet client.
//!
//! Produces the byte scripts that lock outputs to an address and unlock them
//! again under a [`SpendingPolicy`](quill_types::SpendingPolicy):
//!
//! - key-hash locking: `DUP HASH160 <hash> EQUALVERIFY CHECKSIG`
//! - script-hash locking: `HASH160 <hash> EQUAL`
//! - threshold redeem script: `<n-1> <key_1> .. <key_n> <n> CHECKMULTISIG`
//! - unlocking scripts: data pushes of signatures and key material
//!
//! The wallet never executes scripts; it only builds and parses them.

pub mod error;
pub mod opcodes;
pub mod parse;
pub mod proof;
pub mod templates;

pub use error::ScriptError;
pub use parse::{parse_redeem_script, parse_unlocking_script};
pub use proof::UnlockProof;
pub use templates::{ScriptTemplates, StandardScripts, MAX_REDEEM_KEYS};
