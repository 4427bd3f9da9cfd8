//! Cryptographic primitives for the quill wallet client.
//!
//! - **Ed25519** for spend authorization signatures
//! - **double SHA-256** for spend digests and transaction ids
//! - **Blake2b-160** for the key and script hashes inside addresses
//! - Address derivation with `qk_` / `qs_` prefixes and base32 encoding

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, script_address, validate_address};
pub use hash::{hash160, hash_transaction, sha256, sha256d, transaction_id};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
