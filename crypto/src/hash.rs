//! Hash functions for digests, transaction ids and addresses.

use blake2::digest::consts::U20;
use blake2::Blake2b;
use quill_types::{QuillError, Transaction, TxHash};
use sha2::{Digest, Sha256};

type Blake2b160 = Blake2b<U20>;

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// SHA-256 applied twice, the digest used for signing and for ids.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// 160-bit Blake2b of a SHA-256, used for the hash inside addresses.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Blake2b160::new();
    hasher.update(sha256(data));
    let mut output = [0u8; 20];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash serialized transaction bytes to produce its `TxHash`.
pub fn hash_transaction(tx_bytes: &[u8]) -> TxHash {
    TxHash::new(sha256d(tx_bytes))
}

/// The id of a transaction: double SHA-256 of its canonical encoding.
pub fn transaction_id(tx: &Transaction) -> Result<TxHash, QuillError> {
    Ok(hash_transaction(&tx.canonical_bytes()?))
}
