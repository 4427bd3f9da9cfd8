//! Fundamental types for the quill wallet client.
//!
//! This crate defines the records shared by every other crate in the workspace:
//! outpoints, inputs, outputs, transactions, unspent outputs, blocks, peers,
//! hashes, keys, addresses, scripts and spending policies. The wallet never
//! validates these records; it builds them, ships them and reads them back.

pub mod address;
pub mod block;
pub mod error;
pub mod hash;
pub mod keys;
pub mod outpoint;
pub mod params;
pub mod peer;
pub mod policy;
pub mod script;
pub mod tx;
pub mod utxo;

pub use address::{Address, AddressKind};
pub use block::{Block, BlockHash, BlockHeader};
pub use error::QuillError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use outpoint::OutPoint;
pub use peer::Peer;
pub use policy::SpendingPolicy;
pub use script::Script;
pub use tx::{Transaction, TxIn, TxOut};
pub use utxo::UnspentTxOut;
