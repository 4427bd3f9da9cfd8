//! Wallet core library for quill.
//!
//! Provides everything a light wallet needs to spend on the quill network:
//! - Key rings and the signing capabilities they expose
//! - Password-encrypted keystore files
//! - Coin selection and spend authorization
//! - Transaction building under single-key or threshold policies
//! - The [`Wallet`] facade that talks to full nodes

pub mod authorizer;
pub mod coin_selection;
pub mod config;
pub mod error;
pub mod keys;
pub mod keystore;
pub mod transaction_builder;
pub mod wallet;

pub use authorizer::{authorize, spend_digest};
pub use coin_selection::{select, Selection};
pub use config::WalletConfig;
pub use error::WalletError;
pub use keys::{KeyManager, Keyring, SigningCapability};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keyring, load_keystore, save_keyring, save_keystore,
    KdfParams, KeystoreFile,
};
pub use transaction_builder::{build_transaction, SpendPlan};
pub use wallet::Wallet;
