//! Key management: the signing capabilities a wallet holds.

use quill_crypto::{derive_address, generate_keypair, keypair_from_seed, sign_message};
use quill_types::{Address, KeyPair, PublicKey, Signature};

use crate::error::WalletError;

/// Something that can sign spend digests for one public key.
pub trait SigningCapability: Send + Sync {
    fn public_key(&self) -> PublicKey;
    fn sign(&self, digest: &[u8; 32]) -> Signature;
}

impl SigningCapability for KeyPair {
    fn public_key(&self) -> PublicKey {
        self.public.clone()
    }

    fn sign(&self, digest: &[u8; 32]) -> Signature {
        sign_message(digest, &self.private)
    }
}

/// The configured key pairs of a wallet, in a fixed order.
///
/// The first signer is the primary one; the order of all signers defines the
/// threshold redeem script.
pub trait KeyManager: Send + Sync {
    fn signers(&self) -> Vec<&dyn SigningCapability>;

    fn primary(&self) -> &dyn SigningCapability;

    fn key_pair_count(&self) -> usize {
        self.signers().len()
    }

    /// Key-hash address of the primary signer.
    fn primary_address(&self) -> Address {
        derive_address(&self.primary().public_key())
    }

    fn public_keys(&self) -> Vec<PublicKey> {
        self.signers().iter().map(|s| s.public_key()).collect()
    }
}

/// In-memory key ring over Ed25519 key pairs. Never empty.
pub struct Keyring {
    pairs: Vec<KeyPair>,
}

impl Keyring {
    /// Generate `n` fresh key pairs.
    pub fn generate(n: usize) -> Result<Self, WalletError> {
        Self::from_key_pairs((0..n).map(|_| generate_keypair()).collect())
    }

    /// Deterministic key ring, one key pair per seed.
    pub fn from_seeds(seeds: &[[u8; 32]]) -> Result<Self, WalletError> {
        Self::from_key_pairs(seeds.iter().map(keypair_from_seed).collect())
    }

    pub fn from_key_pairs(pairs: Vec<KeyPair>) -> Result<Self, WalletError> {
        if pairs.is_empty() {
            return Err(WalletError::Key("a key ring needs at least one key pair".into()));
        }
        Ok(Self { pairs })
    }

    pub fn key_pairs(&self) -> &[KeyPair] {
        &self.pairs
    }
}

impl KeyManager for Keyring {
    fn signers(&self) -> Vec<&dyn SigningCapability> {
        self.pairs
            .iter()
            .map(|kp| kp as &dyn SigningCapability)
            .collect()
    }

    fn primary(&self) -> &dyn SigningCapability {
        // Non-empty by construction.
        &self.pairs[0]
    }
}
