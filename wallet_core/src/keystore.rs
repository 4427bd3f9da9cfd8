//! Argon2id encrypted keystore for a key ring.
//!
//! Encrypts the concatenated 32-byte Ed25519 secrets of every key pair with a
//! user-chosen password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the secrets with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

use quill_crypto::keypair_from_private;
use quill_types::PrivateKey;

use crate::error::WalletError;
use crate::keys::Keyring;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane of parallelism.
const ARGON2_MEMORY_KIB: u32 = 65536; // 64 MB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;
const SECRET_LEN: usize = 32;

const KEYSTORE_VERSION: u32 = 1;

/// The top-level keystore file structure, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    /// Number of key pairs sealed in the ciphertext.
    pub key_count: usize,
    pub crypto: KeystoreCrypto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

/// Encrypt concatenated 32-byte secrets with a password.
pub fn encrypt_keystore(secrets: &[u8], password: &str) -> Result<KeystoreFile, WalletError> {
    if secrets.is_empty() || secrets.len() % SECRET_LEN != 0 {
        return Err(WalletError::Keystore(format!(
            "secret material must be a non-empty multiple of {SECRET_LEN} bytes, got {}",
            secrets.len()
        )));
    }

    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let kdf_params = KdfParams::default();
    let derived_key = derive_key(password, &salt, &kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(derived_key.as_ref())
        .map_err(|e| WalletError::Keystore(format!("AES key init failed: {e}")))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), secrets)
        .map_err(|e| WalletError::Keystore(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        key_count: secrets.len() / SECRET_LEN,
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore file, returning the concatenated secrets.
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(WalletError::Keystore(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }

    let salt = hex::decode(&keystore.crypto.salt)
        .map_err(|e| WalletError::Keystore(format!("invalid salt hex: {e}")))?;
    let nonce_bytes = hex::decode(&keystore.crypto.nonce)
        .map_err(|e| WalletError::Keystore(format!("invalid nonce hex: {e}")))?;
    let ciphertext = hex::decode(&keystore.crypto.ciphertext)
        .map_err(|e| WalletError::Keystore(format!("invalid ciphertext hex: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Keystore(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt, &keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(derived_key.as_ref())
        .map_err(|e| WalletError::Keystore(format!("AES key init failed: {e}")))?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| {
                WalletError::Keystore("decryption failed: wrong password or corrupted data".into())
            })?,
    );

    if plaintext.len() != keystore.key_count * SECRET_LEN {
        return Err(WalletError::Keystore(format!(
            "decrypted {} bytes for {} keys",
            plaintext.len(),
            keystore.key_count
        )));
    }
    Ok(plaintext)
}

/// Encrypt every key pair of `keyring` and write the keystore to `path`.
pub fn save_keyring(keyring: &Keyring, path: &Path, password: &str) -> Result<(), WalletError> {
    let mut secrets = Zeroizing::new(Vec::with_capacity(keyring.key_pairs().len() * SECRET_LEN));
    for kp in keyring.key_pairs() {
        secrets.extend_from_slice(&kp.private.0);
    }
    let keystore = encrypt_keystore(&secrets, password)?;
    save_keystore(&keystore, path)?;
    tracing::info!(path = %path.display(), keys = keystore.key_count, "saved keystore");
    Ok(())
}

/// Read and decrypt the keystore at `path`, rebuilding the key ring in order.
pub fn load_keyring(path: &Path, password: &str) -> Result<Keyring, WalletError> {
    let keystore = load_keystore(path)?;
    let secrets = decrypt_keystore(&keystore, password)?;
    let pairs = secrets
        .chunks_exact(SECRET_LEN)
        .map(|chunk| {
            let mut bytes = [0u8; SECRET_LEN];
            bytes.copy_from_slice(chunk);
            keypair_from_private(PrivateKey(bytes))
        })
        .collect();
    Keyring::from_key_pairs(pairs)
}

pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| WalletError::Keystore(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| WalletError::Keystore(format!("failed to write keystore file: {e}")))?;
    Ok(())
}

pub fn load_keystore(path: &Path) -> Result<KeystoreFile, WalletError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Keystore(format!("failed to read keystore file: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| WalletError::Keystore(format!("invalid keystore JSON: {e}")))
}

fn derive_key(
    password: &str,
    salt: &[u8],
    kdf: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let params = Params::new(
        kdf.memory,
        kdf.iterations,
        kdf.parallelism,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| WalletError::Keystore(format!("Argon2 params error: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password.as_bytes(), salt, output.as_mut())
        .map_err(|e| WalletError::Keystore(format!("Argon2 hashing failed: {e}")))?;
    Ok(output)
}
