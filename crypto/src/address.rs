//! Address derivation and decoding.
//!
//! Address format: prefix + base32(hash160 (20 bytes) || checksum (4 bytes)).
//!
//! - `qk_` prefix: hash160 of a single Ed25519 public key.
//! - `qs_` prefix: hash160 of a redeem script.
//!
//! Checksum: first 4 bytes of sha256d(prefix || hash160).
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (avoids ambiguous chars).
//! The encoded body is always 39 characters.

use quill_types::{Address, AddressKind, PublicKey};

/// Base32 alphabet (32 chars, avoids visually ambiguous 0/O, 2/Z, l/I, v).
const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const HASH_LEN: usize = 20;
const CHECKSUM_LEN: usize = 4;
const PAYLOAD_LEN: usize = HASH_LEN + CHECKSUM_LEN;
/// 192 payload bits → ceil(192/5) = 39 characters.
const ENCODED_LEN: usize = 39;

fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let mut result = String::with_capacity(total_bits.div_ceil(5));

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

fn checksum(kind: AddressKind, hash: &[u8; HASH_LEN]) -> [u8; CHECKSUM_LEN] {
    let mut data = Vec::with_capacity(kind.prefix().len() + HASH_LEN);
    data.extend_from_slice(kind.prefix().as_bytes());
    data.extend_from_slice(hash);
    let digest = crate::sha256d(&data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

fn encode_address(kind: AddressKind, hash: &[u8; HASH_LEN]) -> Address {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..HASH_LEN].copy_from_slice(hash);
    payload[HASH_LEN..].copy_from_slice(&checksum(kind, hash));
    let raw = format!("{}{}", kind.prefix(), encode_base32(&payload));
    // Prefix and body are both present by construction.
    Address::new(raw).unwrap_or_else(|_| unreachable!("encoded address always has a prefix"))
}

/// Derive the `qk_` address paying to a single public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    encode_address(AddressKind::KeyHash, &crate::hash160(public_key.as_bytes()))
}

/// Derive the `qs_` address paying to a redeem script.
pub fn script_address(redeem_script: &[u8]) -> Address {
    encode_address(AddressKind::ScriptHash, &crate::hash160(redeem_script))
}

/// Extract the committed hash from an address.
///
/// Returns `None` if the address is malformed, non-canonical, or has a bad checksum.
pub fn decode_address(address: &Address) -> Option<(AddressKind, [u8; HASH_LEN])> {
    let kind = address.kind();
    let body = address.body();
    if body.len() != ENCODED_LEN {
        return None;
    }
    let payload: [u8; PAYLOAD_LEN] = decode_base32_fixed(body)?;
    if encode_base32(&payload) != body {
        return None;
    }

    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&payload[..HASH_LEN]);
    if payload[HASH_LEN..] != checksum(kind, &hash) {
        return None;
    }
    Some((kind, hash))
}

/// Validate that an address is well-formed and its checksum is correct.
pub fn validate_address(address: &Address) -> bool {
    decode_address(address).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derive_and_validate() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("qk_"));
        assert_eq!(addr.as_str().len(), 3 + ENCODED_LEN);
        assert!(validate_address(&addr));
    }

    #[test]
    fn derive_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn decode_returns_key_hash() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        let (kind, hash) = decode_address(&addr).unwrap();
        assert_eq!(kind, AddressKind::KeyHash);
        assert_eq!(hash, crate::hash160(kp.public.as_bytes()));
    }

    #[test]
    fn script_address_has_script_prefix() {
        let addr = script_address(b"redeem");
        assert_eq!(addr.kind(), AddressKind::ScriptHash);
        assert!(validate_address(&addr));
    }

    #[test]
    fn prefix_swap_breaks_checksum() {
        let addr = script_address(b"redeem");
        let swapped = Address::new(format!("qk_{}", addr.body())).unwrap();
        assert!(!validate_address(&swapped));
    }

    #[test]
    fn invalid_checksum_rejected() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        let mut bad = addr.as_str().to_string();
        let first_body = bad.as_bytes()[3];
        let replacement = if first_body == b'1' { "3" } else { "1" };
        bad.replace_range(3..4, replacement);
        assert!(!validate_address(&Address::new(bad).unwrap()));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(!validate_address(&Address::new("qk_tooshort").unwrap()));
    }

    #[test]
    fn base32_encode_decode_roundtrip() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        let encoded = encode_base32(&data);
        let decoded: [u8; 5] = decode_base32_fixed(&encoded).unwrap();
        assert_eq!(decoded, data);
    }
}
