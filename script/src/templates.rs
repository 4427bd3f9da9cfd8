//! Standard script templates.

use quill_crypto::{decode_address, script_address};
use quill_types::{Address, AddressKind, PublicKey, Script};

use crate::opcodes::{self, push_data};
use crate::{ScriptError, UnlockProof};

/// Most keys a threshold redeem script can list (bounded by `OP_16`).
pub const MAX_REDEEM_KEYS: usize = 16;

/// Script-template capability consumed by the transaction builder.
pub trait ScriptTemplates: Send + Sync {
    /// Script locking an output to `address`.
    fn locking_script_for(&self, address: &Address) -> Result<Script, ScriptError>;

    /// Redeem script for an ordered key list under the threshold policy.
    fn redeem_script(&self, keys: &[PublicKey]) -> Result<Script, ScriptError>;

    /// Script presenting `proof` in an input.
    fn unlocking_script_for(&self, proof: &UnlockProof) -> Result<Script, ScriptError>;

    /// Script-hash address committing to the redeem script of `keys`.
    fn address_from_keys(&self, keys: &[PublicKey]) -> Result<Address, ScriptError> {
        let redeem = self.redeem_script(keys)?;
        Ok(script_address(redeem.as_bytes()))
    }
}

/// The templates every quill node understands.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardScripts;

impl ScriptTemplates for StandardScripts {
    fn locking_script_for(&self, address: &Address) -> Result<Script, ScriptError> {
        let (kind, hash) = decode_address(address)
            .ok_or_else(|| ScriptError::InvalidAddress(address.to_string()))?;

        let mut script = Vec::with_capacity(25);
        match kind {
            AddressKind::KeyHash => {
                script.push(opcodes::OP_DUP);
                script.push(opcodes::OP_HASH160);
                push_data(&mut script, &hash);
                script.push(opcodes::OP_EQUALVERIFY);
                script.push(opcodes::OP_CHECKSIG);
            }
            AddressKind::ScriptHash => {
                script.push(opcodes::OP_HASH160);
                push_data(&mut script, &hash);
                script.push(opcodes::OP_EQUAL);
            }
        }
        Ok(Script::new(script))
    }

    fn redeem_script(&self, keys: &[PublicKey]) -> Result<Script, ScriptError> {
        let n = keys.len();
        let invalid = ScriptError::InvalidKeyCount {
            got: n,
            max: MAX_REDEEM_KEYS,
        };
        if n < 2 {
            return Err(invalid);
        }
        let (Some(m_op), Some(n_op)) = (opcodes::small_int(n - 1), opcodes::small_int(n)) else {
            return Err(invalid);
        };

        let mut script = Vec::with_capacity(3 + n * 33);
        script.push(m_op);
        for key in keys {
            push_data(&mut script, key.as_bytes());
        }
        script.push(n_op);
        script.push(opcodes::OP_CHECKMULTISIG);
        Ok(Script::new(script))
    }

    fn unlocking_script_for(&self, proof: &UnlockProof) -> Result<Script, ScriptError> {
        let mut script = Vec::new();
        match proof {
            UnlockProof::SingleSig {
                signature,
                public_key,
            } => {
                push_data(&mut script, signature.as_bytes());
                push_data(&mut script, public_key.as_bytes());
            }
            UnlockProof::Threshold {
                signatures,
                redeem_script,
            } => {
                let keys = crate::parse_redeem_script(redeem_script)?;
                let expected = keys.len() - 1;
                if signatures.len() != expected {
                    return Err(ScriptError::SignatureCount {
                        got: signatures.len(),
                        expected,
                    });
                }
                // Leading OP_0 marks the threshold form.
                script.push(opcodes::OP_0);
                for sig in signatures {
                    push_data(&mut script, sig.as_bytes());
                }
                push_data(&mut script, redeem_script.as_bytes());
            }
        }
        Ok(Script::new(script))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_crypto::{derive_address, hash160, keypair_from_seed};
    use quill_types::Signature;

    fn keys(n: u8) -> Vec<PublicKey> {
        (0..n).map(|i| keypair_from_seed(&[i + 1; 32]).public).collect()
    }

    #[test]
    fn key_hash_locking_script_layout() {
        let pk = keys(1).remove(0);
        let script = StandardScripts
            .locking_script_for(&derive_address(&pk))
            .unwrap();
        let bytes = script.as_bytes();
        assert_eq!(bytes.len(), 25);
        assert_eq!(&bytes[..3], &[opcodes::OP_DUP, opcodes::OP_HASH160, 20]);
        assert_eq!(&bytes[3..23], &hash160(pk.as_bytes()));
        assert_eq!(&bytes[23..], &[opcodes::OP_EQUALVERIFY, opcodes::OP_CHECKSIG]);
    }

    #[test]
    fn script_hash_locking_script_commits_to_redeem_script() {
        let ks = keys(3);
        let redeem = StandardScripts.redeem_script(&ks).unwrap();
        let addr = StandardScripts.address_from_keys(&ks).unwrap();
        assert_eq!(addr.kind(), AddressKind::ScriptHash);

        let script = StandardScripts.locking_script_for(&addr).unwrap();
        let bytes = script.as_bytes();
        assert_eq!(bytes.len(), 23);
        assert_eq!(&bytes[2..22], &hash160(redeem.as_bytes()));
        assert_eq!(bytes[22], opcodes::OP_EQUAL);
    }

    #[test]
    fn locking_script_rejects_bad_address() {
        let addr = Address::new("qk_notreallyanaddress").unwrap();
        assert!(matches!(
            StandardScripts.locking_script_for(&addr),
            Err(ScriptError::InvalidAddress(_))
        ));
    }

    #[test]
    fn redeem_script_frames_keys_with_counts() {
        let script = StandardScripts.redeem_script(&keys(3)).unwrap();
        let bytes = script.as_bytes();
        assert_eq!(bytes[0], opcodes::OP_1 + 1);
        assert_eq!(bytes[bytes.len() - 2], opcodes::OP_1 + 2);
        assert_eq!(bytes[bytes.len() - 1], opcodes::OP_CHECKMULTISIG);
        assert_eq!(bytes.len(), 3 + 3 * 33);
    }

    #[test]
    fn redeem_script_bounds_key_count() {
        assert!(StandardScripts.redeem_script(&keys(1)).is_err());
        assert!(StandardScripts.redeem_script(&keys(17)).is_err());
        assert!(StandardScripts.redeem_script(&keys(16)).is_ok());
    }

    #[test]
    fn address_from_keys_depends_on_order() {
        let mut ks = keys(3);
        let a = StandardScripts.address_from_keys(&ks).unwrap();
        ks.swap(0, 1);
        let b = StandardScripts.address_from_keys(&ks).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn threshold_unlock_checks_signature_count() {
        let redeem_script = StandardScripts.redeem_script(&keys(3)).unwrap();
        let proof = UnlockProof::Threshold {
            signatures: vec![Signature([1; 64])],
            redeem_script,
        };
        assert!(matches!(
            StandardScripts.unlocking_script_for(&proof),
            Err(ScriptError::SignatureCount {
                got: 1,
                expected: 2
            })
        ));
    }
}
