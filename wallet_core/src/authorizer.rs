//! Spend authorization: signing one input under a spending policy.
//!
//! Every signature covers
//! `sha256d(outpoint || decimal(sequence) || hex(public_key) || outputs)`,
//! with the outpoint and the ordered output list in their canonical byte
//! encoding. Binding the full output list means a signed input cannot be
//! moved into a transaction paying someone else.

use quill_crypto::sha256d;
use quill_script::{ScriptTemplates, UnlockProof};
use quill_types::tx::outputs_bytes;
use quill_types::{OutPoint, PublicKey, SpendingPolicy, TxOut};

use crate::error::WalletError;
use crate::keys::SigningCapability;

/// The digest a key signs to authorize spending `outpoint` into `funded_outputs`.
pub fn spend_digest(
    outpoint: &OutPoint,
    sequence: u32,
    public_key: &PublicKey,
    funded_outputs: &[TxOut],
) -> Result<[u8; 32], WalletError> {
    let mut data = outpoint.canonical_bytes()?;
    data.extend_from_slice(sequence.to_string().as_bytes());
    data.extend_from_slice(public_key.to_hex().as_bytes());
    data.extend_from_slice(&outputs_bytes(funded_outputs)?);
    Ok(sha256d(&data))
}

/// Produce the unlock proof for one input.
///
/// `signers` must hold exactly the keys the policy names, in redeem-script
/// order for the threshold policy. Under the threshold policy every signer
/// except the last signs, each over the digest bound to its own key.
pub fn authorize(
    outpoint: &OutPoint,
    funded_outputs: &[TxOut],
    policy: SpendingPolicy,
    signers: &[&dyn SigningCapability],
    sequence: u32,
    scripts: &dyn ScriptTemplates,
) -> Result<UnlockProof, WalletError> {
    if signers.len() != policy.required_keys() {
        return Err(WalletError::PolicyMismatch {
            expected: policy.required_keys(),
            actual: signers.len(),
        });
    }

    match policy {
        SpendingPolicy::SingleSig => {
            let signer = signers[0];
            let public_key = signer.public_key();
            let digest = spend_digest(outpoint, sequence, &public_key, funded_outputs)?;
            Ok(UnlockProof::SingleSig {
                signature: signer.sign(&digest),
                public_key,
            })
        }
        SpendingPolicy::Threshold { .. } => {
            let keys: Vec<PublicKey> = signers.iter().map(|s| s.public_key()).collect();
            let redeem_script = scripts.redeem_script(&keys)?;

            let signatures = signers
                .iter()
                .zip(&keys)
                .take(policy.required_signatures())
                .map(|(signer, key)| {
                    let digest = spend_digest(outpoint, sequence, key, funded_outputs)?;
                    Ok(signer.sign(&digest))
                })
                .collect::<Result<Vec<_>, WalletError>>()?;

            Ok(UnlockProof::Threshold {
                signatures,
                redeem_script,
            })
        }
    }
}
