//! Transaction assembly: coin selection, outputs, then one proof per input.

use quill_script::ScriptTemplates;
use quill_types::params::DEFAULT_SEQUENCE;
use quill_types::{Address, SpendingPolicy, Transaction, TxIn, TxOut, UnspentTxOut};

use crate::authorizer::authorize;
use crate::coin_selection::select;
use crate::error::WalletError;
use crate::keys::SigningCapability;

/// Everything needed to build one spend, except the candidate outputs.
pub struct SpendPlan<'a> {
    pub policy: SpendingPolicy,
    /// Keys named by the policy, in redeem-script order.
    pub signers: Vec<&'a dyn SigningCapability>,
    /// Address whose outputs fund the spend and which receives the change.
    pub funding_address: Address,
    pub destination: Address,
    pub value: u64,
    pub fee: u64,
}

/// Build a fully authorized transaction from the funding address's outputs.
///
/// Candidates locked to any other address are skipped. The output list is
/// fixed before the first input is signed, so every proof binds to the same
/// final outputs. A zero change output is omitted.
pub fn build_transaction(
    plan: &SpendPlan<'_>,
    candidates: &[UnspentTxOut],
    scripts: &dyn ScriptTemplates,
) -> Result<Transaction, WalletError> {
    if plan.signers.len() != plan.policy.required_keys() {
        return Err(WalletError::PolicyMismatch {
            expected: plan.policy.required_keys(),
            actual: plan.signers.len(),
        });
    }

    let owned: Vec<UnspentTxOut> = candidates
        .iter()
        .filter(|u| u.address == plan.funding_address)
        .cloned()
        .collect();
    if owned.len() != candidates.len() {
        tracing::warn!(
            skipped = candidates.len() - owned.len(),
            address = %plan.funding_address,
            "ignoring outputs not locked to the funding address"
        );
    }

    let selection = select(&owned, plan.value, plan.fee).inspect_err(|_| {
        tracing::warn!(value = plan.value, fee = plan.fee, "value to send is larger than balance");
    })?;

    let mut outputs = vec![TxOut {
        value: plan.value,
        locking_script: scripts.locking_script_for(&plan.destination)?,
    }];
    if selection.change > 0 {
        outputs.push(TxOut {
            value: selection.change,
            locking_script: scripts.locking_script_for(&plan.funding_address)?,
        });
    }

    let inputs = selection
        .selected
        .iter()
        .map(|utxo| {
            let proof = authorize(
                &utxo.outpoint,
                &outputs,
                plan.policy,
                &plan.signers,
                DEFAULT_SEQUENCE,
                scripts,
            )?;
            Ok(TxIn {
                to_spend: utxo.outpoint,
                signature_script: scripts.unlocking_script_for(&proof)?,
                sequence: DEFAULT_SEQUENCE,
            })
        })
        .collect::<Result<Vec<_>, WalletError>>()?;

    tracing::debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        change = selection.change,
        policy = %plan.policy,
        "built transaction"
    );
    Ok(Transaction::new(inputs, outputs))
}
