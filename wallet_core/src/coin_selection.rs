//! Coin selection: smallest, oldest outputs first.
//!
//! Candidates are sorted ascending by `(value, height)` (outpoint breaks
//! ties) and accumulated until the running sum reaches `value + fee`. There
//! is no backtracking, so the selection may overshoot by more than a tighter
//! subset would; the overshoot becomes change.

use std::collections::HashSet;

use quill_types::UnspentTxOut;

use crate::error::WalletError;

/// Inputs chosen to fund a spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Selected outputs in spend order.
    pub selected: Vec<UnspentTxOut>,
    /// `sum(selected) - value - fee`.
    pub change: u64,
}

impl Selection {
    pub fn total(&self) -> u128 {
        self.selected.iter().map(|u| u.value as u128).sum()
    }
}

/// Pick a prefix of the sorted candidates covering `value + fee`.
///
/// Candidates form a set keyed by outpoint: a repeated outpoint counts once.
/// Fails with `InsufficientFunds` before looking at any ordering when the
/// distinct candidates together cannot cover the target.
pub fn select(available: &[UnspentTxOut], value: u64, fee: u64) -> Result<Selection, WalletError> {
    let mut seen = HashSet::with_capacity(available.len());
    let mut sorted: Vec<UnspentTxOut> = available
        .iter()
        .filter(|u| seen.insert(u.outpoint))
        .cloned()
        .collect();
    if sorted.len() != available.len() {
        tracing::warn!(
            duplicates = available.len() - sorted.len(),
            "ignoring repeated outpoints among candidates"
        );
    }

    let total: u128 = sorted.iter().map(|u| u.value as u128).sum();
    let target = value as u128 + fee as u128;
    if total < target {
        return Err(WalletError::InsufficientFunds {
            needed: u64::try_from(target).unwrap_or(u64::MAX),
            available: u64::try_from(total).unwrap_or(u64::MAX),
        });
    }

    sorted.sort();

    let mut selected = Vec::new();
    let mut running: u128 = 0;
    for utxo in sorted {
        running += utxo.value as u128;
        selected.push(utxo);
        if running >= target {
            break;
        }
    }

    // The last input alone bridged the gap, so change is below its value
    // and fits in a u64.
    let change = (running - target) as u64;
    Ok(Selection { selected, change })
}
