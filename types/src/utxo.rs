//! Unspent outputs as reported by a full node.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Address, OutPoint};

/// A spendable output known to the remote ledger.
///
/// The wallet observes these and never mutates them. Ordering is by
/// `(value, height)` with the outpoint as tie-breaker, so sorting a candidate
/// set is total and deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnspentTxOut {
    pub outpoint: OutPoint,
    pub value: u64,
    /// Height of the block that confirmed the output.
    pub height: u64,
    /// Address the output is locked to.
    pub address: Address,
    pub is_coinbase: bool,
}

impl Ord for UnspentTxOut {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.height.cmp(&other.height))
            .then_with(|| self.outpoint.cmp(&other.outpoint))
            .then_with(|| self.address.cmp(&other.address))
            .then_with(|| self.is_coinbase.cmp(&other.is_coinbase))
    }
}

impl PartialOrd for UnspentTxOut {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxHash;

    fn utxo(value: u64, height: u64, tag: u8) -> UnspentTxOut {
        UnspentTxOut {
            outpoint: OutPoint::new(TxHash::new([tag; 32]), 0),
            value,
            height,
            address: Address::new("qk_owner").unwrap(),
            is_coinbase: false,
        }
    }

    #[test]
    fn orders_by_value_then_height() {
        let mut v = vec![utxo(10, 1, 1), utxo(5, 9, 2), utxo(5, 3, 3)];
        v.sort();
        let keys: Vec<(u64, u64)> = v.iter().map(|u| (u.value, u.height)).collect();
        assert_eq!(keys, vec![(5, 3), (5, 9), (10, 1)]);
    }

    #[test]
    fn ties_broken_by_outpoint() {
        let mut v = vec![utxo(5, 1, 9), utxo(5, 1, 2)];
        v.sort();
        assert_eq!(v[0].outpoint.txid, TxHash::new([2; 32]));
    }
}
