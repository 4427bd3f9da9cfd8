use proptest::prelude::*;

use quill_types::{Address, OutPoint, TxHash, UnspentTxOut};
use quill_wallet_core::{select, WalletError};

fn arb_candidates() -> impl Strategy<Value = Vec<UnspentTxOut>> {
    prop::collection::vec((1u64..1_000_000, 0u64..10_000, any::<[u8; 32]>()), 0..40).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(value, height, txid)| UnspentTxOut {
                    outpoint: OutPoint::new(TxHash::new(txid), 0),
                    value,
                    height,
                    address: Address::new("qk_owner").unwrap(),
                    is_coinbase: false,
                })
                .collect()
        },
    )
}

proptest! {
    /// Selected value always equals value + fee + change.
    #[test]
    fn selection_balances(candidates in arb_candidates(), value in 0u64..5_000_000, fee in 0u64..1000) {
        if let Ok(sel) = select(&candidates, value, fee) {
            prop_assert_eq!(sel.total(), value as u128 + fee as u128 + sel.change as u128);
        }
    }

    /// The selection is a prefix of the sorted candidates, and dropping its
    /// last input would leave the target uncovered.
    #[test]
    fn selection_is_minimal_sorted_prefix(candidates in arb_candidates(), value in 0u64..5_000_000, fee in 0u64..1000) {
        if let Ok(sel) = select(&candidates, value, fee) {
            let mut sorted = candidates.clone();
            sorted.sort();
            prop_assert_eq!(&sel.selected[..], &sorted[..sel.selected.len()]);

            let target = value as u128 + fee as u128;
            if let Some(last) = sel.selected.last() {
                prop_assert!(sel.total() - (last.value as u128) < target || target == 0);
            }
        }
    }

    /// Failure happens exactly when the candidates cannot cover the target.
    #[test]
    fn insufficient_iff_total_short(candidates in arb_candidates(), value in 0u64..5_000_000, fee in 0u64..1000) {
        let total: u64 = candidates.iter().map(|u| u.value).sum();
        match select(&candidates, value, fee) {
            Err(WalletError::InsufficientFunds { needed, available }) => {
                prop_assert!(total < value + fee);
                prop_assert_eq!(needed, value + fee);
                prop_assert_eq!(available, total);
            }
            Err(e) => prop_assert!(false, "unexpected error {e}"),
            Ok(_) => prop_assert!(total >= value + fee),
        }
    }

    /// Repeating candidates never lets an outpoint be selected twice.
    #[test]
    fn repeated_candidates_select_each_outpoint_once(candidates in arb_candidates(), value in 0u64..5_000_000, fee in 0u64..1000) {
        let doubled: Vec<UnspentTxOut> = candidates.iter().chain(candidates.iter()).cloned().collect();
        let once = select(&candidates, value, fee);
        let twice = select(&doubled, value, fee);
        match (once, twice) {
            (Ok(a), Ok(b)) => {
                let mut outpoints: Vec<OutPoint> = b.selected.iter().map(|u| u.outpoint).collect();
                outpoints.sort();
                outpoints.dedup();
                prop_assert_eq!(outpoints.len(), b.selected.len());
                prop_assert_eq!(a, b);
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "doubling candidates changed the outcome: {a:?} vs {b:?}"),
        }
    }
}
