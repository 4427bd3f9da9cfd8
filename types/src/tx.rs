//! Transactions, inputs and outputs.
//!
//! Input and output order is part of a transaction's identity and of every
//! spend digest; nothing in the workspace reorders them after construction.

use serde::{Deserialize, Serialize};

use crate::{OutPoint, QuillError, Script};

/// A spend of one previously created output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// The output being spent.
    pub to_spend: OutPoint,
    /// Signature(s) plus public key or redeem script, encoded by `quill-script`.
    pub signature_script: Script,
    pub sequence: u32,
}

/// A newly created output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: u64,
    pub locking_script: Script,
}

/// An ordered list of inputs and outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

impl Transaction {
    pub fn new(inputs: Vec<TxIn>, outputs: Vec<TxOut>) -> Self {
        Self { inputs, outputs }
    }

    /// Sum of all output values, `None` on overflow.
    pub fn output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    /// Canonical byte encoding used for the transaction id.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, QuillError> {
        bincode::serialize(self).map_err(|e| QuillError::Serialization(e.to_string()))
    }
}

/// Canonical byte encoding of an ordered output list, as bound into spend digests.
pub fn outputs_bytes(outputs: &[TxOut]) -> Result<Vec<u8>, QuillError> {
    bincode::serialize(outputs).map_err(|e| QuillError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxHash;

    fn out(value: u64) -> TxOut {
        TxOut {
            value,
            locking_script: Script::new(vec![1, 2, 3]),
        }
    }

    #[test]
    fn output_value_sums() {
        let tx = Transaction::new(Vec::new(), vec![out(5), out(7)]);
        assert_eq!(tx.output_value(), Some(12));
    }

    #[test]
    fn output_value_detects_overflow() {
        let tx = Transaction::new(Vec::new(), vec![out(u64::MAX), out(1)]);
        assert_eq!(tx.output_value(), None);
    }

    #[test]
    fn canonical_bytes_depend_on_output_order() {
        let a = Transaction::new(Vec::new(), vec![out(1), out(2)]);
        let b = Transaction::new(Vec::new(), vec![out(2), out(1)]);
        assert_ne!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
    }

    #[test]
    fn canonical_bytes_cover_inputs() {
        let input = TxIn {
            to_spend: OutPoint::new(TxHash::new([9; 32]), 0),
            signature_script: Script::default(),
            sequence: 0,
        };
        let with = Transaction::new(vec![input], vec![out(1)]);
        let without = Transaction::new(Vec::new(), vec![out(1)]);
        assert_ne!(
            with.canonical_bytes().unwrap(),
            without.canonical_bytes().unwrap()
        );
    }
}
