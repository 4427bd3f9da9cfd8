//! Spending policies understood by the spend authorizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the outputs being spent are locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendingPolicy {
    /// One key, one signature.
    SingleSig,
    /// `n` ordered keys form a redeem script; the first `n - 1` keys sign.
    Threshold { n: usize },
}

impl SpendingPolicy {
    /// Number of key pairs the wallet must hold to use this policy.
    pub fn required_keys(&self) -> usize {
        match self {
            Self::SingleSig => 1,
            Self::Threshold { n } => *n,
        }
    }

    /// Number of signatures an input carries under this policy.
    pub fn required_signatures(&self) -> usize {
        match self {
            Self::SingleSig => 1,
            Self::Threshold { n } => n.saturating_sub(1),
        }
    }
}

impl fmt::Display for SpendingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleSig => write!(f, "single-sig"),
            Self::Threshold { n } => write!(f, "threshold({}-of-{n})", n.saturating_sub(1)),
        }
    }
}
