use quill_types::{PublicKey, Script, Signature};

/// The material an input presents to spend an output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnlockProof {
    /// One signature and the key that made it.
    SingleSig {
        signature: Signature,
        public_key: PublicKey,
    },
    /// Signatures in key order followed by the redeem script listing every key.
    Threshold {
        signatures: Vec<Signature>,
        redeem_script: Script,
    },
}

impl UnlockProof {
    pub fn signatures(&self) -> Vec<&Signature> {
        match self {
            Self::SingleSig { signature, .. } => vec![signature],
            Self::Threshold { signatures, .. } => signatures.iter().collect(),
        }
    }
}
