use proptest::prelude::*;
use quill_crypto::keypair_from_seed;
use quill_script::{parse_unlocking_script, ScriptTemplates, StandardScripts, UnlockProof};
use quill_types::Signature;

proptest! {
    #[test]
    fn threshold_unlocking_scripts_parse_back(n in 2usize..=16, seed in any::<u8>(), sig_byte in any::<u8>()) {
        let keys: Vec<_> = (0..n)
            .map(|i| keypair_from_seed(&[seed.wrapping_add(i as u8); 32]).public)
            .collect();
        let redeem_script = StandardScripts.redeem_script(&keys).unwrap();
        let proof = UnlockProof::Threshold {
            signatures: (0..n - 1).map(|i| Signature([sig_byte ^ i as u8; 64])).collect(),
            redeem_script,
        };
        let script = StandardScripts.unlocking_script_for(&proof).unwrap();
        prop_assert_eq!(parse_unlocking_script(&script).unwrap(), proof);
    }

    #[test]
    fn parser_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse_unlocking_script(&quill_types::Script::new(bytes));
    }
}
