#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Unframed bodies: unknown tags and mismatched payloads are errors, never panics.
    if let Ok(msg) = quill_protocol::decode_message(data) {
        assert!(msg.validate().is_ok());
    }

    // The wire types on their own.
    let _ = bincode::deserialize::<quill_types::Transaction>(data);
    let _ = bincode::deserialize::<quill_types::UnspentTxOut>(data);
    let _ = bincode::deserialize::<quill_types::Peer>(data);
});
