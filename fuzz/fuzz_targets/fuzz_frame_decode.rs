#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Length prefix + body must never panic, whatever the prefix claims.
    if let Ok((msg, consumed)) = quill_protocol::decode_frame(data) {
        assert!(consumed <= data.len());
        // A decoded message re-encodes to a frame that decodes to itself.
        let frame = quill_protocol::encode_frame(&msg).expect("decoded message re-encodes");
        let (again, _) = quill_protocol::decode_frame(&frame).expect("re-encoded frame decodes");
        assert_eq!(again, msg);
    }
});
