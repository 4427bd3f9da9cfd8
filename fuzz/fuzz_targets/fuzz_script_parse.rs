#![no_main]

use libfuzzer_sys::fuzz_target;

use quill_types::Script;

fuzz_target!(|data: &[u8]| {
    let script = Script::new(data.to_vec());
    let _ = quill_script::parse_redeem_script(&script);
    let _ = quill_script::parse_unlocking_script(&script);
});
