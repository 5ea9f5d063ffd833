#![no_main]

use bgzf_pblock::parse_block;
use libfuzzer_sys::fuzz_target;

// Block framing is a pure function over an untrusted byte slice; it must
// never panic, regardless of what garbage it's handed.
fuzz_target!(|data: &[u8]| {
    let _ = parse_block(data);
});
