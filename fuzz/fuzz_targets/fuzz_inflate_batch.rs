#![no_main]

use bgzf_pblock::{inflate_batch, InflateOptions};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes treated as a single BGZF source chunk. The planner must
// reject malformed headers cleanly and never admit more output than the
// destination region can hold; the executor must never panic on attacker
// -controlled block contents (truncated, oversized, or CRC-corrupt).
fuzz_target!(|data: &[u8]| {
    let chunks: Vec<&[u8]> = vec![data];
    let mut output = vec![0u8; 1 << 20];
    let opts = InflateOptions::default();
    let _ = inflate_batch(&chunks, &mut output, &opts);
});
