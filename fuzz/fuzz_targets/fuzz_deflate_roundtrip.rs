#![no_main]

use bgzf_pblock::{deflate_batch, inflate_batch, DeflateOptions, InflateOptions, MAX_BGZF_BLOCK_SIZE};
use libfuzzer_sys::fuzz_target;

// Any byte string, deflated into BGZF blocks and inflated back, must
// round-trip exactly (§8).
fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 { &data[..256 * 1024] } else { data };

    let windows = data.len().div_ceil(bgzf_pblock::BGZF_BLOCK_SIZE).max(1);
    let mut bufs: Vec<Vec<u8>> = (0..windows).map(|_| vec![0u8; MAX_BGZF_BLOCK_SIZE]).collect();
    let mut refs: Vec<&mut [u8]> = bufs.iter_mut().map(|b| b.as_mut_slice()).collect();

    let deflated = deflate_batch(data, &mut refs, &DeflateOptions::default()).expect("deflate never fails here");
    assert_eq!(deflated.bytes_consumed, data.len());

    let mut stream = Vec::new();
    for block in &deflated.blocks {
        stream.extend_from_slice(&refs[block.buffer_index][..block.block_len]);
    }

    let chunks: Vec<&[u8]> = vec![&stream];
    let mut output = vec![0u8; data.len()];
    let inflated = inflate_batch(&chunks, &mut output, &InflateOptions::default()).expect("inflate never fails here");

    assert_eq!(inflated.bytes_written, data.len());
    assert_eq!(output, data);
});
