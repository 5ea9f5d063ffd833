//! Result assembly: turning per-descriptor codec outcomes back into the
//! shapes [`crate::inflate_batch`] and [`crate::deflate_batch`] hand back to
//! callers (§4.5).

/// The outcome of one [`crate::inflate_batch`] call.
pub struct InflateOutcome<'a> {
    /// Total inflated bytes written into the caller's output region,
    /// contiguous from its start.
    pub bytes_written: usize,
    /// Per-input-chunk unconsumed tail, in the same order as the input
    /// chunks. Empty when a chunk was fully consumed.
    pub tails: Vec<&'a [u8]>,
    /// Per-input-chunk count of bytes consumed.
    pub consumed: Vec<usize>,
    /// Per-block inflated size, in the order blocks were planned (left to
    /// right across chunks).
    pub block_sizes: Vec<usize>,
    /// Per-input-chunk count of blocks planned from it, same order as
    /// `tails`/`consumed`.
    pub chunk_block_counts: Vec<usize>,
}

/// One compressed block produced by [`crate::deflate_batch`].
pub struct DeflatedBlock {
    /// Which output buffer this block was written into.
    pub buffer_index: usize,
    /// On-wire length of the block written into that buffer.
    pub block_len: usize,
}

/// The outcome of one [`crate::deflate_batch`] call.
pub struct DeflateOutcome {
    /// Blocks written, in input order.
    pub blocks: Vec<DeflatedBlock>,
    /// How many bytes of the input were consumed. Less than the input's
    /// length when there were more windows than output buffers; a follow-up
    /// call with `input[bytes_consumed..]` and fresh buffers resumes.
    pub bytes_consumed: usize,
}
