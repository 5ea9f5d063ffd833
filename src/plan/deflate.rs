//! Deflate-side batch planning (§4.3, "Batch planner — deflate").

use crate::constants::{BGZF_BLOCK_SIZE, DEFAULT_MAX_BLOCKS_PER_BATCH};

/// Tunables for [`plan_deflate`].
#[derive(Debug, Clone, Copy)]
pub struct DeflatePlanOptions {
    /// Upper bound on descriptors planned in one call.
    pub max_blocks: usize,
}

impl Default for DeflatePlanOptions {
    fn default() -> Self {
        Self { max_blocks: DEFAULT_MAX_BLOCKS_PER_BATCH }
    }
}

/// One planned deflate window: a slice of the input to compress into one
/// caller-provided output buffer.
#[derive(Debug)]
pub struct DeflateDescriptor<'a> {
    pub input: &'a [u8],
    /// Index into the caller's slice of output buffers.
    pub out_buffer_index: usize,
}

/// The result of planning: windows in input order, plus how many input
/// bytes they account for in total (§9, resumable calls).
pub struct DeflatePlan<'a> {
    pub descriptors: Vec<DeflateDescriptor<'a>>,
    pub bytes_consumed: usize,
}

/// Split `len` bytes into `BGZF_BLOCK_SIZE`-sized windows, without ever
/// subtracting past zero (§9's resolution of the rounding open question).
///
/// An empty input still produces exactly one (empty) window, so that
/// deflating zero bytes still yields one BGZF block (§8 scenario 1).
fn compute_windows(len: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return vec![(0, 0)];
    }
    let full_windows = len / BGZF_BLOCK_SIZE;
    let remainder = len - full_windows * BGZF_BLOCK_SIZE;

    let mut windows = Vec::with_capacity(full_windows + usize::from(remainder > 0));
    for i in 0..full_windows {
        windows.push((i * BGZF_BLOCK_SIZE, BGZF_BLOCK_SIZE));
    }
    if remainder > 0 {
        windows.push((full_windows * BGZF_BLOCK_SIZE, remainder));
    }
    windows
}

/// Plan as many `BGZF_BLOCK_SIZE`-sized windows of `input` as fit within
/// `num_out_buffers` destination buffers and `opts.max_blocks` descriptors.
///
/// When there are more windows than output buffers, only the leading windows
/// are planned; `bytes_consumed` tells the caller how much of `input` they
/// account for, so a second call with the remainder and fresh buffers picks
/// up where this one left off.
pub fn plan_deflate<'a>(
    input: &'a [u8],
    num_out_buffers: usize,
    opts: &DeflatePlanOptions,
) -> DeflatePlan<'a> {
    let windows = compute_windows(input.len());
    let cap = windows.len().min(num_out_buffers).min(opts.max_blocks);

    let mut descriptors = Vec::with_capacity(cap);
    let mut bytes_consumed = 0usize;
    for (out_buffer_index, &(offset, len)) in windows.iter().take(cap).enumerate() {
        descriptors.push(DeflateDescriptor { input: &input[offset..offset + len], out_buffer_index });
        bytes_consumed = offset + len;
    }

    log::debug!(
        "deflate plan: {} of {} windows admitted, {} bytes consumed",
        descriptors.len(),
        windows.len(),
        bytes_consumed
    );

    DeflatePlan { descriptors, bytes_consumed }
}
