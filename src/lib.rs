//! Parallel BGZF block codec: batched inflate and deflate operations over
//! the Blocked GZip Format, with every block's work distributed across a
//! scoped thread pool.
//!
//! The public surface is two functions, [`inflate_batch`] and
//! [`deflate_batch`], each following the same shape: a single-threaded
//! planner carves the call into disjoint, independently-codeable
//! descriptors, and a parallel executor runs those descriptors to
//! completion with dynamic work stealing.

pub mod codec;
pub mod constants;
pub mod error;
pub mod framing;
mod executor;
mod plan;
mod result;

pub use codec::{Deflater, Inflater};
pub use constants::{BGZF_BLOCK_SIZE, BGZF_EOF, MAX_BGZF_BLOCK_SIZE};
pub use error::{Error, MalformedReason, Result};
pub use framing::{parse_block, ParseOutcome, ParsedBlock};
pub use result::{DeflateOutcome, DeflatedBlock, InflateOutcome};

use executor::{execute, resolve_thread_count, RawBuffers, RawOut};
use plan::deflate::{plan_deflate, DeflatePlanOptions};
use plan::inflate::{plan_inflate, InflatePlanOptions};

/// Options controlling one [`inflate_batch`] call.
#[derive(Clone, Debug)]
pub struct InflateOptions {
    /// Number of worker threads (0 = auto-detect, per
    /// [`executor::resolve_thread_count`]).
    pub num_threads: usize,
    /// Upper bound on blocks planned in one call.
    pub max_blocks: usize,
    /// When set, a chunk that doesn't fully parse contributes nothing to
    /// this call at all: no partial progress is reported for it.
    pub atomic: bool,
}

impl Default for InflateOptions {
    fn default() -> Self {
        Self { num_threads: 0, max_blocks: constants::DEFAULT_MAX_BLOCKS_PER_BATCH, atomic: false }
    }
}

/// Options controlling one [`deflate_batch`] call.
#[derive(Clone, Debug)]
pub struct DeflateOptions {
    /// Number of worker threads (0 = auto-detect).
    pub num_threads: usize,
    /// Upper bound on blocks planned in one call.
    pub max_blocks: usize,
}

impl Default for DeflateOptions {
    fn default() -> Self {
        Self { num_threads: 0, max_blocks: constants::DEFAULT_MAX_BLOCKS_PER_BATCH }
    }
}

/// Inflate as many BGZF blocks out of `chunks` as fit in `output`, in
/// parallel.
///
/// `chunks` are independent cursors (§3): a block split across the boundary
/// between two chunks is not reassembled, and is instead reported as an
/// unconsumed tail on the chunk where it starts. `output` receives inflated
/// bytes contiguously from its start, in the order blocks are discovered
/// scanning `chunks` left to right.
pub fn inflate_batch<'a>(
    chunks: &[&'a [u8]],
    output: &mut [u8],
    opts: &InflateOptions,
) -> Result<InflateOutcome<'a>> {
    let plan_opts = InflatePlanOptions { max_blocks: opts.max_blocks, atomic: opts.atomic };
    let plan = plan_inflate(chunks, output.len(), &plan_opts)?;

    if plan.descriptors.is_empty() {
        log::debug!("inflate_batch: empty plan, nothing to execute");
        return Ok(InflateOutcome {
            bytes_written: 0,
            tails: plan.chunk_tails,
            consumed: plan.chunk_consumed,
            block_sizes: Vec::new(),
            chunk_block_counts: plan.chunk_block_counts,
        });
    }

    let threads = resolve_thread_count(opts.num_threads);
    let descriptors = &plan.descriptors;
    let raw = RawOut::new(output);

    let results = execute(
        descriptors.len(),
        threads,
        Inflater::new,
        |inflater, index| {
            let d = &descriptors[index];
            // Safe: each index is claimed by exactly one worker, and the
            // planner guarantees descriptor output ranges are disjoint.
            let window = unsafe { raw.window(d.out_offset, d.out_len()) };
            inflater.inflate(d.payload, d.crc, d.inflated_size, window)
        },
    )?;

    let mut bytes_written = 0usize;
    for (d, r) in plan.descriptors.iter().zip(results.iter()) {
        match r {
            Ok(n) => bytes_written = bytes_written.max(d.out_offset + n),
            Err(_) => {}
        }
    }
    for (index, r) in results.iter().enumerate() {
        if let Err(e) = r {
            log::warn!("inflate_batch: descriptor {index} failed: {e:?}");
            return Err(*e);
        }
    }
    let block_sizes: Vec<usize> = results.into_iter().map(|r| r.unwrap()).collect();

    log::debug!("inflate_batch: wrote {bytes_written} bytes across {} blocks", plan.descriptors.len());

    Ok(InflateOutcome {
        bytes_written,
        tails: plan.chunk_tails,
        consumed: plan.chunk_consumed,
        block_sizes,
        chunk_block_counts: plan.chunk_block_counts,
    })
}

/// Deflate `input` into as many BGZF blocks as fit across `output_buffers`,
/// in parallel.
///
/// Each output buffer receives exactly one block and must be at least
/// [`MAX_BGZF_BLOCK_SIZE`] bytes. When `input` has more `BGZF_BLOCK_SIZE`
/// windows than there are output buffers, only the leading windows are
/// deflated; [`DeflateOutcome::bytes_consumed`] reports how far the call
/// got, so a follow-up call with `input[bytes_consumed..]` and fresh buffers
/// resumes.
pub fn deflate_batch(
    input: &[u8],
    output_buffers: &mut [&mut [u8]],
    opts: &DeflateOptions,
) -> Result<DeflateOutcome> {
    let plan_opts = DeflatePlanOptions { max_blocks: opts.max_blocks };
    let plan = plan_deflate(input, output_buffers.len(), &plan_opts);

    if plan.descriptors.is_empty() {
        log::debug!("deflate_batch: empty plan, nothing to execute");
        return Ok(DeflateOutcome { blocks: Vec::new(), bytes_consumed: 0 });
    }

    let threads = resolve_thread_count(opts.num_threads);
    let descriptors = &plan.descriptors;
    let raw = RawBuffers::new(output_buffers);

    let results = execute(
        descriptors.len(),
        threads,
        Deflater::new,
        |deflater, index| {
            let d = &descriptors[index];
            // Safe: the planner assigns each descriptor a distinct
            // out_buffer_index, so each buffer is claimed at most once.
            let buf = unsafe { raw.buffer(d.out_buffer_index) };
            deflater.deflate(d.input, buf).map(|len| (d.out_buffer_index, len))
        },
    )?;

    let mut blocks = Vec::with_capacity(results.len());
    for (index, r) in results.into_iter().enumerate() {
        let (buffer_index, block_len) = r.map_err(|e| {
            log::warn!("deflate_batch: descriptor {index} failed: {e:?}");
            e
        })?;
        blocks.push(DeflatedBlock { buffer_index, block_len });
    }
    blocks.sort_by_key(|b| b.buffer_index);

    log::debug!(
        "deflate_batch: wrote {} blocks, {} of {} input bytes consumed",
        blocks.len(),
        plan.bytes_consumed,
        input.len()
    );

    Ok(DeflateOutcome { blocks, bytes_consumed: plan.bytes_consumed })
}
