//! Inflate-side batch planning (§4.3, "Batch planner — inflate").

use crate::constants::DEFAULT_MAX_BLOCKS_PER_BATCH;
use crate::error::Result;
use crate::framing::{parse_block, ParseOutcome};

/// Tunables for [`plan_inflate`].
#[derive(Debug, Clone, Copy)]
pub struct InflatePlanOptions {
    /// Upper bound on descriptors planned in one call. A tuning parameter,
    /// not a hard architectural limit (§9).
    pub max_blocks: usize,
    /// When set, a chunk that cannot be fully consumed contributes nothing
    /// to this plan at all (§4.3 step 3).
    pub atomic: bool,
}

impl Default for InflatePlanOptions {
    fn default() -> Self {
        Self { max_blocks: DEFAULT_MAX_BLOCKS_PER_BATCH, atomic: false }
    }
}

/// One planned inflate descriptor: a parsed block's payload and its claim on
/// the destination region.
#[derive(Debug)]
pub struct InflateDescriptor<'a> {
    pub payload: &'a [u8],
    pub crc: u32,
    pub inflated_size: u32,
    pub out_offset: usize,
    pub chunk_index: usize,
}

impl InflateDescriptor<'_> {
    pub fn out_len(&self) -> usize {
        self.inflated_size as usize
    }
}

/// The result of planning: descriptors in destination order, plus, per
/// source chunk, how many bytes were consumed and what tail (if any) is
/// left over.
pub struct InflatePlan<'a> {
    pub descriptors: Vec<InflateDescriptor<'a>>,
    pub chunk_consumed: Vec<usize>,
    pub chunk_tails: Vec<&'a [u8]>,
    pub chunk_block_counts: Vec<usize>,
    pub total_out_len: usize,
}

/// Scan `chunks` in order, planning as many blocks as fit in `avail_out`
/// bytes of destination space and `opts.max_blocks` descriptors.
///
/// Each chunk is an independent cursor (§3): a block that doesn't fully fit
/// in one chunk never reaches across into the next. `MalformedHeader` aborts
/// the whole call immediately; `NeedMoreBytes` and output exhaustion are
/// internal signals that only shape the returned tails, never an `Err`.
pub fn plan_inflate<'a>(
    chunks: &[&'a [u8]],
    avail_out: usize,
    opts: &InflatePlanOptions,
) -> Result<InflatePlan<'a>> {
    let mut descriptors = Vec::new();
    let mut chunk_consumed = vec![0usize; chunks.len()];
    let mut chunk_tails: Vec<&'a [u8]> = chunks.to_vec();
    let mut out_used = 0usize;

    for (chunk_index, chunk) in chunks.iter().enumerate() {
        let chunk_start = descriptors.len();
        let chunk_out_start = out_used;
        let mut pos = 0usize;

        loop {
            if descriptors.len() >= opts.max_blocks {
                break; // BatchFull: stop planning this chunk (and, in effect, any later one)
            }
            if pos >= chunk.len() {
                break; // chunk fully consumed
            }

            match parse_block(&chunk[pos..]) {
                ParseOutcome::Block(block) => {
                    let out_len = block.inflated_size as usize;
                    if out_used + out_len > avail_out {
                        break; // OutputTooSmall: nothing more fits in this batch
                    }
                    descriptors.push(InflateDescriptor {
                        payload: block.payload,
                        crc: block.crc,
                        inflated_size: block.inflated_size,
                        out_offset: out_used,
                        chunk_index,
                    });
                    out_used += out_len;
                    pos += block.block_len;
                }
                ParseOutcome::NeedMoreBytes => break,
                ParseOutcome::Malformed(reason) => {
                    return Err(crate::error::Error::MalformedHeader(reason));
                }
            }
        }

        if opts.atomic && pos < chunk.len() {
            descriptors.truncate(chunk_start);
            out_used = chunk_out_start;
            chunk_consumed[chunk_index] = 0;
            chunk_tails[chunk_index] = chunk;
        } else {
            chunk_consumed[chunk_index] = pos;
            chunk_tails[chunk_index] = &chunk[pos..];
        }
    }

    let mut chunk_block_counts = vec![0usize; chunks.len()];
    for d in &descriptors {
        chunk_block_counts[d.chunk_index] += 1;
    }

    log::debug!(
        "inflate plan: {} descriptors across {} chunks, {} bytes admitted",
        descriptors.len(),
        chunks.len(),
        out_used
    );

    Ok(InflatePlan { descriptors, chunk_consumed, chunk_tails, chunk_block_counts, total_out_len: out_used })
}
