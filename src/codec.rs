//! The single-block codec: inflate one block's DEFLATE payload, or deflate
//! one window of input, into a caller-provided output region.
//!
//! This is the only module that calls the external DEFLATE primitive
//! (`libdeflater`) and the CRC-32 primitive (`crc32fast`). Per §4.2, workers
//! hold one [`Inflater`]/[`Deflater`] each and never share it — there is no
//! locking here because there is nothing to lock.

use libdeflater::{CompressionLvl, Compressor, Decompressor};

use crate::error::{DeflateErrorKind, Error, Result};
use crate::framing::emit_block_frame;

/// Per-worker decompressor state, reused across the blocks one worker
/// claims during a batch.
pub struct Inflater {
    inner: Decompressor,
}

impl Inflater {
    pub fn new() -> Self {
        Self { inner: Decompressor::new() }
    }

    /// Inflate one already-parsed block into `out`, verifying its tailer.
    ///
    /// `out` must be exactly `block.inflated_size` bytes — the planner
    /// allocates descriptor output slices to that length.
    pub fn inflate(&mut self, payload: &[u8], expected_crc: u32, expected_isize: u32, out: &mut [u8]) -> Result<usize> {
        debug_assert_eq!(out.len(), expected_isize as usize);

        let written = if expected_isize == 0 {
            0
        } else {
            self.inner
                .deflate_decompress(payload, out)
                .map_err(|_| Error::DeflateError(DeflateErrorKind::Decompress))?
        };

        if written as u32 != expected_isize {
            return Err(Error::SizeMismatch { expected: expected_isize, found: written as u32 });
        }

        let found_crc = crc32fast::hash(&out[..written]);
        if found_crc != expected_crc {
            return Err(Error::CrcMismatch { expected: expected_crc, found: found_crc });
        }

        Ok(written)
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-worker compressor state, reused across the windows one worker claims
/// during a batch.
pub struct Deflater {
    inner: Compressor,
}

impl Deflater {
    pub fn new() -> Self {
        Self { inner: Compressor::new(CompressionLvl::best()) }
    }

    /// Deflate one input window into `out`, writing the full BGZF block
    /// (header, payload, tailer) and returning its on-wire length.
    ///
    /// `out` must have at least `MAX_BGZF_BLOCK_SIZE` bytes available; the
    /// deflate planner only ever hands out buffers of that size.
    pub fn deflate(&mut self, input: &[u8], out: &mut [u8]) -> Result<usize> {
        use crate::constants::{BGZF_HEADER_SIZE, MAX_BGZF_BLOCK_SIZE};

        let payload_budget = MAX_BGZF_BLOCK_SIZE - BGZF_HEADER_SIZE - crate::constants::BGZF_FOOTER_SIZE;
        let payload_area = &mut out[BGZF_HEADER_SIZE..BGZF_HEADER_SIZE + payload_budget];

        let compressed_len = self
            .inner
            .deflate_compress(input, payload_area)
            .map_err(|_| Error::DeflateError(DeflateErrorKind::Compress))?;

        let crc = crc32fast::hash(input);
        emit_block_frame(out, compressed_len, crc, input.len() as u32)
    }
}

impl Default for Deflater {
    fn default() -> Self {
        Self::new()
    }
}
