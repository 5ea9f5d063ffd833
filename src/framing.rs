//! Pure, allocation-free BGZF block framing: parsing a header out of a byte
//! slice and emitting a header + tailer around an already-deflated payload.
//!
//! Nothing in this module touches the DEFLATE payload itself or performs
//! I/O; see [`crate::codec`] for the single-block codec that calls the
//! external DEFLATE primitive.

use crate::constants::{BGZF_FOOTER_SIZE, BGZF_HEADER_SIZE, FIXED_HEADER_SIZE, MAX_BGZF_BLOCK_SIZE};
use crate::error::{Error, MalformedReason, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const COMPRESSION_METHOD_DEFLATE: u8 = 0x08;
const FEXTRA_FLAG: u8 = 0x04;
const BC_SUBFIELD_ID: [u8; 2] = [b'B', b'C'];

/// Outcome of attempting to parse one block's header out of a byte slice.
///
/// A real enum rather than a sentinel code, per the "variant results over
/// sentinel codes" design note: callers match on this instead of inspecting
/// a magic return value.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseOutcome<'a> {
    /// A complete, well-formed block was found at the start of the slice.
    Block(ParsedBlock<'a>),
    /// The slice holds a well-formed header but not enough bytes for the
    /// declared payload and tailer. Not an error — the planner's signal to
    /// stop and report a tail.
    NeedMoreBytes,
    /// The slice does not hold a valid BGZF block header.
    Malformed(MalformedReason),
}

/// A successfully parsed block: header consumed, payload located, tailer
/// decoded.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedBlock<'a> {
    /// The raw DEFLATE payload (header and tailer stripped).
    pub payload: &'a [u8],
    /// CRC-32 of the inflated payload, from the tailer.
    pub crc: u32,
    /// Inflated size in bytes, from the tailer.
    pub inflated_size: u32,
    /// Total on-wire length of this block (`BSIZE + 1`).
    pub block_len: usize,
}

/// Parse one BGZF block from the start of `buf`.
///
/// `buf` stands in for the "input cursor" of the specification: it is never
/// mutated, so a failed parse (`NeedMoreBytes` or `Malformed`) leaves the
/// caller free to retry with more bytes appended, or to treat the unconsumed
/// prefix as a tail — there is nothing to roll back.
pub fn parse_block(buf: &[u8]) -> ParseOutcome<'_> {
    if buf.len() < FIXED_HEADER_SIZE {
        return ParseOutcome::Malformed(MalformedReason::TruncatedHeader);
    }
    if buf[0] != GZIP_MAGIC[0] || buf[1] != GZIP_MAGIC[1] {
        return ParseOutcome::Malformed(MalformedReason::BadMagic);
    }
    if buf[2] != COMPRESSION_METHOD_DEFLATE {
        return ParseOutcome::Malformed(MalformedReason::BadCompressionMethod);
    }
    if buf[3] & FEXTRA_FLAG == 0 {
        return ParseOutcome::Malformed(MalformedReason::MissingFextra);
    }

    let xlen = u16::from_le_bytes([buf[10], buf[11]]) as usize;
    if buf.len() < FIXED_HEADER_SIZE + xlen {
        return ParseOutcome::Malformed(MalformedReason::ExtraDoesNotClose);
    }
    let extra = &buf[FIXED_HEADER_SIZE..FIXED_HEADER_SIZE + xlen];

    let bsize = match find_bc_subfield(extra) {
        Ok(bsize) => bsize,
        Err(reason) => return ParseOutcome::Malformed(reason),
    };

    let block_len = bsize as usize + 1;
    let header_len = FIXED_HEADER_SIZE + xlen;
    if block_len < header_len + BGZF_FOOTER_SIZE {
        return ParseOutcome::Malformed(MalformedReason::BsizeTooSmall { bsize: block_len as u32 });
    }
    let payload_len = block_len - header_len - BGZF_FOOTER_SIZE;

    if buf.len() < block_len {
        return ParseOutcome::NeedMoreBytes;
    }

    let payload = &buf[header_len..header_len + payload_len];
    let tailer = &buf[header_len + payload_len..block_len];
    let crc = u32::from_le_bytes(tailer[0..4].try_into().expect("tailer has 8 bytes"));
    let inflated_size = u32::from_le_bytes(tailer[4..8].try_into().expect("tailer has 8 bytes"));

    ParseOutcome::Block(ParsedBlock { payload, crc, inflated_size, block_len })
}

/// Walk the extra-subfield area looking for exactly one `"BC"` subfield,
/// returning its `BSIZE` payload.
///
/// Each iteration debits a full subfield header (4 bytes: 2-byte id + 2-byte
/// length) plus the subfield's declared payload length from the remaining
/// budget, per §9's resolution of the `extra_len` accounting open question.
fn find_bc_subfield(extra: &[u8]) -> std::result::Result<u16, MalformedReason> {
    let mut bsize: Option<u16> = None;
    let mut pos = 0usize;
    while pos < extra.len() {
        if pos + 4 > extra.len() {
            return Err(MalformedReason::ExtraDoesNotClose);
        }
        let id = [extra[pos], extra[pos + 1]];
        let slen = u16::from_le_bytes([extra[pos + 2], extra[pos + 3]]) as usize;
        let payload_start = pos + 4;
        if payload_start + slen > extra.len() {
            return Err(MalformedReason::ExtraDoesNotClose);
        }

        if id == BC_SUBFIELD_ID {
            if bsize.is_some() {
                return Err(MalformedReason::DuplicateBcSubfield);
            }
            if slen != 2 {
                return Err(MalformedReason::BadBcSubfieldLength(slen as u16));
            }
            bsize = Some(u16::from_le_bytes([extra[payload_start], extra[payload_start + 1]]));
        }

        pos = payload_start + slen;
    }
    bsize.ok_or(MalformedReason::MissingBcSubfield)
}

/// Write the fixed header, `"BC"` subfield, and tailer around a DEFLATE
/// payload already written at `dst[BGZF_HEADER_SIZE..BGZF_HEADER_SIZE + payload_len]`.
///
/// Returns the total on-wire block length. `dst` must have at least
/// `MAX_BGZF_BLOCK_SIZE` bytes available; this is an internal invariant
/// upheld by the batch planner, not a user-facing error condition.
pub fn emit_block_frame(dst: &mut [u8], payload_len: usize, crc: u32, inflated_size: u32) -> Result<usize> {
    let block_len = BGZF_HEADER_SIZE + payload_len + BGZF_FOOTER_SIZE;
    if block_len > MAX_BGZF_BLOCK_SIZE {
        return Err(Error::BlockTooLarge { size: block_len, max: MAX_BGZF_BLOCK_SIZE });
    }
    debug_assert!(dst.len() >= block_len, "destination region too small for emitted block");

    let bsize = (block_len - 1) as u16;
    dst[0] = GZIP_MAGIC[0];
    dst[1] = GZIP_MAGIC[1];
    dst[2] = COMPRESSION_METHOD_DEFLATE;
    dst[3] = FEXTRA_FLAG;
    dst[4..8].copy_from_slice(&0u32.to_le_bytes()); // mtime
    dst[8] = 0; // extra flags
    dst[9] = 0xff; // OS: unknown
    dst[10..12].copy_from_slice(&6u16.to_le_bytes()); // xlen
    dst[12] = BC_SUBFIELD_ID[0];
    dst[13] = BC_SUBFIELD_ID[1];
    dst[14..16].copy_from_slice(&2u16.to_le_bytes()); // subfield length
    dst[16..18].copy_from_slice(&bsize.to_le_bytes());

    let tailer_start = BGZF_HEADER_SIZE + payload_len;
    dst[tailer_start..tailer_start + 4].copy_from_slice(&crc.to_le_bytes());
    dst[tailer_start + 4..tailer_start + 8].copy_from_slice(&inflated_size.to_le_bytes());

    Ok(block_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_eof_block() {
        match parse_block(&crate::constants::BGZF_EOF) {
            ParseOutcome::Block(b) => {
                assert_eq!(b.payload, &[0x03, 0x00]);
                assert_eq!(b.crc, 0);
                assert_eq!(b.inflated_size, 0);
                assert_eq!(b.block_len, 28);
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn bad_magic_is_malformed() {
        let mut block = crate::constants::BGZF_EOF;
        block[0] = 0x00;
        assert_eq!(
            parse_block(&block),
            ParseOutcome::Malformed(MalformedReason::BadMagic)
        );
    }

    #[test]
    fn truncated_trailing_block_needs_more_bytes() {
        let block = crate::constants::BGZF_EOF;
        assert_eq!(parse_block(&block[..20]), ParseOutcome::NeedMoreBytes);
    }

    #[test]
    fn truncated_header_is_malformed_not_need_more_bytes() {
        let block = crate::constants::BGZF_EOF;
        assert_eq!(
            parse_block(&block[..10]),
            ParseOutcome::Malformed(MalformedReason::TruncatedHeader)
        );
    }

    #[test]
    fn emit_then_parse_round_trips() {
        let mut dst = vec![0u8; crate::constants::MAX_BGZF_BLOCK_SIZE];
        dst[18..18 + 2].copy_from_slice(&[0x03, 0x00]);
        let len = emit_block_frame(&mut dst, 2, 0, 0).unwrap();
        assert_eq!(len, 28);
        assert_eq!(&dst[..28], &crate::constants::BGZF_EOF[..]);
    }

    #[test]
    fn missing_bc_subfield_is_malformed() {
        let mut block = crate::constants::BGZF_EOF.to_vec();
        block[12] = b'X'; // corrupt the subfield id so it's no longer "BC"
        assert_eq!(
            parse_block(&block),
            ParseOutcome::Malformed(MalformedReason::MissingBcSubfield)
        );
    }
}
