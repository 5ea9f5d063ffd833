//! Wire-format and batch-tuning constants.

/// Fixed 12-byte header size, before the extra-subfield area.
pub const FIXED_HEADER_SIZE: usize = 12;

/// Size of the `"BC"` extra subfield, header plus payload (2 + 2 + 2).
pub const BC_SUBFIELD_SIZE: usize = 6;

/// Full on-wire header size for a block carrying only the `"BC"` subfield
/// (fixed header + one extra subfield).
pub const BGZF_HEADER_SIZE: usize = FIXED_HEADER_SIZE + BC_SUBFIELD_SIZE;

/// BGZF tailer size (CRC32 + ISIZE).
pub const BGZF_FOOTER_SIZE: usize = 8;

/// Target uncompressed size per deflated block (§3).
pub const BGZF_BLOCK_SIZE: usize = 65280;

/// Maximum on-wire block size, header + payload + tailer.
pub const MAX_BGZF_BLOCK_SIZE: usize = 65536;

/// Minimum possible on-wire block size: header + empty DEFLATE stored block + tailer.
pub const MIN_BGZF_BLOCK_SIZE: usize = BGZF_HEADER_SIZE + BGZF_FOOTER_SIZE + 2;

/// Default cap on descriptors planned per batch call (§3, §9: a tuning
/// parameter here, not a hard stack-imposed limit).
pub const DEFAULT_MAX_BLOCKS_PER_BATCH: usize = 300;

/// BGZF EOF marker: an empty BGZF block, valid as a stream terminator.
pub const BGZF_EOF: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, // gzip magic, method, flags (FEXTRA)
    0x00, 0x00, 0x00, 0x00, // mtime
    0x00, 0xff, // xfl, os
    0x06, 0x00, // xlen = 6
    0x42, 0x43, // subfield ID "BC"
    0x02, 0x00, // subfield length = 2
    0x1b, 0x00, // BSIZE = 27 (28 - 1)
    0x03, 0x00, // empty deflate block
    0x00, 0x00, 0x00, 0x00, // CRC32 = 0
    0x00, 0x00, 0x00, 0x00, // ISIZE = 0
];

const _: () = assert!(BGZF_EOF.len() == MIN_BGZF_BLOCK_SIZE);
