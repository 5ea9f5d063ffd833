//! Error types for the parallel BGZF block codec.

use thiserror::Error;

/// Why a block header failed to parse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("fewer than 12 bytes available for the fixed header")]
    TruncatedHeader,
    #[error("gzip magic bytes mismatch")]
    BadMagic,
    #[error("unsupported compression method, only DEFLATE (8) is valid")]
    BadCompressionMethod,
    #[error("FEXTRA flag not set")]
    MissingFextra,
    #[error("extra subfield area does not close cleanly")]
    ExtraDoesNotClose,
    #[error("no \"BC\" subfield present")]
    MissingBcSubfield,
    #[error("more than one \"BC\" subfield present")]
    DuplicateBcSubfield,
    #[error("\"BC\" subfield has length {0}, expected 2")]
    BadBcSubfieldLength(u16),
    #[error("BSIZE ({bsize}) is smaller than the fixed header and tailer")]
    BsizeTooSmall { bsize: u32 },
}

/// Why the external DEFLATE primitive failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateErrorKind {
    #[error("DEFLATE compression failed")]
    Compress,
    #[error("DEFLATE decompression failed")]
    Decompress,
}

/// Errors surfaced by [`crate::inflate_batch`] and [`crate::deflate_batch`].
///
/// Control-flow-only outcomes (`NeedMoreBytes`, `OutputTooSmall`, `BatchFull`)
/// are intentionally not part of this type: they are consumed internally by
/// the planner and never escape the public API, per the "variant results
/// over sentinel codes" design note.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("malformed BGZF block header: {0}")]
    MalformedHeader(MalformedReason),

    #[error("inflated size mismatch: tailer says {expected}, got {found}")]
    SizeMismatch { expected: u32, found: u32 },

    #[error("CRC-32 mismatch: tailer says {expected:#010x}, computed {found:#010x}")]
    CrcMismatch { expected: u32, found: u32 },

    #[error("{0}")]
    DeflateError(DeflateErrorKind),

    #[error("deflated block of {size} bytes exceeds the maximum on-wire block size of {max}")]
    BlockTooLarge { size: usize, max: usize },

    #[error("a worker thread panicked during batch execution")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, Error>;
