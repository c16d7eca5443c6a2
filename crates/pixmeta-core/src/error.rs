//! Error taxonomy shared across the workspace.
//!
//! Parsers throw on corruption and return normally on expected short
//! reads; value conversions return `Option` instead of erroring.
//! Container handlers translate low-level I/O failures that occur in
//! the middle of a structure into [`Error::CorruptedMetadata`].

use thiserror::Error;

/// Metadata errors.
#[derive(Debug, Error)]
#[must_use]
pub enum Error {
    // --- input validation ---
    #[error("data does not contain a recognized image format")]
    NotAnImage,

    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("invalid tag name or number '{0}'")]
    InvalidTag(String),

    #[error("invalid charset name '{0}'")]
    InvalidCharsetEncoding(String),

    // --- I/O ---
    #[error("failed to open data source: {0}")]
    SourceOpenFailed(String),

    #[error("failed to open file '{path}' in mode '{mode}'")]
    FileOpenFailed { path: String, mode: &'static str },

    #[error("failed to read from stream")]
    ReadFailed,

    #[error("failed to write to stream")]
    WriteFailed,

    #[error("failed to rename '{0}'")]
    RenameFailed(String),

    #[error("stream transfer failed: {0}")]
    TransferFailed(String),

    #[error("seek target {0} is out of range (size {1})")]
    OutOfRange(u64, u64),

    // --- parse / corruption ---
    #[error("corrupted {0} metadata")]
    CorruptedMetadata(&'static str),

    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },

    #[error("invalid IFD identifier {0}")]
    InvalidIfdId(u32),

    #[error("value of tag 0x{tag:04x} is too large: {size} bytes")]
    ValueTooLarge { tag: u16, size: usize },

    #[error("offset {offset} + size {size} exceeds data length {len}")]
    OffsetOutOfRange { offset: u64, size: usize, len: usize },

    #[error("IFD at offset {offset} has {count} entries, maximum is {max}")]
    TooManyIfdEntries { offset: u64, count: u64, max: u64 },

    #[error("TIFF directory too large to serialize: {0} bytes")]
    TiffDirectoryTooLarge(usize),

    #[error("invalid TIFF type value {0}")]
    InvalidTypeValue(u16),

    #[error("invalid TIFF magic 0x{0:04x}")]
    InvalidTiffMagic(u16),

    #[error("invalid byte order marker {0:?}")]
    InvalidByteOrder([u8; 2]),

    #[error("invalid ICC profile")]
    InvalidIccProfile,

    #[error("invalid XMP packet: {0}")]
    InvalidXmp(String),

    #[error("encoded JPEG segment exceeds 64 KiB")]
    TooLargeJpegSegment,

    // --- semantics ---
    #[error("value of '{0}' is not set")]
    ValueNotSet(String),

    #[error("setting not valid for this image format: {0}")]
    InvalidSettingForImage(&'static str),

    #[error("writing metadata is not supported for {0} images")]
    FormatUnsupportedForWrite(&'static str),

    #[error("operation not supported: {0}")]
    FunctionNotSupported(&'static str),

    // --- IPTC record semantics ---
    #[error("invalid IPTC record: expected marker 0x1c at offset {0}")]
    InvalidRecord(usize),

    #[error("dataset {record}:{dataset} is not repeatable")]
    DatasetNotRepeatable { record: u8, dataset: u8 },

    // --- resource ---
    #[error("refusing allocation of {requested} bytes (stream holds {available})")]
    AllocationTooLarge { requested: usize, available: usize },

    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;
