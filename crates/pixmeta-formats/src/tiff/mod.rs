//! The TIFF/IFD engine.
//!
//! [`reader`] walks a TIFF or BigTIFF stream into datums, guarding
//! against cycles, oversized directories, and offset attacks.
//! [`writer`] serializes datums back, patching in place when every
//! change fits the existing entries and rebuilding the stream with
//! fresh offsets otherwise. [`makernotes`] dispatches the vendor
//! sub-formats found in tag 0x927c.

pub mod makernotes;
mod reader;
mod writer;

pub use reader::{DataArea, EntryLocation, IfdKind, TiffParseResult, TiffReader};
pub use writer::{TiffWriter, WriteMethod};

/// Directories with more entries than this are treated as corrupted.
pub const MAX_IFD_ENTRIES: u64 = 500;

/// Hard cap on nesting depth across IFDs and maker notes.
pub const MAX_NESTING: usize = 100;

/// Nested-IFD pointer tags.
pub mod ptr {
    pub const EXIF_IFD: u16 = 0x8769;
    pub const GPS_IFD: u16 = 0x8825;
    pub const IOP_IFD: u16 = 0xa005;
    pub const SUB_IFDS: u16 = 0x014a;
    pub const IPTC_NAA: u16 = 0x83bb;
    pub const ICC_PROFILE: u16 = 0x8773;
    pub const MAKER_NOTE: u16 = 0x927c;
    pub const USER_COMMENT: u16 = 0x9286;
    pub const XML_PACKET: u16 = 0x02bc;
    pub const STRIP_OFFSETS: u16 = 0x0111;
    pub const STRIP_BYTE_COUNTS: u16 = 0x0117;
    pub const TILE_OFFSETS: u16 = 0x0144;
    pub const TILE_BYTE_COUNTS: u16 = 0x0145;
    pub const JPEG_IF: u16 = 0x0201;
    pub const JPEG_IF_LENGTH: u16 = 0x0202;
}
