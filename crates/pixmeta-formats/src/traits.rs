//! The handler interface every container format implements.

use crate::Result;
use pixmeta_core::Family;

/// What a handler can do with one metadata namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Namespace not representable in this container.
    None,
    /// Parsed on read, refused on write.
    Read,
    /// Parsed and re-serialized.
    ReadWrite,
}

/// State shared between a handler and its [`crate::Image`].
///
/// Handlers are stateless; they parse from and serialize to byte
/// slices, with the image aggregate owning the stream.
pub trait ImageHandler: Send + Sync {
    /// Does the byte prefix look like this format?
    fn sniff(&self, header: &[u8]) -> bool;

    /// Format name used in errors and logs.
    fn format_name(&self) -> &'static str;

    /// MIME type of the container.
    fn mime_type(&self) -> &'static str;

    /// Access mode for a namespace.
    fn access_mode(&self, family: Family) -> AccessMode;

    /// Parse the whole container and fill `state`.
    fn read_metadata(&self, data: &[u8], state: &mut crate::ImageState) -> Result<()>;

    /// Serialize `state` back into a fresh byte stream.
    ///
    /// Handlers that cannot write return
    /// [`pixmeta_core::Error::FormatUnsupportedForWrite`].
    fn write_metadata(&self, data: &[u8], state: &crate::ImageState) -> Result<Vec<u8>>;
}
