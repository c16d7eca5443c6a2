//! XMP sidecar (.xmp) files as a container.
//!
//! A sidecar is a bare XMP packet; the handler holds the packet as
//! the image's XMP namespace and writes it back through the same
//! raw-or-serialized choice as embedded packets.

use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};

/// Standalone XMP packet handler.
pub struct XmpSidecarHandler;

impl ImageHandler for XmpSidecarHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        // Skip a UTF-8 BOM and leading whitespace.
        let mut rest = header;
        if let Some(stripped) = rest.strip_prefix(&[0xef, 0xbb, 0xbf]) {
            rest = stripped;
        }
        while let Some((first, tail)) = rest.split_first() {
            if first.is_ascii_whitespace() {
                rest = tail;
            } else {
                break;
            }
        }
        rest.starts_with(b"<?xpacket") || rest.starts_with(b"<x:xmpmeta")
    }

    fn format_name(&self) -> &'static str {
        "XMP"
    }

    fn mime_type(&self) -> &'static str {
        "application/rdf+xml"
    }

    fn access_mode(&self, family: Family) -> AccessMode {
        match family {
            Family::Xmp => AccessMode::ReadWrite,
            _ => AccessMode::None,
        }
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let text = std::str::from_utf8(data)
            .map_err(|_| Error::InvalidXmp("sidecar is not UTF-8".into()))?;
        state.xmp_packet = Some(text.to_string());
        Ok(())
    }

    fn write_metadata(&self, _data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        match state.xmp_packet_for_write()? {
            Some(packet) => Ok(packet.into_bytes()),
            None => Ok(Vec::new()),
        }
    }
}
