//! The image aggregate: one byte stream, three metadata containers.

use crate::preview::PreviewProperties;
use crate::registry::handler_for;
use crate::traits::{AccessMode, ImageHandler};
use crate::utils::read_with_limit;
use pixmeta_core::{
    BasicIo, ByteOrder, Error, ExifData, Family, FileIo, IptcData, MemIo, OpenMode, Result,
    XmpData,
};
use pixmeta_xmp::{XmpParser, XmpSerializer};
use std::path::Path;
use tracing::warn;

/// Decoded metadata state shared between an [`Image`] and its handler.
#[derive(Debug, Default)]
pub struct ImageState {
    pub exif: ExifData,
    pub iptc: IptcData,
    pub xmp: XmpData,
    /// Raw XMP packet as found in the container.
    pub xmp_packet: Option<String>,
    /// Splice the raw packet on write instead of re-serializing.
    pub write_xmp_from_packet: bool,
    /// Free-form comment (JPEG COM, PNG tEXt Comment).
    pub comment: Option<String>,
    /// ICC profile carried verbatim.
    pub icc_profile: Option<Vec<u8>>,
    /// Byte order of embedded TIFF data.
    pub byte_order: ByteOrder,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Exif IFD1 thumbnail bytes.
    pub thumbnail: Option<Vec<u8>>,
    /// Native preview descriptors collected during the read.
    pub previews: Vec<PreviewProperties>,
}

impl ImageState {
    fn clear(&mut self) {
        *self = ImageState {
            write_xmp_from_packet: self.write_xmp_from_packet,
            ..ImageState::default()
        };
    }

    /// Decode the raw packet into the XMP container.
    pub(crate) fn decode_xmp_packet(&mut self) {
        if let Some(packet) = &self.xmp_packet {
            match XmpParser::decode(packet) {
                Ok(xmp) => self.xmp = xmp,
                Err(err) => warn!(%err, "failed to parse XMP packet, keeping raw bytes"),
            }
        }
    }

    /// The packet to embed on write.
    ///
    /// With `write_xmp_from_packet` set (the toolkit-less mode) the
    /// raw packet is spliced byte-for-byte; otherwise the property
    /// tree is re-serialized.
    pub(crate) fn xmp_packet_for_write(&self) -> Result<Option<String>> {
        if self.write_xmp_from_packet {
            return Ok(self.xmp_packet.clone());
        }
        if self.xmp.is_empty() {
            return Ok(None);
        }
        let packet = XmpSerializer::encode(&self.xmp)
            .map_err(|err| Error::InvalidXmp(err.to_string()))?;
        Ok(Some(packet))
    }
}

/// An image file with its decoded metadata.
///
/// Owns the byte stream exclusively. `read_metadata` clears and
/// refills the containers; mutators touch memory only;
/// `write_metadata` rebuilds the container into a fresh stream and
/// swaps it in atomically, so a failed write leaves the original
/// bytes intact.
pub struct Image {
    io: Box<dyn BasicIo>,
    handler: &'static dyn ImageHandler,
    state: ImageState,
}

impl Image {
    /// Open a file, sniffing the container type from its first bytes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut io = FileIo::new(path.as_ref());
        io.open(OpenMode::Read)?;
        Self::from_io(Box::new(io))
    }

    /// Wrap an in-memory image.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_io(Box::new(MemIo::from_vec(data)))
    }

    /// Read stdin into a spill buffer and open it as an image.
    pub fn from_stdin() -> Result<Self> {
        Self::from_io(Box::new(MemIo::from_stdin()?))
    }

    /// Sniff the handler for an already-open stream.
    pub fn from_io(mut io: Box<dyn BasicIo>) -> Result<Self> {
        io.open(OpenMode::Read)?;
        io.seek(std::io::SeekFrom::Start(0))?;
        // 18 bytes cover every magic plus the TGA header heuristic.
        let mut header = [0u8; 18];
        let got = io.read(&mut header)?;
        let handler = handler_for(&header[..got]).ok_or(Error::NotAnImage)?;
        Ok(Self {
            io,
            handler,
            state: ImageState {
                write_xmp_from_packet: true,
                ..ImageState::default()
            },
        })
    }

    /// Format name of the detected container.
    pub fn format_name(&self) -> &'static str {
        self.handler.format_name()
    }

    /// MIME type of the detected container.
    pub fn mime_type(&self) -> &'static str {
        self.handler.mime_type()
    }

    /// Access mode the container grants a namespace.
    pub fn access_mode(&self, family: Family) -> AccessMode {
        self.handler.access_mode(family)
    }

    /// Parse the container and fill the metadata containers.
    pub fn read_metadata(&mut self) -> Result<()> {
        self.io.open(OpenMode::Read)?;
        let data = read_with_limit(self.io.as_mut())?;
        self.state.clear();
        self.handler.read_metadata(&data, &mut self.state)?;
        self.state.decode_xmp_packet();
        Ok(())
    }

    /// Serialize the metadata back and atomically replace the stream.
    pub fn write_metadata(&mut self) -> Result<()> {
        self.io.open(OpenMode::Read)?;
        let data = read_with_limit(self.io.as_mut())?;
        let rewritten = self.handler.write_metadata(&data, &self.state)?;
        let mut staging = MemIo::from_vec(rewritten);
        self.io.transfer(&mut staging)
    }

    // --- namespace accessors ---

    pub fn exif(&self) -> &ExifData {
        &self.state.exif
    }

    pub fn exif_mut(&mut self) -> &mut ExifData {
        &mut self.state.exif
    }

    pub fn iptc(&self) -> &IptcData {
        &self.state.iptc
    }

    pub fn iptc_mut(&mut self) -> &mut IptcData {
        &mut self.state.iptc
    }

    pub fn xmp(&self) -> &XmpData {
        &self.state.xmp
    }

    /// Mutable XMP access switches writing to the property tree.
    pub fn xmp_mut(&mut self) -> &mut XmpData {
        self.state.write_xmp_from_packet = false;
        &mut self.state.xmp
    }

    pub fn xmp_packet(&self) -> Option<&str> {
        self.state.xmp_packet.as_deref()
    }

    /// Install a raw packet to be spliced verbatim on write.
    pub fn set_xmp_packet(&mut self, packet: impl Into<String>) {
        self.state.xmp_packet = Some(packet.into());
        self.state.write_xmp_from_packet = true;
        self.state.decode_xmp_packet();
    }

    /// Choose between raw-packet splicing and tree serialization.
    pub fn set_write_xmp_from_packet(&mut self, flag: bool) {
        self.state.write_xmp_from_packet = flag;
    }

    pub fn comment(&self) -> Option<&str> {
        self.state.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.state.comment = Some(comment.into());
    }

    pub fn clear_comment(&mut self) {
        self.state.comment = None;
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.state.icc_profile.as_deref()
    }

    /// Install an ICC profile after validating its header.
    pub fn set_icc_profile(&mut self, profile: Vec<u8>) -> Result<()> {
        if !pixmeta_icc::is_valid(&profile) {
            return Err(Error::InvalidIccProfile);
        }
        self.state.icc_profile = Some(profile);
        Ok(())
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.state.byte_order
    }

    pub fn pixel_width(&self) -> u32 {
        self.state.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.state.pixel_height
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.state.thumbnail.as_deref()
    }

    pub(crate) fn state(&self) -> &ImageState {
        &self.state
    }

    pub(crate) fn io_mut(&mut self) -> &mut dyn BasicIo {
        self.io.as_mut()
    }
}
