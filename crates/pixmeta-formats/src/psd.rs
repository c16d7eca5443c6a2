//! Photoshop PSD handler and the IRB machinery shared with JPEG APP13.
//!
//! A PSD is a fixed 26-byte header, a length-prefixed color-mode
//! section, a length-prefixed image-resource section (the IRB
//! stream), then layers and pixel data. Each IRB:
//!
//! ```text
//! type(4: 8BIM/AgHg/DCSR/PHUT) | id(u16) | Pascal name | len(u32) | data | pad
//! ```
//!
//! The name field spans `(len & !1) + 2` bytes - the historical
//! rounding every reader reproduces. Resource ids of interest:
//! 0x0404 IPTC, 0x0422 Exif, 0x0424 XMP, 0x0409/0x040c thumbnails.

use crate::tiff::{TiffReader, TiffWriter};
use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};
use pixmeta_iptc::IptcParser;
use tracing::warn;

const PSD_MAGIC: &[u8] = b"8BPS";
const HEADER_LEN: usize = 26;

/// Image Resource Block primitives.
pub(crate) mod irb {
    use super::*;
    use pixmeta_core::IptcData;
    use pixmeta_iptc::IptcWriter;

    pub const ID_IPTC: u16 = 0x0404;
    pub const ID_THUMB_PS4: u16 = 0x0409;
    pub const ID_THUMB: u16 = 0x040c;
    pub const ID_EXIF: u16 = 0x0422;
    pub const ID_XMP: u16 = 0x0424;

    const TYPES: [&[u8; 4]; 4] = [b"8BIM", b"AgHg", b"DCSR", b"PHUT"];

    /// One image resource block.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Irb {
        pub kind: [u8; 4],
        pub id: u16,
        /// Pascal-string name content (without length byte or pad).
        pub name: Vec<u8>,
        pub data: Vec<u8>,
    }

    impl Irb {
        pub fn new(id: u16, data: Vec<u8>) -> Self {
            Self {
                kind: *b"8BIM",
                id,
                name: Vec::new(),
                data,
            }
        }
    }

    /// Parse an IRB stream.
    pub fn parse(data: &[u8]) -> Result<Vec<Irb>> {
        let mut irbs = Vec::new();
        let mut pos = 0;
        while pos + 4 <= data.len() {
            let kind: [u8; 4] = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
            if !TYPES.iter().any(|t| **t == kind) {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            pos += 4;
            if pos + 2 > data.len() {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            let id = u16::from_be_bytes([data[pos], data[pos + 1]]);
            pos += 2;

            if pos >= data.len() {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            let name_len = data[pos] as usize;
            // Name field spans (len & !1) + 2 bytes, the even-rounding
            // quirk preserved for compatibility.
            let name_span = (name_len & !1) + 2;
            if pos + name_span > data.len() {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            let name = data[pos + 1..pos + 1 + name_len.min(name_span - 1)].to_vec();
            pos += name_span;

            if pos + 4 > data.len() {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            let len =
                u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
                    as usize;
            pos += 4;
            if pos + len > data.len() {
                return Err(Error::CorruptedMetadata("Photoshop"));
            }
            irbs.push(Irb {
                kind,
                id,
                name,
                data: data[pos..pos + len].to_vec(),
            });
            pos += len + (len % 2);
        }
        Ok(irbs)
    }

    /// Serialize an IRB stream.
    pub fn build(irbs: &[Irb]) -> Vec<u8> {
        let mut out = Vec::new();
        for block in irbs {
            out.extend_from_slice(&block.kind);
            out.extend_from_slice(&block.id.to_be_bytes());
            out.push(block.name.len() as u8);
            out.extend_from_slice(&block.name);
            if block.name.len() % 2 == 0 {
                out.push(0);
            }
            out.extend_from_slice(&(block.data.len() as u32).to_be_bytes());
            out.extend_from_slice(&block.data);
            if block.data.len() % 2 != 0 {
                out.push(0);
            }
        }
        out
    }

    /// Replace or remove the block with `id`, keeping ascending order.
    pub fn replace(irbs: &mut Vec<Irb>, id: u16, data: Option<Vec<u8>>) {
        irbs.retain(|b| b.id != id);
        if let Some(data) = data {
            let pos = irbs
                .iter()
                .position(|b| b.id > id)
                .unwrap_or(irbs.len());
            irbs.insert(pos, Irb::new(id, data));
        }
    }

    /// Swap the IPTC resource for the given container's stream.
    pub fn rebuild_with_iptc(mut irbs: Vec<Irb>, iptc: &IptcData) -> Result<Vec<Irb>> {
        let encoded = if iptc.is_empty() {
            None
        } else {
            Some(IptcWriter::encode(iptc)?)
        };
        replace(&mut irbs, ID_IPTC, encoded);
        Ok(irbs)
    }
}

/// PSD container handler.
pub struct PsdHandler;

impl ImageHandler for PsdHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 6
            && header.starts_with(PSD_MAGIC)
            && u16::from_be_bytes([header[4], header[5]]) == 1
    }

    fn format_name(&self) -> &'static str {
        "PSD"
    }

    fn mime_type(&self) -> &'static str {
        "image/vnd.adobe.photoshop"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let (irb_data, _) = sections(data)?;
        state.pixel_height = u32::from_be_bytes([data[14], data[15], data[16], data[17]]);
        state.pixel_width = u32::from_be_bytes([data[18], data[19], data[20], data[21]]);

        for block in irb::parse(irb_data)? {
            match block.id {
                irb::ID_IPTC => match IptcParser::decode(&block.data) {
                    Ok(iptc) => state.iptc = iptc,
                    Err(err) => warn!(%err, "invalid IPTC resource"),
                },
                irb::ID_EXIF => match TiffReader::parse(&block.data) {
                    Ok(parsed) => {
                        state.exif = parsed.exif;
                        state.byte_order = parsed.byte_order;
                        state.thumbnail = parsed.thumbnail;
                    }
                    Err(err) => warn!(%err, "invalid Exif resource"),
                },
                irb::ID_XMP => {
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(&block.data).into_owned());
                }
                _ => {}
            }
        }
        crate::preview::collect_previews(data, state);
        Ok(())
    }

    fn write_metadata(&self, data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        let (irb_data, irb_section_start) = sections(data)?;
        let mut irbs = irb::parse(irb_data)?;

        irbs = irb::rebuild_with_iptc(irbs, &state.iptc)?;

        let exif_bytes = if state.exif.is_empty() {
            None
        } else {
            let writer = TiffWriter::new(state.byte_order, false);
            let (bytes, _) = writer.write(
                irbs.iter()
                    .find(|b| b.id == irb::ID_EXIF)
                    .map(|b| b.data.as_slice()),
                &state.exif,
                state.thumbnail.as_deref(),
            )?;
            Some(bytes).filter(|b| !b.is_empty())
        };
        irb::replace(&mut irbs, irb::ID_EXIF, exif_bytes);

        let xmp_bytes = state
            .xmp_packet_for_write()?
            .map(|p| p.into_bytes());
        irb::replace(&mut irbs, irb::ID_XMP, xmp_bytes);

        let rebuilt = irb::build(&irbs);
        let tail_start = irb_section_start + 4 + irb_data.len();

        let mut out = data[..irb_section_start].to_vec();
        out.extend_from_slice(&(rebuilt.len() as u32).to_be_bytes());
        out.extend_from_slice(&rebuilt);
        out.extend_from_slice(&data[tail_start..]);
        Ok(out)
    }
}

/// Locate the IRB section: returns (irb bytes, section offset).
fn sections(data: &[u8]) -> Result<(&[u8], usize)> {
    if data.len() < HEADER_LEN + 8 || !data.starts_with(PSD_MAGIC) {
        return Err(Error::CorruptedMetadata("PSD"));
    }
    let color_len = u32::from_be_bytes([data[26], data[27], data[28], data[29]]) as usize;
    let irb_section = HEADER_LEN + 4 + color_len;
    if irb_section + 4 > data.len() {
        return Err(Error::CorruptedMetadata("PSD"));
    }
    let irb_len = u32::from_be_bytes([
        data[irb_section],
        data[irb_section + 1],
        data[irb_section + 2],
        data[irb_section + 3],
    ]) as usize;
    let irb_start = irb_section + 4;
    if irb_start + irb_len > data.len() {
        return Err(Error::CorruptedMetadata("PSD"));
    }
    Ok((&data[irb_start..irb_start + irb_len], irb_section))
}
