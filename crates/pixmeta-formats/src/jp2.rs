//! JPEG 2000 handler (read-only).
//!
//! JP2 reuses the ISO box grammar. Geometry comes from `jp2h/ihdr`;
//! Exif, IPTC and XMP hide in `uuid` boxes with JP2-specific UUIDs
//! (the Exif one spells "JpgTiffExif->JP2").

use crate::tiff::TiffReader;
use crate::traits::{AccessMode, ImageHandler};
use crate::utils::slice;
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};
use pixmeta_iptc::IptcParser;
use tracing::warn;

const JP2_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0c, 0x6a, 0x50, 0x20, 0x20, 0x0d, 0x0a, 0x87, 0x0a,
];

const UUID_EXIF: [u8; 16] = *b"JpgTiffExif->JP2";
const UUID_IPTC: [u8; 16] = [
    0x33, 0xc7, 0xa4, 0xd2, 0xb8, 0x1d, 0x47, 0x23, 0xa0, 0xba, 0xf1, 0xa3, 0xe0, 0x97, 0xad,
    0x38,
];
const UUID_XMP: [u8; 16] = [
    0xbe, 0x7a, 0xcf, 0xcb, 0x97, 0xa9, 0x42, 0xe8, 0x9c, 0x71, 0x99, 0x94, 0x91, 0xe3, 0xaf,
    0xac,
];

/// JPEG 2000 container handler.
pub struct Jp2Handler;

impl ImageHandler for Jp2Handler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 12 && header[..12] == JP2_SIGNATURE
    }

    fn format_name(&self) -> &'static str {
        "JP2"
    }

    fn mime_type(&self) -> &'static str {
        "image/jp2"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::Read
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let mut pos = 0;
        while pos + 8 <= data.len() {
            let header = slice(data, pos, 8)?;
            let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
            let kind: [u8; 4] = [header[4], header[5], header[6], header[7]];
            let box_size = if size == 0 { data.len() - pos } else { size };
            if box_size < 8 || pos + box_size > data.len() {
                return Err(Error::CorruptedMetadata("JP2"));
            }
            let body = &data[pos + 8..pos + box_size];

            match &kind {
                b"jp2h" => {
                    // First child is ihdr: height then width.
                    if body.len() >= 16 && &body[4..8] == b"ihdr" {
                        state.pixel_height =
                            u32::from_be_bytes([body[8], body[9], body[10], body[11]]);
                        state.pixel_width =
                            u32::from_be_bytes([body[12], body[13], body[14], body[15]]);
                    }
                }
                b"uuid" if body.len() >= 16 => {
                    let uuid: [u8; 16] = body[..16].try_into().unwrap();
                    let payload = &body[16..];
                    if uuid == UUID_EXIF {
                        let tiff = payload
                            .strip_prefix(b"Exif\0\0".as_slice())
                            .unwrap_or(payload);
                        match TiffReader::parse(tiff) {
                            Ok(parsed) => {
                                state.exif = parsed.exif;
                                state.byte_order = parsed.byte_order;
                                state.thumbnail = parsed.thumbnail;
                            }
                            Err(err) => warn!(%err, "invalid Exif uuid box"),
                        }
                    } else if uuid == UUID_IPTC {
                        match IptcParser::decode(payload) {
                            Ok(iptc) => state.iptc = iptc,
                            Err(err) => warn!(%err, "invalid IPTC uuid box"),
                        }
                    } else if uuid == UUID_XMP {
                        state.xmp_packet =
                            Some(String::from_utf8_lossy(payload).into_owned());
                    }
                }
                b"jp2c" => break,
                _ => {}
            }
            pos += box_size;
        }
        Ok(())
    }

    fn write_metadata(&self, _data: &[u8], _state: &ImageState) -> Result<Vec<u8>> {
        Err(Error::FormatUnsupportedForWrite("JP2"))
    }
}
