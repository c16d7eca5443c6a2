//! TIFF file handler (TIFF, BigTIFF, DNG and the TIFF-based raws).
//!
//! The whole file is one TIFF stream, so the handler is a thin shell
//! over the engine. IPTC (tag 0x83bb), XMP (0x02bc), and the ICC
//! profile (0x8773) ride along as IFD0 entries on write. The raw
//! variants with non-standard magic (ORF, RW2) parse but refuse
//! writes.

use crate::tiff::{ptr, TiffReader, TiffWriter};
use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family, Key, Value};
use pixmeta_iptc::IptcWriter;
use pixmeta_tags::{tag_name, Group};

/// Magic values accepted on read: TIFF, BigTIFF, ORF, RW2.
const READ_MAGIC: &[u16] = &[42, 43, 0x4f52, 0x5352, 0x0055];

/// TIFF container handler.
pub struct TiffHandler;

impl ImageHandler for TiffHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        if header.len() < 4 {
            return false;
        }
        let Ok(order) = pixmeta_core::ByteOrder::from_marker([header[0], header[1]]) else {
            return false;
        };
        let magic = order.read_u16([header[2], header[3]]);
        READ_MAGIC.contains(&magic)
    }

    fn format_name(&self) -> &'static str {
        "TIFF"
    }

    fn mime_type(&self) -> &'static str {
        "image/tiff"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let parsed = TiffReader::parse_with_magic(data, READ_MAGIC)?;
        state.exif = parsed.exif;
        state.iptc = parsed.iptc;
        state.xmp_packet = parsed.xmp_packet;
        state.icc_profile = parsed.icc_profile;
        state.byte_order = parsed.byte_order;
        state.thumbnail = parsed.thumbnail;
        state.pixel_width = parsed.pixel_width;
        state.pixel_height = parsed.pixel_height;
        crate::preview::collect_previews(data, state);
        Ok(())
    }

    fn write_metadata(&self, data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        if data.len() >= 4 {
            let order = pixmeta_core::ByteOrder::from_marker([data[0], data[1]])?;
            let magic = order.read_u16([data[2], data[3]]);
            if magic != 42 && magic != 43 {
                return Err(Error::FormatUnsupportedForWrite("RAW"));
            }
        }

        // Sibling namespaces become IFD0 entries.
        let mut exif = state.exif.clone();
        let image = Group::Image.name();
        let entry_key = |tag: u16| Key::new(Family::Exif, image, tag_name(tag, Group::Image));
        if !state.iptc.is_empty() {
            exif.set(
                entry_key(ptr::IPTC_NAA),
                Value::Undefined(IptcWriter::encode(&state.iptc)?),
            );
        }
        if let Some(packet) = state.xmp_packet_for_write()? {
            exif.set(
                entry_key(ptr::XML_PACKET),
                Value::Byte(packet.into_bytes()),
            );
        }
        if let Some(profile) = &state.icc_profile {
            exif.set(
                entry_key(ptr::ICC_PROFILE),
                Value::Undefined(profile.clone()),
            );
        }

        let bigtiff = data.len() >= 4 && {
            let order = pixmeta_core::ByteOrder::from_marker([data[0], data[1]])?;
            order.read_u16([data[2], data[3]]) == 43
        };
        let writer = TiffWriter::new(state.byte_order, bigtiff);
        let (out, _method) = writer.write(Some(data), &exif, state.thumbnail.as_deref())?;
        Ok(out)
    }
}
