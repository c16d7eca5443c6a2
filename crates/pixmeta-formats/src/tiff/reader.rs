//! Recursive IFD walker.
//!
//! Layout: an 8-byte header (`II`/`MM`, magic 42, IFD0 offset), or a
//! 16-byte BigTIFF header (magic 43, offset size 8). Each IFD is an
//! entry count, fixed-size entries of (tag, type, count,
//! value-or-offset), and the offset of the next IFD in the chain.
//! Values of up to 4 bytes (8 in BigTIFF) live inline in the entry.
//!
//! Hostile-input policies, enforced unconditionally:
//! - an offset visited twice in one parse is corruption (cycle guard)
//! - more than [`MAX_IFD_ENTRIES`] entries is corruption
//! - unknown entry types abort the parse
//! - a value block is bounds-checked against the stream before any
//!   allocation happens
//! - nesting depth is capped at [`MAX_NESTING`]

use super::makernotes::{self, MakerDispatch};
use super::{ptr, MAX_IFD_ENTRIES, MAX_NESTING};
use crate::utils::slice;
use pixmeta_core::{
    ByteOrder, CommentValue, Error, ExifData, Family, IptcData, Key, Result, TypeId, Value,
};
use pixmeta_iptc::IptcParser;
use pixmeta_tags::{tag_name, Group};
use std::collections::HashSet;
use tracing::warn;

/// Which directory of the tree an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfdKind {
    Ifd0,
    Thumbnail,
    Exif,
    Gps,
    Iop,
    SubImage1,
    MakerNikon,
    MakerSony,
    MakerCanon,
}

impl IfdKind {
    /// Catalog group for key construction.
    pub fn group(self) -> Group {
        match self {
            IfdKind::Ifd0 => Group::Image,
            IfdKind::Thumbnail => Group::Thumbnail,
            IfdKind::Exif => Group::Photo,
            IfdKind::Gps => Group::GpsInfo,
            IfdKind::Iop => Group::Iop,
            IfdKind::SubImage1 => Group::SubImage1,
            IfdKind::MakerNikon => Group::MakerNikon,
            IfdKind::MakerSony => Group::MakerSony,
            IfdKind::MakerCanon => Group::MakerCanon,
        }
    }
}

/// Where an entry's value bytes live in the stream.
///
/// The writer's non-intrusive path patches these positions directly.
#[derive(Debug, Clone)]
pub struct EntryLocation {
    pub group: Group,
    pub tag: u16,
    pub type_id: TypeId,
    pub count: u64,
    /// Absolute position of the value bytes (inline field or target
    /// of the offset).
    pub value_pos: usize,
    pub value_len: usize,
}

/// Out-of-IFD pixel data captured for the rebuild path.
#[derive(Debug, Clone)]
pub struct DataArea {
    pub group: Group,
    /// The offsets tag (StripOffsets, TileOffsets).
    pub offsets_tag: u16,
    /// One captured block per offset.
    pub chunks: Vec<Vec<u8>>,
}

/// Everything a TIFF parse produces.
#[derive(Debug, Default)]
pub struct TiffParseResult {
    pub exif: ExifData,
    pub iptc: IptcData,
    pub byte_order: ByteOrder,
    pub bigtiff: bool,
    pub icc_profile: Option<Vec<u8>>,
    /// IFD1 compressed thumbnail, when present.
    pub thumbnail: Option<Vec<u8>>,
    /// Raw XMP packet from tag 0x02bc.
    pub xmp_packet: Option<String>,
    pub data_areas: Vec<DataArea>,
    pub locations: Vec<EntryLocation>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Vendor preview pointer inside a nested maker-note TIFF.
const NIKON_PREVIEW_IFD: u16 = 0x0011;

/// The IFD tree walker.
pub struct TiffReader<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
    bigtiff: bool,
    /// Set when walking a maker note's embedded TIFF stream; enables
    /// the vendor preview-IFD descent.
    maker_nested: bool,
    visited: HashSet<u64>,
    depth: usize,
    result: TiffParseResult,
}

impl<'a> TiffReader<'a> {
    /// Parse a complete TIFF stream (header included).
    pub fn parse(data: &'a [u8]) -> Result<TiffParseResult> {
        Self::parse_with_magic(data, &[42, 43])
    }

    /// Parse accepting non-standard magic values (ORF, RW2 variants).
    pub fn parse_with_magic(data: &'a [u8], allowed_magic: &[u16]) -> Result<TiffParseResult> {
        Self::parse_inner(data, allowed_magic, false)
    }

    fn parse_inner(
        data: &'a [u8],
        allowed_magic: &[u16],
        maker_nested: bool,
    ) -> Result<TiffParseResult> {
        if data.len() < 8 {
            return Err(Error::UnexpectedEof {
                need: 8,
                have: data.len(),
            });
        }
        let byte_order = ByteOrder::from_marker([data[0], data[1]])?;
        let magic = byte_order.read_u16([data[2], data[3]]);
        if !allowed_magic.contains(&magic) {
            return Err(Error::InvalidTiffMagic(magic));
        }
        let bigtiff = magic == 43;

        let mut reader = TiffReader {
            data,
            byte_order,
            bigtiff,
            maker_nested,
            visited: HashSet::new(),
            depth: 0,
            result: TiffParseResult {
                byte_order,
                bigtiff,
                ..Default::default()
            },
        };

        let ifd0_offset = if bigtiff {
            if data.len() < 16 {
                return Err(Error::UnexpectedEof {
                    need: 16,
                    have: data.len(),
                });
            }
            let offset_size = byte_order.read_u16([data[4], data[5]]);
            if offset_size != 8 {
                return Err(Error::CorruptedMetadata("BigTIFF"));
            }
            byte_order.read_u64([
                data[8], data[9], data[10], data[11], data[12], data[13], data[14], data[15],
            ])
        } else {
            byte_order.read_u32([data[4], data[5], data[6], data[7]]) as u64
        };

        reader.read_ifd_chain(ifd0_offset)?;
        reader.capture_thumbnail();
        reader.capture_dimensions();
        Ok(reader.result)
    }

    /// Walk the main chain: IFD0, then IFD1 (thumbnail).
    fn read_ifd_chain(&mut self, offset: u64) -> Result<()> {
        let mut next = offset;
        let mut index = 0;
        while next != 0 {
            let kind = match index {
                0 => IfdKind::Ifd0,
                1 => IfdKind::Thumbnail,
                _ => {
                    warn!(index, "ignoring IFDs beyond the thumbnail directory");
                    break;
                }
            };
            next = self.read_ifd(next, kind)?;
            index += 1;
        }
        Ok(())
    }

    /// Read one directory; returns the next-IFD offset.
    fn read_ifd(&mut self, offset: u64, kind: IfdKind) -> Result<u64> {
        if !self.visited.insert(offset) {
            return Err(Error::CorruptedMetadata("TIFF"));
        }
        if self.depth >= MAX_NESTING {
            return Err(Error::CorruptedMetadata("TIFF"));
        }
        self.depth += 1;
        let result = self.read_ifd_inner(offset, kind);
        self.depth -= 1;
        result
    }

    fn read_ifd_inner(&mut self, offset: u64, kind: IfdKind) -> Result<u64> {
        let pos = offset as usize;
        let (count, entry_size, first_entry) = if self.bigtiff {
            let header = slice(self.data, pos, 8)?;
            let count = self.byte_order.read_u64([
                header[0], header[1], header[2], header[3], header[4], header[5], header[6],
                header[7],
            ]);
            (count, 20usize, pos + 8)
        } else {
            let header = slice(self.data, pos, 2)?;
            let count = self.byte_order.read_u16([header[0], header[1]]) as u64;
            (count, 12usize, pos + 2)
        };

        if count > MAX_IFD_ENTRIES {
            return Err(Error::TooManyIfdEntries {
                offset,
                count,
                max: MAX_IFD_ENTRIES,
            });
        }

        // The whole entry table must fit before any entry is read.
        let table_len = count as usize * entry_size;
        slice(self.data, first_entry, table_len)?;

        for i in 0..count as usize {
            self.read_entry(first_entry + i * entry_size, kind)?;
        }

        // Next-IFD offset; a missing pointer terminates the chain.
        let next_pos = first_entry + table_len;
        let next = if self.bigtiff {
            match slice(self.data, next_pos, 8) {
                Ok(b) => self
                    .byte_order
                    .read_u64([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
                Err(_) => 0,
            }
        } else {
            match slice(self.data, next_pos, 4) {
                Ok(b) => self.byte_order.read_u32([b[0], b[1], b[2], b[3]]) as u64,
                Err(_) => 0,
            }
        };
        Ok(next)
    }

    fn read_entry(&mut self, entry_pos: usize, kind: IfdKind) -> Result<()> {
        let bo = self.byte_order;
        let e = slice(self.data, entry_pos, if self.bigtiff { 20 } else { 12 })?;
        let tag = bo.read_u16([e[0], e[1]]);
        let type_raw = bo.read_u16([e[2], e[3]]);
        let type_id = TypeId::from_u16(type_raw)?;

        let (count, value_field, inline_limit, field_pos) = if self.bigtiff {
            let count = bo.read_u64([e[4], e[5], e[6], e[7], e[8], e[9], e[10], e[11]]);
            let value = bo.read_u64([e[12], e[13], e[14], e[15], e[16], e[17], e[18], e[19]]);
            (count, value, 8usize, entry_pos + 12)
        } else {
            let count = bo.read_u32([e[4], e[5], e[6], e[7]]) as u64;
            let value = bo.read_u32([e[8], e[9], e[10], e[11]]) as u64;
            (count, value, 4usize, entry_pos + 8)
        };

        let value_len = type_id
            .size()
            .checked_mul(count as usize)
            .ok_or(Error::ArithmeticOverflow("entry value size"))?;
        // Guard the allocation against the stream itself.
        if value_len > self.data.len() {
            return Err(Error::AllocationTooLarge {
                requested: value_len,
                available: self.data.len(),
            });
        }

        // count * size == inline_limit is still inline; only larger
        // values dereference the offset.
        let value_pos = if value_len <= inline_limit {
            field_pos
        } else {
            let target = value_field as usize;
            slice(self.data, target, value_len)?;
            target
        };
        let bytes = slice(self.data, value_pos, value_len)?;

        self.result.locations.push(EntryLocation {
            group: kind.group(),
            tag,
            type_id,
            count,
            value_pos,
            value_len,
        });

        // Structure-bearing tags descend; everything else is a datum.
        match (kind, tag) {
            (IfdKind::Ifd0, NIKON_PREVIEW_IFD) if self.maker_nested => {
                self.descend_pointers(type_id, bytes, IfdKind::Thumbnail)?;
            }
            (IfdKind::Ifd0, ptr::EXIF_IFD) => {
                self.descend_pointers(type_id, bytes, IfdKind::Exif)?;
            }
            (IfdKind::Ifd0 | IfdKind::Exif, ptr::GPS_IFD) => {
                self.descend_pointers(type_id, bytes, IfdKind::Gps)?;
            }
            (IfdKind::Exif, ptr::IOP_IFD) => {
                self.descend_pointers(type_id, bytes, IfdKind::Iop)?;
            }
            (IfdKind::Ifd0, ptr::SUB_IFDS) => {
                self.descend_pointers(type_id, bytes, IfdKind::SubImage1)?;
            }
            (IfdKind::Ifd0, ptr::IPTC_NAA) => {
                // The IIM stream is stored as LONGs or bytes; the
                // payload is the raw byte run either way.
                match IptcParser::decode(bytes) {
                    Ok(iptc) => self.result.iptc = iptc,
                    Err(err) => warn!(%err, "ignoring unparseable IPTCNAA block"),
                }
            }
            (IfdKind::Ifd0, ptr::ICC_PROFILE) => {
                if pixmeta_icc::is_valid(bytes) {
                    self.result.icc_profile = Some(bytes.to_vec());
                } else {
                    warn!("ignoring invalid ICC profile in tag 0x8773");
                }
            }
            (IfdKind::Ifd0, ptr::XML_PACKET) => {
                self.result.xmp_packet = Some(String::from_utf8_lossy(bytes).into_owned());
            }
            (IfdKind::Exif, ptr::MAKER_NOTE) => {
                // Keep the raw payload; parsed vendor datums are a
                // read-only view alongside it.
                self.add_datum(kind, tag, Value::Undefined(bytes.to_vec()));
                self.parse_maker_note(value_pos, value_len);
            }
            (IfdKind::Exif, ptr::USER_COMMENT) => {
                let comment = CommentValue::read(bytes, bo);
                self.add_datum(kind, tag, Value::Comment(comment));
            }
            _ => {
                let value = Value::read(type_id, bytes, bo)?;
                self.add_datum(kind, tag, value);
                // Both halves of an offsets/byte-counts pair trigger a
                // capture attempt; it completes once both are present.
                match tag {
                    ptr::STRIP_OFFSETS | ptr::STRIP_BYTE_COUNTS => {
                        self.capture_data_area(kind, ptr::STRIP_OFFSETS)?;
                    }
                    ptr::TILE_OFFSETS | ptr::TILE_BYTE_COUNTS => {
                        self.capture_data_area(kind, ptr::TILE_OFFSETS)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Follow each pointer in a nested-IFD entry.
    fn descend_pointers(&mut self, type_id: TypeId, bytes: &[u8], kind: IfdKind) -> Result<()> {
        let value = Value::read(type_id, bytes, self.byte_order)?;
        for i in 0..value.count() {
            let Some(target) = value.to_i64(i) else { continue };
            if target <= 0 {
                continue;
            }
            self.read_ifd(target as u64, kind)?;
        }
        Ok(())
    }

    fn add_datum(&mut self, kind: IfdKind, tag: u16, value: Value) {
        let group = kind.group();
        let key = Key::new(Family::Exif, group.name(), tag_name(tag, group));
        self.result.exif.add_pair(key, value);
    }

    /// Maker-note dispatch; failures degrade to the raw datum only.
    fn parse_maker_note(&mut self, payload_pos: usize, payload_len: usize) {
        let make = self
            .result
            .exif
            .find_tag_group("Make", "Image")
            .map(|d| d.value.to_string())
            .unwrap_or_default();
        let payload = &self.data[payload_pos..payload_pos + payload_len];

        match makernotes::dispatch(payload, &make) {
            MakerDispatch::NestedTiff { kind, header_offset } => {
                let start = payload_pos + header_offset;
                let end = payload_pos + payload_len;
                if start >= end {
                    return;
                }
                // The nested stream is bounded by the note payload; a
                // child must not read past its parent's end.
                match Self::parse_nested(&self.data[start..end], kind) {
                    Ok((datums, preview)) => {
                        for datum in datums {
                            self.result.exif.add(datum);
                        }
                        if let Some(preview) = preview {
                            let key = Key::new(
                                Family::Exif,
                                kind.group().name(),
                                "PreviewImage",
                            );
                            self.result.exif.add_pair(key, Value::Undefined(preview));
                        }
                    }
                    Err(err) => warn!(%err, "maker note nested TIFF parse failed"),
                }
            }
            MakerDispatch::AbsoluteIfd { kind, ifd_offset, byte_order } => {
                let target = payload_pos + ifd_offset;
                let saved_order = self.byte_order;
                if let Some(order) = byte_order {
                    self.byte_order = order;
                }
                if let Err(err) = self.read_ifd(target as u64, kind) {
                    warn!(%err, "maker note IFD parse failed");
                }
                self.byte_order = saved_order;
            }
            MakerDispatch::Opaque => {}
        }
    }

    /// Parse a self-contained nested TIFF (Nikon style maker note).
    ///
    /// Returns the re-homed datums and the embedded preview JPEG, if
    /// the vendor preview IFD named one.
    fn parse_nested(
        data: &[u8],
        kind: IfdKind,
    ) -> Result<(Vec<pixmeta_core::Datum>, Option<Vec<u8>>)> {
        let nested = TiffReader::parse_inner(data, &[42, 43], true)?;
        let group = kind.group();
        let preview = nested.thumbnail;
        let datums = nested
            .exif
            .into_iter()
            .filter(|datum| datum.key.group() != Group::Thumbnail.name())
            .map(|mut datum| {
                // Re-home each datum under the maker group, renaming
                // through the vendor vocabulary.
                let name = pixmeta_tags::tag_by_name(datum.key.tag(), Group::Image)
                    .map(|n| tag_name(n, group))
                    .unwrap_or_else(|| datum.key.tag().to_string());
                datum.key = Key::new(Family::Exif, group.name(), name);
                datum
            })
            .collect();
        Ok((datums, preview))
    }

    /// Capture strip/tile payloads so a rebuild can relocate them.
    fn capture_data_area(&mut self, kind: IfdKind, offsets_tag: u16) -> Result<()> {
        let group = kind.group();
        if self
            .result
            .data_areas
            .iter()
            .any(|a| a.group == group && a.offsets_tag == offsets_tag)
        {
            return Ok(());
        }
        let counts_tag = if offsets_tag == ptr::STRIP_OFFSETS {
            ptr::STRIP_BYTE_COUNTS
        } else {
            ptr::TILE_BYTE_COUNTS
        };
        let offsets = self
            .result
            .exif
            .find_tag_group(&tag_name(offsets_tag, group), group.name())
            .map(|d| d.value.clone());
        let counts = self
            .result
            .exif
            .find_tag_group(&tag_name(counts_tag, group), group.name())
            .map(|d| d.value.clone());
        let (Some(offsets), Some(counts)) = (offsets, counts) else {
            // The byte-counts entry may simply not have been read yet;
            // the second of the pair triggers the capture.
            return Ok(());
        };
        if offsets.count() != counts.count() {
            return Err(Error::CorruptedMetadata("TIFF"));
        }
        let mut chunks = Vec::with_capacity(offsets.count());
        for i in 0..offsets.count() {
            let (Some(offset), Some(len)) = (offsets.to_i64(i), counts.to_i64(i)) else {
                return Err(Error::CorruptedMetadata("TIFF"));
            };
            chunks.push(slice(self.data, offset as usize, len as usize)?.to_vec());
        }
        self.result.data_areas.push(DataArea {
            group,
            offsets_tag,
            chunks,
        });
        Ok(())
    }

    /// Copy the IFD1 thumbnail bytes out of the stream.
    fn capture_thumbnail(&mut self) {
        let offset = self
            .result
            .exif
            .find_tag_group("JPEGInterchangeFormat", "Thumbnail")
            .and_then(|d| d.value.to_i64(0));
        let len = self
            .result
            .exif
            .find_tag_group("JPEGInterchangeFormatLength", "Thumbnail")
            .and_then(|d| d.value.to_i64(0));
        if let (Some(offset), Some(len)) = (offset, len) {
            if let Ok(bytes) = slice(self.data, offset as usize, len as usize) {
                self.result.thumbnail = Some(bytes.to_vec());
            }
        }
    }

    fn capture_dimensions(&mut self) {
        let dim = |tag: &str, group: &str| -> Option<u32> {
            self.result
                .exif
                .find_tag_group(tag, group)
                .and_then(|d| d.value.to_u32(0))
        };
        self.result.pixel_width = dim("ImageWidth", "Image")
            .or_else(|| dim("PixelXDimension", "Photo"))
            .unwrap_or(0);
        self.result.pixel_height = dim("ImageLength", "Image")
            .or_else(|| dim("PixelYDimension", "Photo"))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal little-endian TIFF with one IFD0 entry
    /// (Orientation = 6) and a self-referencing variant for the cycle
    /// test.
    fn tiny_tiff(next_ifd: u32) -> Vec<u8> {
        let mut t = vec![
            0x49, 0x49, 0x2a, 0x00, // II, 42
            0x08, 0x00, 0x00, 0x00, // IFD0 at 8
        ];
        t.extend_from_slice(&1u16.to_le_bytes()); // one entry
        t.extend_from_slice(&0x0112u16.to_le_bytes()); // Orientation
        t.extend_from_slice(&3u16.to_le_bytes()); // SHORT
        t.extend_from_slice(&1u32.to_le_bytes()); // count
        t.extend_from_slice(&6u32.to_le_bytes()); // value inline
        t.extend_from_slice(&next_ifd.to_le_bytes());
        t
    }

    #[test]
    fn parses_minimal_ifd() {
        let result = TiffReader::parse(&tiny_tiff(0)).unwrap();
        assert_eq!(result.byte_order, ByteOrder::Little);
        let key = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(result.exif.find_key(&key).unwrap().value, Value::Short(vec![6]));
    }

    #[test]
    fn rejects_self_referencing_chain() {
        // next-IFD pointer loops back to IFD0
        let err = TiffReader::parse(&tiny_tiff(8)).unwrap_err();
        assert!(matches!(err, Error::CorruptedMetadata("TIFF")));
    }

    #[test]
    fn rejects_oversized_directory() {
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        t.extend_from_slice(&501u16.to_le_bytes());
        t.resize(t.len() + 501 * 12 + 4, 0);
        let err = TiffReader::parse(&t).unwrap_err();
        assert!(matches!(err, Error::TooManyIfdEntries { count: 501, .. }));
    }

    #[test]
    fn rejects_unknown_entry_type() {
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        t.extend_from_slice(&1u16.to_le_bytes());
        t.extend_from_slice(&0x0112u16.to_le_bytes());
        t.extend_from_slice(&14u16.to_le_bytes()); // not a valid type
        t.extend_from_slice(&1u32.to_le_bytes());
        t.extend_from_slice(&6u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            TiffReader::parse(&t).unwrap_err(),
            Error::InvalidTypeValue(14)
        ));
    }

    #[test]
    fn empty_ifd_is_valid() {
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        t.extend_from_slice(&0u16.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        let result = TiffReader::parse(&t).unwrap();
        assert!(result.exif.is_empty());
    }

    #[test]
    fn four_byte_value_stays_inline() {
        // LONG count 1: exactly 4 bytes, must not dereference.
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        t.extend_from_slice(&1u16.to_le_bytes());
        t.extend_from_slice(&0x0100u16.to_le_bytes()); // ImageWidth
        t.extend_from_slice(&4u16.to_le_bytes()); // LONG
        t.extend_from_slice(&1u32.to_le_bytes());
        // A value that would be a wildly out-of-range offset.
        t.extend_from_slice(&0xffff_fff0u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        let result = TiffReader::parse(&t).unwrap();
        let key = Key::parse("Exif.Image.ImageWidth").unwrap();
        assert_eq!(
            result.exif.find_key(&key).unwrap().value,
            Value::Long(vec![0xffff_fff0])
        );
    }

    #[test]
    fn value_offset_out_of_bounds_is_an_error() {
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        t.extend_from_slice(&1u16.to_le_bytes());
        t.extend_from_slice(&0x010fu16.to_le_bytes()); // Make
        t.extend_from_slice(&2u16.to_le_bytes()); // ASCII
        t.extend_from_slice(&64u32.to_le_bytes()); // 64 chars, not inline
        t.extend_from_slice(&0x0000_1000u32.to_le_bytes()); // way past EOF
        t.extend_from_slice(&0u32.to_le_bytes());
        assert!(TiffReader::parse(&t).is_err());
    }

    #[test]
    fn big_endian_round() {
        let mut t = vec![
            0x4d, 0x4d, 0x00, 0x2a, // MM, 42
            0x00, 0x00, 0x00, 0x08,
        ];
        t.extend_from_slice(&1u16.to_be_bytes());
        t.extend_from_slice(&0x0112u16.to_be_bytes());
        t.extend_from_slice(&3u16.to_be_bytes());
        t.extend_from_slice(&1u32.to_be_bytes());
        t.extend_from_slice(&(6u32 << 16).to_be_bytes()); // SHORT in upper bytes
        t.extend_from_slice(&0u32.to_be_bytes());
        let result = TiffReader::parse(&t).unwrap();
        let key = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(result.exif.find_key(&key).unwrap().value, Value::Short(vec![6]));
    }

    /// A type-3 Nikon note: signature, version, then a complete TIFF
    /// whose IFD0 points at a preview IFD with an embedded JPEG.
    fn nikon_note_payload() -> Vec<u8> {
        let mut n = vec![0x49, 0x49, 0x2a, 0x00, 8, 0, 0, 0];
        n.extend_from_slice(&1u16.to_le_bytes());
        n.extend_from_slice(&0x0011u16.to_le_bytes()); // preview pointer
        n.extend_from_slice(&4u16.to_le_bytes());
        n.extend_from_slice(&1u32.to_le_bytes());
        n.extend_from_slice(&26u32.to_le_bytes());
        n.extend_from_slice(&0u32.to_le_bytes());
        // preview IFD at 26
        n.extend_from_slice(&2u16.to_le_bytes());
        n.extend_from_slice(&0x0201u16.to_le_bytes());
        n.extend_from_slice(&4u16.to_le_bytes());
        n.extend_from_slice(&1u32.to_le_bytes());
        n.extend_from_slice(&56u32.to_le_bytes());
        n.extend_from_slice(&0x0202u16.to_le_bytes());
        n.extend_from_slice(&4u16.to_le_bytes());
        n.extend_from_slice(&1u32.to_le_bytes());
        n.extend_from_slice(&4u32.to_le_bytes());
        n.extend_from_slice(&0u32.to_le_bytes());
        n.extend_from_slice(&[0xff, 0xd8, 0xff, 0xd9]); // at 56

        let mut payload = b"Nikon\0\x02\x10\0\0".to_vec();
        payload.extend_from_slice(&n);
        payload
    }

    #[test]
    fn nikon_maker_note_yields_preview() {
        let payload = nikon_note_payload();
        let mut t = vec![0x49, 0x49, 0x2a, 0x00, 8, 0, 0, 0];
        t.extend_from_slice(&2u16.to_le_bytes());
        // Make = "NIKON", out of line at 38
        t.extend_from_slice(&0x010fu16.to_le_bytes());
        t.extend_from_slice(&2u16.to_le_bytes());
        t.extend_from_slice(&6u32.to_le_bytes());
        t.extend_from_slice(&38u32.to_le_bytes());
        // Exif IFD pointer at 44
        t.extend_from_slice(&0x8769u16.to_le_bytes());
        t.extend_from_slice(&4u16.to_le_bytes());
        t.extend_from_slice(&1u32.to_le_bytes());
        t.extend_from_slice(&44u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t.extend_from_slice(b"NIKON\0");
        // Exif IFD: one MakerNote entry, payload at 62
        t.extend_from_slice(&1u16.to_le_bytes());
        t.extend_from_slice(&0x927cu16.to_le_bytes());
        t.extend_from_slice(&7u16.to_le_bytes());
        t.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        t.extend_from_slice(&62u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t.extend_from_slice(&payload);

        let result = TiffReader::parse(&t).unwrap();

        // The raw note survives as a datum.
        let note = Key::parse("Exif.Photo.MakerNote").unwrap();
        assert_eq!(
            result.exif.find_key(&note).unwrap().value,
            Value::Undefined(payload)
        );
        // And the embedded preview was pulled out of the nested TIFF.
        let preview = Key::parse("Exif.Nikon.PreviewImage").unwrap();
        assert_eq!(
            result.exif.find_key(&preview).unwrap().value,
            Value::Undefined(vec![0xff, 0xd8, 0xff, 0xd9])
        );
    }

    #[test]
    fn bigtiff_header_and_entry() {
        let mut t = vec![
            0x49, 0x49, 0x2b, 0x00, // II, 43
            0x08, 0x00, 0x00, 0x00, // offset size 8, reserved 0
        ];
        t.extend_from_slice(&16u64.to_le_bytes()); // IFD0 at 16
        t.extend_from_slice(&1u64.to_le_bytes()); // one entry
        t.extend_from_slice(&0x0112u16.to_le_bytes());
        t.extend_from_slice(&3u16.to_le_bytes());
        t.extend_from_slice(&1u64.to_le_bytes());
        t.extend_from_slice(&6u64.to_le_bytes()); // inline in 8-byte field
        t.extend_from_slice(&0u64.to_le_bytes()); // no next IFD
        let result = TiffReader::parse(&t).unwrap();
        assert!(result.bigtiff);
        let key = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(result.exif.find_key(&key).unwrap().value, Value::Short(vec![6]));
    }
}
