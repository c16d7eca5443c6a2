//! TIFF serialization: in-place patching and full rebuild.
//!
//! The write path first attempts a non-intrusive update: when every
//! changed datum matches its existing entry's type, count, and
//! serialized size, the new bytes are patched over the old ones and
//! nothing else in the file moves. Any structural change falls back
//! to an intrusive rebuild that lays the IFD tree out from scratch:
//! entries in ascending tag order, child IFDs assigned offsets before
//! the parent entries that point to them, out-of-line values in a
//! per-IFD data area, captured pixel blocks relocated to the tail.

use super::reader::{DataArea, EntryLocation, TiffReader};
use super::ptr;
use pixmeta_core::{ByteOrder, Error, ExifData, Result, TypeId, Value};
use pixmeta_tags::Group;
use std::collections::HashMap;
use tracing::{debug, warn};

/// How a write landed on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    /// In-place overwrite; file offsets preserved.
    NonIntrusive,
    /// Full rebuild with fresh offsets.
    Intrusive,
}

/// One entry ready for serialization.
#[derive(Debug, Clone)]
struct RawEntry {
    tag: u16,
    type_id: TypeId,
    count: u64,
    data: Vec<u8>,
}

impl RawEntry {
    fn long(tag: u16, value: u64, byte_order: ByteOrder, bigtiff: bool) -> Self {
        let mut data = Vec::new();
        if bigtiff {
            byte_order.write_u64(&mut data, value);
            RawEntry {
                tag,
                type_id: TypeId::UnsignedLong8,
                count: 1,
                data,
            }
        } else {
            byte_order.write_u32(&mut data, value as u32);
            RawEntry {
                tag,
                type_id: TypeId::UnsignedLong,
                count: 1,
                data,
            }
        }
    }
}

/// TIFF/BigTIFF serializer.
pub struct TiffWriter {
    byte_order: ByteOrder,
    bigtiff: bool,
}

/// The IFDs a rebuild lays out.
#[derive(Default)]
struct Layout {
    ifd0: Vec<RawEntry>,
    exif: Vec<RawEntry>,
    iop: Vec<RawEntry>,
    gps: Vec<RawEntry>,
    sub: Vec<RawEntry>,
    ifd1: Vec<RawEntry>,
}

impl TiffWriter {
    pub fn new(byte_order: ByteOrder, bigtiff: bool) -> Self {
        let byte_order = match byte_order {
            ByteOrder::Invalid => ByteOrder::Little,
            other => other,
        };
        Self { byte_order, bigtiff }
    }

    /// Write metadata over `original`, in place when possible.
    ///
    /// With no metadata at all the result is an empty stream, still
    /// reported as intrusive.
    pub fn write(
        &self,
        original: Option<&[u8]>,
        exif: &ExifData,
        thumbnail: Option<&[u8]>,
    ) -> Result<(Vec<u8>, WriteMethod)> {
        if exif.is_empty() && thumbnail.is_none() {
            return Ok((Vec::new(), WriteMethod::Intrusive));
        }

        let parsed = original.and_then(|data| TiffReader::parse(data).ok());
        if let (Some(data), Some(parsed)) = (original, &parsed) {
            if let Some(patched) = self.try_non_intrusive(data, parsed, exif, thumbnail) {
                debug!("non-intrusive TIFF update");
                return Ok((patched, WriteMethod::NonIntrusive));
            }
        }

        let data_areas: &[DataArea] = parsed.as_ref().map(|p| &p.data_areas[..]).unwrap_or(&[]);
        let thumbnail = thumbnail.or(parsed.as_ref().and_then(|p| p.thumbnail.as_deref()));
        let rebuilt = self.encode(exif, thumbnail, data_areas)?;
        Ok((rebuilt, WriteMethod::Intrusive))
    }

    /// Attempt the in-place fast path; `None` means rebuild.
    fn try_non_intrusive(
        &self,
        original: &[u8],
        parsed: &super::reader::TiffParseResult,
        exif: &ExifData,
        thumbnail: Option<&[u8]>,
    ) -> Option<Vec<u8>> {
        if parsed.byte_order != self.byte_order || parsed.bigtiff != self.bigtiff {
            return None;
        }
        // A thumbnail change always moves bytes.
        if let (Some(new), Some(old)) = (thumbnail, parsed.thumbnail.as_deref()) {
            if new != old {
                return None;
            }
        } else if thumbnail.is_some() != parsed.thumbnail.is_some() {
            return None;
        }

        // The key multiset must be identical; additions and removals
        // change entry counts and force a rebuild.
        let count_keys = |data: &ExifData| {
            let mut m: HashMap<String, usize> = HashMap::new();
            for d in data.iter() {
                *m.entry(d.key.to_string()).or_default() += 1;
            }
            m
        };
        if count_keys(exif) != count_keys(&parsed.exif) {
            return None;
        }

        // Pair each new datum with the old one of the same key, in
        // container order, and collect the patches.
        let mut old_by_key: HashMap<String, Vec<&pixmeta_core::Datum>> = HashMap::new();
        for d in parsed.exif.iter() {
            old_by_key.entry(d.key.to_string()).or_default().push(d);
        }
        let mut cursor: HashMap<String, usize> = HashMap::new();
        let mut patches: Vec<(usize, Vec<u8>)> = Vec::new();

        for datum in exif.iter() {
            let key = datum.key.to_string();
            let idx = cursor.entry(key.clone()).or_default();
            let old = old_by_key.get(&key)?.get(*idx)?;
            *idx += 1;
            if old.value == datum.value {
                continue;
            }
            let location = self.find_location(parsed, datum, *idx - 1)?;
            let bytes = datum.value.to_bytes(self.byte_order);
            let (disk_type, count) = disk_shape(&datum.value, &bytes);
            if disk_type != location.type_id
                || count != location.count
                || bytes.len() != location.value_len
            {
                return None;
            }
            patches.push((location.value_pos, bytes));
        }

        let mut out = original.to_vec();
        for (pos, bytes) in patches {
            out[pos..pos + bytes.len()].copy_from_slice(&bytes);
        }
        Some(out)
    }

    fn find_location<'p>(
        &self,
        parsed: &'p super::reader::TiffParseResult,
        datum: &pixmeta_core::Datum,
        nth: usize,
    ) -> Option<&'p EntryLocation> {
        let group = Group::from_name(datum.key.group())?;
        let tag = pixmeta_tags::tag_by_name(datum.key.tag(), group)?;
        parsed
            .locations
            .iter()
            .filter(|l| l.group == group && l.tag == tag)
            .nth(nth)
    }

    /// Full rebuild of the TIFF stream.
    pub fn encode(
        &self,
        exif: &ExifData,
        thumbnail: Option<&[u8]>,
        data_areas: &[DataArea],
    ) -> Result<Vec<u8>> {
        let mut layout = Layout::default();

        for datum in exif.iter() {
            let Some(group) = Group::from_name(datum.key.group()) else {
                warn!(key = %datum.key, "skipping datum with unknown group");
                continue;
            };
            // Parsed maker datums travel inside the raw MakerNote
            // payload; pointer entries are regenerated below.
            if matches!(
                group,
                Group::MakerNikon | Group::MakerSony | Group::MakerCanon
            ) {
                continue;
            }
            let Some(tag) = pixmeta_tags::tag_by_name(datum.key.tag(), group) else {
                warn!(key = %datum.key, "skipping datum with unresolvable tag");
                continue;
            };
            if matches!(
                tag,
                ptr::EXIF_IFD | ptr::GPS_IFD | ptr::IOP_IFD | ptr::SUB_IFDS
            ) {
                continue;
            }
            let target = match group {
                Group::Image => &mut layout.ifd0,
                Group::Photo => &mut layout.exif,
                Group::Iop => &mut layout.iop,
                Group::GpsInfo => &mut layout.gps,
                Group::SubImage1 => &mut layout.sub,
                Group::Thumbnail => &mut layout.ifd1,
                _ => unreachable!(),
            };
            let data = datum.value.to_bytes(self.byte_order);
            let (type_id, count) = disk_shape(&datum.value, &data);
            target.push(RawEntry {
                tag,
                type_id,
                count,
                data,
            });
        }

        // Thumbnail location entries are regenerated from the actual
        // bytes rather than trusted from the datums.
        layout
            .ifd1
            .retain(|e| e.tag != ptr::JPEG_IF && e.tag != ptr::JPEG_IF_LENGTH);
        if let Some(thumb) = thumbnail {
            layout.ifd1.push(RawEntry::long(
                ptr::JPEG_IF,
                0,
                self.byte_order,
                self.bigtiff,
            ));
            layout.ifd1.push(RawEntry::long(
                ptr::JPEG_IF_LENGTH,
                thumb.len() as u64,
                self.byte_order,
                self.bigtiff,
            ));
        }

        // Pointer entries, placeholders for now.
        if !layout.exif.is_empty() || !layout.iop.is_empty() {
            layout
                .ifd0
                .push(RawEntry::long(ptr::EXIF_IFD, 0, self.byte_order, self.bigtiff));
        }
        if !layout.gps.is_empty() {
            layout
                .ifd0
                .push(RawEntry::long(ptr::GPS_IFD, 0, self.byte_order, self.bigtiff));
        }
        if !layout.sub.is_empty() {
            layout
                .ifd0
                .push(RawEntry::long(ptr::SUB_IFDS, 0, self.byte_order, self.bigtiff));
        }
        if !layout.iop.is_empty() {
            layout
                .exif
                .push(RawEntry::long(ptr::IOP_IFD, 0, self.byte_order, self.bigtiff));
        }

        // Fold data-area entries in as correctly-sized placeholders
        // before sizing; the offsets are filled once layout is fixed.
        let elem_type = if self.bigtiff {
            TypeId::UnsignedLong8
        } else {
            TypeId::UnsignedLong
        };
        let elem_len = elem_type.size();
        for area in data_areas {
            let target = match area.group {
                Group::Image => &mut layout.ifd0,
                Group::SubImage1 => &mut layout.sub,
                Group::Thumbnail => &mut layout.ifd1,
                _ => continue,
            };
            let counts_tag = if area.offsets_tag == ptr::STRIP_OFFSETS {
                ptr::STRIP_BYTE_COUNTS
            } else {
                ptr::TILE_BYTE_COUNTS
            };
            let n = area.chunks.len();
            replace_entry(target, RawEntry {
                tag: area.offsets_tag,
                type_id: elem_type,
                count: n as u64,
                data: vec![0; n * elem_len],
            });
            replace_entry(target, RawEntry {
                tag: counts_tag,
                type_id: elem_type,
                count: n as u64,
                data: vec![0; n * elem_len],
            });
        }

        for ifd in layout.all_mut() {
            ifd.sort_by_key(|e| e.tag);
        }

        // Offsets, children after their structural parent so every
        // pointer value is known before serialization starts. IFD0 is
        // always present; a bare thumbnail still chains through it.
        let header_len = if self.bigtiff { 16 } else { 8 };
        let ifd0_off = header_len as u64;
        let exif_off = ifd0_off + self.ifd_size(&layout.ifd0, true)?;
        let iop_off = exif_off + self.ifd_size(&layout.exif, false)?;
        let gps_off = iop_off + self.ifd_size(&layout.iop, false)?;
        let sub_off = gps_off + self.ifd_size(&layout.gps, false)?;
        let ifd1_off = sub_off + self.ifd_size(&layout.sub, false)?;
        let has_ifd1 = !layout.ifd1.is_empty();
        let thumb_off = ifd1_off + self.ifd_size(&layout.ifd1, false)?;
        let mut tail_off = thumb_off + thumbnail.map(|t| pad_even(t.len()) as u64).unwrap_or(0);

        self.patch_pointer(&mut layout.ifd0, ptr::EXIF_IFD, exif_off);
        self.patch_pointer(&mut layout.exif, ptr::IOP_IFD, iop_off);
        self.patch_pointer(&mut layout.ifd0, ptr::GPS_IFD, gps_off);
        self.patch_pointer(&mut layout.ifd0, ptr::SUB_IFDS, sub_off);
        self.patch_pointer(&mut layout.ifd1, ptr::JPEG_IF, thumb_off);

        // Relocate the pixel blocks to the tail and fill in the real
        // offsets and byte counts.
        let mut tail: Vec<u8> = Vec::new();
        for area in data_areas {
            let target = match area.group {
                Group::Image => &mut layout.ifd0,
                Group::SubImage1 => &mut layout.sub,
                Group::Thumbnail => &mut layout.ifd1,
                _ => continue,
            };
            let counts_tag = if area.offsets_tag == ptr::STRIP_OFFSETS {
                ptr::STRIP_BYTE_COUNTS
            } else {
                ptr::TILE_BYTE_COUNTS
            };
            let mut offsets: Vec<u8> = Vec::new();
            let mut counts: Vec<u8> = Vec::new();
            for chunk in &area.chunks {
                if self.bigtiff {
                    self.byte_order.write_u64(&mut offsets, tail_off);
                    self.byte_order.write_u64(&mut counts, chunk.len() as u64);
                } else {
                    self.byte_order.write_u32(&mut offsets, tail_off as u32);
                    self.byte_order.write_u32(&mut counts, chunk.len() as u32);
                }
                tail.extend_from_slice(chunk);
                if chunk.len() % 2 != 0 {
                    tail.push(0);
                }
                tail_off += pad_even(chunk.len()) as u64;
            }
            if let Some(entry) = target.iter_mut().find(|e| e.tag == area.offsets_tag) {
                entry.data = offsets;
            }
            if let Some(entry) = target.iter_mut().find(|e| e.tag == counts_tag) {
                entry.data = counts;
            }
        }

        let mut out = Vec::with_capacity(tail_off as usize + tail.len());
        self.write_header(&mut out, ifd0_off);
        self.write_ifd(
            &mut out,
            &layout.ifd0,
            ifd0_off,
            if has_ifd1 { ifd1_off } else { 0 },
            true,
        )?;
        self.write_ifd(&mut out, &layout.exif, exif_off, 0, false)?;
        self.write_ifd(&mut out, &layout.iop, iop_off, 0, false)?;
        self.write_ifd(&mut out, &layout.gps, gps_off, 0, false)?;
        self.write_ifd(&mut out, &layout.sub, sub_off, 0, false)?;
        self.write_ifd(&mut out, &layout.ifd1, ifd1_off, 0, false)?;
        if let Some(thumb) = thumbnail {
            out.extend_from_slice(thumb);
            if thumb.len() % 2 != 0 {
                out.push(0);
            }
        }
        out.extend_from_slice(&tail);
        Ok(out)
    }

    fn write_header(&self, out: &mut Vec<u8>, ifd0_off: u64) {
        out.extend_from_slice(&self.byte_order.marker());
        if self.bigtiff {
            self.byte_order.write_u16(out, 43);
            self.byte_order.write_u16(out, 8);
            self.byte_order.write_u16(out, 0);
            self.byte_order.write_u64(out, ifd0_off);
        } else {
            self.byte_order.write_u16(out, 42);
            self.byte_order.write_u32(out, ifd0_off as u32);
        }
    }

    fn entry_len(&self) -> usize {
        if self.bigtiff {
            20
        } else {
            12
        }
    }

    fn inline_limit(&self) -> usize {
        if self.bigtiff {
            8
        } else {
            4
        }
    }

    /// Size of an IFD including its data area; 0 for an absent IFD.
    fn ifd_size(&self, entries: &[RawEntry], always_present: bool) -> Result<u64> {
        if entries.is_empty() && !always_present {
            return Ok(0);
        }
        let struct_size = if self.bigtiff {
            8 + entries.len() * 20 + 8
        } else {
            2 + entries.len() * 12 + 4
        };
        let data_size: usize = entries
            .iter()
            .filter(|e| e.data.len() > self.inline_limit())
            .map(|e| pad_even(e.data.len()))
            .sum();
        let total = struct_size + data_size;
        if !self.bigtiff && total > u32::MAX as usize {
            return Err(Error::TiffDirectoryTooLarge(total));
        }
        Ok(total as u64)
    }

    fn patch_pointer(&self, entries: &mut [RawEntry], tag: u16, offset: u64) {
        if let Some(entry) = entries.iter_mut().find(|e| e.tag == tag) {
            entry.data.clear();
            if self.bigtiff {
                self.byte_order.write_u64(&mut entry.data, offset);
            } else {
                self.byte_order.write_u32(&mut entry.data, offset as u32);
            }
        }
    }

    fn write_ifd(
        &self,
        out: &mut Vec<u8>,
        entries: &[RawEntry],
        ifd_offset: u64,
        next_ifd: u64,
        always_present: bool,
    ) -> Result<()> {
        if entries.is_empty() && !always_present {
            return Ok(());
        }
        debug_assert_eq!(out.len() as u64, ifd_offset, "IFD landing offset mismatch");

        if self.bigtiff {
            self.byte_order.write_u64(out, entries.len() as u64);
        } else {
            self.byte_order.write_u16(out, entries.len() as u16);
        }

        let struct_size = if self.bigtiff {
            8 + entries.len() * 20 + 8
        } else {
            2 + entries.len() * 12 + 4
        };
        let mut data_off = ifd_offset + struct_size as u64;
        let mut data_area: Vec<u8> = Vec::new();

        for entry in entries {
            self.byte_order.write_u16(out, entry.tag);
            let disk_type = entry
                .type_id
                .to_u16()
                .ok_or(Error::InvalidTypeValue(0))?;
            self.byte_order.write_u16(out, disk_type);
            if self.bigtiff {
                self.byte_order.write_u64(out, entry.count);
            } else {
                self.byte_order.write_u32(out, entry.count as u32);
            }

            if entry.data.len() <= self.inline_limit() {
                let mut inline = entry.data.clone();
                inline.resize(self.inline_limit(), 0);
                out.extend_from_slice(&inline);
            } else {
                if self.bigtiff {
                    self.byte_order.write_u64(out, data_off);
                } else {
                    self.byte_order.write_u32(out, data_off as u32);
                }
                data_area.extend_from_slice(&entry.data);
                if entry.data.len() % 2 != 0 {
                    data_area.push(0);
                }
                data_off += pad_even(entry.data.len()) as u64;
            }
        }

        if self.bigtiff {
            self.byte_order.write_u64(out, next_ifd);
        } else {
            self.byte_order.write_u32(out, next_ifd as u32);
        }
        out.extend_from_slice(&data_area);
        Ok(())
    }
}

impl Layout {
    fn all_mut(&mut self) -> [&mut Vec<RawEntry>; 6] {
        [
            &mut self.ifd0,
            &mut self.exif,
            &mut self.iop,
            &mut self.gps,
            &mut self.sub,
            &mut self.ifd1,
        ]
    }
}

/// On-disk type and component count for a value.
fn disk_shape(value: &Value, bytes: &[u8]) -> (TypeId, u64) {
    match value.type_id().to_u16() {
        Some(_) => {
            let count = match value {
                Value::Ascii(_) | Value::Undefined(_) | Value::Byte(_) | Value::SByte(_) => {
                    bytes.len() as u64
                }
                other => other.count() as u64,
            };
            (value.type_id(), count)
        }
        // In-memory shapes serialize as raw bytes.
        None => (TypeId::Undefined, bytes.len() as u64),
    }
}

fn replace_entry(entries: &mut Vec<RawEntry>, entry: RawEntry) {
    entries.retain(|e| e.tag != entry.tag);
    let pos = entries
        .iter()
        .position(|e| e.tag > entry.tag)
        .unwrap_or(entries.len());
    entries.insert(pos, entry);
}

fn pad_even(len: usize) -> usize {
    len + (len % 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Family, Key};

    fn datum(key: &str, value: Value) -> pixmeta_core::Datum {
        pixmeta_core::Datum::new(Key::parse(key).unwrap(), value)
    }

    fn sample_exif() -> ExifData {
        let mut exif = ExifData::new();
        exif.add(datum("Exif.Image.Make", Value::Ascii("PixCam".into())));
        exif.add(datum("Exif.Image.Orientation", Value::Short(vec![1])));
        exif.add(datum(
            "Exif.Photo.ISOSpeedRatings",
            Value::Short(vec![400]),
        ));
        exif.add(datum(
            "Exif.Photo.ExposureTime",
            Value::Rational(vec![pixmeta_core::URational::new(1, 250)]),
        ));
        exif.add(datum(
            "Exif.GPSInfo.GPSLatitudeRef",
            Value::Ascii("N".into()),
        ));
        exif
    }

    #[test]
    fn rebuild_then_reparse_preserves_datums() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let bytes = writer.encode(&exif, None, &[]).unwrap();

        let parsed = TiffReader::parse(&bytes).unwrap();
        for datum in exif.iter() {
            let found = parsed.exif.find_key(&datum.key);
            assert_eq!(found.map(|d| &d.value), Some(&datum.value), "{}", datum.key);
        }
    }

    #[test]
    fn entries_are_in_ascending_tag_order() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let bytes = writer.encode(&exif, None, &[]).unwrap();

        // IFD0 at 8: read tags in sequence.
        let n = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let mut last = 0u16;
        for i in 0..n {
            let pos = 10 + i * 12;
            let tag = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
            assert!(tag > last || i == 0, "tags out of order");
            last = tag;
        }
    }

    #[test]
    fn reparse_is_a_fixed_point() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Big, false);
        let bytes = writer.encode(&exif, None, &[]).unwrap();
        let parsed = TiffReader::parse(&bytes).unwrap();
        let bytes2 = writer.encode(&parsed.exif, None, &[]).unwrap();
        assert_eq!(bytes, bytes2);
    }

    #[test]
    fn orientation_update_is_non_intrusive() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let original = writer.encode(&exif, None, &[]).unwrap();

        let mut updated = TiffReader::parse(&original).unwrap().exif;
        let key = Key::parse("Exif.Image.Orientation").unwrap();
        updated.find_key_mut(&key).unwrap().value = Value::Short(vec![6]);

        let (out, method) = writer.write(Some(&original), &updated, None).unwrap();
        assert_eq!(method, WriteMethod::NonIntrusive);
        assert_eq!(out.len(), original.len());

        let reparsed = TiffReader::parse(&out).unwrap();
        assert_eq!(
            reparsed.exif.find_key(&key).unwrap().value,
            Value::Short(vec![6])
        );
        // Everything else is byte-identical.
        let diff: Vec<usize> = original
            .iter()
            .zip(out.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(diff.len(), 1, "only the orientation value byte changed");
    }

    #[test]
    fn adding_a_tag_forces_rebuild() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let original = writer.encode(&exif, None, &[]).unwrap();

        let mut updated = TiffReader::parse(&original).unwrap().exif;
        updated.add(datum("Exif.Image.Software", Value::Ascii("pixmeta".into())));

        let (out, method) = writer.write(Some(&original), &updated, None).unwrap();
        assert_eq!(method, WriteMethod::Intrusive);
        let reparsed = TiffReader::parse(&out).unwrap();
        let key = Key::parse("Exif.Image.Software").unwrap();
        assert_eq!(
            reparsed.exif.find_key(&key).unwrap().value.to_string(),
            "pixmeta"
        );
    }

    #[test]
    fn resizing_a_string_forces_rebuild() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let original = writer.encode(&exif, None, &[]).unwrap();

        let mut updated = TiffReader::parse(&original).unwrap().exif;
        let key = Key::parse("Exif.Image.Make").unwrap();
        updated.find_key_mut(&key).unwrap().value =
            Value::Ascii("A considerably longer camera make".into());

        let (out, method) = writer.write(Some(&original), &updated, None).unwrap();
        assert_eq!(method, WriteMethod::Intrusive);
        let reparsed = TiffReader::parse(&out).unwrap();
        assert_eq!(
            reparsed.exif.find_key(&key).unwrap().value.to_string(),
            "A considerably longer camera make"
        );
    }

    #[test]
    fn no_metadata_writes_nothing_and_reports_intrusive() {
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let (out, method) = writer.write(None, &ExifData::new(), None).unwrap();
        assert!(out.is_empty());
        assert_eq!(method, WriteMethod::Intrusive);
    }

    #[test]
    fn thumbnail_round_trip() {
        let mut exif = sample_exif();
        exif.add(datum("Exif.Thumbnail.Compression", Value::Short(vec![6])));
        let thumb = vec![0xff, 0xd8, 0xff, 0xd9];
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let bytes = writer.encode(&exif, Some(&thumb), &[]).unwrap();

        let parsed = TiffReader::parse(&bytes).unwrap();
        assert_eq!(parsed.thumbnail.as_deref(), Some(&thumb[..]));
    }

    #[test]
    fn bigtiff_encode_parses_back() {
        let exif = sample_exif();
        let writer = TiffWriter::new(ByteOrder::Little, true);
        let bytes = writer.encode(&exif, None, &[]).unwrap();
        let parsed = TiffReader::parse(&bytes).unwrap();
        assert!(parsed.bigtiff);
        for datum in exif.iter() {
            assert!(parsed.exif.find_key(&datum.key).is_some(), "{}", datum.key);
        }
    }

    #[test]
    fn strip_data_relocates() {
        let mut exif = ExifData::new();
        exif.add(datum("Exif.Image.ImageWidth", Value::Long(vec![2])));
        exif.add(datum("Exif.Image.ImageLength", Value::Long(vec![2])));
        exif.add(datum("Exif.Image.StripOffsets", Value::Long(vec![0])));
        exif.add(datum("Exif.Image.StripByteCounts", Value::Long(vec![4])));
        let areas = vec![DataArea {
            group: Group::Image,
            offsets_tag: ptr::STRIP_OFFSETS,
            chunks: vec![vec![9, 8, 7, 6]],
        }];
        let writer = TiffWriter::new(ByteOrder::Little, false);
        let bytes = writer.encode(&exif, None, &areas).unwrap();

        let parsed = TiffReader::parse(&bytes).unwrap();
        assert_eq!(parsed.data_areas.len(), 1);
        assert_eq!(parsed.data_areas[0].chunks, vec![vec![9, 8, 7, 6]]);
    }
}
