//! BMFF / ISO base-media handler (HEIF, AVIF, CR3, JXL container).
//!
//! Box structure: u32 big-endian size (0 = to end of file, 1 = a
//! u64 largesize follows), 4-byte type, body. Super-boxes recurse
//! into child boxes; `meta` and friends are full boxes whose version
//! and flags precede the children. Exif and XMP arrive three ways:
//! `uuid` boxes with the well-known UUIDs, HEIF items mapped through
//! `iinf`/`iloc`, and Canon's CMT boxes inside the CR3 uuid.
//!
//! Metadata here is read-only; rewriting BMFF item offsets is out of
//! scope for the handlers.

use crate::tiff::TiffReader;
use crate::traits::{AccessMode, ImageHandler};
use crate::utils::slice;
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};
use std::collections::HashSet;
use tracing::warn;

/// XMP packet uuid (be7acfcb-97a9-42e8-9c71-999491e3afac).
const UUID_XMP: [u8; 16] = [
    0xbe, 0x7a, 0xcf, 0xcb, 0x97, 0xa9, 0x42, 0xe8, 0x9c, 0x71, 0x99, 0x94, 0x91, 0xe3, 0xaf,
    0xac,
];
/// Canon CR3 metadata container uuid.
const UUID_CR3_META: [u8; 16] = [
    0x85, 0xc0, 0xb6, 0x87, 0x82, 0x0f, 0x11, 0xe0, 0x81, 0x11, 0xf4, 0xce, 0x46, 0x2b, 0x6a,
    0x48,
];
/// Plain Exif payload uuid used by some writers.
const UUID_EXIF: [u8; 16] = [
    0x05, 0x37, 0xcd, 0xab, 0x9d, 0x0c, 0x44, 0x31, 0xa7, 0x2a, 0xfa, 0x56, 0x1f, 0x2a, 0x11,
    0x3e,
];

const MAX_DEPTH: usize = 100;

/// BMFF container handler.
pub struct BmffHandler;

#[derive(Default)]
struct Walk {
    visited: HashSet<u64>,
    exif_item: Option<u32>,
    xmp_item: Option<u32>,
    items: Vec<(u32, u64, u64)>,
}

impl ImageHandler for BmffHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 12 && &header[4..8] == b"ftyp"
    }

    fn format_name(&self) -> &'static str {
        "BMFF"
    }

    fn mime_type(&self) -> &'static str {
        "image/heif"
    }

    fn access_mode(&self, family: Family) -> AccessMode {
        match family {
            Family::Iptc => AccessMode::None,
            _ => AccessMode::Read,
        }
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let mut walk = Walk::default();
        walk_boxes(data, 0, data.len(), 0, &mut walk, state)?;

        // Resolve HEIF items once the whole tree is known.
        let resolve = |walk: &Walk, wanted: Option<u32>| -> Option<(u64, u64)> {
            let id = wanted?;
            walk.items
                .iter()
                .find(|(item, _, _)| *item == id)
                .map(|&(_, off, len)| (off, len))
        };
        if state.exif.is_empty() {
            if let Some((off, len)) = resolve(&walk, walk.exif_item) {
                if let Ok(payload) = slice(data, off as usize, len as usize) {
                    read_exif_item(payload, state);
                }
            }
        }
        if state.xmp_packet.is_none() {
            if let Some((off, len)) = resolve(&walk, walk.xmp_item) {
                if let Ok(payload) = slice(data, off as usize, len as usize) {
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(payload).into_owned());
                }
            }
        }
        Ok(())
    }

    fn write_metadata(&self, _data: &[u8], _state: &ImageState) -> Result<Vec<u8>> {
        Err(Error::FormatUnsupportedForWrite("BMFF"))
    }
}

/// Recurse through the boxes of `[start, end)`.
fn walk_boxes(
    data: &[u8],
    start: usize,
    end: usize,
    depth: usize,
    walk: &mut Walk,
    state: &mut ImageState,
) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(Error::CorruptedMetadata("BMFF"));
    }
    let mut pos = start;
    while pos + 8 <= end {
        // The same offset seen twice is a cycle.
        if !walk.visited.insert(pos as u64) {
            return Err(Error::CorruptedMetadata("BMFF"));
        }
        let header = slice(data, pos, 8)?;
        let size32 =
            u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;
        let kind: [u8; 4] = [header[4], header[5], header[6], header[7]];

        let (body_start, box_size) = match size32 {
            0 => (pos + 8, (end - pos) as u64),
            1 => {
                let large = slice(data, pos + 8, 8)?;
                let size = u64::from_be_bytes([
                    large[0], large[1], large[2], large[3], large[4], large[5], large[6],
                    large[7],
                ]);
                (pos + 16, size)
            }
            s => (pos + 8, s),
        };
        let header_len = (body_start - pos) as u64;
        if box_size < header_len || pos as u64 + box_size > end as u64 {
            return Err(Error::CorruptedMetadata("BMFF"));
        }
        let body_end = pos + box_size as usize;
        let body = &data[body_start..body_end];

        match &kind {
            // Super-boxes: children fill the body.
            b"moov" | b"trak" | b"mdia" | b"minf" | b"dinf" | b"iprp" | b"ipco" => {
                walk_boxes(data, body_start, body_end, depth + 1, walk, state)?;
            }
            // Full super-boxes: version + flags, then children.
            b"meta" => {
                walk_boxes(data, body_start + 4, body_end, depth + 1, walk, state)?;
            }
            b"iinf" => parse_iinf(body, walk),
            b"iloc" => {
                // Truncated tables are ignored, not fatal.
                let _ = parse_iloc(body, walk);
            }
            b"ispe" => {
                if body.len() >= 12 && state.pixel_width == 0 {
                    state.pixel_width =
                        u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
                    state.pixel_height =
                        u32::from_be_bytes([body[8], body[9], body[10], body[11]]);
                }
            }
            b"uuid" if body.len() >= 16 => {
                let uuid: [u8; 16] = body[..16].try_into().unwrap();
                let payload = &body[16..];
                if uuid == UUID_XMP {
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(payload).into_owned());
                } else if uuid == UUID_EXIF {
                    read_exif_item(payload, state);
                } else if uuid == UUID_CR3_META {
                    walk_boxes(data, body_start + 16, body_end, depth + 1, walk, state)?;
                }
            }
            // Canon CR3 metadata boxes: TIFF streams.
            b"CMT1" | b"CMT2" | b"CMT3" | b"CMT4" => match TiffReader::parse(body) {
                Ok(parsed) => {
                    state.byte_order = parsed.byte_order;
                    for datum in parsed.exif.into_iter() {
                        state.exif.add(datum);
                    }
                }
                Err(err) => warn!(%err, "invalid CMT box"),
            },
            _ => {}
        }
        pos = body_end;
    }
    Ok(())
}

/// An Exif payload with the HEIF 4-byte header offset prefix.
fn read_exif_item(payload: &[u8], state: &mut ImageState) {
    let tiff = if payload.len() >= 4 {
        let skip = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
        // The prefix counts bytes to the TIFF header, the Exif APP1
        // marker included when present.
        let candidate = payload.get(4 + skip..).unwrap_or_default();
        let candidate = candidate
            .strip_prefix(b"Exif\0\0".as_slice())
            .unwrap_or(candidate);
        if candidate.starts_with(b"II") || candidate.starts_with(b"MM") {
            candidate
        } else if payload[4..].starts_with(b"Exif\0\0") {
            &payload[10..]
        } else {
            &payload[4..]
        }
    } else {
        payload
    };
    match TiffReader::parse(tiff) {
        Ok(parsed) => {
            state.exif = parsed.exif;
            state.byte_order = parsed.byte_order;
            state.thumbnail = parsed.thumbnail;
            if state.pixel_width == 0 {
                state.pixel_width = parsed.pixel_width;
                state.pixel_height = parsed.pixel_height;
            }
        }
        Err(err) => warn!(%err, "invalid Exif item payload"),
    }
}

/// Item info: remember which ids are Exif and XMP mime items.
fn parse_iinf(body: &[u8], walk: &mut Walk) {
    if body.len() < 6 {
        return;
    }
    let version = body[0];
    let (count, mut pos) = if version == 0 {
        (u16::from_be_bytes([body[4], body[5]]) as usize, 6)
    } else {
        if body.len() < 8 {
            return;
        }
        (
            u32::from_be_bytes([body[4], body[5], body[6], body[7]]) as usize,
            8,
        )
    };
    for _ in 0..count {
        if pos + 8 > body.len() {
            return;
        }
        let size = u32::from_be_bytes([body[pos], body[pos + 1], body[pos + 2], body[pos + 3]])
            as usize;
        let kind = &body[pos + 4..pos + 8];
        if kind == b"infe" && size >= 8 && pos + size <= body.len() {
            parse_infe(&body[pos + 8..pos + size], walk);
        }
        if size < 8 {
            return;
        }
        pos += size;
    }
}

fn parse_infe(body: &[u8], walk: &mut Walk) {
    if body.len() < 4 {
        return;
    }
    let version = body[0];
    if version < 2 {
        return;
    }
    let (item_id, type_pos) = if version == 2 {
        (u16::from_be_bytes([body[4], body[5]]) as u32, 8)
    } else {
        (u32::from_be_bytes([body[4], body[5], body[6], body[7]]), 10)
    };
    let Some(item_type) = body.get(type_pos..type_pos + 4) else {
        return;
    };
    match item_type {
        b"Exif" => walk.exif_item = Some(item_id),
        b"mime" => {
            let rest = &body[type_pos + 4..];
            let content_type: Vec<u8> =
                rest.iter().take_while(|&&b| b != 0).copied().collect();
            if content_type == b"application/rdf+xml" {
                walk.xmp_item = Some(item_id);
            }
        }
        _ => {}
    }
}

/// Item locations: (item id, absolute offset, length) per first extent.
fn parse_iloc(body: &[u8], walk: &mut Walk) -> Option<()> {
    if body.len() < 8 {
        return None;
    }
    let version = body[0];
    let offset_size = (body[4] >> 4) as usize;
    let length_size = (body[4] & 0x0f) as usize;
    let base_offset_size = (body[5] >> 4) as usize;
    let index_size = if version >= 1 { (body[5] & 0x0f) as usize } else { 0 };

    let (count, mut pos) = if version < 2 {
        (u16::from_be_bytes([body[6], body[7]]) as usize, 8)
    } else {
        if body.len() < 10 {
            return None;
        }
        (
            u32::from_be_bytes([body[6], body[7], body[8], body[9]]) as usize,
            10,
        )
    };

    let read_uint = |body: &[u8], pos: usize, size: usize| -> Option<u64> {
        let bytes = body.get(pos..pos + size)?;
        Some(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    };

    for _ in 0..count {
        let item_id = if version < 2 {
            let id = read_uint(body, pos, 2)?;
            pos += 2;
            id as u32
        } else {
            let id = read_uint(body, pos, 4)?;
            pos += 4;
            id as u32
        };
        if version == 1 || version == 2 {
            pos += 2; // construction method
        }
        pos += 2; // data reference index
        let base = read_uint(body, pos, base_offset_size).unwrap_or(0);
        pos += base_offset_size;
        let extent_count = read_uint(body, pos, 2)? as usize;
        pos += 2;
        for i in 0..extent_count {
            pos += index_size;
            let offset = read_uint(body, pos, offset_size)?;
            pos += offset_size;
            let length = read_uint(body, pos, length_size)?;
            pos += length_size;
            if i == 0 {
                walk.items.push((item_id, base + offset, length));
            }
        }
    }
    Some(())
}
