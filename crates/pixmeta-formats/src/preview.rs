//! Native preview enumeration and extraction.
//!
//! Previews come from four places: the Exif IFD1 thumbnail, maker
//! note embedded JPEGs (Nikon preview IFD, Sony PreviewImage, Canon
//! thumbnails), Photoshop thumbnail resources, and base64 `xmpGImg`
//! data in the XMP packet. Each descriptor records where the bytes
//! sit in the original stream and the filter needed to recover them.

use crate::{Image, ImageState, Result};
use pixmeta_core::Error;
use std::io::SeekFrom;

/// Post-read transform applied to the raw preview bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewFilter {
    None,
    Base64Decode,
}

/// One discoverable preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewProperties {
    /// Byte position in the backing stream.
    pub position: u64,
    /// Stored byte count (before any filter).
    pub size: usize,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
    pub filter: PreviewFilter,
}

/// An extracted preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

/// Enumerates and extracts the previews of one image.
pub struct PreviewManager<'a> {
    image: &'a mut Image,
}

impl<'a> PreviewManager<'a> {
    pub fn new(image: &'a mut Image) -> Self {
        Self { image }
    }

    /// Descriptors collected during the last `read_metadata`,
    /// largest first.
    pub fn list(&self) -> Vec<PreviewProperties> {
        let mut previews = self.image.state().previews.clone();
        previews.sort_by(|a, b| b.size.cmp(&a.size));
        previews
    }

    /// Copy one preview out of the stream.
    pub fn get(&mut self, props: &PreviewProperties) -> Result<PreviewImage> {
        let io = self.image.io_mut();
        io.open(pixmeta_core::OpenMode::Read)?;
        io.seek(SeekFrom::Start(props.position))?;
        let raw = io.read_exact_vec(props.size)?;
        let data = match props.filter {
            PreviewFilter::None => raw,
            PreviewFilter::Base64Decode => {
                let text = String::from_utf8_lossy(&raw);
                crate::utils::base64_decode(&text)
                    .ok_or(Error::CorruptedMetadata("preview"))?
            }
        };
        Ok(PreviewImage {
            data,
            width: props.width,
            height: props.height,
            mime: props.mime,
        })
    }
}

/// Scan a container for previews after its metadata was read.
///
/// Called by the handlers at the end of `read_metadata`; positions
/// refer to the container bytes passed in.
pub(crate) fn collect_previews(data: &[u8], state: &mut ImageState) {
    // Exif IFD1 thumbnail: the parsed bytes are at hand, locate them
    // in the stream to record a position.
    if let Some(thumb) = state.thumbnail.clone() {
        if thumb.len() >= 4 {
            if let Some(pos) = find_subslice(data, &thumb) {
                let (width, height) = jpeg_dimensions(&thumb).unwrap_or((0, 0));
                push_unique(state, PreviewProperties {
                    position: pos as u64,
                    size: thumb.len(),
                    width,
                    height,
                    mime: "image/jpeg",
                    filter: PreviewFilter::None,
                });
            }
        }
    }

    // Maker-note previews: vendor datums that hold whole JPEGs.
    let maker_previews: Vec<Vec<u8>> = state
        .exif
        .iter()
        .filter(|d| {
            matches!(
                (d.key.group(), d.key.tag()),
                ("Sony", "PreviewImage")
                    | ("Nikon", "PreviewImage")
                    | ("Canon", "PreviewImageInfo")
            )
        })
        .filter_map(|d| match &d.value {
            pixmeta_core::Value::Undefined(bytes) if bytes.starts_with(&[0xff, 0xd8]) => {
                Some(bytes.clone())
            }
            _ => None,
        })
        .collect();
    for bytes in maker_previews {
        if let Some(pos) = find_subslice(data, &bytes) {
            let (width, height) = jpeg_dimensions(&bytes).unwrap_or((0, 0));
            push_unique(state, PreviewProperties {
                position: pos as u64,
                size: bytes.len(),
                width,
                height,
                mime: "image/jpeg",
                filter: PreviewFilter::None,
            });
        }
    }

    // Photoshop thumbnail resources: 28-byte header, then JFIF.
    for marker in [b"8BIM\x04\x09", b"8BIM\x04\x0c"] {
        if let Some(irb_pos) = find_subslice(data, marker) {
            collect_psd_thumbnail(data, irb_pos, state);
        }
    }

    // XMP thumbnails: base64 between xmpGImg:image tags.
    if let Some(open) = find_subslice(data, b"xmpGImg:image>") {
        let content_start = open + b"xmpGImg:image>".len();
        if let Some(rel_end) = find_subslice(&data[content_start..], b"<") {
            push_unique(state, PreviewProperties {
                position: content_start as u64,
                size: rel_end,
                width: 0,
                height: 0,
                mime: "image/jpeg",
                filter: PreviewFilter::Base64Decode,
            });
        }
    }
}

fn push_unique(state: &mut ImageState, props: PreviewProperties) {
    if !state.previews.iter().any(|p| p.position == props.position) {
        state.previews.push(props);
    }
}

/// Parse a Photoshop thumbnail resource found at `pos`.
fn collect_psd_thumbnail(data: &[u8], pos: usize, state: &mut ImageState) {
    // type(4) id(2) name(2 minimum) length(4) then the payload:
    // format(4) width(4) height(4) ... 28 header bytes, JFIF after.
    let name_start = pos + 6;
    let Some(&name_len) = data.get(name_start) else {
        return;
    };
    let name_span = (name_len as usize & !1) + 2;
    let len_pos = name_start + name_span;
    let Some(len_bytes) = data.get(len_pos..len_pos + 4) else {
        return;
    };
    let payload_len =
        u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    let payload_pos = len_pos + 4;
    if payload_len < 28 || payload_pos + payload_len > data.len() {
        return;
    }
    let payload = &data[payload_pos..payload_pos + payload_len];
    let width = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
    let height = u32::from_be_bytes([payload[8], payload[9], payload[10], payload[11]]);
    push_unique(state, PreviewProperties {
        position: (payload_pos + 28) as u64,
        size: payload_len - 28,
        width,
        height,
        mime: "image/jpeg",
        filter: PreviewFilter::None,
    });
}

/// First occurrence of `needle` in `haystack`.
fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Width and height from a JPEG's SOF marker.
fn jpeg_dimensions(jpeg: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    while pos + 4 <= jpeg.len() {
        if jpeg[pos] != 0xff {
            return None;
        }
        let marker = jpeg[pos + 1];
        if matches!(
            marker,
            0xc0..=0xc3 | 0xc5..=0xc7 | 0xc9..=0xcb | 0xcd..=0xcf
        ) {
            if pos + 9 > jpeg.len() {
                return None;
            }
            let h = u16::from_be_bytes([jpeg[pos + 5], jpeg[pos + 6]]) as u32;
            let w = u16::from_be_bytes([jpeg[pos + 7], jpeg[pos + 8]]) as u32;
            return Some((w, h));
        }
        let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        pos += 2 + len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiff::TiffWriter;
    use pixmeta_core::{ByteOrder, ExifData, Key, Value};

    #[test]
    fn subslice_search() {
        assert_eq!(find_subslice(b"abcdef", b"cd"), Some(2));
        assert_eq!(find_subslice(b"abcdef", b"xy"), None);
        assert_eq!(find_subslice(b"ab", b"abc"), None);
    }

    #[test]
    fn thumbnail_descriptor_from_tiff() {
        let mut exif = ExifData::new();
        exif.add_pair(
            Key::parse("Exif.Thumbnail.Compression").unwrap(),
            Value::Short(vec![6]),
        );
        // A tiny JPEG-looking blob with an SOF0.
        let mut thumb = vec![0xff, 0xd8];
        thumb.extend_from_slice(&[0xff, 0xc0, 0x00, 0x08, 8, 0, 16, 0, 32, 1]);
        thumb.extend_from_slice(&[0xff, 0xd9]);

        let tiff = TiffWriter::new(ByteOrder::Little, false)
            .encode(&exif, Some(&thumb), &[])
            .unwrap();

        let mut state = ImageState::default();
        let parsed = crate::tiff::TiffReader::parse(&tiff).unwrap();
        state.exif = parsed.exif;
        state.thumbnail = parsed.thumbnail;
        collect_previews(&tiff, &mut state);

        assert_eq!(state.previews.len(), 1);
        let p = &state.previews[0];
        assert_eq!(p.size, thumb.len());
        assert_eq!((p.width, p.height), (32, 16));
        assert_eq!(&tiff[p.position as usize..p.position as usize + p.size], &thumb[..]);
    }

    #[test]
    fn base64_preview_descriptor() {
        let packet = b"<xmpGImg:image>/9j/4AAQ</xmpGImg:image>".to_vec();
        let mut state = ImageState::default();
        collect_previews(&packet, &mut state);
        assert_eq!(state.previews.len(), 1);
        assert_eq!(state.previews[0].filter, PreviewFilter::Base64Decode);
        let start = state.previews[0].position as usize;
        assert_eq!(&packet[start..start + state.previews[0].size], b"/9j/4AAQ");
    }
}
