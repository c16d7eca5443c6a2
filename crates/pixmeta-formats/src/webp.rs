//! WebP handler.
//!
//! RIFF wrapper: `RIFF` + u32le size + `WEBP`, then chunks of
//! (fourcc, u32le size, data, even pad). Canonical chunk order for
//! the extended format: VP8X, ICCP, ANIM/ANMF, ALPH, VP8/VP8L,
//! EXIF, XMP. Writing Exif or XMP into a simple lossy/lossless file
//! synthesizes the VP8X chunk with the matching feature bits and the
//! canvas size recovered from the bitstream.

use crate::tiff::{TiffReader, TiffWriter};
use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};
use tracing::warn;

const FLAG_ANIM: u8 = 0x02;
const FLAG_XMP: u8 = 0x04;
const FLAG_EXIF: u8 = 0x08;
const FLAG_ALPH: u8 = 0x10;
const FLAG_ICCP: u8 = 0x20;

/// WebP container handler.
pub struct WebpHandler;

#[derive(Debug, Clone)]
struct Chunk<'a> {
    fourcc: [u8; 4],
    data: &'a [u8],
}

impl ImageHandler for WebpHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP"
    }

    fn format_name(&self) -> &'static str {
        "WebP"
    }

    fn mime_type(&self) -> &'static str {
        "image/webp"
    }

    fn access_mode(&self, family: Family) -> AccessMode {
        match family {
            Family::Iptc => AccessMode::None,
            _ => AccessMode::ReadWrite,
        }
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        for chunk in chunks(data)? {
            match &chunk.fourcc {
                b"VP8X" => {
                    if chunk.data.len() >= 10 {
                        state.pixel_width = read_u24(&chunk.data[4..7]) + 1;
                        state.pixel_height = read_u24(&chunk.data[7..10]) + 1;
                    }
                }
                b"VP8 " => {
                    if state.pixel_width == 0 {
                        if let Some((w, h)) = vp8_dimensions(chunk.data) {
                            state.pixel_width = w;
                            state.pixel_height = h;
                        }
                    }
                }
                b"VP8L" => {
                    if state.pixel_width == 0 {
                        if let Some((w, h)) = vp8l_dimensions(chunk.data) {
                            state.pixel_width = w;
                            state.pixel_height = h;
                        }
                    }
                }
                b"EXIF" => {
                    // Some writers prepend the JPEG APP1 prefix.
                    let tiff = chunk
                        .data
                        .strip_prefix(b"Exif\0\0".as_slice())
                        .unwrap_or(chunk.data);
                    match TiffReader::parse(tiff) {
                        Ok(parsed) => {
                            state.exif = parsed.exif;
                            state.byte_order = parsed.byte_order;
                            state.thumbnail = parsed.thumbnail;
                        }
                        Err(err) => warn!(%err, "invalid EXIF chunk"),
                    }
                }
                b"XMP " => {
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(chunk.data).into_owned());
                }
                b"ICCP" => {
                    if pixmeta_icc::is_valid(chunk.data) {
                        state.icc_profile = Some(chunk.data.to_vec());
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_metadata(&self, data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        let parsed = chunks(data)?;

        let exif_bytes = if state.exif.is_empty() && state.thumbnail.is_none() {
            None
        } else {
            let writer = TiffWriter::new(state.byte_order, false);
            let original = parsed
                .iter()
                .find(|c| &c.fourcc == b"EXIF")
                .map(|c| c.data.strip_prefix(b"Exif\0\0".as_slice()).unwrap_or(c.data));
            let (tiff, _) = writer.write(original, &state.exif, state.thumbnail.as_deref())?;
            Some(tiff).filter(|t| !t.is_empty())
        };
        let xmp_packet = state.xmp_packet_for_write()?;

        // Feature bits for the VP8X header.
        let has_alph = parsed.iter().any(|c| &c.fourcc == b"ALPH");
        let has_anim = parsed.iter().any(|c| &c.fourcc == b"ANIM");
        let mut flags = 0u8;
        if state.icc_profile.is_some() {
            flags |= FLAG_ICCP;
        }
        if has_alph {
            flags |= FLAG_ALPH;
        }
        if has_anim {
            flags |= FLAG_ANIM;
        }
        if exif_bytes.is_some() {
            flags |= FLAG_EXIF;
        }
        if xmp_packet.is_some() {
            flags |= FLAG_XMP;
        }

        // Canvas size from an existing VP8X or the bitstream itself.
        let (width, height) = canvas_size(&parsed, state)?;

        let mut body: Vec<u8> = Vec::new();
        if flags != 0 {
            let mut vp8x = vec![flags, 0, 0, 0];
            write_u24(&mut vp8x, width.saturating_sub(1));
            write_u24(&mut vp8x, height.saturating_sub(1));
            write_chunk(&mut body, *b"VP8X", &vp8x);
        }
        if let Some(profile) = &state.icc_profile {
            write_chunk(&mut body, *b"ICCP", profile);
        }
        // Image chunks in original order, old metadata dropped.
        for chunk in &parsed {
            if matches!(&chunk.fourcc, b"VP8X" | b"ICCP" | b"EXIF" | b"XMP ") {
                continue;
            }
            write_chunk(&mut body, chunk.fourcc, chunk.data);
        }
        if let Some(tiff) = &exif_bytes {
            write_chunk(&mut body, *b"EXIF", tiff);
        }
        if let Some(packet) = &xmp_packet {
            write_chunk(&mut body, *b"XMP ", packet.as_bytes());
        }

        let mut out = Vec::with_capacity(body.len() + 12);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"WEBP");
        out.extend_from_slice(&body);
        Ok(out)
    }
}

fn chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    if data.len() < 12 || &data[..4] != b"RIFF" || &data[8..12] != b"WEBP" {
        return Err(Error::CorruptedMetadata("WebP"));
    }
    let riff_len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    let end = (8 + riff_len).min(data.len());
    let mut out = Vec::new();
    let mut pos = 12;
    while pos + 8 <= end {
        let fourcc: [u8; 4] = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
        let len = u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
            as usize;
        if pos + 8 + len > end {
            return Err(Error::CorruptedMetadata("WebP"));
        }
        out.push(Chunk {
            fourcc,
            data: &data[pos + 8..pos + 8 + len],
        });
        pos += 8 + len + (len % 2);
    }
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, fourcc: [u8; 4], data: &[u8]) {
    out.extend_from_slice(&fourcc);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 != 0 {
        out.push(0);
    }
}

fn read_u24(b: &[u8]) -> u32 {
    b[0] as u32 | (b[1] as u32) << 8 | (b[2] as u32) << 16
}

fn write_u24(out: &mut Vec<u8>, v: u32) {
    out.push(v as u8);
    out.push((v >> 8) as u8);
    out.push((v >> 16) as u8);
}

/// Lossy bitstream: start code at 3, 14-bit dimensions at 6 and 8.
fn vp8_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 10 || data[3..6] != [0x9d, 0x01, 0x2a] {
        return None;
    }
    let w = u16::from_le_bytes([data[6], data[7]]) & 0x3fff;
    let h = u16::from_le_bytes([data[8], data[9]]) & 0x3fff;
    Some((w as u32, h as u32))
}

/// Lossless bitstream: signature 0x2f, then 2 x 14 bits, minus one.
fn vp8l_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 5 || data[0] != 0x2f {
        return None;
    }
    let bits = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
    let w = (bits & 0x3fff) + 1;
    let h = ((bits >> 14) & 0x3fff) + 1;
    Some((w, h))
}

fn canvas_size(parsed: &[Chunk<'_>], state: &ImageState) -> Result<(u32, u32)> {
    if let Some(vp8x) = parsed.iter().find(|c| &c.fourcc == b"VP8X") {
        if vp8x.data.len() >= 10 {
            return Ok((
                read_u24(&vp8x.data[4..7]) + 1,
                read_u24(&vp8x.data[7..10]) + 1,
            ));
        }
    }
    for chunk in parsed {
        let dims = match &chunk.fourcc {
            b"VP8 " => vp8_dimensions(chunk.data),
            b"VP8L" => vp8l_dimensions(chunk.data),
            _ => None,
        };
        if let Some(dims) = dims {
            return Ok(dims);
        }
    }
    if state.pixel_width > 0 {
        return Ok((state.pixel_width, state.pixel_height));
    }
    Err(Error::CorruptedMetadata("WebP"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Key, Value};

    /// A lossy WebP with no VP8X: just the VP8 bitstream header.
    pub(crate) fn simple_lossy_webp() -> Vec<u8> {
        let mut vp8 = vec![0x30, 0x01, 0x00]; // frame tag
        vp8.extend_from_slice(&[0x9d, 0x01, 0x2a]); // start code
        vp8.extend_from_slice(&160u16.to_le_bytes());
        vp8.extend_from_slice(&120u16.to_le_bytes());
        vp8.extend_from_slice(&[0u8; 6]); // a little bitstream filler

        let mut body = Vec::new();
        write_chunk(&mut body, *b"VP8 ", &vp8);
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"WEBP");
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn reads_lossy_dimensions() {
        let mut state = ImageState::default();
        WebpHandler
            .read_metadata(&simple_lossy_webp(), &mut state)
            .unwrap();
        assert_eq!(state.pixel_width, 160);
        assert_eq!(state.pixel_height, 120);
    }

    #[test]
    fn adding_exif_synthesizes_vp8x() {
        let webp = simple_lossy_webp();
        let mut state = ImageState::default();
        WebpHandler.read_metadata(&webp, &mut state).unwrap();
        state.exif.add_pair(
            Key::parse("Exif.Image.Orientation").unwrap(),
            Value::Short(vec![1]),
        );

        let out = WebpHandler.write_metadata(&webp, &state).unwrap();
        // VP8X is the first chunk.
        assert_eq!(&out[12..16], b"VP8X");
        let flags = out[20];
        assert_eq!(flags & FLAG_EXIF, FLAG_EXIF, "EXIF feature bit set");
        // Canvas size carried over from the bitstream.
        assert_eq!(read_u24(&out[24..27]) + 1, 160);
        assert_eq!(read_u24(&out[27..30]) + 1, 120);
        // EXIF chunk comes after the image chunk.
        let vp8_pos = out.windows(4).position(|w| w == b"VP8 ").unwrap();
        let exif_pos = out.windows(4).position(|w| w == b"EXIF").unwrap();
        assert!(exif_pos > vp8_pos);

        let mut reread = ImageState::default();
        WebpHandler.read_metadata(&out, &mut reread).unwrap();
        let key = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(reread.exif.find_key(&key).unwrap().value, Value::Short(vec![1]));
    }

    #[test]
    fn xmp_feature_bit() {
        let webp = simple_lossy_webp();
        let mut state = ImageState::default();
        state.xmp_packet = Some("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>".into());
        state.write_xmp_from_packet = true;
        let out = WebpHandler.write_metadata(&webp, &state).unwrap();
        assert_eq!(&out[12..16], b"VP8X");
        assert_eq!(out[20] & FLAG_XMP, FLAG_XMP);
    }

    #[test]
    fn no_metadata_keeps_simple_form() {
        let webp = simple_lossy_webp();
        let state = ImageState::default();
        let out = WebpHandler.write_metadata(&webp, &state).unwrap();
        assert_eq!(&out[12..16], b"VP8 ", "no VP8X without features");
    }

    #[test]
    fn riff_size_is_consistent() {
        let webp = simple_lossy_webp();
        let mut state = ImageState::default();
        state.xmp_packet = Some("<x/>".into());
        state.write_xmp_from_packet = true;
        let out = WebpHandler.write_metadata(&webp, &state).unwrap();
        let riff_len = u32::from_le_bytes([out[4], out[5], out[6], out[7]]) as usize;
        assert_eq!(riff_len + 8, out.len());
    }
}
