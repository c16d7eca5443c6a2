//! PNG handler.
//!
//! Chunk stream: u32 big-endian length, 4-byte type, data, CRC-32
//! over type+data. Metadata-carrying chunks:
//! - `eXIf`: raw Exif (TIFF) bytes
//! - `iTXt` keyword `XML:com.adobe.xmp`: the XMP packet
//! - `iCCP`: profile name, 0, zlib-compressed ICC
//! - `tEXt`/`zTXt` keyword `Comment`/`Description`: the comment
//! - `tEXt`/`zTXt`/`iTXt` keyword `Raw profile type exif|iptc`:
//!   the ImageMagick legacy path, hex payload with a length line
//!
//! Writes place metadata chunks right after IHDR, before the first
//! IDAT, and recompute every CRC.

use crate::tiff::{TiffReader, TiffWriter};
use crate::traits::{AccessMode, ImageHandler};
use crate::utils::{base64_decode, crc32, hex_decode, hex_encode};
use crate::{ImageState, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pixmeta_core::{Error, Family};
use pixmeta_iptc::{IptcParser, IptcWriter};
use std::io::{Read, Write};
use tracing::warn;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const XMP_KEYWORD: &[u8] = b"XML:com.adobe.xmp";

/// PNG container handler.
pub struct PngHandler;

struct Chunk<'a> {
    kind: [u8; 4],
    data: &'a [u8],
}

impl ImageHandler for PngHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 8 && header[..8] == PNG_SIGNATURE
    }

    fn format_name(&self) -> &'static str {
        "PNG"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        for chunk in chunks(data)? {
            match &chunk.kind {
                b"IHDR" => {
                    if chunk.data.len() >= 8 {
                        state.pixel_width = u32::from_be_bytes([
                            chunk.data[0],
                            chunk.data[1],
                            chunk.data[2],
                            chunk.data[3],
                        ]);
                        state.pixel_height = u32::from_be_bytes([
                            chunk.data[4],
                            chunk.data[5],
                            chunk.data[6],
                            chunk.data[7],
                        ]);
                    }
                }
                b"eXIf" => read_exif(chunk.data, state),
                b"iCCP" => {
                    if let Some(profile) = decode_iccp(chunk.data) {
                        if pixmeta_icc::is_valid(&profile) {
                            state.icc_profile = Some(profile);
                        }
                    }
                }
                b"tEXt" => read_text(chunk.data, false, state),
                b"zTXt" => read_text(chunk.data, true, state),
                b"iTXt" => read_itxt(chunk.data, state),
                b"IEND" => break,
                _ => {}
            }
        }
        Ok(())
    }

    fn write_metadata(&self, data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        let parsed = chunks(data)?;
        let mut out = PNG_SIGNATURE.to_vec();

        let ihdr = parsed
            .iter()
            .find(|c| &c.kind == b"IHDR")
            .ok_or(Error::CorruptedMetadata("PNG"))?;
        write_chunk(&mut out, *b"IHDR", ihdr.data);

        // Metadata chunks land between IHDR and the first IDAT.
        if !state.exif.is_empty() || state.thumbnail.is_some() {
            let writer = TiffWriter::new(state.byte_order, false);
            let original = parsed
                .iter()
                .find(|c| &c.kind == b"eXIf")
                .map(|c| c.data);
            let (tiff, _) = writer.write(original, &state.exif, state.thumbnail.as_deref())?;
            if !tiff.is_empty() {
                write_chunk(&mut out, *b"eXIf", &tiff);
            }
        }
        if let Some(profile) = &state.icc_profile {
            write_chunk(&mut out, *b"iCCP", &encode_iccp(profile)?);
        }
        if let Some(packet) = state.xmp_packet_for_write()? {
            let mut body = XMP_KEYWORD.to_vec();
            body.extend_from_slice(&[0, 0, 0]); // no compression
            body.push(0); // empty language tag
            body.push(0); // empty translated keyword
            body.extend_from_slice(packet.as_bytes());
            write_chunk(&mut out, *b"iTXt", &body);
        }
        if !state.iptc.is_empty() {
            // PNG has no native IPTC chunk; the legacy raw profile
            // carries the IIM stream.
            let iim = IptcWriter::encode(&state.iptc)?;
            let text = format!("\niptc\n{:8}\n{}\n", iim.len(), hex_encode(&iim));
            let mut body = b"Raw profile type iptc".to_vec();
            body.push(0);
            body.extend_from_slice(text.as_bytes());
            write_chunk(&mut out, *b"tEXt", &body);
        }
        if let Some(comment) = &state.comment {
            let mut body = b"Comment".to_vec();
            body.push(0);
            body.extend_from_slice(comment.as_bytes());
            write_chunk(&mut out, *b"tEXt", &body);
        }

        for chunk in &parsed {
            let replaced = match &chunk.kind {
                b"IHDR" | b"eXIf" | b"iCCP" => true,
                b"tEXt" | b"zTXt" | b"iTXt" => is_metadata_text(chunk.data),
                _ => false,
            };
            if !replaced {
                write_chunk(&mut out, chunk.kind, chunk.data);
            }
        }
        Ok(out)
    }
}

fn chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    if data.len() < 8 || data[..8] != PNG_SIGNATURE {
        return Err(Error::CorruptedMetadata("PNG"));
    }
    let mut out = Vec::new();
    let mut pos = 8;
    while pos + 12 <= data.len() {
        let len = u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
            as usize;
        if pos + 12 + len > data.len() {
            return Err(Error::CorruptedMetadata("PNG"));
        }
        let kind: [u8; 4] = [data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]];
        out.push(Chunk {
            kind,
            data: &data[pos + 8..pos + 8 + len],
        });
        pos += 12 + len;
    }
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let crc_start = out.len();
    out.extend_from_slice(&kind);
    out.extend_from_slice(data);
    let crc = crc32(&out[crc_start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

fn read_exif(tiff: &[u8], state: &mut ImageState) {
    match TiffReader::parse(tiff) {
        Ok(parsed) => {
            state.exif = parsed.exif;
            state.byte_order = parsed.byte_order;
            state.thumbnail = parsed.thumbnail;
        }
        Err(err) => warn!(%err, "invalid eXIf chunk"),
    }
}

fn decode_iccp(data: &[u8]) -> Option<Vec<u8>> {
    let null = data.iter().position(|&b| b == 0)?;
    // name, 0, compression method (0 = zlib), stream
    let compressed = data.get(null + 2..)?;
    let mut decoder = ZlibDecoder::new(compressed);
    let mut profile = Vec::new();
    decoder.read_to_end(&mut profile).ok()?;
    Some(profile)
}

fn encode_iccp(profile: &[u8]) -> Result<Vec<u8>> {
    let mut body = b"ICC profile".to_vec();
    body.extend_from_slice(&[0, 0]); // terminator + zlib method
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(profile).map_err(|_| Error::WriteFailed)?;
    let compressed = encoder.finish().map_err(|_| Error::WriteFailed)?;
    body.extend_from_slice(&compressed);
    Ok(body)
}

/// Does a text chunk belong to us (and get regenerated on write)?
fn is_metadata_text(data: &[u8]) -> bool {
    let keyword = data.split(|&b| b == 0).next().unwrap_or_default();
    keyword == b"Comment"
        || keyword == b"Description"
        || keyword == XMP_KEYWORD
        || keyword.starts_with(b"Raw profile type")
}

fn read_text(data: &[u8], compressed: bool, state: &mut ImageState) {
    let Some(null) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let keyword = &data[..null];
    let payload: Vec<u8> = if compressed {
        // zTXt: method byte then zlib stream.
        let Some(stream) = data.get(null + 2..) else {
            return;
        };
        let mut decoder = ZlibDecoder::new(stream);
        let mut text = Vec::new();
        if decoder.read_to_end(&mut text).is_err() {
            return;
        }
        text
    } else {
        data[null + 1..].to_vec()
    };
    apply_text(keyword, &payload, state);
}

fn read_itxt(data: &[u8], state: &mut ImageState) {
    let Some(null) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let keyword = &data[..null];
    // keyword, 0, compression flag, method, language, 0, translated, 0
    let Some(&flag) = data.get(null + 1) else {
        return;
    };
    let mut pos = null + 3;
    for _ in 0..2 {
        match data[pos..].iter().position(|&b| b == 0) {
            Some(n) => pos += n + 1,
            None => return,
        }
    }
    let payload: Vec<u8> = if flag == 1 {
        let mut decoder = ZlibDecoder::new(&data[pos..]);
        let mut text = Vec::new();
        if decoder.read_to_end(&mut text).is_err() {
            return;
        }
        text
    } else {
        data[pos..].to_vec()
    };
    apply_text(keyword, &payload, state);
}

fn apply_text(keyword: &[u8], payload: &[u8], state: &mut ImageState) {
    match keyword {
        b"Comment" | b"Description" => {
            if state.comment.is_none() {
                state.comment = Some(String::from_utf8_lossy(payload).into_owned());
            }
        }
        k if k == XMP_KEYWORD => {
            state.xmp_packet = Some(String::from_utf8_lossy(payload).into_owned());
        }
        b"Raw profile type exif" | b"Raw profile type APP1" => {
            if let Some(tiff) = decode_raw_profile(payload) {
                read_exif(&tiff, state);
            }
        }
        b"Raw profile type iptc" => {
            if let Some(iim) = decode_raw_profile(payload) {
                match IptcParser::decode(&iim) {
                    Ok(iptc) => state.iptc = iptc,
                    Err(err) => warn!(%err, "invalid IPTC raw profile"),
                }
            }
        }
        _ => {}
    }
}

/// ImageMagick raw profile text: name line, length line, hex dump.
/// Base64 payloads are accepted for compatibility.
fn decode_raw_profile(text: &[u8]) -> Option<Vec<u8>> {
    let text = String::from_utf8_lossy(text);
    let mut lines = text.split('\n').filter(|l| !l.trim().is_empty());
    let _name = lines.next()?;
    let _len: usize = lines.next()?.trim().parse().ok()?;
    let rest: String = lines.collect::<Vec<_>>().join("");
    hex_decode(&rest).or_else(|| base64_decode(&rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Key, Value};

    pub(crate) fn minimal_png() -> Vec<u8> {
        let mut p = PNG_SIGNATURE.to_vec();
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&64u32.to_be_bytes());
        ihdr.extend_from_slice(&48u32.to_be_bytes());
        ihdr.extend_from_slice(&[8, 2, 0, 0, 0]); // bit depth, RGB
        write_chunk(&mut p, *b"IHDR", &ihdr);
        write_chunk(&mut p, *b"IDAT", &[0x78, 0x9c, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01]);
        write_chunk(&mut p, *b"IEND", &[]);
        p
    }

    #[test]
    fn reads_geometry() {
        let mut state = ImageState::default();
        PngHandler.read_metadata(&minimal_png(), &mut state).unwrap();
        assert_eq!(state.pixel_width, 64);
        assert_eq!(state.pixel_height, 48);
    }

    #[test]
    fn exif_xmp_comment_round_trip() {
        let mut state = ImageState::default();
        state.exif.add_pair(
            Key::parse("Exif.Image.Orientation").unwrap(),
            Value::Short(vec![8]),
        );
        state.comment = Some("a png comment".into());
        state.xmp_packet = Some("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>".into());
        state.write_xmp_from_packet = true;

        let out = PngHandler.write_metadata(&minimal_png(), &state).unwrap();
        let mut reread = ImageState::default();
        PngHandler.read_metadata(&out, &mut reread).unwrap();

        let key = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(reread.exif.find_key(&key).unwrap().value, Value::Short(vec![8]));
        assert_eq!(reread.comment.as_deref(), Some("a png comment"));
        assert!(reread.xmp_packet.is_some());
    }

    #[test]
    fn iptc_travels_in_raw_profile() {
        let mut state = ImageState::default();
        state.iptc.add_pair(
            Key::parse("Iptc.Application2.Keywords").unwrap(),
            Value::Ascii("fjord".into()),
        );
        let out = PngHandler.write_metadata(&minimal_png(), &state).unwrap();

        let mut reread = ImageState::default();
        PngHandler.read_metadata(&out, &mut reread).unwrap();
        let key = Key::parse("Iptc.Application2.Keywords").unwrap();
        assert_eq!(reread.iptc.find_key(&key).unwrap().value.to_string(), "fjord");
    }

    #[test]
    fn metadata_lands_before_idat() {
        let mut state = ImageState::default();
        state.exif.add_pair(
            Key::parse("Exif.Image.Orientation").unwrap(),
            Value::Short(vec![3]),
        );
        let out = PngHandler.write_metadata(&minimal_png(), &state).unwrap();
        let exif_pos = out.windows(4).position(|w| w == b"eXIf").unwrap();
        let idat_pos = out.windows(4).position(|w| w == b"IDAT").unwrap();
        assert!(exif_pos < idat_pos);
    }

    #[test]
    fn crcs_are_valid() {
        let mut state = ImageState::default();
        state.comment = Some("x".into());
        let out = PngHandler.write_metadata(&minimal_png(), &state).unwrap();
        // Verify each chunk's CRC.
        let mut pos = 8;
        while pos + 12 <= out.len() {
            let len = u32::from_be_bytes([out[pos], out[pos + 1], out[pos + 2], out[pos + 3]])
                as usize;
            let crc_calc = crc32(&out[pos + 4..pos + 8 + len]);
            let crc_stored = u32::from_be_bytes([
                out[pos + 8 + len],
                out[pos + 9 + len],
                out[pos + 10 + len],
                out[pos + 11 + len],
            ]);
            assert_eq!(crc_calc, crc_stored);
            pos += 12 + len;
        }
    }

    #[test]
    fn not_a_png_is_corrupt() {
        assert!(PngHandler
            .read_metadata(b"GIF89a", &mut ImageState::default())
            .is_err());
    }
}
