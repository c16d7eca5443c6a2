//! JPEG handler.
//!
//! A JPEG is SOI followed by marker segments. Metadata lives in:
//! - APP1 `Exif\0\0`: an embedded TIFF stream
//! - APP1 `http://ns.adobe.com/xap/1.0/\0`: the XMP packet
//! - APP2 `ICC_PROFILE\0` + index + total: ICC profile, possibly
//!   split across segments
//! - APP13 `Photoshop 3.0\0`: an IRB stream carrying IPTC
//! - COM: the free-form comment
//!
//! Writing re-emits SOI, then the metadata segments in canonical
//! order (JFIF, Exif, ICC, XMP, IRB, comment), then every remaining
//! segment verbatim from the first structural marker onward. The
//! image data after SOS is never touched.

use crate::psd::irb;
use crate::tiff::{TiffReader, TiffWriter};
use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};
use pixmeta_iptc::IptcParser;
use tracing::warn;

const EXIF_PREFIX: &[u8] = b"Exif\0\0";
const XMP_PREFIX: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const ICC_PREFIX: &[u8] = b"ICC_PROFILE\0";
const IRB_PREFIX: &[u8] = b"Photoshop 3.0\0";

/// Payload bytes an APP segment can carry.
const MAX_SEGMENT_DATA: usize = 65533;
/// ICC payload per segment after the 14-byte chunk header.
const MAX_ICC_CHUNK: usize = MAX_SEGMENT_DATA - ICC_PREFIX.len() - 2;

/// One JPEG segment; SOS carries the entropy stream and EOI in `data`.
#[derive(Debug, Clone)]
struct Segment {
    marker: u8,
    data: Vec<u8>,
}

/// JPEG container handler.
pub struct JpegHandler;

impl ImageHandler for JpegHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 3 && header[0] == 0xff && header[1] == 0xd8 && header[2] == 0xff
    }

    fn format_name(&self) -> &'static str {
        "JPEG"
    }

    fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        let segments = parse_segments(data)?;
        let mut icc_chunks: Vec<(u8, u8, Vec<u8>)> = Vec::new();

        for seg in &segments {
            match seg.marker {
                0xe1 if seg.data.starts_with(EXIF_PREFIX) => {
                    let tiff = &seg.data[EXIF_PREFIX.len()..];
                    match TiffReader::parse(tiff) {
                        Ok(parsed) => {
                            state.exif = parsed.exif;
                            state.byte_order = parsed.byte_order;
                            state.thumbnail = parsed.thumbnail;
                            if state.iptc.is_empty() {
                                state.iptc = parsed.iptc;
                            }
                            if state.icc_profile.is_none() {
                                state.icc_profile = parsed.icc_profile;
                            }
                            if parsed.pixel_width != 0 {
                                state.pixel_width = parsed.pixel_width;
                                state.pixel_height = parsed.pixel_height;
                            }
                        }
                        Err(err) => return Err(structural(err)),
                    }
                }
                0xe1 if seg.data.starts_with(XMP_PREFIX) => {
                    let packet = &seg.data[XMP_PREFIX.len()..];
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(packet).trim_end_matches('\0').to_string());
                }
                0xe2 if seg.data.starts_with(ICC_PREFIX) => {
                    let rest = &seg.data[ICC_PREFIX.len()..];
                    if rest.len() > 2 {
                        icc_chunks.push((rest[0], rest[1], rest[2..].to_vec()));
                    }
                }
                0xed if seg.data.starts_with(IRB_PREFIX) => {
                    read_irb_metadata(&seg.data[IRB_PREFIX.len()..], state);
                }
                0xfe => {
                    if state.comment.is_none() {
                        state.comment =
                            Some(String::from_utf8_lossy(&seg.data).into_owned());
                    }
                }
                0xc0..=0xc3 | 0xc5..=0xc7 | 0xc9..=0xcb | 0xcd..=0xcf => {
                    if seg.data.len() >= 5 {
                        state.pixel_height =
                            u16::from_be_bytes([seg.data[1], seg.data[2]]) as u32;
                        state.pixel_width =
                            u16::from_be_bytes([seg.data[3], seg.data[4]]) as u32;
                    }
                }
                _ => {}
            }
        }

        // Reassemble a split ICC profile in chunk order.
        if !icc_chunks.is_empty() {
            icc_chunks.sort_by_key(|&(n, _, _)| n);
            let profile: Vec<u8> = icc_chunks.into_iter().flat_map(|(_, _, d)| d).collect();
            if pixmeta_icc::is_valid(&profile) {
                state.icc_profile = Some(profile);
            } else {
                warn!("discarding invalid ICC profile");
            }
        }

        crate::preview::collect_previews(data, state);
        Ok(())
    }

    fn write_metadata(&self, data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        let segments = parse_segments(data)?;
        let mut out = vec![0xff, 0xd8];

        // JFIF stays first when the source had one.
        if let Some(jfif) = segments
            .iter()
            .find(|s| s.marker == 0xe0 && s.data.starts_with(b"JFIF\0"))
        {
            write_segment(&mut out, 0xe0, &jfif.data)?;
        }

        // Exif APP1, updated in place when the change fits.
        if !state.exif.is_empty() || state.thumbnail.is_some() {
            let original_tiff = segments
                .iter()
                .find(|s| s.marker == 0xe1 && s.data.starts_with(EXIF_PREFIX))
                .map(|s| &s.data[EXIF_PREFIX.len()..]);
            let writer = TiffWriter::new(state.byte_order, false);
            let (tiff, _method) =
                writer.write(original_tiff, &state.exif, state.thumbnail.as_deref())?;
            if !tiff.is_empty() {
                let mut payload = EXIF_PREFIX.to_vec();
                payload.extend_from_slice(&tiff);
                if payload.len() > MAX_SEGMENT_DATA {
                    return Err(Error::TooLargeJpegSegment);
                }
                write_segment(&mut out, 0xe1, &payload)?;
            }
        }

        // ICC profile in up to 255 chunks.
        if let Some(profile) = &state.icc_profile {
            let chunks: Vec<&[u8]> = profile.chunks(MAX_ICC_CHUNK).collect();
            if chunks.len() > 255 {
                return Err(Error::TooLargeJpegSegment);
            }
            let total = chunks.len() as u8;
            for (i, chunk) in chunks.iter().enumerate() {
                let mut payload = ICC_PREFIX.to_vec();
                payload.push(i as u8 + 1);
                payload.push(total);
                payload.extend_from_slice(chunk);
                write_segment(&mut out, 0xe2, &payload)?;
            }
        }

        // XMP APP1.
        if let Some(packet) = state.xmp_packet_for_write()? {
            let mut payload = XMP_PREFIX.to_vec();
            payload.extend_from_slice(packet.as_bytes());
            if payload.len() > MAX_SEGMENT_DATA {
                return Err(Error::TooLargeJpegSegment);
            }
            write_segment(&mut out, 0xe1, &payload)?;
        }

        // Photoshop IRB with the IPTC stream, preserving foreign IRBs.
        let original_irbs = segments
            .iter()
            .find(|s| s.marker == 0xed && s.data.starts_with(IRB_PREFIX))
            .map(|s| irb::parse(&s.data[IRB_PREFIX.len()..]))
            .transpose()?
            .unwrap_or_default();
        let rebuilt = irb::rebuild_with_iptc(original_irbs, &state.iptc)?;
        if !rebuilt.is_empty() {
            let mut payload = IRB_PREFIX.to_vec();
            payload.extend_from_slice(&irb::build(&rebuilt));
            if payload.len() > MAX_SEGMENT_DATA {
                return Err(Error::TooLargeJpegSegment);
            }
            write_segment(&mut out, 0xed, &payload)?;
        }

        // Comment.
        if let Some(comment) = &state.comment {
            write_segment(&mut out, 0xfe, comment.as_bytes())?;
        }

        // Everything else verbatim, metadata segments skipped.
        for seg in &segments {
            let is_metadata = matches!(seg.marker, 0xfe)
                || (seg.marker == 0xe0 && seg.data.starts_with(b"JFIF\0"))
                || (seg.marker == 0xe1
                    && (seg.data.starts_with(EXIF_PREFIX) || seg.data.starts_with(XMP_PREFIX)))
                || (seg.marker == 0xe2 && seg.data.starts_with(ICC_PREFIX))
                || (seg.marker == 0xed && seg.data.starts_with(IRB_PREFIX));
            if is_metadata {
                continue;
            }
            if seg.marker == 0xda {
                // SOS carries the entropy stream and the trailing EOI.
                out.extend_from_slice(&[0xff, 0xda]);
                out.extend_from_slice(&seg.data);
            } else {
                write_segment(&mut out, seg.marker, &seg.data)?;
            }
        }

        Ok(out)
    }
}

/// Pull IPTC and the thumbnail resource out of an IRB stream.
fn read_irb_metadata(data: &[u8], state: &mut ImageState) {
    match irb::parse(data) {
        Ok(irbs) => {
            for block in &irbs {
                if block.id == irb::ID_IPTC {
                    match IptcParser::decode(&block.data) {
                        Ok(iptc) => state.iptc = iptc,
                        Err(err) => warn!(%err, "invalid IPTC in Photoshop IRB"),
                    }
                } else if block.id == irb::ID_XMP && state.xmp_packet.is_none() {
                    state.xmp_packet =
                        Some(String::from_utf8_lossy(&block.data).into_owned());
                }
            }
        }
        Err(err) => warn!(%err, "unparseable Photoshop IRB segment"),
    }
}

/// Split a JPEG into segments; the SOS segment swallows the tail.
fn parse_segments(data: &[u8]) -> Result<Vec<Segment>> {
    if data.len() < 2 || data[0] != 0xff || data[1] != 0xd8 {
        return Err(Error::CorruptedMetadata("JPEG"));
    }
    let mut segments = Vec::new();
    let mut pos = 2;

    while pos < data.len() {
        if data[pos] != 0xff {
            return Err(Error::CorruptedMetadata("JPEG"));
        }
        while pos < data.len() && data[pos] == 0xff {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }
        let marker = data[pos];
        pos += 1;

        if marker == 0xd9 {
            break;
        }
        // Standalone markers carry no length.
        if (0xd0..=0xd7).contains(&marker) || marker == 0x01 {
            continue;
        }
        if pos + 2 > data.len() {
            return Err(Error::CorruptedMetadata("JPEG"));
        }
        let len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if len < 2 || pos + len > data.len() {
            return Err(Error::CorruptedMetadata("JPEG"));
        }

        if marker == 0xda {
            // Keep the scan header and everything through EOI.
            segments.push(Segment {
                marker,
                data: data[pos..].to_vec(),
            });
            break;
        }

        segments.push(Segment {
            marker,
            data: data[pos + 2..pos + len].to_vec(),
        });
        pos += len;
    }

    Ok(segments)
}

fn write_segment(out: &mut Vec<u8>, marker: u8, data: &[u8]) -> Result<()> {
    if data.len() + 2 > 0xffff {
        return Err(Error::TooLargeJpegSegment);
    }
    out.extend_from_slice(&[0xff, marker]);
    out.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(data);
    Ok(())
}

/// Low-level I/O failures inside structured parsing are corruption.
fn structural(err: Error) -> Error {
    match err {
        Error::ReadFailed | Error::UnexpectedEof { .. } => Error::CorruptedMetadata("JPEG"),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Key, Value};

    /// A minimal JPEG: SOI, SOF0, SOS with fake scan data, EOI.
    pub(crate) fn minimal_jpeg() -> Vec<u8> {
        let mut j = vec![0xff, 0xd8];
        // SOF0: len, precision, height 4, width 6, 1 component
        let sof = [8u8, 0, 4, 0, 6, 1, 1, 0x11, 0];
        j.extend_from_slice(&[0xff, 0xc0]);
        j.extend_from_slice(&((sof.len() + 2) as u16).to_be_bytes());
        j.extend_from_slice(&sof);
        // SOS: minimal header then entropy bytes
        let sos = [1u8, 1, 0, 0, 0x3f, 0];
        j.extend_from_slice(&[0xff, 0xda]);
        j.extend_from_slice(&((sos.len() + 2) as u16).to_be_bytes());
        j.extend_from_slice(&sos);
        j.extend_from_slice(&[0x12, 0x34, 0x56]);
        j.extend_from_slice(&[0xff, 0xd9]);
        j
    }

    fn jpeg_with_metadata() -> Vec<u8> {
        let mut state = ImageState::default();
        state
            .exif
            .add_pair(Key::parse("Exif.Image.Orientation").unwrap(), Value::Short(vec![1]));
        state.exif.add_pair(
            Key::parse("Exif.Image.Make").unwrap(),
            Value::Ascii("PixCam".into()),
        );
        state.iptc.add_pair(
            Key::parse("Iptc.Application2.Keywords").unwrap(),
            Value::Ascii("cat".into()),
        );
        state.comment = Some("hello".into());
        JpegHandler.write_metadata(&minimal_jpeg(), &state).unwrap()
    }

    #[test]
    fn read_back_written_metadata() {
        let jpeg = jpeg_with_metadata();
        let mut state = ImageState::default();
        JpegHandler.read_metadata(&jpeg, &mut state).unwrap();

        let orientation = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(
            state.exif.find_key(&orientation).unwrap().value,
            Value::Short(vec![1])
        );
        let keywords = Key::parse("Iptc.Application2.Keywords").unwrap();
        assert_eq!(state.iptc.find_key(&keywords).unwrap().value.to_string(), "cat");
        assert_eq!(state.comment.as_deref(), Some("hello"));
        assert_eq!(state.pixel_width, 6);
        assert_eq!(state.pixel_height, 4);
    }

    #[test]
    fn orientation_update_keeps_file_size() {
        let jpeg = jpeg_with_metadata();
        let mut state = ImageState::default();
        JpegHandler.read_metadata(&jpeg, &mut state).unwrap();

        let key = Key::parse("Exif.Image.Orientation").unwrap();
        state.exif.find_key_mut(&key).unwrap().value = Value::Short(vec![6]);
        // Comment travels through the state on rewrite.
        let out = JpegHandler.write_metadata(&jpeg, &state).unwrap();

        assert_eq!(out.len(), jpeg.len(), "in-place update must not resize");
        let mut reread = ImageState::default();
        JpegHandler.read_metadata(&out, &mut reread).unwrap();
        assert_eq!(
            reread.exif.find_key(&key).unwrap().value,
            Value::Short(vec![6])
        );
    }

    #[test]
    fn scan_data_is_untouched() {
        let jpeg = jpeg_with_metadata();
        let mut state = ImageState::default();
        JpegHandler.read_metadata(&jpeg, &mut state).unwrap();
        let out = JpegHandler.write_metadata(&jpeg, &state).unwrap();
        // The entropy bytes and EOI survive byte-for-byte.
        assert!(out
            .windows(5)
            .any(|w| w == [0x12, 0x34, 0x56, 0xff, 0xd9]));
    }

    #[test]
    fn oversized_exif_is_rejected() {
        let mut state = ImageState::default();
        state.exif.add_pair(
            Key::parse("Exif.Photo.UserComment").unwrap(),
            Value::Undefined(vec![0u8; 70_000]),
        );
        let err = JpegHandler.write_metadata(&minimal_jpeg(), &state).unwrap_err();
        assert!(matches!(err, Error::TooLargeJpegSegment));
    }

    #[test]
    fn truncated_jpeg_is_corrupt() {
        assert!(JpegHandler
            .read_metadata(&[0xff, 0xd8, 0x00, 0x11], &mut ImageState::default())
            .is_err());
        assert!(JpegHandler
            .read_metadata(b"plainly not a jpeg", &mut ImageState::default())
            .is_err());
    }
}
