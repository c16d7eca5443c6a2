//! EXV: the library-private metadata sidecar container.
//!
//! An EXV file is a JPEG-style segment sequence holding only the
//! metadata: the 7-byte magic, then APP1 Exif, APP1 XMP, APP13 IRB,
//! COM, terminated with EOI. It round-trips every namespace without
//! carrying pixel data, so extract/insert tooling can move metadata
//! between files.

use crate::jpeg::JpegHandler;
use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};

/// File magic of the established .exv sidecar format; kept
/// byte-identical so existing tooling recognizes our output.
const EXV_MAGIC: &[u8] = b"\xff\x01Exiv2";
/// End of image, shared with JPEG.
const EOI: [u8; 2] = [0xff, 0xd9];

/// EXV container handler.
pub struct ExvHandler;

impl ImageHandler for ExvHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= EXV_MAGIC.len() && header.starts_with(EXV_MAGIC)
    }

    fn format_name(&self) -> &'static str {
        "EXV"
    }

    fn mime_type(&self) -> &'static str {
        "image/x-exv"
    }

    fn access_mode(&self, _family: Family) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        if !data.starts_with(EXV_MAGIC) {
            return Err(Error::CorruptedMetadata("EXV"));
        }
        // The segment grammar is JPEG's; swap the magic for SOI and
        // delegate.
        let mut jpegish = vec![0xff, 0xd8];
        jpegish.extend_from_slice(&data[EXV_MAGIC.len()..]);
        JpegHandler.read_metadata(&jpegish, state)
    }

    fn write_metadata(&self, _data: &[u8], state: &ImageState) -> Result<Vec<u8>> {
        // Rebuild from the state alone; an EXV has no image payload
        // worth preserving.
        let empty = [0xff, 0xd8, 0xff, 0xd9];
        let jpegish = JpegHandler.write_metadata(&empty, state)?;

        let mut out = EXV_MAGIC.to_vec();
        out.extend_from_slice(&jpegish[2..]);
        if !out.ends_with(&EOI) {
            out.extend_from_slice(&EOI);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Key, Value};

    #[test]
    fn full_namespace_round_trip() {
        let mut state = ImageState::default();
        state.exif.add_pair(
            Key::parse("Exif.Image.Make").unwrap(),
            Value::Ascii("PixCam".into()),
        );
        state.iptc.add_pair(
            Key::parse("Iptc.Application2.Headline").unwrap(),
            Value::Ascii("News".into()),
        );
        state.xmp_packet = Some("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>".into());
        state.write_xmp_from_packet = true;
        state.comment = Some("extracted".into());

        let exv = ExvHandler.write_metadata(&[], &state).unwrap();
        assert!(exv.starts_with(EXV_MAGIC));
        assert!(exv.ends_with(&EOI));

        let mut reread = ImageState::default();
        ExvHandler.read_metadata(&exv, &mut reread).unwrap();
        let make = Key::parse("Exif.Image.Make").unwrap();
        assert_eq!(reread.exif.find_key(&make).unwrap().value.to_string(), "PixCam");
        let headline = Key::parse("Iptc.Application2.Headline").unwrap();
        assert_eq!(
            reread.iptc.find_key(&headline).unwrap().value.to_string(),
            "News"
        );
        assert!(reread.xmp_packet.is_some());
        assert_eq!(reread.comment.as_deref(), Some("extracted"));
    }

    #[test]
    fn bad_magic_is_corrupt() {
        assert!(ExvHandler
            .read_metadata(b"\xff\xd8\xff\xd9", &mut ImageState::default())
            .is_err());
    }
}
