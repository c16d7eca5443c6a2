//! Geometry-only handlers: GIF, BMP, TGA, CRW, EPS.
//!
//! These formats sit outside the metadata core; the handlers report
//! dimensions and MIME type and refuse everything else, matching the
//! original scope.

use crate::traits::{AccessMode, ImageHandler};
use crate::{ImageState, Result};
use pixmeta_core::{Error, Family};

macro_rules! read_only {
    ($name:literal) => {
        fn access_mode(&self, _family: Family) -> AccessMode {
            AccessMode::None
        }

        fn write_metadata(&self, _data: &[u8], _state: &ImageState) -> Result<Vec<u8>> {
            Err(Error::FormatUnsupportedForWrite($name))
        }
    };
}

/// GIF 87a/89a.
pub struct GifHandler;

impl ImageHandler for GifHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a")
    }

    fn format_name(&self) -> &'static str {
        "GIF"
    }

    fn mime_type(&self) -> &'static str {
        "image/gif"
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        if data.len() < 10 {
            return Err(Error::CorruptedMetadata("GIF"));
        }
        state.pixel_width = u16::from_le_bytes([data[6], data[7]]) as u32;
        state.pixel_height = u16::from_le_bytes([data[8], data[9]]) as u32;
        Ok(())
    }

    read_only!("GIF");
}

/// Windows bitmap.
pub struct BmpHandler;

impl ImageHandler for BmpHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(b"BM")
    }

    fn format_name(&self) -> &'static str {
        "BMP"
    }

    fn mime_type(&self) -> &'static str {
        "image/bmp"
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        if data.len() < 26 {
            return Err(Error::CorruptedMetadata("BMP"));
        }
        state.pixel_width = u32::from_le_bytes([data[18], data[19], data[20], data[21]]);
        state.pixel_height =
            u32::from_le_bytes([data[22], data[23], data[24], data[25]]).min(i32::MAX as u32);
        Ok(())
    }

    read_only!("BMP");
}

/// Truevision TGA. There is no magic number; detection validates the
/// header fields instead, which is why this handler probes last.
pub struct TgaHandler;

impl ImageHandler for TgaHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        if header.len() < 18 {
            return false;
        }
        // Color map type: 0 or 1.
        let color_map_type = header[1];
        if color_map_type > 1 {
            return false;
        }
        // Valid image types: 0-3, 9-11, 32-33.
        let image_type = header[2];
        if ![0, 1, 2, 3, 9, 10, 11, 32, 33].contains(&image_type) {
            return false;
        }
        // Without a color map, the color map fields must be zero.
        if color_map_type == 0 {
            let cm_first = u16::from_le_bytes([header[3], header[4]]);
            let cm_length = u16::from_le_bytes([header[5], header[6]]);
            let cm_depth = header[7];
            if cm_first != 0 || cm_length != 0 || cm_depth != 0 {
                return false;
            }
        }
        // Pixel depth: 8, 15, 16, 24 or 32.
        let pixel_depth = header[16];
        if image_type != 0 && ![8, 15, 16, 24, 32].contains(&pixel_depth) {
            return false;
        }
        true
    }

    fn format_name(&self) -> &'static str {
        "TGA"
    }

    fn mime_type(&self) -> &'static str {
        "image/targa"
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        if data.len() < 18 {
            return Err(Error::CorruptedMetadata("TGA"));
        }
        state.pixel_width = u16::from_le_bytes([data[12], data[13]]) as u32;
        state.pixel_height = u16::from_le_bytes([data[14], data[15]]) as u32;
        Ok(())
    }

    read_only!("TGA");
}

/// Canon CRW (CIFF). Geometry is buried in the heap; only the
/// container is recognized here.
pub struct CrwHandler;

impl ImageHandler for CrwHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.len() >= 14 && &header[..2] == b"II" && &header[6..14] == b"HEAPCCDR"
    }

    fn format_name(&self) -> &'static str {
        "CRW"
    }

    fn mime_type(&self) -> &'static str {
        "image/x-canon-crw"
    }

    fn read_metadata(&self, data: &[u8], _state: &mut ImageState) -> Result<()> {
        if data.len() < 14 {
            return Err(Error::CorruptedMetadata("CRW"));
        }
        Ok(())
    }

    read_only!("CRW");
}

/// Encapsulated PostScript.
pub struct EpsHandler;

impl ImageHandler for EpsHandler {
    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(b"%!PS-Adobe")
            || header.starts_with(&[0xc5, 0xd0, 0xd3, 0xc6])
    }

    fn format_name(&self) -> &'static str {
        "EPS"
    }

    fn mime_type(&self) -> &'static str {
        "application/postscript"
    }

    fn read_metadata(&self, data: &[u8], state: &mut ImageState) -> Result<()> {
        // %%BoundingBox: llx lly urx ury
        let text = String::from_utf8_lossy(&data[..data.len().min(8192)]);
        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("%%BoundingBox:") {
                let nums: Vec<i64> = rest
                    .split_whitespace()
                    .filter_map(|t| t.parse().ok())
                    .collect();
                if let [llx, lly, urx, ury] = nums[..] {
                    state.pixel_width = (urx - llx).max(0) as u32;
                    state.pixel_height = (ury - lly).max(0) as u32;
                }
                break;
            }
        }
        Ok(())
    }

    read_only!("EPS");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gif_geometry() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&320u16.to_le_bytes());
        data.extend_from_slice(&200u16.to_le_bytes());
        let mut state = ImageState::default();
        GifHandler.read_metadata(&data, &mut state).unwrap();
        assert_eq!((state.pixel_width, state.pixel_height), (320, 200));
        assert!(matches!(
            GifHandler.write_metadata(&data, &state),
            Err(Error::FormatUnsupportedForWrite("GIF"))
        ));
    }

    #[test]
    fn eps_bounding_box() {
        let data = b"%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 10 20 110 220\n";
        let mut state = ImageState::default();
        EpsHandler.read_metadata(data, &mut state).unwrap();
        assert_eq!((state.pixel_width, state.pixel_height), (100, 200));
    }

    #[test]
    fn tga_sniff_validates_header_fields() {
        let mut header = [0u8; 18];
        header[2] = 2; // uncompressed true-color
        header[12..14].copy_from_slice(&320u16.to_le_bytes());
        header[14..16].copy_from_slice(&200u16.to_le_bytes());
        header[16] = 32;
        assert!(TgaHandler.sniff(&header));

        let mut state = ImageState::default();
        TgaHandler.read_metadata(&header, &mut state).unwrap();
        assert_eq!((state.pixel_width, state.pixel_height), (320, 200));

        // Bad image type, bad color map type, bad pixel depth.
        let mut bad = header;
        bad[2] = 99;
        assert!(!TgaHandler.sniff(&bad));
        let mut bad = header;
        bad[1] = 5;
        assert!(!TgaHandler.sniff(&bad));
        let mut bad = header;
        bad[16] = 7;
        assert!(!TgaHandler.sniff(&bad));
        // Non-zero color map fields without a color map.
        let mut bad = header;
        bad[5] = 1;
        assert!(!TgaHandler.sniff(&bad));

        assert!(!TgaHandler.sniff(&[0u8; 12]));
    }
}
