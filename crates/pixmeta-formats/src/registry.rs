//! Handler registry and magic sniffing.
//!
//! Detection order is fixed: formats with unambiguous magic first,
//! EXV ahead of JPEG (both start near 0xFF markers), generic TIFF
//! last among the TIFF-alikes.

use crate::traits::ImageHandler;
use crate::{
    BmffHandler, BmpHandler, CrwHandler, EpsHandler, ExvHandler, GifHandler, Jp2Handler,
    JpegHandler, PngHandler, PsdHandler, TgaHandler, TiffHandler, WebpHandler,
    XmpSidecarHandler,
};

/// All handlers, in sniffing order.
pub static HANDLERS: &[&(dyn ImageHandler)] = &[
    &ExvHandler,
    &JpegHandler,
    &PngHandler,
    &PsdHandler,
    &WebpHandler,
    &Jp2Handler,
    &BmffHandler,
    &GifHandler,
    &BmpHandler,
    &CrwHandler,
    &EpsHandler,
    &XmpSidecarHandler,
    // TGA has no magic and is detected by header-field validation,
    // so it probes after everything else, TIFF included.
    &TiffHandler,
    &TgaHandler,
];

/// Find the handler whose signature matches the byte prefix.
pub fn handler_for(header: &[u8]) -> Option<&'static dyn ImageHandler> {
    HANDLERS.iter().find(|h| h.sniff(header)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_magic() {
        let h = handler_for(&[0xff, 0xd8, 0xff, 0xe0, 0, 0, 0, 0]).unwrap();
        assert_eq!(h.format_name(), "JPEG");
    }

    #[test]
    fn png_magic() {
        let h = handler_for(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).unwrap();
        assert_eq!(h.format_name(), "PNG");
    }

    #[test]
    fn tiff_magic_both_orders() {
        assert_eq!(
            handler_for(b"II\x2a\x00\x08\x00\x00\x00").unwrap().format_name(),
            "TIFF"
        );
        assert_eq!(
            handler_for(b"MM\x00\x2a\x00\x00\x00\x08").unwrap().format_name(),
            "TIFF"
        );
    }

    #[test]
    fn tga_header_heuristic() {
        // Uncompressed true-color 640x480, 24-bit.
        let mut header = [0u8; 18];
        header[2] = 2;
        header[12..14].copy_from_slice(&640u16.to_le_bytes());
        header[14..16].copy_from_slice(&480u16.to_le_bytes());
        header[16] = 24;
        let h = handler_for(&header).unwrap();
        assert_eq!(h.format_name(), "TGA");
    }

    #[test]
    fn unknown_magic_is_rejected() {
        assert!(handler_for(b"not an image at all").is_none());
        assert!(handler_for(&[]).is_none());
    }
}
