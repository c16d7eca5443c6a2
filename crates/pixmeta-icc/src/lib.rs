//! ICC profile inspection.
//!
//! Profiles travel through the library verbatim; this crate only
//! validates the 128-byte header before a profile is accepted and
//! pulls out the fields worth showing (color space, class,
//! description). Layout per ICC.1:2010.

use thiserror::Error;

#[derive(Debug, Error)]
#[must_use]
pub enum Error {
    #[error("ICC profile too short: {0} bytes")]
    TooShort(usize),

    #[error("invalid ICC signature")]
    BadSignature,

    #[error("ICC header size {header} exceeds data size {actual}")]
    SizeMismatch { header: u32, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Minimum valid profile: just the header.
pub const HEADER_LEN: usize = 128;

/// The `acsp` magic at offset 36.
const ACSP: &[u8; 4] = b"acsp";

/// Parsed ICC profile header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IccHeader {
    /// Declared profile size in bytes.
    pub size: u32,
    /// Preferred CMM type.
    pub cmm: [u8; 4],
    /// Profile class (mntr, scnr, prtr, ...).
    pub class: [u8; 4],
    /// Data color space (RGB, CMYK, GRAY, ...).
    pub color_space: [u8; 4],
    /// Profile connection space.
    pub pcs: [u8; 4],
}

impl IccHeader {
    pub fn color_space_name(&self) -> String {
        String::from_utf8_lossy(&self.color_space).trim().to_string()
    }

    pub fn class_name(&self) -> String {
        String::from_utf8_lossy(&self.class).trim().to_string()
    }
}

fn four(data: &[u8], offset: usize) -> [u8; 4] {
    [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
}

/// Validate a profile and parse its header.
///
/// Rejects anything shorter than the header, without the `acsp`
/// magic, or whose declared size exceeds the actual bytes.
pub fn parse_header(data: &[u8]) -> Result<IccHeader> {
    if data.len() < HEADER_LEN {
        return Err(Error::TooShort(data.len()));
    }
    if &four(data, 36) != ACSP {
        return Err(Error::BadSignature);
    }
    let size = u32::from_be_bytes(four(data, 0));
    if size as usize > data.len() {
        return Err(Error::SizeMismatch {
            header: size,
            actual: data.len(),
        });
    }
    Ok(IccHeader {
        size,
        cmm: four(data, 4),
        class: four(data, 12),
        color_space: four(data, 16),
        pcs: four(data, 20),
    })
}

/// Quick validity check used by handlers before storing a profile.
pub fn is_valid(data: &[u8]) -> bool {
    parse_header(data).is_ok()
}

/// Profile description from the `desc` tag, if present.
///
/// Handles the legacy `desc` (textDescription) and `mluc`
/// (multiLocalizedUnicode) encodings.
pub fn description(data: &[u8]) -> Option<String> {
    parse_header(data).ok()?;
    let tag_count = u32::from_be_bytes(four(data, HEADER_LEN)) as usize;
    if tag_count > 1024 {
        return None;
    }
    for i in 0..tag_count {
        let entry = HEADER_LEN + 4 + i * 12;
        if entry + 12 > data.len() {
            return None;
        }
        if &four(data, entry) != b"desc" {
            continue;
        }
        let offset = u32::from_be_bytes(four(data, entry + 4)) as usize;
        let size = u32::from_be_bytes(four(data, entry + 8)) as usize;
        if offset + size > data.len() || size < 12 {
            return None;
        }
        let body = &data[offset..offset + size];
        return match &body[0..4] {
            b"desc" => {
                // textDescription: u32 length at 8, ASCII at 12.
                let len = u32::from_be_bytes(four(body, 8)) as usize;
                if 12 + len > body.len() {
                    return None;
                }
                let text = &body[12..12 + len];
                let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
                Some(String::from_utf8_lossy(&text[..end]).into_owned())
            }
            b"mluc" => {
                // First record: UTF-16BE string at (offset, length) from 16.
                if body.len() < 28 {
                    return None;
                }
                let str_len = u32::from_be_bytes(four(body, 20)) as usize;
                let str_off = u32::from_be_bytes(four(body, 24)) as usize;
                if str_off + str_len > body.len() {
                    return None;
                }
                let utf16: Vec<u16> = body[str_off..str_off + str_len]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                Some(String::from_utf16_lossy(&utf16))
            }
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> Vec<u8> {
        let mut p = vec![0u8; HEADER_LEN + 4];
        let total = p.len() as u32;
        p[0..4].copy_from_slice(&total.to_be_bytes());
        p[12..16].copy_from_slice(b"mntr");
        p[16..20].copy_from_slice(b"RGB ");
        p[20..24].copy_from_slice(b"XYZ ");
        p[36..40].copy_from_slice(b"acsp");
        // zero tags
        p
    }

    #[test]
    fn accepts_minimal_profile() {
        let p = minimal_profile();
        let header = parse_header(&p).unwrap();
        assert_eq!(header.color_space_name(), "RGB");
        assert_eq!(header.class_name(), "mntr");
        assert!(is_valid(&p));
    }

    #[test]
    fn rejects_short_and_bad_magic() {
        assert!(matches!(parse_header(&[0u8; 20]), Err(Error::TooShort(20))));
        let mut p = minimal_profile();
        p[36] = b'x';
        assert!(matches!(parse_header(&p), Err(Error::BadSignature)));
    }

    #[test]
    fn rejects_size_overrun() {
        let mut p = minimal_profile();
        p[0..4].copy_from_slice(&(10_000u32).to_be_bytes());
        assert!(matches!(parse_header(&p), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn reads_text_description() {
        let mut p = minimal_profile();
        // one tag table entry: desc at end
        let desc_body: &[u8] = &[
            b'd', b'e', b's', b'c', 0, 0, 0, 0, // type + reserved
            0, 0, 0, 5, // length
            b's', b'R', b'G', b'B', 0,
        ];
        let desc_offset = p.len() as u32 + 12;
        p[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&1u32.to_be_bytes());
        p.extend_from_slice(b"desc");
        p.extend_from_slice(&desc_offset.to_be_bytes());
        p.extend_from_slice(&(desc_body.len() as u32).to_be_bytes());
        p.extend_from_slice(desc_body);
        let total = p.len() as u32;
        p[0..4].copy_from_slice(&total.to_be_bytes());

        assert_eq!(description(&p).as_deref(), Some("sRGB"));
    }
}
