//! String charset conversion.
//!
//! The conversion bridge and the IPTC codec both need to move text
//! between the encodings that appear in image metadata. The required
//! matrix is {UTF-8, UCS-2BE, UCS-2LE, ISO-8859-1, ASCII} in both
//! directions, handled here without shelling out to anything.

use crate::{Error, Result};
use encoding_rs::{UTF_16BE, UTF_16LE};

/// Character sets of the conversion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Charset {
    Utf8,
    Ucs2Be,
    Ucs2Le,
    Iso8859_1,
    Ascii,
}

impl Charset {
    /// Parse an iconv-style charset name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "UCS-2BE" | "UTF-16BE" => Ok(Charset::Ucs2Be),
            "UCS-2LE" | "UTF-16LE" => Ok(Charset::Ucs2Le),
            "ISO-8859-1" | "LATIN1" => Ok(Charset::Iso8859_1),
            "ASCII" | "US-ASCII" => Ok(Charset::Ascii),
            _ => Err(Error::InvalidCharsetEncoding(name.to_string())),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Ucs2Be => "UCS-2BE",
            Charset::Ucs2Le => "UCS-2LE",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Ascii => "ASCII",
        }
    }
}

/// Decode `data` in `from` to a Rust string.
///
/// Undecodable sequences become U+FFFD, matching the tolerant policy
/// of metadata readers.
pub fn decode(data: &[u8], from: Charset) -> String {
    match from {
        Charset::Utf8 => String::from_utf8_lossy(data).into_owned(),
        Charset::Ucs2Be => UTF_16BE.decode_without_bom_handling(data).0.into_owned(),
        Charset::Ucs2Le => UTF_16LE.decode_without_bom_handling(data).0.into_owned(),
        // Latin-1 maps bytes to the first 256 code points directly.
        Charset::Iso8859_1 => data.iter().map(|&b| b as char).collect(),
        Charset::Ascii => data
            .iter()
            .map(|&b| if b < 0x80 { b as char } else { '\u{fffd}' })
            .collect(),
    }
}

/// Encode a Rust string into `to`.
///
/// Characters outside the target repertoire are replaced with `?`.
pub fn encode(s: &str, to: Charset) -> Vec<u8> {
    match to {
        Charset::Utf8 => s.as_bytes().to_vec(),
        Charset::Ucs2Be => {
            let mut buf = Vec::with_capacity(s.len() * 2);
            for unit in s.encode_utf16() {
                buf.extend_from_slice(&unit.to_be_bytes());
            }
            buf
        }
        Charset::Ucs2Le => {
            let mut buf = Vec::with_capacity(s.len() * 2);
            for unit in s.encode_utf16() {
                buf.extend_from_slice(&unit.to_le_bytes());
            }
            buf
        }
        Charset::Iso8859_1 => s
            .chars()
            .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
            .collect(),
        Charset::Ascii => s
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect(),
    }
}

/// Convert a byte string from one charset to another.
pub fn convert_string_charset(data: &[u8], from: Charset, to: Charset) -> Vec<u8> {
    if from == to {
        return data.to_vec();
    }
    encode(&decode(data, from), to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_matrix_round_trips_ascii() {
        let all = [
            Charset::Utf8,
            Charset::Ucs2Be,
            Charset::Ucs2Le,
            Charset::Iso8859_1,
            Charset::Ascii,
        ];
        for &from in &all {
            for &to in &all {
                let encoded = encode("metadata", from);
                let converted = convert_string_charset(&encoded, from, to);
                assert_eq!(decode(&converted, to), "metadata", "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn latin1_to_utf8() {
        // "café" in Latin-1
        let latin = [b'c', b'a', b'f', 0xe9];
        let utf8 = convert_string_charset(&latin, Charset::Iso8859_1, Charset::Utf8);
        assert_eq!(std::str::from_utf8(&utf8).unwrap(), "café");
    }

    #[test]
    fn ucs2_endianness() {
        let be = encode("A", Charset::Ucs2Be);
        assert_eq!(be, [0x00, 0x41]);
        let le = encode("A", Charset::Ucs2Le);
        assert_eq!(le, [0x41, 0x00]);
        assert_eq!(decode(&be, Charset::Ucs2Be), "A");
        assert_eq!(decode(&le, Charset::Ucs2Le), "A");
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(Charset::from_name("KOI8-R").is_err());
        assert_eq!(Charset::from_name("utf-8").unwrap(), Charset::Utf8);
    }

    #[test]
    fn non_ascii_replaced_on_narrowing() {
        let bytes = encode("caf\u{e9}", Charset::Ascii);
        assert_eq!(bytes, b"caf?");
    }
}
