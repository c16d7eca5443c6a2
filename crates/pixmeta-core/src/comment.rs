//! Charset-prefixed user comments.
//!
//! The Exif UserComment payload starts with an 8-byte ASCII charset
//! designation (`ASCII`, `JIS`, `UNICODE`, or eight zero bytes for
//! undefined) followed by the raw comment bytes. UTF-16 comments may
//! carry a BOM; it is stripped on read and the detected endianness is
//! remembered for the decoded view.

use crate::ByteOrder;
use encoding_rs::{ISO_2022_JP, UTF_16BE, UTF_16LE};

const CHARSET_FIELD_LEN: usize = 8;

/// Charset designation of a user comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharsetId {
    Ascii,
    Jis,
    Unicode,
    #[default]
    Undefined,
}

impl CharsetId {
    /// The 8-byte on-disk designation.
    pub const fn prefix(self) -> &'static [u8; CHARSET_FIELD_LEN] {
        match self {
            CharsetId::Ascii => b"ASCII\0\0\0",
            CharsetId::Jis => b"JIS\0\0\0\0\0",
            CharsetId::Unicode => b"UNICODE\0",
            CharsetId::Undefined => b"\0\0\0\0\0\0\0\0",
        }
    }

    fn from_prefix(bytes: &[u8; CHARSET_FIELD_LEN]) -> Self {
        match bytes {
            b"ASCII\0\0\0" => CharsetId::Ascii,
            b"JIS\0\0\0\0\0" => CharsetId::Jis,
            b"UNICODE\0" => CharsetId::Unicode,
            _ => CharsetId::Undefined,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CharsetId::Ascii => "Ascii",
            CharsetId::Jis => "Jis",
            CharsetId::Unicode => "Unicode",
            CharsetId::Undefined => "Undefined",
        }
    }
}

/// A decoded user comment: charset designation plus raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub struct CommentValue {
    pub charset: CharsetId,
    /// Raw payload after the designation, BOM stripped.
    pub payload: Vec<u8>,
    /// Endianness of a UTF-16 payload, from BOM or the enclosing TIFF.
    pub ucs2_order: ByteOrder,
}

impl CommentValue {
    /// Parse the on-disk representation.
    ///
    /// Payloads shorter than the 8-byte designation are kept verbatim
    /// under the Undefined charset.
    pub fn read(data: &[u8], byte_order: ByteOrder) -> Self {
        if data.len() < CHARSET_FIELD_LEN {
            return Self {
                charset: CharsetId::Undefined,
                payload: data.to_vec(),
                ucs2_order: ByteOrder::Invalid,
            };
        }
        let mut prefix = [0u8; CHARSET_FIELD_LEN];
        prefix.copy_from_slice(&data[..CHARSET_FIELD_LEN]);
        let charset = CharsetId::from_prefix(&prefix);
        let mut payload = &data[CHARSET_FIELD_LEN..];

        let mut ucs2_order = ByteOrder::Invalid;
        if charset == CharsetId::Unicode {
            if payload.starts_with(&[0xff, 0xfe]) {
                ucs2_order = ByteOrder::Little;
                payload = &payload[2..];
            } else if payload.starts_with(&[0xfe, 0xff]) {
                ucs2_order = ByteOrder::Big;
                payload = &payload[2..];
            } else {
                // No BOM: the enclosing TIFF byte order decides.
                ucs2_order = match byte_order {
                    ByteOrder::Big => ByteOrder::Big,
                    _ => ByteOrder::Little,
                };
            }
        }

        Self {
            charset,
            payload: payload.to_vec(),
            ucs2_order,
        }
    }

    /// Build a comment from UTF-8 text in the given charset.
    pub fn from_str(text: &str, charset: CharsetId) -> Self {
        let (payload, ucs2_order) = match charset {
            CharsetId::Unicode => {
                let mut buf = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    buf.extend_from_slice(&unit.to_le_bytes());
                }
                (buf, ByteOrder::Little)
            }
            CharsetId::Jis => {
                let (encoded, _, _) = ISO_2022_JP.encode(text);
                (encoded.into_owned(), ByteOrder::Invalid)
            }
            _ => (text.as_bytes().to_vec(), ByteOrder::Invalid),
        };
        Self {
            charset,
            payload,
            ucs2_order,
        }
    }

    /// Serialize: designation followed by the raw payload, no BOM.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(CHARSET_FIELD_LEN + self.payload.len());
        buf.extend_from_slice(self.charset.prefix());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// The UTF-8 decoded view of the comment.
    pub fn comment(&self) -> String {
        match self.charset {
            CharsetId::Unicode => {
                let codec = match self.ucs2_order {
                    ByteOrder::Big => UTF_16BE,
                    _ => UTF_16LE,
                };
                let (text, _) = codec.decode_without_bom_handling(&self.payload);
                text.into_owned()
            }
            CharsetId::Jis => {
                let (text, _, _) = ISO_2022_JP.decode(&self.payload);
                text.into_owned()
            }
            _ => String::from_utf8_lossy(&self.payload)
                .trim_end_matches('\0')
                .to_string(),
        }
    }

    pub fn byte_len(&self) -> usize {
        CHARSET_FIELD_LEN + self.payload.len()
    }
}

impl std::fmt::Display for CommentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.comment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip() {
        let c = CommentValue::from_str("hello", CharsetId::Ascii);
        let bytes = c.to_bytes();
        assert_eq!(&bytes[..8], b"ASCII\0\0\0");
        let back = CommentValue::read(&bytes, ByteOrder::Little);
        assert_eq!(back.comment(), "hello");
        assert_eq!(back.charset, CharsetId::Ascii);
    }

    #[test]
    fn unicode_bom_detection() {
        // UNICODE designation + UTF-16LE BOM + "Hi"
        let mut data = b"UNICODE\0".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'H', 0x00, b'i', 0x00]);
        let c = CommentValue::read(&data, ByteOrder::Big);
        assert_eq!(c.ucs2_order, ByteOrder::Little);
        assert_eq!(c.comment(), "Hi");

        // Big-endian BOM
        let mut data = b"UNICODE\0".to_vec();
        data.extend_from_slice(&[0xfe, 0xff, 0x00, b'H', 0x00, b'i']);
        let c = CommentValue::read(&data, ByteOrder::Little);
        assert_eq!(c.ucs2_order, ByteOrder::Big);
        assert_eq!(c.comment(), "Hi");
    }

    #[test]
    fn unicode_without_bom_uses_tiff_order() {
        let mut data = b"UNICODE\0".to_vec();
        data.extend_from_slice(&[0x00, b'H', 0x00, b'i']);
        let c = CommentValue::read(&data, ByteOrder::Big);
        assert_eq!(c.comment(), "Hi");
    }

    #[test]
    fn short_payload_is_undefined() {
        let c = CommentValue::read(b"abc", ByteOrder::Little);
        assert_eq!(c.charset, CharsetId::Undefined);
        assert_eq!(c.payload, b"abc");
    }
}
