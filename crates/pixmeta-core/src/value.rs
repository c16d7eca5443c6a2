//! The typed value model shared by the Exif, IPTC and XMP namespaces.
//!
//! A [`Value`] is a tagged union over the TIFF primitive types plus
//! the string-like and XMP shapes. Numeric variants hold a vector of
//! components; a scalar is a vector of length one. Conversions are
//! failure-aware: they return `Option` instead of panicking or
//! saturating, so a zero denominator or an out-of-range float is a
//! `None`, never a trap.

use crate::comment::CommentValue;
use crate::datetime::{DateValue, TimeValue};
use crate::rational::{f64_to_i64, f64_to_srational, f64_to_u32, SRational, URational};
use crate::{ByteOrder, Error, Result, TypeId};

/// XMP array flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XmpArrayKind {
    /// rdf:Alt - alternatives, first is default.
    Alt,
    /// rdf:Bag - unordered.
    Bag,
    /// rdf:Seq - ordered.
    Seq,
}

/// Language alternative: ordered (language tag, text) pairs.
///
/// Language tags compare case-insensitively (RFC 3066 via XMP spec
/// part 1, B.4); insertion order is preserved for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub struct LangAltValue {
    entries: Vec<(String, String)>,
}

impl LangAltValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text for a language, replacing a case-insensitive match.
    pub fn set(&mut self, lang: &str, text: impl Into<String>) {
        let text = text.into();
        for (l, t) in &mut self.entries {
            if l.eq_ignore_ascii_case(lang) {
                *t = text;
                return;
            }
        }
        self.entries.push((lang.to_string(), text));
    }

    /// Look up a language tag, case-insensitively.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(lang))
            .map(|(_, t)| t.as_str())
    }

    /// The `x-default` entry, or the first entry.
    pub fn default_text(&self) -> Option<&str> {
        self.get("x-default")
            .or_else(|| self.entries.first().map(|(_, t)| t.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A metadata value.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<URational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Ifd(Vec<u32>),
    Long8(Vec<u64>),
    SLong8(Vec<i64>),
    Ifd8(Vec<u64>),
    Comment(CommentValue),
    Date(DateValue),
    Time(TimeValue),
    XmpText(String),
    XmpArray(XmpArrayKind, Vec<String>),
    LangAlt(LangAltValue),
}

impl Value {
    /// Decode `data` as `type_id` components in the given byte order.
    ///
    /// `data` must be exactly `count * type_size` bytes; the caller
    /// has already bounds-checked the slice against the stream.
    pub fn read(type_id: TypeId, data: &[u8], byte_order: ByteOrder) -> Result<Value> {
        let elem = type_id.size();
        if elem > 1 && data.len() % elem != 0 {
            return Err(Error::UnexpectedEof {
                need: data.len().next_multiple_of(elem),
                have: data.len(),
            });
        }
        let value = match type_id {
            TypeId::UnsignedByte => Value::Byte(data.to_vec()),
            TypeId::AsciiString => {
                let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
                Value::Ascii(String::from_utf8_lossy(&data[..end]).into_owned())
            }
            TypeId::Undefined => Value::Undefined(data.to_vec()),
            TypeId::SignedByte => Value::SByte(data.iter().map(|&b| b as i8).collect()),
            TypeId::UnsignedShort => Value::Short(
                data.chunks_exact(2)
                    .map(|c| byte_order.read_u16([c[0], c[1]]))
                    .collect(),
            ),
            TypeId::SignedShort => Value::SShort(
                data.chunks_exact(2)
                    .map(|c| byte_order.read_i16([c[0], c[1]]))
                    .collect(),
            ),
            TypeId::UnsignedLong => Value::Long(
                data.chunks_exact(4)
                    .map(|c| byte_order.read_u32([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TypeId::SignedLong => Value::SLong(
                data.chunks_exact(4)
                    .map(|c| byte_order.read_i32([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TypeId::TiffIfd => Value::Ifd(
                data.chunks_exact(4)
                    .map(|c| byte_order.read_u32([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TypeId::UnsignedRational => Value::Rational(
                data.chunks_exact(8)
                    .map(|c| {
                        URational::new(
                            byte_order.read_u32([c[0], c[1], c[2], c[3]]),
                            byte_order.read_u32([c[4], c[5], c[6], c[7]]),
                        )
                    })
                    .collect(),
            ),
            TypeId::SignedRational => Value::SRational(
                data.chunks_exact(8)
                    .map(|c| {
                        SRational::new(
                            byte_order.read_i32([c[0], c[1], c[2], c[3]]),
                            byte_order.read_i32([c[4], c[5], c[6], c[7]]),
                        )
                    })
                    .collect(),
            ),
            TypeId::TiffFloat => Value::Float(
                data.chunks_exact(4)
                    .map(|c| byte_order.read_f32([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TypeId::TiffDouble => Value::Double(
                data.chunks_exact(8)
                    .map(|c| {
                        byte_order.read_f64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                    })
                    .collect(),
            ),
            TypeId::UnsignedLong8 => Value::Long8(
                data.chunks_exact(8)
                    .map(|c| {
                        byte_order.read_u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                    })
                    .collect(),
            ),
            TypeId::SignedLong8 => Value::SLong8(
                data.chunks_exact(8)
                    .map(|c| {
                        byte_order.read_i64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                    })
                    .collect(),
            ),
            TypeId::TiffIfd8 => Value::Ifd8(
                data.chunks_exact(8)
                    .map(|c| {
                        byte_order.read_u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                    })
                    .collect(),
            ),
            TypeId::Comment => Value::Comment(CommentValue::read(data, byte_order)),
            _ => {
                // XMP and date/time shapes never come from TIFF bytes.
                return Err(Error::InvalidTypeValue(type_id as u32 as u16));
            }
        };
        Ok(value)
    }

    /// Serialize to on-disk bytes in the given byte order.
    ///
    /// Ascii strings gain their trailing NUL here.
    pub fn to_bytes(&self, byte_order: ByteOrder) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        match self {
            Value::Byte(v) | Value::Undefined(v) => buf.extend_from_slice(v),
            Value::Ascii(s) => {
                buf.extend_from_slice(s.as_bytes());
                buf.push(0);
            }
            Value::SByte(v) => buf.extend(v.iter().map(|&b| b as u8)),
            Value::Short(v) => v.iter().for_each(|&x| byte_order.write_u16(&mut buf, x)),
            Value::SShort(v) => v.iter().for_each(|&x| byte_order.write_i16(&mut buf, x)),
            Value::Long(v) | Value::Ifd(v) => {
                v.iter().for_each(|&x| byte_order.write_u32(&mut buf, x))
            }
            Value::SLong(v) => v.iter().for_each(|&x| byte_order.write_i32(&mut buf, x)),
            Value::Rational(v) => v.iter().for_each(|r| {
                byte_order.write_u32(&mut buf, r.num);
                byte_order.write_u32(&mut buf, r.den);
            }),
            Value::SRational(v) => v.iter().for_each(|r| {
                byte_order.write_i32(&mut buf, r.num);
                byte_order.write_i32(&mut buf, r.den);
            }),
            Value::Float(v) => v.iter().for_each(|&x| byte_order.write_f32(&mut buf, x)),
            Value::Double(v) => v.iter().for_each(|&x| byte_order.write_f64(&mut buf, x)),
            Value::Long8(v) | Value::Ifd8(v) => {
                v.iter().for_each(|&x| byte_order.write_u64(&mut buf, x))
            }
            Value::SLong8(v) => v.iter().for_each(|&x| byte_order.write_i64(&mut buf, x)),
            Value::Comment(c) => buf.extend_from_slice(&c.to_bytes()),
            Value::Date(d) => buf.extend_from_slice(d.to_string().as_bytes()),
            Value::Time(t) => buf.extend_from_slice(t.to_string().as_bytes()),
            Value::XmpText(s) => buf.extend_from_slice(s.as_bytes()),
            Value::XmpArray(_, items) => {
                buf.extend_from_slice(items.join(", ").as_bytes());
            }
            Value::LangAlt(l) => {
                buf.extend_from_slice(l.default_text().unwrap_or_default().as_bytes());
            }
        }
        buf
    }

    /// Type identifier of this value.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Byte(_) => TypeId::UnsignedByte,
            Value::Ascii(_) => TypeId::AsciiString,
            Value::Short(_) => TypeId::UnsignedShort,
            Value::Long(_) => TypeId::UnsignedLong,
            Value::Rational(_) => TypeId::UnsignedRational,
            Value::SByte(_) => TypeId::SignedByte,
            Value::Undefined(_) => TypeId::Undefined,
            Value::SShort(_) => TypeId::SignedShort,
            Value::SLong(_) => TypeId::SignedLong,
            Value::SRational(_) => TypeId::SignedRational,
            Value::Float(_) => TypeId::TiffFloat,
            Value::Double(_) => TypeId::TiffDouble,
            Value::Ifd(_) => TypeId::TiffIfd,
            Value::Long8(_) => TypeId::UnsignedLong8,
            Value::SLong8(_) => TypeId::SignedLong8,
            Value::Ifd8(_) => TypeId::TiffIfd8,
            Value::Comment(_) => TypeId::Comment,
            Value::Date(_) => TypeId::Date,
            Value::Time(_) => TypeId::Time,
            Value::XmpText(_) => TypeId::XmpText,
            Value::XmpArray(XmpArrayKind::Alt, _) => TypeId::XmpAlt,
            Value::XmpArray(XmpArrayKind::Bag, _) => TypeId::XmpBag,
            Value::XmpArray(XmpArrayKind::Seq, _) => TypeId::XmpSeq,
            Value::LangAlt(_) => TypeId::LangAlt,
        }
    }

    /// Number of components.
    ///
    /// For Ascii this counts the serialized bytes including the
    /// trailing NUL, matching the TIFF entry count.
    pub fn count(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Undefined(v) => v.len(),
            Value::Ascii(s) => s.len() + 1,
            Value::SByte(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::Long(v) | Value::Ifd(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Long8(v) | Value::Ifd8(v) => v.len(),
            Value::SLong8(v) => v.len(),
            Value::Comment(c) => c.byte_len(),
            Value::Date(_) | Value::Time(_) => 1,
            Value::XmpText(_) | Value::LangAlt(_) => 1,
            Value::XmpArray(_, items) => items.len(),
        }
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        match self {
            Value::Comment(c) => c.byte_len(),
            Value::Date(d) => d.to_string().len(),
            Value::Time(t) => t.to_string().len(),
            Value::XmpText(s) => s.len(),
            Value::XmpArray(_, items) => items.iter().map(|s| s.len() + 2).sum(),
            Value::LangAlt(l) => l.iter().map(|(k, v)| k.len() + v.len()).sum(),
            _ => self.count() * self.type_id().size(),
        }
    }

    /// Component `n` as u32.
    pub fn to_u32(&self, n: usize) -> Option<u32> {
        match self {
            Value::Byte(v) => v.get(n).map(|&x| x as u32),
            Value::Short(v) => v.get(n).map(|&x| x as u32),
            Value::Long(v) | Value::Ifd(v) => v.get(n).copied(),
            Value::SByte(v) => v.get(n).and_then(|&x| u32::try_from(x).ok()),
            Value::SShort(v) => v.get(n).and_then(|&x| u32::try_from(x).ok()),
            Value::SLong(v) => v.get(n).and_then(|&x| u32::try_from(x).ok()),
            Value::Long8(v) | Value::Ifd8(v) => v.get(n).and_then(|&x| u32::try_from(x).ok()),
            Value::SLong8(v) => v.get(n).and_then(|&x| u32::try_from(x).ok()),
            Value::Rational(v) => v.get(n).and_then(|r| r.to_u32()),
            Value::SRational(v) => v.get(n).and_then(|r| r.to_u32()),
            Value::Float(v) => v.get(n).and_then(|&x| f64_to_u32(x as f64)),
            Value::Double(v) => v.get(n).and_then(|&x| f64_to_u32(x)),
            Value::Ascii(s) => s.trim().parse().ok(),
            Value::XmpText(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Component `n` as i64.
    pub fn to_i64(&self, n: usize) -> Option<i64> {
        match self {
            Value::Byte(v) => v.get(n).map(|&x| x as i64),
            Value::SByte(v) => v.get(n).map(|&x| x as i64),
            Value::Short(v) => v.get(n).map(|&x| x as i64),
            Value::SShort(v) => v.get(n).map(|&x| x as i64),
            Value::Long(v) | Value::Ifd(v) => v.get(n).map(|&x| x as i64),
            Value::SLong(v) => v.get(n).map(|&x| x as i64),
            Value::Long8(v) | Value::Ifd8(v) => v.get(n).and_then(|&x| i64::try_from(x).ok()),
            Value::SLong8(v) => v.get(n).copied(),
            Value::Rational(v) => v
                .get(n)
                .and_then(|r| if r.den == 0 { None } else { Some(r.num as i64 / r.den as i64) }),
            Value::SRational(v) => v.get(n).and_then(|r| r.to_i64()),
            Value::Float(v) => v.get(n).and_then(|&x| f64_to_i64(x as f64)),
            Value::Double(v) => v.get(n).and_then(|&x| f64_to_i64(x)),
            Value::Ascii(s) => s.trim().parse().ok(),
            Value::XmpText(s) => s.trim().parse().ok(),
            Value::Date(d) => d.to_i64(),
            Value::Time(t) => Some(t.to_i64()),
            _ => None,
        }
    }

    /// Component `n` as f64.
    pub fn to_f64(&self, n: usize) -> Option<f64> {
        match self {
            Value::Float(v) => v.get(n).map(|&x| x as f64),
            Value::Double(v) => v.get(n).copied(),
            Value::Rational(v) => v.get(n).and_then(|r| r.to_f64()),
            Value::SRational(v) => v.get(n).and_then(|r| r.to_f64()),
            Value::Ascii(s) => s.trim().parse().ok(),
            Value::XmpText(s) => s.trim().parse().ok(),
            _ => self.to_i64(n).map(|x| x as f64),
        }
    }

    /// Component `n` as signed rational.
    ///
    /// Integers become `(n, 1)`; floats truncate (documented lossy).
    pub fn to_rational(&self, n: usize) -> Option<SRational> {
        match self {
            Value::Rational(v) => v.get(n).and_then(|r| r.to_srational()),
            Value::SRational(v) => v.get(n).copied(),
            Value::Float(v) => v.get(n).and_then(|&x| f64_to_srational(x as f64)),
            Value::Double(v) => v.get(n).and_then(|&x| f64_to_srational(x)),
            _ => {
                let i = self.to_i64(n)?;
                let num = i32::try_from(i).ok()?;
                Some(SRational::new(num, 1))
            }
        }
    }

    /// Component `n` rendered as text.
    pub fn to_string_nth(&self, n: usize) -> Option<String> {
        match self {
            Value::Ascii(s) => (n == 0).then(|| s.clone()),
            Value::XmpText(s) => (n == 0).then(|| s.clone()),
            Value::Comment(c) => (n == 0).then(|| c.comment()),
            Value::Date(d) => (n == 0).then(|| d.to_string()),
            Value::Time(t) => (n == 0).then(|| t.to_string()),
            Value::XmpArray(_, items) => items.get(n).cloned(),
            Value::LangAlt(l) => (n == 0).then(|| l.default_text().unwrap_or_default().to_string()),
            Value::Rational(v) => v.get(n).map(|r| r.to_string()),
            Value::SRational(v) => v.get(n).map(|r| r.to_string()),
            Value::Float(v) => v.get(n).map(|x| x.to_string()),
            Value::Double(v) => v.get(n).map(|x| x.to_string()),
            Value::Undefined(v) => v.get(n).map(|b| b.to_string()),
            _ => self.to_i64(n).map(|x| x.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Ascii(s) => write!(f, "{s}"),
            Value::XmpText(s) => write!(f, "{s}"),
            Value::Comment(c) => write!(f, "{c}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::XmpArray(_, items) => write!(f, "{}", items.join(", ")),
            Value::LangAlt(l) => {
                let mut first = true;
                for (lang, text) in l.iter() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "lang=\"{lang}\" {text}")?;
                    first = false;
                }
                Ok(())
            }
            _ => {
                let count = self.count();
                for n in 0..count {
                    if n > 0 {
                        write!(f, " ")?;
                    }
                    match self.to_string_nth(n) {
                        Some(s) => write!(f, "{s}")?,
                        None => write!(f, "?")?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip() {
        let v = Value::Ascii("Canon".into());
        let bytes = v.to_bytes(ByteOrder::Little);
        assert_eq!(bytes, b"Canon\0");
        let back = Value::read(TypeId::AsciiString, &bytes, ByteOrder::Little).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.to_string(), "Canon");
        assert_eq!(back.count(), 6);
    }

    #[test]
    fn short_both_orders() {
        let v = Value::Short(vec![1, 2, 515]);
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = v.to_bytes(order);
            let back = Value::read(TypeId::UnsignedShort, &bytes, order).unwrap();
            assert_eq!(back, v);
        }
    }

    #[test]
    fn int_to_rational_law() {
        let v = Value::Long(vec![42]);
        assert_eq!(v.to_rational(0), Some(SRational::new(42, 1)));
    }

    #[test]
    fn zero_denominator_conversions() {
        let v = Value::Rational(vec![URational::new(1, 0)]);
        assert_eq!(v.to_f64(0), None);
        assert_eq!(v.to_u32(0), None);
        let v = Value::SRational(vec![SRational::new(1, -1)]);
        assert_eq!(v.to_i64(0), None);
    }

    #[test]
    fn float_range_checks() {
        let v = Value::Double(vec![-0.1, 4.295e9, 250.4]);
        assert_eq!(v.to_u32(0), None);
        assert_eq!(v.to_u32(1), None);
        assert_eq!(v.to_u32(2), Some(250));
    }

    #[test]
    fn truncated_data_rejected() {
        // 3 bytes cannot hold u16 components
        assert!(Value::read(TypeId::UnsignedShort, &[1, 2, 3], ByteOrder::Little).is_err());
    }

    #[test]
    fn lang_alt_case_insensitive() {
        let mut l = LangAltValue::new();
        l.set("x-default", "hello");
        l.set("en-US", "hi");
        assert_eq!(l.get("EN-us"), Some("hi"));
        l.set("EN-US", "hey");
        assert_eq!(l.len(), 2);
        assert_eq!(l.get("en-us"), Some("hey"));
        assert_eq!(l.default_text(), Some("hello"));
    }

    #[test]
    fn display_multi_component() {
        let v = Value::Short(vec![300, 1]);
        assert_eq!(v.to_string(), "300 1");
        let v = Value::Rational(vec![URational::new(72, 1)]);
        assert_eq!(v.to_string(), "72/1");
    }
}
