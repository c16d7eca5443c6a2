//! Metadata value type identifiers.
//!
//! Types 1-13 are the TIFF 6.0 field types, 16-18 the BigTIFF
//! extensions. Values at 0x10000 and above never appear on disk; they
//! identify the string-like and XMP value shapes of the in-memory
//! model.

use crate::{Error, Result};

/// Type identifier of a metadata value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum TypeId {
    /// Unsigned 8-bit integer (BYTE).
    UnsignedByte = 1,
    /// 8-bit ASCII, NUL-terminated on disk.
    AsciiString = 2,
    /// Unsigned 16-bit integer (SHORT).
    UnsignedShort = 3,
    /// Unsigned 32-bit integer (LONG).
    UnsignedLong = 4,
    /// Two LONGs: numerator, denominator.
    UnsignedRational = 5,
    /// Signed 8-bit integer (SBYTE).
    SignedByte = 6,
    /// Untyped byte sequence (UNDEFINED).
    Undefined = 7,
    /// Signed 16-bit integer (SSHORT).
    SignedShort = 8,
    /// Signed 32-bit integer (SLONG).
    SignedLong = 9,
    /// Two SLONGs: numerator, denominator.
    SignedRational = 10,
    /// IEEE-754 single precision (FLOAT).
    TiffFloat = 11,
    /// IEEE-754 double precision (DOUBLE).
    TiffDouble = 12,
    /// 32-bit IFD pointer.
    TiffIfd = 13,
    /// Unsigned 64-bit integer (BigTIFF LONG8).
    UnsignedLong8 = 16,
    /// Signed 64-bit integer (BigTIFF SLONG8).
    SignedLong8 = 17,
    /// 64-bit IFD pointer (BigTIFF IFD8).
    TiffIfd8 = 18,
    /// Charset-prefixed user comment.
    Comment = 0x10005,
    /// ISO 8601 date fragment.
    Date = 0x10006,
    /// ISO 8601 time fragment.
    Time = 0x10007,
    /// XMP text property.
    XmpText = 0x10008,
    /// XMP ordered array.
    XmpSeq = 0x10009,
    /// XMP unordered array.
    XmpBag = 0x1000a,
    /// XMP alternative array.
    XmpAlt = 0x1000b,
    /// XMP language alternative.
    LangAlt = 0x1000c,
}

impl TypeId {
    /// Parse a TIFF on-disk type value.
    ///
    /// Only the TIFF/BigTIFF range is valid here; the in-memory
    /// pseudo-types never appear in a directory entry.
    pub fn from_u16(value: u16) -> Result<Self> {
        match value {
            1 => Ok(TypeId::UnsignedByte),
            2 => Ok(TypeId::AsciiString),
            3 => Ok(TypeId::UnsignedShort),
            4 => Ok(TypeId::UnsignedLong),
            5 => Ok(TypeId::UnsignedRational),
            6 => Ok(TypeId::SignedByte),
            7 => Ok(TypeId::Undefined),
            8 => Ok(TypeId::SignedShort),
            9 => Ok(TypeId::SignedLong),
            10 => Ok(TypeId::SignedRational),
            11 => Ok(TypeId::TiffFloat),
            12 => Ok(TypeId::TiffDouble),
            13 => Ok(TypeId::TiffIfd),
            16 => Ok(TypeId::UnsignedLong8),
            17 => Ok(TypeId::SignedLong8),
            18 => Ok(TypeId::TiffIfd8),
            _ => Err(Error::InvalidTypeValue(value)),
        }
    }

    /// On-disk type value, if this type can appear in a TIFF entry.
    pub fn to_u16(self) -> Option<u16> {
        let v = self as u32;
        if v <= 18 {
            Some(v as u16)
        } else {
            None
        }
    }

    /// Size of one component in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            TypeId::UnsignedByte
            | TypeId::AsciiString
            | TypeId::SignedByte
            | TypeId::Undefined => 1,
            TypeId::UnsignedShort | TypeId::SignedShort => 2,
            TypeId::UnsignedLong
            | TypeId::SignedLong
            | TypeId::TiffFloat
            | TypeId::TiffIfd => 4,
            TypeId::UnsignedRational
            | TypeId::SignedRational
            | TypeId::TiffDouble
            | TypeId::UnsignedLong8
            | TypeId::SignedLong8
            | TypeId::TiffIfd8 => 8,
            // in-memory only; size is carried by the value itself
            _ => 1,
        }
    }

    /// Canonical type name.
    pub const fn name(self) -> &'static str {
        match self {
            TypeId::UnsignedByte => "Byte",
            TypeId::AsciiString => "Ascii",
            TypeId::UnsignedShort => "Short",
            TypeId::UnsignedLong => "Long",
            TypeId::UnsignedRational => "Rational",
            TypeId::SignedByte => "SByte",
            TypeId::Undefined => "Undefined",
            TypeId::SignedShort => "SShort",
            TypeId::SignedLong => "SLong",
            TypeId::SignedRational => "SRational",
            TypeId::TiffFloat => "Float",
            TypeId::TiffDouble => "Double",
            TypeId::TiffIfd => "Ifd",
            TypeId::UnsignedLong8 => "Long8",
            TypeId::SignedLong8 => "SLong8",
            TypeId::TiffIfd8 => "Ifd8",
            TypeId::Comment => "Comment",
            TypeId::Date => "Date",
            TypeId::Time => "Time",
            TypeId::XmpText => "XmpText",
            TypeId::XmpSeq => "XmpSeq",
            TypeId::XmpBag => "XmpBag",
            TypeId::XmpAlt => "XmpAlt",
            TypeId::LangAlt => "LangAlt",
        }
    }

    /// Whether this type holds numbers (integer, float or rational).
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeId::UnsignedByte
                | TypeId::UnsignedShort
                | TypeId::UnsignedLong
                | TypeId::UnsignedRational
                | TypeId::SignedByte
                | TypeId::SignedShort
                | TypeId::SignedLong
                | TypeId::SignedRational
                | TypeId::TiffFloat
                | TypeId::TiffDouble
                | TypeId::UnsignedLong8
                | TypeId::SignedLong8
        )
    }

    /// Whether this type points at a nested IFD.
    #[inline]
    pub const fn is_ifd_pointer(self) -> bool {
        matches!(self, TypeId::TiffIfd | TypeId::TiffIfd8)
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(TypeId::UnsignedByte.size(), 1);
        assert_eq!(TypeId::UnsignedShort.size(), 2);
        assert_eq!(TypeId::UnsignedLong.size(), 4);
        assert_eq!(TypeId::UnsignedRational.size(), 8);
        assert_eq!(TypeId::TiffDouble.size(), 8);
        assert_eq!(TypeId::TiffIfd8.size(), 8);
    }

    #[test]
    fn disk_range() {
        assert_eq!(TypeId::from_u16(1).unwrap(), TypeId::UnsignedByte);
        assert_eq!(TypeId::from_u16(10).unwrap(), TypeId::SignedRational);
        assert_eq!(TypeId::from_u16(18).unwrap(), TypeId::TiffIfd8);
        assert!(TypeId::from_u16(0).is_err());
        assert!(TypeId::from_u16(14).is_err());
        assert!(TypeId::from_u16(15).is_err());
        assert!(TypeId::from_u16(19).is_err());
        assert!(TypeId::from_u16(99).is_err());
    }

    #[test]
    fn pseudo_types_have_no_disk_value() {
        assert_eq!(TypeId::Comment.to_u16(), None);
        assert_eq!(TypeId::LangAlt.to_u16(), None);
        assert_eq!(TypeId::UnsignedShort.to_u16(), Some(3));
    }
}
