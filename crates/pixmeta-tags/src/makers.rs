//! Maker-note tag tables.
//!
//! Each vendor ships its own catalog; the selection here covers the
//! tags the preview extractor and the lens printers consume, plus the
//! commonly encountered identification fields.

use crate::{Group, Printer, TagInfo};
use phf::phf_map;
use pixmeta_core::TypeId;

const fn tag(
    tag: u16,
    name: &'static str,
    label: &'static str,
    desc: &'static str,
    group: Group,
    type_id: TypeId,
    count: i16,
    printer: Printer,
) -> TagInfo {
    TagInfo {
        tag,
        name,
        label,
        desc,
        group,
        type_id,
        count,
        printer,
    }
}

/// Nikon type-3 maker note tags.
pub static NIKON_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0001u16 => tag(0x0001, "Version", "Version", "Maker note version", Group::MakerNikon, TypeId::Undefined, 4, Printer::None),
    0x0002u16 => tag(0x0002, "ISOSpeed", "ISO Speed", "ISO speed setting", Group::MakerNikon, TypeId::UnsignedShort, 2, Printer::Decimal),
    0x0004u16 => tag(0x0004, "Quality", "Quality", "Image quality setting", Group::MakerNikon, TypeId::AsciiString, 0, Printer::None),
    0x0005u16 => tag(0x0005, "WhiteBalance", "White Balance", "White balance setting", Group::MakerNikon, TypeId::AsciiString, 0, Printer::None),
    0x0007u16 => tag(0x0007, "Focus", "Focus", "Focus mode", Group::MakerNikon, TypeId::AsciiString, 0, Printer::None),
    0x0011u16 => tag(0x0011, "Preview", "Preview IFD", "Offset to preview IFD", Group::MakerNikon, TypeId::TiffIfd, 1, Printer::Hex),
    0x0084u16 => tag(0x0084, "Lens", "Lens", "Lens range", Group::MakerNikon, TypeId::UnsignedRational, 4, Printer::LensFromSiblings),
    0x0088u16 => tag(0x0088, "AFInfo", "AF Info", "Autofocus information", Group::MakerNikon, TypeId::Undefined, 4, Printer::None),
    0x008cu16 => tag(0x008c, "ContrastCurve", "Contrast Curve", "Tone compensation curve", Group::MakerNikon, TypeId::Undefined, 0, Printer::None),
    0x0093u16 => tag(0x0093, "NEFCompression", "NEF Compression", "Raw compression scheme", Group::MakerNikon, TypeId::UnsignedShort, 1, Printer::Decimal),
};

/// Sony maker note tags.
pub static SONY_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0102u16 => tag(0x0102, "Quality", "Quality", "Image quality", Group::MakerSony, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0104u16 => tag(0x0104, "FlashExposureComp", "Flash Exposure Compensation", "Flash compensation", Group::MakerSony, TypeId::SignedRational, 1, Printer::None),
    0x0115u16 => tag(0x0115, "WhiteBalance", "White Balance", "White balance setting", Group::MakerSony, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x2001u16 => tag(0x2001, "PreviewImage", "Preview Image", "Embedded preview JPEG", Group::MakerSony, TypeId::Undefined, 0, Printer::None),
    0xb000u16 => tag(0xb000, "FileFormat", "File Format", "Sony file format", Group::MakerSony, TypeId::UnsignedByte, 4, Printer::None),
    0xb026u16 => tag(0xb026, "ImageStabilization", "Image Stabilization", "Steady-shot state", Group::MakerSony, TypeId::UnsignedLong, 1, Printer::Decimal),
};

/// Canon maker note tags.
pub static CANON_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0001u16 => tag(0x0001, "CameraSettings", "Camera Settings", "Camera settings block", Group::MakerCanon, TypeId::UnsignedShort, 0, Printer::None),
    0x0004u16 => tag(0x0004, "ShotInfo", "Shot Info", "Shot information block", Group::MakerCanon, TypeId::UnsignedShort, 0, Printer::None),
    0x0006u16 => tag(0x0006, "ImageType", "Image Type", "Image type string", Group::MakerCanon, TypeId::AsciiString, 0, Printer::None),
    0x0007u16 => tag(0x0007, "FirmwareVersion", "Firmware Version", "Firmware version string", Group::MakerCanon, TypeId::AsciiString, 0, Printer::None),
    0x0095u16 => tag(0x0095, "LensModel", "Lens Model", "Attached lens model", Group::MakerCanon, TypeId::AsciiString, 0, Printer::None),
    0x00b6u16 => tag(0x00b6, "PreviewImageInfo", "Preview Image Info", "Preview location block", Group::MakerCanon, TypeId::UnsignedLong, 0, Printer::None),
    0x4008u16 => tag(0x4008, "BlackLevel", "Black Level", "Sensor black level", Group::MakerCanon, TypeId::UnsignedShort, 0, Printer::None),
};
