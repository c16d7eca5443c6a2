//! Static Exif tag catalog.
//!
//! Read-only descriptors for the tags the TIFF engine understands:
//! numeric tag, canonical name, printable label, default type,
//! expected component count, owning group, and a printer that renders
//! the value for humans. Lookup is by `(tag, group)` or by name;
//! unknown tag numbers fall back to `0xNNNN` hex names so every entry
//! survives a round-trip.
//!
//! # Example
//!
//! ```
//! use pixmeta_tags::{tag_info, Group};
//!
//! let info = tag_info(0x0112, Group::Image).unwrap();
//! assert_eq!(info.name, "Orientation");
//! ```

mod exif;
mod gps;
mod makers;
mod printers;

pub use printers::Printer;

use pixmeta_core::TypeId;

/// The IFD or maker family a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// IFD0 - primary image.
    Image,
    /// Exif sub-IFD (0x8769).
    Photo,
    /// GPS sub-IFD (0x8825).
    GpsInfo,
    /// Interoperability sub-IFD (0xa005).
    Iop,
    /// IFD1 - thumbnail.
    Thumbnail,
    /// First SubIFD (0x014a).
    SubImage1,
    /// Nikon maker note.
    MakerNikon,
    /// Sony maker note.
    MakerSony,
    /// Canon maker note.
    MakerCanon,
}

impl Group {
    /// Group name as it appears in keys (`Exif.<group>.<tag>`).
    pub const fn name(self) -> &'static str {
        match self {
            Group::Image => "Image",
            Group::Photo => "Photo",
            Group::GpsInfo => "GPSInfo",
            Group::Iop => "Iop",
            Group::Thumbnail => "Thumbnail",
            Group::SubImage1 => "SubImage1",
            Group::MakerNikon => "Nikon",
            Group::MakerSony => "Sony",
            Group::MakerCanon => "Canon",
        }
    }

    /// Parse a group name from a key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Image" => Some(Group::Image),
            "Photo" => Some(Group::Photo),
            "GPSInfo" => Some(Group::GpsInfo),
            "Iop" => Some(Group::Iop),
            "Thumbnail" => Some(Group::Thumbnail),
            "SubImage1" => Some(Group::SubImage1),
            "Nikon" => Some(Group::MakerNikon),
            "Sony" => Some(Group::MakerSony),
            "Canon" => Some(Group::MakerCanon),
            _ => None,
        }
    }

    fn table(self) -> &'static phf::Map<u16, TagInfo> {
        match self {
            // IFD1 carries the same tag vocabulary as IFD0.
            Group::Image | Group::Thumbnail | Group::SubImage1 => &exif::IMAGE_TAGS,
            Group::Photo => &exif::PHOTO_TAGS,
            Group::GpsInfo => &gps::GPS_TAGS,
            Group::Iop => &exif::IOP_TAGS,
            Group::MakerNikon => &makers::NIKON_TAGS,
            Group::MakerSony => &makers::SONY_TAGS,
            Group::MakerCanon => &makers::CANON_TAGS,
        }
    }
}

/// Descriptor of one tag.
#[derive(Debug, Clone, Copy)]
pub struct TagInfo {
    /// Numeric tag id.
    pub tag: u16,
    /// Canonical name, the tag part of a key.
    pub name: &'static str,
    /// Printable label.
    pub label: &'static str,
    /// One-line description.
    pub desc: &'static str,
    /// Owning group.
    pub group: Group,
    /// Default on-disk type.
    pub type_id: TypeId,
    /// Expected component count: 0 = any, -1 = unknown.
    pub count: i16,
    /// Human-readable rendering.
    pub printer: Printer,
}

/// Look up a tag descriptor by number and group.
pub fn tag_info(tag: u16, group: Group) -> Option<&'static TagInfo> {
    group.table().get(&tag)
}

/// Look up a tag descriptor by name within a group.
///
/// Accepts `0xNNNN` hex names for tags absent from the catalog.
pub fn tag_by_name(name: &str, group: Group) -> Option<u16> {
    if let Some(hex) = name.strip_prefix("0x") {
        return u16::from_str_radix(hex, 16).ok();
    }
    group
        .table()
        .entries()
        .find(|(_, info)| info.name == name)
        .map(|(&tag, _)| tag)
}

/// Canonical name of a tag, hex-formatted when unknown.
pub fn tag_name(tag: u16, group: Group) -> String {
    match tag_info(tag, group) {
        Some(info) => info.name.to_string(),
        None => format!("0x{tag:04x}"),
    }
}
