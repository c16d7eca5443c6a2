//! GPS IFD tag table.

use crate::{Group, Printer, TagInfo};
use phf::phf_map;
use pixmeta_core::TypeId;

const fn tag(
    tag: u16,
    name: &'static str,
    label: &'static str,
    desc: &'static str,
    type_id: TypeId,
    count: i16,
    printer: Printer,
) -> TagInfo {
    TagInfo {
        tag,
        name,
        label,
        desc,
        group: Group::GpsInfo,
        type_id,
        count,
        printer,
    }
}

/// GPS sub-IFD tags.
pub static GPS_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0000u16 => tag(0x0000, "GPSVersionID", "GPS Version ID", "GPS tag version", TypeId::UnsignedByte, 4, Printer::None),
    0x0001u16 => tag(0x0001, "GPSLatitudeRef", "GPS Latitude Reference", "North or south latitude", TypeId::AsciiString, 2, Printer::None),
    0x0002u16 => tag(0x0002, "GPSLatitude", "GPS Latitude", "Latitude as deg/min/sec", TypeId::UnsignedRational, 3, Printer::GpsCoord),
    0x0003u16 => tag(0x0003, "GPSLongitudeRef", "GPS Longitude Reference", "East or west longitude", TypeId::AsciiString, 2, Printer::None),
    0x0004u16 => tag(0x0004, "GPSLongitude", "GPS Longitude", "Longitude as deg/min/sec", TypeId::UnsignedRational, 3, Printer::GpsCoord),
    0x0005u16 => tag(0x0005, "GPSAltitudeRef", "GPS Altitude Reference", "Altitude reference", TypeId::UnsignedByte, 1, Printer::Decimal),
    0x0006u16 => tag(0x0006, "GPSAltitude", "GPS Altitude", "Altitude in meters", TypeId::UnsignedRational, 1, Printer::None),
    0x0007u16 => tag(0x0007, "GPSTimeStamp", "GPS Time Stamp", "UTC time as h/m/s", TypeId::UnsignedRational, 3, Printer::None),
    0x0008u16 => tag(0x0008, "GPSSatellites", "GPS Satellites", "Satellites used", TypeId::AsciiString, 0, Printer::None),
    0x0009u16 => tag(0x0009, "GPSStatus", "GPS Status", "Receiver status", TypeId::AsciiString, 2, Printer::None),
    0x000au16 => tag(0x000a, "GPSMeasureMode", "GPS Measure Mode", "2D or 3D measurement", TypeId::AsciiString, 2, Printer::None),
    0x000bu16 => tag(0x000b, "GPSDOP", "GPS DOP", "Measurement precision", TypeId::UnsignedRational, 1, Printer::None),
    0x000cu16 => tag(0x000c, "GPSSpeedRef", "GPS Speed Reference", "Speed unit", TypeId::AsciiString, 2, Printer::None),
    0x000du16 => tag(0x000d, "GPSSpeed", "GPS Speed", "Receiver speed", TypeId::UnsignedRational, 1, Printer::None),
    0x000eu16 => tag(0x000e, "GPSTrackRef", "GPS Track Reference", "Direction reference", TypeId::AsciiString, 2, Printer::None),
    0x000fu16 => tag(0x000f, "GPSTrack", "GPS Track", "Movement direction", TypeId::UnsignedRational, 1, Printer::None),
    0x0010u16 => tag(0x0010, "GPSImgDirectionRef", "GPS Image Direction Reference", "Image direction reference", TypeId::AsciiString, 2, Printer::None),
    0x0011u16 => tag(0x0011, "GPSImgDirection", "GPS Image Direction", "Image direction", TypeId::UnsignedRational, 1, Printer::None),
    0x0012u16 => tag(0x0012, "GPSMapDatum", "GPS Map Datum", "Geodetic survey data", TypeId::AsciiString, 0, Printer::None),
    0x0013u16 => tag(0x0013, "GPSDestLatitudeRef", "GPS Destination Latitude Reference", "Destination latitude reference", TypeId::AsciiString, 2, Printer::None),
    0x0014u16 => tag(0x0014, "GPSDestLatitude", "GPS Destination Latitude", "Destination latitude", TypeId::UnsignedRational, 3, Printer::GpsCoord),
    0x0015u16 => tag(0x0015, "GPSDestLongitudeRef", "GPS Destination Longitude Reference", "Destination longitude reference", TypeId::AsciiString, 2, Printer::None),
    0x0016u16 => tag(0x0016, "GPSDestLongitude", "GPS Destination Longitude", "Destination longitude", TypeId::UnsignedRational, 3, Printer::GpsCoord),
    0x0017u16 => tag(0x0017, "GPSDestBearingRef", "GPS Destination Bearing Reference", "Bearing reference", TypeId::AsciiString, 2, Printer::None),
    0x0018u16 => tag(0x0018, "GPSDestBearing", "GPS Destination Bearing", "Bearing to destination", TypeId::UnsignedRational, 1, Printer::None),
    0x0019u16 => tag(0x0019, "GPSDestDistanceRef", "GPS Destination Distance Reference", "Distance unit", TypeId::AsciiString, 2, Printer::None),
    0x001au16 => tag(0x001a, "GPSDestDistance", "GPS Destination Distance", "Distance to destination", TypeId::UnsignedRational, 1, Printer::None),
    0x001bu16 => tag(0x001b, "GPSProcessingMethod", "GPS Processing Method", "Positioning method name", TypeId::Undefined, 0, Printer::None),
    0x001cu16 => tag(0x001c, "GPSAreaInformation", "GPS Area Information", "GPS area name", TypeId::Undefined, 0, Printer::None),
    0x001du16 => tag(0x001d, "GPSDateStamp", "GPS Date Stamp", "UTC date", TypeId::AsciiString, 11, Printer::None),
    0x001eu16 => tag(0x001e, "GPSDifferential", "GPS Differential", "Differential correction flag", TypeId::UnsignedShort, 1, Printer::Decimal),
    0x001fu16 => tag(0x001f, "GPSHPositioningError", "GPS Horizontal Positioning Error", "Horizontal error, meters", TypeId::UnsignedRational, 1, Printer::None),
};
