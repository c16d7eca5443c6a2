//! Human-readable value rendering.
//!
//! Printers are a tagged union rather than function pointers so the
//! catalog stays plain `const` data. A printer receives the datum's
//! value and, for the few tags that render from their neighbours, the
//! surrounding Exif container.

use phf::phf_map;
use pixmeta_core::{ExifData, Family, Key, Value};

/// Formatter attached to a tag descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printer {
    /// Raw component rendering.
    None,
    /// Unsigned decimal.
    Decimal,
    /// 0x-prefixed hex.
    Hex,
    /// Orientation names (1..8).
    Orientation,
    /// Resolution unit names.
    ResolutionUnit,
    /// sRGB / uncalibrated.
    ColorSpace,
    /// Metering mode names.
    MeteringMode,
    /// Exposure program names.
    ExposureProgram,
    /// Flash bit field decoding.
    Flash,
    /// `1/N s` exposure rendering.
    ExposureTime,
    /// `F2.8` aperture rendering.
    FNumber,
    /// `50.0 mm` focal length rendering.
    FocalLength,
    /// Degrees/minutes/seconds from a 3-rational coordinate.
    GpsCoord,
    /// Lens description assembled from sibling maker fields.
    LensFromSiblings,
}

static ORIENTATION_NAMES: phf::Map<u8, &'static str> = phf_map! {
    1u8 => "top, left",
    2u8 => "top, right",
    3u8 => "bottom, right",
    4u8 => "bottom, left",
    5u8 => "left, top",
    6u8 => "right, top",
    7u8 => "right, bottom",
    8u8 => "left, bottom",
};

static METERING_NAMES: phf::Map<u8, &'static str> = phf_map! {
    0u8 => "Unknown",
    1u8 => "Average",
    2u8 => "Center weighted average",
    3u8 => "Spot",
    4u8 => "Multi-spot",
    5u8 => "Multi-segment",
    6u8 => "Partial",
};

static EXPOSURE_PROGRAM_NAMES: phf::Map<u8, &'static str> = phf_map! {
    0u8 => "Not defined",
    1u8 => "Manual",
    2u8 => "Auto",
    3u8 => "Aperture priority",
    4u8 => "Shutter priority",
    5u8 => "Creative program",
    6u8 => "Action program",
    7u8 => "Portrait mode",
    8u8 => "Landscape mode",
};

impl Printer {
    /// Render `value` for display.
    ///
    /// `siblings` gives printers access to the rest of the Exif
    /// container; only [`Printer::LensFromSiblings`] uses it.
    pub fn print(self, value: &Value, siblings: Option<&ExifData>) -> String {
        match self {
            Printer::None => value.to_string(),
            Printer::Decimal => value
                .to_i64(0)
                .map(|v| v.to_string())
                .unwrap_or_else(|| value.to_string()),
            Printer::Hex => value
                .to_i64(0)
                .map(|v| format!("0x{v:04x}"))
                .unwrap_or_else(|| value.to_string()),
            Printer::Orientation => lookup_u8(value, &ORIENTATION_NAMES),
            Printer::ResolutionUnit => match value.to_u32(0) {
                Some(2) => "inch".into(),
                Some(3) => "cm".into(),
                _ => value.to_string(),
            },
            Printer::ColorSpace => match value.to_u32(0) {
                Some(1) => "sRGB".into(),
                Some(0xffff) => "Uncalibrated".into(),
                _ => value.to_string(),
            },
            Printer::MeteringMode => lookup_u8(value, &METERING_NAMES),
            Printer::ExposureProgram => lookup_u8(value, &EXPOSURE_PROGRAM_NAMES),
            Printer::Flash => print_flash(value),
            Printer::ExposureTime => match value.to_f64(0) {
                Some(s) if s > 0.0 && s < 1.0 => format!("1/{} s", (1.0 / s).round() as i64),
                Some(s) => format!("{s} s"),
                None => value.to_string(),
            },
            Printer::FNumber => match value.to_f64(0) {
                Some(f) => format!("F{f:.1}"),
                None => value.to_string(),
            },
            Printer::FocalLength => match value.to_f64(0) {
                Some(mm) => format!("{mm:.1} mm"),
                None => value.to_string(),
            },
            Printer::GpsCoord => print_gps_coord(value),
            Printer::LensFromSiblings => print_lens(value, siblings),
        }
    }
}

fn lookup_u8(value: &Value, table: &phf::Map<u8, &'static str>) -> String {
    value
        .to_u32(0)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| table.get(&v))
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn print_flash(value: &Value) -> String {
    let Some(bits) = value.to_u32(0) else {
        return value.to_string();
    };
    let mut parts = Vec::new();
    parts.push(if bits & 0x01 != 0 { "Fired" } else { "No flash" });
    if bits & 0x18 == 0x18 {
        parts.push("auto");
    }
    if bits & 0x40 != 0 {
        parts.push("red-eye reduction");
    }
    parts.join(", ")
}

fn print_gps_coord(value: &Value) -> String {
    let (Some(deg), Some(min), Some(sec)) =
        (value.to_f64(0), value.to_f64(1), value.to_f64(2))
    else {
        return value.to_string();
    };
    format!("{}deg {}' {:.2}\"", deg as i64, min as i64, sec)
}

/// Assemble a lens description from neighbouring fields.
///
/// A lens is described by min/max focal length and aperture spread
/// across several entries; the printer needs the whole container.
fn print_lens(value: &Value, siblings: Option<&ExifData>) -> String {
    let Some(exif) = siblings else {
        return value.to_string();
    };
    let lens_model = exif
        .find_key(&Key::new(Family::Exif, "Photo", "LensModel"))
        .map(|d| d.value.to_string());
    if let Some(model) = lens_model {
        if !model.is_empty() {
            return model;
        }
    }
    // Fall back to the 4-component LensSpecification rendering.
    match (value.to_f64(0), value.to_f64(1), value.to_f64(2), value.to_f64(3)) {
        (Some(min_f), Some(max_f), Some(min_a), Some(max_a)) => {
            if (min_f - max_f).abs() < f64::EPSILON {
                format!("{min_f:.0}mm F{min_a:.1}")
            } else {
                format!("{min_f:.0}-{max_f:.0}mm F{min_a:.1}-{max_a:.1}")
            }
        }
        _ => value.to_string(),
    }
}
