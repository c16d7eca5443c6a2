//! IIM4 dataset catalog.
//!
//! Datasets are addressed by `(record, dataset)`. Record 1 is the
//! envelope, record 2 the application record. Repeatability and the
//! mandatory flag come from the IIM4 specification, rev 4.2.

use phf::phf_map;

/// IIM record numbers.
pub mod record {
    pub const ENVELOPE: u8 = 1;
    pub const APPLICATION2: u8 = 2;
}

/// Shape of a dataset's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetType {
    /// Free text in the envelope character set.
    Str,
    /// Numeric ASCII digits.
    Digits,
    /// Big-endian unsigned 16-bit integer.
    UShort,
    /// Raw bytes.
    Bin,
    /// CCYYMMDD date.
    Date,
    /// HHMMSS±HHMM time.
    Time,
}

/// Descriptor of one dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetInfo {
    pub record: u8,
    pub dataset: u8,
    pub name: &'static str,
    pub desc: &'static str,
    pub dataset_type: DatasetType,
    pub mandatory: bool,
    pub repeatable: bool,
}

const fn ds(
    record: u8,
    dataset: u8,
    name: &'static str,
    desc: &'static str,
    dataset_type: DatasetType,
    mandatory: bool,
    repeatable: bool,
) -> DatasetInfo {
    DatasetInfo {
        record,
        dataset,
        name,
        desc,
        dataset_type,
        mandatory,
        repeatable,
    }
}

/// Record 1 - envelope.
static ENVELOPE_DATASETS: phf::Map<u8, DatasetInfo> = phf_map! {
    0u8 => ds(1, 0, "ModelVersion", "IIM version", DatasetType::UShort, true, false),
    5u8 => ds(1, 5, "Destination", "Routing information", DatasetType::Str, false, true),
    20u8 => ds(1, 20, "FileFormat", "File format number", DatasetType::UShort, true, false),
    22u8 => ds(1, 22, "FileVersion", "File format version", DatasetType::UShort, true, false),
    30u8 => ds(1, 30, "ServiceId", "Provider identification", DatasetType::Str, true, false),
    40u8 => ds(1, 40, "EnvelopeNumber", "Envelope number", DatasetType::Digits, true, false),
    50u8 => ds(1, 50, "ProductId", "Product identification", DatasetType::Str, false, true),
    60u8 => ds(1, 60, "EnvelopePriority", "Handling priority", DatasetType::Digits, false, false),
    70u8 => ds(1, 70, "DateSent", "Date the service sent the material", DatasetType::Date, true, false),
    80u8 => ds(1, 80, "TimeSent", "Time the service sent the material", DatasetType::Time, false, false),
    90u8 => ds(1, 90, "CharacterSet", "Coded character set control functions", DatasetType::Bin, false, false),
    100u8 => ds(1, 100, "UNO", "Unique name of the object", DatasetType::Str, false, false),
    120u8 => ds(1, 120, "ARMId", "Abstract relationship method id", DatasetType::UShort, false, false),
    122u8 => ds(1, 122, "ARMVersion", "Abstract relationship method version", DatasetType::UShort, false, false),
};

/// Record 2 - application.
static APPLICATION2_DATASETS: phf::Map<u8, DatasetInfo> = phf_map! {
    0u8 => ds(2, 0, "RecordVersion", "Record version", DatasetType::UShort, true, false),
    3u8 => ds(2, 3, "ObjectType", "Object type reference", DatasetType::Str, false, false),
    4u8 => ds(2, 4, "ObjectAttribute", "Object attribute reference", DatasetType::Str, false, true),
    5u8 => ds(2, 5, "ObjectName", "Shorthand object reference", DatasetType::Str, false, false),
    7u8 => ds(2, 7, "EditStatus", "Status of the object data", DatasetType::Str, false, false),
    8u8 => ds(2, 8, "EditorialUpdate", "Editorial update indicator", DatasetType::Digits, false, false),
    10u8 => ds(2, 10, "Urgency", "Editorial urgency", DatasetType::Digits, false, false),
    12u8 => ds(2, 12, "Subject", "Subject reference", DatasetType::Str, false, true),
    15u8 => ds(2, 15, "Category", "Subject category", DatasetType::Str, false, false),
    20u8 => ds(2, 20, "SuppCategory", "Supplemental category", DatasetType::Str, false, true),
    22u8 => ds(2, 22, "FixtureId", "Fixture identifier", DatasetType::Str, false, false),
    25u8 => ds(2, 25, "Keywords", "Content keywords", DatasetType::Str, false, true),
    26u8 => ds(2, 26, "LocationCode", "Content location code", DatasetType::Str, false, true),
    27u8 => ds(2, 27, "LocationName", "Content location name", DatasetType::Str, false, true),
    30u8 => ds(2, 30, "ReleaseDate", "Earliest intended release date", DatasetType::Date, false, false),
    35u8 => ds(2, 35, "ReleaseTime", "Earliest intended release time", DatasetType::Time, false, false),
    37u8 => ds(2, 37, "ExpirationDate", "Latest intended use date", DatasetType::Date, false, false),
    38u8 => ds(2, 38, "ExpirationTime", "Latest intended use time", DatasetType::Time, false, false),
    40u8 => ds(2, 40, "SpecialInstructions", "Editorial usage instructions", DatasetType::Str, false, false),
    42u8 => ds(2, 42, "ActionAdvised", "Action provided to previous data", DatasetType::Digits, false, false),
    45u8 => ds(2, 45, "ReferenceService", "Service identifier of a prior envelope", DatasetType::Str, false, true),
    47u8 => ds(2, 47, "ReferenceDate", "Date of a prior envelope", DatasetType::Date, false, true),
    50u8 => ds(2, 50, "ReferenceNumber", "Envelope number of a prior envelope", DatasetType::Digits, false, true),
    55u8 => ds(2, 55, "DateCreated", "Creation date of the content", DatasetType::Date, false, false),
    60u8 => ds(2, 60, "TimeCreated", "Creation time of the content", DatasetType::Time, false, false),
    62u8 => ds(2, 62, "DigitizationDate", "Date of digital creation", DatasetType::Date, false, false),
    63u8 => ds(2, 63, "DigitizationTime", "Time of digital creation", DatasetType::Time, false, false),
    65u8 => ds(2, 65, "Program", "Originating program", DatasetType::Str, false, false),
    70u8 => ds(2, 70, "ProgramVersion", "Originating program version", DatasetType::Str, false, false),
    75u8 => ds(2, 75, "ObjectCycle", "Editorial cycle", DatasetType::Str, false, false),
    80u8 => ds(2, 80, "Byline", "Creator name", DatasetType::Str, false, true),
    85u8 => ds(2, 85, "BylineTitle", "Creator title", DatasetType::Str, false, true),
    90u8 => ds(2, 90, "City", "City of origin", DatasetType::Str, false, false),
    92u8 => ds(2, 92, "SubLocation", "Location within the city", DatasetType::Str, false, false),
    95u8 => ds(2, 95, "ProvinceState", "Province or state of origin", DatasetType::Str, false, false),
    100u8 => ds(2, 100, "CountryCode", "Country code of origin", DatasetType::Str, false, false),
    101u8 => ds(2, 101, "CountryName", "Country name of origin", DatasetType::Str, false, false),
    103u8 => ds(2, 103, "TransmissionReference", "Original transmission reference", DatasetType::Str, false, false),
    105u8 => ds(2, 105, "Headline", "Content synopsis", DatasetType::Str, false, false),
    110u8 => ds(2, 110, "Credit", "Content provider", DatasetType::Str, false, false),
    115u8 => ds(2, 115, "Source", "Original owner", DatasetType::Str, false, false),
    116u8 => ds(2, 116, "Copyright", "Copyright notice", DatasetType::Str, false, false),
    118u8 => ds(2, 118, "Contact", "Further information contact", DatasetType::Str, false, true),
    120u8 => ds(2, 120, "Caption", "Content description", DatasetType::Str, false, false),
    122u8 => ds(2, 122, "Writer", "Caption writer", DatasetType::Str, false, true),
    125u8 => ds(2, 125, "RasterizedCaption", "Binary caption rendering", DatasetType::Bin, false, false),
    130u8 => ds(2, 130, "ImageType", "Color components and composition", DatasetType::Str, false, false),
    131u8 => ds(2, 131, "ImageOrientation", "Layout of the image area", DatasetType::Str, false, false),
    135u8 => ds(2, 135, "Language", "Object language code", DatasetType::Str, false, false),
    150u8 => ds(2, 150, "AudioType", "Audio type", DatasetType::Str, false, false),
    151u8 => ds(2, 151, "AudioRate", "Audio sampling rate", DatasetType::Digits, false, false),
    152u8 => ds(2, 152, "AudioResolution", "Audio sampling resolution", DatasetType::Digits, false, false),
    153u8 => ds(2, 153, "AudioDuration", "Audio duration", DatasetType::Digits, false, false),
    154u8 => ds(2, 154, "AudioOutcue", "Audio outcue", DatasetType::Str, false, false),
    200u8 => ds(2, 200, "PreviewFormat", "Preview file format", DatasetType::UShort, false, false),
    201u8 => ds(2, 201, "PreviewVersion", "Preview format version", DatasetType::UShort, false, false),
    202u8 => ds(2, 202, "Preview", "Preview data", DatasetType::Bin, false, false),
};

/// Record name as it appears in keys.
pub fn record_name(record: u8) -> Option<&'static str> {
    match record {
        record::ENVELOPE => Some("Envelope"),
        record::APPLICATION2 => Some("Application2"),
        _ => None,
    }
}

/// Record number from a key group name.
pub fn record_by_name(name: &str) -> Option<u8> {
    match name {
        "Envelope" => Some(record::ENVELOPE),
        "Application2" => Some(record::APPLICATION2),
        _ => None,
    }
}

/// Look up a dataset descriptor.
pub fn dataset_info(record: u8, dataset: u8) -> Option<&'static DatasetInfo> {
    match record {
        record::ENVELOPE => ENVELOPE_DATASETS.get(&dataset),
        record::APPLICATION2 => APPLICATION2_DATASETS.get(&dataset),
        _ => None,
    }
}

/// Dataset number from its name, accepting `0xNNNN` hex fallbacks.
pub fn dataset_by_name(record: u8, name: &str) -> Option<u8> {
    if let Some(hex) = name.strip_prefix("0x") {
        return u8::from_str_radix(hex, 16).ok();
    }
    let table = match record {
        record::ENVELOPE => &ENVELOPE_DATASETS,
        record::APPLICATION2 => &APPLICATION2_DATASETS,
        _ => return None,
    };
    table
        .entries()
        .find(|(_, info)| info.name == name)
        .map(|(&n, _)| n)
}

/// Dataset name, hex-formatted when unknown.
pub fn dataset_name(record: u8, dataset: u8) -> String {
    match dataset_info(record, dataset) {
        Some(info) => info.name.to_string(),
        None => format!("0x{dataset:04x}"),
    }
}

/// Whether a dataset may appear more than once.
///
/// Unknown datasets are treated as repeatable so nothing is lost.
pub fn is_repeatable(record: u8, dataset: u8) -> bool {
    dataset_info(record, dataset).map_or(true, |info| info.repeatable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let info = dataset_info(2, 25).unwrap();
        assert_eq!(info.name, "Keywords");
        assert!(info.repeatable);

        let info = dataset_info(2, 0).unwrap();
        assert_eq!(info.name, "RecordVersion");
        assert!(!info.repeatable);
        assert!(info.mandatory);

        assert!(dataset_info(4, 25).is_none());
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(dataset_by_name(2, "Keywords"), Some(25));
        assert_eq!(dataset_by_name(1, "CharacterSet"), Some(90));
        assert_eq!(dataset_by_name(2, "0x00f0"), Some(0xf0));
        assert_eq!(dataset_by_name(2, "Nope"), None);
    }

    #[test]
    fn unknown_names_are_hex() {
        assert_eq!(dataset_name(2, 0xf0), "0x00f0");
        assert_eq!(dataset_name(2, 105), "Headline");
    }
}
