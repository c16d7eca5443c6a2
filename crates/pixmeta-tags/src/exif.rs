//! TIFF and Exif tag tables.
//!
//! Tag vocabulary follows TIFF 6.0 and Exif 2.32. Counts: 0 accepts
//! any length, -1 marks tags whose length rules are unknown.

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

/// IFD0 / IFD1 tags.
pub static IMAGE_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0100u16 => tag(0x0100, "ImageWidth", "Image Width", "Number of columns", Group::Image, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0101u16 => tag(0x0101, "ImageLength", "Image Height", "Number of rows", Group::Image, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0102u16 => tag(0x0102, "BitsPerSample", "Bits per Sample", "Bits per component", Group::Image, TypeId::UnsignedShort, 3, Printer::None),
    0x0103u16 => tag(0x0103, "Compression", "Compression", "Compression scheme", Group::Image, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x0106u16 => tag(0x0106, "PhotometricInterpretation", "Photometric Interpretation", "Pixel composition", Group::Image, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x010eu16 => tag(0x010e, "ImageDescription", "Image Description", "Title of the image", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x010fu16 => tag(0x010f, "Make", "Manufacturer", "Camera manufacturer", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x0110u16 => tag(0x0110, "Model", "Model", "Camera model", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x0111u16 => tag(0x0111, "StripOffsets", "Strip Offsets", "Location of image strips", Group::Image, TypeId::UnsignedLong, 0, Printer::Decimal),
    0x0112u16 => tag(0x0112, "Orientation", "Orientation", "Orientation of the image", Group::Image, TypeId::UnsignedShort, 1, Printer::Orientation),
    0x0115u16 => tag(0x0115, "SamplesPerPixel", "Samples per Pixel", "Number of components", Group::Image, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x0116u16 => tag(0x0116, "RowsPerStrip", "Rows per Strip", "Rows in each strip", Group::Image, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0117u16 => tag(0x0117, "StripByteCounts", "Strip Byte Counts", "Bytes per strip", Group::Image, TypeId::UnsignedLong, 0, Printer::Decimal),
    0x011au16 => tag(0x011a, "XResolution", "X-Resolution", "Pixels per resolution unit, x", Group::Image, TypeId::UnsignedRational, 1, Printer::None),
    0x011bu16 => tag(0x011b, "YResolution", "Y-Resolution", "Pixels per resolution unit, y", Group::Image, TypeId::UnsignedRational, 1, Printer::None),
    0x011cu16 => tag(0x011c, "PlanarConfiguration", "Planar Configuration", "Data arrangement", Group::Image, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x0128u16 => tag(0x0128, "ResolutionUnit", "Resolution Unit", "Unit of X and Y resolution", Group::Image, TypeId::UnsignedShort, 1, Printer::ResolutionUnit),
    0x012du16 => tag(0x012d, "TransferFunction", "Transfer Function", "Transfer function", Group::Image, TypeId::UnsignedShort, 768, Printer::None),
    0x0131u16 => tag(0x0131, "Software", "Software", "Software used", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x0132u16 => tag(0x0132, "DateTime", "Date and Time", "File change date and time", Group::Image, TypeId::AsciiString, 20, Printer::None),
    0x013bu16 => tag(0x013b, "Artist", "Artist", "Person who created the image", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x013eu16 => tag(0x013e, "WhitePoint", "White Point", "White point chromaticity", Group::Image, TypeId::UnsignedRational, 2, Printer::None),
    0x013fu16 => tag(0x013f, "PrimaryChromaticities", "Primary Chromaticities", "Chromaticities of primaries", Group::Image, TypeId::UnsignedRational, 6, Printer::None),
    0x014au16 => tag(0x014a, "SubIFDs", "SubIFD Offsets", "Child image directories", Group::Image, TypeId::UnsignedLong, 0, Printer::Hex),
    0x0201u16 => tag(0x0201, "JPEGInterchangeFormat", "JPEG Interchange Format", "Offset to JPEG SOI", Group::Image, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0202u16 => tag(0x0202, "JPEGInterchangeFormatLength", "JPEG Interchange Format Length", "Bytes of JPEG data", Group::Image, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x0211u16 => tag(0x0211, "YCbCrCoefficients", "YCbCr Coefficients", "Color space transformation", Group::Image, TypeId::UnsignedRational, 3, Printer::None),
    0x0212u16 => tag(0x0212, "YCbCrSubSampling", "YCbCr Sub-Sampling", "Subsampling ratio", Group::Image, TypeId::UnsignedShort, 2, Printer::None),
    0x0213u16 => tag(0x0213, "YCbCrPositioning", "YCbCr Positioning", "Y and C positioning", Group::Image, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x0214u16 => tag(0x0214, "ReferenceBlackWhite", "Reference Black/White", "Reference values", Group::Image, TypeId::UnsignedRational, 6, Printer::None),
    0x02bcu16 => tag(0x02bc, "XMLPacket", "XML Packet", "XMP packet", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0x8298u16 => tag(0x8298, "Copyright", "Copyright", "Copyright holder", Group::Image, TypeId::AsciiString, 0, Printer::None),
    0x83bbu16 => tag(0x83bb, "IPTCNAA", "IPTC/NAA", "Embedded IIM4 stream", Group::Image, TypeId::UnsignedLong, 0, Printer::None),
    0x8649u16 => tag(0x8649, "ImageResources", "Image Resources", "Photoshop IRB block", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0x8769u16 => tag(0x8769, "ExifTag", "Exif IFD Pointer", "Offset to Exif IFD", Group::Image, TypeId::UnsignedLong, 1, Printer::Hex),
    0x8773u16 => tag(0x8773, "InterColorProfile", "ICC Profile", "Embedded ICC profile", Group::Image, TypeId::Undefined, 0, Printer::None),
    0x8825u16 => tag(0x8825, "GPSTag", "GPS IFD Pointer", "Offset to GPS IFD", Group::Image, TypeId::UnsignedLong, 1, Printer::Hex),
    0x9c9bu16 => tag(0x9c9b, "XPTitle", "Windows Title", "Title, UCS-2", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0x9c9cu16 => tag(0x9c9c, "XPComment", "Windows Comment", "Comment, UCS-2", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0x9c9du16 => tag(0x9c9d, "XPAuthor", "Windows Author", "Author, UCS-2", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0x9c9eu16 => tag(0x9c9e, "XPKeywords", "Windows Keywords", "Keywords, UCS-2", Group::Image, TypeId::UnsignedByte, 0, Printer::None),
    0xc612u16 => tag(0xc612, "DNGVersion", "DNG Version", "DNG specification version", Group::Image, TypeId::UnsignedByte, 4, Printer::None),
    0xc614u16 => tag(0xc614, "UniqueCameraModel", "Unique Camera Model", "Camera model, localized", Group::Image, TypeId::AsciiString, 0, Printer::None),
};

/// Exif sub-IFD tags.
pub static PHOTO_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x829au16 => tag(0x829a, "ExposureTime", "Exposure Time", "Exposure time in seconds", Group::Photo, TypeId::UnsignedRational, 1, Printer::ExposureTime),
    0x829du16 => tag(0x829d, "FNumber", "F-Number", "Lens aperture", Group::Photo, TypeId::UnsignedRational, 1, Printer::FNumber),
    0x8822u16 => tag(0x8822, "ExposureProgram", "Exposure Program", "Program used for exposure", Group::Photo, TypeId::UnsignedShort, 1, Printer::ExposureProgram),
    0x8827u16 => tag(0x8827, "ISOSpeedRatings", "ISO Speed Ratings", "Sensitivity", Group::Photo, TypeId::UnsignedShort, 0, Printer::Decimal),
    0x8830u16 => tag(0x8830, "SensitivityType", "Sensitivity Type", "Which sensitivity is reported", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x9000u16 => tag(0x9000, "ExifVersion", "Exif Version", "Supported Exif version", Group::Photo, TypeId::Undefined, 4, Printer::None),
    0x9003u16 => tag(0x9003, "DateTimeOriginal", "Date and Time Original", "When the picture was taken", Group::Photo, TypeId::AsciiString, 20, Printer::None),
    0x9004u16 => tag(0x9004, "DateTimeDigitized", "Date and Time Digitized", "When the image was stored", Group::Photo, TypeId::AsciiString, 20, Printer::None),
    0x9010u16 => tag(0x9010, "OffsetTime", "Offset Time", "Time zone of DateTime", Group::Photo, TypeId::AsciiString, 7, Printer::None),
    0x9011u16 => tag(0x9011, "OffsetTimeOriginal", "Offset Time Original", "Time zone of DateTimeOriginal", Group::Photo, TypeId::AsciiString, 7, Printer::None),
    0x9101u16 => tag(0x9101, "ComponentsConfiguration", "Components Configuration", "Meaning of each component", Group::Photo, TypeId::Undefined, 4, Printer::None),
    0x9102u16 => tag(0x9102, "CompressedBitsPerPixel", "Compressed Bits per Pixel", "Compression mode", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0x9201u16 => tag(0x9201, "ShutterSpeedValue", "Shutter Speed", "APEX shutter speed", Group::Photo, TypeId::SignedRational, 1, Printer::None),
    0x9202u16 => tag(0x9202, "ApertureValue", "Aperture", "APEX aperture", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0x9203u16 => tag(0x9203, "BrightnessValue", "Brightness", "APEX brightness", Group::Photo, TypeId::SignedRational, 1, Printer::None),
    0x9204u16 => tag(0x9204, "ExposureBiasValue", "Exposure Bias", "APEX exposure bias", Group::Photo, TypeId::SignedRational, 1, Printer::None),
    0x9205u16 => tag(0x9205, "MaxApertureValue", "Max Aperture Value", "Smallest F number of lens", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0x9206u16 => tag(0x9206, "SubjectDistance", "Subject Distance", "Distance to subject, meters", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0x9207u16 => tag(0x9207, "MeteringMode", "Metering Mode", "Metering mode", Group::Photo, TypeId::UnsignedShort, 1, Printer::MeteringMode),
    0x9208u16 => tag(0x9208, "LightSource", "Light Source", "Kind of light source", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0x9209u16 => tag(0x9209, "Flash", "Flash", "Flash status", Group::Photo, TypeId::UnsignedShort, 1, Printer::Flash),
    0x920au16 => tag(0x920a, "FocalLength", "Focal Length", "Lens focal length", Group::Photo, TypeId::UnsignedRational, 1, Printer::FocalLength),
    0x9214u16 => tag(0x9214, "SubjectArea", "Subject Area", "Location of main subject", Group::Photo, TypeId::UnsignedShort, 0, Printer::None),
    0x927cu16 => tag(0x927c, "MakerNote", "Maker Note", "Vendor private data", Group::Photo, TypeId::Undefined, 0, Printer::None),
    0x9286u16 => tag(0x9286, "UserComment", "User Comment", "Charset-prefixed comment", Group::Photo, TypeId::Comment, 0, Printer::None),
    0x9290u16 => tag(0x9290, "SubSecTime", "Sub-seconds Time", "DateTime subseconds", Group::Photo, TypeId::AsciiString, 0, Printer::None),
    0x9291u16 => tag(0x9291, "SubSecTimeOriginal", "Sub-seconds Time Original", "DateTimeOriginal subseconds", Group::Photo, TypeId::AsciiString, 0, Printer::None),
    0xa000u16 => tag(0xa000, "FlashpixVersion", "Flashpix Version", "Supported Flashpix version", Group::Photo, TypeId::Undefined, 4, Printer::None),
    0xa001u16 => tag(0xa001, "ColorSpace", "Color Space", "Color space information", Group::Photo, TypeId::UnsignedShort, 1, Printer::ColorSpace),
    0xa002u16 => tag(0xa002, "PixelXDimension", "Pixel X Dimension", "Valid image width", Group::Photo, TypeId::UnsignedLong, 1, Printer::Decimal),
    0xa003u16 => tag(0xa003, "PixelYDimension", "Pixel Y Dimension", "Valid image height", Group::Photo, TypeId::UnsignedLong, 1, Printer::Decimal),
    0xa005u16 => tag(0xa005, "InteroperabilityTag", "Interoperability IFD Pointer", "Offset to Interop IFD", Group::Photo, TypeId::UnsignedLong, 1, Printer::Hex),
    0xa20bu16 => tag(0xa20b, "FlashEnergy", "Flash Energy", "Strobe energy, BCPS", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0xa210u16 => tag(0xa210, "FocalPlaneResolutionUnit", "Focal Plane Resolution Unit", "Unit of focal plane resolution", Group::Photo, TypeId::UnsignedShort, 1, Printer::ResolutionUnit),
    0xa215u16 => tag(0xa215, "ExposureIndex", "Exposure Index", "Exposure index at capture", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0xa217u16 => tag(0xa217, "SensingMethod", "Sensing Method", "Image sensor type", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa300u16 => tag(0xa300, "FileSource", "File Source", "Image source", Group::Photo, TypeId::Undefined, 1, Printer::Decimal),
    0xa301u16 => tag(0xa301, "SceneType", "Scene Type", "Directly photographed flag", Group::Photo, TypeId::Undefined, 1, Printer::Decimal),
    0xa401u16 => tag(0xa401, "CustomRendered", "Custom Rendered", "Special processing flag", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa402u16 => tag(0xa402, "ExposureMode", "Exposure Mode", "Exposure mode at capture", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa403u16 => tag(0xa403, "WhiteBalance", "White Balance", "White balance mode", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa404u16 => tag(0xa404, "DigitalZoomRatio", "Digital Zoom Ratio", "Digital zoom at capture", Group::Photo, TypeId::UnsignedRational, 1, Printer::None),
    0xa405u16 => tag(0xa405, "FocalLengthIn35mmFilm", "35mm Focal Length", "Equivalent focal length", Group::Photo, TypeId::UnsignedShort, 1, Printer::FocalLength),
    0xa406u16 => tag(0xa406, "SceneCaptureType", "Scene Capture Type", "Scene type at capture", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa408u16 => tag(0xa408, "Contrast", "Contrast", "Contrast processing", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa409u16 => tag(0xa409, "Saturation", "Saturation", "Saturation processing", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa40au16 => tag(0xa40a, "Sharpness", "Sharpness", "Sharpness processing", Group::Photo, TypeId::UnsignedShort, 1, Printer::Decimal),
    0xa420u16 => tag(0xa420, "ImageUniqueID", "Image Unique ID", "Unique image identifier", Group::Photo, TypeId::AsciiString, 33, Printer::None),
    0xa432u16 => tag(0xa432, "LensSpecification", "Lens Specification", "Focal length and aperture ranges", Group::Photo, TypeId::UnsignedRational, 4, Printer::LensFromSiblings),
    0xa433u16 => tag(0xa433, "LensMake", "Lens Make", "Lens manufacturer", Group::Photo, TypeId::AsciiString, 0, Printer::None),
    0xa434u16 => tag(0xa434, "LensModel", "Lens Model", "Lens model", Group::Photo, TypeId::AsciiString, 0, Printer::None),
    0xa435u16 => tag(0xa435, "LensSerialNumber", "Lens Serial Number", "Lens serial number", Group::Photo, TypeId::AsciiString, 0, Printer::None),
};

/// Interoperability IFD tags.
pub static IOP_TAGS: phf::Map<u16, TagInfo> = phf_map! {
    0x0001u16 => tag(0x0001, "InteroperabilityIndex", "Interoperability Index", "Interoperability rule", Group::Iop, TypeId::AsciiString, 0, Printer::None),
    0x0002u16 => tag(0x0002, "InteroperabilityVersion", "Interoperability Version", "Interoperability version", Group::Iop, TypeId::Undefined, 4, Printer::None),
    0x1000u16 => tag(0x1000, "RelatedImageFileFormat", "Related Image File Format", "File format of related image", Group::Iop, TypeId::AsciiString, 0, Printer::None),
    0x1001u16 => tag(0x1001, "RelatedImageWidth", "Related Image Width", "Width of related image", Group::Iop, TypeId::UnsignedLong, 1, Printer::Decimal),
    0x1002u16 => tag(0x1002, "RelatedImageLength", "Related Image Height", "Height of related image", Group::Iop, TypeId::UnsignedLong, 1, Printer::Decimal),
};
