//! Conversion bridge between the Exif, IPTC and XMP namespaces.
//!
//! A declarative rule table names the key pairs; a converter variant
//! per rule handles the representation change (plain copy, Exif
//! `YYYY:MM:DD HH:MM:SS` vs XMP ISO 8601 dates, text vs language
//! alternative, repeated datums vs bag/seq arrays).
//! `sync_exif_with_xmp` picks a direction per pair from whichever
//! side carries the fresher modify timestamp.

use chrono::NaiveDateTime;
use pixmeta_core::{
    Datum, ExifData, IptcData, Key, LangAltValue, Value, XmpArrayKind, XmpData,
};

pub use pixmeta_core::charset::{convert_string_charset, Charset};

/// How a rule's value moves between representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conv {
    /// Text or number copied as a string.
    Simple,
    /// Exif date-time string to XMP ISO 8601 and back.
    DateTime,
    /// Single string on one side, language alternative on the other.
    LangAlt,
    /// Repeated datums on one side, array items on the other.
    Array(XmpArrayKind),
    /// Charset-prefixed comment to language alternative.
    Comment,
}

struct Rule {
    left: &'static str,
    xmp: &'static str,
    conv: Conv,
}

/// Exif ↔ XMP rules.
static EXIF_XMP_RULES: &[Rule] = &[
    Rule { left: "Exif.Image.Make", xmp: "Xmp.tiff.Make", conv: Conv::Simple },
    Rule { left: "Exif.Image.Model", xmp: "Xmp.tiff.Model", conv: Conv::Simple },
    Rule { left: "Exif.Image.Orientation", xmp: "Xmp.tiff.Orientation", conv: Conv::Simple },
    Rule { left: "Exif.Image.Software", xmp: "Xmp.xmp.CreatorTool", conv: Conv::Simple },
    Rule { left: "Exif.Image.DateTime", xmp: "Xmp.xmp.ModifyDate", conv: Conv::DateTime },
    Rule { left: "Exif.Image.ImageDescription", xmp: "Xmp.dc.description", conv: Conv::LangAlt },
    Rule { left: "Exif.Image.Copyright", xmp: "Xmp.dc.rights", conv: Conv::LangAlt },
    Rule { left: "Exif.Image.Artist", xmp: "Xmp.dc.creator", conv: Conv::Array(XmpArrayKind::Seq) },
    Rule { left: "Exif.Photo.DateTimeOriginal", xmp: "Xmp.photoshop.DateCreated", conv: Conv::DateTime },
    Rule { left: "Exif.Photo.DateTimeDigitized", xmp: "Xmp.xmp.CreateDate", conv: Conv::DateTime },
    Rule { left: "Exif.Photo.ExposureTime", xmp: "Xmp.exif.ExposureTime", conv: Conv::Simple },
    Rule { left: "Exif.Photo.FNumber", xmp: "Xmp.exif.FNumber", conv: Conv::Simple },
    Rule { left: "Exif.Photo.ISOSpeedRatings", xmp: "Xmp.exif.ISOSpeedRatings", conv: Conv::Array(XmpArrayKind::Seq) },
    Rule { left: "Exif.Photo.UserComment", xmp: "Xmp.exif.UserComment", conv: Conv::Comment },
];

/// IPTC ↔ XMP rules.
static IPTC_XMP_RULES: &[Rule] = &[
    Rule { left: "Iptc.Application2.ObjectName", xmp: "Xmp.dc.title", conv: Conv::LangAlt },
    Rule { left: "Iptc.Application2.Caption", xmp: "Xmp.dc.description", conv: Conv::LangAlt },
    Rule { left: "Iptc.Application2.Copyright", xmp: "Xmp.dc.rights", conv: Conv::LangAlt },
    Rule { left: "Iptc.Application2.Keywords", xmp: "Xmp.dc.subject", conv: Conv::Array(XmpArrayKind::Bag) },
    Rule { left: "Iptc.Application2.Byline", xmp: "Xmp.dc.creator", conv: Conv::Array(XmpArrayKind::Seq) },
    Rule { left: "Iptc.Application2.City", xmp: "Xmp.photoshop.City", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.ProvinceState", xmp: "Xmp.photoshop.State", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.CountryName", xmp: "Xmp.photoshop.Country", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.Credit", xmp: "Xmp.photoshop.Credit", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.Source", xmp: "Xmp.photoshop.Source", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.Headline", xmp: "Xmp.photoshop.Headline", conv: Conv::Simple },
    Rule { left: "Iptc.Application2.Urgency", xmp: "Xmp.photoshop.Urgency", conv: Conv::Simple },
];

/// Copy convertible Exif datums into the XMP container.
pub fn copy_exif_to_xmp(exif: &ExifData, xmp: &mut XmpData) {
    for rule in EXIF_XMP_RULES {
        let Ok(left) = Key::parse(rule.left) else { continue };
        let Ok(right) = Key::parse(rule.xmp) else { continue };
        to_xmp(exif, &left, xmp, right, rule.conv);
    }
}

/// Copy convertible XMP datums into the Exif container.
pub fn copy_xmp_to_exif(xmp: &XmpData, exif: &mut ExifData) {
    for rule in EXIF_XMP_RULES {
        let Ok(left) = Key::parse(rule.left) else { continue };
        let Ok(right) = Key::parse(rule.xmp) else { continue };
        from_xmp(xmp, &right, exif, left, rule.conv, Side::Exif);
    }
}

/// Copy convertible IPTC datums into the XMP container.
pub fn copy_iptc_to_xmp(iptc: &IptcData, xmp: &mut XmpData) {
    for rule in IPTC_XMP_RULES {
        let Ok(left) = Key::parse(rule.left) else { continue };
        let Ok(right) = Key::parse(rule.xmp) else { continue };
        to_xmp(iptc, &left, xmp, right, rule.conv);
    }
}

/// Copy convertible XMP datums into the IPTC container.
pub fn copy_xmp_to_iptc(xmp: &XmpData, iptc: &mut IptcData) {
    for rule in IPTC_XMP_RULES {
        let Ok(left) = Key::parse(rule.left) else { continue };
        let Ok(right) = Key::parse(rule.xmp) else { continue };
        from_xmp(xmp, &right, iptc, left, rule.conv, Side::Iptc);
    }
}

/// Reconcile Exif and XMP, newer modify date winning per pair.
pub fn sync_exif_with_xmp(exif: &mut ExifData, xmp: &mut XmpData) {
    let exif_stamp = exif
        .find_key(&Key::new(pixmeta_core::Family::Exif, "Image", "DateTime"))
        .and_then(|d| parse_exif_datetime(&d.value.to_string()));
    let xmp_stamp = xmp
        .find_key(&Key::new(pixmeta_core::Family::Xmp, "xmp", "ModifyDate"))
        .and_then(|d| parse_iso_datetime(&d.value.to_string()));

    let xmp_wins = match (exif_stamp, xmp_stamp) {
        (Some(e), Some(x)) => x > e,
        (None, Some(_)) => true,
        _ => false,
    };
    if xmp_wins {
        copy_xmp_to_exif(xmp, exif);
    } else {
        copy_exif_to_xmp(exif, xmp);
    }
}

enum Side {
    Exif,
    Iptc,
}

fn to_xmp(
    source: &ExifData,
    left: &Key,
    xmp: &mut XmpData,
    right: Key,
    conv: Conv,
) {
    let datums: Vec<&Datum> = source.find_all(left).collect();
    if datums.is_empty() {
        return;
    }
    let value = match conv {
        Conv::Simple => Value::XmpText(datums[0].value.to_string()),
        Conv::DateTime => match exif_to_iso(&datums[0].value.to_string()) {
            Some(iso) => Value::XmpText(iso),
            None => return,
        },
        Conv::LangAlt => {
            let mut alt = LangAltValue::new();
            alt.set("x-default", datums[0].value.to_string());
            Value::LangAlt(alt)
        }
        Conv::Array(kind) => {
            // Repeated datums (IPTC) or space-separated components
            // (Exif Artist) become array items.
            let items: Vec<String> = if datums.len() > 1 {
                datums.iter().map(|d| d.value.to_string()).collect()
            } else {
                datums[0]
                    .value
                    .to_string()
                    .split(';')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            };
            Value::XmpArray(kind, items)
        }
        Conv::Comment => {
            let text = match &datums[0].value {
                Value::Comment(c) => c.comment(),
                other => other.to_string(),
            };
            let mut alt = LangAltValue::new();
            alt.set("x-default", text);
            Value::LangAlt(alt)
        }
    };
    xmp.set(right, value);
}

fn from_xmp(
    xmp: &XmpData,
    right: &Key,
    target: &mut ExifData,
    left: Key,
    conv: Conv,
    side: Side,
) {
    let Some(datum) = xmp.find_key(right) else {
        return;
    };
    match conv {
        Conv::Simple => {
            target.set(left, Value::Ascii(datum.value.to_string()));
        }
        Conv::DateTime => {
            if let Some(exif_dt) = iso_to_exif(&datum.value.to_string()) {
                target.set(left, Value::Ascii(exif_dt));
            }
        }
        Conv::LangAlt | Conv::Comment => {
            let text = match &datum.value {
                Value::LangAlt(alt) => alt.default_text().unwrap_or_default().to_string(),
                other => other.to_string(),
            };
            match conv {
                Conv::Comment => target.set(
                    left,
                    Value::Comment(pixmeta_core::CommentValue::from_str(
                        &text,
                        pixmeta_core::CharsetId::Ascii,
                    )),
                ),
                _ => target.set(left, Value::Ascii(text)),
            }
        }
        Conv::Array(_) => {
            let items: Vec<String> = match &datum.value {
                Value::XmpArray(_, items) => items.clone(),
                other => vec![other.to_string()],
            };
            match side {
                Side::Iptc => {
                    // One repeatable dataset per item.
                    target.erase(&left);
                    for item in items {
                        target.add_pair(left.clone(), Value::Ascii(item));
                    }
                }
                Side::Exif => {
                    target.set(left, Value::Ascii(items.join("; ")));
                }
            }
        }
    }
}

/// `2024:01:15 10:30:00` to `2024-01-15T10:30:00`.
fn exif_to_iso(s: &str) -> Option<String> {
    let dt = parse_exif_datetime(s)?;
    Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// `2024-01-15T10:30:00` (zone suffix tolerated) to Exif form.
fn iso_to_exif(s: &str) -> Option<String> {
    let dt = parse_iso_datetime(s)?;
    Some(dt.format("%Y:%m:%d %H:%M:%S").to_string())
}

fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y:%m:%d %H:%M:%S").ok()
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    // Drop a trailing zone designator; the comparison is local.
    let body = if trimmed.len() > 19 { &trimmed[..19] } else { trimmed };
    NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exif_date_reshapes_to_iso() {
        let mut exif = ExifData::new();
        exif.add_pair(
            Key::parse("Exif.Photo.DateTimeOriginal").unwrap(),
            Value::Ascii("2024:01:15 10:30:00".into()),
        );
        let mut xmp = XmpData::new();
        copy_exif_to_xmp(&exif, &mut xmp);

        let key = Key::parse("Xmp.photoshop.DateCreated").unwrap();
        assert_eq!(
            xmp.find_key(&key).unwrap().value,
            Value::XmpText("2024-01-15T10:30:00".into())
        );
    }

    #[test]
    fn iso_date_reshapes_back() {
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::parse("Xmp.xmp.CreateDate").unwrap(),
            Value::XmpText("2024-01-15T10:30:00+02:00".into()),
        );
        let mut exif = ExifData::new();
        copy_xmp_to_exif(&xmp, &mut exif);

        let key = Key::parse("Exif.Photo.DateTimeDigitized").unwrap();
        assert_eq!(
            exif.find_key(&key).unwrap().value,
            Value::Ascii("2024:01:15 10:30:00".into())
        );
    }

    #[test]
    fn keywords_become_a_bag_and_back() {
        let mut iptc = IptcData::new();
        let kw = Key::parse("Iptc.Application2.Keywords").unwrap();
        iptc.add_pair(kw.clone(), Value::Ascii("cat".into()));
        iptc.add_pair(kw.clone(), Value::Ascii("dog".into()));

        let mut xmp = XmpData::new();
        copy_iptc_to_xmp(&iptc, &mut xmp);
        let subject = Key::parse("Xmp.dc.subject").unwrap();
        assert_eq!(
            xmp.find_key(&subject).unwrap().value,
            Value::XmpArray(XmpArrayKind::Bag, vec!["cat".into(), "dog".into()])
        );

        let mut back = IptcData::new();
        copy_xmp_to_iptc(&xmp, &mut back);
        let values: Vec<String> = back.find_all(&kw).map(|d| d.value.to_string()).collect();
        assert_eq!(values, ["cat", "dog"]);
    }

    #[test]
    fn stale_repeatable_entries_are_replaced_on_resync() {
        // The target already carries keywords; the XMP bag must
        // replace every one of them, not just the first.
        let mut iptc = IptcData::new();
        let kw = Key::parse("Iptc.Application2.Keywords").unwrap();
        iptc.add_pair(kw.clone(), Value::Ascii("stale-one".into()));
        iptc.add_pair(
            Key::parse("Iptc.Application2.City").unwrap(),
            Value::Ascii("Bergen".into()),
        );
        iptc.add_pair(kw.clone(), Value::Ascii("stale-two".into()));
        iptc.add_pair(kw.clone(), Value::Ascii("stale-three".into()));

        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::parse("Xmp.dc.subject").unwrap(),
            Value::XmpArray(XmpArrayKind::Bag, vec!["fresh".into()]),
        );
        copy_xmp_to_iptc(&xmp, &mut iptc);

        let values: Vec<String> = iptc.find_all(&kw).map(|d| d.value.to_string()).collect();
        assert_eq!(values, ["fresh"], "no stale keyword survives");
        // Unrelated datums are untouched.
        let city = Key::parse("Iptc.Application2.City").unwrap();
        assert_eq!(iptc.find_key(&city).unwrap().value.to_string(), "Bergen");
    }

    #[test]
    fn caption_becomes_lang_alt() {
        let mut iptc = IptcData::new();
        iptc.add_pair(
            Key::parse("Iptc.Application2.Caption").unwrap(),
            Value::Ascii("A harbour at dusk".into()),
        );
        let mut xmp = XmpData::new();
        copy_iptc_to_xmp(&iptc, &mut xmp);
        let desc = Key::parse("Xmp.dc.description").unwrap();
        match &xmp.find_key(&desc).unwrap().value {
            Value::LangAlt(alt) => assert_eq!(alt.default_text(), Some("A harbour at dusk")),
            other => panic!("expected LangAlt, got {other:?}"),
        }
    }

    #[test]
    fn sync_prefers_the_newer_side() {
        let mut exif = ExifData::new();
        exif.add_pair(
            Key::parse("Exif.Image.DateTime").unwrap(),
            Value::Ascii("2024:01:01 00:00:00".into()),
        );
        exif.add_pair(
            Key::parse("Exif.Image.Make").unwrap(),
            Value::Ascii("OldMake".into()),
        );
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::parse("Xmp.xmp.ModifyDate").unwrap(),
            Value::XmpText("2024-06-01T00:00:00".into()),
        );
        xmp.add_pair(
            Key::parse("Xmp.tiff.Make").unwrap(),
            Value::XmpText("NewMake".into()),
        );

        sync_exif_with_xmp(&mut exif, &mut xmp);
        let make = Key::parse("Exif.Image.Make").unwrap();
        assert_eq!(exif.find_key(&make).unwrap().value.to_string(), "NewMake");
    }

    #[test]
    fn charset_matrix_reexport() {
        let bytes = convert_string_charset(b"caf\xe9", Charset::Iso8859_1, Charset::Utf8);
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), "café");
    }
}
