//! IPTC IIM4 stream decoder and encoder.
//!
//! The IIM4 binary encoding is a flat sequence of datasets, each
//! introduced by the marker byte `0x1c`:
//!
//! ```text
//! 0x1C | record | dataset | size (u16 BE) | data[size]
//! ```
//!
//! When the high bit of the u16 is set, its low bits give the byte
//! count of an extended length field that follows (the writer always
//! emits four bytes). Streams appear in JPEG APP13 Photoshop IRBs,
//! PSD image resources, and TIFF tag 0x83bb.
//!
//! Record 1 is the envelope, record 2 the application record.
//! Repeatable datasets (Keywords, Byline, ...) become one datum per
//! occurrence; a duplicate of a non-repeatable dataset keeps the
//! first occurrence and logs.

pub mod datasets;

pub use datasets::{dataset_info, DatasetInfo, DatasetType};

use pixmeta_core::charset::Charset;
use pixmeta_core::{
    DateValue, Datum, Error, Family, IptcData, Key, Result, TimeValue, Value,
};
use tracing::warn;

/// Dataset marker byte.
const MARKER: u8 = 0x1c;

/// The `ESC % G` sequence announcing UTF-8 in dataset 1:90.
const UTF8_ESCAPE: &[u8] = &[0x1b, 0x25, 0x47];

/// IIM4 stream decoder.
pub struct IptcParser;

impl IptcParser {
    /// Decode an IIM4 stream into a container.
    ///
    /// Every dataset must start with the `0x1c` marker; anything else
    /// is corrupt. Truncated datasets at the tail are corrupt too.
    pub fn decode(data: &[u8]) -> Result<IptcData> {
        let mut iptc = IptcData::new();
        let mut pos = 0;

        while pos < data.len() {
            if data[pos] != MARKER {
                return Err(Error::InvalidRecord(pos));
            }
            if pos + 5 > data.len() {
                return Err(Error::UnexpectedEof {
                    need: pos + 5,
                    have: data.len(),
                });
            }

            let record = data[pos + 1];
            let dataset = data[pos + 2];
            let size_field = u16::from_be_bytes([data[pos + 3], data[pos + 4]]);

            let (size, header_len) = if size_field & 0x8000 != 0 {
                // Extended form: the low bits give the length of the
                // length field itself.
                let size_bytes = (size_field & 0x7fff) as usize;
                if size_bytes == 0 || size_bytes > 4 || pos + 5 + size_bytes > data.len() {
                    return Err(Error::CorruptedMetadata("IPTC"));
                }
                let mut size = 0usize;
                for &b in &data[pos + 5..pos + 5 + size_bytes] {
                    size = (size << 8) | b as usize;
                }
                (size, 5 + size_bytes)
            } else {
                (size_field as usize, 5)
            };

            pos += header_len;
            if pos + size > data.len() {
                return Err(Error::UnexpectedEof {
                    need: pos + size,
                    have: data.len(),
                });
            }
            let payload = &data[pos..pos + size];
            pos += size;

            let key = make_key(record, dataset);
            if !datasets::is_repeatable(record, dataset) && iptc.find_key(&key).is_some() {
                warn!(record, dataset, "duplicate non-repeatable dataset, keeping first");
                continue;
            }
            iptc.add_pair(key, decode_value(record, dataset, payload));
        }

        Ok(iptc)
    }
}

/// IIM4 stream encoder.
pub struct IptcWriter;

impl IptcWriter {
    /// Encode a container in canonical order.
    ///
    /// Canonical order is record ascending, dataset ascending,
    /// insertion order among repeats; the short length form is used
    /// up to 32767 bytes, the extended form beyond.
    pub fn encode(iptc: &IptcData) -> Result<Vec<u8>> {
        let mut records: Vec<(u8, u8, Vec<u8>)> = Vec::with_capacity(iptc.len());
        for datum in iptc.iter() {
            let (record, dataset) = key_ids(&datum.key)?;
            records.push((record, dataset, encode_value(&datum.value)));
        }
        records.sort_by_key(|&(record, dataset, _)| (record, dataset));

        let mut out = Vec::new();
        for (record, dataset, payload) in records {
            out.push(MARKER);
            out.push(record);
            out.push(dataset);
            if payload.len() > 0x7fff {
                out.extend_from_slice(&0x8004u16.to_be_bytes());
                out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            } else {
                out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
            }
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }
}

/// Add a datum, enforcing the repeatability rule.
///
/// Non-repeatable datasets that are already present are rejected with
/// [`Error::DatasetNotRepeatable`].
pub fn add(iptc: &mut IptcData, datum: Datum) -> Result<()> {
    let (record, dataset) = key_ids(&datum.key)?;
    if !datasets::is_repeatable(record, dataset) && iptc.find_key(&datum.key).is_some() {
        return Err(Error::DatasetNotRepeatable { record, dataset });
    }
    iptc.add(datum);
    Ok(())
}

/// Detect the character set of an IIM4 container.
///
/// IIM carries no per-dataset charset; dataset 1:90 announces UTF-8
/// via `ESC % G`. Without it, pure-ASCII content is ASCII and
/// anything else falls back to Latin-1.
pub fn detect_charset(iptc: &IptcData) -> Charset {
    let charset_key = Key::new(Family::Iptc, "Envelope", "CharacterSet");
    if let Some(datum) = iptc.find_key(&charset_key) {
        if let Value::Undefined(bytes) = &datum.value {
            if bytes == UTF8_ESCAPE {
                return Charset::Utf8;
            }
        }
    }
    let all_ascii = iptc.iter().all(|d| match &d.value {
        Value::Ascii(s) => s.is_ascii(),
        _ => true,
    });
    if all_ascii {
        Charset::Ascii
    } else {
        Charset::Iso8859_1
    }
}

fn make_key(record: u8, dataset: u8) -> Key {
    let group = match datasets::record_name(record) {
        Some(name) => name.to_string(),
        None => format!("0x{record:02x}"),
    };
    Key::new(Family::Iptc, group, datasets::dataset_name(record, dataset))
}

fn key_ids(key: &Key) -> Result<(u8, u8)> {
    let record = match datasets::record_by_name(key.group()) {
        Some(r) => r,
        None => key
            .group()
            .strip_prefix("0x")
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| Error::InvalidKey(key.to_string()))?,
    };
    let dataset = datasets::dataset_by_name(record, key.tag())
        .ok_or_else(|| Error::InvalidTag(key.tag().to_string()))?;
    Ok((record, dataset))
}

fn decode_value(record: u8, dataset: u8, payload: &[u8]) -> Value {
    // Unknown datasets stay raw bytes so re-encoding is lossless.
    let dataset_type = datasets::dataset_info(record, dataset)
        .map(|info| info.dataset_type)
        .unwrap_or(DatasetType::Bin);
    match dataset_type {
        // String payloads keep their original encoding; the charset
        // is a property of the whole stream (1:90).
        DatasetType::Str | DatasetType::Digits => {
            Value::Ascii(String::from_utf8_lossy(payload).into_owned())
        }
        DatasetType::UShort if payload.len() >= 2 => {
            Value::Short(vec![u16::from_be_bytes([payload[0], payload[1]])])
        }
        DatasetType::Date => match DateValue::parse(&String::from_utf8_lossy(payload)) {
            Some(date) => Value::Date(date),
            None => Value::Ascii(String::from_utf8_lossy(payload).into_owned()),
        },
        DatasetType::Time => match TimeValue::parse(&String::from_utf8_lossy(payload)) {
            Some(time) => Value::Time(time),
            None => Value::Ascii(String::from_utf8_lossy(payload).into_owned()),
        },
        _ => Value::Undefined(payload.to_vec()),
    }
}

fn encode_value(value: &Value) -> Vec<u8> {
    match value {
        Value::Ascii(s) => s.as_bytes().to_vec(),
        Value::Short(v) if !v.is_empty() => v[0].to_be_bytes().to_vec(),
        Value::Date(d) => format!("{:04}{:02}{:02}", d.year, d.month, d.day).into_bytes(),
        Value::Time(t) => {
            let sign = if t.tz_hour < 0 || t.tz_minute < 0 { '-' } else { '+' };
            format!(
                "{:02}{:02}{:02}{}{:02}{:02}",
                t.hour,
                t.minute,
                t.second,
                sign,
                t.tz_hour.unsigned_abs(),
                t.tz_minute.unsigned_abs()
            )
            .into_bytes()
        }
        Value::Undefined(b) | Value::Byte(b) => b.clone(),
        other => other.to_string().into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple() {
        // Record 2, dataset 105 (Headline) = "Test"
        let data = [
            0x1c, 0x02, 105, 0x00, 0x04, b'T', b'e', b's', b't',
        ];
        let iptc = IptcParser::decode(&data).unwrap();
        let key = Key::parse("Iptc.Application2.Headline").unwrap();
        assert_eq!(iptc.find_key(&key).unwrap().value, Value::Ascii("Test".into()));
    }

    #[test]
    fn decode_rejects_bad_marker() {
        let data = [0x1d, 0x02, 105, 0x00, 0x00];
        assert!(matches!(
            IptcParser::decode(&data),
            Err(Error::InvalidRecord(0))
        ));
    }

    #[test]
    fn decode_rejects_truncated_tail() {
        let data = [0x1c, 0x02, 105, 0x00, 0x09, b'T'];
        assert!(IptcParser::decode(&data).is_err());
    }

    #[test]
    fn repeatable_keywords_become_separate_datums() {
        let data = [
            0x1c, 0x02, 25, 0x00, 0x03, b'c', b'a', b't',
            0x1c, 0x02, 25, 0x00, 0x03, b'd', b'o', b'g',
        ];
        let iptc = IptcParser::decode(&data).unwrap();
        let key = Key::parse("Iptc.Application2.Keywords").unwrap();
        let values: Vec<_> = iptc.find_all(&key).map(|d| d.value.to_string()).collect();
        assert_eq!(values, ["cat", "dog"]);
    }

    #[test]
    fn duplicate_non_repeatable_keeps_first() {
        let data = [
            0x1c, 0x02, 0, 0x00, 0x02, 0x00, 0x02, // RecordVersion = 2
            0x1c, 0x02, 0, 0x00, 0x02, 0x00, 0x04, // RecordVersion = 4
        ];
        let iptc = IptcParser::decode(&data).unwrap();
        let key = Key::parse("Iptc.Application2.RecordVersion").unwrap();
        assert_eq!(iptc.find_all(&key).count(), 1);
        assert_eq!(iptc.find_key(&key).unwrap().value, Value::Short(vec![2]));
    }

    #[test]
    fn add_enforces_repeatability() {
        let mut iptc = IptcData::new();
        let version = Key::parse("Iptc.Application2.RecordVersion").unwrap();
        add(&mut iptc, Datum::new(version.clone(), Value::Short(vec![4]))).unwrap();
        let err = add(&mut iptc, Datum::new(version, Value::Short(vec![4])));
        assert!(matches!(err, Err(Error::DatasetNotRepeatable { record: 2, dataset: 0 })));

        let keywords = Key::parse("Iptc.Application2.Keywords").unwrap();
        add(&mut iptc, Datum::new(keywords.clone(), Value::Ascii("cat".into()))).unwrap();
        add(&mut iptc, Datum::new(keywords, Value::Ascii("dog".into()))).unwrap();
    }

    #[test]
    fn round_trip_canonical_stream() {
        let mut iptc = IptcData::new();
        iptc.add_pair(
            Key::parse("Iptc.Application2.RecordVersion").unwrap(),
            Value::Short(vec![4]),
        );
        iptc.add_pair(
            Key::parse("Iptc.Application2.Keywords").unwrap(),
            Value::Ascii("alpha".into()),
        );
        iptc.add_pair(
            Key::parse("Iptc.Application2.Keywords").unwrap(),
            Value::Ascii("beta".into()),
        );
        iptc.add_pair(
            Key::parse("Iptc.Application2.Caption").unwrap(),
            Value::Ascii("A caption".into()),
        );

        let encoded = IptcWriter::encode(&iptc).unwrap();
        let decoded = IptcParser::decode(&encoded).unwrap();
        let encoded_again = IptcWriter::encode(&decoded).unwrap();
        assert_eq!(encoded, encoded_again);
    }

    #[test]
    fn extended_length_round_trip() {
        // A 70000-byte caption forces the extended length form.
        let big = "x".repeat(70_000);
        let mut iptc = IptcData::new();
        iptc.add_pair(
            Key::parse("Iptc.Application2.Caption").unwrap(),
            Value::Ascii(big.clone()),
        );
        let encoded = IptcWriter::encode(&iptc).unwrap();
        // marker + record + dataset + 0x8004 + u32 length
        assert_eq!(&encoded[3..5], &0x8004u16.to_be_bytes());
        assert_eq!(
            u32::from_be_bytes([encoded[5], encoded[6], encoded[7], encoded[8]]),
            70_000
        );

        let decoded = IptcParser::decode(&encoded).unwrap();
        let key = Key::parse("Iptc.Application2.Caption").unwrap();
        assert_eq!(decoded.find_key(&key).unwrap().value, Value::Ascii(big));
        assert_eq!(IptcWriter::encode(&decoded).unwrap(), encoded);
    }

    #[test]
    fn charset_detection() {
        let mut iptc = IptcData::new();
        iptc.add_pair(
            Key::parse("Iptc.Application2.City").unwrap(),
            Value::Ascii("Oslo".into()),
        );
        assert_eq!(detect_charset(&iptc), Charset::Ascii);

        iptc.add_pair(
            Key::parse("Iptc.Envelope.CharacterSet").unwrap(),
            Value::Undefined(vec![0x1b, 0x25, 0x47]),
        );
        assert_eq!(detect_charset(&iptc), Charset::Utf8);
    }

    #[test]
    fn charset_latin1_fallback() {
        let mut iptc = IptcData::new();
        iptc.add_pair(
            Key::parse("Iptc.Application2.City").unwrap(),
            Value::Ascii("Zürich".into()),
        );
        assert_eq!(detect_charset(&iptc), Charset::Iso8859_1);
    }

    #[test]
    fn unknown_dataset_round_trips_as_hex() {
        let data = [0x1c, 0x02, 0xf0, 0x00, 0x02, 0xab, 0xcd];
        let iptc = IptcParser::decode(&data).unwrap();
        let datum = iptc.iter().next().unwrap();
        assert_eq!(datum.key.tag(), "0x00f0");
        let encoded = IptcWriter::encode(&iptc).unwrap();
        assert_eq!(encoded, data);
    }
}
