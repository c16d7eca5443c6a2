//! XMP packet serializer.
//!
//! Emits the canonical element form: one rdf:Description carrying
//! every schema namespace, simple properties as elements, arrays as
//! rdf:Bag/Seq, language alternatives as rdf:Alt with xml:lang.

use crate::{ns, Error, Result};
use pixmeta_core::{Value, XmpArrayKind, XmpData};

/// XMP packet encoder.
pub struct XmpSerializer;

impl XmpSerializer {
    /// Serialize a container of `Xmp.*` datums to a packet.
    pub fn encode(xmp: &XmpData) -> Result<String> {
        let mut out = String::new();
        out.push_str("<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n");
        out.push_str("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n");
        out.push_str("  <rdf:RDF xmlns:rdf=\"");
        out.push_str(ns::RDF);
        out.push_str("\">\n");
        out.push_str("    <rdf:Description rdf:about=\"\"\n");

        // Declare every schema prefix in use.
        let mut prefixes: Vec<&str> = xmp.iter().map(|d| d.key.group()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        for prefix in &prefixes {
            let uri = ns::uri(prefix)
                .ok_or_else(|| Error::InvalidKey(format!("unknown schema prefix '{prefix}'")))?;
            out.push_str(&format!("        xmlns:{prefix}=\"{uri}\"\n"));
        }
        out.push_str("        >\n");

        for datum in xmp.iter() {
            let prefix = datum.key.group();
            let name = datum.key.tag();
            // Struct fields (parent/field) re-nest on serialization.
            if let Some((parent, field)) = name.split_once('/') {
                out.push_str(&format!("      <{prefix}:{parent}>\n"));
                write_simple(&mut out, prefix, field, &datum.value, 8);
                out.push_str(&format!("      </{prefix}:{parent}>\n"));
                continue;
            }
            match &datum.value {
                Value::XmpArray(kind, items) => {
                    let container = match kind {
                        XmpArrayKind::Alt => "rdf:Alt",
                        XmpArrayKind::Bag => "rdf:Bag",
                        XmpArrayKind::Seq => "rdf:Seq",
                    };
                    out.push_str(&format!("      <{prefix}:{name}>\n        <{container}>\n"));
                    for item in items {
                        out.push_str(&format!(
                            "          <rdf:li>{}</rdf:li>\n",
                            escape_xml(item)
                        ));
                    }
                    out.push_str(&format!("        </{container}>\n      </{prefix}:{name}>\n"));
                }
                Value::LangAlt(alt) => {
                    out.push_str(&format!("      <{prefix}:{name}>\n        <rdf:Alt>\n"));
                    for (lang, text) in alt.iter() {
                        out.push_str(&format!(
                            "          <rdf:li xml:lang=\"{}\">{}</rdf:li>\n",
                            escape_xml(lang),
                            escape_xml(text)
                        ));
                    }
                    out.push_str(&format!("        </rdf:Alt>\n      </{prefix}:{name}>\n"));
                }
                other => write_simple(&mut out, prefix, name, other, 6),
            }
        }

        out.push_str("    </rdf:Description>\n");
        out.push_str("  </rdf:RDF>\n");
        out.push_str("</x:xmpmeta>\n");
        out.push_str("<?xpacket end=\"w\"?>");
        Ok(out)
    }
}

fn write_simple(out: &mut String, prefix: &str, name: &str, value: &Value, indent: usize) {
    let pad = " ".repeat(indent);
    out.push_str(&format!(
        "{pad}<{prefix}:{name}>{}</{prefix}:{name}>\n",
        escape_xml(&value.to_string())
    ));
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmpParser;
    use pixmeta_core::{Family, Key, LangAltValue};

    #[test]
    fn encode_decode_round_trip() {
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::new(Family::Xmp, "xmp", "Rating"),
            Value::XmpText("5".into()),
        );
        xmp.add_pair(
            Key::new(Family::Xmp, "dc", "subject"),
            Value::XmpArray(XmpArrayKind::Bag, vec!["one".into(), "two".into()]),
        );
        let mut alt = LangAltValue::new();
        alt.set("x-default", "Title");
        alt.set("de", "Titel");
        xmp.add_pair(Key::new(Family::Xmp, "dc", "title"), Value::LangAlt(alt));

        let packet = XmpSerializer::encode(&xmp).unwrap();
        let back = XmpParser::decode(&packet).unwrap();

        assert_eq!(back.len(), 3);
        for datum in xmp.iter() {
            assert_eq!(
                back.find_key(&datum.key).map(|d| &d.value),
                Some(&datum.value),
                "{}",
                datum.key
            );
        }
    }

    #[test]
    fn escapes_markup() {
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::new(Family::Xmp, "dc", "description"),
            Value::XmpText("a < b & c".into()),
        );
        let packet = XmpSerializer::encode(&xmp).unwrap();
        assert!(packet.contains("a &lt; b &amp; c"));
        let back = XmpParser::decode(&packet).unwrap();
        assert_eq!(
            back.iter().next().unwrap().value,
            Value::XmpText("a < b & c".into())
        );
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::new(Family::Xmp, "mystery", "Thing"),
            Value::XmpText("x".into()),
        );
        assert!(XmpSerializer::encode(&xmp).is_err());
    }

    #[test]
    fn struct_fields_re_nest() {
        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::new(Family::Xmp, "xmpMM", "DerivedFrom/instanceID"),
            Value::XmpText("xmp.iid:42".into()),
        );
        let packet = XmpSerializer::encode(&xmp).unwrap();
        assert!(packet.contains("<xmpMM:DerivedFrom>"));
        let back = XmpParser::decode(&packet).unwrap();
        assert_eq!(
            back.iter().next().unwrap().value,
            Value::XmpText("xmp.iid:42".into())
        );
    }
}
