//! XMP packet parser.
//!
//! Walks the RDF with a state stack: simple properties (element text
//! or rdf:Description attributes), rdf:Bag/Seq arrays, rdf:Alt
//! language alternatives, and one level of struct nesting (fields
//! flatten to `parent/field` names, stRef style).

use crate::{Error, Result};
use pixmeta_core::{Family, Key, LangAltValue, Value, XmpArrayKind, XmpData};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XMP packet decoder.
pub struct XmpParser;

#[derive(Debug, Clone)]
enum State {
    Outside,
    InDescription,
    InProperty {
        prefix: String,
        name: String,
    },
    InArray {
        prefix: String,
        name: String,
        kind: XmpArrayKind,
        items: Vec<String>,
    },
    InAlt {
        prefix: String,
        name: String,
        alt: LangAltValue,
    },
    InListItem {
        lang: Option<String>,
    },
    InStructField {
        prefix: String,
        name: String,
    },
    /// An array replaced its property on the stack; the property's
    /// own end tag is still coming and must be swallowed.
    PendingPropertyEnd,
}

impl XmpParser {
    /// Decode an XMP packet into a container of `Xmp.*` datums.
    ///
    /// `<?xpacket?>` wrappers and padding are tolerated.
    pub fn decode(packet: &str) -> Result<XmpData> {
        let mut xmp = XmpData::new();
        let mut reader = Reader::from_str(packet);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<State> = vec![State::Outside];
        let mut text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let elem = elem_name(e);
                    text.clear();

                    match stack.last().cloned() {
                        Some(State::Outside) => {
                            if local_name(&elem) == "Description" {
                                description_attrs(e, &mut xmp);
                                stack.push(State::InDescription);
                            }
                        }
                        Some(State::InDescription) => {
                            let (prefix, name) = split_name(&elem);
                            stack.push(State::InProperty {
                                prefix: prefix.to_string(),
                                name: name.to_string(),
                            });
                        }
                        Some(State::InProperty { prefix, name }) => match local_name(&elem) {
                            "Bag" => replace_top(&mut stack, State::InArray {
                                prefix,
                                name,
                                kind: XmpArrayKind::Bag,
                                items: Vec::new(),
                            }),
                            "Seq" => replace_top(&mut stack, State::InArray {
                                prefix,
                                name,
                                kind: XmpArrayKind::Seq,
                                items: Vec::new(),
                            }),
                            "Alt" => {
                                // An Alt of xml:lang items is a language
                                // alternative; plain Alt arrays are rare
                                // and fold into the same shape.
                                replace_top(&mut stack, State::InAlt {
                                    prefix,
                                    name,
                                    alt: LangAltValue::new(),
                                })
                            }
                            _ => {
                                // Struct field: flatten to parent/field.
                                let (_, field) = split_name(&elem);
                                stack.push(State::InStructField {
                                    prefix,
                                    name: format!("{name}/{field}"),
                                });
                            }
                        },
                        Some(State::InArray { .. }) | Some(State::InAlt { .. }) => {
                            let lang = xml_lang(e);
                            stack.push(State::InListItem { lang });
                        }
                        Some(State::InStructField { prefix, name }) => {
                            let elem = elem_name(e);
                            let (_, field) = split_name(&elem);
                            stack.push(State::InStructField {
                                prefix,
                                name: format!("{name}/{field}"),
                            });
                        }
                        Some(State::InListItem { .. }) => {
                            // Element inside a list item (parseType
                            // Resource): keep the stack balanced, the
                            // content itself is not modeled.
                            stack.push(State::InListItem { lang: None });
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    // Shorthand form: a self-closing Description with
                    // properties as attributes.
                    let elem = elem_name(e);
                    if local_name(&elem) == "Description"
                        && matches!(
                            stack.last(),
                            Some(State::Outside) | Some(State::InDescription)
                        )
                    {
                        description_attrs(e, &mut xmp);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Ok(t) = e.decode() {
                        text.push_str(&t);
                    }
                }
                Ok(Event::End(_)) => {
                    match stack.pop() {
                        Some(State::InListItem { lang }) => {
                            let item = std::mem::take(&mut text);
                            match stack.last_mut() {
                                Some(State::InArray { items, .. }) => items.push(item),
                                Some(State::InAlt { alt, .. }) => {
                                    let lang = lang.unwrap_or_else(|| "x-default".to_string());
                                    alt.set(&lang, item);
                                }
                                _ => {}
                            }
                        }
                        Some(State::InArray {
                            prefix,
                            name,
                            kind,
                            items,
                        }) => {
                            xmp.add_pair(
                                make_key(&prefix, &name),
                                Value::XmpArray(kind, items),
                            );
                            stack.push(State::PendingPropertyEnd);
                        }
                        Some(State::InAlt { prefix, name, alt }) => {
                            xmp.add_pair(make_key(&prefix, &name), Value::LangAlt(alt));
                            stack.push(State::PendingPropertyEnd);
                        }
                        Some(State::PendingPropertyEnd) => {}
                        Some(State::InProperty { prefix, name }) => {
                            let value = std::mem::take(&mut text);
                            if !value.is_empty() {
                                xmp.add_pair(make_key(&prefix, &name), Value::XmpText(value));
                            }
                        }
                        Some(State::InStructField { prefix, name }) => {
                            let value = std::mem::take(&mut text);
                            if !value.is_empty() {
                                xmp.add_pair(make_key(&prefix, &name), Value::XmpText(value));
                            }
                        }
                        Some(State::InDescription) | Some(State::Outside) | None => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
                _ => {}
            }
        }

        Ok(xmp)
    }
}

fn replace_top(stack: &mut Vec<State>, state: State) {
    stack.pop();
    stack.push(state);
}

fn make_key(prefix: &str, name: &str) -> Key {
    Key::new(Family::Xmp, prefix, name)
}

fn elem_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn split_name(name: &str) -> (&str, &str) {
    match name.find(':') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("", name),
    }
}

fn local_name(name: &str) -> &str {
    split_name(name).1
}

fn xml_lang(e: &BytesStart) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"xml:lang" {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Properties written as rdf:Description attributes.
fn description_attrs(e: &BytesStart, xmp: &mut XmpData) {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if key.starts_with("xmlns") || key.starts_with("rdf:") || key.starts_with("xml:") {
            continue;
        }
        let (prefix, name) = split_name(&key);
        if prefix.is_empty() {
            continue;
        }
        let value = String::from_utf8_lossy(&attr.value).to_string();
        xmp.add_pair(make_key(prefix, name), Value::XmpText(value));
    }
}
