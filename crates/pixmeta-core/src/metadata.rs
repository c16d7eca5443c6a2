//! Keys, datums, and the per-namespace metadata containers.
//!
//! A key is the three-part path `Family.Group.Tag`, e.g.
//! `Exif.Image.Orientation` or `Iptc.Application2.Keywords`. Keys are
//! not unique within a container: repeatable IPTC datasets and
//! repeated Exif entries are each their own datum.

use crate::{Error, Result, Value};

/// Metadata family (namespace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    Exif,
    Iptc,
    Xmp,
}

impl Family {
    pub const fn name(self) -> &'static str {
        match self {
            Family::Exif => "Exif",
            Family::Iptc => "Iptc",
            Family::Xmp => "Xmp",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        match s {
            "Exif" => Some(Family::Exif),
            "Iptc" => Some(Family::Iptc),
            "Xmp" => Some(Family::Xmp),
            _ => None,
        }
    }
}

/// A three-part metadata key: `Family.Group.Tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Key {
    family: Family,
    group: String,
    tag: String,
}

impl Key {
    /// Build a key from its parts.
    pub fn new(family: Family, group: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            family,
            group: group.into(),
            tag: tag.into(),
        }
    }

    /// Parse `"Family.Group.Tag"`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '.');
        let family = parts
            .next()
            .and_then(Family::from_name)
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;
        let group = parts.next().filter(|g| !g.is_empty());
        let tag = parts.next().filter(|t| !t.is_empty());
        match (group, tag) {
            (Some(group), Some(tag)) => Ok(Self::new(family, group, tag)),
            _ => Err(Error::InvalidKey(s.to_string())),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.family.name(), self.group, self.tag)
    }
}

/// One (key, value) pair.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Datum {
    pub key: Key,
    pub value: Value,
}

impl Datum {
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }

    /// Tag name part of the key.
    pub fn tag_name(&self) -> &str {
        self.key.tag()
    }

    pub fn group_name(&self) -> &str {
        self.key.group()
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// An ordered collection of datums for one namespace.
///
/// Insertion order is preserved; duplicate keys are legal.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct MetadataContainer {
    datums: Vec<Datum>,
}

impl MetadataContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a datum.
    pub fn add(&mut self, datum: Datum) {
        self.datums.push(datum);
    }

    /// Append a (key, value) pair.
    pub fn add_pair(&mut self, key: Key, value: Value) {
        self.datums.push(Datum::new(key, value));
    }

    /// Replace the first datum with this key, or append.
    pub fn set(&mut self, key: Key, value: Value) {
        match self.datums.iter_mut().find(|d| d.key == key) {
            Some(d) => d.value = value,
            None => self.add_pair(key, value),
        }
    }

    /// Remove all datums with the given key; returns how many.
    pub fn erase(&mut self, key: &Key) -> usize {
        let before = self.datums.len();
        self.datums.retain(|d| &d.key != key);
        before - self.datums.len()
    }

    /// First datum with this key.
    pub fn find_key(&self, key: &Key) -> Option<&Datum> {
        self.datums.iter().find(|d| &d.key == key)
    }

    pub fn find_key_mut(&mut self, key: &Key) -> Option<&mut Datum> {
        self.datums.iter_mut().find(|d| &d.key == key)
    }

    /// First datum matching tag and group names.
    pub fn find_tag_group(&self, tag: &str, group: &str) -> Option<&Datum> {
        self.datums
            .iter()
            .find(|d| d.key.tag() == tag && d.key.group() == group)
    }

    /// All datums with this key, in insertion order.
    pub fn find_all<'a>(&'a self, key: &'a Key) -> impl Iterator<Item = &'a Datum> + 'a {
        self.datums.iter().filter(move |d| &d.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.datums.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Datum> {
        self.datums.iter_mut()
    }

    /// Stable sort by full key text.
    pub fn sort_by_key(&mut self) {
        self.datums
            .sort_by(|a, b| a.key.to_string().cmp(&b.key.to_string()));
    }

    /// Stable sort by tag name only.
    pub fn sort_by_tag(&mut self) {
        self.datums
            .sort_by(|a, b| a.key.tag().cmp(b.key.tag()));
    }

    pub fn clear(&mut self) {
        self.datums.clear();
    }

    pub fn len(&self) -> usize {
        self.datums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datums.is_empty()
    }
}

impl<'a> IntoIterator for &'a MetadataContainer {
    type Item = &'a Datum;
    type IntoIter = std::slice::Iter<'a, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.datums.iter()
    }
}

impl IntoIterator for MetadataContainer {
    type Item = Datum;
    type IntoIter = std::vec::IntoIter<Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.datums.into_iter()
    }
}

impl FromIterator<Datum> for MetadataContainer {
    fn from_iter<T: IntoIterator<Item = Datum>>(iter: T) -> Self {
        Self {
            datums: iter.into_iter().collect(),
        }
    }
}

/// Exif namespace container.
pub type ExifData = MetadataContainer;
/// IPTC namespace container.
pub type IptcData = MetadataContainer;
/// XMP namespace container.
pub type XmpData = MetadataContainer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keys() {
        let k = Key::parse("Exif.Image.Orientation").unwrap();
        assert_eq!(k.family(), Family::Exif);
        assert_eq!(k.group(), "Image");
        assert_eq!(k.tag(), "Orientation");
        assert_eq!(k.to_string(), "Exif.Image.Orientation");

        assert!(Key::parse("Exif.Image").is_err());
        assert!(Key::parse("Bogus.Image.Orientation").is_err());
        assert!(Key::parse("").is_err());
    }

    #[test]
    fn tag_part_may_contain_dots() {
        // splitn keeps the remainder in the tag part
        let k = Key::parse("Xmp.dc.title.extra").unwrap();
        assert_eq!(k.tag(), "title.extra");
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let mut c = MetadataContainer::new();
        let key = Key::parse("Iptc.Application2.Keywords").unwrap();
        c.add_pair(key.clone(), Value::Ascii("cat".into()));
        c.add_pair(key.clone(), Value::Ascii("dog".into()));
        assert_eq!(c.len(), 2);
        assert_eq!(c.find_all(&key).count(), 2);
        // find_key yields the first match
        assert_eq!(c.find_key(&key).unwrap().value, Value::Ascii("cat".into()));
    }

    #[test]
    fn erase_removes_all_matches() {
        let mut c = MetadataContainer::new();
        let key = Key::parse("Iptc.Application2.Keywords").unwrap();
        let other = Key::parse("Iptc.Application2.City").unwrap();
        c.add_pair(key.clone(), Value::Ascii("cat".into()));
        c.add_pair(other, Value::Ascii("Oslo".into()));
        c.add_pair(key.clone(), Value::Ascii("dog".into()));
        assert_eq!(c.erase(&key), 2);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn sort_orders() {
        let mut c = MetadataContainer::new();
        c.add_pair(
            Key::parse("Exif.Photo.ISOSpeedRatings").unwrap(),
            Value::Short(vec![200]),
        );
        c.add_pair(
            Key::parse("Exif.Image.Make").unwrap(),
            Value::Ascii("Nikon".into()),
        );
        c.sort_by_key();
        assert_eq!(c.iter().next().unwrap().key.group(), "Image");
    }
}
