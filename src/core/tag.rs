//! Output tag model
//!
//! The reader produces a dictionary of [`Tag`]s keyed by local name.
//! Each tag carries its interpreted value, the qualifier attributes
//! that survived normalization, and a human-readable description.

use indexmap::IndexMap;
use std::fmt;

/// The output dictionary: local tag name to tag.
pub type TagMap = IndexMap<String, Tag>;

/// One interpreted XMP property.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The interpreted value.
    pub value: TagValue,
    /// Qualifier attributes by local name (`xml:lang` becomes `lang`).
    pub attributes: IndexMap<String, String>,
    /// Human-readable presentation of the value.
    pub description: String,
}

/// An interpreted value: scalar, structure, or array.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// A scalar value (element text or `rdf:resource` URI)
    Text(String),
    /// A structure of named member tags
    Struct(IndexMap<String, Tag>),
    /// An `rdf:Bag`/`rdf:Seq`/`rdf:Alt` container; the kind is not
    /// preserved
    Array(Vec<ArrayItem>),
}

/// An array element.
///
/// Structure items inside arrays are unwrapped to their member map;
/// everything else stays a full tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    /// A scalar or qualified item
    Tag(Tag),
    /// An unwrapped structure item
    Struct(IndexMap<String, Tag>),
}

impl Tag {
    /// The scalar value, if this tag holds one.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TagValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The structure members, if this tag holds a structure.
    pub fn as_struct(&self) -> Option<&IndexMap<String, Tag>> {
        match &self.value {
            TagValue::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// The array items, if this tag holds an array.
    pub fn as_array(&self) -> Option<&[ArrayItem]> {
        match &self.value {
            TagValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(text) => write!(f, "{}", text),
            TagValue::Struct(_) => write!(f, "[Structure]"),
            TagValue::Array(_) => write!(f, "[Array]"),
        }
    }
}

/// The result of a read: interpreted tags plus the raw XML.
///
/// `raw` holds the UTF-8 decoded input chunks joined in chunk order; it
/// is `None` when nothing parsed (or no parser was available), matching
/// the cases where the reader produces no `_raw` entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmpMeta {
    /// Interpreted tags by local name.
    pub tags: TagMap,
    /// The raw XML source in chunk order.
    pub raw: Option<String>,
}

impl XmpMeta {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a tag by local name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Whether a tag with the given local name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tags were read.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Tag)> {
        self.tags.iter()
    }

    /// The raw XML, if any document was read.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::ser::{Serialize, SerializeMap, Serializer};

    impl Serialize for Tag {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(3))?;
            map.serialize_entry("value", &self.value)?;
            map.serialize_entry("attributes", &self.attributes)?;
            map.serialize_entry("description", &self.description)?;
            map.end()
        }
    }

    impl Serialize for TagValue {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                TagValue::Text(text) => serializer.serialize_str(text),
                TagValue::Struct(members) => members.serialize(serializer),
                TagValue::Array(items) => items.serialize(serializer),
            }
        }
    }

    impl Serialize for ArrayItem {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                ArrayItem::Tag(tag) => tag.serialize(serializer),
                ArrayItem::Struct(members) => members.serialize(serializer),
            }
        }
    }

    impl Serialize for XmpMeta {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let extra = usize::from(self.raw.is_some());
            let mut map = serializer.serialize_map(Some(self.tags.len() + extra))?;
            for (name, tag) in &self.tags {
                map.serialize_entry(name, tag)?;
            }
            if let Some(raw) = &self.raw {
                map.serialize_entry("_raw", raw)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_tag(value: &str) -> Tag {
        Tag {
            value: TagValue::Text(value.to_string()),
            attributes: IndexMap::new(),
            description: value.to_string(),
        }
    }

    #[test]
    fn test_accessors() {
        let tag = text_tag("47");
        assert_eq!(tag.text(), Some("47"));
        assert!(tag.as_struct().is_none());
        assert!(tag.as_array().is_none());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(TagValue::Text("x".to_string()).to_string(), "x");
        assert_eq!(TagValue::Struct(IndexMap::new()).to_string(), "[Structure]");
        assert_eq!(TagValue::Array(Vec::new()).to_string(), "[Array]");
    }

    #[test]
    fn test_meta_lookup() {
        let mut meta = XmpMeta::new();
        assert!(meta.is_empty());
        meta.tags.insert("Foo".to_string(), text_tag("1"));
        assert!(meta.contains("Foo"));
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("Foo").unwrap().text(), Some("1"));
        assert!(meta.raw().is_none());
    }
}
