//! Pluggable DOM layer
//!
//! XMP is parsed in two stages: a DOM parser (any implementation of
//! [`DomParser`]) turns the XML text into a small vendor-neutral tree,
//! and the RDF layer interprets that tree. A `quick-xml` backed default
//! implementation ships in [`parser`]; callers may inject their own per
//! read or swap the process-wide default slot.

pub mod namespace;
pub mod parser;

use crate::core::error::{XmpError, XmpResult};
use indexmap::{IndexMap, IndexSet};
use std::sync::{Arc, OnceLock, RwLock};

pub use parser::QuickXmlDomParser;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document element.
    pub root: Element,
}

/// An XML element with its qualified name, attributes, and children.
///
/// Names keep their colon-qualified form (`prefix:local`); attribute
/// order and child order follow the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified element name.
    pub name: String,
    /// Attributes by qualified name, in document order.
    pub attributes: IndexMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Content>,
}

/// A child node: a nested element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A nested element
    Element(Element),
    /// Character data, whitespace preserved
    Text(String),
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Iterate over the element children, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|content| match content {
            Content::Element(el) => Some(el),
            Content::Text(_) => None,
        })
    }

    /// Concatenated text content of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for content in &self.children {
            if let Content::Text(text) = content {
                out.push_str(text);
            }
        }
        out
    }

    /// Whether the element has any child nodes at all.
    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }
}

/// Capability interface for XML parsing.
///
/// Implementations signal failure through `Err`; a vendor that reports
/// errors through an in-band `parsererror` element must translate that
/// into an `Err` as well. [`parse_repairing`] normalizes both paths.
pub trait DomParser: Send + Sync {
    /// Parse an XML string into a [`Document`].
    fn parse(&self, xml: &str) -> XmpResult<Document>;
}

static DEFAULT_PARSER: OnceLock<RwLock<Option<Arc<dyn DomParser>>>> = OnceLock::new();

fn default_slot() -> &'static RwLock<Option<Arc<dyn DomParser>>> {
    DEFAULT_PARSER.get_or_init(|| RwLock::new(Some(Arc::new(QuickXmlDomParser::new()))))
}

/// Get the process-wide default DOM parser, if one is set.
pub fn default_dom_parser() -> Option<Arc<dyn DomParser>> {
    default_slot().read().ok().and_then(|slot| slot.clone())
}

/// Replace the process-wide default DOM parser.
///
/// Passing `None` clears the slot; subsequent reads without an explicit
/// parser then warn and return an empty tag map. Swaps are not
/// interlocked with concurrent reads beyond the slot lock itself.
pub fn set_default_dom_parser(parser: Option<Arc<dyn DomParser>>) {
    if let Ok(mut slot) = default_slot().write() {
        *slot = parser;
    }
}

/// Parse a document, retrying once after namespace repair.
///
/// Real-world XMP frequently omits `xmlns:` declarations. When the
/// first parse fails on an unbound prefix, the source is re-parsed a
/// single time with default declarations inserted for every prefix it
/// uses. Any other failure is returned as-is.
pub fn parse_repairing(parser: &dyn DomParser, xml: &str) -> XmpResult<Document> {
    let document = match parser.parse(xml) {
        Ok(document) => document,
        Err(err) if err.is_unbound_prefix() => {
            log::debug!("retrying XMP parse after namespace repair: {err}");
            parser.parse(&declare_missing_namespaces(xml))?
        }
        Err(err) => return Err(err),
    };

    if document.root.name == "parsererror" {
        return Err(XmpError::ParseError(document.root.text()));
    }
    Ok(document)
}

/// Insert `xmlns:` declarations for every prefix used in the source
/// that the source does not declare itself.
///
/// Well-known prefixes bind to their real URIs; others get a
/// placeholder. The declarations are added to the root start tag, so a
/// single retry covers all unbound prefixes at once.
pub fn declare_missing_namespaces(xml: &str) -> String {
    let mut missing: Vec<&str> = Vec::new();
    for prefix in used_prefixes(xml) {
        if prefix == "xml" || prefix == "xmlns" {
            continue;
        }
        if xml.contains(&format!("xmlns:{}=", prefix)) {
            continue;
        }
        missing.push(prefix);
    }

    let Some(insert_at) = root_name_end(xml) else {
        return xml.to_string();
    };
    if missing.is_empty() {
        return xml.to_string();
    }

    let mut repaired = String::with_capacity(xml.len() + missing.len() * 48);
    repaired.push_str(&xml[..insert_at]);
    for prefix in missing {
        let uri = namespace::uri_for_prefix(prefix)
            .map(str::to_string)
            .unwrap_or_else(|| namespace::placeholder_uri(prefix));
        repaired.push_str(&format!(" xmlns:{}=\"{}\"", prefix, uri));
    }
    repaired.push_str(&xml[insert_at..]);
    repaired
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// Collect the namespace prefixes used by element and attribute names.
///
/// Walks tag interiors only, skipping attribute values, comments,
/// processing instructions, and character data, so URLs in content do
/// not register as prefixes.
fn used_prefixes(xml: &str) -> IndexSet<&str> {
    let bytes = xml.as_bytes();
    let mut prefixes = IndexSet::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        // Skip non-element markup.
        if matches!(bytes.get(i + 1), Some(b'?') | Some(b'!')) {
            i += 1;
            continue;
        }
        i += 1;
        if bytes.get(i) == Some(&b'/') {
            i += 1;
        }

        // Names inside the tag: the element name first, then attribute
        // names; quoted attribute values are skipped wholesale.
        while i < bytes.len() && bytes[i] != b'>' {
            match bytes[i] {
                b'"' | b'\'' => {
                    let quote = bytes[i];
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        i += 1;
                    }
                    i += 1;
                }
                b if is_name_byte(b) => {
                    let start = i;
                    let mut colon = None;
                    while i < bytes.len() && (is_name_byte(bytes[i]) || bytes[i] == b':') {
                        if bytes[i] == b':' && colon.is_none() {
                            colon = Some(i);
                        }
                        i += 1;
                    }
                    if let Some(colon) = colon {
                        if colon > start && colon + 1 < i {
                            prefixes.insert(&xml[start..colon]);
                        }
                    }
                }
                _ => i += 1,
            }
        }
    }
    prefixes
}

/// Byte offset just past the root element's name, where declarations
/// can be inserted.
fn root_name_end(xml: &str) -> Option<usize> {
    let bytes = xml.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            match bytes.get(i + 1) {
                Some(b'?') | Some(b'!') | Some(b'/') => {
                    i += 1;
                    continue;
                }
                Some(b) if is_name_byte(*b) => {
                    let mut end = i + 1;
                    while end < bytes.len() && (is_name_byte(bytes[end]) || bytes[end] == b':') {
                        end += 1;
                    }
                    return Some(end);
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}
