//! Default DOM parser built on quick-xml
//!
//! Materializes the event stream into the vendor-neutral [`Document`]
//! model. Text is kept verbatim (no trimming) because whitespace in XMP
//! values is significant; entities are decoded with a fallback to the
//! raw text when a reference cannot be resolved.
//!
//! quick-xml does not verify namespace bindings, so this parser tracks
//! in-scope `xmlns:` declarations itself and fails on unbound prefixes.
//! That failure is what drives the one-shot namespace repair in
//! [`super::parse_repairing`].

use crate::core::error::{XmpError, XmpResult};
use crate::dom::{Content, Document, DomParser, Element};
use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// DOM parser backed by `quick_xml::Reader`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickXmlDomParser;

impl QuickXmlDomParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl DomParser for QuickXmlDomParser {
    fn parse(&self, xml: &str) -> XmpResult<Document> {
        parse_document(xml)
    }
}

fn parse_document(xml: &str) -> XmpResult<Document> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut scopes: Vec<Vec<String>> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = open_element(&e, &scopes, root.is_some() && stack.is_empty())?;
                scopes.push(declared_prefixes(&element));
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = open_element(&e, &scopes, root.is_some() && stack.is_empty())?;
                attach(element, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                scopes.pop();
                let Some(element) = stack.pop() else {
                    return Err(XmpError::ParseError("unmatched end tag".to_string()));
                };
                attach(element, &mut stack, &mut root);
            }
            Ok(Event::Text(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    let text = match unescape(&raw) {
                        Ok(unescaped) => unescaped.into_owned(),
                        Err(_) => raw.into_owned(),
                    };
                    parent.children.push(Content::Text(text));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    parent.children.push(Content::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmpError::ParseError(format!("XML parsing error: {}", e))),
        }
    }

    if !stack.is_empty() {
        return Err(XmpError::ParseError(
            "unexpected end of document".to_string(),
        ));
    }
    root.map(|root| Document { root })
        .ok_or_else(|| XmpError::ParseError("document has no root element".to_string()))
}

/// Build an [`Element`] from a start tag, validating namespace bindings.
fn open_element(
    e: &BytesStart<'_>,
    scopes: &[Vec<String>],
    second_root: bool,
) -> XmpResult<Element> {
    if second_root {
        return Err(XmpError::ParseError(
            "multiple root elements".to_string(),
        ));
    }

    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attributes = collect_attributes(e);

    let declared = declared_prefixes_of(&attributes);
    let bound = |prefix: &str| {
        prefix == "xml"
            || declared.iter().any(|p| p == prefix)
            || scopes.iter().any(|scope| scope.iter().any(|p| p == prefix))
    };

    if let Some(prefix) = name_prefix(&name) {
        if !bound(prefix) {
            return Err(XmpError::UnboundPrefix(prefix.to_string()));
        }
    }
    for attr_name in attributes.keys() {
        if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
            continue;
        }
        if let Some(prefix) = name_prefix(attr_name) {
            if !bound(prefix) {
                return Err(XmpError::UnboundPrefix(prefix.to_string()));
            }
        }
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Collect attributes by qualified name, decoding entities in values.
fn collect_attributes(e: &BytesStart<'_>) -> IndexMap<String, String> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw_value = String::from_utf8_lossy(attr.value.as_ref());
            let value = match unescape(&raw_value) {
                Ok(unescaped) => unescaped.into_owned(),
                Err(_) => raw_value.into_owned(),
            };
            (key, value)
        })
        .collect()
}

fn name_prefix(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

fn declared_prefixes(element: &Element) -> Vec<String> {
    declared_prefixes_of(&element.attributes)
}

fn declared_prefixes_of(attributes: &IndexMap<String, String>) -> Vec<String> {
    attributes
        .keys()
        .filter_map(|key| key.strip_prefix("xmlns:"))
        .map(str::to_string)
        .collect()
}

/// Hand a finished element to its parent, or install it as the root.
fn attach(element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Content::Element(element));
    } else {
        *root = Some(element);
    }
}
