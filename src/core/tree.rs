//! Intermediate RDF tree
//!
//! The DOM is mapped into a compact tree decoupled from any parser
//! vendor before interpretation. Keys keep their colon-qualified form;
//! an element with a single text child collapses into a plain string,
//! and repeated child names collapse into an ordered list.

use crate::core::error::{XmpError, XmpResult};
use crate::dom::{Document, Element};
use indexmap::IndexMap;

/// A node of the intermediate tree.
#[derive(Debug, Clone, PartialEq)]
pub struct INode {
    /// Attributes by qualified name, in document order.
    pub attributes: IndexMap<String, String>,
    /// Collapsed content of the element.
    pub value: IValue,
}

/// Content of an [`INode`]: a text leaf or a child map.
///
/// An empty element carries an empty map.
#[derive(Debug, Clone, PartialEq)]
pub enum IValue {
    /// Text-only element, whitespace preserved
    Text(String),
    /// Child elements by qualified name, in document order
    Map(IndexMap<String, Slot>),
}

/// One child-name slot: a single node, or the ordered occurrences of a
/// repeated name.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// The name appeared once
    One(INode),
    /// The name appeared multiple times, in document order
    Many(Vec<INode>),
}

impl INode {
    /// Text content of the node, empty for non-text values.
    pub fn text(&self) -> &str {
        match &self.value {
            IValue::Text(text) => text,
            IValue::Map(_) => "",
        }
    }

    /// Child map of the node, empty for text values.
    pub fn children(&self) -> Option<&IndexMap<String, Slot>> {
        match &self.value {
            IValue::Map(map) => Some(map),
            IValue::Text(_) => None,
        }
    }

    /// Look up a child slot by qualified name.
    pub fn child(&self, name: &str) -> Option<&Slot> {
        self.children().and_then(|map| map.get(name))
    }

    /// Attribute lookup by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl Slot {
    /// The single node, or the last occurrence of a repeated name.
    ///
    /// Duplicate element names at the same RDF level resolve to the
    /// last occurrence.
    pub fn last(&self) -> Option<&INode> {
        match self {
            Slot::One(node) => Some(node),
            Slot::Many(nodes) => nodes.last(),
        }
    }
}

/// Whether a qualified name is the given RDF syntax element
/// (`rdf:Description`, bare `Description`, and so on).
pub(crate) fn is_rdf(name: &str, local: &str) -> bool {
    name == local
        || (name.len() == local.len() + 4
            && name.starts_with("rdf:")
            && name.ends_with(local))
}

/// Map a parsed document to the intermediate tree.
///
/// Finds the `rdf:RDF` element (optionally wrapped in `x:xmpmeta`) and
/// builds the tree from it. A document without `rdf:RDF` is a parse
/// failure for that document.
pub fn rdf_tree(document: &Document) -> XmpResult<INode> {
    let rdf = find_rdf(&document.root).ok_or_else(|| {
        XmpError::StructuralMismatch("document has no rdf:RDF element".to_string())
    })?;
    Ok(build_node(rdf))
}

fn find_rdf(element: &Element) -> Option<&Element> {
    if is_rdf(&element.name, "RDF") {
        return Some(element);
    }
    element.child_elements().find_map(find_rdf)
}

/// Collapse one element into an [`INode`].
///
/// Text-only content becomes a string; element children become a map,
/// with repeated names gathered into `Slot::Many` in document order.
/// Text interleaved between element children is not representable in
/// XMP and is dropped.
fn build_node(element: &Element) -> INode {
    let attributes = element.attributes.clone();

    let mut children: IndexMap<String, Slot> = IndexMap::new();
    for child in element.child_elements() {
        let node = build_node(child);
        match children.entry(child.name.clone()) {
            indexmap::map::Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                match slot {
                    Slot::One(first) => {
                        let first = std::mem::replace(
                            first,
                            INode {
                                attributes: IndexMap::new(),
                                value: IValue::Map(IndexMap::new()),
                            },
                        );
                        *slot = Slot::Many(vec![first, node]);
                    }
                    Slot::Many(nodes) => nodes.push(node),
                }
            }
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(Slot::One(node));
            }
        }
    }

    let value = if !children.is_empty() {
        IValue::Map(children)
    } else if element.is_childless() {
        IValue::Map(IndexMap::new())
    } else {
        IValue::Text(element.text())
    };

    INode { attributes, value }
}
