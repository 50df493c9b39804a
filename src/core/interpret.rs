//! RDF interpreter
//!
//! XMP admits several equivalent RDF/XML encodings for the same value:
//! attribute shorthand, structure elements, `rdf:parseType="Resource"`
//! compaction, nested `rdf:Description` with qualifiers, and the three
//! array containers. This module unifies them: every child of every
//! `rdf:Description` is classified by a fixed priority of rules and
//! reduced to a [`Tag`].

use crate::core::describe;
use crate::core::error::{XmpError, XmpResult};
use crate::core::tag::{ArrayItem, Tag, TagMap, TagValue};
use crate::core::tree::{is_rdf, INode, IValue, Slot};
use indexmap::IndexMap;

/// Nesting cap; a property deeper than this is skipped, siblings
/// continue.
const MAX_DEPTH: usize = 128;

/// Which classification rule produced a tag.
///
/// Array items need this: a structure produced by the nested-resource
/// rules is unwrapped to its member map inside arrays, while compact
/// (attribute shorthand) structures stay full tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    EmptyResource,
    Qualified,
    Structure,
    Compact,
    Array,
    Simple,
}

/// Interpret the `rdf:RDF` tree into a tag map.
///
/// Every `rdf:Description` under the root is walked and merged into one
/// map; multiple sibling descriptions are equivalent to one. Duplicate
/// tag names keep the last occurrence.
pub fn interpret(tree: &INode) -> TagMap {
    let mut tags = TagMap::new();
    let Some(children) = tree.children() else {
        return tags;
    };

    for (name, slot) in children {
        if !is_rdf(name, "Description") {
            continue;
        }
        let descriptions: &[INode] = match slot {
            Slot::One(node) => std::slice::from_ref(node),
            Slot::Many(nodes) => nodes,
        };
        for description in descriptions {
            interpret_description(description, &mut tags);
        }
    }
    tags
}

fn interpret_description(description: &INode, tags: &mut TagMap) {
    // Attribute shorthand directly on the description.
    for (qname, value) in &description.attributes {
        if is_syntax_attribute(qname) {
            continue;
        }
        tags.insert(
            describe::tag_local_name(qname).to_string(),
            scalar_tag(qname, value),
        );
    }

    let Some(children) = description.children() else {
        return;
    };
    for (qname, slot) in children {
        // Rule 1: a repeated element name reduces to its last occurrence.
        let Some(node) = slot.last() else {
            continue;
        };
        match classify(qname, node, 0) {
            Ok((tag, _)) => {
                tags.insert(describe::tag_local_name(qname).to_string(), tag);
            }
            Err(err) => {
                log::warn!("skipping XMP property {}: {}", qname, err);
            }
        }
    }
}

/// Classify one property element by the rule priority and build its tag.
fn classify(qname: &str, node: &INode, depth: usize) -> XmpResult<(Tag, Rule)> {
    if depth > MAX_DEPTH {
        return Err(XmpError::InterpretError(
            "property nesting too deep".to_string(),
        ));
    }

    let resource = node.attribute("rdf:parseType") == Some("Resource");
    let nested = nested_description(node);

    // Rule 2: an empty parseType=Resource element.
    if resource && deep_text(node).trim().is_empty() {
        return Ok((empty_tag(), Rule::EmptyResource));
    }

    // Rule 3: a simple value with qualifiers, in either encoding.
    let qualifier_holder = if resource {
        has_value_child(node).then_some(node)
    } else {
        nested.filter(|desc| has_value_child(desc))
    };
    if let Some(holder) = qualifier_holder {
        return Ok((qualified_tag(qname, node, holder), Rule::Qualified));
    }

    // Rule 4: a structure with qualifiers.
    if resource {
        let tag = structure_tag(node, node, false, depth)?;
        return Ok((tag, Rule::Structure));
    }
    if let Some(desc) = nested {
        let tag = structure_tag(node, desc, true, depth)?;
        return Ok((tag, Rule::Structure));
    }

    // Rule 5: compact structure (attribute shorthand).
    if is_childless(node)
        && node.attribute("xml:lang").is_none()
        && node.attribute("rdf:resource").is_none()
    {
        return Ok((compact_tag(node), Rule::Compact));
    }

    // Rule 6: an array container.
    if let Some(container) = array_container(node) {
        let tag = array_tag(qname, node, container, depth)?;
        return Ok((tag, Rule::Array));
    }

    // Rule 7: a simple value.
    Ok((simple_tag(qname, node), Rule::Simple))
}

/// Rule 3: value from `rdf:value`, qualifiers into `attributes`.
fn qualified_tag(qname: &str, outer: &INode, holder: &INode) -> Tag {
    let value_node = holder.child("rdf:value").and_then(Slot::last);
    let value = value_node
        .map(|node| {
            node.attribute("rdf:resource")
                .map(str::to_string)
                .unwrap_or_else(|| node.text().to_string())
        })
        .unwrap_or_default();

    let mut attributes = normalized_attributes(outer);
    if !std::ptr::eq(outer, holder) {
        attributes.extend(normalized_attributes(holder));
    }
    if let Some(children) = holder.children() {
        for (child_name, slot) in children {
            if is_rdf(child_name, "value") {
                continue;
            }
            if let Some(child) = slot.last() {
                attributes.insert(
                    describe::local_name(child_name).to_string(),
                    child.text().to_string(),
                );
            }
        }
    }

    let description = describe::describe_scalar(qname, &value);
    Tag {
        value: TagValue::Text(value),
        attributes,
        description,
    }
}

/// Rule 4: structure members from the holder's children (and, for the
/// nested-description form, from its shorthand attributes).
fn structure_tag(
    outer: &INode,
    holder: &INode,
    include_holder_attributes: bool,
    depth: usize,
) -> XmpResult<Tag> {
    let mut members: IndexMap<String, Tag> = IndexMap::new();

    if include_holder_attributes {
        for (attr_name, value) in &holder.attributes {
            if is_syntax_attribute(attr_name) {
                continue;
            }
            members.insert(
                describe::tag_local_name(attr_name).to_string(),
                scalar_tag(attr_name, value),
            );
        }
    }

    if let Some(children) = holder.children() {
        for (child_name, slot) in children {
            let Some(child) = slot.last() else { continue };
            let (tag, _) = classify(child_name, child, depth + 1)?;
            members.insert(describe::tag_local_name(child_name).to_string(), tag);
        }
    }

    let description = describe::describe_struct(&members);
    Ok(Tag {
        value: TagValue::Struct(members),
        attributes: normalized_attributes(outer),
        description,
    })
}

/// Rule 5: every non-syntactic attribute becomes a member tag.
fn compact_tag(node: &INode) -> Tag {
    let mut members: IndexMap<String, Tag> = IndexMap::new();
    for (attr_name, value) in &node.attributes {
        if is_syntax_attribute(attr_name) {
            continue;
        }
        members.insert(
            describe::tag_local_name(attr_name).to_string(),
            scalar_tag(attr_name, value),
        );
    }

    let description = describe::describe_struct(&members);
    Tag {
        value: TagValue::Struct(members),
        attributes: IndexMap::new(),
        description,
    }
}

/// Rule 6: ordered `rdf:li` items, each classified by the same rules.
fn array_tag(qname: &str, outer: &INode, container: &INode, depth: usize) -> XmpResult<Tag> {
    let items: &[INode] = match container.child("rdf:li") {
        None => &[],
        Some(Slot::One(node)) => std::slice::from_ref(node),
        Some(Slot::Many(nodes)) => nodes,
    };

    let mut interpreted = Vec::with_capacity(items.len());
    for item in items {
        let (tag, rule) = classify("rdf:li", item, depth + 1)?;
        // Structure items are unwrapped: array entries hold the member
        // map itself, not a tag around it.
        let entry = match (rule, tag) {
            (
                Rule::Structure,
                Tag {
                    value: TagValue::Struct(members),
                    ..
                },
            ) => ArrayItem::Struct(members),
            (_, tag) => ArrayItem::Tag(tag),
        };
        interpreted.push(entry);
    }

    let description = describe::describe_array(qname, &interpreted);
    Ok(Tag {
        value: TagValue::Array(interpreted),
        attributes: normalized_attributes(outer),
        description,
    })
}

/// Rule 7: `rdf:resource` URI if present, else the text content.
fn simple_tag(qname: &str, node: &INode) -> Tag {
    let value = node
        .attribute("rdf:resource")
        .map(str::to_string)
        .unwrap_or_else(|| node.text().to_string());
    let description = describe::describe_scalar(qname, &value);
    Tag {
        value: TagValue::Text(value),
        attributes: normalized_attributes(node),
        description,
    }
}

fn scalar_tag(qname: &str, value: &str) -> Tag {
    Tag {
        value: TagValue::Text(value.to_string()),
        attributes: IndexMap::new(),
        description: describe::describe_scalar(qname, value),
    }
}

fn empty_tag() -> Tag {
    Tag {
        value: TagValue::Text(String::new()),
        attributes: IndexMap::new(),
        description: String::new(),
    }
}

/// RDF/XML syntax attributes never surface in the output.
fn is_syntax_attribute(qname: &str) -> bool {
    qname == "xmlns"
        || qname.starts_with("xmlns:")
        || qname == "about"
        || qname == "rdf:about"
        || qname == "rdf:parseType"
        || qname == "rdf:resource"
        || qname == "rdf:ID"
        || qname == "rdf:nodeID"
}

/// Non-syntactic attributes with prefixes dropped; `xml:lang` becomes
/// `lang`.
fn normalized_attributes(node: &INode) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    for (qname, value) in &node.attributes {
        if is_syntax_attribute(qname) {
            continue;
        }
        attributes.insert(describe::local_name(qname).to_string(), value.clone());
    }
    attributes
}

/// The nested `rdf:Description` child, if the element has one.
fn nested_description(node: &INode) -> Option<&INode> {
    node.child("rdf:Description").and_then(Slot::last)
}

fn has_value_child(node: &INode) -> bool {
    node.child("rdf:value").is_some()
}

fn is_childless(node: &INode) -> bool {
    matches!(&node.value, IValue::Map(map) if map.is_empty())
}

/// The array container child (`rdf:Bag`/`rdf:Seq`/`rdf:Alt`), if any.
fn array_container(node: &INode) -> Option<&INode> {
    let children = node.children()?;
    children.iter().find_map(|(name, slot)| {
        if is_rdf(name, "Bag") || is_rdf(name, "Seq") || is_rdf(name, "Alt") {
            slot.last()
        } else {
            None
        }
    })
}

/// Concatenated text of the whole subtree, mirroring DOM `textContent`.
fn deep_text(node: &INode) -> String {
    fn walk(node: &INode, out: &mut String) {
        match &node.value {
            IValue::Text(text) => out.push_str(text),
            IValue::Map(children) => {
                for slot in children.values() {
                    match slot {
                        Slot::One(child) => walk(child, out),
                        Slot::Many(nodes) => {
                            for child in nodes {
                                walk(child, out);
                            }
                        }
                    }
                }
            }
        }
    }
    let mut out = String::new();
    walk(node, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::rdf_tree;
    use crate::dom::{DomParser, QuickXmlDomParser};

    fn read(body: &str) -> TagMap {
        let xml = format!(
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
                        xmlns:tiff="http://ns.adobe.com/tiff/1.0/"
                        xmlns:dc="http://purl.org/dc/elements/1.1/">{}</rdf:RDF>"#,
            body
        );
        let doc = QuickXmlDomParser::new().parse(&xml).unwrap();
        interpret(&rdf_tree(&doc).unwrap())
    }

    #[test]
    fn test_description_attribute_shorthand() {
        let tags = read(r#"<rdf:Description rdf:about="" xmp:Foo="4711"/>"#);
        let foo = &tags["Foo"];
        assert_eq!(foo.text(), Some("4711"));
        assert!(foo.attributes.is_empty());
        assert_eq!(foo.description, "4711");
        assert!(!tags.contains_key("about"));
    }

    #[test]
    fn test_simple_element_value() {
        let tags = read("<rdf:Description><xmp:Foo>bar</xmp:Foo></rdf:Description>");
        assert_eq!(tags["Foo"].text(), Some("bar"));
    }

    #[test]
    fn test_simple_value_with_lang_qualifier() {
        let tags =
            read(r#"<rdf:Description><xmp:Foo xml:lang="en">bar</xmp:Foo></rdf:Description>"#);
        let foo = &tags["Foo"];
        assert_eq!(foo.text(), Some("bar"));
        assert_eq!(foo.attributes.get("lang").unwrap(), "en");
    }

    #[test]
    fn test_resource_uri_promoted_to_value() {
        let tags = read(
            r#"<rdf:Description><xmp:Link rdf:resource="http://example.com/"/></rdf:Description>"#,
        );
        let link = &tags["Link"];
        assert_eq!(link.text(), Some("http://example.com/"));
        assert!(link.attributes.is_empty());
    }

    #[test]
    fn test_empty_parse_type_resource() {
        let tags = read(
            r#"<rdf:Description><xmp:Empty rdf:parseType="Resource"> </xmp:Empty></rdf:Description>"#,
        );
        let empty = &tags["Empty"];
        assert_eq!(empty.text(), Some(""));
        assert!(empty.attributes.is_empty());
        assert_eq!(empty.description, "");
    }

    #[test]
    fn test_qualified_value_parse_type_resource() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:Foo rdf:parseType="Resource">
                   <rdf:value>47</rdf:value>
                   <xmp:Qualifier>yes</xmp:Qualifier>
                 </xmp:Foo>
               </rdf:Description>"#,
        );
        let foo = &tags["Foo"];
        assert_eq!(foo.text(), Some("47"));
        assert_eq!(foo.attributes.get("Qualifier").unwrap(), "yes");
    }

    #[test]
    fn test_qualified_value_nested_description() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:Foo>
                   <rdf:Description xmp:Extra="e">
                     <rdf:value>47</rdf:value>
                     <xmp:Qualifier>yes</xmp:Qualifier>
                   </rdf:Description>
                 </xmp:Foo>
               </rdf:Description>"#,
        );
        let foo = &tags["Foo"];
        assert_eq!(foo.text(), Some("47"));
        assert_eq!(foo.attributes.get("Extra").unwrap(), "e");
        assert_eq!(foo.attributes.get("Qualifier").unwrap(), "yes");
    }

    #[test]
    fn test_qualified_value_uri() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:Foo rdf:parseType="Resource">
                   <rdf:value rdf:resource="http://example.com/"/>
                 </xmp:Foo>
               </rdf:Description>"#,
        );
        assert_eq!(tags["Foo"].text(), Some("http://example.com/"));
    }

    #[test]
    fn test_structure_parse_type_resource() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:S rdf:parseType="Resource">
                   <xmp:A>47</xmp:A>
                   <xmp:B>11</xmp:B>
                 </xmp:S>
               </rdf:Description>"#,
        );
        let s = &tags["S"];
        let members = s.as_struct().unwrap();
        assert_eq!(members["A"].text(), Some("47"));
        assert_eq!(members["B"].text(), Some("11"));
        assert_eq!(s.description, "A: 47; B: 11");
    }

    #[test]
    fn test_structure_nested_description_attributes_become_members() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:S xml:lang="en">
                   <rdf:Description xmp:A="47">
                     <xmp:B>11</xmp:B>
                   </rdf:Description>
                 </xmp:S>
               </rdf:Description>"#,
        );
        let s = &tags["S"];
        let members = s.as_struct().unwrap();
        assert_eq!(members["A"].text(), Some("47"));
        assert_eq!(members["B"].text(), Some("11"));
        // Outer qualifiers stay on the tag, not in the structure.
        assert_eq!(s.attributes.get("lang").unwrap(), "en");
    }

    #[test]
    fn test_compact_structure() {
        let tags = read(r#"<rdf:Description><xmp:S xmp:A="47" xmp:B="11"/></rdf:Description>"#);
        let s = &tags["S"];
        let members = s.as_struct().unwrap();
        assert_eq!(members["A"].text(), Some("47"));
        assert_eq!(members["B"].text(), Some("11"));
        assert!(s.attributes.is_empty());
        assert_eq!(s.description, "A: 47; B: 11");
    }

    #[test]
    fn test_array_with_qualifiers() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:Arr xml:lang="en"><rdf:Bag>
                   <rdf:li>47</rdf:li>
                   <rdf:li xml:lang="sv">11</rdf:li>
                 </rdf:Bag></xmp:Arr>
               </rdf:Description>"#,
        );
        let arr = &tags["Arr"];
        assert_eq!(arr.attributes.get("lang").unwrap(), "en");
        assert_eq!(arr.description, "47, 11");
        let items = arr.as_array().unwrap();
        assert_eq!(items.len(), 2);
        match &items[0] {
            ArrayItem::Tag(tag) => {
                assert_eq!(tag.text(), Some("47"));
                assert!(tag.attributes.is_empty());
            }
            _ => panic!("expected scalar item"),
        }
        match &items[1] {
            ArrayItem::Tag(tag) => {
                assert_eq!(tag.text(), Some("11"));
                assert_eq!(tag.attributes.get("lang").unwrap(), "sv");
            }
            _ => panic!("expected scalar item"),
        }
    }

    #[test]
    fn test_array_kinds_equivalent() {
        for kind in ["Bag", "Seq", "Alt"] {
            let tags = read(&format!(
                "<rdf:Description><xmp:Arr><rdf:{kind}><rdf:li>1</rdf:li></rdf:{kind}></xmp:Arr></rdf:Description>"
            ));
            assert_eq!(tags["Arr"].as_array().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_empty_array() {
        let tags =
            read("<rdf:Description><xmp:Arr><rdf:Bag></rdf:Bag></xmp:Arr></rdf:Description>");
        assert_eq!(tags["Arr"].as_array().unwrap().len(), 0);
        assert_eq!(tags["Arr"].description, "");
    }

    #[test]
    fn test_array_structure_items_unwrapped() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:Arr><rdf:Seq>
                   <rdf:li rdf:parseType="Resource">
                     <xmp:A>1</xmp:A>
                   </rdf:li>
                 </rdf:Seq></xmp:Arr>
               </rdf:Description>"#,
        );
        let items = tags["Arr"].as_array().unwrap();
        match &items[0] {
            ArrayItem::Struct(members) => assert_eq!(members["A"].text(), Some("1")),
            _ => panic!("expected unwrapped structure item"),
        }
        assert_eq!(tags["Arr"].description, "A: 1");
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let tags = read(
            "<rdf:Description><xmp:Foo>first</xmp:Foo><xmp:Foo>second</xmp:Foo></rdf:Description>",
        );
        assert_eq!(tags["Foo"].text(), Some("second"));
    }

    #[test]
    fn test_multiple_descriptions_merge() {
        let tags = read(
            r#"<rdf:Description><xmp:A>1</xmp:A></rdf:Description>
               <rdf:Description><xmp:B>2</xmp:B></rdf:Description>"#,
        );
        assert_eq!(tags["A"].text(), Some("1"));
        assert_eq!(tags["B"].text(), Some("2"));
    }

    #[test]
    fn test_no_syntax_attributes_leak() {
        let tags = read(
            r#"<rdf:Description>
                 <xmp:S rdf:parseType="Resource"><xmp:A>1</xmp:A></xmp:S>
               </rdf:Description>"#,
        );
        for (_, tag) in &tags {
            assert!(!tag.attributes.keys().any(|k| {
                k.starts_with("xmlns") || k == "parseType" || k == "resource"
            }));
        }
    }

    #[test]
    fn test_orientation_description() {
        let tags =
            read("<rdf:Description><tiff:Orientation>3</tiff:Orientation></rdf:Description>");
        let orientation = &tags["Orientation"];
        assert_eq!(orientation.text(), Some("3"));
        assert_eq!(orientation.description, "Rotate 180");
    }
}
