//! # xmpread
//!
//! A pure Rust reader for XMP (Extensible Metadata Platform) metadata
//! as embedded in JPEG, PNG, TIFF, HEIC, WebP and similar image files.
//!
//! Given the XMP byte ranges an image container has located (or a
//! ready-made XML string), the reader unifies every RDF/XML encoding
//! XMP permits into one value model and produces a tag dictionary with
//! human-readable descriptions:
//!
//! ```
//! use xmpread::read_xmp;
//!
//! let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!                       xmlns:tiff="http://ns.adobe.com/tiff/1.0/">
//!   <rdf:Description><tiff:Orientation>3</tiff:Orientation></rdf:Description>
//! </rdf:RDF>"#;
//!
//! let meta = read_xmp(xml);
//! let orientation = meta.get("Orientation").unwrap();
//! assert_eq!(orientation.text(), Some("3"));
//! assert_eq!(orientation.description, "Rotate 180");
//! ```
//!
//! The reader never fails on the public boundary: malformed documents
//! degrade to `log` warnings and an empty (or partial) result. Missing
//! `xmlns:` declarations, a frequent defect of real-world writers, are
//! repaired with a single re-parse. Extended XMP split across several
//! image segments is reassembled via [`ChunkDescriptor`]s, with a
//! byte-concatenation fallback for writers that split one XML tree
//! across the standard and extended packets.
//!
//! XML parsing is pluggable through the [`dom::DomParser`] capability
//! trait; a `quick-xml` backed implementation ships as the process-wide
//! default.

pub mod core;
pub mod dom;

pub use crate::core::{
    read_xmp, read_xmp_chunks, ArrayItem, ChunkDescriptor, Tag, TagMap, TagValue, XmpError,
    XmpMeta, XmpReader, XmpResult,
};
pub use crate::dom::{
    default_dom_parser, set_default_dom_parser, Content, Document, DomParser, Element,
    QuickXmlDomParser,
};
