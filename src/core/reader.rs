//! Read orchestration
//!
//! Ties the pipeline together: chunk assembly, packet trimming, DOM
//! parsing with the namespace-repair retry, RDF interpretation, and the
//! merge across standard and extended XMP documents. Nothing here
//! returns an error to the caller; failed documents degrade to warnings
//! and whatever the other documents produced.

use crate::core::chunk::{assemble_chunks, trim_packet, ChunkDescriptor};
use crate::core::error::{XmpError, XmpResult};
use crate::core::interpret::interpret;
use crate::core::tag::{TagMap, XmpMeta};
use crate::core::tree::rdf_tree;
use crate::dom::{default_dom_parser, parse_repairing, DomParser};
use std::sync::Arc;

/// Where a reader takes its DOM parser from.
enum ParserChoice {
    /// The process-wide default slot, resolved at read time
    Default,
    /// An injected instance
    Explicit(Arc<dyn DomParser>),
    /// No parser; reads warn and return empty
    Disabled,
}

/// XMP reader with an optional DOM parser override.
///
/// The reader is pure and holds no cross-call state; it is safe to use
/// from multiple threads as long as each call owns its inputs.
pub struct XmpReader {
    parser: ParserChoice,
}

impl XmpReader {
    /// Reader using the process-wide default DOM parser.
    pub fn new() -> Self {
        Self {
            parser: ParserChoice::Default,
        }
    }

    /// Reader using the given DOM parser for every read.
    pub fn with_parser(parser: Arc<dyn DomParser>) -> Self {
        Self {
            parser: ParserChoice::Explicit(parser),
        }
    }

    /// Reader with no DOM parser at all.
    ///
    /// Every read warns once and returns an empty result with no raw
    /// source.
    pub fn without_parser() -> Self {
        Self {
            parser: ParserChoice::Disabled,
        }
    }

    fn resolve_parser(&self) -> Option<Arc<dyn DomParser>> {
        match &self.parser {
            ParserChoice::Default => default_dom_parser(),
            ParserChoice::Explicit(parser) => Some(parser.clone()),
            ParserChoice::Disabled => None,
        }
    }

    /// Read XMP from a string holding a single standard document.
    pub fn read_str(&self, xml: &str) -> XmpMeta {
        self.read_documents(vec![xml.to_string()])
    }

    /// Read XMP from byte ranges of a buffer.
    ///
    /// `chunks[0]` is the standard XMP document; `chunks[1..]` are
    /// extended-XMP parts concatenated into a second document.
    pub fn read_chunks(&self, buffer: &[u8], chunks: &[ChunkDescriptor]) -> XmpMeta {
        self.read_documents(assemble_chunks(buffer, chunks))
    }

    fn read_documents(&self, documents: Vec<String>) -> XmpMeta {
        let Some(parser) = self.resolve_parser() else {
            log::warn!("{}, returning empty XMP tag map", XmpError::NoParser);
            return XmpMeta::new();
        };

        let mut tags = TagMap::new();
        let mut raw = String::new();
        let mut parsed_any = false;

        for document in &documents {
            match read_document(parser.as_ref(), document) {
                Ok(document_tags) => {
                    parsed_any = true;
                    raw.push_str(document);
                    tags.extend(document_tags);
                }
                Err(err) => {
                    log::warn!("failed to read XMP document: {}", err);
                }
            }
        }

        // Extended-XMP fallback: some writers split one XML tree across
        // the standard and extended chunks, so neither part parses on
        // its own. Re-parse the byte-concatenation as one document.
        if !parsed_any && documents.len() == 2 {
            let joined = documents.concat();
            if let Ok(document_tags) = read_document(parser.as_ref(), &joined) {
                tags = document_tags;
                raw = joined;
                parsed_any = true;
            }
        }

        XmpMeta {
            tags,
            raw: parsed_any.then_some(raw),
        }
    }
}

impl Default for XmpReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim, parse (repairing once), and interpret a single document.
fn read_document(parser: &dyn DomParser, document: &str) -> XmpResult<TagMap> {
    let trimmed = trim_packet(document);
    let dom = parse_repairing(parser, trimmed)?;
    let tree = rdf_tree(&dom)?;
    Ok(interpret(&tree))
}

/// Read XMP from a UTF-8 string using the default DOM parser.
pub fn read_xmp(xml: &str) -> XmpMeta {
    XmpReader::new().read_str(xml)
}

/// Read XMP from chunk descriptors into a byte buffer using the default
/// DOM parser.
pub fn read_xmp_chunks(buffer: &[u8], chunks: &[ChunkDescriptor]) -> XmpMeta {
    XmpReader::new().read_chunks(buffer, chunks)
}
