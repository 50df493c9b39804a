//! XMP core
//!
//! The reading pipeline: chunk assembly, RDF tree building,
//! interpretation, and description formatting.

pub mod chunk;
pub mod describe;
pub mod error;
pub mod interpret;
pub mod reader;
pub mod tag;
pub mod tree;

pub use chunk::{assemble_chunks, trim_packet, ChunkDescriptor};
pub use error::{XmpError, XmpResult};
pub use reader::{read_xmp, read_xmp_chunks, XmpReader};
pub use tag::{ArrayItem, Tag, TagMap, TagValue, XmpMeta};
pub use tree::{INode, IValue, Slot};
