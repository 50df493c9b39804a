//! Error types for XMP reading
//!
//! These errors are internal currency: the public `read` surface never
//! propagates them. Failed documents degrade to warnings and an empty
//! (or partial) tag map.

use thiserror::Error;

/// Error types for XMP reading operations
#[derive(Debug, Error)]
pub enum XmpError {
    /// XML parsing failed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A prefix was used without a matching xmlns declaration
    #[error("Unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    /// The document has no `rdf:RDF` element
    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    /// No DOM parser is wired in
    #[error("No DOM parser available")]
    NoParser,

    /// Interpreting a single property failed
    #[error("Interpretation error: {0}")]
    InterpretError(String),
}

impl XmpError {
    /// Whether this failure can be retried after declaring the missing
    /// namespace prefixes (at most once per document).
    pub fn is_unbound_prefix(&self) -> bool {
        matches!(self, XmpError::UnboundPrefix(_))
    }
}

/// Result type alias for XMP reading operations
pub type XmpResult<T> = Result<T, XmpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XmpError::ParseError("bad token".to_string());
        assert!(err.to_string().contains("Parse error: bad token"));
    }

    #[test]
    fn test_unbound_prefix_detection() {
        assert!(XmpError::UnboundPrefix("rdf".to_string()).is_unbound_prefix());
        assert!(!XmpError::NoParser.is_unbound_prefix());
    }
}
