//! Lightweight HTML document tree for structural page editing.
//!
//! This crate provides the mutable document model the insertion engine
//! operates on:
//!
//! - [`Document`]: an arena-backed node tree parsed from permissive HTML
//! - [`Selector`]: compound simple selectors (`tag#id.class`) with the
//!   descendant combinator
//! - positional insertion with *move* semantics: fragments are drained
//!   into the tree, never copied
//!
//! The parser is deliberately permissive — it accepts the HTML the editor
//! itself produces (void elements, bare attributes, stray closing tags)
//! and round-trips text and entities verbatim rather than validating.
//!
//! # Example
//!
//! ```
//! use weld_dom::{Document, InsertAt, Selector};
//!
//! let mut doc = Document::parse("<main id=\"m\"><p>old</p></main>").unwrap();
//! let anchor = doc.query_first(&Selector::parse("main#m").unwrap()).unwrap();
//!
//! let mut fragment = doc.parse_fragment("<p>new</p>").unwrap();
//! doc.insert(anchor, InsertAt::Child, &mut fragment).unwrap();
//! assert!(fragment.is_empty());
//! assert_eq!(doc.to_html(), "<main id=\"m\"><p>old</p><p>new</p></main>");
//! ```

mod document;
mod node;
mod parse;
mod selector;
mod serialize;

pub use document::{Document, Fragment, InsertAt};
pub use node::{NodeId, NodeKind};
pub use selector::Selector;

/// Errors from parsing, querying and mutating documents.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// Markup could not be parsed into a node forest.
    #[error("unparsable markup: {0}")]
    Parse(String),
    /// A selector expression could not be parsed.
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),
    /// No live anchor for the requested insertion.
    #[error("anchor missing: {0}")]
    AnchorMissing(String),
}
