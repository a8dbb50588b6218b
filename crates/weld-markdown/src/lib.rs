//! Heuristic Markdown⇄HTML conversion for inline page editing.
//!
//! Both directions are *best-effort* rewrites, not spec-compliant parsing:
//! the converter exists so an editor can derive editable Markdown from
//! markup this system itself produced, and turn edited Markdown back into
//! markup. It is explicitly neither idempotent nor lossless for arbitrary
//! HTML — callers keep the authoritative Markdown in a side channel and
//! treat the HTML as a derived view.
//!
//! The HTML→Markdown direction runs an ordered pipeline of named rewrite
//! stages (see [`html_stages`]); the Markdown→HTML direction classifies
//! lines and applies inline substitutions. Every stage is independently
//! testable, which keeps the rewrite ordering auditable.
//!
//! # Example
//!
//! ```
//! use weld_markdown::{html_to_markdown, markdown_to_html};
//!
//! let html = markdown_to_html("# Title\n\nHello **world**");
//! assert_eq!(html, "<h1>Title</h1><p>Hello <strong>world</strong></p>");
//! assert_eq!(html_to_markdown(&html), "# Title\n\nHello **world**");
//! ```

mod inline;
mod stage;
mod to_html;
mod to_markdown;

pub use stage::Stage;
pub use to_html::markdown_to_html;
pub use to_markdown::{html_stages, html_to_markdown};
