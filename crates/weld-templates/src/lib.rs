//! Custom-element rules and recursive template expansion.
//!
//! Component content is authored as markup with three kinds of authoring
//! constructs, all resolved here before insertion:
//!
//! - directive comments (`<!-- @target ... -->`, `<!-- @param ... -->`):
//!   authoring metadata, stripped
//! - `${name}` placeholders: substituted from supplied parameter values
//!   (unsupplied names become the empty string)
//! - custom-element patterns: per-rule regular expressions whose matches
//!   are replaced by a named template, recursively expanded with the
//!   matched inner content bound to `content`/`body`
//!
//! Expansion is bounded: a recursion-depth limit and a total rewrite
//! budget turn runaway rule/template combinations into
//! [`ExpandError::BoundExceeded`] instead of a hang. A template that fails
//! to load fails the expansion — there is no silent empty-content
//! fallback.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use weld_templates::{Expander, MemoryTemplates, Params, RuleRecord, RuleSet};
//!
//! let rules = RuleSet::from_records(BTreeMap::from([(
//!     "box".to_owned(),
//!     RuleRecord {
//!         pattern: "<!--box-->(.*?)<!--/box-->".to_owned(),
//!         template: "box".to_owned(),
//!     },
//! )]))
//! .unwrap();
//! let source = Arc::new(MemoryTemplates::new().with_template("box", "<div>${content}</div>"));
//!
//! let mut expander = Expander::new(rules, source);
//! let html = expander.expand("<!--box-->hi<!--/box-->", &Params::new()).unwrap();
//! assert_eq!(html, "<div>hi</div>");
//! ```

mod cache;
mod expand;
mod rules;
mod source;

pub use cache::TemplateCache;
pub use expand::{ExpandError, ExpandOptions, Expander, Params};
pub use rules::{CustomElementRule, RuleError, RuleRecord, RuleSet};
pub use source::{MemoryTemplates, TemplateError, TemplateSource};
