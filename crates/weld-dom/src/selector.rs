//! Compound selector parsing and matching.
//!
//! Supports the selector subset target descriptors use: compound simple
//! selectors (`tag`, `#id`, `.class`, combined as `tag#id.class`) joined
//! by the descendant combinator (`main#article .cards`).

use crate::NodeId;
use crate::document::Document;
use crate::DomError;

/// One compound simple selector: optional tag plus id/class constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(input: &str) -> Result<Self, DomError> {
        let mut compound = Self {
            tag: None,
            id: None,
            classes: Vec::new(),
        };
        let mut rest = input;

        let tag_len = rest
            .find(['#', '.'])
            .unwrap_or(rest.len());
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            rest = &rest[1..];
            let name_len = rest.find(['#', '.']).unwrap_or(rest.len());
            let name = &rest[..name_len];
            if name.is_empty() {
                return Err(DomError::InvalidSelector(input.to_owned()));
            }
            match marker {
                b'#' => {
                    if compound.id.is_some() {
                        return Err(DomError::InvalidSelector(input.to_owned()));
                    }
                    compound.id = Some(name.to_owned());
                }
                b'.' => compound.classes.push(name.to_owned()),
                _ => return Err(DomError::InvalidSelector(input.to_owned())),
            }
            rest = &rest[name_len..];
        }

        if compound.tag.is_none() && compound.id.is_none() && compound.classes.is_empty() {
            return Err(DomError::InvalidSelector(input.to_owned()));
        }
        Ok(compound)
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(tag) = doc.tag(id) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if tag != expected {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if doc.attr(id, "id") != Some(expected.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| doc.has_class(id, class))
    }
}

/// A parsed selector: whitespace-separated compounds matched along the
/// ancestor chain (descendant combinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    source: String,
}

impl Selector {
    /// Parse a selector expression.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidSelector`] on empty input or malformed
    /// compounds (e.g. a trailing `.` or a second `#id`).
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let compounds = input
            .split_ascii_whitespace()
            .map(Compound::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if compounds.is_empty() {
            return Err(DomError::InvalidSelector(input.to_owned()));
        }
        Ok(Self {
            compounds,
            source: input.to_owned(),
        })
    }

    /// The selector source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the element matches: the last compound matches the node and
    /// every earlier compound matches some strict ancestor, in order.
    #[must_use]
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let (last, ancestors_pattern) = self
            .compounds
            .split_last()
            .expect("parse guarantees at least one compound");
        if !last.matches(doc, id) {
            return false;
        }

        let mut remaining = ancestors_pattern.len();
        let mut current = doc.parent(id);
        while remaining > 0 {
            let Some(ancestor) = current else {
                return false;
            };
            if ancestors_pattern[remaining - 1].matches(doc, ancestor) {
                remaining -= 1;
            }
            current = doc.parent(ancestor);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc() -> Document {
        Document::parse(concat!(
            "<main id=\"main-article\" class=\"wide\">",
            "<section class=\"cards featured\"><div class=\"card\">one</div></section>",
            "<div class=\"card\">two</div>",
            "</main>",
            "<footer><div class=\"card\">three</div></footer>",
        ))
        .unwrap()
    }

    fn texts(doc: &Document, selector: &str) -> Vec<String> {
        doc.query_all(&Selector::parse(selector).unwrap())
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect()
    }

    #[test]
    fn test_tag_selector() {
        let doc = doc();
        assert_eq!(texts(&doc, "footer"), ["three"]);
    }

    #[test]
    fn test_id_selector() {
        let doc = doc();
        let matched = doc
            .query_all(&Selector::parse("#main-article").unwrap());
        assert_eq!(matched.len(), 1);
        assert_eq!(doc.tag(matched[0]), Some("main"));
    }

    #[test]
    fn test_class_selector_matches_in_document_order() {
        let doc = doc();
        assert_eq!(texts(&doc, ".card"), ["one", "two", "three"]);
    }

    #[test]
    fn test_compound_tag_id() {
        let doc = doc();
        assert_eq!(doc.query_all(&Selector::parse("main#main-article").unwrap()).len(), 1);
        assert!(doc.query_all(&Selector::parse("div#main-article").unwrap()).is_empty());
    }

    #[test]
    fn test_multiple_classes_all_required() {
        let doc = doc();
        assert_eq!(doc.query_all(&Selector::parse(".cards.featured").unwrap()).len(), 1);
        assert!(doc.query_all(&Selector::parse(".cards.missing").unwrap()).is_empty());
    }

    #[test]
    fn test_descendant_combinator() {
        let doc = doc();
        assert_eq!(texts(&doc, "main .card"), ["one", "two"]);
        assert_eq!(texts(&doc, "main section .card"), ["one"]);
        assert_eq!(texts(&doc, "footer .card"), ["three"]);
    }

    #[test]
    fn test_descendant_skips_intermediate_levels() {
        let doc = doc();
        // section is not a direct child constraint; any depth matches.
        assert_eq!(texts(&doc, "#main-article .card"), ["one", "two"]);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("   ").is_err());
        assert!(Selector::parse("div.").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("div#a#b").is_err());
    }

    #[test]
    fn test_source_preserved() {
        let selector = Selector::parse("main .card").unwrap();
        assert_eq!(selector.source(), "main .card");
    }
}
