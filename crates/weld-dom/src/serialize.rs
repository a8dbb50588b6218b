//! Document serialization back to HTML text.
//!
//! Serialization mirrors the parser's permissiveness: text nodes and
//! attribute values are written back verbatim (except `"` in attribute
//! values, which is entity-escaped so the output stays well-formed), and
//! void elements are written without closing tags.

use std::fmt::Write;

use crate::NodeId;
use crate::document::Document;
use crate::node::{NodeData, is_void};
use crate::selector::Selector;

impl Document {
    /// Serialize the whole document.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_html_filtered(None)
    }

    /// Serialize the whole document, skipping any subtree whose root
    /// matches `exclude`.
    #[must_use]
    pub fn to_html_filtered(&self, exclude: Option<&Selector>) -> String {
        let mut out = String::with_capacity(256);
        for &root in self.roots() {
            self.write_node(root, exclude, &mut out);
        }
        out
    }

    /// Serialize a single node including its tag.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, None, &mut out);
        out
    }

    /// Serialize an element's children.
    ///
    /// `exclude` skips any subtree whose root matches the selector — used
    /// to read editable content without editor-only affordances.
    #[must_use]
    pub fn inner_html(&self, id: NodeId, exclude: Option<&Selector>) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, exclude, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, exclude: Option<&Selector>, out: &mut String) {
        if let Some(selector) = exclude {
            if selector.matches(self, id) {
                return;
            }
        }
        match &self.node(id).data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Comment(body) => {
                write!(out, "<!--{body}-->").unwrap();
            }
            NodeData::Doctype(body) => {
                write!(out, "<!{body}>").unwrap();
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    if value.is_empty() {
                        write!(out, " {name}").unwrap();
                    } else {
                        write!(out, " {name}=\"{}\"", escape_attr(value)).unwrap();
                    }
                }
                out.push('>');
                if is_void(&element.tag) {
                    return;
                }
                for &child in &element.children {
                    self.write_node(child, exclude, out);
                }
                write!(out, "</{}>", element.tag).unwrap();
            }
        }
    }
}

fn escape_attr(value: &str) -> String {
    if value.contains('"') {
        value.replace('"', "&quot;")
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Document, Selector};

    #[test]
    fn test_outer_html() {
        let doc = Document::parse("<div><p class=\"x\">hi</p></div>").unwrap();
        let p = doc.query_first(&Selector::parse("p").unwrap()).unwrap();
        assert_eq!(doc.outer_html(p), "<p class=\"x\">hi</p>");
    }

    #[test]
    fn test_inner_html() {
        let doc = Document::parse("<div>a<b>c</b></div>").unwrap();
        let div = doc.query_first(&Selector::parse("div").unwrap()).unwrap();
        assert_eq!(doc.inner_html(div, None), "a<b>c</b>");
    }

    #[test]
    fn test_inner_html_excludes_matching_subtrees() {
        let doc = Document::parse(
            "<div>text<button class=\"weld-ui\">Edit</button><em>kept</em></div>",
        )
        .unwrap();
        let div = doc.query_first(&Selector::parse("div").unwrap()).unwrap();
        let exclude = Selector::parse(".weld-ui").unwrap();
        assert_eq!(doc.inner_html(div, Some(&exclude)), "text<em>kept</em>");
    }

    #[test]
    fn test_bare_attribute_serialized_without_value() {
        let doc = Document::parse("<input disabled>").unwrap();
        assert_eq!(doc.to_html(), "<input disabled>");
    }

    #[test]
    fn test_attribute_quote_escaped() {
        let mut doc = Document::parse("<div></div>").unwrap();
        let div = doc.query_first(&Selector::parse("div").unwrap()).unwrap();
        doc.set_attr(div, "data-markdown", "a \"quoted\" word");
        assert_eq!(
            doc.to_html(),
            "<div data-markdown=\"a &quot;quoted&quot; word\"></div>"
        );
    }

    #[test]
    fn test_void_element_no_closing_tag() {
        let doc = Document::parse("<p>a<br>b</p>").unwrap();
        assert_eq!(doc.to_html(), "<p>a<br>b</p>");
    }
}
