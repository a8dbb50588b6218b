//! Node storage for the document arena.

/// Handle to a node in a [`Document`](crate::Document) arena.
///
/// Ids are only meaningful for the document that created them. Detached
/// nodes keep their id; arena slots are not reclaimed within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Element tags that never have children or closing tags.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Element tags whose content is raw text (no nested markup).
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Element payload: tag, attributes in source order, child ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<NodeId>,
}

impl ElementData {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.attrs.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    /// Whitespace-separated class list membership test.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|item| item == class))
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with tag, attributes and children.
    Element,
    /// A text run, stored verbatim (entities are not decoded).
    Text,
    /// An HTML comment (without the delimiters).
    Comment,
    /// A doctype declaration (content after `<!doctype`).
    Doctype,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
    Doctype(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
            Self::Doctype(_) => NodeKind::Doctype,
        }
    }
}

/// Arena slot: payload plus parent link (`None` for roots and detached
/// nodes).
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void("br"));
        assert!(is_void("img"));
        assert!(!is_void("div"));
    }

    #[test]
    fn test_attr_lookup_and_set() {
        let mut element = ElementData {
            tag: "div".to_owned(),
            attrs: vec![("id".to_owned(), "a".to_owned())],
            children: Vec::new(),
        };
        assert_eq!(element.attr("id"), Some("a"));
        assert_eq!(element.attr("class"), None);

        element.set_attr("id", "b");
        element.set_attr("class", "x");
        assert_eq!(element.attr("id"), Some("b"));
        assert_eq!(element.attr("class"), Some("x"));

        element.remove_attr("class");
        assert_eq!(element.attr("class"), None);
    }

    #[test]
    fn test_has_class() {
        let element = ElementData {
            tag: "div".to_owned(),
            attrs: vec![("class".to_owned(), "editable editable-markdown".to_owned())],
            children: Vec::new(),
        };
        assert!(element.has_class("editable"));
        assert!(element.has_class("editable-markdown"));
        assert!(!element.has_class("edit"));
    }
}
