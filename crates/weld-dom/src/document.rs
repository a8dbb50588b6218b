//! Document arena and structural mutation.

use crate::node::{ElementData, Node, NodeData, NodeKind};
use crate::parse::parse_into;
use crate::selector::Selector;
use crate::{DomError, NodeId};

/// Insert position relative to an anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// Append as last children of the anchor element.
    Child,
    /// Insert as immediate preceding siblings of the anchor.
    Before,
}

/// A transient forest of nodes parsed from markup, owned by a [`Document`]
/// arena but not yet attached to its tree.
///
/// Insertion *moves* nodes out of the fragment; after a successful insert
/// the fragment is empty. Dropping a non-empty fragment leaves its nodes
/// detached (they never serialize).
#[derive(Debug)]
pub struct Fragment {
    pub(crate) roots: Vec<NodeId>,
}

impl Fragment {
    /// Top-level node ids remaining in the fragment.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// True once all nodes have been moved into the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of top-level nodes still in the fragment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }
}

/// An arena-backed document tree.
///
/// Nodes live in a flat arena addressed by [`NodeId`]; the tree structure
/// is parent links plus ordered child lists. Detached nodes stay in the
/// arena for the lifetime of the document — slots are not reclaimed, which
/// keeps every previously handed-out id valid.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole page into a document.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Parse`] on unterminated tags or comments.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let mut doc = Self::new();
        doc.roots = parse_into(&mut doc, html)?;
        Ok(doc)
    }

    /// Parse markup into a transient forest within this document's arena.
    ///
    /// The returned fragment's nodes are detached until inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Parse`] on unterminated tags or comments.
    pub fn parse_fragment(&mut self, markup: &str) -> Result<Fragment, DomError> {
        let roots = parse_into(self, markup)?;
        Ok(Fragment { roots })
    }

    // ----- arena plumbing -----

    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { data, parent: None });
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    // ----- read access -----

    /// Top-level nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).data.kind()
    }

    /// Element tag name (lowercased), if the node is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    /// Attribute value, if the node is an element carrying it.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attr(name))
    }

    /// Whitespace-separated class membership test.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|element| element.has_class(class))
    }

    /// Parent node, `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child ids in document order (empty for non-elements).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map_or(&[], |element| &element.children)
    }

    /// Text content of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of the node's text descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(element) => {
                for &child in &element.children {
                    self.collect_text(child, out);
                }
            }
            NodeData::Comment(_) | NodeData::Doctype(_) => {}
        }
    }

    // ----- queries -----

    /// All attached elements matching the selector, in document order.
    #[must_use]
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let mut matched = Vec::new();
        for &root in &self.roots {
            self.visit(root, &mut |doc, id| {
                if selector.matches(doc, id) {
                    matched.push(id);
                }
            });
        }
        matched
    }

    /// First attached element matching the selector, in document order.
    #[must_use]
    pub fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn visit(&self, id: NodeId, f: &mut impl FnMut(&Self, NodeId)) {
        f(self, id);
        if let NodeData::Element(element) = &self.node(id).data {
            for &child in &element.children {
                self.visit(child, f);
            }
        }
    }

    // ----- construction -----

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.alloc(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs,
            children: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_owned()))
    }

    // ----- mutation -----

    /// Move the nodes of a fragment into the tree at the anchor.
    ///
    /// - [`InsertAt::Child`]: each node is appended, in fragment order, as
    ///   the last children of the anchor (existing children keep their
    ///   order).
    /// - [`InsertAt::Before`]: each node becomes an immediate preceding
    ///   sibling of the anchor, in fragment order.
    ///
    /// The fragment is drained: after a successful call it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::AnchorMissing`] if the anchor is not an element
    /// (for `Child`) or is detached (for `Before`).
    pub fn insert(
        &mut self,
        anchor: NodeId,
        at: InsertAt,
        fragment: &mut Fragment,
    ) -> Result<(), DomError> {
        match at {
            InsertAt::Child => {
                if self.element(anchor).is_none() {
                    return Err(DomError::AnchorMissing(
                        "child insertion anchor is not an element".to_owned(),
                    ));
                }
                let incoming: Vec<NodeId> = fragment.roots.drain(..).collect();
                for id in incoming {
                    self.detach(id);
                    self.node_mut(id).parent = Some(anchor);
                    self.element_mut(anchor)
                        .expect("anchor checked above")
                        .children
                        .push(id);
                }
            }
            InsertAt::Before => {
                let incoming: Vec<NodeId> = fragment.roots.drain(..).collect();
                match self.parent(anchor) {
                    Some(parent) => {
                        for id in &incoming {
                            self.detach(*id);
                        }
                        let siblings = &mut self
                            .element_mut(parent)
                            .expect("parent links always point at elements")
                            .children;
                        let slot = siblings
                            .iter()
                            .position(|&sibling| sibling == anchor)
                            .expect("anchor is a child of its parent");
                        siblings.splice(slot..slot, incoming.iter().copied());
                        for id in incoming {
                            self.node_mut(id).parent = Some(parent);
                        }
                    }
                    None => {
                        let slot = self
                            .roots
                            .iter()
                            .position(|&root| root == anchor)
                            .ok_or_else(|| {
                                DomError::AnchorMissing(
                                    "before-insertion anchor is detached".to_owned(),
                                )
                            })?;
                        self.roots.splice(slot..slot, incoming.iter().copied());
                        for id in incoming {
                            self.node_mut(id).parent = None;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Append a (possibly detached) node as the last child of an element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::AnchorMissing`] if the parent is not an element.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.element(parent).is_none() {
            return Err(DomError::AnchorMissing(
                "append parent is not an element".to_owned(),
            ));
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.element_mut(parent)
            .expect("parent checked above")
            .children
            .push(child);
        Ok(())
    }

    /// Detach a node from its parent (or the root list). No-op if already
    /// detached.
    pub fn detach(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(parent) => {
                if let Some(element) = self.element_mut(parent) {
                    element.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
        self.node_mut(id).parent = None;
    }

    /// Detach all children of an element.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            self.detach(child);
        }
    }

    /// Detach every attached node matching the selector. Returns the number
    /// of nodes removed.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let matched = self.query_all(selector);
        let count = matched.len();
        for id in matched {
            self.detach(id);
        }
        count
    }

    /// Set an attribute on an element. No-op on non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.set_attr(name, value);
        }
    }

    /// Remove an attribute from an element. No-op on non-elements.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.remove_attr(name);
        }
    }
}
