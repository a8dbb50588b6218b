//! The editing session.

use std::sync::Arc;
use std::time::Duration;

use weld_components::{ComponentDefinition, ComponentRegistry, InsertPosition, TargetDescriptor};
use weld_dom::{Document, DomError, InsertAt, NodeId, Selector};
use weld_store::{CatalogSource, PageStore};
use weld_templates::{ExpandOptions, Expander, Params, RuleSet, TemplateSource};

use crate::SessionError;
use crate::scheduler::SaveScheduler;

/// Attribute carrying the authoritative Markdown source of an editable
/// element. When present, the element's rendered children are a derived
/// view; edits always start from this attribute to avoid repeated lossy
/// HTML→Markdown reconversion.
const MARKDOWN_ATTR: &str = "data-markdown";

/// Session construction options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Class marking inline-editable elements.
    pub editable_class: String,
    /// Class marking markdown-editable elements.
    pub markdown_class: String,
    /// Class carried by editor-only affordances; stripped before save.
    pub ui_class: String,
    /// Save debounce window.
    pub debounce: Duration,
    /// Expansion engine bounds.
    pub expansion: ExpandOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            editable_class: "editable".to_owned(),
            markdown_class: "editable-markdown".to_owned(),
            ui_class: "weld-ui".to_owned(),
            debounce: Duration::from_millis(100),
            expansion: ExpandOptions::default(),
        }
    }
}

/// A per-page editing session.
///
/// Owns the component registry, the expansion engine (with its template
/// cache), the live document tree and the save scheduler. Constructed per
/// `(site, page)` pair; all operations are synchronous and run on the
/// caller's thread.
pub struct EditSession {
    pages: Arc<dyn PageStore>,
    registry: ComponentRegistry,
    expander: Expander,
    doc: Document,
    site: String,
    page: String,
    options: SessionOptions,
    ui_selector: Selector,
    editable_selector: Selector,
    scheduler: SaveScheduler,
}

impl EditSession {
    /// Open an editing session: load the page, register the component
    /// catalog, compile custom-element rules and annotate anchors.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the page cannot be loaded or parsed,
    /// the catalog contains malformed targets, or the rule set fails to
    /// compile.
    pub fn open(
        pages: Arc<dyn PageStore>,
        catalog: &dyn CatalogSource,
        templates: Arc<dyn TemplateSource>,
        site: &str,
        page: &str,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let content = pages.load_page(site, page)?;
        let doc = Document::parse(&content)?;

        let mut registry = ComponentRegistry::new();
        registry.register_records(catalog.components()?)?;

        let rules = RuleSet::from_records(catalog.custom_element_rules()?)?;
        let expander = Expander::new(rules, templates).with_options(options.expansion);

        let ui_selector = Selector::parse(&format!(".{}", options.ui_class))?;
        let editable_selector = Selector::parse(&format!(".{}", options.editable_class))?;
        let scheduler = SaveScheduler::new(options.debounce);

        let mut session = Self {
            pages,
            registry,
            expander,
            doc,
            site: site.to_owned(),
            page: page.to_owned(),
            options,
            ui_selector,
            editable_selector,
            scheduler,
        };
        session.annotate_anchors();
        Ok(session)
    }

    /// The live document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Components offered at a target key, for UI listings. Empty for
    /// unknown keys.
    #[must_use]
    pub fn components_at(&self, target_key: &str) -> &[ComponentDefinition] {
        self.registry.definitions_for(target_key)
    }

    /// Serialized page content without editor-only affordances. Does not
    /// mutate the tree.
    #[must_use]
    pub fn content(&self) -> String {
        self.doc.to_html_filtered(Some(&self.ui_selector))
    }

    /// (Re-)annotate the tree with editor affordances: one insertion
    /// button per live anchor of each target group, one edit button per
    /// editable element. Previous affordances are removed first, so the
    /// method is idempotent.
    ///
    /// Target selectors that cannot be parsed as structural queries are
    /// skipped with a warning; they do not fail the session.
    pub fn annotate_anchors(&mut self) {
        self.doc.remove_matching(&self.ui_selector);

        let keys: Vec<String> = self.registry.target_keys().map(str::to_owned).collect();
        for key in keys {
            let descriptor =
                TargetDescriptor::parse(&key).expect("registry keys are parsed descriptors");
            let selector = match Selector::parse(&descriptor.selector) {
                Ok(selector) => selector,
                Err(err) => {
                    tracing::warn!(target = %key, error = %err, "skipping unresolvable target");
                    continue;
                }
            };
            let group_size = self.registry.definitions_for(&key).len();
            for anchor in self.doc.query_all(&selector) {
                let button = self.doc.create_element(
                    "button",
                    vec![
                        (
                            "class".to_owned(),
                            format!("{} weld-insert", self.options.ui_class),
                        ),
                        ("data-weld-target".to_owned(), key.clone()),
                    ],
                );
                let label = self
                    .doc
                    .create_text(&format!("+ Add Component ({group_size})"));
                self.doc
                    .append_child(button, label)
                    .expect("buttons are elements");
                self.doc
                    .append_child(anchor, button)
                    .expect("query matches elements only");
            }
        }

        for editable in self.doc.query_all(&self.editable_selector) {
            let button = self.doc.create_element(
                "button",
                vec![(
                    "class".to_owned(),
                    format!("{} weld-edit", self.options.ui_class),
                )],
            );
            let label = self.doc.create_text("Edit");
            self.doc
                .append_child(button, label)
                .expect("buttons are elements");
            self.doc
                .append_child(editable, button)
                .expect("query matches elements only");
        }
    }

    /// Expand a component and insert it at every live anchor of its
    /// target. The expanded markup is independently re-parsed per anchor,
    /// so no node instances are shared across anchors.
    ///
    /// Returns the number of anchors the component was inserted at and
    /// schedules a debounced save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the component is unknown, expansion
    /// fails (missing template, bound exceeded) or no anchor matches.
    /// A failed attempt leaves committed tree state untouched.
    pub fn insert_component(&mut self, name: &str, params: &Params) -> Result<usize, SessionError> {
        let definition = self
            .registry
            .find(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownComponent(name.to_owned()))?;

        let markup = self.expander.expand(&definition.content, params)?;
        let selector = Selector::parse(&definition.target.selector)?;
        let anchors = self.doc.query_all(&selector);
        if anchors.is_empty() {
            return Err(SessionError::Dom(DomError::AnchorMissing(
                definition.target.selector.clone(),
            )));
        }
        let at = match definition.target.position {
            InsertPosition::Child => InsertAt::Child,
            InsertPosition::Before => InsertAt::Before,
        };

        for &anchor in &anchors {
            let mut fragment = self.doc.parse_fragment(&markup)?;
            self.doc.insert(anchor, at, &mut fragment)?;
        }

        tracing::debug!(component = %name, anchors = anchors.len(), "inserted component");
        self.scheduler.schedule();
        Ok(anchors.len())
    }

    /// Elements carrying the editable marker class, in document order.
    #[must_use]
    pub fn editables(&self) -> Vec<NodeId> {
        self.doc.query_all(&self.editable_selector)
    }

    /// True if the element is edited as Markdown rather than plain text.
    #[must_use]
    pub fn is_markdown_editable(&self, node: NodeId) -> bool {
        self.doc.has_class(node, &self.options.markdown_class)
    }

    /// Editable source text for an element: the Markdown side-channel
    /// when present, otherwise a best-effort conversion of the current
    /// markup (excluding editor affordances).
    #[must_use]
    pub fn editable_source(&self, node: NodeId) -> String {
        if let Some(markdown) = self.doc.attr(node, MARKDOWN_ATTR) {
            return markdown.to_owned();
        }
        weld_markdown::html_to_markdown(&self.doc.inner_html(node, Some(&self.ui_selector)))
    }

    /// Commit a Markdown edit: store the source in the side-channel
    /// attribute, replace the element's children with the rendered HTML
    /// and schedule a save.
    ///
    /// At rest the element's markup equals `markdown_to_html` of the
    /// side-channel source.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Dom`] if the node is not an element. The
    /// node is left untouched on failure.
    pub fn commit_markdown_edit(
        &mut self,
        node: NodeId,
        markdown: &str,
    ) -> Result<(), SessionError> {
        if self.doc.tag(node).is_none() {
            return Err(SessionError::Dom(DomError::AnchorMissing(
                "markdown edit target is not an element".to_owned(),
            )));
        }
        let html = weld_markdown::markdown_to_html(markdown);
        let mut fragment = self.doc.parse_fragment(&html)?;

        self.doc.set_attr(node, MARKDOWN_ATTR, markdown);
        self.doc.clear_children(node);
        self.doc.insert(node, InsertAt::Child, &mut fragment)?;
        self.scheduler.schedule();
        Ok(())
    }

    /// Commit a plain-text edit: replace the element's children with a
    /// single text node. Any Markdown side-channel is dropped — the text
    /// is now the authority.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Dom`] if the node is not an element.
    pub fn commit_text_edit(&mut self, node: NodeId, text: &str) -> Result<(), SessionError> {
        if self.doc.tag(node).is_none() {
            return Err(SessionError::Dom(DomError::AnchorMissing(
                "text edit target is not an element".to_owned(),
            )));
        }
        self.doc.remove_attr(node, MARKDOWN_ATTR);
        self.doc.clear_children(node);
        let content = self.doc.create_text(text);
        self.doc
            .append_child(node, content)
            .expect("checked to be an element above");
        self.scheduler.schedule();
        Ok(())
    }

    /// True if a save has been scheduled and not yet flushed.
    #[must_use]
    pub fn pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Flush a due save, if any. Returns `true` when a save was written.
    ///
    /// The host event loop calls this periodically; saves are coalesced,
    /// so any number of scheduled requests produce at most one write per
    /// flush.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if persisting fails. The request
    /// is consumed either way — failed saves are not retried
    /// automatically.
    pub fn flush_saves(&mut self) -> Result<bool, SessionError> {
        if self.scheduler.take_due() {
            self.persist()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Save immediately, coalescing any pending scheduled save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if persisting fails.
    pub fn save_now(&mut self) -> Result<(), SessionError> {
        self.scheduler.take_pending();
        self.persist()
    }

    /// Strip affordances, serialize, save, re-annotate.
    ///
    /// Removal of editor-only elements always precedes serialization, so
    /// persisted content never contains them. Affordances are restored
    /// even when the save itself fails.
    fn persist(&mut self) -> Result<(), SessionError> {
        self.doc.remove_matching(&self.ui_selector);
        let content = self.doc.to_html();
        let result = self.pages.save_page(&self.site, &self.page, &content);
        self.annotate_anchors();
        result.map_err(Into::into)
    }
}
