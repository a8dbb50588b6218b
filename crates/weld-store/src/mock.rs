//! In-memory store for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use weld_components::ComponentRecord;
use weld_templates::{RuleRecord, TemplateError, TemplateSource};

use crate::store::{CatalogSource, PageStore, StoreError};

/// In-memory store for tests.
///
/// Configure with the builder methods, then use like any other backend.
/// Saved pages are observable through [`saved_page`](Self::saved_page) and
/// [`save_count`](Self::save_count).
///
/// # Example
///
/// ```
/// use weld_store::{MockStore, PageStore};
///
/// let store = MockStore::new().with_page("demo", "index", "<html></html>");
/// assert_eq!(store.load_page("demo", "index").unwrap(), "<html></html>");
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    pages: RwLock<HashMap<(String, String), String>>,
    components: Vec<ComponentRecord>,
    rules: BTreeMap<String, RuleRecord>,
    templates: HashMap<String, String>,
    saves: RwLock<usize>,
}

impl MockStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        site: impl Into<String>,
        page: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert((site.into(), page.into()), content.into());
        self
    }

    /// Add a component record.
    #[must_use]
    pub fn with_component(mut self, record: ComponentRecord) -> Self {
        self.components.push(record);
        self
    }

    /// Add a custom-element rule.
    #[must_use]
    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.rules.insert(
            name.into(),
            RuleRecord {
                pattern: pattern.into(),
                template: template.into(),
            },
        );
        self
    }

    /// Add a named template.
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(name.into(), text.into());
        self
    }

    /// Current content of a page, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn saved_page(&self, site: &str, page: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(&(site.to_owned(), page.to_owned()))
            .cloned()
    }

    /// Number of successful saves.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl PageStore for MockStore {
    fn load_page(&self, site: &str, page: &str) -> Result<String, StoreError> {
        self.saved_page(site, page).ok_or_else(|| StoreError::PageNotFound {
            site: site.to_owned(),
            page: page.to_owned(),
        })
    }

    fn save_page(&self, site: &str, page: &str, content: &str) -> Result<(), StoreError> {
        self.pages
            .write()
            .unwrap()
            .insert((site.to_owned(), page.to_owned()), content.to_owned());
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}

impl CatalogSource for MockStore {
    fn components(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        Ok(self.components.clone())
    }

    fn custom_element_rules(&self) -> Result<BTreeMap<String, RuleRecord>, StoreError> {
        Ok(self.rules.clone())
    }
}

impl TemplateSource for MockStore {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_pages_round_trip() {
        let store = MockStore::new().with_page("s", "p", "v1");
        assert_eq!(store.load_page("s", "p").unwrap(), "v1");

        store.save_page("s", "p", "v2").unwrap();
        assert_eq!(store.load_page("s", "p").unwrap(), "v2");
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_missing_page() {
        let store = MockStore::new();
        assert!(matches!(
            store.load_page("s", "p").unwrap_err(),
            StoreError::PageNotFound { .. }
        ));
    }

    #[test]
    fn test_catalog_and_templates() {
        let store = MockStore::new()
            .with_component(ComponentRecord {
                name: "hero".to_owned(),
                target: "main:child".to_owned(),
                content: "<div/>".to_owned(),
                params: Vec::new(),
            })
            .with_rule("box", "<!--box-->(.*?)<!--/box-->", "box")
            .with_template("box", "<div>${content}</div>");

        assert_eq!(store.components().unwrap().len(), 1);
        assert_eq!(store.custom_element_rules().unwrap().len(), 1);
        assert_eq!(store.load("box").unwrap(), "<div>${content}</div>");
    }
}
