//! Session-scoped template cache.

use std::collections::HashMap;

use crate::source::{TemplateError, TemplateSource};

/// Cache of raw template texts, keyed by name.
///
/// Populated lazily on first use and never invalidated within a session —
/// there is no hot-reload contract for templates.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<String, String>,
}

impl TemplateCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached text for `name`, loading it from the source on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template has to be loaded and the
    /// source fails. Failed loads are not negatively cached; a later call
    /// retries the source.
    pub fn get_or_load(
        &mut self,
        name: &str,
        source: &dyn TemplateSource,
    ) -> Result<&str, TemplateError> {
        if !self.templates.contains_key(name) {
            tracing::debug!(template = %name, "template cache miss");
            let text = source.load(name)?;
            self.templates.insert(name.to_owned(), text);
        }
        Ok(self
            .templates
            .get(name)
            .expect("inserted above")
            .as_str())
    }

    /// Number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if nothing has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
