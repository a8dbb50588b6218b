//! Filesystem-backed store.
//!
//! Site directory layout:
//!
//! ```text
//! <root>/components.json          component catalog
//! <root>/custom_elements.json     custom-element rule map
//! <root>/templates/<name>.xml     named templates
//! <root>/<site>/pages/<page>.html page content
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use weld_components::ComponentRecord;
use weld_templates::{RuleRecord, TemplateError, TemplateSource};

use crate::store::{CatalogSource, ComponentsPayload, PageStore, StoreError, check_key};

/// Filesystem store rooted at a site directory.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store over a root directory. The directory does not need
    /// to exist until first use.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, site: &str, page: &str) -> Result<PathBuf, StoreError> {
        check_key("site", site)?;
        check_key("page", page)?;
        Ok(self
            .root
            .join(site)
            .join("pages")
            .join(format!("{page}.html")))
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl PageStore for FsStore {
    fn load_page(&self, site: &str, page: &str) -> Result<String, StoreError> {
        let path = self.page_path(site, page)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(source) if source.kind() == ErrorKind::NotFound => Err(StoreError::PageNotFound {
                site: site.to_owned(),
                page: page.to_owned(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn save_page(&self, site: &str, page: &str, content: &str) -> Result<(), StoreError> {
        let path = self.page_path(site, page)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        tracing::info!(site, page, bytes = content.len(), "saving page");
        std::fs::write(&path, content).map_err(|source| StoreError::Io { path, source })
    }
}

impl CatalogSource for FsStore {
    fn components(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        let path = self.root.join("components.json");
        let text = self.read(&path)?;
        let payload: ComponentsPayload =
            serde_json::from_str(&text).map_err(|source| StoreError::Decode {
                what: "components",
                source: Box::new(source),
            })?;
        Ok(payload.components)
    }

    fn custom_element_rules(&self) -> Result<BTreeMap<String, RuleRecord>, StoreError> {
        let path = self.root.join("custom_elements.json");
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            // No rule file means no custom elements, not an error.
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Decode {
            what: "custom element rules",
            source: Box::new(source),
        })
    }
}

impl TemplateSource for FsStore {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        if check_key("template", name).is_err() {
            return Err(TemplateError::NotFound(name.to_owned()));
        }
        let path = self.root.join("templates").join(format!("{name}.xml"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(source) if source.kind() == ErrorKind::NotFound => {
                Err(TemplateError::NotFound(name.to_owned()))
            }
            Err(source) => Err(TemplateError::load(name, source)),
        }
    }
}
