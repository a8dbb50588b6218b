//! Store traits and error type.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use weld_components::ComponentRecord;
use weld_templates::RuleRecord;

/// Persistence failure.
///
/// No variant carries retry semantics: the gateway never retries on its
/// own, callers decide whether to re-invoke.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested page does not exist.
    #[error("page {site}/{page} not found")]
    PageNotFound {
        /// Site identifier.
        site: String,
        /// Page identifier.
        page: String,
    },
    /// A site or page identifier contains path separators or `..`.
    #[error("invalid {what} identifier: {value:?}")]
    InvalidKey {
        /// Which identifier was rejected.
        what: &'static str,
        /// The offending value.
        value: String,
    },
    /// Filesystem failure.
    #[error("I/O failure (path: {})", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backend answered with an error status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// Request URL.
        url: String,
        /// Response status code.
        status: u16,
        /// Response body, best effort.
        body: String,
    },
    /// The request never produced a response.
    #[error("transport failure for {url}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A payload could not be decoded.
    #[error("invalid {what} payload")]
    Decode {
        /// Payload kind (e.g. "components").
        what: &'static str,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Wire envelope for the component catalog.
#[derive(Debug, Deserialize)]
pub struct ComponentsPayload {
    /// The component records.
    pub components: Vec<ComponentRecord>,
}

/// Whole-page load/save, keyed by site and page identifiers.
///
/// `content` is the full serialized document; the gateway treats it as an
/// opaque string.
pub trait PageStore: Send + Sync {
    /// Load the serialized content of a page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the page does not exist or the backend
    /// fails.
    fn load_page(&self, site: &str, page: &str) -> Result<String, StoreError>;

    /// Persist the full serialized content of a page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or backend failure. The
    /// operation is not retried.
    fn save_page(&self, site: &str, page: &str, content: &str) -> Result<(), StoreError>;
}

/// Source of component definitions and custom-element rules.
pub trait CatalogSource: Send + Sync {
    /// Fetch all component records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or decode failure.
    fn components(&self) -> Result<Vec<ComponentRecord>, StoreError>;

    /// Fetch the custom-element rule map (rule name → record).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or decode failure.
    fn custom_element_rules(&self) -> Result<BTreeMap<String, RuleRecord>, StoreError>;
}

/// Reject identifiers that would escape the store's keyspace.
pub(crate) fn check_key(what: &'static str, value: &str) -> Result<(), StoreError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(StoreError::InvalidKey {
            what,
            value: value.to_owned(),
        });
    }
    Ok(())
}
