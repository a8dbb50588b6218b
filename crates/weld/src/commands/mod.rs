//! CLI command implementations.

pub(crate) mod components;
pub(crate) mod convert;
pub(crate) mod insert;
pub(crate) mod show;

use std::sync::Arc;
use std::time::Duration;

use weld_config::{Config, StoreBackend};
use weld_session::{EditSession, SessionOptions};
use weld_store::{CatalogSource, FsStore, HttpStore, PageStore};
use weld_templates::{ExpandOptions, TemplateSource};

use crate::error::CliError;

pub(crate) use components::ComponentsArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use insert::InsertArgs;
pub(crate) use show::ShowArgs;

/// Map the loaded configuration to session options.
fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        editable_class: config.editor.editable_class.clone(),
        markdown_class: config.editor.markdown_class.clone(),
        ui_class: config.editor.ui_class.clone(),
        debounce: Duration::from_millis(config.editor.debounce_ms),
        expansion: ExpandOptions {
            max_depth: config.expansion.max_depth,
            max_rewrites: config.expansion.max_rewrites,
        },
    }
}

/// Open an editing session against the configured store backend.
fn open_session(config: &Config, site: &str, page: &str) -> Result<EditSession, CliError> {
    tracing::debug!(site, page, store = ?config.store, "opening edit session");
    let options = session_options(config);
    let session = match &config.store {
        StoreBackend::Fs(root) => {
            let store = Arc::new(FsStore::new(root));
            let pages = Arc::clone(&store) as Arc<dyn PageStore>;
            let templates = Arc::clone(&store) as Arc<dyn TemplateSource>;
            EditSession::open(pages, store.as_ref(), templates, site, page, options)?
        }
        StoreBackend::Http(base_url) => {
            let store = Arc::new(HttpStore::new(base_url));
            let pages = Arc::clone(&store) as Arc<dyn PageStore>;
            let templates = Arc::clone(&store) as Arc<dyn TemplateSource>;
            EditSession::open(pages, store.as_ref(), templates, site, page, options)?
        }
    };
    Ok(session)
}

/// The configured backend as a catalog source.
fn catalog(config: &Config) -> Box<dyn CatalogSource> {
    match &config.store {
        StoreBackend::Fs(root) => Box::new(FsStore::new(root)),
        StoreBackend::Http(base_url) => Box::new(HttpStore::new(base_url)),
    }
}
