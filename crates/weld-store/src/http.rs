//! HTTP-backed store for a remote editor backend.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET  /api/v1/sites/{site}/pages/{page}` — page content (text)
//! - `PUT  /api/v1/sites/{site}/pages/{page}` — save `{"content": ...}`
//! - `GET  /api/v1/components` — component catalog
//! - `GET  /templates/custom_elements.json` — custom-element rule map
//! - `GET  /templates/{name}.xml` — named template text

use std::collections::BTreeMap;
use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::json;
use ureq::Agent;
use weld_components::ComponentRecord;
use weld_templates::{RuleRecord, TemplateError, TemplateSource};

use crate::store::{CatalogSource, ComponentsPayload, PageStore, StoreError};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Characters escaped in URL path segments.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'%');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// HTTP store over an editor backend.
pub struct HttpStore {
    agent: Agent,
    base_url: String,
}

impl HttpStore {
    /// Create a store for a backend base URL (e.g.
    /// `http://127.0.0.1:8000`). A trailing slash is tolerated.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn page_url(&self, site: &str, page: &str) -> String {
        format!(
            "{}/api/v1/sites/{}/pages/{}",
            self.base_url,
            segment(site),
            segment(page)
        )
    }

    fn get_text(&self, url: &str) -> Result<String, StoreError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|source| StoreError::Transport {
                url: url.to_owned(),
                source: Box::new(source),
            })?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(StoreError::Http {
                url: url.to_owned(),
                status,
                body: error_body,
            });
        }
        body.read_to_string().map_err(|source| StoreError::Transport {
            url: url.to_owned(),
            source: Box::new(source),
        })
    }
}

impl PageStore for HttpStore {
    fn load_page(&self, site: &str, page: &str) -> Result<String, StoreError> {
        let url = self.page_url(site, page);
        match self.get_text(&url) {
            Err(StoreError::Http { status: 404, .. }) => Err(StoreError::PageNotFound {
                site: site.to_owned(),
                page: page.to_owned(),
            }),
            other => other,
        }
    }

    fn save_page(&self, site: &str, page: &str, content: &str) -> Result<(), StoreError> {
        let url = self.page_url(site, page);
        let payload = serde_json::to_vec(&json!({ "content": content })).map_err(|source| {
            StoreError::Decode {
                what: "save payload",
                source: Box::new(source),
            }
        })?;

        tracing::info!(site, page, bytes = content.len(), "saving page");
        let response = self
            .agent
            .put(&url)
            .header("Content-Type", "application/json")
            .send(&payload[..])
            .map_err(|source| StoreError::Transport {
                url: url.clone(),
                source: Box::new(source),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(StoreError::Http {
                url,
                status,
                body: error_body,
            });
        }
        Ok(())
    }
}

impl CatalogSource for HttpStore {
    fn components(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        let url = format!("{}/api/v1/components", self.base_url);
        let text = self.get_text(&url)?;
        let payload: ComponentsPayload =
            serde_json::from_str(&text).map_err(|source| StoreError::Decode {
                what: "components",
                source: Box::new(source),
            })?;
        Ok(payload.components)
    }

    fn custom_element_rules(&self) -> Result<BTreeMap<String, RuleRecord>, StoreError> {
        let url = format!("{}/templates/custom_elements.json", self.base_url);
        let text = match self.get_text(&url) {
            Ok(text) => text,
            // A backend without custom elements simply has no rule file.
            Err(StoreError::Http { status: 404, .. }) => return Ok(BTreeMap::new()),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Decode {
            what: "custom element rules",
            source: Box::new(source),
        })
    }
}

impl TemplateSource for HttpStore {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        let url = format!("{}/templates/{}.xml", self.base_url, segment(name));
        match self.get_text(&url) {
            Ok(text) => Ok(text),
            Err(StoreError::Http { status: 404, .. }) => {
                Err(TemplateError::NotFound(name.to_owned()))
            }
            Err(err) => Err(TemplateError::load(name, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpStore::new("http://localhost:8000/");
        assert_eq!(
            store.page_url("demo", "index"),
            "http://localhost:8000/api/v1/sites/demo/pages/index"
        );
    }

    #[test]
    fn test_identifiers_percent_encoded() {
        let store = HttpStore::new("http://localhost:8000");
        assert_eq!(
            store.page_url("my site", "a/b"),
            "http://localhost:8000/api/v1/sites/my%20site/pages/a%2Fb"
        );
    }
}
