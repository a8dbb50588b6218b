//! Configuration management for WELD.
//!
//! Parses `weld.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `store.root`
//! - `store.base_url`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use expand::expand_env;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "weld.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    #[error("invalid config file {path}")]
    Parse {
        /// Path of the file.
        path: String,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// A `${VAR}` reference names an unset variable without a default.
    #[error("environment variable {0} is not set")]
    MissingEnvVar(String),
    /// A `${...` reference is missing its closing brace.
    #[error("unterminated ${{...}} reference in {0:?}")]
    UnterminatedReference(String),
    /// `[store]` configures both or neither of `root` / `base_url`.
    #[error("store must configure exactly one of `root` or `base_url`")]
    AmbiguousStore,
}

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded
/// config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the filesystem store root.
    pub store_root: Option<PathBuf>,
    /// Override the HTTP backend base URL.
    pub base_url: Option<String>,
}

/// Where pages, catalogs and templates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Filesystem store rooted at a directory.
    Fs(PathBuf),
    /// HTTP backend at a base URL.
    Http(String),
}

/// Raw `[store]` section as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    root: Option<String>,
    base_url: Option<String>,
}

/// Expansion engine bounds.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Maximum template recursion depth.
    pub max_depth: usize,
    /// Total rewrite budget per expansion.
    pub max_rewrites: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_rewrites: 64,
        }
    }
}

/// Editor affordance configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Class marking elements as inline-editable.
    pub editable_class: String,
    /// Class marking elements as markdown-editable.
    pub markdown_class: String,
    /// Class carried by editor-only affordances (stripped before save).
    pub ui_class: String,
    /// Save debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            editable_class: "editable".to_owned(),
            markdown_class: "editable-markdown".to_owned(),
            ui_class: "weld-ui".to_owned(),
            debounce_ms: 100,
        }
    }
}

/// Raw configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigRaw {
    store: StoreConfigRaw,
    expansion: ExpansionConfig,
    editor: EditorConfig,
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    /// Resolved store backend.
    pub store: StoreBackend,
    /// Expansion bounds.
    pub expansion: ExpansionConfig,
    /// Editor affordance settings.
    pub editor: EditorConfig,
    /// Path to the config file (None when defaults were used).
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for a working directory.
    ///
    /// Searches `dir` and its ancestors for `weld.toml`; falls back to
    /// defaults (filesystem store rooted at `dir/sites`) when no file is
    /// found. CLI settings override file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable or invalid config files and
    /// on failed environment expansion.
    pub fn load(dir: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        match discover(dir) {
            Some(path) => Self::load_file(&path, cli),
            None => Self::from_raw(ConfigRaw::default(), dir, None, cli),
        }
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable or invalid config files and
    /// on failed environment expansion.
    pub fn load_file(path: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: ConfigRaw = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::from_raw(raw, base, Some(path.to_path_buf()), cli)
    }

    fn from_raw(
        raw: ConfigRaw,
        base: &Path,
        config_path: Option<PathBuf>,
        cli: &CliSettings,
    ) -> Result<Self, ConfigError> {
        let store = if let Some(root) = &cli.store_root {
            StoreBackend::Fs(root.clone())
        } else if let Some(url) = &cli.base_url {
            StoreBackend::Http(url.clone())
        } else {
            match (&raw.store.root, &raw.store.base_url) {
                (Some(_), Some(_)) => return Err(ConfigError::AmbiguousStore),
                (Some(root), None) => {
                    let expanded = expand_env(root)?;
                    StoreBackend::Fs(resolve(base, &expanded))
                }
                (None, Some(url)) => StoreBackend::Http(expand_env(url)?),
                (None, None) => StoreBackend::Fs(base.join("sites")),
            }
        };

        Ok(Self {
            store,
            expansion: raw.expansion,
            editor: raw.editor,
            config_path,
        })
    }
}

/// Resolve a possibly-relative config path against the config file's
/// directory.
fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Walk `dir` and its ancestors looking for the config file.
fn discover(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}
