//! CLI error types.

use weld_config::ConfigError;
use weld_session::SessionError;
use weld_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),
}
