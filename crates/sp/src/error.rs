//! CLI error types.

use sp_config::ConfigError;
use sp_pages::{LoadError, SelectorError, UnknownFragment};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Selector(#[from] SelectorError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Fragment(#[from] UnknownFragment),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
