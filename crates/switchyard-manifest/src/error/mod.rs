//! Errors raised while loading or applying an action manifest.
//!
//! YAML parser errors are boxed to satisfy the `result_large_err` Clippy
//! lint.

use switchyard::ConfigError;
use thiserror::Error;

/// Errors arising from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is not a valid YAML manifest.
    #[error("failed to parse YAML manifest: {0}")]
    Yaml(#[source] Box<serde_saphyr::Error>),

    /// The document is not a valid JSON manifest.
    #[error("failed to parse JSON manifest: {0}")]
    Json(#[source] serde_json::Error),

    /// The manifest parsed but does not describe a valid dispatcher.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_saphyr::Error> for ManifestError {
    fn from(err: serde_saphyr::Error) -> Self {
        Self::Yaml(Box::new(err))
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests;
