//! Errors raised while loading static pages.

use std::path::PathBuf;

/// Error returned when a static page cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Page key without a `group%name` structure.
    #[error("Malformed page key \"{0}\": expected <group>%<page>")]
    MalformedKey(String),
    /// Group or page is not configured.
    #[error("No page with key \"{0}\" found in page group configuration")]
    PageNotFound(String),
    /// Configured page file does not exist.
    #[error("Page file not found under the given path (path: {})", .0.display())]
    FileNotFound(PathBuf),
    /// Dynamic page template failed to compile or render.
    #[error("Failed to render page template {}: {message}", .path.display())]
    Template {
        /// Template file.
        path: PathBuf,
        /// Engine error, including its cause chain.
        message: String,
    },
    /// I/O error reading a page file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Whether the key resolved to nothing: unknown group, unknown page, or
    /// missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound(_) | Self::FileNotFound(_))
    }

    /// Whether the error belongs to the key lookup itself rather than to
    /// rendering.
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        self.is_not_found() || matches!(self, Self::MalformedKey(_))
    }
}
