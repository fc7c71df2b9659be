//! Thin adapters over [`ContentLoader`] for embedding applications.
//!
//! - [`PageGroupProvider`] feeds page pickers with the options of one group
//! - [`FragmentAccessor`] hands single fragments to template expressions
//!
//! Lookup failures are turned into strings here and only here. The loader
//! itself always reports them as errors.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::dimensions::RuntimeDimensions;
use crate::error::LoadError;
use crate::extract::Extraction;
use crate::group::PageOption;
use crate::loader::ContentLoader;

/// Serves filtered page options for one group.
pub struct PageGroupProvider {
    loader: Arc<ContentLoader>,
}

impl PageGroupProvider {
    /// Identifier under which the provider is registered with a host UI.
    pub const IDENTIFIER: &'static str = "static-pages";

    #[must_use]
    pub fn new(loader: Arc<ContentLoader>) -> Self {
        Self { loader }
    }

    /// Options of `group` for the caller's `dimensions`.
    #[must_use]
    pub fn get_data(&self, group: &str, dimensions: &RuntimeDimensions) -> Vec<PageOption> {
        self.loader.page_group(group, dimensions)
    }
}

/// Fragment of a loaded page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    Content,
    BodyScripts,
    HeadScripts,
    Stylesheets,
}

impl FragmentKind {
    /// All kinds, in the order they are usually emitted into a layout.
    pub const ALL: [Self; 4] = [
        Self::Stylesheets,
        Self::HeadScripts,
        Self::Content,
        Self::BodyScripts,
    ];

    /// Name used by template expressions.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::BodyScripts => "bodyScripts",
            Self::HeadScripts => "headScripts",
            Self::Stylesheets => "stylesheets",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown fragment name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown fragment type \"{0}\" (expected content, bodyScripts, headScripts or stylesheets)")]
pub struct UnknownFragment(pub String);

impl FromStr for FragmentKind {
    type Err = UnknownFragment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownFragment(s.to_owned()))
    }
}

/// Per-fragment access to static pages.
///
/// When a key is malformed or does not resolve, `content` yields the error
/// message so the problem is visible on the page, while the asset fragments
/// yield an empty string.
pub struct FragmentAccessor {
    loader: Arc<ContentLoader>,
}

impl FragmentAccessor {
    #[must_use]
    pub fn new(loader: Arc<ContentLoader>) -> Self {
        Self { loader }
    }

    /// Load one fragment of the page at `key`.
    ///
    /// For pages loaded without extraction, `content` is the whole rendered
    /// markup and the other fragments are empty.
    ///
    /// # Errors
    ///
    /// Returns rendering errors ([`LoadError::Io`], [`LoadError::Template`]).
    /// Lookup errors are converted to strings as described above.
    pub fn fragment(&self, key: &str, kind: FragmentKind) -> Result<String, LoadError> {
        match self.loader.load(key) {
            Ok(Extraction::Extracted(record)) => Ok(match kind {
                FragmentKind::Content => record.content,
                FragmentKind::BodyScripts => record.body_scripts,
                FragmentKind::HeadScripts => record.head_scripts,
                FragmentKind::Stylesheets => record.stylesheets,
            }),
            Ok(Extraction::Raw(markup)) => Ok(match kind {
                FragmentKind::Content => markup,
                _ => String::new(),
            }),
            Err(e) if e.is_lookup() => {
                tracing::debug!(key = %key, fragment = %kind, error = %e, "Static page lookup failed");
                Ok(match kind {
                    FragmentKind::Content => e.to_string(),
                    _ => String::new(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Inner markup of the content element.
    ///
    /// # Errors
    ///
    /// See [`fragment`](Self::fragment).
    pub fn content(&self, key: &str) -> Result<String, LoadError> {
        self.fragment(key, FragmentKind::Content)
    }

    /// Scripts with `src` under `<body>`.
    ///
    /// # Errors
    ///
    /// See [`fragment`](Self::fragment).
    pub fn body_scripts(&self, key: &str) -> Result<String, LoadError> {
        self.fragment(key, FragmentKind::BodyScripts)
    }

    /// Scripts with `src` under `<head>`.
    ///
    /// # Errors
    ///
    /// See [`fragment`](Self::fragment).
    pub fn head_scripts(&self, key: &str) -> Result<String, LoadError> {
        self.fragment(key, FragmentKind::HeadScripts)
    }

    /// `<link rel>` elements.
    ///
    /// # Errors
    ///
    /// See [`fragment`](Self::fragment).
    pub fn stylesheets(&self, key: &str) -> Result<String, LoadError> {
        self.fragment(key, FragmentKind::Stylesheets)
    }
}
