//! Cache-or-compute loading of static pages.
//!
//! [`ContentLoader`] resolves a page key to its file, renders it, extracts
//! fragments and caches the result under the full key. A cached entry is
//! returned as-is on later calls, without looking at the file again.
//!
//! There is no in-flight deduplication: two callers missing on the same key
//! both render and both write, and the last write wins. Rendering is a pure
//! function of the file and the configuration, so the duplicate is only
//! wasted work.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use sp_cache::{Cache, CacheBucket, CacheBucketExt};
use sp_config::{Config, DynamicPagesConfig, PageGroups};

use crate::dimensions::RuntimeDimensions;
use crate::error::LoadError;
use crate::extract::{ContentExtractor, Extraction, SelectorError};
use crate::group::{PageOption, filter_page_group};
use crate::key::PageKey;
use crate::render::{ExecutableTemplate, RawMarkup, RenderRequest, RenderStrategy};
use crate::source::PageSource;

/// Cache bucket holding extracted pages.
pub const CACHE_BUCKET: &str = "static-pages";

/// Settings for [`ContentLoader`].
#[derive(Clone, Debug, Default)]
pub struct LoaderConfig {
    /// Base directory of all page files.
    pub root_folder: PathBuf,
    /// Selector for the content element; empty disables extraction.
    pub content_selector: String,
    /// Dynamic page settings.
    pub dynamic_pages: DynamicPagesConfig,
}

impl LoaderConfig {
    /// Take loader settings from a loaded [`Config`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            root_folder: config.root_folder_resolved.clone(),
            content_selector: config.content_selector.clone(),
            dynamic_pages: config.dynamic_pages_resolved.clone(),
        }
    }
}

/// Loads, extracts and caches static pages.
pub struct ContentLoader {
    root_folder: PathBuf,
    page_groups: PageGroups,
    extractor: ContentExtractor,
    bucket: Box<dyn CacheBucket>,
    source: Arc<dyn PageSource>,
    raw: RawMarkup,
    /// Present only when dynamic pages are enabled.
    template: Option<ExecutableTemplate>,
    dynamic_extension: String,
}

impl ContentLoader {
    /// Create a loader.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the content selector cannot be parsed.
    pub fn new(
        config: LoaderConfig,
        page_groups: PageGroups,
        source: Arc<dyn PageSource>,
        cache: &dyn Cache,
    ) -> Result<Self, SelectorError> {
        let extractor = ContentExtractor::new(&config.content_selector)?;
        if !extractor.is_enabled() {
            tracing::debug!("No content selector configured, pages are returned unextracted");
        }
        let template = config
            .dynamic_pages
            .enabled
            .then(|| ExecutableTemplate::new(Arc::clone(&source), config.dynamic_pages.include_dirs));

        Ok(Self {
            root_folder: config.root_folder,
            page_groups,
            extractor,
            bucket: cache.bucket(CACHE_BUCKET),
            raw: RawMarkup::new(Arc::clone(&source)),
            source,
            template,
            dynamic_extension: config.dynamic_pages.extension,
        })
    }

    /// Create a loader from a loaded [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the content selector cannot be parsed.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn PageSource>,
        cache: &dyn Cache,
    ) -> Result<Self, SelectorError> {
        Self::new(
            LoaderConfig::from_config(config),
            config.page_groups.clone(),
            source,
            cache,
        )
    }

    /// Load the page stored under `key` (`group%name`).
    ///
    /// # Errors
    ///
    /// - [`LoadError::MalformedKey`] if `key` has no separator
    /// - [`LoadError::PageNotFound`] if the group or page is not configured
    /// - [`LoadError::FileNotFound`] if the page file does not exist
    /// - [`LoadError::Io`] / [`LoadError::Template`] if rendering fails
    pub fn load(&self, key: &str) -> Result<Extraction, LoadError> {
        if self.bucket.has(key) {
            if let Some(cached) = self.bucket.get_json::<Extraction>(key) {
                tracing::debug!(key = %key, "Static page cache hit");
                return Ok(cached);
            }
            tracing::warn!(key = %key, "Unreadable static page cache entry, rendering again");
        }

        let page_key = PageKey::parse(key)?;
        let path = self.resolve(&page_key)?;

        tracing::debug!(key = %key, path = %path.display(), "Rendering static page");
        let markup = self.strategy_for(&path).render(&RenderRequest {
            key: &page_key,
            path: &path,
        })?;
        let extraction = self.extractor.extract(&markup);

        self.bucket.set_json(key, &extraction);
        Ok(extraction)
    }

    /// Pages of `group` available for `dimensions`, in declaration order.
    #[must_use]
    pub fn page_group(&self, group: &str, dimensions: &RuntimeDimensions) -> Vec<PageOption> {
        filter_page_group(&self.page_groups, group, dimensions)
    }

    fn resolve(&self, key: &PageKey) -> Result<PathBuf, LoadError> {
        let page = self
            .page_groups
            .get(key.group())
            .and_then(|pages| pages.get(key.name()))
            .ok_or_else(|| LoadError::PageNotFound(key.to_string()))?;

        // Only normal components are joined, so the result stays under the
        // root folder even for an absolute or `..`-bearing `file`.
        let path = page
            .file
            .components()
            .fold(self.root_folder.clone(), |mut path, component| {
                if let Component::Normal(part) = component {
                    path.push(part);
                }
                path
            });
        if !self.source.is_file(&path) {
            return Err(LoadError::FileNotFound(path));
        }
        Ok(path)
    }

    fn is_dynamic(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.dynamic_extension))
    }

    fn strategy_for(&self, path: &Path) -> &dyn RenderStrategy {
        if !self.is_dynamic(path) {
            return &self.raw;
        }
        match &self.template {
            Some(template) => template,
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "Dynamic pages are disabled, reading template as raw markup"
                );
                &self.raw
            }
        }
    }
}
