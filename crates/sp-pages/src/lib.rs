//! Static page fragment loading for embedding applications.
//!
//! Pages are HTML (or minijinja template) files grouped in configuration.
//! This crate provides:
//! - [`ContentLoader`]: resolve a `group%name` key, render the file, extract
//!   stylesheets, scripts and content, and cache the result
//! - [`passes`]: runtime dimension matching for page constraints
//! - [`PageGroupProvider`] / [`FragmentAccessor`]: adapters for page pickers
//!   and template expressions
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use sp_cache::MemoryCache;
//! use sp_config::Config;
//! use sp_pages::{ContentLoader, FragmentAccessor, FsSource};
//!
//! let config = Config::load(None, None)?;
//! let cache = MemoryCache::new();
//! let loader = Arc::new(ContentLoader::from_config(&config, Arc::new(FsSource), &cache)?);
//!
//! let accessor = FragmentAccessor::new(Arc::clone(&loader));
//! let body = accessor.content("landing%home")?;
//! # Ok(())
//! # }
//! ```

mod adapters;
mod dimensions;
mod error;
mod extract;
mod group;
mod key;
mod loader;
mod render;
mod source;

pub use adapters::{FragmentAccessor, FragmentKind, PageGroupProvider, UnknownFragment};
pub use dimensions::{DimensionValue, RuntimeDimensions, passes};
pub use error::LoadError;
pub use extract::{ContentExtractor, Extraction, FragmentRecord, SelectorError};
pub use group::{DEFAULT_LABEL, PageOption, filter_page_group};
pub use key::{PageKey, SEPARATOR};
pub use loader::{CACHE_BUCKET, ContentLoader, LoaderConfig};
pub use render::{ExecutableTemplate, RawMarkup, RenderRequest, RenderStrategy};
#[cfg(any(test, feature = "mock"))]
pub use source::MockSource;
pub use source::{FsSource, PageSource};
