//! CLI command implementations.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use sp_cache::{Cache, FileCache, NullCache};
use sp_config::{CliSettings, Config};
use sp_pages::{ContentLoader, FsSource};

use crate::error::CliError;
use crate::output::Output;

pub(crate) mod fragment;
pub(crate) mod pages;

pub(crate) use fragment::FragmentArgs;
pub(crate) use pages::PagesArgs;

/// Cache entries written by another release are discarded.
const CACHE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options shared by all commands.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover static-pages.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Page root folder (overrides config).
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// CSS selector of the content element (overrides config, empty disables extraction).
    #[arg(long, global = true)]
    content_selector: Option<String>,

    /// Disable caching.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Render dynamic page templates (overrides config).
    #[arg(long, global = true)]
    dynamic_pages: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            root_folder: self.root_folder.clone(),
            content_selector: self.content_selector.clone(),
            cache_enabled: self.no_cache.then_some(false),
            dynamic_pages_enabled: self.dynamic_pages.then_some(true),
        }
    }

    /// Load configuration and build a loader over the local filesystem.
    pub(crate) fn open_loader(&self, output: &Output) -> Result<Arc<ContentLoader>, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if config.config_path.is_none() {
            output.warning("No static-pages.toml found, using defaults");
        }

        let cache: Box<dyn Cache> = if config.cache_resolved.enabled {
            tracing::info!(dir = %config.cache_resolved.dir.display(), "Using file cache");
            Box::new(FileCache::new(
                config.cache_resolved.dir.clone(),
                CACHE_VERSION,
            ))
        } else {
            Box::new(NullCache)
        };

        let loader = ContentLoader::from_config(&config, Arc::new(FsSource), cache.as_ref())?;
        Ok(Arc::new(loader))
    }
}
