//! Configuration management for static pages.
//!
//! Parses `static-pages.toml` with serde and provides auto-discovery of the
//! config file in parent directories. CLI settings can be applied during load
//! via [`CliSettings`].
//!
//! ```toml
//! root_folder = "pages"
//! content_selector = "main"
//!
//! [dynamic_pages]
//! enabled = true
//! include_dirs = ["partials"]
//!
//! [page_groups.landing.home]
//! file = "home.html"
//! label = "Home"
//! icon = "house"
//! dimension_constraints = { language = ["en", "de"] }
//! ```
//!
//! Page groups and the pages inside them keep their declaration order.
//!
//! ## Environment Variable Expansion
//!
//! `root_folder` and `content_selector` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "static-pages.toml";

/// Allowed values per dimension name.
pub type DimensionConstraints = BTreeMap<String, BTreeSet<String>>;

/// Pages of one group, keyed by page name, in declaration order.
pub type PageGroup = IndexMap<String, PageDefinition>;

/// All page groups, keyed by group name, in declaration order.
pub type PageGroups = IndexMap<String, PageGroup>;

/// One configured static page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PageDefinition {
    /// Source file, relative to the root folder.
    ///
    /// Existence is checked when the page is loaded, not here.
    pub file: PathBuf,
    /// Label shown in selection UIs.
    #[serde(default)]
    pub label: Option<String>,
    /// Icon identifier shown in selection UIs.
    #[serde(default)]
    pub icon: Option<String>,
    /// Runtime dimensions this page is restricted to.
    ///
    /// `None` means the page is offered regardless of dimensions.
    #[serde(default)]
    pub dimension_constraints: Option<DimensionConstraints>,
}

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the page root folder.
    pub root_folder: Option<PathBuf>,
    /// Override the content selector.
    pub content_selector: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override dynamic pages enabled flag.
    pub dynamic_pages_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page root folder as written in TOML.
    root_folder: Option<String>,
    /// Structural query locating the page body; empty disables extraction.
    pub content_selector: String,
    /// Dynamic page configuration (paths are relative strings from TOML).
    dynamic_pages: DynamicPagesConfigRaw,
    /// Cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,
    /// Configured page groups.
    pub page_groups: PageGroups,

    /// Resolved absolute root folder (set after loading).
    #[serde(skip)]
    pub root_folder_resolved: PathBuf,
    /// Resolved dynamic page configuration (set after loading).
    #[serde(skip)]
    pub dynamic_pages_resolved: DynamicPagesConfig,
    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DynamicPagesConfigRaw {
    enabled: Option<bool>,
    extension: Option<String>,
    include_dirs: Option<Vec<String>>,
}

/// Resolved dynamic page configuration.
///
/// Dynamic pages are templates executed on load. They are off unless the
/// config enables them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicPagesConfig {
    /// Whether files with [`extension`](Self::extension) are executed.
    pub enabled: bool,
    /// File extension (without dot, compared case-insensitively).
    pub extension: String,
    /// Extra template search directories, after the page's own directory.
    pub include_dirs: Vec<PathBuf>,
}

impl Default for DynamicPagesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            extension: "jinja".to_owned(),
            include_dirs: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether rendered fragments are cached.
    pub enabled: bool,
    /// Cache directory.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`root_folder`").
        field: String,
        /// Error message (e.g., "${`PAGES_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `static-pages.toml` in the current directory and its parents, and
    /// falls back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion, or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root_folder) = &settings.root_folder {
            self.root_folder_resolved.clone_from(root_folder);
        }
        if let Some(selector) = &settings.content_selector {
            self.content_selector.clone_from(selector);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(dynamic_enabled) = settings.dynamic_pages_enabled {
            self.dynamic_pages_resolved.enabled = dynamic_enabled;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            root_folder: None,
            content_selector: String::new(),
            dynamic_pages: DynamicPagesConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            page_groups: PageGroups::new(),
            root_folder_resolved: base.join("pages"),
            dynamic_pages_resolved: DynamicPagesConfig::default(),
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(".static-pages").join("cache"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Page files are not checked for existence; a missing file surfaces when
    /// the page is loaded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_dynamic_pages()?;
        self.validate_page_groups()?;
        Ok(())
    }

    fn validate_dynamic_pages(&self) -> Result<(), ConfigError> {
        let extension = &self.dynamic_pages_resolved.extension;
        if extension.is_empty() {
            return Err(ConfigError::Validation(
                "dynamic_pages.extension cannot be empty".to_owned(),
            ));
        }
        if extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "dynamic_pages.extension must not start with a dot (got \"{extension}\")"
            )));
        }
        Ok(())
    }

    fn validate_page_groups(&self) -> Result<(), ConfigError> {
        for (group, pages) in &self.page_groups {
            for (name, page) in pages {
                let field = format!("page_groups.{group}.{name}");
                if page.file.as_os_str().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{field}.file cannot be empty"
                    )));
                }
                let contained = page
                    .file
                    .components()
                    .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
                if !contained {
                    return Err(ConfigError::Validation(format!(
                        "{field}.file must be a path inside root_folder (got \"{}\")",
                        page.file.display()
                    )));
                }
                for (dimension, allowed) in page.dimension_constraints.iter().flatten() {
                    if allowed.is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "{field}.dimension_constraints.{dimension} needs at least one value"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.root_folder {
            self.root_folder = Some(expand::expand_env(root, "root_folder")?);
        }
        self.content_selector = expand::expand_env(&self.content_selector, "content_selector")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.root_folder_resolved = resolve(self.root_folder.as_deref(), "pages");

        let defaults = DynamicPagesConfig::default();
        self.dynamic_pages_resolved = DynamicPagesConfig {
            enabled: self.dynamic_pages.enabled.unwrap_or(defaults.enabled),
            extension: self
                .dynamic_pages
                .extension
                .clone()
                .unwrap_or(defaults.extension),
            include_dirs: self
                .dynamic_pages
                .include_dirs
                .iter()
                .flatten()
                .map(|d| config_dir.join(d))
                .collect(),
        };

        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: resolve(self.cache.dir.as_deref(), ".static-pages/cache"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
root_folder = "site/pages"
content_selector = "main"

[dynamic_pages]
enabled = true
include_dirs = ["partials"]

[page_groups.landing.home]
file = "home.html"
label = "Home"
icon = "house"

[page_groups.landing.promo]
file = "promo.jinja"
dimension_constraints = { language = ["en", "de"] }

[page_groups.landing.about]
file = "about.html"

[page_groups.legal.imprint]
file = "legal/imprint.html"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.root_folder_resolved, PathBuf::from("/test/pages"));
        assert_eq!(config.content_selector, "");
        assert!(config.page_groups.is_empty());
        assert!(!config.dynamic_pages_resolved.enabled);
        assert_eq!(config.dynamic_pages_resolved.extension, "jinja");
        assert!(config.cache_resolved.enabled);
        assert_eq!(
            config.cache_resolved.dir,
            PathBuf::from("/test/.static-pages/cache")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("", Path::new("/project")).unwrap();
        assert_eq!(config.root_folder_resolved, PathBuf::from("/project/pages"));
        assert!(config.page_groups.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(SAMPLE, Path::new("/project")).unwrap();

        assert_eq!(
            config.root_folder_resolved,
            PathBuf::from("/project/site/pages")
        );
        assert_eq!(config.content_selector, "main");
        assert_eq!(
            config.dynamic_pages_resolved,
            DynamicPagesConfig {
                enabled: true,
                extension: "jinja".to_owned(),
                include_dirs: vec![PathBuf::from("/project/partials")],
            }
        );

        let home = &config.page_groups["landing"]["home"];
        assert_eq!(home.file, PathBuf::from("home.html"));
        assert_eq!(home.label.as_deref(), Some("Home"));
        assert_eq!(home.icon.as_deref(), Some("house"));
        assert!(home.dimension_constraints.is_none());

        let promo = &config.page_groups["landing"]["promo"];
        let constraints = promo.dimension_constraints.as_ref().unwrap();
        assert_eq!(
            constraints["language"],
            BTreeSet::from(["de".to_owned(), "en".to_owned()])
        );
    }

    #[test]
    fn test_page_declaration_order_is_preserved() {
        let config = Config::from_toml_str(SAMPLE, Path::new("/project")).unwrap();

        let groups: Vec<&str> = config.page_groups.keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["landing", "legal"]);

        let pages: Vec<&str> = config.page_groups["landing"]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(pages, vec!["home", "promo", "about"]);
    }

    #[test]
    fn test_absolute_root_folder_is_kept() {
        let config =
            Config::from_toml_str("root_folder = \"/srv/pages\"", Path::new("/project")).unwrap();
        assert_eq!(config.root_folder_resolved, PathBuf::from("/srv/pages"));
    }

    #[test]
    fn test_file_outside_root_folder_is_rejected() {
        for file in ["/etc/secret.html", "../secret.html", "pages/../../secret.html"] {
            let toml = format!("[page_groups.landing.home]\nfile = \"{file}\"\n");
            let err = Config::from_toml_str(&toml, Path::new("/project")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation(ref m) if m.contains("page_groups.landing.home.file")),
                "{file} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_nested_relative_file_is_accepted() {
        let toml = "[page_groups.legal.imprint]\nfile = \"./legal/imprint.html\"\n";
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.page_groups["legal"]["imprint"].file,
            PathBuf::from("./legal/imprint.html")
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let toml = r#"
[page_groups.landing.home]
file = ""
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("page_groups.landing.home.file"));
    }

    #[test]
    fn test_missing_file_key_is_parse_error() {
        let toml = r#"
[page_groups.landing.home]
label = "Home"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_empty_constraint_values_are_rejected() {
        let toml = r#"
[page_groups.landing.home]
file = "home.html"
dimension_constraints = { language = [] }
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_dotted_extension_is_rejected() {
        let toml = r#"
[dynamic_pages]
extension = ".tpl"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_cache_section() {
        let toml = r#"
[cache]
enabled = false
dir = "tmp/cache"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.cache_resolved,
            CacheConfig {
                enabled: false,
                dir: PathBuf::from("/project/tmp/cache"),
            }
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::from_toml_str(SAMPLE, Path::new("/project")).unwrap();
        let overrides = CliSettings {
            root_folder: Some(PathBuf::from("/custom/pages")),
            content_selector: Some("#content".to_owned()),
            cache_enabled: Some(false),
            dynamic_pages_enabled: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.root_folder_resolved, PathBuf::from("/custom/pages"));
        assert_eq!(config.content_selector, "#content");
        assert!(!config.cache_resolved.enabled);
        assert!(!config.dynamic_pages_resolved.enabled);
    }

    #[test]
    fn test_apply_empty_cli_settings_changes_nothing() {
        let mut config = Config::from_toml_str(SAMPLE, Path::new("/project")).unwrap();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.content_selector, "main");
        assert!(config.dynamic_pages_resolved.enabled);
        assert!(config.cache_resolved.enabled);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/static-pages.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.root_folder_resolved, tmp.path().join("site/pages"));
    }
}
