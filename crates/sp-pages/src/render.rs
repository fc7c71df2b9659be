//! Page rendering strategies.
//!
//! A page file becomes markup in one of two ways:
//!
//! - [`RawMarkup`]: the file already is the markup
//! - [`ExecutableTemplate`]: the file is a minijinja template, so authors can
//!   compose pages with conditionals and includes
//!
//! Templates run in minijinja's sandbox rather than with host privileges.
//! Include lookups go through an explicit search-directory list built for
//! each render (the page's own directory first, then the configured include
//! directories), so nothing about one render leaks into the next.

use std::error::Error as _;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, ErrorKind, context};
use serde::Serialize;

use crate::error::LoadError;
use crate::key::PageKey;
use crate::source::PageSource;

/// Page being rendered.
pub struct RenderRequest<'a> {
    /// Key the page was requested under.
    pub key: &'a PageKey,
    /// Absolute path of the page file.
    pub path: &'a Path,
}

/// Capability turning a page file into markup.
pub trait RenderStrategy: Send + Sync {
    /// Produce the page markup.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read and
    /// [`LoadError::Template`] if a template fails.
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, LoadError>;
}

/// Reads the page file as finished markup.
pub struct RawMarkup {
    source: Arc<dyn PageSource>,
}

impl RawMarkup {
    #[must_use]
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }
}

impl RenderStrategy for RawMarkup {
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, LoadError> {
        self.source.read(request.path).map_err(|source| LoadError::Io {
            path: request.path.to_path_buf(),
            source,
        })
    }
}

/// Renders the page file as a minijinja template.
///
/// The template sees a `page` object with `key`, `group`, `name` and `file`.
pub struct ExecutableTemplate {
    source: Arc<dyn PageSource>,
    include_dirs: Vec<PathBuf>,
}

#[derive(Serialize)]
struct PageContext<'a> {
    key: String,
    group: &'a str,
    name: &'a str,
    file: String,
}

impl ExecutableTemplate {
    /// Create a template strategy searching `include_dirs` after each page's
    /// own directory.
    #[must_use]
    pub fn new(source: Arc<dyn PageSource>, include_dirs: Vec<PathBuf>) -> Self {
        Self {
            source,
            include_dirs,
        }
    }

    fn search_dirs(&self, page: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.include_dirs.len() + 1);
        if let Some(parent) = page.parent() {
            dirs.push(parent.to_path_buf());
        }
        dirs.extend(self.include_dirs.iter().cloned());
        dirs
    }
}

impl RenderStrategy for ExecutableTemplate {
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, LoadError> {
        let path = request.path;
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(LoadError::Template {
                path: path.to_path_buf(),
                message: "page file name is not valid UTF-8".to_owned(),
            });
        };

        let mut env = Environment::new();
        env.set_loader(search_path_loader(
            Arc::clone(&self.source),
            self.search_dirs(path),
        ));

        let page = PageContext {
            key: request.key.to_string(),
            group: request.key.group(),
            name: request.key.name(),
            file: path.display().to_string(),
        };

        env.get_template(name)
            .and_then(|template| template.render(context! { page => page }))
            .map_err(|e| template_error(path, &e))
    }
}

/// Template loader resolving names against `dirs` in order.
///
/// Names that are empty, absolute, or climb with `..` resolve to nothing.
fn search_path_loader(
    source: Arc<dyn PageSource>,
    dirs: Vec<PathBuf>,
) -> impl Fn(&str) -> Result<Option<String>, minijinja::Error> + Send + Sync + 'static {
    move |name| {
        let relative = Path::new(name);
        let contained = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            tracing::warn!(template = %name, "Refusing template name outside search path");
            return Ok(None);
        }

        for dir in &dirs {
            let candidate = dir.join(relative);
            match source.read(&candidate) {
                Ok(text) => return Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(minijinja::Error::new(
                        ErrorKind::InvalidOperation,
                        format!("could not read template {}", candidate.display()),
                    )
                    .with_source(e));
                }
            }
        }
        Ok(None)
    }
}

fn template_error(path: &Path, err: &minijinja::Error) -> LoadError {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        message.push_str(": ");
        message.push_str(&e.to_string());
        cause = e.source();
    }
    LoadError::Template {
        path: path.to_path_buf(),
        message,
    }
}
