//! Fragment extraction from rendered page markup.
//!
//! A rendered page is a full HTML document. Embedding pages only want four
//! slices of it: stylesheet links, head scripts, body scripts and the inner
//! markup of the content element.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// The four markup slices extracted from one page.
///
/// The three asset fields hold the outer markup of each matched element, one
/// per line, in document order. Repeated elements produce repeated lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    /// `<link rel=...>` elements.
    pub stylesheets: String,
    /// `<script src=...>` elements under `<head>`.
    pub head_scripts: String,
    /// `<script src=...>` elements under `<body>`.
    pub body_scripts: String,
    /// Inner markup of the first element matching the content selector.
    pub content: String,
}

/// Result of extraction.
///
/// With no content selector configured, the rendered markup is passed
/// through untouched as [`Extraction::Raw`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Extraction {
    Extracted(FragmentRecord),
    Raw(String),
}

/// Error returned for a selector the HTML query engine cannot parse.
#[derive(Debug, thiserror::Error)]
#[error("Invalid selector \"{selector}\": {message}")]
pub struct SelectorError {
    /// Offending selector.
    pub selector: String,
    /// Parser message.
    pub message: String,
}

fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_owned(),
        message: e.to_string(),
    })
}

/// Splits rendered markup into a [`FragmentRecord`].
pub struct ContentExtractor {
    content: Option<Selector>,
    stylesheets: Selector,
    head_scripts: Selector,
    body_scripts: Selector,
}

impl ContentExtractor {
    /// Create an extractor for `content_selector`.
    ///
    /// An empty (or whitespace-only) selector disables extraction.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if `content_selector` cannot be parsed.
    pub fn new(content_selector: &str) -> Result<Self, SelectorError> {
        let content_selector = content_selector.trim();
        let content = if content_selector.is_empty() {
            None
        } else {
            Some(parse_selector(content_selector)?)
        };

        Ok(Self {
            content,
            stylesheets: parse_selector("link[rel]")?,
            head_scripts: parse_selector("head script[src]")?,
            body_scripts: parse_selector("body script[src]")?,
        })
    }

    /// Whether a content selector is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.content.is_some()
    }

    /// Extract fragments from `markup`.
    ///
    /// A content selector that matches nothing yields an empty `content`.
    #[must_use]
    pub fn extract(&self, markup: &str) -> Extraction {
        let Some(content_selector) = &self.content else {
            return Extraction::Raw(markup.to_owned());
        };

        let document = Html::parse_document(markup);
        let collect = |selector: &Selector| {
            document
                .select(selector)
                .fold(String::new(), |mut out, element| {
                    out.push_str(element.html().trim());
                    out.push('\n');
                    out
                })
        };

        Extraction::Extracted(FragmentRecord {
            stylesheets: collect(&self.stylesheets),
            head_scripts: collect(&self.head_scripts),
            body_scripts: collect(&self.body_scripts),
            content: document
                .select(content_selector)
                .next()
                .map(|element| element.inner_html())
                .unwrap_or_default(),
        })
    }
}
