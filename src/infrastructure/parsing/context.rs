//! Parsing context for page extraction
//!
//! Carries the document-level facts every extractor needs but cannot read
//! from the subtree it walks.

use url::Url;

use crate::domain::page_data::PageKind;

/// Context information for one extraction run
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Kind chosen by the classifier
    pub kind: PageKind,

    /// URL of the page being extracted
    pub current_url: String,

    /// Contents of `<title>`, used when the markup has no heading
    pub document_title: String,

    base: Option<Url>,
}

impl ExtractContext {
    /// Create new extract context
    pub fn new(kind: PageKind, current_url: &str, document_title: &str) -> Self {
        Self {
            kind,
            current_url: current_url.to_string(),
            document_title: document_title.to_string(),
            base: Url::parse(current_url).ok(),
        }
    }

    /// Same document, different kind
    pub fn for_kind(&self, kind: PageKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Resolve an `href`/`src` the way a browser would against the current URL.
    ///
    /// Returns `None` for empty values; unresolvable values are kept verbatim.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        match &self.base {
            Some(base) => Some(
                base.join(href)
                    .map_or_else(|_| href.to_string(), |u| u.to_string()),
            ),
            None => Some(
                Url::parse(href).map_or_else(|_| href.to_string(), |u| u.to_string()),
            ),
        }
    }

    /// Whether the current URL is the given homepage URL
    pub fn is_current_url(&self, other: &str) -> bool {
        match (&self.base, Url::parse(other)) {
            (Some(current), Ok(other)) => *current == other,
            _ => self.current_url == other,
        }
    }
}
