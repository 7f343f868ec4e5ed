//! Page data extraction from rendered blog markup
//!
//! Trait-based extractors over a parsed `scraper::Html` tree. Every extractor
//! reads one page kind and returns its payload together with the page-level
//! facts it discovered; merging those facts is left to the caller.

pub mod blog_info_extractor;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod item_page_extractor;
pub mod list_page_extractor;
pub mod notice_page_extractor;
pub mod page_classifier;
pub mod post_row_decoder;
pub mod title_patterns;
pub mod tree_query;

// Re-export public types
pub use blog_info_extractor::BlogInfoExtractor;
pub use config::ParsingConfig;
pub use context::ExtractContext;
pub use document::{DocumentSource, PageDocument, ReadyState};
pub use error::{ParsingError, ParsingResult};
pub use item_page_extractor::{ItemPageExtractor, StaticPageExtractor};
pub use list_page_extractor::ListPageExtractor;
pub use notice_page_extractor::{ErrorPageExtractor, UnknownPageExtractor};
pub use page_classifier::PageClassifier;
pub use post_row_decoder::PostRowDecoder;
pub use title_patterns::{TitleMatch, TitlePatternMatcher};

use scraper::Html;

use crate::domain::page_data::{BlogInfoUpdate, Page, PageKind};

/// Extractor trait with context support
pub trait ContextualExtractor {
    type Output;
    type Context;

    /// Extract from the parsed tree with contextual information
    fn extract_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output>;
}

/// What one extractor produced for the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Final kind; list extractors may refine `index` into `label` or `search`
    pub kind: PageKind,
    /// `None` when the kind's required container is missing
    pub page: Option<Page>,
    pub update: BlogInfoUpdate,
}

impl Extraction {
    pub fn new(kind: PageKind, page: Page, update: BlogInfoUpdate) -> Self {
        Self {
            kind,
            page: Some(page),
            update,
        }
    }

    /// No payload for this kind; the caller falls back to the unknown page
    pub fn missing(kind: PageKind) -> Self {
        Self {
            kind,
            page: None,
            update: BlogInfoUpdate::default(),
        }
    }
}
