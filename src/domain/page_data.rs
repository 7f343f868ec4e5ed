//! Page data model handed to the template renderer.
//!
//! Field names serialize in camelCase because the consumer is a JavaScript
//! template engine; `ts-rs` exports matching TypeScript declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Blog-wide information plus the page-level facts discovered while extracting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BlogInfo {
    pub title: String,
    pub homepage_url: Option<String>,
    pub current_url: String,
    pub page_title: String,
    /// Archive or label name; never set together with `search_query`.
    pub page_name: Option<String>,
    pub search_query: Option<String>,
    pub description: Option<String>,
}

impl BlogInfo {
    /// Minimal info used when nothing beyond the document itself can be read.
    pub fn minimal(document_title: &str, current_url: &str) -> Self {
        Self {
            title: document_title.to_string(),
            homepage_url: None,
            current_url: current_url.to_string(),
            page_title: document_title.to_string(),
            page_name: None,
            search_query: None,
            description: None,
        }
    }

    /// Merge an extractor's partial update.
    pub fn apply(&mut self, update: BlogInfoUpdate) {
        if let Some(page_title) = update.page_title {
            self.page_title = page_title;
        }
        if update.page_name.is_some() {
            self.page_name = update.page_name;
            self.search_query = None;
        } else if update.search_query.is_some() {
            self.search_query = update.search_query;
            self.page_name = None;
        }
    }
}

/// Partial `BlogInfo` record returned by extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogInfoUpdate {
    pub page_title: Option<String>,
    pub page_name: Option<String>,
    pub search_query: Option<String>,
}

impl BlogInfoUpdate {
    pub fn with_page_title(title: impl Into<String>) -> Self {
        Self {
            page_title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Label {
    pub name: String,
    pub url: Option<String>,
}

impl Label {
    /// Build a label, rejecting blank names.
    pub fn new(name: &str, url: Option<String>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            url: url.filter(|u| !u.is_empty()),
        })
    }
}

/// One post, either a list-table row or the single item of an item page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: Option<String>,
    pub title: String,
    pub url: String,
    pub published_iso: String,
    pub published_formatted: String,
    pub author: String,
    pub labels: Vec<Label>,
    pub snippet: String,
    pub first_image_url: Option<String>,
    /// Only populated on item pages.
    pub body_html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StaticPageEntry {
    pub page_id: Option<String>,
    pub title: String,
    pub url: String,
    pub body_html: String,
}

/// Payload of error, unknown and parsing_error pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageNotice {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub diagnostic: Option<String>,
}

impl PageNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

/// Page classification tag.
///
/// `Index` is the unrefined list kind; it survives into the result only when
/// the heading matched neither a search nor a label pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Homepage,
    Archive,
    Label,
    Search,
    Index,
    Item,
    StaticPage,
    Error,
    Unknown,
    ParsingError,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Archive => "archive",
            Self::Label => "label",
            Self::Search => "search",
            Self::Index => "index",
            Self::Item => "item",
            Self::StaticPage => "static_page",
            Self::Error => "error",
            Self::Unknown => "unknown",
            Self::ParsingError => "parsing_error",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum Page {
    Posts(Vec<Post>),
    Item(Post),
    StaticPage(StaticPageEntry),
    Notice(PageNotice),
}

impl Page {
    /// Title carried by the payload, if it has one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Posts(_) => None,
            Self::Item(post) => Some(post.title.as_str()),
            Self::StaticPage(entry) => Some(entry.title.as_str()),
            Self::Notice(notice) => Some(notice.title.as_str()),
        }
    }

    pub fn posts(&self) -> Option<&[Post]> {
        match self {
            Self::Posts(posts) => Some(posts),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Post> {
        match self {
            Self::Item(post) => Some(post),
            _ => None,
        }
    }

    pub fn as_notice(&self) -> Option<&PageNotice> {
        match self {
            Self::Notice(notice) => Some(notice),
            _ => None,
        }
    }
}

/// The single value produced per page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub blog: BlogInfo,
    pub page_type: PageKind,
    pub page: Page,
}
