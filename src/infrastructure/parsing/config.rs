//! Parsing configuration for page data extraction
//!
//! Centralized configuration for the markup contract: CSS selectors, locale
//! title patterns and placeholder texts. Everything here is data so that new
//! theme variants or locales are added without touching extractor code.

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::{ParsingError, ParsingResult};
use crate::domain::page_data::PageKind;

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Selectors describing where the theme puts its data
    pub markup: MarkupSelectors,

    /// Locale-tolerant list heading patterns
    pub title_patterns: Vec<TitlePatternEntry>,

    /// Locales consulted by the title matcher, in no particular order
    pub enabled_locales: Vec<String>,

    /// Post table layout and placeholder detection
    pub table: PostTableConfig,

    /// Phrases (regex alternatives) that mark a "not found" status message
    pub not_found_phrases: Vec<String>,

    /// Fixed texts used when markup is missing
    pub fallback_text: FallbackText,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            markup: MarkupSelectors::default(),
            title_patterns: default_title_patterns(),
            enabled_locales: vec!["en".to_string(), "id".to_string()],
            table: PostTableConfig::default(),
            not_found_phrases: vec![
                "tidak dapat menemukan".to_string(),
                "could not find".to_string(),
                "not found".to_string(),
            ],
            fallback_text: FallbackText::default(),
        }
    }
}

impl ParsingConfig {
    /// Compile every selector and pattern once, failing on the first invalid one.
    pub fn validate(&self) -> ParsingResult<()> {
        self.markup.compile()?;
        for entry in &self.title_patterns {
            entry.compile()?;
        }
        self.table.compile()?;
        compile_phrase_set("not_found_phrases", &self.not_found_phrases)?;
        Ok(())
    }
}

/// CSS selectors for the neo-data-provider markup contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSelectors {
    /// Site header link carrying the blog title and homepage URL
    pub site_title_link: String,
    pub meta_description: String,

    /// Page kind container markers
    pub homepage_container: String,
    pub item_article: String,
    pub static_page_container: String,
    pub archive_container: String,
    pub index_container: String,
    pub error_container: String,
    pub unknown_container: String,

    /// Post list table (searched within the list container when present)
    pub post_table: String,
    pub list_heading: String,

    /// Item page
    pub item_headline: String,
    pub item_body: String,
    pub item_published: String,
    pub item_labels: String,
    pub item_author: String,
    pub body_image: String,

    /// Static page
    pub static_title: String,
    pub static_content: String,

    /// Error and unknown pages
    pub notice_heading: String,
    pub notice_message: String,
    pub status_wrap: String,
    pub status_title: String,
    pub status_body: String,
    pub status_message: String,
}

impl Default for MarkupSelectors {
    fn default() -> Self {
        Self {
            site_title_link: "header.neo-site-header h1 a".to_string(),
            meta_description: "meta[name='description']".to_string(),

            homepage_container: "div.neo-homepage-data".to_string(),
            item_article: "article.neo-post[itemscope]".to_string(),
            static_page_container: "div.neo-custom-page".to_string(),
            archive_container: "div.neo-archive-data".to_string(),
            index_container: "div.neo-index-data".to_string(),
            error_container: "div.neo-error-page".to_string(),
            unknown_container: "div.neo-unknown-page".to_string(),

            post_table: "#neo-data-table-posts".to_string(),
            list_heading: "h2".to_string(),

            item_headline: "h1[itemprop='headline']".to_string(),
            item_body: "div[itemprop='articleBody']".to_string(),
            item_published: "time[itemprop='datePublished']".to_string(),
            item_labels: ".neo-post-labels a[itemprop='keywords']".to_string(),
            item_author: "[itemprop='author'], .post-author".to_string(),
            body_image: "img[src]".to_string(),

            static_title: "h1.neo-page-title".to_string(),
            static_content: "div.neo-page-content".to_string(),

            notice_heading: "h1".to_string(),
            notice_message: "p".to_string(),
            status_wrap: ".status-msg-wrap".to_string(),
            status_title: ".status-msg-title".to_string(),
            status_body: ".status-msg-body".to_string(),
            status_message: ".status-msg-wrap .status-msg-body".to_string(),
        }
    }
}

/// Compiled form of [`MarkupSelectors`]
#[derive(Debug, Clone)]
pub struct CompiledMarkup {
    pub site_title_link: Selector,
    pub meta_description: Selector,
    pub homepage_container: Selector,
    pub item_article: Selector,
    pub static_page_container: Selector,
    pub archive_container: Selector,
    pub index_container: Selector,
    pub error_container: Selector,
    pub unknown_container: Selector,
    pub post_table: Selector,
    pub list_heading: Selector,
    pub item_headline: Selector,
    pub item_body: Selector,
    pub item_published: Selector,
    pub item_labels: Selector,
    pub item_author: Selector,
    pub body_image: Selector,
    pub static_title: Selector,
    pub static_content: Selector,
    pub notice_heading: Selector,
    pub notice_message: Selector,
    pub status_wrap: Selector,
    pub status_title: Selector,
    pub status_body: Selector,
    pub status_message: Selector,
}

impl MarkupSelectors {
    pub fn compile(&self) -> ParsingResult<CompiledMarkup> {
        Ok(CompiledMarkup {
            site_title_link: compile_selector("site_title_link", &self.site_title_link)?,
            meta_description: compile_selector("meta_description", &self.meta_description)?,
            homepage_container: compile_selector("homepage_container", &self.homepage_container)?,
            item_article: compile_selector("item_article", &self.item_article)?,
            static_page_container: compile_selector(
                "static_page_container",
                &self.static_page_container,
            )?,
            archive_container: compile_selector("archive_container", &self.archive_container)?,
            index_container: compile_selector("index_container", &self.index_container)?,
            error_container: compile_selector("error_container", &self.error_container)?,
            unknown_container: compile_selector("unknown_container", &self.unknown_container)?,
            post_table: compile_selector("post_table", &self.post_table)?,
            list_heading: compile_selector("list_heading", &self.list_heading)?,
            item_headline: compile_selector("item_headline", &self.item_headline)?,
            item_body: compile_selector("item_body", &self.item_body)?,
            item_published: compile_selector("item_published", &self.item_published)?,
            item_labels: compile_selector("item_labels", &self.item_labels)?,
            item_author: compile_selector("item_author", &self.item_author)?,
            body_image: compile_selector("body_image", &self.body_image)?,
            static_title: compile_selector("static_title", &self.static_title)?,
            static_content: compile_selector("static_content", &self.static_content)?,
            notice_heading: compile_selector("notice_heading", &self.notice_heading)?,
            notice_message: compile_selector("notice_message", &self.notice_message)?,
            status_wrap: compile_selector("status_wrap", &self.status_wrap)?,
            status_title: compile_selector("status_title", &self.status_title)?,
            status_body: compile_selector("status_body", &self.status_body)?,
            status_message: compile_selector("status_message", &self.status_message)?,
        })
    }
}

/// One `(locale, subtype, pattern)` row of the title pattern table.
///
/// The pattern must define a named capture group `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlePatternEntry {
    pub locale: String,
    pub subtype: PageKind,
    pub pattern: String,
}

impl TitlePatternEntry {
    pub fn new(locale: &str, subtype: PageKind, pattern: &str) -> Self {
        Self {
            locale: locale.to_string(),
            subtype,
            pattern: pattern.to_string(),
        }
    }

    pub fn compile(&self) -> ParsingResult<Regex> {
        if !matches!(
            self.subtype,
            PageKind::Archive | PageKind::Search | PageKind::Label
        ) {
            return Err(ParsingError::invalid_pattern(
                &self.locale,
                self.subtype.as_str(),
                "subtype must be archive, search or label",
            ));
        }
        let regex = Regex::new(&self.pattern).map_err(|e| {
            ParsingError::invalid_pattern(&self.locale, self.subtype.as_str(), e)
        })?;
        if !regex.capture_names().flatten().any(|name| name == "value") {
            return Err(ParsingError::invalid_pattern(
                &self.locale,
                self.subtype.as_str(),
                "pattern has no named capture group 'value'",
            ));
        }
        Ok(regex)
    }
}

fn default_title_patterns() -> Vec<TitlePatternEntry> {
    vec![
        TitlePatternEntry::new(
            "en",
            PageKind::Archive,
            r"(?i)^Archive:\s*(?P<value>.*?)(?:\s*-\s*Post Data)?$",
        ),
        TitlePatternEntry::new(
            "id",
            PageKind::Archive,
            r"(?i)^Arsip:\s*(?P<value>.*?)(?:\s*-\s*Post Data)?$",
        ),
        TitlePatternEntry::new(
            "en",
            PageKind::Search,
            r#"(?i)^Search Results:\s*"?(?P<value>.*?)"?(?:\s*-\s*Post Data)?$"#,
        ),
        TitlePatternEntry::new(
            "id",
            PageKind::Search,
            r#"(?i)^Hasil Penelusuran:\s*"?(?P<value>.*?)"?(?:\s*-\s*Post Data)?$"#,
        ),
        TitlePatternEntry::new(
            "en",
            PageKind::Label,
            r"(?i)^Label:\s*(?P<value>.*?)(?:\s*-\s*Post Data)?$",
        ),
    ]
}

/// Post table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostTableConfig {
    pub row: String,
    pub cell: String,
    /// Number of cells in a well-formed row
    pub column_count: usize,
    pub time_marker: String,
    pub label_item: String,
    pub label_link: String,
    pub row_id_attribute: String,
    pub label_name_attribute: String,
    pub label_url_attribute: String,
    /// Full-text patterns meaning "this post has no image"
    pub no_image_patterns: Vec<String>,
    /// Prefixes of generated placeholder image texts
    pub placeholder_prefixes: Vec<String>,
}

impl Default for PostTableConfig {
    fn default() -> Self {
        Self {
            row: "tbody tr".to_string(),
            cell: "td".to_string(),
            column_count: 9,
            time_marker: "time[datetime]".to_string(),
            label_item: "li".to_string(),
            label_link: "a[href]".to_string(),
            row_id_attribute: "data-post-id".to_string(),
            label_name_attribute: "neo-label-name".to_string(),
            label_url_attribute: "data-label-url".to_string(),
            no_image_patterns: vec![
                r"(?i)^\(?No image\)?$".to_string(),
                r"(?i)^\(?Tidak ada gambar\)?$".to_string(),
            ],
            placeholder_prefixes: vec!["Placeholder".to_string()],
        }
    }
}

/// Compiled form of [`PostTableConfig`]
#[derive(Debug, Clone)]
pub struct CompiledTable {
    pub row: Selector,
    pub cell: Selector,
    pub column_count: usize,
    pub time_marker: Selector,
    pub label_item: Selector,
    pub label_link: Selector,
    pub row_id_attribute: String,
    pub label_name_attribute: String,
    pub label_url_attribute: String,
    pub no_image_patterns: Vec<Regex>,
    pub placeholder_prefixes: Vec<String>,
}

impl PostTableConfig {
    pub fn compile(&self) -> ParsingResult<CompiledTable> {
        if self.column_count == 0 {
            return Err(ParsingError::configuration(
                "table.column_count",
                "column count must be positive",
            ));
        }
        let no_image_patterns = self
            .no_image_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ParsingError::invalid_pattern("*", "no_image", e))
            })
            .collect::<ParsingResult<Vec<_>>>()?;

        Ok(CompiledTable {
            row: compile_selector("table.row", &self.row)?,
            cell: compile_selector("table.cell", &self.cell)?,
            column_count: self.column_count,
            time_marker: compile_selector("table.time_marker", &self.time_marker)?,
            label_item: compile_selector("table.label_item", &self.label_item)?,
            label_link: compile_selector("table.label_link", &self.label_link)?,
            row_id_attribute: self.row_id_attribute.clone(),
            label_name_attribute: self.label_name_attribute.clone(),
            label_url_attribute: self.label_url_attribute.clone(),
            no_image_patterns,
            placeholder_prefixes: self.placeholder_prefixes.clone(),
        })
    }
}

/// Texts used when the markup does not provide them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackText {
    pub error_title: String,
    pub error_message: String,
    pub not_found_title: String,
    pub unknown_title: String,
    pub unknown_message: String,
    pub parsing_error_title: String,
    pub parsing_error_message: String,
    pub not_ready_title: String,
    pub not_ready_message: String,
}

impl Default for FallbackText {
    fn default() -> Self {
        Self {
            error_title: "Error".to_string(),
            error_message: "Page not found.".to_string(),
            not_found_title: "Page Not Found".to_string(),
            unknown_title: "Unknown Page Type".to_string(),
            unknown_message: "The type of this page could not be determined.".to_string(),
            parsing_error_title: "Data Parsing Error".to_string(),
            parsing_error_message: "Failed to parse page data from DOM.".to_string(),
            not_ready_title: "Parsing Error".to_string(),
            not_ready_message: "DOM not ready during parse attempt.".to_string(),
        }
    }
}

/// Compile a single selector, naming the config field on failure
pub fn compile_selector(name: &str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ParsingError::invalid_selector(name, selector, e))
}

/// Join phrase alternatives into one case-insensitive regex
pub fn compile_phrase_set(name: &str, phrases: &[String]) -> ParsingResult<Regex> {
    if phrases.is_empty() {
        return Err(ParsingError::configuration(name, "phrase list is empty"));
    }
    let alternatives = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternatives})"))
        .map_err(|e| ParsingError::configuration(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ParsingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported_by_field() {
        let mut config = ParsingConfig::default();
        config.markup.post_table = "#[broken".to_string();
        match config.validate() {
            Err(ParsingError::InvalidSelector { name, .. }) => assert_eq!(name, "post_table"),
            other => panic!("expected invalid selector, got {other:?}"),
        }
    }

    #[test]
    fn test_title_pattern_requires_value_group_and_list_subtype() {
        let entry = TitlePatternEntry::new("fr", PageKind::Archive, r"^Archives:\s*(.*)$");
        assert!(matches!(
            entry.compile(),
            Err(ParsingError::InvalidPattern { .. })
        ));

        let entry = TitlePatternEntry::new("fr", PageKind::Item, r"^(?P<value>.*)$");
        assert!(entry.compile().is_err());

        let entry = TitlePatternEntry::new("fr", PageKind::Archive, r"^Archives:\s*(?P<value>.*)$");
        assert!(entry.compile().is_ok());
    }

    #[test]
    fn test_phrase_set_is_literal_and_case_insensitive() {
        let re = compile_phrase_set("phrases", &["not found".into(), "a.b".into()]).unwrap();
        assert!(re.is_match("Sorry, the page was NOT FOUND"));
        assert!(!re.is_match("axb"));
        assert!(compile_phrase_set("phrases", &[]).is_err());
    }
}
