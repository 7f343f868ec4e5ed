//! Error and unknown page extractors
//!
//! Both produce a `PageNotice`. Neither ever lacks a payload: absent markup
//! falls back to the configured texts.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::config::{FallbackText, ParsingConfig, compile_phrase_set};
use super::context::ExtractContext;
use super::tree_query::TreeQuery;
use super::{ContextualExtractor, Extraction, ParsingResult};
use crate::domain::page_data::{BlogInfoUpdate, Page, PageKind, PageNotice};

fn notice_extraction(kind: PageKind, notice: PageNotice) -> Extraction {
    let update = BlogInfoUpdate::with_page_title(notice.title.clone());
    Extraction::new(kind, Page::Notice(notice), update)
}

/// Extractor for error pages: theme container first, platform status block second
///
/// Title precedence:
/// 1. the theme container's own `h1`
/// 2. the not-found title, when the markup message matches a not-found phrase
/// 3. the status block title
/// 4. the configured error title
///
/// The configured default message never triggers the not-found title.
#[derive(Debug, Clone)]
pub struct ErrorPageExtractor {
    container: Selector,
    heading: Selector,
    message: Selector,
    status_wrap: Selector,
    status_title: Selector,
    status_body: Selector,
    not_found: Regex,
    text: FallbackText,
}

impl ErrorPageExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            container: markup.error_container,
            heading: markup.notice_heading,
            message: markup.notice_message,
            status_wrap: markup.status_wrap,
            status_title: markup.status_title,
            status_body: markup.status_body,
            not_found: compile_phrase_set("not_found_phrases", &config.not_found_phrases)?,
            text: config.fallback_text.clone(),
        })
    }
}

impl ContextualExtractor for ErrorPageExtractor {
    type Output = Extraction;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        _context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        // `theme_heading` is Some only when the theme container supplied its own h1
        let (theme_heading, title, message) =
            if let Some(container) = html.query_one(&self.container) {
                (
                    container.text_of(&self.heading),
                    None,
                    container.text_of(&self.message),
                )
            } else if let Some(wrap) = html.query_one(&self.status_wrap) {
                (
                    None,
                    wrap.text_of(&self.status_title),
                    wrap.text_of(&self.status_body),
                )
            } else {
                debug!("Error page without theme container or status block");
                (None, None, None)
            };

        // Only a message read from the markup can mark the page as missing
        let not_found = message
            .as_deref()
            .is_some_and(|message| self.not_found.is_match(message));
        let message = message.unwrap_or_else(|| self.text.error_message.clone());
        let title = match theme_heading {
            Some(heading) => heading,
            None if not_found => self.text.not_found_title.clone(),
            None => title.unwrap_or_else(|| self.text.error_title.clone()),
        };

        Ok(notice_extraction(
            PageKind::Error,
            PageNotice::new(title, message),
        ))
    }
}

/// Extractor for pages the theme marks as unknown, and for every page no
/// other extractor could read
#[derive(Debug, Clone)]
pub struct UnknownPageExtractor {
    container: Selector,
    heading: Selector,
    message: Selector,
    text: FallbackText,
}

impl UnknownPageExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            container: markup.unknown_container,
            heading: markup.notice_heading,
            message: markup.notice_message,
            text: config.fallback_text.clone(),
        })
    }
}

impl ContextualExtractor for UnknownPageExtractor {
    type Output = Extraction;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        _context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        let container = html.query_one(&self.container);
        let title = container
            .and_then(|c| c.text_of(&self.heading))
            .unwrap_or_else(|| self.text.unknown_title.clone());
        let message = container
            .and_then(|c| c.text_of(&self.message))
            .unwrap_or_else(|| self.text.unknown_message.clone());

        Ok(notice_extraction(
            PageKind::Unknown,
            PageNotice::new(title, message),
        ))
    }
}
