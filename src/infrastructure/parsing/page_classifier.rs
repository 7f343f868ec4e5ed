//! Page kind classification
//!
//! The theme marks every page kind with a dedicated container. Markers are
//! checked in a fixed priority order; when none is present the classifier
//! falls back on the post table and the platform's status message block.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::ParsingResult;
use super::config::{ParsingConfig, compile_phrase_set};
use super::context::ExtractContext;
use super::tree_query::TreeQuery;
use crate::domain::page_data::PageKind;

/// Ordered marker checks deciding which extractor runs
#[derive(Debug, Clone)]
pub struct PageClassifier {
    /// `(marker, kind)` in priority order
    markers: Vec<(Selector, PageKind)>,
    post_table: Selector,
    status_message: Selector,
    not_found: Regex,
}

impl PageClassifier {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            markers: vec![
                (markup.homepage_container, PageKind::Homepage),
                (markup.item_article, PageKind::Item),
                (markup.static_page_container, PageKind::StaticPage),
                (markup.archive_container, PageKind::Archive),
                (markup.index_container, PageKind::Index),
                (markup.error_container, PageKind::Error),
                (markup.unknown_container, PageKind::Unknown),
            ],
            post_table: markup.post_table,
            status_message: markup.status_message,
            not_found: compile_phrase_set("not_found_phrases", &config.not_found_phrases)?,
        })
    }

    /// Decide the coarse page kind. Never fails.
    ///
    /// `homepage_url` is the resolved site header link, when one was found.
    pub fn classify(
        &self,
        html: &Html,
        context: &ExtractContext,
        homepage_url: Option<&str>,
    ) -> PageKind {
        if let Some((_, kind)) = self.markers.iter().find(|(marker, _)| html.contains(marker)) {
            debug!("Page kind {} from container marker", kind);
            return *kind;
        }

        let has_table = html.contains(&self.post_table);
        if has_table && homepage_url.is_some_and(|url| context.is_current_url(url)) {
            debug!("No marker; post table on the homepage URL");
            return PageKind::Homepage;
        }
        if has_table {
            debug!("No marker; post table present, treating as index");
            return PageKind::Index;
        }

        if html
            .text_of(&self.status_message)
            .is_some_and(|message| self.not_found.is_match(&message))
        {
            debug!("No marker; status block reports a missing page");
            return PageKind::Error;
        }

        debug!("No marker, table or status block; page kind unknown");
        PageKind::Unknown
    }
}
