//! Blog-wide information from the site header and meta tags

use scraper::{Html, Selector};
use tracing::debug;

use super::config::ParsingConfig;
use super::context::ExtractContext;
use super::tree_query::{TreeQuery, attr_of, element_text};
use super::{ContextualExtractor, ParsingResult};
use crate::domain::page_data::BlogInfo;

/// Reads the blog title, homepage link and description
#[derive(Debug, Clone)]
pub struct BlogInfoExtractor {
    site_title_link: Selector,
    meta_description: Selector,
}

impl BlogInfoExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            site_title_link: markup.site_title_link,
            meta_description: markup.meta_description,
        })
    }

    /// Build the initial `BlogInfo`; missing markup leaves document defaults.
    pub fn extract(&self, html: &Html, context: &ExtractContext) -> BlogInfo {
        let mut blog = BlogInfo::minimal(&context.document_title, &context.current_url);

        if let Some(link) = html.query_one(&self.site_title_link) {
            let title = element_text(&link);
            if !title.is_empty() {
                blog.title = title;
            }
            blog.homepage_url = attr_of(&link, "href").and_then(|href| context.resolve(&href));
        } else {
            debug!("Site header link not found; using document title as blog title");
        }

        blog.description = html
            .query_one(&self.meta_description)
            .and_then(|meta| meta.value().attr("content").map(ToString::to_string));

        blog
    }
}

impl ContextualExtractor for BlogInfoExtractor {
    type Output = BlogInfo;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        Ok(self.extract(html, context))
    }
}
