//! List page extractor
//!
//! Homepage, archive and index pages share one layout: a container with a
//! heading and the hidden post table. Index headings are refined into label
//! or search pages through the title pattern table.

use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::config::ParsingConfig;
use super::context::ExtractContext;
use super::post_row_decoder::PostRowDecoder;
use super::title_patterns::{TitleMatch, TitlePatternMatcher};
use super::tree_query::{Scope, TreeQuery};
use super::{ContextualExtractor, Extraction, ParsingError, ParsingResult};
use crate::domain::page_data::{BlogInfoUpdate, Page, PageKind};

/// Extractor for every page whose payload is a list of posts
#[derive(Debug, Clone)]
pub struct ListPageExtractor {
    homepage_container: Selector,
    archive_container: Selector,
    index_container: Selector,
    post_table: Selector,
    list_heading: Selector,
    matcher: TitlePatternMatcher,
    rows: PostRowDecoder,
}

impl ListPageExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            homepage_container: markup.homepage_container,
            archive_container: markup.archive_container,
            index_container: markup.index_container,
            post_table: markup.post_table,
            list_heading: markup.list_heading,
            matcher: TitlePatternMatcher::new(config)?,
            rows: PostRowDecoder::new(&config.table)?,
        })
    }

    fn container_for(&self, kind: PageKind) -> ParsingResult<&Selector> {
        match kind {
            PageKind::Homepage => Ok(&self.homepage_container),
            PageKind::Archive => Ok(&self.archive_container),
            PageKind::Index | PageKind::Label | PageKind::Search => Ok(&self.index_container),
            other => Err(ParsingError::unexpected_page_kind("list", other)),
        }
    }

    /// Coarse kind the title matcher should refine from
    fn coarse_kind(kind: PageKind) -> PageKind {
        match kind {
            PageKind::Label | PageKind::Search => PageKind::Index,
            other => other,
        }
    }
}

impl ContextualExtractor for ListPageExtractor {
    type Output = Extraction;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        let coarse = Self::coarse_kind(context.kind);
        let container = html.query_one(self.container_for(coarse)?);
        let scope = Scope::container_or_document(html, container);

        let heading = if scope.is_document() {
            // Any document-wide heading may belong to the site header
            warn!(
                "Container for {} page not found; reading the post table document-wide",
                coarse
            );
            None
        } else {
            let heading = scope.text_of(&self.list_heading);
            if heading.is_none() {
                warn!("List heading not found in {} container; using document title", coarse);
            }
            heading
        };
        let page_title = heading.unwrap_or_else(|| context.document_title.clone());

        let mut update = BlogInfoUpdate::with_page_title(page_title.clone());
        let resolved = if scope.is_document() {
            TitleMatch {
                kind: coarse,
                value: None,
            }
        } else {
            self.matcher.resolve(&page_title, coarse)
        };
        match resolved.kind {
            PageKind::Archive | PageKind::Label => update.page_name = resolved.value,
            PageKind::Search => update.search_query = resolved.value,
            _ => {}
        }

        let posts = match scope.query_one(&self.post_table) {
            Some(table) => self.rows.decode_table(table, context)?,
            None => {
                debug!("No post table on {} page", coarse);
                Vec::new()
            }
        };
        debug!(
            "List page resolved to {} with {} posts",
            resolved.kind,
            posts.len()
        );

        Ok(Extraction::new(resolved.kind, Page::Posts(posts), update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32) -> String {
        format!(
            r#"<tr><td>{id}</td><td>Post {id}</td><td>https://blog.example.com/p{id}.html</td>
               <td>2024-01-0{id}</td><td>Jan {id}</td><td>Ana</td><td><ul></ul></td>
               <td>Snippet</td><td>https://img.example.com/{id}.png</td></tr>"#
        )
    }

    fn table(rows: &str) -> String {
        format!(r#"<table id="neo-data-table-posts"><tbody>{rows}</tbody></table>"#)
    }

    fn extract(body: &str, kind: PageKind) -> Extraction {
        let html = Html::parse_document(&format!(
            "<html><head><title>Doc Title</title></head><body>{body}</body></html>"
        ));
        let context = ExtractContext::new(kind, "https://blog.example.com/search/label/Travel", "Doc Title");
        ListPageExtractor::new()
            .unwrap()
            .extract_with_context(&html, &context)
            .unwrap()
    }

    #[test]
    fn test_label_page_is_refined_from_heading() {
        let body = format!(
            r#"<div class="neo-index-data"><h2>Label: Travel - Post Data</h2>{}</div>"#,
            table(&format!("{}{}", row(1), row(2)))
        );
        let extraction = extract(&body, PageKind::Index);
        assert_eq!(extraction.kind, PageKind::Label);
        assert_eq!(extraction.update.page_name.as_deref(), Some("Travel"));
        assert_eq!(extraction.update.search_query, None);
        assert_eq!(
            extraction.update.page_title.as_deref(),
            Some("Label: Travel - Post Data")
        );
        let posts = extraction.page.unwrap();
        assert_eq!(posts.posts().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_search_page_sets_query() {
        let body = format!(
            r#"<div class="neo-index-data"><h2>Search Results: "golang" - Post Data</h2>{}</div>"#,
            table("")
        );
        let extraction = extract(&body, PageKind::Index);
        assert_eq!(extraction.kind, PageKind::Search);
        assert_eq!(extraction.update.search_query.as_deref(), Some("golang"));
        assert_eq!(extraction.update.page_name, None);
        assert_eq!(extraction.page, Some(Page::Posts(Vec::new())));
    }

    #[test]
    fn test_unmatched_index_heading_stays_index() {
        let body = format!(r#"<div class="neo-index-data"><h2>Travel Posts</h2>{}</div>"#, table(&row(1)));
        let extraction = extract(&body, PageKind::Index);
        assert_eq!(extraction.kind, PageKind::Index);
        assert_eq!(extraction.update.page_name, None);
        assert_eq!(extraction.update.search_query, None);
    }

    #[test]
    fn test_archive_name_from_heading() {
        let body = format!(
            r#"<div class="neo-archive-data"><h2>Archive: October 2023 - Post Data</h2>{}</div>"#,
            table(&row(3))
        );
        let extraction = extract(&body, PageKind::Archive);
        assert_eq!(extraction.kind, PageKind::Archive);
        assert_eq!(extraction.update.page_name.as_deref(), Some("October 2023"));
    }

    #[test]
    fn test_missing_heading_uses_document_title() {
        let body = format!(r#"<div class="neo-homepage-data">{}</div>"#, table(&row(1)));
        let extraction = extract(&body, PageKind::Homepage);
        assert_eq!(extraction.kind, PageKind::Homepage);
        assert_eq!(extraction.update.page_title.as_deref(), Some("Doc Title"));
    }

    #[test]
    fn test_missing_container_reads_whole_document() {
        let body = format!(
            r#"<header class="neo-site-header"><h1><a href="/">Road Notes</a></h1></header>
               <h2>Label: Ignored</h2>{}"#,
            table(&row(1))
        );
        let extraction = extract(&body, PageKind::Index);
        assert_eq!(extraction.kind, PageKind::Index);
        assert_eq!(extraction.update.page_title.as_deref(), Some("Doc Title"));
        assert_eq!(extraction.update.page_name, None);
        assert_eq!(extraction.page.unwrap().posts().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_table_outside_container_is_not_read() {
        let body = format!(r#"<div class="neo-archive-data"><h2>Arsip: Mei</h2></div>{}"#, table(&row(1)));
        let extraction = extract(&body, PageKind::Archive);
        assert_eq!(extraction.update.page_name.as_deref(), Some("Mei"));
        assert_eq!(extraction.page, Some(Page::Posts(Vec::new())));
    }

    #[test]
    fn test_non_list_kind_is_rejected() {
        let html = Html::parse_document("<p></p>");
        let context = ExtractContext::new(PageKind::Item, "https://b/", "Doc");
        let result = ListPageExtractor::new().unwrap().extract_with_context(&html, &context);
        assert!(matches!(result, Err(ParsingError::UnexpectedPageKind { .. })));
    }
}
