//! Single post and static page extractors
//!
//! Both read a page that describes exactly one entry. A missing container is
//! not an error: the extractor reports no payload and the page is treated as
//! unknown.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::ParsingConfig;
use super::context::ExtractContext;
use super::tree_query::{TreeQuery, attr_of, element_text};
use super::{ContextualExtractor, Extraction, ParsingResult};
use crate::domain::page_data::{BlogInfoUpdate, Label, Page, PageKind, Post, StaticPageEntry};

const POST_BODY_ID_PREFIX: &str = "neo-post-body-";
const PAGE_CONTENT_ID_PREFIX: &str = "neo-page-content-";

/// Id of a content element with the theme prefix removed
fn content_id(element: Option<ElementRef<'_>>, prefix: &str) -> Option<String> {
    element
        .and_then(|e| attr_of(&e, "id"))
        .map(|id| id.replacen(prefix, "", 1))
        .filter(|id| !id.is_empty())
}

/// Extractor for a single post page
#[derive(Debug, Clone)]
pub struct ItemPageExtractor {
    article: Selector,
    headline: Selector,
    body: Selector,
    published: Selector,
    labels: Selector,
    author: Selector,
    body_image: Selector,
}

impl ItemPageExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            article: markup.item_article,
            headline: markup.item_headline,
            body: markup.item_body,
            published: markup.item_published,
            labels: markup.item_labels,
            author: markup.item_author,
            body_image: markup.body_image,
        })
    }

    fn extract_labels(&self, article: ElementRef<'_>, context: &ExtractContext) -> Vec<Label> {
        article
            .query_all(&self.labels)
            .into_iter()
            .filter_map(|link| {
                let url = attr_of(&link, "href").and_then(|href| context.resolve(&href));
                Label::new(&element_text(&link), url)
            })
            .collect()
    }
}

impl ContextualExtractor for ItemPageExtractor {
    type Output = Extraction;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        let Some(article) = html.query_one(&self.article) else {
            debug!("Item article marker not found");
            return Ok(Extraction::missing(PageKind::Item));
        };

        let body = article.query_one(&self.body);
        let published = article.query_one(&self.published);

        let post = Post {
            post_id: content_id(body, POST_BODY_ID_PREFIX).or_else(|| attr_of(&article, "id")),
            title: article
                .text_of(&self.headline)
                .unwrap_or_else(|| context.document_title.clone()),
            url: context.current_url.clone(),
            published_iso: published
                .and_then(|time| attr_of(&time, "datetime"))
                .unwrap_or_default(),
            published_formatted: published.map(|time| element_text(&time)).unwrap_or_default(),
            author: article.text_of(&self.author).unwrap_or_default(),
            labels: self.extract_labels(article, context),
            snippet: String::new(),
            first_image_url: body
                .and_then(|b| b.query_one(&self.body_image))
                .and_then(|img| attr_of(&img, "src"))
                .and_then(|src| context.resolve(&src)),
            body_html: Some(body.map(|b| b.inner_html()).unwrap_or_default()),
        };

        debug!(
            "Item page '{}' with {} labels",
            post.title,
            post.labels.len()
        );
        let update = BlogInfoUpdate::with_page_title(post.title.clone());
        Ok(Extraction::new(PageKind::Item, Page::Item(post), update))
    }
}

/// Extractor for custom (static) pages
#[derive(Debug, Clone)]
pub struct StaticPageExtractor {
    container: Selector,
    title: Selector,
    content: Selector,
}

impl StaticPageExtractor {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let markup = config.markup.compile()?;
        Ok(Self {
            container: markup.static_page_container,
            title: markup.static_title,
            content: markup.static_content,
        })
    }
}

impl ContextualExtractor for StaticPageExtractor {
    type Output = Extraction;
    type Context = ExtractContext;

    fn extract_with_context(
        &self,
        html: &Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output> {
        let Some(page) = html.query_one(&self.container) else {
            debug!("Static page container not found");
            return Ok(Extraction::missing(PageKind::StaticPage));
        };

        let content = page.query_one(&self.content);
        let entry = StaticPageEntry {
            page_id: content_id(content, PAGE_CONTENT_ID_PREFIX).or_else(|| attr_of(&page, "id")),
            title: page
                .text_of(&self.title)
                .unwrap_or_else(|| context.document_title.clone()),
            url: context.current_url.clone(),
            body_html: content.map(|c| c.inner_html()).unwrap_or_default(),
        };

        let update = BlogInfoUpdate::with_page_title(entry.title.clone());
        Ok(Extraction::new(PageKind::StaticPage, Page::StaticPage(entry), update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://blog.example.com/2024/01/hello.html";

    fn parse(body: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head><title>Doc Title</title></head><body>{body}</body></html>"
        ))
    }

    fn item(body: &str) -> Extraction {
        let context = ExtractContext::new(PageKind::Item, URL, "Doc Title");
        ItemPageExtractor::new()
            .unwrap()
            .extract_with_context(&parse(body), &context)
            .unwrap()
    }

    fn static_page(body: &str) -> Extraction {
        let context = ExtractContext::new(PageKind::StaticPage, URL, "Doc Title");
        StaticPageExtractor::new()
            .unwrap()
            .extract_with_context(&parse(body), &context)
            .unwrap()
    }

    const ARTICLE: &str = r#"
        <article class="neo-post" itemscope id="post-7">
          <h1 itemprop="headline"> Hello World </h1>
          <span class="post-author">Budi</span>
          <time itemprop="datePublished" datetime="2024-01-01T00:00:00Z">January 1, 2024</time>
          <div class="neo-post-labels">
            <a itemprop="keywords" href="/search/label/Rust">Rust</a>
            <a itemprop="keywords" href="https://blog.example.com/search/label/Web">Web</a>
            <a itemprop="keywords" href="/search/label/blank"> </a>
          </div>
          <div itemprop="articleBody" id="neo-post-body-12345"><p>Hi</p><img src="/img/a.png"></div>
        </article>"#;

    #[test]
    fn test_item_page_fields() {
        let extraction = item(ARTICLE);
        assert_eq!(extraction.kind, PageKind::Item);
        assert_eq!(extraction.update.page_title.as_deref(), Some("Hello World"));

        let page = extraction.page.unwrap();
        let post = page.as_item().unwrap();
        assert_eq!(post.post_id.as_deref(), Some("12345"));
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.url, URL);
        assert_eq!(post.published_iso, "2024-01-01T00:00:00Z");
        assert_eq!(post.published_formatted, "January 1, 2024");
        assert_eq!(post.author, "Budi");
        assert_eq!(post.snippet, "");
        assert_eq!(
            post.first_image_url.as_deref(),
            Some("https://blog.example.com/img/a.png")
        );
        assert!(post.body_html.as_deref().unwrap().contains("<p>Hi</p>"));

        let names: Vec<_> = post.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Web"]);
        assert_eq!(
            post.labels[0].url.as_deref(),
            Some("https://blog.example.com/search/label/Rust")
        );
    }

    #[test]
    fn test_item_without_body_id_uses_article_id_and_document_title() {
        let extraction = item(r#"<article class="neo-post" itemscope id="post-7"><p>x</p></article>"#);
        let page = extraction.page.unwrap();
        let post = page.as_item().unwrap();
        assert_eq!(post.post_id.as_deref(), Some("post-7"));
        assert_eq!(post.title, "Doc Title");
        assert_eq!(post.published_iso, "");
        assert_eq!(post.body_html.as_deref(), Some(""));
        assert!(post.labels.is_empty());
    }

    #[test]
    fn test_item_without_article_has_no_payload() {
        let extraction = item(r#"<article class="neo-post"><h1>No itemscope</h1></article>"#);
        assert_eq!(extraction.page, None);
        assert_eq!(extraction.update, BlogInfoUpdate::default());
    }

    #[test]
    fn test_static_page_fields() {
        let extraction = static_page(
            r#"<div class="neo-custom-page" id="page-box">
                 <h1 class="neo-page-title">About</h1>
                 <div class="neo-page-content" id="neo-page-content-42"><p>About me</p></div>
               </div>"#,
        );
        assert_eq!(extraction.kind, PageKind::StaticPage);
        let page = extraction.page.unwrap();
        let Page::StaticPage(entry) = page else {
            panic!("expected static page payload");
        };
        assert_eq!(entry.page_id.as_deref(), Some("42"));
        assert_eq!(entry.title, "About");
        assert_eq!(entry.url, URL);
        assert_eq!(entry.body_html, "<p>About me</p>");
    }

    #[test]
    fn test_static_page_fallbacks() {
        let extraction = static_page(r#"<div class="neo-custom-page" id="page-box"></div>"#);
        let Some(Page::StaticPage(entry)) = extraction.page else {
            panic!("expected static page payload");
        };
        assert_eq!(entry.page_id.as_deref(), Some("page-box"));
        assert_eq!(entry.title, "Doc Title");
        assert_eq!(entry.body_html, "");

        assert_eq!(static_page("<p>plain</p>").page, None);
    }
}
