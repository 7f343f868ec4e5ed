//! Page data service
//!
//! Runs the extraction pipeline once per document: readiness check, blog
//! info, classification, one extractor, merge. Every failure inside the
//! pipeline is turned into a `parsing_error` result; nothing escapes
//! [`PageDataService::page_data`].

use anyhow::{Context, Result};
use once_cell::unsync::OnceCell;
use scraper::Html;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::page_data::{BlogInfo, ExtractionResult, Page, PageKind, PageNotice};
use crate::infrastructure::parsing::config::FallbackText;
use crate::infrastructure::parsing::{
    BlogInfoExtractor, ContextualExtractor, DocumentSource, ErrorPageExtractor, ExtractContext,
    Extraction, ItemPageExtractor, ListPageExtractor, PageClassifier, ParsingConfig, ParsingError,
    ParsingResult, StaticPageExtractor, UnknownPageExtractor,
};

const NOT_READY_DIAGNOSTIC: &str = "document not ready";

/// Extraction service bound to one document.
///
/// The result is computed on the first [`page_data`](Self::page_data) call
/// and shared afterwards. The write-once slot is single-threaded, so the
/// service is not `Sync`.
pub struct PageDataService<D: DocumentSource> {
    document: D,
    blog_info: BlogInfoExtractor,
    classifier: PageClassifier,
    list: ListPageExtractor,
    item: ItemPageExtractor,
    static_page: StaticPageExtractor,
    error_page: ErrorPageExtractor,
    unknown_page: UnknownPageExtractor,
    text: FallbackText,
    cached: OnceCell<Arc<ExtractionResult>>,
}

impl<D: DocumentSource> PageDataService<D> {
    /// Create a service for `document`, compiling every selector and pattern
    /// in `config` up front.
    pub fn new(document: D, config: &ParsingConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid parsing configuration")?;

        Ok(Self {
            document,
            blog_info: BlogInfoExtractor::with_config(config)
                .context("Failed to create blog info extractor")?,
            classifier: PageClassifier::with_config(config)
                .context("Failed to create page classifier")?,
            list: ListPageExtractor::with_config(config)
                .context("Failed to create list page extractor")?,
            item: ItemPageExtractor::with_config(config)
                .context("Failed to create item page extractor")?,
            static_page: StaticPageExtractor::with_config(config)
                .context("Failed to create static page extractor")?,
            error_page: ErrorPageExtractor::with_config(config)
                .context("Failed to create error page extractor")?,
            unknown_page: UnknownPageExtractor::with_config(config)
                .context("Failed to create unknown page extractor")?,
            text: config.fallback_text.clone(),
            cached: OnceCell::new(),
        })
    }

    /// Service with the built-in markup contract
    pub fn with_defaults(document: D) -> Result<Self> {
        Self::new(document, &ParsingConfig::default())
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// The page's extraction result. Computed once; later calls return the
    /// same shared value.
    pub fn page_data(&self) -> Arc<ExtractionResult> {
        Arc::clone(self.cached.get_or_init(|| Arc::new(self.extract())))
    }

    fn extract(&self) -> ExtractionResult {
        if !self.document.ready_state().is_parsed() {
            error!("Cannot extract page data: document is still loading");
            return self.not_ready_result();
        }

        debug!("Starting page data extraction for {}", self.document.current_url());
        match catch_unwind(AssertUnwindSafe(|| self.run_pipeline())) {
            Ok(Ok(result)) => {
                info!(
                    "Page data extracted: {} ({})",
                    result.page_type, result.blog.page_title
                );
                result
            }
            Ok(Err(e)) => {
                error!("Page data extraction failed: {}", e);
                self.failure_result(&e.to_string())
            }
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                error!("Page data extraction panicked: {}", cause);
                self.failure_result(&cause)
            }
        }
    }

    fn context(&self, kind: PageKind) -> ExtractContext {
        ExtractContext::new(
            kind,
            self.document.current_url(),
            self.document.document_title(),
        )
    }

    fn run_pipeline(&self) -> ParsingResult<ExtractionResult> {
        let html = self.document.tree()?;
        let context = self.context(PageKind::Unknown);

        let mut blog = self.blog_info.extract(html, &context);
        let kind = self
            .classifier
            .classify(html, &context, blog.homepage_url.as_deref());
        debug!("Detected page kind: {}", kind);

        let context = context.for_kind(kind);
        let mut extraction = self.dispatch(kind, html, &context)?;
        // Item and static extractors report a missing container as no payload
        if extraction.page.is_none() {
            warn!("{} page markup incomplete; treating page as unknown", kind);
            extraction = self
                .unknown_page
                .extract_with_context(html, &context.for_kind(PageKind::Unknown))?;
        }
        if extraction.kind != kind {
            debug!("Refined page kind: {} -> {}", kind, extraction.kind);
        }

        let Extraction {
            kind: page_type,
            page,
            update,
        } = extraction;
        let page = page.ok_or_else(|| {
            ParsingError::required_field_missing("page", Some(page_type.as_str()))
        })?;

        blog.apply(update);
        finalize_page_title(&mut blog, &page, self.document.document_title());

        Ok(ExtractionResult {
            blog,
            page_type,
            page,
        })
    }

    /// Closed dispatch table from page kind to extractor
    fn dispatch(
        &self,
        kind: PageKind,
        html: &Html,
        context: &ExtractContext,
    ) -> ParsingResult<Extraction> {
        match kind {
            PageKind::Homepage
            | PageKind::Archive
            | PageKind::Index
            | PageKind::Label
            | PageKind::Search => self.list.extract_with_context(html, context),
            PageKind::Item => self.item.extract_with_context(html, context),
            PageKind::StaticPage => self.static_page.extract_with_context(html, context),
            PageKind::Error => self.error_page.extract_with_context(html, context),
            PageKind::Unknown => self.unknown_page.extract_with_context(html, context),
            PageKind::ParsingError => Err(ParsingError::unexpected_page_kind("dispatch", kind)),
        }
    }

    fn not_ready_result(&self) -> ExtractionResult {
        let notice = PageNotice::new(
            self.text.not_ready_title.clone(),
            self.text.not_ready_message.clone(),
        )
        .with_diagnostic(NOT_READY_DIAGNOSTIC);

        ExtractionResult {
            blog: BlogInfo::minimal(
                self.document.document_title(),
                self.document.current_url(),
            ),
            page_type: PageKind::ParsingError,
            page: Page::Notice(notice),
        }
    }

    /// Result for a failed pipeline. Blog info is re-read best-effort.
    fn failure_result(&self, cause: &str) -> ExtractionResult {
        let recovered = catch_unwind(AssertUnwindSafe(|| {
            self.document
                .tree()
                .ok()
                .map(|html| self.blog_info.extract(html, &self.context(PageKind::ParsingError)))
        }));
        let mut blog = match recovered {
            Ok(Some(blog)) => blog,
            _ => {
                warn!("Blog info unavailable after failure; using minimal info");
                BlogInfo::minimal(
                    self.document.document_title(),
                    self.document.current_url(),
                )
            }
        };

        let page = Page::Notice(
            PageNotice::new(
                self.text.parsing_error_title.clone(),
                self.text.parsing_error_message.clone(),
            )
            .with_diagnostic(cause),
        );
        finalize_page_title(&mut blog, &page, self.document.document_title());

        ExtractionResult {
            blog,
            page_type: PageKind::ParsingError,
            page,
        }
    }
}

/// An empty page title falls back to the payload title, then the document title
fn finalize_page_title(blog: &mut BlogInfo, page: &Page, document_title: &str) {
    if blog.page_title.trim().is_empty() {
        blog.page_title = page
            .title()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(document_title)
            .to_string();
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::{PageDocument, ReadyState};
    use std::cell::Cell;

    const URL: &str = "https://blog.example.com/2024/01/hello.html";

    /// Document double whose tree access can fail or panic
    struct BrokenDocument {
        panic: bool,
        calls: Cell<usize>,
    }

    impl DocumentSource for BrokenDocument {
        fn ready_state(&self) -> ReadyState {
            ReadyState::Complete
        }

        fn tree(&self) -> ParsingResult<&Html> {
            self.calls.set(self.calls.get() + 1);
            if self.panic {
                panic!("tree exploded");
            }
            Err(ParsingError::html_parsing_failed("tree unavailable", Some(URL)))
        }

        fn current_url(&self) -> &str {
            URL
        }

        fn document_title(&self) -> &str {
            "Broken Doc"
        }
    }

    fn service(html: &str) -> PageDataService<PageDocument> {
        PageDataService::with_defaults(PageDocument::parse(html, URL)).unwrap()
    }

    #[test]
    fn test_page_data_is_computed_once() {
        let service = service("<html><head><title>T</title></head><body></body></html>");
        let first = service.page_data();
        let second = service.page_data();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_loading_document_yields_not_ready_notice() {
        let document = PageDocument::parse(
            r#"<html><head><title>Doc</title></head><body><div class="neo-homepage-data"></div></body></html>"#,
            URL,
        )
        .with_ready_state(ReadyState::Loading);
        let service = PageDataService::with_defaults(document).unwrap();

        let result = service.page_data();
        assert_eq!(result.page_type, PageKind::ParsingError);
        let notice = result.page.as_notice().unwrap();
        assert_eq!(notice.title, "Parsing Error");
        assert_eq!(notice.message, "DOM not ready during parse attempt.");
        assert_eq!(notice.diagnostic.as_deref(), Some("document not ready"));
        assert_eq!(result.blog.title, "Doc");
        assert_eq!(result.blog.current_url, URL);
        assert!(Arc::ptr_eq(&result, &service.page_data()));
    }

    #[test]
    fn test_pipeline_error_becomes_parsing_error() {
        let service = PageDataService::with_defaults(BrokenDocument {
            panic: false,
            calls: Cell::new(0),
        })
        .unwrap();

        let result = service.page_data();
        assert_eq!(result.page_type, PageKind::ParsingError);
        let notice = result.page.as_notice().unwrap();
        assert_eq!(notice.title, "Data Parsing Error");
        assert_eq!(notice.message, "Failed to parse page data from DOM.");
        assert!(notice.diagnostic.as_deref().unwrap().contains("tree unavailable"));
        assert_eq!(result.blog, BlogInfo::minimal("Broken Doc", URL));

        service.page_data();
        // One pipeline attempt plus one recovery attempt, never repeated
        assert_eq!(service.document().calls.get(), 2);
    }

    #[test]
    fn test_panic_is_contained() {
        let service = PageDataService::with_defaults(BrokenDocument {
            panic: true,
            calls: Cell::new(0),
        })
        .unwrap();

        let result = service.page_data();
        assert_eq!(result.page_type, PageKind::ParsingError);
        assert_eq!(
            result.page.as_notice().and_then(|n| n.diagnostic.as_deref()),
            Some("tree exploded")
        );
        assert_eq!(result.blog.page_title, "Broken Doc");
    }

    #[test]
    fn test_bare_static_container_uses_document_title() {
        let service = service(
            r#"<html><head><title>Doc</title></head><body><div class="neo-custom-page"></div></body></html>"#,
        );
        let result = service.page_data();
        assert_eq!(result.page_type, PageKind::StaticPage);
        assert_eq!(result.page.title(), Some("Doc"));
        assert_eq!(result.blog.page_title, "Doc");
    }

    #[test]
    fn test_item_and_static_without_payload_fall_back_to_unknown() {
        // Extractors that look for a different container than the classifier
        let mut narrower = ParsingConfig::default();
        narrower.markup.item_article = "article.neo-post-v2".to_string();
        narrower.markup.static_page_container = "div.neo-custom-page-v2".to_string();

        for body in [
            r#"<article class="neo-post" itemscope><h1 itemprop="headline">Post</h1></article>"#,
            r#"<div class="neo-custom-page"><h1 class="neo-page-title">About</h1></div>"#,
        ] {
            let mut service = service(&format!(
                "<html><head><title>Doc</title></head><body>{body}</body></html>"
            ));
            service.item = ItemPageExtractor::with_config(&narrower).unwrap();
            service.static_page = StaticPageExtractor::with_config(&narrower).unwrap();

            let result = service.page_data();
            assert_eq!(result.page_type, PageKind::Unknown);
            let notice = result.page.as_notice().unwrap();
            assert_eq!(notice.title, "Unknown Page Type");
            assert_eq!(result.blog.page_title, "Unknown Page Type");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ParsingConfig::default();
        config.markup.item_headline = "h1[".to_string();
        let result = PageDataService::new(PageDocument::parse("", URL), &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_title_consistency() {
        let mut blog = BlogInfo::minimal("", URL);
        finalize_page_title(&mut blog, &Page::Notice(PageNotice::new("Oops", "m")), "Doc");
        assert_eq!(blog.page_title, "Oops");

        let mut blog = BlogInfo::minimal("", URL);
        finalize_page_title(&mut blog, &Page::Posts(Vec::new()), "Doc");
        assert_eq!(blog.page_title, "Doc");

        let mut blog = BlogInfo::minimal("Kept", URL);
        finalize_page_title(&mut blog, &Page::Notice(PageNotice::new("Oops", "m")), "Doc");
        assert_eq!(blog.page_title, "Kept");
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
