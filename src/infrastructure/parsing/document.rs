//! Rendered document input
//!
//! The extraction pipeline reads a fully rendered page. `DocumentSource` is
//! the seam between the pipeline and wherever that page came from; the
//! in-memory [`PageDocument`] covers files, stdin and test fixtures.

use scraper::{Html, Selector};

use super::ParsingResult;

/// Mirror of the browser's `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// The tree is complete once the parser has finished (interactive or later).
    pub fn is_parsed(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Everything the pipeline needs from the host document
pub trait DocumentSource {
    fn ready_state(&self) -> ReadyState;

    /// The parsed tree. Only called once the document reports parsed.
    fn tree(&self) -> ParsingResult<&Html>;

    fn current_url(&self) -> &str;

    fn document_title(&self) -> &str;
}

/// A parsed HTML document held in memory
#[derive(Debug)]
pub struct PageDocument {
    html: Html,
    current_url: String,
    title: String,
    ready_state: ReadyState,
}

impl PageDocument {
    /// Parse a rendered page served at `current_url`
    pub fn parse(html: &str, current_url: &str) -> Self {
        let html = Html::parse_document(html);
        let title = Selector::parse("title")
            .ok()
            .and_then(|selector| {
                html.select(&selector)
                    .next()
                    .map(|e| e.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default();

        Self {
            html,
            current_url: current_url.to_string(),
            title,
            ready_state: ReadyState::Complete,
        }
    }

    pub fn with_ready_state(mut self, ready_state: ReadyState) -> Self {
        self.ready_state = ready_state;
        self
    }
}

impl DocumentSource for PageDocument {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn tree(&self) -> ParsingResult<&Html> {
        Ok(&self.html)
    }

    fn current_url(&self) -> &str {
        &self.current_url
    }

    fn document_title(&self) -> &str {
        &self.title
    }
}
