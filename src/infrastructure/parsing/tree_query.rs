//! Scoped DOM queries
//!
//! `TreeQuery` is the only way extractors touch the tree: find one or all
//! elements matching a compiled selector, either document-wide or inside a
//! container element.

use scraper::{ElementRef, Html, Selector};

pub trait TreeQuery<'a> {
    /// First element matching `selector`, in document order
    fn query_one(&self, selector: &Selector) -> Option<ElementRef<'a>>;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;

    fn contains(&self, selector: &Selector) -> bool {
        self.query_one(selector).is_some()
    }

    /// Trimmed text of the first match, `None` when absent or blank
    fn text_of(&self, selector: &Selector) -> Option<String> {
        self.query_one(selector)
            .map(|e| element_text(&e))
            .filter(|text| !text.is_empty())
    }
}

impl<'a> TreeQuery<'a> for &'a Html {
    fn query_one(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        let html: &'a Html = *self;
        html.select(selector).next()
    }

    fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        let html: &'a Html = *self;
        html.select(selector).collect()
    }
}

impl<'a> TreeQuery<'a> for ElementRef<'a> {
    fn query_one(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

/// Either the whole document or one container subtree
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Document(&'a Html),
    Element(ElementRef<'a>),
}

impl<'a> Scope<'a> {
    /// Container if found, otherwise the whole document
    pub fn container_or_document(html: &'a Html, container: Option<ElementRef<'a>>) -> Self {
        container.map_or(Self::Document(html), Self::Element)
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

impl<'a> TreeQuery<'a> for Scope<'a> {
    fn query_one(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        match self {
            Self::Document(html) => html.query_one(selector),
            Self::Element(element) => element.query_one(selector),
        }
    }

    fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        match self {
            Self::Document(html) => html.query_all(selector),
            Self::Element(element) => element.query_all(selector),
        }
    }
}

/// Text content with surrounding whitespace removed
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed attribute value, `None` when missing or blank
pub fn attr_of(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    const FIXTURE: &str = r#"
        <html><body>
          <div class="outer"><p>outside</p></div>
          <div class="box" id="b1"><p> first </p><p>second</p><span data-x="  7 "></span></div>
        </body></html>"#;

    #[test]
    fn test_document_and_element_scopes() {
        let html = Html::parse_document(FIXTURE);
        let doc = Scope::Document(&html);
        assert_eq!(doc.query_all(&sel("p")).len(), 3);

        let container = doc.query_one(&sel("div.box"));
        let boxed = Scope::container_or_document(&html, container);
        assert!(!boxed.is_document());
        assert_eq!(boxed.query_all(&sel("p")).len(), 2);
        assert_eq!(boxed.text_of(&sel("p")).as_deref(), Some("first"));
    }

    #[test]
    fn test_missing_container_falls_back_to_document() {
        let html = Html::parse_document(FIXTURE);
        let missing = (&html).query_one(&sel("div.nope"));
        let scope = Scope::container_or_document(&html, missing);
        assert!(scope.is_document());
        assert!(scope.contains(&sel("div.outer")));
    }

    #[test]
    fn test_attribute_helper_trims_and_rejects_blank() {
        let html = Html::parse_document(FIXTURE);
        let span = (&html).query_one(&sel("span")).unwrap();
        assert_eq!(attr_of(&span, "data-x").as_deref(), Some("7"));
        assert_eq!(attr_of(&span, "data-missing"), None);
    }
}
