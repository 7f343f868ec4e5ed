//! Neo Page Data - typed page model extraction for neo-data-provider blogs
//!
//! Reads a fully rendered blog page, decides what kind of page it is and
//! turns the theme's hidden data markup into one [`ExtractionResult`] value
//! for a template renderer.
//!
//! ```no_run
//! use neo_page_data::{PageDataService, PageDocument};
//!
//! # fn main() -> anyhow::Result<()> {
//! let html = std::fs::read_to_string("page.html")?;
//! let service = PageDataService::with_defaults(PageDocument::parse(&html, "https://blog.example.com/"))?;
//! println!("{}", serde_json::to_string(&*service.page_data())?);
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::PageDataService;
pub use domain::page_data::{BlogInfo, ExtractionResult, Page, PageKind, PageNotice, Post};
pub use infrastructure::parsing::{DocumentSource, PageDocument, ParsingConfig, ReadyState};
