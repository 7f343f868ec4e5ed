//! Domain module - the page data model
//!
//! Plain serializable types shared by the extractors, the service and the
//! template consumer.

pub mod page_data;

pub use page_data::{
    BlogInfo, BlogInfoUpdate, ExtractionResult, Label, Page, PageKind, PageNotice, Post,
    StaticPageEntry,
};
