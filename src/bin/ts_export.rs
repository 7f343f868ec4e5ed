//! Writes the TypeScript declarations of the page data model.
//!
//! Output goes to `TS_RS_EXPORT_DIR` when set, `./bindings` otherwise.

use neo_page_data::domain::page_data::{
    BlogInfo, ExtractionResult, Label, Page, PageKind, PageNotice, Post, StaticPageEntry,
};
use ts_rs::TS;

fn main() -> anyhow::Result<()> {
    // `export_all` follows dependencies, so the remaining types come along
    ExtractionResult::export_all()?;
    for name in [
        BlogInfo::name(),
        PageKind::name(),
        Page::name(),
        Post::name(),
        Label::name(),
        StaticPageEntry::name(),
        PageNotice::name(),
    ] {
        println!("exported {name}");
    }
    println!("exported {}", ExtractionResult::name());
    Ok(())
}
