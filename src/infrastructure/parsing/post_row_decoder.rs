//! Post table row decoder
//!
//! List pages carry their posts in a hidden table with a fixed column order:
//! ID, title, URL, published ISO, published formatted, author, labels,
//! snippet, first image URL. A row is either decoded completely or skipped;
//! a bad row never stops the rest of the table from being read.

use scraper::ElementRef;
use tracing::{debug, warn};

use super::config::{CompiledTable, PostTableConfig};
use super::context::ExtractContext;
use super::tree_query::{TreeQuery, attr_of, element_text};
use super::{ParsingError, ParsingResult};
use crate::domain::page_data::{Label, Post};

const COL_ID: usize = 0;
const COL_TITLE: usize = 1;
const COL_URL: usize = 2;
const COL_PUBLISHED_ISO: usize = 3;
const COL_PUBLISHED_FORMATTED: usize = 4;
const COL_AUTHOR: usize = 5;
const COL_LABELS: usize = 6;
const COL_SNIPPET: usize = 7;
const COL_FIRST_IMAGE: usize = 8;

/// What happened to one table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Decoded(Post),
    /// The theme's "no posts" row: a single cell spanning the table
    Placeholder,
    /// Wrong number of cells
    Malformed { cells: usize },
}

/// Decoder for the fixed-schema post table
#[derive(Debug, Clone)]
pub struct PostRowDecoder {
    table: CompiledTable,
}

impl PostRowDecoder {
    pub fn new(config: &PostTableConfig) -> ParsingResult<Self> {
        let table = config.compile()?;
        if table.column_count <= COL_FIRST_IMAGE {
            return Err(ParsingError::configuration(
                "table.column_count",
                format!("post table needs at least {} columns", COL_FIRST_IMAGE + 1),
            ));
        }
        Ok(Self { table })
    }

    /// Decode every row of `table`, skipping the ones that do not fit.
    ///
    /// Only errors that are not row-scoped abort the whole table.
    pub fn decode_table(
        &self,
        table: ElementRef<'_>,
        context: &ExtractContext,
    ) -> ParsingResult<Vec<Post>> {
        let rows = table.query_all(&self.table.row);
        let mut posts = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            match self.decode_row(row, context) {
                Ok(RowOutcome::Decoded(post)) => posts.push(post),
                Ok(RowOutcome::Placeholder) => {
                    debug!("Row {} is the empty-table placeholder", index);
                }
                Ok(RowOutcome::Malformed { cells }) => {
                    warn!(
                        "Row {} skipped: expected {} cells, found {}",
                        index, self.table.column_count, cells
                    );
                }
                Err(e) if e.is_row_scoped() => {
                    warn!("Row {} skipped: {}", index, e);
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Decoded {} posts from post table", posts.len());
        Ok(posts)
    }

    /// Decode one `<tr>`
    pub fn decode_row(
        &self,
        row: ElementRef<'_>,
        context: &ExtractContext,
    ) -> ParsingResult<RowOutcome> {
        let cells = row.query_all(&self.table.cell);

        if cells.len() == 1 && cells[0].value().attr("colspan").is_some() {
            return Ok(RowOutcome::Placeholder);
        }
        if cells.len() != self.table.column_count {
            return Ok(RowOutcome::Malformed { cells: cells.len() });
        }

        let url = element_text(&cells[COL_URL]);
        if url.is_empty() {
            return Err(ParsingError::required_field_missing(
                "url",
                Some("post table row"),
            ));
        }

        let post_id = attr_of(&row, &self.table.row_id_attribute)
            .or_else(|| Some(element_text(&cells[COL_ID])).filter(|id| !id.is_empty()));

        let published_iso = cells[COL_PUBLISHED_ISO]
            .query_one(&self.table.time_marker)
            .and_then(|time| attr_of(&time, "datetime"))
            .unwrap_or_else(|| element_text(&cells[COL_PUBLISHED_ISO]));

        Ok(RowOutcome::Decoded(Post {
            post_id,
            title: element_text(&cells[COL_TITLE]),
            url,
            published_iso,
            published_formatted: element_text(&cells[COL_PUBLISHED_FORMATTED]),
            author: element_text(&cells[COL_AUTHOR]),
            labels: self.decode_labels(cells[COL_LABELS], context),
            snippet: element_text(&cells[COL_SNIPPET]),
            first_image_url: self.image_url(&element_text(&cells[COL_FIRST_IMAGE])),
            body_html: None,
        }))
    }

    fn decode_labels(&self, cell: ElementRef<'_>, context: &ExtractContext) -> Vec<Label> {
        cell.query_all(&self.table.label_item)
            .into_iter()
            .filter_map(|item| {
                let name = attr_of(&item, &self.table.label_name_attribute)
                    .unwrap_or_else(|| element_text(&item));
                let url = attr_of(&item, &self.table.label_url_attribute).or_else(|| {
                    item.query_one(&self.table.label_link)
                        .and_then(|link| attr_of(&link, "href"))
                        .and_then(|href| context.resolve(&href))
                });
                Label::new(&name, url)
            })
            .collect()
    }

    /// Image cell text to URL, `None` for empty and placeholder texts
    pub fn image_url(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty()
            || self.table.no_image_patterns.iter().any(|re| re.is_match(text))
            || self
                .table
                .placeholder_prefixes
                .iter()
                .any(|prefix| text.starts_with(prefix.as_str()))
        {
            return None;
        }
        Some(text.to_string())
    }
}
