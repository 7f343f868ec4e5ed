//! Parsing error re-export
//!
//! Keeps `parsing::ParsingError` as the import path for extractor code.

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
