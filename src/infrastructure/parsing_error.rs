//! Parsing error types for page data extraction
//!
//! Errors raised while reading the rendered blog markup. Row-level errors are
//! absorbed by the table decoder; everything else surfaces to the page data
//! service, which turns it into a `parsing_error` result.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector for {name}: {selector} - {reason}")]
    InvalidSelector {
        name: String,
        selector: String,
        reason: String,
    },

    #[error("Invalid title pattern ({locale}/{subtype}): {reason}")]
    InvalidPattern {
        locale: String,
        subtype: String,
        reason: String,
    },

    #[error("HTML parsing failed: {message}")]
    HtmlParsingFailed {
        message: String,
        url: Option<String>,
    },

    #[error("Extractor '{extractor}' cannot handle page kind '{kind}'")]
    UnexpectedPageKind { extractor: String, kind: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_selector(name: &str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            name: name.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_pattern(locale: &str, subtype: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            locale: locale.to_string(),
            subtype: subtype.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn html_parsing_failed(message: impl ToString, url: Option<&str>) -> Self {
        Self::HtmlParsingFailed {
            message: message.to_string(),
            url: url.map(ToString::to_string),
        }
    }

    pub fn unexpected_page_kind(extractor: &str, kind: impl ToString) -> Self {
        Self::UnexpectedPageKind {
            extractor: extractor.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn configuration(field: &str, message: impl ToString) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether the failure only affects a single table row.
    ///
    /// Row-scoped errors are skipped by the decoder; the rest abort the
    /// pipeline and become a `parsing_error` page.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self, Self::RequiredFieldMissing { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failing_piece() {
        let err = ParsingError::invalid_selector("post_table", "#[", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Invalid CSS selector for post_table: #[ - unexpected token"
        );

        let err = ParsingError::required_field_missing("url", Some("post table row 3"));
        assert_eq!(err.to_string(), "Required field 'url' not found in HTML");
    }

    #[test]
    fn test_row_scoped_classification() {
        assert!(ParsingError::required_field_missing("url", None).is_row_scoped());
        assert!(!ParsingError::unexpected_page_kind("list", "item").is_row_scoped());
        assert!(!ParsingError::configuration("parsing.markup", "bad").is_row_scoped());
    }
}
