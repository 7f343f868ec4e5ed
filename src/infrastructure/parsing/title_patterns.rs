//! List heading resolution
//!
//! Archive and index pages announce what they list only through their
//! heading text ("Label: Travel - Post Data"). The matcher walks a table of
//! locale patterns to turn that heading into a refined page kind and the
//! archive name, label name or search query.

use regex::Regex;
use tracing::debug;

use super::ParsingResult;
use super::config::ParsingConfig;
use crate::domain::page_data::PageKind;

/// Refined kind plus the extracted name or query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub kind: PageKind,
    pub value: Option<String>,
}

impl TitleMatch {
    fn unresolved(kind: PageKind) -> Self {
        Self { kind, value: None }
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    locale: String,
    subtype: PageKind,
    regex: Regex,
}

/// Table-driven matcher over `(locale, subtype, pattern)` entries
#[derive(Debug, Clone)]
pub struct TitlePatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl TitlePatternMatcher {
    /// Compile the entries whose locale is enabled, keeping table order
    pub fn new(config: &ParsingConfig) -> ParsingResult<Self> {
        let mut patterns = Vec::new();
        for entry in &config.title_patterns {
            if !config.enabled_locales.iter().any(|l| l == &entry.locale) {
                debug!(
                    "Skipping title pattern for disabled locale '{}' ({})",
                    entry.locale, entry.subtype
                );
                continue;
            }
            patterns.push(CompiledPattern {
                locale: entry.locale.clone(),
                subtype: entry.subtype,
                regex: entry.compile()?,
            });
        }
        Ok(Self { patterns })
    }

    /// Resolve a list heading for the coarse kind chosen by the classifier.
    ///
    /// Archive headings only ever refine to `archive`. Index headings try every
    /// search pattern before any label pattern; the first match wins.
    pub fn resolve(&self, heading: &str, coarse: PageKind) -> TitleMatch {
        let heading = heading.trim();
        let order: &[PageKind] = match coarse {
            PageKind::Archive => &[PageKind::Archive],
            PageKind::Index => &[PageKind::Search, PageKind::Label],
            _ => return TitleMatch::unresolved(coarse),
        };

        for subtype in order {
            for pattern in self.patterns.iter().filter(|p| p.subtype == *subtype) {
                if let Some(captures) = pattern.regex.captures(heading) {
                    let value = captures
                        .name("value")
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|v| !v.is_empty());
                    debug!(
                        "Heading '{}' matched {} pattern ({})",
                        heading, subtype, pattern.locale
                    );
                    return TitleMatch {
                        kind: *subtype,
                        value,
                    };
                }
            }
        }

        debug!("Heading '{}' matched no {} pattern", heading, coarse);
        TitleMatch::unresolved(coarse)
    }
}
