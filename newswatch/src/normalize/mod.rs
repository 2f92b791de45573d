//! Per-result normalization.
//!
//! This module provides:
//! - Date extraction from snippets and canonical date formatting
//! - Site-name canonicalization
//! - [`ResultNormalizer`], which applies both to a raw backend item

pub mod dates;
mod site;

pub use dates::{
    DateExtraction, DateExtractor, DateFormatter, DatePattern, DateRule, CANONICAL_FORMAT,
};
pub use site::SiteNameResolver;

use crate::models::{AnnotatedResult, RawResult};

/// Turns raw backend items into annotated results.
///
/// Total over its input: malformed dates stay as text and missing fields
/// become empty strings.
#[derive(Debug, Clone, Default)]
pub struct ResultNormalizer {
    extractor: DateExtractor,
    formatter: DateFormatter,
    sites: SiteNameResolver,
}

impl ResultNormalizer {
    /// Creates a normalizer with the built-in date rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: DateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Uses a custom formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: DateFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Annotates one item.
    ///
    /// The snippet date wins; `article:published_time` metadata is only
    /// consulted when the snippet has none.
    #[must_use]
    pub fn annotate(&self, raw: RawResult) -> AnnotatedResult {
        let extraction = self.extractor.extract(&raw.snippet);
        let date = if extraction.found() {
            extraction.date.as_str()
        } else {
            raw.published_time().unwrap_or_default()
        };
        let date = self.formatter.format(date);
        let site_name = self.sites.resolve(&raw.display_link);

        AnnotatedResult {
            site_name,
            title: raw.title,
            link: raw.link,
            display_link: raw.display_link,
            snippet: extraction.snippet,
            date,
        }
    }
}
