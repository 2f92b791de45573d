//! Data models for search queries and their results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SearchConfig;
use crate::errors::WatchError;

/// Inclusive publication-date window passed to the backend for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WatchError> {
        if start > end {
            return Err(WatchError::invalid_query(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `end` (e.g. `days = 1` is yesterday..today).
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self, WatchError> {
        let start = end
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .ok_or_else(|| WatchError::invalid_query("date range start out of bounds"))?;
        Self::new(start, end)
    }

    /// First day of the range.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Backend sort directive, `date:r:YYYYMMDD:YYYYMMDD`.
    #[must_use]
    pub fn sort_directive(&self) -> String {
        format!(
            "date:r:{}:{}",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

/// A single search request.
///
/// Invariants: the keyword is non-blank and the target count is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    keyword: String,
    preferred_sites: Vec<String>,
    date_range: Option<DateRange>,
    target_count: usize,
}

impl SearchQuery {
    /// Creates a query with no site scoping and no date range.
    pub fn new(keyword: impl Into<String>, target_count: usize) -> Result<Self, WatchError> {
        let keyword = keyword.into().trim().to_string();
        if keyword.is_empty() {
            return Err(WatchError::invalid_query("keyword must not be empty"));
        }
        if target_count == 0 {
            return Err(WatchError::invalid_query("target result count must be positive"));
        }
        Ok(Self {
            keyword,
            preferred_sites: Vec::new(),
            date_range: None,
            target_count,
        })
    }

    /// Creates a query using the configured preferred sites and default count.
    pub fn from_config(keyword: impl Into<String>, config: &SearchConfig) -> Result<Self, WatchError> {
        Ok(Self::new(keyword, config.default_target_count)?
            .with_sites(config.preferred_sites.iter().cloned()))
    }

    /// Replaces the preferred sites. Blank and repeated entries are dropped.
    #[must_use]
    pub fn with_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_sites.clear();
        for site in sites {
            let site = site.into().trim().to_string();
            if !site.is_empty() && !self.preferred_sites.contains(&site) {
                self.preferred_sites.push(site);
            }
        }
        self
    }

    /// Sets the date range.
    #[must_use]
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Overrides the target count.
    pub fn with_target_count(mut self, target_count: usize) -> Result<Self, WatchError> {
        if target_count == 0 {
            return Err(WatchError::invalid_query("target result count must be positive"));
        }
        self.target_count = target_count;
        Ok(self)
    }

    /// The searched keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Site patterns the search is scoped to.
    #[must_use]
    pub fn preferred_sites(&self) -> &[String] {
        &self.preferred_sites
    }

    /// The date range, if any.
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// Maximum number of results to return.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Backend query text: the keyword followed by an `OR` of `site:` filters.
    #[must_use]
    pub fn query_text(&self) -> String {
        if self.preferred_sites.is_empty() {
            return self.keyword.clone();
        }
        let sites = self
            .preferred_sites
            .iter()
            .map(|site| format!("site:{site}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        format!("{} {}", self.keyword, sites)
    }

    /// Backend sort directive: the date range form when present, otherwise recency.
    #[must_use]
    pub fn sort_directive(&self) -> String {
        self.date_range
            .map_or_else(|| "date".to_string(), |range| range.sort_directive())
    }
}

/// A search hit as the backend returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    /// Result title.
    #[serde(default)]
    pub title: String,
    /// Result URL.
    #[serde(default)]
    pub link: String,
    /// Host (and sometimes path) shown for the result.
    #[serde(default, rename = "displayLink")]
    pub display_link: String,
    /// Text snippet.
    #[serde(default)]
    pub snippet: String,
    /// Structured page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagemap: Option<serde_json::Value>,
}

impl RawResult {
    /// Creates a raw result without metadata.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        display_link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            display_link: display_link.into(),
            snippet: snippet.into(),
            pagemap: None,
        }
    }

    /// Attaches an `article:published_time` meta tag.
    #[must_use]
    pub fn with_published_time(mut self, published: impl Into<String>) -> Self {
        self.pagemap = Some(serde_json::json!({
            "metatags": [ { "article:published_time": published.into() } ]
        }));
        self
    }

    /// The `article:published_time` of the first meta tag block, if present.
    #[must_use]
    pub fn published_time(&self) -> Option<&str> {
        self.pagemap
            .as_ref()?
            .get("metatags")?
            .get(0)?
            .get("article:published_time")?
            .as_str()
    }
}

/// A raw result with a canonical date, a cleaned snippet and a site name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedResult {
    /// Canonical site name.
    pub site_name: String,
    /// Result title.
    pub title: String,
    /// Result URL.
    pub link: String,
    /// Host shown by the backend.
    pub display_link: String,
    /// Snippet with the extracted date removed.
    pub snippet: String,
    /// Display date, empty when none was found.
    pub date: String,
}

impl AnnotatedResult {
    /// Whether a date was found for this result.
    #[must_use]
    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }
}

/// Annotated results in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<AnnotatedResult>,
}

impl ResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps results already in arrival order.
    #[must_use]
    pub fn from_items(items: Vec<AnnotatedResult>) -> Self {
        Self { items }
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the results in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedResult> {
        self.items.iter()
    }

    /// The results as a slice.
    #[must_use]
    pub fn items(&self) -> &[AnnotatedResult] {
        &self.items
    }

    /// Consumes the set.
    #[must_use]
    pub fn into_items(self) -> Vec<AnnotatedResult> {
        self.items
    }

    /// Number of results that carry a date.
    #[must_use]
    pub fn dated_count(&self) -> usize {
        self.items.iter().filter(|r| r.has_date()).count()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a AnnotatedResult;
    type IntoIter = std::slice::Iter<'a, AnnotatedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = AnnotatedResult;
    type IntoIter = std::vec::IntoIter<AnnotatedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Up to three alternative keywords, closest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionList {
    suggestions: Vec<String>,
}

impl SuggestionList {
    /// Maximum number of suggestions kept.
    pub const MAX_LEN: usize = 3;

    /// Creates a list, keeping at most [`Self::MAX_LEN`] entries.
    #[must_use]
    pub fn new(mut suggestions: Vec<String>) -> Self {
        suggestions.truncate(Self::MAX_LEN);
        Self { suggestions }
    }

    /// Number of suggestions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Whether there are no suggestions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Whether a term is among the suggestions.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.suggestions.iter().any(|s| s == term)
    }

    /// The suggestions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.suggestions
    }

    /// Iterates the suggestions, closest first.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.suggestions.iter()
    }
}

impl fmt::Display for SuggestionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suggestions.join(", "))
    }
}
