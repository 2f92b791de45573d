//! The paginated search backend seam.
//!
//! [`SearchBackend`] is the only thing the aggregator knows about the search
//! service. [`HttpSearchBackend`] speaks the JSON custom-search protocol over
//! HTTP; tests plug in scripted backends instead.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpSearchBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::WatchError;
use crate::models::{RawResult, SearchQuery};

/// One page request against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Free-text query including site filters.
    pub query_text: String,
    /// Sort directive (`date` or `date:r:<start>:<end>`).
    pub sort: String,
    /// 1-based offset of the first item.
    pub start: usize,
    /// Page size.
    pub num: usize,
}

impl PageRequest {
    /// The first page for a query.
    #[must_use]
    pub fn first(query: &SearchQuery, page_size: usize) -> Self {
        Self {
            query_text: query.query_text(),
            sort: query.sort_directive(),
            start: 1,
            num: page_size,
        }
    }

    /// The page after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            start: self.start + self.num,
            ..self.clone()
        }
    }

    /// Query parameters, credentials excluded.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query_text.clone()),
            ("sort", self.sort.clone()),
            ("num", self.num.to_string()),
            ("start", self.start.to_string()),
        ]
    }
}

/// One decoded backend page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Items on the page; absent means the result list is exhausted.
    #[serde(default)]
    pub items: Vec<RawResult>,
}

impl SearchPage {
    /// Creates a page from items.
    #[must_use]
    pub fn new(items: Vec<RawResult>) -> Self {
        Self { items }
    }

    /// An exhausted page.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Protocol for fetching one page of search results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetches a page. Non-success statuses map to [`WatchError::Backend`],
    /// network failures to [`WatchError::Transport`].
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, WatchError>;
}
