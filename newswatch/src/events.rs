//! Observer hooks for search runs.

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::errors::WatchError;

/// Observability callbacks for a search run.
///
/// Implementations must not panic; they are called inline on the search path.
pub trait SearchObserver: Send + Sync {
    /// Called before the first page request.
    fn on_search_start(&self, run_id: &str, query_text: &str, target_count: usize);

    /// Called after each non-empty page is normalized.
    fn on_page_fetched(&self, run_id: &str, start: usize, items: usize, collected: usize);

    /// Called when the run finishes without a backend failure.
    fn on_search_complete(&self, run_id: &str, results: usize, duration_ms: f64);

    /// Called when the backend fails; `salvaged` counts results collected before the failure.
    fn on_search_error(&self, run_id: &str, error: &WatchError, salvaged: usize);
}

/// No-op implementation of `SearchObserver`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSearchObserver;

impl SearchObserver for NoOpSearchObserver {
    fn on_search_start(&self, _run_id: &str, _query_text: &str, _target_count: usize) {}
    fn on_page_fetched(&self, _run_id: &str, _start: usize, _items: usize, _collected: usize) {}
    fn on_search_complete(&self, _run_id: &str, _results: usize, _duration_ms: f64) {}
    fn on_search_error(&self, _run_id: &str, _error: &WatchError, _salvaged: usize) {}
}

/// An observer that logs using the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSearchObserver;

impl SearchObserver for LoggingSearchObserver {
    fn on_search_start(&self, run_id: &str, query_text: &str, target_count: usize) {
        info!(run_id, query = query_text, target_count, "search started");
    }

    fn on_page_fetched(&self, run_id: &str, start: usize, items: usize, collected: usize) {
        debug!(run_id, start, items, collected, "page fetched");
    }

    fn on_search_complete(&self, run_id: &str, results: usize, duration_ms: f64) {
        info!(run_id, results, duration_ms, "search complete");
    }

    fn on_search_error(&self, run_id: &str, error: &WatchError, salvaged: usize) {
        error!(
            run_id,
            kind = error.kind(),
            status = ?error.status_code(),
            salvaged,
            "search failed: {}", error
        );
    }
}

/// A recorded observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Search started.
    Started {
        /// Backend query text.
        query_text: String,
        /// Requested result count.
        target_count: usize,
    },
    /// A page arrived.
    Page {
        /// 1-based start offset of the page.
        start: usize,
        /// Items on the page.
        items: usize,
        /// Results collected so far.
        collected: usize,
    },
    /// Search completed.
    Completed {
        /// Final result count.
        results: usize,
    },
    /// Search failed.
    Failed {
        /// Error kind name.
        kind: &'static str,
        /// HTTP status if any.
        status: Option<u16>,
        /// Results collected before the failure.
        salvaged: usize,
    },
}

/// A collecting observer for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingSearchObserver {
    events: RwLock<Vec<SearchEvent>>,
}

impl CollectingSearchObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.read().clone()
    }

    /// Number of page events.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.events
            .read()
            .iter()
            .filter(|e| matches!(e, SearchEvent::Page { .. }))
            .count()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl SearchObserver for CollectingSearchObserver {
    fn on_search_start(&self, _run_id: &str, query_text: &str, target_count: usize) {
        self.events.write().push(SearchEvent::Started {
            query_text: query_text.to_string(),
            target_count,
        });
    }

    fn on_page_fetched(&self, _run_id: &str, start: usize, items: usize, collected: usize) {
        self.events.write().push(SearchEvent::Page {
            start,
            items,
            collected,
        });
    }

    fn on_search_complete(&self, _run_id: &str, results: usize, _duration_ms: f64) {
        self.events.write().push(SearchEvent::Completed { results });
    }

    fn on_search_error(&self, _run_id: &str, error: &WatchError, salvaged: usize) {
        self.events.write().push(SearchEvent::Failed {
            kind: error.kind(),
            status: error.status_code(),
            salvaged,
        });
    }
}
