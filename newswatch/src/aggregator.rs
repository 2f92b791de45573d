//! Multi-page search aggregation.
//!
//! Pages are fetched strictly in sequence: each request's start offset depends
//! on whether the previous page was empty or the target was reached.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::backend::{PageRequest, SearchBackend};
use crate::config::{ErrorPolicy, SearchConfig};
use crate::errors::WatchError;
use crate::events::{NoOpSearchObserver, SearchObserver};
use crate::models::{ResultSet, SearchQuery};
use crate::normalize::ResultNormalizer;

/// Outcome of a search that may have been cut short by the backend.
#[derive(Debug)]
pub struct PartialSearch {
    /// Results collected, at most the target count.
    pub results: ResultSet,
    /// The backend failure that stopped pagination, if any.
    pub error: Option<WatchError>,
    /// Number of page requests that succeeded.
    pub pages_fetched: usize,
}

impl PartialSearch {
    /// Whether pagination ended without a backend failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Applies an error policy.
    ///
    /// `Discard` turns any failure into an error. `KeepPartial` returns the
    /// collected results unless there are none.
    pub fn into_result(self, policy: ErrorPolicy) -> Result<ResultSet, WatchError> {
        match (self.error, policy) {
            (None, _) => Ok(self.results),
            (Some(e), ErrorPolicy::KeepPartial) if !self.results.is_empty() => {
                warn!(
                    kept = self.results.len(),
                    error = %e,
                    "returning partial results after backend failure"
                );
                Ok(self.results)
            }
            (Some(e), _) => Err(e),
        }
    }
}

/// Drives the backend page by page and annotates every item.
pub struct SearchAggregator {
    backend: Arc<dyn SearchBackend>,
    normalizer: ResultNormalizer,
    observer: Arc<dyn SearchObserver>,
    page_size: usize,
    error_policy: ErrorPolicy,
}

impl SearchAggregator {
    /// Creates an aggregator with the default page size and policy.
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::from_config(backend, &SearchConfig::default())
    }

    /// Creates an aggregator using the page size and error policy from config.
    #[must_use]
    pub fn from_config(backend: Arc<dyn SearchBackend>, config: &SearchConfig) -> Self {
        Self {
            backend,
            normalizer: ResultNormalizer::default(),
            observer: Arc::new(NoOpSearchObserver),
            page_size: config.effective_page_size(),
            error_policy: config.error_policy,
        }
    }

    /// Sets the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the normalizer.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: ResultNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the error policy used by [`Self::search`].
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// The error policy in use.
    #[must_use]
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Runs a search and applies the configured error policy.
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultSet, WatchError> {
        self.search_partial(query)
            .await
            .into_result(self.error_policy)
    }

    /// Runs a search and reports a backend failure next to whatever was
    /// collected before it.
    pub async fn search_partial(&self, query: &SearchQuery) -> PartialSearch {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("search", run_id = %run_id, keyword = query.keyword());
        self.paginate(query, &run_id).instrument(span).await
    }

    async fn paginate(&self, query: &SearchQuery, run_id: &str) -> PartialSearch {
        let started = Instant::now();
        let target = query.target_count();
        let mut request = PageRequest::first(query, self.page_size);
        let mut collected = Vec::with_capacity(target);
        let mut pages_fetched = 0;

        self.observer
            .on_search_start(run_id, &request.query_text, target);

        while collected.len() < target {
            let page = match self.backend.fetch_page(&request).await {
                Ok(page) => page,
                Err(error) => {
                    collected.truncate(target);
                    self.observer
                        .on_search_error(run_id, &error, collected.len());
                    return PartialSearch {
                        results: ResultSet::from_items(collected),
                        error: Some(error),
                        pages_fetched,
                    };
                }
            };
            pages_fetched += 1;

            if page.is_empty() {
                break;
            }
            let items = page.items.len();
            collected.extend(page.items.into_iter().map(|raw| self.normalizer.annotate(raw)));
            self.observer
                .on_page_fetched(run_id, request.start, items, collected.len());

            request = request.next();
        }

        // the last page may overshoot the target
        collected.truncate(target);
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.observer
            .on_search_complete(run_id, collected.len(), duration_ms);

        PartialSearch {
            results: ResultSet::from_items(collected),
            error: None,
            pages_fetched,
        }
    }
}

impl std::fmt::Debug for SearchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAggregator")
            .field("page_size", &self.page_size)
            .field("error_policy", &self.error_policy)
            .finish_non_exhaustive()
    }
}
