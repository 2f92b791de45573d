//! Scripted backends for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::backend::{PageRequest, SearchBackend, SearchPage};
use crate::errors::WatchError;
use crate::models::RawResult;

/// A backend that replays scripted responses in order and records requests.
///
/// Once the script runs out every request gets an empty page.
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<SearchPage, WatchError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MockBackend {
    /// Creates a backend with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a page.
    #[must_use]
    pub fn with_page(self, items: Vec<RawResult>) -> Self {
        self.responses.lock().push_back(Ok(SearchPage::new(items)));
        self
    }

    /// Queues an error.
    #[must_use]
    pub fn with_error(self, error: WatchError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Returns the number of requests served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the requests in the order they arrived.
    #[must_use]
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().clone()
    }

    /// Number of scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, WatchError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::empty()))
    }
}
