//! HTTP implementation of the search backend.

use async_trait::async_trait;
use tracing::debug;

use super::{PageRequest, SearchBackend, SearchPage};
use crate::config::{Credentials, SearchConfig};
use crate::errors::WatchError;
use crate::retry::with_retry;

/// Talks to a JSON custom-search endpoint with `GET` requests.
///
/// Retryable failures (transport errors and the configured transient
/// statuses) are retried with backoff; page requests are idempotent.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    config: SearchConfig,
    credentials: Credentials,
}

impl HttpSearchBackend {
    /// Creates a backend with a client built from the config.
    pub fn new(config: SearchConfig, credentials: Credentials) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WatchError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config, credentials))
    }

    /// Creates a backend around an existing client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        config: SearchConfig,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            config,
            credentials,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    async fn fetch_once(&self, request: &PageRequest) -> Result<SearchPage, WatchError> {
        let mut params = request.params();
        params.push(("key", self.credentials.api_key.clone()));
        params.push(("cx", self.credentials.engine_id.clone()));

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
            // the URL carries the API key
            .map_err(|e| WatchError::transport(e.without_url().to_string()))?;

        let status = response.status();
        debug!(start = request.start, status = status.as_u16(), "backend responded");
        if !status.is_success() {
            return Err(WatchError::backend(status.as_u16()));
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| WatchError::MalformedResponse(e.without_url().to_string()))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, WatchError> {
        let key = format!("start={}", request.start);
        with_retry(&self.config.retry, &key, || self.fetch_once(request)).await
    }
}
