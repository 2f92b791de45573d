//! Capped exponential backoff for idempotent page requests.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;
use crate::errors::WatchError;

/// Outcome of a retry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry(Duration),
    /// No more retries, give up.
    GiveUp,
    /// Don't retry, the error is not retryable.
    NotRetryable,
}

/// Decides what to do after `attempt` (0-based) failed with `error`.
#[must_use]
pub fn decide(config: &RetryConfig, attempt: usize, error: &WatchError) -> RetryDecision {
    if !error.is_retryable(config) {
        return RetryDecision::NotRetryable;
    }
    if attempt >= config.max_retries {
        return RetryDecision::GiveUp;
    }
    let delay = config.delay_for_attempt(attempt);
    if !config.jitter || delay.is_zero() {
        return RetryDecision::Retry(delay);
    }
    let max_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    RetryDecision::Retry(Duration::from_millis(
        rand::thread_rng().gen_range(0..=max_ms),
    ))
}

/// Executes an operation with retry logic.
///
/// `key` only labels log lines. The last error is returned once retries are
/// exhausted or the error is not retryable.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    key: &str,
    mut operation: F,
) -> Result<T, WatchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, WatchError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => match decide(config, attempt, &e) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        key,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying after error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp | RetryDecision::NotRetryable => return Err(e),
            },
        }
    }
}
