//! Configuration types for search aggregation.
//!
//! A [`WatchConfig`] is loaded once at process start and passed explicitly to
//! the components that need it. Every field has a serde default so partial
//! JSON files are accepted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::errors::WatchError;

/// Environment variable holding the search API key.
pub const API_KEY_ENV: &str = "NEWSWATCH_API_KEY";
/// Environment variable holding the search engine identifier.
pub const ENGINE_ID_ENV: &str = "NEWSWATCH_ENGINE_ID";

/// What the aggregator does with already-fetched pages when the backend fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Surface the error and drop everything collected so far.
    #[default]
    Discard,
    /// Return the pages collected before the failure.
    KeepPartial,
}

/// Configuration for talking to the paginated search backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Items per backend page, 10 unless the backend caps pages lower.
    ///
    /// Values are clamped to `1..=10`; page `n` starts at `1 + n * page_size`.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Host patterns every query is scoped to.
    #[serde(default = "default_preferred_sites")]
    pub preferred_sites: Vec<String>,
    /// Result count used when the caller does not give one.
    #[serde(default = "default_target_count")]
    pub default_target_count: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retry configuration for page requests.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Behavior on backend failure mid-pagination.
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

fn default_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_preferred_sites() -> Vec<String> {
    vec![
        "webrazzi.com".to_string(),
        "tomorrow.com.tr".to_string(),
        "swipeline.co".to_string(),
        "egirisim.com".to_string(),
        "girisimhaber".to_string(),
        "startupwatch".to_string(),
    ]
}

fn default_target_count() -> usize {
    100
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    concat!("newswatch/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            preferred_sites: default_preferred_sites(),
            default_target_count: default_target_count(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a new search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the preferred site list.
    #[must_use]
    pub fn with_preferred_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_sites = sites.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Page size clamped to what the backend accepts.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, 10)
    }
}

/// Retry configuration for failed page requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Initial delay between retries in seconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: f64,
    /// Backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Maximum delay between retries.
    #[serde(default = "default_max_delay")]
    pub max_delay_seconds: f64,
    /// Randomize each delay between zero and its computed value.
    #[serde(default = "default_jitter")]
    pub jitter: bool,
    /// Status codes that should trigger a retry.
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: HashSet<u16>,
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_delay() -> f64 {
    1.0
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay() -> f64 {
    30.0
}

fn default_jitter() -> bool {
    true
}

fn default_retry_status_codes() -> HashSet<u16> {
    [429, 500, 502, 503, 504].into_iter().collect()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_seconds: default_max_delay(),
            jitter: default_jitter(),
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay.
    #[must_use]
    pub fn with_retry_delay(mut self, seconds: f64) -> Self {
        self.retry_delay_seconds = seconds;
        self
    }

    /// Disables jitter.
    #[must_use]
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Calculates the delay for a given attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.retry_delay_seconds * self.backoff_multiplier.powi(exponent);
        let capped = delay.min(self.max_delay_seconds).max(0.0);
        Duration::from_secs_f64(capped)
    }

    /// Whether a status code should trigger a retry.
    #[must_use]
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_status_codes.contains(&status)
    }
}

/// A named group of companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    /// Display name of the sector.
    pub name: String,
    /// Companies in display order.
    #[serde(default)]
    pub companies: Vec<String>,
}

/// Sector to company mapping offered to users picking a keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    sectors: Vec<Sector>,
}

impl Taxonomy {
    /// Creates a taxonomy from sectors in display order.
    #[must_use]
    pub fn new(sectors: Vec<Sector>) -> Self {
        Self { sectors }
    }

    /// Adds a sector.
    #[must_use]
    pub fn with_sector<I, S>(mut self, name: impl Into<String>, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sectors.push(Sector {
            name: name.into(),
            companies: companies.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Sector names in display order.
    pub fn sectors(&self) -> impl Iterator<Item = &str> {
        self.sectors.iter().map(|s| s.name.as_str())
    }

    /// All sectors.
    #[must_use]
    pub fn entries(&self) -> &[Sector] {
        &self.sectors
    }

    /// Companies listed under a sector.
    #[must_use]
    pub fn companies(&self, sector: &str) -> Option<&[String]> {
        self.sectors
            .iter()
            .find(|s| s.name == sector)
            .map(|s| s.companies.as_slice())
    }

    /// The sector a company belongs to.
    #[must_use]
    pub fn sector_of(&self, company: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|s| s.companies.iter().any(|c| c == company))
            .map(|s| s.name.as_str())
    }

    /// Whether there are no sectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Top-level configuration loaded once per process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Search backend configuration.
    #[serde(default)]
    pub search: SearchConfig,
    /// Sector and company taxonomy.
    #[serde(default)]
    pub taxonomy: Taxonomy,
}

impl WatchConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, WatchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WatchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            WatchError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

/// API key and engine identifier for the search backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The API key.
    pub api_key: String,
    /// The search engine (collection) identifier.
    pub engine_id: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self, WatchError> {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| WatchError::config(format!("missing environment variable {key}")))
        };
        Ok(Self::new(read(API_KEY_ENV)?, read(ENGINE_ID_ENV)?))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_target_count, 100);
        assert_eq!(config.preferred_sites.len(), 6);
        assert_eq!(config.error_policy, ErrorPolicy::Discard);
        assert!(config.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_search_config_builder() {
        let config = SearchConfig::new()
            .with_endpoint("http://localhost:8080/search")
            .with_preferred_sites(["example.com"])
            .with_timeout(5.0)
            .with_error_policy(ErrorPolicy::KeepPartial);

        assert_eq!(config.endpoint, "http://localhost:8080/search");
        assert_eq!(config.preferred_sites, vec!["example.com".to_string()]);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.error_policy, ErrorPolicy::KeepPartial);
    }

    #[test]
    fn test_effective_page_size_clamped() {
        let mut config = SearchConfig::default();
        config.page_size = 50;
        assert_eq!(config.effective_page_size(), 10);
        config.page_size = 0;
        assert_eq!(config.effective_page_size(), 1);
    }

    #[test]
    fn test_retry_config_delay() {
        let config = RetryConfig::default();

        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_config_max_delay() {
        let config = RetryConfig {
            max_delay_seconds: 5.0,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_disabled() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_retries, 0);
        assert!(config.should_retry_status(503));
    }

    #[test]
    fn test_taxonomy_lookups() {
        let taxonomy = Taxonomy::default()
            .with_sector("Healthcare", ["Albert Health", "Enbiosis"])
            .with_sector("Robotics", ["Atlas Robotics"]);

        assert_eq!(taxonomy.sectors().collect::<Vec<_>>(), vec!["Healthcare", "Robotics"]);
        assert_eq!(taxonomy.companies("Robotics").map(<[String]>::len), Some(1));
        assert_eq!(taxonomy.sector_of("Enbiosis"), Some("Healthcare"));
        assert_eq!(taxonomy.sector_of("Unknown"), None);
        assert!(taxonomy.companies("Finance").is_none());
    }

    #[test]
    fn test_watch_config_partial_json() {
        let config = WatchConfig::from_json_str(
            r#"{
                "search": { "preferred_sites": ["example.com"], "retry": { "max_retries": 1 } },
                "taxonomy": [ { "name": "Finance", "companies": ["More Wealth"] } ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.search.preferred_sites, vec!["example.com".to_string()]);
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.retry.max_retries, 1);
        assert!(config.search.retry.should_retry_status(429));
        assert_eq!(config.taxonomy.sector_of("More Wealth"), Some("Finance"));
    }

    #[test]
    fn test_watch_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "search": {{ "error_policy": "keep_partial" }} }}"#).unwrap();

        let config = WatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.search.error_policy, ErrorPolicy::KeepPartial);
        assert!(config.taxonomy.is_empty());
    }

    #[test]
    fn test_watch_config_missing_file() {
        let err = WatchConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("secret-key", "engine-1");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("engine-1"));
    }
}
