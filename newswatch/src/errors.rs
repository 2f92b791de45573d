//! Error types for the newswatch search pipeline.
//!
//! Backend and transport failures are fatal to the search invocation that hit
//! them. Date parsing problems never surface here: the normalizers absorb them
//! and fall back to the unformatted text.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::RetryConfig;

/// The main error type for newswatch operations.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The search backend answered with a non-success HTTP status.
    #[error("Search backend returned status {status}")]
    Backend {
        /// The HTTP status code.
        status: u16,
    },

    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered 2xx but the body could not be decoded.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// A search query violated its invariants.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration or credentials are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tabular export collaborator failed.
    #[error("Export error: {0}")]
    Export(String),

    /// The mail delivery collaborator failed.
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a backend error for a status code.
    #[must_use]
    pub fn backend(status: u16) -> Self {
        Self::Backend { status }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an export error.
    #[must_use]
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }

    /// The HTTP status carried by a backend error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Backend { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error came from talking to the search backend.
    #[must_use]
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::Transport(_) | Self::MalformedResponse(_)
        )
    }

    /// Whether a page request that failed with this error may be retried.
    ///
    /// Only transport failures and the configured transient statuses qualify.
    #[must_use]
    pub fn is_retryable(&self, retry: &RetryConfig) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Backend { status } => retry.should_retry_status(*status),
            _ => false,
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend { .. } => "BackendError",
            Self::Transport(_) => "TransportError",
            Self::MalformedResponse(_) => "MalformedResponse",
            Self::InvalidQuery(_) => "InvalidQuery",
            Self::Config(_) => "ConfigError",
            Self::Export(_) => "ExportError",
            Self::Delivery(_) => "DeliveryError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        if let Some(status) = self.status_code() {
            map.insert("status".to_string(), serde_json::json!(status));
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<csv::Error> for WatchError {
    fn from(error: csv::Error) -> Self {
        Self::export(error.to_string())
    }
}
