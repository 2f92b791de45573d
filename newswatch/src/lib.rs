//! # Newswatch
//!
//! Company and keyword news search over a paginated web-search API.
//!
//! Newswatch provides:
//!
//! - **Aggregation**: multi-page queries restricted to preferred news sites,
//!   capped at a target result count
//! - **Normalization**: publication dates pulled from snippets or page
//!   metadata and rendered as `DD MonthName YYYY`, plus canonical site names
//! - **Suggestions**: likely keyword corrections mined from the result corpus
//! - **Export**: tabular artifacts and delivery requests behind traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use newswatch::prelude::*;
//! use std::sync::Arc;
//!
//! let config = WatchConfig::from_file("newswatch.json")?;
//! let backend = HttpSearchBackend::new(config.search.clone(), Credentials::from_env()?)?;
//! let aggregator = SearchAggregator::from_config(Arc::new(backend), &config.search);
//!
//! let query = SearchQuery::from_config("Webrazzi", &config.search)?;
//! let results = aggregator.search(&query).await?;
//! let suggestions = SpellSuggestionEngine::new().suggest(query.keyword(), &results);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod aggregator;
pub mod backend;
pub mod config;
pub mod errors;
pub mod events;
pub mod export;
pub mod models;
pub mod normalize;
pub mod retry;
pub mod suggest;
pub mod testing;

#[cfg(test)]
mod aggregator_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregator::{PartialSearch, SearchAggregator};
    #[cfg(feature = "http")]
    pub use crate::backend::HttpSearchBackend;
    pub use crate::backend::{PageRequest, SearchBackend, SearchPage};
    pub use crate::config::{
        Credentials, ErrorPolicy, RetryConfig, SearchConfig, Sector, Taxonomy, WatchConfig,
    };
    pub use crate::errors::WatchError;
    pub use crate::events::{
        CollectingSearchObserver, LoggingSearchObserver, NoOpSearchObserver, SearchObserver,
    };
    pub use crate::export::{
        CsvExporter, DeliveryOutcome, DeliveryRequest, ExportArtifact, ExportRecord, JsonExporter,
        LoggingMailTransport, MailTransport, TabularExporter,
    };
    pub use crate::models::{
        AnnotatedResult, DateRange, RawResult, ResultSet, SearchQuery, SuggestionList,
    };
    pub use crate::normalize::{DateExtractor, DateFormatter, ResultNormalizer, SiteNameResolver};
    pub use crate::suggest::SpellSuggestionEngine;
}
