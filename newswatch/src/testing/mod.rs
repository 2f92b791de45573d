//! Testing utilities for search pipelines.
//!
//! This module provides:
//! - A scripted mock backend
//! - Raw-result fixtures
//! - Assertions for result sets and suggestions

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_dates_canonical, assert_not_suggested, assert_within_target};
pub use fixtures::{corpus_item, raw_item, raw_page};
pub use mocks::MockBackend;
