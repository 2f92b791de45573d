//! Raw-result fixtures.

use crate::models::RawResult;

/// A distinct raw item numbered `n`, dated via its snippet.
#[must_use]
pub fn raw_item(n: usize) -> RawResult {
    RawResult::new(
        format!("Result {n}"),
        format!("https://www.example.com/news/{n}"),
        "www.example.com",
        format!("Story number {n} published 5 March 2024 online"),
    )
}

/// `count` distinct items numbered from `first`.
#[must_use]
pub fn raw_page(first: usize, count: usize) -> Vec<RawResult> {
    (first..first + count).map(raw_item).collect()
}

/// An item carrying only the given title and snippet text.
///
/// Useful for building suggestion corpora.
#[must_use]
pub fn corpus_item(title: &str, snippet: &str) -> RawResult {
    RawResult::new(title, "https://startupwatch.example/item", "startupwatch.example", snippet)
}
