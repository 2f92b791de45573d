//! Test assertions for search outcomes.

use crate::models::{ResultSet, SearchQuery, SuggestionList};
use crate::normalize::dates::parse_day_month_year;
use crate::normalize::CANONICAL_FORMAT;

/// Asserts that a result set respects the query's target count.
pub fn assert_within_target(results: &ResultSet, query: &SearchQuery) {
    assert!(
        results.len() <= query.target_count(),
        "Expected at most {} results, got {}",
        query.target_count(),
        results.len()
    );
}

/// Asserts that every non-empty date is in canonical form.
pub fn assert_dates_canonical(results: &ResultSet) {
    for result in results {
        if result.has_date() {
            let canonical = parse_day_month_year(&result.date)
                .map(|d| d.format(CANONICAL_FORMAT).to_string());
            assert!(
                canonical.as_deref() == Some(result.date.as_str()),
                "Expected canonical date for '{}', got '{}'",
                result.title,
                result.date
            );
        }
    }
}

/// Asserts that the searched keyword is not suggested back.
pub fn assert_not_suggested(suggestions: &SuggestionList, keyword: &str) {
    assert!(
        !suggestions
            .iter()
            .any(|s| s.to_lowercase() == keyword.to_lowercase()),
        "Keyword '{keyword}' was suggested back: {suggestions:?}"
    );
    assert!(
        suggestions.len() <= SuggestionList::MAX_LEN,
        "Expected at most {} suggestions, got {}",
        SuggestionList::MAX_LEN,
        suggestions.len()
    );
}
