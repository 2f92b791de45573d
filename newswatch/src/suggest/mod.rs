//! Spelling suggestions mined from a result corpus.
//!
//! Every whitespace-delimited token in result titles and snippets is a
//! candidate. Candidates are ranked by frequency, terms already searched are
//! dropped, and the survivors are scored against the keyword.

mod matcher;

pub use matcher::{close_matches, ratio, SequenceMatcher};

use std::collections::HashMap;

use crate::models::{ResultSet, SuggestionList};
use matcher::by_score_desc;

/// Minimum similarity for a candidate to be suggested.
pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Proposes likely corrections for a searched keyword.
#[derive(Debug, Clone, Copy)]
pub struct SpellSuggestionEngine {
    cutoff: f64,
    max_suggestions: usize,
}

impl Default for SpellSuggestionEngine {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            max_suggestions: SuggestionList::MAX_LEN,
        }
    }
}

impl SpellSuggestionEngine {
    /// Creates an engine with cutoff 0.8 and three suggestions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the similarity cutoff, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    /// Sets how many suggestions to keep, at most three.
    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max.min(SuggestionList::MAX_LEN);
        self
    }

    /// Distinct corpus tokens by descending frequency, first occurrence
    /// breaking ties, with searched terms removed.
    #[must_use]
    pub fn candidates(&self, keyword: &str, results: &ResultSet) -> Vec<String> {
        let searched = searched_terms(keyword);
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

        let tokens = results
            .iter()
            .flat_map(|r| r.title.split_whitespace().chain(r.snippet.split_whitespace()));
        for (position, token) in tokens.enumerate() {
            counts.entry(token).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .filter(|(token, _)| !searched.contains(&token.to_lowercase()))
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.into_iter().map(|(token, _, _)| token.to_string()).collect()
    }

    /// Suggests up to three corpus tokens close to `keyword`.
    ///
    /// A candidate scores its best similarity against the whole keyword or
    /// any of its tokens. Output is ordered by score, then by the larger
    /// string on ties.
    #[must_use]
    pub fn suggest(&self, keyword: &str, results: &ResultSet) -> SuggestionList {
        let keyword = keyword.trim();
        if keyword.is_empty() || results.is_empty() || self.max_suggestions == 0 {
            return SuggestionList::default();
        }

        let mut references = vec![SequenceMatcher::new(keyword)];
        let tokens: Vec<&str> = keyword.split_whitespace().collect();
        if tokens.len() > 1 {
            references.extend(tokens.iter().map(|t| SequenceMatcher::new(t)));
        }

        let mut scored: Vec<(f64, String)> = self
            .candidates(keyword, results)
            .into_iter()
            .filter_map(|candidate| {
                let score = references
                    .iter()
                    .filter(|m| m.length_bound(&candidate) >= self.cutoff)
                    .map(|m| m.ratio(&candidate))
                    .fold(f64::NEG_INFINITY, f64::max);
                (score >= self.cutoff).then_some((score, candidate))
            })
            .collect();
        scored.sort_by(by_score_desc);

        tracing::debug!(
            keyword,
            qualifying = scored.len(),
            "scored suggestion candidates"
        );

        SuggestionList::new(
            scored
                .into_iter()
                .take(self.max_suggestions)
                .map(|(_, candidate)| candidate)
                .collect(),
        )
    }
}

/// Lowercased keyword and keyword tokens.
fn searched_terms(keyword: &str) -> Vec<String> {
    let keyword = keyword.trim();
    std::iter::once(keyword)
        .chain(keyword.split_whitespace())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotatedResult;
    use pretty_assertions::assert_eq;

    fn result(title: &str, snippet: &str) -> AnnotatedResult {
        AnnotatedResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            ..AnnotatedResult::default()
        }
    }

    fn corpus(items: &[(&str, &str)]) -> ResultSet {
        ResultSet::from_items(items.iter().map(|(t, s)| result(t, s)).collect())
    }

    #[test]
    fn test_suggests_close_token() {
        let results = corpus(&[
            ("Webrazzi raises funds", "Webrazzi reports growth"),
            ("Market news", "Webrazzi and others"),
        ]);

        let suggestions = SpellSuggestionEngine::new().suggest("Webrazi", &results);

        assert_eq!(suggestions.as_slice(), ["Webrazzi".to_string()]);
    }

    #[test]
    fn test_multi_word_typo() {
        let results = corpus(&[
            ("Albert Health raises seed round", "Albert Health expands to Europe"),
            ("Albert Health hires CTO", "Health startup Albert grows"),
        ]);

        let suggestions = SpellSuggestionEngine::new().suggest("Albert Healt", &results);

        assert!(suggestions.contains("Health"));
        assert!(!suggestions.contains("Albert"));
        assert!(!suggestions.contains("Albert Healt"));
    }

    #[test]
    fn test_never_suggests_keyword_any_case() {
        let results = corpus(&[("health HEALTH Health", "Healthy healths")]);

        let suggestions = SpellSuggestionEngine::new().suggest("Health", &results);

        assert!(!suggestions.iter().any(|s| s.eq_ignore_ascii_case("health")));
        assert!(suggestions.contains("Healthy"));
    }

    #[test]
    fn test_at_most_three() {
        let results = corpus(&[("cats cast cart carts", "cat")]);

        let suggestions = SpellSuggestionEngine::new().suggest("cat", &results);

        assert_eq!(suggestions.len(), 3);
        assert!(!suggestions.contains("cat"));
    }

    #[test]
    fn test_ties_prefer_larger_string() {
        let results = corpus(&[("cast cats", "")]);

        let suggestions = SpellSuggestionEngine::new().suggest("cat", &results);

        assert_eq!(
            suggestions.as_slice(),
            ["cats".to_string(), "cast".to_string()]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let engine = SpellSuggestionEngine::new();
        assert!(engine.suggest("anything", &ResultSet::new()).is_empty());
        assert!(engine
            .suggest("   ", &corpus(&[("title", "snippet")]))
            .is_empty());
    }

    #[test]
    fn test_no_close_candidates() {
        let results = corpus(&[("completely unrelated words", "nothing here")]);
        assert!(SpellSuggestionEngine::new()
            .suggest("Webrazi", &results)
            .is_empty());
    }

    #[test]
    fn test_candidates_ranked_by_frequency_then_first_seen() {
        let results = corpus(&[("beta alpha", "alpha gamma"), ("gamma", "delta alpha")]);

        let candidates = SpellSuggestionEngine::new().candidates("delta", &results);

        assert_eq!(candidates, vec!["alpha", "gamma", "beta"]);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let results = corpus(&[("HEALTH", "")]);
        assert!(SpellSuggestionEngine::new()
            .suggest("healt", &results)
            .is_empty());
    }

    #[test]
    fn test_lower_cutoff_and_limit() {
        let results = corpus(&[("apple ape peach puppy", "")]);

        let suggestions = SpellSuggestionEngine::new()
            .with_cutoff(0.6)
            .with_max_suggestions(1)
            .suggest("appel", &results);

        assert_eq!(suggestions.as_slice(), ["apple".to_string()]);
    }
}
