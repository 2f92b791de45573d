//! Ratcliff/Obershelp similarity over Unicode scalar values.
//!
//! Scores are `2 * M / T` where `M` counts characters in the recursively found
//! longest common blocks and `T` is the combined length. When the reference
//! sequence has 200 or more characters, characters occurring in more than
//! 1% of it (plus one) do not seed matches.

use std::cmp::Ordering;
use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Compares candidate strings against one fixed reference string.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    reference: Vec<char>,
    positions: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Indexes `reference` for repeated comparisons.
    #[must_use]
    pub fn new(reference: &str) -> Self {
        let reference: Vec<char> = reference.chars().collect();
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in reference.iter().enumerate() {
            positions.entry(*c).or_default().push(j);
        }

        let n = reference.len();
        if n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            positions.retain(|_, idxs| idxs.len() <= threshold);
        }

        Self {
            reference,
            positions,
        }
    }

    /// Similarity of `candidate` to the reference, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, candidate: &str) -> f64 {
        let a: Vec<char> = candidate.chars().collect();
        let total = a.len() + self.reference.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matching_chars(&a) as f64 / total as f64
    }

    /// Upper bound on [`Self::ratio`] from lengths alone.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn length_bound(&self, candidate: &str) -> f64 {
        let la = candidate.chars().count();
        let lb = self.reference.len();
        if la + lb == 0 {
            return 1.0;
        }
        2.0 * la.min(lb) as f64 / (la + lb) as f64
    }

    fn matching_chars(&self, a: &[char]) -> usize {
        let mut queue = vec![(0, a.len(), 0, self.reference.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` in the given window, earliest in
    /// `a` then earliest in `b` on ties.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.reference;
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_runs = HashMap::new();
            if let Some(idxs) = self.positions.get(c) {
                for &j in idxs {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j == 0 {
                        0
                    } else {
                        run_ending_at.get(&(j - 1)).copied().unwrap_or(0)
                    };
                    let k = prev + 1;
                    next_runs.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_ending_at = next_runs;
        }

        // characters dropped from the index can still extend a block
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }
}

/// Similarity of `a` to `b`.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}

/// Orders scored matches best first; equal scores put the larger string first.
pub(crate) fn by_score_desc(left: &(f64, String), right: &(f64, String)) -> Ordering {
    right
        .0
        .partial_cmp(&left.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| right.1.cmp(&left.1))
}

/// The best `n` candidates scoring at least `cutoff` against `word`.
#[must_use]
pub fn close_matches<I, S>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let matcher = SequenceMatcher::new(word);
    let mut scored: Vec<(f64, String)> = candidates
        .into_iter()
        .filter(|c| matcher.length_bound(c.as_ref()) >= cutoff)
        .filter_map(|c| {
            let score = matcher.ratio(c.as_ref());
            (score >= cutoff).then(|| (score, c.as_ref().to_string()))
        })
        .collect();
    scored.sort_by(by_score_desc);
    scored.into_iter().take(n).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn test_ratio_shifted_block() {
        assert!(approx(ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn test_ratio_identical_and_empty() {
        assert!(approx(ratio("Health", "Health"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_ratio_missing_letter() {
        assert!(approx(ratio("Health", "Healt"), 10.0 / 11.0));
        assert!(approx(ratio("Webrazzi", "Webrazi"), 14.0 / 15.0));
    }

    #[test]
    fn test_ratio_is_case_sensitive() {
        assert!(ratio("health", "HEALTH") < 0.5);
    }

    #[test]
    fn test_ratio_recurses_on_both_sides() {
        // "apple" vs "appel": "app" plus one of the trailing letters
        assert!(approx(ratio("apple", "appel"), 0.8));
    }

    #[test]
    fn test_ratio_long_identical_reference() {
        let text = "a".repeat(250);
        assert!(approx(ratio(&text, &text), 1.0));
    }

    #[test]
    fn test_close_matches_orders_by_score() {
        let found = close_matches("appel", ["ape", "apple", "peach", "puppy"], 3, 0.6);
        assert_eq!(found, vec!["apple".to_string(), "ape".to_string()]);
    }

    #[test]
    fn test_close_matches_ties_prefer_larger_string() {
        let found = close_matches("cat", ["cast", "cats"], 3, 0.8);
        assert_eq!(found, vec!["cats".to_string(), "cast".to_string()]);
    }

    #[test]
    fn test_close_matches_respects_limit_and_cutoff() {
        let found = close_matches("cat", ["cats", "cast", "cart", "dog"], 2, 0.8);
        assert_eq!(found.len(), 2);
        assert!(!found.contains(&"dog".to_string()));
    }

    #[test]
    fn test_length_bound_is_upper_bound() {
        let matcher = SequenceMatcher::new("Health");
        for candidate in ["Healt", "Wealth", "H", "Healthcare"] {
            assert!(matcher.length_bound(candidate) >= matcher.ratio(candidate));
        }
    }
}
