//! Term-frequency keyword extraction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tokenize::{is_stop_word, tokenize_lower};

/// Number of terms returned by [`extract_keywords`].
pub const KEYWORD_LIMIT: usize = 5;

/// A keyword and its term-frequency weight within one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    /// Occurrences of the term divided by the number of kept tokens.
    pub weight: f64,
}

/// Per-call frequency table. Never outlives the call that built it.
#[derive(Default)]
struct TermFrequencies {
    /// term -> (count, index of first occurrence)
    counts: HashMap<String, (usize, usize)>,
    total: usize,
}

impl TermFrequencies {
    fn from_text(text: &str) -> Self {
        let mut table = Self::default();
        for token in tokenize_lower(text) {
            if token.chars().count() <= 3 || is_stop_word(&token) {
                continue;
            }
            let position = table.counts.len();
            table.counts.entry(token).or_insert((0, position)).0 += 1;
            table.total += 1;
        }
        table
    }

    /// Terms by descending count; ties keep first-occurrence order.
    fn ranked(self, limit: usize) -> Vec<Keyword> {
        let total = self.total.max(1) as f64;
        let mut terms: Vec<(String, usize, usize)> = self
            .counts
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        terms
            .into_iter()
            .take(limit)
            .map(|(term, count, _)| Keyword {
                term,
                weight: count as f64 / total,
            })
            .collect()
    }
}

/// Top keywords of a text with their weights, at most `limit` of them.
///
/// Tokens are lowercased; tokens of three characters or fewer and
/// stop-words are discarded.
pub fn weighted_keywords(text: &str, limit: usize) -> Vec<Keyword> {
    TermFrequencies::from_text(text).ranked(limit)
}

/// The top five keyword terms of a text, heaviest first.
pub fn extract_keywords(text: &str) -> Vec<String> {
    weighted_keywords(text, KEYWORD_LIMIT)
        .into_iter()
        .map(|k| k.term)
        .collect()
}
