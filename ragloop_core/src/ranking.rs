//! Lexical spec ranking.
//!
//! A spec scores one point for every query token found inside its text,
//! summed over all queries. Matching is case-insensitive substring
//! containment, so "crypt" matches "Encryption". Specs that match nothing are
//! never returned.

use crate::config::RetrievalConfig;
use crate::text::tokenize;
use crate::types::SpecText;

/// A spec with its overlap score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSpec<'a, S> {
    /// Position of the spec in the candidate pool
    pub index: usize,
    /// Total token hits across all queries
    pub score: usize,
    /// The spec itself
    pub spec: &'a S,
}

/// Scores `text` against a single query.
///
/// Each query token counts at most once, however often it occurs in the
/// text. Repeated tokens in the query count once per repetition.
pub fn score_text(text: &str, query: &str) -> usize {
    if text.is_empty() || query.is_empty() {
        return 0;
    }
    let haystack = text.to_lowercase();
    count_hits(&haystack, &tokenize(query))
}

fn count_hits(haystack: &str, query_tokens: &[String]) -> usize {
    query_tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()))
        .count()
}

/// Ranks specs against queries.
///
/// Holds the tokenized queries so a pool can be scored without
/// re-tokenizing per spec.
#[derive(Clone, Debug)]
pub struct SpecRanker {
    query_tokens: Vec<Vec<String>>,
    top_k: usize,
}

impl SpecRanker {
    /// Prepares a ranker for `queries`, keeping at most `top_k` specs.
    pub fn new<Q: AsRef<str>>(queries: &[Q], top_k: usize) -> Self {
        let query_tokens = queries
            .iter()
            .filter(|q| !q.as_ref().is_empty())
            .map(|q| tokenize(q.as_ref()))
            .collect();
        Self {
            query_tokens,
            top_k,
        }
    }

    /// Prepares a ranker using the config's `top_k`.
    pub fn with_config<Q: AsRef<str>>(queries: &[Q], config: &RetrievalConfig) -> Self {
        Self::new(queries, config.top_k)
    }

    /// Number of non-empty queries.
    pub fn query_count(&self) -> usize {
        self.query_tokens.len()
    }

    /// Total score of a spec text over every query.
    pub fn score(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let haystack = text.to_lowercase();
        self.query_tokens
            .iter()
            .map(|tokens| count_hits(&haystack, tokens))
            .sum()
    }

    /// Scores the pool and returns the best `top_k` specs, best first.
    ///
    /// Equal scores keep their pool order.
    pub fn rank<'a, S: SpecText>(&self, specs: &'a [S]) -> Vec<RankedSpec<'a, S>> {
        if specs.is_empty() || self.query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<RankedSpec<'a, S>> = specs
            .iter()
            .enumerate()
            .filter_map(|(index, spec)| {
                let score = self.score(spec.spec_text());
                (score > 0).then_some(RankedSpec { index, score, spec })
            })
            .collect();

        let matched = scored.len();
        // sort_by is stable, ties keep pool order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.top_k);

        tracing::debug!(
            "Ranked {} specs against {} queries: {} matched, {} kept",
            specs.len(),
            self.query_tokens.len(),
            matched,
            scored.len()
        );
        scored
    }

    /// Like [`rank`](Self::rank) without the scores.
    pub fn select<'a, S: SpecText>(&self, specs: &'a [S]) -> Vec<&'a S> {
        self.rank(specs).into_iter().map(|r| r.spec).collect()
    }
}

/// Returns specs with their scores, best first, at most `top_k`.
pub fn rank_specs<'a, S: SpecText, Q: AsRef<str>>(
    specs: &'a [S],
    queries: &[Q],
    top_k: usize,
) -> Vec<RankedSpec<'a, S>> {
    SpecRanker::new(queries, top_k).rank(specs)
}

/// Returns up to `top_k` specs with the highest query overlap.
///
/// # Examples
///
/// ```
/// use ragloop_core::{select_specs_by_queries, Spec};
///
/// let pool = vec![
///     Spec::new("Rotate encryption keys yearly"),
///     Spec::new("Office hours are 9 to 5"),
///     Spec::new("Audit key rotation events"),
/// ];
/// let picked = select_specs_by_queries(&pool, &["key rotation audit"], 5);
/// assert_eq!(picked.len(), 2);
/// assert_eq!(picked[0].text, "Audit key rotation events");
/// ```
pub fn select_specs_by_queries<'a, S: SpecText, Q: AsRef<str>>(
    specs: &'a [S],
    queries: &[Q],
    top_k: usize,
) -> Vec<&'a S> {
    SpecRanker::new(queries, top_k).select(specs)
}
