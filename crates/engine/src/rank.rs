//! BM25 passage ranking.

use crate::index::InvertedIndex;
use crate::tokenize::{index_terms, tokenize};
use clauseiq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ranking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingParams {
    /// Term-frequency saturation
    #[serde(default = "default_k1")]
    pub k1: f64,

    /// Length normalization strength, 0 (none) to 1 (full)
    #[serde(default = "default_b")]
    pub b: f64,

    /// Passages returned as answer context
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Passages scoring at or below this are dropped
    #[serde(default)]
    pub min_score: f64,
}

fn default_k1() -> f64 {
    1.2
}

fn default_b() -> f64 {
    0.75
}

fn default_top_k() -> usize {
    5
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
            top_k: default_top_k(),
            min_score: 0.0,
        }
    }
}

/// A passage and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPassage {
    pub passage: usize,
    pub score: f64,
}

/// Distinct index keys of a query, sorted.
///
/// Fails with `MalformedQuery` when the query has no word characters at all.
/// A query made only of stop words yields an empty set.
pub fn query_terms(query: &str) -> AppResult<BTreeSet<String>> {
    if query.trim().is_empty() {
        return Err(AppError::MalformedQuery("query is empty".to_string()));
    }

    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Err(AppError::MalformedQuery(format!(
            "query has no searchable words: {:?}",
            query
        )));
    }

    Ok(index_terms(&tokens).collect())
}

/// Rank passages for a query, best first, at most `k` of them.
///
/// Only passages sharing at least one term with the query are scored; ties
/// are broken by ascending passage index. An empty result means no query term
/// occurs in the document, which is a normal outcome.
pub fn rank(
    query: &str,
    index: &InvertedIndex,
    k: usize,
    params: &RankingParams,
) -> AppResult<Vec<RankedPassage>> {
    let terms = query_terms(query)?;
    if k == 0 || terms.is_empty() || index.passage_count() == 0 {
        return Ok(Vec::new());
    }

    let n = index.passage_count() as f64;
    let avg_len = index.avg_passage_len().max(1.0);

    let mut ranked: Vec<RankedPassage> = index
        .candidates(terms.iter().map(String::as_str))
        .into_iter()
        .map(|passage| {
            let len = index.passage_len(passage) as f64;
            let norm = 1.0 - params.b + params.b * len / avg_len;

            let score = terms
                .iter()
                .map(|term| {
                    let postings = index.postings_for_key(term);
                    let tf = postings
                        .binary_search_by_key(&passage, |p| p.passage)
                        .map(|i| postings[i].tf as f64)
                        .unwrap_or(0.0);
                    if tf == 0.0 {
                        return 0.0;
                    }
                    let df = postings.len() as f64;
                    let idf = ((n - df + 0.5) / (df + 0.5)).ln_1p();
                    idf * tf * (params.k1 + 1.0) / (tf + params.k1 * norm)
                })
                .sum::<f64>();

            RankedPassage { passage, score }
        })
        .filter(|r| r.score > 0.0 && r.score > params.min_score)
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.passage.cmp(&b.passage))
    });
    ranked.truncate(k);

    tracing::debug!(
        "Ranked {} passages for {} query terms",
        ranked.len(),
        terms.len()
    );

    Ok(ranked)
}
