//! Per-document inverted index over passages.

use crate::tokenize::{index_terms, is_stop_word, normalize_word, stem};
use crate::types::Passage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry of a postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Passage index
    pub passage: usize,

    /// Occurrences of the term in that passage
    pub tf: u32,
}

/// Term to postings map for the passages of one document.
///
/// Built once and never mutated; re-ingestion builds a new index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Vec<Posting>>,

    /// Distinct indexed terms per passage
    passage_lengths: Vec<usize>,

    avg_passage_len: f64,
}

impl InvertedIndex {
    /// Index passages in a single pass.
    ///
    /// Passages are expected in index order (`passages[i].index == i`), which
    /// is what the segmenter produces; postings lists come out sorted by
    /// passage index.
    pub fn build(passages: &[Passage]) -> Self {
        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut passage_lengths = Vec::with_capacity(passages.len());

        for passage in passages {
            debug_assert_eq!(passage.index, passage_lengths.len());

            let mut counts: BTreeMap<String, u32> = BTreeMap::new();
            for term in index_terms(&passage.tokens) {
                *counts.entry(term).or_default() += 1;
            }

            passage_lengths.push(counts.len());

            for (term, tf) in counts {
                postings.entry(term).or_default().push(Posting {
                    passage: passage.index,
                    tf,
                });
            }
        }

        let avg_passage_len = if passage_lengths.is_empty() {
            0.0
        } else {
            passage_lengths.iter().sum::<usize>() as f64 / passage_lengths.len() as f64
        };

        tracing::debug!(
            "Indexed {} passages, {} terms, avg length {:.2}",
            passage_lengths.len(),
            postings.len(),
            avg_passage_len
        );

        Self {
            postings,
            passage_lengths,
            avg_passage_len,
        }
    }

    /// Occurrences of `term` in a passage; 0 for unknown terms or passages.
    ///
    /// `term` may be any surface form ("Laws", "governing"); it is normalized
    /// the same way passage tokens are.
    pub fn term_frequency(&self, term: &str, passage: usize) -> u32 {
        let postings = self.postings(term);
        postings
            .binary_search_by_key(&passage, |p| p.passage)
            .map(|i| postings[i].tf)
            .unwrap_or(0)
    }

    /// Number of passages containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    /// Postings list for a term, sorted by passage index.
    pub fn postings(&self, term: &str) -> &[Posting] {
        index_key(term)
            .and_then(|key| self.postings.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Postings for an already normalized index term.
    pub(crate) fn postings_for_key(&self, key: &str) -> &[Posting] {
        self.postings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length of a passage for normalization: its distinct indexed terms.
    pub fn passage_len(&self, passage: usize) -> usize {
        self.passage_lengths.get(passage).copied().unwrap_or(0)
    }

    pub fn avg_passage_len(&self) -> f64 {
        self.avg_passage_len
    }

    pub fn passage_count(&self) -> usize {
        self.passage_lengths.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Indexed terms in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Passage indices that contain at least one of the keys.
    pub(crate) fn candidates<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> BTreeSet<usize> {
        keys.into_iter()
            .flat_map(|key| self.postings_for_key(key).iter().map(|p| p.passage))
            .collect()
    }
}

/// Normalize a surface word to its index key, or `None` for stop words and
/// words without alphanumerics.
pub fn index_key(term: &str) -> Option<String> {
    let word = normalize_word(term)?;
    if is_stop_word(&word) {
        return None;
    }
    Some(stem(&word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{segment, SegmentConfig};
    use crate::types::Page;

    fn index_of(texts: &[&str]) -> (Vec<Passage>, InvertedIndex) {
        let pages: Vec<Page> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Page::new(i as u32 + 1, *text))
            .collect();
        let passages = segment(&pages, &SegmentConfig::default());
        let index = InvertedIndex::build(&passages);
        (passages, index)
    }

    #[test]
    fn test_term_and_document_frequency() {
        let (_, index) = index_of(&[
            "Fees are payable monthly and fees are due in advance.",
            "The Supplier invoices fees quarterly for all services.",
            "Either party may terminate this agreement for convenience.",
        ]);

        assert_eq!(index.passage_count(), 3);
        assert_eq!(index.term_frequency("fees", 0), 2);
        assert_eq!(index.term_frequency("Fees", 1), 1);
        assert_eq!(index.term_frequency("fees", 2), 0);
        assert_eq!(index.document_frequency("fee"), 2);
        assert_eq!(index.document_frequency("terminate"), 1);
        assert_eq!(index.document_frequency("unknown"), 0);
    }

    #[test]
    fn test_stop_words_are_not_indexed() {
        let (passages, index) = index_of(&["The law of the land applies to the parties."]);

        assert_eq!(index.document_frequency("the"), 0);
        assert_eq!(index.term_frequency("of", 0), 0);
        // Still present in the passage for display.
        assert!(passages[0].tokens.contains(&"the".to_string()));
    }

    #[test]
    fn test_inflections_share_a_term() {
        let (_, index) = index_of(&["This Agreement shall be governed by the laws of Delaware."]);

        assert_eq!(index.term_frequency("governing", 0), 1);
        assert_eq!(index.term_frequency("law", 0), 1);
    }

    #[test]
    fn test_passage_length_counts_distinct_terms() {
        let (_, index) = index_of(&[
            "Notice notice notice must be given in writing always.",
            "Payment is due within thirty days of the invoice date.",
        ]);

        // notic, must, given, writ, alway
        assert_eq!(index.passage_len(0), 5);
        assert!(index.avg_passage_len() > 0.0);
        assert_eq!(index.passage_len(99), 0);
    }

    #[test]
    fn test_postings_reference_existing_passages() {
        let (passages, index) = index_of(&[
            "Confidential information must be protected by the recipient.",
            "Confidential information excludes public information.\n\nThe recipient may disclose if required by law.",
        ]);

        for term in index.terms() {
            for posting in index.postings_for_key(term) {
                assert!(posting.passage < passages.len());
                assert!(posting.tf > 0);
            }
        }
        let postings = index.postings("confidential");
        assert!(postings.windows(2).all(|w| w[0].passage < w[1].passage));
    }

    #[test]
    fn test_empty_index() {
        let index = InvertedIndex::build(&[]);
        assert_eq!(index.passage_count(), 0);
        assert_eq!(index.vocabulary_size(), 0);
        assert_eq!(index.avg_passage_len(), 0.0);
    }
}
