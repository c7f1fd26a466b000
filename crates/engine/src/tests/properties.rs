//! Property tests for segmentation, ranking, extraction and audit.

use crate::audit::audit;
use crate::extract::{extract, FieldName};
use crate::index::InvertedIndex;
use crate::rank::{rank, RankingParams};
use crate::segment::{segment, SegmentConfig};
use crate::types::{Page, Passage};
use proptest::prelude::*;

/// Words whose index terms never collide with each other.
const VOCABULARY: &[&str] = &["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel"];

/// Words never present in documents built from `VOCABULARY`.
const ABSENT: &[&str] = &["india", "juliet", "kilo", "lima"];

const JURISDICTIONS: &[&str] = &["Delaware", "England", "Ontario", "Texas"];

const CLAUSES: &[&str] = &[
    "This Agreement renews automatically unless either party gives 15 days written notice.",
    "This Agreement shall automatically renew for successive renewal terms.",
    "Party shall indemnify and hold harmless the other party from any and all claims.",
    "Each party shall be liable for its own acts and omissions under this Agreement.",
    "Total liability shall not exceed $1,000,000 in the aggregate.",
    "This Agreement shall be governed by the laws of Delaware.",
    "The Supplier shall deliver the services described in Schedule A.",
];

fn pages_of(texts: &[String]) -> Vec<Page> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Page::new(i as u32 + 1, text.clone()))
        .collect()
}

fn passages_of(texts: &[String]) -> Vec<Passage> {
    segment(&pages_of(texts), &SegmentConfig::default())
}

/// One page per passage: each page is a single line of 5 to 20 words.
fn word_pages() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..VOCABULARY.len(), 5..20), 1..8)
}

fn render(words: &[usize]) -> String {
    words
        .iter()
        .map(|&w| VOCABULARY[w])
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn segmentation_is_deterministic(texts in prop::collection::vec("[a-zA-Z0-9 .,;()\n-]{0,300}", 0..5)) {
            let pages = pages_of(&texts);
            let config = SegmentConfig::default();
            prop_assert_eq!(segment(&pages, &config), segment(&pages, &config));
        }

        #[test]
        fn passage_indices_are_dense(texts in prop::collection::vec("[a-zA-Z0-9 .,;()\n-]{0,300}", 0..5)) {
            let passages = passages_of(&texts);
            for (i, passage) in passages.iter().enumerate() {
                prop_assert_eq!(passage.index, i);
                prop_assert!(passage.start_char <= passage.end_char);
            }

            let index = InvertedIndex::build(&passages);
            prop_assert_eq!(index.passage_count(), passages.len());
            for term in index.terms() {
                for posting in index.postings_for_key(term) {
                    prop_assert!(posting.passage < passages.len());
                }
            }
        }

        #[test]
        fn repeating_a_present_term_never_lowers_its_score(
            pages in word_pages(),
            target in any::<prop::sample::Index>(),
            extra in 1usize..5,
        ) {
            let mut texts: Vec<String> = pages.iter().map(|p| render(p)).collect();
            let target = target.index(texts.len());
            let word = VOCABULARY[pages[target][0]];

            let params = RankingParams::default();
            let score_of = |texts: &[String]| {
                let index = InvertedIndex::build(&passages_of(texts));
                rank(word, &index, texts.len(), &params)
                    .unwrap()
                    .into_iter()
                    .find(|r| r.passage == target)
                    .map(|r| r.score)
            };

            let before = score_of(&texts[..]);
            prop_assert!(before.is_some());

            for _ in 0..extra {
                texts[target].push(' ');
                texts[target].push_str(word);
            }
            let after = score_of(&texts[..]);

            prop_assert!(after.unwrap() >= before.unwrap());
        }

        #[test]
        fn absent_terms_rank_nothing(pages in word_pages(), absent in prop::sample::select(ABSENT)) {
            let texts: Vec<String> = pages.iter().map(|p| render(p)).collect();
            let index = InvertedIndex::build(&passages_of(&texts));

            prop_assert!(rank(absent, &index, 10, &RankingParams::default()).unwrap().is_empty());
        }

        #[test]
        fn first_matching_passage_wins(
            layout in prop::collection::vec(prop::option::of(prop::sample::select(JURISDICTIONS)), 1..8),
        ) {
            let texts: Vec<String> = layout
                .iter()
                .map(|slot| match slot {
                    Some(place) => format!("This Agreement shall be governed by the laws of {}.", place),
                    None => "The Supplier shall deliver the services on time.".to_string(),
                })
                .collect();
            let record = extract(&passages_of(&texts));

            match layout.iter().position(Option::is_some) {
                Some(first) => {
                    let found = record.get(FieldName::GoverningLaw).unwrap();
                    prop_assert_eq!(found.passage, first);
                    prop_assert_eq!(found.value.as_text(), layout[first]);
                }
                None => prop_assert!(!record.is_set(FieldName::GoverningLaw)),
            }
        }

        #[test]
        fn audit_is_deterministic(picks in prop::collection::vec(0..CLAUSES.len(), 0..6)) {
            let texts: Vec<String> = picks.iter().map(|&i| CLAUSES[i].to_string()).collect();
            let passages = passages_of(&texts);
            let record = extract(&passages);

            let first = audit(&record, &passages);
            prop_assert_eq!(&first, &audit(&record, &passages));
            prop_assert_eq!(&first, &audit(&extract(&passages), &passages));
        }
    }
}
