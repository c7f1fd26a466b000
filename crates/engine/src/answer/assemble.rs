//! Turning a ranking into an answer with citations.

use super::types::{Answer, Citation, ContextPassage};
use crate::rank::{query_terms, RankedPassage};
use crate::text::{char_offset, sentence_spans, snippet, squash_whitespace};
use crate::tokenize::{index_terms, tokenize};
use crate::types::{DocumentId, Passage};
use std::collections::BTreeSet;

/// Assemble an answer from ranked passages.
///
/// The answer text is the sentence of the top passage that mentions the most
/// distinct query terms (the earliest one on ties). Every ranked passage is
/// returned as context. An empty ranking gives [`Answer::no_context`].
pub fn assemble(
    document: &DocumentId,
    passages: &[Passage],
    query: &str,
    ranked: &[RankedPassage],
    max_snippet_chars: usize,
) -> Answer {
    let Some(top) = ranked.first().and_then(|r| passages.get(r.passage)) else {
        tracing::info!("No matching context for query in document {}", document);
        return Answer::no_context(query);
    };

    let terms = query_terms(query).unwrap_or_default();
    let (start, end) = best_sentence(&top.text, &terms);
    let quote = &top.text[start..end];

    let citation = Citation {
        document: document.clone(),
        passage: top.index,
        page: top.page,
        start_char: top.start_char + char_offset(&top.text, start),
        end_char: top.start_char + char_offset(&top.text, end),
        quote: quote.to_string(),
    };

    let context = ranked
        .iter()
        .filter_map(|r| {
            passages.get(r.passage).map(|p| ContextPassage {
                passage: p.index,
                page: p.page,
                score: r.score,
                snippet: snippet(&p.text, max_snippet_chars),
            })
        })
        .collect();

    Answer {
        query: query.to_string(),
        answer: squash_whitespace(quote),
        found: true,
        citations: vec![citation],
        context,
    }
}

/// Byte span of the sentence with the most distinct query terms.
fn best_sentence(text: &str, terms: &BTreeSet<String>) -> (usize, usize) {
    let mut best: Option<((usize, usize), usize)> = None;

    for (start, end) in sentence_spans(text) {
        let tokens = tokenize(&text[start..end]);
        let hits = index_terms(&tokens)
            .filter(|t| terms.contains(t))
            .collect::<BTreeSet<_>>()
            .len();

        if best.map_or(true, |(_, most)| hits > most) {
            best = Some(((start, end), hits));
        }
    }

    best.map(|(span, _)| span).unwrap_or((0, text.len()))
}
