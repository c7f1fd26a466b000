//! Text segmentation: pages in, ordered passages out.
//!
//! Each page is cut into paragraphs at blank lines and at lines that look
//! like bullets or headings. Oversized paragraphs are split at semantic
//! boundaries with `text-splitter`; fragments that are too short to be
//! useful are folded into their neighbours. Passages never span pages and
//! are numbered densely in reading order.

mod boundaries;
mod merging;

pub use boundaries::{is_bullet, is_heading, starts_block};

use crate::tokenize::tokenize;
use crate::types::{Page, Passage};
use serde::{Deserialize, Serialize};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// Configuration for segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Passages with fewer tokens are merged with a neighbour
    #[serde(default = "default_min_passage_tokens")]
    pub min_passage_tokens: usize,

    /// Paragraphs longer than this (in characters) are split further
    #[serde(default = "default_max_passage_chars")]
    pub max_passage_chars: usize,
}

fn default_min_passage_tokens() -> usize {
    5
}

fn default_max_passage_chars() -> usize {
    1200
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_passage_tokens: default_min_passage_tokens(),
            max_passage_chars: default_max_passage_chars(),
        }
    }
}

/// A byte span of one page, before it becomes a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub start: usize,
    pub end: usize,
    pub tokens: usize,
}

/// Segment pages into passages.
///
/// Pages are processed in page-number order (stable for duplicates).
/// Identical input always yields identical passages.
pub fn segment(pages: &[Page], config: &SegmentConfig) -> Vec<Passage> {
    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by_key(|p| p.number);

    let splitter: TextSplitter<Characters> =
        TextSplitter::new(ChunkConfig::new(config.max_passage_chars.max(1)));
    let mut passages = Vec::new();

    for page in ordered {
        let text = page.text.as_str();
        let offsets = CharOffsets::new(text);

        let fragments: Vec<Fragment> = paragraph_spans(text)
            .into_iter()
            .flat_map(|(start, end)| split_oversized(text, start, end, config, &splitter))
            .map(|(start, end)| Fragment {
                start,
                end,
                tokens: tokenize(&text[start..end]).len(),
            })
            .collect();

        let merged = merging::merge_short_fragments(
            fragments,
            config.min_passage_tokens,
            |start, end| tokenize(&text[start..end]).len(),
        );

        for fragment in merged {
            let slice = &text[fragment.start..fragment.end];
            passages.push(Passage {
                index: passages.len(),
                page: page.number,
                start_char: offsets.char_at(fragment.start),
                end_char: offsets.char_at(fragment.end),
                text: slice.to_string(),
                tokens: tokenize(slice),
            });
        }
    }

    tracing::debug!(
        "Segmented {} pages into {} passages",
        pages.len(),
        passages.len()
    );

    passages
}

/// Find paragraph byte spans, trimmed of surrounding whitespace.
fn paragraph_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            spans.extend(current.take());
            continue;
        }

        let lead = line.len() - line.trim_start().len();
        let start = line_start + lead;
        let end = start + trimmed.len();

        current = match current {
            Some(span) if starts_block(trimmed) => {
                spans.push(span);
                Some((start, end))
            }
            Some((span_start, _)) => Some((span_start, end)),
            None => Some((start, end)),
        };
    }

    spans.extend(current);
    spans
}

/// Split a span that exceeds the configured size at semantic boundaries.
fn split_oversized(
    text: &str,
    start: usize,
    end: usize,
    config: &SegmentConfig,
    splitter: &TextSplitter<Characters>,
) -> Vec<(usize, usize)> {
    let span = &text[start..end];
    if span.chars().count() <= config.max_passage_chars {
        return vec![(start, end)];
    }

    splitter
        .chunk_indices(span)
        .filter(|(_, chunk)| !chunk.trim().is_empty())
        .map(|(offset, chunk)| (start + offset, start + offset + chunk.len()))
        .collect()
}

/// Byte offset to character offset conversion for one page.
struct CharOffsets {
    boundaries: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self {
            boundaries: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    /// Character offset of a byte offset that lies on a char boundary.
    fn char_at(&self, byte: usize) -> usize {
        self.boundaries.partition_point(|&b| b < byte)
    }
}
