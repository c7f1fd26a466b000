//! Line classification for paragraph boundaries.

use crate::extract::normalize_currency;
use regex::Regex;

lazy_static::lazy_static! {
    /// List markers: dashes and bullets, "(a)", "a)", "(iv)", "1.", "2)", "1.2", "3.1.4".
    static ref BULLET_PATTERN: Regex = Regex::new(
        r"(?i)^(?:[-*•‣◦▪–]\s+|\([a-z]\)\s+|[a-z]\)\s+|\([ivxlc]+\)\s+|\d+[.)]\s+|\d+(?:\.\d+)+\.?\s+)"
    )
    .unwrap();

    /// Numbered structural headings: "Section 5", "ARTICLE IV", "Schedule 2".
    static ref HEADING_PATTERN: Regex = Regex::new(
        r"(?i)^(?:section|article|clause|schedule|exhibit|appendix|annex)\s+(?:\d+(?:\.\d+)*|[ivxlc]+|[a-z])\b"
    )
    .unwrap();
}

/// Maximum words for an upper-case line to count as a heading.
const MAX_HEADING_WORDS: usize = 8;

/// Whether a trimmed line should open a new paragraph.
pub fn starts_block(line: &str) -> bool {
    is_bullet(line) || is_heading(line)
}

/// Whether a trimmed line begins with a list marker.
pub fn is_bullet(line: &str) -> bool {
    BULLET_PATTERN.is_match(line)
}

/// Whether a trimmed line looks like a heading.
///
/// Upper-case lines count only when they read as words: wrapped amounts
/// such as "USD 500,000." stay with the sentence they finish.
pub fn is_heading(line: &str) -> bool {
    if HEADING_PATTERN.is_match(line) {
        return true;
    }
    if line.ends_with(['.', ',']) {
        return false;
    }

    let body = match BULLET_PATTERN.find(line) {
        Some(marker) => &line[marker.end()..],
        None => line,
    };
    if body.chars().any(|c| c.is_ascii_digit() || matches!(c, '$' | '€' | '£' | '₹')) {
        return false;
    }

    let words: Vec<&str> = body.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_HEADING_WORDS {
        return false;
    }
    if words.iter().any(|w| normalize_currency(w).is_some()) {
        return false;
    }

    let has_word = words
        .iter()
        .any(|w| w.chars().filter(|c| c.is_alphabetic()).count() >= 3);
    has_word && !body.chars().any(|c| c.is_lowercase())
}
