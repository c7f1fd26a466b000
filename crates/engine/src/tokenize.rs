//! Text normalization shared by the segmenter, the index and the ranker.

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

lazy_static::lazy_static! {
    /// Words that carry no retrieval signal; excluded from the index only.
    static ref STOP_WORDS: HashSet<&'static str> = [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has",
        "have", "in", "is", "it", "its", "of", "on", "or", "that", "the", "their", "them",
        "they", "this", "to", "was", "were", "which", "with",
    ]
    .into_iter()
    .collect();
}

/// Split text into normalized tokens.
///
/// Words follow Unicode word boundaries (UAX #29); each word is lowercased
/// and stripped of any non-alphanumeric characters ("Party's" becomes
/// "partys", "1,000" becomes "1000"). Words left empty are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().filter_map(normalize_word).collect()
}

/// Normalize a single word, returning `None` if nothing alphanumeric remains.
pub fn normalize_word(word: &str) -> Option<String> {
    let normalized: String = word
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Whether a normalized token is on the stop-word list.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Reduce an English word to a crude stem so inflections share a term.
///
/// Only a handful of suffixes are stripped ("ies", "ing", "ed", "es", "s",
/// trailing "e"), enough for "governed", "governing" and "govern" to meet.
/// Words of three characters or fewer, and anything with digits, are left
/// alone.
pub fn stem(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 3 || !chars.iter().all(|c| c.is_alphabetic()) {
        return token.to_string();
    }

    // Strip `n` trailing chars only if at least three remain.
    let strip = |suffix: &str, n: usize| -> Option<String> {
        (token.ends_with(suffix) && chars.len() >= n + 3)
            .then(|| chars[..chars.len() - n].iter().collect())
    };

    let stripped = strip("ies", 3)
        .map(|base| format!("{}y", base))
        .or_else(|| strip("ing", 3))
        .or_else(|| strip("ed", 2))
        .or_else(|| {
            ["sses", "xes", "ches", "shes"]
                .iter()
                .find_map(|suffix| strip(suffix, 2))
        })
        .or_else(|| {
            if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
                None
            } else {
                strip("s", 1)
            }
        })
        .unwrap_or_else(|| token.to_string());

    match stripped.strip_suffix('e') {
        Some(base) if base.chars().count() >= 4 => base.to_string(),
        _ => stripped,
    }
}

/// Terms that participate in indexing and ranking: stop words dropped,
/// the rest stemmed.
pub fn index_terms(tokens: &[String]) -> impl Iterator<Item = String> + '_ {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !is_stop_word(t))
        .map(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("This Agreement, governed by the LAWS of Delaware."),
            vec!["this", "agreement", "governed", "by", "the", "laws", "of", "delaware"]
        );
    }

    #[test]
    fn test_tokenize_keeps_numbers_together() {
        assert_eq!(tokenize("USD 1,000,000.00"), vec!["usd", "100000000"]);
        assert_eq!(tokenize("Party's notice"), vec!["partys", "notice"]);
    }

    #[test]
    fn test_tokenize_handles_non_ascii() {
        assert_eq!(tokenize("Société Générale — Zürich"), vec!["société", "générale", "zürich"]);
        assert!(tokenize("  ... --- !!! ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_index_terms_skip_stop_words() {
        let tokens = tokenize("the law of the land");
        let terms: Vec<String> = index_terms(&tokens).collect();
        assert_eq!(terms, vec!["law", "land"]);
    }

    #[test]
    fn test_stem_joins_inflections() {
        assert_eq!(stem("governing"), "govern");
        assert_eq!(stem("governed"), "govern");
        assert_eq!(stem("laws"), "law");
        assert_eq!(stem("parties"), "party");
        assert_eq!(stem("terminate"), stem("terminated"));
        assert_eq!(stem("notices"), stem("notice"));
        assert_eq!(stem("business"), "business");
        assert_eq!(stem("days"), "day");
        assert_eq!(stem("need"), "need");
        assert_eq!(stem("1000"), "1000");
    }
}
