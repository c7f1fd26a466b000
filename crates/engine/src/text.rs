//! Small text utilities: sentence spans, offsets and snippets.

/// Words that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "inc", "corp", "ltd", "llc", "co", "no", "nos", "mr", "mrs", "ms", "dr", "st", "sec", "art",
    "u.s", "e.g", "i.e", "etc", "vs", "approx",
];

/// Byte spans of the sentences in `text`, trimmed and in order.
///
/// A sentence ends at `.`, `!`, `?` or `;` followed by whitespace or the end
/// of the text, and at a blank line. A period after a known abbreviation
/// ("Corp.", "e.g.") does not end a sentence.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|(_, n)| *n);
        let at_boundary = next.map_or(true, char::is_whitespace);

        let ends = match c {
            '.' => at_boundary && !follows_abbreviation(&text[start..i]),
            '!' | '?' | ';' => at_boundary,
            '\n' => next == Some('\n') || text[i + 1..].starts_with("\r\n"),
            _ => false,
        };

        if ends {
            push_trimmed(text, start, i + c.len_utf8(), &mut spans);
            start = i + c.len_utf8();
        }
    }

    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

fn follows_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    spans.push((start + lead, start + lead + trimmed.len()));
}

/// The sentence span that contains byte offset `at`.
///
/// Falls back to the whole trimmed text when `at` sits between sentences.
pub fn sentence_containing(text: &str, at: usize) -> (usize, usize) {
    sentence_spans(text)
        .into_iter()
        .find(|(start, end)| *start <= at && at < *end)
        .unwrap_or_else(|| {
            let lead = text.len() - text.trim_start().len();
            (lead, lead + text.trim().len())
        })
}

/// Character offset of a byte offset.
pub fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Collapse runs of whitespace into single spaces.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters at a word boundary, adding "...".
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = squash_whitespace(text);
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let truncated = &text[..cut];

    match truncated.rfind(char::is_whitespace) {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        sentence_spans(text)
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect()
    }

    #[test]
    fn test_sentence_spans() {
        assert_eq!(
            sentences("Fees are due net 30. Late fees apply!  Is that clear? Yes"),
            vec!["Fees are due net 30.", "Late fees apply!", "Is that clear?", "Yes"]
        );
    }

    #[test]
    fn test_sentence_spans_keep_abbreviations_and_decimals() {
        assert_eq!(
            sentences("Acme Corp. shall pay USD 1,000.50 to Beta Inc. on signing. Done."),
            vec!["Acme Corp. shall pay USD 1,000.50 to Beta Inc. on signing.", "Done."]
        );
    }

    #[test]
    fn test_sentence_spans_split_on_semicolons_and_blank_lines() {
        assert_eq!(
            sentences("first clause; second clause\n\nthird part"),
            vec!["first clause;", "second clause", "third part"]
        );
    }

    #[test]
    fn test_sentence_containing() {
        let text = "One sentence here. Another one there.";
        let at = text.find("Another").unwrap();
        let (s, e) = sentence_containing(text, at);
        assert_eq!(&text[s..e], "Another one there.");
    }

    #[test]
    fn test_char_offset() {
        let text = "Zürich law";
        assert_eq!(char_offset(text, text.find("law").unwrap()), 7);
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("Short   text", 100), "Short text");

        let long = "This is a very long text that needs to be truncated at some point";
        let result = snippet(long, 30);
        assert!(result.ends_with("..."));
        assert!(result.chars().count() <= 33);

        let accented = "é".repeat(50);
        assert_eq!(snippet(&accented, 10).chars().count(), 13);
    }
}
