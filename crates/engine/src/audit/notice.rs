//! Notice-period expressions ("15 days written notice", "thirty (30) days'
//! prior notice") resolved to days.

use crate::text::sentence_containing;
use regex::{Captures, Regex};

lazy_static::lazy_static! {
    static ref PERIOD: Regex = Regex::new(
        r"(?i)\b(?:(\d{1,3})|(one|two|three|four|five|six|seven|eight|nine|ten|fourteen|fifteen|twenty|thirty|forty-five|sixty|ninety))(?:\s*\((\d{1,3})\))?\s+(?:calendar\s+|business\s+|working\s+)?(days?|weeks?|months?)\b"
    )
    .unwrap();

    static ref NOTICE: Regex = Regex::new(r"(?i)\bnotice\b|\bnotif(?:y|ication)\b").unwrap();
}

/// A notice period found in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticePeriod {
    /// Period length in days (weeks count 7, months 30)
    pub days: u32,

    /// Byte span of the expression
    pub start: usize,
    pub end: usize,
}

/// Nouns that make a period describe a term rather than a notice window.
const TERM_NOUNS: [&str; 3] = ["term", "period", "renewal"];

/// The period expression closest to a notice keyword in the same sentence.
///
/// Periods that name a term length ("12 month terms", "one year renewal
/// periods") are skipped. Ties go to the earlier expression.
pub fn notice_period(text: &str) -> Option<NoticePeriod> {
    let mut best: Option<(usize, NoticePeriod)> = None;

    for caps in PERIOD.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if names_a_term(&text[whole.end()..]) {
            continue;
        }

        let (start, end) = sentence_containing(text, whole.start());
        let distance = NOTICE
            .find_iter(&text[start..end])
            .map(|m| span_gap((whole.start(), whole.end()), (start + m.start(), start + m.end())))
            .min();
        let Some(distance) = distance else { continue };
        if best.as_ref().is_some_and(|(d, _)| *d <= distance) {
            continue;
        }

        if let Some(period) = period_from(&caps) {
            best = Some((distance, period));
        }
    }

    best.map(|(_, period)| period)
}

fn period_from(caps: &Captures<'_>) -> Option<NoticePeriod> {
    let whole = caps.get(0)?;
    let count = caps
        .get(3)
        .or_else(|| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .or_else(|| caps.get(2).and_then(|m| number_word(m.as_str())))?;

    let unit = caps.get(4)?.as_str().to_lowercase();
    let per_unit = if unit.starts_with("week") {
        7
    } else if unit.starts_with("month") {
        30
    } else {
        1
    };

    Some(NoticePeriod {
        days: count * per_unit,
        start: whole.start(),
        end: whole.end(),
    })
}

fn names_a_term(rest: &str) -> bool {
    let next = rest.trim_start().to_lowercase();
    TERM_NOUNS.iter().any(|noun| next.starts_with(noun))
}

/// Bytes between two spans, zero when they overlap.
fn span_gap(a: (usize, usize), b: (usize, usize)) -> usize {
    if a.1 <= b.0 {
        b.0 - a.1
    } else if b.1 <= a.0 {
        a.0 - b.1
    } else {
        0
    }
}

fn number_word(word: &str) -> Option<u32> {
    let value = match word.to_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "fourteen" => 14,
        "fifteen" => 15,
        "twenty" => 20,
        "thirty" => 30,
        "forty-five" => 45,
        "sixty" => 60,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}
