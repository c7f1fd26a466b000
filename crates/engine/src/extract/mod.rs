//! Heuristic field extraction over segmented passages.
//!
//! The matcher table in [`matchers`] is data; [`extract`] is the single
//! interpreter that evaluates it. Passages are visited in document order
//! and, inside each passage, every field that is still open tries its
//! matchers in priority order. Single-valued fields close on their first
//! match; `parties` and `signatories` stay open and collect every match.

pub mod matchers;
mod money;

pub use matchers::{MatcherSpec, ValueRule, MATCHERS};
pub use money::{normalize_currency, parse_amount, parse_cap, LiabilityCap};

use crate::text::{char_offset, sentence_containing, squash_whitespace};
use crate::types::Passage;
use regex::{Captures, Regex};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

lazy_static::lazy_static! {
    static ref COMPILED: Vec<(MatcherSpec, Regex)> = MATCHERS
        .iter()
        .map(|spec| (*spec, Regex::new(spec.pattern).unwrap()))
        .collect();
}

/// The fixed set of contract fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Parties,
    EffectiveDate,
    Term,
    GoverningLaw,
    PaymentTerms,
    Termination,
    AutoRenewal,
    Confidentiality,
    Indemnity,
    LiabilityCap,
    Signatories,
}

impl FieldName {
    /// All fields in record order.
    pub const ALL: [FieldName; 11] = [
        FieldName::Parties,
        FieldName::EffectiveDate,
        FieldName::Term,
        FieldName::GoverningLaw,
        FieldName::PaymentTerms,
        FieldName::Termination,
        FieldName::AutoRenewal,
        FieldName::Confidentiality,
        FieldName::Indemnity,
        FieldName::LiabilityCap,
        FieldName::Signatories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Parties => "parties",
            FieldName::EffectiveDate => "effective_date",
            FieldName::Term => "term",
            FieldName::GoverningLaw => "governing_law",
            FieldName::PaymentTerms => "payment_terms",
            FieldName::Termination => "termination",
            FieldName::AutoRenewal => "auto_renewal",
            FieldName::Confidentiality => "confidentiality",
            FieldName::Indemnity => "indemnity",
            FieldName::LiabilityCap => "liability_cap",
            FieldName::Signatories => "signatories",
        }
    }

    /// Multi-valued fields accumulate every match instead of the first.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, FieldName::Parties | FieldName::Signatories)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// An extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Money(LiabilityCap),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Money(_) => None,
        }
    }

    pub fn as_money(&self) -> Option<&LiabilityCap> {
        match self {
            FieldValue::Money(cap) => Some(cap),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Money(cap) => write!(f, "{} {}", cap.currency, cap.amount),
        }
    }
}

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extracted {
    pub value: FieldValue,

    /// Index of the passage the value was found in
    pub passage: usize,

    /// Matched range inside the passage text, in characters
    pub start_char: usize,
    pub end_char: usize,
}

/// Extracted fields for one document.
///
/// A field is either unset or set with provenance. Single-valued fields hold
/// at most one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRecord {
    fields: BTreeMap<FieldName, Vec<Extracted>>,
}

impl FieldRecord {
    /// The first value of a field.
    pub fn get(&self, field: FieldName) -> Option<&Extracted> {
        self.values(field).first()
    }

    /// Every value of a field, in extraction order.
    pub fn values(&self, field: FieldName) -> &[Extracted] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_set(&self, field: FieldName) -> bool {
        !self.values(field).is_empty()
    }

    pub fn liability_cap(&self) -> Option<&LiabilityCap> {
        self.get(FieldName::LiabilityCap)
            .and_then(|e| e.value.as_money())
    }

    /// Number of fields that are set.
    pub fn set_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_empty()).count()
    }

    /// Record a value, honouring the field's cardinality.
    ///
    /// Returns false if the value was dropped: a single-valued field that is
    /// already set, or a case-insensitive duplicate of a multi-valued entry.
    pub(crate) fn insert(&mut self, field: FieldName, extracted: Extracted) -> bool {
        let values = self.fields.entry(field).or_default();

        if !field.is_multi_valued() {
            if !values.is_empty() {
                return false;
            }
        } else if values
            .iter()
            .any(|existing| same_value(&existing.value, &extracted.value))
        {
            return false;
        }

        values.push(extracted);
        true
    }
}

fn same_value(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => a == b,
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldName::ALL.len()))?;
        for field in FieldName::ALL {
            if field.is_multi_valued() {
                map.serialize_entry(field.as_str(), self.values(field))?;
            } else {
                map.serialize_entry(field.as_str(), &self.get(field))?;
            }
        }
        map.end()
    }
}

/// Extract the field record from a document's passages.
///
/// Never fails: a field nothing matches is simply left unset.
pub fn extract(passages: &[Passage]) -> FieldRecord {
    let mut record = FieldRecord::default();

    for passage in passages {
        for field in FieldName::ALL {
            let multi = field.is_multi_valued();
            if !multi && record.is_set(field) {
                continue;
            }

            for (spec, regex) in COMPILED.iter().filter(|(spec, _)| spec.field == field) {
                let found = apply(spec, regex, passage, multi);
                let matched = !found.is_empty();
                for extracted in found {
                    record.insert(field, extracted);
                }
                if matched && !multi {
                    break;
                }
            }
        }
    }

    tracing::debug!(
        "Extracted {} of {} fields from {} passages",
        record.set_count(),
        FieldName::ALL.len(),
        passages.len()
    );

    record
}

/// Run one matcher over one passage.
///
/// Stops after the first usable match unless `all` is set.
fn apply(spec: &MatcherSpec, regex: &Regex, passage: &Passage, all: bool) -> Vec<Extracted> {
    let text = passage.text.as_str();
    let mut found = Vec::new();

    for caps in regex.captures_iter(text) {
        found.extend(values_from(spec.value, &caps, text, passage.index));
        if !all && !found.is_empty() {
            break;
        }
    }

    found
}

fn values_from(rule: ValueRule, caps: &Captures, text: &str, passage: usize) -> Vec<Extracted> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };

    let provenance = |value: FieldValue, start: usize, end: usize| Extracted {
        value,
        passage,
        start_char: char_offset(text, start),
        end_char: char_offset(text, end),
    };

    let text_value = |start: usize, end: usize| {
        let cleaned = clean_value(&text[start..end]);
        (!cleaned.is_empty()).then(|| provenance(FieldValue::Text(cleaned), start, end))
    };

    match rule {
        ValueRule::Capture(n) => caps
            .get(n)
            .and_then(|m| text_value(m.start(), m.end()))
            .into_iter()
            .collect(),
        ValueRule::Captures(groups) => groups
            .iter()
            .filter_map(|n| caps.get(*n))
            .filter_map(|m| text_value(m.start(), m.end()))
            .collect(),
        ValueRule::Joined(groups) => {
            let joined = groups
                .iter()
                .filter_map(|n| caps.get(*n))
                .map(|m| m.as_str().trim())
                .collect::<Vec<_>>()
                .join(" ");
            if joined.is_empty() {
                Vec::new()
            } else {
                vec![provenance(
                    FieldValue::Text(joined.to_lowercase()),
                    whole.start(),
                    whole.end(),
                )]
            }
        }
        ValueRule::Match => text_value(whole.start(), whole.end()).into_iter().collect(),
        ValueRule::Clause => {
            let (start, end) = sentence_containing(text, whole.start());
            text_value(start, end).into_iter().collect()
        }
        ValueRule::Money {
            currency,
            amount,
            scale,
        } => {
            let currency = caps.get(currency).map(|m| m.as_str());
            let amount = caps.get(amount).map(|m| m.as_str());
            let scale = scale.and_then(|n| caps.get(n)).map(|m| m.as_str());

            match (currency, amount) {
                (Some(currency), Some(amount)) => parse_cap(currency, amount, scale)
                    .map(|cap| provenance(FieldValue::Money(cap), whole.start(), whole.end()))
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            }
        }
    }
}

/// Collapse whitespace and trim quotes and stray punctuation from the ends.
fn clean_value(raw: &str) -> String {
    squash_whitespace(raw)
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, ',' | ';' | ':' | '"' | '\'' | '“' | '”' | '(' | ')')
        })
        .trim_end_matches('.')
        .to_string()
}
