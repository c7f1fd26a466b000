//! Declarative matcher table for contract fields.
//!
//! Order matters: within a field, earlier entries have higher priority.
//! Every pattern is case-insensitive; proper-name captures switch case
//! sensitivity back on locally with `(?-i:...)`.

use super::FieldName;

/// How a successful match becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// One capture group, trimmed of surrounding punctuation
    Capture(usize),

    /// Several capture groups, each becoming its own value
    Captures(&'static [usize]),

    /// Capture groups joined with a space ("12" + "months")
    Joined(&'static [usize]),

    /// The whole matched text
    Match,

    /// The sentence containing the match
    Clause,

    /// A monetary amount; the matcher fails if the amount does not parse
    Money {
        currency: usize,
        amount: usize,
        scale: Option<usize>,
    },
}

/// One heuristic: a pattern bound to a field plus a value rule.
#[derive(Debug, Clone, Copy)]
pub struct MatcherSpec {
    pub field: FieldName,
    pub pattern: &'static str,
    pub value: ValueRule,
}

macro_rules! month {
    () => {
        r"(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?"
    };
}

macro_rules! date {
    () => {
        concat!(
            r"(",
            month!(),
            r"\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}",
            r"|\d{1,2}(?:st|nd|rd|th)?\s+(?:day\s+of\s+)?",
            month!(),
            r",?\s+\d{4}",
            r"|\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}",
            r"|\d{4}-\d{2}-\d{2})"
        )
    };
}

/// Capitalized words on one line, optionally joined by "of"/"and":
/// "State of New York".
macro_rules! proper_name {
    () => {
        r"((?-i:[A-Z][A-Za-z.&'-]*)(?:[ \t]+(?:of[ \t]+|and[ \t]+)?(?-i:[A-Z][A-Za-z.&'-]*)){0,4})"
    };
}

macro_rules! currency {
    () => {
        r"(US\$|USD|EUR|GBP|INR|CAD|AUD|C\$|A\$|Rs\.?|\$|€|£|₹)"
    };
}

macro_rules! liability_anchor {
    () => {
        r"\b(?:liab(?:le|ility|ilities)|limitation\s+of\s+damages)\b[^.;]{0,200}?"
    };
}

/// The full matcher table.
pub static MATCHERS: &[MatcherSpec] = &[
    // parties (multi-valued)
    MatcherSpec {
        field: FieldName::Parties,
        pattern: r#"(?i)(?:\b(?:agreement|contract)\b[^.;]{0,80}?\b|\bby\s+and\s+)between\s+(.{2,120}?)\s*(?:\([^)]*\)\s*)?,?\s+and\s+(.{2,120}?)\s*(?:\(|,|;|\.\s|\.$|$)"#,
        value: ValueRule::Captures(&[1, 2]),
    },
    // effective_date
    MatcherSpec {
        field: FieldName::EffectiveDate,
        pattern: concat!(
            r"(?i)\beffective\s+(?:date|as\s+of|from|on)\b(?:\s+of\s+this\s+agreement)?(?:\s+(?:is|shall\s+be))?\s*[:\-–]?\s*(?:the\s+)?",
            date!()
        ),
        value: ValueRule::Capture(1),
    },
    MatcherSpec {
        field: FieldName::EffectiveDate,
        pattern: concat!(r"(?i)\b(?:dated|entered\s+into)\s+(?:as\s+of\s+|on\s+)?(?:the\s+)?", date!()),
        value: ValueRule::Capture(1),
    },
    // term
    MatcherSpec {
        field: FieldName::Term,
        pattern: r"(?i)\b(?:initial\s+)?term\s+of\s+(?:this\s+agreement\s+(?:is|shall\s+be)\s+)?(?:[a-z-]+\s+)?\(?(\d{1,3})\)?\s*(months?|years?|days?)\b",
        value: ValueRule::Joined(&[1, 2]),
    },
    MatcherSpec {
        field: FieldName::Term,
        pattern: r"(?i)\bfor\s+an?\s+(?:initial\s+)?(?:period|term)\s+of\s+(?:[a-z-]+\s+)?\(?(\d{1,3})\)?\s*(months?|years?)\b",
        value: ValueRule::Joined(&[1, 2]),
    },
    MatcherSpec {
        field: FieldName::Term,
        pattern: r"(?i)\b(?:initial\s+term|term\s+of\s+this\s+agreement)\b",
        value: ValueRule::Clause,
    },
    // governing_law
    MatcherSpec {
        field: FieldName::GoverningLaw,
        pattern: concat!(
            r"(?i)\b(?:governed\s+by|construed\s+(?:in\s+accordance\s+with|under)|subject\s+to)\s+(?:and\s+construed\s+in\s+accordance\s+with\s+)?(?:the\s+)?(?:internal\s+|substantive\s+)?laws?\s+of\s+(?:the\s+)?",
            proper_name!()
        ),
        value: ValueRule::Capture(1),
    },
    MatcherSpec {
        field: FieldName::GoverningLaw,
        pattern: concat!(
            r"(?i)\blaws\s+of\s+(?:the\s+)?",
            proper_name!(),
            r"\s+(?:shall|will)\s+govern"
        ),
        value: ValueRule::Capture(1),
    },
    MatcherSpec {
        field: FieldName::GoverningLaw,
        pattern: concat!(
            r"(?i)\bgoverning\s+law\s*[:\-–]\s*(?:the\s+)?(?:laws\s+of\s+)?(?:the\s+)?",
            proper_name!()
        ),
        value: ValueRule::Capture(1),
    },
    // payment_terms
    MatcherSpec {
        field: FieldName::PaymentTerms,
        pattern: r"(?i)\bnet\s*\(?\d{1,3}\)?(?:\s+days)?\b",
        value: ValueRule::Match,
    },
    MatcherSpec {
        field: FieldName::PaymentTerms,
        pattern: r"(?i)\b(?:payable|due|paid)\s+(?:in\s+full\s+)?within\s+(?:[a-z-]+\s+)?\(?\d{1,3}\)?\s*(?:calendar\s+|business\s+)?days\b",
        value: ValueRule::Match,
    },
    MatcherSpec {
        field: FieldName::PaymentTerms,
        pattern: r"(?i)\b(?:payment\s+terms?|invoices?\s+(?:shall|will)\s+be\s+paid|fees?\s+(?:are|shall\s+be)\s+payable)\b",
        value: ValueRule::Clause,
    },
    // termination
    MatcherSpec {
        field: FieldName::Termination,
        pattern: r"(?i)\bterminat(?:e|ed|es|ion)\b[^.]{0,120}?\b(?:upon|with|by\s+giving|on|giving)\s+(?:at\s+least\s+)?(?:[a-z-]+\s+)?\(?\d{1,3}\)?\s*(?:calendar\s+|business\s+)?(?:days?|weeks?|months?)['’]?\s+(?:prior\s+|advance\s+)?(?:written\s+)?notice",
        value: ValueRule::Clause,
    },
    MatcherSpec {
        field: FieldName::Termination,
        pattern: r"(?i)\b(?:right\s+to\s+terminate|may\s+terminate|termination\s+for\s+(?:cause|convenience))\b",
        value: ValueRule::Clause,
    },
    // auto_renewal
    MatcherSpec {
        field: FieldName::AutoRenewal,
        pattern: r"(?i)\b(?:auto(?:matic(?:ally)?)?[\s-]?renew(?:s|ed|al|ing)?|renew(?:s|ed)?\s+automatically|evergreen|successive\s+renewal\s+(?:terms?|periods?)|renewal\s+term)\b",
        value: ValueRule::Clause,
    },
    // confidentiality
    MatcherSpec {
        field: FieldName::Confidentiality,
        pattern: r"(?i)\b(?:confidential(?:ity)?|non[\s-]?disclos(?:e|ure)|proprietary\s+information)\b",
        value: ValueRule::Clause,
    },
    // indemnity
    MatcherSpec {
        field: FieldName::Indemnity,
        pattern: r"(?i)\b(?:indemnif(?:y|ies|ied|ying|ication)|hold\s+(?:[a-z]+\s+){0,3}harmless)\b",
        value: ValueRule::Clause,
    },
    // liability_cap
    MatcherSpec {
        field: FieldName::LiabilityCap,
        pattern: concat!(
            r"(?i)",
            liability_anchor!(),
            currency!(),
            r"\s?(\d[\d.,]*)(?:\s*(thousand|million|billion|bn|mm|m|k)\b)?"
        ),
        value: ValueRule::Money {
            currency: 1,
            amount: 2,
            scale: Some(3),
        },
    },
    MatcherSpec {
        field: FieldName::LiabilityCap,
        pattern: concat!(
            r"(?i)",
            liability_anchor!(),
            r"\b(\d[\d.,]*)(?:\s*(thousand|million|billion))?\s*(USD|EUR|GBP|INR|CAD|AUD|dollars|euros|pounds|rupees)\b"
        ),
        value: ValueRule::Money {
            currency: 3,
            amount: 1,
            scale: Some(2),
        },
    },
    // signatories (multi-valued)
    MatcherSpec {
        field: FieldName::Signatories,
        pattern: concat!(
            r"(?im)^\s*(?:by|name|signed\s+by|signature)\s*:\s*(?:/s/\s*)?",
            proper_name!()
        ),
        value: ValueRule::Capture(1),
    },
    MatcherSpec {
        field: FieldName::Signatories,
        pattern: concat!(
            r"(?i)\bsigned\s+(?:by|for\s+and\s+on\s+behalf\s+of)\s+",
            proper_name!()
        ),
        value: ValueRule::Capture(1),
    },
];
