//! Clause risk audit.
//!
//! Each rule is an independent [`AuditRule`]; [`audit`] runs the default
//! battery in declaration order and collects the findings. Rules never fail:
//! a field that was not extracted just keeps the rules that need it quiet.

mod notice;
mod rules;

pub use notice::{notice_period, NoticePeriod};
pub use rules::{
    default_rules, AutoRenewalNoticeUnspecified, AutoRenewalPresent, BroadIndemnity,
    MissingGoverningLaw, ShortAutoRenewalNotice, UnlimitedLiability,
};

use crate::extract::{FieldName, FieldRecord};
use crate::text::snippet;
use crate::types::Passage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum evidence length in a finding.
const MAX_EVIDENCE_CHARS: usize = 150;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One risk flagged by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// Rule identifier, e.g. "short-auto-renewal-notice"
    pub rule: String,

    /// Rule title, e.g. "Short auto-renewal notice"
    pub title: String,

    pub severity: Severity,
    pub description: String,

    /// Field the finding is about, if any
    pub field: Option<FieldName>,

    /// Passage the finding was derived from, if any
    pub passage: Option<usize>,

    /// Snippet of the passage text
    pub evidence: Option<String>,
}

impl AuditFinding {
    pub fn new<R: AuditRule + ?Sized>(rule: &R, description: impl Into<String>) -> Self {
        Self {
            rule: rule.id().to_string(),
            title: rule.title().to_string(),
            severity: rule.severity(),
            description: description.into(),
            field: None,
            passage: None,
            evidence: None,
        }
    }

    pub fn with_field(mut self, field: FieldName) -> Self {
        self.field = Some(field);
        self
    }

    /// Point the finding at a passage and quote it.
    pub fn with_passage(mut self, passage: &Passage) -> Self {
        self.passage = Some(passage.index);
        self.evidence = Some(snippet(&passage.text, MAX_EVIDENCE_CHARS));
        self
    }
}

/// A risk predicate over the field record and passages.
pub trait AuditRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Return a finding when the rule's condition holds.
    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding>;
}

lazy_static::lazy_static! {
    static ref DEFAULT_RULES: Vec<Box<dyn AuditRule>> = default_rules();
}

/// Run the default rule battery.
pub fn audit(record: &FieldRecord, passages: &[Passage]) -> Vec<AuditFinding> {
    audit_with(&DEFAULT_RULES, record, passages)
}

/// Run a given rule set, keeping rule order.
pub fn audit_with(
    rules: &[Box<dyn AuditRule>],
    record: &FieldRecord,
    passages: &[Passage],
) -> Vec<AuditFinding> {
    let findings: Vec<AuditFinding> = rules
        .iter()
        .filter_map(|rule| {
            let finding = rule.evaluate(record, passages);
            if finding.is_some() {
                tracing::debug!("Rule {} fired", rule.id());
            }
            finding
        })
        .collect();

    tracing::debug!(
        "Audit evaluated {} rules, {} findings",
        rules.len(),
        findings.len()
    );

    findings
}

/// The passage a field was extracted from.
pub(crate) fn source_passage<'a>(
    record: &FieldRecord,
    field: FieldName,
    passages: &'a [Passage],
) -> Option<&'a Passage> {
    record
        .get(field)
        .and_then(|extracted| passages.get(extracted.passage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order_and_names() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(Severity::Low.to_string(), "low");
    }

    #[test]
    fn test_empty_document_has_no_findings() {
        assert!(audit(&FieldRecord::default(), &[]).is_empty());
    }
}
