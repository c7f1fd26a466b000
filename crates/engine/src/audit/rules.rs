//! The default audit rules, in declaration order.

use super::notice::notice_period;
use super::{source_passage, AuditFinding, AuditRule, Severity};
use crate::extract::{FieldName, FieldRecord};
use crate::types::Passage;
use regex::Regex;

/// Notice periods shorter than this are flagged.
const MIN_RENEWAL_NOTICE_DAYS: u32 = 30;

lazy_static::lazy_static! {
    static ref LIABILITY_LANGUAGE: Regex =
        Regex::new(r"(?i)\b(?:liab(?:le|ility|ilities)|damages)\b").unwrap();

    static ref CAP_EXPRESSION: Regex = Regex::new(
        r"(?i)\b(?:shall\s+not\s+exceed|(?:will|may)\s+not\s+exceed|limited\s+to|capped\s+at|cap\s+on|in\s+no\s+event\s+(?:shall|will)|maximum\s+(?:aggregate\s+)?liability|limitation\s+of\s+liability)\b"
    )
    .unwrap();

    static ref UNLIMITED: Regex = Regex::new(
        r"(?i)\b(?:unlimited\s+liability|liability[^.;]{0,80}?\b(?:is|are|shall\s+be|will\s+be)\s+unlimited|without\s+(?:any\s+)?limit(?:ation)?\s+(?:of|on|as\s+to)\s+(?:its\s+|their\s+)?liability|no\s+limit(?:ation)?\s+(?:of|on|to)\s+(?:its\s+|their\s+|the\s+)?liability)\b"
    )
    .unwrap();

    static ref BROAD_SCOPE: Regex = Regex::new(
        r"(?i)\b(?:any\s+and\s+all|regardless\s+of\s+(?:the\s+)?cause|howsoever\s+(?:arising|caused)|however\s+caused|whether\s+or\s+not\s+caused|of\s+any\s+(?:kind|nature)(?:\s+whatsoever)?|from\s+all\s+claims)\b"
    )
    .unwrap();

    static ref CARVE_OUT: Regex = Regex::new(
        r"(?i)\b(?:except\s+(?:to\s+the\s+extent|for|where|as)|excluding|provided\s+(?:that|however)|gross(?:ly)?\s+negligen\w*|wil(?:l)?ful\s+misconduct|to\s+the\s+extent\s+(?:caused|arising|resulting)|shall\s+not\s+apply)\b"
    )
    .unwrap();
}

/// The default battery, in the order findings are reported.
pub fn default_rules() -> Vec<Box<dyn AuditRule>> {
    vec![
        Box::new(ShortAutoRenewalNotice),
        Box::new(AutoRenewalNoticeUnspecified),
        Box::new(AutoRenewalPresent),
        Box::new(UnlimitedLiability),
        Box::new(BroadIndemnity),
        Box::new(MissingGoverningLaw),
    ]
}

/// Auto-renewal whose opt-out notice period is under 30 days.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortAutoRenewalNotice;

impl AuditRule for ShortAutoRenewalNotice {
    fn id(&self) -> &'static str {
        "short-auto-renewal-notice"
    }

    fn title(&self) -> &'static str {
        "Short auto-renewal notice"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        let passage = source_passage(record, FieldName::AutoRenewal, passages)?;
        let period = notice_period(&passage.text)?;
        if period.days >= MIN_RENEWAL_NOTICE_DAYS {
            return None;
        }

        Some(
            AuditFinding::new(
                self,
                format!(
                    "Contract renews automatically and the notice period to prevent renewal is {} days (less than {}).",
                    period.days, MIN_RENEWAL_NOTICE_DAYS
                ),
            )
            .with_field(FieldName::AutoRenewal)
            .with_passage(passage),
        )
    }
}

/// Auto-renewal without any stated notice period.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoRenewalNoticeUnspecified;

impl AuditRule for AutoRenewalNoticeUnspecified {
    fn id(&self) -> &'static str {
        "auto-renewal-notice-unspecified"
    }

    fn title(&self) -> &'static str {
        "Auto-renewal notice period not specified"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        let passage = source_passage(record, FieldName::AutoRenewal, passages)?;
        if notice_period(&passage.text).is_some() {
            return None;
        }

        Some(
            AuditFinding::new(
                self,
                "Contract renews automatically but the renewal clause states no notice period.",
            )
            .with_field(FieldName::AutoRenewal)
            .with_passage(passage),
        )
    }
}

/// Auto-renewal with a notice period long enough not to warrant a warning.
/// Reported so the renewal still shows up in review.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoRenewalPresent;

impl AuditRule for AutoRenewalPresent {
    fn id(&self) -> &'static str {
        "auto-renewal-present"
    }

    fn title(&self) -> &'static str {
        "Auto-renewal clause"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        let passage = source_passage(record, FieldName::AutoRenewal, passages)?;
        let period = notice_period(&passage.text)?;
        if period.days < MIN_RENEWAL_NOTICE_DAYS {
            return None;
        }

        Some(
            AuditFinding::new(
                self,
                format!(
                    "Contract renews automatically; {} days notice is required to prevent renewal.",
                    period.days
                ),
            )
            .with_field(FieldName::AutoRenewal)
            .with_passage(passage),
        )
    }
}

/// Liability language with no cap, or an explicit statement that liability
/// is unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedLiability;

impl AuditRule for UnlimitedLiability {
    fn id(&self) -> &'static str {
        "unlimited-liability"
    }

    fn title(&self) -> &'static str {
        "Unlimited liability"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        if record.is_set(FieldName::LiabilityCap) {
            return None;
        }

        let first_liability = passages
            .iter()
            .find(|p| LIABILITY_LANGUAGE.is_match(&p.text))?;
        let unlimited = passages.iter().find(|p| UNLIMITED.is_match(&p.text));
        let capped = passages.iter().any(|p| CAP_EXPRESSION.is_match(&p.text));

        let (passage, description) = match unlimited {
            Some(passage) => (passage, "Contract states that liability is unlimited."),
            None if !capped => (
                first_liability,
                "Contract addresses liability but sets no cap on it.",
            ),
            None => return None,
        };

        Some(
            AuditFinding::new(self, description)
                .with_field(FieldName::LiabilityCap)
                .with_passage(passage),
        )
    }
}

/// Indemnity with broad scope and no carve-outs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadIndemnity;

impl AuditRule for BroadIndemnity {
    fn id(&self) -> &'static str {
        "broad-indemnity"
    }

    fn title(&self) -> &'static str {
        "Broad indemnity"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        let passage = source_passage(record, FieldName::Indemnity, passages)?;
        let qualifier = BROAD_SCOPE.find(&passage.text)?;
        if CARVE_OUT.is_match(&passage.text) {
            return None;
        }

        Some(
            AuditFinding::new(
                self,
                format!(
                    "Indemnity uses the broad qualifier \"{}\" without carve-outs.",
                    qualifier.as_str().to_lowercase()
                ),
            )
            .with_field(FieldName::Indemnity)
            .with_passage(passage),
        )
    }
}

/// No governing law clause in a non-empty document.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingGoverningLaw;

impl AuditRule for MissingGoverningLaw {
    fn id(&self) -> &'static str {
        "missing-governing-law"
    }

    fn title(&self) -> &'static str {
        "Missing governing law"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn evaluate(&self, record: &FieldRecord, passages: &[Passage]) -> Option<AuditFinding> {
        if passages.is_empty() || record.is_set(FieldName::GoverningLaw) {
            return None;
        }

        Some(
            AuditFinding::new(self, "No governing law clause was found.")
                .with_field(FieldName::GoverningLaw),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit;
    use crate::extract::extract;
    use crate::segment::{segment, SegmentConfig};
    use crate::types::Page;
    use pretty_assertions::assert_eq;

    fn run(rule: &dyn AuditRule, texts: &[&str]) -> Option<AuditFinding> {
        let passages = passages(texts);
        let record = extract(&passages);
        rule.evaluate(&record, &passages)
    }

    fn passages(texts: &[&str]) -> Vec<Passage> {
        let pages: Vec<Page> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Page::new(i as u32 + 1, *text))
            .collect();
        segment(&pages, &SegmentConfig::default())
    }

    #[test]
    fn test_short_auto_renewal_notice() {
        let finding = run(
            &ShortAutoRenewalNotice,
            &["This Agreement renews automatically unless either party gives 15 days written notice."],
        )
        .unwrap();

        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.passage, Some(0));
        assert_eq!(finding.field, Some(FieldName::AutoRenewal));
        assert!(finding.description.contains("15 days"));
    }

    #[test]
    fn test_long_renewal_notice_is_fine() {
        let texts = ["This Agreement renews automatically unless either party gives sixty (60) days written notice."];
        assert!(run(&ShortAutoRenewalNotice, &texts).is_none());
        assert!(run(&AutoRenewalNoticeUnspecified, &texts).is_none());
    }

    #[test]
    fn test_notice_period_ignores_term_length() {
        let finding = run(
            &ShortAutoRenewalNotice,
            &["This Agreement renews automatically for successive 12 month terms unless either party gives 10 days written notice."],
        )
        .unwrap();
        assert!(finding.description.contains("10 days"));
    }

    #[test]
    fn test_auto_renewal_present() {
        let finding = run(
            &AutoRenewalPresent,
            &["This Agreement renews automatically unless either party gives sixty (60) days written notice."],
        )
        .unwrap();
        assert_eq!(finding.severity, Severity::Low);
        assert_eq!(finding.field, Some(FieldName::AutoRenewal));
        assert!(finding.description.contains("60 days"));

        assert!(run(
            &AutoRenewalPresent,
            &["This Agreement renews automatically unless either party gives 15 days written notice."],
        )
        .is_none());
        assert!(run(
            &AutoRenewalPresent,
            &["This Agreement shall automatically renew for successive one-year renewal terms."],
        )
        .is_none());
    }

    #[test]
    fn test_renewal_without_notice_period() {
        let texts = ["This Agreement shall automatically renew for successive one-year renewal terms."];
        assert!(run(&ShortAutoRenewalNotice, &texts).is_none());

        let finding = run(&AutoRenewalNoticeUnspecified, &texts).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
    }

    #[test]
    fn test_no_auto_renewal_no_findings() {
        let texts = ["Either party may terminate this Agreement with 10 days written notice."];
        assert!(run(&ShortAutoRenewalNotice, &texts).is_none());
        assert!(run(&AutoRenewalNoticeUnspecified, &texts).is_none());
    }

    #[test]
    fn test_unlimited_liability_without_cap() {
        let finding = run(
            &UnlimitedLiability,
            &["The Supplier is liable for all losses suffered by the Customer."],
        )
        .unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.passage, Some(0));
    }

    #[test]
    fn test_explicit_unlimited_liability() {
        let finding = run(
            &UnlimitedLiability,
            &[
                "Each party's liability for direct damages is limited to the fees paid.",
                "Liability for breach of confidentiality shall be unlimited in all cases.",
            ],
        )
        .unwrap();
        assert_eq!(finding.passage, Some(1));
    }

    #[test]
    fn test_capped_liability_is_fine() {
        // Parsed cap.
        assert!(run(
            &UnlimitedLiability,
            &["The total liability of either party shall not exceed USD 500,000."],
        )
        .is_none());

        // Cap expression without an amount.
        assert!(run(
            &UnlimitedLiability,
            &["The total liability of either party shall not exceed the fees paid."],
        )
        .is_none());

        // No liability language at all.
        assert!(run(&UnlimitedLiability, &["Deliveries happen every Monday morning."]).is_none());
    }

    #[test]
    fn test_broad_indemnity() {
        let finding = run(
            &BroadIndemnity,
            &["Party shall indemnify and hold harmless the other party from any and all claims."],
        )
        .unwrap();
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.field, Some(FieldName::Indemnity));
        assert!(finding.description.contains("any and all"));
    }

    #[test]
    fn test_indemnity_with_carve_out() {
        assert!(run(
            &BroadIndemnity,
            &["Supplier shall indemnify Customer against any and all claims, except to the extent caused by Customer's gross negligence."],
        )
        .is_none());

        assert!(run(
            &BroadIndemnity,
            &["Supplier shall indemnify Customer against third-party patent claims."],
        )
        .is_none());
    }

    #[test]
    fn test_missing_governing_law() {
        let finding = run(&MissingGoverningLaw, &["Fees are payable within thirty days of invoice."]).unwrap();
        assert_eq!(finding.severity, Severity::Low);

        assert!(run(
            &MissingGoverningLaw,
            &["This Agreement shall be governed by the laws of Delaware."],
        )
        .is_none());
        assert!(run(&MissingGoverningLaw, &[]).is_none());
    }

    #[test]
    fn test_findings_follow_declaration_order() {
        let passages = passages(&[
            "Party shall indemnify and hold harmless the other party from any and all claims.",
            "This Agreement renews automatically unless either party gives 15 days written notice.",
        ]);
        let record = extract(&passages);
        let findings = audit(&record, &passages);
        let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();

        assert_eq!(
            rules,
            vec![
                "short-auto-renewal-notice",
                "broad-indemnity",
                "missing-governing-law"
            ]
        );
    }
}
