//! Confidence scoring and risk grading
//!
//! Scoring is a pure function over the assembled report: fixed additive
//! weights, order-independent, clamped to 1.0 and rounded to two decimals.
//! Risk is a pure threshold function of confidence only, so two reports
//! with equal confidence always grade identically.

use crate::report::{InvestigationReport, RiskGrade, TimelineConsistency};
use crate::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// Resolved identity on the primary platform
pub const WEIGHT_RESOLVED: f64 = 0.25;
/// Secondary-platform presence confirmed
pub const WEIGHT_SECONDARY_PRESENCE: f64 = 0.20;
/// Cross-platform timeline judged consistent
pub const WEIGHT_TIMELINE_CONSISTENT: f64 = 0.10;
/// A username variant independently found elsewhere
pub const WEIGHT_VARIANT_HIT: f64 = 0.05;
/// Avatar unchanged since the prior run
pub const WEIGHT_AVATAR_STABLE: f64 = 0.10;
/// External URL declared on the primary profile
pub const WEIGHT_EXTERNAL_URL: f64 = 0.10;
/// At least one email extracted from any source
pub const WEIGHT_EMAIL_FOUND: f64 = 0.10;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the confidence score (0.0 - 1.0) from correlation strength
pub fn score_confidence(report: &InvestigationReport) -> f64 {
    let mut score = 0.0;

    if !report.platform_id.is_empty() {
        score += WEIGHT_RESOLVED;
    }

    if report.secondary_presence() {
        score += WEIGHT_SECONDARY_PRESENCE;
    }

    if report.timeline_consistency == TimelineConsistency::Consistent {
        score += WEIGHT_TIMELINE_CONSISTENT;
    }

    if !report.leak_signals.matched_variants.is_empty() {
        score += WEIGHT_VARIANT_HIT;
    }

    if !report.avatar_changed {
        score += WEIGHT_AVATAR_STABLE;
    }

    if !report.profile.external_url.is_empty() {
        score += WEIGHT_EXTERNAL_URL;
    }

    if !report.emails.is_empty() {
        score += WEIGHT_EMAIL_FOUND;
    }

    round2(score.min(1.0))
}

/// Convert a confidence score into a risk grade with explanation.
///
/// No other report field may influence the grade; this keeps grading
/// auditable and reproducible.
pub fn grade_risk(confidence: f64) -> (RiskGrade, &'static str) {
    if confidence >= HIGH_RISK_THRESHOLD {
        return (
            RiskGrade::High,
            "Strong identity correlation across platforms and signals",
        );
    }

    if confidence >= MEDIUM_RISK_THRESHOLD {
        return (RiskGrade::Medium, "Partial correlation across platforms");
    }

    (RiskGrade::Low, "Minimal public correlation found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{PresenceResult, ProbeStatus};

    fn resolved_report() -> InvestigationReport {
        let mut report = InvestigationReport::new("alice");
        report.platform_id = "1234567890".to_string();
        report
    }

    fn with_secondary(mut report: InvestigationReport) -> InvestigationReport {
        report.platforms.insert(
            "twitter".to_string(),
            PresenceResult {
                exists: true,
                status: ProbeStatus::Http(200),
                url: "https://x.com/alice".to_string(),
            },
        );
        report
    }

    #[test]
    fn test_resolution_only_scores_quarter() {
        // Resolved identity, nothing else found
        let report = resolved_report();
        let confidence = score_confidence(&report);
        assert_eq!(confidence, 0.25);

        let (risk, _) = grade_risk(confidence);
        assert_eq!(risk, RiskGrade::Low);
    }

    #[test]
    fn test_strong_correlation_scores_high() {
        let mut report = with_secondary(resolved_report());
        report.timeline_consistency = TimelineConsistency::Consistent;
        report.avatar_changed = false;
        report.profile.external_url = "https://alice.example".to_string();

        let confidence = score_confidence(&report);
        assert_eq!(confidence, 0.75);

        let (risk, explanation) = grade_risk(confidence);
        assert_eq!(risk, RiskGrade::High);
        assert!(explanation.contains("Strong"));
    }

    #[test]
    fn test_confidence_clamped_and_bounded() {
        let mut report = with_secondary(resolved_report());
        report.timeline_consistency = TimelineConsistency::Consistent;
        report.leak_signals.matched_variants = vec!["_alice_".to_string()];
        report.avatar_changed = false;
        report.profile.external_url = "https://alice.example".to_string();
        report.emails = vec!["alice@example.com".to_string()];

        let confidence = score_confidence(&report);
        assert!(confidence <= 1.0);
        // 0.25 + 0.20 + 0.10 + 0.05 + 0.10 + 0.10 + 0.10 = 0.90
        assert_eq!(confidence, 0.90);
    }

    #[test]
    fn test_empty_report_scores_zero() {
        let report = InvestigationReport::new("nobody");
        assert_eq!(score_confidence(&report), 0.0);
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(grade_risk(0.0).0, RiskGrade::Low);
        assert_eq!(grade_risk(0.44).0, RiskGrade::Low);
        assert_eq!(grade_risk(0.45).0, RiskGrade::Medium);
        assert_eq!(grade_risk(0.74).0, RiskGrade::Medium);
        assert_eq!(grade_risk(0.75).0, RiskGrade::High);
        assert_eq!(grade_risk(1.0).0, RiskGrade::High);
    }

    #[test]
    fn test_grading_is_deterministic_and_monotone() {
        let steps: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
        let mut previous = RiskGrade::Low;

        for confidence in steps {
            let (grade, explanation) = grade_risk(confidence);
            // Equal confidence always yields equal grade and explanation
            assert_eq!(grade_risk(confidence), (grade, explanation));
            assert!(grade >= previous);
            previous = grade;
        }
    }

    #[test]
    fn test_timeline_partial_does_not_score() {
        let mut report = with_secondary(resolved_report());
        report.timeline_consistency = TimelineConsistency::Partial;
        assert_eq!(score_confidence(&report), 0.45);
    }
}
