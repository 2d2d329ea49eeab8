//! Safety scorer: reduces hazards and compliance verdicts to a single
//! 0-100 score, a risk tier, and recommendation text.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{
    Circuit, ComplianceCheck, ComplianceStatus, HazardKind, HazardSeverity, RiskLevel,
    SafetyAssessment, SafetyHazard,
};

const BASE_SCORE: f64 = 100.0;
const PROTECTION_BONUS: f64 = 20.0;
/// Floor applied when the circuit carries any protection device.
const PROTECTED_FLOOR: f64 = 10.0;

const CRITICAL_HAZARD_PENALTY: f64 = 25.0;
const HIGH_HAZARD_PENALTY: f64 = 15.0;
const MEDIUM_HAZARD_PENALTY: f64 = 8.0;
const LOW_HAZARD_PENALTY: f64 = 3.0;

const NON_COMPLIANT_PENALTY: f64 = 12.0;
const COMPLIANCE_WARNING_PENALTY: f64 = 3.0;

const CRITICAL_SCORE_CUTOFF: f64 = 30.0;
const HIGH_SCORE_CUTOFF: f64 = 50.0;
const MEDIUM_SCORE_CUTOFF: f64 = 75.0;

/// Reduce hazards and compliance verdicts into the final assessment.
pub fn assess(
    circuit: &Circuit,
    hazards: Vec<SafetyHazard>,
    compliance: Vec<ComplianceCheck>,
) -> SafetyAssessment {
    let has_protection = circuit.has_protection();
    let safety_score = compute_score(has_protection, &hazards, &compliance);
    let risk_level = classify_risk(safety_score, &hazards);
    let recommendations = build_recommendations(&hazards, &compliance);
    debug!(safety_score, ?risk_level, "safety assessment reduced");

    SafetyAssessment {
        safety_score,
        hazards,
        compliance,
        recommendations,
        risk_level,
    }
}

/// Score arithmetic: 100 base, a flat protection bonus unless a critical
/// short circuit exists, per-hazard and per-check deductions, then a clamp
/// whose floor depends on protection being present at all.
pub fn compute_score(
    has_protection: bool,
    hazards: &[SafetyHazard],
    compliance: &[ComplianceCheck],
) -> f64 {
    let critical_short = hazards.iter().any(|h| {
        h.kind == HazardKind::ShortCircuit && h.severity == HazardSeverity::Critical
    });

    let mut score = BASE_SCORE;
    if has_protection && !critical_short {
        score += PROTECTION_BONUS;
    }

    for hazard in hazards {
        score -= match hazard.severity {
            HazardSeverity::Critical => CRITICAL_HAZARD_PENALTY,
            HazardSeverity::High => HIGH_HAZARD_PENALTY,
            HazardSeverity::Medium => MEDIUM_HAZARD_PENALTY,
            HazardSeverity::Low => LOW_HAZARD_PENALTY,
        };
    }
    for check in compliance {
        score -= match check.status {
            ComplianceStatus::NonCompliant => NON_COMPLIANT_PENALTY,
            ComplianceStatus::Warning => COMPLIANCE_WARNING_PENALTY,
            ComplianceStatus::Compliant => 0.0,
        };
    }

    let floor = if has_protection { PROTECTED_FLOOR } else { 0.0 };
    score.clamp(floor, 100.0)
}

fn classify_risk(score: f64, hazards: &[SafetyHazard]) -> RiskLevel {
    let worst = hazards.iter().map(|h| h.severity).max();
    if worst == Some(HazardSeverity::Critical) || score < CRITICAL_SCORE_CUTOFF {
        RiskLevel::Critical
    } else if worst == Some(HazardSeverity::High) || score < HIGH_SCORE_CUTOFF {
        RiskLevel::High
    } else if score < MEDIUM_SCORE_CUTOFF {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Union of hazard mitigations plus standard boilerplate, deduplicated by
/// exact string, order preserved.
fn build_recommendations(
    hazards: &[SafetyHazard],
    compliance: &[ComplianceCheck],
) -> Vec<String> {
    let mut recommendations: Vec<String> =
        hazards.iter().map(|h| h.mitigation.clone()).collect();
    if !hazards.is_empty() {
        recommendations
            .push("Review all identified hazards before energizing the circuit".to_string());
    }
    if compliance
        .iter()
        .any(|c| c.status == ComplianceStatus::NonCompliant)
    {
        recommendations.push("Address non-compliant standards findings".to_string());
    }

    let mut seen = HashSet::new();
    recommendations.retain(|r| seen.insert(r.clone()));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, ComponentType};

    fn hazard(kind: HazardKind, severity: HazardSeverity, mitigation: &str) -> SafetyHazard {
        SafetyHazard::new(kind, severity, "desc", mitigation)
    }

    fn protected_circuit() -> Circuit {
        let mut circuit = Circuit::new("t");
        circuit.add_component(Component::new("mcb-1", ComponentType::Mcb));
        circuit
    }

    #[test]
    fn test_clean_protected_circuit_scores_100() {
        let assessment = assess(&protected_circuit(), vec![], vec![]);
        // 100 + 20 bonus, clamped to 100.
        assert_eq!(assessment.safety_score, 100.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_one_critical_hazard_costs_exactly_25() {
        let baseline = compute_score(false, &[], &[]);
        let with_critical = compute_score(
            false,
            &[hazard(HazardKind::Overcurrent, HazardSeverity::Critical, "m")],
            &[],
        );
        assert_eq!(baseline - with_critical, 25.0);
    }

    #[test]
    fn test_severity_and_compliance_deductions() {
        let hazards = vec![
            hazard(HazardKind::Overvoltage, HazardSeverity::High, "a"),
            hazard(HazardKind::GroundFault, HazardSeverity::Medium, "b"),
            hazard(HazardKind::Thermal, HazardSeverity::Low, "c"),
        ];
        let compliance = vec![
            ComplianceCheck {
                standard: crate::model::Standard::Nec,
                status: ComplianceStatus::NonCompliant,
                description: String::new(),
            },
            ComplianceCheck {
                standard: crate::model::Standard::Osha,
                status: ComplianceStatus::Warning,
                description: String::new(),
            },
        ];
        // 100 - 15 - 8 - 3 - 12 - 3 = 59
        assert_eq!(compute_score(false, &hazards, &compliance), 59.0);
    }

    #[test]
    fn test_critical_short_circuit_forfeits_bonus() {
        let short = vec![hazard(
            HazardKind::ShortCircuit,
            HazardSeverity::Critical,
            "m",
        )];
        // With protection and a critical short: 100 - 25 = 75, no bonus.
        assert_eq!(compute_score(true, &short, &[]), 75.0);
        // A critical hazard of another kind keeps the bonus: 100 + 20 - 25.
        let other = vec![hazard(HazardKind::ArcFlash, HazardSeverity::Critical, "m")];
        assert_eq!(compute_score(true, &other, &[]), 95.0);
    }

    #[test]
    fn test_protected_floor() {
        let pile: Vec<SafetyHazard> = (0..10)
            .map(|i| {
                hazard(
                    HazardKind::Overcurrent,
                    HazardSeverity::Critical,
                    &format!("m{i}"),
                )
            })
            .collect();
        assert_eq!(compute_score(true, &pile, &[]), 10.0);
        assert_eq!(compute_score(false, &pile, &[]), 0.0);
    }

    #[test]
    fn test_risk_tiering() {
        let critical = vec![hazard(HazardKind::ArcFlash, HazardSeverity::Critical, "m")];
        let assessment = assess(&protected_circuit(), critical, vec![]);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);

        let high = vec![hazard(HazardKind::Overvoltage, HazardSeverity::High, "m")];
        let assessment = assess(&protected_circuit(), high, vec![]);
        assert_eq!(assessment.risk_level, RiskLevel::High);

        // Medium hazards leave the score high; tier comes from the score.
        let medium = vec![hazard(HazardKind::GroundFault, HazardSeverity::Medium, "m")];
        let assessment = assess(&protected_circuit(), medium, vec![]);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_recommendations_deduplicate_preserving_order() {
        let hazards = vec![
            hazard(HazardKind::GroundFault, HazardSeverity::High, "Install a GFCI"),
            hazard(HazardKind::Overvoltage, HazardSeverity::High, "Install a GFCI"),
            hazard(HazardKind::Thermal, HazardSeverity::Medium, "Check ratings"),
        ];
        let assessment = assess(&protected_circuit(), hazards, vec![]);
        assert_eq!(
            assessment.recommendations,
            vec![
                "Install a GFCI".to_string(),
                "Check ratings".to_string(),
                "Review all identified hazards before energizing the circuit".to_string(),
            ]
        );
    }
}
