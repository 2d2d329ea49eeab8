//! Compliance checkers: one verdict per standard (NEC, OSHA, NFPA 70E).
//!
//! Every description spells out the numeric comparison behind the verdict;
//! these strings are the primary user-facing explanation and are never
//! abbreviated to a bare pass/fail.

use crate::model::{
    Circuit, CircuitAnalysis, ComplianceCheck, ComplianceStatus, ComponentType, Standard,
};
use crate::safety::hazards::incident_energy;
use crate::safety::standards::SafetyStandards;

/// Run all three standards checks.
pub fn check_all(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
) -> Vec<ComplianceCheck> {
    vec![
        check_nec(circuit, analysis, standards),
        check_osha(analysis, standards),
        check_nfpa(circuit, analysis, standards),
    ]
}

/// Protection types the NEC check treats as mandatory.
const NEC_MANDATORY: [ComponentType; 3] = [
    ComponentType::Mcb,
    ComponentType::Rccb,
    ComponentType::Ground,
];

/// Recommended-but-not-mandatory protection per the NEC check.
const NEC_RECOMMENDED: [ComponentType; 7] = [
    ComponentType::Gfci,
    ComponentType::Afci,
    ComponentType::Spd,
    ComponentType::SurgeProtector,
    ComponentType::OvervoltageProtector,
    ComponentType::UndervoltageProtector,
    ComponentType::EmergencyStop,
];

fn check_nec(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
) -> ComplianceCheck {
    if analysis.voltages.is_empty() {
        return ComplianceCheck {
            standard: Standard::Nec,
            status: ComplianceStatus::Warning,
            description: "Insufficient data: no analyzed components to evaluate against NEC limits"
                .to_string(),
        };
    }

    let max_voltage = analysis.max_voltage();
    let max_current = analysis.max_current();
    let missing_mandatory: Vec<&str> = NEC_MANDATORY
        .iter()
        .filter(|kind| !circuit.has_kind(**kind))
        .map(|kind| kind.label())
        .collect();

    if max_voltage > standards.nec_max_voltage
        || max_current > standards.nec_max_current
        || !missing_mandatory.is_empty()
    {
        let mut reasons = Vec::new();
        if max_voltage > standards.nec_max_voltage {
            reasons.push(format!(
                "maximum voltage {:.1} V exceeds the {:.0} V limit",
                max_voltage, standards.nec_max_voltage
            ));
        }
        if max_current > standards.nec_max_current {
            reasons.push(format!(
                "maximum current {:.1} A exceeds the {:.0} A limit",
                max_current, standards.nec_max_current
            ));
        }
        if !missing_mandatory.is_empty() {
            reasons.push(format!(
                "mandatory protection missing: {}",
                missing_mandatory.join(", ")
            ));
        }
        return ComplianceCheck {
            standard: Standard::Nec,
            status: ComplianceStatus::NonCompliant,
            description: format!("NEC violation: {}", reasons.join("; ")),
        };
    }

    let missing_recommended: Vec<&str> = NEC_RECOMMENDED
        .iter()
        .filter(|kind| !circuit.has_kind(**kind))
        .map(|kind| kind.label())
        .collect();
    if !missing_recommended.is_empty() {
        return ComplianceCheck {
            standard: Standard::Nec,
            status: ComplianceStatus::Warning,
            description: format!(
                "Within NEC limits ({:.1} V of {:.0} V, {:.1} A of {:.0} A) but recommended \
                 protection is absent: {}",
                max_voltage,
                standards.nec_max_voltage,
                max_current,
                standards.nec_max_current,
                missing_recommended.join(", ")
            ),
        };
    }

    ComplianceCheck {
        standard: Standard::Nec,
        status: ComplianceStatus::Compliant,
        description: format!(
            "Maximum voltage {:.1} V is within the {:.0} V limit and maximum current {:.1} A \
             is within the {:.0} A limit; mandatory protection present",
            max_voltage, standards.nec_max_voltage, max_current, standards.nec_max_current
        ),
    }
}

fn check_osha(analysis: &CircuitAnalysis, standards: &SafetyStandards) -> ComplianceCheck {
    let max_voltage = analysis.max_voltage();
    if max_voltage > standards.osha_touch_voltage {
        ComplianceCheck {
            standard: Standard::Osha,
            status: ComplianceStatus::Warning,
            description: format!(
                "Maximum voltage {:.1} V exceeds the {:.0} V OSHA touch-voltage ceiling; \
                 guard or insulate live parts during service",
                max_voltage, standards.osha_touch_voltage
            ),
        }
    } else {
        ComplianceCheck {
            standard: Standard::Osha,
            status: ComplianceStatus::Compliant,
            description: format!(
                "Maximum voltage {:.1} V is within the {:.0} V OSHA touch-voltage ceiling",
                max_voltage, standards.osha_touch_voltage
            ),
        }
    }
}

fn check_nfpa(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
) -> ComplianceCheck {
    let worst = circuit
        .sources()
        .map(|source| incident_energy(source, analysis, standards))
        .fold(None::<f64>, |acc, e| Some(acc.map_or(e, |a| a.max(e))));

    match worst {
        None => ComplianceCheck {
            standard: Standard::Nfpa,
            status: ComplianceStatus::Warning,
            description: "No power source present; arc-flash incident energy cannot be computed"
                .to_string(),
        },
        Some(energy) if energy > standards.nfpa_incident_energy => ComplianceCheck {
            standard: Standard::Nfpa,
            status: ComplianceStatus::NonCompliant,
            description: format!(
                "Worst-case arc-flash incident energy {:.2} cal/cm² exceeds the \
                 {:.1} cal/cm² NFPA 70E limit",
                energy, standards.nfpa_incident_energy
            ),
        },
        Some(energy) => ComplianceCheck {
            standard: Standard::Nfpa,
            status: ComplianceStatus::Compliant,
            description: format!(
                "Worst-case arc-flash incident energy {:.2} cal/cm² is within the \
                 {:.1} cal/cm² NFPA 70E limit",
                energy, standards.nfpa_incident_energy
            ),
        },
    }
}
