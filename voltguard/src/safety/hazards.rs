//! Hazard analyzer: six independent, order-independent detectors plus
//! deduplication. Inputs are assumed sanitized by the validator; no
//! detector guards against NaN or infinity.

use std::collections::HashSet;
use std::f64::consts::PI;

use tracing::debug;

use crate::model::{
    Circuit, CircuitAnalysis, Component, ComponentType, HazardKind, HazardSeverity, SafetyHazard,
};
use crate::safety::standards::SafetyStandards;

/// Run every detector and deduplicate the combined findings by
/// `(type, component-or-global, description)`, keeping first occurrences.
pub fn detect(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
) -> Vec<SafetyHazard> {
    let mut hazards = Vec::new();
    check_overcurrent(circuit, analysis, standards, &mut hazards);
    check_overvoltage(circuit, analysis, standards, &mut hazards);
    check_short_circuit(circuit, analysis, standards, &mut hazards);
    check_ground_fault(circuit, analysis, standards, &mut hazards);
    check_thermal(circuit, analysis, standards, &mut hazards);
    check_arc_flash(circuit, analysis, standards, &mut hazards);

    let before = hazards.len();
    let mut seen = HashSet::new();
    hazards.retain(|h| seen.insert(h.dedup_key()));
    debug!(
        detected = before,
        kept = hazards.len(),
        "hazard detection complete"
    );
    hazards
}

fn check_overcurrent(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    for source in circuit.sources() {
        let current = analysis.current(&source.id);
        if current > standards.nec_max_current {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::Overcurrent,
                    HazardSeverity::Critical,
                    format!(
                        "Source '{}' delivers {:.1} A, above the {:.0} A NEC limit",
                        source.id, current, standards.nec_max_current
                    ),
                    "Split loads across additional circuits and verify conductor sizing",
                )
                .for_component(&source.id),
            );
        }
    }

    for component in &circuit.components {
        if let Some(rating) = component.resolved().current_rating {
            let current = analysis.current(&component.id);
            if current > rating {
                hazards.push(
                    SafetyHazard::new(
                        HazardKind::Overcurrent,
                        HazardSeverity::High,
                        format!(
                            "{} '{}' carries {:.1} A but is rated for {:.1} A",
                            component.kind.label(),
                            component.id,
                            current,
                            rating
                        ),
                        "Replace the component with one rated for the actual load current",
                    )
                    .for_component(&component.id),
                );
            }
        }
    }
}

fn check_overvoltage(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    for component in &circuit.components {
        let voltage = analysis.voltage(&component.id);
        if voltage > standards.nec_max_voltage {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::Overvoltage,
                    HazardSeverity::Critical,
                    format!(
                        "{} '{}' operates at {:.1} V, above the {:.0} V NEC limit",
                        component.kind.label(),
                        component.id,
                        voltage,
                        standards.nec_max_voltage
                    ),
                    "Reduce the supply voltage or use equipment rated for the system voltage",
                )
                .for_component(&component.id),
            );
        }
        if let Some(rating) = component.resolved().voltage_rating {
            if voltage > rating {
                hazards.push(
                    SafetyHazard::new(
                        HazardKind::Overvoltage,
                        HazardSeverity::High,
                        format!(
                            "{} '{}' sees {:.1} V but is rated for {:.1} V",
                            component.kind.label(),
                            component.id,
                            voltage,
                            rating
                        ),
                        "Use a component with a voltage rating above the operating voltage",
                    )
                    .for_component(&component.id),
                );
            }
        }
    }

    // Touch-voltage exposure is only a hazard when nothing in the circuit
    // would clear a ground fault.
    let has_gf_device = circuit
        .components
        .iter()
        .any(|c| c.kind.is_ground_fault_device());
    if !has_gf_device {
        let exposed = circuit
            .components
            .iter()
            .filter(|c| {
                c.kind.is_accessible()
                    && analysis.voltage(&c.id) > standards.osha_touch_voltage
            })
            .count();
        if exposed > 0 {
            hazards.push(SafetyHazard::new(
                HazardKind::Overvoltage,
                HazardSeverity::High,
                format!(
                    "{} accessible component(s) exceed the {:.0} V touch-voltage limit \
                     with no GFCI, RCCB, or AFCI in the circuit",
                    exposed, standards.osha_touch_voltage
                ),
                "Install a GFCI or RCCB to protect accessible live parts",
            ));
        }
    }
}

fn check_short_circuit(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    for source in circuit.sources() {
        let voltage = analysis.voltage(&source.id);
        let current = analysis.current(&source.id);
        // Dual condition: an absolute floor and a voltage-relative ratio.
        // Legitimately high-current low-voltage systems fail the ratio and
        // are not flagged.
        let floor = if voltage <= standards.osha_touch_voltage {
            standards.short_circuit_lv_floor_a
        } else {
            standards.short_circuit_floor_a
        };
        if current > floor && current > standards.short_circuit_voltage_ratio * voltage {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::ShortCircuit,
                    HazardSeverity::Critical,
                    format!(
                        "Source '{}' current {:.1} A exceeds {:.0} A and {:.0}× its {:.1} V \
                         supply, indicating a short circuit",
                        source.id,
                        current,
                        floor,
                        standards.short_circuit_voltage_ratio,
                        voltage
                    ),
                    "De-energize immediately and locate the shorted path before re-energizing",
                )
                .for_component(&source.id),
            );
        }
    }
}

fn check_ground_fault(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    if !circuit.has_kind(ComponentType::Ground) {
        hazards.push(SafetyHazard::new(
            HazardKind::GroundFault,
            HazardSeverity::Medium,
            "Circuit has no ground connection",
            "Add a grounding electrode conductor to give fault current a safe return path",
        ));
    }

    // A residual-current device clears the fault before it matters.
    if circuit.has_kind(ComponentType::Gfci) || circuit.has_kind(ComponentType::Rccb) {
        return;
    }

    for source in circuit.sources() {
        let voltage = analysis.voltage(&source.id);
        let fault_current = voltage / standards.ground_fault_path_ohms;
        if fault_current > standards.ground_fault_trip_a {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::GroundFault,
                    HazardSeverity::High,
                    format!(
                        "A ground fault on source '{}' would drive {:.0} mA through a \
                         {:.0} Ω path, above the {:.0} mA trip threshold",
                        source.id,
                        fault_current * 1000.0,
                        standards.ground_fault_path_ohms,
                        standards.ground_fault_trip_a * 1000.0
                    ),
                    "Install a GFCI or RCCB rated to trip at 30 mA",
                )
                .for_component(&source.id),
            );
        }
    }
}

fn check_thermal(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    for component in &circuit.components {
        let power = analysis.component_power(&component.id);
        if let Some(rating) = component.resolved().power_rating {
            if power > rating {
                hazards.push(
                    SafetyHazard::new(
                        HazardKind::Thermal,
                        HazardSeverity::High,
                        format!(
                            "{} '{}' dissipates {:.1} W, above its {:.1} W rating",
                            component.kind.label(),
                            component.id,
                            power,
                            rating
                        ),
                        "Use a component with a higher power rating or reduce the load",
                    )
                    .for_component(&component.id),
                );
            }
            continue;
        }

        // No declared rating: apply a class-dependent density ceiling.
        // Only appliances that run hot by design are exempt. Sources are
        // not: their assigned power is the full delivered load, so a
        // heavily loaded feeder surfaces here as a thermal flag.
        if component.kind.is_high_power_appliance() {
            continue;
        }
        let threshold = if component.kind.is_protection() {
            standards.protection_power_density_w
        } else {
            standards.general_power_density_w
        };
        if power > threshold {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::Thermal,
                    HazardSeverity::Medium,
                    format!(
                        "{} '{}' dissipates {:.1} W with no declared power rating \
                         (class ceiling {:.0} W)",
                        component.kind.label(),
                        component.id,
                        power,
                        threshold
                    ),
                    "Declare a power rating for the component or verify its heat dissipation",
                )
                .for_component(&component.id),
            );
        }
    }
}

fn check_arc_flash(
    circuit: &Circuit,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
    hazards: &mut Vec<SafetyHazard>,
) {
    for source in circuit.sources() {
        let voltage = analysis.voltage(&source.id);
        if voltage <= standards.osha_touch_voltage {
            continue;
        }
        let energy = incident_energy(source, analysis, standards);
        if energy > standards.nfpa_incident_energy {
            hazards.push(
                SafetyHazard::new(
                    HazardKind::ArcFlash,
                    HazardSeverity::Critical,
                    format!(
                        "Arc-flash incident energy at source '{}' is {:.2} cal/cm², above \
                         the {:.1} cal/cm² NFPA 70E limit (PPE category {})",
                        source.id,
                        energy,
                        standards.nfpa_incident_energy,
                        ppe_category(energy)
                    ),
                    "Require arc-rated PPE and add fast-clearing protection upstream",
                )
                .for_component(&source.id),
            );
        }
    }
}

/// Estimated arc-flash incident energy at a source, in cal/cm².
///
/// Fault current is approximated as operating current × a fixed multiplier,
/// capped at 10 kA; the energy formula is
/// `E = 1.732 × V × I_fault × t / (4π·d²)` with the configured working
/// distance and the source's clearing time.
pub fn incident_energy(
    source: &Component,
    analysis: &CircuitAnalysis,
    standards: &SafetyStandards,
) -> f64 {
    let voltage = analysis.voltage(&source.id);
    let current = analysis.current(&source.id);
    let fault_current = (current * standards.arc_fault_multiplier).min(standards.arc_fault_cap_a);
    let clearing_time = source.resolved().clearing_time;
    let d = standards.working_distance_cm;
    1.732 * voltage * fault_current * clearing_time / (4.0 * PI * d * d)
}

/// NFPA 70E PPE category (0-4) for an incident energy in cal/cm².
pub fn ppe_category(energy: f64) -> u8 {
    if energy <= 1.2 {
        0
    } else if energy <= 4.0 {
        1
    } else if energy <= 8.0 {
        2
    } else if energy <= 25.0 {
        3
    } else {
        4
    }
}
