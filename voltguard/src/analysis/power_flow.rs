//! Power-flow calculator.
//!
//! Deterministic single pass, no iteration to convergence. Each component
//! type follows one fixed formula; there is deliberately no generic solver
//! and no nodal/mesh analysis. Appliance wattage is authoritative; the
//! declared `powerConsumption` is never recomputed from V·I.

use tracing::debug;

use crate::graph::TopologyGraph;
use crate::model::{
    Circuit, CircuitAnalysis, CircuitIssue, Component, ComponentType, Phase, DEFAULT_LINE_VOLTAGE,
};

/// Resistance above this is treated as an open path.
const MAX_RESISTANCE_OHMS: f64 = 1.0e6;
/// Assumed contact voltage drop across an in-line protection or switching
/// device, used only for its own dissipation figure.
const CONTACT_DROP_V: f64 = 0.1;
/// Coil/electronics draw of contactors, relays, and timers.
const CONTROL_DEVICE_DRAW_A: f64 = 0.05;
/// Self-load of panel meters.
const METER_SELF_LOAD_A: f64 = 0.001;
/// Headroom factor for the recommended breaker/fuse rating.
const TRIP_HEADROOM: f64 = 1.25;

/// Assign `{voltage, current, power}` to every component in the circuit.
///
/// Guarantees totality: every component id present in the input appears in
/// all three result maps, even when the value is zero.
pub fn compute(circuit: &Circuit, graph: &TopologyGraph) -> CircuitAnalysis {
    let mut analysis = CircuitAnalysis::zeroed(circuit);

    let sources: Vec<&Component> = circuit.sources().collect();
    if sources.is_empty() {
        analysis.issues.push(CircuitIssue::critical(
            "no-power-source",
            "Circuit has no power source (battery or socket); nothing can be energized",
        ));
        return analysis;
    }

    let supply_voltage = source_voltage(sources[0], circuit);
    let phase = circuit.metadata.phase.unwrap_or(Phase::Single);
    debug!(supply_voltage, ?phase, sources = sources.len(), "power-flow pass");

    // Pass 1: appliance currents from declared wattage.
    let mut total_current = 0.0;
    let mut appliance_power = 0.0;
    for component in &circuit.components {
        if !component.kind.is_appliance() {
            continue;
        }
        let resolved = component.resolved();
        let power = resolved.power_consumption;
        let divisor = match phase {
            Phase::Three => 3.0_f64.sqrt() * supply_voltage * resolved.power_factor,
            Phase::Single => supply_voltage * resolved.power_factor,
        };
        let raw = if divisor > 0.0 { power / divisor } else { 0.0 };
        let current = if raw.is_finite() && raw > 0.0 { raw } else { 0.0 };

        analysis.voltages.insert(component.id.clone(), supply_voltage);
        analysis.currents.insert(component.id.clone(), current);
        analysis.power.insert(component.id.clone(), power);
        total_current += current;
        appliance_power += power;
    }

    // Pass 2: everything else sees the aggregate, not a per-branch figure.
    let mut losses = 0.0;
    for component in &circuit.components {
        if component.kind.is_appliance() {
            continue;
        }
        let resolved = component.resolved();
        let (voltage, current, power) = match component.kind {
            ComponentType::Battery | ComponentType::Socket => {
                let v = source_voltage(component, circuit);
                (v, total_current, v * total_current)
            }
            kind if kind.is_pass_through() => {
                let dissipated = total_current * CONTACT_DROP_V;
                losses += dissipated;
                check_trip_rating(component, total_current, &resolved, &mut analysis.issues);
                (supply_voltage, total_current, dissipated)
            }
            kind if kind.is_control_coil() => {
                let p = supply_voltage * CONTROL_DEVICE_DRAW_A;
                losses += p;
                (supply_voltage, CONTROL_DEVICE_DRAW_A, p)
            }
            ComponentType::Junction => {
                // Sum only the appliances wired to this junction, giving a
                // distribution-aware figure distinct from the upstream total.
                let branch: f64 = graph
                    .neighbors(&component.id)
                    .iter()
                    .filter(|a| {
                        circuit
                            .component(&a.neighbor_id)
                            .map(|c| c.kind.is_appliance())
                            .unwrap_or(false)
                    })
                    .map(|a| analysis.current(&a.neighbor_id))
                    .sum();
                (supply_voltage, branch, 0.0)
            }
            ComponentType::Ground => (0.0, 0.0, 0.0),
            ComponentType::Transformer | ComponentType::IsolationTransformer => {
                let secondary = supply_voltage * resolved.turns_ratio;
                (secondary, 0.0, 0.0)
            }
            ComponentType::Resistor => {
                let current = if component.value > 0.0 {
                    supply_voltage / component.value.min(MAX_RESISTANCE_OHMS)
                } else {
                    0.0
                };
                let dissipated = supply_voltage * current;
                losses += dissipated;
                check_power_rating(component, dissipated, &resolved, &mut analysis.issues);
                (supply_voltage, current, dissipated)
            }
            kind if kind.is_meter() => {
                let p = supply_voltage * METER_SELF_LOAD_A;
                losses += p;
                (supply_voltage, METER_SELF_LOAD_A, p)
            }
            // Conservative default: energized but drawing nothing.
            _ => (supply_voltage, 0.0, 0.0),
        };
        analysis.voltages.insert(component.id.clone(), voltage);
        analysis.currents.insert(component.id.clone(), current);
        analysis.power.insert(component.id.clone(), power);
    }

    analysis.total_current = total_current;
    analysis.total_power = appliance_power + losses;
    analysis.efficiency = if analysis.total_power > 0.0 {
        (appliance_power / analysis.total_power * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    analysis
}

/// Supply-voltage fallback chain: the source's own positive value, then the
/// circuit metadata voltage, then the 230 V industry default. Downstream
/// current math depends on this exact order.
fn source_voltage(source: &Component, circuit: &Circuit) -> f64 {
    if source.value > 0.0 && source.value.is_finite() {
        source.value
    } else if circuit.metadata.voltage > 0.0 && circuit.metadata.voltage.is_finite() {
        circuit.metadata.voltage
    } else {
        DEFAULT_LINE_VOLTAGE
    }
}

fn check_trip_rating(
    component: &Component,
    total_current: f64,
    resolved: &crate::model::ResolvedProperties,
    issues: &mut Vec<CircuitIssue>,
) {
    let rating = match component.kind {
        ComponentType::Mcb => resolved.trip_current,
        ComponentType::Fuse => resolved.fuse_rating,
        _ => return,
    };
    if total_current > rating {
        let recommended = (total_current * TRIP_HEADROOM).ceil();
        issues.push(
            CircuitIssue::critical(
                "protection-overload",
                format!(
                    "Load current {:.1} A exceeds the {:.0} A rating of {} '{}'; \
                     use a rating of at least {:.0} A",
                    total_current,
                    rating,
                    component.kind.label(),
                    component.id,
                    recommended
                ),
            )
            .for_component(&component.id),
        );
    }
}

fn check_power_rating(
    component: &Component,
    dissipated: f64,
    resolved: &crate::model::ResolvedProperties,
    issues: &mut Vec<CircuitIssue>,
) {
    if let Some(rating) = resolved.power_rating {
        if dissipated > rating {
            issues.push(
                CircuitIssue::warning(
                    "resistor-power-rating",
                    format!(
                        "Resistor '{}' dissipates {:.2} W, above its {:.2} W rating",
                        component.id, dissipated, rating
                    ),
                )
                .for_component(&component.id),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, ComponentProperties, ComponentType};

    fn analyze(circuit: &Circuit) -> CircuitAnalysis {
        let graph = TopologyGraph::build(circuit);
        compute(circuit, &graph)
    }

    #[test]
    fn test_no_source_is_terminal_but_total() {
        let mut circuit = Circuit::new("dead");
        circuit.add_component(Component::new("fan-1", ComponentType::Fan));
        let analysis = analyze(&circuit);
        assert_eq!(analysis.total_power, 0.0);
        assert_eq!(analysis.efficiency, 0.0);
        assert_eq!(analysis.voltage("fan-1"), 0.0);
        let critical: Vec<_> = analysis
            .issues
            .iter()
            .filter(|i| i.severity == crate::model::IssueSeverity::Critical)
            .collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id, "no-power-source");
    }

    #[test]
    fn test_supply_voltage_fallback_chain() {
        // Source value wins.
        let mut circuit = Circuit::new("a");
        circuit.add_component(Component::new("bat-1", ComponentType::Battery).with_value(12.0, "V"));
        assert_eq!(analyze(&circuit).voltage("bat-1"), 12.0);

        // Zero-valued source falls back to metadata.
        let mut circuit = Circuit::new("b");
        circuit.metadata.voltage = 110.0;
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        assert_eq!(analyze(&circuit).voltage("sock-1"), 110.0);

        // Both absent: 230 V industry default.
        let mut circuit = Circuit::new("c");
        circuit.metadata.voltage = 0.0;
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        assert_eq!(analyze(&circuit).voltage("sock-1"), DEFAULT_LINE_VOLTAGE);
    }

    #[test]
    fn test_single_phase_appliance_current() {
        let mut circuit = Circuit::new("fan");
        circuit.metadata.voltage = 230.0;
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        circuit.add_component(
            Component::new("heater-1", ComponentType::Heater).with_properties(
                ComponentProperties {
                    power_consumption: Some(1500.0),
                    ..Default::default()
                },
            ),
        );
        let analysis = analyze(&circuit);
        // 1500 / (230 × 0.8)
        let expected = 1500.0 / (230.0 * 0.8);
        assert!((analysis.current("heater-1") - expected).abs() < 1e-9);
        assert_eq!(analysis.component_power("heater-1"), 1500.0);
        assert!((analysis.total_current - expected).abs() < 1e-9);
    }

    #[test]
    fn test_three_phase_heater_current() {
        let mut circuit = Circuit::new("3ph").with_supply(230.0, Phase::Three);
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        circuit.add_component(
            Component::new("heater-1", ComponentType::Heater).with_properties(
                ComponentProperties {
                    power_consumption: Some(1500.0),
                    power_factor: Some(0.8),
                    ..Default::default()
                },
            ),
        );
        let analysis = analyze(&circuit);
        let expected = 1500.0 / (3.0_f64.sqrt() * 230.0 * 0.8);
        assert!((analysis.current("heater-1") - expected).abs() < 1e-9);
        assert!((expected - 4.71).abs() < 0.01);
    }

    #[test]
    fn test_mcb_trip_boundary() {
        // 16 A default trip; 3680 W at 230 V / pf 1.0 is exactly 16 A.
        let build = |watts: f64| {
            let mut circuit = Circuit::new("trip");
            circuit.metadata.voltage = 230.0;
            circuit.add_component(Component::new("sock-1", ComponentType::Socket));
            circuit.add_component(Component::new("mcb-1", ComponentType::Mcb));
            circuit.add_component(
                Component::new("heater-1", ComponentType::Heater).with_properties(
                    ComponentProperties {
                        power_consumption: Some(watts),
                        power_factor: Some(1.0),
                        ..Default::default()
                    },
                ),
            );
            analyze(&circuit)
        };

        let below = build(3680.0 - 1.0);
        assert!(!below.issues.iter().any(|i| i.id == "protection-overload"));

        let above = build(3680.0 + 1.0);
        let overload: Vec<_> = above
            .issues
            .iter()
            .filter(|i| i.id == "protection-overload")
            .collect();
        assert_eq!(overload.len(), 1);
        assert_eq!(overload[0].severity, crate::model::IssueSeverity::Critical);
        // ceil(16.004… × 1.25) = 21
        assert!(overload[0].message.contains("21 A"));
    }

    #[test]
    fn test_resistor_formula_and_zero_guard() {
        let mut circuit = Circuit::new("r");
        circuit.add_component(Component::new("bat-1", ComponentType::Battery).with_value(9.0, "V"));
        circuit.add_component(Component::new("r-1", ComponentType::Resistor).with_value(330.0, "Ω"));
        circuit.add_component(Component::new("r-0", ComponentType::Resistor).with_value(0.0, "Ω"));
        let analysis = analyze(&circuit);
        assert!((analysis.current("r-1") - 9.0 / 330.0).abs() < 1e-9);
        // Zero-valued resistor is guarded inline, never NaN/Infinity.
        assert_eq!(analysis.current("r-0"), 0.0);
        assert!(analysis.current("r-0").is_finite());
    }

    #[test]
    fn test_junction_sums_connected_appliances_only() {
        let mut circuit = Circuit::new("junction");
        circuit.metadata.voltage = 230.0;
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        circuit.add_component(Component::new("j-1", ComponentType::Junction).with_ports(4));
        circuit.add_component(
            Component::new("fan-1", ComponentType::Fan).with_properties(ComponentProperties {
                power_consumption: Some(184.0), // 1 A at 230 V / 0.8
                ..Default::default()
            }),
        );
        circuit.add_component(
            Component::new("tv-1", ComponentType::Tv).with_properties(ComponentProperties {
                power_consumption: Some(368.0), // 2 A
                ..Default::default()
            }),
        );
        // Only the fan hangs off the junction.
        circuit.connect("sock-1", 0, "j-1", 0);
        circuit.connect("j-1", 1, "fan-1", 0);
        let analysis = analyze(&circuit);
        assert!((analysis.current("j-1") - 1.0).abs() < 1e-9);
        assert!((analysis.total_current - 3.0).abs() < 1e-9);
        // The socket sees the aggregate.
        assert!((analysis.current("sock-1") - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_transformer_secondary_voltage() {
        let mut circuit = Circuit::new("tx");
        circuit.metadata.voltage = 230.0;
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        circuit.add_component(
            Component::new("tx-1", ComponentType::Transformer).with_properties(
                ComponentProperties {
                    turns_ratio: Some(0.1),
                    ..Default::default()
                },
            ),
        );
        let analysis = analyze(&circuit);
        assert!((analysis.voltage("tx-1") - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_resistor_power_rating_warning() {
        let mut circuit = Circuit::new("hot-resistor");
        circuit.add_component(Component::new("bat-1", ComponentType::Battery).with_value(12.0, "V"));
        circuit.add_component(
            Component::new("r-1", ComponentType::Resistor)
                .with_value(10.0, "Ω")
                .with_properties(ComponentProperties {
                    power_rating: Some(5.0),
                    ..Default::default()
                }),
        );
        let analysis = analyze(&circuit);
        // 12 V / 10 Ω = 1.2 A, 14.4 W > 5 W rating.
        let warning: Vec<_> = analysis
            .issues
            .iter()
            .filter(|i| i.id == "resistor-power-rating")
            .collect();
        assert_eq!(warning.len(), 1);
        assert_eq!(warning[0].severity, crate::model::IssueSeverity::Warning);
    }

    #[test]
    fn test_totality_over_all_kinds() {
        let mut circuit = Circuit::new("everything");
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        for (i, kind) in [
            ComponentType::Mcb,
            ComponentType::Relay,
            ComponentType::Voltmeter,
            ComponentType::Led,
            ComponentType::Ground,
            ComponentType::Junction,
            ComponentType::Sensor,
            ComponentType::LightningRod,
        ]
        .into_iter()
        .enumerate()
        {
            circuit.add_component(Component::new(format!("c-{i}"), kind));
        }
        let analysis = analyze(&circuit);
        for component in &circuit.components {
            assert!(analysis.voltages.contains_key(&component.id));
            assert!(analysis.currents.contains_key(&component.id));
            assert!(analysis.power.contains_key(&component.id));
        }
    }
}
