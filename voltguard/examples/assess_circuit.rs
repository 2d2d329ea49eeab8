//! Simple assessment example: build a small circuit and print its report.

use voltguard::prelude::*;
use voltguard::ComponentProperties;

fn main() {
    let mut circuit = Circuit::new("kitchen");
    circuit.add_component(Component::new("socket-1", ComponentType::Socket).with_value(230.0, "V"));
    circuit.add_component(Component::new("mcb-1", ComponentType::Mcb).with_properties(
        ComponentProperties {
            trip_current: Some(16.0),
            ..Default::default()
        },
    ));
    circuit.add_component(Component::new("rccb-1", ComponentType::Rccb));
    circuit.add_component(Component::new("ground-1", ComponentType::Ground));
    circuit.add_component(
        Component::new("kettle-1", ComponentType::Heater).with_properties(ComponentProperties {
            power_consumption: Some(2000.0),
            ..Default::default()
        }),
    );
    circuit.connect("socket-1", 0, "mcb-1", 0);
    circuit.connect("mcb-1", 1, "rccb-1", 0);
    circuit.connect("rccb-1", 1, "kettle-1", 0);
    circuit.connect("kettle-1", 1, "ground-1", 0);

    let report = VoltGuardCore::evaluate(&circuit);

    println!("Circuit: {}", circuit.name);
    println!(
        "Total power: {:.1} W, total current: {:.2} A",
        report.analysis.total_power, report.analysis.total_current
    );
    println!(
        "Safety score: {:.0}/100 ({:?} risk)",
        report.assessment.safety_score, report.assessment.risk_level
    );

    if !report.assessment.hazards.is_empty() {
        println!("\nHazards:");
        for hazard in &report.assessment.hazards {
            println!("  [{:?}] {}", hazard.severity, hazard.description);
        }
    }

    println!("\nCompliance:");
    for check in &report.assessment.compliance {
        println!("  {}: {:?}", check.standard.label(), check.status);
    }

    for recommendation in &report.assessment.recommendations {
        println!("- {}", recommendation);
    }

    if report.assessment.risk_level >= RiskLevel::High {
        println!("\nAssessment failed (high risk).");
        std::process::exit(1);
    }

    println!("\nAssessment passed.");
}
