//! VoltGuard - electrical circuit analysis and safety assessment engine
//!
//! This library computes the electrical operating point (voltage, current,
//! power) of every component in a user-authored circuit, detects electrical
//! hazards against fixed engineering thresholds, checks NEC/OSHA/NFPA 70E
//! compliance, and reduces everything to a single 0-100 safety score with a
//! risk tier.
//!
//! # Quick Start
//!
//! ```
//! use voltguard::{VoltGuardCore, Circuit, Component, ComponentType};
//!
//! let mut circuit = Circuit::new("bedroom");
//! circuit.add_component(Component::new("sock-1", ComponentType::Socket));
//! circuit.add_component(Component::new("mcb-1", ComponentType::Mcb));
//! circuit.add_component(Component::new("fan-1", ComponentType::Fan));
//! circuit.add_component(Component::new("gnd-1", ComponentType::Ground));
//!
//! let report = VoltGuardCore::evaluate(&circuit);
//! println!("score: {}", report.assessment.safety_score);
//! for hazard in &report.assessment.hazards {
//!     println!("{:?}: {}", hazard.severity, hazard.description);
//! }
//! ```
//!
//! # Design
//!
//! - **Rule-based, not SPICE**: one fixed formula per component type and a
//!   single deterministic pass; no nodal or mesh analysis.
//! - **Total**: every function returns a complete result for every
//!   valid-shaped circuit. Malformed input degrades into diagnostics, never
//!   into panics or errors.
//! - **Pure**: no shared state; safe to recompute on every circuit edit.

pub mod analysis;
pub mod core;
pub mod graph;
pub mod model;
pub mod safety;

// Re-export main types
pub use crate::core::{
    load_circuit, AnalysisHistory, ComponentDelta, EngineError, SafetyReport, VoltGuardCore,
};
pub use graph::{Adjacent, SeriesGroup, TopologyGraph};
pub use model::{
    Circuit, CircuitAnalysis, CircuitIssue, CircuitMetadata, ComplianceCheck, ComplianceStatus,
    Component, ComponentProperties, ComponentType, Connection, ConnectionEnd, HazardKind,
    HazardSeverity, IssueSeverity, Phase, RiskLevel, SafetyAssessment, SafetyHazard, Standard,
};
pub use safety::SafetyStandards;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Circuit, CircuitAnalysis, CircuitIssue, Component, ComponentType, EngineError,
        HazardSeverity, IssueSeverity, RiskLevel, SafetyAssessment, SafetyReport, SafetyStandards,
        VoltGuardCore,
    };
}
