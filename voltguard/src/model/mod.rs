//! Domain model: components, circuits, and the derived analysis and
//! safety records exchanged with the editor and the assistant.

pub mod circuit;
pub mod component;
pub mod safety;

pub use circuit::{
    Circuit, CircuitAnalysis, CircuitIssue, CircuitMetadata, Connection, ConnectionEnd,
    IssueSeverity, Phase, DEFAULT_LINE_VOLTAGE,
};
pub use component::{Component, ComponentProperties, ComponentType, ResolvedProperties};
pub use safety::{
    ComplianceCheck, ComplianceStatus, HazardKind, HazardSeverity, RiskLevel, SafetyAssessment,
    SafetyHazard, Standard,
};
