//! Circuit aggregate and the derived per-analysis records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentType};

/// One side of a connection: a component id plus a terminal index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEnd {
    pub component: String,
    pub port: u32,
}

/// An undirected logical wire between two component ports.
///
/// `wire_color` is presentation-only; it carries no electrical meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: ConnectionEnd,
    pub to: ConnectionEnd,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_color: Option<String>,
}

/// Supply phase of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Single,
    Three,
}

/// Line voltage assumed when neither the source nor the metadata declares
/// one. 230 V is the common single-phase distribution voltage.
pub const DEFAULT_LINE_VOLTAGE: f64 = 230.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircuitMetadata {
    /// Supply voltage used when a source has no positive value of its own.
    pub voltage: f64,
    pub phase: Option<Phase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for CircuitMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            voltage: DEFAULT_LINE_VOLTAGE,
            phase: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user-authored circuit: components, wires, and supply metadata.
///
/// The engine tolerates malformed circuits (duplicate-free ids and valid
/// connection references are expected but not assumed); violations degrade
/// into diagnostic issues rather than panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub name: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: CircuitMetadata,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            connections: Vec::new(),
            metadata: CircuitMetadata::default(),
        }
    }

    pub fn with_supply(mut self, voltage: f64, phase: Phase) -> Self {
        self.metadata.voltage = voltage;
        self.metadata.phase = Some(phase);
        self
    }

    pub fn add_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Wire two component ports together.
    pub fn connect(
        &mut self,
        from: impl Into<String>,
        from_port: u32,
        to: impl Into<String>,
        to_port: u32,
    ) -> &mut Self {
        self.connections.push(Connection {
            from: ConnectionEnd {
                component: from.into(),
                port: from_port,
            },
            to: ConnectionEnd {
                component: to.into(),
                port: to_port,
            },
            wire_color: None,
        });
        self
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn has_kind(&self, kind: ComponentType) -> bool {
        self.components.iter().any(|c| c.kind == kind)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.kind.is_source())
    }

    pub fn has_protection(&self) -> bool {
        self.components.iter().any(|c| c.kind.is_protection())
    }
}

/// Severity of a diagnostic raised during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Warning,
    Critical,
}

/// A diagnostic attached to a [`CircuitAnalysis`].
///
/// `id` is a stable code (e.g. `"no-power-source"`) so callers can key
/// behavior off specific conditions without string-matching messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitIssue {
    pub id: String,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl CircuitIssue {
    pub fn info(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: IssueSeverity::Info,
            message: message.into(),
            component: None,
        }
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: IssueSeverity::Warning,
            message: message.into(),
            component: None,
        }
    }

    pub fn critical(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: IssueSeverity::Critical,
            message: message.into(),
            component: None,
        }
    }

    pub fn for_component(mut self, id: impl Into<String>) -> Self {
        self.component = Some(id.into());
        self
    }
}

/// Derived electrical operating point for every component, recomputed in
/// full on each circuit mutation. Carries no identity beyond the call that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitAnalysis {
    /// Component id -> operating voltage, in volts.
    pub voltages: HashMap<String, f64>,
    /// Component id -> current, in amperes.
    pub currents: HashMap<String, f64>,
    /// Component id -> power, in watts.
    pub power: HashMap<String, f64>,
    pub total_power: f64,
    pub total_current: f64,
    /// Delivered-to-load share of generated power, 0-100.
    pub efficiency: f64,
    pub issues: Vec<CircuitIssue>,
}

impl CircuitAnalysis {
    /// An all-zero analysis covering every component id in the circuit.
    /// This is the terminal result for structurally unusable circuits.
    pub fn zeroed(circuit: &Circuit) -> Self {
        let mut voltages = HashMap::new();
        let mut currents = HashMap::new();
        let mut power = HashMap::new();
        for c in &circuit.components {
            voltages.insert(c.id.clone(), 0.0);
            currents.insert(c.id.clone(), 0.0);
            power.insert(c.id.clone(), 0.0);
        }
        Self {
            voltages,
            currents,
            power,
            total_power: 0.0,
            total_current: 0.0,
            efficiency: 0.0,
            issues: Vec::new(),
        }
    }

    pub fn voltage(&self, id: &str) -> f64 {
        self.voltages.get(id).copied().unwrap_or(0.0)
    }

    pub fn current(&self, id: &str) -> f64 {
        self.currents.get(id).copied().unwrap_or(0.0)
    }

    pub fn component_power(&self, id: &str) -> f64 {
        self.power.get(id).copied().unwrap_or(0.0)
    }

    pub fn max_voltage(&self) -> f64 {
        self.voltages.values().copied().fold(0.0, f64::max)
    }

    pub fn max_current(&self) -> f64 {
        self.currents.values().copied().fold(0.0, f64::max)
    }

    pub fn has_critical_issue(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::ComponentType;

    #[test]
    fn test_circuit_json_round_trip() {
        let mut circuit = Circuit::new("bedroom").with_supply(230.0, Phase::Single);
        circuit.add_component(Component::new("sock-1", ComponentType::Socket));
        circuit.add_component(Component::new("fan-1", ComponentType::Fan));
        circuit.connect("sock-1", 0, "fan-1", 0);

        let json = serde_json::to_string(&circuit).unwrap();
        assert!(json.contains("\"wireColor\"") == false);
        assert!(json.contains("\"createdAt\""));

        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_metadata_defaults_when_absent() {
        let circuit: Circuit = serde_json::from_str(
            r#"{"name": "bare", "components": [], "connections": []}"#,
        )
        .unwrap();
        assert_eq!(circuit.metadata.voltage, DEFAULT_LINE_VOLTAGE);
        assert!(circuit.metadata.phase.is_none());
    }

    #[test]
    fn test_zeroed_covers_every_component() {
        let mut circuit = Circuit::new("zeros");
        circuit.add_component(Component::new("a", ComponentType::Fan));
        circuit.add_component(Component::new("b", ComponentType::Ground));
        let analysis = CircuitAnalysis::zeroed(&circuit);
        assert_eq!(analysis.voltages.len(), 2);
        assert_eq!(analysis.current("a"), 0.0);
        assert_eq!(analysis.component_power("b"), 0.0);
    }

    #[test]
    fn test_compliance_status_spelling() {
        let issue = CircuitIssue::critical("no-power-source", "no source");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"critical\""));
        assert!(json.contains("\"no-power-source\""));
    }
}
