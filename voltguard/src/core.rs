//! Core analysis pipeline shared by the CLI and embedding applications.
//! No UI or app-state dependencies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{compute_power_flow, sanitize};
use crate::graph::TopologyGraph;
use crate::model::{Circuit, CircuitAnalysis, CircuitIssue, SafetyAssessment};
use crate::safety::{assess, check_compliance, detect_hazards, SafetyStandards};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

/// Analysis plus assessment for one circuit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub analysis: CircuitAnalysis,
    pub assessment: SafetyAssessment,
}

/// Core engine API. Every method is a pure function of its inputs; the
/// engine holds no state between calls and is safe to invoke on every
/// editor keystroke without synchronization.
pub struct VoltGuardCore;

impl VoltGuardCore {
    /// Run the electrical pass: topology, power flow, structural
    /// diagnostics, then sanitization. Total for any circuit shape:
    /// never fails, never panics.
    pub fn analyze(circuit: &Circuit) -> CircuitAnalysis {
        let graph = TopologyGraph::build(circuit);
        let mut analysis = compute_power_flow(circuit, &graph);

        let mut structural: Vec<CircuitIssue> = graph.issues().to_vec();
        // Isolation is only meaningful once wiring has started; a freshly
        // placed palette of components would otherwise drown in notices.
        if !circuit.connections.is_empty() {
            for id in graph.isolated(circuit) {
                structural.push(
                    CircuitIssue::info(
                        "isolated-component",
                        format!("Component '{}' is not connected to anything", id),
                    )
                    .for_component(id),
                );
            }
        }
        for group in graph.series_groups(circuit) {
            structural.push(CircuitIssue::info(
                "series-group",
                format!(
                    "{} {}s connected in series: {}",
                    group.members.len(),
                    group.kind.label(),
                    group.members.join(", ")
                ),
            ));
        }
        analysis.issues.splice(0..0, structural);

        sanitize(&mut analysis);
        analysis
    }

    /// Derive the safety verdict from a (sanitized) analysis.
    pub fn assess_with(
        circuit: &Circuit,
        analysis: &CircuitAnalysis,
        standards: &SafetyStandards,
    ) -> SafetyAssessment {
        let hazards = detect_hazards(circuit, analysis, standards);
        let compliance = check_compliance(circuit, analysis, standards);
        assess(circuit, hazards, compliance)
    }

    /// Full pipeline with the default threshold set.
    pub fn evaluate(circuit: &Circuit) -> SafetyReport {
        Self::evaluate_with(circuit, &SafetyStandards::default())
    }

    /// Full pipeline with a caller-supplied threshold set.
    pub fn evaluate_with(circuit: &Circuit, standards: &SafetyStandards) -> SafetyReport {
        let analysis = Self::analyze(circuit);
        let assessment = Self::assess_with(circuit, &analysis, standards);
        SafetyReport {
            analysis,
            assessment,
        }
    }
}

/// Load a circuit from a JSON file (convenience wrapper).
pub fn load_circuit(path: &Path) -> Result<Circuit, EngineError> {
    let contents = std::fs::read_to_string(path)?;
    let circuit = serde_json::from_str(&contents)?;
    Ok(circuit)
}

/// Per-component change between two analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDelta {
    pub component: String,
    pub voltage_delta: f64,
    pub current_delta: f64,
    pub power_delta: f64,
}

/// Caller-owned, append-only history of analyses, kept purely for
/// before/after comparison in the editor. Optional: the engine's own
/// correctness never depends on it.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHistory {
    snapshots: Vec<CircuitAnalysis>,
}

/// Changes below this are display noise, not real deltas.
const DELTA_EPSILON: f64 = 1e-9;

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, analysis: CircuitAnalysis) {
        self.snapshots.push(analysis);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&CircuitAnalysis> {
        self.snapshots.last()
    }

    /// Component-level deltas between the two most recent snapshots.
    /// Components present in only one snapshot diff against zero.
    pub fn diff(&self) -> Option<Vec<ComponentDelta>> {
        let [.., previous, current] = self.snapshots.as_slice() else {
            return None;
        };

        let mut ids: Vec<&String> = previous.voltages.keys().collect();
        for id in current.voltages.keys() {
            if !previous.voltages.contains_key(id) {
                ids.push(id);
            }
        }
        ids.sort();

        let deltas = ids
            .into_iter()
            .filter_map(|id| {
                let delta = ComponentDelta {
                    component: id.clone(),
                    voltage_delta: current.voltage(id) - previous.voltage(id),
                    current_delta: current.current(id) - previous.current(id),
                    power_delta: current.component_power(id) - previous.component_power(id),
                };
                let changed = delta.voltage_delta.abs() > DELTA_EPSILON
                    || delta.current_delta.abs() > DELTA_EPSILON
                    || delta.power_delta.abs() > DELTA_EPSILON;
                changed.then_some(delta)
            })
            .collect();
        Some(deltas)
    }
}
