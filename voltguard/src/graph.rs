//! Topology graph built from the flat connection list.
//!
//! The graph backs the distribution-aware junction math in the power-flow
//! pass, series-group reporting, and structural diagnostics. It is tolerant
//! by design: connections referencing unknown components or out-of-range
//! ports are reported and skipped, never fatal.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Circuit, CircuitIssue, ComponentType};

/// One neighbor entry in the adjacency view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjacent {
    pub neighbor_id: String,
    pub neighbor_port: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_color: Option<String>,
}

/// Undirected adjacency over component ids.
///
/// Every component id appears as a key, including isolated ones; an
/// isolated component is a detectable state, not an absence. Neighbor lists
/// follow connection insertion order.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    graph: UnGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
    adjacency: HashMap<String, Vec<Adjacent>>,
    issues: Vec<CircuitIssue>,
}

impl TopologyGraph {
    pub fn build(circuit: &Circuit) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut indices = HashMap::new();
        let mut adjacency: HashMap<String, Vec<Adjacent>> = HashMap::new();
        let mut issues = Vec::new();

        let ports: HashMap<&str, u32> = circuit
            .components
            .iter()
            .map(|c| (c.id.as_str(), c.ports))
            .collect();

        for component in &circuit.components {
            if indices.contains_key(&component.id) {
                issues.push(
                    CircuitIssue::warning(
                        "duplicate-component-id",
                        format!(
                            "Component id '{}' is declared more than once; later \
                             declarations shadow earlier ones",
                            component.id
                        ),
                    )
                    .for_component(&component.id),
                );
                continue;
            }
            adjacency.insert(component.id.clone(), Vec::new());
            indices.insert(component.id.clone(), graph.add_node(component.id.clone()));
        }

        for connection in &circuit.connections {
            let mut valid = true;
            for end in [&connection.from, &connection.to] {
                match ports.get(end.component.as_str()) {
                    None => {
                        issues.push(
                            CircuitIssue::warning(
                                "dangling-connection",
                                format!(
                                    "Connection references unknown component '{}'",
                                    end.component
                                ),
                            ),
                        );
                        valid = false;
                    }
                    Some(&count) if end.port >= count => {
                        issues.push(
                            CircuitIssue::warning(
                                "invalid-port",
                                format!(
                                    "Connection uses port {} on '{}', which has only {} port(s)",
                                    end.port, end.component, count
                                ),
                            )
                            .for_component(&end.component),
                        );
                        valid = false;
                    }
                    Some(_) => {}
                }
            }
            if !valid {
                continue;
            }

            adjacency
                .get_mut(&connection.from.component)
                .expect("validated above")
                .push(Adjacent {
                    neighbor_id: connection.to.component.clone(),
                    neighbor_port: connection.to.port,
                    wire_color: connection.wire_color.clone(),
                });
            adjacency
                .get_mut(&connection.to.component)
                .expect("validated above")
                .push(Adjacent {
                    neighbor_id: connection.from.component.clone(),
                    neighbor_port: connection.from.port,
                    wire_color: connection.wire_color.clone(),
                });

            let a = indices[&connection.from.component];
            let b = indices[&connection.to.component];
            graph.add_edge(a, b, ());
        }

        debug!(
            components = indices.len(),
            edges = graph.edge_count(),
            skipped = issues.len(),
            "built topology graph"
        );

        Self {
            graph,
            indices,
            adjacency,
            issues,
        }
    }

    pub fn neighbors(&self, id: &str) -> &[Adjacent] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Structural issues collected while building (dangling references,
    /// invalid port indices, duplicate component ids).
    pub fn issues(&self) -> &[CircuitIssue] {
        &self.issues
    }

    pub fn component_count(&self) -> usize {
        self.indices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ids of components with no surviving connections, in circuit order.
    pub fn isolated<'a>(&self, circuit: &'a Circuit) -> Vec<&'a str> {
        circuit
            .components
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| self.neighbors(id).is_empty())
            .collect()
    }

    /// Groups of directly-chained passives of the same type (two or more),
    /// reported for informational purposes only.
    pub fn series_groups(&self, circuit: &Circuit) -> Vec<SeriesGroup> {
        let kinds: HashMap<&str, ComponentType> = circuit
            .components
            .iter()
            .map(|c| (c.id.as_str(), c.kind))
            .collect();

        let mut visited: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();

        for component in &circuit.components {
            if !component.kind.is_chainable_passive() || visited.contains(component.id.as_str()) {
                continue;
            }

            // BFS over same-type passive neighbors only.
            let mut members = Vec::new();
            let mut queue = VecDeque::from([component.id.as_str()]);
            visited.insert(component.id.as_str());
            while let Some(id) = queue.pop_front() {
                members.push(id.to_string());
                for adjacent in self.neighbors(id) {
                    let Some((&neighbor, &kind)) =
                        kinds.get_key_value(adjacent.neighbor_id.as_str())
                    else {
                        continue;
                    };
                    if kind == component.kind && visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }

            if members.len() >= 2 {
                groups.push(SeriesGroup {
                    kind: component.kind,
                    members,
                });
            }
        }

        groups
    }
}

/// A chain of directly-connected same-type passives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGroup {
    pub kind: ComponentType,
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, ComponentType};

    fn chain_circuit() -> Circuit {
        let mut circuit = Circuit::new("chain");
        circuit.add_component(Component::new("bat-1", ComponentType::Battery).with_value(9.0, "V"));
        circuit.add_component(Component::new("r-1", ComponentType::Resistor).with_value(330.0, "Ω"));
        circuit.add_component(Component::new("r-2", ComponentType::Resistor).with_value(220.0, "Ω"));
        circuit.add_component(Component::new("gnd-1", ComponentType::Ground));
        circuit.add_component(Component::new("float-1", ComponentType::Sensor));
        circuit.connect("bat-1", 0, "r-1", 0);
        circuit.connect("r-1", 1, "r-2", 0);
        circuit.connect("r-2", 1, "gnd-1", 0);
        circuit
    }

    #[test]
    fn test_every_component_has_an_adjacency_key() {
        let circuit = chain_circuit();
        let graph = TopologyGraph::build(&circuit);
        assert_eq!(graph.component_count(), 5);
        assert!(graph.neighbors("float-1").is_empty());
    }

    #[test]
    fn test_adjacency_is_undirected() {
        let circuit = chain_circuit();
        let graph = TopologyGraph::build(&circuit);
        assert_eq!(graph.neighbors("bat-1")[0].neighbor_id, "r-1");
        assert!(graph
            .neighbors("r-1")
            .iter()
            .any(|a| a.neighbor_id == "bat-1"));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_dangling_reference_is_skipped_with_warning() {
        let mut circuit = chain_circuit();
        circuit.connect("r-1", 0, "ghost", 0);
        let graph = TopologyGraph::build(&circuit);
        assert_eq!(graph.issues().len(), 1);
        assert_eq!(graph.issues()[0].id, "dangling-connection");
        // The bad edge must not appear in adjacency.
        assert!(!graph
            .neighbors("r-1")
            .iter()
            .any(|a| a.neighbor_id == "ghost"));
    }

    #[test]
    fn test_duplicate_component_id_is_reported() {
        let mut circuit = chain_circuit();
        circuit.add_component(Component::new("r-1", ComponentType::Capacitor));
        let graph = TopologyGraph::build(&circuit);
        let duplicates: Vec<_> = graph
            .issues()
            .iter()
            .filter(|i| i.id == "duplicate-component-id")
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].component.as_deref(), Some("r-1"));
        // The first declaration keeps its node and wiring.
        assert_eq!(graph.component_count(), 5);
        assert!(!graph.neighbors("r-1").is_empty());
    }

    #[test]
    fn test_out_of_range_port_is_skipped_with_warning() {
        let mut circuit = chain_circuit();
        circuit.connect("bat-1", 7, "gnd-1", 0);
        let graph = TopologyGraph::build(&circuit);
        assert!(graph.issues().iter().any(|i| i.id == "invalid-port"));
    }

    #[test]
    fn test_isolated_components() {
        let circuit = chain_circuit();
        let graph = TopologyGraph::build(&circuit);
        assert_eq!(graph.isolated(&circuit), vec!["float-1"]);
    }

    #[test]
    fn test_series_group_detection() {
        let circuit = chain_circuit();
        let graph = TopologyGraph::build(&circuit);
        let groups = graph.series_groups(&circuit);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, ComponentType::Resistor);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_mixed_passives_do_not_group() {
        let mut circuit = Circuit::new("mixed");
        circuit.add_component(Component::new("r-1", ComponentType::Resistor));
        circuit.add_component(Component::new("c-1", ComponentType::Capacitor));
        circuit.connect("r-1", 0, "c-1", 0);
        let graph = TopologyGraph::build(&circuit);
        assert!(graph.series_groups(&circuit).is_empty());
    }
}
