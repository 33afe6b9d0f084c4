//! Summaries and walks over a labeled quantum graph.
use std::fmt;
use std::fmt::Write as _;

use crate::core::qgraph::graph::QuantumGraph;
use crate::core::qgraph::topology::GraphTopology;
use crate::core::quantum::types::{QuantumObject, StateVector};
use crate::debug_log;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub states: usize,
    pub operators: usize,
}

impl LabelCounts {
    fn record(&mut self, object: &QuantumObject) {
        match object {
            QuantumObject::State(_) => self.states += 1,
            QuantumObject::Operator(_) => self.operators += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuantumGraphAnalysis {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub labeled_nodes: usize,
    pub labeled_edges: usize,
    pub node_types: LabelCounts,
    pub edge_types: LabelCounts,
    pub composites: usize,
}

/// Counts labels as reads see them, so composite members count as labeled.
pub fn analyze_quantum_graph<G: GraphTopology>(graph: &QuantumGraph<G>) -> QuantumGraphAnalysis {
    let topo = graph.topology();
    let mut analysis = QuantumGraphAnalysis {
        total_nodes: topo.node_count(),
        total_edges: topo.edge_count(),
        composites: graph.composites().len(),
        ..Default::default()
    };
    for id in topo.node_ids() {
        if let Some(obj) = graph.get_vertex_quantum_object(&id) {
            analysis.labeled_nodes += 1;
            analysis.node_types.record(obj);
        }
    }
    for id in topo.edge_ids() {
        if let Some(obj) = graph.get_edge_quantum_object(&id) {
            analysis.labeled_edges += 1;
            analysis.edge_types.record(obj);
        }
    }
    analysis
}

impl fmt::Display for QuantumGraphAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph size: {} vertices, {} edges", self.total_nodes, self.total_edges)?;
        writeln!(
            f,
            "Labeled: {}/{} vertices, {}/{} edges",
            self.labeled_nodes, self.total_nodes, self.labeled_edges, self.total_edges
        )?;
        writeln!(
            f,
            "Vertex objects: {} states, {} operators",
            self.node_types.states, self.node_types.operators
        )?;
        writeln!(
            f,
            "Edge objects: {} states, {} operators",
            self.edge_types.states, self.edge_types.operators
        )?;
        write!(f, "Composites: {}", self.composites)
    }
}

/// One line per vertex and edge describing its label.
pub fn describe_quantum_graph<G: GraphTopology>(graph: &QuantumGraph<G>) -> String {
    let topo = graph.topology();
    let mut out = String::new();
    if let Some(meta) = topo.metadata() {
        let _ = writeln!(out, "type: {meta}");
    }
    let label = |obj: Option<&QuantumObject>| match obj {
        Some(QuantumObject::State(s)) => format!("state, norm = {:.3}", s.norm()),
        Some(QuantumObject::Operator(o)) => {
            format!("{} operator, norm = {:.3}", o.kind(), o.norm())
        }
        None => "unlabeled".to_string(),
    };
    for id in topo.node_ids() {
        let _ = writeln!(out, "{id}: {}", label(graph.get_vertex_quantum_object(&id)));
    }
    for id in topo.edge_ids() {
        if let Some(edge) = topo.edge(&id) {
            let _ = writeln!(
                out,
                "{id}: {} -> {} [{}]",
                edge.source_id,
                edge.target_id,
                label(graph.get_edge_quantum_object(&id))
            );
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct TraversalOptions {
    pub start_vertex: String,
    pub apply_operators: bool,
    pub max_depth: usize,
}

impl TraversalOptions {
    pub fn from_vertex(start: &str) -> Self {
        Self { start_vertex: start.to_string(), apply_operators: true, max_depth: 10 }
    }
}

#[derive(Clone, Debug)]
pub struct TraversalStep {
    pub edge: String,
    pub operator_applied: bool,
    pub result: Option<StateVector>,
}

#[derive(Clone, Debug, Default)]
pub struct TraversalResult {
    pub path: Vec<String>,
    pub steps: Vec<TraversalStep>,
    pub final_state: Option<QuantumObject>,
}

/// Walk the first outgoing edge from each vertex, applying edge operators to
/// the running state. Steps whose operator does not fit the state leave it as is.
pub fn traverse_with_quantum_ops<G: GraphTopology>(
    graph: &QuantumGraph<G>,
    options: &TraversalOptions,
) -> TraversalResult {
    let topo = graph.topology();
    let mut result = TraversalResult {
        path: vec![options.start_vertex.clone()],
        ..Default::default()
    };
    let Some(mut current) = graph.get_vertex_quantum_object(&options.start_vertex).cloned() else {
        return result;
    };

    let mut vertex = options.start_vertex.clone();
    for _ in 0..options.max_depth {
        let outgoing = topo.connected_edges(&vertex).into_iter().find(|e| e.source_id == vertex);
        let Some(edge) = outgoing else {
            break;
        };
        let mut step = TraversalStep {
            edge: edge.id.clone(),
            operator_applied: false,
            result: None,
        };
        if options.apply_operators {
            let applied = match (graph.get_edge_quantum_object(&edge.id), &current) {
                (Some(QuantumObject::Operator(op)), QuantumObject::State(state)) => {
                    match op.apply(state) {
                        Ok(next) => Some(next),
                        Err(e) => {
                            debug_log!("traversal skipped {}: {}", edge.id, e);
                            None
                        }
                    }
                }
                _ => None,
            };
            if let Some(next) = applied {
                step.operator_applied = true;
                step.result = Some(next.clone());
                current = QuantumObject::State(next);
            }
        }
        result.steps.push(step);
        result.path.push(edge.target_id.clone());
        vertex = edge.target_id;
    }
    result.final_state = Some(current);
    result
}
