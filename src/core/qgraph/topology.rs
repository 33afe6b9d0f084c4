//! Graph topology capability and a small in-memory implementation.
use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::{QResult, QuantumError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRef {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

/// Read-only view of nodes and edges that quantum labels attach to.
pub trait GraphTopology {
    fn has_node(&self, id: &str) -> bool;
    fn has_edge(&self, id: &str) -> bool;
    fn edge(&self, id: &str) -> Option<EdgeRef>;
    /// Every edge with `node_id` as source or target.
    fn connected_edges(&self, node_id: &str) -> Vec<EdgeRef>;
    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn node_ids(&self) -> Vec<String>;
    fn edge_ids(&self) -> Vec<String>;
    fn metadata(&self) -> Option<&str> {
        None
    }
}

pub trait GraphTopologyMut: GraphTopology {
    fn add_node(&mut self, id: &str) -> QResult<()>;
    fn add_edge(&mut self, id: &str, source_id: &str, target_id: &str) -> QResult<()>;
    /// Removes the node and its incident edges.
    fn remove_node(&mut self, id: &str) -> QResult<Vec<EdgeRef>>;
    fn remove_edge(&mut self, id: &str) -> QResult<EdgeRef>;
}

/// Directed multigraph with sorted iteration order.
#[derive(Clone, Debug, Default)]
pub struct SimpleGraph {
    nodes: BTreeSet<String>,
    edges: BTreeMap<String, EdgeRef>,
    metadata: Option<String>,
}

impl SimpleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: &str) -> Self {
        self.metadata = Some(metadata.to_string());
        self
    }
}

impl GraphTopology for SimpleGraph {
    fn has_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    fn has_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    fn edge(&self, id: &str) -> Option<EdgeRef> {
        self.edges.get(id).cloned()
    }

    fn connected_edges(&self, node_id: &str) -> Vec<EdgeRef> {
        self.edges
            .values()
            .filter(|e| e.source_id == node_id || e.target_id == node_id)
            .cloned()
            .collect()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    fn edge_ids(&self) -> Vec<String> {
        self.edges.keys().cloned().collect()
    }

    fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }
}

impl GraphTopologyMut for SimpleGraph {
    fn add_node(&mut self, id: &str) -> QResult<()> {
        if !self.nodes.insert(id.to_string()) {
            return Err(QuantumError::invalid_operation(&format!("node {id} already exists")));
        }
        Ok(())
    }

    fn add_edge(&mut self, id: &str, source_id: &str, target_id: &str) -> QResult<()> {
        for endpoint in [source_id, target_id] {
            if !self.nodes.contains(endpoint) {
                return Err(QuantumError::unknown_element(endpoint));
            }
        }
        if self.edges.contains_key(id) {
            return Err(QuantumError::invalid_operation(&format!("edge {id} already exists")));
        }
        let edge = EdgeRef {
            id: id.to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        };
        self.edges.insert(id.to_string(), edge);
        Ok(())
    }

    fn remove_node(&mut self, id: &str) -> QResult<Vec<EdgeRef>> {
        if !self.nodes.remove(id) {
            return Err(QuantumError::unknown_element(id));
        }
        let incident = self.connected_edges(id);
        for e in &incident {
            self.edges.remove(&e.id);
        }
        Ok(incident)
    }

    fn remove_edge(&mut self, id: &str) -> QResult<EdgeRef> {
        self.edges.remove(id).ok_or_else(|| QuantumError::unknown_element(id))
    }
}
