//! A graph topology with quantum objects attached to its vertices and edges.
use std::collections::HashMap;

use crate::core::error::{QResult, QuantumError};
use crate::core::qgraph::composite::{CompositeId, CompositeQuantumManager};
use crate::core::qgraph::topology::{GraphTopology, GraphTopologyMut};
use crate::core::quantum::types::QuantumObject;

pub struct QuantumGraph<G: GraphTopology> {
    topology: G,
    vertex_objects: HashMap<String, QuantumObject>,
    edge_objects: HashMap<String, QuantumObject>,
    composites: CompositeQuantumManager,
}

impl<G: GraphTopology> QuantumGraph<G> {
    pub fn new(topology: G) -> Self {
        Self {
            topology,
            vertex_objects: HashMap::new(),
            edge_objects: HashMap::new(),
            composites: CompositeQuantumManager::new(),
        }
    }

    pub fn topology(&self) -> &G {
        &self.topology
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.topology.has_node(id)
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.topology.has_edge(id)
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.topology.has_node(id) || self.topology.has_edge(id)
    }

    pub fn set_vertex_quantum_object(
        &mut self,
        id: &str,
        object: impl Into<QuantumObject>,
    ) -> QResult<()> {
        if !self.topology.has_node(id) {
            return Err(QuantumError::unknown_element(id));
        }
        self.vertex_objects.insert(id.to_string(), object.into());
        Ok(())
    }

    pub fn set_edge_quantum_object(
        &mut self,
        id: &str,
        object: impl Into<QuantumObject>,
    ) -> QResult<()> {
        if !self.topology.has_edge(id) {
            return Err(QuantumError::unknown_element(id));
        }
        self.edge_objects.insert(id.to_string(), object.into());
        Ok(())
    }

    /// Composite object when the vertex is a composite member, else its own label.
    pub fn get_vertex_quantum_object(&self, id: &str) -> Option<&QuantumObject> {
        self.composites.object_for_element(id).or_else(|| self.vertex_objects.get(id))
    }

    pub fn get_edge_quantum_object(&self, id: &str) -> Option<&QuantumObject> {
        self.composites.object_for_element(id).or_else(|| self.edge_objects.get(id))
    }

    pub fn has_vertex_quantum_object(&self, id: &str) -> bool {
        self.vertex_objects.contains_key(id)
    }

    pub fn has_edge_quantum_object(&self, id: &str) -> bool {
        self.edge_objects.contains_key(id)
    }

    pub fn clear_vertex_quantum_object(&mut self, id: &str) -> Option<QuantumObject> {
        self.vertex_objects.remove(id)
    }

    pub fn clear_edge_quantum_object(&mut self, id: &str) -> Option<QuantumObject> {
        self.edge_objects.remove(id)
    }

    /// The element's own label, ignoring composites. Vertices shadow edges.
    pub fn individual_object(&self, id: &str) -> Option<&QuantumObject> {
        self.vertex_objects.get(id).or_else(|| self.edge_objects.get(id))
    }

    /// Composite-aware read for a vertex or edge id.
    pub fn quantum_object(&self, id: &str) -> Option<&QuantumObject> {
        self.composites.object_for_element(id).or_else(|| self.individual_object(id))
    }

    /// Drop the element's own label on both the vertex and edge side.
    pub fn clear_individual_object(&mut self, id: &str) -> Option<QuantumObject> {
        let vertex = self.vertex_objects.remove(id);
        let edge = self.edge_objects.remove(id);
        vertex.or(edge)
    }

    /// Label a vertex or edge, whichever `id` names.
    pub fn set_individual_object(&mut self, id: &str, object: QuantumObject) -> QResult<()> {
        if self.topology.has_node(id) {
            self.set_vertex_quantum_object(id, object)
        } else {
            self.set_edge_quantum_object(id, object)
        }
    }

    pub fn set_composite_quantum_object(
        &mut self,
        ids: &[&str],
        object: impl Into<QuantumObject>,
    ) -> QResult<CompositeId> {
        if let Some(missing) = ids.iter().find(|id| !self.contains_element(id)) {
            return Err(QuantumError::unknown_element(missing));
        }
        self.composites.set_composite(ids, object.into())
    }

    pub fn get_composite_quantum_object(&self, ids: &[&str]) -> Option<&QuantumObject> {
        self.composites.get_composite(ids).map(|e| &e.object)
    }

    pub fn release_composite(&mut self, ids: &[&str]) -> Option<QuantumObject> {
        let id = CompositeId::new(ids).ok()?;
        self.composites.release(&id).map(|e| e.object)
    }

    pub fn composites(&self) -> &CompositeQuantumManager {
        &self.composites
    }
}

impl<G: GraphTopologyMut> QuantumGraph<G> {
    pub fn add_node(&mut self, id: &str) -> QResult<()> {
        self.topology.add_node(id)
    }

    pub fn add_edge(&mut self, id: &str, source_id: &str, target_id: &str) -> QResult<()> {
        self.topology.add_edge(id, source_id, target_id)
    }

    /// Removes the node (and incident edges) together with their individual
    /// labels; composite bindings are left alone.
    pub fn remove_node(&mut self, id: &str) -> QResult<()> {
        let dropped = self.topology.remove_node(id)?;
        self.vertex_objects.remove(id);
        for edge in dropped {
            self.edge_objects.remove(&edge.id);
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> QResult<()> {
        self.topology.remove_edge(id)?;
        self.edge_objects.remove(id);
        Ok(())
    }
}
