//! Quantum objects attached to graph vertices and edges, including objects
//! shared by several elements.

pub mod analysis;
pub mod composite;
pub mod graph;
pub mod operations;
pub mod spin_network;
pub mod topology;

pub use composite::{CompositeId, CompositeQuantumManager};
pub use graph::QuantumGraph;
pub use topology::{EdgeRef, GraphTopology, GraphTopologyMut, SimpleGraph};
