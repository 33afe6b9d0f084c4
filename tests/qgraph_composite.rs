use spin_network::core::qgraph::{
    CompositeId, CompositeQuantumManager, GraphTopology, QuantumGraph, SimpleGraph,
};
use spin_network::core::quantum::{gates, StateVector};
use spin_network::{QuantumError, QuantumObject};

fn triangle_graph() -> QuantumGraph<SimpleGraph> {
    let mut g = QuantumGraph::new(SimpleGraph::new());
    for n in ["a", "b", "c"] {
        g.add_node(n).unwrap();
    }
    g.add_edge("ab", "a", "b").unwrap();
    g.add_edge("bc", "b", "c").unwrap();
    g
}

fn qubit(index: usize) -> StateVector {
    StateVector::computational_basis(2, index).unwrap()
}

#[test]
fn composite_id_is_order_independent() {
    let x = CompositeId::new(&["b", "a"]).unwrap();
    let y = CompositeId::new(&["a", "b"]).unwrap();
    assert_eq!(x, y);
    assert_eq!(x.to_string(), "a_b");
    assert!(CompositeId::new(&[]).is_err());
    assert!(CompositeId::new(&["a", "a"]).is_err());
}

#[test]
fn manager_tracks_membership() {
    let mut m = CompositeQuantumManager::new();
    let id = m.set_composite(&["x", "y"], qubit(0).tensor_product(&qubit(1)).into()).unwrap();
    assert!(m.is_member("x"));
    assert_eq!(m.composite_for_element("y"), Some(&id));
    assert_eq!(
        m.get_composite(&["y", "x"]).map(|e| e.order.clone()),
        Some(vec!["x".to_string(), "y".to_string()])
    );
    assert!(m.get_composite(&["x"]).is_none());
    assert_eq!(m.len(), 1);

    let released = m.release(&id).unwrap();
    assert_eq!(released.object.dimension(), 4);
    assert!(!m.is_member("x"));
    assert!(m.is_empty());
}

#[test]
fn overlapping_composites_are_rejected() {
    let mut m = CompositeQuantumManager::new();
    m.set_composite(&["x", "y"], qubit(0).tensor_product(&qubit(0)).into()).unwrap();
    let err = m.set_composite(&["y", "z"], qubit(0).tensor_product(&qubit(0)).into()).unwrap_err();
    assert_eq!(err, QuantumError::CompositeOverlap { element: "y".into(), existing: "x_y".into() });
    // re-binding the same set replaces the object
    m.set_composite(&["y", "x"], qubit(1).tensor_product(&qubit(1)).into()).unwrap();
    assert_eq!(m.len(), 1);
    let entry = m.get_composite(&["x", "y"]).unwrap();
    assert_eq!(entry.order, vec!["y".to_string(), "x".to_string()]);
}

#[test]
fn individual_labels_on_vertices_and_edges() {
    let mut g = triangle_graph();
    g.set_vertex_quantum_object("a", qubit(0)).unwrap();
    g.set_edge_quantum_object("ab", gates::pauli_x()).unwrap();
    assert!(g.has_vertex_quantum_object("a"));
    assert!(!g.has_vertex_quantum_object("b"));
    assert!(g.get_edge_quantum_object("ab").and_then(QuantumObject::as_operator).is_some());
    assert!(matches!(
        g.set_vertex_quantum_object("zz", qubit(0)),
        Err(QuantumError::UnknownElement(_))
    ));
    assert!(matches!(
        g.set_edge_quantum_object("a", gates::pauli_x()),
        Err(QuantumError::UnknownElement(_))
    ));
    assert_eq!(g.clear_vertex_quantum_object("a"), Some(QuantumObject::State(qubit(0))));
    assert!(g.get_vertex_quantum_object("a").is_none());
}

#[test]
fn composite_takes_precedence_over_individual_label() {
    let mut g = triangle_graph();
    g.set_vertex_quantum_object("a", qubit(1)).unwrap();
    let joint = qubit(0).tensor_product(&qubit(0));
    g.set_composite_quantum_object(&["a", "b"], joint.clone()).unwrap();
    assert_eq!(g.get_vertex_quantum_object("a"), Some(&QuantumObject::State(joint.clone())));
    assert_eq!(g.individual_object("a"), Some(&QuantumObject::State(qubit(1))));

    let released = g.release_composite(&["b", "a"]).unwrap();
    assert_eq!(released, QuantumObject::State(joint));
    assert_eq!(g.get_vertex_quantum_object("a"), Some(&QuantumObject::State(qubit(1))));
    assert!(g.release_composite(&["a", "b"]).is_none());
}

#[test]
fn composites_may_mix_vertices_and_edges() {
    let mut g = triangle_graph();
    let joint = qubit(0).tensor_product(&qubit(1));
    g.set_composite_quantum_object(&["a", "ab"], joint).unwrap();
    assert!(g.get_edge_quantum_object("ab").is_some());
    assert!(matches!(
        g.set_composite_quantum_object(&["a", "nope"], qubit(0)),
        Err(QuantumError::UnknownElement(id)) if id == "nope"
    ));
}

#[test]
fn removing_node_clears_its_labels() {
    let mut g = triangle_graph();
    g.set_vertex_quantum_object("b", qubit(0)).unwrap();
    g.set_edge_quantum_object("ab", gates::pauli_x()).unwrap();
    g.set_edge_quantum_object("bc", gates::pauli_z()).unwrap();
    g.remove_node("b").unwrap();
    assert_eq!(g.topology().edge_count(), 0);
    assert!(g.individual_object("b").is_none());
    assert!(g.individual_object("ab").is_none());
    assert!(!g.has_edge_quantum_object("bc"));
    assert!(g.remove_node("b").is_err());
}

#[test]
fn removing_member_node_keeps_composite_binding() {
    let mut g = triangle_graph();
    let joint = qubit(0).tensor_product(&qubit(1));
    g.set_vertex_quantum_object("a", qubit(1)).unwrap();
    g.set_vertex_quantum_object("b", qubit(0)).unwrap();
    g.set_composite_quantum_object(&["a", "b"], joint.clone()).unwrap();
    assert_eq!(g.get_vertex_quantum_object("a"), Some(&QuantumObject::State(joint.clone())));
    assert_eq!(g.get_vertex_quantum_object("b"), Some(&QuantumObject::State(joint.clone())));

    g.remove_node("a").unwrap();
    assert!(g.individual_object("a").is_none());
    assert_eq!(g.individual_object("b"), Some(&QuantumObject::State(qubit(0))));
    assert_eq!(
        g.get_composite_quantum_object(&["a", "b"]),
        Some(&QuantumObject::State(joint.clone()))
    );
    assert_eq!(g.get_vertex_quantum_object("b"), Some(&QuantumObject::State(joint)));
    assert!(g.composites().is_member("a"));
}

#[test]
fn removing_edge_clears_its_label() {
    let mut g = triangle_graph();
    g.set_edge_quantum_object("ab", gates::pauli_x()).unwrap();
    g.remove_edge("ab").unwrap();
    assert!(!g.has_edge("ab"));
    assert!(g.get_edge_quantum_object("ab").is_none());
    assert!(matches!(g.remove_edge("ab"), Err(QuantumError::UnknownElement(_))));
}

#[test]
fn duplicate_elements_are_rejected() {
    let mut g = triangle_graph();
    assert!(g.add_node("a").is_err());
    assert!(g.add_edge("ab", "a", "c").is_err());
    assert!(g.add_edge("ax", "a", "x").is_err());
}
