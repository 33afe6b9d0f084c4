//! Subsystem operations over labeled graph elements.
use std::collections::HashSet;

use rand::Rng;

use crate::core::error::{QResult, QuantumError};
use crate::core::qgraph::graph::QuantumGraph;
use crate::core::qgraph::topology::GraphTopology;
use crate::core::quantum::types::{Operator, QuantumObject, StateVector, ZERO_TOLERANCE};
use crate::debug_log;

#[derive(Clone, Debug)]
pub struct MeasurementResult {
    pub outcome: u8,
    pub probability: f64,
    pub post_measurement_state: StateVector,
    pub measured_subsystem: Vec<String>,
}

/// Reduced state of one tensor factor: its density matrix and spectrum.
#[derive(Clone, Debug)]
pub struct SubsystemState {
    pub density: Operator,
    /// Eigen-weights in descending order.
    pub weights: Vec<f64>,
    /// Pure components matching `weights`.
    pub components: Vec<StateVector>,
}

impl SubsystemState {
    pub fn is_pure(&self, tolerance: f64) -> bool {
        self.weights.first().is_some_and(|w| (w - 1.0).abs() < tolerance)
    }

    pub fn dominant(&self) -> Option<&StateVector> {
        self.components.first()
    }

    /// tr(ρ²)
    pub fn purity(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum()
    }

    pub fn von_neumann_entropy(&self) -> f64 {
        self.weights.iter().filter(|&&w| w > 1e-12).map(|&w| -w * w.ln()).sum()
    }
}

pub fn validate_subsystem<G: GraphTopology>(graph: &QuantumGraph<G>, ids: &[&str]) -> bool {
    !ids.is_empty() && ids.iter().all(|id| graph.contains_element(id))
}

fn ensure_subsystem<G: GraphTopology>(graph: &QuantumGraph<G>, ids: &[&str]) -> QResult<()> {
    if ids.is_empty() {
        return Err(QuantumError::invalid_operation("empty subsystem"));
    }
    match ids.iter().find(|id| !graph.contains_element(id)) {
        Some(missing) => Err(QuantumError::unknown_element(missing)),
        None => Ok(()),
    }
}

fn require_state(object: &QuantumObject, what: &str) -> QResult<StateVector> {
    object
        .as_state()
        .cloned()
        .ok_or_else(|| QuantumError::no_state(&format!("{what} holds an operator")))
}

/// Dimension of the joint subsystem; 0 when nothing is labeled.
///
/// Composite members contribute their composite's dimension once, however
/// many of its members are listed.
pub fn subsystem_dimension<G: GraphTopology>(
    graph: &QuantumGraph<G>,
    ids: &[&str],
) -> QResult<usize> {
    ensure_subsystem(graph, ids)?;
    if let Some(object) = graph.get_composite_quantum_object(ids) {
        return Ok(object.dimension());
    }
    let mut seen = HashSet::new();
    let mut dims = Vec::with_capacity(ids.len());
    for id in ids {
        match graph.composites().composite_for_element(id) {
            Some(composite) => {
                if seen.insert(composite) {
                    dims.extend(graph.quantum_object(id).map(QuantumObject::dimension));
                }
            }
            None => dims.extend(graph.individual_object(id).map(QuantumObject::dimension)),
        }
    }
    Ok(if dims.is_empty() { 0 } else { dims.iter().product() })
}

/// Joint state of `ids`, in the given order.
///
/// An exact composite is returned as stored (its recorded member order must
/// match `ids`); otherwise the individual states are tensored together.
pub fn extract_subsystem_state<G: GraphTopology>(
    graph: &QuantumGraph<G>,
    ids: &[&str],
) -> QResult<StateVector> {
    ensure_subsystem(graph, ids)?;
    if let Some(entry) = graph.composites().get_composite(ids) {
        if entry.order.iter().map(String::as_str).ne(ids.iter().copied()) {
            return Err(QuantumError::invalid_operation(&format!(
                "composite is laid out as [{}]",
                entry.order.join(", ")
            )));
        }
        return require_state(&entry.object, "composite");
    }
    let mut states = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(existing) = graph.composites().composite_for_element(id) {
            return Err(QuantumError::CompositeOverlap {
                element: id.to_string(),
                existing: existing.to_string(),
            });
        }
        let object = graph
            .individual_object(id)
            .ok_or_else(|| QuantumError::no_state(&format!("element {id} is unlabeled")))?;
        states.push(require_state(object, id)?);
    }
    tensor_product_states(&states)
}

/// Write a joint state back: single elements get an individual label, several
/// elements (or an existing exact composite) get a composite binding that
/// replaces the members' individual labels.
pub fn insert_subsystem_state<G: GraphTopology>(
    graph: &mut QuantumGraph<G>,
    ids: &[&str],
    state: StateVector,
) -> QResult<()> {
    ensure_subsystem(graph, ids)?;
    if ids.len() == 1 && graph.get_composite_quantum_object(ids).is_none() {
        return graph.set_individual_object(ids[0], state.into());
    }
    graph.set_composite_quantum_object(ids, state)?;
    for id in ids {
        graph.clear_individual_object(id);
    }
    Ok(())
}

pub fn apply_quantum_operation<G: GraphTopology>(
    graph: &mut QuantumGraph<G>,
    ids: &[&str],
    op: &Operator,
) -> QResult<StateVector> {
    let joint = extract_subsystem_state(graph, ids)?;
    let result = op.apply(&joint)?;
    insert_subsystem_state(graph, ids, result.clone())?;
    Ok(result)
}

/// Single binary measurement draw on a subsystem.
///
/// Uses the exact composite for `ids` if any, else the first element whose
/// state resolves (its composite before its own label). The outcome is a fair
/// coin from `rng`; `probability` is ‖ψ‖².
pub fn partial_measurement<G: GraphTopology>(
    graph: &QuantumGraph<G>,
    ids: &[&str],
    projector: Option<&Operator>,
    rng: &mut impl Rng,
) -> QResult<MeasurementResult> {
    ensure_subsystem(graph, ids)?;
    let state = match graph.get_composite_quantum_object(ids).and_then(QuantumObject::as_state) {
        Some(s) => s.clone(),
        None => ids
            .iter()
            .find_map(|id| graph.quantum_object(id).and_then(QuantumObject::as_state))
            .cloned()
            .ok_or_else(|| QuantumError::no_state("no quantum state found for measurement"))?,
    };

    let probability = state.norm().powi(2);
    let outcome = u8::from(rng.gen_bool(0.5));
    let post_measurement_state = match projector {
        Some(p) => p.apply(&state)?,
        None => state,
    };
    debug_log!("measured [{}] -> {} (p={:.4})", ids.join(", "), outcome, probability);
    Ok(MeasurementResult {
        outcome,
        probability,
        post_measurement_state,
        measured_subsystem: ids.iter().map(|s| s.to_string()).collect(),
    })
}

/// Left fold of tensor products in input order.
pub fn tensor_product_states(states: &[StateVector]) -> QResult<StateVector> {
    let (first, rest) = states
        .split_first()
        .ok_or_else(|| QuantumError::invalid_operation("cannot tensor an empty state list"))?;
    Ok(rest.iter().fold(first.clone(), |acc, s| acc.tensor_product(s)))
}

/// Reduced state of every factor of a joint pure state.
pub fn split_composite_state(
    state: &StateVector,
    dims: &[usize],
) -> QResult<Vec<SubsystemState>> {
    let total: usize = dims.iter().product();
    if dims.is_empty() || dims.contains(&0) || total != state.dimension() {
        return Err(QuantumError::dimension_mismatch(
            state.dimension(),
            total,
            "split_composite_state",
        ));
    }
    let rho = state.normalize()?.density_matrix();

    let mut out = Vec::with_capacity(dims.len());
    for k in 0..dims.len() {
        let others: Vec<usize> = (0..dims.len()).filter(|&i| i != k).collect();
        let density = rho.partial_trace(dims, &others)?;
        let eig = density.eigen_decompose()?;
        let mut weights = Vec::new();
        let mut components = Vec::new();
        for (value, vector) in eig.values.iter().zip(eig.vectors).rev() {
            if value.re > ZERO_TOLERANCE {
                weights.push(value.re);
                components.push(vector);
            }
        }
        debug_log!("subsystem {} of {:?}: weights {:?}", k, dims, weights);
        out.push(SubsystemState { density, weights, components });
    }
    Ok(out)
}
