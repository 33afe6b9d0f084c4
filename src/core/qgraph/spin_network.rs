//! Spin networks: graphs whose edges carry spins and whose vertices carry
//! the intertwiner spaces allowed by the incident spins.
use std::collections::BTreeMap;

use crate::core::angular::numbers::{half, validate_j};
use crate::core::angular::operators::create_j2;
use crate::core::error::{QResult, QuantumError};
use crate::core::qgraph::graph::QuantumGraph;
use crate::core::qgraph::topology::{GraphTopology, SimpleGraph};

/// Multiplicity of every total spin (keyed by 2J) in ⊗ᵢ Vⱼᵢ.
fn coupling_multiplicities(spins: &[f64]) -> QResult<BTreeMap<i32, usize>> {
    let mut acc = BTreeMap::from([(0, 1usize)]);
    for &s in spins {
        let two_s = validate_j(s)?;
        let mut next = BTreeMap::new();
        for (&two_j, &mult) in &acc {
            for two_k in ((two_j - two_s).abs()..=two_j + two_s).step_by(2) {
                *next.entry(two_k).or_insert(0) += mult;
            }
        }
        acc = next;
    }
    Ok(acc)
}

/// Total spins reachable by coupling `spins`, ascending.
pub fn allowed_total_spins(spins: &[f64]) -> QResult<Vec<f64>> {
    Ok(coupling_multiplicities(spins)?.keys().map(|&t| half(t)).collect())
}

/// Dimension of the invariant (total spin 0) subspace.
pub fn intertwiner_dimension(spins: &[f64]) -> QResult<usize> {
    Ok(coupling_multiplicities(spins)?.get(&0).copied().unwrap_or(0))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinNetworkOptions {
    pub default_spin: f64,
    pub compute_intertwiners: bool,
}

impl Default for SpinNetworkOptions {
    fn default() -> Self {
        Self { default_spin: 0.5, compute_intertwiners: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexSpace {
    pub allowed_spins: Vec<f64>,
    pub intertwiner_dimension: usize,
}

pub struct SpinNetwork {
    pub graph: QuantumGraph<SimpleGraph>,
    edge_spins: BTreeMap<String, f64>,
    vertex_spaces: BTreeMap<String, VertexSpace>,
}

impl SpinNetwork {
    pub fn edge_spin(&self, edge_id: &str) -> Option<f64> {
        self.edge_spins.get(edge_id).copied()
    }

    pub fn vertex_space(&self, vertex_id: &str) -> Option<&VertexSpace> {
        self.vertex_spaces.get(vertex_id)
    }

    /// Spins of every edge touching the vertex.
    pub fn incident_spins(&self, vertex_id: &str) -> Vec<f64> {
        self.graph
            .topology()
            .connected_edges(vertex_id)
            .iter()
            .filter_map(|e| self.edge_spins.get(&e.id).copied())
            .collect()
    }
}

pub struct SpinNetworkBuilder {
    options: SpinNetworkOptions,
    network: SpinNetwork,
}

impl SpinNetworkBuilder {
    pub fn new(options: SpinNetworkOptions) -> Self {
        Self {
            options,
            network: SpinNetwork {
                graph: QuantumGraph::new(SimpleGraph::new().with_metadata("spin_network")),
                edge_spins: BTreeMap::new(),
                vertex_spaces: BTreeMap::new(),
            },
        }
    }

    pub fn add_vertex(&mut self, id: &str) -> QResult<&mut Self> {
        self.network.graph.add_node(id)?;
        self.network.vertex_spaces.insert(id.to_string(), VertexSpace::default());
        Ok(self)
    }

    /// Edge `"{source}-{target}"` carrying `spin` (default spin when `None`),
    /// labeled with the J² Casimir of that spin.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        spin: Option<f64>,
    ) -> QResult<&mut Self> {
        let spin = spin.unwrap_or(self.options.default_spin);
        if !spin.is_finite() || spin < 0.0 {
            return Err(QuantumError::invalid_j("spin value must be a non-negative number"));
        }
        let casimir = create_j2(spin)?;
        let id = format!("{source}-{target}");
        self.network.graph.add_edge(&id, source, target)?;
        self.network.graph.set_edge_quantum_object(&id, casimir)?;
        self.network.edge_spins.insert(id, spin);
        if self.options.compute_intertwiners {
            self.update_vertex(source)?;
            self.update_vertex(target)?;
        }
        Ok(self)
    }

    fn update_vertex(&mut self, id: &str) -> QResult<()> {
        let spins = self.network.incident_spins(id);
        let space = VertexSpace {
            allowed_spins: allowed_total_spins(&spins)?,
            intertwiner_dimension: intertwiner_dimension(&spins)?,
        };
        self.network.vertex_spaces.insert(id.to_string(), space);
        Ok(())
    }

    pub fn build(self) -> SpinNetwork {
        self.network
    }

    /// Vertices "0".."n-1" joined in a line, closed into a ring when `periodic`
    /// and n > 2.
    pub fn chain(n: usize, spin: f64, periodic: bool) -> QResult<SpinNetwork> {
        let mut b = Self::new(SpinNetworkOptions { default_spin: spin, ..Default::default() });
        for i in 0..n {
            b.add_vertex(&i.to_string())?;
            if i > 0 {
                b.add_edge(&(i - 1).to_string(), &i.to_string(), None)?;
            }
        }
        if periodic && n > 2 {
            b.add_edge(&(n - 1).to_string(), "0", None)?;
        }
        Ok(b.build())
    }

    /// rows × cols grid of vertices "i-j" with nearest-neighbour edges.
    pub fn lattice_2d(rows: usize, cols: usize, spin: f64, periodic: bool) -> QResult<SpinNetwork> {
        let mut b = Self::new(SpinNetworkOptions { default_spin: spin, ..Default::default() });
        for i in 0..rows {
            for j in 0..cols {
                let id = format!("{i}-{j}");
                b.add_vertex(&id)?;
                if j > 0 {
                    b.add_edge(&format!("{i}-{}", j - 1), &id, None)?;
                }
                if i > 0 {
                    b.add_edge(&format!("{}-{j}", i - 1), &id, None)?;
                }
                if periodic {
                    if j == cols - 1 && cols > 2 {
                        b.add_edge(&id, &format!("{i}-0"), None)?;
                    }
                    if i == rows - 1 && rows > 2 {
                        b.add_edge(&id, &format!("0-{j}"), None)?;
                    }
                }
            }
        }
        Ok(b.build())
    }
}
