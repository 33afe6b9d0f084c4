//! State vectors and operators over finite-dimensional Hilbert spaces.
use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{DMatrix, DVector, Schur, SymmetricEigen, SVD};
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::ops::{c, digits, kron, kron_vec, max_abs, subset_index};

pub const EPS: f64 = 1e-12;
/// Norms below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-10;
pub const HERMITIAN_TOLERANCE: f64 = 1e-10;

/// Free-form metadata attached to a state (coupling info, labels).
pub type Properties = BTreeMap<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    amplitudes: DVector<C64>,
    pub basis: Option<String>,
    pub properties: Option<Properties>,
}

impl StateVector {
    /// Build a state of the given dimension; the amplitude count must match.
    pub fn new(dimension: usize, amplitudes: Vec<C64>) -> QResult<Self> {
        if dimension == 0 {
            return Err(QuantumError::invalid_operation("state dimension must be at least 1"));
        }
        if amplitudes.len() != dimension {
            return Err(QuantumError::dimension_mismatch(
                dimension,
                amplitudes.len(),
                "StateVector::new",
            ));
        }
        Ok(Self::from_raw(DVector::from_vec(amplitudes)))
    }

    pub fn from_amplitudes(amplitudes: Vec<C64>) -> QResult<Self> {
        Self::new(amplitudes.len(), amplitudes)
    }

    /// Convenience for real-valued amplitude lists.
    pub fn from_reals(values: &[f64]) -> QResult<Self> {
        Self::from_amplitudes(values.iter().map(|&r| c(r, 0.0)).collect())
    }

    pub(crate) fn from_raw(amplitudes: DVector<C64>) -> Self {
        Self { amplitudes, basis: None, properties: None }
    }

    pub fn zeros(dimension: usize) -> QResult<Self> {
        Self::new(dimension, vec![c(0.0, 0.0); dimension])
    }

    /// |index⟩ in a `dimension`-dimensional space.
    pub fn computational_basis(dimension: usize, index: usize) -> QResult<Self> {
        let mut s = Self::zeros(dimension)?;
        s.set_amplitude(index, c(1.0, 0.0))?;
        Ok(s)
    }

    pub fn computational_basis_states(dimension: usize) -> QResult<Vec<Self>> {
        (0..dimension.max(1)).map(|k| Self::computational_basis(dimension, k)).collect()
    }

    pub fn equal_superposition(dimension: usize) -> QResult<Self> {
        if dimension == 0 {
            return Err(QuantumError::invalid_operation("state dimension must be at least 1"));
        }
        let a = 1.0 / (dimension as f64).sqrt();
        Self::new(dimension, vec![c(a, 0.0); dimension])
    }

    /// Normalized linear combination Σ cᵢ|ψᵢ⟩.
    pub fn superposition(states: &[StateVector], coefficients: &[C64]) -> QResult<Self> {
        if states.is_empty() {
            return Err(QuantumError::invalid_operation("superposition needs at least one state"));
        }
        if states.len() != coefficients.len() {
            return Err(QuantumError::dimension_mismatch(
                states.len(),
                coefficients.len(),
                "superposition coefficients",
            ));
        }
        let dim = states[0].dimension();
        let mut acc = DVector::from_element(dim, c(0.0, 0.0));
        for (s, &k) in states.iter().zip(coefficients) {
            if s.dimension() != dim {
                return Err(QuantumError::dimension_mismatch(dim, s.dimension(), "superposition"));
            }
            acc += &s.amplitudes * k;
        }
        Self::from_raw(acc).normalize()
    }

    pub fn with_basis(mut self, basis: &str) -> Self {
        self.basis = Some(basis.to_string());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn set_property(&mut self, key: &str, value: serde_json::Value) {
        self.properties.get_or_insert_with(Properties::new).insert(key.to_string(), value);
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &DVector<C64> {
        &self.amplitudes
    }

    pub fn amplitude(&self, index: usize) -> QResult<C64> {
        self.amplitudes
            .get(index)
            .copied()
            .ok_or(QuantumError::IndexOutOfBounds { index, dimension: self.dimension() })
    }

    pub fn set_amplitude(&mut self, index: usize, value: C64) -> QResult<()> {
        let dimension = self.dimension();
        match self.amplitudes.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(QuantumError::IndexOutOfBounds { index, dimension }),
        }
    }

    /// ⟨self|other⟩, conjugate-linear in `self`.
    pub fn inner_product(&self, other: &StateVector) -> QResult<C64> {
        if self.dimension() != other.dimension() {
            return Err(QuantumError::dimension_mismatch(
                self.dimension(),
                other.dimension(),
                "inner product",
            ));
        }
        Ok(self.amplitudes.dotc(&other.amplitudes))
    }

    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    pub fn normalize(&self) -> QResult<Self> {
        let n = self.norm();
        if n < ZERO_TOLERANCE {
            return Err(QuantumError::ZeroNorm);
        }
        Ok(Self {
            amplitudes: &self.amplitudes / c(n, 0.0),
            basis: self.basis.clone(),
            properties: self.properties.clone(),
        })
    }

    /// |self⟩ ⊗ |other⟩ with `self` as the slow index.
    pub fn tensor_product(&self, other: &StateVector) -> Self {
        let basis = match (&self.basis, &other.basis) {
            (Some(a), Some(b)) => Some(format!("{a}⊗{b}")),
            _ => None,
        };
        Self {
            amplitudes: kron_vec(&self.amplitudes, &other.amplitudes),
            basis,
            properties: self.properties.clone(),
        }
    }

    pub fn scale(&self, factor: C64) -> Self {
        Self { amplitudes: &self.amplitudes * factor, ..self.clone() }
    }

    pub fn is_zero(&self, tolerance: f64) -> bool {
        self.amplitudes.iter().all(|z| z.norm() < tolerance)
    }

    pub fn approx_eq(&self, other: &StateVector, tolerance: f64) -> bool {
        self.dimension() == other.dimension()
            && self
                .amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .all(|(a, b)| (a - b).norm() < tolerance)
    }

    /// |⟨self|other⟩| ≈ ‖self‖‖other‖, i.e. equal up to a global phase.
    pub fn equals_up_to_phase(&self, other: &StateVector, tolerance: f64) -> bool {
        match self.inner_product(other) {
            Ok(ip) => (ip.norm() - self.norm() * other.norm()).abs() < tolerance,
            Err(_) => false,
        }
    }

    /// ⟨ψ|A|ψ⟩
    pub fn expectation(&self, op: &Operator) -> QResult<C64> {
        let applied = op.apply(self)?;
        self.inner_product(&applied)
    }

    /// |ψ⟩⟨ψ| as a Hermitian operator.
    pub fn density_matrix(&self) -> Operator {
        let m = &self.amplitudes * self.amplitudes.adjoint();
        Operator::from_raw(m, OperatorKind::Hermitian)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(_, z)| z.norm() > ZERO_TOLERANCE)
            .map(|(k, z)| format!("({:.4}{:+.4}i)|{}⟩", z.re, z.im, k))
            .collect();
        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    Unitary,
    Hermitian,
    Projection,
    General,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperatorKind::Unitary => "unitary",
            OperatorKind::Hermitian => "hermitian",
            OperatorKind::Projection => "projection",
            OperatorKind::General => "general",
        };
        write!(f, "{s}")
    }
}

/// Square complex matrix with an advisory kind tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Operator {
    kind: OperatorKind,
    matrix: DMatrix<C64>,
}

/// Eigenvalues sorted by ascending real part with matching normalized eigenvectors.
#[derive(Clone, Debug)]
pub struct EigenDecomposition {
    pub values: Vec<C64>,
    pub vectors: Vec<StateVector>,
}

impl Operator {
    pub fn new(matrix: DMatrix<C64>, kind: OperatorKind) -> QResult<Self> {
        if matrix.nrows() == 0 {
            return Err(QuantumError::invalid_operator("operator dimension must be at least 1"));
        }
        if matrix.nrows() != matrix.ncols() {
            return Err(QuantumError::invalid_operator(&format!(
                "matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        Ok(Self::from_raw(matrix, kind))
    }

    /// Row-major construction; every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<C64>], kind: OperatorKind) -> QResult<Self> {
        let n = rows.len();
        for row in rows {
            if row.len() != n {
                return Err(QuantumError::dimension_mismatch(n, row.len(), "operator row"));
            }
        }
        Self::new(DMatrix::from_fn(n, n, |i, j| rows[i][j]), kind)
    }

    pub(crate) fn from_raw(matrix: DMatrix<C64>, kind: OperatorKind) -> Self {
        Self { kind, matrix }
    }

    /// Verifies hermiticity before tagging.
    pub fn hermitian(matrix: DMatrix<C64>) -> QResult<Self> {
        let op = Self::new(matrix, OperatorKind::Hermitian)?;
        op.validate_hermitian()?;
        Ok(op)
    }

    /// Verifies U†U = I before tagging.
    pub fn unitary(matrix: DMatrix<C64>) -> QResult<Self> {
        let op = Self::new(matrix, OperatorKind::Unitary)?;
        if !op.is_unitary(1e-8) {
            let i = DMatrix::<C64>::identity(op.dimension(), op.dimension());
            let diff = max_abs(&(op.matrix.adjoint() * &op.matrix - i));
            return Err(QuantumError::invalid_operator(&format!(
                "not unitary (‖UᴴU−I‖∞={diff:e})"
            )));
        }
        Ok(op)
    }

    pub fn identity(dimension: usize) -> QResult<Self> {
        Self::new(DMatrix::identity(dimension, dimension), OperatorKind::Unitary)
    }

    pub fn zeros(dimension: usize) -> QResult<Self> {
        Self::new(DMatrix::from_element(dimension, dimension, c(0.0, 0.0)), OperatorKind::General)
    }

    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn with_kind(mut self, kind: OperatorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn matrix(&self) -> &DMatrix<C64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> DMatrix<C64> {
        self.matrix
    }

    pub fn element(&self, row: usize, col: usize) -> QResult<C64> {
        let n = self.dimension();
        if row >= n || col >= n {
            return Err(QuantumError::IndexOutOfBounds { index: row.max(col), dimension: n });
        }
        Ok(self.matrix[(row, col)])
    }

    pub fn apply(&self, state: &StateVector) -> QResult<StateVector> {
        if self.dimension() != state.dimension() {
            return Err(QuantumError::dimension_mismatch(
                self.dimension(),
                state.dimension(),
                "Operator::apply",
            ));
        }
        Ok(StateVector::from_raw(&self.matrix * state.amplitudes()))
    }

    /// self · other (other acts first).
    pub fn compose(&self, other: &Operator) -> QResult<Operator> {
        self.check_same_dimension(other, "Operator::compose")?;
        let kind = match (self.kind, other.kind) {
            (OperatorKind::Unitary, OperatorKind::Unitary) => OperatorKind::Unitary,
            _ => OperatorKind::General,
        };
        Ok(Self::from_raw(&self.matrix * &other.matrix, kind))
    }

    pub fn adjoint(&self) -> Operator {
        Self::from_raw(self.matrix.adjoint(), self.kind)
    }

    pub fn scale(&self, factor: C64) -> Operator {
        let kind = match self.kind {
            OperatorKind::Hermitian if factor.im == 0.0 => OperatorKind::Hermitian,
            _ => OperatorKind::General,
        };
        Self::from_raw(&self.matrix * factor, kind)
    }

    pub fn add(&self, other: &Operator) -> QResult<Operator> {
        self.check_same_dimension(other, "Operator::add")?;
        let kind = match (self.kind, other.kind) {
            (OperatorKind::Hermitian, OperatorKind::Hermitian) => OperatorKind::Hermitian,
            _ => OperatorKind::General,
        };
        Ok(Self::from_raw(&self.matrix + &other.matrix, kind))
    }

    pub fn tensor_product(&self, other: &Operator) -> Operator {
        let kind = if self.kind == other.kind { self.kind } else { OperatorKind::General };
        Self::from_raw(kron(&self.matrix, &other.matrix), kind)
    }

    /// Trace out the subsystems listed in `trace_out`; `dims` gives the factor
    /// dimensions in tensor order and must multiply to the operator dimension.
    pub fn partial_trace(&self, dims: &[usize], trace_out: &[usize]) -> QResult<Operator> {
        let total: usize = dims.iter().product();
        if dims.is_empty() || total != self.dimension() {
            return Err(QuantumError::dimension_mismatch(self.dimension(), total, "partial trace"));
        }
        for (pos, &k) in trace_out.iter().enumerate() {
            if k >= dims.len() {
                return Err(QuantumError::IndexOutOfBounds { index: k, dimension: dims.len() });
            }
            if trace_out[..pos].contains(&k) {
                return Err(QuantumError::invalid_operation(&format!("subsystem {k} traced twice")));
            }
        }
        let kept: Vec<usize> = (0..dims.len()).filter(|k| !trace_out.contains(k)).collect();
        let kept_dim: usize = kept.iter().map(|&k| dims[k]).product();

        let n = self.dimension();
        let all_digits: Vec<Vec<usize>> = (0..n).map(|i| digits(i, dims)).collect();
        let mut out = DMatrix::<C64>::from_element(kept_dim, kept_dim, c(0.0, 0.0));
        for i in 0..n {
            let di = &all_digits[i];
            let ki = subset_index(di, dims, &kept);
            for j in 0..n {
                let dj = &all_digits[j];
                if trace_out.iter().all(|&k| di[k] == dj[k]) {
                    out[(ki, subset_index(dj, dims, &kept))] += self.matrix[(i, j)];
                }
            }
        }
        let kind = match self.kind {
            OperatorKind::Hermitian | OperatorKind::Projection => OperatorKind::Hermitian,
            _ => OperatorKind::General,
        };
        Ok(Self::from_raw(out, kind))
    }

    pub fn trace(&self) -> C64 {
        self.matrix.diagonal().iter().sum()
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.matrix.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        max_abs(&(&self.matrix - self.matrix.adjoint())) <= tolerance
    }

    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let n = self.dimension();
        let identity = DMatrix::<C64>::identity(n, n);
        max_abs(&(self.matrix.adjoint() * &self.matrix - identity)) <= tolerance
    }

    pub fn validate_hermitian(&self) -> QResult<()> {
        if self.is_hermitian(HERMITIAN_TOLERANCE) {
            Ok(())
        } else {
            Err(QuantumError::invalid_operator("matrix is not Hermitian"))
        }
    }

    pub fn eigen_decompose(&self) -> QResult<EigenDecomposition> {
        let n = self.dimension();
        let mut pairs: Vec<(C64, DVector<C64>)> = if self.is_hermitian(HERMITIAN_TOLERANCE) {
            let eig = SymmetricEigen::new(self.matrix.clone());
            (0..n)
                .map(|k| (c(eig.eigenvalues[k], 0.0), eig.eigenvectors.column(k).into_owned()))
                .collect()
        } else {
            let values = self.general_eigenvalues()?;
            values.into_iter().map(|v| (v, self.null_vector(v))).collect()
        };
        pairs.sort_by(|a, b| a.0.re.total_cmp(&b.0.re));

        let mut values = Vec::with_capacity(n);
        let mut vectors = Vec::with_capacity(n);
        for (value, vector) in pairs {
            values.push(value);
            vectors.push(fix_phase(vector));
        }
        Ok(EigenDecomposition { values, vectors })
    }

    fn general_eigenvalues(&self) -> QResult<Vec<C64>> {
        let schur = Schur::try_new(self.matrix.clone(), EPS, 10_000)
            .ok_or_else(|| {
                QuantumError::invalid_operation("Schur decomposition did not converge")
            })?;
        let (_, t) = schur.unpack();
        let n = t.nrows();
        let mut values = Vec::with_capacity(n);
        let mut i = 0;
        while i < n {
            if i + 1 < n && t[(i + 1, i)].norm() > ZERO_TOLERANCE {
                // Unreduced 2x2 block.
                let (a, b, cc, d) = (t[(i, i)], t[(i, i + 1)], t[(i + 1, i)], t[(i + 1, i + 1)]);
                let half = (a + d) / 2.0;
                let disc = (half * half - (a * d - b * cc)).sqrt();
                values.push(half - disc);
                values.push(half + disc);
                i += 2;
            } else {
                values.push(t[(i, i)]);
                i += 1;
            }
        }
        Ok(values)
    }

    /// Right singular vector of (A − λI) with the smallest singular value.
    fn null_vector(&self, lambda: C64) -> DVector<C64> {
        let n = self.dimension();
        let shifted = &self.matrix - DMatrix::<C64>::identity(n, n) * lambda;
        let svd = SVD::new(shifted, false, true);
        let k = svd
            .singular_values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap_or(0);
        match svd.v_t {
            Some(v_t) => v_t.row(k).transpose().map(|z| z.conj()),
            None => DVector::from_element(n, c(0.0, 0.0)),
        }
    }

    fn check_same_dimension(&self, other: &Operator, context: &str) -> QResult<()> {
        if self.dimension() != other.dimension() {
            return Err(QuantumError::dimension_mismatch(
                self.dimension(),
                other.dimension(),
                context,
            ));
        }
        Ok(())
    }
}

/// Normalize and rotate so the first significant component is real positive.
fn fix_phase(v: DVector<C64>) -> StateVector {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    let mut v = if norm > ZERO_TOLERANCE { v / c(norm, 0.0) } else { v };
    if let Some(lead) = v.iter().find(|z| z.norm() > 1e-8).copied() {
        let phase = lead.conj() / lead.norm();
        v *= phase;
    }
    StateVector::from_raw(v)
}

/// A value that can label a graph element.
#[derive(Clone, Debug, PartialEq)]
pub enum QuantumObject {
    State(StateVector),
    Operator(Operator),
}

impl QuantumObject {
    pub fn dimension(&self) -> usize {
        match self {
            QuantumObject::State(s) => s.dimension(),
            QuantumObject::Operator(o) => o.dimension(),
        }
    }

    pub fn as_state(&self) -> Option<&StateVector> {
        match self {
            QuantumObject::State(s) => Some(s),
            QuantumObject::Operator(_) => None,
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            QuantumObject::Operator(o) => Some(o),
            QuantumObject::State(_) => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self, QuantumObject::State(_))
    }
}

impl From<StateVector> for QuantumObject {
    fn from(s: StateVector) -> Self {
        QuantumObject::State(s)
    }
}

impl From<Operator> for QuantumObject {
    fn from(o: Operator) -> Self {
        QuantumObject::Operator(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_nonzero_terms() {
        let s = StateVector::from_reals(&[0.6, 0.0, 0.8]).unwrap();
        insta::assert_snapshot!(s.to_string(), @"(0.6000+0.0000i)|0⟩ + (0.8000+0.0000i)|2⟩");
        assert_eq!(StateVector::zeros(2).unwrap().to_string(), "0");
    }

    #[test]
    fn fix_phase_makes_leading_component_real() {
        let v = DVector::from_vec(vec![c(0.0, 2.0), c(2.0, 0.0)]);
        let s = fix_phase(v);
        let a0 = s.amplitude(0).unwrap();
        assert!(a0.im.abs() < 1e-12 && a0.re > 0.0);
        assert!((s.norm() - 1.0).abs() < 1e-12);
    }
}
