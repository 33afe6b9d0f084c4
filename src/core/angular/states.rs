//! |j,m⟩ basis states and helpers.
use nalgebra::DVector;
use num_complex::Complex64 as C64;

use crate::core::angular::numbers::{
    half, ln_factorial, m_index, multiplicity, validate_j, validate_m,
};
use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::types::{Operator, StateVector};

/// |j,m⟩ in the (2j+1)-dimensional multiplet.
pub fn basis_state(j: f64, m: f64) -> QResult<StateVector> {
    let two_j = validate_j(j)?;
    let two_m = validate_m(two_j, m)?;
    StateVector::computational_basis(multiplicity(two_j), m_index(two_j, two_m))
}

/// Spin-coherent state pointing along (θ, φ); θ = 0 gives |j,j⟩.
pub fn coherent_state(j: f64, theta: f64, phi: f64) -> QResult<StateVector> {
    let two_j = validate_j(j)?;
    let (cos_h, sin_h) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    let amplitudes = (0..multiplicity(two_j)).map(|k| {
        // k = j − m
        let up = two_j - k as i32;
        let binom = (0.5 * (ln_factorial(two_j) - ln_factorial(up) - ln_factorial(k as i32))).exp();
        let magnitude = binom * cos_h.powi(up) * sin_h.powi(k as i32);
        C64::from_polar(magnitude, k as f64 * phi)
    });
    Ok(StateVector::from_raw(DVector::from_iterator(multiplicity(two_j), amplitudes)))
}

/// j, j−1, …, −j
pub fn valid_m_values(j: f64) -> QResult<Vec<f64>> {
    let two_j = validate_j(j)?;
    Ok((0..=two_j).step_by(2).map(|k| half(two_j - k)).collect())
}

pub fn is_valid_m(j: f64, m: f64) -> QResult<bool> {
    let two_j = validate_j(j)?;
    Ok(validate_m(two_j, m).is_ok())
}

/// ⟨j,m|O|j,m⟩
pub fn expectation_value(op: &Operator, j: f64, m: f64) -> QResult<C64> {
    let two_j = validate_j(j)?;
    let two_m = validate_m(two_j, m)?;
    if op.dimension() != multiplicity(two_j) {
        return Err(QuantumError::dimension_mismatch(
            multiplicity(two_j),
            op.dimension(),
            "expectation_value",
        ));
    }
    let k = m_index(two_j, two_m);
    op.element(k, k)
}
