//! Operator algebra: commutators, BCH expansion, exponentials and friends.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::ops::{c, max_abs};
use crate::core::quantum::types::{Operator, OperatorKind, StateVector, ZERO_TOLERANCE};

pub const EXP_MAX_TERMS: usize = 20;
pub const EXP_TOLERANCE: f64 = 1e-10;

fn same_dimension(a: &Operator, b: &Operator, context: &str) -> QResult<usize> {
    if a.dimension() != b.dimension() {
        return Err(QuantumError::dimension_mismatch(a.dimension(), b.dimension(), context));
    }
    Ok(a.dimension())
}

/// AB ± BA accumulated entry by entry.
fn bracket(a: &Operator, b: &Operator, sign: f64, context: &str) -> QResult<DMatrix<C64>> {
    let n = same_dimension(a, b, context)?;
    let (ma, mb) = (a.matrix(), b.matrix());
    Ok(DMatrix::from_fn(n, n, |i, j| {
        let mut ab = c(0.0, 0.0);
        let mut ba = c(0.0, 0.0);
        for k in 0..n {
            ab += ma[(i, k)] * mb[(k, j)];
            ba += mb[(i, k)] * ma[(k, j)];
        }
        ab + ba * sign
    }))
}

pub fn add_operators(a: &Operator, b: &Operator) -> QResult<Operator> {
    a.add(b)
}

pub fn subtract_operators(a: &Operator, b: &Operator) -> QResult<Operator> {
    a.add(&b.scale(c(-1.0, 0.0)))
}

/// [A, B] = AB − BA
pub fn commutator(a: &Operator, b: &Operator) -> QResult<Operator> {
    Ok(Operator::from_raw(bracket(a, b, -1.0, "commutator")?, OperatorKind::General))
}

/// {A, B} = AB + BA
pub fn anti_commutator(a: &Operator, b: &Operator) -> QResult<Operator> {
    let kind = match (a.kind(), b.kind()) {
        (OperatorKind::Hermitian, OperatorKind::Hermitian) => OperatorKind::Hermitian,
        _ => OperatorKind::General,
    };
    Ok(Operator::from_raw(bracket(a, b, 1.0, "anti-commutator")?, kind))
}

/// L_A(B) = [A, B]
pub fn lie_derivative(a: &Operator, b: &Operator) -> QResult<Operator> {
    commutator(a, b)
}

/// Nested commutator built from the innermost (last) pair outwards.
///
/// `pairs = [(0, 1), (1, 2)]` over `[A, B, C]` evaluates `[[B, C], B]`: the
/// last pair gives `[ops[a], ops[b]]`, every earlier pair `(_, b)` wraps the
/// running result as `[result, ops[b]]`.
pub fn nested_commutator(ops: &[Operator], pairs: &[(usize, usize)]) -> QResult<Operator> {
    if ops.len() < 2 || pairs.is_empty() {
        return Err(QuantumError::invalid_operation(
            "need at least two operators and one pair of indices",
        ));
    }
    let mut result: Option<Operator> = None;
    for &(a, b) in pairs.iter().rev() {
        if a >= ops.len() || b >= ops.len() {
            return Err(QuantumError::invalid_operation(&format!(
                "invalid operator indices ({a}, {b})"
            )));
        }
        let left = match &result {
            Some(prev) => prev,
            None => &ops[a],
        };
        let next = commutator(left, &ops[b])?;
        result = Some(next);
    }
    result.ok_or_else(|| QuantumError::invalid_operation("empty commutator chain"))
}

/// Baker–Campbell–Hausdorff approximation of log(e^A e^B).
pub fn bch_formula(a: &Operator, b: &Operator, order: usize) -> QResult<Operator> {
    if order < 1 {
        return Err(QuantumError::invalid_operation("BCH order must be at least 1"));
    }
    let ab = commutator(a, b)?;
    let mut result = a.add(b)?.add(&ab.scale(c(0.5, 0.0)))?;
    if order >= 2 {
        let a_ab = commutator(a, &ab)?;
        let b_ab = commutator(b, &ab)?;
        result = result
            .add(&a_ab.scale(c(1.0 / 12.0, 0.0)))?
            .add(&b_ab.scale(c(-1.0 / 12.0, 0.0)))?;
    }
    Ok(result.with_kind(OperatorKind::General))
}

pub fn operators_commute(a: &Operator, b: &Operator, tolerance: f64) -> QResult<bool> {
    Ok(max_abs(commutator(a, b)?.matrix()) < tolerance)
}

/// ⟨ψ|[A, B]|ψ⟩
pub fn commutator_expectation(state: &StateVector, a: &Operator, b: &Operator) -> QResult<C64> {
    state.expectation(&commutator(a, b)?)
}

/// ΔA·ΔB with ΔX = sqrt(⟨X²⟩ − |⟨X⟩|²); negative variances clamp to zero.
pub fn uncertainty_product(state: &StateVector, a: &Operator, b: &Operator) -> QResult<f64> {
    let spread = |op: &Operator| -> QResult<f64> {
        let mean = state.expectation(op)?;
        let second = state.expectation(&op.compose(op)?)?;
        Ok((second.re - mean.norm_sqr()).max(0.0).sqrt())
    };
    Ok(spread(a)? * spread(b)?)
}

/// A is normal iff [AA†, A†A] vanishes.
pub fn is_normal_operator(a: &Operator, tolerance: f64) -> QResult<bool> {
    let dag = a.adjoint();
    let left = a.compose(&dag)?;
    let right = dag.compose(a)?;
    operators_commute(&left, &right, tolerance)
}

/// exp(M) by truncated Taylor series with the default budget.
pub fn matrix_exponential(m: &Operator) -> Operator {
    matrix_exponential_with(m, EXP_MAX_TERMS, EXP_TOLERANCE)
}

/// Σ_{k<max_terms} Mᵏ/k!, stopping once the current term's largest entry drops
/// below `tolerance`.
pub fn matrix_exponential_with(m: &Operator, max_terms: usize, tolerance: f64) -> Operator {
    let n = m.dimension();
    let mut sum = DMatrix::<C64>::identity(n, n);
    let mut term = DMatrix::<C64>::identity(n, n);
    for k in 1..max_terms {
        term = (&term * m.matrix()) / c(k as f64, 0.0);
        sum += &term;
        if max_abs(&term) < tolerance {
            break;
        }
    }
    Operator::from_raw(sum, OperatorKind::General)
}

/// Largest absolute row sum.
fn norm_inf(m: &DMatrix<C64>) -> f64 {
    m.row_iter().map(|row| row.iter().map(|z| z.norm()).sum::<f64>()).fold(0.0, f64::max)
}

const MAX_SQUARINGS: u32 = 64;

/// exp(M) by scaling and squaring: the Taylor series runs on M/2^s with
/// ‖M/2^s‖∞ ≤ ½, then the result is squared s times.
pub fn matrix_exponential_scaled(m: &Operator) -> Operator {
    let norm = norm_inf(m.matrix());
    let mut squarings = 0;
    while norm / 2f64.powi(squarings as i32) > 0.5 && squarings < MAX_SQUARINGS {
        squarings += 1;
    }
    let scaled = m.scale(c(0.5f64.powi(squarings as i32), 0.0));
    let mut out = matrix_exponential_with(&scaled, EXP_MAX_TERMS, f64::EPSILON).matrix().clone();
    for _ in 0..squarings {
        out = &out * &out;
    }
    Operator::from_raw(out, OperatorKind::General)
}

/// exp(iG) for a Hermitian generator G.
pub fn operator_from_generator(generator: &Operator) -> Operator {
    matrix_exponential(&generator.scale(c(0.0, 1.0))).with_kind(OperatorKind::Unitary)
}

/// |ψ⟩⟨ψ| for the normalized input.
pub fn projection_operator(state: &StateVector) -> QResult<Operator> {
    let psi = if (state.norm() - 1.0).abs() > ZERO_TOLERANCE {
        state.normalize()?
    } else {
        state.clone()
    };
    Ok(psi.density_matrix().with_kind(OperatorKind::Projection))
}
