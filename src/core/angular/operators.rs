//! Angular-momentum generators in the |j,m⟩ basis, m descending from j.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::angular::numbers::{half, multiplicity, validate_j};
use crate::core::error::QResult;
use crate::core::quantum::algebra::matrix_exponential_scaled;
use crate::core::quantum::ops::c;
use crate::core::quantum::types::{Operator, OperatorKind};

fn zero_matrix(n: usize) -> DMatrix<C64> {
    DMatrix::from_element(n, n, c(0.0, 0.0))
}

/// J₊|j,m⟩ = √(j(j+1) − m(m+1)) |j,m+1⟩
pub fn create_j_plus(j: f64) -> QResult<Operator> {
    let two_j = validate_j(j)?;
    let n = multiplicity(two_j);
    let jj = j * (j + 1.0);
    let mut m = zero_matrix(n);
    for k in 0..n - 1 {
        let mm = half(two_j) - (k + 1) as f64;
        m[(k, k + 1)] = c((jj - mm * (mm + 1.0)).max(0.0).sqrt(), 0.0);
    }
    Ok(Operator::from_raw(m, OperatorKind::General))
}

/// J₋|j,m⟩ = √(j(j+1) − m(m−1)) |j,m−1⟩
pub fn create_j_minus(j: f64) -> QResult<Operator> {
    let two_j = validate_j(j)?;
    let n = multiplicity(two_j);
    let jj = j * (j + 1.0);
    let mut m = zero_matrix(n);
    for k in 0..n - 1 {
        let mm = half(two_j) - k as f64;
        m[(k + 1, k)] = c((jj - mm * (mm - 1.0)).max(0.0).sqrt(), 0.0);
    }
    Ok(Operator::from_raw(m, OperatorKind::General))
}

pub fn create_jz(j: f64) -> QResult<Operator> {
    let two_j = validate_j(j)?;
    let n = multiplicity(two_j);
    let m = DMatrix::from_fn(n, n, |r, col| {
        if r == col {
            c(half(two_j) - r as f64, 0.0)
        } else {
            c(0.0, 0.0)
        }
    });
    Ok(Operator::from_raw(m, OperatorKind::Hermitian))
}

pub fn create_j2(j: f64) -> QResult<Operator> {
    let two_j = validate_j(j)?;
    let n = multiplicity(two_j);
    let m = DMatrix::identity(n, n) * c(j * (j + 1.0), 0.0);
    Ok(Operator::from_raw(m, OperatorKind::Hermitian))
}

/// J² = J₊J₋ + Jz² − Jz
pub fn create_j2_from_components(j: f64) -> QResult<Operator> {
    let jp = create_j_plus(j)?;
    let jm = create_j_minus(j)?;
    let jz = create_jz(j)?;
    let m = jp.matrix() * jm.matrix() + jz.matrix() * jz.matrix() - jz.matrix();
    Ok(Operator::from_raw(m, OperatorKind::Hermitian))
}

/// Jx = (J₊ + J₋)/2
pub fn create_jx(j: f64) -> QResult<Operator> {
    let sum = create_j_plus(j)?.matrix() + create_j_minus(j)?.matrix();
    Ok(Operator::from_raw(sum * c(0.5, 0.0), OperatorKind::Hermitian))
}

/// Jy = (J₊ − J₋)/(2i)
pub fn create_jy(j: f64) -> QResult<Operator> {
    let diff = create_j_plus(j)?.matrix() - create_j_minus(j)?.matrix();
    Ok(Operator::from_raw(diff * c(0.0, -0.5), OperatorKind::Hermitian))
}

/// D(α,β,γ) = exp(−iαJz)·exp(−iβJy)·exp(−iγJz)
pub fn create_rotation_operator(
    j: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> QResult<Operator> {
    let jz = create_jz(j)?;
    let jy = create_jy(j)?;
    let ea = matrix_exponential_scaled(&jz.scale(c(0.0, -alpha)));
    let eb = matrix_exponential_scaled(&jy.scale(c(0.0, -beta)));
    let eg = matrix_exponential_scaled(&jz.scale(c(0.0, -gamma)));
    Ok(ea.compose(&eb)?.compose(&eg)?.with_kind(OperatorKind::Unitary))
}
