//! Quantum-number bookkeeping. Everything is carried as doubled integers so
//! half-integers stay exact.
use std::sync::OnceLock;

use crate::core::error::{QResult, QuantumError};

const FACTORIAL_TABLE: usize = 256;
static LN_FACTORIALS: OnceLock<Vec<f64>> = OnceLock::new();

/// 2x when x is a (half-)integer and 2x + 1 still fits an `i32`.
pub fn doubled(x: f64) -> Option<i32> {
    if !x.is_finite() {
        return None;
    }
    let t = 2.0 * x;
    let r = t.round();
    if (t - r).abs() >= 1e-9 || r.abs() >= f64::from(i32::MAX) {
        return None;
    }
    Some(r as i32)
}

pub fn half(two: i32) -> f64 {
    two as f64 / 2.0
}

/// 2j for a valid angular momentum j ≥ 0.
pub fn validate_j(j: f64) -> QResult<i32> {
    match doubled(j) {
        Some(two_j) if two_j >= 0 => Ok(two_j),
        _ => Err(QuantumError::invalid_j(&format!(
            "j = {j} must be a non-negative integer or half-integer"
        ))),
    }
}

/// 2m for an m in {j, j−1, …, −j}.
pub fn validate_m(two_j: i32, m: f64) -> QResult<i32> {
    match doubled(m) {
        Some(two_m) if two_m.abs() <= two_j && (two_j - two_m) % 2 == 0 => Ok(two_m),
        _ => Err(QuantumError::invalid_m(&format!(
            "m = {m} is not allowed for j = {}",
            half(two_j)
        ))),
    }
}

/// Basis index of m inside a multiplet (descending m).
pub fn m_index(two_j: i32, two_m: i32) -> usize {
    ((two_j - two_m) / 2) as usize
}

pub fn multiplicity(two_j: i32) -> usize {
    (two_j + 1) as usize
}

/// |a−b| ≤ c ≤ a+b with a+b+c integral, all arguments doubled.
pub fn triangle(two_a: i32, two_b: i32, two_c: i32) -> bool {
    two_a >= 0
        && two_b >= 0
        && two_c >= 0
        && two_c <= two_a + two_b
        && two_c >= (two_a - two_b).abs()
        && (two_a + two_b + two_c) % 2 == 0
}

/// (−1)^n
pub fn sign(n: i32) -> f64 {
    if n.rem_euclid(2) == 0 {
        1.0
    } else {
        -1.0
    }
}

/// ln(n!) for n ≥ 0.
pub fn ln_factorial(n: i32) -> f64 {
    let table = LN_FACTORIALS.get_or_init(|| {
        let mut t = Vec::with_capacity(FACTORIAL_TABLE);
        let mut acc = 0.0_f64;
        t.push(0.0);
        for k in 1..FACTORIAL_TABLE {
            acc += (k as f64).ln();
            t.push(acc);
        }
        t
    });
    match usize::try_from(n) {
        Ok(k) if k < table.len() => table[k],
        _ => (1..=n.max(0)).map(|k| (k as f64).ln()).sum(),
    }
}
