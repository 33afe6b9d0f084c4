//! Clebsch–Gordan coefficients and two-spin coupling.
//!
//! Coefficients for a given (j1, j2) are computed once with Racah's closed
//! formula over every allowed (m1, j, m) and memoized in a [`CgCache`] owned by
//! the caller. Selection-rule violations are plain zeros, never errors.
//!
//! Phase convention: each Condon–Shortley coefficient carries an extra
//! (−1)^(j1+j2+j). The factor is symmetric in (j1, j2, j), so 3j symbols built
//! from these coefficients keep all their permutation symmetries, and the
//! spin-½ singlet comes out as (|↓↑⟩ − |↑↓⟩)/√2.
use std::collections::HashMap;

use nalgebra::DVector;
use num_complex::Complex64 as C64;
use serde_json::json;

use crate::core::angular::numbers::{
    doubled, half, ln_factorial, m_index, multiplicity, sign, triangle, validate_j,
};
use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::ops::c;
use crate::core::quantum::types::StateVector;
use crate::debug_log;

/// (2m1, 2j, 2m) → coefficient for one (j1, j2) pair.
type CgTable = HashMap<(i32, i32, i32), f64>;

/// Memoized coefficient tables keyed by (2j1, 2j2).
#[derive(Debug, Default, Clone)]
pub struct CgCache {
    tables: HashMap<(i32, i32), CgTable>,
}

impl CgCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (j1, j2) tables built so far.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, j1: f64, j2: f64) -> bool {
        match (doubled(j1), doubled(j2)) {
            (Some(a), Some(b)) => self.tables.contains_key(&(a, b)),
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    fn table(&mut self, two_j1: i32, two_j2: i32) -> &CgTable {
        self.tables
            .entry((two_j1, two_j2))
            .or_insert_with(|| build_table(two_j1, two_j2))
    }
}

fn build_table(two_j1: i32, two_j2: i32) -> CgTable {
    let mut table = CgTable::new();
    for two_j in ((two_j1 - two_j2).abs()..=two_j1 + two_j2).step_by(2) {
        for two_m1 in (-two_j1..=two_j1).step_by(2) {
            for two_m2 in (-two_j2..=two_j2).step_by(2) {
                let two_m = two_m1 + two_m2;
                if two_m.abs() > two_j {
                    continue;
                }
                let value = coupling_phase(two_j1, two_j2, two_j)
                    * racah(two_j1, two_m1, two_j2, two_m2, two_j);
                if value != 0.0 {
                    table.insert((two_m1, two_j, two_m), value);
                }
            }
        }
    }
    debug_log!(
        "built CG table j1={} j2={} ({} entries)",
        half(two_j1),
        half(two_j2),
        table.len()
    );
    table
}

/// (−1)^(j1+j2+j); the triangle rule keeps the exponent integral.
fn coupling_phase(two_j1: i32, two_j2: i32, two_j: i32) -> f64 {
    sign((two_j1 + two_j2 + two_j) / 2)
}

/// Racah's formula (Condon–Shortley phase); arguments doubled, rules already checked.
fn racah(two_j1: i32, two_m1: i32, two_j2: i32, two_m2: i32, two_j: i32) -> f64 {
    let two_m = two_m1 + two_m2;
    let ln_norm = ((two_j + 1) as f64).ln()
        + ln_factorial((two_j + two_j1 - two_j2) / 2)
        + ln_factorial((two_j - two_j1 + two_j2) / 2)
        + ln_factorial((two_j1 + two_j2 - two_j) / 2)
        - ln_factorial((two_j1 + two_j2 + two_j) / 2 + 1);
    let ln_m = ln_factorial((two_j + two_m) / 2)
        + ln_factorial((two_j - two_m) / 2)
        + ln_factorial((two_j1 - two_m1) / 2)
        + ln_factorial((two_j1 + two_m1) / 2)
        + ln_factorial((two_j2 - two_m2) / 2)
        + ln_factorial((two_j2 + two_m2) / 2);
    let prefactor = 0.5 * (ln_norm + ln_m);

    let n1 = (two_j1 + two_j2 - two_j) / 2;
    let n2 = (two_j1 - two_m1) / 2;
    let n3 = (two_j2 + two_m2) / 2;
    let n4 = (two_j - two_j2 + two_m1) / 2;
    let n5 = (two_j - two_j1 - two_m2) / 2;
    let k_min = 0_i32.max(-n4).max(-n5);
    let k_max = n1.min(n2).min(n3);

    (k_min..=k_max)
        .map(|k| {
            let ln_den = ln_factorial(k)
                + ln_factorial(n1 - k)
                + ln_factorial(n2 - k)
                + ln_factorial(n3 - k)
                + ln_factorial(n4 + k)
                + ln_factorial(n5 + k);
            sign(k) * (prefactor - ln_den).exp()
        })
        .sum()
}

fn is_zero_doubled(
    two_j1: i32,
    two_m1: i32,
    two_j2: i32,
    two_m2: i32,
    two_j: i32,
    two_m: i32,
) -> bool {
    two_m != two_m1 + two_m2
        || !triangle(two_j1, two_j2, two_j)
        || two_m1.abs() > two_j1
        || two_m2.abs() > two_j2
        || two_m.abs() > two_j
        || (two_j1 - two_m1) % 2 != 0
        || (two_j2 - two_m2) % 2 != 0
        || (two_j - two_m) % 2 != 0
}

/// True when any selection rule forces the coefficient to vanish.
pub fn is_zero_cg(j1: f64, m1: f64, j2: f64, m2: f64, j: f64, m: f64) -> bool {
    match (doubled(j1), doubled(m1), doubled(j2), doubled(m2), doubled(j), doubled(m)) {
        (Some(a), Some(b), Some(c2), Some(d), Some(e), Some(f)) => {
            is_zero_doubled(a, b, c2, d, e, f)
        }
        _ => true,
    }
}

/// ⟨j1 m1; j2 m2 | j m⟩ for doubled arguments.
pub(crate) fn cg_doubled(
    cache: &mut CgCache,
    two_j1: i32,
    two_m1: i32,
    two_j2: i32,
    two_m2: i32,
    two_j: i32,
    two_m: i32,
) -> f64 {
    if is_zero_doubled(two_j1, two_m1, two_j2, two_m2, two_j, two_m) {
        return 0.0;
    }
    if two_j1 == 1 && two_j2 == 1 {
        return spin_half(two_m1, two_j, two_m);
    }
    cache.table(two_j1, two_j2).get(&(two_m1, two_j, two_m)).copied().unwrap_or(0.0)
}

/// Closed form for two spin-½ particles; the singlet takes −1/√2 on |↑↓⟩.
fn spin_half(two_m1: i32, two_j: i32, two_m: i32) -> f64 {
    let r = std::f64::consts::FRAC_1_SQRT_2;
    match (two_j, two_m) {
        (2, 2) | (2, -2) => 1.0,
        (2, 0) => r,
        (0, 0) if two_m1 == 1 => -r,
        (0, 0) => r,
        _ => 0.0,
    }
}

pub fn clebsch_gordan(
    cache: &mut CgCache,
    j1: f64,
    m1: f64,
    j2: f64,
    m2: f64,
    j: f64,
    m: f64,
) -> C64 {
    match (doubled(j1), doubled(m1), doubled(j2), doubled(m2), doubled(j), doubled(m)) {
        (Some(a), Some(b), Some(c2), Some(d), Some(e), Some(f)) => {
            c(cg_doubled(cache, a, b, c2, d, e, f), 0.0)
        }
        _ => c(0.0, 0.0),
    }
}

/// Coupled-basis labels (j, m): j descending from j1+j2, m descending within each j.
pub fn coupled_basis(j1: f64, j2: f64) -> QResult<Vec<(f64, f64)>> {
    let (two_j1, two_j2) = (validate_j(j1)?, validate_j(j2)?);
    Ok(coupled_labels(two_j1, two_j2).into_iter().map(|(tj, tm)| (half(tj), half(tm))).collect())
}

fn coupled_labels(two_j1: i32, two_j2: i32) -> Vec<(i32, i32)> {
    let mut labels = Vec::with_capacity(multiplicity(two_j1) * multiplicity(two_j2));
    let mut two_j = two_j1 + two_j2;
    while two_j >= (two_j1 - two_j2).abs() {
        let mut two_m = two_j;
        while two_m >= -two_j {
            labels.push((two_j, two_m));
            two_m -= 2;
        }
        two_j -= 2;
    }
    labels
}

fn check_multiplet(state: &StateVector, two_j: i32, context: &str) -> QResult<()> {
    if state.dimension() != multiplicity(two_j) {
        return Err(QuantumError::dimension_mismatch(
            multiplicity(two_j),
            state.dimension(),
            context,
        ));
    }
    Ok(())
}

/// Couple |ψ1⟩ (spin j1) and |ψ2⟩ (spin j2) into the |j, m⟩ basis.
pub fn add_angular_momenta(
    cache: &mut CgCache,
    state1: &StateVector,
    j1: f64,
    state2: &StateVector,
    j2: f64,
) -> QResult<StateVector> {
    let (two_j1, two_j2) = (validate_j(j1)?, validate_j(j2)?);
    check_multiplet(state1, two_j1, "add_angular_momenta (first)")?;
    check_multiplet(state2, two_j2, "add_angular_momenta (second)")?;
    let (a, b) = (state1.amplitudes(), state2.amplitudes());

    let labels = coupled_labels(two_j1, two_j2);
    let mut out = DVector::from_element(labels.len(), c(0.0, 0.0));
    for (idx, &(two_j, two_m)) in labels.iter().enumerate() {
        for two_m1 in (-two_j1..=two_j1).step_by(2) {
            let two_m2 = two_m - two_m1;
            if two_m2.abs() > two_j2 {
                continue;
            }
            let cg = cg_doubled(cache, two_j1, two_m1, two_j2, two_m2, two_j, two_m);
            if cg != 0.0 {
                out[idx] += a[m_index(two_j1, two_m1)] * b[m_index(two_j2, two_m2)] * cg;
            }
        }
    }
    let mut coupled = StateVector::from_raw(out);
    coupled.set_property("type", json!("angular_momentum"));
    coupled.set_property("j1", json!(j1));
    coupled.set_property("j2", json!(j2));
    Ok(coupled)
}

/// Inverse of [`add_angular_momenta`]: back to the uncoupled |m1⟩⊗|m2⟩ basis.
pub fn decompose_angular_state(
    cache: &mut CgCache,
    state: &StateVector,
    j1: f64,
    j2: f64,
) -> QResult<StateVector> {
    let (two_j1, two_j2) = (validate_j(j1)?, validate_j(j2)?);
    let (d1, d2) = (multiplicity(two_j1), multiplicity(two_j2));
    if state.dimension() != d1 * d2 {
        return Err(QuantumError::dimension_mismatch(
            d1 * d2,
            state.dimension(),
            "decompose_angular_state",
        ));
    }
    let amps = state.amplitudes();
    let mut out = DVector::from_element(d1 * d2, c(0.0, 0.0));
    for (idx, (two_j, two_m)) in coupled_labels(two_j1, two_j2).into_iter().enumerate() {
        if amps[idx].norm() == 0.0 {
            continue;
        }
        for two_m1 in (-two_j1..=two_j1).step_by(2) {
            let two_m2 = two_m - two_m1;
            if two_m2.abs() > two_j2 {
                continue;
            }
            let cg = cg_doubled(cache, two_j1, two_m1, two_j2, two_m2, two_j, two_m);
            out[m_index(two_j1, two_m1) * d2 + m_index(two_j2, two_m2)] += amps[idx] * cg;
        }
    }
    Ok(StateVector::from_raw(out))
}
