//! Wigner 3j, 6j and 9j symbols.
use num_complex::Complex64 as C64;

use crate::core::angular::clebsch::{cg_doubled, CgCache};
use crate::core::angular::numbers::{doubled, ln_factorial, sign, triangle};
use crate::core::quantum::ops::c;

pub fn is_valid_triangle(j1: f64, j2: f64, j3: f64) -> bool {
    match (doubled(j1), doubled(j2), doubled(j3)) {
        (Some(a), Some(b), Some(c3)) => triangle(a, b, c3),
        _ => false,
    }
}

fn doubled_all<const N: usize>(values: [f64; N]) -> Option<[i32; N]> {
    let mut out = [0; N];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = doubled(v)?;
    }
    Some(out)
}

/// ( j1 j2 j3 ; m1 m2 m3 ) = (−1)^(j1−j2−m3) / √(2j3+1) · ⟨j1 m1; j2 m2 | j3 −m3⟩
pub fn wigner3j(cache: &mut CgCache, j1: f64, j2: f64, j3: f64, m1: f64, m2: f64, m3: f64) -> C64 {
    let Some([tj1, tj2, tj3, tm1, tm2, tm3]) = doubled_all([j1, j2, j3, m1, m2, m3]) else {
        return c(0.0, 0.0);
    };
    if tm1 + tm2 + tm3 != 0
        || tm1.abs() > tj1
        || tm2.abs() > tj2
        || tm3.abs() > tj3
        || !triangle(tj1, tj2, tj3)
    {
        return c(0.0, 0.0);
    }
    let cg = cg_doubled(cache, tj1, tm1, tj2, tm2, tj3, -tm3);
    if cg == 0.0 {
        return c(0.0, 0.0);
    }
    let phase = sign((tj1 - tj2 - tm3) / 2);
    c(phase * cg / ((tj3 + 1) as f64).sqrt(), 0.0)
}

/// Column permutations and sign reversal of a 3j symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wigner3jSymmetry {
    Identity,
    /// (j2 j3 j1; m2 m3 m1)
    CyclicForward,
    /// (j3 j1 j2; m3 m1 m2)
    CyclicBackward,
    /// (j2 j1 j3; m2 m1 m3)
    SwapFirstTwo,
    /// (j1 j2 j3; −m1 −m2 −m3)
    ReverseSigns,
}

/// The transformed symbol and the phase with `original = phase · value`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymmetryResult {
    pub value: C64,
    pub phase: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn wigner3j_symmetry(
    cache: &mut CgCache,
    j1: f64,
    j2: f64,
    j3: f64,
    m1: f64,
    m2: f64,
    m3: f64,
    symmetry: Wigner3jSymmetry,
) -> SymmetryResult {
    // (−1)^(j1+j2+j3); only meaningful when the sum is integral.
    let odd_phase = match doubled(j1 + j2 + j3) {
        Some(t) if t % 2 == 0 => sign(t / 2),
        _ => 1.0,
    };
    let (value, phase) = match symmetry {
        Wigner3jSymmetry::Identity => (wigner3j(cache, j1, j2, j3, m1, m2, m3), 1.0),
        Wigner3jSymmetry::CyclicForward => (wigner3j(cache, j2, j3, j1, m2, m3, m1), 1.0),
        Wigner3jSymmetry::CyclicBackward => (wigner3j(cache, j3, j1, j2, m3, m1, m2), 1.0),
        Wigner3jSymmetry::SwapFirstTwo => (wigner3j(cache, j2, j1, j3, m2, m1, m3), odd_phase),
        Wigner3jSymmetry::ReverseSigns => (wigner3j(cache, j1, j2, j3, -m1, -m2, -m3), odd_phase),
    };
    SymmetryResult { value, phase }
}

/// ln Δ(abc) with doubled arguments.
fn ln_delta(ta: i32, tb: i32, tc: i32) -> f64 {
    0.5 * (ln_factorial((ta + tb - tc) / 2)
        + ln_factorial((ta - tb + tc) / 2)
        + ln_factorial((-ta + tb + tc) / 2)
        - ln_factorial((ta + tb + tc) / 2 + 1))
}

fn six_j_doubled(t: [i32; 6]) -> f64 {
    let [t1, t2, t3, t4, t5, t6] = t;
    let triads = [(t1, t2, t3), (t1, t5, t6), (t4, t2, t6), (t4, t5, t3)];
    if triads.iter().any(|&(a, b, c3)| !triangle(a, b, c3)) {
        return 0.0;
    }
    let ln_pref: f64 = triads.iter().map(|&(a, b, c3)| ln_delta(a, b, c3)).sum();
    let a = [(t1 + t2 + t3) / 2, (t1 + t5 + t6) / 2, (t4 + t2 + t6) / 2, (t4 + t5 + t3) / 2];
    let b = [(t1 + t2 + t4 + t5) / 2, (t2 + t3 + t5 + t6) / 2, (t3 + t1 + t6 + t4) / 2];
    let t_min = a.iter().copied().max().unwrap_or(0);
    let t_max = b.iter().copied().min().unwrap_or(-1);

    (t_min..=t_max)
        .map(|n| {
            let ln_den: f64 = a.iter().map(|&ai| ln_factorial(n - ai)).sum::<f64>()
                + b.iter().map(|&bi| ln_factorial(bi - n)).sum::<f64>();
            sign(n) * (ln_pref + ln_factorial(n + 1) - ln_den).exp()
        })
        .sum()
}

/// { j1 j2 j3 ; j4 j5 j6 } via Racah's single-sum formula.
pub fn wigner6j(j1: f64, j2: f64, j3: f64, j4: f64, j5: f64, j6: f64) -> f64 {
    match doubled_all([j1, j2, j3, j4, j5, j6]) {
        Some(t) if t.iter().all(|&x| x >= 0) => six_j_doubled(t),
        _ => 0.0,
    }
}

/// { j1 j2 j3 ; j4 j5 j6 ; j7 j8 j9 } as a sum over products of three 6j symbols.
#[allow(clippy::too_many_arguments)]
pub fn wigner9j(
    j1: f64,
    j2: f64,
    j3: f64,
    j4: f64,
    j5: f64,
    j6: f64,
    j7: f64,
    j8: f64,
    j9: f64,
) -> f64 {
    let Some(t) = doubled_all([j1, j2, j3, j4, j5, j6, j7, j8, j9]) else {
        return 0.0;
    };
    if t.iter().any(|&x| x < 0) {
        return 0.0;
    }
    let [t1, t2, t3, t4, t5, t6, t7, t8, t9] = t;
    let rows_and_cols = [
        (t1, t2, t3),
        (t4, t5, t6),
        (t7, t8, t9),
        (t1, t4, t7),
        (t2, t5, t8),
        (t3, t6, t9),
    ];
    if rows_and_cols.iter().any(|&(a, b, c3)| !triangle(a, b, c3)) {
        return 0.0;
    }

    let x_min = (t1 - t9).abs().max((t4 - t8).abs()).max((t2 - t6).abs());
    let x_max = (t1 + t9).min(t4 + t8).min(t2 + t6);
    (x_min..=x_max)
        .step_by(2)
        .map(|tx| {
            let weight = sign(tx) * (tx + 1) as f64;
            weight
                * six_j_doubled([t1, t4, t7, t8, t9, tx])
                * six_j_doubled([t2, t5, t8, t4, tx, t6])
                * six_j_doubled([t3, t6, t9, tx, t1, t2])
        })
        .sum()
}
