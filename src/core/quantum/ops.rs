//! Kronecker products and subsystem index arithmetic.
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;

#[inline]
pub fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

/// Kronecker product A ⊗ B
pub fn kron(a: &DMatrix<C64>, b: &DMatrix<C64>) -> DMatrix<C64> {
    let (ar, ac) = (a.nrows(), a.ncols());
    let (br, bc) = (b.nrows(), b.ncols());
    let mut out = DMatrix::<C64>::from_element(ar * br, ac * bc, c(0.0, 0.0));
    for i in 0..ar {
        for j in 0..ac {
            let aij = a[(i, j)];
            for k in 0..br {
                for l in 0..bc {
                    out[(i * br + k, j * bc + l)] = aij * b[(k, l)];
                }
            }
        }
    }
    out
}

/// Kronecker product of two column vectors; `a` is the slow index.
pub fn kron_vec(a: &DVector<C64>, b: &DVector<C64>) -> DVector<C64> {
    let n = b.len();
    DVector::from_fn(a.len() * n, |idx, _| a[idx / n] * b[idx % n])
}

/// Split a flat index into per-subsystem digits (last subsystem fastest).
pub fn digits(mut index: usize, dims: &[usize]) -> Vec<usize> {
    let mut out = vec![0; dims.len()];
    for k in (0..dims.len()).rev() {
        out[k] = index % dims[k];
        index /= dims[k];
    }
    out
}

/// Re-assemble a flat index from the digits of the chosen subsystems, in order.
pub fn subset_index(digits: &[usize], dims: &[usize], subset: &[usize]) -> usize {
    subset.iter().fold(0, |acc, &k| acc * dims[k] + digits[k])
}

/// Largest entry magnitude.
pub fn max_abs(m: &DMatrix<C64>) -> f64 {
    m.iter().map(|z| z.norm()).fold(0.0_f64, f64::max)
}
