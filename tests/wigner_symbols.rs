use spin_network::core::angular::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-10
}

#[test]
fn three_j_known_values() {
    let mut cache = CgCache::new();
    let v = wigner3j(&mut cache, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    assert!(close(v.re, -(1.0f64 / 3.0).sqrt()));
    assert_eq!(v.im, 0.0);
    let v = wigner3j(&mut cache, 1.0, 1.0, 2.0, 0.0, 0.0, 0.0);
    assert!(close(v.re, (2.0f64 / 15.0).sqrt()));
}

#[test]
fn three_j_selection_rules() {
    let mut cache = CgCache::new();
    assert_eq!(wigner3j(&mut cache, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0).re, 0.0);
    assert_eq!(wigner3j(&mut cache, 1.0, 1.0, 3.0, 0.0, 0.0, 0.0).re, 0.0);
    assert_eq!(wigner3j(&mut cache, 1.0, 1.0, 2.0, 2.0, -2.0, 0.0).re, 0.0);
    // (j1 j2 j3; 0 0 0) vanishes for odd j1 + j2 + j3
    assert!(wigner3j(&mut cache, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0).re.abs() < 1e-12);
}

#[test]
fn three_j_orthogonality() {
    let mut cache = CgCache::new();
    let (j1, j2, j3, m3) = (1.5, 1.0, 1.5, -0.5);
    let mut sum = 0.0;
    for m1 in valid_m_values(j1).unwrap() {
        for m2 in valid_m_values(j2).unwrap() {
            sum += wigner3j(&mut cache, j1, j2, j3, m1, m2, m3).norm_sqr();
        }
    }
    assert!(close((2.0 * j3 + 1.0) * sum, 1.0));
}

#[test]
fn three_j_symmetries() {
    let mut cache = CgCache::new();
    let args = (1.0, 1.5, 0.5, 1.0, -1.5, 0.5);
    let (j1, j2, j3, m1, m2, m3) = args;
    let original = wigner3j(&mut cache, j1, j2, j3, m1, m2, m3);
    assert!(original.norm() > 1e-6);
    for sym in [
        Wigner3jSymmetry::Identity,
        Wigner3jSymmetry::CyclicForward,
        Wigner3jSymmetry::CyclicBackward,
        Wigner3jSymmetry::SwapFirstTwo,
        Wigner3jSymmetry::ReverseSigns,
    ] {
        let r = wigner3j_symmetry(&mut cache, j1, j2, j3, m1, m2, m3, sym);
        assert!((original - r.value * r.phase).norm() < 1e-10, "{sym:?}");
    }
    let swapped =
        wigner3j_symmetry(&mut cache, j1, j2, j3, m1, m2, m3, Wigner3jSymmetry::SwapFirstTwo);
    assert_eq!(swapped.phase, -1.0);
}

#[test]
fn three_j_symmetries_over_triangle_grid() {
    let mut cache = CgCache::new();
    let js = [0.0, 0.5, 1.0, 1.5, 2.0];
    let mut checked = 0;
    for &j1 in &js {
        for &j2 in &js {
            for &j3 in &js {
                if !is_valid_triangle(j1, j2, j3) {
                    continue;
                }
                for m1 in valid_m_values(j1).unwrap() {
                    for m2 in valid_m_values(j2).unwrap() {
                        let m3 = -m1 - m2;
                        if m3.abs() > j3 {
                            continue;
                        }
                        let original = wigner3j(&mut cache, j1, j2, j3, m1, m2, m3);
                        for sym in [
                            Wigner3jSymmetry::CyclicForward,
                            Wigner3jSymmetry::CyclicBackward,
                            Wigner3jSymmetry::SwapFirstTwo,
                            Wigner3jSymmetry::ReverseSigns,
                        ] {
                            let r = wigner3j_symmetry(&mut cache, j1, j2, j3, m1, m2, m3, sym);
                            assert!(
                                (original - r.value * r.phase).norm() < 1e-10,
                                "({j1} {j2} {j3}; {m1} {m2} {m3}) {sym:?}"
                            );
                        }
                        checked += 1;
                    }
                }
            }
        }
    }
    assert!(checked > 100);
}

#[test]
fn spin_half_pair_three_j_is_cyclic() {
    let mut cache = CgCache::new();
    let original = wigner3j(&mut cache, 0.5, 0.5, 0.0, 0.5, -0.5, 0.0);
    let cyclic = wigner3j(&mut cache, 0.5, 0.0, 0.5, -0.5, 0.0, 0.5);
    assert!((original.re + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    assert!((original - cyclic).norm() < 1e-12);
}

#[test]
fn three_j_orthogonality_over_j3_and_m3() {
    let mut cache = CgCache::new();
    let mut sum = 0.0;
    for j3 in [0.0, 1.0, 2.0] {
        for m3 in valid_m_values(j3).unwrap() {
            let v = wigner3j(&mut cache, 1.0, 1.0, j3, 0.0, 0.0, m3);
            sum += (2.0 * j3 + 1.0) * (v * v).re;
        }
    }
    assert!(close(sum, 1.0), "{sum}");
}

#[test]
fn triangle_helper() {
    assert!(is_valid_triangle(1.0, 1.0, 2.0));
    assert!(is_valid_triangle(0.5, 0.5, 0.0));
    assert!(!is_valid_triangle(0.5, 0.5, 0.5));
    assert!(!is_valid_triangle(1.0, 1.0, 3.0));
    assert!(!is_valid_triangle(0.3, 1.0, 1.0));
}

#[test]
fn six_j_known_values() {
    assert!(close(wigner6j(1.0, 1.0, 1.0, 1.0, 1.0, 1.0), 1.0 / 6.0));
    assert!(close(wigner6j(0.5, 0.5, 1.0, 0.5, 0.5, 0.0), 0.5));
    assert!(close(wigner6j(0.5, 0.5, 1.0, 0.5, 0.5, 1.0), 1.0 / 6.0));
    assert!(close(wigner6j(1.0, 1.0, 1.0, 1.0, 1.0, 0.0), -1.0 / 3.0));
}

#[test]
fn six_j_column_permutation_invariance() {
    let base = wigner6j(1.0, 1.5, 0.5, 2.0, 1.5, 1.5);
    assert!(base.abs() > 1e-6);
    assert!(close(wigner6j(1.5, 1.0, 0.5, 1.5, 2.0, 1.5), base));
    assert!(close(wigner6j(0.5, 1.5, 1.0, 1.5, 1.5, 2.0), base));
    // swap upper and lower entries in two columns
    assert!(close(wigner6j(2.0, 1.5, 0.5, 1.0, 1.5, 1.5), base));
}

#[test]
fn six_j_invalid_arguments() {
    assert_eq!(wigner6j(-1.0, 1.0, 1.0, 1.0, 1.0, 1.0), 0.0);
    assert_eq!(wigner6j(0.2, 1.0, 1.0, 1.0, 1.0, 1.0), 0.0);
}

#[test]
fn nine_j_known_values() {
    assert!(close(wigner9j(0.5, 0.5, 1.0, 0.5, 0.5, 1.0, 1.0, 1.0, 0.0), -1.0 / 18.0));
    assert!(close(wigner9j(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0), 1.0 / 18.0));
    assert!(close(wigner9j(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0), 0.0));
}

#[test]
fn nine_j_with_zero_reduces_to_six_j() {
    // {a b e; c d e; f f 0} = (−1)^(b+c+e+f) {a b e; d c f} / √((2e+1)(2f+1))
    let (a, b, e, c, d, f) = (1.0, 0.5, 1.5, 0.5, 1.0, 1.5);
    let nine = wigner9j(a, b, e, c, d, e, f, f, 0.0);
    let six = wigner6j(a, b, e, d, c, f);
    let phase = if ((b + c + e + f) as i32) % 2 == 0 { 1.0 } else { -1.0 };
    let expect = phase * six / ((2.0 * e + 1.0) * (2.0 * f + 1.0)).sqrt();
    assert!(close(nine, expect), "{nine} vs {expect}");
}

#[test]
fn nine_j_broken_row_is_zero() {
    assert_eq!(wigner9j(1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0), 0.0);
    assert_eq!(wigner9j(-0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0), 0.0);
}
