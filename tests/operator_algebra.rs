use nalgebra::DMatrix;
use num_complex::Complex64 as C64;
use spin_network::core::quantum::algebra::*;
use spin_network::core::quantum::{gates, Operator, OperatorKind, StateVector};

fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

fn op_approx(a: &Operator, b: &Operator, eps: f64) -> bool {
    a.dimension() == b.dimension() && (a.matrix() - b.matrix()).iter().all(|z| z.norm() <= eps)
}

fn real_op(entries: &[f64]) -> Operator {
    let n = (entries.len() as f64).sqrt() as usize;
    let data: Vec<C64> = entries.iter().map(|&x| c(x, 0.0)).collect();
    Operator::new(DMatrix::from_row_slice(n, n, &data), OperatorKind::General).unwrap()
}

#[test]
fn pauli_commutation_relations() {
    let (x, y, z) = (gates::pauli_x(), gates::pauli_y(), gates::pauli_z());
    let xy = commutator(&x, &y).unwrap();
    assert!(op_approx(&xy, &z.scale(c(0.0, 2.0)), 1e-12));
    let yz = commutator(&y, &z).unwrap();
    assert!(op_approx(&yz, &x.scale(c(0.0, 2.0)), 1e-12));
    assert!(op_approx(&lie_derivative(&x, &y).unwrap(), &xy, 0.0));
}

#[test]
fn pauli_anti_commutators() {
    let (x, y) = (gates::pauli_x(), gates::pauli_y());
    let xy = anti_commutator(&x, &y).unwrap();
    assert!(op_approx(&xy, &Operator::zeros(2).unwrap(), 1e-12));
    let xx = anti_commutator(&x, &x).unwrap();
    assert!(op_approx(&xx, &Operator::identity(2).unwrap().scale(c(2.0, 0.0)), 1e-12));
}

#[test]
fn bracket_dimension_mismatch() {
    let three = Operator::identity(3).unwrap();
    assert!(commutator(&gates::pauli_x(), &three).is_err());
    assert!(anti_commutator(&gates::pauli_x(), &three).is_err());
    assert!(add_operators(&gates::pauli_x(), &three).is_err());
}

#[test]
fn add_and_subtract() {
    let x = gates::pauli_x();
    let zero = subtract_operators(&x, &x).unwrap();
    assert!(op_approx(&zero, &Operator::zeros(2).unwrap(), 0.0));
    let two_x = add_operators(&x, &x).unwrap();
    assert!(op_approx(&two_x, &x.scale(c(2.0, 0.0)), 0.0));
}

#[test]
fn nested_commutator_innermost_last() {
    let ops = vec![gates::pauli_x(), gates::pauli_y(), gates::pauli_z()];
    // [[Y, Z], Y] = [2iX, Y] = -4Z
    let nested = nested_commutator(&ops, &[(0, 1), (1, 2)]).unwrap();
    assert!(op_approx(&nested, &gates::pauli_z().scale(c(-4.0, 0.0)), 1e-12));
    let single = nested_commutator(&ops, &[(0, 1)]).unwrap();
    assert!(op_approx(&single, &commutator(&ops[0], &ops[1]).unwrap(), 0.0));
}

#[test]
fn nested_commutator_rejects_bad_input() {
    let ops = vec![gates::pauli_x(), gates::pauli_y()];
    assert!(nested_commutator(&ops[..1], &[(0, 0)]).is_err());
    assert!(nested_commutator(&ops, &[]).is_err());
    assert!(nested_commutator(&ops, &[(0, 5)]).is_err());
}

#[test]
fn bch_orders() {
    let (x, z) = (gates::pauli_x(), gates::pauli_z());
    let xz = commutator(&x, &z).unwrap();
    let first = bch_formula(&x, &z, 1).unwrap();
    let expect = x.add(&z).unwrap().add(&xz.scale(c(0.5, 0.0))).unwrap();
    assert!(op_approx(&first, &expect, 1e-12));
    assert_eq!(first.kind(), OperatorKind::General);

    let second = bch_formula(&x, &z, 2).unwrap();
    let x_xz = commutator(&x, &xz).unwrap().scale(c(1.0 / 12.0, 0.0));
    let z_xz = commutator(&z, &xz).unwrap().scale(c(-1.0 / 12.0, 0.0));
    let expect2 = expect.add(&x_xz).unwrap().add(&z_xz).unwrap();
    assert!(op_approx(&second, &expect2, 1e-12));

    assert!(bch_formula(&x, &z, 0).is_err());
}

#[test]
fn bch_of_commuting_operators_is_the_sum() {
    let a = gates::pauli_z();
    let b = gates::pauli_z().scale(c(3.0, 0.0));
    let bch = bch_formula(&a, &b, 2).unwrap();
    assert!(op_approx(&bch, &a.add(&b).unwrap(), 1e-12));
}

#[test]
fn commute_checks() {
    let (x, z) = (gates::pauli_x(), gates::pauli_z());
    assert!(operators_commute(&x, &x, 1e-10).unwrap());
    assert!(!operators_commute(&x, &z, 1e-10).unwrap());
}

#[test]
fn commutator_expectation_and_uncertainty() {
    let zero = StateVector::computational_basis(2, 0).unwrap();
    let (x, y) = (gates::pauli_x(), gates::pauli_y());
    let e = commutator_expectation(&zero, &x, &y).unwrap();
    assert!((e - c(0.0, 2.0)).norm() < 1e-12);
    let u = uncertainty_product(&zero, &x, &y).unwrap();
    assert!((u - 1.0).abs() < 1e-12);
    assert!(u >= 0.5 * e.norm() - 1e-12);
    let zz = uncertainty_product(&zero, &gates::pauli_z(), &gates::pauli_z()).unwrap();
    assert!(zz.abs() < 1e-12);
}

#[test]
fn normality() {
    assert!(is_normal_operator(&gates::pauli_x(), 1e-10).unwrap());
    assert!(is_normal_operator(&gates::hadamard(), 1e-10).unwrap());
    // AA† = diag(2, 0) does not commute with A†A = [[1, 1], [1, 1]]
    let skew = real_op(&[1.0, 1.0, 0.0, 0.0]);
    assert!(!is_normal_operator(&skew, 1e-10).unwrap());
}

#[test]
fn exponential_of_zero_and_diagonal() {
    let e0 = matrix_exponential(&Operator::zeros(3).unwrap());
    assert!(op_approx(&e0, &Operator::identity(3).unwrap(), 1e-12));

    let d = real_op(&[1.0, 0.0, 0.0, 2.0]);
    let ed = matrix_exponential(&d);
    assert!((ed.element(0, 0).unwrap() - c(1f64.exp(), 0.0)).norm() < 1e-9);
    assert!((ed.element(1, 1).unwrap() - c(2f64.exp(), 0.0)).norm() < 1e-9);
    assert!(ed.element(0, 1).unwrap().norm() < 1e-12);
}

#[test]
fn exponential_term_budget() {
    let d = real_op(&[1.0, 0.0, 0.0, 2.0]);
    let only_identity = matrix_exponential_with(&d, 1, 1e-10);
    assert!(op_approx(&only_identity, &Operator::identity(2).unwrap(), 0.0));
    let linear = matrix_exponential_with(&d, 2, 1e-10);
    assert!((linear.element(1, 1).unwrap() - c(3.0, 0.0)).norm() < 1e-12);
}

#[test]
fn scaled_exponential_handles_large_generators() {
    let theta = 12.0_f64;
    // exp(−iθY) = cos θ·I − i sin θ·Y
    let e = matrix_exponential_scaled(&gates::pauli_y().scale(c(0.0, -theta)));
    let (cs, sn) = (theta.cos(), theta.sin());
    assert!(op_approx(&e, &real_op(&[cs, -sn, sn, cs]), 1e-9));
    assert!(e.is_unitary(1e-9));

    let small = real_op(&[0.1, 0.2, 0.0, -0.3]);
    assert!(op_approx(&matrix_exponential_scaled(&small), &matrix_exponential(&small), 1e-10));
}

#[test]
fn exponential_of_nilpotent_terminates_exactly() {
    let n = real_op(&[0.0, 1.0, 0.0, 0.0]);
    let e = matrix_exponential(&n);
    assert!(op_approx(&e, &real_op(&[1.0, 1.0, 0.0, 1.0]), 1e-15));
}

#[test]
fn generator_gives_unitary() {
    let g = gates::pauli_z().scale(c(std::f64::consts::FRAC_PI_2, 0.0));
    let u = operator_from_generator(&g);
    assert_eq!(u.kind(), OperatorKind::Unitary);
    assert!(u.is_unitary(1e-9));
    assert!((u.element(0, 0).unwrap() - c(0.0, 1.0)).norm() < 1e-9);
    assert!((u.element(1, 1).unwrap() - c(0.0, -1.0)).norm() < 1e-9);
}

#[test]
fn projector_is_idempotent() {
    let s = StateVector::from_reals(&[1.0, 1.0]).unwrap();
    let p = projection_operator(&s).unwrap();
    assert_eq!(p.kind(), OperatorKind::Projection);
    for i in 0..2 {
        for j in 0..2 {
            assert!((p.element(i, j).unwrap() - c(0.5, 0.0)).norm() < 1e-12);
        }
    }
    let pp = p.compose(&p).unwrap();
    assert!(op_approx(&pp, &p, 1e-12));
    assert!(projection_operator(&StateVector::zeros(2).unwrap()).is_err());
}
