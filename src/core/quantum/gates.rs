//! Standard single- and two-qubit gates as unitary operators.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::ops::c;
use crate::core::quantum::types::{Operator, OperatorKind};

fn qubit_gate(entries: [C64; 4]) -> Operator {
    Operator::from_raw(DMatrix::from_row_slice(2, 2, &entries), OperatorKind::Unitary)
}

pub fn identity() -> Operator {
    Operator::from_raw(DMatrix::identity(2, 2), OperatorKind::Unitary)
}

pub fn pauli_x() -> Operator {
    qubit_gate([c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
}

pub fn pauli_y() -> Operator {
    qubit_gate([c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)])
}

pub fn pauli_z() -> Operator {
    qubit_gate([c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)])
}

pub fn hadamard() -> Operator {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    qubit_gate([c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)])
}

pub fn phase() -> Operator {
    qubit_gate([c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)])
}

/// π/8 gate.
pub fn t_gate() -> Operator {
    qubit_gate([
        c(1.0, 0.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        C64::from_polar(1.0, std::f64::consts::FRAC_PI_4),
    ])
}

/// Two-qubit CNOT with the first factor as control.
pub fn cnot() -> Operator {
    // |00⟩→|00⟩, |01⟩→|01⟩, |10⟩→|11⟩, |11⟩→|10⟩
    let mut m = DMatrix::<C64>::from_element(4, 4, c(0.0, 0.0));
    for (out, basis) in [(0, 0), (1, 1), (3, 2), (2, 3)] {
        m[(out, basis)] = c(1.0, 0.0);
    }
    Operator::from_raw(m, OperatorKind::Unitary)
}

/// CNOT on an `n_qubits` register; qubit 0 is the most significant factor.
pub fn controlled_not(n_qubits: usize, control: usize, target: usize) -> QResult<Operator> {
    if control >= n_qubits || target >= n_qubits || control == target {
        return Err(QuantumError::invalid_operation(&format!(
            "bad CNOT wiring control={control} target={target} on {n_qubits} qubits"
        )));
    }
    let dim = 1usize << n_qubits;
    let bit = |q: usize| 1usize << (n_qubits - 1 - q);
    let mut m = DMatrix::<C64>::from_element(dim, dim, c(0.0, 0.0));
    for basis in 0..dim {
        let out = if basis & bit(control) != 0 { basis ^ bit(target) } else { basis };
        m[(out, basis)] = c(1.0, 0.0);
    }
    Ok(Operator::from_raw(m, OperatorKind::Unitary))
}
