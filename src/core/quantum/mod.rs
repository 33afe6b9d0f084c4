//! Finite-dimensional quantum linear algebra.

pub mod algebra;
pub mod gates;
pub mod ops;
pub mod records;
pub mod types;

pub use types::{EigenDecomposition, Operator, OperatorKind, QuantumObject, StateVector};
