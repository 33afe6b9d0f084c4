//! Finite-dimensional quantum states and operators, angular-momentum coupling
//! (Clebsch–Gordan, Wigner 3j/6j/9j) and quantum objects attached to graphs.
pub mod config;
pub mod core;

pub use crate::core::error::{QResult, QuantumError};
pub use crate::core::quantum::{Operator, OperatorKind, QuantumObject, StateVector};
