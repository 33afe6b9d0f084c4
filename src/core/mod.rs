//! Core module tree: linear algebra, angular momentum and the quantum graph layer.

#[macro_use]
pub mod debug; // gated debug logging (SPIN_NETWORK_DEBUG=1) provides debug_log! macro
pub mod angular;
pub mod error;
pub mod qgraph;
pub mod quantum;
