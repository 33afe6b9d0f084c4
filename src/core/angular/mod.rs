//! Angular momentum: generators, coupling coefficients and recoupling symbols.

pub mod analysis;
pub mod clebsch;
pub mod numbers;
pub mod operators;
pub mod states;
pub mod wigner;

pub use analysis::{
    analyze_angular_state, coupling_info, extract_j_component, AngularStateAnalysis, JComponent,
};
pub use clebsch::{
    add_angular_momenta, clebsch_gordan, coupled_basis, decompose_angular_state, is_zero_cg, CgCache,
};
pub use numbers::validate_j;
pub use operators::{
    create_j2, create_j2_from_components, create_j_minus, create_j_plus, create_jx, create_jy,
    create_jz, create_rotation_operator,
};
pub use states::{basis_state, coherent_state, expectation_value, is_valid_m, valid_m_values};
pub use wigner::{
    is_valid_triangle, wigner3j, wigner3j_symmetry, wigner6j, wigner9j, Wigner3jSymmetry,
};
