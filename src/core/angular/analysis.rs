//! Reading j-components back out of coupled two-spin states.
use std::collections::BTreeMap;
use std::fmt;

use num_complex::Complex64 as C64;

use crate::core::angular::numbers::{half, multiplicity, validate_j};
use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::types::{StateVector, ZERO_TOLERANCE};

#[derive(Clone, Debug)]
pub struct JComponent {
    pub j: f64,
    pub dimension: usize,
    pub magnitude: f64,
    /// (m, amplitude) with m descending.
    pub m_amplitudes: Vec<(f64, C64)>,
    pub is_present: bool,
}

#[derive(Clone, Debug)]
pub struct AngularStateAnalysis {
    pub coupling: (f64, f64),
    /// Keyed by 2j.
    pub components: BTreeMap<i32, JComponent>,
    pub dominant_j: Option<f64>,
    pub is_pure: bool,
}

#[derive(Clone, Debug)]
pub struct ExtractedJComponent {
    pub state: StateVector,
    pub j: f64,
    pub normalization_factor: f64,
    pub original_magnitude: f64,
}

/// (j1, j2) recorded by `add_angular_momenta` in the state's properties.
pub fn coupling_info(state: &StateVector) -> Option<(f64, f64)> {
    if state.property("type")?.as_str()? != "angular_momentum" {
        return None;
    }
    Some((state.property("j1")?.as_f64()?, state.property("j2")?.as_f64()?))
}

/// Split a coupled-basis state into its j blocks. The coupling comes from the
/// state's properties, else from `coupling`; `Ok(None)` when neither is known.
pub fn analyze_angular_state(
    state: &StateVector,
    coupling: Option<(f64, f64)>,
) -> QResult<Option<AngularStateAnalysis>> {
    let Some((j1, j2)) = coupling_info(state).or(coupling) else {
        return Ok(None);
    };
    let (two_j1, two_j2) = (validate_j(j1)?, validate_j(j2)?);
    let expected = multiplicity(two_j1) * multiplicity(two_j2);
    if state.dimension() != expected {
        return Err(QuantumError::dimension_mismatch(
            expected,
            state.dimension(),
            "analyze_angular_state",
        ));
    }

    let amps = state.amplitudes();
    let mut components = BTreeMap::new();
    let mut offset = 0;
    let mut two_j = two_j1 + two_j2;
    while two_j >= (two_j1 - two_j2).abs() {
        let dimension = multiplicity(two_j);
        let m_amplitudes: Vec<(f64, C64)> =
            (0..dimension).map(|k| (half(two_j) - k as f64, amps[offset + k])).collect();
        let magnitude = m_amplitudes.iter().map(|(_, a)| a.norm_sqr()).sum::<f64>().sqrt();
        components.insert(
            two_j,
            JComponent {
                j: half(two_j),
                dimension,
                magnitude,
                m_amplitudes,
                is_present: magnitude > ZERO_TOLERANCE,
            },
        );
        offset += dimension;
        two_j -= 2;
    }

    let present: Vec<&JComponent> = components.values().filter(|c| c.is_present).collect();
    let dominant_j = present
        .iter()
        .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
        .map(|c| c.j);
    let is_pure = present.len() == 1;
    Ok(Some(AngularStateAnalysis { coupling: (j1, j2), components, dominant_j, is_pure }))
}

/// The normalized |j, m⟩ multiplet carried by the coupled state, if present.
pub fn extract_j_component(
    state: &StateVector,
    j: f64,
    coupling: Option<(f64, f64)>,
) -> QResult<Option<ExtractedJComponent>> {
    let two_j = validate_j(j)?;
    let Some(analysis) = analyze_angular_state(state, coupling)? else {
        return Ok(None);
    };
    let Some(component) = analysis.components.get(&two_j).filter(|c| c.is_present) else {
        return Ok(None);
    };
    let amplitudes = component.m_amplitudes.iter().map(|&(_, a)| a).collect();
    let raw = StateVector::from_amplitudes(amplitudes)?;
    let norm = raw.norm();
    Ok(Some(ExtractedJComponent {
        state: raw.normalize()?.with_basis(&format!("|{j}⟩")),
        j,
        normalization_factor: 1.0 / norm,
        original_magnitude: component.magnitude,
    }))
}

impl fmt::Display for AngularStateAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "coupling j1={} j2={}", self.coupling.0, self.coupling.1)?;
        for comp in self.components.values().rev() {
            writeln!(
                f,
                "  j={} dim={} |c|={:.4}{}",
                comp.j,
                comp.dimension,
                comp.magnitude,
                if comp.is_present { "" } else { " (absent)" }
            )?;
        }
        match self.dominant_j {
            Some(j) => write!(f, "dominant j={} pure={}", j, self.is_pure),
            None => write!(f, "dominant j=none pure={}", self.is_pure),
        }
    }
}
