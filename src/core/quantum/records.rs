//! Plain serde records for exchanging states and operators as JSON.
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::core::error::{QuantumError, QResult};
use crate::core::quantum::types::{Operator, OperatorKind, QuantumObject, StateVector};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplexRecord {
    pub re: f64,
    pub im: f64,
}

impl From<C64> for ComplexRecord {
    fn from(z: C64) -> Self {
        Self { re: z.re, im: z.im }
    }
}

impl From<ComplexRecord> for C64 {
    fn from(r: ComplexRecord) -> Self {
        C64::new(r.re, r.im)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub dimension: usize,
    pub amplitudes: Vec<ComplexRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub dimension: usize,
    #[serde(rename = "type")]
    pub kind: OperatorKind,
    pub matrix: Vec<Vec<ComplexRecord>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum QuantumObjectRecord {
    State(StateRecord),
    Operator(OperatorRecord),
}

impl From<&StateVector> for StateRecord {
    fn from(s: &StateVector) -> Self {
        Self {
            dimension: s.dimension(),
            amplitudes: s.amplitudes().iter().map(|&z| z.into()).collect(),
            basis: s.basis.clone(),
        }
    }
}

impl TryFrom<StateRecord> for StateVector {
    type Error = QuantumError;

    fn try_from(r: StateRecord) -> QResult<Self> {
        let amplitudes = r.amplitudes.into_iter().map(C64::from).collect();
        let mut s = StateVector::new(r.dimension, amplitudes)?;
        s.basis = r.basis;
        Ok(s)
    }
}

impl From<&Operator> for OperatorRecord {
    fn from(op: &Operator) -> Self {
        let m = op.matrix();
        Self {
            dimension: op.dimension(),
            kind: op.kind(),
            matrix: (0..m.nrows())
                .map(|i| (0..m.ncols()).map(|j| m[(i, j)].into()).collect())
                .collect(),
        }
    }
}

impl TryFrom<OperatorRecord> for Operator {
    type Error = QuantumError;

    fn try_from(r: OperatorRecord) -> QResult<Self> {
        if r.matrix.len() != r.dimension {
            return Err(QuantumError::dimension_mismatch(
                r.dimension,
                r.matrix.len(),
                "operator record",
            ));
        }
        let rows: Vec<Vec<C64>> =
            r.matrix.into_iter().map(|row| row.into_iter().map(C64::from).collect()).collect();
        Operator::from_rows(&rows, r.kind)
    }
}

impl From<&QuantumObject> for QuantumObjectRecord {
    fn from(obj: &QuantumObject) -> Self {
        match obj {
            QuantumObject::State(s) => QuantumObjectRecord::State(s.into()),
            QuantumObject::Operator(o) => QuantumObjectRecord::Operator(o.into()),
        }
    }
}

impl TryFrom<QuantumObjectRecord> for QuantumObject {
    type Error = QuantumError;

    fn try_from(r: QuantumObjectRecord) -> QResult<Self> {
        Ok(match r {
            QuantumObjectRecord::State(s) => QuantumObject::State(s.try_into()?),
            QuantumObjectRecord::Operator(o) => QuantumObject::Operator(o.try_into()?),
        })
    }
}
