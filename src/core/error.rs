use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QuantumError {
    InvalidAngularMomentum(String),
    InvalidMagneticNumber(String),
    DimensionMismatch { expected: usize, found: usize, context: String },
    ZeroNorm,
    UnknownElement(String),
    IndexOutOfBounds { index: usize, dimension: usize },
    InvalidOperator(String),
    InvalidOperation(String),
    CompositeOverlap { element: String, existing: String },
    NoQuantumState(String),
}

pub type QResult<T> = Result<T, QuantumError>;

impl fmt::Display for QuantumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantumError::InvalidAngularMomentum(msg) => {
                write!(f, "Invalid angular momentum: {}", msg)
            }
            QuantumError::InvalidMagneticNumber(msg) => {
                write!(f, "Invalid magnetic number: {}", msg)
            }
            QuantumError::DimensionMismatch { expected, found, context } => write!(
                f,
                "Dimension mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
            QuantumError::ZeroNorm => write!(f, "Cannot normalize zero vector"),
            QuantumError::UnknownElement(id) => write!(f, "Unknown graph element: {}", id),
            QuantumError::IndexOutOfBounds { index, dimension } => {
                write!(f, "Index {} out of bounds for dimension {}", index, dimension)
            }
            QuantumError::InvalidOperator(msg) => write!(f, "Invalid operator: {}", msg),
            QuantumError::InvalidOperation(msg) => write!(f, "Invalid Operation: {}", msg),
            QuantumError::CompositeOverlap { element, existing } => {
                write!(f, "Element {} already belongs to composite {}", element, existing)
            }
            QuantumError::NoQuantumState(msg) => write!(f, "No quantum state: {}", msg),
        }
    }
}

impl std::error::Error for QuantumError {}

impl QuantumError {
    pub fn invalid_j(message: &str) -> Self {
        QuantumError::InvalidAngularMomentum(message.to_string())
    }
    pub fn invalid_m(message: &str) -> Self {
        QuantumError::InvalidMagneticNumber(message.to_string())
    }
    pub fn dimension_mismatch(expected: usize, found: usize, context: &str) -> Self {
        QuantumError::DimensionMismatch { expected, found, context: context.to_string() }
    }
    pub fn unknown_element(id: &str) -> Self { QuantumError::UnknownElement(id.to_string()) }
    pub fn invalid_operator(message: &str) -> Self {
        QuantumError::InvalidOperator(message.to_string())
    }
    pub fn invalid_operation(message: &str) -> Self {
        QuantumError::InvalidOperation(message.to_string())
    }
    pub fn no_state(message: &str) -> Self { QuantumError::NoQuantumState(message.to_string()) }
}
