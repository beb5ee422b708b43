//! Error types for state-vector and density-matrix operations

use thiserror::Error;

/// Errors raised by the exact simulator layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Qubit index outside the register
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Same qubit listed twice in a subsystem
    #[error("Qubit {index} listed more than once")]
    DuplicateQubit { index: usize },

    /// Vector or matrix side length is not a power of two
    #[error("Invalid state dimension {dimension}, expected power of 2")]
    InvalidDimension { dimension: usize },

    /// Operand sizes disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, StateError>;
