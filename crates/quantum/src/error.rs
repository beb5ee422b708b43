//! Error types for circuit templates, Pauli operators and evaluation

use statevec::StateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    /// Parameter vector length differs from the template's free-parameter count
    #[error("Dimension mismatch: expected {expected} parameters, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Observable and state act on different registers
    #[error("Invalid observable: acts on {observable_qubits} qubits, state has {state_qubits}")]
    InvalidObservable {
        observable_qubits: usize,
        state_qubits: usize,
    },

    /// Pauli label contains something other than I, X, Y, Z
    #[error("Invalid Pauli label '{label}'")]
    InvalidPauliLabel { label: String },

    /// Pauli term width differs from its Hamiltonian's width
    #[error("Pauli term acts on {actual} qubits, Hamiltonian has {expected}")]
    TermWidth { expected: usize, actual: usize },

    /// Gate references a qubit outside the register
    #[error("Invalid qubit index {index} for {num_qubits}-qubit circuit")]
    InvalidQubit { index: usize, num_qubits: usize },

    /// Two-qubit gate with identical operands
    #[error("Two-qubit gate needs distinct qubits, got ({0}, {0})")]
    RepeatedQubit(usize),

    /// Parameter drives more than one rotation
    #[error("Parameter '{name}' is used by more than one rotation")]
    SharedParameter { name: String },

    /// Name not registered on the template
    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error(transparent)]
    State(#[from] StateError),
}

pub type Result<T> = std::result::Result<T, QuantumError>;
