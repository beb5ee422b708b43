//! Error types for the imaginary-time engine and the Gibbs trainer.
//!
//! ```text
//! VarQiteError
//! ├── Quantum      (template binding, observable width, simulator)
//! └── Config       (validation / file loading)
//! ```

use quantum::QuantumError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VarQiteError>;

#[derive(Debug, Error)]
pub enum VarQiteError {
    #[error("Quantum evaluation failed: {0}")]
    Quantum(#[from] QuantumError),

    /// The regularized metric solve produced no usable direction.
    #[error("Singular metric tensor: {reason}")]
    SingularMetricTensor { reason: String },

    /// Model probability that would enter a logarithm is zero or negative.
    #[error("Non-positive model probability {value} at index {index}")]
    NonPositiveProbability { index: usize, value: f64 },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<statevec::StateError> for VarQiteError {
    fn from(err: statevec::StateError) -> Self {
        VarQiteError::Quantum(QuantumError::State(err))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Cannot read config file `{path}`: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write config file `{path}`: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Cannot parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
