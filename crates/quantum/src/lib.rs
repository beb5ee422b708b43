pub mod ansatz;
pub mod error;
pub mod evaluator;
pub mod gates;
pub mod hamiltonian;
pub mod observables;
pub mod pauli;

pub use ansatz::{Ansatz, AnsatzBuilder, Circuit};
pub use error::{QuantumError, Result};
pub use evaluator::{energy, evaluate_state, expect, expect_state, reduced_density, Observable};
pub use hamiltonian::{Hamiltonian, ParameterizedHamiltonian};
pub use pauli::{Pauli, PauliString};
