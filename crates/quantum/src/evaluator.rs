//! State and expectation evaluation over an [`Ansatz`].
//!
//! Everything here is a pure function of (template, θ): no caching and no
//! randomness, so repeated calls with the same θ give identical results.

use crate::ansatz::Ansatz;
use crate::error::{QuantumError, Result};
use crate::gates::C64;
use crate::hamiltonian::Hamiltonian;
use crate::pauli::PauliString;
use statevec::{DensityMatrix, StateVector};

/// Anything with a fixed register width and a pure-state expectation value.
pub trait Observable {
    fn num_qubits(&self) -> usize;

    /// ⟨ψ|O|ψ⟩; widths are checked by the caller.
    fn expectation_unchecked(&self, psi: &StateVector) -> C64;
}

impl Observable for Hamiltonian {
    fn num_qubits(&self) -> usize {
        Hamiltonian::num_qubits(self)
    }

    fn expectation_unchecked(&self, psi: &StateVector) -> C64 {
        self.expectation(psi)
    }
}

impl Observable for PauliString {
    fn num_qubits(&self) -> usize {
        PauliString::num_qubits(self)
    }

    fn expectation_unchecked(&self, psi: &StateVector) -> C64 {
        self.expectation(psi)
    }
}

/// |ψ(θ)⟩ produced by the template from |0...0⟩.
pub fn evaluate_state(ansatz: &Ansatz, theta: &[f64]) -> Result<StateVector> {
    Ok(ansatz.bind(theta)?.run())
}

/// Density matrix of the qubits not listed in `traced_out`.
pub fn reduced_density(state: &StateVector, traced_out: &[usize]) -> Result<DensityMatrix> {
    Ok(state.reduced_density(traced_out)?)
}

/// ⟨ψ|O|ψ⟩ for an already simulated state.
pub fn expect_state<O: Observable + ?Sized>(observable: &O, psi: &StateVector) -> Result<C64> {
    if observable.num_qubits() != psi.num_qubits {
        return Err(QuantumError::InvalidObservable {
            observable_qubits: observable.num_qubits(),
            state_qubits: psi.num_qubits,
        });
    }
    Ok(observable.expectation_unchecked(psi))
}

/// ⟨ψ(θ)|O|ψ(θ)⟩. The imaginary part vanishes for Hermitian `O`; callers take `.re`.
pub fn expect<O: Observable + ?Sized>(observable: &O, ansatz: &Ansatz, theta: &[f64]) -> Result<C64> {
    if observable.num_qubits() != ansatz.num_qubits() {
        return Err(QuantumError::InvalidObservable {
            observable_qubits: observable.num_qubits(),
            state_qubits: ansatz.num_qubits(),
        });
    }
    let psi = evaluate_state(ansatz, theta)?;
    Ok(observable.expectation_unchecked(&psi))
}

/// Real part of ⟨ψ(θ)|H|ψ(θ)⟩.
pub fn energy(h: &Hamiltonian, ansatz: &Ansatz, theta: &[f64]) -> Result<f64> {
    Ok(expect(h, ansatz, theta)?.re)
}
