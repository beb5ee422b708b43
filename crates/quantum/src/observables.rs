use crate::pauli::{Pauli, PauliString};
use statevec::StateVector;

fn expect_paulis(psi: &StateVector, factors: &[(usize, Pauli)]) -> f64 {
    let mut paulis = vec![Pauli::I; psi.num_qubits];
    for &(q, p) in factors {
        assert!(q < psi.num_qubits, "qubit {} out of range", q);
        paulis[q] = p;
    }
    PauliString::new(paulis).expectation(psi).re
}

pub fn expect_z(psi: &StateVector, k: usize) -> f64 {
    expect_paulis(psi, &[(k, Pauli::Z)])
}

pub fn expect_x(psi: &StateVector, k: usize) -> f64 {
    expect_paulis(psi, &[(k, Pauli::X)])
}

pub fn expect_zz(psi: &StateVector, i: usize, j: usize) -> f64 {
    assert!(i != j, "expect_zz needs two distinct qubits");
    expect_paulis(psi, &[(i, Pauli::Z), (j, Pauli::Z)])
}

/// ⟨Z_k⟩ for every qubit, from the computational-basis probabilities.
pub fn z_profile(psi: &StateVector) -> Vec<f64> {
    let n = psi.num_qubits;
    let probs = psi.probabilities();
    (0..n)
        .map(|q| {
            let mask = 1usize << (n - 1 - q);
            probs
                .iter()
                .enumerate()
                .map(|(i, p)| if i & mask == 0 { *p } else { -*p })
                .sum()
        })
        .collect()
}
