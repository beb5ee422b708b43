use crate::error::{QuantumError, Result};
use crate::gates::{identity, pauli_x, pauli_y, pauli_z, Gate1, C64};
use faer::Mat;
use statevec::StateVector;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    pub fn label(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    pub fn matrix(self) -> Gate1 {
        match self {
            Pauli::I => identity(),
            Pauli::X => pauli_x(),
            Pauli::Y => pauli_y(),
            Pauli::Z => pauli_z(),
        }
    }
}

/// Tensor product P_0 ⊗ P_1 ⊗ ... ⊗ P_{n-1}; index = qubit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    pub fn new(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    /// Parses labels such as `"ZZII"`; the first character acts on qubit 0.
    pub fn from_label(label: &str) -> Result<Self> {
        let paulis = label
            .chars()
            .map(Pauli::from_char)
            .collect::<Option<Vec<_>>>()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| QuantumError::InvalidPauliLabel {
                label: label.to_string(),
            })?;
        Ok(Self::new(paulis))
    }

    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    pub fn get(&self, q: usize) -> Pauli {
        self.paulis[q]
    }

    pub fn label(&self) -> String {
        self.paulis.iter().map(|p| p.label()).collect()
    }

    /// (flip mask, sign mask, number of Y factors) in basis-index bit positions.
    fn masks(&self) -> (usize, usize, usize) {
        let n = self.num_qubits();
        let mut x_mask = 0usize;
        let mut z_mask = 0usize;
        let mut num_y = 0usize;
        for (q, &p) in self.paulis.iter().enumerate() {
            let bit = 1usize << (n - 1 - q);
            match p {
                Pauli::I => {}
                Pauli::X => x_mask |= bit,
                Pauli::Z => z_mask |= bit,
                Pauli::Y => {
                    x_mask |= bit;
                    z_mask |= bit;
                    num_y += 1;
                }
            }
        }
        (x_mask, z_mask, num_y)
    }

    /// P|i⟩ = phase(i) |i ⊕ x_mask⟩ with Y = i·X·Z per factor.
    fn phases(&self) -> (usize, impl Fn(usize) -> C64) {
        let (x_mask, z_mask, num_y) = self.masks();
        let base = match num_y % 4 {
            0 => C64::new(1.0, 0.0),
            1 => C64::new(0.0, 1.0),
            2 => C64::new(-1.0, 0.0),
            _ => C64::new(0.0, -1.0),
        };
        let phase = move |i: usize| {
            if (i & z_mask).count_ones() % 2 == 1 {
                -base
            } else {
                base
            }
        };
        (x_mask, phase)
    }

    /// P|ψ⟩. Panics if widths differ; callers check widths first.
    pub fn apply(&self, psi: &StateVector) -> StateVector {
        assert_eq!(self.num_qubits(), psi.num_qubits, "Pauli width mismatch");
        let (x_mask, phase) = self.phases();
        let mut amps = vec![C64::new(0.0, 0.0); psi.dim()];
        for (i, &a) in psi.amps.iter().enumerate() {
            amps[i ^ x_mask] = phase(i) * a;
        }
        StateVector {
            amps,
            num_qubits: psi.num_qubits,
        }
    }

    /// ⟨ψ|P|ψ⟩
    pub fn expectation(&self, psi: &StateVector) -> C64 {
        assert_eq!(self.num_qubits(), psi.num_qubits, "Pauli width mismatch");
        let (x_mask, phase) = self.phases();
        let mut acc = C64::new(0.0, 0.0);
        for (i, &a) in psi.amps.iter().enumerate() {
            acc += psi.amps[i ^ x_mask].conj() * phase(i) * a;
        }
        acc
    }

    /// Adds `coefficient · P` into a dense 2^n × 2^n matrix.
    pub fn accumulate_into(&self, coefficient: f64, mat: &mut Mat<C64>) {
        let (x_mask, phase) = self.phases();
        for i in 0..mat.ncols() {
            let row = i ^ x_mask;
            let cur = mat.read(row, i);
            mat.write(row, i, cur + phase(i) * coefficient);
        }
    }
}

impl FromStr for PauliString {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
