use crate::error::{QuantumError, Result};
use crate::gates::C64;
use crate::pauli::{Pauli, PauliString};
use faer::Mat;
use statevec::linalg::expm;
use statevec::{DensityMatrix, StateVector};

#[derive(Clone, Debug, PartialEq)]
pub struct PauliTerm {
    pub coefficient: f64,
    pub string: PauliString,
}

/// Weighted sum of Pauli strings with numeric coefficients. Term count and
/// width are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Hamiltonian {
    num_qubits: usize,
    terms: Vec<PauliTerm>,
}

impl Hamiltonian {
    pub fn new(num_qubits: usize, terms: Vec<(f64, PauliString)>) -> Result<Self> {
        let mut out = Vec::with_capacity(terms.len());
        for (coefficient, string) in terms {
            if string.num_qubits() != num_qubits {
                return Err(QuantumError::TermWidth {
                    expected: num_qubits,
                    actual: string.num_qubits(),
                });
            }
            out.push(PauliTerm { coefficient, string });
        }
        Ok(Self {
            num_qubits,
            terms: out,
        })
    }

    /// `[(0.3, "ZZII"), (0.2, "ZIII")]`; width taken from the first label.
    pub fn from_labels(terms: &[(f64, &str)]) -> Result<Self> {
        let parsed = terms
            .iter()
            .map(|&(c, label)| Ok((c, PauliString::from_label(label)?)))
            .collect::<Result<Vec<_>>>()?;
        let n = parsed.first().map(|(_, s)| s.num_qubits()).unwrap_or(0);
        Self::new(n, parsed)
    }

    /// Σ h Z_i + Σ j Z_i Z_{i+1}
    pub fn ising(n: usize, h: f64, j: f64) -> Self {
        let mut terms = Vec::with_capacity(2 * n);
        for i in 0..n {
            let mut p = vec![Pauli::I; n];
            p[i] = Pauli::Z;
            terms.push(PauliTerm {
                coefficient: h,
                string: PauliString::new(p),
            });
        }
        for i in 0..n.saturating_sub(1) {
            let mut p = vec![Pauli::I; n];
            p[i] = Pauli::Z;
            p[i + 1] = Pauli::Z;
            terms.push(PauliTerm {
                coefficient: j,
                string: PauliString::new(p),
            });
        }
        Self {
            num_qubits: n,
            terms,
        }
    }

    /// Nearest-neighbour XX + YY + ZZ with uniform coupling.
    pub fn heisenberg(n: usize, j: f64) -> Self {
        let mut terms = Vec::with_capacity(3 * n);
        for i in 0..n.saturating_sub(1) {
            for axis in [Pauli::X, Pauli::Y, Pauli::Z] {
                let mut p = vec![Pauli::I; n];
                p[i] = axis;
                p[i + 1] = axis;
                terms.push(PauliTerm {
                    coefficient: j,
                    string: PauliString::new(p),
                });
            }
        }
        Self {
            num_qubits: n,
            terms,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.coefficient).collect()
    }

    /// ⟨ψ|H|ψ⟩ without width checks; see [`crate::evaluator::expect`].
    pub fn expectation(&self, psi: &StateVector) -> C64 {
        self.terms
            .iter()
            .fold(C64::new(0.0, 0.0), |acc, t| acc + t.string.expectation(psi) * t.coefficient)
    }

    pub fn to_matrix(&self) -> Mat<C64> {
        let dim = 1usize << self.num_qubits;
        let mut mat = Mat::<C64>::zeros(dim, dim);
        for term in &self.terms {
            term.string.accumulate_into(term.coefficient, &mut mat);
        }
        mat
    }

    /// exp(-tH) / Tr exp(-tH), with t = 1/(2 k_BT) in the thermal setting.
    pub fn gibbs_state(&self, t: f64) -> Result<DensityMatrix> {
        let h = self.to_matrix();
        let dim = h.nrows();
        let mut scaled = Mat::<C64>::zeros(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                scaled.write(i, j, h.read(i, j) * -t);
            }
        }
        let rho = DensityMatrix::from_matrix(expm(&scaled))?;
        Ok(rho.normalized())
    }
}

/// Coefficient slot of a [`ParameterizedHamiltonian`] term.
#[derive(Clone, Debug, PartialEq)]
pub enum Coefficient {
    Fixed(f64),
    /// Index into the symbol table.
    Symbol(usize),
}

/// Pauli sum whose coefficients may be named symbols, bound to numbers later.
///
/// Symbol names get their index on first use and keep it; the same symbol may
/// scale several terms.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterizedHamiltonian {
    num_qubits: usize,
    terms: Vec<(Coefficient, PauliString)>,
    symbols: Vec<String>,
}

impl ParameterizedHamiltonian {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
            symbols: Vec::new(),
        }
    }

    fn check_width(&self, s: &PauliString) -> Result<()> {
        if s.num_qubits() != self.num_qubits {
            return Err(QuantumError::TermWidth {
                expected: self.num_qubits,
                actual: s.num_qubits(),
            });
        }
        Ok(())
    }

    pub fn fixed(mut self, coefficient: f64, label: &str) -> Result<Self> {
        let s = PauliString::from_label(label)?;
        self.check_width(&s)?;
        self.terms.push((Coefficient::Fixed(coefficient), s));
        Ok(self)
    }

    pub fn symbol(mut self, name: &str, label: &str) -> Result<Self> {
        let s = PauliString::from_label(label)?;
        self.check_width(&s)?;
        let idx = match self.symbols.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                self.symbols.push(name.to_string());
                self.symbols.len() - 1
            }
        };
        self.terms.push((Coefficient::Symbol(idx), s));
        Ok(self)
    }

    /// c_zz·ZZII + c_z0·ZIII + c_z1·IZII on a 2-system + 2-ancilla register,
    /// symbols `zz`, `z0`, `z1` in that order.
    pub fn purified_zz_z() -> Result<Self> {
        Self::new(4)
            .symbol("zz", "ZZII")?
            .symbol("z0", "ZIII")?
            .symbol("z1", "IZII")
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn terms(&self) -> &[(Coefficient, PauliString)] {
        &self.terms
    }

    /// Numeric Hamiltonian for `values[i]` bound to symbol `i`.
    pub fn bind(&self, values: &[f64]) -> Result<Hamiltonian> {
        if values.len() != self.symbols.len() {
            return Err(QuantumError::DimensionMismatch {
                expected: self.symbols.len(),
                actual: values.len(),
            });
        }
        let terms = self
            .terms
            .iter()
            .map(|(c, s)| {
                let v = match c {
                    Coefficient::Fixed(v) => *v,
                    Coefficient::Symbol(i) => values[*i],
                };
                (v, s.clone())
            })
            .collect();
        Hamiltonian::new(self.num_qubits, terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ising_has_fields_then_couplings() {
        let h = Hamiltonian::ising(3, 0.5, 1.0);
        let labels: Vec<String> = h.terms().iter().map(|t| t.string.label()).collect();
        assert_eq!(labels, vec!["ZII", "IZI", "IIZ", "ZZI", "IZZ"]);
        assert_eq!(h.coefficients(), vec![0.5, 0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn from_labels_rejects_mixed_widths() {
        let err = Hamiltonian::from_labels(&[(1.0, "ZZ"), (1.0, "ZZZ")]).unwrap_err();
        assert_eq!(err, QuantumError::TermWidth { expected: 2, actual: 3 });
    }

    #[test]
    fn gibbs_state_of_diagonal_hamiltonian() {
        let h = Hamiltonian::from_labels(&[(0.3, "ZZ"), (0.2, "ZI"), (0.5, "IZ")]).unwrap();
        let t = 0.5;
        let rho = h.gibbs_state(t).unwrap();

        let energies = [1.0, -0.6, 0.0, -0.4];
        let weights: Vec<f64> = energies.iter().map(|e: &f64| (-t * e).exp()).collect();
        let z: f64 = weights.iter().sum();
        for (i, w) in weights.iter().enumerate() {
            assert_abs_diff_eq!(rho.get(i, i).re, w / z, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(rho.trace().re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn gibbs_state_at_zero_time_is_maximally_mixed() {
        let rho = Hamiltonian::heisenberg(2, 1.0).gibbs_state(0.0).unwrap();
        for i in 0..4 {
            assert_abs_diff_eq!(rho.get(i, i).re, 0.25, epsilon = 1e-14);
        }
    }

    #[test]
    fn expectation_matches_dense_matrix() {
        let h = Hamiltonian::heisenberg(2, 0.7);
        let amps: Vec<C64> = (0..4).map(|i| C64::new(0.5, 0.1 * i as f64)).collect();
        let psi = StateVector::from_amplitudes(amps).unwrap();
        let m = h.to_matrix();
        let mut dense = C64::new(0.0, 0.0);
        for r in 0..4 {
            for c in 0..4 {
                dense += psi.amps[r].conj() * m.read(r, c) * psi.amps[c];
            }
        }
        assert_abs_diff_eq!((dense - h.expectation(&psi)).norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn parameterized_binding() {
        let ph = ParameterizedHamiltonian::new(2)
            .symbol("j", "ZZ")
            .unwrap()
            .fixed(0.1, "XI")
            .unwrap()
            .symbol("h", "IZ")
            .unwrap()
            .symbol("j", "XX")
            .unwrap();
        assert_eq!(ph.symbols(), &["j".to_string(), "h".to_string()]);

        let h = ph.bind(&[2.0, -1.0]).unwrap();
        assert_eq!(h.coefficients(), vec![2.0, 0.1, -1.0, 2.0]);

        assert_eq!(
            ph.bind(&[1.0]).unwrap_err(),
            QuantumError::DimensionMismatch { expected: 2, actual: 1 }
        );
    }

    #[test]
    fn purified_family_acts_on_system_qubits() {
        let ph = ParameterizedHamiltonian::purified_zz_z().unwrap();
        assert_eq!(ph.num_qubits(), 4);
        assert_eq!(ph.symbols(), &["zz".to_string(), "z0".to_string(), "z1".to_string()]);
        let h = ph.bind(&[0.3, 0.2, 0.5]).unwrap();
        // |0110⟩: system qubits 0,1 in |01⟩, ancillas ignored
        let mut amps = vec![C64::new(0.0, 0.0); 16];
        amps[0b0110] = C64::new(1.0, 0.0);
        let psi = StateVector::from_amplitudes(amps).unwrap();
        assert_abs_diff_eq!(h.expectation(&psi).re, -0.3 + 0.2 - 0.5, epsilon = 1e-14);
    }
}
