use crate::error::{Result, StateError};
use crate::linalg::{matmul, nuclear_norm, psd_sqrt};
use crate::state::{scatter_bits, split_subsystem, StateVector, C64};
use faer::Mat;

/// Density matrix over `num_qubits` qubits, same bit ordering as [`StateVector`].
#[derive(Clone, Debug)]
pub struct DensityMatrix {
    mat: Mat<C64>,
    num_qubits: usize,
}

impl DensityMatrix {
    pub(crate) fn from_parts(mat: Mat<C64>, num_qubits: usize) -> Self {
        Self { mat, num_qubits }
    }

    /// Wraps a square matrix whose side is a power of two. No normalization.
    pub fn from_matrix(mat: Mat<C64>) -> Result<Self> {
        let dim = mat.nrows();
        if mat.ncols() != dim {
            return Err(StateError::DimensionMismatch {
                expected: dim,
                actual: mat.ncols(),
            });
        }
        if dim == 0 || !dim.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension: dim });
        }
        Ok(Self::from_parts(mat, dim.trailing_zeros() as usize))
    }

    /// |ψ⟩⟨ψ|
    pub fn from_pure(psi: &StateVector) -> Self {
        let dim = psi.dim();
        let mut mat = Mat::<C64>::zeros(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                mat.write(i, j, psi.amps[i] * psi.amps[j].conj());
            }
        }
        Self::from_parts(mat, psi.num_qubits)
    }

    /// Classical mixture diag(p).
    pub fn from_diagonal(probs: &[f64]) -> Result<Self> {
        let dim = probs.len();
        let mut mat = Mat::<C64>::zeros(dim, dim);
        for (i, &p) in probs.iter().enumerate() {
            mat.write(i, i, C64::new(p, 0.0));
        }
        Self::from_matrix(mat)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dim(&self) -> usize {
        self.mat.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> C64 {
        self.mat.read(i, j)
    }

    pub fn matrix(&self) -> &Mat<C64> {
        &self.mat
    }

    pub fn trace(&self) -> C64 {
        (0..self.dim()).fold(C64::new(0.0, 0.0), |acc, i| acc + self.mat.read(i, i))
    }

    /// Real part of the diagonal.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.dim()).map(|i| self.mat.read(i, i).re).collect()
    }

    /// Rescales to unit trace.
    pub fn normalized(&self) -> Self {
        let tr = self.trace();
        let dim = self.dim();
        let mut mat = Mat::<C64>::zeros(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                mat.write(i, j, self.mat.read(i, j) / tr);
            }
        }
        Self::from_parts(mat, self.num_qubits)
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        let dim = self.dim();
        (0..dim).all(|i| (0..dim).all(|j| (self.mat.read(i, j) - self.mat.read(j, i).conj()).norm() <= tol))
    }

    /// Traces out the listed qubits.
    pub fn partial_trace(&self, traced_out: &[usize]) -> Result<Self> {
        let n = self.num_qubits;
        let (kept, env) = split_subsystem(n, traced_out)?;
        let dk = 1usize << kept.len();
        let de = 1usize << env.len();

        let kept_offsets: Vec<usize> = (0..dk).map(|a| scatter_bits(&kept, a, n)).collect();
        let mut out = Mat::<C64>::zeros(dk, dk);

        for e in 0..de {
            let base = scatter_bits(&env, e, n);
            for a in 0..dk {
                for b in 0..dk {
                    let v = self.mat.read(base | kept_offsets[a], base | kept_offsets[b]);
                    let cur = out.read(a, b);
                    out.write(a, b, cur + v);
                }
            }
        }

        Ok(Self::from_parts(out, kept.len()))
    }

    /// Uhlmann fidelity (Tr √(√ρ σ √ρ))², computed as ‖√ρ √σ‖_*².
    pub fn fidelity(&self, other: &DensityMatrix) -> Result<f64> {
        if self.dim() != other.dim() {
            return Err(StateError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        let s1 = psd_sqrt(&self.mat);
        let s2 = psd_sqrt(&other.mat);
        let nuc = nuclear_norm(&matmul(&s1, &s2));
        Ok(nuc * nuc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identical_states_have_unit_fidelity() {
        let rho = DensityMatrix::from_diagonal(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_abs_diff_eq!(rho.fidelity(&rho).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn orthogonal_states_have_zero_fidelity() {
        let a = DensityMatrix::from_diagonal(&[1.0, 0.0]).unwrap();
        let b = DensityMatrix::from_diagonal(&[0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(a.fidelity(&b).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn diagonal_fidelity_is_bhattacharyya_squared() {
        let p = [0.25, 0.25, 0.25, 0.25];
        let q = [0.1452, 0.3231, 0.2394, 0.2923];
        let a = DensityMatrix::from_diagonal(&p).unwrap();
        let b = DensityMatrix::from_diagonal(&q).unwrap();
        let bc: f64 = p.iter().zip(q.iter()).map(|(x, y)| (x * y).sqrt()).sum();
        assert_abs_diff_eq!(a.fidelity(&b).unwrap(), bc * bc, epsilon = 1e-9);
    }

    #[test]
    fn pure_state_fidelity_is_overlap_squared() {
        let s = 1.0 / 2.0_f64.sqrt();
        let plus = StateVector::from_amplitudes(vec![C64::new(s, 0.0), C64::new(s, 0.0)]).unwrap();
        let zero = StateVector::new_zero(1);
        let f = DensityMatrix::from_pure(&plus)
            .fidelity(&DensityMatrix::from_pure(&zero))
            .unwrap();
        assert_abs_diff_eq!(f, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn partial_trace_of_product_state() {
        // |0⟩⊗|+⟩⊗|1⟩
        let s = 1.0 / 2.0_f64.sqrt();
        let mut amps = vec![C64::new(0.0, 0.0); 8];
        amps[0b001] = C64::new(s, 0.0);
        amps[0b011] = C64::new(s, 0.0);
        let psi = StateVector::from_amplitudes(amps).unwrap();
        let rho = DensityMatrix::from_pure(&psi);

        let middle = rho.partial_trace(&[0, 2]).unwrap();
        assert_eq!(middle.num_qubits(), 1);
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(middle.get(i, j).re, 0.5, epsilon = 1e-12);
            }
        }

        let outer = rho.partial_trace(&[1]).unwrap();
        assert_abs_diff_eq!(outer.get(0b01, 0b01).re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(outer.trace().re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reduced_density_matches_partial_trace() {
        let amps: Vec<C64> = (0..8)
            .map(|i| C64::new((i as f64 + 1.0).sqrt(), 0.1 * i as f64))
            .collect();
        let norm: f64 = amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        let psi = StateVector::from_amplitudes(amps.iter().map(|a| *a / norm).collect()).unwrap();

        let direct = psi.reduced_density(&[1]).unwrap();
        let via_full = DensityMatrix::from_pure(&psi).partial_trace(&[1]).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!((direct.get(i, j) - via_full.get(i, j)).norm(), 0.0, epsilon = 1e-12);
            }
        }
        assert!(direct.is_hermitian(1e-12));
    }

    #[test]
    fn fidelity_rejects_mismatched_sizes() {
        let a = DensityMatrix::from_diagonal(&[1.0, 0.0]).unwrap();
        let b = DensityMatrix::from_diagonal(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(a.fidelity(&b).is_err());
    }
}
