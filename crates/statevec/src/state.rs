use crate::density::DensityMatrix;
use crate::error::{Result, StateError};
use faer::Mat;
use num_complex::Complex64;

pub type C64 = Complex64;

/// Dense pure state over `num_qubits` qubits.
///
/// Qubit 0 is the leftmost tensor factor, i.e. the most significant bit of a
/// basis index.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    pub amps: Vec<C64>,
    pub num_qubits: usize,
}

impl StateVector {
    /// |0...0>
    pub fn new_zero(n: usize) -> Self {
        let mut amps = vec![C64::new(0.0, 0.0); 1 << n];
        amps[0] = C64::new(1.0, 0.0);
        Self { amps, num_qubits: n }
    }

    pub fn from_amplitudes(amps: Vec<C64>) -> Result<Self> {
        let dim = amps.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension: dim });
        }
        Ok(Self {
            num_qubits: dim.trailing_zeros() as usize,
            amps,
        })
    }

    pub fn dim(&self) -> usize {
        self.amps.len()
    }

    #[inline]
    fn shift(&self, q: usize) -> usize {
        self.num_qubits - 1 - q
    }

    pub fn apply_1q(&mut self, k: usize, u: [[C64; 2]; 2]) {
        assert!(k < self.num_qubits, "qubit {} out of range", k);
        let mask = 1usize << self.shift(k);

        for i in 0..self.dim() {
            if i & mask != 0 {
                continue;
            }
            let j = i | mask;
            let a = self.amps[i];
            let b = self.amps[j];
            self.amps[i] = u[0][0] * a + u[0][1] * b;
            self.amps[j] = u[1][0] * a + u[1][1] * b;
        }
    }

    /// Applies a 4x4 gate in the basis |q_a q_b>, q_a being the high bit.
    pub fn apply_2q(&mut self, a: usize, b: usize, u: [[C64; 4]; 4]) {
        assert!(
            a < self.num_qubits && b < self.num_qubits && a != b,
            "invalid qubit pair ({}, {})",
            a,
            b
        );
        let ma = 1usize << self.shift(a);
        let mb = 1usize << self.shift(b);

        for i in 0..self.dim() {
            if i & (ma | mb) != 0 {
                continue;
            }
            let idx = [i, i | mb, i | ma, i | ma | mb];
            let v = [
                self.amps[idx[0]],
                self.amps[idx[1]],
                self.amps[idx[2]],
                self.amps[idx[3]],
            ];
            for (row, &target) in idx.iter().enumerate() {
                let mut acc = C64::new(0.0, 0.0);
                for col in 0..4 {
                    acc += u[row][col] * v[col];
                }
                self.amps[target] = acc;
            }
        }
    }

    /// ⟨self|other⟩
    pub fn inner(&self, other: &StateVector) -> C64 {
        assert_eq!(self.dim(), other.dim(), "state dimension mismatch");
        self.amps
            .iter()
            .zip(other.amps.iter())
            .fold(C64::new(0.0, 0.0), |acc, (a, b)| acc + a.conj() * b)
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Computational-basis probabilities |ψ_i|².
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Density matrix of the qubits not listed in `traced_out`.
    pub fn reduced_density(&self, traced_out: &[usize]) -> Result<DensityMatrix> {
        let (kept, env) = split_subsystem(self.num_qubits, traced_out)?;
        let n = self.num_qubits;
        let dk = 1usize << kept.len();
        let de = 1usize << env.len();

        let kept_offsets: Vec<usize> = (0..dk).map(|a| scatter_bits(&kept, a, n)).collect();
        let mut rho = Mat::<C64>::zeros(dk, dk);

        for e in 0..de {
            let base = scatter_bits(&env, e, n);
            for a in 0..dk {
                let va = self.amps[base | kept_offsets[a]];
                if va == C64::new(0.0, 0.0) {
                    continue;
                }
                for b in 0..dk {
                    let vb = self.amps[base | kept_offsets[b]];
                    let cur = rho.read(a, b);
                    rho.write(a, b, cur + va * vb.conj());
                }
            }
        }

        Ok(DensityMatrix::from_parts(rho, kept.len()))
    }
}

/// Splits `0..n` into (kept, traced) qubit lists, both ascending.
pub(crate) fn split_subsystem(n: usize, traced_out: &[usize]) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut traced = vec![false; n];
    for &q in traced_out {
        if q >= n {
            return Err(StateError::InvalidQubitIndex {
                index: q,
                num_qubits: n,
            });
        }
        if traced[q] {
            return Err(StateError::DuplicateQubit { index: q });
        }
        traced[q] = true;
    }

    let kept = (0..n).filter(|&q| !traced[q]).collect();
    let env = (0..n).filter(|&q| traced[q]).collect();
    Ok((kept, env))
}

/// Places the bits of `local` (first listed qubit = high bit) onto their
/// positions in an `n`-qubit basis index.
pub(crate) fn scatter_bits(qubits: &[usize], local: usize, n: usize) -> usize {
    let m = qubits.len();
    let mut out = 0usize;
    for (pos, &q) in qubits.iter().enumerate() {
        let bit = (local >> (m - 1 - pos)) & 1;
        out |= bit << (n - 1 - q);
    }
    out
}
