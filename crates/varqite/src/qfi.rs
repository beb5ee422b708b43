//! Metric tensor from a four-term parameter-shift stencil on state overlaps.
//!
//! Entry (k, l) is
//!
//! M_kl = ¼ Σ_{s_k, s_l = ±π/2} w(s_k, s_l) · Re⟨ψ(θ)|ψ(θ + s_k e_k + s_l e_l)⟩
//!
//! with w = +1 when the two shifts have the same sign and −1 otherwise. The bra
//! is always the unshifted state. Shifts add, so on the diagonal the parameter
//! moves by ±π or not at all; the ±π terms cancel for Pauli rotations and every
//! diagonal entry is exactly −½. This sign and scale is what the natural
//! gradient solve expects and is not rescaled to the textbook QFI.

use crate::error::Result;
use faer::Mat;
use quantum::{evaluate_state, Ansatz, QuantumError};
use rayon::prelude::*;
use statevec::StateVector;
use std::f64::consts::FRAC_PI_2;

/// (sign of k shift, sign of l shift, weight)
pub const STENCIL: [(f64, f64, f64); 4] = [
    (1.0, 1.0, 0.25),
    (1.0, -1.0, -0.25),
    (-1.0, 1.0, -0.25),
    (-1.0, -1.0, 0.25),
];

fn entry(ansatz: &Ansatz, theta: &[f64], psi: &StateVector, k: usize, l: usize) -> Result<f64> {
    let mut acc = 0.0;
    for &(sk, sl, w) in STENCIL.iter() {
        let mut shifted = theta.to_vec();
        shifted[k] += sk * FRAC_PI_2;
        shifted[l] += sl * FRAC_PI_2;
        let phi = evaluate_state(ansatz, &shifted)?;
        acc += w * psi.inner(&phi).re;
    }
    Ok(acc)
}

/// |θ| × |θ| real metric, every ordered pair computed independently.
///
/// Costs 4·|θ|² state evaluations plus one for the reference state.
pub fn metric_tensor(ansatz: &Ansatz, theta: &[f64], parallel: bool) -> Result<Mat<f64>> {
    let n = theta.len();
    if n != ansatz.num_parameters() {
        return Err(QuantumError::DimensionMismatch {
            expected: ansatz.num_parameters(),
            actual: n,
        }
        .into());
    }
    let psi = evaluate_state(ansatz, theta)?;

    let values: Vec<f64> = if parallel {
        (0..n * n)
            .into_par_iter()
            .map(|idx| entry(ansatz, theta, &psi, idx / n, idx % n))
            .collect::<Result<_>>()?
    } else {
        (0..n * n)
            .map(|idx| entry(ansatz, theta, &psi, idx / n, idx % n))
            .collect::<Result<_>>()?
    };

    let mut m = Mat::<f64>::zeros(n, n);
    for (idx, v) in values.into_iter().enumerate() {
        m.write(idx / n, idx % n, v);
    }
    Ok(m)
}
