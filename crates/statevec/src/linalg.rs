//! Small dense linear-algebra kernels on top of `faer`.
//!
//! Matrices here are at most a few hundred entries wide (2^n for a handful of
//! qubits, or |θ| for the metric tensor), so products are plain loops and the
//! heavy lifting (SVD) is delegated to `faer`.

use crate::error::{Result, StateError};
use crate::state::C64;
use faer::Mat;

pub fn identity(n: usize) -> Mat<C64> {
    let mut out = Mat::<C64>::zeros(n, n);
    for i in 0..n {
        out.write(i, i, C64::new(1.0, 0.0));
    }
    out
}

pub fn matmul(a: &Mat<C64>, b: &Mat<C64>) -> Mat<C64> {
    assert_eq!(a.ncols(), b.nrows(), "matmul shape mismatch");
    let mut out = Mat::<C64>::zeros(a.nrows(), b.ncols());
    for i in 0..a.nrows() {
        for k in 0..a.ncols() {
            let aik = a.read(i, k);
            if aik == C64::new(0.0, 0.0) {
                continue;
            }
            for j in 0..b.ncols() {
                let cur = out.read(i, j);
                out.write(i, j, cur + aik * b.read(k, j));
            }
        }
    }
    out
}

fn scaled(a: &Mat<C64>, c: C64) -> Mat<C64> {
    let mut out = Mat::<C64>::zeros(a.nrows(), a.ncols());
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            out.write(i, j, a.read(i, j) * c);
        }
    }
    out
}

fn add_assign(acc: &mut Mat<C64>, b: &Mat<C64>) {
    for i in 0..acc.nrows() {
        for j in 0..acc.ncols() {
            let cur = acc.read(i, j);
            acc.write(i, j, cur + b.read(i, j));
        }
    }
}

/// Max absolute row sum.
fn norm_inf(a: &Mat<C64>) -> f64 {
    (0..a.nrows())
        .map(|i| (0..a.ncols()).map(|j| a.read(i, j).norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

const TAYLOR_TERMS: usize = 18;

/// Matrix exponential by scaling and squaring with a truncated Taylor series.
pub fn expm(a: &Mat<C64>) -> Mat<C64> {
    let n = a.nrows();
    let norm = norm_inf(a);

    let mut squarings = 0u32;
    let mut scale = 1.0;
    while norm * scale > 0.5 {
        scale *= 0.5;
        squarings += 1;
    }
    let x = scaled(a, C64::new(scale, 0.0));

    let mut result = identity(n);
    let mut term = identity(n);
    for k in 1..=TAYLOR_TERMS {
        term = scaled(&matmul(&term, &x), C64::new(1.0 / k as f64, 0.0));
        add_assign(&mut result, &term);
    }

    for _ in 0..squarings {
        result = matmul(&result, &result);
    }
    result
}

/// Principal square root of a positive-semidefinite Hermitian matrix.
pub fn psd_sqrt(a: &Mat<C64>) -> Mat<C64> {
    let n = a.nrows();
    let svd = a.thin_svd();
    let s = svd.s_diagonal();
    let u = svd.u();

    let mut out = Mat::<C64>::zeros(n, n);
    for k in 0..s.nrows() {
        let sk = s.read(k).re;
        if sk <= 0.0 {
            continue;
        }
        let r = sk.sqrt();
        for i in 0..n {
            let ui = u.read(i, k) * r;
            for j in 0..n {
                let cur = out.read(i, j);
                out.write(i, j, cur + ui * u.read(j, k).conj());
            }
        }
    }
    out
}

/// Sum of singular values.
pub fn nuclear_norm(a: &Mat<C64>) -> f64 {
    let svd = a.thin_svd();
    let s = svd.s_diagonal();
    (0..s.nrows()).map(|i| s.read(i).re).sum()
}

/// Minimum-norm least-squares solution of `a x = b`.
///
/// Uses the SVD pseudo-inverse; singular values at or below
/// `eps * max(rows, cols) * σ_max` are treated as zero.
pub fn lstsq(a: &Mat<f64>, b: &[f64]) -> Result<Vec<f64>> {
    let (m, n) = (a.nrows(), a.ncols());
    if b.len() != m {
        return Err(StateError::DimensionMismatch {
            expected: m,
            actual: b.len(),
        });
    }
    let mut x = vec![0.0; n];
    if m == 0 || n == 0 {
        return Ok(x);
    }

    let svd = a.thin_svd();
    let s = svd.s_diagonal();
    let u = svd.u();
    let v = svd.v();

    let mut s_max = 0.0f64;
    for i in 0..s.nrows() {
        s_max = s_max.max(s.read(i));
    }
    let cutoff = f64::EPSILON * (m.max(n) as f64) * s_max;

    for i in 0..s.nrows() {
        let si = s.read(i);
        if si <= cutoff {
            continue;
        }
        let mut coeff = 0.0;
        for r in 0..m {
            coeff += u.read(r, i) * b[r];
        }
        coeff /= si;
        for c in 0..n {
            x[c] += v.read(c, i) * coeff;
        }
    }
    Ok(x)
}
