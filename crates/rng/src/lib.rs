//! Deterministic SHAKE256 ratchet used to draw reproducible parameter vectors.
//!
//! The same seed always yields the same sequence on every platform, which is
//! what the property sweeps over random θ rely on.

use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};
use std::f64::consts::PI;

pub struct ShakeRng {
    state: [u8; 32],
    counter: u64,
}

impl ShakeRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"VARQITE_SEED"], &mut state);
        Self { state, counter: 0 }
    }

    /// Seed derived from `"{label}-{index}"`, handy for per-case streams in loops.
    pub fn labeled(label: &str, index: usize) -> Self {
        Self::new(format!("{}-{}", label, index).as_bytes())
    }

    /// Uniform in [0, 1) with 53 bits of resolution.
    pub fn next_f64(&mut self) -> f64 {
        self.counter += 1;

        let prev = self.state;
        shake(&[&prev, &self.counter.to_be_bytes(), b"STEP"], &mut self.state);

        let mut out = [0u8; 8];
        shake(&[&self.state, b"OUT"], &mut out);
        (u64::from_be_bytes(out) >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Rotation angle in [-π, π).
    pub fn angle(&mut self) -> f64 {
        self.uniform(-PI, PI)
    }

    pub fn angles(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.angle()).collect()
    }

    /// Strictly positive probability vector of length `n` summing to one.
    pub fn distribution(&mut self, n: usize) -> Vec<f64> {
        let raw: Vec<f64> = (0..n).map(|_| 0.05 + self.next_f64()).collect();
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}
