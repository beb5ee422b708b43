//! Explicit-Euler variational imaginary-time evolution.
//!
//! Each step evaluates the energy gradient and the metric tensor at the
//! current θ, solves for the natural gradient and moves θ ← θ − Δ·x. The new θ
//! replaces the old one as a whole; nothing outside a step sees a partial
//! update.

use crate::config::{StepRule, VarQiteConfig};
use crate::error::Result;
use crate::grad::gradient;
use crate::natural::natural_gradient;
use crate::qfi::metric_tensor;
use quantum::{expect, Ansatz, Hamiltonian, QuantumError};
use tracing::{debug, info};

/// Evenly spaced imaginary-time points from 0 to `total_time`, inclusive, and
/// the one step size every Euler update uses.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
    step: f64,
    rule: StepRule,
}

impl TimeGrid {
    pub fn new(total_time: f64, num_points: usize, rule: StepRule) -> Self {
        let points: Vec<f64> = match num_points {
            0 => Vec::new(),
            1 => vec![0.0],
            n => (0..n).map(|i| total_time * i as f64 / (n - 1) as f64).collect(),
        };
        let step = match (rule, num_points) {
            (_, 0) => 0.0,
            (StepRule::ReferenceDivisor, n) => total_time / n as f64,
            (StepRule::GridSpacing, 1) => 0.0,
            (StepRule::GridSpacing, n) => total_time / (n - 1) as f64,
        };
        Self { points, step, rule }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of Euler updates: one per pair of consecutive points.
    pub fn num_steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn rule(&self) -> StepRule {
        self.rule
    }

    pub fn total_time(&self) -> f64 {
        self.points.last().copied().unwrap_or(0.0)
    }

    /// Distance between consecutive points.
    pub fn spacing(&self) -> f64 {
        match self.points.len() {
            0 | 1 => 0.0,
            n => self.total_time() / (n - 1) as f64,
        }
    }
}

/// One Euler update, measured before θ moves.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub time: f64,
    pub energy: f64,
    pub grad_norm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evolution {
    pub theta: Vec<f64>,
    pub final_energy: f64,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone)]
pub struct VarQite {
    regularization: f64,
    parallel: bool,
}

impl VarQite {
    pub fn new(config: &VarQiteConfig) -> Self {
        Self {
            regularization: config.regularization,
            parallel: config.parallel,
        }
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Propagates `theta_init` over every interval of `grid`.
    pub fn propagate(
        &self,
        hamiltonian: &Hamiltonian,
        ansatz: &Ansatz,
        theta_init: &[f64],
        grid: &TimeGrid,
    ) -> Result<Evolution> {
        if theta_init.len() != ansatz.num_parameters() {
            return Err(QuantumError::DimensionMismatch {
                expected: ansatz.num_parameters(),
                actual: theta_init.len(),
            }
            .into());
        }
        if (grid.step() - grid.spacing()).abs() > f64::EPSILON * grid.total_time().max(1.0) {
            debug!(
                step = grid.step(),
                spacing = grid.spacing(),
                rule = ?grid.rule(),
                "Euler step differs from grid spacing"
            );
        }

        let dt = grid.step();
        let mut theta = theta_init.to_vec();
        let mut steps = Vec::with_capacity(grid.num_steps());

        for (i, window) in grid.points().windows(2).enumerate() {
            let energy = expect(hamiltonian, ansatz, &theta)?.re;
            let g = gradient(hamiltonian, ansatz, &theta, self.parallel)?;
            let m = metric_tensor(ansatz, &theta, self.parallel)?;
            let x = natural_gradient(&g, &m, self.regularization)?;
            let grad_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();

            debug!(step = i, time = window[0], energy, grad_norm, "VarQITE step");

            theta = theta.iter().zip(x.iter()).map(|(t, d)| t - dt * d).collect();
            steps.push(StepRecord {
                step: i,
                time: window[0],
                energy,
                grad_norm,
            });
        }

        let final_energy = expect(hamiltonian, ansatz, &theta)?.re;
        info!(
            steps = steps.len(),
            total_time = grid.total_time(),
            final_energy,
            "VarQITE propagation finished"
        );
        Ok(Evolution {
            theta,
            final_energy,
            steps,
        })
    }
}
