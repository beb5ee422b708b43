//! Derivative-free minimization of scalar objectives.
//!
//! The objective is fallible: an `Err` from it aborts the search and is
//! returned unchanged.

use crate::config::NelderMeadConfig;
use crate::error::Result;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Simplex diameter fell below the tolerance.
    Converged,
    MaxIterations,
}

/// Best point after each iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationStep {
    pub iteration: usize,
    pub parameters: Vec<f64>,
    pub value: f64,
    pub simplex_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub parameters: Vec<f64>,
    pub value: f64,
    pub status: ConvergenceStatus,
    pub num_iterations: usize,
    /// Every objective value in call order.
    pub evaluations: Vec<f64>,
    pub history: Vec<OptimizationStep>,
}

impl OptimizationResult {
    pub fn num_evaluations(&self) -> usize {
        self.evaluations.len()
    }
}

pub trait Optimizer {
    fn minimize<F>(&self, objective: F, initial: &[f64]) -> Result<OptimizationResult>
    where
        F: FnMut(&[f64]) -> Result<f64>;
}

/// Nelder–Mead simplex search.
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    config: NelderMeadConfig,
}

fn by_value(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

impl NelderMead {
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    fn initial_simplex(&self, initial: &[f64]) -> Vec<Vec<f64>> {
        let scale = self.config.initial_step;
        let mut simplex = vec![initial.to_vec()];
        for i in 0..initial.len() {
            let mut vertex = initial.to_vec();
            vertex[i] += if vertex[i].abs() > 1e-10 {
                vertex[i] * scale
            } else {
                scale
            };
            simplex.push(vertex);
        }
        simplex
    }

    fn centroid(simplex: &[Vec<f64>], indices: &[usize]) -> Vec<f64> {
        let n = simplex[0].len();
        let mut c = vec![0.0; n];
        for &i in indices {
            for (cj, xj) in c.iter_mut().zip(simplex[i].iter()) {
                *cj += xj;
            }
        }
        let k = indices.len() as f64;
        c.iter_mut().for_each(|v| *v /= k);
        c
    }

    /// c + coeff · (x − c)
    fn towards(c: &[f64], x: &[f64], coeff: f64) -> Vec<f64> {
        c.iter().zip(x.iter()).map(|(ci, xi)| ci + coeff * (xi - ci)).collect()
    }

    /// Largest distance from the best vertex.
    fn size(simplex: &[Vec<f64>], best: usize) -> f64 {
        simplex
            .iter()
            .map(|v| {
                v.iter()
                    .zip(simplex[best].iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }
}

impl Optimizer for NelderMead {
    fn minimize<F>(&self, mut objective: F, initial: &[f64]) -> Result<OptimizationResult>
    where
        F: FnMut(&[f64]) -> Result<f64>,
    {
        let cfg = &self.config;
        let n = initial.len();
        let mut evaluations = Vec::new();
        let mut eval = |x: &[f64]| -> Result<f64> {
            let v = objective(x)?;
            evaluations.push(v);
            Ok(v)
        };

        let mut simplex = self.initial_simplex(initial);
        let mut values = simplex.iter().map(|x| eval(x)).collect::<Result<Vec<f64>>>()?;
        let mut history = Vec::new();
        let mut status = ConvergenceStatus::MaxIterations;
        let mut iteration = 0;

        while n > 0 && iteration < cfg.max_iterations {
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| by_value(values[a], values[b]));
            let (best, worst, second_worst) = (order[0], order[n], order[n - 1]);

            let simplex_size = Self::size(&simplex, best);
            if simplex_size < cfg.tolerance {
                status = ConvergenceStatus::Converged;
                break;
            }

            let c = Self::centroid(&simplex, &order[..n]);
            let reflected = Self::towards(&c, &simplex[worst], -cfg.alpha);
            let f_reflected = eval(&reflected)?;

            if f_reflected < values[best] {
                let expanded = Self::towards(&c, &reflected, cfg.gamma);
                let f_expanded = eval(&expanded)?;
                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
            } else if f_reflected < values[second_worst] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            } else {
                let contracted = if f_reflected < values[worst] {
                    Self::towards(&c, &reflected, cfg.rho)
                } else {
                    Self::towards(&c, &simplex[worst], cfg.rho)
                };
                let f_contracted = eval(&contracted)?;
                if f_contracted < values[worst].min(f_reflected) {
                    simplex[worst] = contracted;
                    values[worst] = f_contracted;
                } else {
                    let anchor = simplex[best].clone();
                    for i in 0..=n {
                        if i != best {
                            simplex[i] = Self::towards(&anchor, &simplex[i], cfg.sigma);
                            values[i] = eval(&simplex[i])?;
                        }
                    }
                }
            }

            let b = (0..=n)
                .min_by(|&a, &b| by_value(values[a], values[b]))
                .unwrap_or(0);
            debug!(iteration, value = values[b], simplex_size, "Nelder-Mead iteration");
            history.push(OptimizationStep {
                iteration,
                parameters: simplex[b].clone(),
                value: values[b],
                simplex_size,
            });
            iteration += 1;
        }

        let best = (0..=n)
            .min_by(|&a, &b| by_value(values[a], values[b]))
            .unwrap_or(0);
        Ok(OptimizationResult {
            parameters: simplex[best].clone(),
            value: values[best],
            status,
            num_iterations: iteration,
            evaluations,
            history,
        })
    }
}
