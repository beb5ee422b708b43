//! Run configuration for imaginary-time propagation and Hamiltonian training.
//!
//! All structs are serde-(de)serializable with per-field defaults, so a JSON
//! file only needs to name the values it overrides. [`TrainerConfig::from_json`]
//! validates after loading.

use crate::error::ConfigError;
use crate::integrator::TimeGrid;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the Euler step size is derived from the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRule {
    /// `t / num_time_steps` while iterating over `num_time_steps - 1` intervals.
    ReferenceDivisor,
    /// `t / (num_time_steps - 1)`, the actual spacing of the grid.
    GridSpacing,
}

impl Default for StepRule {
    fn default() -> Self {
        StepRule::ReferenceDivisor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarQiteConfig {
    /// Temperature k_BT; total imaginary time is 1 / (2 k_BT).
    pub kbt: f64,
    /// Number of grid points from 0 to the total time, inclusive.
    pub num_time_steps: usize,
    pub step_rule: StepRule,
    /// α in (M + α·diag(M)) x = g.
    pub regularization: f64,
    /// Fan shifted evaluations out over the rayon pool.
    pub parallel: bool,
}

impl Default for VarQiteConfig {
    fn default() -> Self {
        Self {
            kbt: 1.0,
            num_time_steps: 10,
            step_rule: StepRule::ReferenceDivisor,
            regularization: 1e-8,
            parallel: true,
        }
    }
}

impl VarQiteConfig {
    pub fn with_kbt(mut self, kbt: f64) -> Self {
        self.kbt = kbt;
        self
    }

    pub fn with_num_time_steps(mut self, n: usize) -> Self {
        self.num_time_steps = n;
        self
    }

    pub fn with_step_rule(mut self, rule: StepRule) -> Self {
        self.step_rule = rule;
        self
    }

    pub fn with_regularization(mut self, alpha: f64) -> Self {
        self.regularization = alpha;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn total_time(&self) -> f64 {
        1.0 / (2.0 * self.kbt)
    }

    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::new(self.total_time(), self.num_time_steps, self.step_rule)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.kbt.is_finite() && self.kbt > 0.0) {
            return Err(ConfigError::invalid_value("kbt", "must be finite and > 0"));
        }
        if self.num_time_steps < 2 {
            return Err(ConfigError::invalid_value(
                "num_time_steps",
                "must be >= 2 (grid includes both endpoints)",
            ));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(ConfigError::invalid_value(
                "regularization",
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Simplex search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    pub max_iterations: usize,
    /// Stop once the simplex diameter falls below this.
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Relative perturbation of each coordinate for the initial simplex
    /// (absolute for coordinates at zero).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            tolerance: 1e-6,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::invalid_value("tolerance", "must be >= 0"));
        }
        if !(self.alpha > 0.0) {
            return Err(ConfigError::invalid_value("alpha", "must be > 0"));
        }
        if !(self.gamma > 1.0) {
            return Err(ConfigError::invalid_value("gamma", "must be > 1"));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(ConfigError::invalid_value("rho", "must be in (0, 1)"));
        }
        if !(self.sigma > 0.0 && self.sigma < 1.0) {
            return Err(ConfigError::invalid_value("sigma", "must be in (0, 1)"));
        }
        if !(self.initial_step > 0.0) {
            return Err(ConfigError::invalid_value("initial_step", "must be > 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub varqite: VarQiteConfig,
    pub optimizer: NelderMeadConfig,
    /// Loss reported for coefficients whose model distribution has a
    /// non-positive entry.
    pub penalty_loss: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            varqite: VarQiteConfig::default(),
            optimizer: NelderMeadConfig::default(),
            penalty_loss: 1e6,
        }
    }
}

impl TrainerConfig {
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: TrainerConfig = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Writes pretty-printed JSON, creating parent directories.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.varqite.validate()?;
        self.optimizer.validate()?;
        if !self.penalty_loss.is_finite() {
            return Err(ConfigError::invalid_value("penalty_loss", "must be finite"));
        }
        Ok(())
    }
}
