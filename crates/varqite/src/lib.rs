//! Variational imaginary-time evolution toward Gibbs states, and training of
//! Hamiltonian coefficients against a target distribution.
//!
//! The pipeline is parameter-shift gradient ([`grad`]) and metric tensor
//! ([`qfi`]) feeding a regularized least-squares solve ([`natural`]), stepped
//! over an imaginary-time grid by [`integrator::VarQite`]. [`gibbs`] wraps that
//! in a cross-entropy objective for a derivative-free [`optimizer`].

pub mod config;
pub mod error;
pub mod gibbs;
pub mod grad;
pub mod integrator;
pub mod natural;
pub mod optimizer;
pub mod output;
pub mod qfi;

pub use config::{NelderMeadConfig, StepRule, TrainerConfig, VarQiteConfig};
pub use error::{ConfigError, Result, VarQiteError};
pub use gibbs::{cross_entropy, l1_distance, prepare_gibbs, GibbsPreparation, GibbsTrainer, TrainingReport};
pub use grad::gradient;
pub use integrator::{Evolution, StepRecord, TimeGrid, VarQite};
pub use natural::natural_gradient;
pub use optimizer::{ConvergenceStatus, NelderMead, OptimizationResult, Optimizer};
pub use qfi::metric_tensor;
