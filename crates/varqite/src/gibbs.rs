//! Gibbs-state preparation and Hamiltonian-coefficient training.
//!
//! [`prepare_gibbs`] propagates a purification ansatz toward exp(−tH)/Z and
//! reports the fidelity of the reduced state against the exact target.
//! [`GibbsTrainer`] closes the loop: coefficients are bound into a
//! [`ParameterizedHamiltonian`], the state is propagated from a fixed starting
//! point, and the diagonal of the reduced density matrix is scored against a
//! target distribution by cross-entropy. The coefficient search itself is
//! delegated to an [`Optimizer`].

use crate::config::TrainerConfig;
use crate::error::{Result, VarQiteError};
use crate::integrator::{Evolution, TimeGrid, VarQite};
use crate::optimizer::{NelderMead, Optimizer};
use quantum::{evaluate_state, reduced_density, Ansatz, Hamiltonian, ParameterizedHamiltonian, QuantumError};
use statevec::DensityMatrix;
use tracing::{info, warn};

/// −Σ p_target · ln p_model. Fails on the first model entry ≤ 0.
pub fn cross_entropy(target: &[f64], model: &[f64]) -> Result<f64> {
    if target.len() != model.len() {
        return Err(VarQiteError::DimensionMismatch {
            expected: target.len(),
            actual: model.len(),
        });
    }
    if let Some((index, &value)) = model.iter().enumerate().find(|&(_, &p)| !(p > 0.0)) {
        return Err(VarQiteError::NonPositiveProbability { index, value });
    }
    Ok(-target.iter().zip(model.iter()).map(|(t, p)| t * p.ln()).sum::<f64>())
}

pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

#[derive(Debug, Clone)]
pub struct GibbsPreparation {
    pub evolution: Evolution,
    /// Reduced state after propagation.
    pub state: DensityMatrix,
    /// Exact exp(−tH)/Z reduced over the same qubits.
    pub target: DensityMatrix,
    pub fidelity: f64,
}

/// Propagates `theta_init` over `grid` and compares the reduced state against
/// the exact Gibbs state at the grid's total time.
pub fn prepare_gibbs(
    engine: &VarQite,
    hamiltonian: &Hamiltonian,
    ansatz: &Ansatz,
    theta_init: &[f64],
    grid: &TimeGrid,
    traced_out: &[usize],
) -> Result<GibbsPreparation> {
    let evolution = engine.propagate(hamiltonian, ansatz, theta_init, grid)?;
    let psi = evaluate_state(ansatz, &evolution.theta)?;
    let state = reduced_density(&psi, traced_out)?;
    let target = hamiltonian.gibbs_state(grid.total_time())?.partial_trace(traced_out)?;
    let fidelity = state.fidelity(&target)?;
    info!(fidelity, "Gibbs state prepared");
    Ok(GibbsPreparation {
        evolution,
        state,
        target,
        fidelity,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub coefficients: Vec<f64>,
    pub initial_loss: f64,
    pub final_loss: f64,
    pub initial_distribution: Vec<f64>,
    pub final_distribution: Vec<f64>,
    pub initial_l1: f64,
    pub final_l1: f64,
    /// Fidelity of the reduced model state with diag(target).
    pub initial_fidelity: f64,
    pub final_fidelity: f64,
    pub iterations: usize,
    /// Objective values in evaluation order.
    pub loss_history: Vec<f64>,
}

impl TrainingReport {
    pub fn num_evaluations(&self) -> usize {
        self.loss_history.len()
    }
}

pub struct GibbsTrainer {
    hamiltonian: ParameterizedHamiltonian,
    ansatz: Ansatz,
    theta_init: Vec<f64>,
    traced_out: Vec<usize>,
    target: Vec<f64>,
    config: TrainerConfig,
    engine: VarQite,
    grid: TimeGrid,
}

impl GibbsTrainer {
    pub fn new(
        hamiltonian: ParameterizedHamiltonian,
        ansatz: Ansatz,
        theta_init: Vec<f64>,
        traced_out: Vec<usize>,
        target: Vec<f64>,
        config: TrainerConfig,
    ) -> Result<Self> {
        config.validate()?;
        if hamiltonian.num_qubits() != ansatz.num_qubits() {
            return Err(QuantumError::InvalidObservable {
                observable_qubits: hamiltonian.num_qubits(),
                state_qubits: ansatz.num_qubits(),
            }
            .into());
        }
        if theta_init.len() != ansatz.num_parameters() {
            return Err(QuantumError::DimensionMismatch {
                expected: ansatz.num_parameters(),
                actual: theta_init.len(),
            }
            .into());
        }
        let visible = ansatz.num_qubits().saturating_sub(traced_out.len());
        if target.len() != 1usize << visible {
            return Err(VarQiteError::DimensionMismatch {
                expected: 1usize << visible,
                actual: target.len(),
            });
        }
        let engine = VarQite::new(&config.varqite);
        let grid = config.varqite.time_grid();
        Ok(Self {
            hamiltonian,
            ansatz,
            theta_init,
            traced_out,
            target,
            config,
            engine,
            grid,
        })
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Reduced density matrix reached from the fixed start for `coefficients`.
    pub fn model_state(&self, coefficients: &[f64]) -> Result<DensityMatrix> {
        let h = self.hamiltonian.bind(coefficients)?;
        let evolution = self.engine.propagate(&h, &self.ansatz, &self.theta_init, &self.grid)?;
        let psi = evaluate_state(&self.ansatz, &evolution.theta)?;
        Ok(reduced_density(&psi, &self.traced_out)?)
    }

    /// Diagonal of [`GibbsTrainer::model_state`].
    pub fn distribution(&self, coefficients: &[f64]) -> Result<Vec<f64>> {
        Ok(self.model_state(coefficients)?.probabilities())
    }

    pub fn loss(&self, coefficients: &[f64]) -> Result<f64> {
        cross_entropy(&self.target, &self.distribution(coefficients)?)
    }

    /// [`GibbsTrainer::loss`] with non-positive model probabilities replaced
    /// by the configured penalty. Other errors propagate.
    pub fn objective(&self, coefficients: &[f64]) -> Result<f64> {
        match self.loss(coefficients) {
            Err(VarQiteError::NonPositiveProbability { index, value }) => {
                warn!(
                    index,
                    value,
                    penalty = self.config.penalty_loss,
                    "model probability not positive, using penalty loss"
                );
                Ok(self.config.penalty_loss)
            }
            other => other,
        }
    }

    fn fidelity_to_target(&self, state: &DensityMatrix) -> Result<f64> {
        Ok(state.fidelity(&DensityMatrix::from_diagonal(&self.target)?)?)
    }

    pub fn train(&self, initial: &[f64]) -> Result<TrainingReport> {
        self.train_with(&NelderMead::new(self.config.optimizer.clone()), initial)
    }

    pub fn train_with<O: Optimizer>(&self, optimizer: &O, initial: &[f64]) -> Result<TrainingReport> {
        if initial.len() != self.hamiltonian.num_symbols() {
            return Err(VarQiteError::DimensionMismatch {
                expected: self.hamiltonian.num_symbols(),
                actual: initial.len(),
            });
        }
        let initial_state = self.model_state(initial)?;
        let initial_distribution = initial_state.probabilities();
        let initial_loss = self.objective(initial)?;

        let result = optimizer.minimize(|c| self.objective(c), initial)?;

        let final_state = self.model_state(&result.parameters)?;
        let final_distribution = final_state.probabilities();
        let report = TrainingReport {
            coefficients: result.parameters.clone(),
            initial_loss,
            final_loss: result.value,
            initial_l1: l1_distance(&initial_distribution, &self.target),
            final_l1: l1_distance(&final_distribution, &self.target),
            initial_fidelity: self.fidelity_to_target(&initial_state)?,
            final_fidelity: self.fidelity_to_target(&final_state)?,
            initial_distribution,
            final_distribution,
            iterations: result.num_iterations,
            loss_history: result.evaluations,
        };
        info!(
            initial_loss = report.initial_loss,
            final_loss = report.final_loss,
            initial_l1 = report.initial_l1,
            final_l1 = report.final_l1,
            evaluations = report.num_evaluations(),
            "Hamiltonian training finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_entropy_of_uniform_model() {
        let ce = cross_entropy(&[0.5, 0.0, 0.0, 0.5], &[0.25; 4]).unwrap();
        assert_abs_diff_eq!(ce, 4.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn cross_entropy_rejects_zero_probability() {
        let err = cross_entropy(&[0.5, 0.5], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            VarQiteError::NonPositiveProbability { index: 1, value } if value == 0.0
        ));
        assert!(matches!(
            cross_entropy(&[1.0], &[f64::NAN]),
            Err(VarQiteError::NonPositiveProbability { index: 0, .. })
        ));
    }

    #[test]
    fn l1_of_identical_is_zero() {
        assert_eq!(l1_distance(&[0.1, 0.9], &[0.1, 0.9]), 0.0);
        assert_abs_diff_eq!(l1_distance(&[1.0, 0.0], &[0.0, 1.0]), 2.0);
    }

    fn small_trainer(target: Vec<f64>) -> Result<GibbsTrainer> {
        let h = ParameterizedHamiltonian::new(4).symbol("a", "ZZII")?;
        GibbsTrainer::new(
            h,
            Ansatz::thermal_purification()?,
            Ansatz::thermal_purification_init(),
            Ansatz::PURIFICATION_ANCILLAS.to_vec(),
            target,
            TrainerConfig::default(),
        )
    }

    #[test]
    fn trainer_checks_target_length() {
        assert!(matches!(
            small_trainer(vec![0.5, 0.5]),
            Err(VarQiteError::DimensionMismatch { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn zero_coupling_keeps_maximally_mixed_start() {
        // H = 0 leaves θ fixed, so the model stays uniform
        let t = small_trainer(vec![0.25; 4]).unwrap();
        let p = t.distribution(&[0.0]).unwrap();
        for v in p {
            assert_abs_diff_eq!(v, 0.25, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(t.loss(&[0.0]).unwrap(), 4.0f64.ln(), epsilon = 1e-12);
    }

    fn ground_state_trainer(penalty_loss: f64) -> GibbsTrainer {
        // RY(0)|0000⟩ stays on |00⟩: gradient of ⟨ZZ⟩ vanishes at θ = 0
        let h = ParameterizedHamiltonian::new(4).symbol("a", "ZZII").unwrap();
        let ansatz = Ansatz::builder(4).ry(0, "t").build().unwrap();
        let config = TrainerConfig {
            penalty_loss,
            ..TrainerConfig::default()
        };
        GibbsTrainer::new(h, ansatz, vec![0.0], vec![2, 3], vec![0.25; 4], config).unwrap()
    }

    #[test]
    fn zero_model_probability_costs_the_penalty() {
        let t = ground_state_trainer(42.0);
        assert_eq!(t.distribution(&[0.7]).unwrap(), vec![1.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            t.loss(&[0.7]),
            Err(VarQiteError::NonPositiveProbability { index: 1, value }) if value == 0.0
        ));
        assert_eq!(t.objective(&[0.7]).unwrap(), 42.0);
        assert_eq!(ground_state_trainer(1e6).objective(&[0.7]).unwrap(), 1e6);
    }

    #[test]
    fn objective_propagates_other_errors() {
        let t = ground_state_trainer(42.0);
        assert!(matches!(
            t.objective(&[0.7, 0.1]),
            Err(VarQiteError::Quantum(QuantumError::DimensionMismatch { expected: 1, actual: 2 }))
        ));
    }
}
