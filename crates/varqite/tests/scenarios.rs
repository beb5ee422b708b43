use quantum::{evaluate_state, reduced_density, Ansatz, Hamiltonian, ParameterizedHamiltonian};
use varqite::{prepare_gibbs, GibbsTrainer, NelderMeadConfig, TrainerConfig, VarQite, VarQiteConfig};

fn coefficient_family() -> ParameterizedHamiltonian {
    ParameterizedHamiltonian::purified_zz_z().unwrap()
}

#[test]
fn gibbs_preparation_reaches_target_fidelity() {
    let h = Hamiltonian::from_labels(&[(0.3, "ZZII"), (0.2, "ZIII"), (0.5, "IZII")]).unwrap();
    let cfg = VarQiteConfig::default();
    let ansatz = Ansatz::thermal_purification().unwrap();

    let prep = prepare_gibbs(
        &VarQite::new(&cfg),
        &h,
        &ansatz,
        &Ansatz::thermal_purification_init(),
        &cfg.time_grid(),
        &Ansatz::PURIFICATION_ANCILLAS,
    )
    .unwrap();

    let start = reduced_density(
        &evaluate_state(&ansatz, &Ansatz::thermal_purification_init()).unwrap(),
        &Ansatz::PURIFICATION_ANCILLAS,
    )
    .unwrap();
    let start_fidelity = start.fidelity(&prep.target).unwrap();

    assert_eq!(prep.evolution.steps.len(), 9);
    assert!((prep.state.trace().re - 1.0).abs() < 1e-9);
    // the maximally mixed start is already close to a high-temperature target
    assert!(start_fidelity > 0.97, "start fidelity = {}", start_fidelity);
    assert!(
        prep.fidelity > 0.8,
        "fidelity {} -> {}",
        start_fidelity,
        prep.fidelity
    );
    // θ ← θ − Δ·x climbs ⟨H⟩, so the run ends below the starting fidelity
    assert!(prep.evolution.final_energy > prep.evolution.steps[0].energy);
    assert!(
        prep.fidelity < start_fidelity,
        "fidelity {} -> {}",
        start_fidelity,
        prep.fidelity
    );
}

#[test]
fn bound_family_matches_fixed_hamiltonian() {
    let fixed = Hamiltonian::from_labels(&[(0.3, "ZZII"), (0.2, "ZIII"), (0.5, "IZII")]).unwrap();
    let bound = coefficient_family().bind(&[0.3, 0.2, 0.5]).unwrap();
    assert_eq!(bound, fixed);
}

#[test]
fn training_moves_distribution_toward_target() {
    let config = TrainerConfig {
        optimizer: NelderMeadConfig::default().with_max_iterations(20),
        ..TrainerConfig::default()
    };
    let trainer = GibbsTrainer::new(
        coefficient_family(),
        Ansatz::thermal_purification().unwrap(),
        Ansatz::thermal_purification_init(),
        Ansatz::PURIFICATION_ANCILLAS.to_vec(),
        vec![0.5, 0.0, 0.0, 0.5],
        config,
    )
    .unwrap();

    let report = trainer.train(&[-2.0, 0.2, 0.5]).unwrap();

    assert!(
        report.final_l1 < report.initial_l1,
        "L1 {} -> {}",
        report.initial_l1,
        report.final_l1
    );
    assert!(report.final_loss < report.initial_loss);
    assert_eq!(report.loss_history.len(), report.num_evaluations());
    let total: f64 = report.final_distribution.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}
