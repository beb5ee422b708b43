use approx::assert_abs_diff_eq;
use quantum::{evaluate_state, expect, reduced_density, Ansatz, Hamiltonian, PauliString};
use rng::ShakeRng;

const CASES: usize = 24;

#[test]
fn reduced_density_has_unit_trace() {
    let a = Ansatz::thermal_purification().unwrap();
    for case in 0..CASES {
        let theta = ShakeRng::labeled("trace", case).angles(a.num_parameters());
        let psi = evaluate_state(&a, &theta).unwrap();
        let rho = reduced_density(&psi, &Ansatz::PURIFICATION_ANCILLAS).unwrap();
        assert_abs_diff_eq!(rho.trace().re, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rho.trace().im, 0.0, epsilon = 1e-9);
        assert!(rho.is_hermitian(1e-12));
    }
}

#[test]
fn hermitian_expectations_are_real() {
    let a = Ansatz::hardware_efficient(3, 2).unwrap();
    let h = Hamiltonian::from_labels(&[(0.7, "XYZ"), (-0.2, "YYI"), (1.1, "ZIX"), (0.4, "IZZ")]).unwrap();
    for case in 0..CASES {
        let theta = ShakeRng::labeled("real", case).angles(a.num_parameters());
        let e = expect(&h, &a, &theta).unwrap();
        assert_abs_diff_eq!(e.im, 0.0, epsilon = 1e-9);

        let p: PauliString = "YXY".parse().unwrap();
        assert_abs_diff_eq!(expect(&p, &a, &theta).unwrap().im, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn state_evaluation_is_idempotent() {
    let a = Ansatz::hardware_efficient(4, 2).unwrap();
    let theta = ShakeRng::new(b"idempotent").angles(a.num_parameters());
    let first = evaluate_state(&a, &theta).unwrap();
    let second = evaluate_state(&a, &theta).unwrap();
    assert_eq!(first, second);
    assert_abs_diff_eq!(first.norm_sqr(), 1.0, epsilon = 1e-12);
}
