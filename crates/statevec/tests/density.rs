use approx::assert_abs_diff_eq;
use rng::ShakeRng;
use statevec::{DensityMatrix, StateVector, C64};

fn random_state(rng: &mut ShakeRng, n: usize) -> StateVector {
    let amps: Vec<C64> = (0..1usize << n)
        .map(|_| C64::new(rng.uniform(-1.0, 1.0), rng.uniform(-1.0, 1.0)))
        .collect();
    let norm = amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    StateVector::from_amplitudes(amps.into_iter().map(|a| a / norm).collect()).unwrap()
}

#[test]
fn fidelity_is_symmetric_and_bounded() {
    for case in 0..8 {
        let mut rng = ShakeRng::labeled("fidelity", case);
        let a = DensityMatrix::from_diagonal(&rng.distribution(4)).unwrap();
        let b = random_state(&mut rng, 3).reduced_density(&[2]).unwrap();
        let ab = a.fidelity(&b).unwrap();
        let ba = b.fidelity(&a).unwrap();
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-9);
        assert!(ab > 0.0 && ab <= 1.0 + 1e-9, "F = {}", ab);
    }
}

#[test]
fn reduced_states_keep_unit_trace() {
    for case in 0..8 {
        let mut rng = ShakeRng::labeled("trace", case);
        let psi = random_state(&mut rng, 4);
        for traced in [vec![0], vec![1, 3], vec![3, 0, 2]] {
            let rho = psi.reduced_density(&traced).unwrap();
            assert_eq!(rho.num_qubits(), 4 - traced.len());
            assert_abs_diff_eq!(rho.trace().re, 1.0, epsilon = 1e-12);
            assert!(rho.is_hermitian(1e-12));
        }
    }
}
