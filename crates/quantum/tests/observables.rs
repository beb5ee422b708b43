use quantum::{
    evaluate_state,
    observables::{expect_x, expect_z, expect_zz},
    Ansatz,
};
use std::f64::consts::FRAC_PI_2;

#[test]
fn bell_observables() {
    let bell = Ansatz::builder(2).h(0).cx(0, 1).build().unwrap();
    let psi = evaluate_state(&bell, &[]).unwrap();

    assert!(expect_z(&psi, 0).abs() < 1e-12);
    assert!(expect_z(&psi, 1).abs() < 1e-12);
    assert!((expect_zz(&psi, 0, 1) - 1.0).abs() < 1e-12);
}

#[test]
fn ry_rotation_moves_z_into_x() {
    let a = Ansatz::builder(1).ry(0, "t").build().unwrap();
    for &t in &[0.0, 0.4, FRAC_PI_2, 2.5] {
        let psi = evaluate_state(&a, &[t]).unwrap();
        assert!((expect_z(&psi, 0) - t.cos()).abs() < 1e-12, "t = {}", t);
        assert!((expect_x(&psi, 0) - t.sin()).abs() < 1e-12, "t = {}", t);
    }
}
