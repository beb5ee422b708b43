use num_complex::Complex64;

pub type C64 = Complex64;
pub type Gate1 = [[C64; 2]; 2];
pub type Gate2 = [[C64; 4]; 4];

#[inline]
fn c(re: f64, im: f64) -> C64 {
    C64::new(re, im)
}

pub fn identity() -> Gate1 {
    [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]
}

pub fn hadamard() -> Gate1 {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    [[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]
}

pub fn pauli_x() -> Gate1 {
    [[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
}

pub fn pauli_y() -> Gate1 {
    [[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]
}

pub fn pauli_z() -> Gate1 {
    [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
}

/// exp(-iθX/2)
pub fn rx(theta: f64) -> Gate1 {
    let (s, co) = (theta / 2.0).sin_cos();
    [[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
}

/// exp(-iθY/2)
pub fn ry(theta: f64) -> Gate1 {
    let (s, co) = (theta / 2.0).sin_cos();
    [[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
}

/// exp(-iθZ/2)
pub fn rz(theta: f64) -> Gate1 {
    let (s, co) = (theta / 2.0).sin_cos();
    [[c(co, -s), c(0.0, 0.0)], [c(0.0, 0.0), c(co, s)]]
}

/// Control is the high bit: |10>→|11>, |11>→|10>
pub fn cnot() -> Gate2 {
    let mut u = [[c(0.0, 0.0); 4]; 4];
    u[0][0] = c(1.0, 0.0);
    u[1][1] = c(1.0, 0.0);
    u[2][3] = c(1.0, 0.0);
    u[3][2] = c(1.0, 0.0);
    u
}

/// diag(1, 1, 1, -1)
pub fn cz() -> Gate2 {
    let mut u = [[c(0.0, 0.0); 4]; 4];
    for (i, row) in u.iter_mut().enumerate() {
        row[i] = c(if i == 3 { -1.0 } else { 1.0 }, 0.0);
    }
    u
}

/// Axis of a Pauli rotation exp(-iθP/2). Its generator P/2 has eigenvalues ±1/2,
/// which is what makes the π/2 parameter-shift rule exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    pub fn matrix(self, theta: f64) -> Gate1 {
        match self {
            RotationAxis::X => rx(theta),
            RotationAxis::Y => ry(theta),
            RotationAxis::Z => rz(theta),
        }
    }

    pub fn generator(self) -> Gate1 {
        match self {
            RotationAxis::X => pauli_x(),
            RotationAxis::Y => pauli_y(),
            RotationAxis::Z => pauli_z(),
        }
    }
}
