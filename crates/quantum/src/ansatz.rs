//! Parameterized circuit templates.
//!
//! An [`Ansatz`] is an ordered gate list in which every Pauli rotation is driven
//! by exactly one named parameter. Names get a fixed index in order of first
//! appearance when the template is built, so parameter vectors are plain
//! `&[f64]` slices indexed the same way for the lifetime of the template.

use crate::error::{QuantumError, Result};
use crate::gates::{cnot, cz, hadamard, pauli_x, Gate1, Gate2, RotationAxis};
use statevec::StateVector;
use std::f64::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    /// exp(-iθP/2) with θ = parameter `param`
    Rotation {
        axis: RotationAxis,
        qubit: usize,
        param: usize,
    },
    H(usize),
    X(usize),
    /// (control, target)
    Cx(usize, usize),
    Cz(usize, usize),
}

/// Collects gates and validates them on [`AnsatzBuilder::build`].
#[derive(Clone, Debug)]
pub struct AnsatzBuilder {
    num_qubits: usize,
    ops: Vec<Operation>,
    params: Vec<String>,
    error: Option<QuantumError>,
}

impl AnsatzBuilder {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            ops: Vec::new(),
            params: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, err: QuantumError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check_qubit(&mut self, q: usize) -> bool {
        if q >= self.num_qubits {
            self.fail(QuantumError::InvalidQubit {
                index: q,
                num_qubits: self.num_qubits,
            });
            return false;
        }
        true
    }

    fn rotation(mut self, axis: RotationAxis, qubit: usize, name: &str) -> Self {
        if !self.check_qubit(qubit) {
            return self;
        }
        if self.params.iter().any(|p| p == name) {
            self.fail(QuantumError::SharedParameter {
                name: name.to_string(),
            });
            return self;
        }
        self.params.push(name.to_string());
        let param = self.params.len() - 1;
        self.ops.push(Operation::Rotation { axis, qubit, param });
        self
    }

    fn single(mut self, op: Operation, qubit: usize) -> Self {
        if self.check_qubit(qubit) {
            self.ops.push(op);
        }
        self
    }

    fn pair(mut self, op: Operation, a: usize, b: usize) -> Self {
        if !self.check_qubit(a) || !self.check_qubit(b) {
            return self;
        }
        if a == b {
            self.fail(QuantumError::RepeatedQubit(a));
            return self;
        }
        self.ops.push(op);
        self
    }

    pub fn rx(self, qubit: usize, name: &str) -> Self {
        self.rotation(RotationAxis::X, qubit, name)
    }

    pub fn ry(self, qubit: usize, name: &str) -> Self {
        self.rotation(RotationAxis::Y, qubit, name)
    }

    pub fn rz(self, qubit: usize, name: &str) -> Self {
        self.rotation(RotationAxis::Z, qubit, name)
    }

    pub fn h(self, qubit: usize) -> Self {
        self.single(Operation::H(qubit), qubit)
    }

    pub fn x(self, qubit: usize) -> Self {
        self.single(Operation::X(qubit), qubit)
    }

    pub fn cx(self, control: usize, target: usize) -> Self {
        self.pair(Operation::Cx(control, target), control, target)
    }

    pub fn cz(self, a: usize, b: usize) -> Self {
        self.pair(Operation::Cz(a, b), a, b)
    }

    /// First validation error wins.
    pub fn build(self) -> Result<Ansatz> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Ansatz {
            num_qubits: self.num_qubits,
            ops: self.ops,
            params: self.params,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ansatz {
    num_qubits: usize,
    ops: Vec<Operation>,
    params: Vec<String>,
}

impl Ansatz {
    pub fn builder(num_qubits: usize) -> AnsatzBuilder {
        AnsatzBuilder::new(num_qubits)
    }

    /// `reps` layers of RY·RZ on every qubit followed by a linear CX chain,
    /// then a closing RY·RZ layer.
    pub fn hardware_efficient(num_qubits: usize, reps: usize) -> Result<Self> {
        let mut b = AnsatzBuilder::new(num_qubits);
        for r in 0..=reps {
            for q in 0..num_qubits {
                b = b.ry(q, &format!("ry{}_{}", r, q)).rz(q, &format!("rz{}_{}", r, q));
            }
            if r < reps {
                for q in 0..num_qubits.saturating_sub(1) {
                    b = b.cx(q, q + 1);
                }
            }
        }
        b.build()
    }

    /// Purification template for a 2-qubit thermal state.
    ///
    /// Qubits 0 and 1 carry the system, 2 and 3 are ancillas to be traced out.
    /// `a0..a2` load a 4-outcome amplitude distribution onto the system
    /// (RY on each qubit plus a CX-RY-CX controlled rotation), CNOTs copy the
    /// system into the ancillas, and `b0..b3` add a final RY on every qubit.
    pub fn thermal_purification() -> Result<Self> {
        AnsatzBuilder::new(4)
            .ry(0, "a0")
            .ry(1, "a1")
            .cx(0, 1)
            .ry(1, "a2")
            .cx(0, 1)
            .cx(0, 2)
            .cx(1, 3)
            .ry(0, "b0")
            .ry(1, "b1")
            .ry(2, "b2")
            .ry(3, "b3")
            .build()
    }

    /// Parameters for which [`Ansatz::thermal_purification`] leaves the
    /// system qubits maximally mixed.
    pub fn thermal_purification_init() -> Vec<f64> {
        vec![FRAC_PI_2, FRAC_PI_2, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    /// Ancilla qubits of [`Ansatz::thermal_purification`].
    pub const PURIFICATION_ANCILLAS: [usize; 2] = [2, 3];

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_parameters(&self) -> usize {
        self.params.len()
    }

    /// Parameter names in index order.
    pub fn parameters(&self) -> &[String] {
        &self.params
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn parameter_index(&self, name: &str) -> Result<usize> {
        self.params
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| QuantumError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Builds a parameter vector from named values; unnamed entries are zero.
    pub fn parameter_vector(&self, values: &[(&str, f64)]) -> Result<Vec<f64>> {
        let mut theta = vec![0.0; self.params.len()];
        for &(name, v) in values {
            theta[self.parameter_index(name)?] = v;
        }
        Ok(theta)
    }

    pub fn bind(&self, theta: &[f64]) -> Result<Circuit> {
        if theta.len() != self.params.len() {
            return Err(QuantumError::DimensionMismatch {
                expected: self.params.len(),
                actual: theta.len(),
            });
        }
        let gates = self
            .ops
            .iter()
            .map(|op| match *op {
                Operation::Rotation { axis, qubit, param } => {
                    Instruction::One(qubit, axis.matrix(theta[param]))
                }
                Operation::H(q) => Instruction::One(q, hadamard()),
                Operation::X(q) => Instruction::One(q, pauli_x()),
                Operation::Cx(a, b) => Instruction::Two(a, b, cnot()),
                Operation::Cz(a, b) => Instruction::Two(a, b, cz()),
            })
            .collect();
        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    One(usize, Gate1),
    /// Basis |q_a q_b⟩ with q_a the high bit.
    Two(usize, usize, Gate2),
}

/// A template with every parameter bound to a number.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Instruction>,
}

impl Circuit {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.gates
    }

    /// Exact simulation from |0...0⟩.
    pub fn run(&self) -> StateVector {
        let mut psi = StateVector::new_zero(self.num_qubits);
        for g in &self.gates {
            match g {
                Instruction::One(q, u) => psi.apply_1q(*q, *u),
                Instruction::Two(a, b, u) => psi.apply_2q(*a, *b, *u),
            }
        }
        psi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn names_are_indexed_in_order_of_appearance() {
        let a = Ansatz::builder(2).ry(1, "b").cx(0, 1).rz(0, "a").build().unwrap();
        assert_eq!(a.parameters(), &["b".to_string(), "a".to_string()]);
        assert_eq!(a.parameter_index("a").unwrap(), 1);
        assert_eq!(a.parameter_vector(&[("a", 0.4)]).unwrap(), vec![0.0, 0.4]);
        assert!(matches!(
            a.parameter_index("c"),
            Err(QuantumError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn builder_rejects_bad_gates() {
        assert_eq!(
            Ansatz::builder(2).ry(2, "t").build().unwrap_err(),
            QuantumError::InvalidQubit { index: 2, num_qubits: 2 }
        );
        assert_eq!(
            Ansatz::builder(2).cx(1, 1).build().unwrap_err(),
            QuantumError::RepeatedQubit(1)
        );
        assert_eq!(
            Ansatz::builder(2).ry(0, "t").rz(1, "t").build().unwrap_err(),
            QuantumError::SharedParameter { name: "t".into() }
        );
    }

    #[test]
    fn bound_circuit_follows_operation_order() {
        let a = Ansatz::builder(2).h(0).rx(1, "t").cz(0, 1).x(1).build().unwrap();
        assert_eq!(
            a.operations(),
            &[
                Operation::H(0),
                Operation::Rotation {
                    axis: RotationAxis::X,
                    qubit: 1,
                    param: 0
                },
                Operation::Cz(0, 1),
                Operation::X(1),
            ]
        );
        let c = a.bind(&[0.3]).unwrap();
        assert_eq!(c.num_qubits(), 2);
        assert_eq!(c.instructions().len(), 4);
        assert_eq!(c.instructions()[1], Instruction::One(1, RotationAxis::X.matrix(0.3)));
        assert_eq!(c.instructions()[2], Instruction::Two(0, 1, cz()));
    }

    #[test]
    fn bind_checks_parameter_count() {
        let a = Ansatz::hardware_efficient(2, 1).unwrap();
        assert_eq!(a.num_parameters(), 8);
        assert_eq!(
            a.bind(&[0.0; 3]).unwrap_err(),
            QuantumError::DimensionMismatch { expected: 8, actual: 3 }
        );
    }

    #[test]
    fn purification_init_is_maximally_mixed_on_system() {
        let a = Ansatz::thermal_purification().unwrap();
        let psi = a.bind(&Ansatz::thermal_purification_init()).unwrap().run();
        let rho = psi.reduced_density(&Ansatz::PURIFICATION_ANCILLAS).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 0.25 } else { 0.0 };
                assert_abs_diff_eq!(rho.get(i, j).re, expected, epsilon = 1e-12);
                assert_abs_diff_eq!(rho.get(i, j).im, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn purification_loads_diagonal_distribution() {
        // a2 = 0: independent qubits, p(q0 = 1) = sin²(a0/2)
        let a = Ansatz::thermal_purification().unwrap();
        let theta = a.parameter_vector(&[("a0", 1.0), ("a1", 2.0)]).unwrap();
        let rho = a.bind(&theta).unwrap().run().reduced_density(&[2, 3]).unwrap();
        let p0 = (0.5f64).sin().powi(2);
        let p1 = (1.0f64).sin().powi(2);
        assert_abs_diff_eq!(rho.get(0b11, 0b11).re, p0 * p1, epsilon = 1e-12);
        assert_abs_diff_eq!(rho.get(0b01, 0b10).norm(), 0.0, epsilon = 1e-12);
    }
}
