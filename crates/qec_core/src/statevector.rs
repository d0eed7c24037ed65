//! Dense statevector storage and gate kernels.
//!
//! Stores all 2^n complex amplitudes of an n-qubit register, with qubit k
//! mapped to bit k of the basis-state index. Every kernel updates the
//! amplitudes in place; none allocate.

use crate::bit_utils::BitPack;
use crate::circuit::{Control, Gate};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// 2x2 complex matrix acting on one qubit, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

pub fn hadamard() -> Matrix2 {
    let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[s, s], [s, -s]]
}

pub fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

pub fn rx(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    [[c, s], [s, c]]
}

pub fn u(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [
            Complex64::new(cos, 0.0),
            -Complex64::from_polar(sin, lambda),
        ],
        [
            Complex64::from_polar(sin, phi),
            Complex64::from_polar(cos, phi + lambda),
        ],
    ]
}

/// Amplitudes of an n-qubit register.
#[derive(Debug, Clone)]
pub struct StateVector {
    num_qubits: usize,
    amps: Vec<Complex64>,
}

impl StateVector {
    /// Creates the all-zero basis state `|0…0⟩`.
    pub fn new(num_qubits: usize) -> Self {
        let mut amps = vec![ZERO; 1 << num_qubits];
        amps[0] = ONE;
        Self { num_qubits, amps }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_of_one(&self, qubit: usize) -> f64 {
        self.amps
            .iter()
            .enumerate()
            .filter(|(i, _)| BitPack::get(*i, qubit))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Applies `m` to `target` in every basis pair whose controls match.
    pub fn apply_controlled(&mut self, controls: &[Control], target: usize, m: &Matrix2) {
        let mut care = 0usize;
        let mut want = 0usize;
        for c in controls {
            care = BitPack::set(care, c.qubit, true);
            want = BitPack::set(want, c.qubit, c.value);
        }

        for i in 0..self.amps.len() {
            if BitPack::get(i, target) || i & care != want {
                continue;
            }
            let j = BitPack::toggle(i, target);
            let (a, b) = (self.amps[i], self.amps[j]);
            self.amps[i] = m[0][0] * a + m[0][1] * b;
            self.amps[j] = m[1][0] * a + m[1][1] * b;
        }
    }

    pub fn apply_single(&mut self, target: usize, m: &Matrix2) {
        self.apply_controlled(&[], target, m);
    }

    pub fn apply_cz(&mut self, a: usize, b: usize) {
        for (i, amp) in self.amps.iter_mut().enumerate() {
            if BitPack::get(i, a) && BitPack::get(i, b) {
                *amp = -*amp;
            }
        }
    }

    pub fn apply_diagonal(&mut self, qubits: &[usize], phases: &[f64]) {
        for (i, amp) in self.amps.iter_mut().enumerate() {
            *amp *= Complex64::from_polar(1.0, phases[BitPack::gather(i, qubits)]);
        }
    }

    /// Applies the unitary part of `gate`.
    ///
    /// Measurements and barriers leave the amplitudes untouched; sampling
    /// of measured qubits happens after the whole circuit has run.
    pub fn apply(&mut self, gate: &Gate) {
        match gate {
            Gate::H(q) => self.apply_single(*q, &hadamard()),
            Gate::X(q) => self.apply_single(*q, &pauli_x()),
            Gate::Rx { qubit, theta } => self.apply_single(*qubit, &rx(*theta)),
            Gate::U {
                qubit,
                theta,
                phi,
                lambda,
            } => self.apply_single(*qubit, &u(*theta, *phi, *lambda)),
            Gate::Cx { control, target } => {
                self.apply_controlled(&[Control::on(*control)], *target, &pauli_x())
            }
            Gate::Cz(a, b) => self.apply_cz(*a, *b),
            Gate::Mcx { controls, target } => self.apply_controlled(controls, *target, &pauli_x()),
            Gate::Diagonal { qubits, phases } => self.apply_diagonal(qubits, phases),
            Gate::Measure { .. } | Gate::Barrier => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn hadamard_then_cx_prepares_a_bell_pair() {
        let mut state = StateVector::new(2);
        state.apply(&Gate::H(0));
        state.apply(&Gate::Cx {
            control: 0,
            target: 1,
        });

        let p = state.probabilities();
        assert!(close(p[0b00], 0.5));
        assert!(close(p[0b11], 0.5));
        assert!(close(p[0b01] + p[0b10], 0.0));
    }

    #[test]
    fn u_with_pi_zero_pi_acts_as_pauli_x() {
        let mut state = StateVector::new(1);
        state.apply_single(0, &u(std::f64::consts::PI, 0.0, std::f64::consts::PI));
        assert!(close(state.probability_of_one(0), 1.0));
        // U(π, 0, π) is exactly X, including phase.
        assert!((state.amplitudes()[1] - ONE).norm() < 1e-12);
    }

    #[test]
    fn cz_in_hadamard_frame_acts_as_cx() {
        // H·CZ·H on the target equals CX.
        let mut state = StateVector::new(2);
        state.apply(&Gate::X(0));
        state.apply(&Gate::H(1));
        state.apply(&Gate::Cz(0, 1));
        state.apply(&Gate::H(1));
        assert!(close(state.probabilities()[0b11], 1.0));
    }

    #[test]
    fn mixed_polarity_controls_select_one_pattern() {
        let mut state = StateVector::new(3);
        state.apply(&Gate::X(0));
        let controls = [Control::on(0), Control::when(1, false)];
        state.apply(&Gate::Mcx {
            controls: controls.to_vec(),
            target: 2,
        });
        assert!(close(state.probabilities()[0b101], 1.0));

        state.apply(&Gate::X(1));
        state.apply(&Gate::Mcx {
            controls: controls.to_vec(),
            target: 2,
        });
        assert!(close(state.probabilities()[0b111], 1.0));
    }

    #[test]
    fn rx_pi_flips_with_a_phase() {
        let mut state = StateVector::new(1);
        state.apply(&Gate::Rx {
            qubit: 0,
            theta: std::f64::consts::PI,
        });
        assert!(close(state.probability_of_one(0), 1.0));
        assert!((state.amplitudes()[1] - Complex64::new(0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn diagonal_indexes_phases_by_listed_qubits() {
        let mut state = StateVector::new(2);
        state.apply(&Gate::X(1));
        state.apply(&Gate::Diagonal {
            qubits: vec![1, 0],
            phases: vec![0.0, std::f64::consts::PI, 0.0, 0.0],
        });
        // Qubit 1 is set, qubit 0 clear: local index 0b01 carries phase π.
        assert!((state.amplitudes()[0b10] + ONE).norm() < 1e-12);
    }
}
