//! Single-qubit error injection.
//!
//! The only randomness in the error-correction pipeline lives here. The
//! random source is always passed in by the caller, so a seeded generator
//! reproduces the same error and the same sampled shots.

use crate::QecError;
use crate::circuit::Circuit;
use qec_common::layout::{self, DATA_QUBITS};
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Concrete error applied to one data qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InjectedError {
    /// No error; the circuit gets no gate at this stage.
    Identity,

    /// Pauli-X on the given data qubit.
    BitFlip { qubit: usize },

    /// Pauli-Z on the given data qubit, written as `U(0, 0, π)`.
    PhaseFlip { qubit: usize },

    /// Arbitrary rotation `U(θ, φ, λ)` on the given data qubit.
    Rotation {
        qubit: usize,
        theta: f64,
        phi: f64,
        lambda: f64,
    },
}

impl InjectedError {
    /// Draws a uniformly placed rotation with three uniform angles in [0, 2π).
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let qubit = rng.gen_range(0..DATA_QUBITS);
        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(0.0..TAU);
        let lambda = rng.gen_range(0.0..TAU);
        InjectedError::Rotation {
            qubit,
            theta,
            phi,
            lambda,
        }
    }

    /// Data qubit the error acts on, if any.
    pub fn qubit(&self) -> Option<usize> {
        match *self {
            InjectedError::Identity => None,
            InjectedError::BitFlip { qubit }
            | InjectedError::PhaseFlip { qubit }
            | InjectedError::Rotation { qubit, .. } => Some(qubit),
        }
    }

    /// Appends the error to `circuit`.
    ///
    /// # Returns
    ///
    /// An error if the target is not one of the nine data qubits.
    pub fn apply(&self, circuit: &mut Circuit) -> Result<(), QecError> {
        if let Some(qubit) = self.qubit() {
            if qubit >= DATA_QUBITS {
                return Err(QecError::QubitOutOfRange {
                    qubit,
                    width: DATA_QUBITS,
                });
            }
        }

        match *self {
            InjectedError::Identity => {}
            InjectedError::BitFlip { qubit } => {
                circuit.x(layout::data(qubit));
            }
            InjectedError::PhaseFlip { qubit } => {
                circuit.u(layout::data(qubit), 0.0, 0.0, PI);
            }
            InjectedError::Rotation {
                qubit,
                theta,
                phi,
                lambda,
            } => {
                circuit.u(layout::data(qubit), theta, phi, lambda);
            }
        }
        Ok(())
    }
}

/// Policy for choosing the error of each trial.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ErrorModel {
    /// Identity in place of the error.
    Disabled,

    /// A fresh [`InjectedError::random`] per trial.
    #[default]
    RandomRotation,

    /// The same error every trial.
    Fixed(InjectedError),
}

impl ErrorModel {
    /// Resolves the policy into the error for one trial.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> InjectedError {
        match *self {
            ErrorModel::Disabled => InjectedError::Identity,
            ErrorModel::RandomRotation => InjectedError::random(rng),
            ErrorModel::Fixed(error) => error,
        }
    }
}
