//! Shor 9-qubit error-correction pipeline.
//!
//! One logical qubit is spread over nine physical qubits in three triplets.
//! The inner repetition inside each triplet catches bit flips and the outer
//! repetition across triplets, taken in the Hadamard basis, catches phase
//! flips. A run goes through these stages, each appending to one circuit:
//!
//! 1. [`encoder`]: prepare the logical value and entangle it into nine qubits.
//! 2. [`noise`]: apply one single-qubit error.
//! 3. [`syndrome`]: read eight parity checks into eight ancillas and
//!    measure them.
//! 4. [`correction`]: undo the located error, branching on syndrome pairs.
//! 5. [`decoder`]: unwind the encoding and read out the data register.
//!
//! [`pipeline`] chains the stages with a typestate builder so none can be
//! skipped or reordered, and runs finished circuits against a backend.

pub mod correction;
pub mod decoder;
pub mod encoder;
pub mod noise;
pub mod pipeline;
pub mod syndrome;

pub use correction::Diagnosis;
pub use noise::{ErrorModel, InjectedError};
pub use pipeline::{ShorCircuit, TrialReport, build_circuit, run_trial};
pub use syndrome::Syndrome;

/// Parameters of one error-correction trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShorConfig {
    /// Logical value to protect.
    pub input: bool,

    /// Shots sampled from the finished circuit.
    pub shots: u64,

    /// How the single-qubit error is chosen.
    pub error: ErrorModel,
}

impl Default for ShorConfig {
    fn default() -> Self {
        Self {
            input: false,
            shots: 1024,
            error: ErrorModel::RandomRotation,
        }
    }
}
