//! Core circuit model, simulation, and error-correction pipelines.
//!
//! This crate provides the append-only circuit representation, a dense
//! statevector backend that executes circuits and samples measurement
//! counts, the Shor 9-qubit encode/syndrome/correct/decode pipeline, and the
//! W-state QAOA circuit and scoring functions. Everything here is pure
//! computation; file and console I/O live in the host and io crates.

use thiserror::Error;

/// Bit manipulation helpers over computational-basis indices.
///
/// Provides the single-bit queries and bit gathering used to address one
/// qubit inside a basis-state index and to assemble classical shot records
/// from measured qubits.
pub mod bit_utils;

/// Append-only circuit representation.
///
/// Circuits are ordered gate lists over a flat qubit register and a flat
/// classical register. Every appended gate is range-checked against both
/// registers at construction time.
pub mod circuit;

/// Measurement outcome sets.
///
/// Maps classical bitstrings to occurrence counts, with marginals and
/// frequency queries used by the pipelines to read out sub-registers.
pub mod counts;

/// W-state QAOA circuit construction and count scoring.
pub mod qaoa;

/// Shor 9-qubit error-correction pipeline.
///
/// Encoder, error injection, syndrome extraction, correction lookup, and
/// decoder, chained by a typestate builder that makes every stage
/// mandatory and ordered.
pub mod shor;

/// Simulator collaborator interface and the statevector backend.
///
/// Defines the `Backend` trait the pipelines submit circuits to, and the
/// in-repo implementation that validates, executes, and samples them.
pub mod simulator;

/// Dense statevector storage and in-place gate kernels.
pub mod statevector;

pub use circuit::{Circuit, Control, Gate};
pub use counts::Counts;
pub use simulator::{Backend, StatevectorBackend};

/// Error types returned by circuit construction and simulation.
///
/// Construction errors surface from `Circuit::try_append` for untrusted
/// input; the infallible builder methods panic with the same messages.
/// Simulation errors fail the whole run they occur in.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QecError {
    /// A gate addresses a qubit beyond the circuit's quantum register.
    #[error("qubit {qubit} is outside a {width}-qubit register")]
    QubitOutOfRange { qubit: usize, width: usize },

    /// A measurement targets a bit beyond the classical register.
    #[error("classical bit {clbit} is outside a {width}-bit register")]
    ClbitOutOfRange { clbit: usize, width: usize },

    /// A single gate names the same qubit twice.
    ///
    /// Multi-qubit gates need distinct operands; a control that is also its
    /// own target has no unitary meaning.
    #[error("{gate} gate addresses qubit {qubit} more than once")]
    DuplicateQubit { gate: &'static str, qubit: usize },

    /// A diagonal gate's phase table does not match its qubit count.
    #[error("diagonal over {qubits} qubits needs {expected} phases, got {actual}")]
    DiagonalArity {
        qubits: usize,
        expected: usize,
        actual: usize,
    },

    /// A diagonal gate spans more qubits than a phase table can index.
    #[error("diagonal over {qubits} qubits is too wide to tabulate")]
    DiagonalTooWide { qubits: usize },

    /// The backend cannot execute an operation at the given position.
    ///
    /// Raised when a gate acts non-diagonally on a qubit that was already
    /// measured; the backend only supports deferred measurement, where
    /// measured qubits may still serve as controls.
    #[error("unsupported operation at position {position}: {reason}")]
    Unsupported {
        position: usize,
        reason: &'static str,
    },

    /// The circuit is wider than the backend is configured to simulate.
    #[error("circuit needs {requested} qubits; the backend simulates at most {limit}")]
    TooManyQubits { requested: usize, limit: usize },

    /// Shot records are packed into a u64, capping the classical register.
    #[error("circuit has {clbits} classical bits; shot records hold at most 64")]
    TooManyClbits { clbits: usize },

    /// A run was requested with zero shots.
    #[error("shot count must be positive")]
    ZeroShots,
}
