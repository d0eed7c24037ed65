//! Typestate driver for one error-correction run.
//!
//! A run moves through
//! `Idle → Encoded → ErrorInjected → SyndromeMeasured → Corrected → Decoded → Measured`.
//! Each transition consumes the previous stage, so skipping or repeating a
//! stage does not type-check. All stages append to the same circuit.

use super::noise::InjectedError;
use super::syndrome::Syndrome;
use super::{ShorConfig, correction, decoder, encoder, syndrome};
use crate::QecError;
use crate::circuit::Circuit;
use crate::counts::Counts;
use crate::shor::correction::Diagnosis;
use crate::simulator::Backend;
use core::marker::PhantomData;
use qec_common::layout;
use rand::Rng;
use tracing::{debug, warn};

/// Stage markers.
pub mod stage {
    pub struct Idle;
    pub struct Encoded;
    pub struct ErrorInjected;
    pub struct SyndromeMeasured;
    pub struct Corrected;
    pub struct Decoded;
    pub struct Measured;
}

/// Circuit under construction, tagged with the stage it has reached.
pub struct ShorCircuit<S> {
    circuit: Circuit,
    input: bool,
    error: InjectedError,
    _stage: PhantomData<S>,
}

impl<S> ShorCircuit<S> {
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn input(&self) -> bool {
        self.input
    }

    fn advance<T>(self, name: &'static str) -> ShorCircuit<T> {
        debug!(stage = name, gates = self.circuit.len(), "stage complete");
        ShorCircuit {
            circuit: self.circuit,
            input: self.input,
            error: self.error,
            _stage: PhantomData,
        }
    }
}

impl ShorCircuit<stage::Idle> {
    /// Starts a run protecting `input` on the flat 17-qubit register.
    pub fn new(input: bool) -> Self {
        Self {
            circuit: Circuit::new(layout::TOTAL_QUBITS, layout::TOTAL_CLBITS),
            input,
            error: InjectedError::Identity,
            _stage: PhantomData,
        }
    }

    pub fn encode(mut self) -> ShorCircuit<stage::Encoded> {
        encoder::encode(&mut self.circuit, self.input);
        self.advance("encoded")
    }
}

impl ShorCircuit<stage::Encoded> {
    pub fn inject(
        mut self,
        error: InjectedError,
    ) -> Result<ShorCircuit<stage::ErrorInjected>, QecError> {
        error.apply(&mut self.circuit)?;
        self.circuit.barrier();
        self.error = error;
        Ok(self.advance("error-injected"))
    }
}

impl ShorCircuit<stage::ErrorInjected> {
    pub fn extract_syndrome(mut self) -> ShorCircuit<stage::SyndromeMeasured> {
        syndrome::extract(&mut self.circuit);
        self.advance("syndrome-measured")
    }
}

impl ShorCircuit<stage::SyndromeMeasured> {
    pub fn correct(mut self) -> ShorCircuit<stage::Corrected> {
        correction::apply(&mut self.circuit);
        self.advance("corrected")
    }
}

impl ShorCircuit<stage::Corrected> {
    pub fn decode(mut self) -> ShorCircuit<stage::Decoded> {
        decoder::decode(&mut self.circuit);
        self.advance("decoded")
    }
}

impl ShorCircuit<stage::Decoded> {
    pub fn measure(mut self) -> ShorCircuit<stage::Measured> {
        decoder::measure_data(&mut self.circuit);
        self.advance("measured")
    }
}

impl ShorCircuit<stage::Measured> {
    pub fn error(&self) -> InjectedError {
        self.error
    }

    /// Releases the finished circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

/// Builds the complete circuit for one run.
pub fn build_circuit(input: bool, error: InjectedError) -> Result<Circuit, QecError> {
    Ok(ShorCircuit::new(input)
        .encode()
        .inject(error)?
        .extract_syndrome()
        .correct()
        .decode()
        .measure()
        .into_circuit())
}

/// Outcome of one executed run.
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub input: bool,
    pub error: InjectedError,

    /// One packed record per shot: syndrome bits low, data bits above.
    pub records: Vec<u64>,

    /// Full histogram over every classical bit.
    pub counts: Counts,

    /// Histogram of the 8-bit syndrome.
    pub syndromes: Counts,

    /// Histogram of the decoded logical qubit (data qubit 0).
    pub logical: Counts,

    /// Shots whose syndrome no single-qubit error explains.
    pub outside_envelope_shots: u64,
}

impl TrialReport {
    /// Fraction of shots decoding back to the input.
    pub fn logical_fidelity(&self) -> f64 {
        self.logical.probability(if self.input { "1" } else { "0" })
    }

    /// Most frequent syndrome.
    pub fn dominant_syndrome(&self) -> Option<Syndrome> {
        self.syndromes
            .most_frequent()
            .and_then(|(bits, _)| Syndrome::parse(bits))
    }

    /// Histogram of the full 9-qubit data readout.
    pub fn data(&self) -> Counts {
        let clbits: Vec<usize> = layout::DATA_CLBITS.collect();
        self.counts.marginal(&clbits)
    }
}

/// Runs one trial: draws the error, builds the circuit, and samples it.
pub fn run_trial<B: Backend, R: Rng>(
    config: &ShorConfig,
    backend: &B,
    rng: &mut R,
) -> Result<TrialReport, QecError> {
    let error = config.error.draw(rng);
    debug!(input = config.input, ?error, shots = config.shots, "starting trial");

    let circuit = build_circuit(config.input, error)?;
    let records = backend.sample(&circuit, config.shots, rng)?;
    let counts = Counts::from_records(&records, circuit.num_clbits());

    let syndrome_clbits: Vec<usize> = layout::SYNDROME_CLBITS.collect();
    let syndromes = counts.marginal(&syndrome_clbits);
    let logical = counts.marginal(&[layout::data_clbit(0)]);

    let outside_envelope_shots = syndromes
        .iter()
        .filter(|(bits, _)| {
            Syndrome::parse(bits)
                .map(|s| !Diagnosis::from(s).within_single_error_envelope())
                .unwrap_or(false)
        })
        .map(|(_, count)| count)
        .sum::<u64>();
    if outside_envelope_shots > 0 {
        warn!(
            outside_envelope_shots,
            shots = config.shots,
            "syndromes outside the single-error envelope; corrections may be wrong"
        );
    }

    Ok(TrialReport {
        input: config.input,
        error,
        records,
        counts,
        syndromes,
        logical,
        outside_envelope_shots,
    })
}
