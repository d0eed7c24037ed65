//! Simulator collaborator and the statevector backend.
//!
//! The pipelines only ever see the `Backend` trait: hand over a finished
//! circuit and a shot count, get back packed shot records or a count map.
//! `StatevectorBackend` fulfils that contract by evolving a dense state
//! through every gate and sampling the measured qubits from the final
//! distribution.

use crate::QecError;
use crate::bit_utils::BitPack;
use crate::circuit::{Circuit, Gate};
use crate::counts::Counts;
use crate::statevector::StateVector;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Simulator collaborator.
///
/// A backend accepts a complete circuit and a shot count and either returns
/// one record per shot or fails the whole run. It never calls back into the
/// caller mid-circuit.
pub trait Backend {
    /// Executes `circuit` and samples `shots` classical records.
    ///
    /// Bit `c` of each record holds the last value measured into classical
    /// bit `c`; bits never measured read 0.
    fn sample<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut R,
    ) -> Result<Vec<u64>, QecError>;

    /// Widest quantum register this backend accepts.
    fn max_qubits(&self) -> usize;

    /// Executes `circuit` and histograms the sampled records.
    fn run<R: Rng>(&self, circuit: &Circuit, shots: u64, rng: &mut R) -> Result<Counts, QecError> {
        let records = self.sample(circuit, shots, rng)?;
        Ok(Counts::from_records(&records, circuit.num_clbits()))
    }
}

/// Final state of an executed circuit together with its measurement map.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Amplitudes after every gate has been applied.
    pub state: StateVector,

    /// `(qubit, clbit)` pairs in circuit order.
    ///
    /// Measurements are deferred to the end of the run: a measured qubit is
    /// only ever used diagonally afterwards, so reading it at the end gives
    /// the same statistics as reading it in place.
    pub measurements: Vec<(usize, usize)>,
}

impl Execution {
    /// Classical record produced by basis state `basis`.
    pub fn record(&self, basis: usize) -> u64 {
        self.measurements
            .iter()
            .fold(0u64, |record, &(qubit, clbit)| {
                let mask = 1u64 << clbit;
                if BitPack::get(basis, qubit) {
                    record | mask
                } else {
                    record & !mask
                }
            })
    }

    /// Exact probability of every classical record with non-zero weight.
    pub fn record_distribution(&self) -> BTreeMap<u64, f64> {
        let mut distribution = BTreeMap::new();
        for (basis, p) in self.state.probabilities().into_iter().enumerate() {
            if p > 0.0 {
                *distribution.entry(self.record(basis)).or_insert(0.0) += p;
            }
        }
        distribution
    }
}

/// Dense statevector simulator.
///
/// Memory grows as 16 * 2^n bytes, so the width is capped by `max_qubits`.
#[derive(Debug, Clone, Copy)]
pub struct StatevectorBackend {
    pub max_qubits: usize,
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self { max_qubits: 24 }
    }
}

impl StatevectorBackend {
    pub fn new(max_qubits: usize) -> Self {
        Self { max_qubits }
    }

    /// Checks that the circuit fits this backend and collects its
    /// measurement map.
    ///
    /// # Returns
    ///
    /// The `(qubit, clbit)` measurement pairs in order, or an error if the
    /// registers are too wide or a gate changes the basis value of a qubit
    /// after it was measured.
    pub fn validate(&self, circuit: &Circuit) -> Result<Vec<(usize, usize)>, QecError> {
        if circuit.num_qubits() > self.max_qubits {
            return Err(QecError::TooManyQubits {
                requested: circuit.num_qubits(),
                limit: self.max_qubits,
            });
        }
        if circuit.num_clbits() > 64 {
            return Err(QecError::TooManyClbits {
                clbits: circuit.num_clbits(),
            });
        }

        let mut measured = vec![false; circuit.num_qubits()];
        let mut measurements = Vec::new();
        for (position, gate) in circuit.gates().iter().enumerate() {
            if gate
                .basis_changing_qubits()
                .iter()
                .any(|&q| measured[q])
            {
                return Err(QecError::Unsupported {
                    position,
                    reason: "gate changes the basis value of an already measured qubit",
                });
            }
            if let Gate::Measure { qubit, clbit } = *gate {
                measured[qubit] = true;
                measurements.push((qubit, clbit));
            }
        }
        Ok(measurements)
    }

    /// Validates and evolves the circuit without sampling.
    pub fn execute(&self, circuit: &Circuit) -> Result<Execution, QecError> {
        let measurements = self.validate(circuit)?;

        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.len(),
            measurements = measurements.len(),
            "executing circuit"
        );

        let mut state = StateVector::new(circuit.num_qubits());
        for (position, gate) in circuit.gates().iter().enumerate() {
            trace!(position, %gate, "apply");
            state.apply(gate);
        }

        Ok(Execution {
            state,
            measurements,
        })
    }
}

impl Backend for StatevectorBackend {
    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn sample<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut R,
    ) -> Result<Vec<u64>, QecError> {
        if shots == 0 {
            return Err(QecError::ZeroShots);
        }
        let execution = self.execute(circuit)?;

        let mut cumulative = Vec::with_capacity(execution.state.amplitudes().len());
        let mut running = 0.0;
        for p in execution.state.probabilities() {
            running += p;
            cumulative.push(running);
        }
        let last = cumulative.len() - 1;

        let records = (0..shots)
            .map(|_| {
                let r = rng.gen_range(0.0..running);
                let basis = cumulative.partition_point(|&c| c <= r).min(last);
                execution.record(basis)
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Control;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bell() -> Circuit {
        let mut circuit = Circuit::new(2, 2);
        circuit.h(0).cx(0, 1).measure(0, 0).measure(1, 1);
        circuit
    }

    #[test]
    fn counts_sum_to_requested_shots() {
        let mut rng = StdRng::seed_from_u64(7);
        let counts = StatevectorBackend::default()
            .run(&bell(), 500, &mut rng)
            .unwrap();
        assert_eq!(counts.shots(), 500);
        assert_eq!(counts.get("00") + counts.get("11"), 500);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn exact_distribution_of_bell_pair() {
        let execution = StatevectorBackend::default().execute(&bell()).unwrap();
        let distribution = execution.record_distribution();
        assert_eq!(distribution.len(), 2);
        assert!((distribution[&0b00] - 0.5).abs() < 1e-12);
        assert!((distribution[&0b11] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn measured_qubits_may_still_control() {
        let mut circuit = Circuit::new(2, 2);
        circuit
            .x(0)
            .measure(0, 0)
            .mcx(&[Control::on(0)], 1)
            .cz(0, 1)
            .measure(1, 1);
        let execution = StatevectorBackend::default().execute(&circuit).unwrap();
        assert_eq!(
            execution.record_distribution().keys().copied().collect::<Vec<_>>(),
            vec![0b11]
        );
    }

    #[test]
    fn basis_change_after_measurement_is_unsupported() {
        let mut circuit = Circuit::new(2, 1);
        circuit.h(0).measure(0, 0).cx(1, 0);
        let err = StatevectorBackend::default().execute(&circuit).unwrap_err();
        assert!(matches!(err, QecError::Unsupported { position: 2, .. }));
    }

    #[test]
    fn width_limits_are_enforced() {
        let circuit = Circuit::new(5, 0);
        assert_eq!(
            StatevectorBackend::new(4).execute(&circuit).unwrap_err(),
            QecError::TooManyQubits {
                requested: 5,
                limit: 4
            }
        );
        let wide = Circuit::new(1, 65);
        assert_eq!(
            StatevectorBackend::default().execute(&wide).unwrap_err(),
            QecError::TooManyClbits { clbits: 65 }
        );
    }

    #[test]
    fn zero_shots_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            StatevectorBackend::default()
                .sample(&bell(), 0, &mut rng)
                .unwrap_err(),
            QecError::ZeroShots
        );
    }

    #[test]
    fn same_seed_same_samples() {
        let backend = StatevectorBackend::default();
        let a = backend
            .sample(&bell(), 64, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = backend
            .sample(&bell(), 64, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn last_measurement_into_a_clbit_wins() {
        let mut circuit = Circuit::new(2, 1);
        circuit.x(1).measure(0, 0).measure(1, 0);
        let execution = StatevectorBackend::default().execute(&circuit).unwrap();
        assert_eq!(execution.record(0b10), 1);
    }

    #[test]
    fn records_keep_the_top_classical_bit() {
        let mut circuit = Circuit::new(1, 64);
        circuit.x(0).measure(0, 63);
        let execution = StatevectorBackend::default().execute(&circuit).unwrap();
        assert_eq!(
            execution.record_distribution().keys().copied().collect::<Vec<_>>(),
            vec![1u64 << 63]
        );
    }
}
