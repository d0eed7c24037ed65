//! W-state QAOA circuit construction and scoring.
//!
//! The problem Hamiltonian is diagonal. It rewards the n single-excitation
//! basis states that make up a W state and penalises everything else. The
//! circuit alternates its evolution with an X mixer. The score function
//! turns measured counts into the error value an external minimizer drives
//! towards zero. The minimizer itself is not part of this crate; it only
//! sees the closure returned by [`objective`].

use crate::QecError;
use crate::circuit::Circuit;
use crate::counts::Counts;
use crate::simulator::Backend;
use rand::Rng;
use tracing::trace;

/// Magnitude of the diagonal Hamiltonian entries.
pub const PENALTY: f64 = 1_000_000.0;

/// Diagonal of the W-state penalty Hamiltonian over `num_qubits` qubits.
///
/// Basis states with exactly one qubit set get `-PENALTY`; every other state,
/// including the all-zero state, gets `+PENALTY`.
///
/// # Returns
///
/// The `2^num_qubits` diagonal entries, or `TooManyQubits` when the
/// diagonal cannot be indexed by a `usize`.
pub fn w_state_hamiltonian(num_qubits: usize) -> Result<Vec<f64>, QecError> {
    let dimension = u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or(QecError::TooManyQubits {
            requested: num_qubits,
            limit: usize::BITS as usize - 1,
        })?;
    Ok((0..dimension)
        .map(|i| if i.is_power_of_two() { -PENALTY } else { PENALTY })
        .collect())
}

/// Builds the measured QAOA circuit for `theta = β ++ γ`.
///
/// The layer count is `theta.len() / 2`. Layer `k` evolves under the
/// Hamiltonian for time `2γ_k`, then applies `rx(2β_k)` on every qubit.
/// Qubit `i` is measured into classical bit `i`.
pub fn qaoa_circuit(num_qubits: usize, theta: &[f64]) -> Result<Circuit, QecError> {
    let layers = theta.len() / 2;
    let (beta, gamma) = theta.split_at(layers);
    let hamiltonian = w_state_hamiltonian(num_qubits)?;
    let qubits: Vec<usize> = (0..num_qubits).collect();

    let mut circuit = Circuit::new(num_qubits, num_qubits);
    for &q in &qubits {
        circuit.h(q);
    }

    for layer in 0..layers {
        let time = 2.0 * gamma[layer];
        let phases = hamiltonian.iter().map(|&energy| -energy * time).collect();
        circuit.diagonal(&qubits, phases);

        for &q in &qubits {
            circuit.rx(q, 2.0 * beta[layer]);
        }
    }

    for &q in &qubits {
        circuit.measure(q, q);
    }
    Ok(circuit)
}

/// Scoring switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreOptions {
    /// Weight wrong outcomes by how far their Hamming weight is from one,
    /// instead of counting every wrong outcome alike.
    pub smooth: bool,

    /// Also penalise uneven spread across the single-excitation outcomes.
    pub equal_distribution: bool,
}

/// Error value of `counts` as a W-state sample; zero is a perfect W state.
pub fn score(counts: &Counts, shots: u64, options: ScoreOptions) -> f64 {
    let mut error = 0.0;
    for (bits, count) in counts.iter() {
        let ones = bits.bytes().filter(|&b| b == b'1').count();
        let count = count as f64;

        if options.smooth {
            error += count * (ones as f64 - 1.0).abs();
        } else if ones != 1 {
            error += count;
        }

        if options.equal_distribution && ones == 1 {
            let expected = shots as f64 / bits.len() as f64;
            error += (expected - count).abs() * 0.1;
        }
    }
    error / shots as f64
}

/// Initial parameter layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThetaSchedule {
    /// `β = 1`, `γ = 0` on every layer.
    OnesAndZeros,

    /// `β` falls linearly from 1 and `γ` rises linearly from 0.
    DecAndInc,
}

impl ThetaSchedule {
    pub const ALL: [ThetaSchedule; 2] = [ThetaSchedule::OnesAndZeros, ThetaSchedule::DecAndInc];

    /// Parameter vector for `layers` QAOA layers.
    pub fn initial(self, layers: usize) -> Vec<f64> {
        let p = layers as f64;
        match self {
            ThetaSchedule::OnesAndZeros => {
                let mut theta = vec![1.0; layers];
                theta.extend(std::iter::repeat_n(0.0, layers));
                theta
            }
            ThetaSchedule::DecAndInc => (0..layers)
                .map(|i| 1.0 - i as f64 / p)
                .chain((0..layers).map(|i| i as f64 / p))
                .collect(),
        }
    }
}

/// Objective closure for a minimizer: runs the circuit for `theta` and
/// scores the counts.
///
/// Every call draws fresh shots from `rng`, so repeated evaluations of the
/// same `theta` vary with sampling noise. A register wider than the backend
/// accepts fails every call with `TooManyQubits` before anything is built.
pub fn objective<'a, B: Backend, R: Rng>(
    backend: &'a B,
    num_qubits: usize,
    shots: u64,
    options: ScoreOptions,
    rng: &'a mut R,
) -> impl FnMut(&[f64]) -> Result<f64, QecError> + 'a {
    move |theta: &[f64]| {
        if num_qubits > backend.max_qubits() {
            return Err(QecError::TooManyQubits {
                requested: num_qubits,
                limit: backend.max_qubits(),
            });
        }
        let circuit = qaoa_circuit(num_qubits, theta)?;
        let counts = backend.run(&circuit, shots, &mut *rng)?;
        let value = score(&counts, shots, options);
        trace!(?theta, value, "objective evaluated");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::StatevectorBackend;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn hamiltonian_rewards_single_excitations_only() {
        let h = w_state_hamiltonian(3).unwrap();
        assert_eq!(h.len(), 8);
        for (i, &energy) in h.iter().enumerate() {
            let expected = if [1, 2, 4].contains(&i) { -PENALTY } else { PENALTY };
            assert_eq!(energy, expected, "entry {i}");
        }
    }

    #[test]
    fn perfect_w_sample_scores_zero() {
        let counts = Counts::from_pairs([("001", 100), ("010", 100), ("100", 100)]);
        let options = ScoreOptions {
            smooth: false,
            equal_distribution: true,
        };
        assert!(score(&counts, 300, options).abs() < 1e-12);
    }

    #[test]
    fn hard_and_smooth_scores_differ_on_heavy_outcomes() {
        let counts = Counts::from_pairs([("111", 10), ("000", 10), ("001", 20)]);
        let hard = score(&counts, 40, ScoreOptions::default());
        let smooth = score(
            &counts,
            40,
            ScoreOptions {
                smooth: true,
                equal_distribution: false,
            },
        );
        assert!((hard - 0.5).abs() < 1e-12);
        // |3-1|*10 + |0-1|*10 = 30
        assert!((smooth - 0.75).abs() < 1e-12);
    }

    #[test]
    fn uneven_spread_is_penalised() {
        let counts = Counts::from_pairs([("01", 30), ("10", 10)]);
        let options = ScoreOptions {
            smooth: false,
            equal_distribution: true,
        };
        // expected 20 each: (10 + 10) * 0.1 / 40
        assert!((score(&counts, 40, options) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn schedules_match_their_shapes() {
        assert_eq!(
            ThetaSchedule::OnesAndZeros.initial(2),
            vec![1.0, 1.0, 0.0, 0.0]
        );
        assert_eq!(
            ThetaSchedule::DecAndInc.initial(4),
            vec![1.0, 0.75, 0.5, 0.25, 0.0, 0.25, 0.5, 0.75]
        );
    }

    #[test]
    fn circuit_has_one_problem_unitary_per_layer() {
        let circuit = qaoa_circuit(3, &ThetaSchedule::DecAndInc.initial(2)).unwrap();
        let diagonals = circuit
            .gates()
            .iter()
            .filter(|g| matches!(g, crate::circuit::Gate::Diagonal { .. }))
            .count();
        assert_eq!(diagonals, 2);
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn zero_angles_leave_the_uniform_superposition() {
        let backend = StatevectorBackend::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut f = objective(&backend, 3, 4000, ScoreOptions::default(), &mut rng);
        // With β = γ = 0 every bitstring is equally likely; 3 of 8 are W outcomes.
        let value = f(&[0.0, 0.0]).unwrap();
        assert!((value - 5.0 / 8.0).abs() < 0.05, "score {value}");
    }

    #[test]
    fn wide_registers_fail_before_anything_is_built() {
        let backend = StatevectorBackend::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut f = objective(&backend, 64, 10, ScoreOptions::default(), &mut rng);
        assert_eq!(
            f(&[1.0, 0.0]).unwrap_err(),
            QecError::TooManyQubits {
                requested: 64,
                limit: 24
            }
        );
        drop(f);

        let mut g = objective(&backend, 40, 10, ScoreOptions::default(), &mut rng);
        assert!(matches!(
            g(&[1.0, 0.0]),
            Err(QecError::TooManyQubits { requested: 40, .. })
        ));
    }

    #[test]
    fn hamiltonian_beyond_a_word_is_an_error() {
        assert!(matches!(
            w_state_hamiltonian(64),
            Err(QecError::TooManyQubits { requested: 64, .. })
        ));
        assert!(qaoa_circuit(usize::MAX, &[1.0, 0.0]).is_err());
    }
}
