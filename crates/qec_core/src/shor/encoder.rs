//! Logical-qubit encoder.
//!
//! Spreads the value of data qubit 0 across the triplet heads, moves the
//! heads into the Hadamard basis, then fans every head out across its
//! triplet. The result is `(|000⟩ ± |111⟩)^⊗3` up to normalisation, with the
//! sign carrying the logical value.

use crate::circuit::Circuit;
use qec_common::layout::{self, BLOCKS};

/// CNOTs copying the input onto the other triplet heads.
pub const SPREAD: [(usize, usize); 2] = [(0, 3), (0, 6)];

/// CNOTs copying each triplet head onto the rest of its triplet.
pub const FANOUT: [(usize, usize); 6] = [(0, 1), (0, 2), (3, 4), (3, 5), (6, 7), (6, 8)];

/// Appends the Hadamard layer over the triplet heads.
pub(crate) fn hadamard_heads(circuit: &mut Circuit) {
    for block in 0..BLOCKS {
        circuit.h(layout::data(layout::block_head(block)));
    }
}

/// Appends preparation of `input` on data qubit 0 and the full encoding.
///
/// Deterministic: the same input always yields the same gate sequence.
pub fn encode(circuit: &mut Circuit, input: bool) {
    if input {
        circuit.x(layout::data(0));
    }

    for (control, target) in SPREAD {
        circuit.cx(layout::data(control), layout::data(target));
    }
    circuit.barrier();

    hadamard_heads(circuit);
    circuit.barrier();

    for (control, target) in FANOUT {
        circuit.cx(layout::data(control), layout::data(target));
    }
    circuit.barrier();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::StatevectorBackend;

    fn encoded(input: bool) -> Vec<f64> {
        let mut circuit = Circuit::new(layout::DATA_QUBITS, 0);
        encode(&mut circuit, input);
        StatevectorBackend::default()
            .execute(&circuit)
            .unwrap()
            .state
            .probabilities()
    }

    #[test]
    fn codewords_are_uniform_over_triplet_repetitions() {
        for input in [false, true] {
            let probabilities = encoded(input);
            let support: Vec<usize> = probabilities
                .iter()
                .enumerate()
                .filter(|(_, p)| **p > 1e-12)
                .map(|(i, _)| i)
                .collect();

            assert_eq!(support.len(), 8);
            for basis in support {
                for block in 0..BLOCKS {
                    let triplet = (basis >> (3 * block)) & 0b111;
                    assert!(triplet == 0b000 || triplet == 0b111);
                }
                assert!((probabilities[basis] - 0.125).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut a = Circuit::new(layout::DATA_QUBITS, 0);
        let mut b = Circuit::new(layout::DATA_QUBITS, 0);
        encode(&mut a, true);
        encode(&mut b, true);
        assert_eq!(a, b);
    }
}
