//! Decoder and final readout.
//!
//! Runs the encoder's entangling gates backwards so that, once the error has
//! been corrected, the logical value sits on data qubit 0 and every other
//! data qubit is back to `|0⟩`.

use super::encoder::{FANOUT, SPREAD, hadamard_heads};
use crate::circuit::Circuit;
use qec_common::layout;

/// Appends the inverse of the encoder (without the input preparation).
pub fn decode(circuit: &mut Circuit) {
    for &(control, target) in FANOUT.iter().rev() {
        circuit.cx(layout::data(control), layout::data(target));
    }
    circuit.barrier();

    hadamard_heads(circuit);
    circuit.barrier();

    for &(control, target) in SPREAD.iter().rev() {
        circuit.cx(layout::data(control), layout::data(target));
    }
    circuit.barrier();
}

/// Appends measurement of every data qubit into the data classical bits.
pub fn measure_data(circuit: &mut Circuit) {
    for i in 0..layout::DATA_QUBITS {
        circuit.measure(layout::data(i), layout::data_clbit(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shor::encoder::encode;
    use crate::simulator::StatevectorBackend;

    #[test]
    fn decode_inverts_encode() {
        for input in [false, true] {
            let mut circuit = Circuit::new(layout::TOTAL_QUBITS, layout::TOTAL_CLBITS);
            encode(&mut circuit, input);
            decode(&mut circuit);
            measure_data(&mut circuit);

            let distribution = StatevectorBackend::default()
                .execute(&circuit)
                .unwrap()
                .record_distribution();
            let expected = (input as u64) << layout::data_clbit(0);
            assert!((distribution[&expected] - 1.0).abs() < 1e-9);
        }
    }
}
