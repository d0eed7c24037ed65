//! Syndrome extraction.
//!
//! Eight ancillas are prepared in `|+⟩`, coupled to the data register, and
//! rotated back before measurement, so each ancilla reads the parity of a
//! stabilizer without collapsing the encoded logical value:
//!
//! * ancillas 0..6 take `Z⊗Z` parities of neighbouring qubits in a triplet
//!   through `cz` kickback;
//! * ancillas 6 and 7 take the `X^⊗6` parities of triplets 0+1 and 1+2
//!   through `cx` kickback.

use crate::circuit::Circuit;
use core::fmt;
use core::ops::Range;
use qec_common::layout::{self, BLOCKS, PHASE_PAIR_FIRST, PHASE_PAIR_SECOND, SYNDROME_QUBITS};

/// `(ancilla, data pair)` for every bit-flip parity check.
///
/// Ancillas `2t` and `2t + 1` both watch triplet `t`.
pub const BIT_FLIP_CHECKS: [(usize, [usize; 2]); 6] = [
    (0, [0, 1]),
    (1, [1, 2]),
    (2, [3, 4]),
    (3, [4, 5]),
    (4, [6, 7]),
    (5, [7, 8]),
];

/// `(ancilla, data span)` for the two phase-flip parity checks.
pub const PHASE_FLIP_CHECKS: [(usize, Range<usize>); 2] =
    [(PHASE_PAIR_FIRST, 0..6), (PHASE_PAIR_SECOND, 3..9)];

/// Appends ancilla preparation, the eight parity checks, the basis change
/// back, and measurement of every ancilla into the syndrome bits.
pub fn extract(circuit: &mut Circuit) {
    for ancilla in 0..SYNDROME_QUBITS {
        circuit.h(layout::syndrome(ancilla));
    }

    for (ancilla, pair) in BIT_FLIP_CHECKS {
        for q in pair {
            circuit.cz(layout::syndrome(ancilla), layout::data(q));
        }
    }

    for (ancilla, span) in PHASE_FLIP_CHECKS {
        for q in span {
            circuit.cx(layout::syndrome(ancilla), layout::data(q));
        }
    }

    for ancilla in 0..SYNDROME_QUBITS {
        circuit.h(layout::syndrome(ancilla));
    }
    circuit.barrier();

    for ancilla in 0..SYNDROME_QUBITS {
        circuit.measure(
            layout::syndrome(ancilla),
            layout::SYNDROME_CLBITS.start + ancilla,
        );
    }
}

/// Eight measured parity bits; bit `i` comes from ancilla `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Syndrome(u8);

impl Syndrome {
    /// No check fired.
    pub const CLEAN: Syndrome = Syndrome(0);

    /// Wraps raw parity bits; bit `i` is ancilla `i`.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw parity bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Extracts the syndrome bits from a packed shot record.
    pub fn from_record(record: u64) -> Self {
        Self((record >> layout::SYNDROME_CLBITS.start) as u8)
    }

    /// Parses an 8-character bitstring, ancilla 0 rightmost.
    pub fn parse(bitstring: &str) -> Option<Self> {
        if bitstring.len() != SYNDROME_QUBITS || !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        u8::from_str_radix(bitstring, 2).ok().map(Self)
    }

    /// Whether the check read by `ancilla` fired.
    pub fn bit(self, ancilla: usize) -> bool {
        (self.0 >> ancilla) & 1 == 1
    }

    /// True when no check fired.
    pub fn is_clean(self) -> bool {
        self.0 == 0
    }

    /// The two bit-flip checks watching triplet `block`.
    pub fn bit_flip_pair(self, block: usize) -> (bool, bool) {
        debug_assert!(block < BLOCKS);
        (self.bit(2 * block), self.bit(2 * block + 1))
    }

    /// The two phase-flip checks.
    pub fn phase_pair(self) -> (bool, bool) {
        (self.bit(PHASE_PAIR_FIRST), self.bit(PHASE_PAIR_SECOND))
    }

    /// Syndrome an X error on data qubit `qubit` fires.
    pub fn for_bit_flip(qubit: usize) -> Self {
        BIT_FLIP_CHECKS
            .iter()
            .filter(|(_, pair)| pair.contains(&qubit))
            .fold(Self::CLEAN, |s, &(ancilla, _)| Self(s.0 | 1 << ancilla))
    }

    /// Syndrome a Z error on data qubit `qubit` fires.
    pub fn for_phase_flip(qubit: usize) -> Self {
        PHASE_FLIP_CHECKS
            .iter()
            .filter(|(_, span)| span.contains(&qubit))
            .fold(Self::CLEAN, |s, &(ancilla, _)| Self(s.0 | 1 << ancilla))
    }
}

impl fmt::Display for Syndrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qec_common::layout::DATA_QUBITS;
    use std::collections::HashSet;

    #[test]
    fn bit_flip_syndromes_are_unique_per_qubit() {
        let syndromes: HashSet<Syndrome> = (0..DATA_QUBITS).map(Syndrome::for_bit_flip).collect();
        assert_eq!(syndromes.len(), DATA_QUBITS);
        assert!(!syndromes.contains(&Syndrome::CLEAN));
    }

    #[test]
    fn middle_of_second_triplet_fires_both_of_its_checks() {
        let s = Syndrome::for_bit_flip(4);
        assert_eq!(s.to_string(), "00001100");
        assert_eq!(s.bit_flip_pair(1), (true, true));
        assert_eq!(s.bit_flip_pair(0), (false, false));
        assert_eq!(s.phase_pair(), (false, false));
    }

    #[test]
    fn phase_flip_syndromes_identify_the_triplet() {
        for q in 0..DATA_QUBITS {
            let expected = match q / 3 {
                0 => (true, false),
                1 => (true, true),
                _ => (false, true),
            };
            assert_eq!(Syndrome::for_phase_flip(q).phase_pair(), expected);
        }
    }

    #[test]
    fn parse_and_display_agree() {
        let s = Syndrome::parse("10000001").unwrap();
        assert!(s.bit(0) && s.bit(7));
        assert_eq!(s.to_string(), "10000001");
        assert_eq!(Syndrome::parse("1000"), None);
        assert_eq!(Syndrome::parse("1000000x"), None);
    }

    #[test]
    fn record_keeps_only_syndrome_bits() {
        let record = (1u64 << 16) | 0b0000_0011;
        assert_eq!(Syndrome::from_record(record), Syndrome::from_bits(0b11));
    }

    #[test]
    fn extraction_measures_every_ancilla_once() {
        let mut circuit = Circuit::new(layout::TOTAL_QUBITS, layout::TOTAL_CLBITS);
        extract(&mut circuit);
        let measured: Vec<usize> = circuit
            .gates()
            .iter()
            .filter_map(|g| match *g {
                crate::circuit::Gate::Measure { qubit, .. } => Some(qubit),
                _ => None,
            })
            .collect();
        assert_eq!(measured, layout::SYNDROME.collect::<Vec<_>>());
    }
}
