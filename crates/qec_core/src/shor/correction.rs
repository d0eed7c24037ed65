//! Syndrome-to-correction lookup.
//!
//! Both error layers use the same two-bit lookup. A pair of parity checks
//! over three positions points at exactly one position when a single error
//! happened there, and at none when both checks are quiet. The lookup is an
//! explicit four-way branch; circuit emission walks the three firing
//! patterns and conditions one corrective X on each.
//!
//! Patterns produced by two or more errors land on the same branches and get
//! mis-corrected. That is inherent to a distance-3 code. [`Diagnosis`] flags
//! such syndromes instead of hiding them.

use super::syndrome::Syndrome;
use crate::circuit::{Circuit, Control};
use qec_common::layout::{self, BLOCK_SIZE, BLOCKS, PHASE_PAIR_FIRST, PHASE_PAIR_SECOND};

/// The three pair values that point at a position.
pub const FIRING_PATTERNS: [(bool, bool); 3] = [(true, false), (true, true), (false, true)];

/// Position within a group of three singled out by a check pair.
///
/// `first` watches positions 0 and 1, `second` watches positions 1 and 2.
pub fn locate(pair: (bool, bool)) -> Option<usize> {
    match pair {
        (false, false) => None,
        (true, false) => Some(0),
        (true, true) => Some(1),
        (false, true) => Some(2),
    }
}

fn pattern_controls(first: usize, second: usize, pattern: (bool, bool)) -> [Control; 2] {
    [
        Control::when(layout::syndrome(first), pattern.0),
        Control::when(layout::syndrome(second), pattern.1),
    ]
}

/// Appends the bit-flip and phase-flip corrections.
///
/// Every correction is conditioned on measured syndrome ancillas only, so it
/// behaves as classical feed-forward on the recorded syndrome.
pub fn apply(circuit: &mut Circuit) {
    for block in 0..BLOCKS {
        for pattern in FIRING_PATTERNS {
            let Some(position) = locate(pattern) else {
                continue;
            };
            let controls = pattern_controls(2 * block, 2 * block + 1, pattern);
            circuit.mcx(&controls, layout::data(layout::block_head(block) + position));
        }
    }
    circuit.barrier();

    for pattern in FIRING_PATTERNS {
        let Some(block) = locate(pattern) else {
            continue;
        };
        let head = layout::data(layout::block_head(block));
        let controls = pattern_controls(PHASE_PAIR_FIRST, PHASE_PAIR_SECOND, pattern);
        circuit.h(head).mcx(&controls, head).h(head);
    }
    circuit.barrier();
}

/// Corrections a syndrome calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Diagnosis {
    /// Data qubit to flip back, per triplet.
    pub bit_flips: [Option<usize>; BLOCKS],

    /// Triplet whose sign to flip back.
    pub phase_flip_block: Option<usize>,
}

impl From<Syndrome> for Diagnosis {
    fn from(syndrome: Syndrome) -> Self {
        let mut bit_flips = [None; BLOCKS];
        for (block, slot) in bit_flips.iter_mut().enumerate() {
            *slot = locate(syndrome.bit_flip_pair(block)).map(|p| layout::block_head(block) + p);
        }
        Self {
            bit_flips,
            phase_flip_block: locate(syndrome.phase_pair()),
        }
    }
}

impl Diagnosis {
    pub fn is_clean(&self) -> bool {
        self.bit_flips.iter().all(Option::is_none) && self.phase_flip_block.is_none()
    }

    pub fn flipped_qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.bit_flips.iter().flatten().copied()
    }

    /// Whether one error on one qubit can explain the syndrome.
    ///
    /// That allows at most one flagged triplet for bit flips and, when a
    /// phase flip is flagged as well, requires it to be in the same triplet
    /// (a single Y error).
    pub fn within_single_error_envelope(&self) -> bool {
        let flips: Vec<usize> = self.flipped_qubits().collect();
        match (flips.as_slice(), self.phase_flip_block) {
            ([], _) => true,
            ([_], None) => true,
            ([qubit], Some(block)) => qubit / BLOCK_SIZE == block,
            _ => false,
        }
    }
}
