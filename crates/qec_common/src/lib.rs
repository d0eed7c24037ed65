//! Common definitions shared across the circuit toolkit.
//!
//! This crate provides the register layout of the 9-qubit Shor code and the
//! gate-kind table used by the circuit model, the listing parser, and the
//! host tools. It carries no runtime state.

#![no_std]

// Flat register layout for the Shor code experiment.
//
// The redundant (data) qubits and the syndrome ancillas live in one flat
// register and are told apart purely by index range. The classical register
// follows the same scheme: syndrome bits first, then the data readout.
pub mod layout {
    use core::ops::Range;

    /// Number of physical qubits encoding one logical qubit.
    pub const DATA_QUBITS: usize = 9;

    /// Number of ancilla qubits used for syndrome extraction.
    ///
    /// Six ancillas check bit-flip parity inside each triplet and two check
    /// phase-flip parity across pairs of triplets.
    pub const SYNDROME_QUBITS: usize = 8;

    /// Total width of the flat quantum register.
    pub const TOTAL_QUBITS: usize = DATA_QUBITS + SYNDROME_QUBITS;

    /// Qubits per triplet (block) of the outer repetition code.
    pub const BLOCK_SIZE: usize = 3;

    /// Number of triplets.
    pub const BLOCKS: usize = DATA_QUBITS / BLOCK_SIZE;

    /// Qubit index range holding the redundant encoding.
    pub const DATA: Range<usize> = 0..DATA_QUBITS;

    /// Qubit index range holding the syndrome ancillas.
    pub const SYNDROME: Range<usize> = DATA_QUBITS..TOTAL_QUBITS;

    /// Classical bits receiving the syndrome measurement.
    pub const SYNDROME_CLBITS: Range<usize> = 0..SYNDROME_QUBITS;

    /// Classical bits receiving the data-register readout.
    pub const DATA_CLBITS: Range<usize> = SYNDROME_QUBITS..SYNDROME_QUBITS + DATA_QUBITS;

    /// Total width of the classical register.
    pub const TOTAL_CLBITS: usize = SYNDROME_QUBITS + DATA_QUBITS;

    /// Syndrome bit carrying the X-parity of triplets 0 and 1.
    pub const PHASE_PAIR_FIRST: usize = 6;

    /// Syndrome bit carrying the X-parity of triplets 1 and 2.
    pub const PHASE_PAIR_SECOND: usize = 7;

    /// Flat index of data qubit `i`.
    #[inline(always)]
    pub const fn data(i: usize) -> usize {
        DATA.start + i
    }

    /// Flat index of syndrome ancilla `i`.
    #[inline(always)]
    pub const fn syndrome(i: usize) -> usize {
        SYNDROME.start + i
    }

    /// Classical bit receiving data qubit `i`.
    #[inline(always)]
    pub const fn data_clbit(i: usize) -> usize {
        DATA_CLBITS.start + i
    }

    /// First data qubit of triplet `block`.
    #[inline(always)]
    pub const fn block_head(block: usize) -> usize {
        block * BLOCK_SIZE
    }
}

/// Gate kinds understood by the circuit model and its text listing.
///
/// Defines the closed set of operations a circuit may contain together with
/// the mnemonic each one uses in the listing format. The numeric values give
/// every kind a stable compact identifier for histograms and dispatch.
pub mod gates {
    /// Operation kind of a single circuit entry.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum GateKind {
        /// Hadamard on one qubit.
        ///
        /// Exchanges the Z and X bases; the Shor code uses it both to move
        /// between the bit-flip and phase-flip layers and to prepare and
        /// read out syndrome ancillas in the X basis.
        H = 0x01,

        /// Pauli-X on one qubit.
        X = 0x02,

        /// Rotation about the X axis by an angle.
        Rx = 0x03,

        /// General single-qubit rotation `U(θ, φ, λ)`.
        ///
        /// Any single-qubit unitary up to global phase; used to model an
        /// arbitrary error on one physical qubit.
        U = 0x04,

        /// Controlled-NOT (control, target).
        Cx = 0x10,

        /// Controlled-Z, symmetric in its two qubits.
        Cz = 0x11,

        /// NOT on a target conditioned on every control holding a given value.
        ///
        /// Each control carries its own required value, so a single entry
        /// expresses one branch of a syndrome lookup.
        Mcx = 0x12,

        /// Diagonal phase unitary over a list of qubits.
        ///
        /// Carries one phase per computational basis state of the listed
        /// qubits, which is how a diagonal Hamiltonian evolution is expressed.
        Diagonal = 0x20,

        /// Computational-basis measurement of a qubit into a classical bit.
        Measure = 0x30,

        /// Ordering marker with no effect on the state.
        Barrier = 0xFF,
    }

    impl GateKind {
        /// Every kind, in identifier order.
        pub const ALL: [GateKind; 10] = [
            GateKind::H,
            GateKind::X,
            GateKind::Rx,
            GateKind::U,
            GateKind::Cx,
            GateKind::Cz,
            GateKind::Mcx,
            GateKind::Diagonal,
            GateKind::Measure,
            GateKind::Barrier,
        ];

        /// Listing mnemonic for this kind.
        pub const fn mnemonic(self) -> &'static str {
            match self {
                GateKind::H => "h",
                GateKind::X => "x",
                GateKind::Rx => "rx",
                GateKind::U => "u",
                GateKind::Cx => "cx",
                GateKind::Cz => "cz",
                GateKind::Mcx => "mcx",
                GateKind::Diagonal => "diag",
                GateKind::Measure => "measure",
                GateKind::Barrier => "barrier",
            }
        }

        /// Looks up a kind by its listing mnemonic.
        pub fn from_mnemonic(name: &str) -> Option<Self> {
            Self::ALL.into_iter().find(|kind| kind.mnemonic() == name)
        }

        /// Number of real parameters the kind carries in its listing.
        ///
        /// `Diagonal` has a variable-length phase list and reports zero here.
        pub const fn angle_count(self) -> usize {
            match self {
                GateKind::Rx => 1,
                GateKind::U => 3,
                _ => 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::gates::GateKind;
    use super::layout;

    #[test]
    fn mnemonics_resolve_back_to_their_kind() {
        for kind in GateKind::ALL {
            assert_eq!(GateKind::from_mnemonic(kind.mnemonic()), Some(kind));
        }
        assert_eq!(GateKind::from_mnemonic("ccx"), None);
    }

    #[test]
    fn registers_are_disjoint_and_cover_the_flat_layout() {
        assert_eq!(layout::DATA.end, layout::SYNDROME.start);
        assert_eq!(layout::SYNDROME.end, layout::TOTAL_QUBITS);
        assert_eq!(layout::syndrome(0), 9);
        assert_eq!(layout::data_clbit(8), 16);
        assert_eq!(layout::block_head(2), 6);
        assert_eq!(layout::TOTAL_CLBITS, 17);
    }
}
