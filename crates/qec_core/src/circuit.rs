//! Append-only circuit representation.
//!
//! A circuit is an ordered list of gates over a flat quantum register and a
//! flat classical register. Gates are validated as they are appended and are
//! never removed or edited afterwards, so a built circuit can be handed to a
//! backend or rendered as a text listing without further checks.

use crate::QecError;
use core::fmt;
use qec_common::gates::GateKind;

/// One control of a multi-controlled gate.
///
/// The gate fires only in basis states where `qubit` holds `value`. Mixing
/// `true` and `false` controls lets one gate select a specific syndrome
/// pattern instead of only the all-ones pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub qubit: usize,
    pub value: bool,
}

impl Control {
    /// Control firing when `qubit` is 1.
    pub const fn on(qubit: usize) -> Self {
        Self { qubit, value: true }
    }

    /// Control firing when `qubit` equals `value`.
    pub const fn when(qubit: usize, value: bool) -> Self {
        Self { qubit, value }
    }
}

/// A single circuit operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    H(usize),
    X(usize),
    Rx {
        qubit: usize,
        theta: f64,
    },
    /// `U(θ, φ, λ)` in the usual convention:
    /// `[[cos θ/2, -e^{iλ} sin θ/2], [e^{iφ} sin θ/2, e^{i(φ+λ)} cos θ/2]]`.
    U {
        qubit: usize,
        theta: f64,
        phi: f64,
        lambda: f64,
    },
    Cx {
        control: usize,
        target: usize,
    },
    Cz(usize, usize),
    Mcx {
        controls: Vec<Control>,
        target: usize,
    },
    /// `phases[k]` multiplies basis states whose listed qubits read `k`,
    /// with `qubits[0]` as the least significant bit of `k`.
    Diagonal {
        qubits: Vec<usize>,
        phases: Vec<f64>,
    },
    Measure {
        qubit: usize,
        clbit: usize,
    },
    Barrier,
}

impl Gate {
    /// Kind of this gate in the shared gate table.
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::H(_) => GateKind::H,
            Gate::X(_) => GateKind::X,
            Gate::Rx { .. } => GateKind::Rx,
            Gate::U { .. } => GateKind::U,
            Gate::Cx { .. } => GateKind::Cx,
            Gate::Cz(..) => GateKind::Cz,
            Gate::Mcx { .. } => GateKind::Mcx,
            Gate::Diagonal { .. } => GateKind::Diagonal,
            Gate::Measure { .. } => GateKind::Measure,
            Gate::Barrier => GateKind::Barrier,
        }
    }

    /// Every qubit the gate touches, controls included.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::H(q) | Gate::X(q) => vec![*q],
            Gate::Rx { qubit, .. } | Gate::U { qubit, .. } | Gate::Measure { qubit, .. } => {
                vec![*qubit]
            }
            Gate::Cx { control, target } => vec![*control, *target],
            Gate::Cz(a, b) => vec![*a, *b],
            Gate::Mcx { controls, target } => controls
                .iter()
                .map(|c| c.qubit)
                .chain(core::iter::once(*target))
                .collect(),
            Gate::Diagonal { qubits, .. } => qubits.clone(),
            Gate::Barrier => Vec::new(),
        }
    }

    /// Qubits whose computational-basis value the gate can change.
    ///
    /// Controls, `cz` operands, and diagonal gates leave basis values intact,
    /// which is what allows them to follow a measurement of those qubits.
    pub fn basis_changing_qubits(&self) -> Vec<usize> {
        match self {
            Gate::H(q) | Gate::X(q) => vec![*q],
            Gate::Rx { qubit, .. } | Gate::U { qubit, .. } => vec![*qubit],
            Gate::Cx { target, .. } | Gate::Mcx { target, .. } => vec![*target],
            Gate::Cz(..) | Gate::Diagonal { .. } | Gate::Measure { .. } | Gate::Barrier => {
                Vec::new()
            }
        }
    }
}

/// Ordered, append-only list of gates over fixed-width registers.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Creates an empty circuit over `num_qubits` qubits and `num_clbits`
    /// classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            gates: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of gates of each kind, in gate-table order.
    pub fn kind_histogram(&self) -> Vec<(GateKind, usize)> {
        GateKind::ALL
            .into_iter()
            .map(|kind| (kind, self.gates.iter().filter(|g| g.kind() == kind).count()))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// Validates and appends a gate.
    ///
    /// # Returns
    ///
    /// The circuit for chaining, or the first construction error found:
    /// an operand outside either register, a repeated operand, or a
    /// diagonal phase table of the wrong length.
    pub fn try_append(&mut self, gate: Gate) -> Result<&mut Self, QecError> {
        let operands = gate.qubits();
        for (i, &qubit) in operands.iter().enumerate() {
            if qubit >= self.num_qubits {
                return Err(QecError::QubitOutOfRange {
                    qubit,
                    width: self.num_qubits,
                });
            }
            if operands[..i].contains(&qubit) {
                return Err(QecError::DuplicateQubit {
                    gate: gate.kind().mnemonic(),
                    qubit,
                });
            }
        }

        match &gate {
            Gate::Measure { clbit, .. } if *clbit >= self.num_clbits => {
                return Err(QecError::ClbitOutOfRange {
                    clbit: *clbit,
                    width: self.num_clbits,
                });
            }
            Gate::Diagonal { qubits, phases } => {
                let Some(expected) = u32::try_from(qubits.len())
                    .ok()
                    .and_then(|n| 1usize.checked_shl(n))
                else {
                    return Err(QecError::DiagonalTooWide {
                        qubits: qubits.len(),
                    });
                };
                if phases.len() != expected {
                    return Err(QecError::DiagonalArity {
                        qubits: qubits.len(),
                        expected,
                        actual: phases.len(),
                    });
                }
            }
            _ => {}
        }

        self.gates.push(gate);
        Ok(self)
    }

    /// Appends a gate built by trusted code.
    ///
    /// # Panics
    ///
    /// Panics on any error `try_append` would return; a malformed circuit
    /// built programmatically is a bug at the call site.
    pub fn append(&mut self, gate: Gate) -> &mut Self {
        if let Err(err) = self.try_append(gate) {
            panic!("invalid circuit construction: {err}");
        }
        self
    }

    /// Appends a Hadamard on `qubit`.
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.append(Gate::H(qubit))
    }

    /// Appends a Pauli-X on `qubit`.
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.append(Gate::X(qubit))
    }

    /// Appends an X-axis rotation by `theta` radians.
    pub fn rx(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.append(Gate::Rx { qubit, theta })
    }

    /// Appends a general rotation `U(θ, φ, λ)`.
    ///
    /// # Arguments
    ///
    /// * `qubit` - Target qubit
    /// * `theta`, `phi`, `lambda` - Euler angles in the `U` convention
    pub fn u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) -> &mut Self {
        self.append(Gate::U {
            qubit,
            theta,
            phi,
            lambda,
        })
    }

    /// Appends a CNOT from `control` onto `target`.
    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.append(Gate::Cx { control, target })
    }

    /// Appends a controlled-Z; the two operands are interchangeable.
    pub fn cz(&mut self, a: usize, b: usize) -> &mut Self {
        self.append(Gate::Cz(a, b))
    }

    /// Appends an X on `target` that fires only when every control holds
    /// its required value.
    ///
    /// # Arguments
    ///
    /// * `controls` - Control qubits, each with the value it must hold
    /// * `target` - Qubit to flip
    pub fn mcx(&mut self, controls: &[Control], target: usize) -> &mut Self {
        self.append(Gate::Mcx {
            controls: controls.to_vec(),
            target,
        })
    }

    /// Appends a diagonal phase gate over `qubits`.
    ///
    /// `phases[k]` is applied to the basis state whose bits, gathered from
    /// `qubits` with `qubits[0]` lowest, spell `k`. The table must hold
    /// exactly `2^qubits.len()` entries.
    pub fn diagonal(&mut self, qubits: &[usize], phases: Vec<f64>) -> &mut Self {
        self.append(Gate::Diagonal {
            qubits: qubits.to_vec(),
            phases,
        })
    }

    /// Appends a computational-basis measurement of `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        self.append(Gate::Measure { qubit, clbit })
    }

    /// Appends an ordering marker.
    pub fn barrier(&mut self) -> &mut Self {
        self.append(Gate::Barrier)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value {
            write!(f, "q{}", self.qubit)
        } else {
            write!(f, "!q{}", self.qubit)
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind().mnemonic();
        match self {
            Gate::H(q) | Gate::X(q) => write!(f, "{name} q{q}"),
            Gate::Rx { qubit, theta } => write!(f, "{name}({theta}) q{qubit}"),
            Gate::U {
                qubit,
                theta,
                phi,
                lambda,
            } => write!(f, "{name}({theta},{phi},{lambda}) q{qubit}"),
            Gate::Cx { control, target } => write!(f, "{name} q{control} q{target}"),
            Gate::Cz(a, b) => write!(f, "{name} q{a} q{b}"),
            Gate::Mcx { controls, target } => {
                write!(f, "{name}")?;
                for control in controls {
                    write!(f, " {control}")?;
                }
                write!(f, " -> q{target}")
            }
            Gate::Diagonal { qubits, phases } => {
                write!(f, "{name}[")?;
                write_list(f, phases)?;
                write!(f, "]")?;
                for q in qubits {
                    write!(f, " q{q}")?;
                }
                Ok(())
            }
            Gate::Measure { qubit, clbit } => write!(f, "{name} q{qubit} -> c{clbit}"),
            Gate::Barrier => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qubits {}", self.num_qubits)?;
        writeln!(f, "clbits {}", self.num_clbits)?;
        for gate in &self.gates {
            writeln!(f, "{gate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_appends_in_order() {
        let mut circuit = Circuit::new(3, 1);
        circuit.h(0).cx(0, 1).cz(1, 2).measure(2, 0);

        let kinds: Vec<GateKind> = circuit.gates().iter().map(Gate::kind).collect();
        assert_eq!(
            kinds,
            vec![GateKind::H, GateKind::Cx, GateKind::Cz, GateKind::Measure]
        );
        assert_eq!(circuit.len(), 4);
    }

    #[test]
    fn try_append_rejects_out_of_range_operands() {
        let mut circuit = Circuit::new(2, 1);
        assert_eq!(
            circuit.try_append(Gate::Cx {
                control: 0,
                target: 2
            }),
            Err(QecError::QubitOutOfRange { qubit: 2, width: 2 })
        );
        assert_eq!(
            circuit.try_append(Gate::Measure { qubit: 1, clbit: 1 }),
            Err(QecError::ClbitOutOfRange { clbit: 1, width: 1 })
        );
        assert!(circuit.is_empty());
    }

    #[test]
    fn try_append_rejects_repeated_operands() {
        let mut circuit = Circuit::new(3, 0);
        let err = circuit
            .try_append(Gate::Mcx {
                controls: vec![Control::on(1), Control::when(2, false)],
                target: 1,
            })
            .unwrap_err();
        assert_eq!(
            err,
            QecError::DuplicateQubit {
                gate: "mcx",
                qubit: 1
            }
        );
    }

    #[test]
    fn diagonal_needs_one_phase_per_basis_state() {
        let mut circuit = Circuit::new(2, 0);
        let err = circuit
            .try_append(Gate::Diagonal {
                qubits: vec![0, 1],
                phases: vec![0.0; 3],
            })
            .unwrap_err();
        assert_eq!(
            err,
            QecError::DiagonalArity {
                qubits: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn diagonal_over_a_word_of_qubits_is_rejected() {
        let mut circuit = Circuit::new(64, 0);
        let qubits: Vec<usize> = (0..64).collect();
        let err = circuit
            .try_append(Gate::Diagonal {
                qubits,
                phases: vec![0.0],
            })
            .unwrap_err();
        assert_eq!(err, QecError::DiagonalTooWide { qubits: 64 });
        assert!(circuit.is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid circuit construction")]
    fn builder_panics_on_programmer_error() {
        Circuit::new(9, 0).h(9);
    }

    #[test]
    fn listing_renders_every_operand() {
        let mut circuit = Circuit::new(3, 2);
        circuit
            .u(0, 1.5, 0.25, 3.0)
            .mcx(&[Control::on(1), Control::when(2, false)], 0)
            .diagonal(&[2], vec![0.5, -0.5])
            .measure(1, 1)
            .barrier();

        let text = circuit.to_string();
        assert_eq!(
            text,
            "qubits 3\nclbits 2\nu(1.5,0.25,3) q0\nmcx q1 !q2 -> q0\n\
             diag[0.5,-0.5] q2\nmeasure q1 -> c1\nbarrier\n"
        );
    }

    #[test]
    fn basis_changing_qubits_exclude_controls() {
        let gate = Gate::Mcx {
            controls: vec![Control::on(0), Control::on(1)],
            target: 2,
        };
        assert_eq!(gate.basis_changing_qubits(), vec![2]);
        assert!(Gate::Cz(0, 1).basis_changing_qubits().is_empty());
    }
}
