//! Parser for text circuit listings.
//!
//! A listing is the `Display` form of a `Circuit`: a `qubits N` and a
//! `clbits M` header followed by one gate per line, for example
//!
//! ```text
//! qubits 2
//! clbits 2
//! h q0
//! cx q0 q1
//! u(3.141592653589793,0,0) q1
//! mcx !q0 -> q1
//! diag[0,0.5,0.5,0] q0 q1
//! measure q0 -> c0
//! barrier
//! ```
//!
//! Blank lines and `#` comments are ignored. Every gate goes through
//! `Circuit::try_append`, so a listing that parses is also range-checked.

use anyhow::{Context, Result, anyhow, bail};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, char, digit1, space0, space1};
use nom::combinator::{all_consuming, map, map_res, opt, success, verify};
use nom::multi::{many1, separated_list0};
use nom::number::complete::double;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use qec_common::gates::GateKind;
use qec_core::{Circuit, Control, Gate};
use std::fs;
use std::path::Path;

/// One meaningful listing line.
#[derive(Debug, Clone, PartialEq)]
enum Line {
    Qubits(usize),
    Clbits(usize),
    Gate(Gate),
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn qubit(input: &str) -> IResult<&str, usize> {
    preceded(char('q'), index)(input)
}

fn clbit(input: &str) -> IResult<&str, usize> {
    preceded(char('c'), index)(input)
}

fn control(input: &str) -> IResult<&str, Control> {
    map(pair(opt(char('!')), qubit), |(negated, q)| {
        Control::when(q, negated.is_none())
    })(input)
}

fn operand(input: &str) -> IResult<&str, usize> {
    preceded(space1, qubit)(input)
}

fn arrow(input: &str) -> IResult<&str, &str> {
    delimited(space1, tag("->"), space1)(input)
}

/// Comma-separated reals between `open` and `close`.
fn reals(open: char, close: char) -> impl FnMut(&str) -> IResult<&str, Vec<f64>> {
    move |input| {
        delimited(
            char(open),
            separated_list0(char(','), delimited(space0, double, space0)),
            char(close),
        )(input)
    }
}

/// Parses what follows the mnemonic of a gate of kind `kind`.
fn gate_body(kind: GateKind) -> impl FnMut(&str) -> IResult<&str, Gate> {
    move |input| match kind {
        GateKind::H => map(operand, Gate::H)(input),
        GateKind::X => map(operand, Gate::X)(input),
        GateKind::Rx => map(
            pair(angles(kind), operand),
            |(theta, qubit)| Gate::Rx {
                qubit,
                theta: theta[0],
            },
        )(input),
        GateKind::U => map(pair(angles(kind), operand), |(a, qubit)| Gate::U {
            qubit,
            theta: a[0],
            phi: a[1],
            lambda: a[2],
        })(input),
        GateKind::Cx => map(pair(operand, operand), |(control, target)| Gate::Cx {
            control,
            target,
        })(input),
        GateKind::Cz => map(pair(operand, operand), |(a, b)| Gate::Cz(a, b))(input),
        GateKind::Mcx => map(
            pair(many1(preceded(space1, control)), preceded(arrow, qubit)),
            |(controls, target)| Gate::Mcx { controls, target },
        )(input),
        GateKind::Diagonal => map(pair(reals('[', ']'), many1(operand)), |(phases, qubits)| {
            Gate::Diagonal { qubits, phases }
        })(input),
        GateKind::Measure => map(tuple((operand, arrow, clbit)), |(qubit, _, clbit)| {
            Gate::Measure { qubit, clbit }
        })(input),
        GateKind::Barrier => success(Gate::Barrier)(input),
    }
}

/// Parenthesised angle list holding exactly as many angles as `kind` takes.
fn angles(kind: GateKind) -> impl FnMut(&str) -> IResult<&str, Vec<f64>> {
    move |input| {
        verify(reals('(', ')'), |a: &Vec<f64>| a.len() == kind.angle_count())(input)
    }
}

fn header(input: &str) -> IResult<&str, Line> {
    alt((
        map(preceded(pair(tag("qubits"), space1), index), Line::Qubits),
        map(preceded(pair(tag("clbits"), space1), index), Line::Clbits),
    ))(input)
}

fn gate(input: &str) -> IResult<&str, Line> {
    let (rest, name) = alpha1(input)?;
    let Some(kind) = GateKind::from_mnemonic(name) else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    };
    map(gate_body(kind), Line::Gate)(rest)
}

fn line(input: &str) -> IResult<&str, Line> {
    all_consuming(terminated(alt((header, gate)), space0))(input)
}

/// Parses a circuit listing.
///
/// # Arguments
///
/// * `source` - Listing text
///
/// # Returns
///
/// The circuit, or an error naming the first offending line.
pub fn parse_circuit(source: &str) -> Result<Circuit> {
    let mut num_qubits = None;
    let mut num_clbits = None;
    let mut circuit: Option<Circuit> = None;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let (_, parsed) =
            line(text).map_err(|e| anyhow!("line {line_no}: cannot parse `{text}`: {e}"))?;

        match parsed {
            Line::Qubits(n) | Line::Clbits(n) if circuit.is_some() => {
                bail!("line {line_no}: register size {n} declared after the first gate");
            }
            Line::Qubits(n) => num_qubits = Some(n),
            Line::Clbits(n) => num_clbits = Some(n),
            Line::Gate(gate) => {
                if circuit.is_none() {
                    let qubits = num_qubits
                        .with_context(|| format!("line {line_no}: gate before the `qubits` header"))?;
                    circuit = Some(Circuit::new(qubits, num_clbits.unwrap_or(0)));
                }
                if let Some(circuit) = circuit.as_mut() {
                    circuit
                        .try_append(gate)
                        .with_context(|| format!("line {line_no}: invalid gate `{text}`"))?;
                }
            }
        }
    }

    match circuit {
        Some(circuit) => Ok(circuit),
        None => {
            let qubits = num_qubits.context("listing declares no `qubits` header")?;
            Ok(Circuit::new(qubits, num_clbits.unwrap_or(0)))
        }
    }
}

/// Reads and parses a circuit listing file.
pub fn load_circuit_file<P: AsRef<Path>>(path: P) -> Result<Circuit> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to open circuit listing {}", path.display()))?;
    parse_circuit(&source).with_context(|| format!("Failed to parse {}", path.display()))
}
