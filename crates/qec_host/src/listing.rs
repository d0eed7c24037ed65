use anyhow::{Context, Result};
use qec_core::{Backend, StatevectorBackend};
use qec_io::parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::Path;
use tracing::info;

/// Loads a circuit listing, samples it, and prints the counts.
pub fn run_listing(path: &Path, shots: u64, seed: u64, top: usize) -> Result<()> {
    let circuit = parser::load_circuit_file(path)?;
    info!(
        path = %path.display(),
        qubits = circuit.num_qubits(),
        clbits = circuit.num_clbits(),
        gates = circuit.len(),
        "loaded listing"
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let counts = StatevectorBackend::default()
        .run(&circuit, shots, &mut rng)
        .with_context(|| format!("Failed to run {}", path.display()))?;

    println!("\nCounts ({} shots, {} outcomes)", counts.shots(), counts.len());
    for (bits, count) in counts.sorted_by_count().into_iter().take(top) {
        println!("  {bits}: {count}");
    }

    println!("Gate kinds:");
    for (kind, count) in circuit.kind_histogram() {
        println!("  {:<8} {count}", kind.mnemonic());
    }

    Ok(())
}
