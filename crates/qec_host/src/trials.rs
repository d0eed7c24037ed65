use crate::stats::TrialStats;
use anyhow::{Context, Result};
use qec_common::layout;
use qec_core::{Counts, StatevectorBackend};
use qec_core::shor::{ShorConfig, TrialReport, build_circuit, run_trial};
use qec_io::loader;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Runs `trials` independent error-correction trials in parallel.
///
/// Trial `i` draws its error and its shots from a generator seeded with
/// `seed + i`, so the results do not depend on how rayon schedules the
/// work.
pub fn run_trials(config: &ShorConfig, trials: usize, seed: u64) -> Result<Vec<TrialReport>> {
    let backend = StatevectorBackend::default();

    (0..trials)
        .into_par_iter()
        .map(|i| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(i as u64));
            run_trial(config, &backend, &mut rng).with_context(|| format!("Trial {i} failed"))
        })
        .collect()
}

/// Runs the trials, prints the aggregate report, and optionally dumps the
/// listing of the first trial and every shot record.
pub fn run_shor(
    config: ShorConfig,
    trials: usize,
    seed: u64,
    b8_path: Option<&Path>,
    print_circuit: bool,
) -> Result<()> {
    info!(
        input = config.input,
        shots = config.shots,
        trials,
        seed,
        "starting Shor trials"
    );

    let start = Instant::now();
    let reports = run_trials(&config, trials, seed)?;
    let elapsed = start.elapsed();

    if print_circuit {
        if let Some(first) = reports.first() {
            let circuit = build_circuit(first.input, first.error)?;
            println!("{circuit}");
        }
    }

    let mut stats = TrialStats::new();
    for report in &reports {
        stats.update(report);
    }
    stats.print_report();
    println!("Time: {:.4} s", elapsed.as_secs_f64());

    if let Some(path) = b8_path {
        let records: Vec<u64> = reports
            .iter()
            .flat_map(|r| r.records.iter().copied())
            .collect();
        loader::write_b8_file(path, &records, layout::TOTAL_CLBITS)
            .with_context(|| format!("Failed to dump shots to {}", path.display()))?;
        info!(shots = records.len(), path = %path.display(), "wrote shot records");
    }

    Ok(())
}

/// Syndrome and data-register histograms of a Shor shot dump.
#[derive(Debug)]
pub struct DumpSummary {
    pub syndromes: Counts,
    pub data: Counts,
}

/// Reads a `.b8` dump written by [`run_shor`] and splits it into registers.
pub fn summarize_dump(path: &Path) -> Result<DumpSummary> {
    let records = loader::load_b8_records(path, layout::TOTAL_CLBITS)?;
    let counts = Counts::from_records(&records, layout::TOTAL_CLBITS);
    let syndrome_bits: Vec<usize> = layout::SYNDROME_CLBITS.collect();
    let data_bits: Vec<usize> = layout::DATA_CLBITS.collect();

    Ok(DumpSummary {
        syndromes: counts.marginal(&syndrome_bits),
        data: counts.marginal(&data_bits),
    })
}

/// Prints the `top` most frequent syndromes and data outcomes of a dump.
pub fn inspect_dump(path: &Path, top: usize) -> Result<()> {
    let summary = summarize_dump(path)?;
    info!(shots = summary.syndromes.shots(), path = %path.display(), "loaded shot records");

    println!("\nShot dump {}", path.display());
    println!("Shots: {}", summary.syndromes.shots());
    for (title, counts) in [("Syndromes", &summary.syndromes), ("Data", &summary.data)] {
        println!("{title}:");
        for (bits, count) in counts.sorted_by_count().into_iter().take(top) {
            println!("  {bits}  {count:>8}  {:.4}", counts.probability(bits));
        }
    }
    Ok(())
}
