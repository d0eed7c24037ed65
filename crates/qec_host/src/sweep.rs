//! QAOA grid scoring.
//!
//! Evaluates the W-state objective at the initial parameters of every
//! (qubit count, depth, schedule) combination. This is the starting point a
//! minimizer would refine; no minimization happens here.

use anyhow::{Context, Result};
use qec_core::StatevectorBackend;
use qec_core::qaoa::{self, ScoreOptions, ThetaSchedule};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

/// One scored grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    pub num_qubits: usize,
    pub depth: usize,
    pub schedule: ThetaSchedule,
    pub score: f64,
}

/// Every combination of the three axes, qubit count outermost.
pub fn grid(
    qubits: &[usize],
    depths: &[usize],
    schedules: &[ThetaSchedule],
) -> Vec<(usize, usize, ThetaSchedule)> {
    let mut points = Vec::with_capacity(qubits.len() * depths.len() * schedules.len());
    for &n in qubits {
        for &p in depths {
            for &schedule in schedules {
                points.push((n, p, schedule));
            }
        }
    }
    points
}

/// Scores every grid point in parallel; point `i` samples with seed `seed + i`.
pub fn score_grid(
    points: &[(usize, usize, ThetaSchedule)],
    shots: u64,
    options: ScoreOptions,
    seed: u64,
) -> Result<Vec<GridPoint>> {
    let backend = StatevectorBackend::default();

    points
        .par_iter()
        .enumerate()
        .map(|(i, &(num_qubits, depth, schedule))| -> Result<GridPoint> {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(i as u64));
            let mut objective = qaoa::objective(&backend, num_qubits, shots, options, &mut rng);
            let score = objective(&schedule.initial(depth)).with_context(|| {
                format!("Scoring n={num_qubits} p={depth} {schedule:?} failed")
            })?;
            Ok(GridPoint {
                num_qubits,
                depth,
                schedule,
                score,
            })
        })
        .collect()
}

/// Scores the grid and prints one row per point plus the best point per
/// qubit count.
pub fn run_sweep(
    qubits: &[usize],
    depths: &[usize],
    schedules: &[ThetaSchedule],
    shots: u64,
    options: ScoreOptions,
    seed: u64,
) -> Result<()> {
    let points = grid(qubits, depths, schedules);
    info!(points = points.len(), shots, ?options, "starting QAOA sweep");

    let start = Instant::now();
    let scored = score_grid(&points, shots, options, seed)?;
    let elapsed = start.elapsed();

    println!("\nW-State QAOA (initial parameters)");
    println!("{:>3} {:>3} {:<15} {:>10}", "n", "p", "schedule", "score");
    for point in &scored {
        println!(
            "{:>3} {:>3} {:<15} {:>10.6}",
            point.num_qubits,
            point.depth,
            format!("{:?}", point.schedule),
            point.score
        );
    }

    println!("Best per qubit count:");
    for &n in qubits {
        let best = scored
            .iter()
            .filter(|p| p.num_qubits == n)
            .min_by(|a, b| a.score.total_cmp(&b.score));
        if let Some(best) = best {
            println!(
                "  n={}: p={} {:?} score {:.6}",
                n, best.depth, best.schedule, best.score
            );
        }
    }
    println!("Time: {:.4} s", elapsed.as_secs_f64());

    Ok(())
}
