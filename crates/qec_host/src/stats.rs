//! Aggregate statistics over many error-correction trials.
//!
//! Collects per-trial reports into shot-level totals: how often the decoded
//! logical bit disagreed with the input, how often the syndrome fell outside
//! the single-error envelope, and which syndromes were seen.

use qec_core::shor::{InjectedError, TrialReport};
use std::collections::BTreeMap;

/// Running totals over completed trials.
#[derive(Debug, Clone, Default)]
pub struct TrialStats {
    pub trials: u64,
    pub shots: u64,

    /// Shots whose decoded logical bit differs from the input.
    pub logical_failures: u64,

    pub outside_envelope_shots: u64,

    /// Trials whose drawn error was the identity.
    pub clean_trials: u64,

    /// Shot count per observed syndrome, across all trials.
    pub syndromes: BTreeMap<String, u64>,
}

impl TrialStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one trial into the totals.
    pub fn update(&mut self, report: &TrialReport) {
        let expected = if report.input { "1" } else { "0" };
        let shots = report.logical.shots();

        self.trials += 1;
        self.shots += shots;
        self.logical_failures += shots - report.logical.get(expected);
        self.outside_envelope_shots += report.outside_envelope_shots;
        if report.error == InjectedError::Identity {
            self.clean_trials += 1;
        }
        for (syndrome, count) in report.syndromes.iter() {
            *self.syndromes.entry(syndrome.to_owned()).or_insert(0) += count;
        }
    }

    /// Fraction of all shots that decoded to the wrong logical value.
    pub fn failure_rate(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.logical_failures as f64 / self.shots as f64
        }
    }

    /// Prints totals, a 95% interval on the failure rate, and the most
    /// common syndromes.
    pub fn print_report(&self) {
        let (low, high) = wilson_ci(self.logical_failures, self.shots, 1.96);

        println!("\nShor Code Trials");
        println!("Trials:           {}", self.trials);
        println!("Shots:            {}", self.shots);
        println!("Error-free:       {}", self.clean_trials);
        println!(
            "Logical failures: {} ({:.4}%, 95% CI {:.4}%-{:.4}%)",
            self.logical_failures,
            self.failure_rate() * 100.0,
            low * 100.0,
            high * 100.0
        );
        println!("Outside envelope: {}", self.outside_envelope_shots);

        let mut ranked: Vec<(&String, &u64)> = self.syndromes.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        println!("Syndromes (top 10):");
        for (syndrome, count) in ranked.into_iter().take(10) {
            println!("  {syndrome}: {count}");
        }
    }
}

/// Wilson score interval for `successes` out of `trials`.
pub fn wilson_ci(successes: u64, trials: u64, z: f64) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 1.0);
    }

    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let spread = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt() / denom;

    ((center - spread).max(0.0), (center + spread).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qec_core::StatevectorBackend;
    use qec_core::shor::{ErrorModel, ShorConfig, run_trial};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn trial(error: ErrorModel, seed: u64) -> TrialReport {
        let config = ShorConfig {
            input: true,
            shots: 50,
            error,
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        run_trial(&config, &StatevectorBackend::default(), &mut rng).unwrap()
    }

    #[test]
    fn totals_accumulate_across_trials() {
        let mut stats = TrialStats::new();
        stats.update(&trial(ErrorModel::Disabled, 1));
        stats.update(&trial(
            ErrorModel::Fixed(InjectedError::BitFlip { qubit: 4 }),
            2,
        ));

        assert_eq!(stats.trials, 2);
        assert_eq!(stats.shots, 100);
        assert_eq!(stats.clean_trials, 1);
        assert_eq!(stats.logical_failures, 0);
        assert_eq!(stats.syndromes.get("00000000"), Some(&50));
        assert_eq!(stats.syndromes.get("00001100"), Some(&50));
        assert_eq!(stats.failure_rate(), 0.0);
    }

    #[test]
    fn wilson_interval_brackets_the_estimate() {
        let (low, high) = wilson_ci(5, 100, 1.96);
        assert!(low < 0.05 && 0.05 < high);
        assert_eq!(wilson_ci(0, 0, 1.96), (0.0, 1.0));
        let (low, _) = wilson_ci(0, 1000, 1.96);
        assert!(low < 1e-12);
    }
}
