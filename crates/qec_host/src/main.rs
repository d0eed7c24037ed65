mod listing;
mod stats;
mod sweep;
mod trials;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use qec_common::layout;
use qec_core::qaoa::{ScoreOptions, ThetaSchedule};
use qec_core::shor::{ErrorModel, InjectedError, ShorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qec", about = "Shor-code trials and W-state QAOA scoring")]
struct Cli {
    /// Logging level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ErrorArg {
    #[value(name = "none")]
    Disabled,
    Random,
    BitFlip,
    PhaseFlip,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScheduleArg {
    OnesAndZeros,
    DecAndInc,
}

impl From<ScheduleArg> for ThetaSchedule {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::OnesAndZeros => ThetaSchedule::OnesAndZeros,
            ScheduleArg::DecAndInc => ThetaSchedule::DecAndInc,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode, disturb, correct, and decode one logical qubit.
    Shor {
        /// Logical value to protect (0 or 1)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
        input: u8,
        #[arg(long, default_value_t = 1024)]
        shots: u64,
        #[arg(long, default_value_t = 1)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = ErrorArg::Random)]
        error: ErrorArg,
        /// Data qubit for the fixed bit-flip and phase-flip errors
        #[arg(long, default_value_t = 0)]
        qubit: usize,
        /// Dump every shot record to this .b8 file
        #[arg(long)]
        b8: Option<PathBuf>,
        #[arg(long)]
        print_circuit: bool,
    },
    /// Score the W-state QAOA objective over a parameter grid.
    Qaoa {
        #[arg(long, value_delimiter = ',', default_value = "3,4")]
        qubits: Vec<usize>,
        #[arg(long, default_value_t = 1024)]
        shots: u64,
        #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
        depths: Vec<usize>,
        #[arg(long, value_enum, value_delimiter = ',', default_value = "ones-and-zeros,dec-and-inc")]
        schedules: Vec<ScheduleArg>,
        #[arg(long)]
        smooth: bool,
        #[arg(long)]
        equal_distribution: bool,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Execute a circuit listing file and print its counts.
    Run {
        listing: PathBuf,
        #[arg(long, default_value_t = 1024)]
        shots: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of outcomes to print
        #[arg(long, default_value_t = 16)]
        top: usize,
    },
    /// Summarize a .b8 shot dump written by `shor --b8`.
    Inspect {
        b8: PathBuf,
        /// Number of outcomes to print per register
        #[arg(long, default_value_t = 8)]
        top: usize,
    },
}

fn error_model(error: ErrorArg, qubit: usize) -> Result<ErrorModel> {
    let fixed = matches!(error, ErrorArg::BitFlip | ErrorArg::PhaseFlip);
    if fixed && qubit >= layout::DATA_QUBITS {
        bail!("--qubit must name one of the 9 data qubits, got {qubit}");
    }
    Ok(match error {
        ErrorArg::Disabled => ErrorModel::Disabled,
        ErrorArg::Random => ErrorModel::RandomRotation,
        ErrorArg::BitFlip => ErrorModel::Fixed(InjectedError::BitFlip { qubit }),
        ErrorArg::PhaseFlip => ErrorModel::Fixed(InjectedError::PhaseFlip { qubit }),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Shor {
            input,
            shots,
            trials,
            seed,
            error,
            qubit,
            b8,
            print_circuit,
        } => {
            let config = ShorConfig {
                input: input == 1,
                shots,
                error: error_model(error, qubit)?,
            };
            trials::run_shor(config, trials, seed, b8.as_deref(), print_circuit)?;
        }
        Commands::Qaoa {
            qubits,
            shots,
            depths,
            schedules,
            smooth,
            equal_distribution,
            seed,
        } => {
            let schedules: Vec<ThetaSchedule> = schedules.into_iter().map(Into::into).collect();
            let options = ScoreOptions {
                smooth,
                equal_distribution,
            };
            sweep::run_sweep(&qubits, &depths, &schedules, shots, options, seed)?;
        }
        Commands::Run {
            listing: path,
            shots,
            seed,
            top,
        } => {
            listing::run_listing(&path, shots, seed, top)?;
        }
        Commands::Inspect { b8, top } => {
            trials::inspect_dump(&b8, top)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shor_arguments_map_to_a_fixed_error() {
        let cli = Cli::try_parse_from([
            "qec", "shor", "--input", "1", "--error", "bit-flip", "--qubit", "4",
        ])
        .unwrap();
        let Commands::Shor {
            input, error, qubit, ..
        } = cli.command
        else {
            panic!("expected the shor subcommand");
        };
        assert_eq!(input, 1);
        assert_eq!(
            error_model(error, qubit).unwrap(),
            ErrorModel::Fixed(InjectedError::BitFlip { qubit: 4 })
        );
    }

    #[test]
    fn fixed_errors_outside_the_data_register_are_refused() {
        assert!(error_model(ErrorArg::PhaseFlip, 9).is_err());
        assert_eq!(error_model(ErrorArg::Disabled, 9).unwrap(), ErrorModel::Disabled);
    }

    #[test]
    fn input_is_a_single_bit() {
        assert!(Cli::try_parse_from(["qec", "shor", "--input", "2"]).is_err());
    }

    #[test]
    fn log_level_accepts_known_levels_only() {
        let cli = Cli::try_parse_from(["qec", "--log-level", "debug", "inspect", "shots.b8"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(tracing::Level::from(cli.log_level), tracing::Level::DEBUG);

        assert!(Cli::try_parse_from(["qec", "--log-level", "verbose", "run", "bell.qc"]).is_err());
    }

    #[test]
    fn inspect_defaults_to_eight_outcomes() {
        let cli = Cli::try_parse_from(["qec", "inspect", "shots.b8"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
        let Commands::Inspect { b8, top } = cli.command else {
            panic!("expected the inspect subcommand");
        };
        assert_eq!(b8, PathBuf::from("shots.b8"));
        assert_eq!(top, 8);
    }
}
