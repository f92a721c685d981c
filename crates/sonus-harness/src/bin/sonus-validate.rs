//! `sonus-validate`: run reference simulations and compare outputs.
//!
//! # Commands
//!
//! - `sonus-validate run <setup> [--plot]` runs the k-space reference
//!   solver on a setup file and writes `p_final` next to it
//! - `sonus-validate compare <reference> <candidate> [--tolerance T]`
//!   checks one output against another
//!
//! Logging honours `RUST_LOG` unless `--verbose` or `--quiet` is given.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sonus_harness::{compare_outputs, run_validation, HarnessError};
use sonus_solver::KspaceFirstOrder;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Reference acoustic simulations for solver validation
#[derive(Parser)]
#[command(name = "sonus-validate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reference solver on a setup file
    Run {
        /// Setup file (`setup_<name>.json` writes `<name>.json`)
        setup: PathBuf,

        /// Also write diagnostic PNG plots
        #[arg(long)]
        plot: bool,
    },

    /// Compare a candidate output against a reference output
    Compare {
        /// Reference output file
        reference: PathBuf,

        /// Candidate output file
        candidate: PathBuf,

        /// Maximum accepted relative L2 error
        #[arg(short, long, default_value_t = 1e-2)]
        tolerance: f64,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn execute(command: Commands, quiet: bool) -> Result<(), HarnessError> {
    match command {
        Commands::Run { setup, plot } => {
            let report = run_validation(&setup, plot, &KspaceFirstOrder::new())?;
            if !quiet {
                println!(
                    "{} -> {} ({:?}, {} steps, max |p| = {:e})",
                    report.setup_path.display(),
                    report.output_path.display(),
                    report.shape,
                    report.steps,
                    report.max_abs,
                );
                for path in &report.plot_paths {
                    println!("plot: {}", path.display());
                }
            }
        }
        Commands::Compare {
            reference,
            candidate,
            tolerance,
        } => {
            let report = compare_outputs(&reference, &candidate, tolerance)?;
            if !quiet {
                println!(
                    "{} cells, bit identical: {}, max abs error {:e} at {}, relative L2 {:e}",
                    report.cells,
                    report.bit_identical,
                    report.max_abs_error,
                    report.max_error_index,
                    report.relative_l2,
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match execute(cli.command, cli.quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
