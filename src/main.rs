//! MnaSim - DC Circuit Analyzer
//!
//! Solves the DC operating point of a SPICE-like netlist and writes a report.
//!
//! # Usage
//!
//! ```bash
//! mnasim divider.cir -o results.log -v
//! RUST_LOG=mnasim_core=trace mnasim divider.cir
//! ```

use std::path::PathBuf;

use clap::Parser;
use mnasim_core::{
    circuit::Circuit,
    error::{MnaSimError, Result},
    netlist,
    report::{Banner, ResultsReport},
    solver,
    Simulator, SolverConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// DC circuit analyzer (MNA + modified Gauss-Seidel)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Results file
    #[arg(short, long, default_value = "output.log")]
    output: PathBuf,

    /// Echo the report to stdout and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Maximum Gauss-Seidel iterations
    #[arg(long, default_value_t = solver::DEFAULT_MAX_ITERATIONS)]
    max_iter: usize,

    /// Absolute residual tolerance
    #[arg(long, default_value_t = solver::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Damping factor in (0, 1]
    #[arg(long, default_value_t = solver::DEFAULT_DAMPING)]
    damping: f64,

    /// Include the assembled MNA system in the report
    #[arg(long)]
    print_mna: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "mnasim_core=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Parse the netlist
    let ast = netlist::parse_file(&args.netlist)?;

    // Build the circuit
    let circuit = Circuit::from_ast(ast)?;

    // Validate and solve
    let config = SolverConfig::new()
        .with_max_iterations(args.max_iter)
        .with_tolerance(args.tolerance)
        .with_damping(args.damping);
    let mut simulator = Simulator::with_config(config)?;
    simulator.run_dc_analysis(&circuit)?;

    // Report
    let report = ResultsReport::new(&circuit, simulator.state(), args.print_mna).to_string();

    std::fs::write(&args.output, format!("{}{}", Banner, report)).map_err(|e| {
        MnaSimError::OutputWriteError {
            path: args.output.display().to_string(),
            source: e,
        }
    })?;

    if args.verbose {
        print!("{}", report);
    }
    println!(
        "Circuit analysis complete. Results written to: {}",
        args.output.display()
    );

    Ok(())
}
