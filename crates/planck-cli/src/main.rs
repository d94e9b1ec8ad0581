//! Planck epoch simulator
//!
//! # Usage
//!
//! ```bash
//! planck-sim run --config model.json --output-dir results
//! planck-sim show-config > model.json
//! planck-sim analyze results/physics_test_results_20250828_202132.json
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use planck_cli::{analyze_command, init_logging, run_command, show_config_command, Cli, Command};

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Run(args) => run_command(args),
        Command::ShowConfig => show_config_command().map(|_| true),
        Command::Analyze { file } => analyze_command(file).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("simulation did not reach the end of the time span");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
