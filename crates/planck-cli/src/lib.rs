// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Command-Line Runner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Subcommands behind the `planck-sim` binary.

use clap::{Parser, Subcommand};
use planck_core::experiments::run_experiments;
use planck_core::simulation::{SimulationRun, Simulator};
use planck_output::summary::read_summary;
use planck_output::timestamp::timestamp_now;
use planck_output::ResultsDirectory;
use planck_types::config::ModelConfig;
use planck_types::error::PlanckResult;
use planck_types::results::SimulationSummary;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr so stdout carries only the human-facing report.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,planck_cli=info,planck_core=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Toy Planck-epoch cosmology with dynamic constants and compression
#[derive(Parser, Debug)]
#[command(name = "planck-sim", version)]
#[command(about = "Integrate the Planck-epoch model and test its hypotheses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation and save its outputs
    Run(RunArgs),
    /// Print the default configuration as JSON
    ShowConfig,
    /// Print the statistics of a saved JSON summary
    Analyze {
        /// Path to a physics_test_results_*.json file
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// JSON configuration file (missing fields take defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory, overrides the configuration
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the PNG overview
    #[arg(long)]
    pub no_plots: bool,

    /// Skip the npz series bundle
    #[arg(long)]
    pub no_arrays: bool,

    /// End of the integration span, overrides the configuration
    #[arg(long)]
    pub t_end: Option<f64>,

    /// Skip the sensitivity and tolerance sweeps
    #[arg(long)]
    pub no_experiments: bool,
}

/// Load the configuration named by `args` and fold in the command-line
/// overrides.
pub fn resolve_config(args: &RunArgs) -> PlanckResult<ModelConfig> {
    let mut config = match &args.config {
        Some(path) => ModelConfig::from_file(path)?,
        None => ModelConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    if args.no_plots {
        config.output.save_plots = false;
    }
    if args.no_arrays {
        config.output.save_arrays = false;
    }
    if let Some(t_end) = args.t_end {
        config.time_span.end = t_end;
    }
    if args.no_experiments {
        config.experiments.enabled = false;
    }
    config.validate()?;
    Ok(config)
}

fn verdict(supported: bool) -> &'static str {
    if supported {
        "SUPPORTED"
    } else {
        "NOT SUPPORTED"
    }
}

fn print_run_report(run: &SimulationRun) {
    let traj = run.trajectory();
    println!("Integration: {}", run.outcome.message);
    println!(
        "  points: {}  accepted: {}  rejected: {}  rhs evals: {}",
        traj.len(),
        run.outcome.stats.accepted_steps,
        run.outcome.stats.rejected_steps,
        run.outcome.stats.rhs_evaluations
    );
    if let Some((t, s)) = traj.last() {
        println!(
            "  final t = {t:.3e}  a = {:.3e}  T = {:.3e}",
            s.scale_factor, s.temperature
        );
    }
}

fn print_summary(summary: &SimulationSummary) {
    let hyp = &summary.hypothesis_tests;
    let dc = &hyp.dynamic_constants;
    println!();
    println!(
        "Dynamic constants (threshold {:.2}%): {}",
        dc.threshold_percent,
        verdict(dc.supported)
    );
    for (c, v) in &dc.variations {
        println!(
            "  {c:<5} change {:>10.4}%  max variation {:>10.4}%",
            v.change_percent, v.max_variation_percent
        );
    }
    if let Some(c) = dc.most_variable {
        println!("  most variable: {c}");
    }

    let comp = &hyp.compression;
    println!(
        "Compression (growth threshold {:.3e}): {}",
        comp.threshold_growth,
        verdict(comp.supported)
    );
    println!("  compression growth: {:.4e}", comp.compression_growth);
    println!("  scale growth:       {:.4e}", comp.scale_growth);
    println!("  signature (std/mean): {:.4}", comp.compression_signature);

    let st = &summary.numerical_stability;
    println!(
        "Numerical stability: score {:.2} ({})",
        st.stability_score,
        if st.numerically_stable { "stable" } else { "unstable" }
    );
    println!(
        "  max time gap {:.3e}  max scale jump {:.3e}",
        st.max_time_gap, st.max_scale_discontinuity
    );

    if let Some(std) = &summary.standard_model {
        println!(
            "Standard model (a ∝ t^2/3, T ∝ t^-1/2 from t = {:.3e}):",
            std.reference_time
        );
        println!(
            "  a / a_std {:.4e}  T / T_std {:.4e}",
            std.scale_factor_ratio, std.temperature_ratio
        );
    }

    if let Some(extra) = &summary.additional_tests {
        let sens = &extra.sensitivity;
        println!(
            "Initial-conditions sensitivity: {} ({}/{} runs succeeded)",
            if sens.model_stable { "stable" } else { "sensitive" },
            sens.successful_runs,
            sens.runs.len()
        );
        println!(
            "  spread a {:.4}  T {:.4}  (threshold {:.2})",
            sens.scale_factor_sensitivity, sens.temperature_sensitivity, sens.threshold
        );
        let tol = &extra.tolerance_robustness;
        println!(
            "Tolerance robustness: {} (stable fraction {:.2}, recommended rtol {:e})",
            if tol.model_robust { "robust" } else { "not robust" },
            tol.numerical_stability,
            tol.recommended_tolerance
        );
        for r in &tol.runs {
            println!(
                "  rtol {:e}  success {}  stable {}",
                r.rtol, r.success, r.computation_stable
            );
        }
    }
}

/// Returns whether the solver succeeded.
pub fn run_command(args: &RunArgs) -> PlanckResult<bool> {
    let config = resolve_config(args)?;
    println!("Planck epoch simulation: {}", config.model_name);
    println!(
        "  span [{:e}, {:e}]  rtol {:e}  atol {:e}",
        config.time_span.start, config.time_span.end, config.solver.rtol, config.solver.atol
    );

    let simulator = Simulator::new(config.clone())?;
    let run = simulator.run()?;
    print_run_report(&run);

    let mut summary = run.to_summary(timestamp_now());
    if config.experiments.enabled {
        summary.additional_tests = Some(run_experiments(&config)?);
    }
    print_summary(&summary);

    let output = &config.output;
    if output.save_json || output.save_arrays || output.save_plots {
        let dir = ResultsDirectory::create(&output.directory)?;
        let saved = dir.save_run(&run, &summary, output)?;
        println!();
        for path in [saved.summary, saved.series, saved.plot].into_iter().flatten() {
            println!("Saved {}", path.display());
        }
    }

    info!(success = run.success(), "run finished");
    Ok(run.success())
}

pub fn show_config_command() -> PlanckResult<()> {
    println!("{}", ModelConfig::default().to_json()?);
    Ok(())
}

pub fn analyze_command(file: &std::path::Path) -> PlanckResult<()> {
    let summary = read_summary(file)?;
    println!(
        "{} ({}) at {}: {} points over [{:e}, {:e}], success = {}",
        summary.model_name,
        summary.method,
        summary.timestamp,
        summary.points_simulated,
        summary.time_range[0],
        summary.time_range[1],
        summary.simulation_success
    );
    println!(
        "  final a = {:.3e}  T = {:.3e}  C = {:.3e}",
        summary.final_scale_factor, summary.final_temperature, summary.final_compression
    );
    print_summary(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "planck-sim", "run", "--no-plots", "--t-end", "1e4", "--output-dir", "out",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert!(args.no_plots);
                assert!(!args.no_arrays);
                assert_eq!(args.t_end, Some(1e4));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from(["planck-sim", "analyze", "r.json"]).unwrap();
        assert!(matches!(cli.command, Command::Analyze { file } if file == PathBuf::from("r.json")));
        assert!(Cli::try_parse_from(["planck-sim", "analyze"]).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = RunArgs {
            output_dir: Some(PathBuf::from("elsewhere")),
            no_arrays: true,
            t_end: Some(500.0),
            ..RunArgs::default()
        };
        let cfg = resolve_config(&args).unwrap();
        assert_eq!(cfg.output.directory, PathBuf::from("elsewhere"));
        assert!(!cfg.output.save_arrays);
        assert!(cfg.output.save_plots);
        assert_eq!(cfg.time_span.end, 500.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = RunArgs {
            t_end: Some(-1.0),
            ..RunArgs::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_config_file_partial() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cfg.json");
        std::fs::write(&path, r#"{"model_name": "custom", "thresholds": {"compression_growth": 10.0}}"#)
            .unwrap();
        let args = RunArgs {
            config: Some(path),
            ..RunArgs::default()
        };
        let cfg = resolve_config(&args).unwrap();
        assert_eq!(cfg.model_name, "custom");
        assert_eq!(cfg.thresholds.compression_growth, 10.0);
        assert_eq!(cfg.thresholds.variation_percent, 1.0);
    }

    #[test]
    fn test_run_and_analyze_short_span() {
        let tmp = tempfile::tempdir().unwrap();
        let args = RunArgs {
            output_dir: Some(tmp.path().join("results")),
            no_plots: true,
            no_arrays: true,
            no_experiments: true,
            t_end: Some(100.0),
            ..RunArgs::default()
        };
        assert!(run_command(&args).unwrap());
        let entries: Vec<_> = std::fs::read_dir(tmp.path().join("results"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        analyze_command(&entries[0]).unwrap();
        let summary = read_summary(&entries[0]).unwrap();
        assert!(summary.additional_tests.is_none());
    }

    #[test]
    fn test_default_outputs_render_plot_and_experiments() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("results");
        let args = RunArgs {
            output_dir: Some(out.clone()),
            t_end: Some(100.0),
            ..RunArgs::default()
        };
        assert!(run_command(&args).unwrap());

        let entries: Vec<PathBuf> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        let with_ext = |ext: &str| {
            entries
                .iter()
                .find(|p| p.extension().is_some_and(|e| e == ext))
                .cloned()
        };
        let png = with_ext("png").expect("plot written");
        assert!(std::fs::metadata(&png).unwrap().len() > 0);
        assert!(with_ext("npz").is_some());

        let summary = read_summary(&with_ext("json").unwrap()).unwrap();
        let extra = summary.additional_tests.expect("experiments attached");
        assert_eq!(extra.sensitivity.runs.len(), 3);
        assert_eq!(extra.tolerance_robustness.runs.len(), 3);
    }

    #[test]
    fn test_no_experiments_flag() {
        let cli = Cli::try_parse_from(["planck-sim", "run", "--no-experiments"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(!resolve_config(&args).unwrap().experiments.enabled);
    }
}
