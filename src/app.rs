//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - runs selection, exploration or simulation
//! - prints reports/plots and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ExploreArgs, SelectArgs, SimulateArgs};
use crate::domain::{RunConfig, SelectionSettings};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `backelim` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `backelim wine.csv` to behave like `backelim select wine.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Select(args) => handle_select(args),
        Command::Explore(args) => handle_explore(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("backelim={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let run = pipeline::run_select(&config)?;

    println!("{}", crate::report::format::format_run_summary(&run.report));

    if config.plot {
        let best = &run.selection.best;
        println!(
            "{}",
            crate::plot::render_residual_plot(best, config.plot_width, config.plot_height)
        );
        println!(
            "{}",
            crate::plot::render_qq_plot(best, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &run.report)?;
        info!(path = %path.display(), "wrote report JSON");
    }
    if let Some(path) = &config.export_residuals {
        crate::io::export::write_residuals_csv(path, &run.selection.best)?;
        info!(path = %path.display(), "wrote residual CSV");
    }

    Ok(())
}

fn handle_explore(args: ExploreArgs) -> Result<(), AppError> {
    let exploration = pipeline::run_explore(&args.data, args.input.delimiter, &args.columns)?;
    println!(
        "{}",
        crate::report::format::format_exploration(
            &args.data.display().to_string(),
            exploration.ingest.dataset.n_rows(),
            &exploration.summaries,
            exploration.correlations.as_ref(),
        )
    );
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let sample = crate::data::generate_wine_sample(&crate::data::SampleConfig {
        rows: args.rows,
        seed: args.seed,
        noise_sd: args.noise,
        round_outcome: !args.continuous,
        missing_rate: args.missing_rate,
    })?;
    crate::io::export::write_dataset_csv(&args.out, &sample.dataset)?;
    println!(
        "Wrote {} rows ({}) to {}",
        sample.dataset.n_rows(),
        sample.dataset.names().join(", "),
        args.out.display()
    );
    Ok(())
}

pub fn config_from_args(args: &SelectArgs) -> RunConfig {
    RunConfig {
        data_path: args.data.clone(),
        delimiter: args.input.delimiter,
        selection: SelectionSettings {
            outcome: args.outcome.trim().to_string(),
            predictors: args
                .predictors
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            alpha: args.alpha,
            max_order: args.max_order,
            main_effects: args.main_effects,
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        export_residuals: args.export_residuals.clone(),
    }
}

/// Rewrite argv so a bare path defaults to `select`.
///
/// Rules:
/// - `backelim wine.csv ...`          -> `backelim select wine.csv ...`
/// - `backelim -v wine.csv`           -> `backelim select -v wine.csv`
/// - `backelim <subcommand> ...`      -> unchanged
/// - `backelim --help/--version/-h`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let first_positional = argv[1..].iter().find(|a| !a.starts_with('-'));
    let has_subcommand = first_positional
        .is_some_and(|a| matches!(a.as_str(), "select" | "explore" | "simulate"));
    if has_subcommand {
        return argv;
    }

    argv.insert(1, "select".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_path_defaults_to_select() {
        assert_eq!(
            rewrite_args(args(&["backelim", "wine.csv", "--alpha", "0.01"])),
            args(&["backelim", "select", "wine.csv", "--alpha", "0.01"])
        );
        assert_eq!(
            rewrite_args(args(&["backelim", "-v", "wine.csv"])),
            args(&["backelim", "select", "-v", "wine.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["backelim", "explore", "wine.csv"]),
            args(&["backelim", "-v", "simulate", "--out", "x.csv"]),
            args(&["backelim", "--help"]),
            args(&["backelim"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn config_trims_predictor_names() {
        let cli = crate::cli::Cli::parse_from([
            "backelim",
            "select",
            "wine.csv",
            "--predictors",
            " pH , alcohol,",
            "--no-plot",
        ]);
        let Command::Select(select) = cli.command else {
            panic!("expected select");
        };
        let config = config_from_args(&select);
        assert_eq!(config.selection.predictors, vec!["pH", "alcohol"]);
        assert!(!config.plot);
    }
}
