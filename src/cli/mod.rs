//! Command-line parsing for the backward elimination selector.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and selection code. Every `select` option that users tend to pin per
//! project also reads a `BACKELIM_*` environment variable (a `.env` file in the
//! working directory is loaded first).

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::MainEffectPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "backelim",
    version,
    about = "Hierarchical backward elimination for linear models (nested F tests)"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run backward elimination on a delimited file and report the final model.
    Select(SelectArgs),
    /// Print per-column summaries and correlations of a delimited file.
    Explore(ExploreArgs),
    /// Write a synthetic wine-like dataset (main effects only) to CSV.
    Simulate(SimulateArgs),
}

/// Options for `select`.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    /// Input file (comma, semicolon or tab separated, with a header row).
    #[arg(value_name = "PATH")]
    pub data: PathBuf,

    /// Significance threshold for the nested F tests.
    #[arg(short, long, env = "BACKELIM_ALPHA", default_value_t = crate::domain::DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Outcome column.
    #[arg(short, long, env = "BACKELIM_OUTCOME", default_value = "quality")]
    pub outcome: String,

    /// Predictor columns, comma separated. Names may contain spaces.
    #[arg(
        short,
        long,
        env = "BACKELIM_PREDICTORS",
        value_delimiter = ',',
        default_value = "pH,volatile acidity,alcohol"
    )]
    pub predictors: Vec<String>,

    /// Highest interaction order in the full model (default: number of predictors).
    #[arg(long)]
    pub max_order: Option<usize>,

    /// What to do with non-significant main effects.
    #[arg(long, value_enum, default_value_t = MainEffectPolicy::Keep)]
    pub main_effects: MainEffectPolicy,

    #[command(flatten)]
    pub input: InputArgs,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,

    /// Export the run report (models, elimination log, diagnostics) to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Export observed/fitted/residual values of the final model to CSV.
    #[arg(long = "export-residuals", value_name = "PATH")]
    pub export_residuals: Option<PathBuf>,
}

/// Options shared by commands that read a data file.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Field delimiter (auto-detected from the header if omitted). Use `\t` for tab.
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

/// Options for `explore`.
#[derive(Debug, Args, Clone)]
pub struct ExploreArgs {
    #[arg(value_name = "PATH")]
    pub data: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,

    /// Columns to correlate (default: all numeric columns).
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

/// Options for `simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Output CSV path.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(short = 'n', long, default_value_t = 1599)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the outcome noise.
    #[arg(long, default_value_t = 0.65)]
    pub noise: f64,

    /// Fraction of predictor cells to blank out as missing.
    #[arg(long, default_value_t = 0.0)]
    pub missing_rate: f64,

    /// Keep the outcome continuous instead of rounding it to whole scores.
    #[arg(long)]
    pub continuous: bool,
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let bytes = raw.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii() {
                Ok(bytes[0])
            } else {
                Err(format!("delimiter must be a single ASCII character, got '{raw}'"))
            }
        }
    }
}
