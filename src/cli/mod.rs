//! Command-line parsing for the growth percentile tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! estimation code. Dispatch lives in `app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{Metric, Sex};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "growth",
    version,
    about = "Approximate infant growth percentiles and tracker utilities",
    after_help = "Percentiles come from a linear normal approximation, not clinical growth charts."
)]
pub struct Cli {
    /// Reference table JSON (overrides `GROWTH_REFERENCE`; defaults to the bundled demo table).
    #[arg(long, global = true, value_name = "JSON")]
    pub reference: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Percentile rank of a single measurement.
    Percentile(PercentileArgs),
    /// Print the reference mean/sd at an age.
    Curve(CurveArgs),
    /// Rank every measurement in a CSV, print a summary and optionally export.
    Batch(BatchArgs),
    /// Plot percentile bands (3/15/50/85/97) over an age range.
    Plot(PlotArgs),
    /// Simulate a cohort from the reference and check percentile uniformity.
    Simulate(SimulateArgs),
    /// Fit a reference table from tabulated reference points.
    Calibrate(CalibrateArgs),
    /// Print (or write) the active reference table as JSON.
    Table(TableArgs),
    /// Keyword-count sentiment of a mood note.
    Sentiment(SentimentArgs),
    /// Forecast next week's average sleep from a sleep log.
    SleepForecast(SleepForecastArgs),
}

/// Sex and metric selection shared by several commands.
#[derive(Debug, Args, Clone, Copy)]
pub struct SeriesArgs {
    #[arg(short, long, value_enum)]
    pub sex: Sex,

    #[arg(short, long, value_enum)]
    pub metric: Metric,
}

#[derive(Debug, Args)]
pub struct PercentileArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Measured value (kg for weight, cm for height/head).
    #[arg(long)]
    pub value: f64,

    /// Age in months. Alternative to `--birth-date` + `--measured-on`.
    #[arg(long, conflicts_with = "birth_date", required_unless_present = "birth_date")]
    pub age_months: Option<f64>,

    /// Birth date (YYYY-MM-DD).
    #[arg(long, requires = "measured_on")]
    pub birth_date: Option<NaiveDate>,

    /// Measurement date (YYYY-MM-DD).
    #[arg(long, requires = "birth_date")]
    pub measured_on: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct CurveArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[arg(long, default_value_t = 0.0)]
    pub age_months: f64,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Measurements CSV.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Export per-measurement results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Show top-N lowest and highest measurements.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[arg(long, default_value_t = 0.0)]
    pub age_min: f64,

    #[arg(long, default_value_t = 24.0)]
    pub age_max: f64,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Overlay measurements from a CSV (same schema as `batch`).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Number of synthetic measurements.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 0.0)]
    pub age_min: f64,

    #[arg(long, default_value_t = 24.0)]
    pub age_max: f64,
}

#[derive(Debug, Args)]
pub struct CalibrateArgs {
    /// Reference points CSV (`metric,sex,age_months,mean,sd`).
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Write the fitted table to JSON (usable with `--reference`).
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,

    /// Name stored in the fitted table.
    #[arg(long, default_value = "calibrated")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Write to a file instead of stdout.
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SentimentArgs {
    /// Note text to score.
    #[arg(long)]
    pub text: String,

    /// Lexicon JSON (`{"positive": [...], "negative": [...]}`).
    #[arg(long, value_name = "JSON")]
    pub lexicon: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SleepForecastArgs {
    /// Sleep log CSV (`date,hours`).
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn percentile_accepts_age_or_dates() {
        let cli = Cli::try_parse_from([
            "growth", "percentile", "-s", "female", "-m", "height", "--value", "70", "--age-months", "6",
        ])
        .unwrap();
        match cli.command {
            Command::Percentile(args) => {
                assert_eq!(args.series.sex, Sex::Female);
                assert_eq!(args.age_months, Some(6.0));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "growth",
            "percentile",
            "--sex",
            "male",
            "--metric",
            "weight",
            "--value",
            "7.5",
            "--birth-date",
            "2025-01-01",
            "--measured-on",
            "2025-07-01",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Percentile(ref a) if a.birth_date.is_some()));
    }

    #[test]
    fn percentile_requires_some_age() {
        let res = Cli::try_parse_from(["growth", "percentile", "-s", "male", "-m", "head", "--value", "40"]);
        assert!(res.is_err());
    }

    #[test]
    fn global_reference_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["growth", "table", "--reference", "t.json"]).unwrap();
        assert_eq!(cli.reference, Some(PathBuf::from("t.json")));
    }
}
