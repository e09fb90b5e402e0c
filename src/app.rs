//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - resolves the active reference table
//! - dispatches subcommands and prints reports
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{
    BatchArgs, CalibrateArgs, Cli, Command, CurveArgs, PercentileArgs, PlotArgs, SentimentArgs, SimulateArgs,
    SleepForecastArgs, TableArgs,
};
use crate::data::{SimulationConfig, simulate};
use crate::domain::{Measurement, age_in_months};
use crate::error::AppError;
use crate::io::{load_measurements, load_reference_points, load_sleep_entries};
use crate::percentile::PercentileEstimator;
use crate::plot::{PlotSpec, render_band_plot};
use crate::reference::ReferenceTable;
use crate::sentiment::{Lexicon, analyze_sentiment};

pub mod pipeline;

/// Environment variable naming a reference table JSON file.
pub const REFERENCE_ENV: &str = "GROWTH_REFERENCE";

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    crate::logging::init_cli_logger(cli.verbose);

    let reference_path = cli
        .reference
        .clone()
        .or_else(|| std::env::var_os(REFERENCE_ENV).map(PathBuf::from));

    match cli.command {
        Command::Percentile(args) => handle_percentile(args, reference_path.as_deref()),
        Command::Curve(args) => handle_curve(args, reference_path.as_deref()),
        Command::Batch(args) => handle_batch(args, reference_path.as_deref()),
        Command::Plot(args) => handle_plot(args, reference_path.as_deref()),
        Command::Simulate(args) => handle_simulate(args, reference_path.as_deref()),
        Command::Calibrate(args) => handle_calibrate(args),
        Command::Table(args) => handle_table(args, reference_path.as_deref()),
        Command::Sentiment(args) => handle_sentiment(args),
        Command::SleepForecast(args) => handle_sleep_forecast(args),
    }
}

/// Bundled table unless a JSON file is given.
pub fn load_reference_table(path: Option<&Path>) -> Result<ReferenceTable, AppError> {
    match path {
        Some(p) => {
            let table = crate::io::read_reference_json(p)?;
            tracing::info!(path = %p.display(), name = %table.name, entries = table.entries.len(), "loaded reference table");
            Ok(table)
        }
        None => Ok(ReferenceTable::default()),
    }
}

fn estimator_for(path: Option<&Path>) -> Result<PercentileEstimator, AppError> {
    Ok(PercentileEstimator::new(load_reference_table(path)?))
}

fn handle_percentile(args: PercentileArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let estimator = estimator_for(reference)?;

    let age_months = match (args.age_months, args.birth_date, args.measured_on) {
        (Some(age), _, _) => age,
        (None, Some(birth), Some(measured_on)) => age_in_months(birth, measured_on).ok_or_else(|| {
            AppError::input(format!("Measurement date {measured_on} is before birth date {birth}."))
        })?,
        _ => {
            return Err(AppError::input(
                "Provide `--age-months` or both `--birth-date` and `--measured-on`.",
            ));
        }
    };

    let measurement = Measurement {
        id: "cli".to_string(),
        metric: args.series.metric,
        sex: args.series.sex,
        age_months,
        value: args.value,
    };
    let assessment = estimator.assess(&measurement)?;
    tracing::debug!(z = assessment.z, percentile = assessment.percentile, "assessed");

    print!("{}", crate::report::format_assessment(&assessment, estimator.table()));
    Ok(())
}

fn handle_curve(args: CurveArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let estimator = estimator_for(reference)?;
    let curve = estimator.curve(args.age_months, args.series.sex, args.series.metric)?;
    print!("{}", crate::report::format_curve(&curve, args.series.metric.unit()));
    Ok(())
}

fn handle_batch(args: BatchArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let estimator = estimator_for(reference)?;
    let run = pipeline::run_batch(&args.input, &estimator, args.top)?;

    println!("{}", crate::report::format_batch(&run, estimator.table()));

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &run.assessments)?;
        tracing::info!(path = %path.display(), rows = run.assessments.len(), "wrote results");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let estimator = estimator_for(reference)?;

    let overlay = match &args.input {
        Some(path) => {
            let ingest = load_measurements(path)?;
            if !ingest.row_errors.is_empty() {
                tracing::warn!(skipped = ingest.row_errors.len(), "some overlay rows were skipped");
            }
            ingest.rows
        }
        None => Vec::new(),
    };

    let spec = PlotSpec {
        sex: args.series.sex,
        metric: args.series.metric,
        age_min: args.age_min,
        age_max: args.age_max,
        width: args.width,
        height: args.height,
    };
    let plot = render_band_plot(&estimator, &spec, &overlay)?;
    println!("{plot}");
    Ok(())
}

fn handle_simulate(args: SimulateArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let estimator = estimator_for(reference)?;
    let config = SimulationConfig {
        sex: args.series.sex,
        metric: args.series.metric,
        count: args.count,
        seed: args.seed,
        age_min: args.age_min,
        age_max: args.age_max,
    };
    let report = simulate(&estimator, &config)?;
    print!("{}", crate::report::format_simulation(&report));
    Ok(())
}

fn handle_calibrate(args: CalibrateArgs) -> Result<(), AppError> {
    let ingest = load_reference_points(&args.input)?;
    if !ingest.row_errors.is_empty() {
        eprint!("{}", crate::report::format_row_errors(&ingest.row_errors));
    }

    let calibration = crate::fit::calibrate(&ingest.rows, &args.name)?;
    print!("{}", crate::report::format_calibration(&calibration));

    if let Some(path) = &args.output {
        crate::io::write_reference_json(path, &calibration.table)?;
        tracing::info!(path = %path.display(), "wrote calibrated table");
    }
    Ok(())
}

fn handle_table(args: TableArgs, reference: Option<&Path>) -> Result<(), AppError> {
    let table = load_reference_table(reference)?;
    match &args.output {
        Some(path) => crate::io::write_reference_json(path, &table),
        None => {
            let json = serde_json::to_string_pretty(&table)
                .map_err(|e| AppError::new(4, format!("Failed to serialize reference table: {e}")))?;
            println!("{json}");
            Ok(())
        }
    }
}

fn handle_sentiment(args: SentimentArgs) -> Result<(), AppError> {
    let lexicon = match &args.lexicon {
        Some(path) => crate::io::read_lexicon_json(path)?,
        None => Lexicon::default(),
    };
    let score = analyze_sentiment(&args.text, &lexicon);
    print!("{}", crate::report::format_sentiment(&score));
    Ok(())
}

fn handle_sleep_forecast(args: SleepForecastArgs) -> Result<(), AppError> {
    let ingest = load_sleep_entries(&args.input)?;
    if !ingest.row_errors.is_empty() {
        eprint!("{}", crate::report::format_row_errors(&ingest.row_errors));
    }
    let forecast = crate::forecast::forecast_sleep(&ingest.rows);
    print!("{}", crate::report::format_sleep_forecast(forecast.as_ref()));
    Ok(())
}
