//! `growth` — height-for-age percentiles from the command line.
//! Loads the boys and girls reference files once, then answers one query.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use growth_core::{
    build_engine, GenderSelector, Group, MeasurementSeries, PercentileEngine, PercentileResult,
    ReferenceTable, TableBuilder, RANK_LABELS,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::{FileConfig, Overrides, Settings};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "growth", about = "Height-for-age percentiles against a population reference")]
struct Args {
    /// Boys reference file (age in months + 15 percentile columns).
    #[arg(long, global = true)]
    boys: Option<PathBuf>,

    /// Girls reference file.
    #[arg(long, global = true)]
    girls: Option<PathBuf>,

    /// JSON config file with `boys`, `girls` and `format` entries.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Field delimiter of the reference files.
    #[arg(long, global = true)]
    delimiter: Option<char>,

    /// Header lines to skip in the reference files.
    #[arg(long, global = true)]
    header_lines: Option<usize>,

    /// Log debug output (skipped rows, table sizes).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Percentile of a height at an age.
    Query {
        /// Age in years.
        #[arg(long)]
        age: f64,
        /// Height in cm.
        #[arg(long)]
        height: f64,
        #[arg(short, long, default_value = "both")]
        gender: GenderSelector,
    },
    /// Height at a percentile and age.
    Height {
        #[arg(long)]
        age: f64,
        #[arg(short, long)]
        percentile: f64,
        #[arg(short, long)]
        gender: Group,
    },
    /// Score every measurement of an Age;Height file.
    Dataset {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "both")]
        gender: GenderSelector,
    },
    /// Print the sampled reference table.
    Table {
        #[arg(short, long)]
        gender: Group,
    },
    /// Print interpolated percentile curves on a regular age grid.
    Curves {
        #[arg(short, long)]
        gender: Group,
        /// Age step in years.
        #[arg(long, default_value_t = 0.5)]
        step: f64,
        /// Last age in years (defaults to the last sampled age).
        #[arg(long)]
        max_age: Option<f64>,
    },
}

// ── Output types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ScoredMeasurement {
    age: f64,
    height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<PercentileResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn settings(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    file.merge(Overrides {
        boys: args.boys.clone(),
        girls: args.girls.clone(),
        delimiter: args.delimiter,
        header_lines: args.header_lines,
    })
}

fn load_tables(settings: &Settings) -> Result<(ReferenceTable, ReferenceTable)> {
    let builder = TableBuilder::new(settings.format.clone());
    let load = |group: Group, path: &Path| -> Result<ReferenceTable> {
        let table = builder
            .open(path)
            .with_context(|| format!("loading {group} reference {}", path.display()))?;
        if table.skipped_rows() > 0 {
            tracing::info!(%group, skipped = table.skipped_rows(), "skipped unreadable reference rows");
        }
        Ok(table)
    };
    Ok((
        load(Group::Boys, settings.boys.as_path())?,
        load(Group::Girls, settings.girls.as_path())?,
    ))
}

fn warn_if_extrapolated(engine: &PercentileEngine, age: f64, gender: GenderSelector) {
    for &group in gender.groups() {
        let (lo, hi) = engine.age_span(group);
        if age < lo || age > hi {
            tracing::warn!(%group, age, lo, hi, "age outside reference range, curves extrapolated");
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn print_table(table: &ReferenceTable) {
    println!("{:>5} | {}", "Age", RANK_LABELS.map(|l| format!("{l:>5}")).join(" | "));
    println!("{}", "-".repeat(8 + 8 * RANK_LABELS.len()));
    for (age, heights) in table.iter() {
        let cols: Vec<String> = heights.iter().map(|h| format!("{h:>5.1}")).collect();
        println!("{age:>5.1} | {}", cols.join(" | "));
    }
}

/// Upper bound on rows printed by `curves`.
const MAX_CURVE_ROWS: usize = 100_000;

/// Ages `0, step, 2*step, ..` up to and including `last`.
fn curve_ages(step: f64, last: f64) -> Result<Vec<f64>> {
    anyhow::ensure!(step.is_finite() && step > 0.0, "--step must be positive");
    anyhow::ensure!(last.is_finite() && last >= 0.0, "--max-age must be a non-negative number");
    let rows = (last / step + 1e-9).floor() + 1.0;
    anyhow::ensure!(
        rows <= MAX_CURVE_ROWS as f64,
        "--step {step} over {last} years gives {rows} rows, limit is {MAX_CURVE_ROWS}"
    );
    Ok((0..rows as usize).map(|i| i as f64 * step).collect())
}

fn print_curves(
    engine: &PercentileEngine,
    group: Group,
    step: f64,
    max_age: Option<f64>,
) -> Result<()> {
    let ages = curve_ages(step, max_age.unwrap_or(engine.age_span(group).1))?;

    println!("Age;{}", RANK_LABELS.join(";"));
    for age in ages {
        let heights = engine.heights_at(age, group)?;
        let cols: Vec<String> = heights.iter().map(|h| format!("{h:.2}")).collect();
        println!("{age:.2};{}", cols.join(";"));
    }
    Ok(())
}

fn score_dataset(engine: &PercentileEngine, input: &Path, gender: GenderSelector) -> Result<()> {
    let series = MeasurementSeries::read(input)
        .with_context(|| format!("reading measurements {}", input.display()))?;
    if let Some(age) = series.age_on(Local::now().date_naive()) {
        tracing::info!("current age from birthdate: {age:.2} years");
    }

    let points = series.points();
    let results = engine.percentiles_of_batch(&points, gender);
    let scored: Vec<ScoredMeasurement> = points
        .iter()
        .zip(results)
        .map(|(&(age, height), res)| match res {
            Ok(result) => ScoredMeasurement { age, height, result: Some(result), error: None },
            Err(e) => {
                tracing::warn!(age, height, error = %e, "measurement not scored");
                ScoredMeasurement { age, height, result: None, error: Some(e.to_string()) }
            }
        })
        .collect();

    tracing::info!(measurements = scored.len(), "scored dataset");
    println!("{}", serde_json::to_string_pretty(&scored)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = settings(&args)?;
    let (boys, girls) = load_tables(&settings)?;
    let engine = build_engine(&boys, &girls).context("building percentile curves")?;

    match args.command {
        Command::Query { age, height, gender } => {
            warn_if_extrapolated(&engine, age, gender);
            let result = engine.percentile_of(age, height, gender)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Height { age, percentile, gender } => {
            warn_if_extrapolated(&engine, age, gender.into());
            let height = engine.height_at(age, percentile, gender)?;
            println!("{height:.1}");
        }
        Command::Dataset { input, gender } => score_dataset(&engine, &input, gender)?,
        Command::Table { gender } => print_table(match gender {
            Group::Boys => &boys,
            Group::Girls => &girls,
        }),
        Command::Curves { gender, step, max_age } => print_curves(&engine, gender, step, max_age)?,
    }
    Ok(())
}
