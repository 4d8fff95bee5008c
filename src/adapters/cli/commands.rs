//! CLI Command Handlers
//!
//! Implementation of all CLI commands for outlier-scan.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::csv::parse_report;
use crate::adapters::random::RandomOffset;
use crate::adapters::storage::FsArtifactStore;
use crate::application::{BatchReport, BatchRunner, InputFile, ScanPipeline};
use crate::config::{load_config, Config};
use crate::detection::DetectionConfig;
use crate::ports::{ArtifactStore, OffsetSource};

/// outlier-scan - Windowed outlier detection for stock price CSV files
#[derive(Parser, Debug)]
#[command(
    name = "outlier-scan",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Flag stock price outliers in a random 30-sample window",
    long_about = "outlier-scan reads headerless CSV files of (stock id, timestamp, price) rows, \
                  picks 30 consecutive samples at a random offset and writes every sample more \
                  than 2 standard deviations from the window mean to <name>-outliers.csv."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan up to two CSV files for outliers
    Scan(ScanCmd),

    /// Print a stored outlier report
    Show(ShowCmd),
}

impl Command {
    /// Config file named on the command line, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Scan(cmd) => cmd.config.as_deref(),
            Command::Show(cmd) => cmd.config.as_deref(),
        }
    }
}

/// Output format for scan results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Scan files for outliers
#[derive(Parser, Debug)]
pub struct ScanCmd {
    /// CSV files to scan
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the artifact directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seed the window offset generator for reproducible runs
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Show a stored report
#[derive(Parser, Debug)]
pub struct ShowCmd {
    /// Artifact name, e.g. prices-outliers.csv
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the artifact directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the CSV verbatim instead of a table
    #[arg(long)]
    pub raw: bool,
}

/// Load the config named on the command line, or defaults
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn output_dir(config: &Config, cli_override: Option<&Path>) -> PathBuf {
    cli_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.storage.resolved_output_dir())
}

/// Execute the CLI command
pub async fn execute(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Scan(cmd) => scan_command(cmd, config).await,
        Command::Show(cmd) => show_command(cmd, config).await,
    }
}

async fn scan_command(cmd: ScanCmd, config: &Config) -> Result<()> {
    let dir = output_dir(config, cmd.output_dir.as_deref());
    let store = FsArtifactStore::new(&dir);
    let pipeline = ScanPipeline::new(DetectionConfig::from(config), Arc::new(store))
        .context("Invalid detection parameters")?;
    let runner = BatchRunner::new(pipeline, config.batch.max_files);

    runner.check_batch(cmd.files.len())?;

    let mut files = Vec::with_capacity(cmd.files.len());
    for path in &cmd.files {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(InputFile::new(display_name(path), contents));
    }

    tracing::info!("Writing artifacts to {}", dir.display());

    let seed = cmd.seed;
    let report = runner
        .run(files, |idx| -> Box<dyn OffsetSource> {
            match seed {
                Some(seed) => Box::new(RandomOffset::seeded(seed.wrapping_add(idx as u64))),
                None => Box::new(RandomOffset::new()),
            }
        })
        .await?;

    match cmd.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.summary())?),
    }

    let failed = report.failure_count();
    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, report.results.len());
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_text(report: &BatchReport) {
    for result in &report.results {
        match result {
            Ok(outcome) => println!(
                "{}: {} outlier(s) in window at offset {} -> {}",
                outcome.file_name,
                outcome.outlier_count,
                outcome.window_offset,
                outcome.artifact_path.display()
            ),
            Err(failure) => println!("{}", failure),
        }
    }
}

async fn show_command(cmd: ShowCmd, config: &Config) -> Result<()> {
    let dir = output_dir(config, cmd.output_dir.as_deref());
    let store = FsArtifactStore::new(&dir);

    let bytes = store
        .get(&cmd.name)
        .await
        .with_context(|| format!("Failed to load {} from {}", cmd.name, dir.display()))?;
    let text = String::from_utf8(bytes).context("Report is not valid UTF-8")?;

    if cmd.raw {
        print!("{}", text);
        return Ok(());
    }

    let records = parse_report(&text).context("Failed to parse report")?;
    println!(
        "{:<12} {:<22} {:>14} {:>14} {:>14} {:>12}",
        "STOCK", "TIMESTAMP", "PRICE", "MEAN", "DIFF", "DEV %"
    );
    for r in &records {
        println!(
            "{:<12} {:<22} {:>14} {:>14} {:>14} {:>12}",
            r.instrument_id,
            r.timestamp,
            r.actual_price.to_string(),
            r.window_mean.to_string(),
            r.deviation.to_string(),
            r.percentage_deviation.to_string()
        );
    }
    println!("{} outlier(s)", records.len());
    Ok(())
}
