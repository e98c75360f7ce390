//! RideStats - sliding-window power and heart-rate analysis
//!
//! Command-line entry point: decodes FIT activities and prints their reports.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ridestats::activity::{self, fit, ActivityAnalyzer, ActivitySummary};
use ridestats::config::{self, AnalysisConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Peak power, normalized power and heart-rate stability from FIT activities",
    long_about = None
)]
struct Cli {
    /// FIT file to process (may be repeated)
    #[arg(short, long)]
    file: Vec<PathBuf>,
    /// Directory of FIT files to process
    #[arg(short, long)]
    dir: Option<PathBuf>,
    /// Configuration file (default: <data dir>/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured FTP (watts)
    #[arg(long)]
    ftp: Option<f64>,
    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,
}

/// One analyzed file, as printed in JSON mode.
#[derive(Serialize)]
struct FileReport {
    file: PathBuf,
    summary: ActivitySummary,
}

fn main() -> Result<()> {
    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let mut files = cli.file.clone();
    if let Some(dir) = &cli.dir {
        let found = activity::find_fit_files(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        files.extend(found);
    }
    if files.is_empty() {
        bail!("Nothing to process: pass --file or --dir");
    }

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        match analyze_file(path, &config) {
            Ok(summary) => reports.push(FileReport {
                file: path.clone(),
                summary,
            }),
            Err(e) => tracing::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    if reports.is_empty() {
        bail!("No activity could be analyzed");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("== {} ==\n", report.file.display());
            println!("{}\n", report.summary);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config().context("Failed to load config")?,
    };

    if let Some(ftp) = cli.ftp {
        config.ftp = ftp;
        config.validate().context("Invalid --ftp")?;
    }

    Ok(config)
}

fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<ActivitySummary> {
    let timer = Instant::now();

    let decoded = fit::decode_file(path)?;
    let mut analyzer = ActivityAnalyzer::new(config)?;
    analyzer.set_start_time(decoded.start_time);
    analyzer.process_all(&decoded.records)?;

    let summary = analyzer.summary();

    tracing::info!(
        file = %path.display(),
        ticks = summary.ticks,
        segments = summary.segments,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Processed activity"
    );
    Ok(summary)
}
