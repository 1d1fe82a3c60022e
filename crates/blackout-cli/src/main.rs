//! Blackout CLI
//!
//! Redacts names, dates, phone numbers, addresses and concepts from text files

mod batch;
mod config;
mod output;

use anyhow::bail;
use batch::{BatchOptions, expand_inputs, run_batch};
use blackout_pii::{CategoryFlags, RedactionPipeline};
use clap::Parser;
use config::BlackoutConfig;
use output::StatsSink;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "blackout")]
#[command(about = "Blackout - Block out sensitive text in plain-text documents", long_about = None)]
struct Cli {
    /// Input file or glob pattern (repeatable)
    #[arg(long = "input", required = true)]
    inputs: Vec<String>,

    /// Directory for redacted files
    #[arg(long)]
    output: PathBuf,

    /// Redact personal names
    #[arg(long)]
    names: bool,

    /// Redact dates
    #[arg(long)]
    dates: bool,

    /// Redact phone numbers
    #[arg(long)]
    phones: bool,

    /// Redact postal addresses
    #[arg(long)]
    address: bool,

    /// Redact sentences about a concept (repeatable)
    #[arg(long = "concept")]
    concepts: Vec<String>,

    /// Statistics destination: stdout, stderr or a file path
    #[arg(long)]
    stats: String,

    /// YAML or TOML configuration file
    #[arg(long, env = "BLACKOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with `<file>.entities.json` entity annotations
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BlackoutConfig::from_file(expand_path(path))?,
        None => BlackoutConfig::default(),
    };
    config.merge_env();
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging.level)?;

    let flags = CategoryFlags {
        names: cli.names,
        dates: cli.dates,
        phones: cli.phones,
        address: cli.address,
        concepts: cli.concepts,
    };
    if flags.enabled().is_empty() {
        warn!("No redaction category enabled, outputs will be copies of the inputs");
    }
    let pipeline = RedactionPipeline::from_config(&flags, &config.detectors)?;

    let inputs = expand_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        bail!("no input files matched {:?}", cli.inputs);
    }
    info!(
        files = inputs.len(),
        categories = ?pipeline.categories(),
        "Starting redaction run"
    );

    let options = BatchOptions {
        output_dir: expand_path(&cli.output),
        output_suffix: config.output_suffix.clone(),
        annotations: cli.annotations.as_deref().map(expand_path),
    };
    let report = run_batch(&pipeline, &inputs, &options)?;

    let sink: StatsSink = cli.stats.parse()?;
    sink.write(&report.statistics)?;

    info!(
        files_processed = report.statistics.files_processed,
        total_redactions = report.statistics.total_redactions,
        failed_files = report.failed_files,
        warnings = report.warnings,
        "Redaction run complete"
    );

    Ok(())
}

/// Expand a leading `~` in a path
fn expand_path(path: &std::path::Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `level`.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}", log_level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
