use anyhow::{Context, Result};
use clap::Parser;
use flicker_stats::{analyze_runs, AnalysisConfig, Error};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Timing-quality analysis for SSVEP flicker measurements", long_about = None)]
struct Cli {
    /// Measurement files or directories containing them
    #[arg(value_name = "INPUTS", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for summary.csv, report.md and plots/
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Maximum absolute frequency error in Hz for a usable stimulus
    #[arg(long, default_value_t = flicker_stats::run::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Seconds discarded at the start of every recording
    #[arg(long, default_value_t = flicker_stats::run::DEFAULT_WARMUP_SECONDS)]
    warmup: f64,

    /// Jitter window width in seconds
    #[arg(long, default_value_t = flicker_stats::run::DEFAULT_WINDOW_SECONDS)]
    window: f64,

    /// Log filter (e.g. `info`, `debug`, `flicker_io=debug`); falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level.as_deref())?;

    let config = AnalysisConfig::new(cli.warmup, cli.window, cli.epsilon);
    let outputs = analyze_runs(&cli.inputs, &cli.output_dir, &config)?;

    println!("Summary: {}", outputs.summary.display());
    println!("Report:  {}", outputs.report.display());
    println!("Plots:   {} ({} charts)", outputs.plots_dir.display(), outputs.plots.len());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<Error>() {
                Some(Error::NotFound(_)) => ExitCode::from(1),
                _ => ExitCode::from(2),
            }
        }
    }
}
