//! # flicker-stats
//!
//! Timing-quality analysis for browser-rendered SSVEP flicker stimuli.
//!
//! Given one or more recorded measurements (frame timings plus per-stimulus
//! toggle events) this crate reports, per stimulus, the measured flicker
//! frequency, its error against the configured frequency, temporal jitter,
//! frame-interval stability and a usability flag.
//!
//! The workspace is split the same way the analysis is:
//!
//! - [`model`]: data model, error type, numeric helpers
//! - [`frame`]: frame-interval stability
//! - [`frequency`]: frequency and jitter estimation from rising edges
//! - [`run`]: per-measurement aggregation and batch analysis
//! - [`io`]: discovery, loading, `summary.csv`, plots and `report.md`
//!
//! [`analyze_runs`] ties them together into the full batch pipeline.

pub use flicker_core as model;
pub use flicker_frame as frame;
pub use flicker_frequency as frequency;
pub use flicker_io as io;
pub use flicker_run as run;

pub use flicker_core::{
    Edge, FrameSample, FrameStabilityStats, FrequencyEstimate, MeasurementData, MeasurementMeta,
    MeasurementRun, StimulusConfig, StimulusResult, ToggleEvent, Usability,
};
pub use flicker_io::{Error, Result};
pub use flicker_run::AnalysisConfig;

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Files produced by one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub summary: PathBuf,
    pub report: PathBuf,
    pub plots_dir: PathBuf,
    /// Charts written into `plots_dir`; empty charts are skipped
    pub plots: Vec<PathBuf>,
    /// Number of measurements analyzed
    pub runs: usize,
}

/// Discover, load and analyze every measurement under `inputs`, then write
/// `summary.csv`, the `plots/` charts and `report.md` into `output_dir`
///
/// # Errors
///
/// [`Error::Core`] for an invalid `config`, [`Error::NotFound`] when no
/// measurement is discovered. Any measurement that fails to load aborts the
/// whole batch.
pub fn analyze_runs<P: AsRef<Path>>(
    inputs: &[P],
    output_dir: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<Outputs> {
    let output_dir = output_dir.as_ref();
    config.validate()?;

    let paths = flicker_io::discover_measurements(inputs)?;
    if paths.is_empty() {
        return Err(Error::NotFound(
            "no measurement files found in the given inputs".to_string(),
        ));
    }
    info!(count = paths.len(), "discovered measurements");

    let data = paths
        .iter()
        .map(|path| {
            flicker_io::load_measurement(path).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "failed to load measurement");
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let runs = flicker_run::analyze_all(&data, config)?;

    fs::create_dir_all(output_dir)?;
    let summary = output_dir.join(flicker_io::SUMMARY_FILE);
    flicker_io::write_summary(&runs, &summary)?;

    let plots_dir = output_dir.join(flicker_io::PLOTS_DIR);
    let plots = flicker_io::generate_plots(&runs, &plots_dir)?;
    let relative: Vec<PathBuf> = plots
        .iter()
        .map(|p| p.strip_prefix(output_dir).unwrap_or(p).to_path_buf())
        .collect();
    let report = flicker_io::write_report(&runs, &summary, &relative, output_dir, Utc::now())?;

    info!(
        runs = runs.len(),
        summary = %summary.display(),
        report = %report.display(),
        plots = plots.len(),
        "analysis complete"
    );

    Ok(Outputs {
        summary,
        report,
        plots_dir,
        plots,
        runs: runs.len(),
    })
}
