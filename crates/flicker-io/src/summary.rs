//! Per-stimulus summary table
//!
//! One CSV row per [`StimulusResult`], runs in input order, stimuli in the
//! order the aggregator produced them. Absent values are written as empty
//! cells so the file loads cleanly into spreadsheet and dataframe tools.

use crate::error::Result;
use flicker_core::{MeasurementRun, StimulusResult};
use std::path::Path;
use tracing::debug;

/// Column order of `summary.csv`
pub const SUMMARY_HEADER: [&str; 14] = [
    "run",
    "stim_id",
    "f_cfg",
    "f_meas",
    "abs_err",
    "jitter_std",
    "frame_variance",
    "frame_p95",
    "drop_ratio",
    "usable",
    "browser",
    "refresh_hz",
    "mode",
    "date",
];

/// Write all rows of `runs` to `path`, replacing any existing file
pub fn write_summary(runs: &[MeasurementRun], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_HEADER)?;

    let mut rows = 0usize;
    for run in runs {
        let run_name = run.meta.run_name();
        for row in &run.stimuli {
            writer.write_record(summary_record(&run_name, row))?;
            rows += 1;
        }
    }
    writer.flush()?;

    debug!(path = %path.display(), rows, "wrote summary");
    Ok(())
}

/// Cells for one row, in [`SUMMARY_HEADER`] order
pub fn summary_record(run_name: &str, row: &StimulusResult) -> [String; 14] {
    [
        run_name.to_string(),
        row.stim_id.clone(),
        float_cell(row.configured_frequency_hz),
        float_cell(row.measured_frequency_hz),
        float_cell(row.absolute_error_hz),
        float_cell(row.jitter_std_hz),
        float_cell(row.frame_variance),
        float_cell(row.frame_p95_ms),
        float_cell(row.drop_ratio),
        row.usable.to_string(),
        text_cell(row.browser.as_deref()),
        float_cell(row.refresh_hz),
        text_cell(row.mode.as_deref()),
        text_cell(row.date.as_deref()),
    ]
}

fn float_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
