//! Markdown report
//!
//! A human-readable companion to `summary.csv`: an overview of the batch,
//! the generated plots, then the full detail table.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use flicker_core::MeasurementRun;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const REPORT_FILE: &str = "report.md";

const MISSING: &str = "—";
const SIGNIFICANT_DIGITS: i32 = 4;

/// Render the report and write it to `output_dir/report.md`
///
/// `plot_paths` are embedded as given, so pass them relative to
/// `output_dir`.
pub fn write_report(
    runs: &[MeasurementRun],
    summary_csv: &Path,
    plot_paths: &[PathBuf],
    output_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = output_dir.join(REPORT_FILE);
    fs::write(&path, render_report(runs, summary_csv, plot_paths, generated_at)?)?;
    debug!(path = %path.display(), "wrote report");
    Ok(path)
}

/// Report body as a string
pub fn render_report(
    runs: &[MeasurementRun],
    summary_csv: &Path,
    plot_paths: &[PathBuf],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let mut out = String::new();
    write_markdown(&mut out, runs, summary_csv, plot_paths, generated_at)?;
    Ok(out)
}

fn write_markdown(
    out: &mut String,
    runs: &[MeasurementRun],
    summary_csv: &Path,
    plot_paths: &[PathBuf],
    generated_at: DateTime<Utc>,
) -> fmt::Result {
    let summary_name = summary_csv
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| summary_csv.display().to_string());

    writeln!(out, "# Flicker timing report\n")?;
    writeln!(
        out,
        "- Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(out, "- Summary: `{summary_name}` ({} runs)\n", runs.len())?;

    write_overview(out, runs, plot_paths.len())?;
    write_plots(out, plot_paths)?;

    writeln!(out, "## Stimuli\n")?;
    write_table(out, runs)
}

fn write_overview(out: &mut String, runs: &[MeasurementRun], plot_count: usize) -> fmt::Result {
    writeln!(out, "## Overview\n")?;
    if runs.is_empty() {
        return writeln!(out, "- No measurements available.\n");
    }

    let total: usize = runs.iter().map(|r| r.stimuli.len()).sum();
    let usable: usize = runs.iter().map(MeasurementRun::usable_count).sum();
    writeln!(out, "- Runs: {}", runs.len())?;
    writeln!(out, "- Plots: {plot_count}")?;
    writeln!(out, "- Usable stimuli: {usable}/{total}\n")
}

fn write_plots(out: &mut String, plot_paths: &[PathBuf]) -> fmt::Result {
    if plot_paths.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Plots\n")?;
    for plot in plot_paths {
        let stem = plot
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let target: Vec<_> = plot.iter().map(|c| c.to_string_lossy()).collect();
        writeln!(out, "![{stem}]({})\n", target.join("/"))?;
    }
    Ok(())
}

fn write_table(out: &mut String, runs: &[MeasurementRun]) -> fmt::Result {
    writeln!(
        out,
        "| run | stim | f_cfg | f_meas | abs_err | jitter | dt var | dt p95 | drop |"
    )?;
    writeln!(out, "| --- | --- | --- | --- | --- | --- | --- | --- | --- |")?;

    let mut rows = 0usize;
    for run in runs {
        let run_name = run.meta.run_name();
        for row in &run.stimuli {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                run_name,
                row.stim_id,
                significant(row.configured_frequency_hz),
                significant(row.measured_frequency_hz),
                significant(row.absolute_error_hz),
                significant(row.jitter_std_hz),
                significant(row.frame_variance),
                significant(row.frame_p95_ms),
                significant(row.drop_ratio),
            )?;
            rows += 1;
        }
    }

    if rows == 0 {
        writeln!(out, "| - | - | - | - | - | - | - | - | - |")?;
    }
    Ok(())
}

/// General format with four significant digits (printf `%.4g`)
///
/// Fixed notation when the decimal exponent lies in `[-4, 4)`, otherwise
/// scientific with a signed, at least two-digit exponent. Trailing zeros are
/// removed in both.
fn significant(value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Exponent after rounding to the target precision
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, v);
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exp.parse().unwrap_or(0);

    if (-4..SIGNIFICANT_DIGITS).contains(&exponent) {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        return trim_zeros(&format!("{v:.decimals$}")).to_string();
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
