//! PNG charts for the report
//!
//! - `freq_error.png`: mean absolute frequency error per configured
//!   frequency, one series per recording label, error bars at one
//!   population standard deviation
//! - `jitter_box.png`: jitter distribution per browser
//! - `frame_hist.png`: histogram of post-warm-up frame intervals
//!
//! A chart with nothing to show is skipped, not drawn empty.

use crate::error::{Error, Result};
use flicker_core::stats::{mean, percentile, population_std_dev};
use flicker_core::MeasurementRun;
use ordered_float::OrderedFloat;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sub-directory of the output directory holding the charts
pub const PLOTS_DIR: &str = "plots";
pub const FREQ_ERROR_PLOT: &str = "freq_error.png";
pub const JITTER_BOX_PLOT: &str = "jitter_box.png";
pub const FRAME_HIST_PLOT: &str = "frame_hist.png";

const HISTOGRAM_BINS: usize = 40;
const CHART_SIZE: (u32, u32) = (1000, 600);
const BOX_HALF_WIDTH: f64 = 0.25;
const WHISKER_IQR: f64 = 1.5;

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// One point of the frequency-error chart
#[derive(Debug, Clone, PartialEq)]
struct ErrorPoint {
    f_cfg: f64,
    mean: f64,
    std: f64,
}

/// Quartiles, whisker ends and outliers of one box
#[derive(Debug, Clone, PartialEq)]
struct BoxStats {
    q1: f64,
    median: f64,
    q3: f64,
    whisker_lo: f64,
    whisker_hi: f64,
    outliers: Vec<f64>,
}

/// Histogram bin `[start, end)`; the last bin also holds its end
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bin {
    start: f64,
    end: f64,
    count: usize,
}

/// Draw every chart the batch has data for into `plots_dir`
///
/// Returns the written files in a fixed order: frequency error, jitter,
/// frame histogram.
pub fn generate_plots(runs: &[MeasurementRun], plots_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(plots_dir)?;
    let mut written = Vec::new();

    let errors = frequency_errors(runs);
    if errors.is_empty() {
        info!("no frequency errors to plot; skipping {FREQ_ERROR_PLOT}");
    } else {
        let path = plots_dir.join(FREQ_ERROR_PLOT);
        render(&path, |p| draw_freq_error(p, &errors))?;
        written.push(path);
    }

    let jitter = jitter_by_browser(runs);
    if jitter.is_empty() {
        info!("no jitter values to plot; skipping {JITTER_BOX_PLOT}");
    } else {
        let path = plots_dir.join(JITTER_BOX_PLOT);
        render(&path, |p| draw_jitter_box(p, &jitter))?;
        written.push(path);
    }

    let deltas: Vec<f64> = runs
        .iter()
        .flat_map(|run| run.frame_stats.retained_deltas.iter().copied())
        .collect();
    let bins = histogram(&deltas, HISTOGRAM_BINS);
    if bins.is_empty() {
        info!("no frame intervals to plot; skipping {FRAME_HIST_PLOT}");
    } else {
        let path = plots_dir.join(FRAME_HIST_PLOT);
        render(&path, |p| draw_frame_hist(p, &bins))?;
        written.push(path);
    }

    Ok(written)
}

fn render(path: &Path, draw: impl FnOnce(&Path) -> DrawResult) -> Result<()> {
    draw(path).map_err(|e| Error::Plot(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "wrote plot");
    Ok(())
}

/// Mean and spread of the absolute error, by label then configured frequency
fn frequency_errors(runs: &[MeasurementRun]) -> BTreeMap<String, Vec<ErrorPoint>> {
    let mut grouped: BTreeMap<String, BTreeMap<OrderedFloat<f64>, Vec<f64>>> = BTreeMap::new();
    for run in runs {
        let label = run.meta.label();
        for row in &run.stimuli {
            let (Some(f_cfg), Some(err)) = (row.configured_frequency_hz, row.absolute_error_hz)
            else {
                continue;
            };
            grouped
                .entry(label.clone())
                .or_default()
                .entry(OrderedFloat(f_cfg))
                .or_default()
                .push(err);
        }
    }

    grouped
        .into_iter()
        .map(|(label, by_freq)| {
            let points = by_freq
                .into_iter()
                .filter_map(|(f_cfg, errors)| {
                    Some(ErrorPoint {
                        f_cfg: f_cfg.into_inner(),
                        mean: mean(&errors)?,
                        std: population_std_dev(&errors)?,
                    })
                })
                .collect();
            (label, points)
        })
        .collect()
}

/// Jitter values grouped by browser; runs without one count as `unknown`
fn jitter_by_browser(runs: &[MeasurementRun]) -> BTreeMap<String, Vec<f64>> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for run in runs {
        let browser = run.meta.browser.as_deref().unwrap_or("unknown");
        for jitter in run.stimuli.iter().filter_map(|row| row.jitter_std_hz) {
            grouped.entry(browser.to_string()).or_default().push(jitter);
        }
    }
    grouped
}

/// Box-and-whisker summary; whiskers reach the furthest value within
/// 1.5 IQR of the box
fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let q1 = percentile(values, 25.0).ok()?;
    let median = percentile(values, 50.0).ok()?;
    let q3 = percentile(values, 75.0).ok()?;
    let iqr = q3 - q1;
    let fences = (q1 - WHISKER_IQR * iqr)..=(q3 + WHISKER_IQR * iqr);

    let (inside, outliers): (Vec<f64>, Vec<f64>) =
        values.iter().copied().partition(|v| fences.contains(v));
    let whisker_lo = inside.iter().copied().fold(q1, f64::min);
    let whisker_hi = inside.iter().copied().fold(q3, f64::max);

    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_lo,
        whisker_hi,
        outliers,
    })
}

/// Equal-width bins over the sample range; a constant sample gets a unit-wide range
fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Axis range with a 5% margin; a single value gets a margin around it
fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.1
    };
    (lo - pad)..(hi + pad)
}

fn draw_freq_error(path: &Path, series: &BTreeMap<String, Vec<ErrorPoint>>) -> DrawResult {
    let points: Vec<&ErrorPoint> = series.values().flatten().collect();
    let x = padded(
        points.iter().map(|p| p.f_cfg).fold(f64::INFINITY, f64::min),
        points.iter().map(|p| p.f_cfg).fold(f64::NEG_INFINITY, f64::max),
    );
    let y = padded(
        points.iter().map(|p| p.mean - p.std).fold(0.0, f64::min),
        points.iter().map(|p| p.mean + p.std).fold(0.0, f64::max),
    );

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Absolute frequency error", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x.clone(), y)?;

    chart
        .configure_mesh()
        .x_desc("Configured frequency (Hz)")
        .y_desc("|f_meas - f_cfg| (Hz)")
        .draw()?;

    chart.draw_series(LineSeries::new(
        vec![(x.start, 0.0), (x.end, 0.0)],
        BLACK.mix(0.4).stroke_width(1),
    ))?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart.draw_series(points.iter().map(|p| {
            ErrorBar::new_vertical(
                p.f_cfg,
                p.mean - p.std,
                p.mean,
                p.mean + p.std,
                color.filled(),
                8,
            )
        }))?;
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.f_cfg, p.mean)),
                color.stroke_width(2),
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_jitter_box(path: &Path, groups: &BTreeMap<String, Vec<f64>>) -> DrawResult {
    let boxes: Vec<(&str, BoxStats)> = groups
        .iter()
        .filter_map(|(browser, values)| Some((browser.as_str(), box_stats(values)?)))
        .collect();
    let names: Vec<&str> = boxes.iter().map(|(name, _)| *name).collect();

    let lows = boxes
        .iter()
        .flat_map(|(_, b)| std::iter::once(b.whisker_lo).chain(b.outliers.iter().copied()));
    let highs = boxes
        .iter()
        .flat_map(|(_, b)| std::iter::once(b.whisker_hi).chain(b.outliers.iter().copied()));
    let y = padded(
        lows.fold(f64::INFINITY, f64::min),
        highs.fold(f64::NEG_INFINITY, f64::max),
    );

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Jitter by browser", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(boxes.len() as f64 - 0.5), y)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len())
        .x_label_formatter(&|x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                names.get(idx as usize).map(|n| n.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .x_desc("Browser")
        .y_desc("Jitter std (Hz)")
        .draw()?;

    for (i, (_, b)) in boxes.iter().enumerate() {
        let x = i as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let (cap_left, cap_right) = (x - BOX_HALF_WIDTH / 2.0, x + BOX_HALF_WIDTH / 2.0);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, b.q1), (right, b.q3)],
            BLUE.mix(0.3).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, b.q1), (right, b.q3)],
            BLUE.stroke_width(1),
        )))?;
        chart.draw_series([
            PathElement::new(vec![(left, b.median), (right, b.median)], RED.stroke_width(2)),
            PathElement::new(vec![(x, b.whisker_lo), (x, b.q1)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, b.q3), (x, b.whisker_hi)], BLACK.stroke_width(1)),
            PathElement::new(
                vec![(cap_left, b.whisker_lo), (cap_right, b.whisker_lo)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(cap_left, b.whisker_hi), (cap_right, b.whisker_hi)],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            b.outliers
                .iter()
                .map(|&v| Circle::new((x, v), 3, BLACK.stroke_width(1))),
        )?;
    }

    root.present()?;
    Ok(())
}

fn draw_frame_hist(path: &Path, bins: &[Bin]) -> DrawResult {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let y_max = (tallest as f64 * 1.05).max(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Frame intervals after warm-up", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first.start..last.end, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Frame interval (ms)")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.start, 0.0), (b.end, b.count as f64)],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
