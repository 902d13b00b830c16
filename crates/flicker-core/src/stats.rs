//! Numeric helpers shared by the analyzers
//!
//! Location and dispersion use population formulas (divide by N). Every
//! helper returns `None` on an empty sample instead of a misleading zero,
//! except [`percentile`], which treats empty input as a caller bug.

use crate::error::{Error, Result};
use ordered_float::OrderedFloat;
use statrs::statistics::Statistics;

/// Arithmetic mean, or `None` for an empty sample
///
/// # Examples
///
/// ```rust
/// use flicker_core::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().mean())
}

/// Population variance (divide by N), or `None` for an empty sample
///
/// Two passes: mean first, then squared deviations from it. Identical
/// observations, including a single one, give exactly `0.0`.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let sum_sq: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    Some(sum_sq / data.len() as f64)
}

/// Population standard deviation, or `None` for an empty sample
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Percentile by linear interpolation between order statistics
///
/// For a sorted sample of length `n`, the rank is `r = p/100 * (n - 1)` and
/// the result interpolates between positions `floor(r)` and `ceil(r)`.
///
/// # Errors
///
/// Returns [`Error::EmptyData`] for an empty sample and
/// [`Error::InvalidPercentile`] when `p` is outside `[0, 100]`. Both are
/// contract violations: guard the no-data case before calling.
///
/// # Examples
///
/// ```rust
/// use flicker_core::stats::percentile;
///
/// let p50 = percentile(&[4.0, 1.0, 3.0, 2.0], 50.0).unwrap();
/// assert_eq!(p50, 2.5);
/// ```
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    Error::check_non_empty(data)?;
    Error::check_percentile(p)?;

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by_key(|&x| OrderedFloat(x));

    if sorted.len() == 1 {
        return Ok(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = rank - lower as f64;
    Ok(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}
