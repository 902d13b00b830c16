//! Stimulus frequency estimator
//!
//! Measured frequency is the reciprocal of the mean interval between
//! consecutive rising edges.

use crate::traits::JitterEstimator;
use crate::types::{EdgePeriods, FrequencyParameters};
use crate::window::SlidingWindowJitter;
use flicker_core::{stats, FrequencyEstimate, ToggleEvent, MS_PER_SECOND};
use tracing::{debug, instrument};

/// Minimum number of rising edges needed for a single period
pub const MIN_RISING_EDGES: usize = 2;

/// Estimates measured frequency, error and jitter for one stimulus
///
/// Generic over:
/// - `J`: Jitter estimator applied to the instantaneous-frequency series
#[derive(Debug, Clone)]
pub struct FrequencyEstimator<J = SlidingWindowJitter> {
    jitter: J,
}

impl FrequencyEstimator<SlidingWindowJitter> {
    /// Estimator with the sliding-window jitter described by `params`
    pub fn new(params: FrequencyParameters) -> Self {
        Self {
            jitter: SlidingWindowJitter::from_seconds(params.window_seconds),
        }
    }

    pub fn with_window(window_seconds: f64) -> Self {
        Self::new(FrequencyParameters::with_window(window_seconds))
    }
}

impl Default for FrequencyEstimator<SlidingWindowJitter> {
    fn default() -> Self {
        Self::new(FrequencyParameters::default())
    }
}

impl<J: JitterEstimator> FrequencyEstimator<J> {
    /// Estimator with a custom jitter method
    pub fn with_jitter(jitter: J) -> Self {
        Self { jitter }
    }

    pub fn jitter(&self) -> &J {
        &self.jitter
    }

    /// Estimate from rising edges of a single stimulus
    ///
    /// `rising_edges` must already be restricted to one stimulus, to rising
    /// edges, and to the post-warm-up part of the recording, in recording
    /// order.
    #[instrument(level = "debug", skip_all, fields(edges = rising_edges.len()))]
    pub fn estimate(
        &self,
        rising_edges: &[ToggleEvent],
        configured_hz: Option<f64>,
    ) -> FrequencyEstimate {
        let timestamps: Vec<f64> = rising_edges.iter().map(|t| t.timestamp_ms).collect();
        self.estimate_timestamps(&timestamps, configured_hz)
    }

    /// Estimate from raw rising-edge timestamps (ms)
    pub fn estimate_timestamps(
        &self,
        timestamps_ms: &[f64],
        configured_hz: Option<f64>,
    ) -> FrequencyEstimate {
        if timestamps_ms.len() < MIN_RISING_EDGES {
            return FrequencyEstimate::empty();
        }

        let periods = edge_periods(timestamps_ms);
        let Some(mean_period) = stats::mean(&periods.periods_ms) else {
            debug!(
                discarded = periods.discarded,
                "no positive inter-edge period"
            );
            return FrequencyEstimate::empty();
        };

        let measured_hz = MS_PER_SECOND / mean_period;
        let absolute_error_hz = configured_hz.map(|cfg| (measured_hz - cfg).abs());
        let jitter_std_hz = self
            .jitter
            .estimate(&periods.instantaneous_hz(), &periods.midpoints_ms);

        FrequencyEstimate {
            measured_hz: Some(measured_hz),
            absolute_error_hz,
            jitter_std_hz,
        }
    }
}

/// Periods and midpoints of consecutive edge pairs
///
/// Pairs whose period is not positive (duplicate or out-of-order timestamps)
/// are skipped and counted in [`EdgePeriods::discarded`].
pub fn edge_periods(timestamps_ms: &[f64]) -> EdgePeriods {
    let mut out = EdgePeriods {
        periods_ms: Vec::with_capacity(timestamps_ms.len().saturating_sub(1)),
        midpoints_ms: Vec::with_capacity(timestamps_ms.len().saturating_sub(1)),
        discarded: 0,
    };

    for pair in timestamps_ms.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let period = curr - prev;
        if period <= 0.0 || period.is_nan() {
            debug!(prev_ms = prev, curr_ms = curr, "ignoring non-positive period");
            out.discarded += 1;
            continue;
        }
        out.periods_ms.push(period);
        out.midpoints_ms.push((prev + curr) * 0.5);
    }

    out
}
