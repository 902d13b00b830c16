//! Frame stability analyzer

use crate::types::FrameStabilityParameters;
use flicker_core::{stats, FrameSample, FrameStabilityStats, Result};
use tracing::{debug, instrument};

/// Derives dispersion, tail latency and drop ratio from frame timing samples
#[derive(Debug, Clone, Default)]
pub struct FrameStabilityAnalyzer {
    params: FrameStabilityParameters,
}

impl FrameStabilityAnalyzer {
    pub fn new(params: FrameStabilityParameters) -> Self {
        Self { params }
    }

    /// Create with a custom warm-up and default thresholds
    pub fn with_warmup(warmup_seconds: f64) -> Self {
        Self::new(FrameStabilityParameters::with_warmup(warmup_seconds))
    }

    pub fn params(&self) -> &FrameStabilityParameters {
        &self.params
    }

    /// Frame deltas recorded at or after the warm-up cutoff
    pub fn retained_deltas(&self, frames: &[FrameSample]) -> Vec<f64> {
        let warmup_ms = self.params.warmup_ms();
        frames
            .iter()
            .filter(|f| f.timestamp_ms >= warmup_ms)
            .map(|f| f.delta_ms)
            .collect()
    }

    /// Analyze a recording's frames
    ///
    /// Returns [`FrameStabilityStats::no_data`] when no frame survives the
    /// warm-up cutoff. `drop_ratio` stays `None` unless `refresh_hz` is
    /// known and positive.
    #[instrument(level = "debug", skip_all, fields(frames = frames.len()))]
    pub fn analyze(
        &self,
        frames: &[FrameSample],
        refresh_hz: Option<f64>,
    ) -> Result<FrameStabilityStats> {
        let deltas = self.retained_deltas(frames);
        if deltas.is_empty() {
            debug!(
                warmup_ms = self.params.warmup_ms(),
                "no frame samples after warm-up"
            );
            return Ok(FrameStabilityStats::no_data());
        }

        let variance = stats::population_variance(&deltas);
        let p95_ms = stats::percentile(&deltas, self.params.tail_percentile)?;
        let drop_ratio = self
            .params
            .drop_threshold_ms(refresh_hz)
            .map(|threshold| drop_ratio(&deltas, threshold));

        Ok(FrameStabilityStats {
            variance,
            p95_ms: Some(p95_ms),
            drop_ratio,
            retained_deltas: deltas,
        })
    }
}

/// Fraction of deltas strictly above `threshold_ms`; `deltas` must be non-empty
fn drop_ratio(deltas: &[f64], threshold_ms: f64) -> f64 {
    let drops = deltas.iter().filter(|&&dt| dt > threshold_ms).count();
    drops as f64 / deltas.len() as f64
}
