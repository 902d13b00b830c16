//! Parameters for frame stability analysis

use flicker_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for frame stability analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameStabilityParameters {
    /// Leading recording time excluded from every statistic (seconds)
    pub warmup_seconds: f64,

    /// Percentile reported as the tail latency
    pub tail_percentile: f64,

    /// A frame counts as dropped when its delta exceeds
    /// `drop_factor` refresh intervals
    pub drop_factor: f64,
}

impl Default for FrameStabilityParameters {
    fn default() -> Self {
        Self {
            warmup_seconds: 2.0,
            tail_percentile: 95.0,
            drop_factor: 1.5,
        }
    }
}

impl FrameStabilityParameters {
    /// Default parameters with a custom warm-up
    pub fn with_warmup(warmup_seconds: f64) -> Self {
        Self {
            warmup_seconds,
            ..Default::default()
        }
    }

    /// Warm-up cutoff in milliseconds
    pub fn warmup_ms(&self) -> f64 {
        self.warmup_seconds * flicker_core::MS_PER_SECOND
    }

    /// Delta above which a frame counts as dropped, if the refresh rate is usable
    pub fn drop_threshold_ms(&self, refresh_hz: Option<f64>) -> Option<f64> {
        match refresh_hz {
            Some(hz) if hz > 0.0 && hz.is_finite() => {
                Some(self.drop_factor * (flicker_core::MS_PER_SECOND / hz))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.warmup_seconds.is_finite() || self.warmup_seconds < 0.0 {
            return Err(Error::negative("warmup_seconds", self.warmup_seconds));
        }
        Error::check_percentile(self.tail_percentile)?;
        if !self.drop_factor.is_finite() || self.drop_factor <= 0.0 {
            return Err(Error::non_positive("drop_factor", self.drop_factor));
        }
        Ok(())
    }
}
