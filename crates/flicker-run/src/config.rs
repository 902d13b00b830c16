//! Tuning knobs for a measurement analysis

use flicker_core::{Error, Result};
use flicker_frame::FrameStabilityParameters;
use flicker_frequency::FrequencyParameters;
use serde::{Deserialize, Serialize};

/// Default warm-up excluded from every statistic (seconds)
pub const DEFAULT_WARMUP_SECONDS: f64 = 2.0;
/// Default jitter window (seconds)
pub const DEFAULT_WINDOW_SECONDS: f64 = 1.0;
/// Default usability tolerance (Hz)
pub const DEFAULT_EPSILON: f64 = 0.2;

/// Configuration for analyzing one measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trims startup transients before any statistic
    pub warmup_seconds: f64,
    /// Jitter smoothing granularity
    pub window_seconds: f64,
    /// A stimulus is usable when its frequency error is below this (Hz)
    pub epsilon: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            warmup_seconds: DEFAULT_WARMUP_SECONDS,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl AnalysisConfig {
    pub fn new(warmup_seconds: f64, window_seconds: f64, epsilon: f64) -> Self {
        Self {
            warmup_seconds,
            window_seconds,
            epsilon,
        }
    }

    pub fn warmup_ms(&self) -> f64 {
        self.warmup_seconds * flicker_core::MS_PER_SECOND
    }

    pub fn frame_params(&self) -> FrameStabilityParameters {
        FrameStabilityParameters::with_warmup(self.warmup_seconds)
    }

    pub fn frequency_params(&self) -> FrequencyParameters {
        FrequencyParameters::with_window(self.window_seconds)
    }

    /// Reject knobs no analysis can make sense of
    pub fn validate(&self) -> Result<()> {
        self.frame_params().validate()?;
        self.frequency_params().validate()?;
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::non_positive("epsilon", self.epsilon));
        }
        Ok(())
    }
}
