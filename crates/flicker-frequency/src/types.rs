//! Parameters and intermediate series for frequency estimation

use flicker_core::{Error, Result, MS_PER_SECOND};
use serde::{Deserialize, Serialize};

/// Parameters for frequency estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyParameters {
    /// Length of the jitter window (seconds)
    pub window_seconds: f64,
}

impl Default for FrequencyParameters {
    fn default() -> Self {
        Self {
            window_seconds: 1.0,
        }
    }
}

impl FrequencyParameters {
    pub fn with_window(window_seconds: f64) -> Self {
        Self { window_seconds }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_seconds * MS_PER_SECOND
    }

    pub fn validate(&self) -> Result<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(Error::non_positive("window_seconds", self.window_seconds));
        }
        Ok(())
    }
}

/// Inter-edge periods and the time axis they sit on
///
/// `periods_ms[i]` spans two consecutive rising edges and `midpoints_ms[i]`
/// is the instant halfway between them. Both vectors always have the same
/// length and every period is strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePeriods {
    pub periods_ms: Vec<f64>,
    pub midpoints_ms: Vec<f64>,
    /// Pairs dropped because their period was not positive
    pub discarded: usize,
}

impl EdgePeriods {
    pub fn len(&self) -> usize {
        self.periods_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods_ms.is_empty()
    }

    /// Instantaneous frequency of each period (Hz)
    pub fn instantaneous_hz(&self) -> Vec<f64> {
        self.periods_ms.iter().map(|p| MS_PER_SECOND / p).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_ms() {
        assert_eq!(FrequencyParameters::default().window_ms(), 1000.0);
        assert_eq!(FrequencyParameters::with_window(0.25).window_ms(), 250.0);
    }

    #[test]
    fn test_validate() {
        assert!(FrequencyParameters::default().validate().is_ok());
        assert!(FrequencyParameters::with_window(0.0).validate().is_err());
        assert!(FrequencyParameters::with_window(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_instantaneous_hz() {
        let periods = EdgePeriods {
            periods_ms: vec![100.0, 50.0],
            midpoints_ms: vec![50.0, 125.0],
            discarded: 0,
        };
        assert_eq!(periods.instantaneous_hz(), vec![10.0, 20.0]);
    }
}
