//! Sliding time windows over irregularly spaced samples
//!
//! Windows are defined on the time axis, not by sample count. For every
//! right index the left index is advanced until the window spans at most
//! `width_ms`. Both indices only ever move forward, so a full pass is O(n).

use crate::traits::JitterEstimator;
use flicker_core::stats;
use std::ops::Range;

/// Two-pointer window state over an ascending time axis
///
/// Yields one index range per sample, ending at that sample. After each step
/// `times[right] - times[left] <= width_ms` holds, or `left == right`.
#[derive(Debug, Clone)]
pub struct TimeWindows<'a> {
    times_ms: &'a [f64],
    width_ms: f64,
    left: usize,
    right: usize,
}

impl<'a> TimeWindows<'a> {
    pub fn new(times_ms: &'a [f64], width_ms: f64) -> Self {
        Self {
            times_ms,
            width_ms,
            left: 0,
            right: 0,
        }
    }
}

impl Iterator for TimeWindows<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.right >= self.times_ms.len() {
            return None;
        }
        let right = self.right;
        while self.left < right && self.times_ms[right] - self.times_ms[self.left] > self.width_ms {
            self.left += 1;
        }
        self.right += 1;
        Some(self.left..right + 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.times_ms.len().saturating_sub(self.right);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeWindows<'_> {}

/// Mean of per-window population standard deviations
///
/// Windows holding fewer than two samples are skipped. A perfectly periodic
/// signal gives `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingWindowJitter {
    width_ms: f64,
}

impl SlidingWindowJitter {
    pub fn new(width_ms: f64) -> Self {
        Self { width_ms }
    }

    pub fn from_seconds(width_seconds: f64) -> Self {
        Self::new(width_seconds * flicker_core::MS_PER_SECOND)
    }

    pub fn width_ms(&self) -> f64 {
        self.width_ms
    }
}

impl Default for SlidingWindowJitter {
    fn default() -> Self {
        Self::from_seconds(1.0)
    }
}

impl JitterEstimator for SlidingWindowJitter {
    fn estimate(&self, values: &[f64], times_ms: &[f64]) -> Option<f64> {
        debug_assert_eq!(values.len(), times_ms.len());
        if values.len() < 2 {
            return None;
        }

        let window_stds: Vec<f64> = TimeWindows::new(times_ms, self.width_ms)
            .filter(|w| w.len() >= 2)
            .filter_map(|w| stats::population_std_dev(&values[w]))
            .collect();

        stats::mean(&window_stds)
    }

    fn method_name(&self) -> &str {
        "sliding-window-std"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_windows_shrink_from_left() {
        let times = [0.0, 400.0, 900.0, 1200.0, 2500.0];
        let windows: Vec<_> = TimeWindows::new(&times, 1000.0).collect();
        assert_eq!(windows, vec![0..1, 0..2, 0..3, 1..4, 4..5]);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let times = [0.0, 1000.0];
        let windows: Vec<_> = TimeWindows::new(&times, 1000.0).collect();
        assert_eq!(windows, vec![0..1, 0..2]);
    }

    #[test]
    fn test_empty_axis() {
        assert_eq!(TimeWindows::new(&[], 1000.0).count(), 0);
    }

    #[test]
    fn test_constant_series_has_zero_jitter() {
        let values = [10.0; 8];
        let times: Vec<f64> = (0..8).map(|i| 50.0 + i as f64 * 100.0).collect();
        assert_eq!(SlidingWindowJitter::default().estimate(&values, &times), Some(0.0));
    }

    #[test]
    fn test_single_value_has_no_jitter() {
        assert_eq!(SlidingWindowJitter::default().estimate(&[10.0], &[50.0]), None);
    }

    #[test]
    fn test_no_window_reaches_two_samples() {
        // Samples 2 s apart never share a 1 s window
        let values = [10.0, 12.0, 9.0];
        let times = [0.0, 2000.0, 4000.0];
        assert_eq!(SlidingWindowJitter::default().estimate(&values, &times), None);
    }

    #[test]
    fn test_mean_of_window_stds() {
        // Windows: [10, 12] -> std 1, [12, 12] -> std 0 (10 drops out)
        let values = [10.0, 12.0, 12.0];
        let times = [0.0, 600.0, 1200.0];
        let jitter = SlidingWindowJitter::default().estimate(&values, &times).unwrap();
        assert_relative_eq!(jitter, 0.5, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_window_invariant_holds(
            times in prop::collection::vec(0.0f64..10_000.0, 0..200),
            width in 1.0f64..3000.0
        ) {
            let mut times = times;
            times.sort_by(|a, b| a.total_cmp(b));
            let mut prev_left = 0;
            for (right, window) in TimeWindows::new(&times, width).enumerate() {
                prop_assert_eq!(window.end, right + 1);
                prop_assert!(window.start >= prev_left);
                prop_assert!(
                    window.start == right || times[right] - times[window.start] <= width
                );
                // The window is maximal: one more sample on the left would break it
                if window.start > 0 {
                    prop_assert!(times[right] - times[window.start - 1] > width);
                }
                prev_left = window.start;
            }
        }

        #[test]
        fn prop_jitter_non_negative(
            values in prop::collection::vec(1.0f64..60.0, 2..100)
        ) {
            let times: Vec<f64> = (0..values.len()).map(|i| i as f64 * 100.0).collect();
            if let Some(j) = SlidingWindowJitter::default().estimate(&values, &times) {
                prop_assert!(j >= 0.0);
            }
        }
    }
}
