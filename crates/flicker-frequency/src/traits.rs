//! Core traits for jitter estimation

/// Summarizes the variability of an instantaneous-frequency series
///
/// `values[i]` is observed at `times_ms[i]`; times are ascending and both
/// slices have the same length. Implementations return `None` when the
/// series is too short to say anything, never a placeholder zero.
pub trait JitterEstimator: Send + Sync {
    fn estimate(&self, values: &[f64], times_ms: &[f64]) -> Option<f64>;

    /// Name of the method, for diagnostics
    fn method_name(&self) -> &str;
}
