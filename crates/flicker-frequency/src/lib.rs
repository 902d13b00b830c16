//! # Stimulus Frequency Estimation
//!
//! Turns the rising edges recorded for one flicker stimulus into:
//!
//! - **Measured frequency**: `1000 / mean(inter-edge period in ms)`
//! - **Absolute error**: distance to the configured frequency, when known
//! - **Jitter**: mean of per-window standard deviations of the instantaneous
//!   frequency, using time windows slid along the period midpoints
//!
//! Non-positive periods (duplicate or out-of-order edges) are dropped pair by
//! pair; the remaining pairs still produce an estimate.
//!
//! ```rust
//! use flicker_core::ToggleEvent;
//! use flicker_frequency::FrequencyEstimator;
//!
//! let edges: Vec<ToggleEvent> = [0.0, 100.0, 200.0, 300.0]
//!     .iter()
//!     .map(|&t| ToggleEvent::rise("left", t))
//!     .collect();
//!
//! let est = FrequencyEstimator::default().estimate(&edges, Some(10.0));
//! assert_eq!(est.measured_hz, Some(10.0));
//! assert_eq!(est.absolute_error_hz, Some(0.0));
//! assert_eq!(est.jitter_std_hz, Some(0.0));
//! ```

pub mod estimator;
pub mod traits;
pub mod types;
pub mod window;

// Re-exports
pub use estimator::{edge_periods, FrequencyEstimator, MIN_RISING_EDGES};
pub use traits::JitterEstimator;
pub use types::{EdgePeriods, FrequencyParameters};
pub use window::{SlidingWindowJitter, TimeWindows};
