//! # Frame Stability Analysis
//!
//! Measures how steadily a browser delivered frames during a flicker
//! recording. Frames inside the warm-up interval are discarded, then the
//! remaining frame deltas are summarized as:
//!
//! - **Variance**: population variance of the deltas (ms²)
//! - **p95**: 95th percentile delta, interpolated between order statistics
//! - **Drop ratio**: share of deltas longer than 1.5 refresh intervals,
//!   reported only when the display refresh rate is known
//!
//! ```rust
//! use flicker_core::FrameSample;
//! use flicker_frame::FrameStabilityAnalyzer;
//!
//! let frames: Vec<FrameSample> = (0..300)
//!     .map(|i| FrameSample::new(i as f64 * 16.0, 16.0))
//!     .collect();
//!
//! let stats = FrameStabilityAnalyzer::default().analyze(&frames, Some(60.0)).unwrap();
//! assert_eq!(stats.variance, Some(0.0));
//! assert_eq!(stats.drop_ratio, Some(0.0));
//! ```

pub mod analyzer;
pub mod types;

// Re-exports
pub use analyzer::FrameStabilityAnalyzer;
pub use types::FrameStabilityParameters;
