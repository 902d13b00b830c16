//! Core types for flicker timing analysis
//!
//! This crate provides the data model shared by every analysis crate in the
//! workspace, the unified error type, and the small set of numeric helpers
//! (mean, population dispersion, interpolated percentile) the analyzers are
//! built from.
//!
//! # Example
//!
//! ```rust
//! use flicker_core::{stats, FrameSample, MeasurementData, StimulusConfig};
//!
//! let data = MeasurementData::default()
//!     .with_stimulus(StimulusConfig::new("left", Some(12.0)))
//!     .with_frames(vec![FrameSample::new(2000.0, 16.7), FrameSample::new(2016.7, 16.7)]);
//!
//! let deltas: Vec<f64> = data.frames.iter().map(|f| f.delta_ms).collect();
//! assert_eq!(stats::population_variance(&deltas), Some(0.0));
//! ```

pub mod error;
pub mod model;
pub mod stats;

// Re-export core types
pub use error::{Error, Result};
pub use model::{
    Edge, FrameSample, FrameStabilityStats, FrequencyEstimate, MeasurementData, MeasurementMeta,
    MeasurementRun, StimulusConfig, StimulusResult, ToggleEvent, Usability,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Milliseconds per second, used for every seconds-to-milliseconds conversion
pub const MS_PER_SECOND: f64 = 1000.0;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{
        Edge, FrameSample, FrameStabilityStats, FrequencyEstimate, MeasurementData,
        MeasurementMeta, MeasurementRun, Result, StimulusConfig, StimulusResult, ToggleEvent,
        Usability,
    };
}
