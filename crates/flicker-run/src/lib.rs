//! # Run Aggregation
//!
//! Produces one [`MeasurementRun`](flicker_core::MeasurementRun) per
//! recording by combining:
//!
//! 1. frame stability, computed once for the whole run;
//! 2. frequency metrics for every stimulus with qualifying rising edges;
//! 3. placeholder rows for configured stimuli that never toggled after
//!    warm-up, so each configured stimulus appears exactly once.
//!
//! Rows are sorted by `stim_id` and the computation is pure, so the same
//! input always produces the same run.
//!
//! ```rust
//! use flicker_core::{MeasurementData, StimulusConfig, ToggleEvent, Usability};
//! use flicker_run::analyze_one_measurement;
//!
//! let data = MeasurementData::default()
//!     .with_stimulus(StimulusConfig::new("left", Some(10.0)))
//!     .with_stimulus(StimulusConfig::new("right", Some(15.0)))
//!     .with_toggles(
//!         [2000.0, 2100.0, 2200.0, 2300.0]
//!             .iter()
//!             .map(|&t| ToggleEvent::rise("left", t))
//!             .collect(),
//!     );
//!
//! let run = analyze_one_measurement(&data, 2.0, 1.0, 0.2).unwrap();
//! assert_eq!(run.stimuli.len(), 2);
//! assert_eq!(run.stimuli[0].usable, Usability::Usable);
//! assert_eq!(run.stimuli[1].usable, Usability::Unknown);
//! ```

pub mod aggregator;
pub mod batch;
pub mod config;

// Re-exports
pub use aggregator::{analyze_one_measurement, group_rising_toggles, RunAggregator};
pub use batch::analyze_all;
pub use config::{AnalysisConfig, DEFAULT_EPSILON, DEFAULT_WARMUP_SECONDS, DEFAULT_WINDOW_SECONDS};
