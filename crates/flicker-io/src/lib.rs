//! # Measurement I/O
//!
//! Everything that touches the filesystem:
//!
//! - [`discover_measurements`]: resolve CLI inputs to measurement files
//! - [`load_measurement`]: parse one measurement (JSON, with CSV fallback)
//! - [`write_summary`]: the per-stimulus `summary.csv`
//! - [`generate_plots`]: PNG charts under `plots/`
//! - [`write_report`]: the Markdown `report.md`
//!
//! The analysis crates never do I/O; they receive fully parsed
//! [`MeasurementData`](flicker_core::MeasurementData) values from here.

pub mod discover;
pub mod error;
pub mod loader;
pub mod plots;
pub mod report;
pub mod summary;

pub use discover::{discover_measurements, MEASUREMENT_FILE};
pub use error::{Error, Result};
pub use loader::{load_measurement, FRAMES_CSV, TOGGLES_CSV};
pub use plots::{generate_plots, PLOTS_DIR};
pub use report::{render_report, write_report, REPORT_FILE};
pub use summary::{summary_record, write_summary, SUMMARY_HEADER};

/// File name of the summary table inside the output directory
pub const SUMMARY_FILE: &str = "summary.csv";
