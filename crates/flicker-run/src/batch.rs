//! Batch analysis across measurements
//!
//! Each measurement is analyzed independently. With the `parallel` feature
//! the measurements are fanned out over the rayon pool; results keep the
//! input order either way.

use crate::aggregator::RunAggregator;
use crate::config::AnalysisConfig;
use flicker_core::{MeasurementData, MeasurementRun, Result};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Analyze every measurement, stopping at the first error
pub fn analyze_all(
    measurements: &[MeasurementData],
    config: &AnalysisConfig,
) -> Result<Vec<MeasurementRun>> {
    let aggregator = RunAggregator::new(*config)?;
    info!(count = measurements.len(), "analyzing measurements");

    #[cfg(feature = "parallel")]
    let runs = measurements
        .par_iter()
        .map(|m| aggregator.analyze(m))
        .collect::<Result<Vec<_>>>();

    #[cfg(not(feature = "parallel"))]
    let runs = measurements
        .iter()
        .map(|m| aggregator.analyze(m))
        .collect::<Result<Vec<_>>>();

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use flicker_core::{MeasurementMeta, StimulusConfig, ToggleEvent};
    use std::path::PathBuf;

    fn measurement(name: &str, hz: f64) -> MeasurementData {
        let period = 1000.0 / hz;
        let toggles = (0..30)
            .map(|i| ToggleEvent::rise("s", 2000.0 + i as f64 * period))
            .collect();
        MeasurementData::new(MeasurementMeta {
            source_path: Some(PathBuf::from(format!("{name}.json"))),
            ..Default::default()
        })
        .with_stimulus(StimulusConfig::new("s", Some(hz)))
        .with_toggles(toggles)
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let inputs = vec![measurement("c", 8.0), measurement("a", 10.0), measurement("b", 12.5)];

        let runs = analyze_all(&inputs, &AnalysisConfig::default()).unwrap();

        let names: Vec<String> = runs.iter().map(|r| r.meta.run_name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(runs.iter().all(|r| r.usable_count() == 1));
    }

    #[test]
    fn test_batch_rejects_invalid_config() {
        let config = AnalysisConfig::new(2.0, 1.0, -1.0);
        assert!(analyze_all(&[measurement("a", 10.0)], &config).is_err());
    }

    #[test]
    fn test_batch_empty() {
        assert!(analyze_all(&[], &AnalysisConfig::default()).unwrap().is_empty());
    }
}
