//! Run aggregation
//!
//! Composes frame stability and per-stimulus frequency estimation over one
//! measurement. Frame statistics are computed once and copied into every
//! stimulus row; configured stimuli without usable toggles still get a row.

use crate::config::AnalysisConfig;
use flicker_core::{
    FrameStabilityStats, MeasurementData, MeasurementRun, Result, StimulusResult, ToggleEvent,
    Usability,
};
use flicker_frame::FrameStabilityAnalyzer;
use flicker_frequency::FrequencyEstimator;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Analyzes measurements with a fixed configuration
#[derive(Debug, Clone)]
pub struct RunAggregator {
    config: AnalysisConfig,
    frame_analyzer: FrameStabilityAnalyzer,
    frequency_estimator: FrequencyEstimator,
}

impl RunAggregator {
    /// Create an aggregator, rejecting invalid configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frame_analyzer: FrameStabilityAnalyzer::new(config.frame_params()),
            frequency_estimator: FrequencyEstimator::new(config.frequency_params()),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one measurement
    ///
    /// Stimulus rows are sorted by `stim_id`; identical input always yields
    /// an identical run.
    #[instrument(level = "debug", skip_all, fields(run = %data.meta.run_name()))]
    pub fn analyze(&self, data: &MeasurementData) -> Result<MeasurementRun> {
        let frame_stats = self
            .frame_analyzer
            .analyze(&data.frames, data.meta.refresh_hz)?;

        let grouped = group_rising_toggles(&data.toggles, self.config.warmup_ms());
        let mut stimuli = Vec::with_capacity(grouped.len() + data.stims.len());

        for (stim_id, toggles) in &grouped {
            stimuli.push(self.stimulus_result(data, &frame_stats, stim_id, toggles));
        }

        for (stim_id, config) in &data.stims {
            if grouped.contains_key(stim_id) {
                continue;
            }
            debug!(stim_id = %stim_id, "configured stimulus has no qualifying toggles");
            stimuli.push(StimulusResult::placeholder(
                stim_id.clone(),
                config.configured_frequency_hz,
                &frame_stats,
                &data.meta,
            ));
        }

        stimuli.sort_by(|a, b| a.stim_id.cmp(&b.stim_id));

        Ok(MeasurementRun {
            meta: data.meta.clone(),
            frame_stats,
            stimuli,
        })
    }

    fn stimulus_result(
        &self,
        data: &MeasurementData,
        frame_stats: &FrameStabilityStats,
        stim_id: &str,
        toggles: &[ToggleEvent],
    ) -> StimulusResult {
        let configured = data.configured_frequency(stim_id);
        if !data.stims.contains_key(stim_id) {
            debug!(stim_id = %stim_id, "toggles recorded for an unconfigured stimulus");
        }

        let estimate = self.frequency_estimator.estimate(toggles, configured);
        let usable = Usability::classify(estimate.absolute_error_hz, self.config.epsilon);

        StimulusResult::new(
            stim_id,
            configured,
            estimate,
            usable,
            frame_stats,
            &data.meta,
        )
    }
}

/// Rising edges at or after `warmup_ms`, grouped by stimulus in recording order
pub fn group_rising_toggles(
    toggles: &[ToggleEvent],
    warmup_ms: f64,
) -> BTreeMap<String, Vec<ToggleEvent>> {
    let mut grouped: BTreeMap<String, Vec<ToggleEvent>> = BTreeMap::new();
    for toggle in toggles {
        if toggle.timestamp_ms < warmup_ms || !toggle.is_rise() {
            continue;
        }
        grouped
            .entry(toggle.stim_id.clone())
            .or_default()
            .push(toggle.clone());
    }
    grouped
}

/// Analyze one measurement with explicit knobs
///
/// Defaults used across the workspace are `warmup_seconds = 2.0`,
/// `window_seconds = 1.0` and `epsilon = 0.2`; see [`AnalysisConfig`].
pub fn analyze_one_measurement(
    data: &MeasurementData,
    warmup_seconds: f64,
    window_seconds: f64,
    epsilon: f64,
) -> Result<MeasurementRun> {
    RunAggregator::new(AnalysisConfig::new(warmup_seconds, window_seconds, epsilon))?.analyze(data)
}
