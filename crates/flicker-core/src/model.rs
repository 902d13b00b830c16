//! Measurement and result types
//!
//! Input types describe one browser recording as it arrives from the loader.
//! Output types are what the analyzers derive from it. Every derived value
//! that can be missing is an `Option`: zero is a legitimate measurement
//! (zero jitter, zero drops) and must stay distinguishable from "no data".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration of one flicker stimulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusConfig {
    /// Unique key within a measurement
    pub stim_id: String,
    /// Waveform name as reported by the page (square, sine, ...)
    pub wave: Option<String>,
    /// Frequency the stimulus was asked to flicker at
    pub configured_frequency_hz: Option<f64>,
}

impl StimulusConfig {
    pub fn new(stim_id: impl Into<String>, configured_frequency_hz: Option<f64>) -> Self {
        Self {
            stim_id: stim_id.into(),
            wave: None,
            configured_frequency_hz,
        }
    }

    pub fn with_wave(mut self, wave: impl Into<String>) -> Self {
        self.wave = Some(wave.into());
        self
    }
}

/// One rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Time of the frame since recording start
    pub timestamp_ms: f64,
    /// Time since the previous frame
    pub delta_ms: f64,
}

impl FrameSample {
    pub fn new(timestamp_ms: f64, delta_ms: f64) -> Self {
        Self {
            timestamp_ms,
            delta_ms,
        }
    }
}

/// Direction of a flicker state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Invisible to visible
    Rise,
    /// Visible to invisible
    Fall,
}

impl Edge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Rise => "rise",
            Edge::Fall => "fall",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = crate::Error;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rise" => Ok(Edge::Rise),
            "fall" => Ok(Edge::Fall),
            other => Err(crate::Error::InvalidParameter(format!(
                "unknown toggle edge '{other}'"
            ))),
        }
    }
}

/// A recorded flicker transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleEvent {
    pub stim_id: String,
    pub timestamp_ms: f64,
    pub edge: Edge,
}

impl ToggleEvent {
    pub fn new(stim_id: impl Into<String>, timestamp_ms: f64, edge: Edge) -> Self {
        Self {
            stim_id: stim_id.into(),
            timestamp_ms,
            edge,
        }
    }

    /// Shorthand for a rising edge
    pub fn rise(stim_id: impl Into<String>, timestamp_ms: f64) -> Self {
        Self::new(stim_id, timestamp_ms, Edge::Rise)
    }

    /// Shorthand for a falling edge
    pub fn fall(stim_id: impl Into<String>, timestamp_ms: f64) -> Self {
        Self::new(stim_id, timestamp_ms, Edge::Fall)
    }

    pub fn is_rise(&self) -> bool {
        self.edge == Edge::Rise
    }
}

/// Environment a measurement was recorded in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementMeta {
    /// File the measurement was loaded from, if any
    pub source_path: Option<PathBuf>,
    pub date: Option<String>,
    pub commit: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    /// Display refresh rate
    pub refresh_hz: Option<f64>,
    /// Presentation mode (windowed, fullscreen, ...)
    pub mode: Option<String>,
    pub resolution: Option<String>,
}

impl MeasurementMeta {
    /// Short label for the recording conditions, e.g. `chrome_60Hz_fullscreen`
    pub fn label(&self) -> String {
        let hz = match self.refresh_hz {
            Some(hz) if hz != 0.0 => format!("{}Hz", hz.trunc() as i64),
            _ => "unknownHz".to_string(),
        };
        let browser = self.browser.as_deref().unwrap_or("unknownBrowser");
        let mode = self.mode.as_deref().unwrap_or("windowed");
        format!("{browser}_{hz}_{mode}")
    }

    /// File stem of the source path, used as the run name in reports
    pub fn run_name(&self) -> String {
        self.source_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string())
    }
}

/// A fully materialized recording, ready for analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementData {
    pub meta: MeasurementMeta,
    /// Stimulus configuration keyed by `stim_id`
    pub stims: BTreeMap<String, StimulusConfig>,
    pub frames: Vec<FrameSample>,
    pub toggles: Vec<ToggleEvent>,
}

impl MeasurementData {
    pub fn new(meta: MeasurementMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    /// Insert a stimulus configuration, replacing any previous entry with the same id
    pub fn with_stimulus(mut self, config: StimulusConfig) -> Self {
        self.stims.insert(config.stim_id.clone(), config);
        self
    }

    pub fn with_frames(mut self, frames: Vec<FrameSample>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_toggles(mut self, toggles: Vec<ToggleEvent>) -> Self {
        self.toggles = toggles;
        self
    }

    /// Configured frequency for a stimulus, if the stimulus and its frequency are known
    pub fn configured_frequency(&self, stim_id: &str) -> Option<f64> {
        self.stims
            .get(stim_id)
            .and_then(|s| s.configured_frequency_hz)
    }
}

/// Frame-timing stability of one recording
///
/// All optional fields are `None` when no frame survives warm-up filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStabilityStats {
    /// Population variance of retained frame deltas (ms²)
    pub variance: Option<f64>,
    /// 95th percentile of retained frame deltas (ms)
    pub p95_ms: Option<f64>,
    /// Fraction of deltas longer than 1.5 refresh intervals
    pub drop_ratio: Option<f64>,
    /// Frame deltas that survived warm-up filtering
    pub retained_deltas: Vec<f64>,
}

impl FrameStabilityStats {
    /// The "no data" sentinel
    pub fn no_data() -> Self {
        Self::default()
    }

    /// Whether any frame survived warm-up filtering
    pub fn has_data(&self) -> bool {
        !self.retained_deltas.is_empty()
    }
}

/// Whether a stimulus's measured frequency can be trusted downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usability {
    Usable,
    Unusable,
    /// No frequency error could be computed
    #[default]
    Unknown,
}

impl Usability {
    /// Classify an absolute frequency error against a tolerance in Hz
    ///
    /// A missing error yields [`Usability::Unknown`], never `Unusable`.
    pub fn classify(absolute_error_hz: Option<f64>, epsilon: f64) -> Self {
        match absolute_error_hz {
            Some(err) if err < epsilon => Usability::Usable,
            Some(_) => Usability::Unusable,
            None => Usability::Unknown,
        }
    }

    /// Tri-state as an optional bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Usability::Usable => Some(true),
            Usability::Unusable => Some(false),
            Usability::Unknown => None,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, Usability::Usable)
    }
}

impl fmt::Display for Usability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usability::Usable => write!(f, "true"),
            Usability::Unusable => write!(f, "false"),
            Usability::Unknown => Ok(()),
        }
    }
}

/// Frequency metrics for one stimulus
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEstimate {
    /// `1000 / mean(period_ms)`
    pub measured_hz: Option<f64>,
    /// `|measured - configured|`
    pub absolute_error_hz: Option<f64>,
    /// Mean of per-window standard deviations of instantaneous frequency
    pub jitter_std_hz: Option<f64>,
}

impl FrequencyEstimate {
    /// Estimate with every field absent
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Analysis row for one (measurement, stimulus) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusResult {
    pub source_path: Option<PathBuf>,
    pub stim_id: String,
    pub configured_frequency_hz: Option<f64>,
    pub measured_frequency_hz: Option<f64>,
    pub absolute_error_hz: Option<f64>,
    pub jitter_std_hz: Option<f64>,
    pub frame_variance: Option<f64>,
    pub frame_p95_ms: Option<f64>,
    pub drop_ratio: Option<f64>,
    pub usable: Usability,
    pub browser: Option<String>,
    pub refresh_hz: Option<f64>,
    pub mode: Option<String>,
    pub date: Option<String>,
}

impl StimulusResult {
    /// Build a row from a frequency estimate plus the run-level context
    pub fn new(
        stim_id: impl Into<String>,
        configured_frequency_hz: Option<f64>,
        estimate: FrequencyEstimate,
        usable: Usability,
        frame_stats: &FrameStabilityStats,
        meta: &MeasurementMeta,
    ) -> Self {
        Self {
            source_path: meta.source_path.clone(),
            stim_id: stim_id.into(),
            configured_frequency_hz,
            measured_frequency_hz: estimate.measured_hz,
            absolute_error_hz: estimate.absolute_error_hz,
            jitter_std_hz: estimate.jitter_std_hz,
            frame_variance: frame_stats.variance,
            frame_p95_ms: frame_stats.p95_ms,
            drop_ratio: frame_stats.drop_ratio,
            usable,
            browser: meta.browser.clone(),
            refresh_hz: meta.refresh_hz,
            mode: meta.mode.clone(),
            date: meta.date.clone(),
        }
    }

    /// Row for a configured stimulus that produced no usable toggles
    pub fn placeholder(
        stim_id: impl Into<String>,
        configured_frequency_hz: Option<f64>,
        frame_stats: &FrameStabilityStats,
        meta: &MeasurementMeta,
    ) -> Self {
        Self::new(
            stim_id,
            configured_frequency_hz,
            FrequencyEstimate::empty(),
            Usability::Unknown,
            frame_stats,
            meta,
        )
    }

    pub fn has_frequency(&self) -> bool {
        self.measured_frequency_hz.is_some()
    }
}

/// Aggregated analysis of one measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRun {
    pub meta: MeasurementMeta,
    /// Shared by every row in `stimuli`
    pub frame_stats: FrameStabilityStats,
    /// Sorted by `stim_id`
    pub stimuli: Vec<StimulusResult>,
}

impl MeasurementRun {
    pub fn stimulus(&self, stim_id: &str) -> Option<&StimulusResult> {
        self.stimuli
            .binary_search_by(|s| s.stim_id.as_str().cmp(stim_id))
            .ok()
            .map(|idx| &self.stimuli[idx])
    }

    pub fn usable_count(&self) -> usize {
        self.stimuli.iter().filter(|s| s.usable.is_usable()).count()
    }
}
