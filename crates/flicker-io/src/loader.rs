//! Measurement loading
//!
//! A measurement is a JSON document with recording metadata, the stimulus
//! configuration, and frame/toggle arrays. Older recordings keep frames and
//! toggles in `frames.csv` / `toggles.csv` next to the JSON; those are read
//! when the JSON arrays are empty or missing.
//!
//! Malformed entries are dropped here so the analysis crates only ever see
//! complete records.

use crate::discover::{is_json, MEASUREMENT_FILE};
use crate::error::{Error, Result};
use flicker_core::{
    Edge, FrameSample, MeasurementData, MeasurementMeta, StimulusConfig, ToggleEvent,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const FRAMES_CSV: &str = "frames.csv";
pub const TOGGLES_CSV: &str = "toggles.csv";

/// Top-level layout of a measurement document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMeasurement {
    date: Option<Value>,
    commit: Option<Value>,
    browser: Option<Value>,
    os: Option<Value>,
    refresh_hz: Option<Value>,
    mode: Option<Value>,
    resolution: Option<Value>,
    stims: Option<Vec<Value>>,
    frames: Option<Vec<Value>>,
    toggles: Option<Vec<Value>>,
}

/// Load one measurement from a JSON file or a run directory
pub fn load_measurement(source: impl AsRef<Path>) -> Result<MeasurementData> {
    let (json_path, base_dir) = resolve_source(source.as_ref())?;

    let reader = BufReader::new(File::open(&json_path)?);
    let raw: RawMeasurement = serde_json::from_reader(reader)?;

    let meta = MeasurementMeta {
        source_path: Some(json_path.clone()),
        date: meta_text("date", raw.date),
        commit: meta_text("commit", raw.commit),
        browser: meta_text("browser", raw.browser),
        os: meta_text("os", raw.os),
        refresh_hz: parse_refresh(raw.refresh_hz.as_ref()),
        mode: meta_text("mode", raw.mode),
        resolution: meta_text("resolution", raw.resolution),
    };
    let stims = parse_stims(raw.stims.unwrap_or_default());

    let mut frames = parse_entries(raw.frames.unwrap_or_default(), parse_frame_entry);
    if frames.is_empty() {
        frames = read_csv_entries(&base_dir.join(FRAMES_CSV), parse_frame_entry)?;
    }

    let mut toggles = parse_entries(raw.toggles.unwrap_or_default(), parse_toggle_entry);
    if toggles.is_empty() {
        toggles = read_csv_entries(&base_dir.join(TOGGLES_CSV), parse_toggle_entry)?;
    }

    if frames.is_empty() {
        warn!(path = %json_path.display(), "measurement has no frame records; frame metrics will be missing");
    }
    if toggles.is_empty() {
        warn!(path = %json_path.display(), "measurement has no toggle events; frequencies cannot be estimated");
    }

    Ok(MeasurementData {
        meta,
        stims,
        frames,
        toggles,
    })
}

/// Measurement JSON path and the directory holding its CSV fallbacks
fn resolve_source(source: &Path) -> Result<(PathBuf, PathBuf)> {
    let source = source
        .canonicalize()
        .map_err(|_| Error::NotFound(format!("invalid measurement path: {}", source.display())))?;

    if source.is_dir() {
        let json = source.join(MEASUREMENT_FILE);
        if !json.is_file() {
            return Err(Error::NotFound(format!(
                "directory {} has no {MEASUREMENT_FILE}",
                source.display()
            )));
        }
        return Ok((json, source));
    }

    if !is_json(&source) {
        return Err(Error::NotFound(format!(
            "unsupported measurement file: {}",
            source.display()
        )));
    }
    let base = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((source, base))
}

/// Metadata as text; scalars are stringified, structured values kept as JSON
fn meta_text(key: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        other => {
            warn!(key, value = %other, "non-scalar metadata value; keeping its JSON text");
            Some(other.to_string())
        }
    }
}

fn parse_refresh(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    let parsed = number(value);
    if parsed.is_none() {
        warn!(refresh_hz = %value, "cannot parse refresh_hz; treating as unknown");
    }
    parsed
}

fn parse_stims(entries: Vec<Value>) -> BTreeMap<String, StimulusConfig> {
    let mut stims = BTreeMap::new();
    for entry in entries {
        let Some(stim_id) = non_empty_str(&entry, "stim_id") else {
            warn!(entry = %entry, "ignoring stimulus without stim_id");
            continue;
        };

        let configured_frequency_hz = match entry.get("f_cfg") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let parsed = number(raw);
                if parsed.is_none() {
                    warn!(stim_id = %stim_id, f_cfg = %raw, "ignoring invalid f_cfg");
                }
                parsed
            }
        };

        let config = StimulusConfig {
            stim_id: stim_id.clone(),
            wave: entry.get("wave").and_then(Value::as_str).map(str::to_string),
            configured_frequency_hz,
        };
        stims.insert(stim_id, config);
    }
    stims
}

fn parse_frame_entry(entry: &Value) -> Option<FrameSample> {
    let timestamp_ms = entry.get("t_ms").and_then(number);
    let delta_ms = entry.get("dt_ms").and_then(number);
    match (timestamp_ms, delta_ms) {
        (Some(t), Some(dt)) => Some(FrameSample::new(t, dt)),
        _ => {
            debug!(entry = %entry, "ignoring malformed frame record");
            None
        }
    }
}

fn parse_toggle_entry(entry: &Value) -> Option<ToggleEvent> {
    let Some(stim_id) = non_empty_str(entry, "stim_id") else {
        debug!(entry = %entry, "ignoring toggle without stim_id");
        return None;
    };
    let Some(timestamp_ms) = entry.get("t_ms").and_then(number) else {
        debug!(entry = %entry, "ignoring toggle with invalid t_ms");
        return None;
    };

    let edge = match entry.get("edge") {
        None => Edge::Rise,
        Some(raw) => match raw.as_str().map(str::parse::<Edge>) {
            Some(Ok(edge)) => edge,
            _ => {
                debug!(entry = %entry, "ignoring toggle with unknown edge");
                return None;
            }
        },
    };

    Some(ToggleEvent::new(stim_id, timestamp_ms, edge))
}

fn parse_entries<T>(entries: Vec<Value>, parse: fn(&Value) -> Option<T>) -> Vec<T> {
    entries.iter().filter_map(parse).collect()
}

/// Read a CSV file into the same shape as JSON entries; absent file reads as empty
///
/// Empty cells stay as empty strings, so a blank `edge` is rejected rather
/// than defaulted.
fn read_csv_entries<T>(path: &Path, parse: fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for row in reader.deserialize::<BTreeMap<String, String>>() {
        let row = row?;
        let entry: Map<String, Value> = row
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        if let Some(item) = parse(&Value::Object(entry)) {
            out.push(item);
        }
    }
    Ok(out)
}

/// A JSON number or a string holding one
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn non_empty_str(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(&json!(60)), Some(60.0));
        assert_eq!(number(&json!("59.94")), Some(59.94));
        assert_eq!(number(&json!("fast")), None);
        assert_eq!(number(&json!(true)), None);
        assert_eq!(number(&json!("NaN")), None);
    }

    #[test]
    fn test_parse_refresh() {
        assert_eq!(parse_refresh(None), None);
        assert_eq!(parse_refresh(Some(&Value::Null)), None);
        assert_eq!(parse_refresh(Some(&json!("144"))), Some(144.0));
        assert_eq!(parse_refresh(Some(&json!({"hz": 60}))), None);
    }

    #[test]
    fn test_parse_toggle_entry_defaults_to_rise() {
        let toggle = parse_toggle_entry(&json!({"stim_id": "a", "t_ms": 10})).unwrap();
        assert_eq!(toggle.edge, Edge::Rise);

        let toggle = parse_toggle_entry(&json!({"stim_id": "a", "t_ms": "10", "edge": "FALL"})).unwrap();
        assert_eq!(toggle.edge, Edge::Fall);
        assert_eq!(toggle.timestamp_ms, 10.0);
    }

    #[test]
    fn test_parse_toggle_entry_rejects_malformed() {
        assert!(parse_toggle_entry(&json!({"t_ms": 10})).is_none());
        assert!(parse_toggle_entry(&json!({"stim_id": "", "t_ms": 10})).is_none());
        assert!(parse_toggle_entry(&json!({"stim_id": "a"})).is_none());
        assert!(parse_toggle_entry(&json!({"stim_id": "a", "t_ms": 1, "edge": "up"})).is_none());
    }

    #[test]
    fn test_parse_toggle_entry_null_or_blank_edge_is_dropped() {
        assert!(parse_toggle_entry(&json!({"stim_id": "a", "t_ms": 2000, "edge": null})).is_none());
        assert!(parse_toggle_entry(&json!({"stim_id": "a", "t_ms": 2000, "edge": ""})).is_none());
        assert!(parse_toggle_entry(&json!({"stim_id": "a", "t_ms": 2000, "edge": 1})).is_none());
    }

    #[test]
    fn test_meta_text() {
        assert_eq!(meta_text("date", None), None);
        assert_eq!(meta_text("date", Some(Value::Null)), None);
        assert_eq!(meta_text("date", Some(json!("2024-05-01"))).as_deref(), Some("2024-05-01"));
        assert_eq!(meta_text("date", Some(json!(20240501))).as_deref(), Some("20240501"));
        assert_eq!(meta_text("os", Some(json!(true))).as_deref(), Some("true"));
        assert_eq!(
            meta_text("resolution", Some(json!([1920, 1080]))).as_deref(),
            Some("[1920,1080]")
        );
    }

    #[test]
    fn test_parse_frame_entry() {
        assert_eq!(
            parse_frame_entry(&json!({"t_ms": 2000.5, "dt_ms": "16.6"})),
            Some(FrameSample::new(2000.5, 16.6))
        );
        assert!(parse_frame_entry(&json!({"t_ms": 2000.5})).is_none());
    }

    #[test]
    fn test_parse_stims() {
        let stims = parse_stims(vec![
            json!({"stim_id": "a", "wave": "square", "f_cfg": 12}),
            json!({"stim_id": "b", "f_cfg": "oops"}),
            json!({"wave": "sine", "f_cfg": 8}),
        ]);

        assert_eq!(stims.len(), 2);
        assert_eq!(stims["a"].configured_frequency_hz, Some(12.0));
        assert_eq!(stims["a"].wave.as_deref(), Some("square"));
        assert_eq!(stims["b"].configured_frequency_hz, None);
    }
}
