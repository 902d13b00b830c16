//! Filesystem tests for discovery, loading and output writers

use chrono::{TimeZone, Utc};
use flicker_core::{Edge, Usability};
use flicker_io::{
    discover_measurements, generate_plots, load_measurement, write_report, write_summary, Error,
    SUMMARY_HEADER,
};
use flicker_run::{analyze_all, AnalysisConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn measurement_json(stim_f_cfg: f64) -> String {
    let toggles: Vec<String> = (0..30)
        .map(|i| {
            format!(
                r#"{{"stim_id": "left", "t_ms": {}, "edge": "rise"}}"#,
                2000.0 + i as f64 * 100.0
            )
        })
        .collect();
    let frames: Vec<String> = (0..300)
        .map(|i| format!(r#"{{"t_ms": {}, "dt_ms": 16.7}}"#, i as f64 * 16.7))
        .collect();

    format!(
        r#"{{
            "date": "2024-05-01",
            "commit": "abc123",
            "browser": "chrome",
            "os": "linux",
            "refresh_hz": "60",
            "mode": "fullscreen",
            "resolution": "1920x1080",
            "stims": [
                {{"stim_id": "left", "wave": "square", "f_cfg": {stim_f_cfg}}},
                {{"stim_id": "right", "f_cfg": 15}}
            ],
            "frames": [{}],
            "toggles": [{}]
        }}"#,
        frames.join(","),
        toggles.join(",")
    )
}

fn write(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

#[test]
fn test_load_measurement_json() {
    let dir = tempdir().unwrap();
    let path = write(&dir.path().join("run1.json"), &measurement_json(10.0));

    let data = load_measurement(&path).unwrap();

    assert_eq!(data.meta.browser.as_deref(), Some("chrome"));
    assert_eq!(data.meta.refresh_hz, Some(60.0));
    assert_eq!(data.meta.resolution.as_deref(), Some("1920x1080"));
    assert_eq!(data.meta.run_name(), "run1");
    assert_eq!(data.stims.len(), 2);
    assert_eq!(data.configured_frequency("right"), Some(15.0));
    assert_eq!(data.frames.len(), 300);
    assert_eq!(data.toggles.len(), 30);
    assert!(data.toggles.iter().all(|t| t.edge == Edge::Rise));
}

#[test]
fn test_load_directory_resolves_measurement_file() {
    let dir = tempdir().unwrap();
    write(
        &dir.path().join("chrome-60").join("measurement.json"),
        &measurement_json(10.0),
    );

    let data = load_measurement(dir.path().join("chrome-60")).unwrap();
    assert_eq!(data.meta.run_name(), "measurement");
    assert_eq!(data.toggles.len(), 30);
}

#[test]
fn test_load_falls_back_to_csv() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir.path().join("measurement.json"),
        r#"{"browser": "firefox", "refresh_hz": 144,
            "stims": [{"stim_id": "a", "f_cfg": 12}], "frames": [], "toggles": []}"#,
    );
    write(
        &dir.path().join("frames.csv"),
        "t_ms,dt_ms\n2000,6.9\n2006.9,6.9\nbad,6.9\n",
    );
    write(
        &dir.path().join("toggles.csv"),
        "stim_id,t_ms,edge\na,2000,rise\na,2041.6,fall\na,2083.3,\nb,2100,sideways\n",
    );

    let data = load_measurement(&path).unwrap();

    assert_eq!(data.frames.len(), 2);
    // Blank and unknown edge cells are dropped, not defaulted
    assert_eq!(data.toggles.len(), 2);
    assert_eq!(data.toggles[0].edge, Edge::Rise);
    assert_eq!(data.toggles[1].edge, Edge::Fall);
}

#[test]
fn test_csv_without_edge_column_defaults_to_rise() {
    let dir = tempdir().unwrap();
    let path = write(&dir.path().join("measurement.json"), r#"{"toggles": []}"#);
    write(&dir.path().join("toggles.csv"), "stim_id,t_ms
a,2000
a,2100
");

    let data = load_measurement(&path).unwrap();

    assert_eq!(data.toggles.len(), 2);
    assert!(data.toggles.iter().all(|t| t.edge == Edge::Rise));
}

#[test]
fn test_load_non_string_metadata() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir.path().join("run.json"),
        r#"{"date": 20240501, "commit": null, "browser": "edge", "os": true,
            "mode": "fullscreen", "resolution": [1920, 1080], "refresh_hz": 60}"#,
    );

    let data = load_measurement(&path).unwrap();

    assert_eq!(data.meta.date.as_deref(), Some("20240501"));
    assert_eq!(data.meta.commit, None);
    assert_eq!(data.meta.os.as_deref(), Some("true"));
    assert_eq!(data.meta.resolution.as_deref(), Some("[1920,1080]"));
    assert_eq!(data.meta.label(), "edge_60Hz_fullscreen");
}

#[test]
fn test_null_edge_toggles_are_dropped() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir.path().join("run.json"),
        r#"{"toggles": [
            {"stim_id": "a", "t_ms": 2000, "edge": null},
            {"stim_id": "a", "t_ms": 2050, "edge": "rise"},
            {"stim_id": "a", "t_ms": 2100}
        ]}"#,
    );

    let data = load_measurement(&path).unwrap();

    let times: Vec<f64> = data.toggles.iter().map(|t| t.timestamp_ms).collect();
    assert_eq!(times, vec![2050.0, 2100.0]);
    assert!(data.toggles.iter().all(|t| t.edge == Edge::Rise));
}

#[test]
fn test_load_missing_inputs() {
    let dir = tempdir().unwrap();

    let err = load_measurement(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = load_measurement(dir.path()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let csv = write(&dir.path().join("frames.csv"), "t_ms,dt_ms\n");
    let err = load_measurement(&csv).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = write(&dir.path().join("broken.json"), "{ not json");

    let err = load_measurement(&path).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_discover_measurements() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();

    // Direct measurement.json wins over sibling JSON files
    let direct = write(&root.join("direct").join("measurement.json"), "{}");
    write(&root.join("direct").join("extra.json"), "{}");
    // Loose JSON files, sorted
    let b = write(&root.join("loose").join("b.json"), "{}");
    let a = write(&root.join("loose").join("a.json"), "{}");
    write(&root.join("loose").join("notes.txt"), "");
    // Legacy layout: one run per sub-directory
    let legacy2 = write(&root.join("legacy").join("run2").join("measurement.json"), "{}");
    let legacy1 = write(&root.join("legacy").join("run1").join("measurement.json"), "{}");
    fs::create_dir_all(root.join("legacy").join("empty")).unwrap();

    let inputs = vec![
        root.join("direct"),
        root.join("loose"),
        root.join("legacy"),
        root.join("loose").join("a.json"),
        root.join("loose").join("notes.txt"),
        root.join("does-not-exist"),
    ];
    let found = discover_measurements(&inputs).unwrap();

    assert_eq!(found, vec![direct, a, b, legacy1, legacy2]);
}

#[test]
fn test_discover_nothing() {
    let dir = tempdir().unwrap();
    let found = discover_measurements(&[dir.path()]).unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_summary_and_report_outputs() {
    let dir = tempdir().unwrap();
    let run_a = write(&dir.path().join("in").join("a.json"), &measurement_json(10.0));
    let run_b = write(&dir.path().join("in").join("b.json"), &measurement_json(12.0));

    let data = vec![
        load_measurement(&run_a).unwrap(),
        load_measurement(&run_b).unwrap(),
    ];
    let runs = analyze_all(&data, &AnalysisConfig::default()).unwrap();
    assert_eq!(runs[0].stimulus("left").unwrap().usable, Usability::Usable);
    assert_eq!(runs[1].stimulus("left").unwrap().usable, Usability::Unusable);

    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let summary = out.join("summary.csv");
    write_summary(&runs, &summary).unwrap();

    let mut reader = csv::Reader::from_path(&summary).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, SUMMARY_HEADER.to_vec());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);

    assert_eq!(&rows[0][0], "a");
    assert_eq!(&rows[0][1], "left");
    assert_eq!(&rows[0][2], "10.000000");
    assert_eq!(&rows[0][3], "10.000000");
    assert_eq!(&rows[0][9], "true");
    assert_eq!(&rows[0][10], "chrome");
    assert_eq!(&rows[0][11], "60.000000");

    // Configured but never toggled
    assert_eq!(&rows[1][1], "right");
    assert_eq!(&rows[1][3], "");
    assert_eq!(&rows[1][9], "");
    assert_eq!(&rows[1][6], &rows[0][6]);

    assert_eq!(&rows[2][0], "b");
    assert_eq!(&rows[2][9], "false");

    let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
    let plots = generate_plots(&runs, &out.join("plots")).unwrap();
    assert_eq!(plots.len(), 3);
    let relative: Vec<PathBuf> = plots
        .iter()
        .map(|p| p.strip_prefix(&out).unwrap().to_path_buf())
        .collect();
    let report_path = write_report(&runs, &summary, &relative, &out, at).unwrap();
    assert_eq!(report_path, out.join("report.md"));

    let report = fs::read_to_string(report_path).unwrap();
    assert!(report.contains("2024-05-02T08:30:00Z"));
    assert!(report.contains("Summary: `summary.csv` (2 runs)"));
    assert!(report.contains("- Usable stimuli: 1/4"));
    assert!(report.contains("| a | left | 10 | 10 | 0 |"));
    assert!(report.contains("| a | right | 15 | — | — | — |"));
    assert!(report.contains("- Plots: 3"));
    assert!(report.contains("![jitter_box](plots/jitter_box.png)"));
}

#[test]
fn test_generate_plots_skips_empty_charts() {
    let dir = tempdir().unwrap();
    // Frames only: no toggles, so neither frequency error nor jitter exists
    let doc = r#"{
        "browser": "firefox",
        "refresh_hz": 60,
        "stims": [{"stim_id": "left", "f_cfg": 12}],
        "frames": [
            {"t_ms": 2100, "dt_ms": 16.6},
            {"t_ms": 2117, "dt_ms": 16.8},
            {"t_ms": 2150, "dt_ms": 33.3}
        ]
    }"#;
    let input = write(&dir.path().join("frames_only.json"), doc);
    let runs = analyze_all(&[load_measurement(&input).unwrap()], &AnalysisConfig::default()).unwrap();

    let plots_dir = dir.path().join("out").join("plots");
    let plots = generate_plots(&runs, &plots_dir).unwrap();

    assert_eq!(plots, vec![plots_dir.join("frame_hist.png")]);
    assert!(fs::metadata(&plots[0]).unwrap().len() > 0);
    assert!(!plots_dir.join("freq_error.png").exists());
    assert!(!plots_dir.join("jitter_box.png").exists());
}

#[test]
fn test_generate_plots_with_no_runs_writes_nothing() {
    let dir = tempdir().unwrap();
    let plots_dir = dir.path().join("plots");

    let plots = generate_plots(&[], &plots_dir).unwrap();

    assert!(plots.is_empty());
    assert!(plots_dir.is_dir());
}
