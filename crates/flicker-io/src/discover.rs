//! Measurement discovery
//!
//! Accepts a mix of files and directories and resolves them to measurement
//! JSON files. Directories are searched in this order:
//!
//! 1. `measurement.json` directly inside the directory
//! 2. every `*.json` file in the directory
//! 3. `*/measurement.json` one level down (legacy per-run folders)

use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name of a measurement inside a run directory
pub const MEASUREMENT_FILE: &str = "measurement.json";

/// Resolve candidate paths to measurement files, deduplicated, in input order
pub fn discover_measurements<P: AsRef<Path>>(candidates: &[P]) -> Result<Vec<PathBuf>> {
    let mut found = Discovered::default();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let Ok(path) = fs::canonicalize(candidate) else {
            warn!(path = %candidate.display(), "ignoring invalid path");
            continue;
        };

        if path.is_file() {
            if is_json(&path) {
                found.add(path);
            } else {
                warn!(path = %path.display(), "ignoring non-JSON file");
            }
            continue;
        }

        if !path.is_dir() {
            warn!(path = %path.display(), "ignoring invalid path");
            continue;
        }

        let direct = path.join(MEASUREMENT_FILE);
        if direct.is_file() {
            found.add(direct);
            continue;
        }

        let json_files = sorted_entries(&path, |p| p.is_file() && is_json(p))?;
        if !json_files.is_empty() {
            json_files.into_iter().for_each(|p| found.add(p));
            continue;
        }

        for sub in sorted_entries(&path, |p| p.is_dir())? {
            let legacy = sub.join(MEASUREMENT_FILE);
            if legacy.is_file() {
                found.add(legacy);
            }
        }
    }

    Ok(found.paths)
}

#[derive(Default)]
struct Discovered {
    seen: HashSet<PathBuf>,
    paths: Vec<PathBuf>,
}

impl Discovered {
    fn add(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.paths.push(path);
        }
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if keep(&path) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json() {
        assert!(is_json(Path::new("a/measurement.json")));
        assert!(is_json(Path::new("RUN.JSON")));
        assert!(!is_json(Path::new("frames.csv")));
        assert!(!is_json(Path::new("json")));
    }
}
