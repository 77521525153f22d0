//! Enumeration of the tabular files in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::report::REPORT_PREFIX;

const TABULAR_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// Artifacts produced by earlier runs (profiling reports and sample
/// extracts) must not be compared as data files.
const ARTIFACT_SUFFIXES: &[&str] = &["info.csv", "sample.csv"];

/// Lists the CSV/Excel files directly under `directory`, skipping prior
/// report and profiling artifacts. Entries are sorted by name so pair
/// enumeration, and therefore report output, is reproducible.
///
/// An unreadable directory yields an empty list, never an error.
pub fn find_tabular_files(directory: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list '{}': {err}", directory.display());
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_tabular_candidate(path))
        .collect();
    files.sort();
    files
}

fn is_tabular_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    TABULAR_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
        && !lower.starts_with(REPORT_PREFIX)
        && !ARTIFACT_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}
