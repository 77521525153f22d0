//! Comparison report shaping and serialization.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::diff::ComparisonRow;

/// Report files are named with this prefix so later runs can recognize
/// and exclude them from discovery.
pub const REPORT_PREFIX: &str = "comparacao_cabecalhos";

/// Fixed report schema, in output order.
pub const REPORT_COLUMNS: [&str; 5] = [
    "arquivo_1",
    "arquivo_2",
    "coluna",
    "comparacao",
    "possiveis_candidatas",
];

/// Flattens rows into the report's five-column shape. Pure field
/// selection, no transformation; absent candidates become empty fields.
pub fn assemble(rows: &[ComparisonRow]) -> Vec<[String; 5]> {
    rows.iter()
        .map(|row| {
            [
                row.file_1.clone(),
                row.file_2.clone(),
                row.column.clone(),
                row.comparison.label().to_string(),
                row.candidates.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

/// Writes the comparison report under `output_dir` (created on demand),
/// named after the analyzed directory and the run's local timestamp.
/// The header row is always present, even for an empty comparison.
pub fn write_report(
    rows: &[ComparisonRow],
    dir_label: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {output_dir:?}"))?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("{REPORT_PREFIX}_{dir_label}_{timestamp}.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Creating report file {path:?}"))?;
    writer
        .write_record(REPORT_COLUMNS)
        .context("Writing report header")?;
    for record in assemble(rows) {
        writer.write_record(&record).context("Writing report row")?;
    }
    writer.flush().context("Flushing report")?;
    Ok(path)
}
