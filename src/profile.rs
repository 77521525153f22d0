//! Column type profiling and sample extraction.
//!
//! For each file this writes two artifacts next to the source: a
//! `<stem>_info.csv` mapping each column to an inferred storage type, and
//! a `<stem>_sample.csv` with a seeded random sample of rows. Profiling is
//! independent of header comparison: the differ can run with it disabled
//! and its output never feeds back into the comparison.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use serde::Serialize;

use crate::reader;

pub const INFO_SUFFIX: &str = "_info.csv";
pub const SAMPLE_SUFFIX: &str = "_sample.csv";

/// Fixed seed keeps sample extracts reproducible across runs.
const SAMPLE_SEED: u64 = 42;

#[derive(Debug, Clone, Copy)]
pub struct ProfileOptions {
    /// Data rows inspected for type inference (and eligible for sampling).
    pub sample_rows: usize,
    /// Upper bound on rows written to the sample extract.
    pub sample_size: usize,
    /// Non-empty values inspected when reclassifying a string column as
    /// date or time-of-day.
    pub reclassify_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            sample_rows: 1000,
            sample_size: 100,
            reclassify_values: 100,
        }
    }
}

/// Storage type vocabulary, serialized with the report's Portuguese
/// labels. `Categorical` exists in the vocabulary but is never inferred
/// from a fresh read; `Undetermined` marks columns with no non-empty
/// sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    #[serde(rename = "String")]
    String,
    #[serde(rename = "Inteiro")]
    Integer,
    #[serde(rename = "Float")]
    Float,
    #[serde(rename = "Booleano")]
    Boolean,
    #[serde(rename = "Data/hora")]
    DateTime,
    #[serde(rename = "Categorico")]
    Categorical,
    #[serde(rename = "Data")]
    Date,
    #[serde(rename = "Hora")]
    Time,
    #[serde(rename = "Indefinido")]
    Undetermined,
}

#[derive(Debug, Serialize)]
struct InfoRow<'a> {
    #[serde(rename = "Coluna")]
    column: &'a str,
    #[serde(rename = "Tipo")]
    data_type: ColumnType,
}

#[derive(Debug)]
pub struct ProfileReport {
    pub info_path: PathBuf,
    pub sample_path: PathBuf,
    pub column_types: Vec<(String, ColumnType)>,
}

/// Profiles one CSV/Excel file and writes its info and sample artifacts.
pub fn profile_file(path: &Path, options: &ProfileOptions) -> Result<ProfileReport> {
    let (header, rows) = reader::read_rows(path, options.sample_rows)
        .with_context(|| format!("Reading rows from {path:?}"))?;

    let column_types = infer_column_types(&header, &rows, options.reclassify_values);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("arquivo"));
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let info_path = parent.join(format!("{stem}{INFO_SUFFIX}"));
    write_info(&info_path, &header, &column_types)?;

    let sample_path = parent.join(format!("{stem}{SAMPLE_SUFFIX}"));
    write_sample(&sample_path, &header, &rows, options.sample_size)?;

    Ok(ProfileReport {
        info_path,
        sample_path,
        column_types: header.into_iter().zip(column_types).collect(),
    })
}

/// Elimination pass over the sampled rows: every column starts as a
/// candidate for each narrow type and loses candidacy on the first value
/// that fails to parse. Columns left as `String` get a second look as
/// date or time-of-day.
fn infer_column_types(header: &[String], rows: &[Vec<String>], reclassify_values: usize) -> Vec<ColumnType> {
    let mut candidates = vec![TypeCandidate::new(); header.len()];
    for row in rows {
        for (idx, candidate) in candidates.iter_mut().enumerate() {
            let value = row.get(idx).map(|v| v.trim()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            candidate.observe(value);
        }
    }

    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let decided = candidate.decide();
            if decided == ColumnType::String {
                reclassify_string_column(rows, idx, reclassify_values)
            } else {
                decided
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    seen_value: bool,
    possible_integer: bool,
    possible_float: bool,
    possible_boolean: bool,
    possible_datetime: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            seen_value: false,
            possible_integer: true,
            possible_float: true,
            possible_boolean: true,
            possible_datetime: true,
        }
    }

    fn observe(&mut self, value: &str) {
        self.seen_value = true;
        if self.possible_boolean
            && !matches!(value.to_ascii_lowercase().as_str(), "true" | "false")
        {
            self.possible_boolean = false;
        }
        if self.possible_integer && value.parse::<i64>().is_err() {
            self.possible_integer = false;
        }
        if self.possible_float && value.parse::<f64>().is_err() {
            self.possible_float = false;
        }
        if self.possible_datetime && parse_datetime(value).is_none() {
            self.possible_datetime = false;
        }
    }

    fn decide(&self) -> ColumnType {
        if !self.seen_value {
            ColumnType::Undetermined
        } else if self.possible_boolean {
            ColumnType::Boolean
        } else if self.possible_integer {
            ColumnType::Integer
        } else if self.possible_float {
            ColumnType::Float
        } else if self.possible_datetime {
            ColumnType::DateTime
        } else {
            ColumnType::String
        }
    }
}

/// A string column whose leading non-empty values all look like
/// `dd/mm/yyyy` dates becomes `Date`; all clock times, `Time`.
fn reclassify_string_column(rows: &[Vec<String>], idx: usize, limit: usize) -> ColumnType {
    let date_shape = Regex::new(r"^[0-9/\-]+$").expect("static regex");
    let time_shape = Regex::new(r"^[0-9:]+$").expect("static regex");

    let values: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.get(idx))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .take(limit)
        .collect();
    if values.is_empty() {
        return ColumnType::String;
    }

    let all_dates = values.iter().all(|v| {
        date_shape.is_match(v) && NaiveDate::parse_from_str(v, "%d/%m/%Y").is_ok()
    });
    if all_dates {
        return ColumnType::Date;
    }

    let all_times = values
        .iter()
        .all(|v| time_shape.is_match(v) && parse_time(v).is_some());
    if all_times {
        return ColumnType::Time;
    }

    ColumnType::String
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

fn write_info(path: &Path, header: &[String], types: &[ColumnType]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Creating info file {path:?}"))?;
    for (column, data_type) in header.iter().zip(types) {
        writer
            .serialize(InfoRow {
                column,
                data_type: *data_type,
            })
            .context("Writing info row")?;
    }
    writer.flush().context("Flushing info file")?;
    Ok(())
}

/// Writes a seeded random sample of `min(sample_size, rows/2)` rows.
fn write_sample(
    path: &Path,
    header: &[String],
    rows: &[Vec<String>],
    sample_size: usize,
) -> Result<()> {
    let amount = sample_size.min(rows.len() / 2);
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let indices = rand::seq::index::sample(&mut rng, rows.len(), amount);

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Creating sample file {path:?}"))?;
    writer.write_record(header).context("Writing sample header")?;
    for idx in indices.iter() {
        writer
            .write_record(&rows[idx])
            .context("Writing sample row")?;
    }
    writer.flush().context("Flushing sample file")?;
    Ok(())
}
