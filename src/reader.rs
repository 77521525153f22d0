//! Header and row extraction from delimited text and spreadsheet files.
//!
//! Delimited files carry no reliable declaration of their own delimiter or
//! encoding, so both are probed: delimiters in a fixed priority order,
//! accepting the first that yields more than one column, and encodings in a
//! fixed priority order, where a decode failure means "try the next one".
//! Read failures never escape as hard errors; callers receive a
//! [`SkipReason`] and decide what to drop.

use std::{fs::File, io::BufReader, path::Path};

use calamine::{open_workbook_auto, Reader as WorkbookReader};
use encoding_rs::{Encoding, ISO_8859_2, UTF_8, WINDOWS_1252};
use thiserror::Error;

pub const DEFAULT_DELIMITER: u8 = b',';

/// Delimiters attempted for `.csv` inputs, most common first. The default
/// comma result is kept as a fallback even when it yields a single column.
const DELIMITER_PRIORITY: &[u8] = &[b',', b';', b'|', b'\t'];

/// Encodings attempted per delimiter. Windows-1252 decodes any byte
/// sequence, so it doubles as the Latin-1 fallback.
const ENCODING_PRIORITY: &[&Encoding] = &[UTF_8, WINDOWS_1252, ISO_8859_2];

/// Why a file was dropped from a run. Absorbed by the differ (the run never
/// aborts over one file) and surfaced only through warn-level logging.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unsupported file extension")]
    UnsupportedExtension,
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),
    #[error("no known text encoding could decode the file")]
    Encoding,
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("header row is empty")]
    EmptyHeader,
}

/// Detected delimiter and encoding of a delimited file, reusable by any
/// later full read of the same file.
#[derive(Debug, Clone, Copy)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

/// Reads the header row of a CSV or Excel file.
pub fn read_header(path: &Path) -> Result<Vec<String>, SkipReason> {
    let header = match FileKind::of(path)? {
        FileKind::Csv => probe_csv(path)?.1,
        FileKind::Excel => read_excel_header(path)?,
    };
    if header.is_empty() {
        return Err(SkipReason::EmptyHeader);
    }
    Ok(header)
}

/// Reads the header plus up to `limit` data rows, decoded to strings.
/// This is the profiling entry point; header comparison never needs it.
pub fn read_rows(path: &Path, limit: usize) -> Result<(Vec<String>, Vec<Vec<String>>), SkipReason> {
    match FileKind::of(path)? {
        FileKind::Csv => {
            let (format, header) = probe_csv(path)?;
            let mut reader = open_delimited(path, format.delimiter)?;
            reader.byte_headers()?;
            let mut rows = Vec::new();
            for record in reader.byte_records().take(limit) {
                let record = record?;
                let decoded =
                    decode_fields(record.iter(), format.encoding).ok_or(SkipReason::Encoding)?;
                rows.push(decoded);
            }
            Ok((header, rows))
        }
        FileKind::Excel => {
            let range = excel_first_sheet(path)?;
            let mut row_iter = range.rows();
            let header = row_iter
                .next()
                .ok_or(SkipReason::EmptyHeader)?
                .iter()
                .map(|cell| cell.to_string())
                .collect();
            let rows = row_iter
                .take(limit)
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            Ok((header, rows))
        }
    }
}

/// Detects delimiter and encoding for a delimited file and returns the
/// decoded header alongside. The first delimiter producing at least two
/// columns wins; when none does, the default-delimiter result stands
/// (a single-column header is still a header).
pub fn probe_csv(path: &Path) -> Result<(CsvFormat, Vec<String>), SkipReason> {
    let mut fallback: Option<(CsvFormat, Vec<String>)> = None;
    for &delimiter in DELIMITER_PRIORITY {
        if let Some((encoding, header)) = try_read_header(path, delimiter)? {
            let format = CsvFormat {
                delimiter,
                encoding,
            };
            if header.len() > 1 {
                return Ok((format, header));
            }
            if delimiter == DEFAULT_DELIMITER {
                fallback = Some((format, header));
            }
        }
    }
    fallback.ok_or(SkipReason::Encoding)
}

enum FileKind {
    Csv,
    Excel,
}

impl FileKind {
    fn of(path: &Path) -> Result<Self, SkipReason> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(FileKind::Csv),
            Some("xlsx") | Some("xls") => Ok(FileKind::Excel),
            _ => Err(SkipReason::UnsupportedExtension),
        }
    }
}

fn open_delimited(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>, SkipReason> {
    let file = File::open(path)?;
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(BufReader::new(file)))
}

/// One delimiter attempt across the encoding priority list. `Ok(None)`
/// means no encoding could decode the header; I/O and CSV-structure
/// failures abort the probe immediately.
fn try_read_header(
    path: &Path,
    delimiter: u8,
) -> Result<Option<(&'static Encoding, Vec<String>)>, SkipReason> {
    for &encoding in ENCODING_PRIORITY {
        let mut reader = open_delimited(path, delimiter)?;
        let record = reader.byte_headers()?.clone();
        if let Some(decoded) = decode_fields(record.iter(), encoding) {
            return Ok(Some((encoding, decoded)));
        }
    }
    Ok(None)
}

fn decode_fields<'a, I>(fields: I, encoding: &'static Encoding) -> Option<Vec<String>>
where
    I: Iterator<Item = &'a [u8]>,
{
    fields
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                None
            } else {
                Some(text.into_owned())
            }
        })
        .collect()
}

fn read_excel_header(path: &Path) -> Result<Vec<String>, SkipReason> {
    let range = excel_first_sheet(path)?;
    let first = range.rows().next().ok_or(SkipReason::EmptyHeader)?;
    Ok(first.iter().map(|cell| cell.to_string()).collect())
}

fn excel_first_sheet(path: &Path) -> Result<calamine::Range<calamine::Data>, SkipReason> {
    let mut workbook =
        open_workbook_auto(path).map_err(|err| SkipReason::Spreadsheet(err.to_string()))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SkipReason::Spreadsheet(String::from("workbook has no sheets")))?
        .map_err(|err| SkipReason::Spreadsheet(err.to_string()))
}
