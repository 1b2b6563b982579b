//! Readers for tab-separated, comma-separated and spreadsheet tables.
//!
//! Comma-separated inputs are read as UTF-8 when they are valid UTF-8 and
//! decoded with encoding auto-detection otherwise. Spreadsheets are read from their first worksheet, whose first
//! row is the header.

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{NaiveDateTime, Timelike};
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use super::Table;
use crate::error::{TableError, TableResult};

/// Container formats the converter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Extensions accepted by the converter, lowercase, without the dot.
    pub const EXTENSIONS: [&'static str; 8] =
        ["csv", "xls", "xlsx", "xlsm", "xlsb", "odf", "ods", "odt"];

    /// Classify a path by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if !Self::EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        if ext == "csv" {
            Some(SourceFormat::Csv)
        } else {
            Some(SourceFormat::Spreadsheet)
        }
    }
}

/// Read a convertible source file according to its extension.
pub fn read_source(path: &Path, format: SourceFormat) -> TableResult<Table> {
    match format {
        SourceFormat::Csv => read_csv(path),
        SourceFormat::Spreadsheet => read_spreadsheet(path),
    }
}

/// Read a tab-separated table.
pub fn read_tsv(path: &Path) -> TableResult<Table> {
    let file = std::fs::File::open(path).map_err(|e| TableError::io(path, e))?;
    read_delimited(file, b'\t', path)
}

/// Read a comma-separated table, detecting its text encoding.
pub fn read_csv(path: &Path) -> TableResult<Table> {
    let bytes = std::fs::read(path).map_err(|e| TableError::io(path, e))?;
    let content = decode_bytes(&bytes);
    let content = content.trim_start_matches('\u{feff}');
    read_delimited(content.as_bytes(), b',', path)
}

/// Parse delimited text whose first record is the header.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8, path: &Path) -> TableResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::delimited(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::EmptyFile(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TableError::delimited(path, e))?;
        if record.len() > headers.len() {
            return Err(TableError::RaggedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line() as usize),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_raw(headers, rows))
}

/// Read the first worksheet of a spreadsheet container.
pub fn read_spreadsheet(path: &Path) -> TableResult<Table> {
    let spreadsheet_error = |message: String| TableError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::EmptyFile(path.to_path_buf()))?
        .map_err(|e| spreadsheet_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| TableError::EmptyFile(path.to_path_buf()))?
        .iter()
        .map(cell_text)
        .collect();

    let body = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table::from_raw(headers, body))
}

/// Render a spreadsheet cell as the text written to TSV.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match cell.as_datetime() {
            Some(value) => format_datetime(value),
            None => format_float(dt.as_f64()),
        },
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.hour() == 0 && value.minute() == 0 && value.second() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Text of a file: valid UTF-8 as-is, anything else through detection.
pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(decode_content(bytes, &detect_encoding(bytes))),
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the detected encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding {
        "utf-8" => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        },
        "iso-8859-1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(encoding) => encoding.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    }
}
