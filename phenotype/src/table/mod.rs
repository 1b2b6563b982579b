//! In-memory phenotype tables.
//!
//! A [`Table`] is an ordered header plus rows of text cells. Values are kept
//! exactly as read; nothing is type-inferred, so a table written back out
//! carries the same cell text it was read with.

pub mod reader;
pub mod writer;

use std::collections::HashMap;

pub use reader::{read_csv, read_source, read_spreadsheet, read_tsv, SourceFormat};
pub use writer::write_tsv;

/// Column partitioning rows into subjects.
pub const PARTICIPANT_COLUMN: &str = "participant_id";

/// Column partitioning a subject's rows into sessions.
pub const SESSION_COLUMN: &str = "session_id";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from an already-clean header. Rows shorter than the
    /// header are padded with blanks.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from raw header cells, naming blank columns and
    /// disambiguating duplicates.
    pub fn from_raw(raw_headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::new(normalize_headers(raw_headers), rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Split rows by the value in `column`.
    ///
    /// Groups come back in order of first appearance; rows keep their
    /// relative order inside a group and every group shares this header.
    pub fn group_by(&self, column: usize) -> Vec<(String, Table)> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(String, Table)> = Vec::new();

        for row in &self.rows {
            let key = row[column].as_str();
            let slot = *slots.entry(key).or_insert_with(|| {
                groups.push((key.to_string(), Table::new(self.headers.clone(), Vec::new())));
                groups.len() - 1
            });
            groups[slot].1.rows.push(row.clone());
        }

        groups
    }

    /// Stack `tables` on top of each other.
    ///
    /// The merged header is the union of all columns in first-seen order.
    /// Cells for columns a table lacks are left blank. The second value lists
    /// the positions of tables whose header differs from the merged one.
    pub fn concat(tables: &[Table]) -> (Table, Vec<usize>) {
        let mut headers: Vec<String> = Vec::new();
        for table in tables {
            for header in &table.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(Table::len).sum());
        let mut mismatched = Vec::new();

        for (pos, table) in tables.iter().enumerate() {
            if table.headers != headers {
                mismatched.push(pos);
            }
            let mapping: Vec<Option<usize>> =
                headers.iter().map(|h| table.column_index(h)).collect();
            for row in &table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }

        (Table { headers, rows }, mismatched)
    }
}

/// Blank header cells become `Unnamed: <index>`; repeated names get a
/// `.1`, `.2`, ... suffix.
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header
        };

        let mut name = base.clone();
        if let Some(&used) = seen.get(&base) {
            let mut count = used;
            loop {
                count += 1;
                name = format!("{}.{}", base, count);
                if !seen.contains_key(&name) {
                    break;
                }
            }
            seen.insert(base, count);
        }
        seen.insert(name.clone(), 0);
        headers.push(name);
    }

    headers
}
