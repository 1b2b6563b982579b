//! Tab-separated output. The header is always written; row indices never are.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::Table;
use crate::error::{TableError, TableResult};

/// Write `table` to `path` as TSV, replacing any existing file.
pub fn write_tsv(table: &Table, path: &Path) -> TableResult<()> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    write_delimited(table, file, b'\t', path)
}

/// Serialize `table` into any writer.
pub fn write_delimited<W: Write>(
    table: &Table,
    writer: W,
    delimiter: u8,
    path: &Path,
) -> TableResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    writer
        .write_record(table.headers())
        .map_err(|e| TableError::delimited(path, e))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| TableError::delimited(path, e))?;
    }
    writer.flush().map_err(|e| TableError::io(path, e))?;
    Ok(())
}
