//! Spreadsheet/CSV to BIDS TSV conversion.
//!
//! Every recognized file directly inside the input directory becomes
//! `<output>/<sanitized stem>.tsv`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ensure_dir, file_name, is_hidden};
use crate::config::ensure_writable;
use crate::error::{OperationError, OperationResult};
use crate::layout::TABLE_EXTENSION;
use crate::logs::Diagnostics;
use crate::models::{Conversion, ConvertReport, SkipReason, Skipped};
use crate::table::{read_source, write_tsv, SourceFormat};

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\W_]+").expect("sanitizing pattern is valid"));

/// Strip everything but letters and digits, for BIDS-safe names.
pub fn bidsify(name: &str) -> String {
    NON_ALPHANUMERIC.replace_all(name, "").into_owned()
}

/// Output file name for a source file, or `None` if nothing survives
/// sanitizing.
pub fn target_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_string_lossy();
    let name = bidsify(&stem);
    if name.is_empty() {
        None
    } else {
        Some(format!("{}.{}", name, TABLE_EXTENSION))
    }
}

/// Convert all recognized tables in `input` into TSV files in `output`.
pub fn convert(
    input: &Path,
    output: &Path,
    diag: &mut Diagnostics,
) -> OperationResult<ConvertReport> {
    let sources = convertible_files(input)?;
    let mut report = ConvertReport::default();

    if sources.is_empty() {
        diag.info(format!("No convertible files in {}", input.display()));
        return Ok(report);
    }

    ensure_dir(output)?;
    let mut produced: HashSet<PathBuf> = HashSet::new();

    for (source, format) in sources {
        let Some(name) = target_name(&source) else {
            diag.warning(format!("{}: {}. Skipping.", source.display(), SkipReason::EmptyName));
            report.skipped.push(Skipped { path: source, reason: SkipReason::EmptyName });
            continue;
        };

        let target = output.join(name);
        if target.exists() {
            ensure_writable(&target)?;
        }
        if !produced.insert(target.clone()) {
            diag.warning(format!(
                "{} overwrites {} written earlier in this run",
                file_name(&source),
                target.display()
            ));
        }

        let table = read_source(&source, format)?;
        write_tsv(&table, &target)?;
        diag.success(format!("{} → {} ({} rows)", file_name(&source), target.display(), table.len()));

        report.converted.push(Conversion { source, target, rows: table.len() });
    }

    Ok(report)
}

/// Recognized, non-hidden files directly inside `dir`, sorted by path.
fn convertible_files(dir: &Path) -> OperationResult<Vec<(PathBuf, SourceFormat)>> {
    let entries = fs::read_dir(dir).map_err(|e| OperationError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| OperationError::io(dir, e))?.path();
        if !path.is_file() || is_hidden(&path) {
            continue;
        }
        if let Some(format) = SourceFormat::from_path(&path) {
            files.push((path, format));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
