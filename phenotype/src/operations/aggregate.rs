//! Merge per-subject or per-session phenotype files back to the top level.
//!
//! Files are matched by file name across `sub-*` (and `ses-*`) directories.
//! A name found once is copied as-is; a name found several times is
//! concatenated. Targets are always overwritten.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{discover, ensure_dir, file_name};
use crate::error::{OperationError, OperationResult};
use crate::layout;
use crate::logs::Diagnostics;
use crate::models::{AggregateReport, Level, Merge, MergeKind};
use crate::table::{read_tsv, write_tsv, Table};

/// Aggregate every `level` phenotype file under `input` into
/// `<output>/phenotype/`.
pub fn aggregate(
    input: &Path,
    output: &Path,
    level: Level,
    diag: &mut Diagnostics,
) -> OperationResult<AggregateReport> {
    let files = discover(&layout::level_pattern(input, level))?;
    let groups = group_by_target(files, output);
    let mut report = AggregateReport::new(level);

    if groups.is_empty() {
        diag.info(format!("No {}-level phenotype files under {}", level, input.display()));
        return Ok(report);
    }

    ensure_dir(&layout::top_dir(output))?;

    for (target, sources) in groups {
        let kind = if sources.len() == 1 {
            fs::copy(&sources[0], &target).map_err(|e| OperationError::io(&target, e))?;
            diag.success(format!("{} (copied from {})", target.display(), sources[0].display()));
            MergeKind::Copied
        } else {
            let rows = merge_into(&sources, &target, diag)?;
            diag.success(format!(
                "{} ({} rows from {} files)",
                target.display(),
                rows,
                sources.len()
            ));
            MergeKind::Concatenated
        };

        report.merged.push(Merge { target, sources, kind });
    }

    Ok(report)
}

/// Map each discovered file to `<output>/phenotype/<file name>`, keeping
/// targets in first-seen order and sources in discovery order.
fn group_by_target(files: Vec<PathBuf>, output: &Path) -> Vec<(PathBuf, Vec<PathBuf>)> {
    let top = layout::top_dir(output);
    let mut slots: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();

    for file in files {
        let target = top.join(file_name(&file));
        match slots.get(&target) {
            Some(&slot) => groups[slot].1.push(file),
            None => {
                slots.insert(target.clone(), groups.len());
                groups.push((target, vec![file]));
            }
        }
    }

    groups
}

/// Concatenate `sources` and write the result to `target`, returning the
/// merged row count.
fn merge_into(sources: &[PathBuf], target: &Path, diag: &mut Diagnostics) -> OperationResult<usize> {
    let tables = sources
        .iter()
        .map(|source| read_tsv(source))
        .collect::<Result<Vec<Table>, _>>()?;

    let (merged, mismatched) = Table::concat(&tables);
    for pos in mismatched {
        diag.warning(format!(
            "{} columns differ from the merged header of {}; missing cells left blank",
            sources[pos].display(),
            file_name(target)
        ));
    }

    write_tsv(&merged, target)?;
    Ok(merged.len())
}
