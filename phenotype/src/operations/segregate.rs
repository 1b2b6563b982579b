//! Split top-level phenotype tables into per-subject or per-session files.
//!
//! ```text
//! <input>/phenotype/x.tsv  ──▶  <output>/<participant_id>/phenotype/x.tsv
//!                          ──▶  <output>/<participant_id>/<session_id>/phenotype/x.tsv
//! ```
//!
//! Existing destination files are never overwritten.

use std::path::{Path, PathBuf};

use super::{discover, ensure_dir, file_name};
use crate::error::{OperationResult, TableError};
use crate::layout::{self, is_valid_segment};
use crate::logs::Diagnostics;
use crate::models::{Level, Partition, SegregateReport, SkipReason, Skipped};
use crate::table::{read_tsv, write_tsv, Table, PARTICIPANT_COLUMN, SESSION_COLUMN};

/// Segregate every `<input>/phenotype/*.tsv` table down to `level`.
pub fn segregate(
    input: &Path,
    output: &Path,
    level: Level,
    diag: &mut Diagnostics,
) -> OperationResult<SegregateReport> {
    let tables = discover(&layout::top_pattern(input))?;
    let mut report = SegregateReport::new(level);

    if tables.is_empty() {
        diag.info(format!("No phenotype tables in {}", layout::top_dir(input).display()));
    }

    for source in tables {
        segregate_table(&source, output, level, diag, &mut report)?;
    }

    Ok(report)
}

fn segregate_table(
    source: &Path,
    output: &Path,
    level: Level,
    diag: &mut Diagnostics,
    report: &mut SegregateReport,
) -> OperationResult<()> {
    let name = file_name(source);
    let table = read_tsv(source)?;
    let participant_col = table
        .column_index(PARTICIPANT_COLUMN)
        .ok_or_else(|| TableError::missing_column(source, PARTICIPANT_COLUMN))?;

    let session_col = match level {
        Level::Subject => None,
        Level::Session => match table.column_index(SESSION_COLUMN) {
            Some(col) => Some(col),
            None => {
                diag.warning(format!("{} not in {} columns. Skipping.", SESSION_COLUMN, source.display()));
                report.skipped.push(Skipped {
                    path: source.to_path_buf(),
                    reason: SkipReason::MissingSessionColumn,
                });
                return Ok(());
            }
        },
    };

    diag.info(format!("{}: {} rows", name, table.len()));

    for (participant, rows) in table.group_by(participant_col) {
        if !accept_key(&participant, source, diag, report) {
            continue;
        }

        match session_col {
            None => {
                let dir = layout::subject_dir(output, &participant);
                let part = Part { source, participant: &participant, session: None };
                write_partition(&rows, &dir, &name, part, diag, report)?;
            }
            Some(col) => {
                for (session, session_rows) in rows.group_by(col) {
                    if !accept_key(&session, source, diag, report) {
                        continue;
                    }
                    let dir = layout::session_dir(output, &participant, &session);
                    let part = Part { source, participant: &participant, session: Some(session.as_str()) };
                    write_partition(&session_rows, &dir, &name, part, diag, report)?;
                }
            }
        }
    }

    Ok(())
}

/// Identity of one partition being written.
struct Part<'a> {
    source: &'a Path,
    participant: &'a str,
    session: Option<&'a str>,
}

fn write_partition(
    rows: &Table,
    dir: &Path,
    name: &str,
    part: Part<'_>,
    diag: &mut Diagnostics,
    report: &mut SegregateReport,
) -> OperationResult<()> {
    ensure_dir(dir)?;
    let target = dir.join(name);

    if target.exists() {
        diag.warning(format!("{} already exists", target.display()));
        report.skipped.push(Skipped { path: target, reason: SkipReason::AlreadyExists });
        return Ok(());
    }

    write_tsv(rows, &target)?;
    diag.info_indent(format!("{} ({} rows)", target.display(), rows.len()), 1);

    report.written.push(Partition {
        source: part.source.to_path_buf(),
        target,
        participant: part.participant.to_string(),
        session: part.session.map(str::to_string),
        rows: rows.len(),
    });
    Ok(())
}

/// Key values become directory names; refuse ones that would escape or
/// collapse the tree.
fn accept_key(
    value: &str,
    source: &Path,
    diag: &mut Diagnostics,
    report: &mut SegregateReport,
) -> bool {
    if is_valid_segment(value) {
        return true;
    }
    let reason = SkipReason::InvalidKey { value: value.to_string() };
    diag.warning(format!("{}: {}. Skipping those rows.", source.display(), reason));
    report.skipped.push(Skipped { path: PathBuf::from(source), reason });
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;
    use std::fs;
    use tempfile::TempDir;

    const SCORES: &str = "participant_id\tsession_id\tscore\n\
                          sub-01\tses-1\t5\n\
                          sub-01\tses-2\t7\n\
                          sub-02\tses-1\t3\n";

    fn bids_root(tables: &[(&str, &str)]) -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = layout::top_dir(root.path());
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in tables {
            fs::write(dir.join(name), content).unwrap();
        }
        root
    }

    #[test]
    fn test_subject_level_one_file_per_participant() {
        let root = bids_root(&[("x.tsv", SCORES)]);
        let mut diag = Diagnostics::silent();
        let report = segregate(root.path(), root.path(), Level::Subject, &mut diag).unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(report.skipped.is_empty());

        let sub01 = fs::read_to_string(root.path().join("sub-01/phenotype/x.tsv")).unwrap();
        assert_eq!(
            sub01,
            "participant_id\tsession_id\tscore\nsub-01\tses-1\t5\nsub-01\tses-2\t7\n"
        );
        let sub02 = read_tsv(&root.path().join("sub-02/phenotype/x.tsv")).unwrap();
        assert_eq!(sub02.len(), 1);
        assert_eq!(sub02.rows()[0][2], "3");
    }

    #[test]
    fn test_session_level_scenario() {
        let root = bids_root(&[("x.tsv", SCORES)]);
        let out = TempDir::new().unwrap();
        let report =
            segregate(root.path(), out.path(), Level::Session, &mut Diagnostics::silent()).unwrap();
        assert_eq!(report.written.len(), 3);

        for (path, score) in [
            ("sub-01/ses-1/phenotype/x.tsv", "5"),
            ("sub-01/ses-2/phenotype/x.tsv", "7"),
            ("sub-02/ses-1/phenotype/x.tsv", "3"),
        ] {
            let table = read_tsv(&out.path().join(path)).unwrap();
            assert_eq!(table.len(), 1, "{}", path);
            assert_eq!(table.rows()[0][2], score, "{}", path);
        }
    }

    #[test]
    fn test_session_level_without_session_column_skips_table() {
        let root = bids_root(&[
            ("nosession.tsv", "participant_id\tscore\nsub-01\t5\n"),
            ("x.tsv", SCORES),
        ]);
        let out = TempDir::new().unwrap();
        let mut diag = Diagnostics::silent();
        let report = segregate(root.path(), out.path(), Level::Session, &mut diag).unwrap();

        assert_eq!(diag.warning_count(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::MissingSessionColumn);
        assert!(report.written.iter().all(|p| file_name(&p.target) == "x.tsv"));
        assert!(!out.path().join("sub-01/phenotype/nosession.tsv").exists());
        assert_eq!(report.written.len(), 3);
    }

    #[test]
    fn test_never_overwrites() {
        let root = bids_root(&[("x.tsv", SCORES)]);
        segregate(root.path(), root.path(), Level::Subject, &mut Diagnostics::silent()).unwrap();

        let target = root.path().join("sub-01/phenotype/x.tsv");
        fs::write(&target, "participant_id\tscore\nsub-01\tedited\n").unwrap();

        let mut diag = Diagnostics::silent();
        let report = segregate(root.path(), root.path(), Level::Subject, &mut diag).unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::AlreadyExists));
        assert_eq!(diag.warning_count(), 2);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "participant_id\tscore\nsub-01\tedited\n"
        );
    }

    #[test]
    fn test_missing_participant_column_is_fatal() {
        let root = bids_root(&[("x.tsv", "subject\tscore\nsub-01\t5\n")]);
        let err = segregate(root.path(), root.path(), Level::Subject, &mut Diagnostics::silent())
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::Table(TableError::MissingColumn { ref column, .. }) if column == PARTICIPANT_COLUMN
        ));
    }

    #[test]
    fn test_unusable_key_values_skipped() {
        let root = bids_root(&[(
            "x.tsv",
            "participant_id\tscore\n../escape\t1\n\t2\nsub-01\t3\n",
        )]);
        let out = TempDir::new().unwrap();
        let mut diag = Diagnostics::silent();
        let report = segregate(root.path(), out.path(), Level::Subject, &mut diag).unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.written[0].participant, "sub-01");
        assert_eq!(report.skipped.len(), 2);
        assert!(!out.path().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn test_hidden_tables_ignored() {
        let root = bids_root(&[("x.tsv", SCORES)]);
        let sidecar = layout::top_dir(root.path()).join("._x.tsv");
        fs::write(&sidecar, [0u8, 5, 22, 7, 0xff, 0xfe, b'\t', b'\n']).unwrap();

        let report =
            segregate(root.path(), root.path(), Level::Subject, &mut Diagnostics::silent()).unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(!root.path().join("sub-01/phenotype/._x.tsv").exists());
    }

    #[test]
    fn test_ignores_non_tsv_and_nested_files() {
        let root = bids_root(&[("x.tsv", SCORES), ("readme.json", "{}")]);
        let report =
            segregate(root.path(), root.path(), Level::Subject, &mut Diagnostics::silent()).unwrap();
        assert!(report.written.iter().all(|p| file_name(&p.target) == "x.tsv"));
    }
}
