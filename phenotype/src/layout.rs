//! The directory convention shared by segregation and aggregation.
//!
//! ```text
//! <root>/phenotype/<name>.tsv                              top level
//! <root>/<participant_id>/phenotype/<name>.tsv             subject level
//! <root>/<participant_id>/<session_id>/phenotype/<name>.tsv session level
//! ```
//!
//! Segregation writes these paths and aggregation discovers them, so both
//! sides go through the functions here.

use glob::Pattern;
use std::path::{Component, Path, PathBuf};

use crate::models::Level;

/// Directory holding phenotype tables at every level.
pub const PHENOTYPE_DIR: &str = "phenotype";

/// Reserved prefix of subject directories.
pub const SUBJECT_PREFIX: &str = "sub-";

/// Reserved prefix of session directories.
pub const SESSION_PREFIX: &str = "ses-";

/// Extension of every table the tool reads from or writes into the tree.
pub const TABLE_EXTENSION: &str = "tsv";

/// `<root>/phenotype`
pub fn top_dir(root: &Path) -> PathBuf {
    root.join(PHENOTYPE_DIR)
}

/// `<root>/<participant>/phenotype`
pub fn subject_dir(root: &Path, participant: &str) -> PathBuf {
    root.join(participant).join(PHENOTYPE_DIR)
}

/// `<root>/<participant>/<session>/phenotype`
pub fn session_dir(root: &Path, participant: &str, session: &str) -> PathBuf {
    root.join(participant).join(session).join(PHENOTYPE_DIR)
}

/// Glob for the top-level tables segregation reads.
pub fn top_pattern(root: &Path) -> String {
    format!("{}/{}/*.{}", escaped(root), PHENOTYPE_DIR, TABLE_EXTENSION)
}

/// Glob for the per-level tables aggregation reads.
pub fn level_pattern(root: &Path, level: Level) -> String {
    match level {
        Level::Subject => format!(
            "{}/{}*/{}/*.{}",
            escaped(root),
            SUBJECT_PREFIX,
            PHENOTYPE_DIR,
            TABLE_EXTENSION
        ),
        Level::Session => format!(
            "{}/{}*/{}*/{}/*.{}",
            escaped(root),
            SUBJECT_PREFIX,
            SESSION_PREFIX,
            PHENOTYPE_DIR,
            TABLE_EXTENSION
        ),
    }
}

/// Whether a key value can name exactly one directory below the root.
pub fn is_valid_segment(value: &str) -> bool {
    if value.is_empty() || value.contains('/') || value.contains('\\') {
        return false;
    }
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn escaped(root: &Path) -> String {
    Pattern::escape(&root.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glob::MatchOptions;

    #[test]
    fn test_level_paths() {
        let root = Path::new("/bids");
        assert_eq!(top_dir(root), PathBuf::from("/bids/phenotype"));
        assert_eq!(subject_dir(root, "sub-01"), PathBuf::from("/bids/sub-01/phenotype"));
        assert_eq!(
            session_dir(root, "sub-01", "ses-2"),
            PathBuf::from("/bids/sub-01/ses-2/phenotype")
        );
    }

    fn matches(pattern: &Pattern, path: &Path) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        pattern.matches_path_with(path, options)
    }

    #[test]
    fn test_patterns_match_written_paths() {
        let root = Path::new("/bids");
        let subject = Pattern::new(&level_pattern(root, Level::Subject)).unwrap();
        let session = Pattern::new(&level_pattern(root, Level::Session)).unwrap();

        let sub_file = subject_dir(root, "sub-01").join("x.tsv");
        let ses_file = session_dir(root, "sub-01", "ses-1").join("x.tsv");

        assert!(matches(&subject, &sub_file));
        assert!(!matches(&subject, &ses_file));
        assert!(matches(&session, &ses_file));
        assert!(!matches(&session, &sub_file));
        assert!(!matches(&subject, &subject_dir(root, "01").join("x.tsv")));
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let root = Path::new("/data/[study]");
        let pattern = Pattern::new(&top_pattern(root)).unwrap();
        assert!(pattern.matches_path(&top_dir(root).join("scores.tsv")));
        assert!(!pattern.matches_path(Path::new("/data/s/phenotype/scores.tsv")));
    }

    #[test]
    fn test_segment_validation() {
        assert!(is_valid_segment("sub-01"));
        assert!(is_valid_segment("ses-baseline"));
        assert!(!is_valid_segment(""));
        assert!(!is_valid_segment("."));
        assert!(!is_valid_segment(".."));
        assert!(!is_valid_segment("sub-01/ses-1"));
        assert!(!is_valid_segment("/abs"));
    }
}
