//! The three tree operations.
//!
//! Each one is a single sequential pass: list inputs, process them one by
//! one, write outputs. Per-file skip conditions are logged to the
//! [`Diagnostics`](crate::logs::Diagnostics) sink and recorded in the
//! returned report; read and parse failures abort the run.

pub mod aggregate;
pub mod convert;
pub mod segregate;

pub use aggregate::aggregate;
pub use convert::{bidsify, convert, target_name};
pub use segregate::segregate;

use glob::{glob_with, MatchOptions};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OperationError, OperationResult};

/// Expand a discovery pattern into the matching files, in sorted order.
/// Wildcards never match names starting with a dot.
pub(crate) fn discover(pattern: &str) -> OperationResult<Vec<PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob_with(pattern, options).map_err(|source| OperationError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Create `dir` and its parents; an existing directory is fine.
pub(crate) fn ensure_dir(dir: &Path) -> OperationResult<()> {
    fs::create_dir_all(dir).map_err(|e| OperationError::io(dir, e))
}

/// Dotfiles (editor backups, `._` resource forks) are never tables.
pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// File name component as a string, for messages and grouping.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
