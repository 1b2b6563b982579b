//! Domain models: tree level and per-operation reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Granularity at which phenotype tables are split or merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// `<root>/<participant_id>/phenotype/`
    Subject,
    /// `<root>/<participant_id>/<session_id>/phenotype/`
    Session,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Subject => write!(f, "subject"),
            Level::Session => write!(f, "session"),
        }
    }
}

/// Why a file or partition was not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    /// Session-level segregation of a table without `session_id`.
    MissingSessionColumn,
    /// Segregation never overwrites an existing per-subject/session file.
    AlreadyExists,
    /// A key value cannot be used as a directory name.
    InvalidKey { value: String },
    /// The input file name has no alphanumeric characters left.
    EmptyName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSessionColumn => write!(f, "no session_id column"),
            SkipReason::AlreadyExists => write!(f, "already exists"),
            SkipReason::InvalidKey { value } => write!(f, "unusable key value '{}'", value),
            SkipReason::EmptyName => write!(f, "name is empty after sanitizing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub path: PathBuf,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// One input converted to TSV.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub source: PathBuf,
    pub target: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertReport {
    pub converted: Vec<Conversion>,
    pub skipped: Vec<Skipped>,
}

/// One per-subject or per-session file written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub source: PathBuf,
    pub target: PathBuf,
    pub participant: String,
    pub session: Option<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegregateReport {
    pub level: Level,
    pub written: Vec<Partition>,
    pub skipped: Vec<Skipped>,
}

impl SegregateReport {
    pub fn new(level: Level) -> Self {
        Self { level, written: Vec::new(), skipped: Vec::new() }
    }
}

/// How an aggregate target was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKind {
    /// Single contributing file, copied byte-for-byte.
    Copied,
    /// Several files concatenated into one table.
    Concatenated,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Merge {
    pub target: PathBuf,
    pub sources: Vec<PathBuf>,
    pub kind: MergeKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub level: Level,
    pub merged: Vec<Merge>,
}

impl AggregateReport {
    pub fn new(level: Level) -> Self {
        Self { level, merged: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Subject.to_string(), "subject");
        assert_eq!(Level::Session.to_string(), "session");
    }

    #[test]
    fn test_skipped_json_shape() {
        let skipped = Skipped {
            path: PathBuf::from("/out/sub-01/phenotype/x.tsv"),
            reason: SkipReason::InvalidKey { value: "../x".into() },
        };
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(
            value,
            json!({
                "path": "/out/sub-01/phenotype/x.tsv",
                "reason": "invalidKey",
                "value": "../x"
            })
        );
    }
}
