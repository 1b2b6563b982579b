//! Error types for the phenotype tooling.
//!
//! - [`TableError`] - reading, parsing and writing tables
//! - [`ConfigError`] - command-line path validation
//! - [`OperationError`] - top-level errors returned by convert/segregate/aggregate
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while reading or writing a single table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to read or write the underlying file.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text.
    #[error("Invalid delimited text in {path}: {source}")]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The spreadsheet container could not be opened or decoded.
    #[error("Invalid spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// No header row could be found.
    #[error("{0} is empty or has no header row")]
    EmptyFile(PathBuf),

    /// A data row carries more fields than the header declares.
    #[error("{path}, line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A column required by the operation is absent.
    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from validating command-line path arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The current directory could not be determined to absolutize a path.
    #[error("Cannot resolve {path}: {source}")]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} does not exist")]
    NotFound(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{0} is not readable")]
    NotReadable(PathBuf),

    #[error("{0} is not writeable")]
    NotWritable(PathBuf),

    /// Output path does not exist and cannot be created under its parent.
    #[error("{0} is either not writeable or the parent directory does not exist")]
    Unavailable(PathBuf),

    /// Unknown value for an environment setting.
    #[error("Invalid value '{value}' for {key}")]
    InvalidSetting { key: String, value: String },
}

// =============================================================================
// Operation Errors (top-level)
// =============================================================================

/// Top-level error returned by the three operations.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Table error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem error outside of table parsing (listing, mkdir, copy).
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Discovery pattern could not be compiled.
    #[error("Invalid discovery pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A discovered entry could not be inspected.
    #[error("Cannot read directory entry: {0}")]
    Discovery(#[from] glob::GlobError),
}

impl OperationError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl TableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn delimited(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Delimited {
            path: path.into(),
            source,
        }
    }

    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for convert/segregate/aggregate.
pub type OperationResult<T> = Result<T, OperationError>;
