//! # Phenotype - BIDS phenotype table utilities
//!
//! Converts spreadsheets into BIDS TSV files and moves phenotype tables
//! between the top of a BIDS tree and its subject/session directories.
//!
//! ## Architecture
//!
//! ```text
//!  *.csv / *.xlsx ──convert──▶ phenotype/x.tsv
//!                                 │      ▲
//!                          segregate    aggregate
//!                                 ▼      │
//!                 sub-01/[ses-1/]phenotype/x.tsv
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phenotype::{segregate, Diagnostics, Level};
//! use std::path::Path;
//!
//! let mut diag = Diagnostics::default();
//! let report = segregate(Path::new("/data/bids"), Path::new("/data/bids"), Level::Session, &mut diag)?;
//! println!("Wrote {} files", report.written.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Levels and operation reports
//! - [`layout`] - Directory convention shared by segregate and aggregate
//! - [`table`] - Table model, readers and TSV writer
//! - [`operations`] - convert, segregate, aggregate
//! - [`logs`] - Diagnostics sink
//! - [`config`] - Path validation and environment settings

// Core modules
pub mod error;
pub mod models;

// Tree convention
pub mod layout;

// Tables
pub mod table;

// Operations
pub mod operations;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, OperationError, OperationResult, TableError, TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AggregateReport, Conversion, ConvertReport, Level, Merge, MergeKind, Partition,
    SegregateReport, SkipReason, Skipped,
};

// =============================================================================
// Re-exports - Tables
// =============================================================================

pub use table::{
    read_csv, read_source, read_spreadsheet, read_tsv, write_tsv, SourceFormat, Table,
    PARTICIPANT_COLUMN, SESSION_COLUMN,
};

// =============================================================================
// Re-exports - Operations
// =============================================================================

pub use operations::{aggregate, bidsify, convert, segregate, target_name};

// =============================================================================
// Re-exports - Diagnostics & configuration
// =============================================================================

pub use config::Settings;
pub use logs::{Diagnostics, LogEntry, LogLevel, Verbosity};
