//! Human-readable diagnostics for the phenotype operations.
//!
//! Every operation receives a [`Diagnostics`] sink. Entries are kept in
//! memory for the caller and echoed to stdout when they reach the
//! configured minimum level.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single diagnostic entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for display
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render the entry as a single stdout line.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// How much of the diagnostic stream reaches stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Echo entries at or above this level.
    AtLeast(LogLevel),
    /// Echo nothing; entries are still recorded.
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::AtLeast(LogLevel::Info)
    }
}

impl FromStr for Verbosity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "info" => Ok(Verbosity::AtLeast(LogLevel::Info)),
            "success" => Ok(Verbosity::AtLeast(LogLevel::Success)),
            "warning" | "warn" => Ok(Verbosity::AtLeast(LogLevel::Warning)),
            "error" => Ok(Verbosity::AtLeast(LogLevel::Error)),
            "quiet" | "off" | "none" => Ok(Verbosity::Quiet),
            other => Err(ConfigError::InvalidSetting {
                key: crate::config::LOG_ENV.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Collects diagnostics emitted while an operation runs.
#[derive(Debug, Default)]
pub struct Diagnostics {
    verbosity: Verbosity,
    entries: Vec<LogEntry>,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity, entries: Vec::new() }
    }

    /// A sink that records without printing, for library callers and tests.
    pub fn silent() -> Self {
        Self::new(Verbosity::Quiet)
    }

    /// Record an entry, echoing it to stdout if the verbosity allows.
    pub fn log(&mut self, entry: LogEntry) {
        if let Verbosity::AtLeast(min) = self.verbosity {
            if entry.level >= min {
                println!("{}", entry.render());
            }
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn info_indent(&mut self, msg: impl Into<String>, indent: u8) {
        self.log(LogEntry::info(msg).with_indent(indent));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries at exactly `level`.
    pub fn at(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    pub fn warning_count(&self) -> usize {
        self.at(LogLevel::Warning).count()
    }
}
