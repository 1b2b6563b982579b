//! Command-line path validation and environment settings.
//!
//! The validators are used as clap value parsers so that bad arguments are
//! rejected before any file is touched.

use faccess::PathExt;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::logs::Verbosity;

/// Environment variable selecting the minimum echoed diagnostic level.
pub const LOG_ENV: &str = "PHENOTYPE_LOG";

/// Settings read from the environment (and `.env`, loaded by the binary).
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub verbosity: Verbosity,
}

impl Settings {
    pub fn from_env() -> ConfigResult<Self> {
        let verbosity = match env::var(LOG_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => Verbosity::default(),
        };
        Ok(Self { verbosity })
    }
}

/// Resolve `path` against the current directory.
pub fn absolute(path: &Path) -> ConfigResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|source| ConfigError::Unresolvable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

/// Whether the current user may write to an existing path.
///
/// Both the access check and the mode bits must allow it, so a file marked
/// read-only is refused even for a privileged user.
pub fn is_writable(path: &Path) -> bool {
    let mode_allows = fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false);
    mode_allows && path.writable()
}

/// Fail unless an existing `path` is writable.
pub fn ensure_writable(path: &Path) -> ConfigResult<()> {
    if is_writable(path) {
        Ok(())
    } else {
        Err(ConfigError::NotWritable(path.to_path_buf()))
    }
}

/// Input directory: must exist, be a directory and be listable.
pub fn readable_dir(path: &Path) -> ConfigResult<PathBuf> {
    let path = absolute(path)?;
    if !path.exists() {
        return Err(ConfigError::NotFound(path));
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }
    if !path.readable() || fs::read_dir(&path).is_err() {
        return Err(ConfigError::NotReadable(path));
    }
    Ok(path)
}

/// Output directory: either exists and is writable, or does not exist yet
/// and has an existing, writable parent.
pub fn available_dir(path: &Path) -> ConfigResult<PathBuf> {
    let path = absolute(path)?;
    let parent_ok = path
        .parent()
        .is_some_and(|parent| parent.is_dir() && is_writable(parent));

    if path.exists() {
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory(path));
        }
        ensure_writable(&path)?;
        return Ok(path);
    }

    if !parent_ok {
        return Err(ConfigError::Unavailable(path));
    }
    Ok(path)
}

/// clap value parser for `--input-dir`.
pub fn parse_input_dir(arg: &str) -> Result<PathBuf, String> {
    readable_dir(Path::new(arg)).map_err(|e| e.to_string())
}

/// clap value parser for `--output-dir`.
pub fn parse_output_dir(arg: &str) -> Result<PathBuf, String> {
    available_dir(Path::new(arg)).map_err(|e| e.to_string())
}
