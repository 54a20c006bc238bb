//! Config and data directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tvhouse_catalog::CACHE_FILE_NAME;

/// Log file written while the TUI owns the terminal.
pub const LOG_FILE_NAME: &str = "tvhouse.log";

fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home))
}

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/tvhouse/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    Ok(home_dir()?
        .join(".config")
        .join("tvhouse")
        .join("config.toml"))
}

/// Resolves the directory holding the catalog cache and the log file.
///
/// - If `dir` is `Some`, returns it unchanged.
/// - Otherwise returns `~/.local/share/tvhouse`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_data_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    Ok(home_dir()?.join(".local").join("share").join("tvhouse"))
}

/// Catalog cache file inside `data_dir`.
#[must_use]
pub fn cache_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CACHE_FILE_NAME)
}

/// Log file inside `data_dir`.
#[must_use]
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}
