//! Application configuration module.
//!
//! Manages the TOML config file (catalog endpoint, fetch policy and
//! player command) and the per-user data directory.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{cache_path, log_path, resolve_config_path, resolve_data_dir};
