//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tvhouse_catalog::{DEFAULT_CATALOG_URL, DEFAULT_FETCH_TIMEOUT};
use tvhouse_player::{
    DEFAULT_PLAYER_COMMAND, PlayerProfile, ProcessBackend, ScaleMode, VideoSurface,
};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// External player settings.
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Remote catalog configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog endpoint.
    pub url: String,
    /// Upper bound on the fetch, in seconds.
    pub timeout_secs: u64,
    /// Keep the previous cache and reuse it when the fetch fails.
    pub keep_stale_cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_CATALOG_URL),
            timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            keep_stale_cache: false,
        }
    }
}

impl CatalogConfig {
    /// Parsed catalog endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid URL.
    pub fn endpoint(&self) -> Result<Url> {
        Url::parse(&self.url).with_context(|| format!("invalid catalog url: {}", self.url))
    }

    /// Fetch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External player configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Player binary.
    pub command: String,
    /// Extra arguments placed before the stream URL.
    pub args: Vec<String>,
    /// Flag profile.
    pub profile: PlayerProfile,
    /// Video scaling.
    pub scale: ScaleMode,
    /// Fullscreen playback.
    pub fullscreen: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: String::from(DEFAULT_PLAYER_COMMAND),
            args: Vec::new(),
            profile: PlayerProfile::Mpv,
            scale: ScaleMode::Fill,
            fullscreen: true,
        }
    }
}

impl PlayerConfig {
    /// Surface the player renders into. Controls are always hidden.
    #[must_use]
    pub const fn surface(&self) -> VideoSurface {
        VideoSurface {
            scale: self.scale,
            show_controls: false,
            fullscreen: self.fullscreen,
        }
    }

    /// Backend launching the configured command.
    #[must_use]
    pub fn backend(&self) -> ProcessBackend {
        ProcessBackend::new(self.command.clone())
            .args(self.args.clone())
            .profile(self.profile)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
