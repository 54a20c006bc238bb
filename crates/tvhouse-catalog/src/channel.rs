//! Channel record and icon classification.

use serde::{Deserialize, Serialize};
use url::Url;

/// Scheme prefix for icons bundled with the application.
const RESOURCE_PREFIX: &str = "res://";

/// A live TV channel as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Display name.
    pub name: String,
    /// Bundled resource identifier or remote image URL.
    pub icon: String,
    /// Stream address handed to the player. Not validated here.
    pub url: String,
}

/// Where a channel icon comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Image bundled with the application, by resource name.
    Resource(String),
    /// Image served over HTTP(S).
    Remote(Url),
}

impl Channel {
    /// Creates a channel record.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            url: url.into(),
        }
    }

    /// Classifies the icon field.
    ///
    /// `res://name` and bare identifiers are bundled resources; `http`
    /// and `https` URLs are remote. Anything else is treated as a
    /// resource name.
    #[must_use]
    pub fn icon_source(&self) -> IconSource {
        if let Some(name) = self.icon.strip_prefix(RESOURCE_PREFIX) {
            return IconSource::Resource(String::from(name));
        }
        match Url::parse(&self.icon) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => IconSource::Remote(url),
            _ => IconSource::Resource(self.icon.clone()),
        }
    }
}

/// Finds the first channel whose name matches `name`, ignoring case.
#[must_use]
pub fn find_channel<'a>(channels: &'a [Channel], name: &str) -> Option<&'a Channel> {
    let needle = name.to_lowercase();
    channels.iter().find(|ch| ch.name.to_lowercase() == needle)
}
