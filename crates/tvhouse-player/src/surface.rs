//! Display surface description handed to the player.

use serde::{Deserialize, Serialize};

/// How video is scaled into the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Stretch to fill the surface, ignoring aspect ratio.
    #[default]
    Fill,
    /// Letterbox inside the surface, keeping aspect ratio.
    Fit,
    /// Crop to fill the surface, keeping aspect ratio.
    Zoom,
}

/// Where and how the player renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSurface {
    /// Scaling mode.
    pub scale: ScaleMode,
    /// Show the player's own transport controls.
    pub show_controls: bool,
    /// Take over the whole screen.
    pub fullscreen: bool,
}

impl Default for VideoSurface {
    fn default() -> Self {
        Self {
            scale: ScaleMode::Fill,
            show_controls: false,
            fullscreen: true,
        }
    }
}
