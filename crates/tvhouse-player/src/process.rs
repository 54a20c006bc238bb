//! Player backed by an external process such as `mpv`.

use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::backend::{MediaPlayer, PlayerBackend};
use super::error::PlayerError;
use super::surface::{ScaleMode, VideoSurface};

/// Player binary used when none is configured.
pub const DEFAULT_PLAYER_COMMAND: &str = "mpv";

/// How surface options are translated into command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerProfile {
    /// mpv flags.
    #[default]
    Mpv,
    /// No surface flags; only the configured arguments and the URL.
    Custom,
}

/// Builds [`ProcessPlayer`]s that launch `command`.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: String,
    extra_args: Vec<String>,
    profile: PlayerProfile,
}

impl ProcessBackend {
    /// Creates a backend for `command` with the mpv profile.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            extra_args: Vec::new(),
            profile: PlayerProfile::Mpv,
        }
    }

    /// Arguments passed before the surface flags and the URL.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Selects the flag profile.
    #[must_use]
    pub const fn profile(mut self, profile: PlayerProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Player command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for ProcessBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_COMMAND)
    }
}

impl PlayerBackend for ProcessBackend {
    type Player = ProcessPlayer;

    fn build(&self, surface: &VideoSurface) -> Result<ProcessPlayer, PlayerError> {
        Ok(ProcessPlayer {
            command: self.command.clone(),
            extra_args: self.extra_args.clone(),
            profile: self.profile,
            surface: *surface,
            source: None,
            args: None,
            child: None,
        })
    }
}

/// Surface flags for mpv.
fn mpv_surface_args(surface: &VideoSurface) -> Vec<String> {
    let mut args = Vec::new();
    match surface.scale {
        ScaleMode::Fill => args.push("--keepaspect=no".to_owned()),
        ScaleMode::Fit => {}
        ScaleMode::Zoom => args.push("--panscan=1.0".to_owned()),
    }
    if !surface.show_controls {
        args.push("--osc=no".to_owned());
        args.push("--input-default-bindings=no".to_owned());
    }
    if surface.fullscreen {
        args.push("--fs".to_owned());
    }
    args
}

/// One external player process.
#[derive(Debug)]
pub struct ProcessPlayer {
    command: String,
    extra_args: Vec<String>,
    profile: PlayerProfile,
    surface: VideoSurface,
    source: Option<String>,
    args: Option<Vec<String>>,
    child: Option<Child>,
}

impl ProcessPlayer {
    /// Arguments prepared for launch, if `prepare` has run.
    #[must_use]
    pub fn prepared_args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// OS process id of the launched player, if one is held.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn kill_child(child: &mut Child) -> Result<(), PlayerError> {
        if child.try_wait()?.is_none() {
            child.kill()?;
        }
        Ok(())
    }
}

impl MediaPlayer for ProcessPlayer {
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError> {
        url::Url::parse(url).map_err(|source| PlayerError::InvalidSource {
            url: url.to_owned(),
            source,
        })?;
        self.source = Some(url.to_owned());
        self.args = None;
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        let source = self.source.as_ref().ok_or(PlayerError::NoSource)?;
        let mut args = self.extra_args.clone();
        if self.profile == PlayerProfile::Mpv {
            args.extend(mpv_surface_args(&self.surface));
        }
        args.push(source.clone());
        debug!(command = %self.command, ?args, "player prepared");
        self.args = Some(args);
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let args = self.args.as_ref().ok_or(PlayerError::NotPrepared)?;
        if let Some(child) = self.child.as_mut()
            && child.try_wait()?.is_none()
        {
            return Ok(());
        }
        let child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        info!(command = %self.command, pid = child.id(), "player started");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlayerError> {
        if let Some(child) = self.child.as_mut() {
            Self::kill_child(child)?;
            debug!(pid = child.id(), "player stopped");
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), PlayerError> {
        if let Some(mut child) = self.child.take() {
            Self::kill_child(&mut child)?;
            let status = child.wait()?;
            debug!(%status, "player released");
        }
        self.args = None;
        self.source = None;
        Ok(())
    }

    fn is_playing(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = Self::kill_child(&mut child) {
                warn!(error = %e, "failed to kill player on drop");
            }
            let _ = child.wait();
        }
    }
}
