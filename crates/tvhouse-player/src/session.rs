//! Scoped playback of one stream.

use tracing::{debug, instrument, warn};

use super::backend::{MediaPlayer, PlayerBackend};
use super::error::PlayerError;
use super::surface::VideoSurface;

/// A player bound to one stream for the lifetime of a viewing screen.
///
/// Dropping the session stops and releases the player, so a screen that
/// owns a session cannot leak one on any exit path.
#[derive(Debug)]
pub struct PlaybackSession<P: MediaPlayer> {
    player: Option<P>,
    url: String,
}

impl<P: MediaPlayer> PlaybackSession<P> {
    /// Builds a player on `surface` and starts playing `url`.
    ///
    /// A player that fails part way through startup is released before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be built, the URL is
    /// rejected, or playback fails to start.
    #[instrument(skip(backend, surface))]
    pub fn start<B>(backend: &B, surface: &VideoSurface, url: &str) -> Result<Self, PlayerError>
    where
        B: PlayerBackend<Player = P>,
    {
        let mut player = backend.build(surface)?;
        if let Err(e) = Self::begin(&mut player, url) {
            if let Err(release_err) = player.release() {
                warn!(error = %release_err, "failed to release player after startup error");
            }
            return Err(e);
        }
        debug!("playback session started");
        Ok(Self {
            player: Some(player),
            url: url.to_owned(),
        })
    }

    fn begin(player: &mut P, url: &str) -> Result<(), PlayerError> {
        player.set_source(url)?;
        player.prepare()?;
        player.play()
    }

    /// Stream being played.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the player is still rendering.
    pub fn is_playing(&mut self) -> bool {
        self.player.as_mut().is_some_and(MediaPlayer::is_playing)
    }

    /// Stops and releases the player.
    ///
    /// Release is attempted even if stopping fails.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by stop or release.
    pub fn stop(mut self) -> Result<(), PlayerError> {
        self.player.take().map_or(Ok(()), Self::shutdown)
    }

    fn shutdown(mut player: P) -> Result<(), PlayerError> {
        let stopped = player.stop();
        let released = player.release();
        debug!("playback session ended");
        stopped.and(released)
    }
}

impl<P: MediaPlayer> Drop for PlaybackSession<P> {
    fn drop(&mut self) {
        if let Some(player) = self.player.take() {
            if let Err(e) = Self::shutdown(player) {
                warn!(url = %self.url, error = %e, "failed to stop player on drop");
            }
        }
    }
}
