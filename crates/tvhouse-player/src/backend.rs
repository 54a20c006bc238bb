//! External player boundary.

use super::error::PlayerError;
use super::surface::VideoSurface;

/// Factory for player instances.
pub trait PlayerBackend {
    /// Player type produced by this backend.
    type Player: MediaPlayer;

    /// Builds a player bound to `surface`. Nothing plays until `play`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot create a player.
    fn build(&self, surface: &VideoSurface) -> Result<Self::Player, PlayerError>;
}

/// A single player instance.
///
/// Call order is `set_source`, `prepare`, `play`, then `stop` and
/// `release`. [`PlaybackSession`](crate::PlaybackSession) enforces it.
pub trait MediaPlayer {
    /// Sets the stream to play.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is rejected.
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError>;

    /// Prepares playback of the current source.
    ///
    /// # Errors
    ///
    /// Returns an error if no source is set.
    fn prepare(&mut self) -> Result<(), PlayerError>;

    /// Starts playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not prepared or fails to start.
    fn play(&mut self) -> Result<(), PlayerError>;

    /// Halts playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be halted.
    fn stop(&mut self) -> Result<(), PlayerError>;

    /// Frees every resource held by the player.
    ///
    /// # Errors
    ///
    /// Returns an error if resources cannot be reclaimed.
    fn release(&mut self) -> Result<(), PlayerError>;

    /// Whether the player is currently rendering.
    fn is_playing(&mut self) -> bool;
}
