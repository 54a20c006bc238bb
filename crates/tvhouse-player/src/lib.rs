//! Playback sessions for tvhouse.
//!
//! The media player itself is external: this crate only hands it a
//! stream URL and a surface description, and guarantees the player is
//! stopped and released when the viewing screen goes away.

mod backend;
mod error;
mod process;
mod session;
mod surface;

pub use backend::{MediaPlayer, PlayerBackend};
pub use error::PlayerError;
pub use process::{DEFAULT_PLAYER_COMMAND, PlayerProfile, ProcessBackend, ProcessPlayer};
pub use session::PlaybackSession;
pub use surface::{ScaleMode, VideoSurface};
