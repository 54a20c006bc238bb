//! Player error types.

/// Errors raised while driving the external player.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum PlayerError {
    /// The stream address is not a URL.
    #[error("invalid stream URL `{url}`: {source}")]
    InvalidSource {
        /// Rejected address.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// `prepare` was called before a source was set.
    #[error("no stream source set")]
    NoSource,

    /// `play` was called before `prepare`.
    #[error("player is not prepared")]
    NotPrepared,

    /// The player process could not be started.
    #[error("failed to launch player `{command}`: {source}")]
    Spawn {
        /// Player command.
        command: String,
        /// Spawn failure.
        source: std::io::Error,
    },

    /// Stopping or reaping the player process failed.
    #[error("player I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
