//! Error types.
//!
//! None of these are fatal to the frame pipeline: the camera still produces a
//! position every frame. They only report that a command was ignored.

use crate::anchor::AnchorId;
use crate::host::EventId;

/// A camera command referenced something that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectorError {
    #[error("anchor {0} does not exist")]
    UnknownAnchor(AnchorId),
    #[error("event {0} does not exist")]
    UnknownEvent(EventId),
    #[error("anchor {0} is reserved for the player")]
    ReservedAnchor(AnchorId),
    #[error("unknown easing curve '{0}'")]
    UnknownEasing(String),
}

/// Failure to encode or decode a camera snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("binary snapshot error: {0}")]
    Binary(#[from] postcard::Error),
    #[error("json snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to load a camera configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
