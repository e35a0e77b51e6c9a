//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Transport, volume and renderer callbacks never fail; only operations that
/// take an index or a document from the caller can be rejected.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Index does not address a position in the queue
    #[error("Index {index} out of bounds for queue of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Track handed to `select_track` is not the one at the given index
    #[error("Track mismatch: queue holds {expected} at that index, got {found}")]
    TrackMismatch { expected: String, found: String },

    /// The session actor has shut down
    #[error("Playback session is closed")]
    SessionClosed,

    /// Stored queue document failed validation
    #[error("Invalid queue document: {0}")]
    InvalidDocument(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
