//! Session events
//!
//! Every mutating call on the session queues the events describing its
//! effect before returning. Hosts drain them synchronously to update the
//! rendering layer and to forward instructions to the renderer.

use crate::types::PlaybackPhase;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Derived phase changed
    PhaseChanged {
        /// The new phase
        phase: PlaybackPhase,
    },

    /// A track became active (also emitted when re-selecting the same one)
    TrackChanged {
        /// ID of the new active track
        track_id: String,
        /// Position of the new active track
        index: usize,
        /// ID of the previously active track (if any)
        previous_track_id: Option<String>,
    },

    /// Progress overwritten by the renderer, a seek or the simulation
    ProgressUpdated {
        /// Played fraction (0.0-1.0)
        played: f64,
        /// Loaded fraction (0.0-1.0)
        loaded: f64,
    },

    /// Duration overwritten
    DurationChanged {
        /// Duration in seconds, 0.0 when unknown
        seconds: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f64,
        /// Whether audio is muted
        muted: bool,
    },

    /// Queue contents changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Renderer started or stopped buffering
    BufferingChanged {
        /// Whether the renderer is buffering
        buffering: bool,
    },

    /// The renderer should seek; fire-and-forget
    SeekRequested {
        /// Target fraction (0.0-1.0)
        fraction: f64,
    },

    /// The renderer did not become ready in time
    Stalled {
        /// ID of the track that failed to load
        track_id: String,
    },
}

impl SessionEvent {
    /// Short name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::TrackChanged { .. } => "track_changed",
            Self::ProgressUpdated { .. } => "progress_updated",
            Self::DurationChanged { .. } => "duration_changed",
            Self::VolumeChanged { .. } => "volume_changed",
            Self::QueueChanged { .. } => "queue_changed",
            Self::BufferingChanged { .. } => "buffering_changed",
            Self::SeekRequested { .. } => "seek_requested",
            Self::Stalled { .. } => "stalled",
        }
    }
}

/// Callbacks from the external renderer, as messages
///
/// The session is the only sink for these; each maps to one `on_*` /
/// `renderer_*` method on [`crate::PlaybackSession`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RendererEvent {
    /// Initial buffering complete
    Ready,
    /// Playback started (also covers the renderer's "start")
    Play,
    /// Playback paused by the renderer
    Pause,
    /// Renderer is buffering
    Buffer,
    /// Renderer finished buffering
    BufferEnd,
    /// Track reached its end
    Ended,
    /// Periodic progress report
    Progress {
        /// Played fraction (0.0-1.0)
        played: f64,
        /// Loaded fraction (0.0-1.0)
        loaded: f64,
    },
    /// Duration became known
    Duration {
        /// Duration in seconds
        seconds: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = SessionEvent::PhaseChanged {
            phase: PlaybackPhase::ReadyPlaying,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_changed");
        assert_eq!(json["phase"], "ready_playing");

        let back: SessionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn renderer_event_from_json() {
        let event: RendererEvent =
            serde_json::from_str(r#"{"type": "progress", "played": 0.5, "loaded": 0.75}"#).unwrap();
        assert_eq!(
            event,
            RendererEvent::Progress {
                played: 0.5,
                loaded: 0.75
            }
        );

        let event: RendererEvent = serde_json::from_str(r#"{"type": "buffer_end"}"#).unwrap();
        assert_eq!(event, RendererEvent::BufferEnd);
    }

    #[test]
    fn kind_matches_tag() {
        let event = SessionEvent::SeekRequested { fraction: 0.5 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
    }
}
