//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable item
///
/// Immutable once built. Queues share tracks by value; nothing mutates a
/// track in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier
    pub id: String,

    /// Source locator handed to the renderer
    pub url: String,

    /// Provider kind of `url`
    pub source: SourceKind,

    /// Provider-side identifier (e.g. YouTube video id)
    pub external_id: Option<String>,

    /// Artwork locator
    pub artwork_url: Option<String>,

    /// Known duration, if the provider reported one up front
    pub duration: Option<Duration>,

    /// Display title
    pub title: String,

    /// Display artist
    pub artist: Option<String>,
}

impl Track {
    /// Create a track, inferring the provider kind from the URL
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let source = SourceKind::detect(&url);
        Self {
            id: id.into(),
            url,
            source,
            external_id: None,
            artwork_url: None,
            duration: None,
            title: String::new(),
            artist: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    #[must_use]
    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = Some(artwork_url.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}

/// Media provider kind
///
/// Closed set: the renderer knows how to embed exactly these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// YouTube video (embedded player)
    YouTube,

    /// SoundCloud track (embedded widget)
    SoundCloud,

    /// Vimeo video (embedded player)
    Vimeo,

    /// Plain media file served over HTTP
    File,
}

impl SourceKind {
    /// Infer the provider kind from a source URL
    ///
    /// Anything that is not a known provider host is treated as a file.
    pub fn detect(url: &str) -> Self {
        let url = url.to_ascii_lowercase();
        let host = url
            .split_once("://")
            .map_or(url.as_str(), |(_, rest)| rest)
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let host = host.strip_prefix("www.").unwrap_or(host);

        match host {
            "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtu.be" => Self::YouTube,
            "soundcloud.com" | "m.soundcloud.com" | "on.soundcloud.com" => Self::SoundCloud,
            "vimeo.com" | "player.vimeo.com" => Self::Vimeo,
            _ => Self::File,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::SoundCloud => "soundcloud",
            Self::Vimeo => "vimeo",
            Self::File => "file",
        }
    }
}

/// Session phase, derived from the session fields
///
/// ```text
/// Empty ──select──▶ Loading ──ready──▶ ReadyPlaying ◀─toggle─▶ ReadyPaused
///                      │                    │
///                    stall                ended ──▶ Loading (next, wraps)
///                      ▼
///                   Stalled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// No active track
    Empty,

    /// Track selected, renderer still buffering
    Loading,

    /// Renderer ready, transport paused
    ReadyPaused,

    /// Renderer ready, transport playing
    ReadyPlaying,

    /// Renderer never became ready within the configured stall timeout
    Stalled,
}

impl PlaybackPhase {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::ReadyPaused | Self::ReadyPlaying)
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial volume (0.0-1.0, default: 0.8)
    pub initial_volume: f64,

    /// Start playing as soon as the renderer is ready (default: true)
    ///
    /// When false, `renderer_ready` lands in `ReadyPaused` and playback waits
    /// for an explicit `toggle_play_pause`.
    pub autoplay_on_ready: bool,

    /// Simulate progress from the wall clock when the renderer does not
    /// report it (default: false)
    pub simulate_progress: bool,

    /// Interval between simulated progress ticks (default: 250 ms)
    pub tick_interval_ms: u64,

    /// Give up waiting for the renderer after this long (default: never)
    pub stall_timeout_ms: Option<u64>,
}

impl SessionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn stall_timeout(&self) -> Option<Duration> {
        self.stall_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            autoplay_on_ready: true,
            simulate_progress: false,
            tick_interval_ms: 250,
            stall_timeout_ms: None,
        }
    }
}

/// What the renderer needs to display the active track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererProps {
    pub url: String,
    pub source: SourceKind,
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
}

/// Point-in-time copy of the session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: PlaybackPhase,
    pub queue: Vec<Track>,
    pub active_index: Option<usize>,
    pub active_track: Option<Track>,
    /// Transport intent; may be true while still loading
    pub playing: bool,
    pub ready: bool,
    pub buffering: bool,
    /// Played fraction (0.0-1.0)
    pub progress: f64,
    /// Loaded fraction reported by the renderer (0.0-1.0)
    pub loaded: f64,
    /// Duration in seconds, 0.0 when unknown
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    /// Identifies the current load; changes on every track (re)selection
    pub load_generation: u64,
}

/// Clamp a fraction into `[0, 1]`, mapping NaN to 0
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.initial_volume, 0.8);
        assert!(config.autoplay_on_ready);
        assert!(!config.simulate_progress);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.stall_timeout(), None);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"simulate_progress": true, "stall_timeout_ms": 8000}"#)
                .unwrap();
        assert!(config.simulate_progress);
        assert_eq!(config.stall_timeout(), Some(Duration::from_secs(8)));
        assert_eq!(config.initial_volume, 0.8);
    }

    #[test]
    fn detects_source_kind() {
        assert_eq!(
            SourceKind::detect("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            SourceKind::YouTube
        );
        assert_eq!(SourceKind::detect("https://youtu.be/dQw4w9WgXcQ"), SourceKind::YouTube);
        assert_eq!(
            SourceKind::detect("https://soundcloud.com/artist/song"),
            SourceKind::SoundCloud
        );
        assert_eq!(SourceKind::detect("https://vimeo.com/12345"), SourceKind::Vimeo);
        assert_eq!(
            SourceKind::detect("https://cdn.example.com/youtube.com/a.mp3"),
            SourceKind::File
        );
        assert_eq!(SourceKind::detect("/music/local.flac"), SourceKind::File);
    }

    #[test]
    fn track_builder() {
        let track = Track::new("t1", "https://youtu.be/abc")
            .with_external_id("abc")
            .with_title("Song")
            .with_duration(Duration::from_secs(200));

        assert_eq!(track.source, SourceKind::YouTube);
        assert_eq!(track.external_id.as_deref(), Some("abc"));
        assert_eq!(track.duration, Some(Duration::from_secs(200)));
        assert!(track.artwork_url.is_none());
    }

    #[test]
    fn clamp_unit_handles_nan_and_range() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
    }

    #[test]
    fn only_ready_phases_accept_transport() {
        assert!(PlaybackPhase::ReadyPaused.is_ready());
        assert!(PlaybackPhase::ReadyPlaying.is_ready());
        assert!(!PlaybackPhase::Empty.is_ready());
        assert!(!PlaybackPhase::Loading.is_ready());
        assert!(!PlaybackPhase::Stalled.is_ready());
    }
}
