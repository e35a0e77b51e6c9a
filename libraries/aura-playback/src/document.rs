//! Stored queue documents
//!
//! Queues and playlists live in the document store as JSON keyed by owner.
//! The session never reads the store; callers hydrate a document into
//! tracks and hand those to `select_track` / `replace_queue`.

use crate::error::{PlaybackError, Result};
use crate::types::{SourceKind, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// A queue or playlist as persisted in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQueue {
    pub owner_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackDocument>,
}

/// A track entry inside a stored queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDocument {
    pub id: String,
    pub url: String,
    /// Missing kinds are inferred from the URL
    #[serde(default)]
    pub source: Option<SourceKind>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
}

impl StoredQueue {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert to tracks, in stored order
    ///
    /// Rejects entries without an id or URL and duplicate ids, since the
    /// session reconciles the active track by id.
    pub fn into_tracks(self) -> Result<Vec<Track>> {
        let mut seen = HashSet::new();
        self.tracks
            .into_iter()
            .enumerate()
            .map(|(position, doc)| {
                if doc.id.trim().is_empty() {
                    return Err(PlaybackError::InvalidDocument(format!(
                        "track at position {position} has no id"
                    )));
                }
                if doc.url.trim().is_empty() {
                    return Err(PlaybackError::InvalidDocument(format!(
                        "track {} has no url",
                        doc.id
                    )));
                }
                if !seen.insert(doc.id.clone()) {
                    return Err(PlaybackError::InvalidDocument(format!(
                        "duplicate track id {}",
                        doc.id
                    )));
                }
                Ok(doc.into())
            })
            .collect()
    }
}

impl From<TrackDocument> for Track {
    fn from(doc: TrackDocument) -> Self {
        let source = doc.source.unwrap_or_else(|| SourceKind::detect(&doc.url));
        Self {
            id: doc.id,
            url: doc.url,
            source,
            external_id: doc.external_id,
            artwork_url: doc.artwork_url,
            duration: doc
                .duration_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .filter(|duration| !duration.is_zero()),
            title: doc.title,
            artist: doc.artist,
        }
    }
}

impl From<&Track> for TrackDocument {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            url: track.url.clone(),
            source: Some(track.source),
            external_id: track.external_id.clone(),
            artwork_url: track.artwork_url.clone(),
            duration_secs: track.duration.map(|d| d.as_secs_f64()),
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "ownerId": "user-42",
        "name": "Late night",
        "tracks": [
            {"id": "a", "url": "https://www.youtube.com/watch?v=abc", "externalId": "abc", "title": "First"},
            {"id": "b", "url": "https://cdn.example.com/b.mp3", "durationSecs": 185.0},
            {"id": "c", "url": "https://cdn.example.com/c", "source": "soundcloud", "durationSecs": -1}
        ]
    }"#;

    #[test]
    fn hydrates_tracks() {
        let stored = StoredQueue::from_json(DOC).unwrap();
        assert_eq!(stored.owner_id, "user-42");
        assert_eq!(stored.name.as_deref(), Some("Late night"));

        let tracks = stored.into_tracks().unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].source, SourceKind::YouTube);
        assert_eq!(tracks[0].external_id.as_deref(), Some("abc"));
        assert_eq!(tracks[1].source, SourceKind::File);
        assert_eq!(tracks[1].duration, Some(Duration::from_secs(185)));
        // Explicit kind wins over detection; bad durations are dropped
        assert_eq!(tracks[2].source, SourceKind::SoundCloud);
        assert_eq!(tracks[2].duration, None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{"ownerId": "u", "tracks": [
            {"id": "a", "url": "https://cdn.example.com/1.mp3"},
            {"id": "a", "url": "https://cdn.example.com/2.mp3"}
        ]}"#;
        let err = StoredQueue::from_json(json).unwrap().into_tracks().unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidDocument(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_missing_url() {
        let json = r#"{"ownerId": "u", "tracks": [{"id": "a", "url": " "}]}"#;
        let err = StoredQueue::from_json(json).unwrap().into_tracks().unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidDocument(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            StoredQueue::from_json("{not json"),
            Err(PlaybackError::Json(_))
        ));
    }

    #[test]
    fn track_document_from_track_keeps_fields() {
        let track = Track::new("a", "https://vimeo.com/1")
            .with_duration(Duration::from_secs(60))
            .with_artwork("https://cdn.example.com/a.jpg");
        let doc = TrackDocument::from(&track);
        assert_eq!(doc.source, Some(SourceKind::Vimeo));
        assert_eq!(doc.duration_secs, Some(60.0));
        assert_eq!(Track::from(doc), track);
    }
}
