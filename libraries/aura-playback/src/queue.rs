//! Circular playback queue
//!
//! An ordered list of tracks plus the active position. The active index is
//! always either `None` or a valid position; every mutation reconciles it.

use crate::error::{PlaybackError, Result};
use crate::types::Track;

/// Ordered tracks and the active position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Track>,
    active: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue with no active track
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active.and_then(|index| self.tracks.get(index))
    }

    /// Make `index` the active position
    pub fn activate(&mut self, index: usize) -> Result<&Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }
        self.active = Some(index);
        Ok(&self.tracks[index])
    }

    /// Clear the active position
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    /// Position after the active one, wrapping to 0
    ///
    /// With no active track the queue starts from the front. `None` only when
    /// the queue is empty.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(self.active.map_or(0, |index| (index + 1) % len))
    }

    /// Position before the active one, wrapping to `len - 1`
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(self.active.map_or(len - 1, |index| (index + len - 1) % len))
    }

    /// Activate the next position (see [`Queue::next_index`])
    pub fn advance(&mut self) -> Option<&Track> {
        let index = self.next_index()?;
        self.active = Some(index);
        self.tracks.get(index)
    }

    /// Activate the previous position (see [`Queue::previous_index`])
    pub fn retreat(&mut self) -> Option<&Track> {
        let index = self.previous_index()?;
        self.active = Some(index);
        self.tracks.get(index)
    }

    /// Replace all tracks
    ///
    /// The active track survives if its id is still present (first match);
    /// otherwise the active position is cleared. Returns the new active index.
    pub fn replace(&mut self, tracks: Vec<Track>) -> Option<usize> {
        let active_id = self.active_track().map(|track| track.id.clone());
        self.tracks = tracks;
        self.active = active_id.and_then(|id| self.tracks.iter().position(|t| t.id == id));
        self.active
    }

    /// Append a track; the active position is unchanged
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove the track at `index`
    ///
    /// Positions after the active one shift down. Removing the active track
    /// clears the active position.
    pub fn remove(&mut self, index: usize) -> Result<Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }

        let track = self.tracks.remove(index);
        self.active = match self.active {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Ok(track)
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.active = None;
    }
}
