//! WASM-compatible type definitions

use crate::{Clock, SourceKind, Track};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// WASM-compatible track
///
/// Simplified version of `Track` using JS-friendly types (f64 seconds
/// instead of Duration, provider kind as a string).
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[wasm_bindgen]
pub struct WasmTrack {
    id: String,
    url: String,
    #[serde(default)]
    source: Option<SourceKind>,
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    artwork_url: Option<String>,
    #[serde(default)]
    duration_secs: Option<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: Option<String>,
}

#[wasm_bindgen]
impl WasmTrack {
    /// Create a new track; the provider kind is inferred from the URL
    #[wasm_bindgen(constructor)]
    pub fn new(id: String, url: String, title: String) -> Self {
        Self {
            id,
            url,
            source: None,
            external_id: None,
            artwork_url: None,
            duration_secs: None,
            title,
            artist: None,
        }
    }

    // Getters for all fields
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.url.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn source(&self) -> String {
        self.source
            .unwrap_or_else(|| SourceKind::detect(&self.url))
            .as_str()
            .to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn artist(&self) -> Option<String> {
        self.artist.clone()
    }

    #[wasm_bindgen(getter, js_name = externalId)]
    pub fn external_id(&self) -> Option<String> {
        self.external_id.clone()
    }

    #[wasm_bindgen(getter, js_name = artworkUrl)]
    pub fn artwork_url(&self) -> Option<String> {
        self.artwork_url.clone()
    }

    #[wasm_bindgen(getter, js_name = durationSecs)]
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    // Setters
    #[wasm_bindgen(setter)]
    pub fn set_artist(&mut self, artist: Option<String>) {
        self.artist = artist;
    }

    #[wasm_bindgen(setter, js_name = externalId)]
    pub fn set_external_id(&mut self, external_id: Option<String>) {
        self.external_id = external_id;
    }

    #[wasm_bindgen(setter, js_name = artworkUrl)]
    pub fn set_artwork_url(&mut self, artwork_url: Option<String>) {
        self.artwork_url = artwork_url;
    }

    #[wasm_bindgen(setter, js_name = durationSecs)]
    pub fn set_duration_secs(&mut self, duration_secs: Option<f64>) {
        self.duration_secs = duration_secs;
    }
}

// Conversion from internal Track to WASM type
impl From<&Track> for WasmTrack {
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

// Conversion from WASM type to internal Track
impl From<WasmTrack> for Track {
    fn from(track: WasmTrack) -> Self {
        let source = track
            .source
            .unwrap_or_else(|| SourceKind::detect(&track.url));
        Self {
            id: track.id,
            url: track.url,
            source,
            external_id: track.external_id,
            artwork_url: track.artwork_url,
            duration: track
                .duration_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .filter(|d| !d.is_zero()),
            title: track.title,
            artist: track.artist,
        }
    }
}

/// Clock backed by `Date.now()`
///
/// `std::time::Instant` is unavailable on wasm32-unknown-unknown.
#[derive(Debug, Clone, Copy)]
pub struct JsClock {
    origin_ms: f64,
}

impl JsClock {
    pub fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let elapsed_ms = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed_ms / 1000.0)
    }
}
