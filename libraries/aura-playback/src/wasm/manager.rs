//! WASM-compatible PlaybackSession wrapper

use super::types::{JsClock, WasmTrack};
use crate::{PlaybackError, PlaybackPhase, PlaybackSession, SessionConfig, Track};
use js_sys::Function;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// WASM-compatible playback session
///
/// Wraps the core PlaybackSession with a JavaScript-friendly API. Session
/// events are delivered synchronously to the `onEvent` callback before each
/// method returns.
#[wasm_bindgen]
pub struct WasmPlaybackSession {
    inner: PlaybackSession,
    clock: JsClock,

    // Event callbacks
    on_event: Option<Function>,
    on_error: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlaybackSession {
    /// Create a new session; `config` is an optional plain object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmPlaybackSession, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };

        let clock = JsClock::new();
        Ok(Self {
            inner: PlaybackSession::with_clock(config, Arc::new(clock)),
            clock,
            on_event: None,
            on_error: None,
        })
    }

    // ===== Track Selection =====

    /// Select `track` at `index`, optionally replacing the queue first
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(
        &mut self,
        track: WasmTrack,
        index: usize,
        queue: JsValue,
    ) -> Result<(), JsValue> {
        let queue = if queue.is_undefined() || queue.is_null() {
            None
        } else {
            Some(parse_tracks(queue)?)
        };
        let track = Track::from(track);

        let result = self.inner.select_track(&track, index, queue);
        self.flush_events();
        result.map_err(|e| self.handle_error(e))
    }

    /// Skip to next track (wraps)
    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&mut self) {
        self.inner.play_next();
        self.flush_events();
    }

    /// Go to previous track (wraps)
    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&mut self) {
        self.inner.play_previous();
        self.flush_events();
    }

    // ===== Transport =====

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) {
        self.inner.toggle_play_pause();
        self.flush_events();
    }

    /// Seek to a fraction (0.0 - 1.0)
    pub fn seek(&mut self, fraction: f64) {
        self.inner.seek(fraction);
        self.flush_events();
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: f64) {
        self.inner.set_volume(level);
        self.flush_events();
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush_events();
    }

    // ===== Queue Management =====

    /// Replace the queue with an array of tracks
    #[wasm_bindgen(js_name = replaceQueue)]
    pub fn replace_queue(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let tracks = parse_tracks(tracks)?;
        self.inner.replace_queue(tracks);
        self.flush_events();
        Ok(())
    }

    pub fn enqueue(&mut self, track: WasmTrack) {
        self.inner.enqueue(track.into());
        self.flush_events();
    }

    /// Remove track from queue by index
    #[wasm_bindgen(js_name = removeAt)]
    pub fn remove_at(&mut self, index: usize) -> Result<WasmTrack, JsValue> {
        let result = self.inner.remove_at(index);
        self.flush_events();
        let removed = result.map_err(|e| self.handle_error(e))?;
        Ok(WasmTrack::from(&removed))
    }

    #[wasm_bindgen(js_name = clearQueue)]
    pub fn clear_queue(&mut self) {
        self.inner.clear_queue();
        self.flush_events();
    }

    // ===== Renderer Callbacks =====

    #[wasm_bindgen(js_name = rendererReady)]
    pub fn renderer_ready(&mut self) {
        self.inner.renderer_ready();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = rendererEnded)]
    pub fn renderer_ended(&mut self) {
        self.inner.renderer_ended();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = rendererStalled)]
    pub fn renderer_stalled(&mut self) {
        self.inner.renderer_stalled();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onPlay)]
    pub fn on_play(&mut self) {
        self.inner.on_play();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onPause)]
    pub fn on_pause(&mut self) {
        self.inner.on_pause();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onBuffer)]
    pub fn on_buffer(&mut self) {
        self.inner.on_buffer();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onBufferEnd)]
    pub fn on_buffer_end(&mut self) {
        self.inner.on_buffer_end();
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onProgress)]
    pub fn on_progress(&mut self, played: f64, loaded: f64) {
        self.inner.on_progress(played, loaded);
        self.flush_events();
    }

    #[wasm_bindgen(js_name = onDuration)]
    pub fn on_duration(&mut self, seconds: f64) {
        self.inner.on_duration(seconds);
        self.flush_events();
    }

    // ===== Progress Simulation =====

    /// Milliseconds until the next simulated tick, if one is scheduled
    ///
    /// JS schedules `tick()` with `setTimeout` using this delay.
    #[wasm_bindgen(js_name = nextTickDelayMs)]
    pub fn next_tick_delay_ms(&self) -> Option<f64> {
        use crate::Clock;

        self.inner.pending_tick().map(|tick| {
            let now = self.clock.now();
            tick.due.saturating_sub(now).as_secs_f64() * 1000.0
        })
    }

    /// Deliver the pending tick if it is due; returns whether it ran
    pub fn tick(&mut self) -> bool {
        use crate::Clock;

        let Some(tick) = self.inner.pending_tick() else {
            return false;
        };
        if self.clock.now() < tick.due {
            return false;
        }
        self.inner.on_tick(tick.generation);
        self.flush_events();
        true
    }

    // ===== State Queries =====

    /// Get current phase as string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        match self.inner.phase() {
            PlaybackPhase::Empty => "empty".to_string(),
            PlaybackPhase::Loading => "loading".to_string(),
            PlaybackPhase::ReadyPaused => "ready_paused".to_string(),
            PlaybackPhase::ReadyPlaying => "ready_playing".to_string(),
            PlaybackPhase::Stalled => "stalled".to_string(),
        }
    }

    /// Full session state as a plain object
    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Props for the media renderer, or null with no active track
    #[wasm_bindgen(js_name = rendererProps)]
    pub fn renderer_props(&self) -> JsValue {
        match self.inner.renderer_props() {
            Some(props) => serde_wasm_bindgen::to_value(&props).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    // ===== Event Listeners =====

    /// Register session event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    /// Register error callback
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, callback: Function) {
        self.on_error = Some(callback);
    }

    // ===== Internal Event Emitters =====

    fn flush_events(&mut self) {
        let events = self.inner.drain_events();
        let Some(ref cb) = self.on_event else {
            return;
        };
        for event in events {
            if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &js_event).ok();
            }
        }
    }

    fn handle_error(&self, error: PlaybackError) -> JsValue {
        let err_msg = error.to_string();

        // Emit error event
        if let Some(ref cb) = self.on_error {
            cb.call1(&JsValue::NULL, &JsValue::from_str(&err_msg)).ok();
        }

        JsValue::from_str(&err_msg)
    }
}

fn parse_tracks(value: JsValue) -> Result<Vec<Track>, JsValue> {
    let tracks: Vec<WasmTrack> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;
    Ok(tracks.into_iter().map(Track::from).collect())
}
