//! WASM bindings for aura-playback
//!
//! This module provides WebAssembly bindings for the PlaybackSession,
//! so the browser player drives the same state machine as native hosts.

pub mod manager;
pub mod types;

pub use manager::WasmPlaybackSession;
pub use types::{JsClock, WasmTrack};
