//! Volume and mute bookkeeping
//!
//! Level is a linear fraction (0.0-1.0) handed straight to the renderer.
//! Mute is tracked separately so the level survives a mute/unmute cycle.

use crate::types::clamp_unit;

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level`
    pub fn new(level: f64) -> Self {
        Self {
            level: clamp_unit(level),
            muted: false,
        }
    }

    /// Set volume level, clamped to 0.0-1.0
    ///
    /// A positive level unmutes: turning the volume up is an explicit
    /// gesture asking for sound.
    pub fn set_level(&mut self, level: f64) {
        self.level = clamp_unit(level);
        if self.level > 0.0 {
            self.muted = false;
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
