//! Playback session - the controller
//!
//! Owns the queue, transport, readiness, progress and volume state. All
//! mutation goes through the command methods (called by the UI) and the
//! `on_*`/`renderer_*` methods (called on behalf of the external renderer).
//! Nothing here performs I/O or blocks; every call finishes its transition
//! and queues the matching [`SessionEvent`]s before returning.

use crate::{
    clock::{Clock, SystemClock},
    error::{PlaybackError, Result},
    events::{RendererEvent, SessionEvent},
    progress::{PendingTick, ProgressSimulation, TickOutcome},
    queue::Queue,
    types::{clamp_unit, PlaybackPhase, RendererProps, SessionConfig, SessionSnapshot, Track},
    volume::Volume,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Playback session controller
///
/// One instance per application, created at start-up and passed to
/// whichever component drives it.
#[derive(Debug)]
pub struct PlaybackSession {
    config: SessionConfig,
    clock: Arc<dyn Clock>,

    queue: Queue,

    // Transport
    playing: bool,
    ready: bool,
    stalled: bool,
    buffering: bool,

    // Progress
    progress: f64,
    loaded: f64,
    duration: f64,

    volume: Volume,
    simulation: ProgressSimulation,

    // Bumped on every load; lets drivers tell one load from the next
    load_generation: u64,
    last_phase: PlaybackPhase,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create a session backed by the system clock
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a session reading time from `clock`
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            volume: Volume::new(config.initial_volume),
            simulation: ProgressSimulation::new(config.tick_interval()),
            config,
            clock,
            queue: Queue::new(),
            playing: false,
            ready: false,
            stalled: false,
            buffering: false,
            progress: 0.0,
            loaded: 0.0,
            duration: 0.0,
            load_generation: 0,
            last_phase: PlaybackPhase::Empty,
            pending_events: Vec::new(),
        }
    }

    // ===== Track Selection =====

    /// Make `track` (at `index`) the active track
    ///
    /// With `queue`, the queue is replaced first. The track must be the one
    /// at `index`; otherwise nothing changes and an error is returned.
    ///
    /// Loading always restarts from zero progress and unknown duration, with
    /// the intent to play and sound muted: audio may only start from a later
    /// user gesture (`toggle_play_pause` or `set_volume`).
    pub fn select_track(
        &mut self,
        track: &Track,
        index: usize,
        queue: Option<Vec<Track>>,
    ) -> Result<()> {
        let candidate = match &queue {
            Some(tracks) => tracks.get(index),
            None => self.queue.get(index),
        };
        let Some(candidate) = candidate else {
            let len = queue.as_ref().map_or(self.queue.len(), Vec::len);
            warn!(index, len, track_id = %track.id, "Rejected track selection");
            return Err(PlaybackError::IndexOutOfBounds { index, len });
        };
        if candidate.id != track.id {
            warn!(index, expected = %candidate.id, found = %track.id, "Rejected track selection");
            return Err(PlaybackError::TrackMismatch {
                expected: candidate.id.clone(),
                found: track.id.clone(),
            });
        }

        let previous_track_id = self.active_track_id();
        if let Some(tracks) = queue {
            self.queue = Queue::from_tracks(tracks);
            self.emit(SessionEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
        self.queue.activate(index)?;
        self.begin_load(previous_track_id);
        Ok(())
    }

    /// Advance to the next track, wrapping to the front
    ///
    /// No-op on an empty queue.
    pub fn play_next(&mut self) {
        let previous_track_id = self.active_track_id();
        if self.queue.advance().is_none() {
            debug!("play_next on empty queue");
            return;
        }
        self.begin_load(previous_track_id);
    }

    /// Go back to the previous track, wrapping to the end
    ///
    /// No-op on an empty queue.
    pub fn play_previous(&mut self) {
        let previous_track_id = self.active_track_id();
        if self.queue.retreat().is_none() {
            debug!("play_previous on empty queue");
            return;
        }
        self.begin_load(previous_track_id);
    }

    fn begin_load(&mut self, previous_track_id: Option<String>) {
        let Some(index) = self.queue.active_index() else {
            return;
        };
        let track_id = self.queue.get(index).map(|t| t.id.clone()).unwrap_or_default();

        self.load_generation += 1;
        self.simulation.cancel();
        self.ready = false;
        self.stalled = false;
        self.buffering = false;
        self.playing = true;
        self.progress = 0.0;
        self.loaded = 0.0;
        self.duration = 0.0;

        debug!(track_id = %track_id, index, "Loading track");
        self.emit(SessionEvent::TrackChanged {
            track_id,
            index,
            previous_track_id,
        });
        self.emit_progress();
        self.emit(SessionEvent::DurationChanged { seconds: 0.0 });

        if !self.volume.is_muted() {
            self.volume.mute();
            self.emit_volume();
        }

        self.sync_phase();
    }

    // ===== Transport =====

    /// Toggle between playing and paused
    ///
    /// No-op until the renderer is ready. The first toggle also unmutes:
    /// it is the user gesture that unlocks sound.
    pub fn toggle_play_pause(&mut self) {
        if !self.ready {
            debug!(phase = ?self.phase(), "toggle_play_pause ignored, renderer not ready");
            return;
        }

        self.playing = !self.playing;
        if self.volume.is_muted() {
            self.volume.unmute();
            self.emit_volume();
        }
        self.sync_phase();
    }

    /// Seek to a fraction of the track
    ///
    /// Progress is updated optimistically; the renderer is told to seek via
    /// [`SessionEvent::SeekRequested`] and nothing waits for it. The next
    /// `on_progress` overrides the optimistic value.
    pub fn seek(&mut self, fraction: f64) {
        let fraction = clamp_unit(fraction);
        self.progress = fraction;
        self.emit_progress();
        self.emit(SessionEvent::SeekRequested { fraction });
        self.restart_simulation();
    }

    // ===== Volume =====

    /// Set volume, clamped to 0.0-1.0; a positive level unmutes
    pub fn set_volume(&mut self, level: f64) {
        self.volume.set_level(level);
        self.emit_volume();
    }

    /// Flip the mute flag
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.emit_volume();
    }

    // ===== Queue Management =====

    /// Replace the queue
    ///
    /// The active track stays active if its id is still present, at its new
    /// position. Otherwise the session goes back to `Empty`.
    pub fn replace_queue(&mut self, tracks: Vec<Track>) {
        let had_active = self.queue.active_index().is_some();
        let active = self.queue.replace(tracks);
        self.emit(SessionEvent::QueueChanged {
            length: self.queue.len(),
        });

        if had_active && active.is_none() {
            self.unload();
        }
    }

    /// Append a track to the queue
    pub fn enqueue(&mut self, track: Track) {
        self.queue.push(track);
        self.emit(SessionEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Remove the track at `index`
    ///
    /// Removing the active track stops playback.
    pub fn remove_at(&mut self, index: usize) -> Result<Track> {
        let was_active = self.queue.active_index() == Some(index);
        let track = self.queue.remove(index)?;
        self.emit(SessionEvent::QueueChanged {
            length: self.queue.len(),
        });

        if was_active {
            self.unload();
        }
        Ok(track)
    }

    /// Remove every track and stop playback
    pub fn clear_queue(&mut self) {
        let had_active = self.queue.active_index().is_some();
        self.queue.clear();
        self.emit(SessionEvent::QueueChanged { length: 0 });

        if had_active {
            self.unload();
        }
    }

    fn unload(&mut self) {
        debug!("Active track removed from queue");
        self.queue.deactivate();
        self.simulation.cancel();
        self.playing = false;
        self.ready = false;
        self.stalled = false;
        self.buffering = false;
        self.progress = 0.0;
        self.loaded = 0.0;
        self.duration = 0.0;
        self.emit_progress();
        self.emit(SessionEvent::DurationChanged { seconds: 0.0 });
        self.sync_phase();
    }

    // ===== Renderer Callbacks =====

    /// Dispatch a renderer callback delivered as a message
    pub fn handle_renderer_event(&mut self, event: RendererEvent) {
        match event {
            RendererEvent::Ready => self.renderer_ready(),
            RendererEvent::Play => self.on_play(),
            RendererEvent::Pause => self.on_pause(),
            RendererEvent::Buffer => self.on_buffer(),
            RendererEvent::BufferEnd => self.on_buffer_end(),
            RendererEvent::Ended => self.renderer_ended(),
            RendererEvent::Progress { played, loaded } => self.on_progress(played, loaded),
            RendererEvent::Duration { seconds } => self.on_duration(seconds),
        }
    }

    /// Renderer finished initial buffering
    pub fn renderer_ready(&mut self) {
        if self.queue.active_index().is_none() {
            debug!("renderer_ready without an active track");
            return;
        }
        if self.ready {
            return;
        }

        self.ready = true;
        self.stalled = false;
        if !self.config.autoplay_on_ready {
            self.playing = false;
        }
        self.sync_phase();
    }

    /// Renderer reached the end of the track
    ///
    /// Only honoured while playing; advances like `play_next`.
    pub fn renderer_ended(&mut self) {
        if self.phase() != PlaybackPhase::ReadyPlaying {
            debug!(phase = ?self.phase(), "renderer_ended ignored");
            return;
        }
        self.play_next();
    }

    /// Renderer started playing on its own (e.g. a click inside the embed)
    pub fn on_play(&mut self) {
        if self.ready && !self.playing {
            self.playing = true;
            self.sync_phase();
        }
    }

    /// Renderer paused on its own
    pub fn on_pause(&mut self) {
        if self.ready && self.playing {
            self.playing = false;
            self.sync_phase();
        }
    }

    /// Renderer started buffering
    pub fn on_buffer(&mut self) {
        self.set_buffering(true);
    }

    /// Renderer finished buffering
    pub fn on_buffer_end(&mut self) {
        self.set_buffering(false);
    }

    fn set_buffering(&mut self, buffering: bool) {
        if self.buffering != buffering {
            self.buffering = buffering;
            self.emit(SessionEvent::BufferingChanged { buffering });
        }
    }

    /// Renderer progress report; authoritative over any optimistic value
    pub fn on_progress(&mut self, played: f64, loaded: f64) {
        self.progress = clamp_unit(played);
        self.loaded = clamp_unit(loaded);
        self.emit_progress();
        self.restart_simulation();
    }

    /// Renderer reported the track duration in seconds
    pub fn on_duration(&mut self, seconds: f64) {
        self.duration = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            0.0
        };
        self.emit(SessionEvent::DurationChanged {
            seconds: self.duration,
        });
        self.restart_simulation();
    }

    /// Renderer never became ready
    ///
    /// Only meaningful while loading; a later `renderer_ready` still recovers.
    pub fn renderer_stalled(&mut self) {
        if self.phase() != PlaybackPhase::Loading {
            return;
        }

        let track_id = self.active_track_id().unwrap_or_default();
        warn!(track_id = %track_id, "Renderer stalled while loading");
        self.stalled = true;
        self.emit(SessionEvent::Stalled { track_id });
        self.sync_phase();
    }

    // ===== Progress Simulation =====

    /// Next simulated tick the driver should deliver, if a run is active
    pub fn pending_tick(&self) -> Option<PendingTick> {
        self.simulation.pending()
    }

    /// Deliver a simulated tick; stale generations are ignored
    pub fn on_tick(&mut self, generation: u64) {
        match self.simulation.tick(generation, self.clock.now()) {
            TickOutcome::Stale => {}
            TickOutcome::Progress(played) => {
                self.progress = played;
                self.emit_progress();
            }
            TickOutcome::Finished => {
                debug!("Simulated playback reached the end");
                self.progress = 1.0;
                self.emit_progress();
                self.play_next();
            }
        }
    }

    fn sync_simulation(&mut self, phase: PlaybackPhase) {
        if !self.config.simulate_progress {
            return;
        }
        if phase == PlaybackPhase::ReadyPlaying {
            if !self.simulation.is_running() {
                self.start_simulation();
            }
        } else {
            self.simulation.cancel();
        }
    }

    fn restart_simulation(&mut self) {
        if self.config.simulate_progress && self.phase() == PlaybackPhase::ReadyPlaying {
            self.start_simulation();
        }
    }

    fn start_simulation(&mut self) {
        let duration = self.simulated_duration();
        // Rounding through f64 can overshoot very long durations
        let elapsed = Duration::try_from_secs_f64(duration.as_secs_f64() * self.progress)
            .map_or(duration, |elapsed| elapsed.min(duration));
        if let Some(generation) = self.simulation.start(self.clock.now(), elapsed, duration) {
            debug!(generation, ?duration, "Progress simulation started");
        }
    }

    /// Renderer-reported duration, else the track's known duration
    fn simulated_duration(&self) -> Duration {
        if self.duration > 0.0 {
            Duration::try_from_secs_f64(self.duration).unwrap_or_default()
        } else {
            self.queue
                .active_track()
                .and_then(|track| track.duration)
                .unwrap_or_default()
        }
    }

    // ===== State Queries =====

    /// Current phase, derived from the session fields
    pub fn phase(&self) -> PlaybackPhase {
        if self.queue.active_index().is_none() {
            PlaybackPhase::Empty
        } else if self.ready {
            if self.playing {
                PlaybackPhase::ReadyPlaying
            } else {
                PlaybackPhase::ReadyPaused
            }
        } else if self.stalled {
            PlaybackPhase::Stalled
        } else {
            PlaybackPhase::Loading
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn active_index(&self) -> Option<usize> {
        self.queue.active_index()
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.queue.active_track()
    }

    fn active_track_id(&self) -> Option<String> {
        self.queue.active_track().map(|track| track.id.clone())
    }

    /// Transport intent (true while loading with intent to play)
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Played fraction (0.0-1.0)
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Loaded fraction (0.0-1.0)
    pub fn loaded(&self) -> f64 {
        self.loaded
    }

    /// Duration in seconds, 0.0 when unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Identifies the current load; changes on every track (re)selection
    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    /// What the renderer should display, `None` with no active track
    pub fn renderer_props(&self) -> Option<RendererProps> {
        self.queue.active_track().map(|track| RendererProps {
            url: track.url.clone(),
            source: track.source,
            playing: self.playing,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            queue: self.queue.tracks().to_vec(),
            active_index: self.queue.active_index(),
            active_track: self.queue.active_track().cloned(),
            playing: self.playing,
            ready: self.ready,
            buffering: self.buffering,
            progress: self.progress,
            loaded: self.loaded,
            duration: self.duration,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            load_generation: self.load_generation,
        }
    }

    // ===== Events =====

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }

    fn emit_progress(&mut self) {
        self.emit(SessionEvent::ProgressUpdated {
            played: self.progress,
            loaded: self.loaded,
        });
    }

    fn emit_volume(&mut self) {
        self.emit(SessionEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn sync_phase(&mut self) {
        let phase = self.phase();
        if phase != self.last_phase {
            debug!(from = ?self.last_phase, to = ?phase, "Phase changed");
            self.last_phase = phase;
            self.emit(SessionEvent::PhaseChanged { phase });
        }
        self.sync_simulation(phase);
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| {
                Track::new(format!("t{i}"), format!("https://cdn.example.com/{i}.mp3"))
                    .with_duration(Duration::from_secs(10))
            })
            .collect()
    }

    fn loaded_session(n: usize) -> PlaybackSession {
        let mut session = PlaybackSession::default();
        let queue = tracks(n);
        session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();
        session
    }

    #[test]
    fn new_session_is_empty() {
        let session = PlaybackSession::default();
        assert_eq!(session.phase(), PlaybackPhase::Empty);
        assert!(session.queue().is_empty());
        assert_eq!(session.volume(), 0.8);
        assert!(!session.is_muted());
        assert!(session.renderer_props().is_none());
    }

    #[test]
    fn select_resets_and_mutes() {
        let mut session = loaded_session(3);
        session.renderer_ready();
        session.toggle_play_pause();
        session.on_progress(0.4, 0.9);
        session.on_duration(200.0);
        assert!(!session.is_muted());

        let next = session.queue().get(2).cloned().unwrap();
        session.select_track(&next, 2, None).unwrap();

        assert_eq!(session.phase(), PlaybackPhase::Loading);
        assert_eq!(session.active_index(), Some(2));
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.loaded(), 0.0);
        assert_eq!(session.duration(), 0.0);
        assert!(session.is_muted());
        assert!(session.is_playing());
    }

    #[test]
    fn rejected_selection_leaves_state_untouched() {
        let mut session = loaded_session(2);
        session.drain_events();
        let before = session.snapshot();

        let stranger = Track::new("other", "https://cdn.example.com/x.mp3");
        assert!(matches!(
            session.select_track(&stranger, 1, None),
            Err(PlaybackError::TrackMismatch { .. })
        ));
        assert!(matches!(
            session.select_track(&stranger, 0, Some(Vec::new())),
            Err(PlaybackError::IndexOutOfBounds { index: 0, len: 0 })
        ));

        assert_eq!(session.snapshot(), before);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn select_emits_track_change_with_previous() {
        let mut session = loaded_session(2);
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::TrackChanged {
            track_id: "t0".to_string(),
            index: 0,
            previous_track_id: None,
        }));
        assert!(events.contains(&SessionEvent::PhaseChanged {
            phase: PlaybackPhase::Loading
        }));

        session.play_next();
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::TrackChanged {
            track_id: "t1".to_string(),
            index: 1,
            previous_track_id: Some("t0".to_string()),
        }));
        // Already muted and already loading: no redundant events
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::VolumeChanged { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::PhaseChanged { .. })));
    }

    #[test]
    fn ready_respects_autoplay_setting() {
        let mut session = loaded_session(1);
        session.renderer_ready();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);

        let config = SessionConfig {
            autoplay_on_ready: false,
            ..SessionConfig::default()
        };
        let mut session = PlaybackSession::new(config);
        let queue = tracks(1);
        session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();
        session.renderer_ready();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPaused);
    }

    #[test]
    fn renderer_ready_without_track_is_ignored() {
        let mut session = PlaybackSession::default();
        session.renderer_ready();
        assert_eq!(session.phase(), PlaybackPhase::Empty);
        assert!(!session.is_ready());
    }

    #[test]
    fn toggle_unmutes_once_ready() {
        let mut session = loaded_session(1);

        // Not ready: nothing happens, sound stays locked
        session.toggle_play_pause();
        assert!(session.is_playing());
        assert!(session.is_muted());

        session.renderer_ready();
        session.toggle_play_pause();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPaused);
        assert!(!session.is_muted());

        session.toggle_play_pause();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);
        assert!(!session.is_muted());
    }

    #[test]
    fn renderer_transport_callbacks() {
        let mut session = loaded_session(1);

        // Ignored before ready
        session.on_pause();
        assert!(session.is_playing());

        session.renderer_ready();
        session.on_pause();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPaused);
        session.on_play();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);
    }

    #[test]
    fn buffering_flag() {
        let mut session = loaded_session(1);
        session.drain_events();

        session.on_buffer();
        session.on_buffer();
        assert!(session.is_buffering());
        session.on_buffer_end();
        assert!(!session.is_buffering());

        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::BufferingChanged { buffering: true },
                SessionEvent::BufferingChanged { buffering: false },
            ]
        );
    }

    #[test]
    fn seek_is_optimistic_and_fire_and_forget() {
        let mut session = loaded_session(1);
        session.drain_events();

        session.seek(0.3);
        assert_eq!(session.progress(), 0.3);
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::SeekRequested { fraction: 0.3 }));

        // The renderer's next report wins
        session.on_progress(0.25, 0.5);
        assert_eq!(session.progress(), 0.25);
        assert_eq!(session.loaded(), 0.5);
    }

    #[test]
    fn on_duration_rejects_garbage() {
        let mut session = loaded_session(1);
        session.on_duration(f64::NAN);
        assert_eq!(session.duration(), 0.0);
        session.on_duration(-3.0);
        assert_eq!(session.duration(), 0.0);
        session.on_duration(187.5);
        assert_eq!(session.duration(), 187.5);
    }

    #[test]
    fn stall_and_late_recovery() {
        let mut session = loaded_session(2);
        session.renderer_stalled();
        assert_eq!(session.phase(), PlaybackPhase::Stalled);
        assert!(session
            .drain_events()
            .contains(&SessionEvent::Stalled {
                track_id: "t0".to_string()
            }));

        // Transport stays locked while stalled
        session.toggle_play_pause();
        assert_eq!(session.phase(), PlaybackPhase::Stalled);

        session.renderer_ready();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);

        // Only meaningful while loading
        session.renderer_stalled();
        assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);
    }

    #[test]
    fn stall_recovers_on_next() {
        let mut session = loaded_session(2);
        session.renderer_stalled();
        session.play_next();
        assert_eq!(session.phase(), PlaybackPhase::Loading);
        assert_eq!(session.active_index(), Some(1));
    }

    #[test]
    fn load_generation_changes_per_load() {
        let mut session = loaded_session(2);
        let first = session.load_generation();
        session.play_next();
        assert_ne!(session.load_generation(), first);
        assert_eq!(session.snapshot().load_generation, session.load_generation());
    }

    #[test]
    fn renderer_props_follow_state() {
        let mut session = loaded_session(1);
        let props = session.renderer_props().unwrap();
        assert_eq!(props.url, "https://cdn.example.com/0.mp3");
        assert!(props.playing);
        assert!(props.muted);

        session.renderer_ready();
        session.set_volume(0.4);
        let props = session.renderer_props().unwrap();
        assert_eq!(props.volume, 0.4);
        assert!(!props.muted);
    }

    #[test]
    fn simulation_advances_and_rolls_over() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            simulate_progress: true,
            ..SessionConfig::default()
        };
        let mut session = PlaybackSession::with_clock(config, Arc::new(clock.clone()));
        let queue = tracks(2);
        session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();

        // Loading: nothing scheduled
        assert!(session.pending_tick().is_none());

        session.renderer_ready();
        let tick = session.pending_tick().unwrap();
        assert_eq!(tick.due, Duration::from_millis(250));

        clock.advance(Duration::from_secs(5));
        session.on_tick(tick.generation);
        assert!((session.progress() - 0.5).abs() < 1e-9);

        clock.advance(Duration::from_secs(5));
        session.on_tick(tick.generation);
        assert_eq!(session.active_index(), Some(1));
        assert_eq!(session.phase(), PlaybackPhase::Loading);
        assert_eq!(session.progress(), 0.0);
        assert!(session.pending_tick().is_none());
    }

    #[test]
    fn seek_to_end_of_maximum_duration_track() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            simulate_progress: true,
            ..SessionConfig::default()
        };
        let mut session = PlaybackSession::with_clock(config, Arc::new(clock.clone()));
        let queue = vec![Track::new("endless", "https://cdn.example.com/endless.mp3")
            .with_duration(Duration::MAX)];
        session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();
        session.renderer_ready();

        session.seek(1.0);
        assert_eq!(session.progress(), 1.0);
        let tick = session.pending_tick().unwrap();

        clock.advance(Duration::from_secs(1));
        session.on_tick(tick.generation);

        // Finished and wrapped back onto the only track
        assert_eq!(session.active_index(), Some(0));
        assert_eq!(session.phase(), PlaybackPhase::Loading);
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn pausing_cancels_simulation() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            simulate_progress: true,
            ..SessionConfig::default()
        };
        let mut session = PlaybackSession::with_clock(config, Arc::new(clock.clone()));
        let queue = tracks(1);
        session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();
        session.renderer_ready();
        let tick = session.pending_tick().unwrap();

        session.toggle_play_pause();
        assert!(session.pending_tick().is_none());

        clock.advance(Duration::from_secs(3));
        session.on_tick(tick.generation);
        assert_eq!(session.progress(), 0.0);

        // Resume picks up from the paused position with a new generation
        session.toggle_play_pause();
        let resumed = session.pending_tick().unwrap();
        assert_ne!(resumed.generation, tick.generation);
    }
}
