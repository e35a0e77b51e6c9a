//! Session actor
//!
//! Hosts one [`PlaybackSession`] on a tokio task. The UI and the renderer
//! adapter talk to it through a cloneable [`SessionHandle`]; nothing else
//! touches the session, so commands and renderer callbacks are applied one
//! at a time in arrival order.
//!
//! The loop also drives the timers the session asks for: the next simulated
//! progress tick and, when configured, the stall timeout for the current
//! load. Both deadlines are recomputed from the session after every message,
//! so a track switch or pause drops the old tick chain before it can fire.

use crate::{
    clock::Clock,
    error::{PlaybackError, Result},
    events::{RendererEvent, SessionEvent},
    session::PlaybackSession,
    types::{PlaybackPhase, SessionConfig, SessionSnapshot, Track},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

/// Capacity of the event broadcast; slow subscribers see `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Clock on tokio's time base, so paused test time drives the simulation
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Instant corresponding to a reading of this clock
    pub fn instant_at(&self, reading: Duration) -> Instant {
        self.origin + reading
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Messages accepted by the session actor
#[derive(Debug)]
pub enum SessionCommand {
    SelectTrack {
        track: Track,
        index: usize,
        queue: Option<Vec<Track>>,
        reply: oneshot::Sender<Result<()>>,
    },
    PlayNext,
    PlayPrevious,
    TogglePlayPause,
    Seek(f64),
    SetVolume(f64),
    ToggleMute,
    ReplaceQueue(Vec<Track>),
    Enqueue(Track),
    RemoveAt {
        index: usize,
        reply: oneshot::Sender<Result<Track>>,
    },
    ClearQueue,
    Renderer(RendererEvent),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Handle to a running session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    snapshot: watch::Receiver<SessionSnapshot>,
}

/// Spawn a session actor on the current tokio runtime
pub fn spawn_session(config: SessionConfig) -> (SessionHandle, JoinHandle<()>) {
    let clock = TokioClock::new();
    let session = PlaybackSession::with_clock(config, Arc::new(clock));

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

    let actor = SessionActor {
        session,
        clock,
        commands: command_rx,
        events: event_tx.clone(),
        snapshot: snapshot_tx,
        stall: None,
    };
    let task = tokio::spawn(actor.run());

    let handle = SessionHandle {
        commands: command_tx,
        events: event_tx,
        snapshot: snapshot_rx,
    };
    (handle, task)
}

impl SessionHandle {
    fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::SessionClosed)
    }

    pub async fn select_track(
        &self,
        track: Track,
        index: usize,
        queue: Option<Vec<Track>>,
    ) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::SelectTrack {
            track,
            index,
            queue,
            reply,
        })?;
        response.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    pub fn play_next(&self) -> Result<()> {
        self.send(SessionCommand::PlayNext)
    }

    pub fn play_previous(&self) -> Result<()> {
        self.send(SessionCommand::PlayPrevious)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(SessionCommand::TogglePlayPause)
    }

    pub fn seek(&self, fraction: f64) -> Result<()> {
        self.send(SessionCommand::Seek(fraction))
    }

    pub fn set_volume(&self, level: f64) -> Result<()> {
        self.send(SessionCommand::SetVolume(level))
    }

    pub fn toggle_mute(&self) -> Result<()> {
        self.send(SessionCommand::ToggleMute)
    }

    pub fn replace_queue(&self, tracks: Vec<Track>) -> Result<()> {
        self.send(SessionCommand::ReplaceQueue(tracks))
    }

    pub fn enqueue(&self, track: Track) -> Result<()> {
        self.send(SessionCommand::Enqueue(track))
    }

    pub async fn remove_at(&self, index: usize) -> Result<Track> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::RemoveAt { index, reply })?;
        response.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.send(SessionCommand::ClearQueue)
    }

    /// Forward a renderer callback
    pub fn renderer(&self, event: RendererEvent) -> Result<()> {
        self.send(SessionCommand::Renderer(event))
    }

    /// Current state, after every command sent before this call
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::Snapshot(reply))?;
        response.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Latest published snapshot
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Stop the actor; later commands fail with `SessionClosed`
    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown)
    }
}

/// Stall timer for one load
#[derive(Debug, Clone, Copy)]
struct StallTimer {
    load_generation: u64,
    deadline: Instant,
}

struct SessionActor {
    session: PlaybackSession,
    clock: TokioClock,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    snapshot: watch::Sender<SessionSnapshot>,
    stall: Option<StallTimer>,
}

impl SessionActor {
    async fn run(mut self) {
        info!("Playback session started");

        loop {
            self.publish();
            self.arm_stall_timer();

            let tick = self.session.pending_tick();
            let tick_deadline = tick.map(|tick| self.clock.instant_at(tick.due));
            let stall_deadline = self.stall.map(|timer| timer.deadline);

            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                () = sleep_until(tick_deadline) => {
                    if let Some(tick) = tick {
                        self.session.on_tick(tick.generation);
                    }
                },
                () = sleep_until(stall_deadline) => {
                    if let Some(timer) = self.stall {
                        if timer.load_generation == self.session.load_generation() {
                            self.session.renderer_stalled();
                        }
                    }
                },
            }
        }

        self.publish();
        info!("Playback session stopped");
    }

    fn apply(&mut self, command: SessionCommand) {
        let session = &mut self.session;
        match command {
            SessionCommand::SelectTrack {
                track,
                index,
                queue,
                reply,
            } => {
                let _ = reply.send(session.select_track(&track, index, queue));
            }
            SessionCommand::PlayNext => session.play_next(),
            SessionCommand::PlayPrevious => session.play_previous(),
            SessionCommand::TogglePlayPause => session.toggle_play_pause(),
            SessionCommand::Seek(fraction) => session.seek(fraction),
            SessionCommand::SetVolume(level) => session.set_volume(level),
            SessionCommand::ToggleMute => session.toggle_mute(),
            SessionCommand::ReplaceQueue(tracks) => session.replace_queue(tracks),
            SessionCommand::Enqueue(track) => session.enqueue(track),
            SessionCommand::RemoveAt { index, reply } => {
                let _ = reply.send(session.remove_at(index));
            }
            SessionCommand::ClearQueue => session.clear_queue(),
            SessionCommand::Renderer(event) => session.handle_renderer_event(event),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(session.snapshot());
            }
            SessionCommand::Shutdown => {}
        }
    }

    /// Fan out queued events and refresh the snapshot if anything changed
    fn publish(&mut self) {
        let events = self.session.drain_events();
        if events.is_empty() {
            return;
        }

        for event in events {
            trace!(kind = event.kind(), "Session event");
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        self.snapshot.send_replace(self.session.snapshot());
    }

    /// Arm the stall timer for a new load, drop it once loading ends
    fn arm_stall_timer(&mut self) {
        let Some(timeout) = self.session.config().stall_timeout() else {
            return;
        };

        if self.session.phase() != PlaybackPhase::Loading {
            self.stall = None;
            return;
        }

        let load_generation = self.session.load_generation();
        if self.stall.map(|timer| timer.load_generation) != Some(load_generation) {
            debug!(load_generation, ?timeout, "Stall timer armed");
            self.stall = Some(StallTimer {
                load_generation,
                deadline: Instant::now() + timeout,
            });
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
