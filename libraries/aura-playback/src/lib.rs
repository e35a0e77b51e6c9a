//! Aura - Playback Session
//!
//! Platform-agnostic playback state for the Aura player.
//!
//! This crate provides:
//! - Circular queue with active-track reconciliation
//! - Transport state machine (Empty, Loading, ReadyPaused, ReadyPlaying, Stalled)
//! - Autoplay-safe track loading (every load starts muted)
//! - Optimistic, fire-and-forget seeking
//! - Volume (0.0-1.0) and mute bookkeeping
//! - Cancelable progress simulation for renderers without progress callbacks
//! - Optional stall detection for renderers that never become ready
//!
//! # Architecture
//!
//! `aura-playback` does no media work itself. The renderer (an embedded
//! YouTube/SoundCloud/Vimeo player or a plain media element) is an external
//! actor: the session tells it what to show through [`RendererProps`] and
//! [`SessionEvent::SeekRequested`], and it reports back through
//! [`RendererEvent`]s. Nothing is shared across that boundary except these
//! messages.
//!
//! - No dependency on a document store (queues arrive as [`StoredQueue`])
//! - No dependency on a UI toolkit (hosts drain [`SessionEvent`]s)
//! - Runs natively (see [`runtime`]) and in the browser (`wasm` feature)
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use aura_playback::{PlaybackPhase, PlaybackSession, SessionConfig, Track};
//!
//! let mut session = PlaybackSession::new(SessionConfig::default());
//!
//! let queue = vec![
//!     Track::new("a", "https://www.youtube.com/watch?v=abc"),
//!     Track::new("b", "https://cdn.example.com/b.mp3"),
//! ];
//! session.select_track(&queue[0], 0, Some(queue.clone())).unwrap();
//! assert_eq!(session.phase(), PlaybackPhase::Loading);
//! assert!(session.is_muted());
//!
//! // Renderer callbacks
//! session.renderer_ready();
//! session.on_duration(212.0);
//! assert_eq!(session.phase(), PlaybackPhase::ReadyPlaying);
//!
//! // User gestures
//! session.set_volume(0.6);
//! session.seek(0.5);
//! session.play_next();
//! assert_eq!(session.active_index(), Some(1));
//!
//! for event in session.drain_events() {
//!     // forward to the rendering layer
//!     let _ = event;
//! }
//! ```
//!
//! # Example: Session Actor
//!
//! ```rust,no_run
//! # #[cfg(feature = "runtime")]
//! # async fn demo() -> aura_playback::Result<()> {
//! use aura_playback::{runtime::spawn_session, RendererEvent, SessionConfig, Track};
//!
//! let (handle, _task) = spawn_session(SessionConfig::default());
//! let mut events = handle.subscribe();
//!
//! let queue = vec![Track::new("a", "https://cdn.example.com/a.mp3")];
//! handle.select_track(queue[0].clone(), 0, Some(queue)).await?;
//! handle.renderer(RendererEvent::Ready)?;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod clock;
mod document;
mod error;
mod events;
mod progress;
mod queue;
mod session;
pub mod types;
mod volume;

#[cfg(feature = "runtime")]
pub mod runtime;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use document::{StoredQueue, TrackDocument};
pub use error::{PlaybackError, Result};
pub use events::{RendererEvent, SessionEvent};
pub use progress::{PendingTick, ProgressSimulation, TickOutcome};
pub use queue::Queue;
pub use session::PlaybackSession;
pub use types::{
    PlaybackPhase, RendererProps, SessionConfig, SessionSnapshot, SourceKind, Track,
};
pub use volume::Volume;
