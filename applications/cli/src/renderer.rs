/// Simulated media renderer
///
/// Stands in for the embedded player: it watches session events, "buffers"
/// each newly selected track for a configurable delay, then reports ready
/// and the track's known duration. It never reports progress, so the
/// session's progress simulation drives playback.
use crate::config::RendererSettings;
use aura_playback::runtime::SessionHandle;
use aura_playback::{RendererEvent, SessionEvent};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct SimulatedRenderer {
    handle: SessionHandle,
    settings: RendererSettings,
}

impl SimulatedRenderer {
    pub fn spawn(handle: SessionHandle, settings: RendererSettings) -> JoinHandle<()> {
        let renderer = Self { handle, settings };
        tokio::spawn(renderer.run())
    }

    async fn run(self) {
        let mut events = self.handle.subscribe();

        loop {
            match events.recv().await {
                Ok(SessionEvent::TrackChanged { track_id, .. }) => {
                    if let Err(e) = self.load(&track_id).await {
                        debug!("Renderer stopped: {}", e);
                        break;
                    }
                }
                Ok(SessionEvent::SeekRequested { fraction }) => {
                    debug!(fraction, "Renderer seeking");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Renderer fell behind session events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn load(&self, track_id: &str) -> aura_playback::Result<()> {
        let snapshot = self.handle.snapshot().await?;
        let Some(track) = snapshot.active_track.filter(|t| t.id == track_id) else {
            // Superseded before we got to it
            return Ok(());
        };

        if self.settings.unsupported.contains(&track.source) {
            warn!(track_id, source = track.source.as_str(), "Renderer cannot embed source");
            return Ok(());
        }

        tokio::time::sleep(Duration::from_millis(self.settings.load_delay_ms)).await;

        // A reselection of the same track is a different load
        let current = self.handle.snapshot().await?;
        if current.load_generation != snapshot.load_generation {
            debug!(track_id, "Load superseded while buffering");
            return Ok(());
        }

        info!(track_id, url = %track.url, "Renderer ready");
        self.handle.renderer(RendererEvent::Ready)?;
        if let Some(duration) = track.duration {
            self.handle.renderer(RendererEvent::Duration {
                seconds: duration.as_secs_f64(),
            })?;
        }
        Ok(())
    }
}
