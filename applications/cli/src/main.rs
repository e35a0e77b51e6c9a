/// Aura - headless playback session host
mod config;
mod input;
mod renderer;

use anyhow::Context;
use aura_playback::runtime::{spawn_session, SessionHandle};
use aura_playback::{SessionEvent, SessionSnapshot, StoredQueue, Track};
use clap::{Parser, Subcommand};
use config::AuraConfig;
use input::Input;
use renderer::SimulatedRenderer;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Drive a playback session from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a stored queue with a simulated renderer
    Play {
        /// Queue document (JSON); falls back to `queue_path` from config
        #[arg(short, long)]
        queue: Option<PathBuf>,
        /// Queue position to start from
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },
    /// Validate a queue document and list its tracks
    Inspect {
        /// Queue document (JSON)
        queue: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AuraConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Play { queue, start } => play(config, queue, start).await,
        Commands::Inspect { queue } => inspect(&queue),
    }
}

fn load_queue(path: &Path) -> anyhow::Result<(StoredQueue, Vec<Track>)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read queue document {}", path.display()))?;
    let stored = StoredQueue::from_json(&json)
        .with_context(|| format!("Malformed queue document {}", path.display()))?;
    let tracks = stored.clone().into_tracks()?;
    Ok((stored, tracks))
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let (stored, tracks) = load_queue(path)?;

    println!(
        "Queue {} (owner {}): {} tracks",
        stored.name.as_deref().unwrap_or("<unnamed>"),
        stored.owner_id,
        tracks.len()
    );
    for (index, track) in tracks.iter().enumerate() {
        println!("  {}", describe_track(index, track));
    }

    Ok(())
}

async fn play(config: AuraConfig, queue: Option<PathBuf>, start: usize) -> anyhow::Result<()> {
    let queue_path = queue
        .or_else(|| config.queue_path.clone())
        .context("No queue document given (pass --queue or set queue_path)")?;
    let (stored, tracks) = load_queue(&queue_path)?;
    anyhow::ensure!(!tracks.is_empty(), "Queue document has no tracks");

    let first = tracks
        .get(start)
        .cloned()
        .with_context(|| format!("Start position {start} is outside a queue of {}", tracks.len()))?;

    // The simulated renderer never reports progress
    let mut session_config = config.session.clone();
    session_config.simulate_progress = true;

    let (handle, session_task) = spawn_session(session_config);
    let renderer_task = SimulatedRenderer::spawn(handle.clone(), config.renderer.clone());
    let printer_task = tokio::spawn(print_events(handle.subscribe()));

    tracing::info!(
        owner = %stored.owner_id,
        tracks = tracks.len(),
        "Starting playback"
    );
    handle.select_track(first, start, Some(tracks)).await?;

    println!("{}", input::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Input>() {
            Ok(Input::Quit) => break,
            Ok(input) => execute(&handle, input).await?,
            Err(e) => eprintln!("{e}"),
        }
    }

    handle.shutdown()?;
    session_task.await.context("Session task panicked")?;
    renderer_task.abort();
    printer_task.abort();

    Ok(())
}

async fn execute(handle: &SessionHandle, input: Input) -> anyhow::Result<()> {
    match input {
        Input::Next => handle.play_next()?,
        Input::Previous => handle.play_previous()?,
        Input::TogglePlayPause => {
            if handle.snapshot().await?.phase.is_ready() {
                handle.toggle_play_pause()?;
            } else {
                eprintln!("Still loading; play/pause unlocks once the track is ready");
            }
        }
        Input::Seek(fraction) => handle.seek(fraction)?,
        Input::Volume(level) => handle.set_volume(level)?,
        Input::ToggleMute => handle.toggle_mute()?,
        Input::Select(index) => {
            let snapshot = handle.snapshot().await?;
            match snapshot.queue.get(index) {
                Some(track) => {
                    if let Err(e) = handle.select_track(track.clone(), index, None).await {
                        eprintln!("{e}");
                    }
                }
                None => eprintln!("No track at position {index}"),
            }
        }
        Input::Remove(index) => match handle.remove_at(index).await {
            Ok(track) => println!("Removed {}", track.title_or_id()),
            Err(e) => eprintln!("{e}"),
        },
        Input::Status => println!("{}", describe_status(&handle.snapshot().await?)),
        Input::Queue => {
            let snapshot = handle.snapshot().await?;
            for (index, track) in snapshot.queue.iter().enumerate() {
                let marker = if snapshot.active_index == Some(index) { '>' } else { ' ' };
                println!("{marker} {}", describe_track(index, track));
            }
        }
        Input::Help => println!("{}", input::HELP),
        Input::Quit => {}
    }
    Ok(())
}

async fn print_events(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::PhaseChanged { phase }) => println!("[{phase:?}]"),
            Ok(SessionEvent::TrackChanged { track_id, index, .. }) => {
                println!("Now loading #{index} ({track_id})");
            }
            Ok(SessionEvent::VolumeChanged { level, muted }) => {
                println!(
                    "Volume {:.0}%{}",
                    level * 100.0,
                    if muted { " (muted)" } else { "" }
                );
            }
            Ok(SessionEvent::Stalled { track_id }) => {
                println!("Track {track_id} did not load; skip with 'next'");
            }
            Ok(event) => tracing::trace!(kind = event.kind(), "Session event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn describe_track(index: usize, track: &Track) -> String {
    let duration = track
        .duration
        .map_or_else(|| "--:--".to_string(), |d| format_time(d.as_secs_f64()));
    match &track.artist {
        Some(artist) => format!(
            "{index:>3}. {} - {artist} [{}] {duration}",
            track.title_or_id(),
            track.source.as_str()
        ),
        None => format!(
            "{index:>3}. {} [{}] {duration}",
            track.title_or_id(),
            track.source.as_str()
        ),
    }
}

fn describe_status(snapshot: &SessionSnapshot) -> String {
    let Some(track) = &snapshot.active_track else {
        return format!("[{:?}] nothing selected", snapshot.phase);
    };
    format!(
        "[{:?}] {} {} / {} vol {:.0}%{}",
        snapshot.phase,
        track.title_or_id(),
        format_time(snapshot.progress * snapshot.duration),
        format_time(snapshot.duration),
        snapshot.volume * 100.0,
        if snapshot.muted { " (muted)" } else { "" }
    )
}

/// m:ss
fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

trait TitleOrId {
    fn title_or_id(&self) -> &str;
}

impl TitleOrId for Track {
    fn title_or_id(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}
