//! Progress simulation
//!
//! Stands in for renderer progress callbacks when none are available. A run
//! is anchored to the clock reading at play-start; each tick derives elapsed
//! time from that anchor and schedules the next one.
//!
//! Every run gets a fresh generation number. Ticks carry the generation they
//! were scheduled under, and a tick whose generation is not the running one
//! is discarded. Starting a new run or cancelling therefore stops the old
//! tick chain no matter how its timer is driven.

use std::time::Duration;

/// A scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTick {
    /// Run the tick belongs to
    pub generation: u64,

    /// Clock reading at which the tick is due
    pub due: Duration,
}

/// Result of delivering a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Tick from a cancelled or superseded run
    Stale,

    /// Run continues; played fraction so far
    Progress(f64),

    /// Elapsed time reached the duration; the run has stopped
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    generation: u64,
    anchor: Duration,
    anchor_elapsed: Duration,
    duration: Duration,
    next_due: Duration,
}

/// Cancelable, generation-keyed progress simulation
#[derive(Debug, Clone)]
pub struct ProgressSimulation {
    interval: Duration,
    generation: u64,
    run: Option<Run>,
}

impl ProgressSimulation {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            run: None,
        }
    }

    /// Start a run, cancelling any previous one
    ///
    /// `elapsed` is how far into the track playback already is. Returns the
    /// new generation, or `None` when the duration is unknown (zero).
    pub fn start(&mut self, now: Duration, elapsed: Duration, duration: Duration) -> Option<u64> {
        self.cancel();
        if duration.is_zero() {
            return None;
        }

        self.generation += 1;
        self.run = Some(Run {
            generation: self.generation,
            anchor: now,
            anchor_elapsed: elapsed.min(duration),
            duration,
            next_due: now.saturating_add(self.interval),
        });
        Some(self.generation)
    }

    /// Stop scheduling ticks
    pub fn cancel(&mut self) {
        self.run = None;
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Next tick the driver should deliver
    pub fn pending(&self) -> Option<PendingTick> {
        self.run.map(|run| PendingTick {
            generation: run.generation,
            due: run.next_due,
        })
    }

    /// Deliver a tick
    pub fn tick(&mut self, generation: u64, now: Duration) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Stale;
        };
        if run.generation != generation {
            return TickOutcome::Stale;
        }

        let elapsed = run
            .anchor_elapsed
            .saturating_add(now.saturating_sub(run.anchor));
        if elapsed >= run.duration {
            self.run = None;
            return TickOutcome::Finished;
        }

        run.next_due = now.saturating_add(self.interval);
        TickOutcome::Progress(elapsed.as_secs_f64() / run.duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(250);

    #[test]
    fn run_reports_progress_then_finishes() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        let generation = sim
            .start(Duration::ZERO, Duration::ZERO, Duration::from_secs(10))
            .unwrap();

        assert_eq!(
            sim.pending(),
            Some(PendingTick {
                generation,
                due: INTERVAL
            })
        );

        assert_eq!(
            sim.tick(generation, Duration::from_secs(5)),
            TickOutcome::Progress(0.5)
        );
        assert_eq!(
            sim.pending().unwrap().due,
            Duration::from_secs(5) + INTERVAL
        );

        assert_eq!(
            sim.tick(generation, Duration::from_secs(10)),
            TickOutcome::Finished
        );
        assert!(!sim.is_running());
        assert_eq!(sim.pending(), None);
    }

    #[test]
    fn restart_invalidates_previous_generation() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        let first = sim
            .start(Duration::ZERO, Duration::ZERO, Duration::from_secs(10))
            .unwrap();
        let second = sim
            .start(Duration::from_secs(1), Duration::ZERO, Duration::from_secs(20))
            .unwrap();
        assert_ne!(first, second);

        // A late tick from the first run must not touch the second
        assert_eq!(sim.tick(first, Duration::from_secs(30)), TickOutcome::Stale);
        assert!(sim.is_running());
        assert_eq!(
            sim.tick(second, Duration::from_secs(6)),
            TickOutcome::Progress(0.25)
        );
    }

    #[test]
    fn cancel_makes_ticks_stale() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        let generation = sim
            .start(Duration::ZERO, Duration::ZERO, Duration::from_secs(10))
            .unwrap();
        sim.cancel();

        assert_eq!(sim.tick(generation, Duration::from_secs(1)), TickOutcome::Stale);
        assert_eq!(sim.pending(), None);
    }

    #[test]
    fn resume_counts_already_elapsed_time() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        let generation = sim
            .start(
                Duration::from_secs(100),
                Duration::from_secs(4),
                Duration::from_secs(8),
            )
            .unwrap();

        assert_eq!(
            sim.tick(generation, Duration::from_secs(102)),
            TickOutcome::Progress(0.75)
        );
    }

    #[test]
    fn elapsed_saturates_at_maximum_duration() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        let generation = sim
            .start(Duration::from_secs(1), Duration::MAX, Duration::MAX)
            .unwrap();

        assert_eq!(
            sim.tick(generation, Duration::from_secs(2)),
            TickOutcome::Finished
        );
    }

    #[test]
    fn unknown_duration_does_not_start() {
        let mut sim = ProgressSimulation::new(INTERVAL);
        assert_eq!(sim.start(Duration::ZERO, Duration::ZERO, Duration::ZERO), None);
        assert!(!sim.is_running());
    }
}
