//! Headless playback
//!
//! Binds timeline tracks to an in-memory property store and drives them with
//! a fixed-rate frame pacer instead of a display loop.

use anyhow::{bail, Result};
use flare_animation::{
    FrameScheduler, FrameToken, SystemClock, Timeline, TimelineEvent, TimelineVariable, Track,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::TimelineFile;

/// Upper bound on the samples one `sample_range` call produces
pub const MAX_SAMPLES: usize = 1_000_000;

/// Named numeric properties written by the timeline
///
/// Stands in for the scene objects a renderer would own.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: Rc<RefCell<FxHashMap<String, f64>>>,
    /// Declaration order, used for output
    names: Vec<String>,
}

impl PropertyStore {
    /// Seed the store with initial values and bind one setter per track
    pub fn bind(tracks: Vec<Track>) -> (Self, Vec<TimelineVariable>) {
        let mut store = Self::default();
        let variables = tracks
            .into_iter()
            .map(|track| {
                let name = track.name.clone();
                store
                    .values
                    .borrow_mut()
                    .insert(name.clone(), track.initial_value);
                store.names.push(name.clone());

                let values = store.values.clone();
                track.bind(move |value| {
                    if let Some(slot) = values.borrow_mut().get_mut(&name) {
                        *slot = value;
                    }
                })
            })
            .collect();
        (store, variables)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.borrow().get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Current values in declaration order
    pub fn snapshot(&self) -> Vec<PropertyValue> {
        let values = self.values.borrow();
        self.names
            .iter()
            .map(|name| PropertyValue {
                name: name.clone(),
                value: values.get(name).copied().unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    pub name: String,
    pub value: f64,
}

/// Every property at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp_ms: f64,
    pub values: Vec<PropertyValue>,
}

#[derive(Debug, Default)]
struct PacerState {
    next_token: u64,
    pending: Option<(FrameToken, Instant)>,
}

/// Fixed-rate frame scheduler backed by `thread::sleep`
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    state: Rc<RefCell<PacerState>>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            state: Rc::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn has_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Block until the pending frame is due and hand out its token
    ///
    /// Returns `None` when no frame is pending.
    pub fn wait_for_frame(&self) -> Option<FrameToken> {
        let (token, due) = self.state.borrow_mut().pending.take()?;
        let wait = due.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        Some(token)
    }
}

impl FrameScheduler for FramePacer {
    fn request_frame(&mut self) -> FrameToken {
        let mut state = self.state.borrow_mut();
        let token = FrameToken(state.next_token);
        state.next_token += 1;
        state.pending = Some((token, Instant::now() + self.interval));
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.state.borrow_mut();
        if matches!(state.pending, Some((pending, _)) if pending == token) {
            state.pending = None;
        }
    }
}

/// Options for real-time playback
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    /// Timestamp to seek to before playing
    pub from_ms: f64,
    /// Pause once the clock reaches this timestamp
    pub pause_at: Option<f64>,
    /// Report every N frames, 0 to disable
    pub every: u64,
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayOutcome {
    Completed { frames: u64, timestamp_ms: f64 },
    Paused { frames: u64, timestamp_ms: f64 },
}

/// A timeline wired to a property store and a real-time pacer
pub struct Player {
    timeline: Timeline<FramePacer, SystemClock>,
    pacer: FramePacer,
    store: PropertyStore,
    completed: Rc<Cell<bool>>,
}

impl Player {
    pub fn new(file: &TimelineFile, fps: u32) -> Result<Self> {
        if fps == 0 {
            bail!("fps must be greater than zero");
        }

        let (store, variables) = PropertyStore::bind(file.tracks.clone());
        let pacer = FramePacer::new(fps);
        let mut timeline = Timeline::new(variables, pacer.clone(), SystemClock::new())?;

        let completed = Rc::new(Cell::new(false));
        let flag = completed.clone();
        timeline.add_listener(TimelineEvent::Completed, move || {
            tracing::info!("timeline completed");
            flag.set(true);
        });

        Ok(Self {
            timeline,
            pacer,
            store,
            completed,
        })
    }

    pub fn timeline(&self) -> &Timeline<FramePacer, SystemClock> {
        &self.timeline
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Current clock and property values
    pub fn sample(&self) -> Sample {
        Sample {
            timestamp_ms: self.timeline.timestamp(),
            values: self.store.snapshot(),
        }
    }

    pub fn seek(&mut self, timestamp_ms: f64) -> Sample {
        self.timeline.seek(timestamp_ms);
        self.sample()
    }

    /// Seek through `start..=end` in `step` increments
    pub fn sample_range(&mut self, start: f64, end: f64, step: f64) -> Result<Vec<Sample>> {
        if !(step > 0.0) || !step.is_finite() {
            bail!("step must be a positive number, got {step}");
        }
        if !start.is_finite() || !end.is_finite() || end < start {
            bail!("invalid range {start}..{end}");
        }

        // Relative slack keeps `end` when the ratio lands just under an integer
        let count = ((end - start) / step * (1.0 + 1e-12)).floor() + 1.0;
        if !count.is_finite() || count > MAX_SAMPLES as f64 {
            bail!("{start}..{end} in steps of {step} exceeds {MAX_SAMPLES} samples");
        }

        Ok((0..count as usize)
            .map(|i| self.seek((start + i as f64 * step).min(end)))
            .collect())
    }

    /// Play in real time until the timeline completes or reaches `pause_at`
    ///
    /// `on_frame` receives the frame number and a sample every
    /// `options.every` frames.
    pub fn play<F>(&mut self, options: PlayOptions, mut on_frame: F) -> PlayOutcome
    where
        F: FnMut(u64, Sample),
    {
        self.timeline.seek(options.from_ms);
        self.completed.set(false);
        self.timeline.play();
        tracing::info!(
            from_ms = options.from_ms,
            interval_ms = self.pacer.interval().as_secs_f64() * 1000.0,
            "playing"
        );

        let mut frames = 0;
        while self.pacer.wait_for_frame().is_some() {
            self.timeline.tick();
            frames += 1;

            if options.every > 0 && frames % options.every == 0 {
                on_frame(frames, self.sample());
            }

            if let Some(limit) = options.pause_at {
                if self.timeline.running() && self.timeline.timestamp() >= limit {
                    self.timeline.pause();
                    return PlayOutcome::Paused {
                        frames,
                        timestamp_ms: self.timeline.timestamp(),
                    };
                }
            }
        }

        let timestamp_ms = self.timeline.timestamp();
        if self.completed.get() {
            PlayOutcome::Completed {
                frames,
                timestamp_ms,
            }
        } else {
            PlayOutcome::Paused {
                frames,
                timestamp_ms,
            }
        }
    }
}
