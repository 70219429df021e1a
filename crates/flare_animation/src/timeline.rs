//! Timeline playback
//!
//! A timeline owns a set of compiled variables and one virtual clock shared
//! by all of them. It is either idle or running; while running it holds a
//! frame token from the host scheduler and advances on every [`Timeline::tick`].

use std::fmt;

use crate::error::Result;
use crate::events::{ListenerId, Listeners, TimelineEvent};
use crate::scheduler::{Clock, FrameScheduler, FrameToken};
use crate::variable::{CompiledVariable, TimelineVariable};

/// A seekable set of animated variables
pub struct Timeline<S: FrameScheduler, C: Clock> {
    variables: Vec<CompiledVariable>,
    timestamp: f64,
    /// Pending frame; `Some` while running
    frame: Option<FrameToken>,
    last_frame_at: f64,
    listeners: Listeners,
    scheduler: S,
    clock: C,
}

impl<S: FrameScheduler, C: Clock> Timeline<S, C> {
    /// Compile every variable up front; malformed keyframes fail here
    pub fn new(variables: Vec<TimelineVariable>, scheduler: S, clock: C) -> Result<Self> {
        let variables = variables
            .into_iter()
            .map(TimelineVariable::compile)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(variables = variables.len(), "timeline compiled");

        Ok(Self {
            variables,
            timestamp: 0.0,
            frame: None,
            last_frame_at: 0.0,
            listeners: Listeners::new(),
            scheduler,
            clock,
        })
    }

    /// Start advancing the clock in real time
    ///
    /// Does nothing while already running.
    pub fn play(&mut self) {
        if self.running() {
            return;
        }

        self.last_frame_at = self.clock.now_ms();
        self.frame = Some(self.scheduler.request_frame());
        tracing::debug!(timestamp = self.timestamp, "timeline play");
    }

    /// Stop advancing, keeping the current timestamp
    pub fn pause(&mut self) {
        if let Some(token) = self.frame.take() {
            self.scheduler.cancel_frame(token);
            tracing::debug!(timestamp = self.timestamp, "timeline pause");
        }
    }

    /// Jump to `timestamp` and write every variable immediately
    ///
    /// Works in both states and does not change whether the timeline is
    /// running. Non-finite timestamps are ignored.
    pub fn seek(&mut self, timestamp: f64) {
        if !timestamp.is_finite() {
            tracing::warn!(timestamp, "ignoring seek to non-finite timestamp");
            return;
        }

        self.timestamp = timestamp;
        self.apply();
        tracing::debug!(timestamp, "timeline seek");
    }

    pub fn running(&self) -> bool {
        self.frame.is_some()
    }

    /// Frame callback
    ///
    /// Advances the clock by the real time elapsed since the previous frame,
    /// writes every variable and either requests the next frame or, once all
    /// variables are past their end, goes idle and notifies listeners.
    /// Calling it while idle does nothing.
    pub fn tick(&mut self) {
        if self.frame.take().is_none() {
            return;
        }

        let now = self.clock.now_ms();
        let elapsed = (now - self.last_frame_at).max(0.0);
        self.last_frame_at = now;
        self.timestamp += elapsed;
        self.apply();

        tracing::trace!(timestamp = self.timestamp, elapsed, "timeline tick");

        if self.is_complete() {
            tracing::debug!(timestamp = self.timestamp, "timeline completed");
            self.listeners.notify();
        } else {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    /// Register a callback for `event`
    pub fn add_listener<F>(&mut self, event: TimelineEvent, listener: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        match event {
            TimelineEvent::Completed => self.listeners.add(listener),
        }
    }

    /// Unregister a callback; unknown ids are ignored
    pub fn remove_listener(&mut self, event: TimelineEvent, id: ListenerId) -> bool {
        match event {
            TimelineEvent::Completed => self.listeners.remove(id),
        }
    }

    /// Current position of the virtual clock in milliseconds
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Latest end time across all variables
    pub fn duration_ms(&self) -> f64 {
        self.variables
            .iter()
            .map(CompiledVariable::end_at)
            .fold(0.0, f64::max)
    }

    /// True once the clock is strictly past every variable's last interval
    pub fn is_complete(&self) -> bool {
        self.variables
            .iter()
            .all(|variable| variable.is_complete(self.timestamp))
    }

    pub fn variables(&self) -> &[CompiledVariable] {
        &self.variables
    }

    /// Evaluate variable `index` at `timestamp` without touching its target
    pub fn value_at(&self, index: usize, timestamp: f64) -> Option<f64> {
        self.variables
            .get(index)
            .map(|variable| variable.value_at(timestamp))
    }

    fn apply(&mut self) {
        let timestamp = self.timestamp;
        for variable in &mut self.variables {
            variable.apply(timestamp);
        }
    }
}

impl<S: FrameScheduler, C: Clock> Drop for Timeline<S, C> {
    fn drop(&mut self) {
        if let Some(token) = self.frame.take() {
            self.scheduler.cancel_frame(token);
        }
    }
}

impl<S: FrameScheduler, C: Clock> fmt::Debug for Timeline<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("variables", &self.variables)
            .field("timestamp", &self.timestamp)
            .field("frame", &self.frame)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
