//! Frame scheduling and clocks
//!
//! Timelines never read the wall clock or talk to a display loop directly.
//! The host injects a [`FrameScheduler`] (how the next frame is requested)
//! and a [`Clock`] (what time it is), which lets headless hosts and tests
//! drive frames by hand.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Handle for a requested frame, used to cancel it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host-provided "call me on the next frame" primitive
///
/// After `request_frame` returns, the host is expected to call
/// [`Timeline::tick`](crate::Timeline::tick) once when that frame comes due,
/// unless the token was cancelled first.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time measured from the moment the clock was created
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a timeline.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, dt_ms: f64) {
        self.now.set(self.now.get() + dt_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    next_token: u64,
    pending: Vec<FrameToken>,
    requested: u64,
    cancelled: u64,
}

/// Records frame requests instead of waiting for a display
///
/// The host polls [`ManualScheduler::take_frame`] and calls `tick` whenever
/// it returns a token. Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest pending frame, if any
    pub fn take_frame(&self) -> Option<FrameToken> {
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            None
        } else {
            Some(state.pending.remove(0))
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.state.borrow().pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Total frames ever requested
    pub fn requested_count(&self) -> u64 {
        self.state.borrow().requested
    }

    /// Total frames cancelled while still pending
    pub fn cancelled_count(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut state = self.state.borrow_mut();
        let token = FrameToken(state.next_token);
        state.next_token += 1;
        state.requested += 1;
        state.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.state.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|pending| *pending != token);
        if state.pending.len() != before {
            state.cancelled += 1;
        }
    }
}
