//! Host scheduling primitives.
//!
//! [`Scheduler`] models the two services an animation host provides: a
//! one-shot "call me before the next frame" request and a cancelable
//! repeating interval timer. The host owns the clock and calls
//! [`Scheduler::poll`] with a monotonic timestamp; the scheduler answers with
//! the events that are due. Handles are never reused, so an event for a
//! canceled or replaced registration can always be recognized as stale.

use crate::types::{FrameHandle, IntervalHandle};

/// Shortest accepted interval period in ms.
pub const MIN_PERIOD_MS: f64 = 1.0;

/// Something the host should dispatch to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    Interval(IntervalHandle),
    Frame {
        handle: FrameHandle,
        timestamp_ms: f64,
    },
}

#[derive(Debug)]
struct IntervalTimer {
    handle: IntervalHandle,
    period_ms: f64,
    next_due_ms: f64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_handle: u64,
    intervals: Vec<IntervalTimer>,
    frames: Vec<FrameHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest timestamp seen by the scheduler.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Moves the clock forward to `now_ms`. Earlier timestamps are ignored.
    pub fn advance_clock(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    fn mint(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Registers a repeating timer, first due one period from now.
    ///
    /// Periods below [`MIN_PERIOD_MS`] (or NaN) are raised to it.
    pub fn set_interval(&mut self, period_ms: f64) -> IntervalHandle {
        let period_ms = period_ms.max(MIN_PERIOD_MS);
        let handle = IntervalHandle(self.mint());
        self.intervals.push(IntervalTimer {
            handle,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        handle
    }

    /// Cancels a repeating timer.
    ///
    /// ### Returns
    /// `true` if the timer was still registered.
    pub fn clear_interval(&mut self, handle: IntervalHandle) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|t| t.handle != handle);
        self.intervals.len() != before
    }

    /// Requests a single callback on the next [`Scheduler::poll`].
    pub fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.mint());
        self.frames.push(handle);
        handle
    }

    /// Withdraws a pending frame request.
    ///
    /// ### Returns
    /// `true` if the request was still pending.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|&h| h != handle);
        self.frames.len() != before
    }

    /// Collects every event due at `now_ms`.
    ///
    /// 1. Each interval whose deadline has passed yields one
    ///    [`HostEvent::Interval`]. Several missed periods collapse into a
    ///    single tick, and the next deadline is moved past `now_ms` on the
    ///    original period grid.
    /// 2. Every pending frame request yields one [`HostEvent::Frame`]
    ///    stamped with `now_ms` and is consumed. Frames requested while the
    ///    caller handles these events are delivered on the next poll.
    pub fn poll(&mut self, now_ms: f64) -> Vec<HostEvent> {
        self.advance_clock(now_ms);
        let now = self.now_ms;

        let mut events = Vec::with_capacity(self.intervals.len() + self.frames.len());

        for timer in &mut self.intervals {
            if timer.next_due_ms <= now {
                events.push(HostEvent::Interval(timer.handle));
                let missed = ((now - timer.next_due_ms) / timer.period_ms).floor() + 1.0;
                timer.next_due_ms += missed * timer.period_ms;
            }
        }

        events.extend(self.frames.drain(..).map(|handle| HostEvent::Frame {
            handle,
            timestamp_ms: now,
        }));

        events
    }

    /// Earliest time the host needs to poll again, if anything is pending.
    ///
    /// A pending frame request is due immediately.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        if !self.frames.is_empty() {
            return Some(self.now_ms);
        }
        self.intervals
            .iter()
            .map(|t| t.next_due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// `true` when nothing is registered.
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.intervals.is_empty()
    }
}
