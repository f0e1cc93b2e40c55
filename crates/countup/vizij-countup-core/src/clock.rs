//! Frame clock contract and the clocks that need no platform support.
//!
//! The animator asks its clock for one frame at a time and cancels it on
//! pause/reset/dispose. Frame *delivery* belongs to the host: it calls
//! `Animator::tick(handle, timestamp)` when the registration comes due.
//!
//! - `HeadlessClock`: never delivers (server / non-interactive hosts).
//! - `ManualClock`: records registrations; tests and custom loops deliver them.
//! - `IntervalClock`: fixed ~60Hz pacing for hosts without a display-synced scheduler.

use std::fmt;
use std::time::Instant;

use crate::ids::{FrameHandle, HandleAllocator};

/// Frame period used when no display-synchronized scheduler exists.
pub const FALLBACK_FRAME_MS: f64 = 16.0;

/// Scheduler abstraction injected into an animator.
pub trait FrameClock {
    /// Register interest in the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a registration. A cancelled frame must not be delivered.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Called by the animator when it accepts a delivered frame.
    fn frame_delivered(&mut self, _handle: FrameHandle) {}
}

impl<C: FrameClock + ?Sized> FrameClock for Box<C> {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn frame_delivered(&mut self, handle: FrameHandle) {
        (**self).frame_delivered(handle)
    }
}

/// Issues handles and never delivers them.
#[derive(Debug, Default)]
pub struct HeadlessClock {
    ids: HandleAllocator,
}

impl HeadlessClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for HeadlessClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.ids.alloc()
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

/// Clock whose frames are delivered by hand. Keeps a ledger of registrations so
/// callers can assert that at most one frame is ever outstanding.
#[derive(Debug, Default)]
pub struct ManualClock {
    ids: HandleAllocator,
    outstanding: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations neither delivered nor cancelled.
    pub fn outstanding(&self) -> &[FrameHandle] {
        &self.outstanding
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.ids.alloc();
        self.outstanding.push(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(pos) = self.outstanding.iter().position(|h| *h == handle) {
            self.outstanding.swap_remove(pos);
            self.cancelled += 1;
        }
    }

    fn frame_delivered(&mut self, handle: FrameHandle) {
        self.outstanding.retain(|h| *h != handle);
    }
}

/// Fixed-interval pacing: each request fires no sooner than one interval after
/// the previous one, and immediately if the host is already late.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalPacer {
    interval: f64,
    last_time: f64,
}

impl Default for IntervalPacer {
    fn default() -> Self {
        Self::new(FALLBACK_FRAME_MS)
    }
}

impl IntervalPacer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval: interval_ms.max(0.0),
            last_time: 0.0,
        }
    }

    /// Returns `(delay, fire_at)` for a request made at `now`. The frame should be
    /// delivered after `delay` ms with `fire_at` as its timestamp.
    pub fn schedule(&mut self, now: f64) -> (f64, f64) {
        let delay = (self.interval - (now - self.last_time)).max(0.0);
        self.last_time = now + delay;
        (delay, now + delay)
    }
}

/// Native fallback clock built on [`IntervalPacer`]. The host polls
/// [`next_due`](IntervalClock::next_due), waits, then delivers the frame.
pub struct IntervalClock {
    ids: HandleAllocator,
    pacer: IntervalPacer,
    now: Box<dyn FnMut() -> f64>,
    pending: Vec<(FrameHandle, f64)>,
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalClock {
    /// Milliseconds measured from construction with `std::time::Instant`.
    pub fn new() -> Self {
        let epoch = Instant::now();
        Self::with_time_source(move || epoch.elapsed().as_secs_f64() * 1000.0)
    }

    pub fn with_time_source(now: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            ids: HandleAllocator::new(),
            pacer: IntervalPacer::default(),
            now: Box::new(now),
            pending: Vec::new(),
        }
    }

    pub fn with_interval(mut self, interval_ms: f64) -> Self {
        self.pacer = IntervalPacer::new(interval_ms);
        self
    }

    /// Current reading of the time source, in milliseconds.
    pub fn now(&mut self) -> f64 {
        (self.now)()
    }

    /// Earliest pending frame and the timestamp it should be delivered with.
    pub fn next_due(&self) -> Option<(FrameHandle, f64)> {
        self.pending
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn due_at(&self, handle: FrameHandle) -> Option<f64> {
        self.pending
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, at)| *at)
    }
}

impl fmt::Debug for IntervalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalClock")
            .field("pacer", &self.pacer)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl FrameClock for IntervalClock {
    fn request_frame(&mut self) -> FrameHandle {
        let now = (self.now)();
        let (_, fire_at) = self.pacer.schedule(now);
        let handle = self.ids.alloc();
        self.pending.push((handle, fire_at));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }

    fn frame_delivered(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }
}
