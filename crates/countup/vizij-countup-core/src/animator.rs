//! Animator: timing state machine + per-tick value mapping.
//!
//! States: `Idle → Running ⇄ Paused`, `Running → Finished`, any state `→ Idle` via reset.
//! Each run snapshots `local_start`/`local_duration` on start/resume only; ticks read them.
//! The first delivered frame of a run anchors elapsed time, not the call to `start`.

use tracing::{debug, trace, warn};

use crate::clock::{FrameClock, HeadlessClock};
use crate::config::AnimationConfig;
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::format::NumberFormat;
use crate::ids::FrameHandle;
use crate::outputs::{CountEvent, DisplayUpdate, Outputs};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Mutable per-run state, owned by the animator.
#[derive(Clone, Debug)]
struct RunState {
    phase: Phase,
    local_start: f64,
    local_duration: f64,
    start_timestamp: Option<f64>,
    /// Largest elapsed time seen this run; later ticks never go below it.
    last_elapsed: f64,
    current_value: f64,
    remaining: f64,
    scheduled: Option<FrameHandle>,
}

impl RunState {
    fn idle(cfg: &AnimationConfig) -> Self {
        Self {
            phase: Phase::Idle,
            local_start: cfg.start,
            local_duration: cfg.duration,
            start_timestamp: None,
            last_elapsed: 0.0,
            current_value: cfg.start,
            remaining: cfg.duration,
            scheduled: None,
        }
    }
}

/// Count-up animator driven by an injected [`FrameClock`].
///
/// Commands and ticks return `&Outputs` describing what changed during that call;
/// the latest text stays available through [`display_value`](Animator::display_value).
#[derive(Debug)]
pub struct Animator<C: FrameClock = HeadlessClock> {
    cfg: AnimationConfig,
    format: NumberFormat,
    clock: C,
    state: RunState,
    display: String,
    markup: String,
    outputs: Outputs,
}

impl<C: FrameClock> Animator<C> {
    /// Validate `cfg` and build an idle animator showing `format(start)`.
    pub fn new(cfg: AnimationConfig, clock: C) -> Result<Self, ConfigError> {
        let format = cfg.validate()?;
        let display = format.format(cfg.start);
        let markup = format.render(&display);
        Ok(Self {
            state: RunState::idle(&cfg),
            cfg,
            format,
            clock,
            display,
            markup,
            outputs: Outputs::default(),
        })
    }

    // ---- observation ----

    #[inline]
    pub fn display_value(&self) -> &str {
        &self.display
    }

    /// Display text with per-character wrapping applied (if configured).
    #[inline]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[inline]
    pub fn current_value(&self) -> f64 {
        self.state.current_value
    }

    /// Time left in the current run as of the last tick.
    #[inline]
    pub fn remaining(&self) -> f64 {
        self.state.remaining
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state.phase == Phase::Paused
    }

    #[inline]
    pub fn is_counting_down(&self) -> bool {
        self.cfg.counting_down()
    }

    /// Frame this animator is waiting for, if any.
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.state.scheduled
    }

    #[inline]
    pub fn config(&self) -> &AnimationConfig {
        &self.cfg
    }

    #[inline]
    pub fn number_format(&self) -> &NumberFormat {
        &self.format
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Last outputs produced, without running anything.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // ---- commands ----

    /// Initial autoplay hook: starts a run when the config's autoplay policy is set.
    pub fn mount(&mut self) -> &Outputs {
        if self.cfg.autoplay {
            return self.start();
        }
        self.outputs.clear();
        &self.outputs
    }

    /// (Re)arm a run from `start` with the full duration, cancelling any run in flight.
    pub fn start(&mut self) -> &Outputs {
        self.outputs.clear();
        self.cancel_pending();
        self.state.local_start = self.cfg.start;
        self.state.local_duration = self.cfg.duration;
        self.state.current_value = self.cfg.start;
        self.state.remaining = self.cfg.duration;
        self.state.start_timestamp = None;
        self.state.last_elapsed = 0.0;
        debug!(
            from = self.cfg.start,
            to = self.cfg.end,
            duration = self.cfg.duration,
            "countup start"
        );
        self.outputs.push_event(CountEvent::Started {
            from: self.cfg.start,
            to: self.cfg.end,
            duration: self.cfg.duration,
        });
        self.arm();
        &self.outputs
    }

    /// Stop ticking while keeping the last value and remaining time. Only while running.
    pub fn pause(&mut self) -> &Outputs {
        self.outputs.clear();
        if self.state.phase != Phase::Running {
            trace!(phase = ?self.state.phase, "pause ignored");
            return &self.outputs;
        }
        self.cancel_pending();
        self.state.phase = Phase::Paused;
        debug!(
            value = self.state.current_value,
            remaining = self.state.remaining,
            "countup paused"
        );
        self.outputs.push_event(CountEvent::Paused {
            value: self.state.current_value,
            remaining: self.state.remaining,
        });
        &self.outputs
    }

    /// Continue from the paused value over the remaining time. Only while paused.
    pub fn resume(&mut self) -> &Outputs {
        self.outputs.clear();
        if self.state.phase != Phase::Paused {
            trace!(phase = ?self.state.phase, "resume ignored");
            return &self.outputs;
        }
        self.state.local_duration = self.state.remaining;
        self.state.local_start = self.state.current_value;
        self.state.start_timestamp = None;
        self.state.last_elapsed = 0.0;
        debug!(
            value = self.state.local_start,
            remaining = self.state.local_duration,
            "countup resumed"
        );
        self.outputs.push_event(CountEvent::Resumed {
            value: self.state.local_start,
            remaining: self.state.local_duration,
        });
        self.arm();
        &self.outputs
    }

    /// Pause when running, resume when paused; nothing otherwise.
    pub fn pause_resume(&mut self) -> &Outputs {
        match self.state.phase {
            Phase::Paused => self.resume(),
            Phase::Running => self.pause(),
            Phase::Idle | Phase::Finished => {
                self.outputs.clear();
                &self.outputs
            }
        }
    }

    /// Cancel any run and show `format(start)` again.
    pub fn reset(&mut self) -> &Outputs {
        self.outputs.clear();
        self.cancel_pending();
        self.state = RunState::idle(&self.cfg);
        debug!(value = self.cfg.start, "countup reset");
        self.publish(self.cfg.start);
        self.outputs
            .push_event(CountEvent::Reset { value: self.cfg.start });
        &self.outputs
    }

    /// Cancel the pending frame, if any. Also performed on drop.
    pub fn dispose(&mut self) {
        self.cancel_pending();
    }

    /// Replace the bounds. Restarts when autoplay is set; otherwise an idle animator
    /// re-renders the new `start` and an active run heads for the new `end`.
    pub fn set_range(&mut self, start: f64, end: f64) -> Result<&Outputs, ConfigError> {
        let mut cfg = self.cfg.clone();
        cfg.start = start;
        cfg.end = end;
        self.reconfigure(cfg)
    }

    /// Swap the whole config. Validation failures leave the animator untouched.
    pub fn reconfigure(&mut self, cfg: AnimationConfig) -> Result<&Outputs, ConfigError> {
        let format = cfg.validate()?;
        self.cfg = cfg;
        self.format = format;
        if self.cfg.autoplay {
            return Ok(self.start());
        }
        self.outputs.clear();
        if self.state.phase == Phase::Idle {
            self.state = RunState::idle(&self.cfg);
            self.publish(self.cfg.start);
        }
        Ok(&self.outputs)
    }

    /// Swap the easing curve in place. Takes effect on the next tick; the run is
    /// neither restarted nor re-anchored. `None` switches to linear interpolation.
    pub fn set_easing(&mut self, easing: Option<Easing>) {
        match easing {
            Some(easing) => {
                self.cfg.use_easing = true;
                self.cfg.easing = easing;
            }
            None => self.cfg.use_easing = false,
        }
        debug!(easing = ?self.cfg.easing, use_easing = self.cfg.use_easing, "easing changed");
    }

    // ---- ticking ----

    /// Deliver a frame. Frames other than the one currently scheduled (cancelled or
    /// stale) are ignored.
    pub fn tick(&mut self, frame: FrameHandle, timestamp: f64) -> &Outputs {
        self.outputs.clear();
        if self.state.scheduled != Some(frame) {
            trace!(?frame, "ignoring frame that is not scheduled");
            return &self.outputs;
        }
        self.state.scheduled = None;
        self.clock.frame_delivered(frame);

        let anchor = *self.state.start_timestamp.get_or_insert(timestamp);
        let elapsed = (timestamp - anchor).max(self.state.last_elapsed);
        self.state.last_elapsed = elapsed;
        self.state.remaining = self.state.local_duration - elapsed;

        let done = elapsed >= self.state.local_duration;
        let value = if done {
            self.cfg.end
        } else {
            self.clamp(self.raw_value(elapsed))
        };
        self.state.current_value = value;
        trace!(elapsed, value, "countup tick");
        self.publish(value);

        if done {
            self.finish();
        } else {
            self.state.scheduled = Some(self.clock.request_frame());
        }
        &self.outputs
    }

    fn raw_value(&self, elapsed: f64) -> f64 {
        let s = &self.state;
        let end = self.cfg.end;
        let down = self.cfg.counting_down();
        let linear = if down {
            s.local_start - (s.local_start - end) * (elapsed / s.local_duration)
        } else {
            s.local_start + (end - s.local_start) * (elapsed / s.local_duration)
        };
        if !self.cfg.use_easing {
            return linear;
        }
        let eased = if down {
            s.local_start
                - self
                    .cfg
                    .easing
                    .apply(elapsed, 0.0, s.local_start - end, s.local_duration)
        } else {
            self.cfg
                .easing
                .apply(elapsed, s.local_start, end - s.local_start, s.local_duration)
        };
        if eased.is_finite() {
            eased
        } else {
            warn!(elapsed, eased, "easing produced a non-finite value; using linear");
            linear
        }
    }

    fn clamp(&self, raw: f64) -> f64 {
        if self.cfg.counting_down() {
            raw.max(self.cfg.end)
        } else {
            raw.min(self.cfg.end)
        }
    }

    /// Enter `Running` and request a frame, or complete at once when there is no
    /// time left to animate over.
    fn arm(&mut self) {
        if self.state.local_duration > 0.0 {
            self.state.phase = Phase::Running;
            self.state.scheduled = Some(self.clock.request_frame());
            return;
        }
        debug!(
            duration = self.state.local_duration,
            "non-positive duration; jumping to end"
        );
        self.state.current_value = self.cfg.end;
        self.state.remaining = 0.0;
        self.publish(self.cfg.end);
        self.finish();
    }

    fn finish(&mut self) {
        self.state.phase = Phase::Finished;
        debug!(value = self.state.current_value, "countup finished");
        self.outputs.push_event(CountEvent::Finished {
            value: self.state.current_value,
        });
    }

    fn publish(&mut self, value: f64) {
        self.display = self.format.format(value);
        self.markup = self.format.render(&self.display);
        self.outputs.set_display(DisplayUpdate {
            value,
            text: self.display.clone(),
            markup: self.markup.clone(),
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.state.scheduled.take() {
            trace!(?handle, "cancelling pending frame");
            self.clock.cancel_frame(handle);
        }
    }
}

impl<C: FrameClock> Drop for Animator<C> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
