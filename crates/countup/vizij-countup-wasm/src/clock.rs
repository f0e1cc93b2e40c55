//! Browser frame clock.
//!
//! Picks `requestAnimationFrame` when the window exposes it, falls back to
//! `setTimeout` paced by [`IntervalPacer`], and degrades to a headless clock
//! (frames delivered only through `VizijCountUp::tick`) when there is no window.

use std::rc::Rc;

use js_sys::{Date, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::console::warn_js;
use vizij_countup_core::{FrameClock, FrameHandle, HandleAllocator, IntervalPacer};

/// Callback invoked by the browser with the frame timestamp in milliseconds.
pub type FrameCallback = Closure<dyn FnMut(f64)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockKind {
    AnimationFrame,
    Timeout,
    Headless,
}

impl ClockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClockKind::AnimationFrame => "animation_frame",
            ClockKind::Timeout => "timeout",
            ClockKind::Headless => "headless",
        }
    }
}

pub struct WebClock {
    kind: ClockKind,
    window: Option<web_sys::Window>,
    ids: HandleAllocator,
    pacer: IntervalPacer,
    callback: Option<Rc<FrameCallback>>,
    /// Our handle paired with the browser's registration id.
    native: Vec<(FrameHandle, i32)>,
}

impl WebClock {
    /// Inspect the global scope and choose the best available scheduler.
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::headless();
        };
        let has_raf = Reflect::has(&window, &JsValue::from_str("requestAnimationFrame"))
            .unwrap_or(false);
        let kind = if has_raf {
            ClockKind::AnimationFrame
        } else {
            ClockKind::Timeout
        };
        Self {
            kind,
            window: Some(window),
            ids: HandleAllocator::new(),
            pacer: IntervalPacer::default(),
            callback: None,
            native: Vec::new(),
        }
    }

    /// Clock that never schedules anything with the browser.
    pub fn headless() -> Self {
        Self {
            kind: ClockKind::Headless,
            window: None,
            ids: HandleAllocator::new(),
            pacer: IntervalPacer::default(),
            callback: None,
            native: Vec::new(),
        }
    }

    pub fn kind(&self) -> ClockKind {
        self.kind
    }

    /// Install the browser-facing callback. Requests made before this are not
    /// scheduled with the browser.
    pub fn set_callback(&mut self, callback: Rc<FrameCallback>) {
        self.callback = Some(callback);
    }

    fn schedule(&mut self, window: &web_sys::Window, f: &Function) -> Result<i32, JsValue> {
        match self.kind {
            ClockKind::AnimationFrame => window.request_animation_frame(f),
            ClockKind::Timeout => {
                let (delay, fire_at) = self.pacer.schedule(Date::now());
                window.set_timeout_with_callback_and_timeout_and_arguments_1(
                    f,
                    delay as i32,
                    &JsValue::from_f64(fire_at),
                )
            }
            ClockKind::Headless => Err(JsValue::from_str("headless clock cannot schedule")),
        }
    }

    fn release(&mut self, handle: FrameHandle) {
        let Some(pos) = self.native.iter().position(|(h, _)| *h == handle) else {
            return;
        };
        let (_, id) = self.native.swap_remove(pos);
        let Some(window) = &self.window else {
            return;
        };
        match self.kind {
            ClockKind::AnimationFrame => {
                if let Err(err) = window.cancel_animation_frame(id) {
                    warn_js("cancelAnimationFrame failed", &err);
                }
            }
            ClockKind::Timeout => window.clear_timeout_with_handle(id),
            ClockKind::Headless => {}
        }
    }
}

impl FrameClock for WebClock {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.ids.alloc();
        let (Some(window), Some(callback)) = (self.window.clone(), self.callback.clone()) else {
            return handle;
        };
        let js: &JsValue = (*callback).as_ref();
        match self.schedule(&window, js.unchecked_ref()) {
            Ok(id) => self.native.push((handle, id)),
            Err(err) => warn_js(&format!("{} frame request failed", self.kind.as_str()), &err),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.release(handle);
    }

    // A frame can arrive through the browser or through a manual `tick`; in the
    // latter case the browser registration is still live and must be dropped.
    fn frame_delivered(&mut self, handle: FrameHandle) {
        self.release(handle);
    }
}

impl Drop for WebClock {
    fn drop(&mut self) {
        let handles: Vec<FrameHandle> = self.native.iter().map(|(h, _)| *h).collect();
        for handle in handles {
            self.release(handle);
        }
    }
}
