use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_countup_core::{AnimationConfig, Animator, CountEvent, Easing, Outputs};

mod clock;
mod console;

pub use clock::{ClockKind, FrameCallback, WebClock};
use console::{warn_js, warn_msg};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_config(config: JsValue) -> Result<AnimationConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(AnimationConfig::default());
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
}

#[derive(Clone, Default)]
struct HostCallbacks {
    on_update: Option<Function>,
    on_finish: Option<Function>,
    on_event: Option<Function>,
}

impl HostCallbacks {
    fn dispatch(&self, out: &Outputs) {
        if let (Some(f), Some(d)) = (&self.on_update, &out.display) {
            let r = f.call3(
                &JsValue::UNDEFINED,
                &JsValue::from_str(&d.text),
                &JsValue::from_str(&d.markup),
                &JsValue::from_f64(d.value),
            );
            if let Err(err) = r {
                warn_js("on_update callback threw", &err);
            }
        }
        for event in &out.events {
            if let Some(f) = &self.on_event {
                match swb::to_value(event) {
                    Ok(v) => {
                        if let Err(err) = f.call1(&JsValue::UNDEFINED, &v) {
                            warn_js("on_event callback threw", &err);
                        }
                    }
                    Err(err) => warn_msg(&format!("event serialization failed: {err}")),
                }
            }
            if let (Some(f), CountEvent::Finished { .. }) = (&self.on_finish, event) {
                if let Err(err) = f.call0(&JsValue::UNDEFINED) {
                    warn_js("on_finish callback threw", &err);
                }
            }
        }
    }
}

struct Shared {
    animator: RefCell<Animator<WebClock>>,
    callbacks: RefCell<HostCallbacks>,
}

impl Shared {
    /// Run `f` against the animator, then hand its outputs to the host with no
    /// borrow held, so callbacks may call back into the counter.
    fn run<F>(&self, f: F) -> Result<Outputs, JsError>
    where
        F: FnOnce(&mut Animator<WebClock>) -> Result<Outputs, JsError>,
    {
        let out = {
            let mut animator = self
                .animator
                .try_borrow_mut()
                .map_err(|_| JsError::new("counter is busy (re-entrant call from a frame)"))?;
            f(&mut animator)?
        };
        let callbacks = self.callbacks.borrow().clone();
        callbacks.dispatch(&out);
        Ok(out)
    }

    /// Browser frame entry point: deliver `timestamp` to whichever frame is pending.
    fn on_frame(&self, timestamp: f64) {
        let r = self.run(|a| {
            Ok(match a.pending_frame() {
                Some(frame) => a.tick(frame, timestamp).clone(),
                None => Outputs::default(),
            })
        });
        if r.is_err() {
            warn_msg(&format!(
                "dropped frame at {timestamp} while the counter was borrowed"
            ));
        }
    }
}

fn js_easing(f: Function) -> Easing {
    Easing::custom(move |t, b, c, d| {
        let args = Array::of4(
            &JsValue::from_f64(t),
            &JsValue::from_f64(b),
            &JsValue::from_f64(c),
            &JsValue::from_f64(d),
        );
        // Anything but a number becomes NaN, which the animator replaces with linear.
        f.apply(&JsValue::UNDEFINED, &args)
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    })
}

#[wasm_bindgen]
pub struct VizijCountUp {
    shared: Rc<Shared>,
}

impl VizijCountUp {
    fn build(cfg: AnimationConfig, clock: WebClock) -> Result<VizijCountUp, JsError> {
        let animator = Animator::new(cfg, clock)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        let shared = Rc::new(Shared {
            animator: RefCell::new(animator),
            callbacks: RefCell::new(HostCallbacks::default()),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let callback: FrameCallback = Closure::new(move |timestamp: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(timestamp);
            }
        });
        shared
            .animator
            .borrow_mut()
            .clock_mut()
            .set_callback(Rc::new(callback));

        Ok(VizijCountUp { shared })
    }

    fn command<F>(&self, f: F) -> Result<JsValue, JsError>
    where
        F: FnOnce(&mut Animator<WebClock>) -> Result<Outputs, JsError>,
    {
        let out = self.shared.run(f)?;
        swb::to_value(&out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }
}

#[wasm_bindgen]
impl VizijCountUp {
    /// Create a counter. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijCountUp({ end: 2024, duration: 1500, separator: " " })
    ///
    /// Nothing runs until `mount()` (autoplay) or `start()`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijCountUp, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        Self::build(cfg, WebClock::detect())
    }

    /// Create a counter that never schedules browser frames; drive it with `tick`.
    #[wasm_bindgen(js_name = headless)]
    pub fn headless(config: JsValue) -> Result<VizijCountUp, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        Self::build(cfg, WebClock::headless())
    }

    /// `on_update(text, markup, value)` is called whenever the display changes.
    #[wasm_bindgen(js_name = on_update)]
    pub fn on_update(&self, f: Option<Function>) {
        self.shared.callbacks.borrow_mut().on_update = f;
    }

    /// `on_finish()` is called once per completed run.
    #[wasm_bindgen(js_name = on_finish)]
    pub fn on_finish(&self, f: Option<Function>) {
        self.shared.callbacks.borrow_mut().on_finish = f;
    }

    /// `on_event(event)` receives every lifecycle event as `{ type, ... }`.
    #[wasm_bindgen(js_name = on_event)]
    pub fn on_event(&self, f: Option<Function>) {
        self.shared.callbacks.borrow_mut().on_event = f;
    }

    /// Replace the easing with `f(t, b, c, d) -> number`; null/undefined switches to linear.
    #[wasm_bindgen(js_name = set_easing)]
    pub fn set_easing(&self, f: JsValue) -> Result<(), JsError> {
        let easing = if jsvalue_is_undefined_or_null(&f) {
            None
        } else {
            let func: Function = f
                .dyn_into()
                .map_err(|_| JsError::new("set_easing: expected a function"))?;
            Some(js_easing(func))
        };
        self.shared
            .animator
            .try_borrow_mut()
            .map_err(|_| JsError::new("set_easing: counter is busy"))?
            .set_easing(easing);
        Ok(())
    }

    /// Start when the config's autoplay flag is set. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn mount(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.mount().clone()))
    }

    #[wasm_bindgen]
    pub fn start(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.start().clone()))
    }

    #[wasm_bindgen]
    pub fn pause(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.pause().clone()))
    }

    #[wasm_bindgen]
    pub fn resume(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.resume().clone()))
    }

    #[wasm_bindgen(js_name = pause_resume)]
    pub fn pause_resume(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.pause_resume().clone()))
    }

    #[wasm_bindgen]
    pub fn reset(&self) -> Result<JsValue, JsError> {
        self.command(|a| Ok(a.reset().clone()))
    }

    /// Cancel any pending frame. The counter stays usable.
    #[wasm_bindgen]
    pub fn dispose(&self) -> Result<(), JsError> {
        self.shared
            .animator
            .try_borrow_mut()
            .map_err(|_| JsError::new("dispose: counter is busy"))?
            .dispose();
        Ok(())
    }

    /// Replace start/end; restarts when autoplay is set. Returns Outputs JSON.
    #[wasm_bindgen(js_name = set_range)]
    pub fn set_range(&self, start: f64, end: f64) -> Result<JsValue, JsError> {
        self.command(|a| {
            a.set_range(start, end)
                .map(Outputs::clone)
                .map_err(|e| JsError::new(&format!("set_range error: {e}")))
        })
    }

    /// Deliver the pending frame by hand at `timestamp` (ms). Returns Outputs JSON,
    /// empty when no frame is pending.
    #[wasm_bindgen]
    pub fn tick(&self, timestamp: f64) -> Result<JsValue, JsError> {
        self.command(|a| {
            Ok(match a.pending_frame() {
                Some(frame) => a.tick(frame, timestamp).clone(),
                None => Outputs::default(),
            })
        })
    }

    #[wasm_bindgen(js_name = display_value)]
    pub fn display_value(&self) -> String {
        self.shared.animator.borrow().display_value().to_string()
    }

    #[wasm_bindgen]
    pub fn markup(&self) -> String {
        self.shared.animator.borrow().markup().to_string()
    }

    /// "animation_frame", "timeout" or "headless".
    #[wasm_bindgen(js_name = clock_kind)]
    pub fn clock_kind(&self) -> String {
        self.shared
            .animator
            .borrow()
            .clock()
            .kind()
            .as_str()
            .to_string()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
