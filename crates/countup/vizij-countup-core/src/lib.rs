//! Vizij Count-Up Core (engine-agnostic)
//!
//! Animates a displayed number from `start` to `end` over a fixed duration and
//! renders each frame through a locale-style formatter. The crate is split into:
//! - `format`: pure number → text conversion (rounding, grouping, affixes, per-character markup)
//! - `easing`: easing curves, including the default exponential ease-out
//! - `clock`: the injected frame-clock contract plus headless/manual/interval clocks
//! - `animator`: the start/pause/resume/reset state machine driven by clock ticks
//! - `outputs`: per-call display updates and lifecycle events handed to the host
//!
//! Adapters (wasm, native loops) own the frame delivery and forward `Outputs` to the host.

pub mod animator;
pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod format;
pub mod ids;
pub mod outputs;

// Re-exports for consumers (adapters)
pub use animator::{Animator, Phase};
pub use clock::{
    FrameClock, HeadlessClock, IntervalClock, IntervalPacer, ManualClock, FALLBACK_FRAME_MS,
};
pub use config::{AnimationConfig, FormatOptions};
pub use easing::{expo_out, Easing};
pub use error::ConfigError;
pub use format::{format_number, wrap_per_character, NumberFormat};
pub use ids::{FrameHandle, HandleAllocator};
pub use outputs::{CountEvent, DisplayUpdate, Outputs};
