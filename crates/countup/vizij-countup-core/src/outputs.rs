//! Output contracts from the animator.
//!
//! Every command and tick returns the display change (if any) produced by that
//! call and the lifecycle events it raised. Adapters forward both to the host.

use serde::{Deserialize, Serialize};

/// New host-visible text for the counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    /// Clamped numeric value the text was formatted from.
    pub value: f64,
    pub text: String,
    /// `text` with per-character wrapping applied; equals `text` when wrapping is off.
    pub markup: String,
}

/// Discrete lifecycle signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CountEvent {
    Started {
        from: f64,
        to: f64,
        duration: f64,
    },
    Paused {
        value: f64,
        remaining: f64,
    },
    Resumed {
        value: f64,
        remaining: f64,
    },
    Reset {
        value: f64,
    },
    /// Raised once per completed run.
    Finished {
        value: f64,
    },
}

/// Outputs returned by every `Animator` command and tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub display: Option<DisplayUpdate>,
    #[serde(default)]
    pub events: Vec<CountEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.display = None;
        self.events.clear();
    }

    #[inline]
    pub fn set_display(&mut self, update: DisplayUpdate) {
        self.display = Some(update);
    }

    #[inline]
    pub fn push_event(&mut self, event: CountEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.display.is_none() && self.events.is_empty()
    }

    /// True when this call completed the run.
    pub fn finished(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, CountEvent::Finished { .. }))
    }

    /// Text published by this call, if any.
    pub fn text(&self) -> Option<&str> {
        self.display.as_ref().map(|d| d.text.as_str())
    }
}
