//! Easing curves in `(elapsed, base, delta, duration) -> value` form.
//!
//! Every curve must satisfy `f(0, b, c, d) == b` and `f(d, b, c, d) == b + c`;
//! the animator clamps against `end` each tick, so overshooting curves are tolerated.

use std::fmt;
use std::rc::Rc;

/// Host-supplied easing callback.
pub type EasingFn = dyn Fn(f64, f64, f64, f64) -> f64;

/// Exponential ease-out. The 1024/1023 factor lands `f(d)` exactly on `b + c`
/// instead of approaching it asymptotically.
#[inline]
pub fn expo_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (1.0 - 2f64.powf(-10.0 * t / d)) * 1024.0 / 1023.0 + b
}

/// Easing used when `use_easing` is set.
#[derive(Clone, Default)]
pub enum Easing {
    #[default]
    ExpoOut,
    Custom(Rc<EasingFn>),
}

impl Easing {
    pub fn custom(f: impl Fn(f64, f64, f64, f64) -> f64 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    #[inline]
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Easing::ExpoOut => expo_out(t, b, c, d),
            Easing::Custom(f) => f(t, b, c, d),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::ExpoOut => f.write_str("ExpoOut"),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expo_out_hits_both_endpoints() {
        assert_eq!(expo_out(0.0, 10.0, 90.0, 1000.0), 10.0);
        assert!((expo_out(1000.0, 10.0, 90.0, 1000.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn expo_out_is_front_loaded() {
        let half = expo_out(500.0, 0.0, 100.0, 1000.0);
        assert!(half > 95.0 && half < 100.0, "half={half}");
    }

    #[test]
    fn custom_easing_is_invoked() {
        let e = Easing::custom(|t, b, c, d| b + c * (t / d) * (t / d));
        assert_eq!(e.apply(5.0, 0.0, 100.0, 10.0), 25.0);
        assert_eq!(format!("{e:?}"), "Custom(..)");
    }
}
