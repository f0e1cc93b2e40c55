//! Host-supplied configuration for a count-up run.
//!
//! Everything except the easing callback is serde-friendly so adapters can pass
//! partial JSON; missing keys fall back to the documented defaults.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::format::NumberFormat;

/// Text formatting options. Validated into a [`NumberFormat`] at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Fixed fractional digits. Negative values are rejected.
    pub decimals: i32,
    #[serde(alias = "decimal")]
    pub decimal_separator: String,
    /// Ignored when empty or when it parses as a number.
    #[serde(alias = "separator")]
    pub thousands_separator: String,
    pub prefix: String,
    pub suffix: String,
    /// When set, each output character is wrapped in this tag in the markup output.
    #[serde(alias = "child_element", alias = "childEle")]
    pub per_character_wrap: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 0,
            decimal_separator: ".".into(),
            thousands_separator: ",".into(),
            prefix: String::new(),
            suffix: String::new(),
            per_character_wrap: None,
        }
    }
}

impl FormatOptions {
    pub fn validate(&self) -> Result<NumberFormat, ConfigError> {
        NumberFormat::new(self)
    }
}

/// Configuration for one animator.
///
/// Defaults: `start = 0`, `end = 0`, `duration = 3000` ms, `autoplay = true`,
/// `use_easing = true` with [`Easing::ExpoOut`], and the [`FormatOptions`] defaults
/// (`"."` decimal separator, `","` thousands separator, no affixes, no wrapping).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub start: f64,
    pub end: f64,
    /// Milliseconds. `<= 0` completes immediately.
    pub duration: f64,
    /// Policy consulted by `mount`, `set_range` and `reconfigure`.
    pub autoplay: bool,
    #[serde(alias = "useEasing")]
    pub use_easing: bool,
    #[serde(skip)]
    pub easing: Easing,
    #[serde(flatten)]
    pub format: FormatOptions,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            duration: 3000.0,
            autoplay: true,
            use_easing: true,
            easing: Easing::default(),
            format: FormatOptions::default(),
        }
    }
}

impl AnimationConfig {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = duration_ms;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Enable easing with the given curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.use_easing = true;
        self.easing = easing;
        self
    }

    /// Disable easing; values move linearly with elapsed time.
    pub fn linear(mut self) -> Self {
        self.use_easing = false;
        self
    }

    pub fn with_decimals(mut self, decimals: i32) -> Self {
        self.format.decimals = decimals;
        self
    }

    pub fn with_separators(mut self, decimal: &str, thousands: &str) -> Self {
        self.format.decimal_separator = decimal.to_string();
        self.format.thousands_separator = thousands.to_string();
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.format.prefix = prefix.to_string();
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.format.suffix = suffix.to_string();
        self
    }

    pub fn with_per_character_wrap(mut self, tag: &str) -> Self {
        self.format.per_character_wrap = Some(tag.to_string());
        self
    }

    #[inline]
    pub fn counting_down(&self) -> bool {
        self.start > self.end
    }

    /// Check bounds and duration, and precompute the formatter.
    pub fn validate(&self) -> Result<NumberFormat, ConfigError> {
        if !self.start.is_finite() {
            return Err(ConfigError::NonFiniteBound {
                field: "start",
                value: self.start,
            });
        }
        if !self.end.is_finite() {
            return Err(ConfigError::NonFiniteBound {
                field: "end",
                value: self.end,
            });
        }
        if !self.duration.is_finite() {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        self.format.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AnimationConfig::default();
        assert_eq!(cfg.start, 0.0);
        assert_eq!(cfg.end, 0.0);
        assert_eq!(cfg.duration, 3000.0);
        assert!(cfg.autoplay);
        assert!(cfg.use_easing);
        assert_eq!(cfg.format.decimal_separator, ".");
        assert_eq!(cfg.format.thousands_separator, ",");
        assert!(cfg.format.per_character_wrap.is_none());
    }

    #[test]
    fn partial_json_uses_defaults_and_aliases() {
        let cfg = AnimationConfig::from_json(
            r#"{ "end": 2024, "decimals": 2, "decimal": ",", "separator": ".", "useEasing": false, "childEle": "b" }"#,
        )
        .unwrap();
        assert_eq!(cfg.end, 2024.0);
        assert_eq!(cfg.duration, 3000.0);
        assert!(!cfg.use_easing);
        assert_eq!(cfg.format.decimals, 2);
        assert_eq!(cfg.format.decimal_separator, ",");
        assert_eq!(cfg.format.thousands_separator, ".");
        assert_eq!(cfg.format.per_character_wrap.as_deref(), Some("b"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let err = AnimationConfig::new(0.0, 1.0)
            .with_decimals(-1)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::NegativeDecimals(-1));

        let err = AnimationConfig::new(f64::NAN, 1.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteBound { field: "start", .. }));

        let err = AnimationConfig::new(0.0, 1.0)
            .with_duration(f64::INFINITY)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration(_)));

        assert!(AnimationConfig::new(0.0, 1.0)
            .with_duration(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AnimationConfig::from_json("{ \"end\": \"lots\" }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
