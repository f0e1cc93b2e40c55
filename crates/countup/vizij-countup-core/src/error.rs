//! Configuration errors surfaced at construction time.

use thiserror::Error;

/// Largest `decimals` accepted; mirrors the fixed-point range hosts expect from
/// `Number.prototype.toFixed`.
pub const MAX_DECIMALS: i32 = 100;

/// Errors produced while validating an [`AnimationConfig`](crate::AnimationConfig).
/// An animator is never constructed from a config that fails validation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("decimals must be >= 0, got {0}")]
    NegativeDecimals(i32),
    #[error("decimals must be <= {max}, got {got}", max = MAX_DECIMALS)]
    DecimalsOutOfRange { got: i32 },
    #[error("{field} must be finite, got {value}")]
    NonFiniteBound { field: &'static str, value: f64 },
    #[error("duration must be a finite number of milliseconds, got {0}")]
    InvalidDuration(f64),
    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
