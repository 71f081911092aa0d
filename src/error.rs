//! Configuration errors
//!
//! Pool operations have no failure modes: a storage's factory is a plain
//! `FnMut() -> T`, so it always produces an object. Only configuration input
//! is validated and reported here.

use thiserror::Error;

/// Errors raised while loading or validating spawner/orbit configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON or a document that doesn't match the schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A shape parameter that is NaN or infinite
    #[error("orbit parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    /// Random jump bounds in the wrong order
    #[error("random jump min {min} is greater than max {max}")]
    InvertedRange { min: f32, max: f32 },

    /// Warp threshold outside the normalized time range
    #[error("warp threshold {0} must be within 0.0..=1.0")]
    ThresholdOutOfRange(f32),

    /// Time function whose cubic coefficients overflow `f32`
    #[error("time function coefficient {coef} makes the easing cubic overflow")]
    CubicOverflow { coef: f32 },

    /// Keyframe curve not sorted by time
    #[error("keyframe {index} is earlier than the keyframe before it")]
    UnsortedKeyframes { index: usize },

    /// Negative or non-finite run duration
    #[error("orbit duration {0} must be a finite, non-negative number of seconds")]
    InvalidDuration(f32),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reject NaN/infinite parameters
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}
