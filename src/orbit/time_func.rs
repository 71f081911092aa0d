//! Time reparameterization: elapsed fraction -> normalized progress

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, ensure_finite};

/// Below this `|1 - 3t|` an `Ease2` curve has no defined cubic
const EASE2_EPSILON: f32 = 1e-6;

/// One point of a keyframe time curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Maps `elapsed / duration` to the progress value fed to the shape functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeFunc {
    #[default]
    Linear,
    /// Cubic `A p³ + B p² + C p` with C = coef, A = 2C - 2, B = -1.5A.
    ///
    /// `coef` is the slope at both ends: < 1 eases in and out, > 1 rushes the
    /// ends and slows through the middle. Always hits 0 at p=0 and 1 at p=1.
    Ease { coef: f32 },
    /// Cubic with C = coef, A = (1 - C) / (1 - 3t), B = -3At.
    ///
    /// `coef` is the slope at p=0 and the inflection point sits at p=`t`.
    Ease2 { coef: f32, t: f32 },
    /// Piecewise-linear curve through keyframes sorted by time
    Curve { keys: Vec<Keyframe> },
}

impl TimeFunc {
    pub fn ease(coef: f32) -> Self {
        TimeFunc::Ease { coef }
    }

    /// Build a keyframe curve, sorting the keys by time
    pub fn curve(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        TimeFunc::Curve { keys }
    }

    /// Check that every coefficient is finite and curve keys are in time order
    pub fn validate(&self) -> Result<()> {
        match self {
            TimeFunc::Linear => Ok(()),
            TimeFunc::Ease { coef } => {
                ensure_finite("coef", *coef)?;
                ensure_cubic(*coef, self.coefficients())
            }
            TimeFunc::Ease2 { coef, t } => {
                ensure_finite("coef", *coef)?;
                ensure_finite("t", *t)?;
                ensure_cubic(*coef, self.coefficients())
            }
            TimeFunc::Curve { keys } => {
                for key in keys {
                    ensure_finite("time", key.time)?;
                    ensure_finite("value", key.value)?;
                }
                match keys.windows(2).position(|w| w[1].time < w[0].time) {
                    Some(i) => Err(ConfigError::UnsortedKeyframes { index: i + 1 }),
                    None => Ok(()),
                }
            }
        }
    }

    /// Reparameterize normalized time
    pub fn apply(&self, p: f32) -> f32 {
        match self {
            TimeFunc::Curve { keys } => evaluate_curve(keys, p),
            _ => match self.coefficients() {
                Some((a, b, c)) => cubic(a, b, c, p),
                None => p,
            },
        }
    }

    /// `(A, B, C)` of the easing cubic, `None` when time stays linear
    fn coefficients(&self) -> Option<(f32, f32, f32)> {
        match *self {
            TimeFunc::Ease { coef: c } => {
                let a = 2.0 * c - 2.0;
                Some((a, -1.5 * a, c))
            }
            TimeFunc::Ease2 { coef: c, t } => {
                let denom = 1.0 - 3.0 * t;
                if denom.abs() < EASE2_EPSILON {
                    return None;
                }
                let a = (1.0 - c) / denom;
                Some((a, -3.0 * a * t, c))
            }
            TimeFunc::Linear | TimeFunc::Curve { .. } => None,
        }
    }
}

fn ensure_cubic(coef: f32, coefficients: Option<(f32, f32, f32)>) -> Result<()> {
    match coefficients {
        Some((a, b, _)) if !(a.is_finite() && b.is_finite()) => {
            Err(ConfigError::CubicOverflow { coef })
        }
        _ => Ok(()),
    }
}

#[inline]
fn cubic(a: f32, b: f32, c: f32, p: f32) -> f32 {
    let pp = p * p;
    a * pp * p + b * pp + c * p
}

fn evaluate_curve(keys: &[Keyframe], p: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return p;
    };
    if p <= first.time {
        return first.value;
    }
    if p >= last.time {
        return last.value;
    }

    keys.windows(2)
        .find(|w| p >= w[0].time && p <= w[1].time)
        .map(|w| {
            let span = w[1].time - w[0].time;
            if span <= 0.0 {
                w[1].value
            } else {
                let t = (p - w[0].time) / span;
                w[0].value + (w[1].value - w[0].value) * t
            }
        })
        .unwrap_or(last.value)
}
