//! Trajectory shapes
//!
//! Every sample of a run is `origin + tangent + normal`, where the tangent runs
//! along the edge direction and the normal is perpendicular to it (or vertical,
//! for the jump shapes). Each shape is a pair of tangent/normal functions of
//! normalized progress `p`.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::axis;
use super::edge::OrbitEdge;
use crate::error::{ConfigError, Result, ensure_finite};
use crate::random;

/// Which way the normal contribution should point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalPriority {
    /// Flip with 50% chance, decided once per run
    Random,
    Left,
    Right,
    Up,
    Down,
    /// Leave the shape's normal as computed
    #[default]
    None,
}

impl NormalPriority {
    /// Flip `vec` if it disagrees with the requested side.
    ///
    /// `Random` is handled per run by the caller, so it leaves `vec` alone here.
    pub fn adjust(self, vec: Vec2) -> Vec2 {
        match self {
            NormalPriority::Left if vec.x > 0.0 => -vec,
            NormalPriority::Right if vec.x < 0.0 => -vec,
            NormalPriority::Up if vec.y < 0.0 => -vec,
            NormalPriority::Down if vec.y > 0.0 => -vec,
            _ => vec,
        }
    }
}

/// Per-run value chosen once when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OrbitOption {
    #[default]
    None,
    /// Jump height drawn for a [`OrbitShape::RandomJump`] run
    JumpHeight(f32),
}

impl OrbitOption {
    fn jump_height(self) -> f32 {
        match self {
            OrbitOption::JumpHeight(h) => h,
            OrbitOption::None => 0.0,
        }
    }
}

/// The closed set of trajectory shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitShape {
    /// Straight line
    #[default]
    Direct,
    /// Arc bulging `coef` * 0.25 off the line at the midpoint
    Parabola { coef: f32 },
    /// Vertical hop of `height` * 0.25 at the midpoint, regardless of travel direction
    Jump { height: f32 },
    /// `hz` full sine cycles across the line
    Wave { amplitude: f32, hz: f32 },
    /// Stay put until progress reaches `threshold`, then snap to the destination
    Warp { threshold: f32 },
    /// Like `Jump`, with the height drawn from `min..=max` once per run
    RandomJump { min: f32, max: f32 },
    /// Spiral onto the destination, `rotations` turns
    Rotate { rotations: f32 },
}

impl OrbitShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitShape::Direct => "direct",
            OrbitShape::Parabola { .. } => "parabola",
            OrbitShape::Jump { .. } => "jump",
            OrbitShape::Wave { .. } => "wave",
            OrbitShape::Warp { .. } => "warp",
            OrbitShape::RandomJump { .. } => "random_jump",
            OrbitShape::Rotate { .. } => "rotate",
        }
    }

    /// Check parameters are usable
    pub fn validate(&self) -> Result<()> {
        match *self {
            OrbitShape::Direct => Ok(()),
            OrbitShape::Parabola { coef } => ensure_finite("coef", coef),
            OrbitShape::Jump { height } => ensure_finite("height", height),
            OrbitShape::Wave { amplitude, hz } => {
                ensure_finite("amplitude", amplitude)?;
                ensure_finite("hz", hz)
            }
            OrbitShape::Warp { threshold } => {
                ensure_finite("threshold", threshold)?;
                if (0.0..=1.0).contains(&threshold) {
                    Ok(())
                } else {
                    Err(ConfigError::ThresholdOutOfRange(threshold))
                }
            }
            OrbitShape::RandomJump { min, max } => {
                ensure_finite("min", min)?;
                ensure_finite("max", max)?;
                if min > max {
                    Err(ConfigError::InvertedRange { min, max })
                } else {
                    Ok(())
                }
            }
            OrbitShape::Rotate { rotations } => ensure_finite("rotations", rotations),
        }
    }

    /// Draw the per-run option
    pub fn create_option<R: Rng + ?Sized>(&self, rng: &mut R) -> OrbitOption {
        match *self {
            OrbitShape::RandomJump { min, max } => {
                OrbitOption::JumpHeight(random::range(rng, min, max))
            }
            _ => OrbitOption::None,
        }
    }

    /// Where the tangent and normal are measured from
    #[inline]
    pub fn origin(&self, edge: &OrbitEdge, _last: Vec2, _p: f32) -> Vec2 {
        edge.start()
    }

    /// Displacement along the travel direction
    pub fn tangent(&self, edge: &OrbitEdge, _last: Vec2, p: f32, _option: OrbitOption) -> Vec2 {
        match *self {
            OrbitShape::Warp { threshold } => {
                if p < threshold {
                    Vec2::ZERO
                } else {
                    edge.direction()
                }
            }
            OrbitShape::Rotate { .. } => {
                let x = -edge.direction();
                Self::spiral_radius(p) * (p * self.theta()).cos() * x - x
            }
            _ => edge.direction() * p,
        }
    }

    /// Displacement perpendicular to travel, before priority adjustment
    pub fn normal(&self, edge: &OrbitEdge, _last: Vec2, p: f32, option: OrbitOption) -> Vec2 {
        match *self {
            OrbitShape::Direct | OrbitShape::Warp { .. } => Vec2::ZERO,
            OrbitShape::Parabola { coef } => edge.normalized_normal() * coef * axis::parabola_up(p),
            OrbitShape::Jump { height } => Vec2::Y * height * axis::parabola_up(p),
            OrbitShape::Wave { amplitude, hz } => {
                let a = amplitude * (hz * p * TAU).sin();
                edge.normalized_normal() * a
            }
            OrbitShape::RandomJump { .. } => {
                Vec2::Y * axis::parabola_up(p) * option.jump_height()
            }
            OrbitShape::Rotate { .. } => {
                // direction is negated in the tangent, so take the counter-clockwise
                // normal to keep the spiral turning clockwise
                edge.counter_clockwise_normal() * Self::spiral_radius(p) * (p * self.theta()).sin()
            }
        }
    }

    /// Total sweep angle of a `Rotate` shape
    fn theta(&self) -> f32 {
        match *self {
            OrbitShape::Rotate { rotations } => TAU * rotations,
            _ => 0.0,
        }
    }

    #[inline]
    fn spiral_radius(p: f32) -> f32 {
        1.0 - p
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn edge() -> OrbitEdge {
        OrbitEdge::constant(Vec2::ZERO, Vec2::new(10.0, 0.0))
    }

    #[test]
    fn test_priority_adjust() {
        let v = Vec2::new(1.0, -2.0);
        assert_eq!(NormalPriority::Left.adjust(v), -v);
        assert_eq!(NormalPriority::Right.adjust(v), v);
        assert_eq!(NormalPriority::Up.adjust(v), -v);
        assert_eq!(NormalPriority::Down.adjust(v), v);
        assert_eq!(NormalPriority::None.adjust(v), v);
        assert_eq!(NormalPriority::Random.adjust(v), v);
    }

    #[test]
    fn test_direct() {
        let s = OrbitShape::Direct;
        let e = edge();
        assert_eq!(s.tangent(&e, Vec2::ZERO, 0.3, OrbitOption::None), Vec2::new(3.0, 0.0));
        assert_eq!(s.normal(&e, Vec2::ZERO, 0.3, OrbitOption::None), Vec2::ZERO);
    }

    #[test]
    fn test_parabola_peak() {
        let s = OrbitShape::Parabola { coef: 4.0 };
        let n = s.normal(&edge(), Vec2::ZERO, 0.5, OrbitOption::None);
        // clockwise normal of +x is -y
        assert!(n.abs_diff_eq(Vec2::new(0.0, -1.0), 1e-6));
    }

    #[test]
    fn test_wave_cycles() {
        let s = OrbitShape::Wave { amplitude: 2.0, hz: 1.0 };
        let e = edge();
        let quarter = s.normal(&e, Vec2::ZERO, 0.25, OrbitOption::None);
        let half = s.normal(&e, Vec2::ZERO, 0.5, OrbitOption::None);
        assert!(quarter.abs_diff_eq(Vec2::new(0.0, -2.0), 1e-5));
        assert!(half.length() < 1e-5);
    }

    #[test]
    fn test_warp_threshold() {
        let s = OrbitShape::Warp { threshold: 0.5 };
        let e = edge();
        assert_eq!(s.tangent(&e, Vec2::ZERO, 0.49, OrbitOption::None), Vec2::ZERO);
        assert_eq!(s.tangent(&e, Vec2::ZERO, 0.5, OrbitOption::None), e.direction());
    }

    #[test]
    fn test_rotate_endpoints() {
        let s = OrbitShape::Rotate { rotations: 2.0 };
        let e = edge();
        let start = s.tangent(&e, Vec2::ZERO, 0.0, OrbitOption::None)
            + s.normal(&e, Vec2::ZERO, 0.0, OrbitOption::None);
        let end = s.tangent(&e, Vec2::ZERO, 1.0, OrbitOption::None)
            + s.normal(&e, Vec2::ZERO, 1.0, OrbitOption::None);
        assert!(start.length() < 1e-5);
        assert!(end.abs_diff_eq(e.direction(), 1e-5));
    }

    #[test]
    fn test_random_jump_option() {
        let s = OrbitShape::RandomJump { min: 2.0, max: 3.0 };
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let opt = s.create_option(&mut rng);
            let OrbitOption::JumpHeight(h) = opt else {
                panic!("expected a jump height");
            };
            assert!((2.0..=3.0).contains(&h));
            let n = s.normal(&edge(), Vec2::ZERO, 0.5, opt);
            assert!((n.y - h * 0.25).abs() < 1e-6);
        }
        assert_eq!(OrbitShape::Direct.create_option(&mut rng), OrbitOption::None);
    }

    #[test]
    fn test_validate() {
        assert!(OrbitShape::Direct.validate().is_ok());
        assert!(OrbitShape::Warp { threshold: 1.0 }.validate().is_ok());
        assert!(matches!(
            OrbitShape::Warp { threshold: 1.5 }.validate(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(matches!(
            OrbitShape::RandomJump { min: 3.0, max: 1.0 }.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
        assert!(OrbitShape::Parabola { coef: f32::NAN }.validate().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{"kind":"wave","amplitude":1.5,"hz":3.0}"#;
        let shape: OrbitShape = serde_json::from_str(json).unwrap();
        assert_eq!(shape, OrbitShape::Wave { amplitude: 1.5, hz: 3.0 });
        assert_eq!(shape.as_str(), "wave");
    }
}
